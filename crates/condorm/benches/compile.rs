use condorm::q::{self, Op, Order, Query};
use condorm::{PostgresDialect, Selection, SqliteDialect, compile::compile_select};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

const FIELDS: &[&str] = &["id", "name", "addr"];

/// `col0 = ? AND col1 = ? ...` with `n` comparisons.
fn build_and_chain(n: usize) -> Query {
    let mut query = Query::new();
    for i in 0..n {
        query = query.and_filter(&format!("col{i}"), Op::Eq, i as i64);
    }
    query
}

/// `(a AND b) OR (a AND b) ...` with `n` groups.
fn build_or_groups(n: usize) -> Query {
    let mut query = Query::new();
    for i in 0..n {
        let group = q::filter("id", Op::Eq, i as i64).and_filter("name", Op::Eq, "other");
        query = query.or(group);
    }
    query.order_by("id", Order::Desc).limit(10)
}

fn bench_compile_and_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/and_chain");

    for n in [1, 5, 10, 50, 100] {
        let query = build_and_chain(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &query, |b, query| {
            b.iter(|| {
                black_box(
                    compile_select(&PostgresDialect, "t", FIELDS, &Selection::All, query).unwrap(),
                )
            });
        });
    }

    group.finish();
}

fn bench_compile_or_groups(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/or_groups");

    for n in [1, 5, 10, 50] {
        let query = build_or_groups(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &query, |b, query| {
            b.iter(|| {
                black_box(
                    compile_select(&SqliteDialect, "t", FIELDS, &Selection::All, query).unwrap(),
                )
            });
        });
    }

    group.finish();
}

fn bench_build_and_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/build_and_compile");

    for n in [5, 20, 100, 500] {
        let values: Vec<i64> = (0..n).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| {
                let query = q::column("id").in_list(values.iter().copied());
                black_box(
                    compile_select(&PostgresDialect, "t", FIELDS, &Selection::All, &query)
                        .unwrap(),
                )
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_compile_and_chain,
    bench_compile_or_groups,
    bench_build_and_compile
);
criterion_main!(benches);
