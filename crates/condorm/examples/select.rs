//! SELECT walkthrough against an in-memory SQLite database
//!
//! Run with: cargo run --example select -p condorm
//!
//! Set RUST_LOG=condorm=debug to see the compiled SQL.

use condorm::q::{self, Op, Order};
use condorm::{Db, OrmError, Record};

#[derive(Debug, Default, Record)]
struct TestModel {
    id: i64,
    name: String,
    addr: String,
}

fn main() -> Result<(), OrmError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let db = Db::open_sqlite_in_memory()?;

    // Setup: create and fill the table
    db.driver().execute_batch(
        "CREATE TABLE test_model (
            id INTEGER NOT NULL PRIMARY KEY,
            name TEXT NOT NULL,
            addr TEXT NOT NULL
        );
        INSERT INTO test_model (id, name, addr) VALUES
            (1, 'test1', 'addr1'),
            (2, 'test2', 'addr2'),
            (3, 'test3', 'addr3'),
            (4, 'other', 'addr4'),
            (5, 'other', 'addr5'),
            (6, 'other1', 'addr6'),
            (7, 'other2', 'addr7');",
    )?;

    // ============================================
    // Example 1: Every row
    // ============================================
    println!("=== Example 1: All rows ===");
    let mut rows: Vec<TestModel> = Vec::new();
    db.select(&mut rows, &[])?;
    for row in &rows {
        println!("  {row:?}");
    }

    // ============================================
    // Example 2: Grouped OR / AND
    // ============================================
    println!("\n=== Example 2: id = 1 OR (id = 5 AND name = 'other') ===");
    let query = q::filter("id", Op::Eq, 1)
        .or(q::filter("id", Op::Eq, 5).and_filter("name", Op::Eq, "other"));
    println!("  SQL: {}", db.compile_select::<TestModel>(&[query.clone().into()])?);
    let mut rows: Vec<TestModel> = Vec::new();
    db.select(&mut rows, &[query.into()])?;
    for row in &rows {
        println!("  {row:?}");
    }

    // ============================================
    // Example 3: IN, LIKE, BETWEEN
    // ============================================
    println!("\n=== Example 3: IN / LIKE / BETWEEN ===");
    for (label, query) in [
        ("id IN (2, 3)", q::column("id").in_list([2, 3])),
        ("name LIKE '%3'", q::column("name").like("%3")),
        ("id BETWEEN 3 AND 5", q::column("id").between(3, 5)),
    ] {
        let mut rows: Vec<TestModel> = Vec::new();
        db.select(&mut rows, &[query.into()])?;
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        println!("  {label}: {ids:?}");
    }

    // ============================================
    // Example 4: Ordering and pagination
    // ============================================
    println!("\n=== Example 4: ORDER BY id DESC LIMIT 2, then LIMIT 2 OFFSET 3 ===");
    let mut rows: Vec<TestModel> = Vec::new();
    db.select(&mut rows, &[q::limit(2).order_by("id", Order::Desc).into()])?;
    db.select(&mut rows, &[q::limit(2).offset(3).into()])?;
    for row in &rows {
        println!("  {row:?}");
    }

    // ============================================
    // Example 5: Column projection
    // ============================================
    println!("\n=== Example 5: Only name and addr ===");
    let mut rows: Vec<TestModel> = Vec::new();
    db.select(
        &mut rows,
        &[
            ["name", "addr"].into(),
            q::filter("name", Op::Eq, "other").into(),
        ],
    )?;
    for row in &rows {
        println!("  {row:?}");
    }

    // ============================================
    // Example 6: Errors
    // ============================================
    println!("\n=== Example 6: Errors ===");
    let mut rows: Vec<TestModel> = Vec::new();
    match db.select(&mut rows, &[q::column("id").in_list(Vec::<i64>::new()).into()]) {
        Err(err) => println!("  empty IN: {err}"),
        Ok(()) => println!("  empty IN unexpectedly succeeded"),
    }
    match db.select(&mut rows, &[q::offset(2).into()]) {
        Err(err) => println!("  OFFSET without LIMIT: {err}"),
        Ok(()) => println!("  OFFSET without LIMIT unexpectedly succeeded"),
    }
    match db.select(&mut rows, &[q::filter("nope", Op::Eq, 1).into()]) {
        Err(err) => println!("  unknown column: {err}"),
        Ok(()) => println!("  unknown column unexpectedly succeeded"),
    }

    Ok(())
}
