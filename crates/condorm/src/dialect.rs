//! SQL dialect adapters.
//!
//! A [`Dialect`] only knows how to spell identifiers and placeholders for one
//! database. It is passed into [`Db`](crate::Db) explicitly rather than looked
//! up from global state.

/// Per-database SQL spelling rules consumed by the compiler.
pub trait Dialect: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Quote a table or column identifier.
    fn quote_identifier(&self, name: &str) -> String;

    /// Placeholder token for the bound parameter at `index` (0-based).
    fn placeholder(&self, index: usize) -> String;

    /// Whether `OFFSET n` may appear without a preceding `LIMIT`.
    fn supports_offset_without_limit(&self) -> bool;
}

fn quote_with(name: &str, quote: char) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push(quote);
    for c in name.chars() {
        if c == quote {
            out.push(quote);
        }
        out.push(c);
    }
    out.push(quote);
    out
}

/// SQLite: `"ident"`, positional `?`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite3"
    }

    fn quote_identifier(&self, name: &str) -> String {
        quote_with(name, '"')
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn supports_offset_without_limit(&self) -> bool {
        false
    }
}

/// PostgreSQL: `"ident"`, numbered `$1, $2, ...`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn quote_identifier(&self, name: &str) -> String {
        quote_with(name, '"')
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${}", index + 1)
    }

    fn supports_offset_without_limit(&self) -> bool {
        true
    }
}

/// MySQL: `` `ident` ``, positional `?`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_identifier(&self, name: &str) -> String {
        quote_with(name, '`')
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn supports_offset_without_limit(&self) -> bool {
        false
    }
}
