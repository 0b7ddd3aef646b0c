//! Database driver capability.
//!
//! The executor only needs one operation from a database connection: run a
//! statement with bound values and hand back the column names and raw rows.

use crate::error::DriverError;
use crate::value::Value;

/// Column names plus rows of raw values, as returned by a driver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A connection that can run a query.
///
/// Whether one driver may be used from several threads at once is up to the
/// implementation; [`Db`](crate::Db) adds no synchronization of its own.
pub trait Driver {
    /// Execute `sql` with `params` bound in order and collect every row.
    fn execute(&self, sql: &str, params: &[Value]) -> Result<ResultSet, DriverError>;
}

impl<D: Driver + ?Sized> Driver for &D {
    fn execute(&self, sql: &str, params: &[Value]) -> Result<ResultSet, DriverError> {
        (**self).execute(sql, params)
    }
}

impl<D: Driver + ?Sized> Driver for Box<D> {
    fn execute(&self, sql: &str, params: &[Value]) -> Result<ResultSet, DriverError> {
        (**self).execute(sql, params)
    }
}

#[cfg(feature = "sqlite")]
pub use sqlite::strict_identifiers;

#[cfg(feature = "sqlite")]
mod sqlite {
    use super::{Driver, ResultSet};
    use crate::error::DriverError;
    use crate::value::Value;
    use rusqlite::types::Value as SqliteValue;

    /// Stop SQLite from reading an unknown `"identifier"` as a string literal.
    pub fn strict_identifiers(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
        use rusqlite::config::DbConfig;

        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_DQS_DML, false)?;
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_DQS_DDL, false)?;
        Ok(())
    }

    fn to_sqlite(value: &Value) -> SqliteValue {
        match value {
            Value::Null => SqliteValue::Null,
            Value::Integer(v) => SqliteValue::Integer(*v),
            Value::Real(v) => SqliteValue::Real(*v),
            Value::Text(v) => SqliteValue::Text(v.clone()),
            Value::Bool(v) => SqliteValue::Integer(i64::from(*v)),
            Value::Blob(v) => SqliteValue::Blob(v.clone()),
        }
    }

    fn from_sqlite(value: SqliteValue) -> Value {
        match value {
            SqliteValue::Null => Value::Null,
            SqliteValue::Integer(v) => Value::Integer(v),
            SqliteValue::Real(v) => Value::Real(v),
            SqliteValue::Text(v) => Value::Text(v),
            SqliteValue::Blob(v) => Value::Blob(v),
        }
    }

    impl Driver for rusqlite::Connection {
        fn execute(&self, sql: &str, params: &[Value]) -> Result<ResultSet, DriverError> {
            let mut stmt = self.prepare(sql)?;
            let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
            let width = columns.len();

            let mut rows = stmt.query(rusqlite::params_from_iter(params.iter().map(to_sqlite)))?;
            let mut out = Vec::new();
            while let Some(row) = rows.next()? {
                let mut values = Vec::with_capacity(width);
                for i in 0..width {
                    values.push(from_sqlite(row.get::<_, SqliteValue>(i)?));
                }
                out.push(values);
            }

            Ok(ResultSet { columns, rows: out })
        }
    }
}
