//! Query executor.

use crate::compile::{CompiledQuery, Selection, compile_select};
use crate::config::DbConfig;
use crate::dialect::Dialect;
use crate::driver::Driver;
use crate::error::{OrmError, OrmResult};
use crate::q::Query;
use crate::record::{Record, descriptor, map_rows};
use std::sync::Arc;
use std::time::Instant;
use tracing::Level;

/// One argument to [`Db::select`]: a query or an explicit column list.
#[derive(Debug, Clone)]
pub enum Modifier {
    Query(Query),
    Columns(Vec<String>),
}

impl From<Query> for Modifier {
    fn from(query: Query) -> Self {
        Modifier::Query(query)
    }
}

impl From<&str> for Modifier {
    fn from(column: &str) -> Self {
        Modifier::Columns(vec![column.to_string()])
    }
}

impl From<String> for Modifier {
    fn from(column: String) -> Self {
        Modifier::Columns(vec![column])
    }
}

impl From<Vec<&str>> for Modifier {
    fn from(columns: Vec<&str>) -> Self {
        Modifier::Columns(columns.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for Modifier {
    fn from(columns: Vec<String>) -> Self {
        Modifier::Columns(columns)
    }
}

impl<const N: usize> From<[&str; N]> for Modifier {
    fn from(columns: [&str; N]) -> Self {
        Modifier::Columns(columns.iter().map(|c| c.to_string()).collect())
    }
}

/// A database handle: a driver plus the dialect its SQL is written in.
///
/// # Example
/// ```ignore
/// use condorm::{Db, Record, q::{self, Op, Order}};
///
/// #[derive(Debug, Default, Record)]
/// struct TestModel { id: i64, name: String, addr: String }
///
/// let db = Db::open_sqlite_in_memory()?;
/// let mut rows: Vec<TestModel> = Vec::new();
/// db.select(&mut rows, &[q::limit(2).order_by("id", Order::Desc).into()])?;
/// ```
pub struct Db<D> {
    driver: D,
    dialect: Arc<dyn Dialect>,
    config: DbConfig,
}

impl<D: Driver> Db<D> {
    /// Create a handle over `driver` speaking `dialect`.
    pub fn new(driver: D, dialect: impl Dialect + 'static) -> Self {
        Self::with_config(driver, Arc::new(dialect), DbConfig::default())
    }

    /// Create a handle with a shared dialect and explicit configuration.
    pub fn with_config(driver: D, dialect: Arc<dyn Dialect>, config: DbConfig) -> Self {
        Self {
            driver,
            dialect,
            config,
        }
    }

    /// The underlying driver, e.g. for setup statements.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn dialect(&self) -> &dyn Dialect {
        &*self.dialect
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    /// Compile the SELECT that [`Db::select`] would run for `T`, without running it.
    pub fn compile_select<T: Record>(&self, modifiers: &[Modifier]) -> OrmResult<CompiledQuery> {
        let (query, selection) = split_modifiers(modifiers)?;
        let desc = descriptor::<T>();
        compile_select(
            &*self.dialect,
            desc.table(),
            desc.field_names(),
            &selection,
            query.unwrap_or(&Query::new()),
        )
    }

    /// Select rows of `T` and append them to `dest`.
    ///
    /// With no modifiers this selects every row of the table. On any error
    /// `dest` is left untouched.
    pub fn select<T: Record>(&self, dest: &mut Vec<T>, modifiers: &[Modifier]) -> OrmResult<()> {
        let compiled = self.compile_select::<T>(modifiers)?;
        let records = self.fetch::<T>(&compiled)?;
        dest.extend(records);
        Ok(())
    }

    fn fetch<T: Record>(&self, compiled: &CompiledQuery) -> OrmResult<Vec<T>> {
        if self.config.logging_enabled {
            self.log_sql(compiled);
        }

        let start = Instant::now();
        let result = self
            .driver
            .execute(&compiled.sql, &compiled.params)
            .map_err(|err| {
                tracing::debug!(target: "condorm.sql", error = %err, "query failed");
                OrmError::Execution(err)
            })?;
        let elapsed = start.elapsed();

        tracing::trace!(
            target: "condorm.sql",
            rows = result.len(),
            elapsed_us = elapsed.as_micros() as u64,
            "query finished"
        );
        if let Some(threshold) = self.config.slow_query_threshold
            && elapsed > threshold
        {
            tracing::warn!(
                target: "condorm.sql",
                dialect = self.dialect.name(),
                elapsed_ms = elapsed.as_millis() as u64,
                sql = %self.config.truncate_sql(&compiled.sql),
                "slow query"
            );
        }

        map_rows(result)
    }

    fn log_sql(&self, compiled: &CompiledQuery) {
        /// Dispatch a tracing event at a runtime-determined level.
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        let sql = self.config.truncate_sql(&compiled.sql);
        emit_at_level!(
            self.config.log_level,
            target: "condorm.sql",
            dialect = self.dialect.name(),
            param_count = compiled.params.len(),
            sql = %sql,
        );
    }
}

#[cfg(feature = "sqlite")]
impl Db<rusqlite::Connection> {
    /// Wrap an existing SQLite connection.
    ///
    /// Double-quoted string literals are turned off on `conn`, so a quoted
    /// identifier that names no column fails at execution.
    pub fn from_sqlite(conn: rusqlite::Connection) -> OrmResult<Self> {
        crate::driver::strict_identifiers(&conn)?;
        Ok(Self::new(conn, crate::dialect::SqliteDialect))
    }

    /// Open a SQLite database file.
    pub fn open_sqlite(path: impl AsRef<std::path::Path>) -> OrmResult<Self> {
        Self::from_sqlite(rusqlite::Connection::open(path)?)
    }

    /// Open a private in-memory SQLite database.
    pub fn open_sqlite_in_memory() -> OrmResult<Self> {
        Self::from_sqlite(rusqlite::Connection::open_in_memory()?)
    }
}

fn split_modifiers(modifiers: &[Modifier]) -> OrmResult<(Option<&Query>, Selection)> {
    let mut query = None;
    let mut columns = None;
    for modifier in modifiers {
        match modifier {
            Modifier::Query(q) => {
                if query.replace(q).is_some() {
                    return Err(OrmError::invalid_argument(
                        "more than one query modifier passed to select",
                    ));
                }
            }
            Modifier::Columns(cols) => {
                if columns.replace(cols).is_some() {
                    return Err(OrmError::invalid_argument(
                        "more than one column list passed to select",
                    ));
                }
            }
        }
    }
    let selection = match columns {
        Some(cols) => Selection::Columns(cols.clone()),
        None => Selection::All,
    };
    Ok((query, selection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::PostgresDialect;
    use crate::driver::ResultSet;
    use crate::error::DriverError;
    use crate::q::{self, Op};
    use crate::value::{FromValue, Value};
    use std::cell::RefCell;

    #[derive(Debug, Default, PartialEq)]
    struct User {
        id: i64,
        name: String,
    }

    impl Record for User {
        const TABLE: &'static str = "user";
        const FIELDS: &'static [&'static str] = &["id", "name"];

        fn set_field(&mut self, index: usize, value: Value) -> OrmResult<()> {
            let column = Self::FIELDS[index];
            let conv = |msg: String| OrmError::conversion(column, msg);
            match index {
                0 => self.id = FromValue::from_value(value).map_err(conv)?,
                _ => self.name = FromValue::from_value(value).map_err(conv)?,
            }
            Ok(())
        }
    }

    /// Records every call and replays a canned result.
    struct Recording {
        calls: RefCell<Vec<(String, Vec<Value>)>>,
        reply: Result<ResultSet, String>,
    }

    impl Recording {
        fn ok(reply: ResultSet) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                reply: Ok(reply),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                reply: Err(message.to_string()),
            }
        }
    }

    impl Driver for Recording {
        fn execute(&self, sql: &str, params: &[Value]) -> Result<ResultSet, DriverError> {
            self.calls.borrow_mut().push((sql.to_string(), params.to_vec()));
            match &self.reply {
                Ok(rs) => Ok(rs.clone()),
                Err(msg) => Err(msg.clone().into()),
            }
        }
    }

    fn users() -> ResultSet {
        ResultSet {
            columns: vec!["id".into(), "name".into()],
            rows: vec![
                vec![Value::Integer(1), Value::Text("a".into())],
                vec![Value::Integer(2), Value::Text("b".into())],
            ],
        }
    }

    #[test]
    fn select_passes_compiled_sql_to_driver() {
        let db = Db::new(Recording::ok(users()), PostgresDialect);
        let mut out: Vec<User> = Vec::new();
        db.select(&mut out, &[q::filter("id", Op::Gt, 0).into()]).unwrap();

        assert_eq!(out.len(), 2);
        let calls = db.driver().calls.borrow();
        assert_eq!(
            calls[0].0,
            r#"SELECT "id", "name" FROM "user" WHERE "id" > $1"#
        );
        assert_eq!(calls[0].1, vec![Value::Integer(0)]);
    }

    #[test]
    fn select_appends_to_existing_rows() {
        let db = Db::new(Recording::ok(users()), PostgresDialect);
        let mut out = vec![User { id: 9, name: "z".into() }];
        db.select(&mut out, &[]).unwrap();
        assert_eq!(out.iter().map(|u| u.id).collect::<Vec<_>>(), vec![9, 1, 2]);
    }

    #[test]
    fn column_modifier_projects() {
        let db = Db::new(Recording::ok(users()), PostgresDialect);
        let compiled = db.compile_select::<User>(&["name".into()]).unwrap();
        assert_eq!(compiled.sql, r#"SELECT "name" FROM "user""#);
    }

    #[test]
    fn duplicate_modifiers_are_rejected() {
        let db = Db::new(Recording::ok(users()), PostgresDialect);
        let err = db
            .compile_select::<User>(&[q::limit(1).into(), q::limit(2).into()])
            .unwrap_err();
        assert!(err.is_invalid_argument());

        let err = db
            .compile_select::<User>(&["id".into(), "name".into()])
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn invalid_query_never_reaches_driver() {
        let db = Db::new(Recording::ok(users()), PostgresDialect);
        let mut out: Vec<User> = Vec::new();
        let err = db
            .select(&mut out, &[q::column("id").in_list(Vec::<i64>::new()).into()])
            .unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(db.driver().calls.borrow().is_empty());
    }

    #[test]
    fn driver_error_is_wrapped_verbatim() {
        let db = Db::new(Recording::failing("connection lost"), PostgresDialect);
        let mut out: Vec<User> = Vec::new();
        let err = db.select(&mut out, &[]).unwrap_err();
        assert!(err.is_execution());
        assert_eq!(err.to_string(), "Execution error: connection lost");
        assert!(out.is_empty());
    }

    #[test]
    fn conversion_error_leaves_destination_untouched() {
        let bad = ResultSet {
            columns: vec!["id".into()],
            rows: vec![vec![Value::Integer(1)], vec![Value::Text("x".into())]],
        };
        let db = Db::new(Recording::ok(bad), PostgresDialect);
        let mut out: Vec<User> = Vec::new();
        let err = db.select(&mut out, &[]).unwrap_err();
        assert!(err.is_conversion());
        assert!(out.is_empty());
    }

    #[test]
    fn config_is_applied() {
        let config = DbConfig::new().logging(false);
        let db = Db::with_config(
            Recording::ok(users()),
            Arc::new(PostgresDialect),
            config,
        );
        assert!(!db.config().logging_enabled);
        assert_eq!(db.dialect().name(), "postgres");
    }
}
