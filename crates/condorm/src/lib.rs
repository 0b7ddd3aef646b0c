//! # condorm
//!
//! A small query-construction and result-mapping layer over a SQL driver.
//!
//! ## Features
//!
//! - **Condition trees**: comparisons combined with AND/OR, grouped by construction
//! - **Dialect-aware compilation**: identifier quoting and `?` / `$n` placeholders per database
//! - **Bound values only**: comparison values and LIKE patterns are never inlined
//! - **Convention mapping**: result columns fill struct fields by name via `#[derive(Record)]`
//! - **Pluggable drivers**: anything implementing [`Driver`]; SQLite via `rusqlite` built in
//!
//! ## Usage
//!
//! ```ignore
//! use condorm::{Db, Record, q::{self, Op, Order}};
//!
//! #[derive(Debug, Default, Record)]
//! struct TestModel {
//!     id: i64,
//!     name: String,
//!     addr: String,
//! }
//!
//! let db = Db::open_sqlite("app.db")?;
//!
//! // SELECT "id", "name", "addr" FROM "test_model"
//! //   WHERE "id" = ? OR ("id" = ? AND "name" = ?)
//! let mut rows: Vec<TestModel> = Vec::new();
//! db.select(
//!     &mut rows,
//!     &[q::filter("id", Op::Eq, 1)
//!         .or(q::filter("id", Op::Eq, 5).and_filter("name", Op::Eq, "other"))
//!         .into()],
//! )?;
//!
//! // SELECT "name", "addr" FROM "test_model" ORDER BY "id" DESC LIMIT 2
//! let mut rows: Vec<TestModel> = Vec::new();
//! db.select(
//!     &mut rows,
//!     &[["name", "addr"].into(), q::limit(2).order_by("id", Order::Desc).into()],
//! )?;
//! ```

pub mod compile;
pub mod config;
pub mod db;
pub mod dialect;
pub mod driver;
pub mod error;
pub mod q;
pub mod record;
pub mod value;

pub use compile::{CompiledQuery, Selection};
pub use config::DbConfig;
pub use db::{Db, Modifier};
pub use dialect::{Dialect, MySqlDialect, PostgresDialect, SqliteDialect};
pub use driver::{Driver, ResultSet};
pub use error::{DriverError, OrmError, OrmResult};
pub use q::{Condition, Logic, Op, Order, Query};
pub use record::{Record, RecordDescriptor, descriptor, map_rows};
pub use value::{FromValue, Value};

#[cfg(feature = "derive")]
pub use condorm_derive::Record;
