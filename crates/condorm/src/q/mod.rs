//! Query builder (q): condition trees plus ORDER BY / LIMIT / OFFSET.
//!
//! # Usage
//!
//! ```ignore
//! use condorm::q::{self, Op, Order};
//!
//! // WHERE "id" = ? OR ("id" = ? AND "name" = ?)
//! let query = q::filter("id", Op::Eq, 1)
//!     .or(q::filter("id", Op::Eq, 5).and_filter("name", Op::Eq, "other"));
//!
//! // WHERE "id" IN (?, ?)
//! let query = q::column("id").in_list([2, 3]);
//!
//! // ORDER BY "id" DESC LIMIT 2
//! let query = q::limit(2).order_by("id", Order::Desc);
//! ```
//!
//! AND/OR combine strictly in call order; grouping is expressed by passing a
//! fully built sub-query to [`Query::and`] / [`Query::or`].

mod builder;
mod condition;

pub use builder::{ColumnScope, Order, Query};
pub use condition::{Condition, Logic, Op};

use crate::value::Value;

/// Start a query with a single comparison: `column op value`.
///
/// # Example
/// ```ignore
/// let query = condorm::q::filter("id", Op::Eq, 1);
/// ```
pub fn filter(column: &str, op: Op, value: impl Into<Value>) -> Query {
    Query::new().and_filter(column, op, value)
}

/// Start a query with a column-scoped comparison (`IN`, `LIKE`, `BETWEEN`).
///
/// # Example
/// ```ignore
/// let query = condorm::q::column("id").between(3, 5);
/// ```
pub fn column(name: &str) -> ColumnScope {
    Query::new().and_column(name)
}

/// Start a query with an ORDER BY key.
pub fn order_by(column: &str, order: Order) -> Query {
    Query::new().order_by(column, order)
}

/// Start a query with a LIMIT.
pub fn limit(n: i64) -> Query {
    Query::new().limit(n)
}

/// Start a query with an OFFSET.
pub fn offset(n: i64) -> Query {
    Query::new().offset(n)
}
