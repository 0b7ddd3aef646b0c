//! Chainable query modifier builder.

use crate::error::{OrmError, OrmResult};
use crate::q::condition::{Condition, Logic, Op};
use crate::value::Value;
use std::sync::Arc;

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    pub fn as_sql(self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

/// The modifier set of a SELECT: condition tree, ordering, limit and offset.
///
/// Every builder method takes `self` by value and returns the updated query,
/// so a chain always yields a fresh value. Cloning is cheap because the
/// condition tree lives behind `Arc`; clone a partially built query to reuse
/// it on independent branches.
///
/// Invalid input (negative limit, empty IN list, wrong arity) does not panic
/// or break the chain: the first such error is kept and reported by
/// [`Query::validate`], which compilation always calls.
#[derive(Clone, Debug, Default)]
pub struct Query {
    condition: Option<Arc<Condition>>,
    order: Vec<(String, Order)>,
    limit: Option<u64>,
    offset: Option<u64>,
    build_error: Option<String>,
}

impl Query {
    /// Create an empty query (no WHERE, ORDER BY, LIMIT or OFFSET).
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Conditions ====================

    /// AND a comparison built inline: `... AND column op value`.
    ///
    /// Starts the condition tree if there is none yet.
    pub fn and_filter(self, column: &str, op: Op, value: impl Into<Value>) -> Self {
        let node = Condition::compare(column, op, vec![value.into()]);
        self.push(Logic::And, node)
    }

    /// OR a comparison built inline: `... OR column op value`.
    pub fn or_filter(self, column: &str, op: Op, value: impl Into<Value>) -> Self {
        let node = Condition::compare(column, op, vec![value.into()]);
        self.push(Logic::Or, node)
    }

    /// AND the condition tree of `other` as a single grouped operand.
    ///
    /// Only the condition of `other` is used; its ordering and pagination are ignored.
    pub fn and(self, other: Query) -> Self {
        self.merge(Logic::And, other)
    }

    /// OR the condition tree of `other` as a single grouped operand.
    ///
    /// Only the condition of `other` is used; its ordering and pagination are ignored.
    pub fn or(self, other: Query) -> Self {
        self.merge(Logic::Or, other)
    }

    /// Scope the next comparison to `column`, joined with AND.
    pub fn and_column(self, column: &str) -> ColumnScope {
        ColumnScope::new(self, Logic::And, column)
    }

    /// Scope the next comparison to `column`, joined with OR.
    pub fn or_column(self, column: &str) -> ColumnScope {
        ColumnScope::new(self, Logic::Or, column)
    }

    // ==================== Ordering & Pagination ====================

    /// Append an ORDER BY key. The first call is the primary sort key.
    pub fn order_by(mut self, column: &str, order: Order) -> Self {
        self.order.push((column.to_string(), order));
        self
    }

    /// Set LIMIT, replacing any previous value.
    pub fn limit(mut self, n: i64) -> Self {
        match u64::try_from(n) {
            Ok(n) => self.limit = Some(n),
            Err(_) => self.fail(format!("LIMIT must be non-negative, got {n}")),
        }
        self
    }

    /// Set OFFSET, replacing any previous value.
    pub fn offset(mut self, n: i64) -> Self {
        match u64::try_from(n) {
            Ok(n) => self.offset = Some(n),
            Err(_) => self.fail(format!("OFFSET must be non-negative, got {n}")),
        }
        self
    }

    // ==================== Accessors ====================

    /// Root of the condition tree, if any.
    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_deref()
    }

    pub fn order(&self) -> &[(String, Order)] {
        &self.order
    }

    pub fn limit_value(&self) -> Option<u64> {
        self.limit
    }

    pub fn offset_value(&self) -> Option<u64> {
        self.offset
    }

    /// The first error recorded while building, if any.
    pub fn build_error(&self) -> Option<&str> {
        self.build_error.as_deref()
    }

    /// Validate builder state before compilation.
    pub fn validate(&self) -> OrmResult<()> {
        if let Some(ref err) = self.build_error {
            return Err(OrmError::InvalidArgument(err.clone()));
        }
        Ok(())
    }

    // ==================== Internals ====================

    fn fail(&mut self, message: String) {
        if self.build_error.is_none() {
            self.build_error = Some(message);
        }
    }

    fn push(mut self, logic: Logic, node: OrmResult<Condition>) -> Self {
        match node {
            Ok(node) => self.attach(logic, Arc::new(node)),
            Err(OrmError::InvalidArgument(message)) => self.fail(message),
            Err(err) => self.fail(err.to_string()),
        }
        self
    }

    fn merge(mut self, logic: Logic, other: Query) -> Self {
        if let Some(err) = other.build_error {
            self.fail(err);
            return self;
        }
        match other.condition {
            Some(node) => self.attach(logic, node),
            None => self.fail(format!(
                "{} requires an operand with a condition",
                logic.as_sql()
            )),
        }
        self
    }

    fn attach(&mut self, logic: Logic, right: Arc<Condition>) {
        self.condition = Some(match self.condition.take() {
            Some(left) => Arc::new(Condition::combine(logic, left, right)),
            None => right,
        });
    }
}

/// A comparison waiting for its operator, produced by [`column`](crate::q::column)
/// or [`Query::and_column`] / [`Query::or_column`].
#[derive(Clone, Debug)]
pub struct ColumnScope {
    base: Query,
    logic: Logic,
    column: String,
}

impl ColumnScope {
    pub(crate) fn new(base: Query, logic: Logic, column: &str) -> Self {
        Self {
            base,
            logic,
            column: column.to_string(),
        }
    }

    /// `column op value`
    pub fn cmp(self, op: Op, value: impl Into<Value>) -> Query {
        self.finish(op, vec![value.into()])
    }

    /// `column IN (v1, v2, ...)`. An empty list is an invalid argument.
    pub fn in_list<I, V>(self, values: I) -> Query
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.finish(Op::In, values)
    }

    /// `column LIKE pattern`; the pattern is bound, never inlined.
    pub fn like(self, pattern: impl Into<Value>) -> Query {
        self.finish(Op::Like, vec![pattern.into()])
    }

    /// `column BETWEEN low AND high`
    pub fn between(self, low: impl Into<Value>, high: impl Into<Value>) -> Query {
        self.finish(Op::Between, vec![low.into(), high.into()])
    }

    fn finish(self, op: Op, values: Vec<Value>) -> Query {
        let node = Condition::compare(self.column, op, values);
        self.base.push(self.logic, node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::q;

    #[test]
    fn chain_is_left_associative() {
        let query = q::filter("a", Op::Eq, 1)
            .and_filter("b", Op::Eq, 2)
            .or_filter("c", Op::Eq, 3);
        let Some(Condition::Combinator { logic, left, .. }) = query.condition() else {
            panic!("expected combinator");
        };
        assert_eq!(*logic, Logic::Or);
        assert_eq!(left.logic(), Some(Logic::And));
    }

    #[test]
    fn negative_limit_is_recorded() {
        let query = q::limit(-1);
        assert!(query.validate().unwrap_err().is_invalid_argument());
        assert_eq!(query.limit_value(), None);
    }

    #[test]
    fn negative_offset_is_recorded() {
        let query = q::limit(2).offset(-3);
        assert!(query.validate().is_err());
        assert_eq!(query.limit_value(), Some(2));
    }

    #[test]
    fn empty_in_list_is_recorded() {
        let query = q::column("id").in_list(Vec::<i64>::new());
        let err = query.validate().unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(
            err.to_string(),
            "Invalid argument: IN expects at least 1 value, got 0"
        );
        assert!(query.condition().is_none());
    }

    #[test]
    fn error_in_sub_tree_propagates() {
        let bad = q::column("id").in_list(Vec::<i64>::new());
        let query = q::filter("a", Op::Eq, 1).or(bad);
        assert!(query.validate().is_err());
    }

    #[test]
    fn operand_without_condition_is_rejected() {
        let query = q::filter("a", Op::Eq, 1).and(q::limit(1));
        assert!(query.validate().is_err());
    }

    #[test]
    fn between_via_filter_has_wrong_arity() {
        let query = q::filter("id", Op::Between, 1);
        assert!(query.validate().is_err());
    }

    #[test]
    fn reuse_does_not_alias() {
        let base = q::filter("a", Op::Eq, 1);
        let left = base.clone().and_filter("b", Op::Eq, 2);
        let right = base.clone().or_filter("c", Op::Eq, 3);
        assert_eq!(base.condition().unwrap().param_count(), 1);
        assert_eq!(left.condition().unwrap().logic(), Some(Logic::And));
        assert_eq!(right.condition().unwrap().logic(), Some(Logic::Or));
    }

    #[test]
    fn limit_and_offset_override() {
        let query = q::limit(5).limit(2).offset(1).offset(4);
        assert_eq!(query.limit_value(), Some(2));
        assert_eq!(query.offset_value(), Some(4));
    }

    #[test]
    fn order_by_composes_in_call_order() {
        let query = q::order_by("name", Order::Asc).order_by("id", Order::Desc);
        assert_eq!(
            query.order(),
            &[("name".to_string(), Order::Asc), ("id".to_string(), Order::Desc)]
        );
    }
}
