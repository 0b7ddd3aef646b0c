//! Condition tree primitives.
//!
//! A [`Condition`] is either a single comparison or an AND/OR combinator over
//! two sub-trees. Children are shared through `Arc`, so combining trees never
//! copies them and a built tree can be read by concurrent compilations.

use crate::error::{OrmError, OrmResult};
use crate::value::Value;
use std::str::FromStr;
use std::sync::Arc;

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Like,
    In,
    Between,
}

impl Op {
    /// Operator text as emitted into SQL.
    pub fn as_sql(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ne => "<>",
            Op::Lt => "<",
            Op::Gt => ">",
            Op::Le => "<=",
            Op::Ge => ">=",
            Op::Like => "LIKE",
            Op::In => "IN",
            Op::Between => "BETWEEN",
        }
    }

    /// Check that `n` bound values fit this operator.
    pub fn check_arity(self, n: usize) -> OrmResult<()> {
        let ok = match self {
            Op::In => n >= 1,
            Op::Between => n == 2,
            _ => n == 1,
        };
        if ok {
            return Ok(());
        }
        let expected = match self {
            Op::In => "at least 1 value",
            Op::Between => "exactly 2 values",
            _ => "exactly 1 value",
        };
        Err(OrmError::invalid_argument(format!(
            "{} expects {expected}, got {n}",
            self.as_sql()
        )))
    }
}

impl FromStr for Op {
    type Err = OrmError;

    fn from_str(s: &str) -> OrmResult<Self> {
        let op = match s.trim() {
            "=" => Op::Eq,
            "<>" | "!=" => Op::Ne,
            "<" => Op::Lt,
            ">" => Op::Gt,
            "<=" => Op::Le,
            ">=" => Op::Ge,
            other if other.eq_ignore_ascii_case("like") => Op::Like,
            other if other.eq_ignore_ascii_case("in") => Op::In,
            other if other.eq_ignore_ascii_case("between") => Op::Between,
            other => {
                return Err(OrmError::invalid_argument(format!(
                    "unknown operator: {other:?}"
                )));
            }
        };
        Ok(op)
    }
}

/// Boolean combinator kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Logic {
    And,
    Or,
}

impl Logic {
    pub fn as_sql(self) -> &'static str {
        match self {
            Logic::And => "AND",
            Logic::Or => "OR",
        }
    }
}

/// A node of the WHERE expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `column op value(s)`
    Compare {
        column: String,
        op: Op,
        values: Vec<Value>,
    },
    /// `left AND right` / `left OR right`
    Combinator {
        logic: Logic,
        left: Arc<Condition>,
        right: Arc<Condition>,
    },
}

impl Condition {
    /// Create a comparison, rejecting values that don't match the operator's arity.
    pub fn compare(column: impl Into<String>, op: Op, values: Vec<Value>) -> OrmResult<Self> {
        op.check_arity(values.len())?;
        Ok(Condition::Compare {
            column: column.into(),
            op,
            values,
        })
    }

    /// Combine two trees under `logic`.
    pub fn combine(logic: Logic, left: Arc<Condition>, right: Arc<Condition>) -> Self {
        Condition::Combinator { logic, left, right }
    }

    /// Number of placeholders this tree renders to.
    pub fn param_count(&self) -> usize {
        match self {
            Condition::Compare { values, .. } => values.len(),
            Condition::Combinator { left, right, .. } => left.param_count() + right.param_count(),
        }
    }

    /// Combinator kind of this node, if any.
    pub fn logic(&self) -> Option<Logic> {
        match self {
            Condition::Compare { .. } => None,
            Condition::Combinator { logic, .. } => Some(*logic),
        }
    }
}
