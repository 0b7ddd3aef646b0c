//! SELECT compiler.
//!
//! Walks a [`Query`] and renders SQL text plus the ordered list of bound
//! values. Placeholders are numbered while rendering, left to right, so the
//! parameter list always lines up with the placeholders regardless of how the
//! dialect spells them.

use crate::dialect::Dialect;
use crate::error::{OrmError, OrmResult};
use crate::q::{Condition, Logic, Op, Query};
use crate::value::Value;
use std::fmt;

/// Which columns a SELECT projects.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// Every mapped field of the destination record.
    #[default]
    All,
    /// An explicit column list, in the given order.
    Columns(Vec<String>),
}

/// SQL text and its bound values, ready for the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

impl fmt::Display for CompiledQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Compile a SELECT over `table`.
///
/// `fields` are the destination record's columns in declaration order; they
/// are projected when `selection` is [`Selection::All`]. The tree in `query`
/// is only read.
pub fn compile_select(
    dialect: &dyn Dialect,
    table: &str,
    fields: &[&str],
    selection: &Selection,
    query: &Query,
) -> OrmResult<CompiledQuery> {
    query.validate()?;

    let mut r = Renderer::new(dialect);

    r.sql.push_str("SELECT ");
    match selection {
        Selection::Columns(cols) if cols.is_empty() => {
            return Err(OrmError::invalid_argument("column list cannot be empty"));
        }
        Selection::Columns(cols) => r.column_list(cols.iter().map(String::as_str)),
        Selection::All if fields.is_empty() => r.sql.push('*'),
        Selection::All => r.column_list(fields.iter().copied()),
    }
    r.sql.push_str(" FROM ");
    r.sql.push_str(&dialect.quote_identifier(table));

    // WHERE
    if let Some(cond) = query.condition() {
        r.sql.push_str(" WHERE ");
        r.condition(cond)?;
    }

    // ORDER BY
    if !query.order().is_empty() {
        r.sql.push_str(" ORDER BY ");
        for (i, (column, order)) in query.order().iter().enumerate() {
            if i > 0 {
                r.sql.push_str(", ");
            }
            r.sql.push_str(&dialect.quote_identifier(column));
            r.sql.push(' ');
            r.sql.push_str(order.as_sql());
        }
    }

    // LIMIT, OFFSET
    if let Some(limit) = query.limit_value() {
        r.sql.push_str(&format!(" LIMIT {limit}"));
    }
    if let Some(offset) = query.offset_value() {
        if query.limit_value().is_none() && !dialect.supports_offset_without_limit() {
            return Err(OrmError::unsupported(format!(
                "{} does not support OFFSET without LIMIT",
                dialect.name()
            )));
        }
        r.sql.push_str(&format!(" OFFSET {offset}"));
    }

    Ok(r.finish())
}

struct Renderer<'a> {
    dialect: &'a dyn Dialect,
    sql: String,
    params: Vec<Value>,
}

impl<'a> Renderer<'a> {
    fn new(dialect: &'a dyn Dialect) -> Self {
        Self {
            dialect,
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn finish(self) -> CompiledQuery {
        CompiledQuery {
            sql: self.sql,
            params: self.params,
        }
    }

    fn column_list<'c>(&mut self, cols: impl Iterator<Item = &'c str>) {
        for (i, col) in cols.enumerate() {
            if i > 0 {
                self.sql.push_str(", ");
            }
            self.sql.push_str(&self.dialect.quote_identifier(col));
        }
    }

    fn bind(&mut self, value: &Value) {
        let placeholder = self.dialect.placeholder(self.params.len());
        self.sql.push_str(&placeholder);
        self.params.push(value.clone());
    }

    fn condition(&mut self, node: &Condition) -> OrmResult<()> {
        match node {
            Condition::Compare { column, op, values } => {
                op.check_arity(values.len())?;
                self.sql.push_str(&self.dialect.quote_identifier(column));
                self.sql.push(' ');
                self.sql.push_str(op.as_sql());
                self.sql.push(' ');
                match op {
                    Op::In => {
                        self.sql.push('(');
                        for (i, v) in values.iter().enumerate() {
                            if i > 0 {
                                self.sql.push_str(", ");
                            }
                            self.bind(v);
                        }
                        self.sql.push(')');
                    }
                    Op::Between => {
                        self.bind(&values[0]);
                        self.sql.push_str(" AND ");
                        self.bind(&values[1]);
                    }
                    _ => self.bind(&values[0]),
                }
            }
            Condition::Combinator { logic, left, right } => {
                self.operand(*logic, left)?;
                self.sql.push(' ');
                self.sql.push_str(logic.as_sql());
                self.sql.push(' ');
                self.operand(*logic, right)?;
            }
        }
        Ok(())
    }

    /// Render a combinator child, grouping it when it is a combinator of the other kind.
    fn operand(&mut self, parent: Logic, child: &Condition) -> OrmResult<()> {
        let grouped = matches!(child.logic(), Some(logic) if logic != parent);
        if grouped {
            self.sql.push('(');
        }
        self.condition(child)?;
        if grouped {
            self.sql.push(')');
        }
        Ok(())
    }
}
