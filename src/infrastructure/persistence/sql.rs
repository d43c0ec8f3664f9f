//! Renders a [`PredicateSet`] into PostgreSQL with `sqlx::QueryBuilder`.
//!
//! Every value is bound. Identifiers are only emitted after a lookup in the
//! table's column list and are always double-quoted.

use serde_json::json;
use sqlx::{Postgres, QueryBuilder};

use crate::error::AppError;
use crate::query::{Predicate, PredicateSet};

/// Static description of a listable table.
#[derive(Debug, Clone, Copy)]
pub struct Table {
    pub name: &'static str,
    /// Projection used by page queries.
    pub projection: &'static str,
    /// Columns predicates and ordering may reference.
    pub columns: &'static [&'static str],
}

impl Table {
    fn ident(&self, column: &str) -> Result<String, AppError> {
        if self.columns.contains(&column) {
            Ok(format!("\"{column}\""))
        } else {
            Err(AppError::bad_request(
                format!("unknown column: {column}"),
                json!({ "table": self.name, "column": column }),
            ))
        }
    }
}

/// `SELECT <projection> ... WHERE ... ORDER BY ... LIMIT ... OFFSET ...`
pub fn select_query(
    table: &Table,
    set: &PredicateSet,
) -> Result<QueryBuilder<'static, Postgres>, AppError> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {} FROM {} WHERE deleted_at IS NULL",
        table.projection, table.name
    ));
    push_predicates(&mut qb, table, set)?;

    if let Some(ordering) = &set.ordering {
        qb.push(" ORDER BY ")
            .push(table.ident(&ordering.column)?)
            .push(" ")
            .push(ordering.direction.as_sql());
    }

    if let Some(window) = set.window {
        qb.push(" LIMIT ").push_bind(window.limit);
        if let Some(offset) = window.offset {
            qb.push(" OFFSET ").push_bind(offset);
        }
    }

    Ok(qb)
}

/// `SELECT COUNT(*) ... WHERE ...`; ordering and window are ignored.
pub fn count_query(
    table: &Table,
    set: &PredicateSet,
) -> Result<QueryBuilder<'static, Postgres>, AppError> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT COUNT(*) FROM {} WHERE deleted_at IS NULL",
        table.name
    ));
    push_predicates(&mut qb, table, set)?;
    Ok(qb)
}

fn push_predicates(
    qb: &mut QueryBuilder<'static, Postgres>,
    table: &Table,
    set: &PredicateSet,
) -> Result<(), AppError> {
    for predicate in &set.predicates {
        match predicate {
            Predicate::AnyContains { columns, term } => {
                let pattern = format!("%{}%", escape_like(term));
                qb.push(" AND (");
                for (i, column) in columns.iter().enumerate() {
                    if i > 0 {
                        qb.push(" OR ");
                    }
                    qb.push(table.ident(column)?)
                        .push("::text ILIKE ")
                        .push_bind(pattern.clone());
                }
                qb.push(")");
            }
            Predicate::Equals { column, value } => {
                qb.push(" AND ")
                    .push(table.ident(column)?)
                    .push("::text = ")
                    .push_bind(value.clone());
            }
        }
    }
    Ok(())
}

/// Escapes LIKE metacharacters so the term matches literally.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
