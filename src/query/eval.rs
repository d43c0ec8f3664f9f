//! In-memory evaluation of a [`PredicateSet`].
//!
//! Mirrors what the PostgreSQL renderer produces so that rows held in memory
//! can be filtered, sorted and windowed with the same semantics.

use std::cmp::Ordering as CmpOrdering;

use crate::query::applier::{Predicate, PredicateSet, SortDirection};

/// Row type whose columns can be read by name.
///
/// Values must compare correctly as strings for ordering to match the
/// database (timestamps as fixed-width RFC 3339 in UTC, for example).
pub trait Filterable {
    fn field(&self, column: &str) -> Option<String>;
}

/// Returns true when `row` satisfies every predicate in `set`.
pub fn matches<T: Filterable>(set: &PredicateSet, row: &T) -> bool {
    set.predicates.iter().all(|predicate| match predicate {
        Predicate::AnyContains { columns, term } => {
            let needle = term.to_lowercase();
            columns.iter().any(|column| {
                row.field(column)
                    .is_some_and(|value| value.to_lowercase().contains(&needle))
            })
        }
        Predicate::Equals { column, value } => {
            row.field(column).is_some_and(|field| &field == value)
        }
    })
}

/// Number of rows matching the predicates; ordering and window are ignored.
pub fn count<'a, T, I>(rows: I, set: &PredicateSet) -> i64
where
    T: Filterable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    rows.into_iter().filter(|row| matches(set, *row)).count() as i64
}

/// Filters, sorts and windows `rows` according to `set`.
pub fn select<'a, T, I>(rows: I, set: &PredicateSet) -> Vec<T>
where
    T: Filterable + Clone + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut selected: Vec<T> = rows
        .into_iter()
        .filter(|row| matches(set, *row))
        .cloned()
        .collect();

    if let Some(ordering) = &set.ordering {
        selected.sort_by(|a, b| {
            let cmp = compare(a.field(&ordering.column), b.field(&ordering.column));
            match ordering.direction {
                SortDirection::Asc => cmp,
                SortDirection::Desc => cmp.reverse(),
            }
        });
    }

    if let Some(window) = set.window {
        let offset = window.offset.unwrap_or(0).max(0);
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(window.limit).unwrap_or(usize::MAX);
        selected = selected.into_iter().skip(offset).take(limit).collect();
    }

    selected
}

// Missing values sort last in ascending order, like NULLs in PostgreSQL.
fn compare(a: Option<String>, b: Option<String>) -> CmpOrdering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => CmpOrdering::Less,
        (None, Some(_)) => CmpOrdering::Greater,
        (None, None) => CmpOrdering::Equal,
    }
}
