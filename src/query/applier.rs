//! Translation of validated [`QueryParameters`] into a [`PredicateSet`].
//!
//! The predicate-set is backend-agnostic: it names columns and carries values
//! but contains no SQL. Backends render it (see
//! `infrastructure::persistence::sql`) or evaluate it directly
//! (see [`crate::query::eval`]).

use crate::query::params::QueryParameters;

/// A single row condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Case-insensitive substring match of `term` in at least one column.
    AnyContains { columns: Vec<String>, term: String },
    /// Exact equality of `column` with `value`.
    Equals { column: String, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Case-insensitive; anything other than `desc` sorts ascending.
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordering {
    pub column: String,
    pub direction: SortDirection,
}

/// Row window. `offset` is only ever set together with `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub limit: i64,
    pub offset: Option<i64>,
}

/// Conjunction of predicates plus optional ordering and window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredicateSet {
    pub predicates: Vec<Predicate>,
    pub ordering: Option<Ordering>,
    pub window: Option<Window>,
}

impl PredicateSet {
    pub fn is_unconstrained(&self) -> bool {
        self.predicates.is_empty()
    }
}

/// Builds the full page query: predicates, ordering and window.
///
/// Pure; calling it twice with the same parameters yields equal sets.
pub fn apply_query(params: &QueryParameters) -> PredicateSet {
    PredicateSet {
        predicates: predicates(params),
        ordering: ordering(params),
        window: window(params),
    }
}

/// Builds the count query: the same predicates with no ordering or window.
pub fn apply_count_query(params: &QueryParameters) -> PredicateSet {
    PredicateSet {
        predicates: predicates(params),
        ordering: None,
        window: None,
    }
}

fn predicates(params: &QueryParameters) -> Vec<Predicate> {
    let mut out = Vec::new();

    if let Some(term) = params.search.as_deref()
        && !params.search_columns.is_empty()
    {
        out.push(Predicate::AnyContains {
            columns: params.search_columns.clone(),
            term: term.to_string(),
        });
    }

    if let Some(filters) = &params.filters {
        out.extend(filters.iter().map(|(column, value)| Predicate::Equals {
            column: column.clone(),
            value: value.clone(),
        }));
    }

    out
}

fn ordering(params: &QueryParameters) -> Option<Ordering> {
    (!params.order_by.is_empty()).then(|| Ordering {
        column: params.order_by.clone(),
        direction: SortDirection::parse(&params.order_dir),
    })
}

fn window(params: &QueryParameters) -> Option<Window> {
    if params.page_size <= 0 {
        return None;
    }

    let offset = (params.page > 0)
        .then(|| (params.page - 1).saturating_mul(params.page_size));

    Some(Window {
        limit: params.page_size,
        offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn params() -> QueryParameters {
        QueryParameters::new(&["original_url", "short_code"])
    }

    #[test]
    fn test_search_becomes_or_across_columns() {
        let mut p = params();
        p.search = Some("example".into());

        let set = apply_query(&p);

        assert_eq!(
            set.predicates,
            vec![Predicate::AnyContains {
                columns: vec!["original_url".into(), "short_code".into()],
                term: "example".into(),
            }]
        );
    }

    #[test]
    fn test_search_without_columns_is_ignored() {
        let mut p = QueryParameters::new(&[]);
        p.search = Some("x".into());

        assert!(apply_query(&p).is_unconstrained());
    }

    #[test]
    fn test_filters_become_equalities() {
        let mut p = params();
        p.filters = Some(BTreeMap::from([
            ("role".to_string(), "admin".to_string()),
            ("email".to_string(), "a@b.c".to_string()),
        ]));

        let set = apply_query(&p);

        assert_eq!(set.predicates.len(), 2);
        assert!(set.predicates.contains(&Predicate::Equals {
            column: "role".into(),
            value: "admin".into(),
        }));
    }

    #[test]
    fn test_ordering_direction_is_normalized() {
        let mut p = params();
        p.order_by = "original_url".into();
        p.order_dir = "DeSc".into();

        let ordering = apply_query(&p).ordering.unwrap();

        assert_eq!(ordering.column, "original_url");
        assert_eq!(ordering.direction, SortDirection::Desc);
        assert_eq!(ordering.direction.as_sql(), "DESC");
    }

    #[test]
    fn test_empty_order_by_has_no_ordering() {
        let mut p = params();
        p.order_by.clear();

        assert!(apply_query(&p).ordering.is_none());
    }

    #[test]
    fn test_window_for_third_page() {
        let mut p = params();
        p.page = 3;
        p.page_size = 20;

        let window = apply_query(&p).window.unwrap();

        assert_eq!(window.limit, 20);
        assert_eq!(window.offset, Some(40));
    }

    #[test]
    fn test_first_page_offset_is_zero() {
        let window = apply_query(&params()).window.unwrap();
        assert_eq!(window.offset, Some(0));
    }

    #[test]
    fn test_non_positive_page_size_has_no_window() {
        let mut p = params();
        p.page_size = 0;

        assert!(apply_query(&p).window.is_none());
    }

    #[test]
    fn test_non_positive_page_has_limit_only() {
        let mut p = params();
        p.page = 0;

        let window = apply_query(&p).window.unwrap();
        assert_eq!(window.limit, 10);
        assert!(window.offset.is_none());
    }

    #[test]
    fn test_huge_page_saturates() {
        let mut p = params();
        p.page = i64::MAX;
        p.page_size = 100;

        assert_eq!(apply_query(&p).window.unwrap().offset, Some(i64::MAX));
    }

    #[test]
    fn test_count_query_shares_predicates_only() {
        let mut p = params();
        p.search = Some("go".into());
        p.filters = Some(BTreeMap::from([("short_code".to_string(), "abc".to_string())]));

        let page = apply_query(&p);
        let count = apply_count_query(&p);

        assert_eq!(page.predicates, count.predicates);
        assert!(count.ordering.is_none());
        assert!(count.window.is_none());
    }

    #[test]
    fn test_apply_is_idempotent() {
        let mut p = params();
        p.search = Some("x".into());
        p.page = 2;

        assert_eq!(apply_query(&p), apply_query(&p));
        assert_eq!(apply_count_query(&p), apply_count_query(&p));
    }
}
