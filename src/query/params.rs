//! Permissive parsing of raw query strings into [`QueryParameters`].

use std::collections::BTreeMap;

use crate::query::validator::{ParamValidator, QueryValidationError};

/// Query-string keys with a fixed meaning; never treated as filters.
pub const RESERVED_KEYS: [&str; 5] = ["search", "order_by", "order_dir", "page", "page_size"];

/// Sort column used when `order_by` is absent or empty.
pub const DEFAULT_ORDER_BY: &str = "created_at";

/// Sort direction used when `order_dir` is absent or empty.
pub const DEFAULT_ORDER_DIR: &str = "asc";

/// Page size used when neither the request nor the caller default parses.
const FALLBACK_PAGE_SIZE: i64 = 10;

/// Raw query input: every key with all of its values, in arrival order.
///
/// Built from the `(key, value)` pairs Axum's `Query<Vec<(String, String)>>`
/// extractor yields, so repeated keys keep every value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQueryMap {
    entries: BTreeMap<String, Vec<String>>,
}

impl RawQueryMap {
    /// Returns the first value supplied for `key`, if any.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Iterates over keys with their first value.
    pub fn iter_first(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().filter_map(|(key, values)| {
            values
                .first()
                .map(|value| (key.as_str(), value.as_str()))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawQueryMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut entries: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (key, value) in iter {
            entries.entry(key.into()).or_default().push(value.into());
        }
        Self { entries }
    }
}

/// Request-scoped description of a list query.
///
/// Produced by [`QueryParameters::parse`], checked by
/// [`QueryParameters::validate`], then consumed by the applier. Numeric fields
/// keep whatever the request supplied (including zero or negative values) so
/// that the validator, not the parser, decides what is acceptable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParameters {
    /// Free-text term; `None` means no text filter.
    pub search: Option<String>,
    /// Columns `search` may touch. Set by the use-case, never by request input.
    pub search_columns: Vec<String>,
    /// Equality filters; `None` when the request carried no filter keys.
    pub filters: Option<BTreeMap<String, String>>,
    pub order_by: String,
    /// Raw direction as supplied; normalized where it is compared.
    pub order_dir: String,
    pub page: i64,
    pub page_size: i64,
}

impl QueryParameters {
    /// Creates parameters with the given search columns and default settings.
    pub fn new(search_columns: &[&str]) -> Self {
        Self {
            search: None,
            search_columns: search_columns.iter().map(|c| c.to_string()).collect(),
            filters: None,
            order_by: DEFAULT_ORDER_BY.to_string(),
            order_dir: DEFAULT_ORDER_DIR.to_string(),
            page: 1,
            page_size: FALLBACK_PAGE_SIZE,
        }
    }

    /// Parses raw query input.
    ///
    /// Never fails: malformed or missing numbers fall back to defaults and
    /// every other check is left to [`Self::validate`].
    ///
    /// - `search` is kept verbatim, but only when it is non-blank
    /// - every non-reserved key becomes a filter, first value wins
    /// - `page` defaults to 1, `page_size` to `default_page_size`
    pub fn parse(raw: &RawQueryMap, search_columns: &[&str], default_page_size: &str) -> Self {
        let mut params = Self::new(search_columns);

        params.search = raw
            .first("search")
            .filter(|term| !term.trim().is_empty())
            .map(str::to_string);

        let filters: BTreeMap<String, String> = raw
            .iter_first()
            .filter(|(key, _)| !RESERVED_KEYS.contains(key))
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        params.filters = (!filters.is_empty()).then_some(filters);

        params.order_by = non_empty_or(raw.first("order_by"), DEFAULT_ORDER_BY);
        params.order_dir = non_empty_or(raw.first("order_dir"), DEFAULT_ORDER_DIR);

        params.page = parse_int(raw.first("page")).unwrap_or(1);
        params.page_size = parse_int(raw.first("page_size"))
            .or_else(|| parse_int(Some(default_page_size)))
            .unwrap_or(FALLBACK_PAGE_SIZE);

        params
    }

    /// Validates these parameters against `policy`.
    ///
    /// See [`ParamValidator::validate`] for the check order.
    pub fn validate(&self, policy: &ParamValidator) -> Result<(), QueryValidationError> {
        policy.validate(self)
    }
}

fn non_empty_or(value: Option<&str>, default: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

fn parse_int(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.trim().parse::<i64>().ok())
}
