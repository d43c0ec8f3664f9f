//! Policy-driven validation of parsed [`QueryParameters`].

use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::query::params::QueryParameters;

/// ASCII letters, digits, space, tab, CR, LF and form feed.
static SEARCH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9\t\n\x0C\r ]*$").unwrap());

/// First validation failure found in a list query.
///
/// Messages are returned verbatim to API clients.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryValidationError {
    #[error("Search query is too long")]
    SearchTooLong { max: usize },

    #[error("Search query contains invalid characters")]
    SearchInvalidCharacters,

    #[error("invalid filter key: {0}")]
    UnknownFilterKey(String),

    #[error("filter value for '{key}' exceeds maximum length of {max}")]
    FilterValueTooLong { key: String, max: usize },

    #[error("invalid order by column: {0}")]
    UnknownSortColumn(String),

    #[error("invalid order direction: must be 'ASC' or 'DESC'")]
    InvalidSortDirection,

    #[error("page must be greater than 0")]
    PageOutOfRange,

    #[error("page size must be greater than 0")]
    PageSizeOutOfRange,

    #[error("page size must be less than or equal to {max}")]
    PageSizeTooLarge { max: i64 },
}

impl QueryValidationError {
    /// Stable machine-readable identifier for the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SearchTooLong { .. } => "search_too_long",
            Self::SearchInvalidCharacters => "search_invalid_characters",
            Self::UnknownFilterKey(_) => "unknown_filter_key",
            Self::FilterValueTooLong { .. } => "filter_value_too_long",
            Self::UnknownSortColumn(_) => "unknown_sort_column",
            Self::InvalidSortDirection => "invalid_sort_direction",
            Self::PageOutOfRange => "page_out_of_range",
            Self::PageSizeOutOfRange => "page_size_out_of_range",
            Self::PageSizeTooLarge { .. } => "page_size_too_large",
        }
    }
}

/// Validation policy for one resource's list endpoint.
///
/// Built once at start-up and shared read-only between requests.
#[derive(Debug, Clone)]
pub struct ParamValidator {
    pub allowed_order_by_columns: HashSet<String>,
    pub allowed_filter_keys: HashSet<String>,
    pub max_search_length: usize,
    pub max_filter_value_length: usize,
    pub max_page_size: i64,
}

impl ParamValidator {
    pub fn new(
        allowed_order_by_columns: &[&str],
        allowed_filter_keys: &[&str],
        max_search_length: usize,
        max_filter_value_length: usize,
        max_page_size: i64,
    ) -> Self {
        Self {
            allowed_order_by_columns: allowed_order_by_columns
                .iter()
                .map(|c| c.to_string())
                .collect(),
            allowed_filter_keys: allowed_filter_keys.iter().map(|k| k.to_string()).collect(),
            max_search_length,
            max_filter_value_length,
            max_page_size,
        }
    }

    /// Runs every check in a fixed order and returns the first failure.
    ///
    /// Order: search, filters, sort column, sort direction, page, page size.
    pub fn validate(&self, params: &QueryParameters) -> Result<(), QueryValidationError> {
        validate_search(params.search.as_deref(), self.max_search_length)?;
        validate_filters(
            params.filters.as_ref(),
            &self.allowed_filter_keys,
            self.max_filter_value_length,
        )?;
        validate_order_by(&params.order_by, &self.allowed_order_by_columns)?;
        validate_order_dir(&params.order_dir)?;
        validate_page(params.page, params.page_size, self.max_page_size)
    }
}

/// Checks search length (in bytes) and character set.
pub fn validate_search(search: Option<&str>, max_length: usize) -> Result<(), QueryValidationError> {
    let Some(search) = search else {
        return Ok(());
    };

    if search.len() > max_length {
        return Err(QueryValidationError::SearchTooLong { max: max_length });
    }

    if !SEARCH_PATTERN.is_match(search) {
        return Err(QueryValidationError::SearchInvalidCharacters);
    }

    Ok(())
}

/// Ensures every filter key is allowed and every value fits the byte limit.
///
/// Keys are checked in map order; only the first offending key is reported.
pub fn validate_filters(
    filters: Option<&BTreeMap<String, String>>,
    allowed_keys: &HashSet<String>,
    max_length: usize,
) -> Result<(), QueryValidationError> {
    let Some(filters) = filters else {
        return Ok(());
    };

    for (key, value) in filters {
        if !allowed_keys.contains(key) {
            return Err(QueryValidationError::UnknownFilterKey(key.clone()));
        }
        if value.len() > max_length {
            return Err(QueryValidationError::FilterValueTooLong {
                key: key.clone(),
                max: max_length,
            });
        }
    }

    Ok(())
}

pub fn validate_order_by(
    order_by: &str,
    allowed_columns: &HashSet<String>,
) -> Result<(), QueryValidationError> {
    if !order_by.is_empty() && !allowed_columns.contains(order_by) {
        return Err(QueryValidationError::UnknownSortColumn(order_by.to_string()));
    }
    Ok(())
}

pub fn validate_order_dir(order_dir: &str) -> Result<(), QueryValidationError> {
    match order_dir.to_ascii_uppercase().as_str() {
        "ASC" | "DESC" => Ok(()),
        _ => Err(QueryValidationError::InvalidSortDirection),
    }
}

pub fn validate_page(
    page: i64,
    page_size: i64,
    max_page_size: i64,
) -> Result<(), QueryValidationError> {
    if page < 1 {
        return Err(QueryValidationError::PageOutOfRange);
    }
    if page_size < 1 {
        return Err(QueryValidationError::PageSizeOutOfRange);
    }
    if page_size > max_page_size {
        return Err(QueryValidationError::PageSizeTooLarge { max: max_page_size });
    }
    Ok(())
}
