//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AuthService, LinkService};
use crate::infrastructure::cache::CacheService;
use crate::query::ParamValidator;

/// Cloned per request; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub link_service: Arc<LinkService>,
    pub cache: Arc<dyn CacheService>,
    /// Rules for `GET /api/v1/shortener-link`.
    pub link_policy: Arc<ParamValidator>,
    /// Rules for `GET /api/v1/auth/users`.
    pub user_policy: Arc<ParamValidator>,
    /// Raw default handed to the query parser.
    pub default_page_size: String,
    pub base_url: String,
}

impl AppState {
    pub fn new(
        auth_service: Arc<AuthService>,
        link_service: Arc<LinkService>,
        cache: Arc<dyn CacheService>,
        limits: &ListLimits,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            auth_service,
            link_service,
            cache,
            link_policy: Arc::new(limits.policy(LINK_SORT_COLUMNS, LINK_FILTER_KEYS)),
            user_policy: Arc::new(limits.policy(USER_SORT_COLUMNS, USER_FILTER_KEYS)),
            default_page_size: limits.default_page_size.to_string(),
            base_url: base_url.into(),
        }
    }
}

pub const LINK_SEARCH_COLUMNS: &[&str] = &["original_url", "short_code"];
pub const LINK_SORT_COLUMNS: &[&str] = &["created_at", "original_url", "short_code"];
pub const LINK_FILTER_KEYS: &[&str] = &["short_code", "original_url"];

pub const USER_SEARCH_COLUMNS: &[&str] = &["email"];
pub const USER_SORT_COLUMNS: &[&str] = &["created_at", "email"];
pub const USER_FILTER_KEYS: &[&str] = &["role"];

/// Listing limits shared by every paginated endpoint.
#[derive(Debug, Clone, Copy)]
pub struct ListLimits {
    pub default_page_size: i64,
    pub max_page_size: i64,
    pub max_search_length: usize,
    pub max_filter_value_length: usize,
}

impl Default for ListLimits {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
            max_search_length: 100,
            max_filter_value_length: 255,
        }
    }
}

impl ListLimits {
    pub fn policy(&self, sort_columns: &[&str], filter_keys: &[&str]) -> ParamValidator {
        ParamValidator::new(
            sort_columns,
            filter_keys,
            self.max_search_length,
            self.max_filter_value_length,
            self.max_page_size,
        )
    }
}
