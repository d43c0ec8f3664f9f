//! List-query pipeline shared by every paginated resource.
//!
//! Untrusted query strings flow through four stages:
//!
//! 1. [`params`] - permissive parse into [`QueryParameters`] (never fails)
//! 2. [`validator`] - strict validation against a [`ParamValidator`] policy
//! 3. [`applier`] - translation into a backend-agnostic [`PredicateSet`]
//! 4. [`meta`] - [`PaginationMeta`] derived from the total row count
//!
//! Storage backends consume the predicate-set: the PostgreSQL repositories
//! render it with `sqlx::QueryBuilder`, and [`eval`] evaluates it against
//! in-memory rows.
//!
//! # Example
//!
//! ```
//! use shortlink_service::query::{
//!     apply_count_query, apply_query, ParamValidator, QueryParameters, RawQueryMap,
//! };
//!
//! let raw: RawQueryMap = [("search", "rust"), ("order_dir", "DeSc"), ("page", "2")]
//!     .into_iter()
//!     .collect();
//! let params = QueryParameters::parse(&raw, &["original_url"], "10");
//!
//! let policy = ParamValidator::new(&["created_at"], &[], 100, 255, 100);
//! params.validate(&policy).unwrap();
//!
//! let page = apply_query(&params);
//! let count = apply_count_query(&params);
//! assert_eq!(page.window.unwrap().offset, Some(10));
//! assert!(count.ordering.is_none());
//! ```

pub mod applier;
pub mod eval;
pub mod meta;
pub mod params;
pub mod validator;

pub use applier::{
    Ordering, Predicate, PredicateSet, SortDirection, Window, apply_count_query, apply_query,
};
pub use eval::Filterable;
pub use meta::{PaginationMeta, compute_meta};
pub use params::{QueryParameters, RESERVED_KEYS, RawQueryMap};
pub use validator::{ParamValidator, QueryValidationError};
