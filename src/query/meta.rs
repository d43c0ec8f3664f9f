use serde::Serialize;

use crate::query::params::QueryParameters;

/// Pagination summary returned beside every listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    pub page: i64,
    pub page_size: i64,
    pub total_rows: i64,
    pub total_pages: i64,
}

/// Derives pagination metadata from the parameters and the matching row count.
///
/// `total_pages` is `total_rows / page_size` rounded up, and 0 whenever
/// `page_size` is not positive.
pub fn compute_meta(params: &QueryParameters, total_rows: i64) -> PaginationMeta {
    let total_pages = if params.page_size > 0 && total_rows > 0 {
        (total_rows + params.page_size - 1) / params.page_size
    } else {
        0
    };

    PaginationMeta {
        page: params.page,
        page_size: params.page_size,
        total_rows,
        total_pages,
    }
}
