//! Success envelopes shared by every JSON endpoint.
//!
//! Errors use the envelope rendered by [`crate::error::AppError`].

use serde::Serialize;

use crate::query::PaginationMeta;

/// `{"status": true, "message": ..., "data": ...}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: bool,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            status: true,
            message: message.into(),
            data,
        }
    }
}

/// Listing envelope with pagination metadata.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub status: bool,
    pub message: String,
    pub meta: PaginationMeta,
    pub data: Vec<T>,
}

impl<T: Serialize> PaginatedResponse<T> {
    pub fn new(message: impl Into<String>, meta: PaginationMeta, data: Vec<T>) -> Self {
        Self {
            status: true,
            message: message.into(),
            meta,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_response_shape() {
        let value = serde_json::to_value(ApiResponse::new("ok", json!({ "a": 1 }))).unwrap();
        assert_eq!(value, json!({ "status": true, "message": "ok", "data": { "a": 1 } }));
    }

    #[test]
    fn test_paginated_response_shape() {
        let meta = PaginationMeta {
            page: 1,
            page_size: 10,
            total_rows: 0,
            total_pages: 0,
        };
        let value =
            serde_json::to_value(PaginatedResponse::<u8>::new("ok", meta, vec![])).unwrap();

        assert_eq!(value["status"], true);
        assert_eq!(value["meta"]["total_pages"], 0);
        assert_eq!(value["data"], json!([]));
    }
}
