//! Handlers for `/api/v1/shortener-link`.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::link::{CreateLinkRequest, LinkResponse};
use crate::api::dto::response::{ApiResponse, PaginatedResponse};
use crate::error::AppError;
use crate::query::{QueryParameters, RawQueryMap};
use crate::state::{AppState, LINK_SEARCH_COLUMNS};

/// `POST /api/v1/shortener-link`
///
/// ```json
/// { "original_url": "https://example.com/very/long", "short_code": "my-link" }
/// ```
///
/// `short_code` is optional; a random 6-character code is generated otherwise.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<Json<ApiResponse<LinkResponse>>, AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create(&payload.original_url, payload.short_code.as_deref())
        .await?;

    Ok(Json(ApiResponse::new(
        "Shortener link created successfully",
        LinkResponse::from_link(link, &state.base_url),
    )))
}

/// `GET /api/v1/shortener-link/{code}`
///
/// Answers `301 Moved Permanently` with the destination in `Location`.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let destination = state.link_service.resolve(&code).await?;

    let location = HeaderValue::from_str(&destination).map_err(|_| {
        AppError::internal(
            "Stored URL is not a valid header value",
            json!({ "short_code": code }),
        )
    })?;

    Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response())
}

/// `GET /api/v1/shortener-link`
///
/// Accepts `search`, `order_by`, `order_dir`, `page`, `page_size`, and
/// `short_code` / `original_url` as equality filters.
pub async fn list_links_handler(
    State(state): State<AppState>,
    Query(raw): Query<Vec<(String, String)>>,
) -> Result<Json<PaginatedResponse<LinkResponse>>, AppError> {
    let raw: RawQueryMap = raw.into_iter().collect();
    let params = QueryParameters::parse(&raw, LINK_SEARCH_COLUMNS, &state.default_page_size);
    params.validate(&state.link_policy)?;

    let (links, meta) = state.link_service.list(&params).await?;

    Ok(Json(PaginatedResponse::new(
        "All shorten link retrieved successfully",
        meta,
        links
            .into_iter()
            .map(|link| LinkResponse::from_link(link, &state.base_url))
            .collect(),
    )))
}
