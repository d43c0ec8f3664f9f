//! DTOs for the short link endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::application::services::short_url;
use crate::domain::entities::Link;

/// Body of `POST /api/v1/shortener-link`.
///
/// URL and code rules are enforced by the link service; this only rejects
/// obviously empty input.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(length(min = 1, max = 2048, message = "original_url is required"))]
    pub original_url: String,

    #[serde(default)]
    pub short_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: Uuid,
    pub original_url: String,
    pub short_code: String,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn from_link(link: Link, base_url: &str) -> Self {
        Self {
            short_url: short_url(base_url, &link.short_code),
            id: link.id,
            original_url: link.original_url,
            short_code: link.short_code,
            created_at: link.created_at,
        }
    }
}
