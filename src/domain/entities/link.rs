//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use crate::query::Filterable;

/// Columns of `shortener_links` that list queries may reference.
pub const LINK_COLUMNS: &[&str] = &["id", "original_url", "short_code", "created_at", "updated_at"];

/// A shortened URL.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: Uuid,
    pub original_url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Link {
    /// Builds a fresh, not yet persisted link.
    pub fn new(original_url: String, short_code: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            original_url,
            short_code,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Returns true if the link has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

impl Filterable for Link {
    fn field(&self, column: &str) -> Option<String> {
        match column {
            "id" => Some(self.id.to_string()),
            "original_url" => Some(self.original_url.clone()),
            "short_code" => Some(self.short_code.clone()),
            "created_at" => Some(self.created_at.to_rfc3339_opts(SecondsFormat::Micros, true)),
            "updated_at" => Some(self.updated_at.to_rfc3339_opts(SecondsFormat::Micros, true)),
            _ => None,
        }
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub original_url: String,
    pub short_code: String,
}

impl From<NewLink> for Link {
    fn from(new_link: NewLink) -> Self {
        Link::new(new_link.original_url, new_link.short_code)
    }
}
