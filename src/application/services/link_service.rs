//! Link creation, resolution and listing.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::query::{PaginationMeta, QueryParameters, apply_count_query, apply_query, compute_meta};
use crate::telemetry;
use crate::utils::code_generator::{generate_code, validate_custom_code};
use crate::utils::url_check::check_url;

/// Generated-code attempts before giving up.
const MAX_ATTEMPTS: usize = 5;

/// Service for creating and resolving short links.
///
/// Redirect lookups go through the cache first; the cache is only an
/// accelerator and never the source of truth.
pub struct LinkService {
    links: Arc<dyn LinkRepository>,
    cache: Arc<dyn CacheService>,
    cache_ttl_seconds: u64,
}

impl LinkService {
    pub fn new(
        links: Arc<dyn LinkRepository>,
        cache: Arc<dyn CacheService>,
        cache_ttl_seconds: u64,
    ) -> Self {
        Self {
            links,
            cache,
            cache_ttl_seconds,
        }
    }

    /// Creates a short link.
    ///
    /// With `custom_code` the code is validated and must be free. Without it a
    /// random code is generated, retrying on collision.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for a bad URL or custom code
    /// - [`AppError::Conflict`] if the custom code is taken
    /// - [`AppError::Internal`] if every generated code collided
    pub async fn create(
        &self,
        original_url: &str,
        custom_code: Option<&str>,
    ) -> Result<Link, AppError> {
        let original_url = check_url(original_url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        let custom_code = custom_code.map(str::trim).filter(|c| !c.is_empty());
        let link = match custom_code {
            Some(code) => self.create_with_custom_code(original_url, code).await?,
            None => self.create_with_generated_code(original_url).await?,
        };

        telemetry::record_link_created(custom_code.is_some());
        tracing::info!(short_code = %link.short_code, "Short link created");

        Ok(link)
    }

    async fn create_with_custom_code(
        &self,
        original_url: String,
        code: &str,
    ) -> Result<Link, AppError> {
        validate_custom_code(code)?;

        if self.links.find_by_code(code).await?.is_some() {
            return Err(AppError::conflict(
                "Short code already exists",
                json!({ "short_code": code }),
            ));
        }

        self.links
            .create(NewLink {
                original_url,
                short_code: code.to_string(),
            })
            .await
    }

    async fn create_with_generated_code(&self, original_url: String) -> Result<Link, AppError> {
        for attempt in 1..=MAX_ATTEMPTS {
            let code = generate_code()?;

            if self.links.find_by_code(&code).await?.is_some() {
                tracing::debug!(attempt, "Generated short code collided");
                continue;
            }

            let new_link = NewLink {
                original_url: original_url.clone(),
                short_code: code,
            };

            match self.links.create(new_link).await {
                Err(AppError::Conflict { .. }) => {
                    tracing::debug!(attempt, "Generated short code taken concurrently");
                }
                result => return result,
            }
        }

        tracing::error!(attempts = MAX_ATTEMPTS, "Could not generate a free short code");
        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions" }),
        ))
    }

    /// Resolves a short code to its destination URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no live link has this code.
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        if let Ok(Some(url)) = self.cache.get_destination(code).await {
            telemetry::record_redirect(true);
            return Ok(url);
        }

        let link = self.links.find_by_code(code).await?.ok_or_else(|| {
            AppError::not_found("Short link not found", json!({ "short_code": code }))
        })?;

        if let Err(e) = self
            .cache
            .set_destination(code, &link.original_url, Some(self.cache_ttl_seconds))
            .await
        {
            tracing::warn!(short_code = code, error = %e, "Failed to cache destination");
        }

        telemetry::record_redirect(false);
        Ok(link.original_url)
    }

    /// Lists links for validated query parameters.
    pub async fn list(
        &self,
        params: &QueryParameters,
    ) -> Result<(Vec<Link>, PaginationMeta), AppError> {
        let page_spec = apply_query(params);
        let count_spec = apply_count_query(params);

        let (links, total) = tokio::try_join!(
            self.links.list_matching(&page_spec),
            self.links.count_matching(&count_spec),
        )?;

        Ok((links, compute_meta(params, total)))
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.links.ping().await
    }
}

/// Builds the public short URL for a code.
pub fn short_url(base_url: &str, code: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), code)
}
