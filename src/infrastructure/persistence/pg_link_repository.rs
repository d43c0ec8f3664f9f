//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{LINK_COLUMNS, Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::persistence::sql::{self, Table};
use crate::query::PredicateSet;

const LINKS: Table = Table {
    name: "shortener_links",
    projection: "id, original_url, short_code, created_at, updated_at, deleted_at",
    columns: LINK_COLUMNS,
};

#[derive(FromRow)]
struct LinkRow {
    id: Uuid,
    original_url: String,
    short_code: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link {
            id: r.id,
            original_url: r.original_url,
            short_code: r.short_code,
            created_at: r.created_at,
            updated_at: r.updated_at,
            deleted_at: r.deleted_at,
        }
    }
}

/// PostgreSQL repository for link storage and retrieval.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let link = Link::from(new_link);

        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO shortener_links (id, original_url, short_code, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, original_url, short_code, created_at, updated_at, deleted_at
            "#,
        )
        .bind(link.id)
        .bind(&link.original_url)
        .bind(&link.short_code)
        .bind(link.created_at)
        .bind(link.updated_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, original_url, short_code, created_at, updated_at, deleted_at
            FROM shortener_links
            WHERE short_code = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn count_matching(&self, spec: &PredicateSet) -> Result<i64, AppError> {
        let mut qb = sql::count_query(&LINKS, spec)?;
        let count = qb
            .build_query_scalar::<i64>()
            .fetch_one(self.pool.as_ref())
            .await?;
        Ok(count)
    }

    async fn list_matching(&self, spec: &PredicateSet) -> Result<Vec<Link>, AppError> {
        let mut qb = sql::select_query(&LINKS, spec)?;
        let rows = qb
            .build_query_as::<LinkRow>()
            .fetch_all(self.pool.as_ref())
            .await?;
        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}
