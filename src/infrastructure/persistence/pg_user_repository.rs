//! PostgreSQL implementation of user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Role, USER_COLUMNS, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::infrastructure::persistence::sql::{self, Table};
use crate::query::PredicateSet;

const USERS: Table = Table {
    name: "users",
    projection: "id, email, password_hash, role, otp_hash, otp_expires_at, verified_at, \
                 created_at, updated_at, deleted_at",
    columns: USER_COLUMNS,
};

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    role: String,
    otp_hash: Option<String>,
    otp_expires_at: Option<DateTime<Utc>>,
    verified_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        let role: Role = r.role.parse().map_err(|e: String| {
            tracing::error!(user_id = %r.id, error = %e, "Stored role is invalid");
            AppError::internal("Corrupt user record", json!({}))
        })?;

        Ok(User {
            id: r.id,
            email: r.email,
            password_hash: r.password_hash,
            role,
            otp_hash: r.otp_hash,
            otp_expires_at: r.otp_expires_at,
            verified_at: r.verified_at,
            created_at: r.created_at,
            updated_at: r.updated_at,
            deleted_at: r.deleted_at,
        })
    }
}

pub struct PgUserRepository {
    pool: Arc<PgPool>,
}

impl PgUserRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create_user(&self, user: User) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users
                (id, email, password_hash, role, otp_hash, otp_expires_at, verified_at,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, email, password_hash, role, otp_hash, otp_expires_at, verified_at,
                      created_at, updated_at, deleted_at
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.otp_hash)
        .bind(user.otp_expires_at)
        .bind(user.verified_at)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        row.try_into()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, role, otp_hash, otp_expires_at, verified_at,
                   created_at, updated_at, deleted_at
            FROM users
            WHERE email = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, role, otp_hash, otp_expires_at, verified_at,
                   created_at, updated_at, deleted_at
            FROM users
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn update_user(&self, user: &User) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET role = $2, password_hash = $3, otp_hash = $4, otp_expires_at = $5,
                verified_at = $6, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, email, password_hash, role, otp_hash, otp_expires_at, verified_at,
                      created_at, updated_at, deleted_at
            "#,
        )
        .bind(user.id)
        .bind(user.role.as_str())
        .bind(&user.password_hash)
        .bind(&user.otp_hash)
        .bind(user.otp_expires_at)
        .bind(user.verified_at)
        .fetch_optional(self.pool.as_ref())
        .await?;

        match row {
            Some(row) => row.try_into(),
            None => Err(AppError::not_found(
                "User not found",
                json!({ "id": user.id }),
            )),
        }
    }

    async fn count_users(&self, spec: &PredicateSet) -> Result<i64, AppError> {
        let mut qb = sql::count_query(&USERS, spec)?;
        Ok(qb
            .build_query_scalar::<i64>()
            .fetch_one(self.pool.as_ref())
            .await?)
    }

    async fn list_users(&self, spec: &PredicateSet) -> Result<Vec<User>, AppError> {
        let mut qb = sql::select_query(&USERS, spec)?;
        qb.build_query_as::<UserRow>()
            .fetch_all(self.pool.as_ref())
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }
}
