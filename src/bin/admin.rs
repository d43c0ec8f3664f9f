//! CLI administration tool for shortlink-service.
//!
//! Provides account management and database operations without going through
//! the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Check database connection
//! cargo run --bin admin -- db check
//!
//! # Apply migrations
//! cargo run --bin admin -- db migrate
//!
//! # List accounts
//! cargo run --bin admin -- user list --search alice --role admin
//!
//! # Grant admin role
//! cargo run --bin admin -- user promote alice@example.com
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `JWT_SECRET` (required for `user` commands): same secret the server uses
//! - `MAX_PAGE_SIZE`, `MAX_SEARCH_LENGTH`, ...: same list limits as the server

use shortlink_service::application::services::AuthService;
use shortlink_service::config::{self, Config};
use shortlink_service::infrastructure::mail::LogNotifier;
use shortlink_service::infrastructure::persistence::{PgUserRepository, run_migrations};
use shortlink_service::infrastructure::security::Argon2JwtCredentials;
use shortlink_service::query::{QueryParameters, RawQueryMap};
use shortlink_service::state::{ListLimits, USER_FILTER_KEYS, USER_SEARCH_COLUMNS, USER_SORT_COLUMNS};
use shortlink_service::utils::otp::OtpHasher;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing shortlink-service.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// List accounts
    List {
        /// Substring of the email
        #[arg(short, long)]
        search: Option<String>,

        /// Only accounts with this role (`user` or `admin`)
        #[arg(short, long)]
        role: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: i64,

        #[arg(long, default_value_t = 20)]
        page_size: i64,
    },

    /// Grant the admin role
    Promote { email: String },

    /// Mark an account verified without an OTP
    Verify { email: String },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,

    /// Apply pending migrations
    Migrate,

    /// Drop every table and re-apply migrations
    Fresh {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn auth_service(pool: &PgPool, config: &Config) -> AuthService {
    AuthService::new(
        Arc::new(PgUserRepository::new(Arc::new(pool.clone()))),
        Arc::new(Argon2JwtCredentials::new(
            &config.jwt_secret,
            config.jwt_expiry_hours,
        )),
        Arc::new(LogNotifier),
        OtpHasher::new(&config.jwt_secret),
        config.otp_ttl_minutes,
    )
}

async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let config = config::load_from_env()?;
    let service = auth_service(pool, &config);

    match action {
        UserAction::List {
            search,
            role,
            page,
            page_size,
        } => {
            let params = user_list_query(search, role, page, page_size, &config.list_limits)?;
            list_users(&service, &params).await?
        }
        UserAction::Promote { email } => {
            let user = service
                .promote(&email)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to promote user: {}", e))?;

            println!(
                "{} {} is now {}",
                "✅".green(),
                user.email.cyan(),
                user.role.to_string().bright_yellow().bold()
            );
        }
        UserAction::Verify { email } => {
            let user = service
                .force_verify(&email)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to verify user: {}", e))?;

            println!("{} {} is verified", "✅".green(), user.email.cyan());
        }
    }

    Ok(())
}

/// Builds the listing query, validated against the configured limits.
///
/// Newest accounts first.
fn user_list_query(
    search: Option<String>,
    role: Option<String>,
    page: i64,
    page_size: i64,
    limits: &ListLimits,
) -> Result<QueryParameters> {
    let mut pairs = vec![
        ("page".to_string(), page.to_string()),
        ("page_size".to_string(), page_size.to_string()),
        ("order_dir".to_string(), "desc".to_string()),
    ];
    if let Some(search) = search {
        pairs.push(("search".to_string(), search));
    }
    if let Some(role) = role {
        pairs.push(("role".to_string(), role));
    }

    let raw: RawQueryMap = pairs.into_iter().collect();
    let params = QueryParameters::parse(
        &raw,
        USER_SEARCH_COLUMNS,
        &limits.default_page_size.to_string(),
    );
    params.validate(&limits.policy(USER_SORT_COLUMNS, USER_FILTER_KEYS))?;

    Ok(params)
}

/// Lists accounts through the same query pipeline as `GET /api/v1/auth/users`.
///
/// # Output Format
///
/// ```text
/// 👥 Users
///
///   Email                          Role     Verified   Created
///   ───────────────────────────────────────────────────────────────────
///   alice@example.com              admin    yes        2024-06-01 10:30
/// ```
async fn list_users(service: &AuthService, params: &QueryParameters) -> Result<()> {
    println!("{}", "👥 Users".bright_blue().bold());
    println!();

    let (users, meta) = service
        .list_users(params)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        return Ok(());
    }

    println!(
        "  {:<30} {:<8} {:<10} {:<16}",
        "Email".bright_white().bold(),
        "Role".bright_white().bold(),
        "Verified".bright_white().bold(),
        "Created".bright_white().bold()
    );
    println!("  {}", "─".repeat(67).bright_black());

    for user in &users {
        let verified = if user.is_verified() {
            "yes".green()
        } else {
            "no".red()
        };

        println!(
            "  {:<30} {:<8} {:<10} {}",
            user.email.cyan(),
            user.role.to_string(),
            verified,
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!(
        "  Page {}/{} · {} total",
        meta.page,
        meta.total_pages,
        meta.total_rows.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic and maintenance commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            let users: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE deleted_at IS NULL")
                    .fetch_one(pool)
                    .await?;
            let links: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM shortener_links WHERE deleted_at IS NULL",
            )
            .fetch_one(pool)
            .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Users:      {}", users.to_string().bright_green().bold());
            println!("  Links:      {}", links.to_string().bright_green().bold());
            println!();
        }
        DbAction::Migrate => {
            println!("{}", "📦 Applying migrations...".bright_blue());

            run_migrations(pool).await?;

            println!("{}", "✅ Migrations applied".green().bold());
        }
        DbAction::Fresh { yes } => {
            println!(
                "{}",
                "⚠️  This drops every table in the public schema.".red().bold()
            );

            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt("Drop all data and re-run migrations?")
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            sqlx::query("DROP SCHEMA public CASCADE")
                .execute(pool)
                .await?;
            sqlx::query("CREATE SCHEMA public").execute(pool).await?;
            run_migrations(pool).await?;

            println!("{}", "✅ Database recreated".green().bold());
        }
    }

    Ok(())
}
