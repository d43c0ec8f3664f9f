#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{Duration, Utc};
use regex::Regex;
use serde_json::json;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use shortlink_service::application::services::{AuthService, LinkService};
use shortlink_service::domain::entities::{Link, NewLink, Role, User};
use shortlink_service::domain::ports::{Credentials, Notifier, NotifyError};
use shortlink_service::domain::repositories::{LinkRepository, UserRepository};
use shortlink_service::error::AppError;
use shortlink_service::infrastructure::cache::NullCache;
use shortlink_service::infrastructure::security::Argon2JwtCredentials;
use shortlink_service::query::{PredicateSet, eval};
use shortlink_service::routes::api_router;
use shortlink_service::state::{AppState, ListLimits};
use shortlink_service::utils::otp::OtpHasher;

pub const JWT_SECRET: &str = "integration-test-secret";
pub const BASE_URL: &str = "https://s.example.com";
pub const PASSWORD: &str = "password123";

/// Link store evaluating predicate-sets in memory.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    links: Mutex<Vec<Link>>,
}

impl InMemoryLinkRepository {
    pub fn insert(&self, link: Link) {
        self.links.lock().unwrap().push(link);
    }

    pub fn len(&self) -> usize {
        self.links.lock().unwrap().len()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut links = self.links.lock().unwrap();
        if links
            .iter()
            .any(|l| !l.is_deleted() && l.short_code == new_link.short_code)
        {
            return Err(AppError::conflict("Resource already exists", json!({})));
        }
        let link = Link::from(new_link);
        links.push(link.clone());
        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|l| !l.is_deleted() && l.short_code == code)
            .cloned())
    }

    async fn count_matching(&self, spec: &PredicateSet) -> Result<i64, AppError> {
        let links = self.links.lock().unwrap();
        Ok(eval::count(links.iter().filter(|l| !l.is_deleted()), spec))
    }

    async fn list_matching(&self, spec: &PredicateSet) -> Result<Vec<Link>, AppError> {
        let links = self.links.lock().unwrap();
        Ok(eval::select(links.iter().filter(|l| !l.is_deleted()), spec))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Account store evaluating predicate-sets in memory.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn insert(&self, user: User) {
        self.users.lock().unwrap().push(user);
    }

    pub fn get(&self, email: &str) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, user: User) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        if users
            .iter()
            .any(|u| u.deleted_at.is_none() && u.email == user.email)
        {
            return Err(AppError::conflict("Resource already exists", json!({})));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.deleted_at.is_none() && u.email == email)
            .cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.deleted_at.is_none() && u.id == id)
            .cloned())
    }

    async fn update_user(&self, user: &User) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        let slot = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| AppError::not_found("User not found", json!({})))?;
        *slot = user.clone();
        Ok(user.clone())
    }

    async fn count_users(&self, spec: &PredicateSet) -> Result<i64, AppError> {
        let users = self.users.lock().unwrap();
        Ok(eval::count(users.iter().filter(|u| u.deleted_at.is_none()), spec))
    }

    async fn list_users(&self, spec: &PredicateSet) -> Result<Vec<User>, AppError> {
        let users = self.users.lock().unwrap();
        Ok(eval::select(users.iter().filter(|u| u.deleted_at.is_none()), spec))
    }
}

/// Keeps every message instead of sending it.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String, String)>>,
}

impl RecordingNotifier {
    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Code from the most recent email to `recipient`.
    pub fn last_code_for(&self, recipient: &str) -> Option<String> {
        let pattern = Regex::new(r#"class="code">(\d{6})<"#).unwrap();
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _, _)| to == recipient)
            .and_then(|(_, _, body)| pattern.captures(body))
            .map(|caps| caps[1].to_string())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_message(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .unwrap()
            .push((recipient.into(), subject.into(), body.into()));
        Ok(())
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub links: Arc<InMemoryLinkRepository>,
    pub users: Arc<InMemoryUserRepository>,
    pub notifier: Arc<RecordingNotifier>,
    pub credentials: Arc<Argon2JwtCredentials>,
}

impl TestApp {
    /// Stores a verified account with [`PASSWORD`] and returns a token for it.
    pub fn seed_account(&self, email: &str, role: Role) -> String {
        let hash = self.credentials.hash_password(PASSWORD).unwrap();
        let mut user = User::new(email.into(), hash, "unused".into(), Utc::now());
        user.role = role;
        user.mark_verified(Utc::now());
        let token = self.credentials.issue_token(&user).unwrap();
        self.users.insert(user);
        token
    }

    /// Stores a link created `minutes_ago` minutes in the past.
    pub fn seed_link(&self, code: &str, url: &str, minutes_ago: i64) {
        let mut link = Link::new(url.into(), code.into());
        link.created_at = Utc::now() - Duration::minutes(minutes_ago);
        link.updated_at = link.created_at;
        self.links.insert(link);
    }
}

/// Full router over in-memory storage, without rate limiting.
pub fn test_app() -> TestApp {
    let links = Arc::new(InMemoryLinkRepository::default());
    let users = Arc::new(InMemoryUserRepository::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let credentials = Arc::new(Argon2JwtCredentials::new(JWT_SECRET, 24));
    let cache = Arc::new(NullCache::new());

    let auth_service = Arc::new(AuthService::new(
        users.clone(),
        credentials.clone(),
        notifier.clone(),
        OtpHasher::new(JWT_SECRET),
        15,
    ));
    let link_service = Arc::new(LinkService::new(links.clone(), cache.clone(), 3600));

    let state = AppState::new(
        auth_service,
        link_service,
        cache,
        &ListLimits::default(),
        BASE_URL,
    );

    let server = TestServer::new(api_router(state, false)).unwrap();

    TestApp {
        server,
        links,
        users,
        notifier,
        credentials,
    }
}
