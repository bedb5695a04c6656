#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::RwLock;

use async_trait::async_trait;
use auth::Clock;
use auth::ManualClock;
use auth::Role;
use auth::SessionManager;
use auth::SessionPolicy;
use auth::SigningKey;
use auth::TokenCodec;
use auth::UserDirectory;
use chrono::Duration;
use recipe_service::domain::preferences::errors::PreferencesError;
use recipe_service::domain::preferences::models::UserPreferences;
use recipe_service::domain::preferences::ports::PreferencesRepository;
use recipe_service::domain::preferences::service::PreferencesService;
use recipe_service::domain::user::directory::RepositoryUserDirectory;
use recipe_service::domain::user::errors::UserError;
use recipe_service::domain::user::models::EmailAddress;
use recipe_service::domain::user::models::Password;
use recipe_service::domain::user::models::User;
use recipe_service::domain::user::models::UserId;
use recipe_service::domain::user::ports::UserRepository;
use recipe_service::domain::user::ports::UserServicePort;
use recipe_service::domain::user::service::UserService;
use recipe_service::inbound::http::router::create_router;
use reqwest::header::COOKIE;
use reqwest::header::SET_COOKIE;
use serde_json::json;

pub const SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const ADMIN_EMAIL: &str = "admin@admin.pl";
pub const ADMIN_PASSWORD: &str = "admin-password";
pub const ACCESS_MINUTES: i64 = 30;
pub const REFRESH_MINUTES: i64 = 7 * 24 * 60;

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub clock: Arc<ManualClock>,
    pub codec: TokenCodec,
    pub users: Arc<InMemoryUserRepository>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let users = Arc::new(InMemoryUserRepository::default());
        let preferences = Arc::new(InMemoryPreferencesRepository::default());
        let clock = Arc::new(ManualClock::starting_now());

        let user_service = Arc::new(UserService::new(Arc::clone(&users)));
        user_service
            .ensure_admin(
                EmailAddress::new(ADMIN_EMAIL.to_string()).unwrap(),
                Password::new(ADMIN_PASSWORD.to_string()).unwrap(),
            )
            .await
            .expect("Failed to seed admin account");

        let directory: Arc<dyn UserDirectory> =
            Arc::new(RepositoryUserDirectory::new(Arc::clone(&users)));
        let sessions = Arc::new(SessionManager::new(
            SigningKey::from_secret(SECRET).unwrap(),
            directory,
            Arc::clone(&clock) as Arc<dyn Clock>,
            SessionPolicy {
                access_ttl: Duration::minutes(ACCESS_MINUTES),
                refresh_ttl: Duration::minutes(REFRESH_MINUTES),
                secure_cookies: false,
            },
        ));

        let router = create_router(
            user_service,
            Arc::new(PreferencesService::new(preferences)),
            sessions,
        );

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            clock,
            codec: TokenCodec::new(SigningKey::from_secret(SECRET).unwrap()),
            users,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make PUT request
    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.put(format!("{}{}", self.address, path))
    }

    /// Helper to make PATCH request
    pub fn patch(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.patch(format!("{}{}", self.address, path))
    }

    /// Helper to make DELETE request
    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(format!("{}{}", self.address, path))
    }

    pub async fn register(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/register")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register an account and return its session cookies.
    pub async fn signed_up(&self, email: &str, password: &str) -> Session {
        let response = self.register(email, password).await;
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        Session::from_response(&response)
    }

    /// Log the seeded administrator in.
    pub async fn admin_session(&self) -> Session {
        let response = self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        Session::from_response(&response)
    }

    pub async fn user_id(&self, email: &str) -> UserId {
        let email = EmailAddress::new(email.to_string()).unwrap();
        self.users
            .find_by_email(&email)
            .await
            .unwrap()
            .expect("Account not found")
            .id
    }
}

/// One `Set-Cookie` header as the client saw it.
#[derive(Debug, Clone)]
pub struct SetCookie {
    pub value: String,
    pub attributes: Vec<String>,
}

impl SetCookie {
    pub fn max_age(&self) -> Option<i64> {
        self.attributes
            .iter()
            .find_map(|a| a.strip_prefix("Max-Age="))
            .and_then(|v| v.parse().ok())
    }

    pub fn has(&self, attribute: &str) -> bool {
        self.attributes.iter().any(|a| a == attribute)
    }
}

/// Session cookies handed out by a response.
#[derive(Debug, Clone)]
pub struct Session {
    pub cookies: HashMap<String, SetCookie>,
}

impl Session {
    pub fn from_response(response: &reqwest::Response) -> Self {
        let cookies = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|header| {
                let mut parts = header.split(';').map(str::trim);
                let (name, value) = parts.next()?.split_once('=')?;
                Some((
                    name.to_string(),
                    SetCookie {
                        value: value.to_string(),
                        attributes: parts.map(str::to_string).collect(),
                    },
                ))
            })
            .collect();
        Self { cookies }
    }

    pub fn access(&self) -> &SetCookie {
        self.cookies.get("access_token").expect("No access_token cookie")
    }

    pub fn refresh(&self) -> &SetCookie {
        self.cookies.get("refresh_token").expect("No refresh_token cookie")
    }

    /// `Cookie` header a browser would send back.
    pub fn cookie_header(&self) -> String {
        format!(
            "access_token={}; refresh_token={}",
            self.access().value,
            self.refresh().value
        )
    }
}

/// Attach a raw `Cookie` header.
pub fn with_cookie(request: reqwest::RequestBuilder, cookie: &str) -> reqwest::RequestBuilder {
    request.header(COOKIE, cookie)
}

/// In-memory user store enforcing unique emails.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().unwrap();
        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.read().unwrap().get(id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .read()
            .unwrap()
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let mut users: Vec<User> = self.users.read().unwrap().values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn update_role(&self, id: &UserId, role: Role) -> Result<User, UserError> {
        let mut users = self.users.write().unwrap();
        let user = users
            .get_mut(id)
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;
        user.role = role;
        Ok(user.clone())
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        self.users
            .write()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }
}

/// In-memory preferences store.
#[derive(Default)]
pub struct InMemoryPreferencesRepository {
    preferences: RwLock<HashMap<UserId, UserPreferences>>,
}

#[async_trait]
impl PreferencesRepository for InMemoryPreferencesRepository {
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<UserPreferences>, PreferencesError> {
        Ok(self.preferences.read().unwrap().get(user_id).cloned())
    }

    async fn upsert(&self, preferences: UserPreferences) -> Result<UserPreferences, PreferencesError> {
        self.preferences
            .write()
            .unwrap()
            .insert(preferences.user_id, preferences.clone());
        Ok(preferences)
    }
}
