#![allow(dead_code)]
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request},
    response::Response,
    Router,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use exchange_backend::{
    config::Config,
    models::{
        exchange::ExchangeQuote,
        session::Session,
        transaction::Transaction,
        user::{NewUser, User, UserChanges},
    },
    repositories::{SessionRepository, StoreError, TransactionRepository, UserRepository},
    routes::build_router,
    services::{ExchangeRateProvider, UpstreamError},
    state::{AppDependencies, AppState},
    types::{SessionId, UserId},
    utils::{cookies::SameSite, Argon2Hasher, Clock, OsRngTokenGenerator},
};
use serde_json::Value;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
};
use tower::ServiceExt;

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".into(),
        bind_addr: "127.0.0.1:0".parse().expect("bind addr"),
        session_ttl: chrono::Duration::minutes(60),
        cookie_secure: false,
        cookie_same_site: SameSite::Lax,
        exchange_api_url: "http://127.0.0.1:9/convert".into(),
        exchange_api_key: "test-key".into(),
        exchange_timeout_seconds: 1,
        supported_currencies: vec!["BRL".into(), "USD".into(), "EUR".into(), "JPY".into()],
        password_hash_memory_kib: 1024,
        password_hash_iterations: 1,
        health_check_path: "ping".into(),
        cors_allow_origins: vec!["http://localhost:5173".into()],
        production_mode: false,
    }
}

#[derive(Default)]
struct Tables {
    next_user_id: i64,
    users: Vec<User>,
    sessions: HashMap<String, Session>,
    transactions: Vec<Transaction>,
}

/// Users, sessions and transactions kept in memory with the same constraint
/// behavior as the Postgres schema (unique usernames, session cascade,
/// ledger restrict).
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    fail_session_lookups: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn fail_session_lookups(&self, fail: bool) {
        self.fail_session_lookups.store(fail, Ordering::SeqCst);
    }

    pub fn session(&self, id: &str) -> Option<Session> {
        self.tables.lock().unwrap().sessions.get(id).cloned()
    }

    pub fn session_count(&self) -> usize {
        self.tables.lock().unwrap().sessions.len()
    }

    pub fn user_by_name(&self, username: &str) -> Option<User> {
        self.tables
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned()
    }

    pub fn transaction_count(&self) -> usize {
        self.tables.lock().unwrap().transactions.len()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::UniqueViolation("users_username_key".into()));
        }
        tables.next_user_id += 1;
        let created = User {
            id: UserId::new(tables.next_user_id),
            username: user.username,
            password_hash: user.password_hash,
            is_active: user.is_active,
            created_at: user.created_at,
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.user_by_name(username))
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> Result<Option<User>, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(user) = tables.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(hash) = changes.password_hash {
            user.password_hash = hash;
        }
        if let Some(active) = changes.is_active {
            user.is_active = active;
        }
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: UserId) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.transactions.iter().any(|t| t.user_id == id) {
            return Err(StoreError::ForeignKeyViolation(
                "currency_conversion_transactions_user_id_fkey".into(),
            ));
        }
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        if tables.users.len() == before {
            return Ok(false);
        }
        tables.sessions.retain(|_, s| s.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl SessionRepository for MemoryStore {
    async fn insert(&self, session: &Session) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().unwrap();
        tables
            .sessions
            .insert(session.session_id.as_str().to_string(), session.clone());
        Ok(())
    }

    async fn find(&self, session_id: &SessionId) -> Result<Option<Session>, StoreError> {
        if self.fail_session_lookups.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        let tables = self.tables.lock().unwrap();
        Ok(tables.sessions.get(session_id.as_str()).cloned())
    }

    async fn expire(&self, session_id: &SessionId, now: DateTime<Utc>) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        match tables.sessions.get_mut(session_id.as_str()) {
            Some(session) if session.is_active_at(now) => {
                session.expires_at = Some(now);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl TransactionRepository for MemoryStore {
    async fn insert(&self, transaction: &Transaction) -> Result<Transaction, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.users.iter().any(|u| u.id == transaction.user_id) {
            return Err(StoreError::ForeignKeyViolation("users".into()));
        }
        tables.transactions.push(transaction.clone());
        Ok(transaction.clone())
    }

    async fn page_for_user(
        &self,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Transaction>, i64), StoreError> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<Transaction> = tables
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| b.transaction_id.as_str().cmp(a.transaction_id.as_str()))
        });
        let total = rows.len() as i64;
        let items = rows
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Ok((items, total))
    }
}

/// Clock that only moves when a test advances it.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Exchange-rate provider answering with a fixed rate, or failing when unset.
pub struct ScriptedExchange {
    rate: Mutex<Option<f64>>,
    calls: AtomicUsize,
}

impl ScriptedExchange {
    pub fn with_rate(rate: f64) -> Self {
        Self {
            rate: Mutex::new(Some(rate)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_rate(&self, rate: Option<f64>) {
        *self.rate.lock().unwrap() = rate;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExchangeRateProvider for ScriptedExchange {
    async fn fetch_rate(
        &self,
        _from: &str,
        _to: &str,
        amount: f64,
    ) -> Result<ExchangeQuote, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match *self.rate.lock().unwrap() {
            Some(rate) => Ok(ExchangeQuote {
                rate,
                result: amount * rate,
            }),
            None => Err(UpstreamError::Status(503)),
        }
    }
}

/// The full router wired to in-memory collaborators.
pub struct TestApp {
    pub router: Router,
    pub store: MemoryStore,
    pub clock: Arc<ManualClock>,
    pub exchange: Arc<ScriptedExchange>,
}

impl TestApp {
    pub fn new() -> Self {
        let config = test_config();
        let store = MemoryStore::default();
        let clock = Arc::new(ManualClock::new());
        let exchange = Arc::new(ScriptedExchange::with_rate(5.0));
        let deps = AppDependencies {
            users: Arc::new(store.clone()),
            sessions: Arc::new(store.clone()),
            transactions: Arc::new(store.clone()),
            hasher: Arc::new(
                Argon2Hasher::new(
                    config.password_hash_memory_kib,
                    config.password_hash_iterations,
                )
                .expect("hasher params"),
            ),
            tokens: Arc::new(OsRngTokenGenerator),
            clock: clock.clone(),
            exchange: exchange.clone(),
        };
        let router = build_router(AppState::new(config, deps));
        Self {
            router,
            store,
            clock,
            exchange,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router call")
    }

    pub async fn register(&self, username: &str, password: &str) -> Response {
        self.send(json_request(
            Method::POST,
            "/users",
            serde_json::json!({ "username": username, "password": password }),
            None,
        ))
        .await
    }

    pub async fn login_response(&self, username: &str, password: &str) -> Response {
        self.send(json_request(
            Method::POST,
            "/auth/login",
            serde_json::json!({ "username": username, "password": password }),
            None,
        ))
        .await
    }

    /// Registers and logs in, returning the user id and session token.
    pub async fn signed_in(&self, username: &str, password: &str) -> (i64, String) {
        let registered = self.register(username, password).await;
        assert_eq!(registered.status(), 201, "register {username}");
        let body = body_json(registered).await;
        let id = body["id"].as_i64().expect("user id");

        let response = self.login_response(username, password).await;
        assert_eq!(response.status(), 200, "login {username}");
        let token = extract_set_cookie_value(response.headers(), "session_id").expect("cookie");
        (id, token)
    }
}

pub fn json_request(method: Method, uri: &str, body: Value, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = session {
        builder = builder.header(header::COOKIE, format!("session_id={token}"));
    }
    builder.body(Body::from(body.to_string())).expect("build request")
}

pub fn empty_request(method: Method, uri: &str, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = session {
        builder = builder.header(header::COOKIE, format!("session_id={token}"));
    }
    builder.body(Body::empty()).expect("build request")
}

pub fn extract_set_cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|value| {
            value
                .split(';')
                .next()
                .and_then(|pair| pair.strip_prefix(&prefix))
                .map(str::to_string)
        })
}

pub fn set_cookie_header(headers: &HeaderMap) -> String {
    headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}
