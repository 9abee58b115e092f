use std::sync::Arc;

use crate::{
    config::Config,
    db::connection::DbPool,
    repositories::{
        PgSessionRepository, PgTransactionRepository, PgUserRepository, SessionRepository,
        TransactionRepository, UserRepository,
    },
    services::{
        ApiLayerClient, Authenticator, AuthorizationGuard, CredentialStore, CurrencyConverter,
        ExchangeRateProvider, SessionManager, TransactionLedger,
    },
    utils::{
        Argon2Hasher, Clock, OsRngTokenGenerator, PasswordHashProvider, SessionTokenGenerator,
        SystemClock,
    },
};

/// Injectable collaborators behind the services. Tests swap in in-memory
/// repositories, a manual clock and a scripted exchange-rate provider.
#[derive(Clone)]
pub struct AppDependencies {
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub transactions: Arc<dyn TransactionRepository>,
    pub hasher: Arc<dyn PasswordHashProvider>,
    pub tokens: Arc<dyn SessionTokenGenerator>,
    pub clock: Arc<dyn Clock>,
    pub exchange: Arc<dyn ExchangeRateProvider>,
}

impl AppDependencies {
    pub fn postgres(pool: DbPool, config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            sessions: Arc::new(PgSessionRepository::new(pool.clone())),
            transactions: Arc::new(PgTransactionRepository::new(pool)),
            hasher: Arc::new(Argon2Hasher::new(
                config.password_hash_memory_kib,
                config.password_hash_iterations,
            )?),
            tokens: Arc::new(OsRngTokenGenerator),
            clock: Arc::new(SystemClock),
            exchange: Arc::new(ApiLayerClient::from_config(config)?),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub credentials: CredentialStore,
    pub sessions: SessionManager,
    pub authenticator: Authenticator,
    pub guard: AuthorizationGuard,
    pub ledger: TransactionLedger,
    pub converter: CurrencyConverter,
}

impl AppState {
    pub fn new(config: Config, deps: AppDependencies) -> Self {
        let credentials = CredentialStore::new(
            deps.users.clone(),
            deps.hasher.clone(),
            deps.clock.clone(),
        );
        let sessions = SessionManager::new(
            deps.sessions.clone(),
            deps.tokens.clone(),
            deps.clock.clone(),
            config.session_ttl(),
        );
        let authenticator = Authenticator::new(credentials.clone(), sessions.clone());
        let guard = AuthorizationGuard::new(sessions.clone(), deps.users.clone());
        let ledger = TransactionLedger::new(deps.transactions.clone(), deps.clock.clone());
        let converter = CurrencyConverter::new(
            deps.exchange.clone(),
            ledger.clone(),
            config.supported_currencies.clone(),
        );

        Self {
            config,
            credentials,
            sessions,
            authenticator,
            guard,
            ledger,
            converter,
        }
    }
}
