pub mod authenticator;
pub mod conversion;
pub mod credentials;
pub mod exchange_rate;
pub mod guard;
pub mod ledger;
pub mod sessions;

pub use authenticator::{AuthError, Authenticator, LoginOutcome};
pub use conversion::{ConversionError, CurrencyConverter};
pub use credentials::{CredentialError, CredentialStore};
pub use exchange_rate::{ApiLayerClient, ExchangeRateProvider, UpstreamError};
pub use guard::{ensure_owner, AuthorizationGuard, GuardError};
pub use ledger::{LedgerError, LedgerPage, TransactionLedger};
pub use sessions::{SessionError, SessionManager, DEFAULT_SESSION_TTL_MINUTES};
