pub mod account_number;
pub mod account_store;
pub mod json_store;
pub mod schema;

pub use account_store::AccountStore;

use thiserror::Error;

use crate::store::schema::SessionId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("account already exists")]
    DuplicateAccount,
    #[error("account not found")]
    AccountNotFound,
    #[error("invalid account number: {0}")]
    InvalidAccountNumber(#[from] account_number::AccountNumberError),
    #[error("failed to generate unique account number after {attempts} attempts")]
    GenerationExhausted { attempts: usize },
    #[error("session {0} not found")]
    SessionNotFound(SessionId),
    #[error("session {0} is already closed")]
    SessionClosed(SessionId),
    #[error("unsupported store schema version {found} (expected {expected})")]
    SchemaMismatch { found: u32, expected: u32 },
    #[error("store lock poisoned")]
    Poisoned,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
