use thiserror::Error;
use uuid::Uuid;

use crate::ledger::account::AccountId;
use crate::money::Money;

/// Unified error type for ledger, workflow, and storage layers.
#[derive(Debug, Error)]
pub enum BankError {
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),
    #[error("Pending transfer not found: {0}")]
    PendingNotFound(Uuid),
    #[error("Privileged actor required")]
    Forbidden,
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Insufficient funds in {account}: balance {balance}, required {required}")]
    InsufficientFunds {
        account: AccountId,
        balance: Money,
        required: Money,
    },
    #[error("Account is banned: {0}")]
    BannedAccount(AccountId),
    #[error("Cannot ban the root administrator account")]
    ProtectedAccount,
    #[error("Pending transfer already resolved: {0}")]
    AlreadyResolved(Uuid),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Persistence error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, BankError>;

impl From<std::io::Error> for BankError {
    fn from(err: std::io::Error) -> Self {
        BankError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for BankError {
    fn from(err: serde_json::Error) -> Self {
        BankError::Storage(err.to_string())
    }
}
