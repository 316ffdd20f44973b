//! Engine errors.

use dvault_store::{LedgerError, StoreError};
use dvault_types::{Timestamp, VaultId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("engine is already initialized")]
    AlreadyInitialized,

    #[error("engine has not been initialized")]
    NotInitialized,

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("vault {0} not found")]
    VaultNotFound(VaultId),

    #[error("vault {0} already exists")]
    VaultAlreadyExists(VaultId),

    #[error("voting period ended at {deadline} (now {now})")]
    VotingPeriodEnded { deadline: Timestamp, now: Timestamp },

    #[error("vote cap exceeded: requested {requested}, remaining {remaining}")]
    CapExceeded { requested: u128, remaining: u128 },

    #[error("insufficient balance: need {needed}, available {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("settlement is not open: {0}")]
    SettlementNotOpen(String),

    #[error("no votes were cast in this vault")]
    NoVotesCast,

    #[error("nothing to claim")]
    NothingToClaim,

    #[error("reward asset for vault {0} is already configured")]
    AlreadyConfigured(VaultId),

    #[error("reward asset for vault {0} has not been set")]
    RewardAssetNotSet(VaultId),

    #[error("deposits closed at conversion time {conversion_time}")]
    DepositClosed { conversion_time: Timestamp },

    #[error("arithmetic overflow")]
    Overflow,

    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("ledger error: {0}")]
    Ledger(LedgerError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("config error: {0}")]
    Config(String),
}

impl VaultError {
    /// Whether the same call may succeed later without changing its arguments
    /// (after a top-up, once time passes, once setup completes).
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::InsufficientBalance { .. }
                | Self::SettlementNotOpen(_)
                | Self::NotInitialized
                | Self::RewardAssetNotSet(_)
        )
    }

    /// Stable name of the error category.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AlreadyInitialized => "AlreadyInitialized",
            Self::NotInitialized => "NotInitialized",
            Self::Unauthorized(_) => "Unauthorized",
            Self::InvalidParameters(_) => "InvalidParameters",
            Self::VaultNotFound(_) => "VaultNotFound",
            Self::VaultAlreadyExists(_) => "VaultAlreadyExists",
            Self::VotingPeriodEnded { .. } => "VotingPeriodEnded",
            Self::CapExceeded { .. } => "CapExceeded",
            Self::InsufficientBalance { .. } => "InsufficientBalance",
            Self::SettlementNotOpen(_) => "SettlementNotOpen",
            Self::NoVotesCast => "NoVotesCast",
            Self::NothingToClaim => "NothingToClaim",
            Self::AlreadyConfigured(_) => "AlreadyConfigured",
            Self::RewardAssetNotSet(_) => "RewardAssetNotSet",
            Self::DepositClosed { .. } => "DepositClosed",
            Self::Overflow => "Overflow",
            Self::InvariantViolation(_) => "InvariantViolation",
            Self::Ledger(_) => "Ledger",
            Self::Store(_) => "Store",
            Self::Serialization(_) => "Serialization",
            Self::Config(_) => "Config",
        }
    }
}

impl From<LedgerError> for VaultError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientFunds {
                needed, available, ..
            } => Self::InsufficientBalance { needed, available },
            LedgerError::Unauthorized { .. } => Self::Unauthorized(err.to_string()),
            other => Self::Ledger(other),
        }
    }
}

impl From<bincode::Error> for VaultError {
    fn from(err: bincode::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
