//! Token-weighted voting vault engine.
//!
//! Participants convert the governance asset 1:1 into its staked form, burn
//! stake to vote in a vault (minting that vault's receipt asset), and after
//! settlement opens redeem receipts for a pro-rata share of the reward asset
//! deposited into the vault.
//!
//! Lifecycle of a vault:
//! `create_vault` → `vote`* (until deadline) → `set_project_token` →
//! `deposit_reward_asset`* (until conversion time) → `claim_reward_asset`*
//!
//! Claims open at the conversion time, which may precede the deadline. A
//! claimant may vote again while voting is open; payouts never exceed what
//! custody holds.
//!
//! Every mutating operation stages its ledger batch and record updates and
//! commits them together; a failed precondition or ledger rejection leaves
//! both balances and records untouched.

pub mod config;
pub mod context;
pub mod conversion;
pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod math;
pub mod persist;
pub mod registry;
pub mod settlement;
pub mod state;
pub mod voting;

#[cfg(test)]
mod test_support;

pub use config::{DepositPolicy, EngineConfig};
pub use context::CallContext;
pub use engine::VaultEngine;
pub use error::VaultError;
pub use state::{GlobalState, UserVault, Vault};
