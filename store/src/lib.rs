//! Collaborator contracts consumed by the dvault engine.
//!
//! The engine never touches balances or durable storage directly. Every
//! backend (the in-memory reference ledger, a real chain adapter, a test
//! double) implements these traits, and the engine depends only on them.

pub mod error;
pub mod ledger;
pub mod metadata;
pub mod vault;

pub use error::StoreError;
pub use ledger::{AssetInfo, Ledger, LedgerBatch, LedgerError, LedgerOp};
pub use metadata::MetadataRegistry;
pub use vault::VaultStore;
