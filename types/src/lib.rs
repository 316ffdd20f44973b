//! Fundamental types for the dvault voting vault engine.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! identities, asset identifiers, vault identifiers, timestamps, and token metadata.

pub mod address;
pub mod asset;
pub mod metadata;
pub mod time;

pub use address::Address;
pub use asset::AssetId;
pub use metadata::TokenMetadata;
pub use time::Timestamp;

/// Caller-chosen integer identifying a voting vault.
pub type VaultId = u64;

/// Decimal places used for every asset the engine creates.
pub const DEFAULT_DECIMALS: u8 = 6;

// Inline hex encoding to avoid adding the `hex` crate as a dependency of types.
pub(crate) mod hex {
    pub fn encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}
