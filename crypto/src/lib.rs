//! Cryptographic primitives for dvault.
//!
//! - **Blake2b-256** for hashing
//! - Deterministic address derivation from seed lists (no private key exists
//!   for a derived address; the engine authorises on its behalf)
//! - Textual address form with `dv_` prefix, base32 encoding and checksum

pub mod address;
pub mod derive;
pub mod hash;

pub use address::{decode_address, encode_address};
pub use derive::{
    derive_address, global_state_address, governance_asset, holding_address,
    identity_from_label, receipt_asset, staked_asset, user_vault_address, vault_address,
};
pub use hash::{blake2b_256, blake2b_256_multi};
