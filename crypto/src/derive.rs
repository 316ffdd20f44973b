//! Deterministic address derivation.
//!
//! `address = Blake2b-256(DOMAIN || len(seed_0) || seed_0 || ... )`
//!
//! Each seed is prefixed with its length as a little-endian `u32`, so
//! `["ab", "c"]` and `["a", "bc"]` never collide. The same seed list always
//! yields the same address, which lets the engine locate a vault's or a
//! user's records and holdings without any prior registration.

use dvault_types::{Address, AssetId, VaultId};

use crate::hash::blake2b_256_multi;

/// Domain separator mixed into every derived address.
const DOMAIN: &[u8] = b"dvault/derive/v1";

/// Derive an address from an ordered list of seeds.
pub fn derive_address(seeds: &[&[u8]]) -> Address {
    let lens: Vec<[u8; 4]> = seeds
        .iter()
        .map(|s| (s.len() as u32).to_le_bytes())
        .collect();
    let mut parts: Vec<&[u8]> = Vec::with_capacity(1 + seeds.len() * 2);
    parts.push(DOMAIN);
    for (seed, len) in seeds.iter().zip(lens.iter()) {
        parts.push(len.as_slice());
        parts.push(*seed);
    }
    Address::new(blake2b_256_multi(&parts))
}

/// Stable identity for a human-readable label (CLI scenarios, tests).
pub fn identity_from_label(label: &str) -> Address {
    derive_address(&[b"identity", label.as_bytes()])
}

/// Address of the singleton global record.
pub fn global_state_address() -> Address {
    derive_address(&[b"global_state"])
}

/// The governance asset.
pub fn governance_asset() -> AssetId {
    derive_address(&[b"governance_token_mint"]).into()
}

/// The staked governance asset.
pub fn staked_asset() -> AssetId {
    derive_address(&[b"st_governance_token_mint"]).into()
}

/// Address of a vault; also the owner of the vault's custody holdings.
pub fn vault_address(vault_id: VaultId) -> Address {
    derive_address(&[b"vault", &vault_id.to_le_bytes()])
}

/// The receipt (vote) asset of a vault.
pub fn receipt_asset(vault: &Address) -> AssetId {
    derive_address(&[b"vote_token_mint", vault.as_bytes()]).into()
}

/// Address of the per-user record inside a vault.
pub fn user_vault_address(vault: &Address, user: &Address) -> Address {
    derive_address(&[b"user_vault", vault.as_bytes(), user.as_bytes()])
}

/// Address of the account holding `asset` on behalf of `owner`.
pub fn holding_address(asset: &AssetId, owner: &Address) -> Address {
    derive_address(&[b"holding", asset.as_bytes(), owner.as_bytes()])
}
