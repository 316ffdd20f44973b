//! Saving and restoring engine records through a [`VaultStore`].
//!
//! Only the engine's own records are persisted here; balances live in the
//! ledger, which owns its durability.

use std::collections::HashMap;

use dvault_store::{Ledger, MetadataRegistry, StoreError, VaultStore};

use crate::config::EngineConfig;
use crate::engine::VaultEngine;
use crate::error::VaultError;
use crate::state::{GlobalState, UserVault, Vault};

impl<L: Ledger, M: MetadataRegistry> VaultEngine<L, M> {
    /// Persist every record to `store`.
    pub fn save_to_store(&self, store: &mut dyn VaultStore) -> Result<(), VaultError> {
        if let Some(global) = &self.global {
            store.put_global(&bincode::serialize(global)?)?;
        }
        for (vault_id, vault) in &self.vaults {
            store.put_vault(*vault_id, &bincode::serialize(vault)?)?;
        }
        for user_vault in self.user_vaults.values() {
            store.put_user_vault(&user_vault.record_address(), &bincode::serialize(user_vault)?)?;
        }
        Ok(())
    }

    /// Rebuild an engine from records in `store`, attached to the given
    /// ledger and metadata registry.
    pub fn load_from_store(
        store: &dyn VaultStore,
        ledger: L,
        metadata: M,
        config: EngineConfig,
    ) -> Result<Self, VaultError> {
        let global = match store.get_global()? {
            Some(bytes) => Some(bincode::deserialize::<GlobalState>(&bytes)?),
            None => None,
        };

        let mut vaults = HashMap::new();
        for (vault_id, bytes) in store.iter_vaults()? {
            let vault: Vault = bincode::deserialize(&bytes)?;
            if vault.vault_id != vault_id {
                return Err(StoreError::Corruption(format!(
                    "vault record keyed {vault_id} holds vault {}",
                    vault.vault_id
                ))
                .into());
            }
            vaults.insert(vault_id, vault);
        }

        let mut user_vaults = HashMap::new();
        for (record_address, bytes) in store.iter_user_vaults()? {
            let user_vault: UserVault = bincode::deserialize(&bytes)?;
            if user_vault.record_address() != record_address {
                return Err(StoreError::Corruption(format!(
                    "user vault record at {record_address} holds ({}, {})",
                    user_vault.vault_id, user_vault.user
                ))
                .into());
            }
            let vault_id = user_vault.vault_id;
            if !vaults.contains_key(&vault_id) {
                return Err(StoreError::Corruption(format!(
                    "user vault for missing vault {vault_id}"
                ))
                .into());
            }
            user_vaults.insert((vault_id, user_vault.user), user_vault);
        }

        let mut engine = Self::new(ledger, metadata, config);
        engine.global = global;
        engine.vaults = vaults;
        engine.user_vaults = user_vaults;
        Ok(engine)
    }
}
