//! Nullable store: in-memory record storage for testing.

use dvault_store::{StoreError, VaultStore};
use dvault_types::{Address, VaultId};
use std::collections::HashMap;

/// An in-memory [`VaultStore`].
#[derive(Debug, Default)]
pub struct NullVaultStore {
    global: Option<Vec<u8>>,
    vaults: HashMap<VaultId, Vec<u8>>,
    user_vaults: HashMap<Address, Vec<u8>>,
}

impl NullVaultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored records.
    pub fn record_count(&self) -> usize {
        usize::from(self.global.is_some()) + self.vaults.len() + self.user_vaults.len()
    }
}

impl VaultStore for NullVaultStore {
    fn get_global(&self) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.global.clone())
    }

    fn put_global(&mut self, record: &[u8]) -> Result<(), StoreError> {
        self.global = Some(record.to_vec());
        Ok(())
    }

    fn get_vault(&self, vault_id: VaultId) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.vaults.get(&vault_id).cloned())
    }

    fn put_vault(&mut self, vault_id: VaultId, record: &[u8]) -> Result<(), StoreError> {
        self.vaults.insert(vault_id, record.to_vec());
        Ok(())
    }

    fn iter_vaults(&self) -> Result<Vec<(VaultId, Vec<u8>)>, StoreError> {
        Ok(self
            .vaults
            .iter()
            .map(|(id, bytes)| (*id, bytes.clone()))
            .collect())
    }

    fn get_user_vault(&self, record_address: &Address) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.user_vaults.get(record_address).cloned())
    }

    fn put_user_vault(&mut self, record_address: &Address, record: &[u8]) -> Result<(), StoreError> {
        self.user_vaults.insert(*record_address, record.to_vec());
        Ok(())
    }

    fn iter_user_vaults(&self) -> Result<Vec<(Address, Vec<u8>)>, StoreError> {
        Ok(self
            .user_vaults
            .iter()
            .map(|(key, bytes)| (*key, bytes.clone()))
            .collect())
    }
}
