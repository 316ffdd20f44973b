use dvault_types::{Address, VaultId};

use crate::StoreError;

/// Store trait for persisting engine records to durable storage.
///
/// Uses opaque `Vec<u8>` so the store doesn't depend on the `dvault-vault`
/// crate. The engine serializes and deserializes its own record types.
pub trait VaultStore {
    fn get_global(&self) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_global(&mut self, record: &[u8]) -> Result<(), StoreError>;

    fn get_vault(&self, vault_id: VaultId) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_vault(&mut self, vault_id: VaultId, record: &[u8]) -> Result<(), StoreError>;
    fn iter_vaults(&self) -> Result<Vec<(VaultId, Vec<u8>)>, StoreError>;

    /// User vault records are keyed by their derived record address.
    fn get_user_vault(&self, record_address: &Address) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_user_vault(&mut self, record_address: &Address, record: &[u8]) -> Result<(), StoreError>;
    fn iter_user_vaults(&self) -> Result<Vec<(Address, Vec<u8>)>, StoreError>;
}
