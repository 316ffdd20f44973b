//! The vault engine: records, collaborators, and the staged commit path.

use std::collections::HashMap;

use dvault_store::{Ledger, LedgerBatch, MetadataRegistry};
use dvault_types::{Address, AssetId, TokenMetadata, VaultId};

use crate::config::EngineConfig;
use crate::error::VaultError;
use crate::math::mul_div_floor;
use crate::state::{GlobalState, UserVault, Vault};

/// The engine. Owns the ledger handle, the metadata registry and every
/// record, and exposes the mutating operations (implemented in the sibling
/// modules) plus read-only queries.
///
/// Independent engines share nothing; two instances over two ledgers are
/// fully isolated.
pub struct VaultEngine<L: Ledger, M: MetadataRegistry> {
    pub(crate) ledger: L,
    pub(crate) metadata: M,
    pub(crate) config: EngineConfig,
    pub(crate) global: Option<GlobalState>,
    pub(crate) vaults: HashMap<VaultId, Vault>,
    pub(crate) user_vaults: HashMap<(VaultId, Address), UserVault>,
}

/// Everything one operation changes, applied as a unit by
/// [`VaultEngine::commit`].
#[derive(Debug, Default)]
pub(crate) struct Commit {
    pub batch: LedgerBatch,
    pub global: Option<GlobalState>,
    pub vault: Option<Vault>,
    pub user_vault: Option<UserVault>,
}

impl<L: Ledger, M: MetadataRegistry> VaultEngine<L, M> {
    pub fn new(ledger: L, metadata: M, config: EngineConfig) -> Self {
        Self {
            ledger,
            metadata,
            config,
            global: None,
            vaults: HashMap::new(),
            user_vaults: HashMap::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Direct ledger access, for standing up assets that live outside the
    /// engine. Operations on engine-created assets are rejected by the
    /// ledger's authority checks unless signed by the engine's own accounts.
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn metadata(&self) -> &M {
        &self.metadata
    }

    pub fn global_state(&self) -> Option<&GlobalState> {
        self.global.as_ref()
    }

    pub fn vault(&self, vault_id: VaultId) -> Option<&Vault> {
        self.vaults.get(&vault_id)
    }

    pub fn user_vault(&self, vault_id: VaultId, user: &Address) -> Option<&UserVault> {
        self.user_vaults.get(&(vault_id, *user))
    }

    /// All vaults, ordered by id.
    pub fn vaults(&self) -> Vec<&Vault> {
        let mut out: Vec<&Vault> = self.vaults.values().collect();
        out.sort_by_key(|v| v.vault_id);
        out
    }

    /// Positions in `vault_id`, ordered by user.
    pub fn user_vaults(&self, vault_id: VaultId) -> Vec<&UserVault> {
        let mut out: Vec<&UserVault> = self
            .user_vaults
            .values()
            .filter(|uv| uv.vault_id == vault_id)
            .collect();
        out.sort_by_key(|uv| uv.user);
        out
    }

    /// The payout `user` would receive from a claim right now, ignoring the
    /// settlement time gate.
    pub fn preview_claim(&self, vault_id: VaultId, user: &Address) -> Result<u128, VaultError> {
        let vault = self.require_vault(vault_id)?;
        let burned = self
            .user_vault(vault_id, user)
            .map(|uv| uv.burned_amount)
            .unwrap_or(0);
        if burned == 0 {
            return Ok(0);
        }
        payout(vault, burned)
    }

    /// Verify the accounting invariants of one vault against its records and
    /// the ledger.
    pub fn check_invariants(&self, vault_id: VaultId) -> Result<(), VaultError> {
        let vault = self.require_vault(vault_id)?;

        if vault.total_burned > vault.max_vote_cap {
            return Err(VaultError::InvariantViolation(format!(
                "vault {vault_id}: total burned {} exceeds cap {}",
                vault.total_burned, vault.max_vote_cap
            )));
        }

        let live: u128 = self
            .user_vaults(vault_id)
            .iter()
            .map(|uv| uv.burned_amount)
            .sum();
        let accounted = live
            .checked_add(vault.total_settled)
            .ok_or(VaultError::Overflow)?;
        if accounted != vault.total_burned {
            return Err(VaultError::InvariantViolation(format!(
                "vault {vault_id}: total burned {} != live burns {live} + settled {}",
                vault.total_burned, vault.total_settled
            )));
        }

        if vault.total_paid_out > vault.total_deposited {
            return Err(VaultError::InvariantViolation(format!(
                "vault {vault_id}: paid out {} exceeds deposits {}",
                vault.total_paid_out, vault.total_deposited
            )));
        }

        let receipt_supply = self
            .ledger
            .asset(&vault.receipt_asset)
            .map(|a| a.supply)
            .unwrap_or(0);
        if receipt_supply != vault.outstanding_receipts() {
            return Err(VaultError::InvariantViolation(format!(
                "vault {vault_id}: receipt supply {receipt_supply} != outstanding {}",
                vault.outstanding_receipts()
            )));
        }

        if let Some(reward_asset) = vault.reward_asset {
            let custody = vault_address(vault);
            let held = self.ledger.balance(&reward_asset, &custody);
            if held < vault.reward_pool() {
                return Err(VaultError::InvariantViolation(format!(
                    "vault {vault_id}: custody holds {held}, pool is {}",
                    vault.reward_pool()
                )));
            }
        }

        Ok(())
    }

    pub(crate) fn require_global(&self) -> Result<&GlobalState, VaultError> {
        self.global.as_ref().ok_or(VaultError::NotInitialized)
    }

    pub(crate) fn require_vault(&self, vault_id: VaultId) -> Result<&Vault, VaultError> {
        self.vaults
            .get(&vault_id)
            .ok_or(VaultError::VaultNotFound(vault_id))
    }

    /// Apply the ledger batch, then install the new records.
    ///
    /// If the ledger rejects the batch nothing changes: records are only
    /// written after the batch has been applied in full.
    pub(crate) fn commit(&mut self, commit: Commit) -> Result<(), VaultError> {
        if !commit.batch.is_empty() {
            self.ledger.apply(&commit.batch)?;
        }
        if let Some(global) = commit.global {
            self.global = Some(global);
        }
        if let Some(vault) = commit.vault {
            self.vaults.insert(vault.vault_id, vault);
        }
        if let Some(user_vault) = commit.user_vault {
            self.user_vaults
                .insert((user_vault.vault_id, user_vault.user), user_vault);
        }
        Ok(())
    }

    /// Record descriptive metadata for a freshly created asset. Failures are
    /// logged and otherwise ignored.
    pub(crate) fn register_metadata(&mut self, asset: &AssetId, metadata: &TokenMetadata) {
        if let Err(e) = self.metadata.register(asset, metadata) {
            tracing::warn!(
                asset = %asset,
                symbol = %metadata.symbol,
                error = %e,
                "metadata registration failed"
            );
        }
    }
}

/// The derived identity of a vault, which is also its custody owner and the
/// mint authority of its receipt asset.
pub(crate) fn vault_address(vault: &Vault) -> Address {
    dvault_crypto::vault_address(vault.vault_id)
}

/// Pro-rata payout: `floor(burned * deposited / total_burned)`.
pub(crate) fn payout(vault: &Vault, burned: u128) -> Result<u128, VaultError> {
    if vault.total_burned == 0 {
        return Err(VaultError::NoVotesCast);
    }
    mul_div_floor(burned, vault.total_deposited, vault.total_burned).ok_or(VaultError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dvault_ledger::MemoryLedger;
    use dvault_nullables::NullMetadataRegistry;
    use dvault_types::Timestamp;

    fn engine() -> VaultEngine<MemoryLedger, NullMetadataRegistry> {
        VaultEngine::new(
            MemoryLedger::new(),
            NullMetadataRegistry::new(),
            EngineConfig::default(),
        )
    }

    fn sample_vault(id: VaultId) -> Vault {
        Vault {
            owner: Address::new([1; 32]),
            vault_id: id,
            governance_asset: AssetId::new([2; 32]),
            staked_asset: AssetId::new([3; 32]),
            receipt_asset: AssetId::new([4; 32]),
            max_vote_cap: 100,
            deadline: Timestamp::new(10),
            total_burned: 0,
            reward_asset: None,
            conversion_time: None,
            total_deposited: 0,
            total_settled: 0,
            total_paid_out: 0,
        }
    }

    #[test]
    fn fresh_engine_is_uninitialized() {
        let engine = engine();
        assert!(engine.global_state().is_none());
        assert!(engine.vaults().is_empty());
        assert!(matches!(
            engine.require_global(),
            Err(VaultError::NotInitialized)
        ));
    }

    #[test]
    fn commit_without_batch_installs_records() {
        let mut engine = engine();
        let commit = Commit {
            vault: Some(sample_vault(7)),
            ..Default::default()
        };
        engine.commit(commit).unwrap();
        assert_eq!(engine.vault(7).unwrap().max_vote_cap, 100);
    }

    #[test]
    fn rejected_batch_leaves_records_untouched() {
        let mut engine = engine();
        let mut commit = Commit {
            vault: Some(sample_vault(7)),
            ..Default::default()
        };
        // burning an asset that does not exist fails
        commit
            .batch
            .burn(AssetId::new([9; 32]), Address::new([1; 32]), 1, Address::new([1; 32]));
        assert!(engine.commit(commit).is_err());
        assert!(engine.vault(7).is_none());
    }

    #[test]
    fn vaults_sorted_by_id() {
        let mut engine = engine();
        for id in [5, 1, 3] {
            engine.vaults.insert(id, sample_vault(id));
        }
        let ids: Vec<VaultId> = engine.vaults().iter().map(|v| v.vault_id).collect();
        assert_eq!(ids, vec![1, 3, 5]);
    }

    #[test]
    fn payout_is_floor_of_share() {
        let mut v = sample_vault(1);
        v.total_burned = 3;
        v.total_deposited = 10;
        assert_eq!(payout(&v, 1).unwrap(), 3);
        assert_eq!(payout(&v, 2).unwrap(), 6);
        v.total_burned = 0;
        assert!(matches!(payout(&v, 1), Err(VaultError::NoVotesCast)));
    }

    #[test]
    fn invariant_check_catches_untracked_burns() {
        let mut engine = engine();
        let mut v = sample_vault(1);
        v.total_burned = 5;
        engine.vaults.insert(1, v);
        let err = engine.check_invariants(1).unwrap_err();
        assert_eq!(err.kind(), "InvariantViolation");
    }

    #[test]
    fn unknown_vault_in_queries() {
        let engine = engine();
        assert!(matches!(
            engine.preview_claim(4, &Address::new([1; 32])),
            Err(VaultError::VaultNotFound(4))
        ));
        assert!(matches!(
            engine.check_invariants(4),
            Err(VaultError::VaultNotFound(4))
        ));
    }
}
