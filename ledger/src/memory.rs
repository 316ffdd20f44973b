//! The in-memory ledger.

use std::collections::HashMap;

use dvault_crypto::holding_address;
use dvault_store::{AssetInfo, Ledger, LedgerBatch, LedgerError};
use dvault_types::{Address, AssetId};
use serde::{Deserialize, Serialize};

use crate::staging::Stage;

/// The balance of one owner in one asset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    pub asset: AssetId,
    pub owner: Address,
    pub amount: u128,
}

/// Assets plus holdings keyed by `holding_address(asset, owner)`.
#[derive(Clone, Debug, Default)]
pub struct MemoryLedger {
    assets: HashMap<AssetId, AssetInfo>,
    holdings: HashMap<Address, Holding>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an asset that lives outside the engine (e.g. a partner's
    /// project token), with `mint_authority` as its issuer.
    pub fn register_external_asset(
        &mut self,
        asset: AssetId,
        decimals: u8,
        mint_authority: Address,
    ) -> Result<(), LedgerError> {
        let mut batch = LedgerBatch::new();
        batch.create_asset(asset, decimals, mint_authority);
        self.apply(&batch)
    }

    pub(crate) fn asset_info(&self, asset: &AssetId) -> Option<&AssetInfo> {
        self.assets.get(asset)
    }

    pub(crate) fn holding_amount(&self, key: &Address) -> u128 {
        self.holdings.get(key).map(|h| h.amount).unwrap_or(0)
    }

    pub fn total_supply(&self, asset: &AssetId) -> u128 {
        self.assets.get(asset).map(|a| a.supply).unwrap_or(0)
    }

    /// Every owner with a non-zero balance in `asset`, sorted by owner.
    pub fn holders(&self, asset: &AssetId) -> Vec<(Address, u128)> {
        let mut out: Vec<(Address, u128)> = self
            .holdings
            .values()
            .filter(|h| h.asset == *asset && h.amount > 0)
            .map(|h| (h.owner, h.amount))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    /// Number of opened holdings across all assets (including emptied ones).
    pub fn holding_count(&self) -> usize {
        self.holdings.len()
    }

    /// Recompute the sum of all holdings of `asset` and compare it to the
    /// recorded supply.
    pub fn supply_is_consistent(&self, asset: &AssetId) -> bool {
        let held: u128 = self
            .holdings
            .values()
            .filter(|h| h.asset == *asset)
            .map(|h| h.amount)
            .sum();
        held == self.total_supply(asset)
    }
}

impl Ledger for MemoryLedger {
    fn asset(&self, asset: &AssetId) -> Option<AssetInfo> {
        self.assets.get(asset).cloned()
    }

    fn balance(&self, asset: &AssetId, owner: &Address) -> u128 {
        self.holding_amount(&holding_address(asset, owner))
    }

    fn apply(&mut self, batch: &LedgerBatch) -> Result<(), LedgerError> {
        let mut stage = Stage::new(self);
        for op in batch.ops() {
            stage.stage(op)?;
        }
        let changes = stage.into_changes();
        self.assets.extend(changes.assets);
        self.holdings.extend(changes.holdings);
        Ok(())
    }
}
