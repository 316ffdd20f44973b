//! Copy-on-write overlay used to stage a batch.
//!
//! Every read falls through to the committed ledger until the entry is
//! touched; every write lands in the overlay only. Dropping a
//! [`StagedChanges`] without merging it discards the whole batch.

use std::collections::HashMap;

use dvault_crypto::holding_address;
use dvault_store::{AssetInfo, LedgerError, LedgerOp};
use dvault_types::{Address, AssetId};

use crate::memory::{Holding, MemoryLedger};

/// Assets and holdings written by a batch, not yet visible in the ledger.
#[derive(Debug, Default)]
pub struct StagedChanges {
    pub(crate) assets: HashMap<AssetId, AssetInfo>,
    pub(crate) holdings: HashMap<Address, Holding>,
}

pub(crate) struct Stage<'a> {
    base: &'a MemoryLedger,
    changes: StagedChanges,
}

impl<'a> Stage<'a> {
    pub(crate) fn new(base: &'a MemoryLedger) -> Self {
        Self {
            base,
            changes: StagedChanges::default(),
        }
    }

    pub(crate) fn into_changes(self) -> StagedChanges {
        self.changes
    }

    fn asset(&self, asset: &AssetId) -> Option<AssetInfo> {
        self.changes
            .assets
            .get(asset)
            .cloned()
            .or_else(|| self.base.asset_info(asset).cloned())
    }

    fn amount(&self, asset: &AssetId, owner: &Address) -> u128 {
        let key = holding_address(asset, owner);
        match self.changes.holdings.get(&key) {
            Some(h) => h.amount,
            None => self.base.holding_amount(&key),
        }
    }

    fn set_amount(&mut self, asset: AssetId, owner: Address, amount: u128) {
        let key = holding_address(&asset, &owner);
        self.changes.holdings.insert(
            key,
            Holding {
                asset,
                owner,
                amount,
            },
        );
    }

    fn known_asset(&self, asset: &AssetId) -> Result<AssetInfo, LedgerError> {
        self.asset(asset).ok_or(LedgerError::UnknownAsset(*asset))
    }

    fn debit(&mut self, asset: AssetId, from: Address, amount: u128) -> Result<(), LedgerError> {
        let available = self.amount(&asset, &from);
        let remaining = available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientFunds {
                asset,
                needed: amount,
                available,
            })?;
        self.set_amount(asset, from, remaining);
        Ok(())
    }

    fn credit(&mut self, asset: AssetId, to: Address, amount: u128) -> Result<(), LedgerError> {
        let updated = self
            .amount(&asset, &to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow(asset))?;
        self.set_amount(asset, to, updated);
        Ok(())
    }

    /// Validate one operation against the staged view and record its effect.
    pub(crate) fn stage(&mut self, op: &LedgerOp) -> Result<(), LedgerError> {
        match op {
            LedgerOp::CreateAsset {
                asset,
                decimals,
                mint_authority,
            } => {
                if self.asset(asset).is_some() {
                    return Err(LedgerError::AssetExists(*asset));
                }
                self.changes.assets.insert(
                    *asset,
                    AssetInfo {
                        decimals: *decimals,
                        supply: 0,
                        mint_authority: *mint_authority,
                    },
                );
            }
            LedgerOp::Mint {
                asset,
                to,
                amount,
                authority,
            } => {
                if *amount == 0 {
                    return Err(LedgerError::ZeroAmount);
                }
                let mut info = self.known_asset(asset)?;
                if info.mint_authority != *authority {
                    return Err(LedgerError::Unauthorized {
                        asset: *asset,
                        authority: *authority,
                        action: "mint",
                    });
                }
                info.supply = info
                    .supply
                    .checked_add(*amount)
                    .ok_or(LedgerError::Overflow(*asset))?;
                self.credit(*asset, *to, *amount)?;
                self.changes.assets.insert(*asset, info);
            }
            LedgerOp::Burn {
                asset,
                from,
                amount,
                authority,
            } => {
                if *amount == 0 {
                    return Err(LedgerError::ZeroAmount);
                }
                let mut info = self.known_asset(asset)?;
                if from != authority {
                    return Err(LedgerError::Unauthorized {
                        asset: *asset,
                        authority: *authority,
                        action: "burn",
                    });
                }
                self.debit(*asset, *from, *amount)?;
                info.supply = info
                    .supply
                    .checked_sub(*amount)
                    .ok_or(LedgerError::Overflow(*asset))?;
                self.changes.assets.insert(*asset, info);
            }
            LedgerOp::Transfer {
                asset,
                from,
                to,
                amount,
                authority,
            } => {
                if *amount == 0 {
                    return Err(LedgerError::ZeroAmount);
                }
                self.known_asset(asset)?;
                if from != authority {
                    return Err(LedgerError::Unauthorized {
                        asset: *asset,
                        authority: *authority,
                        action: "transfer",
                    });
                }
                self.debit(*asset, *from, *amount)?;
                self.credit(*asset, *to, *amount)?;
            }
        }
        Ok(())
    }
}
