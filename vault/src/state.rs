//! Engine records: the global registry, vaults, and per-user vault positions.

use dvault_crypto::{user_vault_address, vault_address};
use dvault_types::{Address, AssetId, Timestamp, VaultId};
use serde::{Deserialize, Serialize};

/// Singleton record created by `initialize`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalState {
    /// The only identity allowed to create vaults and issue the governance asset.
    pub admin: Address,
    pub governance_asset: AssetId,
    pub staked_asset: AssetId,
}

/// A voting vault.
///
/// `total_burned` counts every unit of staked asset ever burned into the
/// vault; `total_settled` counts the receipt units already redeemed by claims.
/// The live receipt supply is therefore `total_burned - total_settled`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vault {
    pub owner: Address,
    pub vault_id: VaultId,
    pub governance_asset: AssetId,
    pub staked_asset: AssetId,
    /// Receipt asset minted 1:1 for each vote; the vault is its mint authority.
    pub receipt_asset: AssetId,
    pub max_vote_cap: u128,
    /// Votes are accepted strictly before this instant.
    pub deadline: Timestamp,
    pub total_burned: u128,
    pub reward_asset: Option<AssetId>,
    /// Claims open at this instant and deposits close. It may fall before
    /// `deadline`, in which case claimants can keep voting afterwards.
    pub conversion_time: Option<Timestamp>,
    pub total_deposited: u128,
    pub total_settled: u128,
    pub total_paid_out: u128,
}

impl Vault {
    /// Headroom left under the vote cap.
    pub fn remaining_cap(&self) -> u128 {
        self.max_vote_cap.saturating_sub(self.total_burned)
    }

    /// Receipt units minted and not yet redeemed.
    pub fn outstanding_receipts(&self) -> u128 {
        self.total_burned.saturating_sub(self.total_settled)
    }

    /// Reward units deposited and not yet paid out.
    pub fn reward_pool(&self) -> u128 {
        self.total_deposited.saturating_sub(self.total_paid_out)
    }

    pub fn is_voting_open(&self, now: Timestamp) -> bool {
        now < self.deadline
    }

    /// Why claims are not open yet, or `None` once they are.
    pub fn settlement_block(&self, now: Timestamp) -> Option<String> {
        let Some(conversion_time) = self.conversion_time else {
            return Some("reward asset has not been set".into());
        };
        if now < conversion_time {
            return Some(format!(
                "claims open at conversion time {conversion_time} (now {now})"
            ));
        }
        None
    }
}

/// One participant's position in one vault.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserVault {
    pub vault_id: VaultId,
    pub user: Address,
    /// Staked asset burned since the last claim.
    pub burned_amount: u128,
    /// Reward asset received across all claims.
    pub total_claimed: u128,
}

impl UserVault {
    pub fn new(vault_id: VaultId, user: Address) -> Self {
        Self {
            vault_id,
            user,
            burned_amount: 0,
            total_claimed: 0,
        }
    }

    /// Derived address this position is stored under.
    pub fn record_address(&self) -> Address {
        user_vault_address(&vault_address(self.vault_id), &self.user)
    }
}
