//! Settlement: reward asset configuration, deposits, and pro-rata claims.

use dvault_crypto::vault_address;
use dvault_store::{Ledger, MetadataRegistry};
use dvault_types::{AssetId, Timestamp, VaultId};

use crate::config::DepositPolicy;
use crate::context::CallContext;
use crate::engine::{payout, Commit, VaultEngine};
use crate::error::VaultError;

impl<L: Ledger, M: MetadataRegistry> VaultEngine<L, M> {
    /// Set the vault's reward asset and the instant claims open. Vault owner
    /// only, and only once.
    pub fn set_project_token(
        &mut self,
        ctx: &CallContext,
        vault_id: VaultId,
        reward_asset: AssetId,
        conversion_time: Timestamp,
    ) -> Result<(), VaultError> {
        let vault = self.require_vault(vault_id)?;
        if ctx.caller != vault.owner {
            return Err(VaultError::Unauthorized(format!(
                "{} does not own vault {vault_id}",
                ctx.caller
            )));
        }
        if vault.reward_asset.is_some() {
            return Err(VaultError::AlreadyConfigured(vault_id));
        }
        if !self.ledger.asset_exists(&reward_asset) {
            return Err(VaultError::InvalidParameters(format!(
                "reward asset {reward_asset} does not exist"
            )));
        }

        let mut updated = vault.clone();
        updated.reward_asset = Some(reward_asset);
        updated.conversion_time = Some(conversion_time);
        self.commit(Commit {
            vault: Some(updated),
            ..Default::default()
        })?;

        tracing::debug!(
            vault_id,
            reward_asset = %reward_asset,
            conversion_time = conversion_time.as_secs(),
            "project token set"
        );
        Ok(())
    }

    /// Move `amount` of the reward asset from the caller into the vault's
    /// custody.
    pub fn deposit_reward_asset(
        &mut self,
        ctx: &CallContext,
        vault_id: VaultId,
        amount: u128,
    ) -> Result<(), VaultError> {
        if amount == 0 {
            return Err(VaultError::InvalidParameters(
                "deposit amount must be non-zero".into(),
            ));
        }
        let vault = self.require_vault(vault_id)?;
        let (Some(reward_asset), Some(conversion_time)) = (vault.reward_asset, vault.conversion_time)
        else {
            return Err(VaultError::RewardAssetNotSet(vault_id));
        };
        if self.config.deposit_policy == DepositPolicy::VaultOwner && ctx.caller != vault.owner {
            return Err(VaultError::Unauthorized(format!(
                "only the owner of vault {vault_id} may deposit"
            )));
        }
        if self.config.enforce_deposit_window && ctx.now >= conversion_time {
            return Err(VaultError::DepositClosed { conversion_time });
        }
        let total_deposited = vault
            .total_deposited
            .checked_add(amount)
            .ok_or(VaultError::Overflow)?;
        let available = self.ledger.balance(&reward_asset, &ctx.caller);
        if available < amount {
            return Err(VaultError::InsufficientBalance {
                needed: amount,
                available,
            });
        }

        let mut updated = vault.clone();
        updated.total_deposited = total_deposited;

        let mut commit = Commit::default();
        commit.batch.transfer(
            reward_asset,
            ctx.caller,
            vault_address(vault_id),
            amount,
            ctx.caller,
        );
        commit.vault = Some(updated);
        self.commit(commit)?;

        tracing::debug!(
            vault_id,
            depositor = %ctx.caller,
            amount,
            total_deposited,
            "reward deposited"
        );
        Ok(())
    }

    /// Redeem the caller's receipts for their share of the deposited reward.
    ///
    /// Pays `floor(burned * total_deposited / total_burned)` from custody,
    /// burns the caller's receipts and resets their position. Returns the
    /// amount paid.
    pub fn claim_reward_asset(
        &mut self,
        ctx: &CallContext,
        vault_id: VaultId,
    ) -> Result<u128, VaultError> {
        let vault = self.require_vault(vault_id)?;
        let mut user_vault = match self.user_vault(vault_id, &ctx.caller) {
            Some(uv) if uv.burned_amount > 0 => uv.clone(),
            _ => return Err(VaultError::NothingToClaim),
        };
        if let Some(reason) = vault.settlement_block(ctx.now) {
            return Err(VaultError::SettlementNotOpen(reason));
        }
        let reward_asset = vault
            .reward_asset
            .ok_or(VaultError::RewardAssetNotSet(vault_id))?;

        let burned = user_vault.burned_amount;
        let amount = payout(vault, burned)?;

        let mut updated = vault.clone();
        updated.total_settled = updated
            .total_settled
            .checked_add(burned)
            .ok_or(VaultError::Overflow)?;
        updated.total_paid_out = updated
            .total_paid_out
            .checked_add(amount)
            .ok_or(VaultError::Overflow)?;
        user_vault.burned_amount = 0;
        user_vault.total_claimed = user_vault
            .total_claimed
            .checked_add(amount)
            .ok_or(VaultError::Overflow)?;

        let custody = vault_address(vault_id);
        let mut commit = Commit::default();
        if amount > 0 {
            commit
                .batch
                .transfer(reward_asset, custody, ctx.caller, amount, custody);
        }
        commit
            .batch
            .burn(updated.receipt_asset, ctx.caller, burned, ctx.caller);
        commit.vault = Some(updated);
        commit.user_vault = Some(user_vault);
        self.commit(commit)?;

        tracing::debug!(
            vault_id,
            user = %ctx.caller,
            burned,
            payout = amount,
            "reward claimed"
        );
        Ok(amount)
    }
}
