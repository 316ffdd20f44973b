//! Voting: burn stake into a vault, receive receipts 1:1.

use dvault_crypto::vault_address;
use dvault_store::{Ledger, MetadataRegistry};
use dvault_types::VaultId;

use crate::context::CallContext;
use crate::engine::{Commit, VaultEngine};
use crate::error::VaultError;
use crate::state::UserVault;

impl<L: Ledger, M: MetadataRegistry> VaultEngine<L, M> {
    /// Burn `amount` of the caller's staked asset into `vault_id` and mint
    /// the same amount of the vault's receipt asset to them.
    ///
    /// Accepted strictly before the deadline and only while the vault's
    /// total stays within its cap. The caller's position is created on
    /// their first vote.
    pub fn vote(
        &mut self,
        ctx: &CallContext,
        vault_id: VaultId,
        amount: u128,
    ) -> Result<(), VaultError> {
        if amount == 0 {
            return Err(VaultError::InvalidParameters(
                "vote amount must be non-zero".into(),
            ));
        }
        let vault = self.require_vault(vault_id)?;
        if !vault.is_voting_open(ctx.now) {
            return Err(VaultError::VotingPeriodEnded {
                deadline: vault.deadline,
                now: ctx.now,
            });
        }
        let new_total = vault
            .total_burned
            .checked_add(amount)
            .ok_or(VaultError::Overflow)?;
        if new_total > vault.max_vote_cap {
            return Err(VaultError::CapExceeded {
                requested: amount,
                remaining: vault.remaining_cap(),
            });
        }
        let available = self.ledger.balance(&vault.staked_asset, &ctx.caller);
        if available < amount {
            return Err(VaultError::InsufficientBalance {
                needed: amount,
                available,
            });
        }

        let mut user_vault = self
            .user_vault(vault_id, &ctx.caller)
            .cloned()
            .unwrap_or_else(|| UserVault::new(vault_id, ctx.caller));
        user_vault.burned_amount = user_vault
            .burned_amount
            .checked_add(amount)
            .ok_or(VaultError::Overflow)?;

        let mut updated = vault.clone();
        updated.total_burned = new_total;

        let mut commit = Commit::default();
        commit
            .batch
            .burn(updated.staked_asset, ctx.caller, amount, ctx.caller)
            .mint(
                updated.receipt_asset,
                ctx.caller,
                amount,
                vault_address(vault_id),
            );
        commit.vault = Some(updated);
        commit.user_vault = Some(user_vault);
        self.commit(commit)?;

        tracing::debug!(
            vault_id,
            voter = %ctx.caller,
            amount,
            total_burned = new_total,
            "vote recorded"
        );
        Ok(())
    }
}
