//! Governance → staked-governance conversion.

use dvault_crypto::global_state_address;
use dvault_store::{Ledger, MetadataRegistry};

use crate::context::CallContext;
use crate::engine::{Commit, VaultEngine};
use crate::error::VaultError;

impl<L: Ledger, M: MetadataRegistry> VaultEngine<L, M> {
    /// Burn `amount` of the caller's governance asset and mint the same
    /// amount of the staked asset to them, atomically.
    ///
    /// One-way: there is no operation converting back.
    pub fn convert_to_st_governance(
        &mut self,
        ctx: &CallContext,
        amount: u128,
    ) -> Result<(), VaultError> {
        let global = self.require_global()?;
        if amount == 0 {
            return Err(VaultError::InvalidParameters(
                "conversion amount must be non-zero".into(),
            ));
        }
        let available = self.ledger.balance(&global.governance_asset, &ctx.caller);
        if available < amount {
            return Err(VaultError::InsufficientBalance {
                needed: amount,
                available,
            });
        }

        let mut commit = Commit::default();
        commit
            .batch
            .burn(global.governance_asset, ctx.caller, amount, ctx.caller)
            .mint(global.staked_asset, ctx.caller, amount, global_state_address());
        self.commit(commit)?;

        tracing::debug!(user = %ctx.caller, amount, "converted to staked governance");
        Ok(())
    }
}
