//! Global registry: one-time setup and governance issuance.

use dvault_crypto::{global_state_address, governance_asset, staked_asset};
use dvault_store::{Ledger, MetadataRegistry};
use dvault_types::{Address, TokenMetadata};

use crate::context::CallContext;
use crate::engine::{Commit, VaultEngine};
use crate::error::VaultError;
use crate::state::GlobalState;

impl<L: Ledger, M: MetadataRegistry> VaultEngine<L, M> {
    /// Create the governance and staked assets and record the caller as admin.
    ///
    /// Both assets are minted by the global-state account. Callable once.
    pub fn initialize(
        &mut self,
        ctx: &CallContext,
        governance_meta: TokenMetadata,
        staked_meta: TokenMetadata,
    ) -> Result<(), VaultError> {
        if self.global.is_some() {
            return Err(VaultError::AlreadyInitialized);
        }
        self.config.check_metadata(&governance_meta)?;
        self.config.check_metadata(&staked_meta)?;

        let authority = global_state_address();
        let global = GlobalState {
            admin: ctx.caller,
            governance_asset: governance_asset(),
            staked_asset: staked_asset(),
        };

        let mut commit = Commit::default();
        commit
            .batch
            .create_asset(global.governance_asset, self.config.decimals, authority)
            .create_asset(global.staked_asset, self.config.decimals, authority);
        commit.global = Some(global.clone());
        self.commit(commit)?;

        self.register_metadata(&global.governance_asset, &governance_meta);
        self.register_metadata(&global.staked_asset, &staked_meta);

        tracing::debug!(
            admin = %ctx.caller,
            governance = %global.governance_asset,
            staked = %global.staked_asset,
            "engine initialized"
        );
        Ok(())
    }

    /// Mint `amount` of the governance asset to `recipient`. Admin only.
    pub fn issue_governance(
        &mut self,
        ctx: &CallContext,
        recipient: &Address,
        amount: u128,
    ) -> Result<(), VaultError> {
        let global = self.require_global()?;
        if ctx.caller != global.admin {
            return Err(VaultError::Unauthorized(format!(
                "{} is not the admin",
                ctx.caller
            )));
        }
        if amount == 0 {
            return Err(VaultError::InvalidParameters(
                "issue amount must be non-zero".into(),
            ));
        }

        let mut commit = Commit::default();
        commit.batch.mint(
            global.governance_asset,
            *recipient,
            amount,
            global_state_address(),
        );
        self.commit(commit)?;

        tracing::debug!(recipient = %recipient, amount, "governance issued");
        Ok(())
    }
}
