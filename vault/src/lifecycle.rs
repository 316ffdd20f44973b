//! Vault creation.

use dvault_crypto::{receipt_asset, vault_address};
use dvault_store::{Ledger, MetadataRegistry};
use dvault_types::{Timestamp, TokenMetadata, VaultId};

use crate::context::CallContext;
use crate::engine::{Commit, VaultEngine};
use crate::error::VaultError;
use crate::state::Vault;

impl<L: Ledger, M: MetadataRegistry> VaultEngine<L, M> {
    /// Create vault `vault_id` with its receipt asset. Admin only.
    ///
    /// The caller becomes the vault owner; the vault account is the mint
    /// authority of the receipt asset.
    pub fn create_vault(
        &mut self,
        ctx: &CallContext,
        vault_id: VaultId,
        max_vote_cap: u128,
        deadline: Timestamp,
        receipt_meta: TokenMetadata,
    ) -> Result<(), VaultError> {
        let global = self.require_global()?;
        if ctx.caller != global.admin {
            return Err(VaultError::Unauthorized(format!(
                "{} is not the admin",
                ctx.caller
            )));
        }
        if self.vaults.contains_key(&vault_id) {
            return Err(VaultError::VaultAlreadyExists(vault_id));
        }
        if max_vote_cap == 0 {
            return Err(VaultError::InvalidParameters(
                "max vote cap must be non-zero".into(),
            ));
        }
        if deadline <= ctx.now {
            return Err(VaultError::InvalidParameters(format!(
                "deadline {deadline} is not after now ({})",
                ctx.now
            )));
        }
        self.config.check_metadata(&receipt_meta)?;

        let address = vault_address(vault_id);
        let vault = Vault {
            owner: ctx.caller,
            vault_id,
            governance_asset: global.governance_asset,
            staked_asset: global.staked_asset,
            receipt_asset: receipt_asset(&address),
            max_vote_cap,
            deadline,
            total_burned: 0,
            reward_asset: None,
            conversion_time: None,
            total_deposited: 0,
            total_settled: 0,
            total_paid_out: 0,
        };

        let mut commit = Commit::default();
        commit
            .batch
            .create_asset(vault.receipt_asset, self.config.decimals, address);
        let receipt = vault.receipt_asset;
        commit.vault = Some(vault);
        self.commit(commit)?;

        self.register_metadata(&receipt, &receipt_meta);

        tracing::debug!(
            vault_id,
            owner = %ctx.caller,
            max_vote_cap,
            deadline = deadline.as_secs(),
            "vault created"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::*;
    use crate::VaultError;
    use dvault_store::Ledger;
    use dvault_types::{Timestamp, TokenMetadata};

    #[test]
    fn creates_vault_with_empty_totals() {
        let mut engine = initialized_engine();
        engine
            .create_vault(&ctx(ADMIN, 0), 1, 1_000_000, Timestamp::new(10), receipt_meta())
            .unwrap();

        let vault = engine.vault(1).unwrap();
        assert_eq!(vault.owner, addr(ADMIN));
        assert_eq!(vault.total_burned, 0);
        assert_eq!(vault.reward_asset, None);
        assert_eq!(vault.conversion_time, None);
        let receipt = engine.ledger().asset(&vault.receipt_asset).unwrap();
        assert_eq!(receipt.supply, 0);
        assert_eq!(receipt.mint_authority, dvault_crypto::vault_address(1));
    }

    #[test]
    fn distinct_vaults_get_distinct_receipts() {
        let mut engine = initialized_engine();
        with_vault(&mut engine, 1, 100, 10);
        with_vault(&mut engine, 2, 100, 10);
        assert_ne!(
            engine.vault(1).unwrap().receipt_asset,
            engine.vault(2).unwrap().receipt_asset
        );
    }

    #[test]
    fn non_admin_rejected() {
        let mut engine = initialized_engine();
        let err = engine
            .create_vault(&ctx(ALICE, 0), 1, 100, Timestamp::new(10), receipt_meta())
            .unwrap_err();
        assert_eq!(err.kind(), "Unauthorized");
        assert!(engine.vault(1).is_none());
    }

    #[test]
    fn reused_id_rejected() {
        let mut engine = initialized_engine();
        with_vault(&mut engine, 1, 100, 10);
        let err = engine
            .create_vault(&ctx(ADMIN, 0), 1, 500, Timestamp::new(20), receipt_meta())
            .unwrap_err();
        assert!(matches!(err, VaultError::VaultAlreadyExists(1)));
        assert_eq!(engine.vault(1).unwrap().max_vote_cap, 100);
    }

    #[test]
    fn zero_cap_and_past_deadline_rejected() {
        let mut engine = initialized_engine();
        let err = engine
            .create_vault(&ctx(ADMIN, 5), 1, 0, Timestamp::new(10), receipt_meta())
            .unwrap_err();
        assert_eq!(err.kind(), "InvalidParameters");

        let err = engine
            .create_vault(&ctx(ADMIN, 5), 1, 10, Timestamp::new(5), receipt_meta())
            .unwrap_err();
        assert_eq!(err.kind(), "InvalidParameters");
    }

    #[test]
    fn long_uri_rejected() {
        let mut engine = initialized_engine();
        let meta = TokenMetadata::new("Vote", "VOTE", "x".repeat(201));
        let err = engine
            .create_vault(&ctx(ADMIN, 0), 1, 10, Timestamp::new(5), meta)
            .unwrap_err();
        assert_eq!(err.kind(), "InvalidParameters");
    }

    #[test]
    fn requires_initialization() {
        let mut engine = new_engine();
        let err = engine
            .create_vault(&ctx(ADMIN, 0), 1, 10, Timestamp::new(5), receipt_meta())
            .unwrap_err();
        assert!(matches!(err, VaultError::NotInitialized));
    }
}
