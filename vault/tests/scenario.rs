//! End-to-end lifecycle: initialize, convert, vote, settle, claim.

use dvault_crypto::identity_from_label;
use dvault_ledger::MemoryLedger;
use dvault_nullables::{NullClock, NullMetadataRegistry};
use dvault_store::{Ledger, LedgerBatch};
use dvault_types::{Address, AssetId, TokenMetadata};
use dvault_vault::{CallContext, EngineConfig, VaultEngine, VaultError};

struct World {
    engine: VaultEngine<MemoryLedger, NullMetadataRegistry>,
    clock: NullClock,
    admin: Address,
    user: Address,
    partner: Address,
    project: AssetId,
}

impl World {
    fn ctx(&self, who: Address) -> CallContext {
        CallContext::new(who, self.clock.now())
    }

    fn governance(&self) -> u128 {
        let g = self.engine.global_state().unwrap().governance_asset;
        self.engine.ledger().balance(&g, &self.user)
    }

    fn staked(&self) -> u128 {
        let s = self.engine.global_state().unwrap().staked_asset;
        self.engine.ledger().balance(&s, &self.user)
    }

    fn receipts(&self) -> u128 {
        let r = self.engine.vault(1).unwrap().receipt_asset;
        self.engine.ledger().balance(&r, &self.user)
    }

    fn rewards(&self) -> u128 {
        self.engine.ledger().balance(&self.project, &self.user)
    }
}

/// Scenario 1: initialize; the user converts 500 of 1000 governance tokens.
fn initialized_world() -> World {
    let clock = NullClock::new(1_700_000_000);
    let mut engine = VaultEngine::new(
        MemoryLedger::new(),
        NullMetadataRegistry::new(),
        EngineConfig::default(),
    );
    let admin = identity_from_label("admin");
    let user = identity_from_label("user");
    let partner = identity_from_label("partnership");

    engine
        .initialize(
            &CallContext::new(admin, clock.now()),
            TokenMetadata::new("DAO Governance", "GOV", "https://dao.example/gov.json"),
            TokenMetadata::new("Staked DAO Governance", "stGOV", "https://dao.example/st.json"),
        )
        .unwrap();
    engine
        .issue_governance(&CallContext::new(admin, clock.now()), &user, 1000)
        .unwrap();

    let project = AssetId::new([0x50; 32]);
    let ledger = engine.ledger_mut();
    ledger.register_external_asset(project, 6, partner).unwrap();
    let mut batch = LedgerBatch::new();
    batch.mint(project, partner, 1000, partner);
    ledger.apply(&batch).unwrap();

    World {
        engine,
        clock,
        admin,
        user,
        partner,
        project,
    }
}

fn converted_world() -> World {
    let mut w = initialized_world();
    let ctx = w.ctx(w.user);
    w.engine.convert_to_st_governance(&ctx, 500).unwrap();
    w
}

/// Scenario 2: vault 1, cap 1,000,000, deadline +10s; the user votes 100.
fn voted_world() -> World {
    let mut w = converted_world();
    let deadline = w.clock.now().plus_secs(10);
    let ctx = w.ctx(w.admin);
    w.engine
        .create_vault(
            &ctx,
            1,
            1_000_000,
            deadline,
            TokenMetadata::new("Vault 1 Vote", "V1", ""),
        )
        .unwrap();
    let ctx = w.ctx(w.user);
    w.engine.vote(&ctx, 1, 100).unwrap();
    w
}

/// Scenario 4: after the deadline the admin sets the reward asset with
/// conversion time +10s; the partnership deposits 1000.
fn deposited_world() -> World {
    let mut w = voted_world();
    w.clock.advance(11);
    let conversion_time = w.clock.now().plus_secs(10);
    let ctx = w.ctx(w.admin);
    w.engine
        .set_project_token(&ctx, 1, w.project, conversion_time)
        .unwrap();
    let ctx = w.ctx(w.partner);
    w.engine.deposit_reward_asset(&ctx, 1, 1000).unwrap();
    w
}

#[test]
fn scenario_1_convert_half() {
    let w = converted_world();
    assert_eq!(w.governance(), 500);
    assert_eq!(w.staked(), 500);
}

#[test]
fn scenario_2_vote() {
    let w = voted_world();
    let vault = w.engine.vault(1).unwrap();
    assert_eq!(vault.total_burned, 100);
    assert_eq!(w.staked(), 400);
    assert_eq!(w.receipts(), 100);
    assert_eq!(w.engine.user_vault(1, &w.user).unwrap().burned_amount, 100);
    w.engine.check_invariants(1).unwrap();
}

#[test]
fn scenario_3_vote_after_deadline() {
    let mut w = voted_world();
    w.clock.advance(11);
    let ctx = w.ctx(w.user);
    let err = w.engine.vote(&ctx, 1, 50).unwrap_err();
    assert!(matches!(err, VaultError::VotingPeriodEnded { .. }));
    assert!(!err.is_retryable());

    assert_eq!(w.staked(), 400);
    assert_eq!(w.receipts(), 100);
    assert_eq!(w.engine.vault(1).unwrap().total_burned, 100);
    assert_eq!(w.engine.user_vault(1, &w.user).unwrap().burned_amount, 100);
}

#[test]
fn scenario_4_reward_deposit() {
    let w = deposited_world();
    let vault = w.engine.vault(1).unwrap();
    assert_eq!(vault.reward_asset, Some(w.project));
    assert_eq!(vault.total_deposited, 1000);
    assert_eq!(w.engine.ledger().balance(&w.project, &w.partner), 0);
    w.engine.check_invariants(1).unwrap();
}

#[test]
fn scenario_5_claim() {
    let mut w = deposited_world();

    let ctx = w.ctx(w.user);
    let err = w.engine.claim_reward_asset(&ctx, 1).unwrap_err();
    assert!(matches!(err, VaultError::SettlementNotOpen(_)));
    assert!(err.is_retryable());

    w.clock.advance(11);
    let ctx = w.ctx(w.user);
    let paid = w.engine.claim_reward_asset(&ctx, 1).unwrap();
    assert_eq!(paid, 1000);
    assert_eq!(w.rewards(), 1000);
    assert_eq!(w.receipts(), 0);
    assert_eq!(w.engine.user_vault(1, &w.user).unwrap().burned_amount, 0);
    w.engine.check_invariants(1).unwrap();

    let err = w.engine.claim_reward_asset(&ctx, 1).unwrap_err();
    assert!(matches!(err, VaultError::NothingToClaim));
    assert_eq!(w.rewards(), 1000);
}

#[test]
fn metadata_registered_for_every_created_asset() {
    let w = voted_world();
    let registry = w.engine.metadata();
    let global = w.engine.global_state().unwrap();
    assert_eq!(registry.registrations().len(), 3);
    assert_eq!(registry.get(&global.governance_asset).unwrap().symbol, "GOV");
    assert_eq!(registry.get(&global.staked_asset).unwrap().symbol, "stGOV");
    let receipt = w.engine.vault(1).unwrap().receipt_asset;
    assert_eq!(registry.get(&receipt).unwrap().symbol, "V1");
}

#[test]
fn independent_engines_share_nothing() {
    let a = voted_world();
    let b = initialized_world();
    assert!(a.engine.vault(1).is_some());
    assert!(b.engine.vault(1).is_none());
}
