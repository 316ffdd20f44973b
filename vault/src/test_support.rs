//! Shared fixtures for the engine's unit tests.

use dvault_ledger::MemoryLedger;
use dvault_nullables::NullMetadataRegistry;
use dvault_store::Ledger;
use dvault_types::{Address, AssetId, Timestamp, TokenMetadata, VaultId};

use crate::{CallContext, EngineConfig, VaultEngine};

pub type TestEngine = VaultEngine<MemoryLedger, NullMetadataRegistry>;

pub const ADMIN: u8 = 1;
pub const ALICE: u8 = 2;
pub const BOB: u8 = 3;
pub const PARTNER: u8 = 4;

pub fn addr(n: u8) -> Address {
    Address::new([n; 32])
}

pub fn ctx(who: u8, now: u64) -> CallContext {
    CallContext::new(addr(who), Timestamp::new(now))
}

pub fn gov_meta() -> TokenMetadata {
    TokenMetadata::new("Governance", "GOV", "https://example.org/gov.json")
}

pub fn staked_meta() -> TokenMetadata {
    TokenMetadata::new("Staked Governance", "stGOV", "https://example.org/stgov.json")
}

pub fn receipt_meta() -> TokenMetadata {
    TokenMetadata::new("Vote Receipt", "VOTE", "")
}

pub fn new_engine() -> TestEngine {
    new_engine_with(EngineConfig::default())
}

pub fn new_engine_with(config: EngineConfig) -> TestEngine {
    VaultEngine::new(MemoryLedger::new(), NullMetadataRegistry::new(), config)
}

pub fn new_engine_with_failing_metadata() -> TestEngine {
    VaultEngine::new(
        MemoryLedger::new(),
        NullMetadataRegistry::failing(),
        EngineConfig::default(),
    )
}

pub fn initialized_engine() -> TestEngine {
    let mut engine = new_engine();
    engine
        .initialize(&ctx(ADMIN, 0), gov_meta(), staked_meta())
        .unwrap();
    engine
}

/// Initialized engine where `who` holds `amount` of the staked asset.
pub fn staked_engine(holders: &[(u8, u128)]) -> TestEngine {
    let mut engine = initialized_engine();
    for &(who, amount) in holders {
        engine
            .issue_governance(&ctx(ADMIN, 0), &addr(who), amount)
            .unwrap();
        engine
            .convert_to_st_governance(&ctx(who, 0), amount)
            .unwrap();
    }
    engine
}

/// Adds vault `id` owned by the admin with the given cap and deadline.
pub fn with_vault(engine: &mut TestEngine, id: VaultId, cap: u128, deadline: u64) {
    engine
        .create_vault(&ctx(ADMIN, 0), id, cap, Timestamp::new(deadline), receipt_meta())
        .unwrap();
}

/// Registers an external reward asset issued by `PARTNER` and funds them.
pub fn reward_asset(engine: &mut TestEngine, amount: u128) -> AssetId {
    let asset = AssetId::new([0xAA; 32]);
    let partner = addr(PARTNER);
    let ledger = engine.ledger_mut();
    ledger.register_external_asset(asset, 6, partner).unwrap();
    if amount > 0 {
        let mut batch = dvault_store::LedgerBatch::new();
        batch.mint(asset, partner, amount, partner);
        ledger.apply(&batch).unwrap();
    }
    asset
}

pub fn gov_balance(engine: &TestEngine, who: u8) -> u128 {
    let asset = engine.global_state().unwrap().governance_asset;
    engine.ledger().balance(&asset, &addr(who))
}

pub fn staked_balance(engine: &TestEngine, who: u8) -> u128 {
    let asset = engine.global_state().unwrap().staked_asset;
    engine.ledger().balance(&asset, &addr(who))
}

pub fn receipt_balance(engine: &TestEngine, id: VaultId, who: u8) -> u128 {
    let asset = engine.vault(id).unwrap().receipt_asset;
    engine.ledger().balance(&asset, &addr(who))
}
