use proptest::prelude::*;

use dvault_ledger::MemoryLedger;
use dvault_nullables::NullMetadataRegistry;
use dvault_store::{Ledger, LedgerBatch};
use dvault_types::{Address, AssetId, Timestamp, TokenMetadata};
use dvault_vault::{CallContext, EngineConfig, VaultEngine, VaultError};

type Engine = VaultEngine<MemoryLedger, NullMetadataRegistry>;

const ADMIN: u8 = 200;
const PARTNER: u8 = 201;
const DEADLINE: u64 = 1_000;
const CONVERSION: u64 = 2_000;

fn addr(n: u8) -> Address {
    Address::new([n; 32])
}

fn ctx(who: u8, now: u64) -> CallContext {
    CallContext::new(addr(who), Timestamp::new(now))
}

fn meta(symbol: &str) -> TokenMetadata {
    TokenMetadata::new(symbol, symbol, "")
}

/// Engine with vault 1 (deadline 1000) where each of `voters` holds
/// `stake` of the staked asset.
fn engine_with_voters(voters: u8, stake: u128, cap: u128) -> Engine {
    let mut engine = VaultEngine::new(
        MemoryLedger::new(),
        NullMetadataRegistry::new(),
        EngineConfig::default(),
    );
    engine.initialize(&ctx(ADMIN, 0), meta("GOV"), meta("stGOV")).unwrap();
    for v in 0..voters {
        engine.issue_governance(&ctx(ADMIN, 0), &addr(v), stake).unwrap();
        engine.convert_to_st_governance(&ctx(v, 0), stake).unwrap();
    }
    engine
        .create_vault(&ctx(ADMIN, 0), 1, cap, Timestamp::new(DEADLINE), meta("VOTE"))
        .unwrap();
    engine
}

fn fund_rewards(engine: &mut Engine, amount: u128) -> AssetId {
    let asset = AssetId::new([0xEE; 32]);
    let ledger = engine.ledger_mut();
    ledger.register_external_asset(asset, 6, addr(PARTNER)).unwrap();
    if amount > 0 {
        let mut batch = LedgerBatch::new();
        batch.mint(asset, addr(PARTNER), amount, addr(PARTNER));
        ledger.apply(&batch).unwrap();
    }
    engine
        .set_project_token(&ctx(ADMIN, DEADLINE), 1, asset, Timestamp::new(CONVERSION))
        .unwrap();
    if amount > 0 {
        engine
            .deposit_reward_asset(&ctx(PARTNER, DEADLINE), 1, amount)
            .unwrap();
    }
    asset
}

proptest! {
    /// Accepted votes sum to the vault total, which never exceeds the cap,
    /// and always equals the sum of per-user burns.
    #[test]
    fn vote_totals_track_accepted_amounts(
        cap in 1u128..5_000,
        votes in prop::collection::vec((0u8..4, 1u128..2_000), 1..30),
    ) {
        let mut engine = engine_with_voters(4, 10_000, cap);
        let mut accepted = 0u128;
        for (i, (voter, amount)) in votes.into_iter().enumerate() {
            match engine.vote(&ctx(voter, i as u64), 1, amount) {
                Ok(()) => accepted += amount,
                Err(VaultError::CapExceeded { .. }) | Err(VaultError::InsufficientBalance { .. }) => {}
                Err(e) => prop_assert!(false, "unexpected error: {e}"),
            }
            let vault = engine.vault(1).unwrap();
            prop_assert_eq!(vault.total_burned, accepted);
            prop_assert!(vault.total_burned <= cap);
            prop_assert!(engine.check_invariants(1).is_ok());
        }
    }

    /// Votes at or after the deadline change nothing.
    #[test]
    fn late_votes_rejected_without_effect(
        amount in 1u128..1_000,
        late_by in 0u64..10_000,
    ) {
        let mut engine = engine_with_voters(1, 1_000, 10_000);
        let staked = engine.global_state().unwrap().staked_asset;
        let before = engine.ledger().balance(&staked, &addr(0));
        let result = engine.vote(&ctx(0, DEADLINE + late_by), 1, amount);
        let ended = matches!(result, Err(VaultError::VotingPeriodEnded { .. }));
        prop_assert!(ended);
        prop_assert_eq!(engine.ledger().balance(&staked, &addr(0)), before);
        prop_assert_eq!(engine.vault(1).unwrap().total_burned, 0);
        prop_assert!(engine.user_vault(1, &addr(0)).is_none());
    }

    /// Payouts never exceed deposits; a second claim pays nothing.
    #[test]
    fn claims_conserve_deposits(
        burns in prop::collection::vec(1u128..10_000, 1..8),
        deposit in 0u128..1_000_000_000,
    ) {
        let voters = burns.len() as u8;
        let mut engine = engine_with_voters(voters, 10_000, u128::MAX);
        for (v, amount) in burns.iter().enumerate() {
            engine.vote(&ctx(v as u8, 1), 1, *amount).unwrap();
        }
        let asset = fund_rewards(&mut engine, deposit);

        let mut paid = 0u128;
        for v in 0..voters {
            paid += engine.claim_reward_asset(&ctx(v, CONVERSION), 1).unwrap();
            let again = engine.claim_reward_asset(&ctx(v, CONVERSION + 1), 1);
            prop_assert!(matches!(again, Err(VaultError::NothingToClaim)));
        }
        prop_assert!(paid <= deposit);
        // floor loses at most one unit per claimant
        prop_assert!(deposit - paid < voters as u128 || deposit == 0);
        let received: u128 = (0..voters).map(|v| engine.ledger().balance(&asset, &addr(v))).sum();
        prop_assert_eq!(received, paid);
        prop_assert!(engine.check_invariants(1).is_ok());
    }

    /// Conversion moves exactly `amount` between the two assets.
    #[test]
    fn conversion_round_trip(
        balance in 1u128..1_000_000,
        amount in 1u128..1_000_000,
    ) {
        let mut engine = engine_with_voters(0, 0, 1);
        engine.issue_governance(&ctx(ADMIN, 0), &addr(7), balance).unwrap();
        let global = engine.global_state().unwrap().clone();
        let result = engine.convert_to_st_governance(&ctx(7, 0), amount);
        let gov = engine.ledger().balance(&global.governance_asset, &addr(7));
        let staked = engine.ledger().balance(&global.staked_asset, &addr(7));
        if amount <= balance {
            prop_assert!(result.is_ok());
            prop_assert_eq!(gov, balance - amount);
            prop_assert_eq!(staked, amount);
        } else {
            prop_assert!(result.is_err());
            prop_assert_eq!(gov, balance);
            prop_assert_eq!(staked, 0);
        }
    }
}
