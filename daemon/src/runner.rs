//! Replays a [`Scenario`] against a fresh engine over an in-memory ledger.

use std::collections::BTreeMap;

use anyhow::{bail, Context};
use dvault_crypto::{decode_address, derive_address, encode_address, identity_from_label};
use dvault_ledger::MemoryLedger;
use dvault_nullables::NullMetadataRegistry;
use dvault_store::{Ledger, LedgerBatch};
use dvault_types::{Address, AssetId, Timestamp, TokenMetadata};
use dvault_vault::{CallContext, EngineConfig, VaultEngine, VaultError};
use serde::Serialize;

use crate::scenario::{MetadataSpec, OpKind, Scenario, Step};

type Engine = VaultEngine<MemoryLedger, NullMetadataRegistry>;

/// Outcome of one step.
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub index: usize,
    pub op: &'static str,
    pub caller: String,
    pub at: u64,
    /// `None` on success, otherwise the error kind.
    pub error: Option<String>,
    pub expected: bool,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub admin: Option<String>,
    pub vaults: Vec<VaultReport>,
    pub participants: BTreeMap<String, ParticipantReport>,
}

#[derive(Debug, Serialize)]
pub struct VaultReport {
    pub vault_id: u64,
    pub address: String,
    pub max_vote_cap: u128,
    pub deadline: u64,
    pub total_burned: u128,
    pub total_settled: u128,
    pub reward_asset: Option<String>,
    pub conversion_time: Option<u64>,
    pub total_deposited: u128,
    pub total_paid_out: u128,
    pub receipt_supply: u128,
    pub positions: BTreeMap<String, u128>,
}

#[derive(Debug, Default, Serialize)]
pub struct ParticipantReport {
    pub address: String,
    pub governance: u128,
    pub staked: u128,
    pub receipts: BTreeMap<u64, u128>,
    pub rewards: BTreeMap<String, u128>,
}

pub struct Runner {
    engine: Engine,
    /// Scenario time; only ever moves forward.
    now: Timestamp,
    /// Labels in order of first use.
    labels: Vec<String>,
    assets: BTreeMap<String, AssetId>,
}

/// Identity for a scenario participant: a `dv_` address stands for itself,
/// anything else is a label.
pub fn resolve_identity(label: &str) -> Address {
    decode_address(label).unwrap_or_else(|| identity_from_label(label))
}

/// Asset id for an external asset label.
pub fn external_asset(label: &str) -> AssetId {
    AssetId::from(derive_address(&[b"external_asset", label.as_bytes()]))
}

fn default_metadata(symbol: &str, name: &str) -> TokenMetadata {
    TokenMetadata::new(name, symbol, "")
}

impl Runner {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            engine: VaultEngine::new(MemoryLedger::new(), NullMetadataRegistry::new(), config),
            now: Timestamp::new(0),
            labels: Vec::new(),
            assets: BTreeMap::new(),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Scenario clock after the last executed step.
    pub fn now(&self) -> Timestamp {
        self.now
    }

    fn identity(&mut self, label: &str) -> Address {
        if !self.labels.iter().any(|l| l == label) {
            self.labels.push(label.to_string());
        }
        resolve_identity(label)
    }

    fn asset(&self, label: &str) -> AssetId {
        self.assets
            .get(label)
            .copied()
            .unwrap_or_else(|| external_asset(label))
    }

    /// Create external assets and mint their initial balances.
    pub fn setup(&mut self, scenario: &Scenario) -> anyhow::Result<()> {
        for spec in &scenario.assets {
            let asset = external_asset(&spec.label);
            let issuer = self.identity(&spec.issuer);
            self.engine
                .ledger_mut()
                .register_external_asset(asset, spec.decimals, issuer)
                .with_context(|| format!("creating asset '{}'", spec.label))?;
            self.assets.insert(spec.label.clone(), asset);
            tracing::debug!(label = %spec.label, issuer = %spec.issuer, "external asset created");
        }
        for fund in &scenario.funds {
            let Some(&asset) = self.assets.get(&fund.asset) else {
                bail!("fund references undeclared asset '{}'", fund.asset);
            };
            let Some(info) = self.engine.ledger().asset(&asset) else {
                bail!("asset '{}' missing from ledger", fund.asset);
            };
            let to = self.identity(&fund.to);
            let mut batch = LedgerBatch::new();
            batch.mint(asset, to, u128::from(fund.amount), info.mint_authority);
            self.engine
                .ledger_mut()
                .apply(&batch)
                .with_context(|| format!("funding '{}' with '{}'", fund.to, fund.asset))?;
        }
        Ok(())
    }

    /// Execute one step. Engine errors are reported in the outcome; a
    /// malformed step is an `Err`.
    pub fn step(&mut self, index: usize, step: &Step) -> anyhow::Result<StepOutcome> {
        if let Some(at) = step.at {
            if at < self.now.as_secs() {
                tracing::warn!(step = index, at, "clock cannot move backwards, keeping current time");
            } else {
                self.now = Timestamp::new(at);
            }
        }
        let caller = self.identity(&step.caller);
        let ctx = CallContext::new(caller, self.now);

        let result = self.dispatch(&ctx, step)?;
        let error = result.err();
        let expected = match (&error, &step.expect_error) {
            (None, None) => true,
            (Some(err), Some(kind)) => err.kind() == kind.as_str(),
            _ => false,
        };
        if let Some(err) = &error {
            tracing::debug!(step = index, op = step.op.as_str(), error = %err, "step failed");
        }
        Ok(StepOutcome {
            index,
            op: step.op.as_str(),
            caller: step.caller.clone(),
            at: ctx.now.as_secs(),
            error: error.map(|e| e.kind().to_string()),
            expected,
        })
    }

    fn dispatch(
        &mut self,
        ctx: &CallContext,
        step: &Step,
    ) -> anyhow::Result<Result<(), VaultError>> {
        let meta = |spec: &Option<MetadataSpec>, symbol: &str, name: &str| {
            spec.as_ref()
                .map(TokenMetadata::from)
                .unwrap_or_else(|| default_metadata(symbol, name))
        };

        let result = match step.op {
            OpKind::Initialize => self.engine.initialize(
                ctx,
                meta(&step.metadata, "GOV", "Governance"),
                meta(&step.staked_metadata, "stGOV", "Staked Governance"),
            ),
            OpKind::IssueGovernance => {
                let recipient = self.identity(step.recipient()?);
                self.engine.issue_governance(ctx, &recipient, step.amount()?)
            }
            OpKind::Convert => self.engine.convert_to_st_governance(ctx, step.amount()?),
            OpKind::CreateVault => self.engine.create_vault(
                ctx,
                step.vault_id()?,
                step.max_vote_cap()?,
                Timestamp::new(step.deadline()?),
                meta(&step.metadata, "VOTE", "Vote Receipt"),
            ),
            OpKind::Vote => self.engine.vote(ctx, step.vault_id()?, step.amount()?),
            OpKind::SetProjectToken => {
                let asset = self.asset(step.reward_asset()?);
                self.engine.set_project_token(
                    ctx,
                    step.vault_id()?,
                    asset,
                    Timestamp::new(step.conversion_time()?),
                )
            }
            OpKind::Deposit => {
                self.engine
                    .deposit_reward_asset(ctx, step.vault_id()?, step.amount()?)
            }
            OpKind::Claim => self
                .engine
                .claim_reward_asset(ctx, step.vault_id()?)
                .map(|_| ()),
        };
        Ok(result)
    }

    /// Run every step in order, stopping at the first outcome that does not
    /// match its expectation, then verify every vault's invariants.
    pub fn run(&mut self, scenario: &Scenario) -> anyhow::Result<Vec<StepOutcome>> {
        self.setup(scenario)?;
        let mut outcomes = Vec::with_capacity(scenario.steps.len());
        for (i, step) in scenario.steps.iter().enumerate() {
            let index = i + 1;
            let outcome = self
                .step(index, step)
                .with_context(|| format!("step {index}"))?;
            tracing::info!(
                step = index,
                op = outcome.op,
                caller = %outcome.caller,
                at = outcome.at,
                error = outcome.error.as_deref().unwrap_or("none"),
                "step executed"
            );
            if !outcome.expected {
                let op = step.op.as_str();
                match &outcome.error {
                    Some(kind) => bail!("step {index} ({op}) failed with {kind}"),
                    None => bail!(
                        "step {index} ({op}) succeeded but {} was expected",
                        step.expect_error.as_deref().unwrap_or("an error")
                    ),
                }
            }
            outcomes.push(outcome);
        }
        for vault in self.engine.vaults() {
            self.engine.check_invariants(vault.vault_id)?;
        }
        Ok(outcomes)
    }

    /// Snapshot of every vault and every labelled participant.
    pub fn report(&self) -> Report {
        let engine = &self.engine;
        let ledger = engine.ledger();
        let name_of = |addr: &Address| -> String {
            self.labels
                .iter()
                .find(|l| resolve_identity(l) == *addr)
                .cloned()
                .unwrap_or_else(|| encode_address(addr))
        };
        let asset_name = |asset: &AssetId| -> String {
            self.assets
                .iter()
                .find(|(_, a)| *a == asset)
                .map(|(l, _)| l.clone())
                .unwrap_or_else(|| asset.to_string())
        };

        let vaults = engine
            .vaults()
            .into_iter()
            .map(|v| VaultReport {
                vault_id: v.vault_id,
                address: encode_address(&dvault_crypto::vault_address(v.vault_id)),
                max_vote_cap: v.max_vote_cap,
                deadline: v.deadline.as_secs(),
                total_burned: v.total_burned,
                total_settled: v.total_settled,
                reward_asset: v.reward_asset.as_ref().map(&asset_name),
                conversion_time: v.conversion_time.map(|t| t.as_secs()),
                total_deposited: v.total_deposited,
                total_paid_out: v.total_paid_out,
                receipt_supply: ledger.asset(&v.receipt_asset).map(|a| a.supply).unwrap_or(0),
                positions: engine
                    .user_vaults(v.vault_id)
                    .into_iter()
                    .map(|uv| (name_of(&uv.user), uv.burned_amount))
                    .collect(),
            })
            .collect();

        let mut participants = BTreeMap::new();
        for label in &self.labels {
            let address = resolve_identity(label);
            let mut report = ParticipantReport {
                address: encode_address(&address),
                ..Default::default()
            };
            if let Some(global) = engine.global_state() {
                report.governance = ledger.balance(&global.governance_asset, &address);
                report.staked = ledger.balance(&global.staked_asset, &address);
            }
            for v in engine.vaults() {
                let held = ledger.balance(&v.receipt_asset, &address);
                if held > 0 {
                    report.receipts.insert(v.vault_id, held);
                }
            }
            for (asset_label, asset) in &self.assets {
                let held = ledger.balance(asset, &address);
                if held > 0 {
                    report.rewards.insert(asset_label.clone(), held);
                }
            }
            participants.insert(label.clone(), report);
        }

        Report {
            admin: engine.global_state().map(|g| name_of(&g.admin)),
            vaults,
            participants,
        }
    }
}
