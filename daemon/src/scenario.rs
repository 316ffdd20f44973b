//! Scenario files: a TOML description of assets, balances and a sequence of
//! engine calls.
//!
//! ```toml
//! [[asset]]
//! label = "project"
//! issuer = "partner"
//!
//! [[fund]]
//! asset = "project"
//! to = "partner"
//! amount = 1000
//!
//! [[step]]
//! op = "initialize"
//! caller = "admin"
//!
//! [[step]]
//! op = "vote"
//! caller = "alice"
//! at = 5
//! vault_id = 1
//! amount = 100
//! expect_error = "VotingPeriodEnded"
//! ```

use std::path::Path;

use anyhow::{anyhow, Context};
use dvault_types::{TokenMetadata, DEFAULT_DECIMALS};
use dvault_vault::EngineConfig;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Scenario {
    /// Engine configuration; a `--config` file takes precedence.
    #[serde(default)]
    pub config: Option<EngineConfig>,
    #[serde(default, rename = "asset")]
    pub assets: Vec<AssetSpec>,
    #[serde(default, rename = "fund")]
    pub funds: Vec<FundSpec>,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

/// An asset that exists outside the engine, such as a partner's project token.
#[derive(Debug, Deserialize)]
pub struct AssetSpec {
    pub label: String,
    /// Label of the identity allowed to mint it.
    pub issuer: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
}

/// Initial balance of an external asset.
#[derive(Debug, Deserialize)]
pub struct FundSpec {
    pub asset: String,
    pub to: String,
    pub amount: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    Initialize,
    IssueGovernance,
    Convert,
    CreateVault,
    Vote,
    SetProjectToken,
    Deposit,
    Claim,
}

impl OpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::IssueGovernance => "issue_governance",
            Self::Convert => "convert",
            Self::CreateVault => "create_vault",
            Self::Vote => "vote",
            Self::SetProjectToken => "set_project_token",
            Self::Deposit => "deposit",
            Self::Claim => "claim",
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct MetadataSpec {
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub uri: String,
}

impl From<&MetadataSpec> for TokenMetadata {
    fn from(spec: &MetadataSpec) -> Self {
        TokenMetadata::new(spec.name.clone(), spec.symbol.clone(), spec.uri.clone())
    }
}

/// One engine call. Which of the optional arguments are required depends on
/// `op`.
#[derive(Debug, Deserialize)]
pub struct Step {
    pub op: OpKind,
    pub caller: String,
    /// Clock value for this call; omitted means "same time as the previous
    /// step".
    pub at: Option<u64>,
    /// Error kind this step must fail with.
    pub expect_error: Option<String>,

    pub amount: Option<u64>,
    pub recipient: Option<String>,
    pub vault_id: Option<u64>,
    pub max_vote_cap: Option<u64>,
    pub deadline: Option<u64>,
    pub reward_asset: Option<String>,
    pub conversion_time: Option<u64>,
    /// Governance metadata for `initialize`, receipt metadata for `create_vault`.
    pub metadata: Option<MetadataSpec>,
    /// Staked-asset metadata for `initialize`.
    pub staked_metadata: Option<MetadataSpec>,
}

fn default_decimals() -> u8 {
    DEFAULT_DECIMALS
}

impl Step {
    fn missing(&self, field: &str) -> anyhow::Error {
        anyhow!("{} step is missing `{field}`", self.op.as_str())
    }

    pub fn amount(&self) -> anyhow::Result<u128> {
        self.amount
            .map(u128::from)
            .ok_or_else(|| self.missing("amount"))
    }

    pub fn vault_id(&self) -> anyhow::Result<u64> {
        self.vault_id.ok_or_else(|| self.missing("vault_id"))
    }

    pub fn recipient(&self) -> anyhow::Result<&str> {
        self.recipient
            .as_deref()
            .ok_or_else(|| self.missing("recipient"))
    }

    pub fn max_vote_cap(&self) -> anyhow::Result<u128> {
        self.max_vote_cap
            .map(u128::from)
            .ok_or_else(|| self.missing("max_vote_cap"))
    }

    pub fn deadline(&self) -> anyhow::Result<u64> {
        self.deadline.ok_or_else(|| self.missing("deadline"))
    }

    pub fn reward_asset(&self) -> anyhow::Result<&str> {
        self.reward_asset
            .as_deref()
            .ok_or_else(|| self.missing("reward_asset"))
    }

    pub fn conversion_time(&self) -> anyhow::Result<u64> {
        self.conversion_time
            .ok_or_else(|| self.missing("conversion_time"))
    }
}

impl Scenario {
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let scenario: Self = toml::from_str(s).context("invalid scenario")?;
        if let Some(config) = &scenario.config {
            config.validate()?;
        }
        Ok(scenario)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_toml_str(&content)
    }
}
