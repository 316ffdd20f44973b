//! Engine configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use dvault_types::{TokenMetadata, DEFAULT_DECIMALS};

use crate::VaultError;

/// Who may deposit the reward asset into a vault.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositPolicy {
    /// Any identity holding the reward asset.
    Open,
    /// Only the vault's owner.
    VaultOwner,
}

/// Configuration for a [`crate::VaultEngine`].
///
/// Can be loaded from a TOML file via [`EngineConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Decimal places of every asset the engine creates.
    #[serde(default = "default_decimals")]
    pub decimals: u8,

    #[serde(default = "default_max_name_len")]
    pub max_name_len: usize,

    #[serde(default = "default_max_symbol_len")]
    pub max_symbol_len: usize,

    #[serde(default = "default_max_uri_len")]
    pub max_uri_len: usize,

    #[serde(default = "default_deposit_policy")]
    pub deposit_policy: DepositPolicy,

    /// Reject deposits at or after the vault's conversion time.
    #[serde(default = "default_true")]
    pub enforce_deposit_window: bool,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_decimals() -> u8 {
    DEFAULT_DECIMALS
}

fn default_max_name_len() -> usize {
    32
}

fn default_max_symbol_len() -> usize {
    10
}

fn default_max_uri_len() -> usize {
    200
}

fn default_deposit_policy() -> DepositPolicy {
    DepositPolicy::Open
}

fn default_true() -> bool {
    true
}

// ── Impl ───────────────────────────────────────────────────────────────

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, VaultError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| VaultError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, VaultError> {
        let config: Self = toml::from_str(s).map_err(|e| VaultError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, VaultError> {
        toml::to_string_pretty(self).map_err(|e| VaultError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), VaultError> {
        if self.decimals > 18 {
            return Err(VaultError::Config(format!(
                "decimals must be at most 18, got {}",
                self.decimals
            )));
        }
        Ok(())
    }

    /// Check token metadata against the configured length limits.
    pub fn check_metadata(&self, metadata: &TokenMetadata) -> Result<(), VaultError> {
        metadata
            .check_limits(self.max_name_len, self.max_symbol_len, self.max_uri_len)
            .map_err(VaultError::InvalidParameters)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            decimals: default_decimals(),
            max_name_len: default_max_name_len(),
            max_symbol_len: default_max_symbol_len(),
            max_uri_len: default_max_uri_len(),
            deposit_policy: default_deposit_policy(),
            enforce_deposit_window: default_true(),
        }
    }
}
