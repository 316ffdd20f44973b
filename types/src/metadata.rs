//! Descriptive token metadata.

use serde::{Deserialize, Serialize};

/// Human-readable description of an asset the engine creates.
///
/// Registered with the metadata collaborator and never read back by the
/// engine's accounting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub uri: String,
}

impl TokenMetadata {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            uri: uri.into(),
        }
    }

    /// Check the fields against byte-length limits.
    ///
    /// Returns a description of the first violation found.
    pub fn check_limits(
        &self,
        max_name: usize,
        max_symbol: usize,
        max_uri: usize,
    ) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("metadata name must not be empty".into());
        }
        if self.symbol.is_empty() {
            return Err("metadata symbol must not be empty".into());
        }
        if self.name.len() > max_name {
            return Err(format!(
                "metadata name is {} bytes, limit is {}",
                self.name.len(),
                max_name
            ));
        }
        if self.symbol.len() > max_symbol {
            return Err(format!(
                "metadata symbol is {} bytes, limit is {}",
                self.symbol.len(),
                max_symbol
            ));
        }
        if self.uri.len() > max_uri {
            return Err(format!(
                "metadata uri is {} bytes, limit is {}",
                self.uri.len(),
                max_uri
            ));
        }
        Ok(())
    }
}
