//! Nullable metadata registry: records registrations in memory.

use dvault_store::{MetadataRegistry, StoreError};
use dvault_types::{AssetId, TokenMetadata};

/// Keeps every registration in order. A failing instance rejects every
/// call, for exercising the engine's best-effort path.
#[derive(Debug, Default)]
pub struct NullMetadataRegistry {
    registrations: Vec<(AssetId, TokenMetadata)>,
    fail: bool,
}

impl NullMetadataRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            registrations: Vec::new(),
            fail: true,
        }
    }

    pub fn registrations(&self) -> &[(AssetId, TokenMetadata)] {
        &self.registrations
    }

    /// The most recent metadata recorded for `asset`.
    pub fn get(&self, asset: &AssetId) -> Option<&TokenMetadata> {
        self.registrations
            .iter()
            .rev()
            .find(|(a, _)| a == asset)
            .map(|(_, m)| m)
    }
}

impl MetadataRegistry for NullMetadataRegistry {
    fn register(&mut self, asset: &AssetId, metadata: &TokenMetadata) -> Result<(), StoreError> {
        if self.fail {
            return Err(StoreError::Backend("metadata registry unavailable".into()));
        }
        self.registrations.push((*asset, metadata.clone()));
        Ok(())
    }
}
