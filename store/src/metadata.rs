use dvault_types::{AssetId, TokenMetadata};

use crate::StoreError;

/// Registry of descriptive asset metadata (name, symbol, uri).
///
/// Best-effort from the engine's point of view: nothing it records is read
/// back by any accounting rule.
pub trait MetadataRegistry {
    fn register(&mut self, asset: &AssetId, metadata: &TokenMetadata) -> Result<(), StoreError>;
}
