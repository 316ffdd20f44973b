//! Asset identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Address;

/// Identity of a fungible asset (a mint) on the ledger.
///
/// Kept distinct from [`Address`] so an owner can never be passed where an
/// asset is expected, although both are derived the same way.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetId([u8; 32]);

impl AssetId {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<Address> for AssetId {
    fn from(addr: Address) -> Self {
        Self(*addr.as_bytes())
    }
}

impl fmt::Debug for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetId({})", crate::hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::hex::encode(&self.0))
    }
}
