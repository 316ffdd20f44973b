//! Ledger facade: the balance primitives every engine mutation composes.
//!
//! The facade exposes reads plus a single write entry point, [`Ledger::apply`],
//! which takes an ordered batch of mint/burn/transfer/create operations and
//! applies all of them or none of them.

use dvault_types::{Address, AssetId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Supply and authority information for one asset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetInfo {
    pub decimals: u8,
    /// Circulating supply in raw units.
    pub supply: u128,
    /// The only identity allowed to mint this asset.
    pub mint_authority: Address,
}

/// A single balance primitive.
///
/// `authority` is the identity authorising the operation: the mint authority
/// for [`LedgerOp::Mint`], the owner of the debited holding for
/// [`LedgerOp::Burn`] and [`LedgerOp::Transfer`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerOp {
    CreateAsset {
        asset: AssetId,
        decimals: u8,
        mint_authority: Address,
    },
    Mint {
        asset: AssetId,
        to: Address,
        amount: u128,
        authority: Address,
    },
    Burn {
        asset: AssetId,
        from: Address,
        amount: u128,
        authority: Address,
    },
    Transfer {
        asset: AssetId,
        from: Address,
        to: Address,
        amount: u128,
        authority: Address,
    },
}

/// An ordered list of operations applied as one unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LedgerBatch {
    ops: Vec<LedgerOp>,
}

impl LedgerBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_asset(
        &mut self,
        asset: AssetId,
        decimals: u8,
        mint_authority: Address,
    ) -> &mut Self {
        self.ops.push(LedgerOp::CreateAsset {
            asset,
            decimals,
            mint_authority,
        });
        self
    }

    pub fn mint(&mut self, asset: AssetId, to: Address, amount: u128, authority: Address) -> &mut Self {
        self.ops.push(LedgerOp::Mint {
            asset,
            to,
            amount,
            authority,
        });
        self
    }

    pub fn burn(
        &mut self,
        asset: AssetId,
        from: Address,
        amount: u128,
        authority: Address,
    ) -> &mut Self {
        self.ops.push(LedgerOp::Burn {
            asset,
            from,
            amount,
            authority,
        });
        self
    }

    pub fn transfer(
        &mut self,
        asset: AssetId,
        from: Address,
        to: Address,
        amount: u128,
        authority: Address,
    ) -> &mut Self {
        self.ops.push(LedgerOp::Transfer {
            asset,
            from,
            to,
            amount,
            authority,
        });
        self
    }

    pub fn ops(&self) -> &[LedgerOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("unknown asset {0}")]
    UnknownAsset(AssetId),

    #[error("asset {0} already exists")]
    AssetExists(AssetId),

    #[error("{authority} is not authorised to {action} asset {asset}")]
    Unauthorized {
        asset: AssetId,
        authority: Address,
        action: &'static str,
    },

    #[error("insufficient funds of asset {asset}: need {needed}, available {available}")]
    InsufficientFunds {
        asset: AssetId,
        needed: u128,
        available: u128,
    },

    #[error("ledger operations must move a non-zero amount")]
    ZeroAmount,

    #[error("arithmetic overflow on asset {0}")]
    Overflow(AssetId),
}

/// The balance ledger the engine settles against.
///
/// Holdings are addressed by `(asset, owner)`; implementations derive the
/// backing account deterministically, so crediting an owner that has never
/// held the asset simply opens the holding.
pub trait Ledger {
    fn asset(&self, asset: &AssetId) -> Option<AssetInfo>;

    /// Balance of `owner` in `asset`; zero for holdings never credited.
    fn balance(&self, asset: &AssetId, owner: &Address) -> u128;

    /// Apply every operation in `batch`, in order, atomically.
    ///
    /// On error no operation in the batch has taken effect.
    fn apply(&mut self, batch: &LedgerBatch) -> Result<(), LedgerError>;

    fn asset_exists(&self, asset: &AssetId) -> bool {
        self.asset(asset).is_some()
    }
}
