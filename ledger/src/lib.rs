//! In-memory reference ledger for dvault.
//!
//! Implements the [`dvault_store::Ledger`] facade: assets with a supply and a
//! single mint authority, and holdings keyed by the derived address of
//! `(asset, owner)`. Batches are staged against a copy-on-write overlay and
//! merged only when every operation has validated.

pub mod memory;
pub mod staging;

pub use memory::{Holding, MemoryLedger};
