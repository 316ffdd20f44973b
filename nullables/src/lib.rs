//! Nullable infrastructure for deterministic testing.
//!
//! Everything the engine touches outside its own records (time, the metadata
//! registry, durable record storage) has a test-friendly implementation here
//! that:
//! - Returns deterministic values
//! - Can be controlled programmatically
//! - Never touches the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod metadata;
pub mod store;

pub use clock::NullClock;
pub use metadata::NullMetadataRegistry;
pub use store::NullVaultStore;
