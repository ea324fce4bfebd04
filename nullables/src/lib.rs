//! Nullable infrastructure for deterministic testing.
//!
//! Every external capability of the ledger (clock, value transfer) is
//! abstracted behind a trait in `feevote-host`. This crate provides
//! test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Record what the ledger asked them to do
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod transfer;

pub use clock::NullClock;
pub use transfer::{NullTransfer, TransferRecord};
