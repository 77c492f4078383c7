//! Nullable infrastructure for deterministic testing.
//!
//! The selection engine reaches the chain only through the reader traits of
//! `stake-chain`. This crate provides a test-friendly implementation that:
//! - Serves fixture data from an in-memory snapshot
//! - Can be told to fail or stall on specific queries
//! - Records every query it receives, for assertions
//!
//! Usage: swap a live reader for [`NullChainReader`] in tests.

pub mod chain;

pub use chain::NullChainReader;
