//! Nullable infrastructure for deterministic testing.
//!
//! Follows the nullable-infrastructure ("A-frame") testing pattern.
//! Every chain collaborator of the coordinator is a trait; this crate provides
//! an in-memory implementation that:
//! - Applies the shutdown contract's own rules to submissions
//! - Records every submission for assertions
//! - Can be told to fail reads or submissions
//! - Never touches the network
//!
//! Usage: build a [`NullChain`], seed it, then hand it to a coordinator.

pub mod chain;

pub use chain::{NullChain, Submission};
