//! Cross-layer integration tests for Worldsmith
//!
//! Tests that verify correct interaction between multiple crates.

mod persistence;
