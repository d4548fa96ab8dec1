//! Worldsmith - Collaborative world-building and campaign management engine
//!
//! This crate re-exports all layers of the Worldsmith system for convenient
//! access. For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: worldsmith_runtime    — MessagePack persistence, JSON export
//! Layer 3: worldsmith_store      — records, links, campaigns, notes,
//!                                  notifications, the World facade
//! Layer 2: worldsmith_access     — visibility/access evaluation
//! Layer 1: worldsmith_registry   — type/field registry, display rules,
//!                                  relationship types
//! Layer 0: worldsmith_foundation — ids, values, field kinds, errors
//! ```

pub use worldsmith_access as access;
pub use worldsmith_foundation as foundation;
pub use worldsmith_registry as registry;
pub use worldsmith_runtime as runtime;
pub use worldsmith_store as store;
