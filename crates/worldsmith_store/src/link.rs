//! Typed link storage with bidirectional indices.
//!
//! Links connect entity records with edges typed by relationship key.
//! Bidirectional indices allow O(1) traversal in both directions. Endpoint
//! validation (class, matcher, write access) happens in the world facade;
//! this store only maintains the indices.

use std::collections::{HashMap, HashSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use worldsmith_foundation::RecordId;

/// Stores relationship edges between records.
///
/// - Forward: source -> relationship key -> set of targets
/// - Reverse: target -> relationship key -> set of sources
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkStore {
    forward: HashMap<RecordId, HashMap<String, HashSet<RecordId>>>,
    reverse: HashMap<RecordId, HashMap<String, HashSet<RecordId>>>,
}

impl LinkStore {
    /// Creates an empty link store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an edge. Linking an existing edge is a no-op.
    pub fn link(&mut self, from: RecordId, relationship: &str, to: RecordId) {
        self.forward
            .entry(from)
            .or_default()
            .entry(relationship.to_string())
            .or_default()
            .insert(to);
        self.reverse
            .entry(to)
            .or_default()
            .entry(relationship.to_string())
            .or_default()
            .insert(from);
    }

    /// Removes an edge. Unlinking a non-existent edge is a no-op.
    pub fn unlink(&mut self, from: RecordId, relationship: &str, to: RecordId) {
        if let Some(rels) = self.forward.get_mut(&from) {
            if let Some(targets) = rels.get_mut(relationship) {
                targets.remove(&to);
            }
        }
        if let Some(rels) = self.reverse.get_mut(&to) {
            if let Some(sources) = rels.get_mut(relationship) {
                sources.remove(&from);
            }
        }
    }

    /// Checks if a specific edge exists.
    #[must_use]
    pub fn has_edge(&self, from: RecordId, relationship: &str, to: RecordId) -> bool {
        self.forward
            .get(&from)
            .and_then(|m| m.get(relationship))
            .is_some_and(|s| s.contains(&to))
    }

    /// Gets targets of a relationship from a source (forward traversal).
    pub fn targets<'a>(
        &'a self,
        from: RecordId,
        relationship: &str,
    ) -> impl Iterator<Item = RecordId> + use<'a> {
        self.forward
            .get(&from)
            .and_then(|m| m.get(relationship))
            .into_iter()
            .flat_map(|s| s.iter().copied())
    }

    /// Gets sources pointing at a target (reverse traversal).
    pub fn sources<'a>(
        &'a self,
        to: RecordId,
        relationship: &str,
    ) -> impl Iterator<Item = RecordId> + use<'a> {
        self.reverse
            .get(&to)
            .and_then(|m| m.get(relationship))
            .into_iter()
            .flat_map(|s| s.iter().copied())
    }

    /// Returns every edge touching a record as
    /// `(relationship key, other end, is forward)`.
    #[must_use]
    pub fn edges_for(&self, record: RecordId) -> Vec<(String, RecordId, bool)> {
        let mut result = Vec::new();

        if let Some(fwd) = self.forward.get(&record) {
            for (rel, targets) in fwd {
                for target in targets {
                    result.push((rel.clone(), *target, true));
                }
            }
        }
        if let Some(rev) = self.reverse.get(&record) {
            for (rel, sources) in rev {
                for source in sources {
                    result.push((rel.clone(), *source, false));
                }
            }
        }

        result
    }

    /// Drops every edge touching a destroyed record.
    pub fn on_record_destroyed(&mut self, record: RecordId) {
        if let Some(forward_rels) = self.forward.remove(&record) {
            for (rel, targets) in forward_rels {
                for target in targets {
                    if let Some(rev) = self.reverse.get_mut(&target) {
                        if let Some(sources) = rev.get_mut(&rel) {
                            sources.remove(&record);
                        }
                    }
                }
            }
        }
        if let Some(reverse_rels) = self.reverse.remove(&record) {
            for (rel, sources) in reverse_rels {
                for source in sources {
                    if let Some(fwd) = self.forward.get_mut(&source) {
                        if let Some(targets) = fwd.get_mut(&rel) {
                            targets.remove(&record);
                        }
                    }
                }
            }
        }
    }
}
