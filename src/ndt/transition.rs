//! Transition identity and the per-entry cost/flag tables.
//!
//! Edges themselves are shared between entries; everything entry-specific
//! about an edge lives here, keyed by `(Transition, EntryId)`. A cost row
//! existing for that pair is what it means for the entry to use the edge.

use std::collections::HashMap;

use crate::soph::SophId;

use super::{EntryId, NodeId};

/// Stable name for one edge: source node, label, and a duplicate counter
/// distinguishing parallel edges with the same label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transition {
    pub src: NodeId,
    pub key: Option<SophId>,
    pub dup: u16,
}

/// Flag bits attached to a `(Transition, EntryId)` pair.
pub mod flags {
    /// The edge spells an alternative chord and needs lookup-time validation.
    pub const ALT: u8 = 1 << 0;
    /// The edge belongs to an inversion window.
    pub const INVERSION: u8 = 1 << 1;
}

#[derive(Debug, Default, Clone)]
pub struct TransitionTable {
    costs: HashMap<(Transition, EntryId), f32>,
    flags: HashMap<(Transition, EntryId), u8>,
}

impl TransitionTable {
    pub fn set_cost(&mut self, t: Transition, entry: EntryId, cost: f32) {
        self.costs.insert((t, entry), cost);
    }

    pub fn cost(&self, t: Transition, entry: EntryId) -> Option<f32> {
        self.costs.get(&(t, entry)).copied()
    }

    /// Whether `entry` uses this edge at all.
    pub fn has(&self, t: Transition, entry: EntryId) -> bool {
        self.costs.contains_key(&(t, entry))
    }

    pub fn set_flag(&mut self, t: Transition, entry: EntryId, bit: u8) {
        *self.flags.entry((t, entry)).or_insert(0) |= bit;
    }

    pub fn has_flag(&self, t: Transition, entry: EntryId, bit: u8) -> bool {
        self.flags.get(&(t, entry)).is_some_and(|f| f & bit != 0)
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}
