//! Outline-side types shared between the lookup walk and the rules.

use crate::keys::{Chord, KeyLayout, Key};
use crate::ndt::Transition;

/// What a rule's outline pre-processing decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineDecision {
    Continue,
    Reject,
}

/// Mutable scratch carried through one lookup.
#[derive(Debug, Default, Clone)]
pub struct LookupState {
    /// How many cycler strokes were stripped from the outline tail.
    pub cycles: usize,
}

/// One chord recognised inside a stroke, with the transitions it drove.
/// Key positions are stroke-local, so two associations are adjacent within
/// a stroke exactly when one's `end_key` is the other's `start_key`.
#[derive(Debug, Clone)]
pub struct Assoc {
    pub chord: Chord,
    pub stroke: usize,
    pub start_key: usize,
    pub end_key: usize,
    pub transitions: Vec<Transition>,
}

/// A stroke flattened for the chord walk: core keys in steno order, and
/// the floating keys that every path through the stroke must account for.
#[derive(Debug, Clone)]
pub struct StrokeKeys {
    pub keys: Vec<Key>,
    pub floaters: Chord,
}

impl StrokeKeys {
    pub fn flatten(layout: &KeyLayout, strokes: &[Chord]) -> Vec<StrokeKeys> {
        strokes
            .iter()
            .map(|&chord| StrokeKeys {
                keys: layout.core(chord).keys().collect(),
                floaters: layout.floaters(chord),
            })
            .collect()
    }
}
