//! Outline pre-processing: cycler strokes and prohibited strokes.

use crate::keys::Chord;
use crate::lookup::{Candidate, LookupState, OutlineDecision};
use crate::theory::Theory;

use super::Rule;

/// Trailing floater-only strokes ask for the next translation down the
/// cost order instead of the cheapest one. N trailing cyclers select the
/// Nth alternative, wrapping around.
pub struct Cycler;

impl Rule for Cycler {
    fn name(&self) -> &'static str {
        "cycler"
    }

    fn preprocess_outline(
        &self,
        theory: &Theory,
        outline: &mut Vec<Chord>,
        state: &mut LookupState,
    ) -> OutlineDecision {
        while let Some(&last) = outline.last() {
            let floater_only =
                theory.layout().core(last).is_empty() && !theory.layout().floaters(last).is_empty();
            if !floater_only {
                break;
            }
            outline.pop();
            state.cycles += 1;
        }
        if outline.is_empty() {
            OutlineDecision::Reject
        } else {
            OutlineDecision::Continue
        }
    }

    fn select(&self, survivors: &[Candidate], state: &LookupState) -> Option<usize> {
        if state.cycles == 0 || survivors.is_empty() {
            None
        } else {
            Some(state.cycles % survivors.len())
        }
    }
}

/// Strokes with no core keys anywhere else in the outline spell nothing
/// and cannot translate.
pub struct ProhibitedStrokes;

impl Rule for ProhibitedStrokes {
    fn name(&self) -> &'static str {
        "prohibited_strokes"
    }

    fn after(&self) -> &'static [&'static str] {
        &["cycler"]
    }

    fn preprocess_outline(
        &self,
        theory: &Theory,
        outline: &mut Vec<Chord>,
        _state: &mut LookupState,
    ) -> OutlineDecision {
        if outline
            .iter()
            .any(|&stroke| theory.layout().core(stroke).is_empty())
        {
            OutlineDecision::Reject
        } else {
            OutlineDecision::Continue
        }
    }
}
