//! Rule plugins.
//!
//! A rule may hook the compile side (pre-processing definitions, drawing
//! extra edges around the bank walk) and the lookup side (rewriting
//! outlines, validating candidate paths, selecting among survivors). Rules
//! carry no mutable state of their own: per-entry scratch lives in the
//! opaque box returned by [`Rule::begin_entry`], and durable facts go into
//! the engine's [`SideTables`].
//!
//! [`SideTables`]: super::SideTables

mod alt_chords;
mod clusters;
mod cycler;
mod inversion;
mod linker;
mod optionalizer;

pub use alt_chords::AltChords;
pub use clusters::Clusters;
pub use cycler::{Cycler, ProhibitedStrokes};
pub use inversion::Inversion;
pub use linker::{InitialVowel, Linker};
pub use optionalizer::{
    OptionalMiddleConsonants, OptionalUnstressedMiddleConsonants, OptionalUnstressedVowels,
};

use std::any::Any;

use crate::definition::Definition;
use crate::keys::Chord;
use crate::lookup::{Artifacts, Candidate, LookupState, OutlineDecision};
use crate::theory::Theory;

use super::sounds::{ConsonantEvent, Sound, VowelEvent};
use super::{CompileError, EntryCx};

#[allow(unused_variables)]
pub trait Rule {
    fn name(&self) -> &'static str;

    /// Names of rules that must run before this one.
    fn after(&self) -> &'static [&'static str] {
        &[]
    }

    /// Rewrite the definition before any edges are drawn.
    fn process_definition(&self, theory: &Theory, def: &mut Definition) {}

    /// Per-entry scratch state, threaded through every later hook.
    fn begin_entry(&self, cx: &mut EntryCx<'_>) -> Box<dyn Any> {
        Box::new(())
    }

    fn begin_consonant(&self, cx: &mut EntryCx<'_>, state: &mut dyn Any, sound: &Sound) {}

    /// Runs after the sound's bank destinations are drawn but before the
    /// frontiers move, so `cx.banks` is still the pre-sound frontier.
    fn before_complete_consonant(
        &self,
        cx: &mut EntryCx<'_>,
        state: &mut dyn Any,
        ev: &ConsonantEvent<'_>,
    ) {
    }

    fn complete_consonant(&self, cx: &mut EntryCx<'_>, state: &mut dyn Any, ev: &ConsonantEvent<'_>) {
    }

    fn begin_vowel(&self, cx: &mut EntryCx<'_>, state: &mut dyn Any, sound: &Sound) {}

    fn before_complete_vowel(&self, cx: &mut EntryCx<'_>, state: &mut dyn Any, ev: &VowelEvent<'_>) {
    }

    fn complete_vowel(&self, cx: &mut EntryCx<'_>, state: &mut dyn Any, ev: &VowelEvent<'_>) {}

    fn finish_entry(&self, cx: &mut EntryCx<'_>, state: &mut dyn Any) {}

    /// Rewrite or reject an outline before lookup proper.
    fn preprocess_outline(
        &self,
        theory: &Theory,
        outline: &mut Vec<Chord>,
        state: &mut LookupState,
    ) -> OutlineDecision {
        OutlineDecision::Continue
    }

    /// Veto a candidate path after traversal.
    fn validate(&self, art: &Artifacts, cand: &Candidate) -> bool {
        true
    }

    /// Pick among cost-sorted surviving candidates; first `Some` wins.
    fn select(&self, survivors: &[Candidate], state: &LookupState) -> Option<usize> {
        None
    }
}

/// Order rules so every rule runs after those it names in [`Rule::after`].
/// Registration order is preserved among unconstrained rules.
pub fn order_rules(rules: Vec<Box<dyn Rule>>) -> Result<Vec<Box<dyn Rule>>, CompileError> {
    let mut ordered: Vec<Box<dyn Rule>> = Vec::with_capacity(rules.len());
    let mut pending: Vec<Box<dyn Rule>> = rules;
    while !pending.is_empty() {
        let placed: Vec<&'static str> = ordered.iter().map(|r| r.name()).collect();
        let ready = pending.iter().position(|r| {
            r.after()
                .iter()
                .all(|dep| placed.contains(dep) || !pending.iter().any(|p| p.name() == *dep))
        });
        match ready {
            Some(i) => ordered.push(pending.remove(i)),
            None => {
                return Err(CompileError::RuleCycle(
                    pending[0].name().to_string(),
                ))
            }
        }
    }
    Ok(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str, &'static [&'static str]);
    impl Rule for Named {
        fn name(&self) -> &'static str {
            self.0
        }
        fn after(&self) -> &'static [&'static str] {
            self.1
        }
    }

    #[test]
    fn ordering_respects_dependencies() {
        let rules: Vec<Box<dyn Rule>> = vec![
            Box::new(Named("b", &["a"])),
            Box::new(Named("c", &["b"])),
            Box::new(Named("a", &[])),
        ];
        let names: Vec<_> = order_rules(rules).unwrap().iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn unknown_dependencies_are_ignored() {
        let rules: Vec<Box<dyn Rule>> = vec![Box::new(Named("x", &["never-registered"]))];
        assert_eq!(order_rules(rules).unwrap().len(), 1);
    }

    #[test]
    fn cycles_are_an_error() {
        let rules: Vec<Box<dyn Rule>> = vec![
            Box::new(Named("a", &["b"])),
            Box::new(Named("b", &["a"])),
        ];
        assert!(matches!(
            order_rules(rules),
            Err(CompileError::RuleCycle(_))
        ));
    }
}
