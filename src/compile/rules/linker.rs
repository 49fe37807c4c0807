//! Linker and initial-vowel rules.
//!
//! Vowels may only start a stroke behind the linker chord: at compile time
//! the linker rule opens a linker-labelled detour into every vowel, and at
//! lookup time it rejects non-first strokes whose first core key is a mid
//! key. The initial-vowel rule instead lets a word-initial vowel vanish
//! entirely behind a silent edge from the root.

use std::any::Any;

use crate::compile::sounds::{Sound, VowelEvent};
use crate::compile::EntryCx;
use crate::keys::{Bank, Chord};
use crate::lookup::{LookupState, OutlineDecision};
use crate::ndt::{NodeSrc, ROOT};
use crate::theory::Theory;

use super::Rule;

pub struct Linker;

impl Rule for Linker {
    fn name(&self) -> &'static str {
        "linker"
    }

    fn begin_vowel(&self, cx: &mut EntryCx<'_>, _state: &mut dyn Any, _sound: &Sound) {
        let linker = cx.theory.linker();
        let linker_cost = cx.costs.linker;
        let snapshot = cx.banks.mid.clone();
        for src in snapshot {
            // the carried frontier cost is paid here, so the linker detour
            // and the direct mid edge price the same skips identically
            let (_, pre) = cx
                .trie
                .follow(src.node, Some(linker), linker_cost + src.cost, cx.entry);
            cx.banks.mid.push(NodeSrc::base(pre));
        }
    }

    fn preprocess_outline(
        &self,
        theory: &Theory,
        outline: &mut Vec<Chord>,
        _state: &mut LookupState,
    ) -> OutlineDecision {
        for stroke in outline.iter().skip(1) {
            let vowel_initial = theory
                .layout()
                .core(*stroke)
                .first_key()
                .is_some_and(|k| theory.layout().bank(k) == Bank::Mid);
            if vowel_initial {
                return OutlineDecision::Reject;
            }
        }
        OutlineDecision::Continue
    }
}

pub struct InitialVowel;

impl Rule for InitialVowel {
    fn name(&self) -> &'static str {
        "initial_vowel"
    }

    fn complete_vowel(&self, cx: &mut EntryCx<'_>, _state: &mut dyn Any, ev: &VowelEvent<'_>) {
        if !cx.def.is_first_phoneme(ev.sound.cursor) {
            return;
        }
        if let Some(new_stroke) = ev.new_stroke {
            cx.trie
                .link(ROOT, new_stroke, None, cx.costs.initial_vowel, cx.entry);
        }
    }
}
