//! The compiled lookup: outlines in, translations out.
//!
//! Lookup is two nested searches. The inner one walks each stroke's core
//! keys through the deterministic chord trie, restarting at every key, so
//! all chord segmentations of the stroke are found. Each recognised chord
//! drives the outer search one or more soph steps through the
//! nondeterministic trie. Stroke boundaries consume the boundary soph.
//! Whatever reaches an accept node becomes a candidate, survives the rule
//! validators or not, and the cheapest survivor per entry wins.

mod outline;
mod reverse;
#[cfg(test)]
mod tests;

pub use outline::{Assoc, LookupState, OutlineDecision, StrokeKeys};

use std::collections::HashMap;

use tracing::{debug, debug_span};

use crate::chord_trie::ChordTrie;
use crate::compile::{CompileStats, Rule, SideTables};
use crate::keys::Chord;
use crate::ndt::{EntryId, Ndt, ReverseIndex, Transition, TriePath};
use crate::settings::Settings;
use crate::soph::SophId;
use crate::theory::Theory;

/// Everything the compiler produced, exposed to rule validators.
pub struct Artifacts {
    pub ndt: Ndt,
    pub chord_trie: ChordTrie,
    pub theory: Theory,
    pub settings: Settings,
    pub translations: Vec<String>,
    pub by_word: HashMap<String, Vec<EntryId>>,
    pub side: SideTables,
    pub stats: CompileStats,
}

/// One accepting path, after traversal and before validation.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub entry: EntryId,
    pub cost: f32,
    pub transitions: Vec<Transition>,
    pub assocs: Vec<Assoc>,
}

#[derive(Clone)]
struct PathState {
    path: TriePath,
    assocs: Vec<Assoc>,
    /// Floating keys consumed so far within the current stroke.
    floaters: Chord,
}

pub struct Lookup {
    art: Artifacts,
    rules: Vec<Box<dyn Rule>>,
    reverse: ReverseIndex,
}

impl Lookup {
    pub fn new(art: Artifacts, rules: Vec<Box<dyn Rule>>) -> Self {
        let reverse = art.ndt.build_reverse_lookup();
        Lookup {
            art,
            rules,
            reverse,
        }
    }

    pub fn artifacts(&self) -> &Artifacts {
        &self.art
    }

    pub fn stats(&self) -> &CompileStats {
        &self.art.stats
    }

    pub(crate) fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    pub(crate) fn reverse_index(&self) -> &ReverseIndex {
        &self.reverse
    }

    /// Translate an outline in steno notation. Unparsable notation finds
    /// nothing.
    pub fn lookup_str(&self, outline: &str) -> Option<String> {
        let chords = self.art.theory.layout().parse_outline(outline).ok()?;
        self.lookup(&chords)
    }

    /// Translate an outline. Panics on an empty outline; that is a caller
    /// bug, not a miss.
    pub fn lookup(&self, outline: &[Chord]) -> Option<String> {
        assert!(!outline.is_empty(), "lookup requires at least one stroke");
        let span = debug_span!("lookup", strokes = outline.len());
        let _enter = span.enter();

        let mut strokes = outline.to_vec();
        let mut state = LookupState::default();
        for rule in &self.rules {
            match rule.preprocess_outline(&self.art.theory, &mut strokes, &mut state) {
                OutlineDecision::Continue => {}
                OutlineDecision::Reject => return None,
            }
        }

        let candidates = self.valid_candidates(&strokes);

        // cheapest path per entry, keeping first-seen order on ties
        let mut best: Vec<Candidate> = Vec::new();
        for c in candidates {
            match best.iter_mut().find(|b| b.entry == c.entry) {
                Some(b) => {
                    if c.cost < b.cost {
                        *b = c;
                    }
                }
                None => best.push(c),
            }
        }
        best.sort_by(|a, b| a.cost.total_cmp(&b.cost));

        for rule in &self.rules {
            if let Some(i) = rule.select(&best, &state) {
                return best.get(i).map(|c| self.art.translations[c.entry.idx()].clone());
            }
        }
        best.first()
            .map(|c| self.art.translations[c.entry.idx()].clone())
    }

    /// Traverse an already pre-processed outline and keep every accepting
    /// path the validators allow.
    pub(crate) fn valid_candidates(&self, strokes: &[Chord]) -> Vec<Candidate> {
        let Some(final_paths) = self.walk(strokes) else {
            return Vec::new();
        };
        let paths: Vec<TriePath> = final_paths.iter().map(|ps| ps.path.clone()).collect();
        let hits = self.art.ndt.get_translations_and_costs(&paths);
        debug!(paths = paths.len(), hits = hits.len(), "traversal finished");

        let mut candidates: Vec<Candidate> = hits
            .into_iter()
            .map(|h| Candidate {
                entry: h.entry,
                cost: h.cost,
                transitions: final_paths[h.path_index].path.transitions.clone(),
                assocs: final_paths[h.path_index].assocs.clone(),
            })
            .collect();
        candidates.retain(|c| self.rules.iter().all(|r| r.validate(&self.art, c)));
        candidates
    }

    /// Run the stroke-by-stroke double search, returning the paths that
    /// consumed every key of every stroke.
    fn walk(&self, strokes: &[Chord]) -> Option<Vec<PathState>> {
        let layout = self.art.theory.layout();
        let boundary = Some(self.art.theory.boundary());
        let stroke_keys = StrokeKeys::flatten(layout, strokes);

        // seed with the root and anything a silent edge reaches from it
        let root = PathState {
            path: TriePath::root(),
            assocs: Vec::new(),
            floaters: Chord::EMPTY,
        };
        let mut carry: Vec<PathState> = vec![root.clone()];
        for path in self.art.ndt.silent_successors(&root.path) {
            carry.push(PathState {
                path,
                assocs: Vec::new(),
                floaters: Chord::EMPTY,
            });
        }

        for (s, stroke) in stroke_keys.iter().enumerate() {
            let n = stroke.keys.len();
            let mut states: Vec<Vec<PathState>> = vec![Vec::new(); n + 1];
            states[0] = std::mem::take(&mut carry);

            let mut searches: Vec<(usize, usize)> = Vec::new();
            for i in 0..n {
                searches.push((i, self.art.chord_trie.root()));
                let key = stroke.keys[i];
                let mut kept = Vec::new();
                let mut reached: Vec<PathState> = Vec::new();
                for (start, node) in searches.drain(..) {
                    let Some(next) = self.art.chord_trie.step(node, key) else {
                        continue;
                    };
                    for entry in self.art.chord_trie.results(next) {
                        let chord_floaters = layout.floaters(entry.chord);
                        if !chord_floaters.is_subset_of(stroke.floaters) {
                            continue;
                        }
                        let labels: Vec<Option<SophId>> =
                            entry.sophs.iter().map(|&s| Some(s)).collect();
                        for ps in &states[start] {
                            let stepped = self
                                .art
                                .ndt
                                .traverse_chain(std::slice::from_ref(&ps.path), &labels);
                            for path in stepped {
                                let transitions =
                                    path.transitions[ps.path.transitions.len()..].to_vec();
                                let mut assocs = ps.assocs.clone();
                                assocs.push(Assoc {
                                    chord: entry.chord,
                                    stroke: s,
                                    start_key: start,
                                    end_key: i + 1,
                                    transitions,
                                });
                                reached.push(PathState {
                                    path,
                                    assocs,
                                    floaters: ps.floaters.union(chord_floaters),
                                });
                            }
                        }
                    }
                    kept.push((start, next));
                }
                states[i + 1].extend(reached);
                searches = kept;
            }

            // the stroke's floaters must all have been spent by some chord
            let finished: Vec<PathState> = states
                .pop()
                .expect("states has n + 1 slots")
                .into_iter()
                .filter(|ps| ps.floaters == stroke.floaters)
                .collect();
            if finished.is_empty() {
                return None;
            }

            if s + 1 < stroke_keys.len() {
                for ps in finished {
                    for path in self
                        .art
                        .ndt
                        .traverse(std::slice::from_ref(&ps.path), boundary)
                    {
                        carry.push(PathState {
                            path,
                            assocs: ps.assocs.clone(),
                            floaters: Chord::EMPTY,
                        });
                    }
                }
                if carry.is_empty() {
                    return None;
                }
            } else {
                carry = finished;
            }
        }
        Some(carry)
    }
}
