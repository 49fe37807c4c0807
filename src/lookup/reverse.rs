//! Word-to-outline lookup over the reverse edge index.

use std::collections::HashSet;

use tracing::debug;

use crate::keys::Chord;
use crate::ndt::Transition;

use super::{Lookup, LookupState, OutlineDecision};

impl Lookup {
    /// Every outline the compiled trie can spell `word` with. Outlines are
    /// deduplicated but otherwise unordered beyond entry and path order.
    pub fn reverse_lookup(&self, word: &str) -> Vec<Vec<Chord>> {
        let art = self.artifacts();
        let Some(entries) = art.by_word.get(word) else {
            return Vec::new();
        };

        let mut seen: HashSet<Vec<Chord>> = HashSet::new();
        let mut outlines = Vec::new();
        for &entry in entries {
            for path in self.reverse_index().paths(&art.ndt, entry) {
                let mut rendered = Vec::new();
                self.render(&path, 0, Chord::EMPTY, None, &mut Vec::new(), &mut rendered);
                for outline in rendered {
                    if !self.outline_survives_rules(&outline) {
                        continue;
                    }
                    // a render may use a flagged edge its validator would
                    // refuse on the way back in; only keep outlines the
                    // forward direction accepts for this entry
                    if !self
                        .valid_candidates(&outline)
                        .iter()
                        .any(|c| c.entry == entry)
                    {
                        continue;
                    }
                    if seen.insert(outline.clone()) {
                        outlines.push(outline);
                    }
                }
            }
        }
        debug!(word, outlines = outlines.len(), "reverse lookup");
        outlines
    }

    pub fn reverse_lookup_str(&self, word: &str) -> Vec<String> {
        let layout = self.artifacts().theory.layout();
        self.reverse_lookup(word)
            .iter()
            .map(|outline| layout.format_outline(outline))
            .collect()
    }

    /// Turn one transition sequence back into strokes, branching over every
    /// chord that spells each soph. Chords that cannot follow the previous
    /// chord in steno order start no render; the boundary soph closes the
    /// current stroke.
    fn render(
        &self,
        path: &[Transition],
        at: usize,
        stroke: Chord,
        last: Option<Chord>,
        done: &mut Vec<Chord>,
        out: &mut Vec<Vec<Chord>>,
    ) {
        let art = self.artifacts();
        let Some(&t) = path.get(at) else {
            let mut outline = done.clone();
            if !stroke.is_empty() {
                outline.push(stroke);
            }
            if !outline.is_empty() {
                out.push(outline);
            }
            return;
        };
        let Some(key) = t.key else {
            self.render(path, at + 1, stroke, last, done, out);
            return;
        };
        if key == art.theory.boundary() {
            if stroke.is_empty() {
                return;
            }
            done.push(stroke);
            self.render(path, at + 1, Chord::EMPTY, None, done, out);
            done.pop();
            return;
        }
        let layout = art.theory.layout();
        for chord in art.theory.render_chords(key) {
            if let Some(prev) = last {
                if !layout.can_concat(prev, chord) {
                    continue;
                }
            }
            self.render(path, at + 1, stroke.union(chord), Some(chord), done, out);
        }
    }

    /// A rendered outline only counts if the outline-rewriting rules would
    /// let it into a forward lookup unchanged.
    fn outline_survives_rules(&self, outline: &[Chord]) -> bool {
        let mut strokes = outline.to_vec();
        let mut state = LookupState::default();
        for rule in self.rules() {
            match rule.preprocess_outline(&self.artifacts().theory, &mut strokes, &mut state) {
                OutlineDecision::Continue => {}
                OutlineDecision::Reject => return false,
            }
        }
        strokes == outline
    }
}
