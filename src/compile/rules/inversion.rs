//! Consonant inversion: out-of-order spelling within one consonant run.
//!
//! Each bank keeps a window of the consonant slots seen since the last
//! vowel. Every new slot is cross-linked with every earlier slot in its
//! window, so paths may consume the run's sophs in any order the keys
//! permit. The validator then insists that what a path consumed from a
//! window is exactly one contiguous slot range, minus optional slots.

use std::any::Any;

use crate::compile::sounds::{BankDst, ConsonantEvent, Sound};
use crate::compile::{EntryCx, InvSlot};
use crate::lookup::{Artifacts, Candidate};
use crate::ndt::{flags, NodeId, NodeSrc, Transition};
use crate::soph::SophId;

use super::Rule;

#[derive(Debug, Clone)]
struct Slot {
    srcs: Vec<NodeSrc>,
    dst: NodeId,
    sophs: Vec<SophId>,
    optional: bool,
    main: Vec<Transition>,
}

#[derive(Debug, Default)]
struct Window {
    slots: Vec<Slot>,
    cross: Vec<Transition>,
}

#[derive(Default)]
struct State {
    left: Window,
    right: Window,
}

pub struct Inversion;

impl Rule for Inversion {
    fn name(&self) -> &'static str {
        "inversion"
    }

    fn begin_entry(&self, _cx: &mut EntryCx<'_>) -> Box<dyn Any> {
        Box::new(State::default())
    }

    fn before_complete_consonant(
        &self,
        cx: &mut EntryCx<'_>,
        state: &mut dyn Any,
        ev: &ConsonantEvent<'_>,
    ) {
        let state = state
            .downcast_mut::<State>()
            .expect("inversion state box holds State");
        if let Some(dst) = &ev.left {
            let srcs = cx.banks.left.clone();
            extend_window(cx, &mut state.left, ev.sound, dst, srcs);
        }
        if let Some(dst) = &ev.right {
            let srcs = cx.banks.right.clone();
            extend_window(cx, &mut state.right, ev.sound, dst, srcs);
        }
    }

    fn begin_vowel(&self, cx: &mut EntryCx<'_>, state: &mut dyn Any, _sound: &Sound) {
        let state = state
            .downcast_mut::<State>()
            .expect("inversion state box holds State");
        flush(cx, &mut state.left);
        flush(cx, &mut state.right);
    }

    fn finish_entry(&self, cx: &mut EntryCx<'_>, state: &mut dyn Any) {
        let state = state
            .downcast_mut::<State>()
            .expect("inversion state box holds State");
        flush(cx, &mut state.left);
        flush(cx, &mut state.right);
    }

    fn validate(&self, art: &Artifacts, cand: &Candidate) -> bool {
        let mut consumed: Vec<(u32, Vec<SophId>)> = Vec::new();
        for t in &cand.transitions {
            let Some(&window) = art.side.inv_member.get(&(*t, cand.entry)) else {
                continue;
            };
            let Some(key) = t.key else { continue };
            match consumed.iter_mut().find(|(w, _)| *w == window) {
                Some((_, sophs)) => sophs.push(key),
                None => consumed.push((window, vec![key])),
            }
        }
        consumed.iter().all(|(window, sophs)| {
            art.side
                .inv_windows
                .get(&(cand.entry, *window))
                .map_or(true, |slots| window_satisfiable(slots, sophs))
        })
    }
}

/// Add the sound as a new slot, cross-linking it against every earlier slot
/// so either order of any pair is traversable.
fn extend_window(
    cx: &mut EntryCx<'_>,
    window: &mut Window,
    sound: &Sound,
    dst: &BankDst,
    srcs: Vec<NodeSrc>,
) {
    // the sophs actually drawn in this bank, read off the main transitions
    let mut sophs: Vec<SophId> = Vec::new();
    for t in &dst.transitions {
        if let Some(s) = t.key {
            if !sophs.contains(&s) {
                sophs.push(s);
            }
        }
    }
    let cost = cx.costs.inversion;
    for prev in &window.slots {
        for &prev_soph in &prev.sophs {
            for src in &srcs {
                let t = cx.trie.link(
                    src.node,
                    dst.node,
                    Some(prev_soph),
                    cost + src.cost,
                    cx.entry,
                );
                cx.trie.table.set_flag(t, cx.entry, flags::INVERSION);
                window.cross.push(t);
            }
        }
        for &cur_soph in &sophs {
            for src in &prev.srcs {
                let t = cx.trie.link(
                    src.node,
                    prev.dst,
                    Some(cur_soph),
                    cost + src.cost,
                    cx.entry,
                );
                cx.trie.table.set_flag(t, cx.entry, flags::INVERSION);
                window.cross.push(t);
            }
        }
    }
    window.slots.push(Slot {
        srcs,
        dst: dst.node,
        sophs,
        optional: sound.keysymbol.optional,
        main: dst.transitions.clone(),
    });
}

/// Close the window: record slot metadata and transition membership so the
/// validator can reconstruct what a path consumed.
fn flush(cx: &mut EntryCx<'_>, window: &mut Window) {
    let window = std::mem::take(window);
    if window.slots.len() < 2 {
        return;
    }
    let id = cx.side.new_window();
    for slot in &window.slots {
        for &t in &slot.main {
            cx.side.inv_member.insert((t, cx.entry), id);
        }
    }
    for &t in &window.cross {
        cx.side.inv_member.insert((t, cx.entry), id);
    }
    cx.side.inv_windows.insert(
        (cx.entry, id),
        window
            .slots
            .into_iter()
            .map(|s| InvSlot {
                sophs: s.sophs,
                optional: s.optional,
            })
            .collect(),
    );
}

/// Is the consumed multiset exactly some contiguous slot range, with only
/// optional slots skipped?
fn window_satisfiable(slots: &[InvSlot], consumed: &[SophId]) -> bool {
    for start in 0..slots.len() {
        for end in start + 1..=slots.len() {
            let mut counts: Vec<(SophId, usize)> = Vec::new();
            for &s in consumed {
                match counts.iter_mut().find(|(soph, _)| *soph == s) {
                    Some((_, n)) => *n += 1,
                    None => counts.push((s, 1)),
                }
            }
            if assign(&slots[start..end], &mut counts) {
                return true;
            }
        }
    }
    false
}

fn assign(slots: &[InvSlot], counts: &mut Vec<(SophId, usize)>) -> bool {
    let Some((slot, rest)) = slots.split_first() else {
        return counts.iter().all(|(_, n)| *n == 0);
    };
    for &soph in &slot.sophs {
        if let Some(entry) = counts.iter_mut().find(|(s, n)| *s == soph && *n > 0) {
            entry.1 -= 1;
            if assign(rest, counts) {
                return true;
            }
            if let Some(entry) = counts.iter_mut().find(|(s, _)| *s == soph) {
                entry.1 += 1;
            }
        }
    }
    if slot.optional {
        return assign(rest, counts);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(sophs: &[u32], optional: bool) -> InvSlot {
        InvSlot {
            sophs: sophs.iter().map(|&n| SophId(n)).collect(),
            optional,
        }
    }

    #[test]
    fn full_window_in_any_order() {
        let slots = vec![slot(&[1], false), slot(&[2], false), slot(&[3], false)];
        assert!(window_satisfiable(&slots, &[SophId(1), SophId(2), SophId(3)]));
        assert!(window_satisfiable(&slots, &[SophId(3), SophId(1), SophId(2)]));
        assert!(!window_satisfiable(&slots, &[SophId(1), SophId(1), SophId(3)]));
    }

    #[test]
    fn contiguous_subranges_only() {
        let slots = vec![slot(&[1], false), slot(&[2], false), slot(&[3], false)];
        assert!(window_satisfiable(&slots, &[SophId(2), SophId(3)]));
        assert!(window_satisfiable(&slots, &[SophId(1)]));
        // skipping the required middle slot is not allowed
        assert!(!window_satisfiable(&slots, &[SophId(1), SophId(3)]));
    }

    #[test]
    fn optional_slots_may_be_skipped() {
        let slots = vec![slot(&[1], false), slot(&[2], true), slot(&[3], false)];
        assert!(window_satisfiable(&slots, &[SophId(3), SophId(1)]));
        assert!(window_satisfiable(&slots, &[SophId(1), SophId(2), SophId(3)]));
    }

    #[test]
    fn multi_soph_slots_backtrack() {
        // slot 0 can spell 1 or 2; slot 1 only 1
        let slots = vec![slot(&[1, 2], false), slot(&[1], false)];
        assert!(window_satisfiable(&slots, &[SophId(1), SophId(2)]));
        assert!(window_satisfiable(&slots, &[SophId(1), SophId(1)]));
        assert!(!window_satisfiable(&slots, &[SophId(2), SophId(2)]));
    }
}
