//! The bank walk: folds one definition's sounds into the trie.
//!
//! Consonants draw edges in the left and right banks from the current
//! frontiers; vowels draw mid-bank edges and open the next stroke. Optional
//! sounds keep the previous frontier alive at an elision surcharge, so every
//! path that skips them still exists, just costlier.

use tracing::debug;

use crate::keys::Bank;
use crate::ndt::{NodeSrc, ROOT};
use crate::soph::SophId;

use super::sounds::{self, BankDst, ConsonantEvent, Sound, SoundKind, VowelEvent};
use super::{AdditionError, EntryCx, Rule};

pub(crate) fn add_entry(
    cx: &mut EntryCx<'_>,
    rules: &[Box<dyn Rule>],
) -> Result<(), AdditionError> {
    let def = cx.def;
    let theory = cx.theory;
    let sounds = sounds::enumerate(def, theory);
    if sounds.is_empty() {
        return Err(AdditionError::EmptyDefinition);
    }

    cx.banks = super::BankState {
        left: vec![NodeSrc::base(ROOT)],
        mid: vec![NodeSrc::base(ROOT)],
        right: vec![NodeSrc::base(ROOT)],
    };
    let mut states: Vec<_> = rules.iter().map(|r| r.begin_entry(cx)).collect();

    for sound in &sounds {
        match sound.kind {
            SoundKind::Consonant => consonant(cx, rules, &mut states, sound)?,
            SoundKind::Vowel => vowel(cx, rules, &mut states, sound)?,
        }
    }

    for (rule, state) in rules.iter().zip(states.iter_mut()) {
        rule.finish_entry(cx, state.as_mut());
    }

    // every surviving right-bank frontier node accepts, owing its carried
    // cost as a residual
    let accepts = cx.banks.right.clone();
    if accepts.is_empty() {
        // the final required sound spelled only on the left; no stroke can
        // close, so nothing would ever accept
        return Err(AdditionError::NoFinalStroke);
    }
    for src in &accepts {
        cx.trie.mark_accept(src.node, cx.entry, src.cost);
    }
    debug!(accepts = accepts.len(), "entry complete");
    Ok(())
}

/// Draw one shared destination for a sound in one bank: all sources joined
/// over every soph of the sound that the bank can spell.
fn draw_bank(
    cx: &mut EntryCx<'_>,
    srcs: &[NodeSrc],
    sophs: &[SophId],
    bank: Bank,
) -> Option<BankDst> {
    let labels: Vec<Option<SophId>> = sophs
        .iter()
        .copied()
        .filter(|&s| !cx.theory.chords(s, bank).is_empty())
        .map(Some)
        .collect();
    if labels.is_empty() || srcs.is_empty() {
        return None;
    }
    let mut node = None;
    let mut transitions = Vec::new();
    for label in labels {
        let (dst, ts) = cx
            .trie
            .link_join(srcs, node, &[label], 0.0, cx.entry)
            .expect("srcs and labels are non-empty");
        node = Some(dst);
        transitions.extend(ts);
    }
    node.map(|node| BankDst { node, transitions })
}

fn dedup_srcs(mut srcs: Vec<NodeSrc>) -> Vec<NodeSrc> {
    let mut out: Vec<NodeSrc> = Vec::with_capacity(srcs.len());
    srcs.drain(..).for_each(|s| {
        match out.iter_mut().find(|o| o.node == s.node) {
            Some(o) => o.cost = o.cost.min(s.cost),
            None => out.push(s),
        }
    });
    out
}

fn consonant(
    cx: &mut EntryCx<'_>,
    rules: &[Box<dyn Rule>],
    states: &mut [Box<dyn std::any::Any>],
    sound: &Sound,
) -> Result<(), AdditionError> {
    for (rule, state) in rules.iter().zip(states.iter_mut()) {
        rule.begin_consonant(cx, state.as_mut(), sound);
    }

    let left_srcs = cx.banks.left.clone();
    let right_srcs = cx.banks.right.clone();
    let left = draw_bank(cx, &left_srcs, &sound.sophs, Bank::Left);
    let right = draw_bank(cx, &right_srcs, &sound.sophs, Bank::Right);
    if left.is_none() && right.is_none() {
        return Err(AdditionError::NoChord(sound.base.clone()));
    }
    let ev = ConsonantEvent {
        sound,
        left,
        right,
    };

    for (rule, state) in rules.iter().zip(states.iter_mut()) {
        rule.before_complete_consonant(cx, state.as_mut(), &ev);
    }

    let boundary = Some(cx.theory.boundary());
    // the cross edge: a stroke may end after the right-bank spelling and
    // resume at the left-bank one
    if let (Some(l), Some(r)) = (&ev.left, &ev.right) {
        cx.trie.link(r.node, l.node, boundary, 0.0, cx.entry);
    }

    let optional = sound.keysymbol.optional;
    let elision = cx.costs.elision;
    let old_left = std::mem::take(&mut cx.banks.left);
    let old_right = std::mem::take(&mut cx.banks.right);

    let mut new_left = match (&ev.left, &ev.right) {
        (Some(l), _) => vec![NodeSrc::base(l.node)],
        (None, Some(r)) => {
            // no left spelling: the left bank can only continue next stroke
            let (_, cont) = cx.trie.follow(r.node, boundary, 0.0, cx.entry);
            vec![NodeSrc::base(cont)]
        }
        (None, None) => unreachable!("checked above"),
    };
    if optional {
        new_left.extend(old_left.iter().map(|s| NodeSrc {
            node: s.node,
            cost: s.cost + elision,
        }));
    }
    let mut new_right: Vec<NodeSrc> = ev
        .right
        .as_ref()
        .map(|r| vec![NodeSrc::base(r.node)])
        .unwrap_or_default();
    if optional {
        new_right.extend(old_right.iter().map(|s| NodeSrc {
            node: s.node,
            cost: s.cost + elision,
        }));
    }

    cx.banks.left = dedup_srcs(new_left);
    cx.banks.mid = cx.banks.left.clone();
    cx.banks.right = dedup_srcs(new_right);

    for (rule, state) in rules.iter().zip(states.iter_mut()) {
        rule.complete_consonant(cx, state.as_mut(), &ev);
    }
    Ok(())
}

fn vowel(
    cx: &mut EntryCx<'_>,
    rules: &[Box<dyn Rule>],
    states: &mut [Box<dyn std::any::Any>],
    sound: &Sound,
) -> Result<(), AdditionError> {
    for (rule, state) in rules.iter().zip(states.iter_mut()) {
        rule.begin_vowel(cx, state.as_mut(), sound);
    }

    let mid_srcs = cx.banks.mid.clone();
    let mid = draw_bank(cx, &mid_srcs, &sound.sophs, Bank::Mid)
        .ok_or_else(|| AdditionError::NoChord(sound.base.clone()))?;
    let mut ev = VowelEvent {
        sound,
        mid,
        new_stroke: None,
    };

    for (rule, state) in rules.iter().zip(states.iter_mut()) {
        rule.before_complete_vowel(cx, state.as_mut(), &ev);
    }

    let boundary = Some(cx.theory.boundary());
    let (_, new_stroke) = cx.trie.follow(ev.mid.node, boundary, 0.0, cx.entry);
    ev.new_stroke = Some(new_stroke);

    let optional = sound.keysymbol.optional;
    let elision = cx.costs.elision;
    let old_left = std::mem::take(&mut cx.banks.left);
    let old_right = std::mem::take(&mut cx.banks.right);

    let mut new_left = vec![NodeSrc::base(new_stroke)];
    if optional {
        new_left.extend(old_left.iter().map(|s| NodeSrc {
            node: s.node,
            cost: s.cost + elision,
        }));
    }
    let mut new_right = vec![NodeSrc::base(ev.mid.node)];
    if optional {
        new_right.extend(old_right.iter().map(|s| NodeSrc {
            node: s.node,
            cost: s.cost + elision,
        }));
    }

    cx.banks.left = dedup_srcs(new_left);
    cx.banks.mid = cx.banks.left.clone();
    cx.banks.right = dedup_srcs(new_right);

    for (rule, state) in rules.iter().zip(states.iter_mut()) {
        rule.complete_vowel(cx, state.as_mut(), &ev);
    }
    Ok(())
}
