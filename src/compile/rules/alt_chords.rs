//! Alternative chords, valid only where the canonical chord cannot go.
//!
//! Compile time draws an extra flagged edge per alternative spelling; the
//! validator then rejects any path using one where the canonical chord
//! would have concatenated legally with its in-stroke neighbours.

use std::any::Any;

use crate::compile::sounds::ConsonantEvent;
use crate::compile::{AltInfo, EntryCx};
use crate::keys::Bank;
use crate::lookup::{Artifacts, Candidate};
use crate::ndt::flags;

use super::Rule;

pub struct AltChords;

impl Rule for AltChords {
    fn name(&self) -> &'static str {
        "alt_chords"
    }

    fn before_complete_consonant(
        &self,
        cx: &mut EntryCx<'_>,
        _state: &mut dyn Any,
        ev: &ConsonantEvent<'_>,
    ) {
        let alts = cx.theory.alt_spellings(&ev.sound.base).to_vec();
        for (bank, alt_soph) in alts {
            let dst = match bank {
                Bank::Left => ev.left.as_ref(),
                Bank::Right => ev.right.as_ref(),
                _ => None,
            };
            let Some(dst) = dst else { continue };
            let srcs = match bank {
                Bank::Left => cx.banks.left.clone(),
                Bank::Right => cx.banks.right.clone(),
                _ => unreachable!("alt spellings are left or right bank"),
            };
            let mains = cx.theory.main_chords(&ev.sound.base, bank);
            for src in srcs {
                let t = cx.trie.link(
                    src.node,
                    dst.node,
                    Some(alt_soph),
                    cx.costs.alt + src.cost,
                    cx.entry,
                );
                cx.trie.table.set_flag(t, cx.entry, flags::ALT);
                cx.side.alt.insert(
                    t,
                    AltInfo {
                        mains: mains.clone(),
                        bank,
                    },
                );
            }
        }
    }

    fn validate(&self, art: &Artifacts, cand: &Candidate) -> bool {
        let layout = art.theory.layout();
        for t in &cand.transitions {
            if !art.ndt.table.has_flag(*t, cand.entry, flags::ALT) {
                continue;
            }
            let Some(info) = art.side.alt.get(t) else {
                continue;
            };
            let Some(assoc) = cand.assocs.iter().find(|a| a.transitions.contains(t)) else {
                continue;
            };
            let prev = cand
                .assocs
                .iter()
                .find(|p| p.stroke == assoc.stroke && p.end_key == assoc.start_key);
            let next = cand
                .assocs
                .iter()
                .find(|n| n.stroke == assoc.stroke && n.start_key == assoc.end_key);
            // the alternative is only allowed when no canonical chord fits
            // between the neighbours
            for &main in &info.mains {
                let prev_ok = prev.map_or(true, |p| layout.can_concat(p.chord, main));
                let next_ok = next.map_or(true, |n| layout.can_concat(main, n.chord));
                if prev_ok && next_ok {
                    return false;
                }
            }
        }
        true
    }
}
