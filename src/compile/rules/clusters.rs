//! Cluster chords: contiguous sound runs collapsed to one chord.
//!
//! Candidates snapshot the frontiers in force before their first sound. On
//! completion, the snapshot on the cluster's own bank is linked straight to
//! the sound run's final destination under the cluster's soph, bypassing
//! every per-sound edge in between.

use std::any::Any;

use crate::compile::sounds::{ConsonantEvent, Sound, VowelEvent};
use crate::compile::EntryCx;
use crate::keys::Bank;
use crate::ndt::{NodeId, NodeSrc};

use super::Rule;

#[derive(Debug, Clone)]
struct Candidate {
    cluster: usize,
    pos: usize,
    left: Vec<NodeSrc>,
    right: Vec<NodeSrc>,
}

#[derive(Default)]
struct State {
    active: Vec<Candidate>,
}

pub struct Clusters;

impl Clusters {
    fn advance(
        &self,
        cx: &mut EntryCx<'_>,
        state: &mut dyn Any,
        sound: &Sound,
        left_end: Option<NodeId>,
        right_end: Option<NodeId>,
    ) {
        let state = state
            .downcast_mut::<State>()
            .expect("cluster state box holds State");
        let mut survivors = Vec::new();

        // advance running candidates; a sound that is not the next member
        // breaks the run
        for mut cand in state.active.drain(..) {
            let next = cx.theory.clusters()[cand.cluster].sophs[cand.pos];
            if !sound.sophs.contains(&next) {
                continue;
            }
            cand.pos += 1;
            if cand.pos == cx.theory.clusters()[cand.cluster].sophs.len() {
                complete(cx, &cand, left_end, right_end);
            } else {
                survivors.push(cand);
            }
        }

        // start new candidates at any sound that opens a cluster, with the
        // pre-sound frontiers
        for (i, cluster) in cx.theory.clusters().iter().enumerate() {
            if !sound.sophs.contains(&cluster.sophs[0]) {
                continue;
            }
            let cand = Candidate {
                cluster: i,
                pos: 1,
                left: cx.banks.left.clone(),
                right: cx.banks.right.clone(),
            };
            if cand.pos == cluster.sophs.len() {
                complete(cx, &cand, left_end, right_end);
            } else {
                survivors.push(cand);
            }
        }

        state.active = survivors;
    }
}

fn complete(
    cx: &mut EntryCx<'_>,
    cand: &Candidate,
    left_end: Option<NodeId>,
    right_end: Option<NodeId>,
) {
    let cluster = &cx.theory.clusters()[cand.cluster];
    let (srcs, end) = match cluster.bank {
        Bank::Left => (&cand.left, left_end),
        Bank::Right => (&cand.right, right_end),
        _ => return,
    };
    let Some(end) = end else { return };
    let label = cluster.label;
    let cost = cx.costs.cluster;
    for src in srcs.clone() {
        cx.trie
            .link(src.node, end, Some(label), cost + src.cost, cx.entry);
    }
}

impl Rule for Clusters {
    fn name(&self) -> &'static str {
        "clusters"
    }

    fn after(&self) -> &'static [&'static str] {
        &["alt_chords"]
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
        self.advance(
            cx,
            state,
            ev.sound,
            ev.left.as_ref().map(|d| d.node),
            ev.right.as_ref().map(|d| d.node),
        );
    }

    fn before_complete_vowel(&self, cx: &mut EntryCx<'_>, state: &mut dyn Any, ev: &VowelEvent<'_>) {
        // a cluster ending on a vowel ends at the mid destination from
        // either bank's point of view
        self.advance(cx, state, ev.sound, Some(ev.mid.node), Some(ev.mid.node));
    }
}
