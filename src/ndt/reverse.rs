//! Reverse adjacency for walking from accept nodes back to the root.

use std::collections::HashSet;

use super::{EntryId, Ndt, NodeId, Transition, ROOT};

/// Incoming-edge index over the whole trie. Built once after compilation and
/// shared by all reverse lookups.
#[derive(Debug, Clone)]
pub struct ReverseIndex {
    incoming: Vec<Vec<(NodeId, Transition)>>,
}

impl Ndt {
    pub fn build_reverse_lookup(&self) -> ReverseIndex {
        let mut incoming = vec![Vec::new(); self.node_count()];
        for src in 0..self.node_count() {
            let src = NodeId(src as u32);
            for (t, dst) in self.edges_from(src) {
                incoming[dst.idx()].push((src, t));
            }
        }
        ReverseIndex { incoming }
    }
}

impl ReverseIndex {
    /// All root-to-accept transition sequences that `entry` pays for. Walks
    /// backwards from each accept node along edges costed for the entry.
    pub fn paths(&self, ndt: &Ndt, entry: EntryId) -> Vec<Vec<Transition>> {
        let mut out = Vec::new();
        for &accept in ndt.accept_nodes(entry) {
            self.collect(ndt, entry, accept, &mut Vec::new(), &mut HashSet::new(), &mut out);
        }
        out
    }

    fn collect(
        &self,
        ndt: &Ndt,
        entry: EntryId,
        node: NodeId,
        suffix: &mut Vec<Transition>,
        on_path: &mut HashSet<Transition>,
        out: &mut Vec<Vec<Transition>>,
    ) {
        if node == ROOT {
            let mut path: Vec<Transition> = suffix.clone();
            path.reverse();
            out.push(path);
            // the root has no incoming edges of its own in a trie built from
            // it, so stop here
            return;
        }
        for &(src, t) in &self.incoming[node.idx()] {
            if !ndt.table.has(t, entry) || on_path.contains(&t) {
                continue;
            }
            on_path.insert(t);
            suffix.push(t);
            self.collect(ndt, entry, src, suffix, on_path, out);
            suffix.pop();
            on_path.remove(&t);
        }
    }
}
