//! The nondeterministic trie that all entries compile into.
//!
//! Nodes are arena indices and edges live in per-node adjacency lists, so
//! structure is shared freely between entries: two words spelled with the
//! same chords walk the very same edges. Which entries use an edge, and at
//! what cost, is tracked off to the side in a [`TransitionTable`].
//!
//! Edges are labelled with an `Option<SophId>`; `None` is a silent edge that
//! consumes no input.

mod path;
mod reverse;
mod transition;

pub use path::{TranslationHit, TriePath};
pub use reverse::ReverseIndex;
pub use transition::{flags, Transition, TransitionTable};

use std::collections::HashMap;

use crate::soph::SophId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

pub const ROOT: NodeId = NodeId(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub u32);

impl EntryId {
    #[inline]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

/// A node plus the cost already owed for reaching it. Frontier sets during
/// compilation are lists of these; the extra cost is charged on the next
/// edge drawn out of the node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeSrc {
    pub node: NodeId,
    pub cost: f32,
}

impl NodeSrc {
    pub fn base(node: NodeId) -> Self {
        NodeSrc { node, cost: 0.0 }
    }
}

#[derive(Debug, Clone, Copy)]
struct Edge {
    key: Option<SophId>,
    dup: u16,
    dst: NodeId,
}

#[derive(Debug, Clone)]
pub struct Ndt {
    out: Vec<Vec<Edge>>,
    pub table: TransitionTable,
    accepts: HashMap<NodeId, Vec<(EntryId, f32)>>,
    accept_nodes: HashMap<EntryId, Vec<NodeId>>,
}

impl Default for Ndt {
    fn default() -> Self {
        Self::new()
    }
}

impl Ndt {
    pub fn new() -> Self {
        Ndt {
            out: vec![Vec::new()],
            table: TransitionTable::default(),
            accepts: HashMap::new(),
            accept_nodes: HashMap::new(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.out.len()
    }

    fn new_node(&mut self) -> NodeId {
        let id = NodeId(self.out.len() as u32);
        self.out.push(Vec::new());
        id
    }

    fn dup_count(&self, src: NodeId, key: Option<SophId>) -> u16 {
        self.out[src.idx()].iter().filter(|e| e.key == key).count() as u16
    }

    pub(crate) fn edges_from(
        &self,
        src: NodeId,
    ) -> impl Iterator<Item = (Transition, NodeId)> + '_ {
        self.out[src.idx()].iter().map(move |e| {
            (
                Transition {
                    src,
                    key: e.key,
                    dup: e.dup,
                },
                e.dst,
            )
        })
    }

    /// Reuse the first `key`-labelled edge out of `src` that `entry` does not
    /// already use; create a fresh edge and node when there is none. Reuse is
    /// what gives two entries with a common sound prefix a common path.
    pub fn follow(
        &mut self,
        src: NodeId,
        key: Option<SophId>,
        cost: f32,
        entry: EntryId,
    ) -> (Transition, NodeId) {
        let found = self.out[src.idx()].iter().find_map(|e| {
            let t = Transition {
                src,
                key: e.key,
                dup: e.dup,
            };
            (e.key == key && !self.table.has(t, entry)).then_some((t, e.dst))
        });
        let (t, dst) = match found {
            Some(hit) => hit,
            None => {
                let dst = self.new_node();
                let dup = self.dup_count(src, key);
                self.out[src.idx()].push(Edge { key, dup, dst });
                (Transition { src, key, dup }, dst)
            }
        };
        self.table.set_cost(t, entry, cost);
        (t, dst)
    }

    /// [`follow`] through a chain of labels; `cost` lands on the final edge
    /// and intermediate edges are free.
    ///
    /// [`follow`]: Ndt::follow
    pub fn follow_chain(
        &mut self,
        src: NodeId,
        keys: &[Option<SophId>],
        cost: f32,
        entry: EntryId,
    ) -> (Vec<Transition>, NodeId) {
        let mut transitions = Vec::with_capacity(keys.len());
        let mut node = src;
        for (i, &key) in keys.iter().enumerate() {
            let edge_cost = if i + 1 == keys.len() { cost } else { 0.0 };
            let (t, next) = self.follow(node, key, edge_cost, entry);
            transitions.push(t);
            node = next;
        }
        (transitions, node)
    }

    /// Always create a new edge from `src` to an existing `dst`.
    pub fn link(
        &mut self,
        src: NodeId,
        dst: NodeId,
        key: Option<SophId>,
        cost: f32,
        entry: EntryId,
    ) -> Transition {
        let dup = self.dup_count(src, key);
        self.out[src.idx()].push(Edge { key, dup, dst });
        let t = Transition { src, key, dup };
        self.table.set_cost(t, entry, cost);
        t
    }

    /// [`follow_chain`] for all labels but the last, then [`link`] into `dst`.
    ///
    /// [`follow_chain`]: Ndt::follow_chain
    /// [`link`]: Ndt::link
    pub fn link_chain(
        &mut self,
        src: NodeId,
        dst: NodeId,
        keys: &[Option<SophId>],
        cost: f32,
        entry: EntryId,
    ) -> Vec<Transition> {
        debug_assert!(!keys.is_empty());
        let (mut transitions, node) = self.follow_chain(src, &keys[..keys.len() - 1], 0.0, entry);
        transitions.push(self.link(node, dst, keys[keys.len() - 1], cost, entry));
        transitions
    }

    /// Merge several frontier sources into one shared destination, one edge
    /// per source, labels drawn from `keys` cycled. The first edge goes
    /// through [`follow`], so a shared prefix keeps its shared node; the rest
    /// are linked into the node the first edge reached.
    ///
    /// Returns `None` when there is nothing to join.
    ///
    /// [`follow`]: Ndt::follow
    pub fn join(
        &mut self,
        srcs: &[NodeSrc],
        keys: &[Option<SophId>],
        base_cost: f32,
        entry: EntryId,
    ) -> Option<(NodeId, Vec<Transition>)> {
        if srcs.is_empty() || keys.is_empty() {
            return None;
        }
        let mut labels = keys.iter().copied().cycle();
        let first_key = labels.next().expect("keys is non-empty");
        let (t0, dst) = self.follow(srcs[0].node, first_key, base_cost + srcs[0].cost, entry);
        let mut transitions = vec![t0];
        for src in &srcs[1..] {
            let key = labels.next().expect("cycled iterator");
            transitions.push(self.link(src.node, dst, key, base_cost + src.cost, entry));
        }
        Some((dst, transitions))
    }

    /// Like [`join`], but into an existing destination when one is given.
    ///
    /// [`join`]: Ndt::join
    pub fn link_join(
        &mut self,
        srcs: &[NodeSrc],
        dst: Option<NodeId>,
        keys: &[Option<SophId>],
        base_cost: f32,
        entry: EntryId,
    ) -> Option<(NodeId, Vec<Transition>)> {
        let Some(dst) = dst else {
            return self.join(srcs, keys, base_cost, entry);
        };
        if srcs.is_empty() || keys.is_empty() {
            return None;
        }
        let mut labels = keys.iter().copied().cycle();
        let mut transitions = Vec::with_capacity(srcs.len());
        for src in srcs {
            let key = labels.next().expect("cycled iterator");
            transitions.push(self.link(src.node, dst, key, base_cost + src.cost, entry));
        }
        Some((dst, transitions))
    }

    /// Chain variant of [`join`]: each source walks the whole label chain and
    /// the chains converge on the node the first source reached.
    ///
    /// [`join`]: Ndt::join
    pub fn join_chain(
        &mut self,
        srcs: &[NodeSrc],
        keys: &[Option<SophId>],
        base_cost: f32,
        entry: EntryId,
    ) -> Option<(NodeId, Vec<Transition>)> {
        if srcs.is_empty() || keys.is_empty() {
            return None;
        }
        let (mut transitions, dst) =
            self.follow_chain(srcs[0].node, keys, base_cost + srcs[0].cost, entry);
        for src in &srcs[1..] {
            transitions.extend(self.link_chain(src.node, dst, keys, base_cost + src.cost, entry));
        }
        Some((dst, transitions))
    }

    /// Chain variant of [`link_join`].
    ///
    /// [`link_join`]: Ndt::link_join
    pub fn link_join_chain(
        &mut self,
        srcs: &[NodeSrc],
        dst: Option<NodeId>,
        keys: &[Option<SophId>],
        base_cost: f32,
        entry: EntryId,
    ) -> Option<(NodeId, Vec<Transition>)> {
        let Some(dst) = dst else {
            return self.join_chain(srcs, keys, base_cost, entry);
        };
        if srcs.is_empty() || keys.is_empty() {
            return None;
        }
        let mut transitions = Vec::new();
        for src in srcs {
            transitions.extend(self.link_chain(src.node, dst, keys, base_cost + src.cost, entry));
        }
        Some((dst, transitions))
    }

    /// Mark `node` as accepting `entry`, with a residual cost owed by paths
    /// that stop there (non-zero when trailing optional sounds were skipped).
    pub fn mark_accept(&mut self, node: NodeId, entry: EntryId, residual_cost: f32) {
        self.accepts
            .entry(node)
            .or_default()
            .push((entry, residual_cost));
        self.accept_nodes.entry(entry).or_default().push(node);
    }

    pub fn accepts_at(&self, node: NodeId) -> &[(EntryId, f32)] {
        self.accepts.get(&node).map_or(&[], Vec::as_slice)
    }

    pub fn accept_nodes(&self, entry: EntryId) -> &[NodeId] {
        self.accept_nodes.get(&entry).map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn soph(n: u32) -> Option<SophId> {
        Some(SophId(n))
    }

    #[test]
    fn follow_reuses_per_entry() {
        let mut ndt = Ndt::new();
        let a = EntryId(0);
        let b = EntryId(1);

        let (t1, n1) = ndt.follow(ROOT, soph(0), 0.0, a);
        // same entry asking again gets a fresh edge; the first is taken
        let (t2, n2) = ndt.follow(ROOT, soph(0), 0.0, a);
        assert_ne!(n1, n2);
        assert_ne!(t1.dup, t2.dup);
        // a different entry shares the first edge
        let (t3, n3) = ndt.follow(ROOT, soph(0), 1.5, b);
        assert_eq!(n3, n1);
        assert_eq!(t3, t1);
        assert_eq!(ndt.table.cost(t1, a), Some(0.0));
        assert_eq!(ndt.table.cost(t1, b), Some(1.5));
    }

    #[test]
    fn join_converges_on_first_destination() {
        let mut ndt = Ndt::new();
        let e = EntryId(0);
        let (_, n1) = ndt.follow(ROOT, soph(0), 0.0, e);
        let (_, n2) = ndt.follow(ROOT, soph(1), 0.0, e);

        let srcs = [NodeSrc::base(n1), NodeSrc { node: n2, cost: 5.0 }];
        let (dst, ts) = ndt.join(&srcs, &[soph(2)], 1.0, e).unwrap();
        assert_eq!(ts.len(), 2);
        assert_eq!(ndt.table.cost(ts[0], e), Some(1.0));
        assert_eq!(ndt.table.cost(ts[1], e), Some(6.0));

        // a second entry joining the same label from n1 lands on the same node
        let e2 = EntryId(1);
        let (dst2, _) = ndt.join(&[NodeSrc::base(n1)], &[soph(2)], 0.0, e2).unwrap();
        assert_eq!(dst2, dst);
    }

    #[test]
    fn join_cycles_labels_over_sources() {
        let mut ndt = Ndt::new();
        let e = EntryId(0);
        let (_, n1) = ndt.follow(ROOT, soph(0), 0.0, e);
        let srcs = [NodeSrc::base(ROOT), NodeSrc::base(n1), NodeSrc::base(ROOT)];
        let (_, ts) = ndt.join(&srcs, &[soph(7), soph(8)], 0.0, e).unwrap();
        assert_eq!(ts[0].key, soph(7));
        assert_eq!(ts[1].key, soph(8));
        assert_eq!(ts[2].key, soph(7));
    }

    #[test]
    fn link_join_into_existing_destination() {
        let mut ndt = Ndt::new();
        let e = EntryId(0);
        let (_, shared) = ndt.follow(ROOT, soph(0), 0.0, e);
        let (_, other) = ndt.follow(ROOT, soph(1), 0.0, e);

        let (dst, ts) = ndt
            .link_join(&[NodeSrc::base(other)], Some(shared), &[soph(2)], 2.0, e)
            .unwrap();
        assert_eq!(dst, shared);
        assert_eq!(ts.len(), 1);
        assert_eq!(ndt.table.cost(ts[0], e), Some(2.0));
        assert!(ndt.link_join(&[], Some(shared), &[soph(2)], 0.0, e).is_none());
    }

    #[test]
    fn chain_cost_lands_on_final_edge() {
        let mut ndt = Ndt::new();
        let e = EntryId(0);
        let (ts, _) = ndt.follow_chain(ROOT, &[soph(0), soph(1), soph(2)], 9.0, e);
        assert_eq!(ndt.table.cost(ts[0], e), Some(0.0));
        assert_eq!(ndt.table.cost(ts[1], e), Some(0.0));
        assert_eq!(ndt.table.cost(ts[2], e), Some(9.0));
    }

    #[test]
    fn accepts_are_per_entry() {
        let mut ndt = Ndt::new();
        let e = EntryId(3);
        let (_, n) = ndt.follow(ROOT, soph(0), 0.0, e);
        ndt.mark_accept(n, e, 5.0);
        assert_eq!(ndt.accepts_at(n), &[(e, 5.0)]);
        assert_eq!(ndt.accept_nodes(e), &[n]);
        assert!(ndt.accepts_at(ROOT).is_empty());
    }
}
