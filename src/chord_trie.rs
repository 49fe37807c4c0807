//! Deterministic trie from key sequences to the sophs they can spell.
//!
//! Built once from a theory's chord tables. Lookup walks it incrementally,
//! one key at a time, restarting a fresh search at every key position so
//! overlapping chord segmentations of a stroke are all found.

use crate::keys::{Chord, Key};
use crate::soph::SophId;

/// A chord recognised at some trie node. `sophs` is the label sequence the
/// chord spells, and `chord` the full original chord including floating
/// keys.
#[derive(Debug, Clone)]
pub struct ChordEntry {
    pub sophs: Vec<SophId>,
    pub chord: Chord,
}

#[derive(Debug, Default, Clone)]
struct Node {
    children: Vec<(Key, usize)>,
    results: Vec<ChordEntry>,
}

#[derive(Debug, Clone)]
pub struct ChordTrie {
    nodes: Vec<Node>,
}

impl Default for ChordTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl ChordTrie {
    pub fn new() -> Self {
        ChordTrie {
            nodes: vec![Node::default()],
        }
    }

    /// Insert `entry` under its chord's core key sequence in steno order.
    pub fn insert(&mut self, keys: &[Key], entry: ChordEntry) {
        let mut node = 0usize;
        for &key in keys {
            node = match self.nodes[node].children.iter().find(|(k, _)| *k == key) {
                Some(&(_, child)) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(Node::default());
                    self.nodes[node].children.push((key, child));
                    child
                }
            };
        }
        self.nodes[node].results.push(entry);
    }

    pub fn root(&self) -> usize {
        0
    }

    pub fn step(&self, node: usize, key: Key) -> Option<usize> {
        self.nodes[node]
            .children
            .iter()
            .find_map(|&(k, child)| (k == key).then_some(child))
    }

    pub fn results(&self, node: usize) -> &[ChordEntry] {
        &self.nodes[node].results
    }
}
