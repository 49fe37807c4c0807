//! Forward traversal: paths, label matching, and translation extraction.

use tracing::debug;

use crate::soph::SophId;

use super::{EntryId, Ndt, NodeId, Transition, ROOT};

/// One position reached during lookup, with the full transition history that
/// got there. Histories are what validators inspect, so paths carry them
/// rather than just the node.
#[derive(Debug, Clone)]
pub struct TriePath {
    pub node: NodeId,
    pub transitions: Vec<Transition>,
}

impl TriePath {
    pub fn root() -> Self {
        TriePath {
            node: ROOT,
            transitions: Vec::new(),
        }
    }

    fn extended(&self, t: Transition, dst: NodeId) -> TriePath {
        let mut transitions = self.transitions.clone();
        transitions.push(t);
        TriePath {
            node: dst,
            transitions,
        }
    }
}

/// A translation reachable from some path, with its summed cost.
#[derive(Debug, Clone)]
pub struct TranslationHit {
    pub entry: EntryId,
    pub cost: f32,
    pub path_index: usize,
}

impl Ndt {
    /// Advance every path by exactly one matching edge. Paths with no
    /// matching edge drop out; a path may fan out over parallel edges.
    pub fn traverse(&self, paths: &[TriePath], key: Option<SophId>) -> Vec<TriePath> {
        let mut next = Vec::new();
        for path in paths {
            for (t, dst) in self.edges_from(path.node) {
                if t.key == key {
                    next.push(path.extended(t, dst));
                }
            }
        }
        next
    }

    pub fn traverse_chain(&self, paths: &[TriePath], keys: &[Option<SophId>]) -> Vec<TriePath> {
        let mut current = paths.to_vec();
        for &key in keys {
            if current.is_empty() {
                break;
            }
            current = self.traverse(&current, key);
        }
        current
    }

    /// Silent edges out of a path, taken one step. Used to seed lookups so a
    /// word-initial skip edge can be entered before any key is consumed.
    pub fn silent_successors(&self, path: &TriePath) -> Vec<TriePath> {
        self.edges_from(path.node)
            .filter(|(t, _)| t.key.is_none())
            .map(|(t, dst)| path.extended(t, dst))
            .collect()
    }

    /// Every `(entry, cost)` accepted at the tip of any path. An entry only
    /// counts when it has a cost row for every transition of the path; the
    /// accept node's residual cost for the entry is added on top.
    pub fn get_translations_and_costs(&self, paths: &[TriePath]) -> Vec<TranslationHit> {
        let mut hits = Vec::new();
        for (path_index, path) in paths.iter().enumerate() {
            'entries: for &(entry, residual) in self.accepts_at(path.node) {
                let mut cost = residual;
                for &t in &path.transitions {
                    match self.table.cost(t, entry) {
                        Some(c) => cost += c,
                        None => continue 'entries,
                    }
                }
                debug!(entry = entry.0, cost, "translation candidate");
                hits.push(TranslationHit {
                    entry,
                    cost,
                    path_index,
                });
            }
        }
        hits
    }
}
