//! The lexicon compiler: resolves definitions and folds every entry into
//! the shared nondeterministic trie.
//!
//! The [`Engine`] owns the theory, the settings, and a stack of [`Rule`]
//! plugins. Rules communicate with the core bank walk only through typed
//! hook methods and an opaque per-entry state box; there is no global
//! registry and no shared mutable store.

pub mod banks;
pub mod rules;
pub mod sounds;

pub use rules::Rule;

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, debug_span, warn};

use crate::definition::parse::{resolve, DefinitionError};
use crate::definition::{is_morpheme_varname, Definition};
use crate::keys::{Bank, Chord};
use crate::lookup::{Artifacts, Lookup};
use crate::ndt::{EntryId, Ndt, NodeSrc, Transition};
use crate::settings::{CostSettings, Settings};
use crate::soph::SophId;
use crate::theory::Theory;

/// Why one entry could not be added. Entry failures are isolated: the entry
/// is skipped and counted, the batch continues.
#[derive(Debug, Error)]
pub enum AdditionError {
    #[error("definition has no pronounced sounds")]
    EmptyDefinition,
    #[error("sound {0:?} has no chord in any usable bank")]
    NoChord(String),
    #[error("no stroke can end after the final sound")]
    NoFinalStroke,
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("rule ordering cycle involving {0:?}")]
    RuleCycle(String),
}

#[derive(Debug, Default, Clone)]
pub struct CompileStats {
    pub entries_added: usize,
    pub entries_failed: usize,
    pub morphemes: usize,
    pub nodes: usize,
    pub transitions: usize,
}

/// Side information a rule leaves behind for its lookup-time validator.
#[derive(Debug, Clone)]
pub struct AltInfo {
    pub mains: Vec<Chord>,
    pub bank: Bank,
}

#[derive(Debug, Clone)]
pub struct InvSlot {
    pub sophs: Vec<SophId>,
    pub optional: bool,
}

#[derive(Debug, Default, Clone)]
pub struct SideTables {
    pub alt: HashMap<Transition, AltInfo>,
    pub inv_member: HashMap<(Transition, EntryId), u32>,
    pub inv_windows: HashMap<(EntryId, u32), Vec<InvSlot>>,
    next_window: u32,
}

impl SideTables {
    pub fn new_window(&mut self) -> u32 {
        let id = self.next_window;
        self.next_window += 1;
        id
    }
}

/// The frontier sets of the bank walk. Each is the set of nodes the next
/// edge of that bank may be drawn from.
#[derive(Debug, Default, Clone)]
pub struct BankState {
    pub left: Vec<NodeSrc>,
    pub mid: Vec<NodeSrc>,
    pub right: Vec<NodeSrc>,
}

/// Everything a rule hook may touch while one entry is being compiled.
pub struct EntryCx<'a> {
    pub trie: &'a mut Ndt,
    pub theory: &'a Theory,
    pub costs: &'a CostSettings,
    pub side: &'a mut SideTables,
    pub entry: EntryId,
    pub def: &'a Definition,
    pub banks: BankState,
}

pub struct Engine {
    theory: Theory,
    settings: Settings,
    rules: Vec<Box<dyn Rule>>,
}

impl Engine {
    pub fn new(theory: Theory, settings: Settings) -> Self {
        Engine {
            theory,
            settings,
            rules: Vec::new(),
        }
    }

    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn theory(&self) -> &Theory {
        &self.theory
    }

    /// Compile `(varname, source)` pairs into a lookup. Morpheme varnames
    /// are transclusion material only; every other varname becomes an entry
    /// translating to its definition's spelling.
    pub fn compile(
        self,
        entries: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Lookup, CompileError> {
        let Engine {
            theory,
            settings,
            rules,
        } = self;
        let rules = rules::order_rules(rules)?;

        let mut order = Vec::new();
        let mut sources = HashMap::new();
        for (varname, source) in entries {
            order.push(varname.clone());
            sources.insert(varname, source);
        }

        let mut ndt = Ndt::new();
        let mut side = SideTables::default();
        let mut stats = CompileStats::default();
        let mut translations: Vec<String> = Vec::new();
        let mut by_word: HashMap<String, Vec<EntryId>> = HashMap::new();

        for varname in &order {
            if is_morpheme_varname(varname) {
                stats.morphemes += 1;
                continue;
            }
            let span = debug_span!("entry", varname = %varname);
            let _enter = span.enter();

            let mut def = match resolve(varname, &sources) {
                Ok(def) => def,
                Err(DefinitionError::Parse(e)) => {
                    warn!(error = %e, "skipping unparsable entry");
                    stats.entries_failed += 1;
                    continue;
                }
                Err(DefinitionError::Transclusion(e)) => {
                    warn!(error = %e, "skipping entry with bad transclusion");
                    stats.entries_failed += 1;
                    continue;
                }
            };
            for rule in &rules {
                rule.process_definition(&theory, &mut def);
            }

            let entry = EntryId(translations.len() as u32);
            let spelling = def.spelling();
            translations.push(spelling.clone());

            let mut cx = EntryCx {
                trie: &mut ndt,
                theory: &theory,
                costs: &settings.costs,
                side: &mut side,
                entry,
                def: &def,
                banks: BankState::default(),
            };
            match banks::add_entry(&mut cx, &rules) {
                Ok(()) => {
                    debug!(entry = entry.0, word = %spelling, "entry added");
                    by_word.entry(spelling).or_default().push(entry);
                    stats.entries_added += 1;
                }
                Err(e) => {
                    warn!(error = %e, "skipping entry");
                    stats.entries_failed += 1;
                }
            }
        }

        stats.nodes = ndt.node_count();
        stats.transitions = ndt.table.len();
        debug!(
            added = stats.entries_added,
            failed = stats.entries_failed,
            nodes = stats.nodes,
            "compile finished"
        );

        let chord_trie = theory.build_chord_trie();
        Ok(Lookup::new(
            Artifacts {
                ndt,
                chord_trie,
                theory,
                settings,
                translations,
                by_word,
                side,
                stats,
            },
            rules,
        ))
    }
}
