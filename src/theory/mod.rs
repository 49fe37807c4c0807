//! Theories: the mapping between sounds, sophs, and chords.
//!
//! A theory owns the key layout, the soph interner, and every chord table
//! the compiler and lookup need. Theories are immutable once built; the
//! builder stages raw chord notation and [`TheoryBuilder::build`] parses and
//! interns everything in one pass.

pub mod english;

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

use crate::chord_trie::{ChordEntry, ChordTrie};
use crate::keys::{Bank, Chord, ChordError, Key, KeyLayout};
use crate::soph::{SophId, SophInterner};

#[derive(Debug, Error)]
pub enum TheoryError {
    #[error(transparent)]
    Chord(#[from] ChordError),
    #[error("cluster over {0:?} has no member sounds")]
    EmptyCluster(String),
}

/// A consonant or vowel run that collapses to a single chord when its member
/// sounds occur contiguously. The cluster has its own soph so the chord can
/// be recognised at lookup and rendered in reverse.
#[derive(Debug, Clone)]
pub struct ClusterDef {
    pub sophs: Vec<SophId>,
    pub label: SophId,
    pub chord: Chord,
    pub bank: Bank,
}

#[derive(Debug, Clone)]
pub struct Theory {
    layout: KeyLayout,
    sophs: SophInterner,
    sound_sophs: HashMap<String, Vec<SophId>>,
    chords: BTreeMap<(SophId, Bank), Vec<Chord>>,
    alts: HashMap<String, Vec<(Bank, SophId)>>,
    clusters: Vec<ClusterDef>,
    linker_chord: Chord,
    linker: SophId,
    boundary: SophId,
}

impl Theory {
    pub fn builder(layout: KeyLayout) -> TheoryBuilder {
        TheoryBuilder::new(layout)
    }

    pub fn layout(&self) -> &KeyLayout {
        &self.layout
    }

    pub fn sophs(&self) -> &SophInterner {
        &self.sophs
    }

    /// The stroke-boundary soph, `/`.
    pub fn boundary(&self) -> SophId {
        self.boundary
    }

    /// The linker soph, `^`.
    pub fn linker(&self) -> SophId {
        self.linker
    }

    pub fn linker_chord(&self) -> Chord {
        self.linker_chord
    }

    /// The sophs a keysymbol base maps to. May be empty for sounds the
    /// theory cannot spell.
    pub fn sophs_for(&self, base: &str) -> &[SophId] {
        self.sound_sophs.get(base).map_or(&[], Vec::as_slice)
    }

    pub fn chords(&self, soph: SophId, bank: Bank) -> &[Chord] {
        self.chords
            .get(&(soph, bank))
            .map_or(&[], Vec::as_slice)
    }

    /// The bank's canonical chords for a keysymbol base, across all its
    /// sophs. These are what an alt chord is an alternative *to*.
    pub fn main_chords(&self, base: &str, bank: Bank) -> Vec<Chord> {
        self.sophs_for(base)
            .iter()
            .flat_map(|&s| self.chords(s, bank).iter().copied())
            .collect()
    }

    pub fn alt_spellings(&self, base: &str) -> &[(Bank, SophId)] {
        self.alts.get(base).map_or(&[], Vec::as_slice)
    }

    pub fn clusters(&self) -> &[ClusterDef] {
        &self.clusters
    }

    /// Every chord that can spell `soph`, in any bank. Used when rendering
    /// reverse-lookup paths back into strokes.
    pub fn render_chords(&self, soph: SophId) -> Vec<Chord> {
        let mut out = Vec::new();
        for bank in [Bank::Left, Bank::Mid, Bank::Right] {
            for &c in self.chords(soph, bank) {
                if !out.contains(&c) {
                    out.push(c);
                }
            }
        }
        out
    }

    /// Build the deterministic key-sequence trie over every chord the theory
    /// knows, keyed by core keys in steno order.
    pub fn build_chord_trie(&self) -> ChordTrie {
        let mut trie = ChordTrie::new();
        for (&(soph, _bank), chords) in &self.chords {
            for &chord in chords {
                let keys: Vec<Key> = self.layout.core(chord).keys().collect();
                trie.insert(
                    &keys,
                    ChordEntry {
                        sophs: vec![soph],
                        chord,
                    },
                );
            }
        }
        trie
    }
}

enum RawSpec {
    Sound {
        base: String,
        bank: Bank,
        chord: String,
    },
    Alt {
        base: String,
        bank: Bank,
        alt_base: String,
    },
    Cluster {
        bases: Vec<String>,
        bank: Bank,
        chord: String,
    },
}

pub struct TheoryBuilder {
    layout: KeyLayout,
    specs: Vec<RawSpec>,
    linker_chord: String,
}

impl TheoryBuilder {
    pub fn new(layout: KeyLayout) -> Self {
        TheoryBuilder {
            layout,
            specs: Vec::new(),
            linker_chord: String::new(),
        }
    }

    /// Give `base` a canonical chord in `bank`. The soph is named by the
    /// uppercased base, so repeated calls accumulate chords on one soph.
    pub fn sound(mut self, base: &str, bank: Bank, chord: &str) -> Self {
        self.specs.push(RawSpec::Sound {
            base: base.to_string(),
            bank,
            chord: chord.to_string(),
        });
        self
    }

    /// Let `base` also be spelled by `alt_base`'s chord in `bank`, subject
    /// to the lookup-time necessity check.
    pub fn alt(mut self, base: &str, bank: Bank, alt_base: &str) -> Self {
        self.specs.push(RawSpec::Alt {
            base: base.to_string(),
            bank,
            alt_base: alt_base.to_string(),
        });
        self
    }

    pub fn cluster(mut self, bases: &[&str], bank: Bank, chord: &str) -> Self {
        self.specs.push(RawSpec::Cluster {
            bases: bases.iter().map(|s| s.to_string()).collect(),
            bank,
            chord: chord.to_string(),
        });
        self
    }

    pub fn linker(mut self, chord: &str) -> Self {
        self.linker_chord = chord.to_string();
        self
    }

    pub fn build(self) -> Result<Theory, TheoryError> {
        let mut sophs = SophInterner::new();
        let boundary = sophs.intern("/");
        let linker = sophs.intern("^");

        let mut sound_sophs: HashMap<String, Vec<SophId>> = HashMap::new();
        let mut chords: BTreeMap<(SophId, Bank), Vec<Chord>> = BTreeMap::new();
        let mut alts: HashMap<String, Vec<(Bank, SophId)>> = HashMap::new();
        let mut clusters = Vec::new();

        for spec in self.specs {
            match spec {
                RawSpec::Sound { base, bank, chord } => {
                    let soph = sophs.intern(&base.to_uppercase());
                    let chord = self.layout.parse_chord(&chord)?;
                    let list = sound_sophs.entry(base).or_default();
                    if !list.contains(&soph) {
                        list.push(soph);
                    }
                    chords.entry((soph, bank)).or_default().push(chord);
                }
                RawSpec::Alt {
                    base,
                    bank,
                    alt_base,
                } => {
                    let soph = sophs.intern(&alt_base.to_uppercase());
                    alts.entry(base).or_default().push((bank, soph));
                }
                RawSpec::Cluster { bases, bank, chord } => {
                    if bases.is_empty() {
                        return Err(TheoryError::EmptyCluster(chord));
                    }
                    let member_sophs: Vec<SophId> = bases
                        .iter()
                        .map(|b| sophs.intern(&b.to_uppercase()))
                        .collect();
                    let label_name: Vec<String> =
                        bases.iter().map(|b| b.to_uppercase()).collect();
                    let label = sophs.intern(&label_name.join("+"));
                    let chord = self.layout.parse_chord(&chord)?;
                    chords.entry((label, bank)).or_default().push(chord);
                    clusters.push(ClusterDef {
                        sophs: member_sophs,
                        label,
                        chord,
                        bank,
                    });
                }
            }
        }

        let linker_chord = self.layout.parse_chord(&self.linker_chord)?;
        chords
            .entry((linker, Bank::Left))
            .or_default()
            .push(linker_chord);

        Ok(Theory {
            layout: self.layout,
            sophs,
            sound_sophs,
            chords,
            alts,
            clusters,
            linker_chord,
            linker,
            boundary,
        })
    }
}
