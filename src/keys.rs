//! Steno key layouts, chords, and outlines.
//!
//! A layout is an ordered list of keys; key order is the order in which keys
//! may legally be combined within a single stroke. A [`Chord`] is a bitmask
//! over layout positions, so the same label may occur at several positions
//! (left-bank `S` and right-bank `-S` are distinct keys).
//!
//! Steno notation is parsed with the usual implicit-hyphen rule: each
//! character claims the next matching key at or after the previous one, and
//! an explicit `-` jumps the scan to the right bank.

use std::fmt;

use thiserror::Error;

/// Index of a key within its layout's steno order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(pub u8);

impl Key {
    #[inline]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Which region of the layout a key belongs to. Floating keys (like `*`) are
/// exempt from key-order checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bank {
    Left,
    Mid,
    Right,
    Floating,
}

#[derive(Debug, Clone)]
pub struct KeyDef {
    pub label: char,
    pub bank: Bank,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChordError {
    #[error("chord {input:?} has no key for {label:?} at or after position {at}")]
    NoSuchKey { input: String, label: char, at: usize },
    #[error("empty chord in outline {input:?}")]
    Empty { input: String },
}

/// A set of pressed keys within one stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Chord {
    mask: u32,
}

impl Chord {
    pub const EMPTY: Chord = Chord { mask: 0 };

    pub fn from_keys(keys: impl IntoIterator<Item = Key>) -> Self {
        let mut c = Chord::EMPTY;
        for k in keys {
            c.insert(k);
        }
        c
    }

    #[inline]
    pub fn insert(&mut self, key: Key) {
        self.mask |= 1 << key.0;
    }

    #[inline]
    pub fn contains(self, key: Key) -> bool {
        self.mask & (1 << key.0) != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.mask == 0
    }

    pub fn len(self) -> usize {
        self.mask.count_ones() as usize
    }

    #[inline]
    pub fn union(self, other: Chord) -> Chord {
        Chord {
            mask: self.mask | other.mask,
        }
    }

    /// True if every key of `self` is also in `other`.
    pub fn is_subset_of(self, other: Chord) -> bool {
        self.mask & !other.mask == 0
    }

    /// Keys in ascending steno order.
    pub fn keys(self) -> impl Iterator<Item = Key> {
        let mask = self.mask;
        (0..32u8).filter(move |i| mask & (1 << i) != 0).map(Key)
    }

    pub fn first_key(self) -> Option<Key> {
        if self.mask == 0 {
            None
        } else {
            Some(Key(self.mask.trailing_zeros() as u8))
        }
    }

    pub fn last_key(self) -> Option<Key> {
        if self.mask == 0 {
            None
        } else {
            Some(Key(31 - self.mask.leading_zeros() as u8))
        }
    }
}

/// An ordered steno key layout. Owns parsing and formatting of chords and
/// outlines, and the key-order legality check for concatenation.
#[derive(Debug, Clone)]
pub struct KeyLayout {
    keys: Vec<KeyDef>,
    floating: Chord,
}

impl KeyLayout {
    pub fn new(keys: Vec<KeyDef>) -> Self {
        assert!(keys.len() <= 32, "layouts are limited to 32 keys");
        let mut floating = Chord::EMPTY;
        for (i, def) in keys.iter().enumerate() {
            if def.bank == Bank::Floating {
                floating.insert(Key(i as u8));
            }
        }
        KeyLayout { keys, floating }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn bank(&self, key: Key) -> Bank {
        self.keys[key.idx()].bank
    }

    pub fn label(&self, key: Key) -> char {
        self.keys[key.idx()].label
    }

    /// The floating keys of `chord`.
    pub fn floaters(&self, chord: Chord) -> Chord {
        Chord {
            mask: chord.mask & self.floating.mask,
        }
    }

    /// `chord` with its floating keys removed.
    pub fn core(&self, chord: Chord) -> Chord {
        Chord {
            mask: chord.mask & !self.floating.mask,
        }
    }

    /// Two chords may share a stroke when their core keys do not overlap in
    /// steno order. A chord with no core keys concatenates with anything.
    pub fn can_concat(&self, a: Chord, b: Chord) -> bool {
        let (a, b) = (self.core(a), self.core(b));
        match (a.last_key(), b.first_key()) {
            (Some(last), Some(first)) => last < first,
            _ => true,
        }
    }

    pub fn parse_chord(&self, input: &str) -> Result<Chord, ChordError> {
        let mut chord = Chord::EMPTY;
        let mut cursor = 0usize;
        let right_start = self
            .keys
            .iter()
            .position(|k| k.bank == Bank::Right)
            .unwrap_or(self.keys.len());
        for ch in input.chars() {
            if ch == '-' {
                cursor = cursor.max(right_start);
                continue;
            }
            let pos = (cursor..self.keys.len())
                .find(|&i| self.keys[i].label == ch)
                .ok_or_else(|| ChordError::NoSuchKey {
                    input: input.to_string(),
                    label: ch,
                    at: cursor,
                })?;
            chord.insert(Key(pos as u8));
            cursor = pos + 1;
        }
        if chord.is_empty() {
            return Err(ChordError::Empty {
                input: input.to_string(),
            });
        }
        Ok(chord)
    }

    pub fn format_chord(&self, chord: Chord) -> String {
        // The hyphen is needed when the only disambiguating keys (mid bank
        // and floaters) are absent but right-bank keys are present.
        let needs_hyphen = chord
            .keys()
            .all(|k| matches!(self.bank(k), Bank::Left | Bank::Right))
            && chord.keys().any(|k| self.bank(k) == Bank::Right);
        let mut out = String::new();
        let mut hyphen_pending = needs_hyphen;
        for key in chord.keys() {
            if hyphen_pending && self.bank(key) == Bank::Right {
                out.push('-');
                hyphen_pending = false;
            }
            out.push(self.label(key));
        }
        out
    }

    pub fn parse_outline(&self, input: &str) -> Result<Vec<Chord>, ChordError> {
        input
            .split('/')
            .map(|part| {
                if part.is_empty() {
                    Err(ChordError::Empty {
                        input: input.to_string(),
                    })
                } else {
                    self.parse_chord(part)
                }
            })
            .collect()
    }

    pub fn format_outline(&self, outline: &[Chord]) -> String {
        let strokes: Vec<String> = outline.iter().map(|&c| self.format_chord(c)).collect();
        strokes.join("/")
    }
}

impl fmt::Display for Chord {
    /// Raw bitmask form; use [`KeyLayout::format_chord`] for steno notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chord({:#b})", self.mask)
    }
}
