//! Positions within a definition's sound sequence.

use super::{Definition, Keysymbol};

/// A (sopheme, keysymbol) position. Ordering is document order, so cursors
/// compare the way sounds are pronounced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cursor {
    pub sopheme: usize,
    pub keysymbol: usize,
}

impl Definition {
    pub fn keysymbol_at(&self, cursor: Cursor) -> &Keysymbol {
        &self.sophemes()[cursor.sopheme].keysymbols[cursor.keysymbol]
    }

    /// All sounds in pronunciation order, skipping purely orthographic
    /// sophemes.
    pub fn phonemes(&self) -> impl Iterator<Item = Cursor> + '_ {
        self.sophemes()
            .iter()
            .enumerate()
            .flat_map(|(si, sopheme)| {
                (0..sopheme.keysymbols.len()).map(move |ki| Cursor {
                    sopheme: si,
                    keysymbol: ki,
                })
            })
            .filter(|c| !self.keysymbol_at(*c).base_symbol().is_empty())
    }

    pub fn first_phoneme(&self) -> Option<Cursor> {
        self.phonemes().next()
    }

    pub fn last_phoneme(&self) -> Option<Cursor> {
        self.phonemes().last()
    }

    pub fn next_phoneme(&self, cursor: Cursor) -> Option<Cursor> {
        self.phonemes().find(|c| *c > cursor)
    }

    pub fn prev_phoneme(&self, cursor: Cursor) -> Option<Cursor> {
        self.phonemes().take_while(|c| *c < cursor).last()
    }

    pub fn next_vowel(&self, cursor: Cursor) -> Option<Cursor> {
        self.vowels().iter().copied().find(|c| *c > cursor)
    }

    pub fn prev_vowel(&self, cursor: Cursor) -> Option<Cursor> {
        self.vowels()
            .iter()
            .copied()
            .take_while(|c| *c < cursor)
            .last()
    }

    pub fn next_consonant(&self, cursor: Cursor) -> Option<Cursor> {
        self.consonants().iter().copied().find(|c| *c > cursor)
    }

    pub fn prev_consonant(&self, cursor: Cursor) -> Option<Cursor> {
        self.consonants()
            .iter()
            .copied()
            .take_while(|c| *c < cursor)
            .last()
    }

    pub fn is_first_phoneme(&self, cursor: Cursor) -> bool {
        self.first_phoneme() == Some(cursor)
    }

    pub fn is_last_phoneme(&self, cursor: Cursor) -> bool {
        self.last_phoneme() == Some(cursor)
    }

    /// A consonant with no consonant immediately before or after it.
    pub fn is_lone_consonant(&self, cursor: Cursor) -> bool {
        if !self.keysymbol_at(cursor).is_consonant() {
            return false;
        }
        let prev_is_consonant = self
            .prev_phoneme(cursor)
            .is_some_and(|c| self.keysymbol_at(c).is_consonant());
        let next_is_consonant = self
            .next_phoneme(cursor)
            .is_some_and(|c| self.keysymbol_at(c).is_consonant());
        !prev_is_consonant && !next_is_consonant
    }

    pub fn appears_before(&self, a: Cursor, b: Cursor) -> bool {
        a < b
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{Keysymbol, Sopheme};

    fn def() -> Definition {
        // "crest": c.k r.r e.e!1 s.s t.t  plus a silent final sopheme
        let ks = |s: &str, stress: u8| Keysymbol::new(s, stress, false);
        // trailing silent sopheme is spelled but never pronounced
        Definition::new(vec![
            Sopheme {
                chars: "c".into(),
                keysymbols: vec![ks("k", 0)],
            },
            Sopheme {
                chars: "r".into(),
                keysymbols: vec![ks("r", 0)],
            },
            Sopheme {
                chars: "e".into(),
                keysymbols: vec![ks("e", 1)],
            },
            Sopheme {
                chars: "st".into(),
                keysymbols: vec![ks("s", 0), ks("t", 0)],
            },
            Sopheme {
                chars: "e".into(),
                keysymbols: vec![],
            },
        ])
    }

    #[test]
    fn phoneme_walk() {
        let d = def();
        let all: Vec<_> = d.phonemes().collect();
        assert_eq!(all.len(), 5);
        assert!(d.is_first_phoneme(all[0]));
        assert!(d.is_last_phoneme(all[4]));
        assert_eq!(d.next_phoneme(all[0]), Some(all[1]));
        assert_eq!(d.prev_phoneme(all[0]), None);
        assert_eq!(d.keysymbol_at(all[2]).base_symbol(), "e");
    }

    #[test]
    fn vowel_and_consonant_neighbours() {
        let d = def();
        let all: Vec<_> = d.phonemes().collect();
        assert_eq!(d.next_vowel(all[0]), Some(all[2]));
        assert_eq!(d.prev_vowel(all[4]), Some(all[2]));
        assert_eq!(d.next_consonant(all[2]), Some(all[3]));
        assert_eq!(d.prev_consonant(all[2]), Some(all[1]));
        assert!(d.appears_before(all[1], all[3]));
    }

    #[test]
    fn lone_consonant_detection() {
        let ks = |s: &str| Keysymbol::new(s, 0, false);
        // "fig": f i g  -- f and g are lone, i is not a consonant
        let d = Definition::new(vec![Sopheme {
            chars: "fig".into(),
            keysymbols: vec![ks("f"), ks("i"), ks("g")],
        }]);
        let all: Vec<_> = d.phonemes().collect();
        assert!(d.is_lone_consonant(all[0]));
        assert!(!d.is_lone_consonant(all[1]));
        assert!(d.is_lone_consonant(all[2]));

        let crest = def();
        let all: Vec<_> = crest.phonemes().collect();
        // s and t are adjacent consonants
        assert!(!crest.is_lone_consonant(all[3]));
        assert!(!crest.is_lone_consonant(all[4]));
    }
}
