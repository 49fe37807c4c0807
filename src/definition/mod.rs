//! Parsed entry definitions: sophemes, keysymbols, and sound cursors.
//!
//! A definition is a sequence of sophemes, each binding a run of spelled
//! characters to the keysymbols (phonemes) pronounced for them. Either side
//! may be empty: silent letters carry characters and no keysymbols, and
//! intrusive sounds carry keysymbols with no characters.

mod cursor;
pub mod parse;

pub use cursor::Cursor;
pub use parse::{is_morpheme_varname, parse_tokens, resolve, Token};

/// One phoneme of a definition.
///
/// `stress` is zero unless the source marked the sound with `!n`. Digits
/// embedded in the raw symbol (dialect variants like `I2`) are part of the
/// symbol, not stress, and are stripped by [`base_symbol`].
///
/// [`base_symbol`]: Keysymbol::base_symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keysymbol {
    pub symbol: String,
    pub stress: u8,
    pub optional: bool,
}

impl Keysymbol {
    pub fn new(symbol: &str, stress: u8, optional: bool) -> Self {
        Keysymbol {
            symbol: symbol.to_string(),
            stress,
            optional,
        }
    }

    /// Canonical sound name: lowercased, brackets stripped, trailing digits
    /// stripped.
    pub fn base_symbol(&self) -> String {
        let stripped: String = self
            .symbol
            .chars()
            .filter(|c| *c != '[' && *c != ']')
            .collect();
        stripped
            .trim_end_matches(|c: char| c.is_ascii_digit())
            .to_lowercase()
    }

    pub fn is_vowel(&self) -> bool {
        self.base_symbol()
            .chars()
            .next()
            .is_some_and(|c| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | '@'))
    }

    pub fn is_consonant(&self) -> bool {
        !self.base_symbol().is_empty() && !self.is_vowel()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sopheme {
    pub chars: String,
    pub keysymbols: Vec<Keysymbol>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Definition {
    sophemes: Vec<Sopheme>,
    vowels: Vec<Cursor>,
    consonants: Vec<Cursor>,
}

impl Definition {
    pub fn new(sophemes: Vec<Sopheme>) -> Self {
        let mut def = Definition {
            sophemes,
            vowels: Vec::new(),
            consonants: Vec::new(),
        };
        def.reindex();
        def
    }

    fn reindex(&mut self) {
        self.vowels.clear();
        self.consonants.clear();
        for (si, sopheme) in self.sophemes.iter().enumerate() {
            for (ki, ks) in sopheme.keysymbols.iter().enumerate() {
                let cursor = Cursor {
                    sopheme: si,
                    keysymbol: ki,
                };
                if ks.is_vowel() {
                    self.vowels.push(cursor);
                } else if ks.is_consonant() {
                    self.consonants.push(cursor);
                }
            }
        }
    }

    pub fn sophemes(&self) -> &[Sopheme] {
        &self.sophemes
    }

    pub fn vowels(&self) -> &[Cursor] {
        &self.vowels
    }

    pub fn consonants(&self) -> &[Cursor] {
        &self.consonants
    }

    /// The translation text: every sopheme's characters in order.
    pub fn spelling(&self) -> String {
        self.sophemes.iter().map(|s| s.chars.as_str()).collect()
    }

    /// Apply `f` to every keysymbol, then rebuild the vowel and consonant
    /// indices. This is how pre-compilation passes mark sounds optional.
    pub fn map_keysymbols(&mut self, mut f: impl FnMut(&Definition, Cursor, &mut Keysymbol)) {
        let snapshot = self.clone();
        for (si, sopheme) in self.sophemes.iter_mut().enumerate() {
            for (ki, ks) in sopheme.keysymbols.iter_mut().enumerate() {
                f(
                    &snapshot,
                    Cursor {
                        sopheme: si,
                        keysymbol: ki,
                    },
                    ks,
                );
            }
        }
        self.reindex();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ks(symbol: &str) -> Keysymbol {
        Keysymbol::new(symbol, 0, false)
    }

    #[test]
    fn base_symbol_strips_digits_and_brackets() {
        assert_eq!(ks("I2").base_symbol(), "i");
        assert_eq!(ks("[S]").base_symbol(), "s");
        assert_eq!(ks("EE").base_symbol(), "ee");
        assert_eq!(ks("@r").base_symbol(), "@r");
    }

    #[test]
    fn vowel_classification() {
        assert!(ks("i").is_vowel());
        assert!(ks("@r").is_vowel());
        assert!(!ks("k").is_vowel());
        assert!(ks("k").is_consonant());
        // empty symbol is neither
        assert!(!ks("").is_vowel());
        assert!(!ks("").is_consonant());
    }

    #[test]
    fn spelling_concatenates_all_sophemes() {
        let def = Definition::new(vec![
            Sopheme {
                chars: "c".into(),
                keysymbols: vec![ks("k")],
            },
            Sopheme {
                chars: "re".into(),
                keysymbols: vec![ks("r"), ks("e")],
            },
            Sopheme {
                chars: "w".into(),
                keysymbols: vec![],
            },
        ]);
        assert_eq!(def.spelling(), "crew");
        assert_eq!(def.vowels().len(), 1);
        assert_eq!(def.consonants().len(), 2);
    }
}
