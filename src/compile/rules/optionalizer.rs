//! Definition pre-processing rules that mark sounds optional.

use crate::definition::{Cursor, Definition};
use crate::theory::Theory;

use super::Rule;

/// Vowels with no stress mark may be elided.
pub struct OptionalUnstressedVowels;

impl Rule for OptionalUnstressedVowels {
    fn name(&self) -> &'static str {
        "optional_unstressed_vowels"
    }

    fn process_definition(&self, _theory: &Theory, def: &mut Definition) {
        def.map_keysymbols(|_, _, ks| {
            if ks.is_vowel() && ks.stress == 0 {
                ks.optional = true;
            }
        });
    }
}

/// Any consonant that is neither the first nor the last pronounced sound
/// may be elided. A blunt instrument; mostly useful for brief-heavy
/// theories.
pub struct OptionalMiddleConsonants;

impl Rule for OptionalMiddleConsonants {
    fn name(&self) -> &'static str {
        "optional_middle_consonants"
    }

    fn process_definition(&self, _theory: &Theory, def: &mut Definition) {
        def.map_keysymbols(|def, cursor, ks| {
            if ks.is_consonant() && !def.is_first_phoneme(cursor) && !def.is_last_phoneme(cursor) {
                ks.optional = true;
            }
        });
    }
}

/// Middle consonants flanked only by unstressed vowels, and not part of any
/// cluster occurrence, may be elided.
pub struct OptionalUnstressedMiddleConsonants;

impl Rule for OptionalUnstressedMiddleConsonants {
    fn name(&self) -> &'static str {
        "optional_unstressed_middle_consonants"
    }

    fn process_definition(&self, theory: &Theory, def: &mut Definition) {
        let clustered = cluster_members(theory, def);
        def.map_keysymbols(|def, cursor, ks| {
            if !ks.is_consonant()
                || def.is_first_phoneme(cursor)
                || def.is_last_phoneme(cursor)
                || clustered.contains(&cursor)
            {
                return;
            }
            let prev_unstressed = def
                .prev_vowel(cursor)
                .map_or(true, |p| def.keysymbol_at(p).stress == 0);
            let next_unstressed = def
                .next_vowel(cursor)
                .map_or(true, |n| def.keysymbol_at(n).stress == 0);
            if prev_unstressed && next_unstressed {
                ks.optional = true;
            }
        });
    }
}

/// Cursors of every sound that participates in a contiguous cluster
/// occurrence within `def`.
fn cluster_members(theory: &Theory, def: &Definition) -> Vec<Cursor> {
    let sounds: Vec<(Cursor, String)> = def
        .phonemes()
        .map(|c| (c, def.keysymbol_at(c).base_symbol()))
        .collect();
    let mut members = Vec::new();
    for cluster in theory.clusters() {
        let names: Vec<&str> = cluster
            .sophs
            .iter()
            .map(|&s| theory.sophs().name(s))
            .collect();
        for window in sounds.windows(names.len()) {
            let matches = window
                .iter()
                .zip(&names)
                .all(|((_, base), name)| base.to_uppercase() == **name);
            if matches {
                members.extend(window.iter().map(|(c, _)| *c));
            }
        }
    }
    members
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::parse::parse_tokens;
    use crate::definition::{Definition, Token};
    use crate::theory::english::english_theory;

    fn def_of(src: &str) -> Definition {
        let sophemes = parse_tokens(src)
            .unwrap()
            .into_iter()
            .map(|t| match t {
                Token::Sopheme(s) => s,
                Token::Transclude(_) => panic!("no transclusions in tests"),
            })
            .collect();
        Definition::new(sophemes)
    }

    #[test]
    fn unstressed_vowels_become_optional() {
        let theory = english_theory();
        let mut def = def_of("i.i n.n v.v e.e!1 s.s t.t i.I2 g.g a.ee t.t e.");
        OptionalUnstressedVowels.process_definition(&theory, &mut def);
        let optionals: Vec<bool> = def
            .phonemes()
            .map(|c| def.keysymbol_at(c).optional)
            .collect();
        // i, I2, and ee are unstressed; e!1 is not
        assert_eq!(
            optionals,
            vec![true, false, false, false, false, false, true, false, true, false]
        );
    }

    #[test]
    fn middle_consonants_become_optional() {
        let theory = english_theory();
        let mut def = def_of("c.k r.r e.e!1 s.s t.t");
        OptionalMiddleConsonants.process_definition(&theory, &mut def);
        let optionals: Vec<bool> = def
            .phonemes()
            .map(|c| def.keysymbol_at(c).optional)
            .collect();
        assert_eq!(optionals, vec![false, true, false, true, false]);
    }

    #[test]
    fn cluster_members_stay_required() {
        let theory = english_theory();
        // n and f form a cluster; v sits between unstressed vowels
        let mut def = def_of("a.a n.n f.f o.o v.v o.o t.t");
        OptionalUnstressedMiddleConsonants.process_definition(&theory, &mut def);
        let by_base: Vec<(String, bool)> = def
            .phonemes()
            .map(|c| {
                let k = def.keysymbol_at(c);
                (k.base_symbol(), k.optional)
            })
            .collect();
        assert!(!by_base.iter().any(|(b, o)| b == "n" && *o));
        assert!(!by_base.iter().any(|(b, o)| b == "f" && *o));
        assert!(by_base.iter().any(|(b, o)| b == "v" && *o));
        // edge consonants are never optionalized
        assert!(!by_base.iter().any(|(b, o)| b == "t" && *o));
    }
}
