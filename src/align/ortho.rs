//! Alignment models over English orthography.
//!
//! The grapheme model pairs keysymbol runs with the letter runs that may
//! spell them; [`align_sophemes`] turns its matches into a [`Definition`],
//! with unmatched letters kept as formatting-only sophemes and unmatched
//! keysymbols kept as silent-spelling sophemes. The part model pairs
//! morphology parts with their verbatim spelling.

use std::collections::HashMap;

use crate::definition::{Definition, Keysymbol, Sopheme};

use super::{align, AlignmentMatch, AlignmentModel};

/// Keysymbols against grapheme runs, driven by a base-symbol table.
pub struct GraphemeModel {
    /// base-symbol sequence (space-joined) to the letter runs spelling it
    table: HashMap<String, Vec<&'static str>>,
    max_x: usize,
    max_y: usize,
}

impl GraphemeModel {
    pub fn new(pairs: &[(&str, &[&'static str])]) -> Self {
        let mut table: HashMap<String, Vec<&'static str>> = HashMap::new();
        let mut max_x = 1;
        let mut max_y = 1;
        for (bases, graphemes) in pairs {
            max_x = max_x.max(bases.split_whitespace().count());
            for g in *graphemes {
                max_y = max_y.max(g.chars().count());
            }
            table
                .entry(bases.to_string())
                .or_default()
                .extend(graphemes.iter().copied());
        }
        GraphemeModel {
            table,
            max_x,
            max_y,
        }
    }
}

impl Default for GraphemeModel {
    fn default() -> Self {
        GraphemeModel::new(&[
            ("b", &["b", "bb"]),
            ("d", &["d", "dd"]),
            ("f", &["f", "ff", "ph", "gh"]),
            ("g", &["g", "gg", "gu"]),
            ("h", &["h", "wh"]),
            ("j", &["j", "g", "dg"]),
            ("k", &["k", "c", "ck", "ch", "q"]),
            ("l", &["l", "ll"]),
            ("m", &["m", "mm", "mb"]),
            ("n", &["n", "nn", "kn"]),
            ("ng", &["ng", "n"]),
            ("p", &["p", "pp"]),
            ("r", &["r", "rr", "wr"]),
            ("s", &["s", "ss", "c", "ce", "sc"]),
            ("sh", &["sh", "ti", "ci", "ssi", "ch"]),
            ("ch", &["ch", "tch"]),
            ("t", &["t", "tt", "ed"]),
            ("v", &["v", "ve"]),
            ("w", &["w", "u"]),
            ("y", &["y"]),
            ("z", &["z", "zz", "s"]),
            ("k s", &["x"]),
            ("a", &["a"]),
            ("e", &["e", "ea"]),
            ("i", &["i", "y"]),
            ("o", &["o"]),
            ("u", &["u", "o"]),
            ("oo", &["oo", "ou", "u"]),
            ("ee", &["ee", "ea", "ey", "ai", "ay", "a", "e"]),
            ("@", &["a", "e", "i", "o", "u"]),
            ("@r", &["er", "or", "ar", "ur", "re", "u", "o"]),
        ])
    }
}

impl AlignmentModel for GraphemeModel {
    type ItemX = Keysymbol;
    type ItemY = char;
    type MatchData = ();

    fn max_x_window(&self) -> usize {
        self.max_x
    }

    fn max_y_window(&self) -> usize {
        self.max_y
    }

    fn try_match(&self, xs: &[Keysymbol], ys: &[char]) -> Option<()> {
        let bases: Vec<String> = xs.iter().map(|k| k.base_symbol()).collect();
        if bases.iter().any(|b| b.is_empty()) {
            return None;
        }
        let graphemes = self.table.get(&bases.join(" "))?;
        let run: String = ys.iter().collect();
        graphemes.contains(&run.as_str()).then_some(())
    }
}

/// Align a pronunciation against its spelling and group the two into
/// sophemes. Unmatched letter runs become sophemes with no keysymbols;
/// unmatched keysymbol runs become sophemes with no characters.
pub fn align_sophemes(model: &GraphemeModel, keysymbols: &[Keysymbol], word: &str) -> Definition {
    let chars: Vec<char> = word.chars().collect();
    let matches = align(model, keysymbols, &chars[..]);

    let mut sophemes = Vec::new();
    let mut x = 0;
    let mut y = 0;
    let push_gap = |sophemes: &mut Vec<Sopheme>, xr: std::ops::Range<usize>, yr: std::ops::Range<usize>| {
        if !yr.is_empty() {
            sophemes.push(Sopheme {
                chars: chars[yr].iter().collect(),
                keysymbols: Vec::new(),
            });
        }
        if !xr.is_empty() {
            sophemes.push(Sopheme {
                chars: String::new(),
                keysymbols: keysymbols[xr].to_vec(),
            });
        }
    };
    for m in &matches {
        push_gap(&mut sophemes, x..m.x.start, y..m.y.start);
        sophemes.push(Sopheme {
            chars: chars[m.y.clone()].iter().collect(),
            keysymbols: keysymbols[m.x.clone()].to_vec(),
        });
        x = m.x.end;
        y = m.y.end;
    }
    push_gap(&mut sophemes, x..keysymbols.len(), y..chars.len());
    Definition::new(sophemes)
}

/// Morphology parts against their verbatim spelling.
pub struct PartModel {
    max_part_len: usize,
}

impl PartModel {
    pub fn new(parts: &[String]) -> Self {
        PartModel {
            max_part_len: parts.iter().map(|p| p.chars().count()).max().unwrap_or(1),
        }
    }
}

impl AlignmentModel for PartModel {
    type ItemX = String;
    type ItemY = char;
    type MatchData = ();

    fn max_x_window(&self) -> usize {
        1
    }

    fn max_y_window(&self) -> usize {
        self.max_part_len
    }

    fn try_match(&self, xs: &[String], ys: &[char]) -> Option<()> {
        let [part] = xs else { return None };
        let run: String = ys.iter().collect();
        (*part == run).then_some(())
    }
}

/// Split a word into `(part, matched letters)` pairs, aligning the parts
/// against the word so surplus letters (fused junctions) stay visible as
/// gaps.
pub fn align_parts(parts: &[String], word: &str) -> Vec<AlignmentMatch<()>> {
    let model = PartModel::new(parts);
    let chars: Vec<char> = word.chars().collect();
    align(&model, parts, &chars[..])
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::definition::parse::resolve;

    fn definition(source: &str) -> Definition {
        let sources = HashMap::from([("w".to_string(), source.to_string())]);
        resolve("w", &sources).expect("test source parses")
    }

    fn flatten(def: &Definition) -> Vec<Keysymbol> {
        def.sophemes()
            .iter()
            .flat_map(|s| s.keysymbols.iter().cloned())
            .collect()
    }

    #[test]
    fn realigning_a_definition_returns_its_own_grouping() {
        let model = GraphemeModel::default();
        for source in [
            "c.k r.r e.e!1 s.s t.t",
            "f.f i.i!1 g.g u.@r r.r e.",
            "i.i!2 n.n f.f o.@r r.r m.m a.ee!1 ti.sh o. n.n",
        ] {
            let def = definition(source);
            let realigned = align_sophemes(&model, &flatten(&def), &def.spelling());
            assert_eq!(realigned, def, "source {source:?}");
        }
    }

    #[test]
    fn silent_sounds_survive_as_bare_keysymbol_sophemes() {
        let model = GraphemeModel::default();
        let def = definition("f.f i.i!1 g.g .y1? u.@r r.r e.");
        let realigned = align_sophemes(&model, &flatten(&def), &def.spelling());
        assert_eq!(realigned, def);
    }

    #[test]
    fn digraph_windows_group_their_letters() {
        let model = GraphemeModel::default();
        let keysymbols = vec![
            Keysymbol::new("b", 0, false),
            Keysymbol::new("o", 1, false),
            Keysymbol::new("k", 0, false),
            Keysymbol::new("s", 0, false),
        ];
        let def = align_sophemes(&model, &keysymbols, "box");
        let groups: Vec<(&str, usize)> = def
            .sophemes()
            .iter()
            .map(|s| (s.chars.as_str(), s.keysymbols.len()))
            .collect();
        assert_eq!(groups, vec![("b", 1), ("o", 1), ("x", 2)]);
    }

    #[test]
    fn morph_parts_align_over_fused_junctions() {
        let parts = vec!["in".to_string(), "vest".to_string(), "ate".to_string()];
        let matches = align_parts(&parts, "investigate");
        let spans: Vec<_> = matches.iter().map(|m| (m.x.clone(), m.y.clone())).collect();
        assert_eq!(spans, vec![(0..1, 0..2), (1..2, 2..6), (2..3, 8..11)]);
    }
}
