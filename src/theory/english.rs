//! The stock English theory: a Ward-Stone-Ireland layout with a small
//! Plover-style chord inventory.

use crate::compile::rules::{
    AltChords, Clusters, Cycler, InitialVowel, Inversion, Linker, OptionalUnstressedVowels,
    ProhibitedStrokes,
};
use crate::compile::Engine;
use crate::keys::{Bank, KeyDef, KeyLayout};
use crate::settings::Settings;

use super::Theory;

/// `STKPWHR AO * EU FRPBLGTSDZ`: seven left keys, four mid vowels, the
/// floating star, and ten right keys.
pub fn english_layout() -> KeyLayout {
    use Bank::*;
    let spec: &[(char, Bank)] = &[
        ('S', Left),
        ('T', Left),
        ('K', Left),
        ('P', Left),
        ('W', Left),
        ('H', Left),
        ('R', Left),
        ('A', Mid),
        ('O', Mid),
        ('*', Floating),
        ('E', Mid),
        ('U', Mid),
        ('F', Right),
        ('R', Right),
        ('P', Right),
        ('B', Right),
        ('L', Right),
        ('G', Right),
        ('T', Right),
        ('S', Right),
        ('D', Right),
        ('Z', Right),
    ];
    KeyLayout::new(
        spec.iter()
            .map(|&(label, bank)| KeyDef { label, bank })
            .collect(),
    )
}

pub fn english_theory() -> Theory {
    use Bank::*;
    Theory::builder(english_layout())
        // left-bank consonants
        .sound("s", Left, "S")
        .sound("z", Left, "S*")
        .sound("t", Left, "T")
        .sound("k", Left, "K")
        .sound("p", Left, "P")
        .sound("w", Left, "W")
        .sound("h", Left, "H")
        .sound("r", Left, "R")
        .sound("f", Left, "TP")
        .sound("v", Left, "SR")
        .sound("g", Left, "TKPW")
        .sound("y", Left, "KWH")
        .sound("n", Left, "TPH")
        .sound("m", Left, "PH")
        .sound("l", Left, "HR")
        .sound("b", Left, "PW")
        .sound("d", Left, "TK")
        .sound("j", Left, "SKWR")
        .sound("sh", Left, "SH")
        .sound("ch", Left, "KH")
        // right-bank consonants
        .sound("f", Right, "-F")
        .sound("r", Right, "-R")
        .sound("p", Right, "-P")
        .sound("b", Right, "-B")
        .sound("l", Right, "-L")
        .sound("g", Right, "-G")
        .sound("t", Right, "-T")
        .sound("s", Right, "-S")
        .sound("d", Right, "-D")
        .sound("z", Right, "-Z")
        .sound("n", Right, "-PB")
        .sound("m", Right, "-PL")
        .sound("k", Right, "-BG")
        .sound("sh", Right, "-RB")
        .sound("ch", Right, "-FP")
        .sound("j", Right, "-PBLG")
        .sound("ng", Right, "-PBG")
        // vowels
        .sound("e", Mid, "E")
        .sound("i", Mid, "EU")
        .sound("a", Mid, "A")
        .sound("o", Mid, "O")
        .sound("u", Mid, "U")
        .sound("oo", Mid, "AO")
        .sound("ee", Mid, "AEU")
        .sound("@r", Mid, "O")
        .sound("@r", Mid, "U")
        .sound("@", Mid, "U")
        // alternative spellings, validated for necessity at lookup
        .alt("s", Right, "f")
        .alt("v", Left, "w")
        .alt("f", Left, "w")
        // clusters
        .cluster(&["n", "f"], Left, "TPW")
        .cluster(&["ee", "sh", "n"], Right, "-GS")
        .linker("KWR")
        .build()
        .expect("english theory tables are well-formed")
}

/// The standard rule stack over the English theory with default settings.
pub fn engine() -> Engine {
    engine_with(Settings::default())
}

pub fn engine_with(settings: Settings) -> Engine {
    let mut engine = Engine::new(english_theory(), settings);
    engine.register(Box::new(OptionalUnstressedVowels));
    engine.register(Box::new(Linker));
    engine.register(Box::new(InitialVowel));
    engine.register(Box::new(AltChords));
    engine.register(Box::new(Clusters));
    engine.register(Box::new(Inversion));
    engine.register(Box::new(Cycler));
    engine.register(Box::new(ProhibitedStrokes));
    engine
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::Bank;

    #[test]
    fn layout_shape() {
        let l = english_layout();
        assert_eq!(l.len(), 22);
        let star = l.parse_chord("*").unwrap();
        assert_eq!(l.floaters(star), star);
        // left and right R are both reachable, and there is no third
        assert!(l.parse_chord("RR").is_ok());
        assert!(l.parse_chord("RRR").is_err());
    }

    #[test]
    fn alt_tables() {
        let t = english_theory();
        let alts = t.alt_spellings("s");
        assert_eq!(alts.len(), 1);
        assert_eq!(alts[0].0, Bank::Right);
        assert_eq!(t.sophs().name(alts[0].1), "F");
        assert_eq!(t.alt_spellings("v").len(), 1);
        assert!(t.alt_spellings("k").is_empty());
    }
}
