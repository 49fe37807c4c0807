use super::compile;
use crate::Lookup;

/// Cheapest surviving candidate for `outline`, infinite on a miss.
fn min_cost(lookup: &Lookup, outline: &str) -> f32 {
    let strokes = lookup
        .artifacts()
        .theory
        .layout()
        .parse_outline(outline)
        .expect("test outlines parse");
    lookup
        .valid_candidates(&strokes)
        .iter()
        .map(|c| c.cost)
        .fold(f32::INFINITY, f32::min)
}

#[test]
fn single_syllable() {
    let lookup = compile(&[("crest", "c.k r.r e.e!1 s.s t.t")]);
    assert_eq!(lookup.lookup_str("KREFT").as_deref(), Some("crest"));
}

#[test]
fn prefix_retention() {
    let lookup = compile(&[
        ("cristail", "c.k r.r i.i!1 s.s t.t ai.ee!2 l.l"),
        ("crist", "c.k r.r i.i!1 s.s t.t"),
        ("cri", "c.k r.r i.i!1"),
    ]);
    assert_eq!(lookup.lookup_str("KREUFT").as_deref(), Some("crist"));
    assert_eq!(
        lookup.lookup_str("KREUS/TAEUL").as_deref(),
        Some("cristail")
    );
    assert_eq!(lookup.lookup_str("KREU").as_deref(), Some("cri"));
}

#[test]
fn boundary_elision_required() {
    let lookup = compile(&[(
        "investigate",
        "i.i n.n v.v e.e!1 s.s t.t i.I2 g.g a.ee t.t e.",
    )]);
    assert_eq!(
        lookup.lookup_str("EUPB/SREFT/TKPWAEUT").as_deref(),
        Some("investigate")
    );
    // the middle stroke's trailing sounds only open the third stroke; there
    // is no accepting path after just two
    assert_eq!(lookup.lookup_str("EUPB/SREFT"), None);
}

#[test]
fn cluster_collapse() {
    let lookup = compile(&[(
        "information",
        "i.i!2 n.n f.f o.@r r.r m.m a.ee!1 ti.sh o. n.n",
    )]);
    assert_eq!(
        lookup.lookup_str("TPWORPLGS").as_deref(),
        Some("information")
    );
}

#[test]
fn optional_keysymbol() {
    let lookup = compile(&[("figure", "f.f i.i!1 g.g .y1? u.@r r.r e.")]);
    for outline in ["TPEUG/KWHUR", "TPEUG/KWRUR", "TPEU/TKPWUR"] {
        assert_eq!(
            lookup.lookup_str(outline).as_deref(),
            Some("figure"),
            "outline {outline}"
        );
    }
    // chording the optional y beats eliding it
    assert!(min_cost(&lookup, "TPEUG/KWHUR") < min_cost(&lookup, "TPEU/TKPWUR"));
}

#[test]
fn optional_mark_never_cheapens_the_chorded_path() {
    let plain = compile(&[("less", "l.l e.e!1 ss.s")]);
    let marked = compile(&[("less", "l.l e.e!1 ss.s?")]);
    let base = min_cost(&plain, "HRES");
    let with_mark = min_cost(&marked, "HRES");
    assert!(base.is_finite());
    assert!(with_mark >= base);
    // the elided form exists only under the mark, at a strict surcharge
    assert!(min_cost(&marked, "HRE") > with_mark);
    assert!(!min_cost(&plain, "HRE").is_finite());
}

#[test]
fn left_only_final_consonant_is_a_failed_entry() {
    let lookup = compile(&[("ah", "a.a h.h")]);
    assert_eq!(lookup.stats().entries_added, 0);
    assert_eq!(lookup.stats().entries_failed, 1);
    assert_eq!(lookup.lookup_str("A"), None);
    assert!(lookup.reverse_lookup("ah").is_empty());
}

#[test]
fn alt_chord_needs_a_blocked_main() {
    let lookup = compile(&[
        ("crest", "c.k r.r e.e!1 s.s t.t"),
        ("less", "l.l e.e!1 ss.s"),
    ]);
    // word-final s can use its canonical -S, so the -F alternative is
    // rejected; before t the canonical -S cannot follow, so -F stands
    assert_eq!(lookup.lookup_str("HRES").as_deref(), Some("less"));
    assert_eq!(lookup.lookup_str("HREF"), None);
    assert_eq!(lookup.lookup_str("KREFT").as_deref(), Some("crest"));
}

#[test]
fn misses_are_nullary() {
    let lookup = compile(&[("crest", "c.k r.r e.e!1 s.s t.t")]);
    assert_eq!(lookup.lookup_str("PWHRARG"), None);
    // unparsable notation
    assert_eq!(lookup.lookup_str("KREQT"), None);
    assert_eq!(lookup.lookup_str(""), None);
}

#[test]
fn vowel_initial_later_stroke_is_rejected() {
    let lookup = compile(&[("cristail", "c.k r.r i.i!1 s.s t.t ai.ee!2 l.l")]);
    assert_eq!(
        lookup.lookup_str("KREUFT/KWRAEUL").as_deref(),
        Some("cristail")
    );
    assert_eq!(lookup.lookup_str("KREUFT/AEUL"), None);
}

#[test]
fn skipped_entries_do_not_poison_the_batch() {
    let lookup = compile(&[
        ("bad", "b.b a"),
        ("worse", "w.w {unknown} s.s"),
        ("crest", "c.k r.r e.e!1 s.s t.t"),
    ]);
    assert_eq!(lookup.stats().entries_added, 1);
    assert_eq!(lookup.stats().entries_failed, 2);
    assert_eq!(lookup.lookup_str("KREFT").as_deref(), Some("crest"));
}
