use super::compile;

#[test]
fn reverse_lookup_finds_every_splitting() {
    let lookup = compile(&[("cristail", "c.k r.r i.i!1 s.s t.t ai.ee!2 l.l")]);
    let outlines = lookup.reverse_lookup_str("cristail");
    for expected in ["KREU/STAEUL", "KREUS/TAEUL", "KREUFT/KWRAEUL"] {
        assert!(
            outlines.iter().any(|o| o == expected),
            "missing {expected} in {outlines:?}"
        );
    }
}

#[test]
fn reverse_outlines_round_trip() {
    let lookup = compile(&[("cristail", "c.k r.r i.i!1 s.s t.t ai.ee!2 l.l")]);
    let outlines = lookup.reverse_lookup("cristail");
    assert!(!outlines.is_empty());
    for outline in &outlines {
        assert_eq!(
            lookup.lookup(outline).as_deref(),
            Some("cristail"),
            "outline {:?}",
            lookup.artifacts().theory.layout().format_outline(outline)
        );
    }
}

#[test]
fn reverse_outlines_survive_notation() {
    let lookup = compile(&[("figure", "f.f i.i!1 g.g .y1? u.@r r.r e.")]);
    let layout = lookup.artifacts().theory.layout();
    let outlines = lookup.reverse_lookup("figure");
    assert!(outlines
        .iter()
        .any(|o| layout.format_outline(o) == "TPEUG/KWHUR"));
    for outline in &outlines {
        let text = layout.format_outline(outline);
        let reparsed = layout.parse_outline(&text).expect("rendered outlines format cleanly");
        assert_eq!(&reparsed, outline, "notation {text}");
    }
}

#[test]
fn unknown_word_has_no_outlines() {
    let lookup = compile(&[("cristail", "c.k r.r i.i!1 s.s t.t ai.ee!2 l.l")]);
    assert!(lookup.reverse_lookup("crest").is_empty());
}
