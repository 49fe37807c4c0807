use super::compile;

#[test]
fn inverted_pair_after_vowel() {
    let lookup = compile(&[("bulb", "b.b u.u!1 l.l b.b")]);
    // l then b would need -L before -B, against key order; the inversion
    // window lets the keys come out as -B -L instead
    assert_eq!(lookup.lookup_str("PWUBL").as_deref(), Some("bulb"));
}

#[test]
fn inversion_may_not_skip_a_required_slot() {
    let lookup = compile(&[("helpb", "h.h e.e!1 l.l p.p b.b?")]);
    assert_eq!(lookup.lookup_str("HELPB").as_deref(), Some("helpb"));
    // the optional final b elides outright
    assert_eq!(lookup.lookup_str("HELP").as_deref(), Some("helpb"));
    // b-then-l consumes a non-contiguous slot pair around the required p
    assert_eq!(lookup.lookup_str("HEBL"), None);
}
