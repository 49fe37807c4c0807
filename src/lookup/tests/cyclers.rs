use super::compile;

fn homophones() -> crate::Lookup {
    compile(&[
        ("reed", "r.r ee.ee!1 d.d"),
        ("read", "r.r ea.ee!1 d.d"),
    ])
}

#[test]
fn cycler_strokes_walk_the_tie() {
    let lookup = homophones();
    assert_eq!(lookup.lookup_str("RAEUD").as_deref(), Some("reed"));
    assert_eq!(lookup.lookup_str("RAEUD/*").as_deref(), Some("read"));
    // wraps around
    assert_eq!(lookup.lookup_str("RAEUD/*/*").as_deref(), Some("reed"));
}

#[test]
fn cyclers_alone_spell_nothing() {
    let lookup = homophones();
    assert_eq!(lookup.lookup_str("*"), None);
    assert_eq!(lookup.lookup_str("*/*"), None);
}

#[test]
fn coreless_strokes_elsewhere_are_prohibited() {
    let lookup = homophones();
    assert_eq!(lookup.lookup_str("*/RAEUD"), None);
}
