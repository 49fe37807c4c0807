mod cyclers;
mod inversion;
mod reverse;
mod scenarios;

use crate::theory::english;
use crate::Lookup;

/// Compile `(varname, source)` pairs with the stock English engine.
fn compile(entries: &[(&str, &str)]) -> Lookup {
    english::engine()
        .compile(
            entries
                .iter()
                .map(|(v, s)| (v.to_string(), s.to_string())),
        )
        .expect("stock rule stack is acyclic")
}
