pub mod align;
pub mod chord_trie;
pub mod compile;
pub mod definition;
pub mod keys;
pub mod lexicon;
pub mod lookup;
pub mod ndt;
pub mod settings;
pub mod soph;
pub mod theory;
pub mod trace_init;

pub use compile::Engine;
pub use lookup::Lookup;
