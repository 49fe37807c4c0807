//! Interned sound-or-phoneme labels.
//!
//! A soph names something a chord can spell: a single phoneme (`K`, `EE`),
//! a consonant cluster (`N+F`), the stroke boundary (`/`), or the linker
//! (`^`). Sophs are interned once per theory and referred to by dense ids so
//! edge labels stay `Copy`.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SophId(pub u32);

impl SophId {
    #[inline]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Default, Clone)]
pub struct SophInterner {
    names: Vec<String>,
    ids: HashMap<String, SophId>,
}

impl SophInterner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, name: &str) -> SophId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = SophId(self.names.len() as u32);
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }

    pub fn get(&self, name: &str) -> Option<SophId> {
        self.ids.get(name).copied()
    }

    pub fn name(&self, id: SophId) -> &str {
        &self.names[id.idx()]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
