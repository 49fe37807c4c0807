//! Sound enumeration and the events handed to rule hooks.

use crate::definition::{Cursor, Definition, Keysymbol};
use crate::ndt::{NodeId, Transition};
use crate::soph::SophId;
use crate::theory::Theory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundKind {
    Consonant,
    Vowel,
}

/// One pronounced keysymbol, pre-resolved against the theory.
#[derive(Debug, Clone)]
pub struct Sound {
    pub cursor: Cursor,
    pub kind: SoundKind,
    pub keysymbol: Keysymbol,
    pub base: String,
    pub sophs: Vec<SophId>,
}

/// All pronounced sounds of a definition in order. Sophemes with no
/// keysymbols and keysymbols with empty base symbols are skipped.
pub fn enumerate(def: &Definition, theory: &Theory) -> Vec<Sound> {
    def.phonemes()
        .map(|cursor| {
            let keysymbol = def.keysymbol_at(cursor).clone();
            let base = keysymbol.base_symbol();
            let kind = if keysymbol.is_vowel() {
                SoundKind::Vowel
            } else {
                SoundKind::Consonant
            };
            let sophs = theory.sophs_for(&base).to_vec();
            Sound {
                cursor,
                kind,
                keysymbol,
                base,
                sophs,
            }
        })
        .collect()
}

/// A bank destination drawn for the current sound: the node every source
/// was joined into, and the transitions that got there.
#[derive(Debug, Clone)]
pub struct BankDst {
    pub node: NodeId,
    pub transitions: Vec<Transition>,
}

#[derive(Debug)]
pub struct ConsonantEvent<'a> {
    pub sound: &'a Sound,
    pub left: Option<BankDst>,
    pub right: Option<BankDst>,
}

#[derive(Debug)]
pub struct VowelEvent<'a> {
    pub sound: &'a Sound,
    pub mid: BankDst,
    /// The node after the vowel's boundary edge. Absent until the frontier
    /// update has run, so `before_complete` hooks see `None`.
    pub new_stroke: Option<NodeId>,
}
