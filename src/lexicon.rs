//! The lexicon file: keyed TOML with meta, morphemes, and entries tables.
//!
//! Morpheme varnames keep their sigils (`@`, `#`, `^` prefixes or a `^`
//! suffix) in the table keys, so the compiler recognises them as
//! transclusion-only material.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

pub const FORMAT_VERSION: &str = "0.0.0";

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("lexicon is not valid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("unsupported lexicon format version {found:?}, expected {expected:?}")]
    FormatVersion {
        found: String,
        expected: &'static str,
    },
}

#[derive(Debug, Deserialize)]
struct Meta {
    #[serde(rename = "hatchery-format-version")]
    format_version: String,
}

#[derive(Debug, Deserialize)]
pub struct Lexicon {
    meta: Meta,
    #[serde(default)]
    morphemes: BTreeMap<String, String>,
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

impl Lexicon {
    /// Parse a lexicon file. A format-version mismatch is fatal; unlike
    /// per-entry parse errors there is no partial load.
    pub fn parse(text: &str) -> Result<Self, LexiconError> {
        let lexicon: Lexicon = toml::from_str(text)?;
        if lexicon.meta.format_version != FORMAT_VERSION {
            return Err(LexiconError::FormatVersion {
                found: lexicon.meta.format_version,
                expected: FORMAT_VERSION,
            });
        }
        Ok(lexicon)
    }

    pub fn morphemes(&self) -> &BTreeMap<String, String> {
        &self.morphemes
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    /// All definition sources in compile order: morphemes first, so every
    /// transclusion target is in scope before the entries that use it.
    pub fn definitions(&self) -> impl Iterator<Item = (String, String)> + '_ {
        self.morphemes
            .iter()
            .chain(self.entries.iter())
            .map(|(varname, source)| (varname.clone(), source.clone()))
    }
}
