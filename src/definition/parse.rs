//! The definition grammar and transclusion resolution.
//!
//! A definition source is whitespace-separated tokens:
//!
//! ```text
//! c.k r.r e.e!1 st.(s t) e.
//! {@con^} s.s i.i2? der.(d @r1)
//! ```
//!
//! Each plain token is `chars.keysymbols`: characters, a dot, then either a
//! single keysymbol, a parenthesised space-separated group, or nothing for a
//! silent spelling. A keysymbol is `symbol[!stress][?]`. `{varname}`
//! transcludes another definition's sophemes in place.

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use super::{Definition, Keysymbol, Sopheme};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("token {0:?} has no `.` separating spelling from keysymbols")]
    MissingDot(String),
    #[error("unclosed `(` in token {0:?}")]
    UnclosedGroup(String),
    #[error("unclosed `{{` in definition {0:?}")]
    UnclosedBrace(String),
    #[error("empty transclusion `{{}}` in definition {0:?}")]
    EmptyTransclusion(String),
    #[error("bad stress marker in keysymbol {0:?}")]
    BadStress(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransclusionError {
    #[error("transcluded definition {0:?} does not exist")]
    Unknown(String),
    #[error("transclusion cycle through {0:?}")]
    Cycle(String),
}

#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Transclusion(#[from] TransclusionError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Sopheme(Sopheme),
    Transclude(String),
}

/// Varnames for morphemes, which are transcluded rather than translated:
/// prefixes start or affix markers end with `^`, and `@`/`#` name roots and
/// numeric fragments.
pub fn is_morpheme_varname(name: &str) -> bool {
    name.starts_with('@') || name.starts_with('#') || name.starts_with('^') || name.ends_with('^')
}

pub fn parse_keysymbol(raw: &str) -> Result<Keysymbol, ParseError> {
    let (body, optional) = match raw.strip_suffix('?') {
        Some(body) => (body, true),
        None => (raw, false),
    };
    let (symbol, stress) = match body.split_once('!') {
        Some((symbol, stress_str)) => {
            let stress: u8 = stress_str
                .parse()
                .map_err(|_| ParseError::BadStress(raw.to_string()))?;
            if stress == 0 || stress > 3 {
                return Err(ParseError::BadStress(raw.to_string()));
            }
            (symbol, stress)
        }
        None => (body, 0),
    };
    Ok(Keysymbol::new(symbol, stress, optional))
}

pub fn parse_tokens(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == '{' {
            chars.next();
            let mut name = String::new();
            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(ch) => name.push(ch),
                    None => return Err(ParseError::UnclosedBrace(source.to_string())),
                }
            }
            if name.is_empty() {
                return Err(ParseError::EmptyTransclusion(source.to_string()));
            }
            tokens.push(Token::Transclude(name));
            continue;
        }
        // a plain token; spaces only split outside parentheses
        let mut raw = String::new();
        let mut depth = 0usize;
        while let Some(&ch) = chars.peek() {
            if ch.is_whitespace() && depth == 0 {
                break;
            }
            match ch {
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                _ => {}
            }
            raw.push(ch);
            chars.next();
        }
        if depth > 0 {
            return Err(ParseError::UnclosedGroup(raw));
        }
        tokens.push(Token::Sopheme(parse_sopheme_token(&raw)?));
    }
    Ok(tokens)
}

fn parse_sopheme_token(raw: &str) -> Result<Sopheme, ParseError> {
    let (chars, keysyms) = raw
        .split_once('.')
        .ok_or_else(|| ParseError::MissingDot(raw.to_string()))?;
    let keysymbols = if keysyms.is_empty() {
        Vec::new()
    } else if let Some(group) = keysyms.strip_prefix('(') {
        let group = group
            .strip_suffix(')')
            .ok_or_else(|| ParseError::UnclosedGroup(raw.to_string()))?;
        group
            .split_whitespace()
            .map(parse_keysymbol)
            .collect::<Result<_, _>>()?
    } else {
        vec![parse_keysymbol(keysyms)?]
    };
    Ok(Sopheme {
        chars: chars.to_string(),
        keysymbols,
    })
}

/// Resolve `varname` to a flat definition, expanding transclusions
/// recursively. Sources form a DAG; a cycle is an error against the varname
/// that closes it.
pub fn resolve(
    varname: &str,
    sources: &HashMap<String, String>,
) -> Result<Definition, DefinitionError> {
    let mut cache = HashMap::new();
    let mut stack = Vec::new();
    let sophemes = resolve_inner(varname, sources, &mut stack, &mut cache)?;
    Ok(Definition::new(sophemes))
}

fn resolve_inner(
    varname: &str,
    sources: &HashMap<String, String>,
    stack: &mut Vec<String>,
    cache: &mut HashMap<String, Vec<Sopheme>>,
) -> Result<Vec<Sopheme>, DefinitionError> {
    if let Some(done) = cache.get(varname) {
        return Ok(done.clone());
    }
    if stack.iter().any(|v| v == varname) {
        return Err(TransclusionError::Cycle(varname.to_string()).into());
    }
    let source = sources
        .get(varname)
        .ok_or_else(|| TransclusionError::Unknown(varname.to_string()))?;
    stack.push(varname.to_string());
    let mut sophemes = Vec::new();
    for token in parse_tokens(source)? {
        match token {
            Token::Sopheme(sopheme) => sophemes.push(sopheme),
            Token::Transclude(name) => {
                debug!(from = varname, to = %name, "transcluding");
                sophemes.extend(resolve_inner(&name, sources, stack, cache)?);
            }
        }
    }
    stack.pop();
    cache.insert(varname.to_string(), sophemes.clone());
    Ok(sophemes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_tokens() {
        let tokens = parse_tokens("c.k r.r e.e!1 st.(s t) e.").unwrap();
        assert_eq!(tokens.len(), 5);
        let Token::Sopheme(ref e) = tokens[2] else {
            panic!("expected sopheme");
        };
        assert_eq!(e.chars, "e");
        assert_eq!(e.keysymbols, vec![Keysymbol::new("e", 1, false)]);
        let Token::Sopheme(ref st) = tokens[3] else {
            panic!("expected sopheme");
        };
        assert_eq!(st.keysymbols.len(), 2);
        let Token::Sopheme(ref silent) = tokens[4] else {
            panic!("expected sopheme");
        };
        assert!(silent.keysymbols.is_empty());
    }

    #[test]
    fn keysymbol_markers() {
        assert_eq!(
            parse_keysymbol("e!1").unwrap(),
            Keysymbol::new("e", 1, false)
        );
        assert_eq!(
            parse_keysymbol("y?").unwrap(),
            Keysymbol::new("y", 0, true)
        );
        assert_eq!(
            parse_keysymbol("i2!3?").unwrap(),
            Keysymbol::new("i2", 3, true)
        );
        // an embedded digit without `!` is part of the symbol, not stress
        let ks = parse_keysymbol("I2").unwrap();
        assert_eq!(ks.stress, 0);
        assert_eq!(ks.base_symbol(), "i");

        assert!(matches!(
            parse_keysymbol("e!9"),
            Err(ParseError::BadStress(_))
        ));
        assert!(matches!(
            parse_keysymbol("e!x"),
            Err(ParseError::BadStress(_))
        ));
    }

    #[test]
    fn transclusion_tokens() {
        let tokens = parse_tokens("{@cri} s.s t.t").unwrap();
        assert_eq!(tokens[0], Token::Transclude("@cri".to_string()));
        assert!(matches!(
            parse_tokens("{@cri s.s"),
            Err(ParseError::UnclosedBrace(_))
        ));
        assert!(matches!(
            parse_tokens("{}"),
            Err(ParseError::EmptyTransclusion(_))
        ));
    }

    #[test]
    fn malformed_tokens() {
        assert!(matches!(
            parse_tokens("crest"),
            Err(ParseError::MissingDot(_))
        ));
        assert!(matches!(
            parse_tokens("st.(s t"),
            Err(ParseError::UnclosedGroup(_))
        ));
    }

    #[test]
    fn morpheme_varnames() {
        assert!(is_morpheme_varname("@cri"));
        assert!(is_morpheme_varname("#2"));
        assert!(is_morpheme_varname("^re"));
        assert!(is_morpheme_varname("ing^"));
        assert!(!is_morpheme_varname("crest"));
    }

    #[test]
    fn resolve_expands_nested_transclusions() {
        let mut sources = HashMap::new();
        sources.insert("@cri".to_string(), "c.k r.r i.i!1".to_string());
        sources.insert("crist".to_string(), "{@cri} s.s t.t".to_string());
        let def = resolve("crist", &sources).unwrap();
        assert_eq!(def.spelling(), "crist");
        assert_eq!(def.phonemes().count(), 5);
    }

    #[test]
    fn resolve_reports_unknown_and_cycles() {
        let mut sources = HashMap::new();
        sources.insert("a".to_string(), "{b}".to_string());
        assert!(matches!(
            resolve("a", &sources),
            Err(DefinitionError::Transclusion(TransclusionError::Unknown(_)))
        ));
        sources.insert("b".to_string(), "{a}".to_string());
        assert!(matches!(
            resolve("a", &sources),
            Err(DefinitionError::Transclusion(TransclusionError::Cycle(_)))
        ));
    }
}
