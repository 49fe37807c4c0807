//! Engine settings loaded from TOML.
//!
//! Settings are plain values owned by whoever builds an [`Engine`]; there is
//! no process-global store. Default values are embedded via
//! `include_str!("default_settings.toml")`.
//!
//! [`Engine`]: crate::compile::Engine

use serde::Deserialize;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub costs: CostSettings,
}

/// Penalty attached to each kind of non-canonical edge the compiler draws.
/// All penalties are additive along a path.
#[derive(Debug, Clone, Deserialize)]
pub struct CostSettings {
    pub elision: f32,
    pub cluster: f32,
    pub alt: f32,
    pub inversion: f32,
    pub initial_vowel: f32,
    pub linker: f32,
}

impl Default for Settings {
    fn default() -> Self {
        parse_settings_toml(DEFAULT_SETTINGS_TOML).expect("embedded settings TOML must be valid")
    }
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_non_negative {
        ($section:ident . $field:ident) => {
            if !s.$section.$field.is_finite() || s.$section.$field < 0.0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be a non-negative finite number".to_string(),
                });
            }
        };
    }

    check_non_negative!(costs.elision);
    check_non_negative!(costs.cluster);
    check_non_negative!(costs.alt);
    check_non_negative!(costs.inversion);
    check_non_negative!(costs.initial_vowel);
    check_non_negative!(costs.linker);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_toml() {
        let s = parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap();
        assert!((s.costs.elision - 5.0).abs() < f32::EPSILON);
        assert!((s.costs.cluster - 2.0).abs() < f32::EPSILON);
        assert!((s.costs.alt - 3.0).abs() < f32::EPSILON);
        assert!((s.costs.inversion - 3.0).abs() < f32::EPSILON);
        assert!((s.costs.initial_vowel - 2.0).abs() < f32::EPSILON);
        assert!((s.costs.linker - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn parse_valid_custom_toml() {
        let toml = r#"
[costs]
elision = 10.0
cluster = 1.5
alt = 2.0
inversion = 4.0
initial_vowel = 0.5
linker = 1.0
"#;
        let s = parse_settings_toml(toml).unwrap();
        assert!((s.costs.elision - 10.0).abs() < f32::EPSILON);
        assert!((s.costs.linker - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn reject_negative_cost() {
        let toml = r#"
[costs]
elision = -1.0
cluster = 2.0
alt = 3.0
inversion = 3.0
initial_vowel = 2.0
linker = 0.0
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { field, .. } if field == "costs.elision"));
    }

    #[test]
    fn reject_malformed_toml() {
        assert!(matches!(
            parse_settings_toml("[costs"),
            Err(SettingsError::Parse(_))
        ));
    }
}
