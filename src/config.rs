use crate::core::crit::CritPreset;
use crate::data::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_CRIT_DAMAGE_MULT: f64 = 1.5;

/// Per-game scoring settings. Only the crit rules vary between games; the
/// scoring weights themselves are fixed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoringConfig {
    #[serde(deserialize_with = "deserialize_preset")]
    pub crit_preset: CritPreset,
    #[serde(deserialize_with = "deserialize_damage_mult")]
    pub crit_base_damage_mult: f64,
    pub crit_base_chance: Option<f64>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            crit_preset: CritPreset::Gen7,
            crit_base_damage_mult: DEFAULT_CRIT_DAMAGE_MULT,
            crit_base_chance: None,
        }
    }
}

impl ScoringConfig {
    pub fn load_from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load_from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::load_from_yaml_str(&content)
    }
}

// Unknown preset names fall back to gen7 instead of failing the whole file.
fn deserialize_preset<'de, D>(deserializer: D) -> std::result::Result<CritPreset, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let key = String::deserialize(deserializer)?;
    Ok(CritPreset::from_key(&key))
}

fn deserialize_damage_mult<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(serde::de::Error::custom(format!(
            "critBaseDamageMult must be a finite number >= 0, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_overrides_defaults() {
        let config =
            ScoringConfig::load_from_yaml_str("critPreset: gen3_5\ncritBaseDamageMult: 2.0\n")
                .expect("parse");
        assert_eq!(config.crit_preset, CritPreset::Gen3To5);
        assert_eq!(config.crit_base_damage_mult, 2.0);
        assert_eq!(config.crit_base_chance, None);
    }

    #[test]
    fn empty_and_partial_yaml_use_defaults() {
        assert_eq!(
            ScoringConfig::load_from_yaml_str("").expect("empty"),
            ScoringConfig::default()
        );
        let partial =
            ScoringConfig::load_from_yaml_str("critBaseChance: 0.0625\n").expect("partial");
        assert_eq!(partial.crit_preset, CritPreset::Gen7);
        assert_eq!(partial.crit_base_chance, Some(0.0625));
    }

    #[test]
    fn unknown_preset_falls_back() {
        let config = ScoringConfig::load_from_yaml_str("critPreset: gen42\n").expect("parse");
        assert_eq!(config.crit_preset, CritPreset::Gen7);
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(ScoringConfig::load_from_yaml_str("critBaseDamageMult: [1, 2").is_err());
    }

    #[test]
    fn negative_or_infinite_crit_damage_is_rejected() {
        let err = ScoringConfig::load_from_yaml_str("critBaseDamageMult: -100\n")
            .expect_err("negative multiplier");
        assert!(err.to_string().contains("critBaseDamageMult must be a finite number"));
        assert!(ScoringConfig::load_from_yaml_str("critBaseDamageMult: .inf\n").is_err());
        let zero = ScoringConfig::load_from_yaml_str("critBaseDamageMult: 0\n").expect("zero");
        assert_eq!(zero.crit_base_damage_mult, 0.0);
    }
}
