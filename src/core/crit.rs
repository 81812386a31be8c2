use crate::core::tags::{compose, saturate, CritModifiers, ParsedTags};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Base crit chance by stage for each generation's rules.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    AsRefStr,
    Display,
    Serialize,
    Deserialize,
)]
pub enum CritPreset {
    #[strum(serialize = "gen2")]
    #[serde(rename = "gen2")]
    Gen2,
    #[strum(serialize = "gen3_5")]
    #[serde(rename = "gen3_5")]
    Gen3To5,
    #[strum(serialize = "gen6")]
    #[serde(rename = "gen6")]
    Gen6,
    #[default]
    #[strum(serialize = "gen7")]
    #[serde(rename = "gen7")]
    Gen7,
}

const GEN2_TABLE: [f64; 5] = [17.0 / 256.0, 1.0 / 8.0, 1.0 / 4.0, 85.0 / 256.0, 1.0 / 2.0];
const GEN3_5_TABLE: [f64; 5] = [1.0 / 16.0, 1.0 / 8.0, 1.0 / 4.0, 1.0 / 3.0, 1.0 / 2.0];
const GEN6_TABLE: [f64; 4] = [1.0 / 16.0, 1.0 / 8.0, 1.0 / 2.0, 1.0];
const GEN7_TABLE: [f64; 4] = [1.0 / 24.0, 1.0 / 8.0, 1.0 / 2.0, 1.0];

impl CritPreset {
    /// Unknown keys fall back to gen7.
    pub fn from_key(key: &str) -> Self {
        key.trim().parse().unwrap_or_default()
    }

    pub fn table(&self) -> &'static [f64] {
        match self {
            Self::Gen2 => &GEN2_TABLE,
            Self::Gen3To5 => &GEN3_5_TABLE,
            Self::Gen6 => &GEN6_TABLE,
            Self::Gen7 => &GEN7_TABLE,
        }
    }

    pub fn max_stage(&self) -> u32 {
        (self.table().len() - 1) as u32
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CritOutcome {
    pub chance: f64,
    pub damage_mult: f64,
    pub expected_mult: f64,
    pub stage: u32,
    pub tags_applied: u32,
}

/// Expected damage multiplier of a crit/no-crit roll.
///
/// The stage is the floored sum of `crit:stage` bonuses clamped into the
/// preset table. `base_chance`, when given, replaces the table's stage-0
/// chance. Chance bonuses are added after the table lookup and the total is
/// clamped to `[0, 1]`. A negative crit damage multiplier counts as zero.
pub fn crit_expected_mult(
    crit: &CritModifiers,
    preset: CritPreset,
    base_damage_mult: f64,
    base_chance: Option<f64>,
) -> CritOutcome {
    let stage = crit.stage_bonus.floor().clamp(0.0, f64::from(preset.max_stage())) as u32;
    let table_chance = match (stage, base_chance) {
        (0, Some(chance)) if chance.is_finite() => chance.clamp(0.0, 1.0),
        _ => preset.table()[stage as usize],
    };
    let chance = (table_chance + crit.chance_bonus).clamp(0.0, 1.0);
    let damage_mult = compose(saturate(base_damage_mult).max(0.0), crit.damage_bonus_mult);
    let expected_mult = saturate(1.0 + chance * (damage_mult - 1.0));

    CritOutcome {
        chance,
        damage_mult,
        expected_mult,
        stage,
        tags_applied: crit.tags_applied,
    }
}

pub fn crit_expected_mult_for_tags<S: AsRef<str>>(
    tags: &[S],
    preset_key: &str,
    base_damage_mult: f64,
    base_chance: Option<f64>,
) -> CritOutcome {
    let crit = ParsedTags::parse(tags).crit_modifiers();
    crit_expected_mult(&crit, CritPreset::from_key(preset_key), base_damage_mult, base_chance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_keys_round_trip_and_fall_back() {
        assert_eq!(CritPreset::from_key("gen2"), CritPreset::Gen2);
        assert_eq!(CritPreset::from_key("gen3_5"), CritPreset::Gen3To5);
        assert_eq!(CritPreset::from_key("gen6"), CritPreset::Gen6);
        assert_eq!(CritPreset::from_key("gen7"), CritPreset::Gen7);
        assert_eq!(CritPreset::from_key("gen9"), CritPreset::Gen7);
        assert_eq!(CritPreset::from_key(""), CritPreset::Gen7);
        assert_eq!(CritPreset::Gen3To5.to_string(), "gen3_5");
    }

    #[test]
    fn no_tags_uses_stage_zero() {
        let outcome = crit_expected_mult(&CritModifiers::default(), CritPreset::Gen7, 1.5, None);
        assert_eq!(outcome.stage, 0);
        assert_eq!(outcome.chance, 1.0 / 24.0);
        assert_eq!(outcome.damage_mult, 1.5);
        assert_eq!(outcome.expected_mult, 1.0 + (1.0 / 24.0) * 0.5);
        assert_eq!(outcome.tags_applied, 0);
    }

    #[test]
    fn stage_clamps_into_table() {
        let high = crit_expected_mult_for_tags(&["crit:stage:+9"], "gen6", 1.5, None);
        assert_eq!(high.stage, 3);
        assert_eq!(high.chance, 1.0);

        let low = crit_expected_mult_for_tags(&["crit:stage:-3"], "gen2", 2.0, None);
        assert_eq!(low.stage, 0);
        assert_eq!(low.chance, 17.0 / 256.0);

        let fractional = crit_expected_mult_for_tags(&["crit:stage:+1.9"], "gen3_5", 2.0, None);
        assert_eq!(fractional.stage, 1);
        assert_eq!(fractional.chance, 1.0 / 8.0);
    }

    #[test]
    fn stacked_crit_tags() {
        let outcome = crit_expected_mult_for_tags(
            &["crit:stage:+2", "crit:chance:+0.1", "crit:damage:x2"],
            "gen7",
            1.5,
            None,
        );
        assert_eq!(outcome.stage, 2);
        assert!((outcome.chance - 0.6).abs() < 1e-12);
        assert_eq!(outcome.damage_mult, 3.0);
        assert!((outcome.expected_mult - 2.2).abs() < 1e-12);
        assert_eq!(outcome.tags_applied, 3);
    }

    #[test]
    fn chance_is_clamped() {
        let over =
            crit_expected_mult_for_tags(&["crit:stage:+2", "crit:chance:+0.9"], "gen7", 1.5, None);
        assert_eq!(over.chance, 1.0);
        let under = crit_expected_mult_for_tags(&["crit:chance:-1"], "gen7", 1.5, None);
        assert_eq!(under.chance, 0.0);
        assert_eq!(under.expected_mult, 1.0);
    }

    #[test]
    fn base_chance_replaces_stage_zero_only() {
        let base = crit_expected_mult_for_tags::<&str>(&[], "gen7", 1.5, Some(0.25));
        assert_eq!(base.chance, 0.25);
        let staged = crit_expected_mult_for_tags(&["crit:stage:+1"], "gen7", 1.5, Some(0.25));
        assert_eq!(staged.chance, 1.0 / 8.0);
        let clamped = crit_expected_mult_for_tags::<&str>(&[], "gen7", 1.5, Some(3.0));
        assert_eq!(clamped.chance, 1.0);
    }

    #[test]
    fn negative_damage_mult_never_drops_below_no_damage() {
        let sure_hit = crit_expected_mult_for_tags(&["crit:stage:+3"], "gen7", -100.0, None);
        assert_eq!(sure_hit.damage_mult, 0.0);
        assert_eq!(sure_hit.expected_mult, 0.0);

        let rare = crit_expected_mult_for_tags::<&str>(&[], "gen7", f64::NEG_INFINITY, None);
        assert_eq!(rare.damage_mult, 0.0);
        assert!(rare.expected_mult > 0.0);
    }
}
