//! Single-creature potential scores.
//!
//! A creature's "potential" is a static estimate built from base stats, tag
//! effects and type matchups. No battle is simulated; every score here is
//! unitless and only meaningful relative to other creatures scored against
//! the same type roster and chart.

use crate::config::ScoringConfig;
use crate::core::crit::{crit_expected_mult, CritOutcome};
use crate::core::tags::{
    compose, defensive_modifier, resolve, saturate, AdjustedStats, EffectBundle, InTypeMode,
    ParsedTags,
};
use crate::data::species::BaseStats;
use crate::data::types::{TypeChart, TypeId, TypeInfo};
use serde::Serialize;

pub const ATTACK_WEIGHT: f64 = 0.4;
pub const SPEED_WEIGHT: f64 = 0.6;
pub const STAB_POWER: f64 = 1.5;
pub const STAB_EXPONENT: f64 = 0.6;
pub const TYPE_DEF_EXPONENT: f64 = 0.65;
pub const BEST_SIDE_WEIGHT: f64 = 0.75;
pub const OTHER_SIDE_WEIGHT: f64 = 0.25;
pub const OFFENSE_WEIGHT: f64 = 0.56;
pub const DEFENSE_WEIGHT: f64 = 0.44;
pub const BALANCE_FLOOR: f64 = 0.88;
pub const BALANCE_WEIGHT: f64 = 0.12;

const MIN_AVG_INCOMING: f64 = 1e-6;

pub struct PotentialInput<'a> {
    pub stats: BaseStats,
    pub tags: &'a [String],
    pub type1: TypeId,
    pub type2: Option<TypeId>,
    /// Types scored against, already stripped of chart-excluded types.
    pub all_types: &'a [TypeInfo],
    pub chart: &'a TypeChart,
}

impl PotentialInput<'_> {
    /// Names of the holder's own types that appear in `all_types`.
    pub fn holder_type_names(&self) -> Vec<&str> {
        [Some(self.type1), self.type2]
            .into_iter()
            .flatten()
            .filter_map(|id| self.all_types.iter().find(|t| t.id == id))
            .map(|t| t.name.as_str())
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Potentials {
    pub offensive_physical: f64,
    pub offensive_special: f64,
    pub defensive_physical: f64,
    pub defensive_special: f64,
    pub offense: f64,
    pub defense: f64,
    pub box_rank: f64,
    /// Offense and defense both collapsed to zero, so no balance could be taken.
    pub balance_invalid: bool,
    pub type_def_adj: f64,
    pub stab_adj: f64,
    pub crit: CritOutcome,
}

pub fn compute_potentials(input: &PotentialInput<'_>, config: &ScoringConfig) -> Potentials {
    let parsed = ParsedTags::parse(input.tags);
    let bundle = resolve(&parsed, &input.holder_type_names());
    compute_potentials_with(&parsed, &bundle, input, config)
}

/// Scores against an already resolved bundle. `input.tags` is not re-read.
pub fn compute_potentials_with(
    parsed: &ParsedTags,
    bundle: &EffectBundle,
    input: &PotentialInput<'_>,
    config: &ScoringConfig,
) -> Potentials {
    let adjusted = bundle.stat_multipliers.apply(&input.stats);
    let type_def_adj = incoming_adjustment(parsed, bundle, input);

    let bulk_phys = compose(compose(adjusted.hp, adjusted.def).sqrt(), bundle.def_eff_mult);
    let bulk_spec = compose(adjusted.hp, adjusted.spd).sqrt();

    let (base_off_phys, base_off_spec) = base_offense(&adjusted);
    let stab_adj = stab_adjustment(input);
    let crit = crit_expected_mult(
        &bundle.crit,
        config.crit_preset,
        config.crit_base_damage_mult,
        config.crit_base_chance,
    );

    let offense_scale = [crit.expected_mult, bundle.off_mult, bundle.off_type_mult]
        .into_iter()
        .fold(stab_adj, compose);
    let offensive_physical = compose(base_off_phys, offense_scale);
    let offensive_special = compose(base_off_spec, offense_scale);
    let defensive_physical = compose(bulk_phys, type_def_adj);
    let defensive_special = compose(bulk_spec, type_def_adj);

    let offense = blend_sides(offensive_physical, offensive_special);
    let defense = blend_sides(defensive_physical, defensive_special);
    let (box_rank, balance_invalid) = box_rank(offense, defense);

    tracing::debug!(offense, defense, box_rank, balance_invalid, "computed potentials");

    Potentials {
        offensive_physical,
        offensive_special,
        defensive_physical,
        defensive_special,
        offense,
        defense,
        box_rank,
        balance_invalid,
        type_def_adj,
        stab_adj,
        crit,
    }
}

/// Root-mean-square of every incoming multiplier, inverted and compressed.
/// Several simultaneous weaknesses cost far more than a single one.
fn incoming_adjustment(
    parsed: &ParsedTags,
    bundle: &EffectBundle,
    input: &PotentialInput<'_>,
) -> f64 {
    if input.all_types.is_empty() {
        return 1.0;
    }
    let mut sum_sq = 0.0;
    for attacker in input.all_types {
        let mut chart_mult = input.chart.multiplier(attacker.id, input.type1);
        if let Some(type2) = input.type2 {
            chart_mult = compose(chart_mult, input.chart.multiplier(attacker.id, type2));
        }
        let tag = defensive_modifier(parsed, &attacker.name, InTypeMode::Separate);
        let provisional = compose(compose(chart_mult, tag.factor), bundle.in_type(&attacker.name));
        let mut mult = if tag.immune { 0.0 } else { provisional };
        if bundle.has_wonder_guard && mult <= 1.0 {
            mult = 0.0;
        }
        sum_sq = saturate(sum_sq + compose(mult, mult));
    }
    let avg = sum_sq / input.all_types.len() as f64;
    let type_def = 1.0 / avg.max(MIN_AVG_INCOMING).sqrt();
    type_def.powf(TYPE_DEF_EXPONENT)
}

fn base_offense(adjusted: &AdjustedStats) -> (f64, f64) {
    let phys = saturate(ATTACK_WEIGHT * adjusted.atk + SPEED_WEIGHT * adjusted.spe);
    let spec = saturate(ATTACK_WEIGHT * adjusted.spa + SPEED_WEIGHT * adjusted.spe);
    (phys, spec)
}

/// Power mean of the best own-type multiplier against every defending type.
fn stab_adjustment(input: &PotentialInput<'_>) -> f64 {
    if input.all_types.is_empty() {
        return 1.0;
    }
    let mut sum = 0.0;
    for defender in input.all_types {
        let mut best = input.chart.multiplier(input.type1, defender.id);
        if let Some(type2) = input.type2 {
            best = best.max(input.chart.multiplier(type2, defender.id));
        }
        sum = saturate(sum + saturate(best.powf(STAB_POWER)));
    }
    let avg = sum / input.all_types.len() as f64;
    avg.powf(1.0 / STAB_POWER).powf(STAB_EXPONENT)
}

/// The better side dominates, the other still counts a little.
pub fn blend_sides(physical: f64, special: f64) -> f64 {
    let average = physical / 2.0 + special / 2.0;
    saturate(BEST_SIDE_WEIGHT * physical.max(special) + OTHER_SIDE_WEIGHT * average)
}

/// Returns the composite rank and whether the balance was undefined, which
/// happens exactly when offense and defense are both zero.
pub fn box_rank(offense: f64, defense: f64) -> (f64, bool) {
    let raw = saturate(OFFENSE_WEIGHT * offense + DEFENSE_WEIGHT * defense);
    let invalid = offense == 0.0 && defense == 0.0;
    let high = offense.max(defense);
    let balance = if high > 0.0 {
        (offense.min(defense) / high).max(0.0)
    } else {
        1.0
    };
    (raw * (BALANCE_FLOOR + BALANCE_WEIGHT * balance), invalid)
}
