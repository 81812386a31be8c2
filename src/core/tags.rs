//! Tag effect resolution.
//!
//! Species, abilities and held items carry free-form tag strings such as
//! `mult:atk:1.5`, `immune:ground` or `crit:stage:+1`. They are parsed once
//! into [`TagEffect`] values; everything downstream works on the parsed form.
//! Malformed tags are skipped, never reported as errors.

use crate::data::species::BaseStats;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use strum::{AsRefStr, Display, EnumString};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumString, AsRefStr, Display, Serialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    Hp,
    Atk,
    Def,
    Spa,
    Spd,
    #[strum(to_string = "spe", serialize = "speed")]
    Spe,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EvolutionKind {
    Item,
    Stone,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TagEffect {
    StatMult { stat: Stat, factor: f64 },
    DefEffMult(f64),
    OffMult(f64),
    OffTypeMult { type_name: String, factor: f64 },
    InTypeMult { type_name: String, factor: f64 },
    StatIfType { stat: Stat, type_name: String, factor: f64 },
    Immune(String),
    Resist(String),
    Weak(String),
    Flag(String),
    Evolution(EvolutionKind),
    Species(String),
    CritChance(f64),
    CritDamage(f64),
    CritStage(f64),
}

pub const WONDER_GUARD_FLAG: &str = "wonder_guard";
pub const AVOID_FLAG: &str = "avoid";

impl TagEffect {
    /// Keywords are case-sensitive; type and stat payloads are not.
    pub fn parse(raw: &str) -> Option<Self> {
        let parts: Vec<&str> = raw.trim().split(':').map(str::trim).collect();
        let effect = match parts.as_slice() {
            ["mult", "defeff", f] => Self::DefEffMult(parse_factor(f)?),
            ["mult", "off", f] => Self::OffMult(parse_factor(f)?),
            ["mult", "off_type", t, f] => Self::OffTypeMult {
                type_name: parse_name(t)?,
                factor: parse_factor(f)?,
            },
            ["mult", "in_type", t, f] => Self::InTypeMult {
                type_name: parse_name(t)?,
                factor: parse_factor(f)?,
            },
            ["mult", "stat_if_type", s, t, f] => Self::StatIfType {
                stat: s.parse().ok()?,
                type_name: parse_name(t)?,
                factor: parse_factor(f)?,
            },
            ["mult", s, f] => Self::StatMult {
                stat: s.parse().ok()?,
                factor: parse_factor(f)?,
            },
            ["immune", t] => Self::Immune(parse_name(t)?),
            ["resist", t] => Self::Resist(parse_name(t)?),
            ["weak", t] => Self::Weak(parse_name(t)?),
            ["flag", name] => Self::Flag(parse_name(name)?),
            ["special", name] if name.eq_ignore_ascii_case(WONDER_GUARD_FLAG) => {
                Self::Flag(WONDER_GUARD_FLAG.to_string())
            }
            ["evolution", kind] => Self::Evolution(kind.parse().ok()?),
            ["species", name] if !name.is_empty() => Self::Species(name.to_string()),
            ["crit", "chance", v] => Self::CritChance(parse_signed(v)?),
            ["crit", "damage", v] => {
                let v = v.strip_prefix(['x', 'X']).unwrap_or(*v);
                Self::CritDamage(parse_factor(v)?)
            }
            ["crit", "stage", v] => Self::CritStage(parse_signed(v)?),
            _ => return None,
        };
        Some(effect)
    }

    fn is_crit(&self) -> bool {
        matches!(self, Self::CritChance(_) | Self::CritDamage(_) | Self::CritStage(_))
    }
}

fn parse_signed(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_factor(value: &str) -> Option<f64> {
    parse_signed(value).filter(|v| *v >= 0.0)
}

fn parse_name(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_lowercase())
}

/// Clamps into the finite range. NaN collapses to zero.
pub(crate) fn saturate(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-f64::MAX, f64::MAX)
    }
}

// Stacked buffs saturate instead of overflowing to infinity.
pub(crate) fn compose(current: f64, factor: f64) -> f64 {
    saturate(current * factor)
}

/// Tags of one holder after a single parsing pass, in authoring order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedTags {
    effects: Vec<TagEffect>,
}

impl ParsedTags {
    pub fn parse<S: AsRef<str>>(tags: &[S]) -> Self {
        let effects = tags
            .iter()
            .filter_map(|raw| {
                let raw = raw.as_ref();
                let parsed = TagEffect::parse(raw);
                if parsed.is_none() {
                    tracing::trace!(tag = raw, "skipping unrecognised tag");
                }
                parsed
            })
            .collect();
        Self { effects }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.effects
            .iter()
            .any(|e| matches!(e, TagEffect::Flag(name) if name.eq_ignore_ascii_case(flag)))
    }

    pub fn evolution(&self) -> Option<EvolutionKind> {
        self.effects.iter().find_map(|e| match e {
            TagEffect::Evolution(kind) => Some(*kind),
            _ => None,
        })
    }

    pub fn species_refs(&self) -> Vec<&str> {
        self.effects
            .iter()
            .filter_map(|e| match e {
                TagEffect::Species(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn crit_modifiers(&self) -> CritModifiers {
        let mut crit = CritModifiers::default();
        for effect in self.effects.iter().filter(|e| e.is_crit()) {
            match effect {
                TagEffect::CritChance(v) => crit.chance_bonus = saturate(crit.chance_bonus + v),
                TagEffect::CritDamage(v) => {
                    crit.damage_bonus_mult = compose(crit.damage_bonus_mult, *v)
                }
                TagEffect::CritStage(v) => crit.stage_bonus = saturate(crit.stage_bonus + v),
                _ => {}
            }
            crit.tags_applied += 1;
        }
        crit
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StatMultipliers {
    pub hp: f64,
    pub atk: f64,
    pub def: f64,
    pub spa: f64,
    pub spd: f64,
    pub spe: f64,
}

impl Default for StatMultipliers {
    fn default() -> Self {
        Self {
            hp: 1.0,
            atk: 1.0,
            def: 1.0,
            spa: 1.0,
            spd: 1.0,
            spe: 1.0,
        }
    }
}

impl StatMultipliers {
    pub fn get(&self, stat: Stat) -> f64 {
        match stat {
            Stat::Hp => self.hp,
            Stat::Atk => self.atk,
            Stat::Def => self.def,
            Stat::Spa => self.spa,
            Stat::Spd => self.spd,
            Stat::Spe => self.spe,
        }
    }

    fn slot(&mut self, stat: Stat) -> &mut f64 {
        match stat {
            Stat::Hp => &mut self.hp,
            Stat::Atk => &mut self.atk,
            Stat::Def => &mut self.def,
            Stat::Spa => &mut self.spa,
            Stat::Spd => &mut self.spd,
            Stat::Spe => &mut self.spe,
        }
    }

    pub fn scale(&mut self, stat: Stat, factor: f64) {
        let slot = self.slot(stat);
        *slot = compose(*slot, factor);
    }

    pub fn apply(&self, stats: &BaseStats) -> AdjustedStats {
        AdjustedStats {
            hp: compose(f64::from(stats.hp), self.hp),
            atk: compose(f64::from(stats.atk), self.atk),
            def: compose(f64::from(stats.def), self.def),
            spa: compose(f64::from(stats.spa), self.spa),
            spd: compose(f64::from(stats.spd), self.spd),
            spe: compose(f64::from(stats.spe), self.spe),
        }
    }
}

/// Base stats after tag multipliers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AdjustedStats {
    pub hp: f64,
    pub atk: f64,
    pub def: f64,
    pub spa: f64,
    pub spd: f64,
    pub spe: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CritModifiers {
    pub chance_bonus: f64,
    pub damage_bonus_mult: f64,
    pub stage_bonus: f64,
    pub tags_applied: u32,
}

impl Default for CritModifiers {
    fn default() -> Self {
        Self {
            chance_bonus: 0.0,
            damage_bonus_mult: 1.0,
            stage_bonus: 0.0,
            tags_applied: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectBundle {
    pub stat_multipliers: StatMultipliers,
    pub def_eff_mult: f64,
    pub off_mult: f64,
    pub off_type_mult: f64,
    /// Keyed by lowercase attacking type name.
    pub in_type_mult: BTreeMap<String, f64>,
    pub has_wonder_guard: bool,
    pub crit: CritModifiers,
}

impl Default for EffectBundle {
    fn default() -> Self {
        Self {
            stat_multipliers: StatMultipliers::default(),
            def_eff_mult: 1.0,
            off_mult: 1.0,
            off_type_mult: 1.0,
            in_type_mult: BTreeMap::new(),
            has_wonder_guard: false,
            crit: CritModifiers::default(),
        }
    }
}

impl EffectBundle {
    pub fn in_type(&self, type_name: &str) -> f64 {
        self.in_type_mult
            .get(&type_name.to_lowercase())
            .copied()
            .unwrap_or(1.0)
    }
}

/// Folds parsed tags into multipliers. `holder_types` are the holder's own
/// type names and gate the `off_type` and `stat_if_type` tags.
pub fn resolve<S: AsRef<str>>(tags: &ParsedTags, holder_types: &[S]) -> EffectBundle {
    let holder: BTreeSet<String> = holder_types
        .iter()
        .map(|t| t.as_ref().to_lowercase())
        .collect();
    let mut bundle = EffectBundle::default();

    for effect in tags.iter() {
        match effect {
            TagEffect::StatMult { stat, factor } => {
                bundle.stat_multipliers.scale(*stat, *factor)
            }
            TagEffect::DefEffMult(factor) => {
                bundle.def_eff_mult = compose(bundle.def_eff_mult, *factor)
            }
            TagEffect::OffMult(factor) => bundle.off_mult = compose(bundle.off_mult, *factor),
            TagEffect::OffTypeMult { type_name, factor } => {
                if holder.contains(type_name) {
                    bundle.off_type_mult = compose(bundle.off_type_mult, *factor);
                }
            }
            TagEffect::InTypeMult { type_name, factor } => {
                let entry = bundle.in_type_mult.entry(type_name.clone()).or_insert(1.0);
                *entry = compose(*entry, *factor);
            }
            TagEffect::StatIfType {
                stat,
                type_name,
                factor,
            } => {
                if holder.contains(type_name) {
                    bundle.stat_multipliers.scale(*stat, *factor);
                }
            }
            TagEffect::Flag(name) if name == WONDER_GUARD_FLAG => bundle.has_wonder_guard = true,
            _ => {}
        }
    }
    bundle.crit = tags.crit_modifiers();
    bundle
}

/// Parses and resolves in one step.
pub fn resolve_tags<S: AsRef<str>, H: AsRef<str>>(tags: &[S], holder_types: &[H]) -> EffectBundle {
    resolve(&ParsedTags::parse(tags), holder_types)
}

/// Whether `mult:in_type` tags take part in the incoming-damage tag pass.
///
/// The single-creature potential keeps them in [`EffectBundle::in_type_mult`]
/// and multiplies them in separately; the team views fold them in here
/// alongside `resist`/`weak`/`immune`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InTypeMode {
    #[default]
    Separate,
    AsResist,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DefensiveModifier {
    pub factor: f64,
    pub immune: bool,
}

impl DefensiveModifier {
    /// Immunity overrides every other factor.
    pub fn value(&self) -> f64 {
        if self.immune {
            0.0
        } else {
            self.factor
        }
    }

    /// Applies this modifier on top of an already computed multiplier.
    pub fn apply(&self, provisional: f64) -> f64 {
        if self.immune {
            0.0
        } else {
            compose(provisional, self.factor)
        }
    }
}

/// Collects the tag-side factor against one attacking type, then records
/// immunity separately so it can win regardless of tag order.
pub fn defensive_modifier(
    tags: &ParsedTags,
    attacking_type: &str,
    mode: InTypeMode,
) -> DefensiveModifier {
    let target = attacking_type.to_lowercase();
    let mut factor = 1.0;
    let mut immune = false;
    for effect in tags.iter() {
        match effect {
            TagEffect::Immune(t) if *t == target => immune = true,
            TagEffect::Resist(t) if *t == target => factor = compose(factor, 0.5),
            TagEffect::Weak(t) if *t == target => factor = compose(factor, 2.0),
            TagEffect::InTypeMult { type_name, factor: f }
                if mode == InTypeMode::AsResist && *type_name == target =>
            {
                factor = compose(factor, *f)
            }
            _ => {}
        }
    }
    DefensiveModifier { factor, immune }
}

pub fn type_multiplier(tags: &ParsedTags, attacking_type: &str, mode: InTypeMode) -> f64 {
    defensive_modifier(tags, attacking_type, mode).value()
}
