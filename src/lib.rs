pub mod config;
pub mod core;
pub mod data;

pub use crate::config::ScoringConfig;
pub use crate::core::{
    crit::{crit_expected_mult, crit_expected_mult_for_tags, CritOutcome, CritPreset},
    potential::{compute_potentials, compute_potentials_with, PotentialInput, Potentials},
    rank::{rank_box, BoxEntry, BoxReport, RankedEntry},
    tags::{
        defensive_modifier, resolve, resolve_tags, type_multiplier, EffectBundle, InTypeMode,
        ParsedTags, TagEffect,
    },
    team::{
        compute_defense_matrix, compute_team_chart, DefenseMatrixRow, TeamChartRow, TeamMember,
        TEAM_SIZE,
    },
};
pub use crate::data::{
    dataset::Dataset,
    error::DataError,
    species::{BaseStats, SpeciesData},
    types::{TypeChart, TypeChartRow, TypeId, TypeInfo, TypeRoster},
};

#[cfg(target_arch = "wasm32")]
pub mod wasm;
