//! Team-wide defensive coverage against every attacking type.

use crate::core::tags::{compose, defensive_modifier, InTypeMode, ParsedTags};
use crate::data::species::SpeciesData;
use crate::data::types::{TypeChart, TypeId, TypeInfo};
use serde::{Deserialize, Serialize};

pub const TEAM_SIZE: usize = 6;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    #[serde(default)]
    pub name: String,
    pub type1: TypeId,
    #[serde(default)]
    pub type2: Option<TypeId>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefenseMatrixRow {
    pub attacking_type_id: TypeId,
    pub attacking_type_name: String,
    pub attacking_type_color: Option<String>,
    /// One entry per slot; `None` marks an empty slot.
    pub multipliers: Vec<Option<f64>>,
    pub total_weak: u32,
    pub total_resist: u32,
}

impl DefenseMatrixRow {
    /// More members take extra damage from this type than resist it.
    pub fn is_gap(&self) -> bool {
        self.total_weak > self.total_resist
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamChartRow {
    pub attacking_type_id: TypeId,
    pub attacking_type_name: String,
    pub attacking_type_color: Option<String>,
    pub weak: u32,
    pub resist: u32,
    pub immune: u32,
}

impl From<&SpeciesData> for TeamMember {
    fn from(species: &SpeciesData) -> Self {
        Self {
            name: species.name.clone(),
            type1: species.type1,
            type2: species.type2,
            tags: species.tags.clone(),
        }
    }
}

// Member with its tags parsed once for the whole matrix.
struct ScoredMember<'a> {
    member: &'a TeamMember,
    tags: ParsedTags,
}

impl<'a> ScoredMember<'a> {
    fn new(member: &'a TeamMember) -> Self {
        Self {
            member,
            tags: ParsedTags::parse(&member.tags),
        }
    }

    fn incoming(&self, attacker: &TypeInfo, chart: &TypeChart) -> f64 {
        let mut mult = chart.multiplier(attacker.id, self.member.type1);
        if let Some(type2) = self.member.type2 {
            mult = compose(mult, chart.multiplier(attacker.id, type2));
        }
        defensive_modifier(&self.tags, &attacker.name, InTypeMode::AsResist).apply(mult)
    }
}

/// One row per attacking type, in `all_types` order. Neutral and immune
/// multipliers count toward neither tally.
pub fn compute_defense_matrix(
    members: &[Option<TeamMember>],
    all_types: &[TypeInfo],
    chart: &TypeChart,
) -> Vec<DefenseMatrixRow> {
    if members.len() > TEAM_SIZE {
        tracing::debug!(slots = members.len(), "defense matrix over more than {TEAM_SIZE} slots");
    }
    let slots: Vec<Option<ScoredMember<'_>>> = members
        .iter()
        .map(|slot| slot.as_ref().map(ScoredMember::new))
        .collect();

    all_types
        .iter()
        .map(|attacker| {
            let multipliers: Vec<Option<f64>> = slots
                .iter()
                .map(|slot| slot.as_ref().map(|m| m.incoming(attacker, chart)))
                .collect();
            let total_weak = multipliers.iter().flatten().filter(|m| **m > 1.0).count() as u32;
            let total_resist = multipliers
                .iter()
                .flatten()
                .filter(|m| **m < 1.0 && **m > 0.0)
                .count() as u32;
            DefenseMatrixRow {
                attacking_type_id: attacker.id,
                attacking_type_name: attacker.name.clone(),
                attacking_type_color: attacker.color.clone(),
                multipliers,
                total_weak,
                total_resist,
            }
        })
        .collect()
}

/// Flat summary over a team without empty slots, counting immunities apart.
pub fn compute_team_chart(
    members: &[TeamMember],
    all_types: &[TypeInfo],
    chart: &TypeChart,
) -> Vec<TeamChartRow> {
    let scored: Vec<ScoredMember<'_>> = members.iter().map(ScoredMember::new).collect();

    all_types
        .iter()
        .map(|attacker| {
            let mut row = TeamChartRow {
                attacking_type_id: attacker.id,
                attacking_type_name: attacker.name.clone(),
                attacking_type_color: attacker.color.clone(),
                weak: 0,
                resist: 0,
                immune: 0,
            };
            for member in &scored {
                let mult = member.incoming(attacker, chart);
                if mult == 0.0 {
                    row.immune += 1;
                } else if mult > 1.0 {
                    row.weak += 1;
                } else if mult < 1.0 {
                    row.resist += 1;
                }
            }
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::TypeChartRow;

    fn roster() -> Vec<TypeInfo> {
        vec![
            TypeInfo::new(1, "Fire").with_color("#EE8130"),
            TypeInfo::new(2, "Water"),
            TypeInfo::new(3, "Grass"),
            TypeInfo::new(4, "Ground"),
        ]
    }

    fn chart() -> TypeChart {
        TypeChart::from_rows(&[
            TypeChartRow::new(1, 3, 2.0),
            TypeChartRow::new(2, 3, 0.5),
            TypeChartRow::new(2, 1, 2.0),
            TypeChartRow::new(1, 1, 0.5),
            TypeChartRow::new(4, 1, 2.0),
        ])
    }

    fn member(type1: TypeId, tags: &[&str]) -> TeamMember {
        TeamMember {
            name: format!("member{type1}"),
            type1,
            type2: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn rows_follow_roster_order() {
        let rows = compute_defense_matrix(&[Some(member(3, &[]))], &roster(), &chart());
        let names: Vec<&str> = rows.iter().map(|r| r.attacking_type_name.as_str()).collect();
        assert_eq!(names, vec!["Fire", "Water", "Grass", "Ground"]);
        assert_eq!(rows[0].attacking_type_color.as_deref(), Some("#EE8130"));
        assert!(rows[0].is_gap());
        assert!(!rows[1].is_gap());
    }

    #[test]
    fn immune_counts_nowhere_in_matrix_but_separately_in_chart() {
        let team = vec![member(1, &["immune:ground"]), member(3, &[])];
        let slots: Vec<Option<TeamMember>> = team.iter().cloned().map(Some).collect();

        let matrix = compute_defense_matrix(&slots, &roster(), &chart());
        let ground = &matrix[3];
        assert_eq!(ground.multipliers, vec![Some(0.0), Some(1.0)]);
        assert_eq!(ground.total_weak, 0);
        assert_eq!(ground.total_resist, 0);

        let summary = compute_team_chart(&team, &roster(), &chart());
        assert_eq!(summary[3].immune, 1);
        assert_eq!(summary[3].weak, 0);
        assert_eq!(summary[3].resist, 0);
    }

    #[test]
    fn in_type_tags_fold_into_team_view() {
        let team = vec![member(3, &["mult:in_type:fire:0.25"])];
        let summary = compute_team_chart(&team, &roster(), &chart());
        assert_eq!(summary[0].resist, 1);
        assert_eq!(summary[0].weak, 0);
    }
}
