use crate::config::ScoringConfig;
use crate::core::potential::{compute_potentials, PotentialInput, Potentials};
use crate::core::tags::{ParsedTags, AVOID_FLAG};
use crate::data::species::{BaseStats, SpeciesData};
use crate::data::types::{TypeChart, TypeId, TypeInfo};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxEntry {
    pub name: String,
    pub stats: BaseStats,
    pub type1: TypeId,
    #[serde(default)]
    pub type2: Option<TypeId>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl From<&SpeciesData> for BoxEntry {
    fn from(species: &SpeciesData) -> Self {
        Self {
            name: species.name.clone(),
            stats: species.base_stats,
            type1: species.type1,
            type2: species.type2,
            tags: species.tags.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    pub name: String,
    /// Position of the entry in the input box.
    pub index: usize,
    /// Carries `flag:avoid`; still ranked, shown dimmed.
    pub avoid: bool,
    pub potentials: Potentials,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceWarning {
    pub name: String,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxReport {
    pub entries: Vec<RankedEntry>,
    pub warnings: Vec<BalanceWarning>,
}

/// Scores every entry independently and orders them by box rank, best first.
/// Equal ranks keep their input order.
pub fn rank_box(
    entries: &[BoxEntry],
    all_types: &[TypeInfo],
    chart: &TypeChart,
    config: &ScoringConfig,
) -> BoxReport {
    let mut report = BoxReport::default();
    for (index, entry) in entries.iter().enumerate() {
        let potentials = compute_potentials(
            &PotentialInput {
                stats: entry.stats,
                tags: &entry.tags,
                type1: entry.type1,
                type2: entry.type2,
                all_types,
                chart,
            },
            config,
        );
        if potentials.balance_invalid {
            report.warnings.push(BalanceWarning {
                name: entry.name.clone(),
                message: format!("rank could not be balanced for {}", entry.name),
            });
        }
        report.entries.push(RankedEntry {
            name: entry.name.clone(),
            index,
            avoid: ParsedTags::parse(&entry.tags).has_flag(AVOID_FLAG),
            potentials,
        });
    }
    report
        .entries
        .sort_by(|a, b| b.potentials.box_rank.total_cmp(&a.potentials.box_rank));
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, stat: u32, tags: &[&str]) -> BoxEntry {
        BoxEntry {
            name: name.to_string(),
            stats: BaseStats::new(stat, stat, stat, stat, stat, stat),
            type1: 1,
            type2: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn orders_best_first_and_keeps_ties_stable() {
        let types = vec![TypeInfo::new(1, "Normal")];
        let chart = TypeChart::new();
        let entries = vec![
            entry("small", 40, &[]),
            entry("big", 120, &["flag:avoid"]),
            entry("small2", 40, &[]),
        ];
        let report = rank_box(&entries, &types, &chart, &ScoringConfig::default());
        let order: Vec<&str> = report.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(order, vec!["big", "small", "small2"]);
        assert!(report.entries[0].avoid);
        assert_eq!(report.entries[0].index, 1);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn zeroed_entry_raises_a_warning() {
        let types = vec![TypeInfo::new(1, "Normal")];
        let chart = TypeChart::new();
        let entries = vec![entry("Blank", 0, &[])];
        let report = rank_box(&entries, &types, &chart, &ScoringConfig::default());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].message, "rank could not be balanced for Blank");
        assert_eq!(report.entries[0].potentials.box_rank, 0.0);
    }

    #[test]
    fn large_box_with_saturated_buffs_sorts_cleanly() {
        let types = vec![TypeInfo::new(1, "Normal"), TypeInfo::new(2, "Fire")];
        let chart = TypeChart::new();
        let entries: Vec<BoxEntry> = (0..40u32)
            .map(|i| {
                let tags: &[&str] = if i % 3 == 0 {
                    &["mult:hp:1e308", "mult:def:0"]
                } else {
                    &[]
                };
                entry(&format!("mon{i}"), 10 + i, tags)
            })
            .collect();
        let report = rank_box(&entries, &types, &chart, &ScoringConfig::default());
        assert_eq!(report.entries.len(), 40);
        assert!(report.entries.iter().all(|e| e.potentials.box_rank.is_finite()));
        assert!(report
            .entries
            .windows(2)
            .all(|w| w[0].potentials.box_rank >= w[1].potentials.box_rank));
    }
}
