use crate::core::rank::BoxEntry;
use crate::data::error::{DataError, Result};
use crate::data::species::SpeciesData;
use crate::data::types::{TypeChart, TypeChartRow, TypeInfo, TypeRoster};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A materialized game view as exported by the storage layer.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub types: Vec<TypeInfo>,
    #[serde(default)]
    pub chart: Vec<TypeChartRow>,
    #[serde(default, alias = "species")]
    pub creatures: Vec<SpeciesData>,
}

impl Dataset {
    /// A dataset without its own types uses the standard roster and chart.
    pub fn load_from_json_str(json: &str) -> Result<Self> {
        let mut dataset: Dataset = serde_json::from_str(json)?;
        if dataset.types.is_empty() {
            dataset.types = TypeRoster::standard().all().to_vec();
            if dataset.chart.is_empty() {
                dataset.chart = TypeChart::standard().rows();
            }
        }
        dataset.validate()?;
        Ok(dataset)
    }

    pub fn load_from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::load_from_json_str(&content)
    }

    /// Every creature's primary type must exist in the roster. Secondary
    /// types and chart rows may reference unknown ids; those stay neutral.
    fn validate(&self) -> Result<()> {
        let roster = self.roster();
        for creature in &self.creatures {
            if roster.by_id(creature.type1).is_none() {
                return Err(DataError::UnknownType(format!(
                    "{} on {}",
                    creature.type1, creature.name
                )));
            }
        }
        Ok(())
    }

    pub fn roster(&self) -> TypeRoster {
        TypeRoster::new(self.types.clone())
    }

    pub fn type_chart(&self) -> TypeChart {
        TypeChart::from_rows(&self.chart)
    }

    pub fn box_entries(&self) -> Vec<BoxEntry> {
        self.creatures.iter().map(BoxEntry::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_types_fall_back_to_standard() {
        let json = json!({
            "creatures": [
                {
                    "name": "Pikachu",
                    "baseStats": {"hp": 35, "atk": 55, "def": 40, "spa": 50, "spd": 50, "spe": 90},
                    "type1": 4
                }
            ]
        });
        let dataset = Dataset::load_from_json_str(&json.to_string()).expect("load");
        assert_eq!(dataset.types.len(), 18);
        assert!(!dataset.chart.is_empty());
        assert_eq!(dataset.box_entries()[0].name, "Pikachu");
    }

    #[test]
    fn unknown_primary_type_is_rejected() {
        let json = json!({
            "types": [{"id": 1, "name": "Fire"}],
            "creatures": [
                {
                    "name": "Missingno",
                    "baseStats": {"hp": 33, "atk": 136, "def": 0, "spa": 6, "spd": 6, "spe": 29},
                    "type1": 99
                }
            ]
        });
        let err = Dataset::load_from_json_str(&json.to_string()).expect_err("unknown type");
        assert!(matches!(err, DataError::UnknownType(_)));
    }
}
