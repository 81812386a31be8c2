use crate::data::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub type TypeId = u32;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeInfo {
    pub id: TypeId,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    /// Types flagged here are kept in the roster but never scored against.
    #[serde(default)]
    pub exclude_from_chart: bool,
}

impl TypeInfo {
    pub fn new(id: TypeId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            color: None,
            exclude_from_chart: false,
        }
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeChartRow {
    pub attacking_type_id: TypeId,
    pub defending_type_id: TypeId,
    pub multiplier: f64,
}

impl TypeChartRow {
    pub fn new(attacking_type_id: TypeId, defending_type_id: TypeId, multiplier: f64) -> Self {
        Self {
            attacking_type_id,
            defending_type_id,
            multiplier,
        }
    }
}

/// Sparse attacker/defender relation. Any pair not present is neutral.
#[derive(Clone, Debug, Default)]
pub struct TypeChart {
    chart: HashMap<(TypeId, TypeId), f64>,
}

impl TypeChart {
    pub fn new() -> Self {
        Self {
            chart: HashMap::new(),
        }
    }

    pub fn from_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a TypeChartRow>,
    {
        let mut chart = Self::new();
        for row in rows {
            chart.insert(row.attacking_type_id, row.defending_type_id, row.multiplier);
        }
        chart
    }

    /// Later entries for the same pair replace earlier ones. Negative or
    /// non-finite multipliers are dropped so lookups stay in `[0, inf)`.
    pub fn insert(&mut self, attacker: TypeId, defender: TypeId, multiplier: f64) {
        if !multiplier.is_finite() || multiplier < 0.0 {
            tracing::warn!(
                attacker,
                defender,
                multiplier,
                "dropping type chart row with invalid multiplier"
            );
            return;
        }
        self.chart.insert((attacker, defender), multiplier);
    }

    pub fn multiplier(&self, attacker: TypeId, defender: TypeId) -> f64 {
        self.chart.get(&(attacker, defender)).copied().unwrap_or(1.0)
    }

    pub fn len(&self) -> usize {
        self.chart.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chart.is_empty()
    }

    /// Rows ordered by attacker then defender.
    pub fn rows(&self) -> Vec<TypeChartRow> {
        let mut rows: Vec<TypeChartRow> = self
            .chart
            .iter()
            .map(|(&(atk, def), &mult)| TypeChartRow::new(atk, def, mult))
            .collect();
        rows.sort_by_key(|row| (row.attacking_type_id, row.defending_type_id));
        rows
    }

    /// Reads `attacking_type_id,defending_type_id,multiplier` records.
    pub fn load_from_csv_str(csv_text: &str) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
        let mut chart = Self::new();
        for record in reader.deserialize::<CsvChartRecord>() {
            let record = record?;
            chart.insert(record.attacking_type_id, record.defending_type_id, record.multiplier);
        }
        Ok(chart)
    }

    pub fn load_from_csv_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::load_from_csv_str(&content)
    }

    /// The canonical eighteen-type chart, keyed by the ids of
    /// [`TypeRoster::standard`].
    pub fn standard() -> Self {
        let roster = TypeRoster::standard();
        let id_of = |name: &str| roster.by_name(name).map(|t| t.id);
        let mut chart = Self::new();
        let mut add_entry =
            |defender: &str, weak_to: &[&str], resists: &[&str], immune_to: &[&str]| {
                let Some(def_id) = id_of(defender) else {
                    return;
                };
                let groups: [(&[&str], f64); 3] =
                    [(weak_to, 2.0), (resists, 0.5), (immune_to, 0.0)];
                for (attackers, multiplier) in groups {
                    for attacker in attackers {
                        if let Some(atk_id) = id_of(attacker) {
                            chart.insert(atk_id, def_id, multiplier);
                        }
                    }
                }
            };

        add_entry("normal", &["fighting"], &[], &["ghost"]);
        add_entry(
            "fire",
            &["water", "ground", "rock"],
            &["fire", "grass", "ice", "bug", "steel", "fairy"],
            &[],
        );
        add_entry("water", &["electric", "grass"], &["fire", "water", "ice", "steel"], &[]);
        add_entry("electric", &["ground"], &["electric", "flying", "steel"], &[]);
        add_entry(
            "grass",
            &["fire", "ice", "poison", "flying", "bug"],
            &["water", "electric", "grass", "ground"],
            &[],
        );
        add_entry("ice", &["fire", "fighting", "rock", "steel"], &["ice"], &[]);
        add_entry("fighting", &["flying", "psychic", "fairy"], &["bug", "rock", "dark"], &[]);
        add_entry(
            "poison",
            &["ground", "psychic"],
            &["grass", "fighting", "poison", "bug", "fairy"],
            &[],
        );
        add_entry("ground", &["water", "grass", "ice"], &["poison", "rock"], &["electric"]);
        add_entry(
            "flying",
            &["electric", "ice", "rock"],
            &["grass", "fighting", "bug"],
            &["ground"],
        );
        add_entry("psychic", &["bug", "ghost", "dark"], &["fighting", "psychic"], &[]);
        add_entry("bug", &["fire", "flying", "rock"], &["grass", "fighting", "ground"], &[]);
        add_entry(
            "rock",
            &["water", "grass", "fighting", "ground", "steel"],
            &["normal", "fire", "poison", "flying"],
            &[],
        );
        add_entry("ghost", &["ghost", "dark"], &["poison", "bug"], &["normal", "fighting"]);
        add_entry(
            "dragon",
            &["ice", "dragon", "fairy"],
            &["fire", "water", "electric", "grass"],
            &[],
        );
        add_entry("dark", &["fighting", "bug", "fairy"], &["ghost", "dark"], &["psychic"]);
        add_entry(
            "steel",
            &["fire", "fighting", "ground"],
            &[
                "normal", "grass", "ice", "flying", "psychic", "bug", "rock", "dragon", "steel",
                "fairy",
            ],
            &["poison"],
        );
        add_entry("fairy", &["poison", "steel"], &["fighting", "bug", "dark"], &["dragon"]);

        chart
    }
}

#[derive(Debug, Deserialize)]
struct CsvChartRecord {
    attacking_type_id: TypeId,
    defending_type_id: TypeId,
    multiplier: f64,
}

/// Ordered list of the types visible in a game.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRoster {
    types: Vec<TypeInfo>,
}

impl TypeRoster {
    pub fn new(types: Vec<TypeInfo>) -> Self {
        Self { types }
    }

    pub fn all(&self) -> &[TypeInfo] {
        &self.types
    }

    /// The types scoring runs against, in roster order.
    pub fn chart_types(&self) -> Vec<TypeInfo> {
        self.types
            .iter()
            .filter(|t| !t.exclude_from_chart)
            .cloned()
            .collect()
    }

    pub fn by_id(&self, id: TypeId) -> Option<&TypeInfo> {
        self.types.iter().find(|t| t.id == id)
    }

    pub fn by_name(&self, name: &str) -> Option<&TypeInfo> {
        self.types.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    pub fn standard() -> Self {
        const STANDARD: [(&str, &str); 18] = [
            ("Normal", "#A8A77A"),
            ("Fire", "#EE8130"),
            ("Water", "#6390F0"),
            ("Electric", "#F7D02C"),
            ("Grass", "#7AC74C"),
            ("Ice", "#96D9D6"),
            ("Fighting", "#C22E28"),
            ("Poison", "#A33EA1"),
            ("Ground", "#E2BF65"),
            ("Flying", "#A98FF3"),
            ("Psychic", "#F95587"),
            ("Bug", "#A6B91A"),
            ("Rock", "#B6A136"),
            ("Ghost", "#735797"),
            ("Dragon", "#6F35FC"),
            ("Dark", "#705746"),
            ("Steel", "#B7B7CE"),
            ("Fairy", "#D685AD"),
        ];
        let types = STANDARD
            .iter()
            .zip(1..)
            .map(|((name, color), id)| TypeInfo::new(id, name).with_color(color))
            .collect();
        Self::new(types)
    }
}
