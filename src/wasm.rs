use crate::config::ScoringConfig;
use crate::core::potential::{compute_potentials, PotentialInput};
use crate::core::rank::{rank_box, BoxEntry};
use crate::core::team::{compute_defense_matrix, compute_team_chart, TeamMember};
use crate::data::species::BaseStats;
use crate::data::types::{TypeChart, TypeChartRow, TypeId, TypeInfo, TypeRoster};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

static STANDARD_CHART: Lazy<StandardChartWire> = Lazy::new(|| StandardChartWire {
    types: TypeRoster::standard().all().to_vec(),
    chart: TypeChart::standard().rows(),
});

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StandardChartWire {
    types: Vec<TypeInfo>,
    chart: Vec<TypeChartRow>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PotentialRequestWire {
    stats: BaseStats,
    #[serde(default)]
    tags: Vec<String>,
    type1: TypeId,
    #[serde(default)]
    type2: Option<TypeId>,
    all_types: Vec<TypeInfo>,
    #[serde(default)]
    chart: Vec<TypeChartRow>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TeamRequestWire<M> {
    members: Vec<M>,
    all_types: Vec<TypeInfo>,
    #[serde(default)]
    chart: Vec<TypeChartRow>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BoxRequestWire {
    entries: Vec<BoxEntry>,
    all_types: Vec<TypeInfo>,
    #[serde(default)]
    chart: Vec<TypeChartRow>,
}

fn js_err(message: impl ToString) -> JsValue {
    JsValue::from_str(&message.to_string())
}

fn config_from(config: JsValue) -> Result<ScoringConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        Ok(ScoringConfig::default())
    } else {
        serde_wasm_bindgen::from_value(config).map_err(js_err)
    }
}

#[wasm_bindgen(js_name = computePotentials)]
pub fn compute_potentials_wasm(request: JsValue, config: JsValue) -> Result<JsValue, JsValue> {
    let request: PotentialRequestWire = serde_wasm_bindgen::from_value(request).map_err(js_err)?;
    let config = config_from(config)?;
    let chart = TypeChart::from_rows(&request.chart);
    let potentials = compute_potentials(
        &PotentialInput {
            stats: request.stats,
            tags: &request.tags,
            type1: request.type1,
            type2: request.type2,
            all_types: &request.all_types,
            chart: &chart,
        },
        &config,
    );
    serde_wasm_bindgen::to_value(&potentials).map_err(js_err)
}

#[wasm_bindgen(js_name = computeDefenseMatrix)]
pub fn compute_defense_matrix_wasm(request: JsValue) -> Result<JsValue, JsValue> {
    let request: TeamRequestWire<Option<TeamMember>> =
        serde_wasm_bindgen::from_value(request).map_err(js_err)?;
    let chart = TypeChart::from_rows(&request.chart);
    let rows = compute_defense_matrix(&request.members, &request.all_types, &chart);
    serde_wasm_bindgen::to_value(&rows).map_err(js_err)
}

#[wasm_bindgen(js_name = computeTeamChart)]
pub fn compute_team_chart_wasm(request: JsValue) -> Result<JsValue, JsValue> {
    let request: TeamRequestWire<TeamMember> =
        serde_wasm_bindgen::from_value(request).map_err(js_err)?;
    let chart = TypeChart::from_rows(&request.chart);
    let rows = compute_team_chart(&request.members, &request.all_types, &chart);
    serde_wasm_bindgen::to_value(&rows).map_err(js_err)
}

#[wasm_bindgen(js_name = rankBox)]
pub fn rank_box_wasm(request: JsValue, config: JsValue) -> Result<JsValue, JsValue> {
    let request: BoxRequestWire = serde_wasm_bindgen::from_value(request).map_err(js_err)?;
    let config = config_from(config)?;
    let chart = TypeChart::from_rows(&request.chart);
    let report = rank_box(&request.entries, &request.all_types, &chart, &config);
    serde_wasm_bindgen::to_value(&report).map_err(js_err)
}

#[wasm_bindgen(js_name = standardTypeChart)]
pub fn standard_type_chart_wasm() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&*STANDARD_CHART).map_err(js_err)
}
