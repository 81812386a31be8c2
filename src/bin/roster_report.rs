use inquire::list_option::ListOption;
use inquire::MultiSelect;
use roster_engine::core::rank::{rank_box, BoxReport};
use roster_engine::core::team::{
    compute_defense_matrix, compute_team_chart, DefenseMatrixRow, TeamMember, TEAM_SIZE,
};
use roster_engine::data::dataset::Dataset;
use roster_engine::data::types::{TypeChart, TypeInfo};
use roster_engine::ScoringConfig;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let data_path = env::args()
        .nth(1)
        .or_else(|| env::var("ROSTER_DATA").ok())
        .map(PathBuf::from);
    let Some(data_path) = data_path else {
        eprintln!("usage: roster-report <dataset.json>  (or set ROSTER_DATA)");
        return ExitCode::FAILURE;
    };

    let dataset = match Dataset::load_from_json_file(&data_path) {
        Ok(dataset) => dataset,
        Err(err) => {
            eprintln!("failed to load {}: {err}", data_path.display());
            return ExitCode::FAILURE;
        }
    };

    let config = match env::var("ROSTER_CONFIG") {
        Ok(path) => match ScoringConfig::load_from_yaml_file(&PathBuf::from(&path)) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("failed to load config {path}: {err}");
                return ExitCode::FAILURE;
            }
        },
        Err(_) => ScoringConfig::default(),
    };
    tracing::info!(?config, creatures = dataset.creatures.len(), "dataset loaded");

    let all_types = dataset.roster().chart_types();
    let chart = dataset.type_chart();

    let report = rank_box(&dataset.box_entries(), &all_types, &chart, &config);
    print_box(&report);

    let team = select_team(&dataset);
    if team.is_empty() {
        return ExitCode::SUCCESS;
    }
    print_team(&team, &all_types, &chart);
    ExitCode::SUCCESS
}

fn print_box(report: &BoxReport) {
    println!("Box ranking");
    println!(
        "{:<4} {:<18} {:>9} {:>9} {:>9} {:>6}",
        "#", "name", "offense", "defense", "rank", "crit"
    );
    for (pos, entry) in report.entries.iter().enumerate() {
        let p = &entry.potentials;
        let marker = if entry.avoid { " (avoid)" } else { "" };
        println!(
            "{:<4} {:<18} {:>9.2} {:>9.2} {:>9.2} {:>6.3}{}",
            pos + 1,
            entry.name,
            p.offense,
            p.defense,
            p.box_rank,
            p.crit.expected_mult,
            marker
        );
    }
    for warning in &report.warnings {
        println!("warning: {}", warning.message);
    }
    println!();
}

fn select_team(dataset: &Dataset) -> Vec<TeamMember> {
    let names: Vec<String> = dataset.creatures.iter().map(|c| c.name.clone()).collect();
    if names.is_empty() {
        return Vec::new();
    }
    let validator = |s: &[ListOption<&String>]| {
        if s.len() > TEAM_SIZE {
            Ok(inquire::validator::Validation::Invalid(
                format!("pick at most {TEAM_SIZE}").into(),
            ))
        } else {
            Ok(inquire::validator::Validation::Valid)
        }
    };
    let answer = MultiSelect::new("Team members (space to toggle, enter to confirm):", names)
        .with_page_size(12)
        .with_validator(validator)
        .raw_prompt();

    match answer {
        Ok(selected) => {
            let indices: Vec<usize> = selected.iter().map(|option| option.index).collect();
            members_at(dataset, &indices)
        }
        Err(_) => {
            println!("team selection skipped");
            Vec::new()
        }
    }
}

// Creatures are picked by position so duplicate names stay distinct.
fn members_at(dataset: &Dataset, indices: &[usize]) -> Vec<TeamMember> {
    indices
        .iter()
        .filter_map(|&idx| dataset.creatures.get(idx))
        .map(TeamMember::from)
        .collect()
}

fn print_team(team: &[TeamMember], all_types: &[TypeInfo], chart: &TypeChart) {
    let mut slots: Vec<Option<TeamMember>> = team.iter().cloned().map(Some).collect();
    slots.resize(TEAM_SIZE.max(team.len()), None);

    println!("Defense matrix");
    let header: Vec<String> = slots
        .iter()
        .map(|slot| {
            let name = slot.as_ref().map(|m| m.name.as_str()).unwrap_or("-");
            format!("{:>8.8}", name)
        })
        .collect();
    println!("{:<10} {} {:>5} {:>5}", "type", header.join(" "), "weak", "res");
    for row in compute_defense_matrix(&slots, all_types, chart) {
        print_matrix_row(&row);
    }
    println!();

    println!("Team chart");
    println!("{:<10} {:>5} {:>5} {:>5}", "type", "weak", "res", "immune");
    for row in compute_team_chart(team, all_types, chart) {
        println!(
            "{:<10} {:>5} {:>5} {:>5}",
            row.attacking_type_name, row.weak, row.resist, row.immune
        );
    }
}

fn print_matrix_row(row: &DefenseMatrixRow) {
    let cells: Vec<String> = row
        .multipliers
        .iter()
        .map(|m| {
            let cell = m.map(format_multiplier).unwrap_or_else(|| "-".to_string());
            format!("{cell:>8}")
        })
        .collect();
    let gap = if row.is_gap() { "  !" } else { "" };
    println!(
        "{:<10} {} {:>5} {:>5}{}",
        row.attacking_type_name,
        cells.join(" "),
        row.total_weak,
        row.total_resist,
        gap
    );
}

fn format_multiplier(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn duplicate_names_resolve_by_position() {
        let json = json!({
            "creatures": [
                {
                    "name": "Eevee",
                    "baseStats": {"hp": 55, "atk": 55, "def": 50, "spa": 45, "spd": 65, "spe": 55},
                    "type1": 1
                },
                {
                    "name": "Eevee",
                    "baseStats": {"hp": 55, "atk": 55, "def": 50, "spa": 45, "spd": 65, "spe": 55},
                    "type1": 2,
                    "tags": ["resist:grass"]
                }
            ]
        });
        let dataset = Dataset::load_from_json_str(&json.to_string()).expect("load");
        let team = members_at(&dataset, &[1]);
        assert_eq!(team.len(), 1);
        assert_eq!(team[0].type1, 2);
        assert_eq!(team[0].tags, vec!["resist:grass"]);
        assert!(members_at(&dataset, &[7]).is_empty());
    }
}
