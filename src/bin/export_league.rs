use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use formguide::export;
use formguide::feed;

const DEFAULT_LEAGUE_ID: u32 = 47;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let league_id = parse_league_id_arg().unwrap_or_else(default_league_id_from_env);
    let out_path = parse_out_path_arg()
        .unwrap_or_else(|| PathBuf::from(format!("league_{league_id}.xlsx")));
    let force = env::var("FORCE_REFRESH")
        .map(|val| val == "1" || val.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let (snapshot, notes) =
        feed::load_or_fetch_snapshot(league_id, force).context("unable to resolve league data")?;
    for note in &notes {
        println!("{note}");
    }

    let report = export::export_league_workbook(&out_path, &snapshot)?;
    let csv_path = out_path.with_extension("csv");
    let csv_rows = export::export_standings_csv(&csv_path, &snapshot)?;

    println!("League export complete");
    println!("Workbook: {}", out_path.display());
    println!("CSV: {}", csv_path.display());
    println!("Teams: {}", report.teams);
    println!("Fixtures: {}", report.fixtures);
    println!("Standings rows: {} ({} in csv)", report.standings_rows, csv_rows);
    Ok(())
}

fn parse_league_id_arg() -> Option<u32> {
    env::args().nth(1).and_then(|arg| arg.parse::<u32>().ok())
}

fn parse_out_path_arg() -> Option<PathBuf> {
    env::args().nth(2).map(PathBuf::from)
}

fn default_league_id_from_env() -> u32 {
    env::var("LEAGUE_ID")
        .ok()
        .and_then(|val| val.parse::<u32>().ok())
        .unwrap_or(DEFAULT_LEAGUE_ID)
}
