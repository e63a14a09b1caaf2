use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::snapshot::LeagueSnapshot;
use crate::standings::compute_standings;
use crate::team_metrics::compute_team_metrics;

pub struct ExportReport {
    pub teams: usize,
    pub fixtures: usize,
    pub standings_rows: usize,
}

/// Write the full league workbook: standings, per-team metrics and the raw
/// fixture list, one sheet each.
pub fn export_league_workbook(path: &Path, snapshot: &LeagueSnapshot) -> Result<ExportReport> {
    let standings_rows = standings_sheet_rows(snapshot);
    let metrics_rows = metrics_sheet_rows(snapshot);
    let fixtures_rows = fixtures_sheet_rows(snapshot);

    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Standings").context("name standings sheet")?;
    write_rows(sheet, &standings_rows)?;

    let sheet = workbook.add_worksheet();
    sheet.set_name("Team Metrics").context("name metrics sheet")?;
    write_rows(sheet, &metrics_rows)?;

    let sheet = workbook.add_worksheet();
    sheet.set_name("Fixtures").context("name fixtures sheet")?;
    write_rows(sheet, &fixtures_rows)?;

    workbook.save(path).context("save workbook")?;

    Ok(ExportReport {
        teams: snapshot.list_teams().len(),
        fixtures: snapshot.fixtures().len(),
        standings_rows: standings_rows.len().saturating_sub(1),
    })
}

/// Plain-text fallback for the standings table.
pub fn export_standings_csv(path: &Path, snapshot: &LeagueSnapshot) -> Result<usize> {
    let rows = standings_sheet_rows(snapshot);
    let mut out = String::new();
    for row in &rows {
        let line: Vec<String> = row.iter().map(|cell| csv_field(cell)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    fs::write(path, out).with_context(|| format!("write {}", path.display()))?;
    Ok(rows.len().saturating_sub(1))
}

fn standings_sheet_rows(snapshot: &LeagueSnapshot) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Pos".to_string(),
        "Team".to_string(),
        "Played".to_string(),
        "Won".to_string(),
        "Drawn".to_string(),
        "Lost".to_string(),
        "GF".to_string(),
        "GA".to_string(),
        "GD".to_string(),
        "Points".to_string(),
    ]];
    for (idx, row) in compute_standings(snapshot).iter().enumerate() {
        rows.push(vec![
            (idx + 1).to_string(),
            row.name.clone(),
            row.played.to_string(),
            row.won.to_string(),
            row.drawn.to_string(),
            row.lost.to_string(),
            row.goals_for.to_string(),
            row.goals_against.to_string(),
            row.goal_diff.to_string(),
            row.points.to_string(),
        ]);
    }
    rows
}

fn metrics_sheet_rows(snapshot: &LeagueSnapshot) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Team ID".to_string(),
        "Team".to_string(),
        "Played".to_string(),
        "GF".to_string(),
        "GA".to_string(),
        "Avg GF".to_string(),
        "Avg GA".to_string(),
        "Attack".to_string(),
        "Defense".to_string(),
        "Recent Pts".to_string(),
        "Form".to_string(),
    ]];
    for team in snapshot.list_teams() {
        let m = compute_team_metrics(snapshot, team.id);
        rows.push(vec![
            team.id.to_string(),
            team.name.clone(),
            m.played.to_string(),
            m.goals_for.to_string(),
            m.goals_against.to_string(),
            format!("{:.2}", m.avg_goals_for),
            format!("{:.2}", m.avg_goals_against),
            format!("{:.2}", m.attack),
            format!("{:.2}", m.defense),
            m.recent_points.to_string(),
            format!("{:.2}", m.form),
        ]);
    }
    rows
}

fn fixtures_sheet_rows(snapshot: &LeagueSnapshot) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Match ID".to_string(),
        "Kickoff (UTC)".to_string(),
        "Status".to_string(),
        "Home".to_string(),
        "Away".to_string(),
        "Score".to_string(),
    ]];
    for m in snapshot.fixtures() {
        let score = match (m.home_goals, m.away_goals) {
            (Some(h), Some(a)) => format!("{h}-{a}"),
            _ => "-".to_string(),
        };
        rows.push(vec![
            m.id.to_string(),
            m.kickoff_utc.clone(),
            m.status.clone(),
            team_label(snapshot, m.home_id),
            team_label(snapshot, m.away_id),
            score,
        ]);
    }
    rows
}

fn team_label(snapshot: &LeagueSnapshot, team_id: u32) -> String {
    snapshot
        .team_name(team_id)
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("#{team_id}"))
}

fn csv_field(raw: &str) -> String {
    if raw.contains(',') || raw.contains('"') || raw.contains('\n') {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
