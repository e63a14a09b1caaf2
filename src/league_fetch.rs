use std::collections::HashSet;
use std::env;

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde_json::Value;

use crate::http_cache::{fetch_json_cached, fetch_json_cached_revalidate};
use crate::http_client::http_client;
use crate::snapshot::{Fixture, Team};

const LEAGUE_URL: &str = "https://www.fotmob.com/api/leagues?id=";
const TEAM_URL: &str = "https://www.fotmob.com/api/teams?id=";

pub struct LeaguePayload {
    pub league_id: u32,
    pub league_name: String,
    pub teams: Vec<Team>,
    pub fixtures: Vec<Fixture>,
    pub errors: Vec<String>,
}

/// Fetch one league's team list and season match list. With `revalidate`
/// the TTL on the raw-body cache is bypassed (force refresh).
pub fn fetch_league(league_id: u32, revalidate: bool) -> Result<LeaguePayload> {
    let client = http_client()?;
    let url = format!("{LEAGUE_URL}{league_id}");
    let body = if revalidate {
        fetch_json_cached_revalidate(client, &url, &[]).context("league request failed")?
    } else {
        fetch_json_cached(client, &url, &[]).context("league request failed")?
    };

    let mut payload = parse_league_payload(league_id, &body)?;
    if payload.teams.is_empty() {
        // Some league payloads ship matches without a team block; recover
        // display names from the per-team endpoints instead.
        let recovered = recover_team_names(&payload.fixtures, &mut payload.errors);
        payload.teams = recovered;
    }
    Ok(payload)
}

pub fn parse_league_payload(league_id: u32, raw: &str) -> Result<LeaguePayload> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(anyhow::anyhow!("empty league response"));
    }
    let v: Value = serde_json::from_str(trimmed).context("invalid league json")?;

    let league_name = v
        .get("details")
        .and_then(|d| d.get("name"))
        .and_then(|x| x.as_str())
        .unwrap_or("Unknown league")
        .to_string();

    let mut fixtures = Vec::new();
    if let Some(arr) = v
        .get("matches")
        .and_then(|m| m.get("allMatches"))
        .and_then(|x| x.as_array())
    {
        for item in arr {
            if let Some(m) = parse_league_fixture(item) {
                fixtures.push(m);
            }
        }
    }
    let mut seen = HashSet::new();
    fixtures.retain(|m| seen.insert(m.id));

    Ok(LeaguePayload {
        league_id,
        league_name,
        teams: parse_league_teams(&v),
        fixtures,
        errors: Vec::new(),
    })
}

fn parse_league_teams(v: &Value) -> Vec<Team> {
    // The team block has moved around between payload revisions; try each
    // known location until one yields rows.
    let candidates = [
        v.get("overview")
            .and_then(|o| o.get("matches"))
            .and_then(|m| m.get("fixtureInfo"))
            .and_then(|f| f.get("teams")),
        v.get("stats").and_then(|s| s.get("teams")),
        v.get("fixtures")
            .and_then(|f| f.get("fixtureInfo"))
            .and_then(|f| f.get("teams")),
    ];

    let mut teams = Vec::new();
    for found in candidates.into_iter().flatten() {
        let Some(arr) = found.as_array() else {
            continue;
        };
        for item in arr {
            let Some(id) = item.get("id").and_then(|x| x.as_u64()) else {
                continue;
            };
            let Some(name) = item.get("name").and_then(|x| x.as_str()) else {
                continue;
            };
            teams.push(Team {
                id: id as u32,
                name: name.to_string(),
            });
        }
        if !teams.is_empty() {
            break;
        }
    }

    let mut seen = HashSet::new();
    teams.retain(|team| seen.insert(team.id));
    teams
}

fn parse_league_fixture(v: &Value) -> Option<Fixture> {
    let id = v.get("id")?.as_u64()? as u32;

    let home = v.get("home")?;
    let away = v.get("away")?;
    let home_id = home.get("id")?.as_u64()? as u32;
    let away_id = away.get("id")?.as_u64()? as u32;
    // A missing or null score means the match has not finished; that is a
    // data state, not a parse failure.
    let home_goals = home.get("score").and_then(|x| x.as_u64()).map(|g| g as u8);
    let away_goals = away.get("score").and_then(|x| x.as_u64()).map(|g| g as u8);

    let status = v.get("status")?;
    let kickoff_utc = status
        .get("utcTime")
        .and_then(|x| x.as_str())
        .unwrap_or_default()
        .to_string();
    let finished = status
        .get("finished")
        .and_then(|x| x.as_bool())
        .unwrap_or(false);
    let started = status
        .get("started")
        .and_then(|x| x.as_bool())
        .unwrap_or(false);
    let cancelled = status
        .get("cancelled")
        .and_then(|x| x.as_bool())
        .unwrap_or(false);
    let status = if cancelled {
        "cancelled"
    } else if finished {
        "finished"
    } else if started {
        "live"
    } else {
        "scheduled"
    };

    Some(Fixture {
        id,
        home_id,
        away_id,
        kickoff_utc,
        status: status.to_string(),
        home_goals,
        away_goals,
    })
}

fn recover_team_names(fixtures: &[Fixture], errors: &mut Vec<String>) -> Vec<Team> {
    let mut ids: Vec<u32> = Vec::new();
    let mut seen = HashSet::new();
    for m in fixtures {
        if seen.insert(m.home_id) {
            ids.push(m.home_id);
        }
        if seen.insert(m.away_id) {
            ids.push(m.away_id);
        }
    }

    let results: Vec<Result<Team>> =
        with_fetch_pool(|| ids.par_iter().map(|&id| fetch_team_name(id)).collect());

    let mut teams = Vec::new();
    for result in results {
        match result {
            Ok(team) => teams.push(team),
            Err(err) => errors.push(format!("team name fetch failed: {err}")),
        }
    }
    teams
}

fn fetch_team_name(team_id: u32) -> Result<Team> {
    let client = http_client()?;
    let url = format!("{TEAM_URL}{team_id}");
    let body = fetch_json_cached(client, &url, &[]).context("team request failed")?;
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(anyhow::anyhow!("empty team response"));
    }
    let v: Value = serde_json::from_str(trimmed).context("invalid team json")?;
    let name = v
        .get("details")
        .and_then(|d| d.get("name"))
        .and_then(|x| x.as_str())
        .ok_or_else(|| anyhow::anyhow!("team {team_id} has no name"))?;
    Ok(Team {
        id: team_id,
        name: name.to_string(),
    })
}

fn with_fetch_pool<T: Send>(action: impl FnOnce() -> T + Send) -> T {
    match rayon::ThreadPoolBuilder::new()
        .num_threads(fetch_parallelism())
        .build()
    {
        Ok(pool) => pool.install(action),
        Err(_) => action(),
    }
}

fn fetch_parallelism() -> usize {
    env::var("FETCH_PARALLELISM")
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(6)
        .clamp(2, 32)
}
