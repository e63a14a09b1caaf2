use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::http_cache::app_cache_dir;
use crate::snapshot::{Fixture, Team};

const CACHE_FILE: &str = "league_cache.json";
const CACHE_VERSION: u32 = 1;
const DEFAULT_TTL_HOURS: u64 = 24;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct CacheFile {
    version: u32,
    leagues: HashMap<String, LeagueEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LeagueEntry {
    league_name: String,
    teams: Vec<Team>,
    fixtures: Vec<Fixture>,
    fetched_at: u64,
}

pub struct StoredLeague {
    pub league_name: String,
    pub teams: Vec<Team>,
    pub fixtures: Vec<Fixture>,
    pub fetched_at: SystemTime,
}

pub fn load_league(league_id: u32) -> Option<StoredLeague> {
    let path = cache_path()?;
    let raw = fs::read_to_string(path).ok()?;
    let cache = serde_json::from_str::<CacheFile>(&raw).ok()?;
    if cache.version != CACHE_VERSION {
        return None;
    }
    let entry = cache.leagues.get(&league_key(league_id))?;
    Some(StoredLeague {
        league_name: entry.league_name.clone(),
        teams: entry.teams.clone(),
        fixtures: entry.fixtures.clone(),
        fetched_at: system_time_from_secs(entry.fetched_at)?,
    })
}

pub fn save_league(
    league_id: u32,
    league_name: &str,
    teams: &[Team],
    fixtures: &[Fixture],
) -> Result<()> {
    let Some(path) = cache_path() else {
        return Ok(());
    };
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }

    let mut cache = fs::read_to_string(&path)
        .ok()
        .and_then(|raw| serde_json::from_str::<CacheFile>(&raw).ok())
        .filter(|cache| cache.version == CACHE_VERSION)
        .unwrap_or_default();
    cache.version = CACHE_VERSION;

    cache.leagues.insert(
        league_key(league_id),
        LeagueEntry {
            league_name: league_name.to_string(),
            teams: teams.to_vec(),
            fixtures: fixtures.to_vec(),
            fetched_at: system_time_to_secs(SystemTime::now()).unwrap_or_default(),
        },
    );

    let json = serde_json::to_string(&cache).context("serialize league cache")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).context("write league cache")?;
    fs::rename(&tmp, &path).context("swap league cache")?;
    Ok(())
}

pub fn is_stale(fetched_at: SystemTime) -> bool {
    match fetched_at.elapsed() {
        Ok(age) => age >= snapshot_ttl(),
        // A clock that moved backwards reads as fresh; the next refresh
        // rewrites the stamp.
        Err(_) => false,
    }
}

pub fn snapshot_ttl() -> Duration {
    let hours = env::var("SNAPSHOT_TTL_HOURS")
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(DEFAULT_TTL_HOURS)
        .clamp(1, 24 * 7);
    Duration::from_secs(hours * 3600)
}

fn league_key(league_id: u32) -> String {
    league_id.to_string()
}

fn cache_path() -> Option<PathBuf> {
    app_cache_dir().map(|dir| dir.join(CACHE_FILE))
}

fn system_time_to_secs(time: SystemTime) -> Option<u64> {
    time.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs())
}

fn system_time_from_secs(secs: u64) -> Option<SystemTime> {
    UNIX_EPOCH.checked_add(Duration::from_secs(secs))
}
