use std::env;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread;

use anyhow::Result;

use crate::demo_feed;
use crate::league_fetch;
use crate::persist;
use crate::snapshot::LeagueSnapshot;
use crate::state::{Delta, FeedCommand};

/// Background provider: owns cache and network, publishes freshly built
/// snapshots to the UI thread. The UI only ever swaps the `Arc` it is handed;
/// nothing mutates a snapshot in place.
pub fn spawn_feed(tx: Sender<Delta>, cmd_rx: Receiver<FeedCommand>, initial_league: u32) {
    thread::spawn(move || {
        let mut league_id = initial_league;
        publish(&tx, league_id, false);

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                FeedCommand::Refresh { force } => publish(&tx, league_id, force),
                FeedCommand::SwitchLeague(id) => {
                    league_id = id;
                    publish(&tx, league_id, false);
                }
            }
        }
    });
}

fn publish(tx: &Sender<Delta>, league_id: u32, force: bool) {
    match load_or_fetch_snapshot(league_id, force) {
        Ok((snapshot, notes)) => {
            for note in notes {
                let _ = tx.send(Delta::Log(note));
            }
            let _ = tx.send(Delta::Snapshot(Arc::new(snapshot)));
        }
        Err(err) => {
            let _ = tx.send(Delta::Log(format!("[WARN] league refresh failed: {err}")));
        }
    }
}

/// Resolve a snapshot for the league: demo feed, fresh disk cache, network,
/// or (when the network fails) the stale disk copy.
pub fn load_or_fetch_snapshot(
    league_id: u32,
    force: bool,
) -> Result<(LeagueSnapshot, Vec<String>)> {
    if feed_source() == "demo" {
        let (name, teams, fixtures) = demo_feed::demo_league();
        let snapshot = LeagueSnapshot::build(demo_feed::DEMO_LEAGUE_ID, teams, fixtures);
        return Ok((snapshot, vec![format!("[INFO] {name} generated (offline demo)")]));
    }

    if !force {
        if let Some(stored) = persist::load_league(league_id) {
            if !persist::is_stale(stored.fetched_at) {
                let snapshot = LeagueSnapshot::build(league_id, stored.teams, stored.fixtures);
                let note = format!("[INFO] {} loaded from cache", stored.league_name);
                return Ok((snapshot, vec![note]));
            }
        }
    }

    match league_fetch::fetch_league(league_id, force) {
        Ok(payload) => {
            let mut notes: Vec<String> = payload
                .errors
                .iter()
                .map(|e| format!("[WARN] {e}"))
                .collect();
            if let Err(err) = persist::save_league(
                league_id,
                &payload.league_name,
                &payload.teams,
                &payload.fixtures,
            ) {
                notes.push(format!("[WARN] league cache write failed: {err}"));
            }
            notes.push(format!(
                "[INFO] {} refreshed ({} teams, {} fixtures)",
                payload.league_name,
                payload.teams.len(),
                payload.fixtures.len()
            ));
            let snapshot = LeagueSnapshot::build(league_id, payload.teams, payload.fixtures);
            Ok((snapshot, notes))
        }
        Err(err) => {
            // Stale data beats no data when the provider is unreachable.
            if let Some(stored) = persist::load_league(league_id) {
                let snapshot = LeagueSnapshot::build(league_id, stored.teams, stored.fixtures);
                let note = format!(
                    "[WARN] refresh failed ({err}); showing cached {}",
                    stored.league_name
                );
                return Ok((snapshot, vec![note]));
            }
            Err(err)
        }
    }
}

fn feed_source() -> String {
    env::var("FEED_SOURCE")
        .unwrap_or_else(|_| "fotmob".to_string())
        .to_lowercase()
}
