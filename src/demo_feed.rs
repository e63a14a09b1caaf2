use chrono::{Duration as ChronoDuration, NaiveDate};
use rand::Rng;

use crate::snapshot::{Fixture, Team};

pub const DEMO_LEAGUE_ID: u32 = 9000;

const DEMO_TEAM_NAMES: &[&str] = &[
    "Alba Rovers",
    "Blackwater United",
    "Caldera FC",
    "Dunmore Athletic",
    "Eastgate Town",
    "Fenwick City",
    "Greyharbour FC",
    "Hollowbrook Wanderers",
    "Ironvale FC",
    "Juniper Park",
    "Kestrel Heath",
    "Lowfield Albion",
];

// Rounds already played when the demo season is generated.
const PLAYED_ROUNDS: usize = 15;

/// Generate an offline league: a double round-robin with randomized scores
/// for the played part of the season. Selected with FEED_SOURCE=demo.
pub fn demo_league() -> (String, Vec<Team>, Vec<Fixture>) {
    let teams: Vec<Team> = DEMO_TEAM_NAMES
        .iter()
        .enumerate()
        .map(|(idx, name)| Team {
            id: DEMO_LEAGUE_ID + 1 + idx as u32,
            name: (*name).to_string(),
        })
        .collect();

    let mut rng = rand::thread_rng();
    let season_start = NaiveDate::from_ymd_opt(2025, 8, 9).expect("valid demo season start");
    let rounds = round_robin_rounds(teams.len());

    let mut fixtures = Vec::new();
    let mut match_id = 1u32;
    for (round_idx, round) in rounds.iter().enumerate() {
        let kickoff_date = season_start + ChronoDuration::weeks(round_idx as i64);
        let kickoff = format!("{}T14:00:00Z", kickoff_date.format("%Y-%m-%d"));
        let played = round_idx < PLAYED_ROUNDS;
        for &(home_idx, away_idx) in round {
            let (home_goals, away_goals) = if played {
                (Some(demo_goals(&mut rng)), Some(demo_goals(&mut rng)))
            } else {
                (None, None)
            };
            fixtures.push(Fixture {
                id: match_id,
                home_id: teams[home_idx].id,
                away_id: teams[away_idx].id,
                kickoff_utc: kickoff.clone(),
                status: if played { "finished" } else { "scheduled" }.to_string(),
                home_goals,
                away_goals,
            });
            match_id += 1;
        }
    }

    ("Demo League".to_string(), teams, fixtures)
}

/// Circle-method schedule: n-1 rounds, then the same rounds with sides
/// swapped for the return half of the season. `n` must be even.
fn round_robin_rounds(n: usize) -> Vec<Vec<(usize, usize)>> {
    let mut rounds = Vec::new();
    let mut ring: Vec<usize> = (1..n).collect();

    for round_idx in 0..n - 1 {
        let mut round = Vec::new();
        let pair = |a: usize, b: usize| {
            // Alternate sides per round so home counts stay balanced.
            if round_idx % 2 == 0 { (a, b) } else { (b, a) }
        };
        round.push(pair(0, ring[n - 2]));
        for k in 0..(n / 2 - 1) {
            round.push(pair(ring[k], ring[n - 3 - k]));
        }
        rounds.push(round);
        ring.rotate_right(1);
    }

    let second_half: Vec<Vec<(usize, usize)>> = rounds
        .iter()
        .map(|round| round.iter().map(|&(h, a)| (a, h)).collect())
        .collect();
    rounds.extend(second_half);
    rounds
}

fn demo_goals(rng: &mut impl Rng) -> u8 {
    // Skewed toward low scores, roughly like a real season.
    let roll = rng.gen_range(0..100);
    if roll < 28 {
        0
    } else if roll < 62 {
        1
    } else if roll < 85 {
        2
    } else if roll < 95 {
        3
    } else {
        4
    }
}
