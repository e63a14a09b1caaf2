use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::snapshot::LeagueSnapshot;

pub const WIN_POINTS: u32 = 3;
pub const DRAW_POINTS: u32 = 1;

pub fn outcome_points(goals_for: u8, goals_against: u8) -> u32 {
    if goals_for > goals_against {
        WIN_POINTS
    } else if goals_for == goals_against {
        DRAW_POINTS
    } else {
        0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandingsRow {
    pub team_id: u32,
    pub name: String,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_diff: i32,
    pub points: u32,
}

impl StandingsRow {
    fn blank(team_id: u32, name: String) -> Self {
        Self {
            team_id,
            name,
            played: 0,
            won: 0,
            drawn: 0,
            lost: 0,
            goals_for: 0,
            goals_against: 0,
            goal_diff: 0,
            points: 0,
        }
    }

    fn apply_result(&mut self, goals_for: u8, goals_against: u8) {
        self.played += 1;
        self.goals_for += goals_for as u32;
        self.goals_against += goals_against as u32;
        self.goal_diff = self.goals_for as i32 - self.goals_against as i32;
        self.points += outcome_points(goals_for, goals_against);
        if goals_for > goals_against {
            self.won += 1;
        } else if goals_for == goals_against {
            self.drawn += 1;
        } else {
            self.lost += 1;
        }
    }
}

/// Fold every finished match into a ranked league table. One row per known
/// team, zero-filled for teams without a finished match yet. Recomputed in
/// full on every call; there is no incremental update path.
pub fn compute_standings(snapshot: &LeagueSnapshot) -> Vec<StandingsRow> {
    let mut rows: HashMap<u32, StandingsRow> = snapshot
        .list_teams()
        .iter()
        .map(|t| (t.id, StandingsRow::blank(t.id, t.name.clone())))
        .collect();

    for m in snapshot.fixtures() {
        let (Some(home_goals), Some(away_goals)) = (m.home_goals, m.away_goals) else {
            continue;
        };
        // Both participants must be known, which keeps the table's total
        // goals-for equal to its total goals-against.
        if !rows.contains_key(&m.home_id) || !rows.contains_key(&m.away_id) {
            continue;
        }
        if let Some(row) = rows.get_mut(&m.home_id) {
            row.apply_result(home_goals, away_goals);
        }
        if let Some(row) = rows.get_mut(&m.away_id) {
            row.apply_result(away_goals, home_goals);
        }
    }

    let mut table: Vec<StandingsRow> = snapshot
        .list_teams()
        .iter()
        .filter_map(|t| rows.remove(&t.id))
        .collect();

    // Stable sort: ties beyond (points, goal diff, goals for) keep the
    // team-list order. No name tie-break.
    table.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.goal_diff.cmp(&a.goal_diff))
            .then(b.goals_for.cmp(&a.goals_for))
    });
    table
}
