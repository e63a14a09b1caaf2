use serde::{Deserialize, Serialize};

use crate::snapshot::LeagueSnapshot;
use crate::standings::{outcome_points, WIN_POINTS};

/// Finished matches counted into the recent-form window.
pub const FORM_WINDOW: usize = 5;

// Bounded-inverse offset for the defense score; keeps the division defined
// for a team that has conceded nothing.
const DEFENSE_OFFSET: f64 = 0.1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMetrics {
    pub team_id: u32,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub avg_goals_for: f64,
    pub avg_goals_against: f64,
    /// Average goals scored per finished match.
    pub attack: f64,
    /// 1 / (average goals conceded + 0.1).
    pub defense: f64,
    pub recent_points: u32,
    /// Points from the last `FORM_WINDOW` finished matches over the maximum
    /// possible, so always within [0, 1].
    pub form: f64,
}

/// Aggregate one team's finished matches. An unknown team id (or a team with
/// no finished matches) yields a zero-matches record, never an error; callers
/// that need strict validation check `LeagueSnapshot::contains_team` first.
pub fn compute_team_metrics(snapshot: &LeagueSnapshot, team_id: u32) -> TeamMetrics {
    let mut played = 0u32;
    let mut wins = 0u32;
    let mut draws = 0u32;
    let mut losses = 0u32;
    let mut goals_for = 0u32;
    let mut goals_against = 0u32;
    let mut recent_points = 0u32;
    let mut recent_counted = 0usize;

    // The index is already most-recent-first, so the first FORM_WINDOW
    // finished entries are exactly the form window.
    for m in snapshot.team_fixtures(team_id) {
        let Some((gf, ga)) = m.result_for(team_id) else {
            continue;
        };
        played += 1;
        goals_for += gf as u32;
        goals_against += ga as u32;
        if gf > ga {
            wins += 1;
        } else if gf == ga {
            draws += 1;
        } else {
            losses += 1;
        }
        if recent_counted < FORM_WINDOW {
            recent_points += outcome_points(gf, ga);
            recent_counted += 1;
        }
    }

    let (avg_goals_for, avg_goals_against) = if played > 0 {
        (
            goals_for as f64 / played as f64,
            goals_against as f64 / played as f64,
        )
    } else {
        (0.0, 0.0)
    };

    let max_recent = (WIN_POINTS as usize * FORM_WINDOW) as f64;

    TeamMetrics {
        team_id,
        played,
        wins,
        draws,
        losses,
        goals_for,
        goals_against,
        avg_goals_for,
        avg_goals_against,
        attack: avg_goals_for,
        defense: 1.0 / (avg_goals_against + DEFENSE_OFFSET),
        recent_points,
        form: recent_points as f64 / max_recent,
    }
}
