use std::env;

use crate::snapshot::LeagueSnapshot;
use crate::team_metrics::{compute_team_metrics, TeamMetrics};

const ATTACK_WEIGHT: f64 = 0.6;
const FORM_WEIGHT: f64 = 0.1;
// Observed tunings for the defense term ranged 0.3..0.5; 0.5 is the default
// here and DEFENSE_WEIGHT overrides it at runtime.
const DEFAULT_DEFENSE_WEIGHT: f64 = 0.5;
const PROJECTION_BASE: f64 = 0.8;

#[derive(Debug, Clone, Copy)]
pub struct CompareConfig {
    pub defense_weight: f64,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            defense_weight: DEFAULT_DEFENSE_WEIGHT,
        }
    }
}

impl CompareConfig {
    pub fn from_env() -> Self {
        let defense_weight = env::var("DEFENSE_WEIGHT")
            .ok()
            .and_then(|val| val.parse::<f64>().ok())
            .unwrap_or(DEFAULT_DEFENSE_WEIGHT);
        Self { defense_weight }
    }
}

#[derive(Debug, Clone)]
pub struct HeadToHead {
    pub metrics_a: TeamMetrics,
    pub metrics_b: TeamMetrics,
    pub rating_a: f64,
    pub rating_b: f64,
    /// Win probabilities in percent; always sum to 100.
    pub p_a: f64,
    pub p_b: f64,
    pub projected_a: u32,
    pub projected_b: u32,
}

pub fn team_rating(metrics: &TeamMetrics, config: CompareConfig) -> f64 {
    metrics.attack * ATTACK_WEIGHT
        + metrics.defense * config.defense_weight
        + metrics.form * 3.0 * FORM_WEIGHT
}

/// Heuristic pairwise comparison: softmax over the two ratings plus a rounded
/// projected scoreline. Not a forecast model. Unknown ids flow through as
/// zero-matches metrics, same as `compute_team_metrics`.
pub fn compare(
    snapshot: &LeagueSnapshot,
    team_a: u32,
    team_b: u32,
    config: CompareConfig,
) -> HeadToHead {
    let metrics_a = compute_team_metrics(snapshot, team_a);
    let metrics_b = compute_team_metrics(snapshot, team_b);

    let rating_a = team_rating(&metrics_a, config);
    let rating_b = team_rating(&metrics_b, config);

    // Shifting by the max keeps exp() tame; the ratio is unchanged.
    let shift = rating_a.max(rating_b);
    let exp_a = (rating_a - shift).exp();
    let exp_b = (rating_b - shift).exp();
    let frac_a = exp_a / (exp_a + exp_b);
    let frac_b = 1.0 - frac_a;

    let projected_a = project_goals(metrics_a.avg_goals_for, frac_a);
    let projected_b = project_goals(metrics_b.avg_goals_for, frac_b);

    HeadToHead {
        metrics_a,
        metrics_b,
        rating_a,
        rating_b,
        p_a: frac_a * 100.0,
        p_b: frac_b * 100.0,
        projected_a,
        projected_b,
    }
}

fn project_goals(avg_goals_for: f64, win_frac: f64) -> u32 {
    (avg_goals_for * (PROJECTION_BASE + win_frac)).round() as u32
}
