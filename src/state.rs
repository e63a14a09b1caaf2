use std::collections::VecDeque;
use std::sync::Arc;
use std::time::SystemTime;

use crate::head_to_head::{self, CompareConfig, HeadToHead};
use crate::snapshot::LeagueSnapshot;
use crate::standings::{compute_standings, StandingsRow};
use crate::team_metrics::{compute_team_metrics, TeamMetrics};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Standings,
    Teams,
    Compare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeagueMode {
    PremierLeague,
    LaLiga,
    Bundesliga,
    SerieA,
    Ligue1,
}

impl LeagueMode {
    pub fn league_id(self) -> u32 {
        match self {
            LeagueMode::PremierLeague => 47,
            LeagueMode::LaLiga => 87,
            LeagueMode::Bundesliga => 54,
            LeagueMode::SerieA => 55,
            LeagueMode::Ligue1 => 53,
        }
    }

    pub fn from_league_id(id: u32) -> Option<Self> {
        match id {
            47 => Some(LeagueMode::PremierLeague),
            87 => Some(LeagueMode::LaLiga),
            54 => Some(LeagueMode::Bundesliga),
            55 => Some(LeagueMode::SerieA),
            53 => Some(LeagueMode::Ligue1),
            _ => None,
        }
    }
}

pub fn league_label(mode: LeagueMode) -> &'static str {
    match mode {
        LeagueMode::PremierLeague => "Premier League",
        LeagueMode::LaLiga => "La Liga",
        LeagueMode::Bundesliga => "Bundesliga",
        LeagueMode::SerieA => "Serie A",
        LeagueMode::Ligue1 => "Ligue 1",
    }
}

pub enum Delta {
    Snapshot(Arc<LeagueSnapshot>),
    Log(String),
}

pub enum FeedCommand {
    Refresh { force: bool },
    SwitchLeague(u32),
}

pub struct AppState {
    pub screen: Screen,
    pub league_mode: LeagueMode,
    pub snapshot: Option<Arc<LeagueSnapshot>>,
    pub standings: Vec<StandingsRow>,
    /// Aligned with `snapshot.list_teams()` order.
    pub team_metrics: Vec<TeamMetrics>,
    pub selected: usize,
    pub compare_slots: [Option<u32>; 2],
    pub compare: Option<HeadToHead>,
    pub compare_config: CompareConfig,
    pub refreshed_at: Option<SystemTime>,
    pub loading: bool,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
}

impl AppState {
    pub fn new(league_mode: LeagueMode) -> Self {
        Self {
            screen: Screen::Standings,
            league_mode,
            snapshot: None,
            standings: Vec::new(),
            team_metrics: Vec::new(),
            selected: 0,
            compare_slots: [None, None],
            compare: None,
            compare_config: CompareConfig::from_env(),
            refreshed_at: None,
            loading: true,
            help_overlay: false,
            logs: VecDeque::new(),
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn cycle_league_mode(&mut self) {
        self.league_mode = match self.league_mode {
            LeagueMode::PremierLeague => LeagueMode::LaLiga,
            LeagueMode::LaLiga => LeagueMode::Bundesliga,
            LeagueMode::Bundesliga => LeagueMode::SerieA,
            LeagueMode::SerieA => LeagueMode::Ligue1,
            LeagueMode::Ligue1 => LeagueMode::PremierLeague,
        };
        self.snapshot = None;
        self.standings.clear();
        self.team_metrics.clear();
        self.selected = 0;
        self.compare_slots = [None, None];
        self.compare = None;
        self.refreshed_at = None;
        self.loading = true;
    }

    fn visible_rows(&self) -> usize {
        match self.screen {
            Screen::Standings => self.standings.len(),
            Screen::Teams => self.team_metrics.len(),
            Screen::Compare => 0,
        }
    }

    pub fn select_next(&mut self) {
        let total = self.visible_rows();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % total;
    }

    pub fn select_prev(&mut self) {
        let total = self.visible_rows();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + total - 1) % total;
    }

    pub fn selected_team_id(&self) -> Option<u32> {
        match self.screen {
            Screen::Standings => self.standings.get(self.selected).map(|row| row.team_id),
            Screen::Teams => {
                let snapshot = self.snapshot.as_ref()?;
                snapshot.list_teams().get(self.selected).map(|t| t.id)
            }
            Screen::Compare => None,
        }
    }

    /// Fill compare slot A then B with the selected team; picking a third
    /// team starts over with it in slot A.
    pub fn push_compare_selection(&mut self, team_id: u32) {
        match self.compare_slots {
            [None, _] => self.compare_slots[0] = Some(team_id),
            [Some(a), None] if a != team_id => self.compare_slots[1] = Some(team_id),
            _ => self.compare_slots = [Some(team_id), None],
        }
        self.recompute_compare();
    }

    pub fn clear_compare(&mut self) {
        self.compare_slots = [None, None];
        self.compare = None;
    }

    pub fn recompute_compare(&mut self) {
        self.compare = match (self.snapshot.as_ref(), self.compare_slots) {
            (Some(snapshot), [Some(a), Some(b)]) => {
                Some(head_to_head::compare(snapshot, a, b, self.compare_config))
            }
            _ => None,
        };
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::Snapshot(snapshot) => {
            state.standings = compute_standings(&snapshot);
            state.team_metrics = snapshot
                .list_teams()
                .iter()
                .map(|t| compute_team_metrics(&snapshot, t.id))
                .collect();
            state.snapshot = Some(snapshot);
            state.refreshed_at = Some(SystemTime::now());
            state.loading = false;
            let total = state.visible_rows();
            if total == 0 {
                state.selected = 0;
            } else if state.selected >= total {
                state.selected = total - 1;
            }
            state.recompute_compare();
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{Fixture, Team};

    fn demo_snapshot() -> Arc<LeagueSnapshot> {
        let teams = vec![
            Team { id: 1, name: "Alpha".to_string() },
            Team { id: 2, name: "Beta".to_string() },
        ];
        let fixtures = vec![Fixture {
            id: 10,
            home_id: 1,
            away_id: 2,
            kickoff_utc: "2025-08-09T14:00:00Z".to_string(),
            status: "finished".to_string(),
            home_goals: Some(2),
            away_goals: Some(1),
        }];
        Arc::new(LeagueSnapshot::build(47, teams, fixtures))
    }

    #[test]
    fn snapshot_delta_rebuilds_derived_tables() {
        let mut state = AppState::new(LeagueMode::PremierLeague);
        apply_delta(&mut state, Delta::Snapshot(demo_snapshot()));
        assert!(!state.loading);
        assert_eq!(state.standings.len(), 2);
        assert_eq!(state.team_metrics.len(), 2);
        assert_eq!(state.standings[0].team_id, 1);
    }

    #[test]
    fn compare_selection_fills_slots_then_restarts() {
        let mut state = AppState::new(LeagueMode::PremierLeague);
        apply_delta(&mut state, Delta::Snapshot(demo_snapshot()));

        state.push_compare_selection(1);
        assert!(state.compare.is_none());
        state.push_compare_selection(2);
        let compare = state.compare.as_ref().expect("both slots filled");
        assert_eq!(compare.metrics_a.team_id, 1);
        assert_eq!(compare.metrics_b.team_id, 2);

        state.push_compare_selection(2);
        assert_eq!(state.compare_slots, [Some(2), None]);
        assert!(state.compare.is_none());
    }

    #[test]
    fn log_ring_is_capped() {
        let mut state = AppState::new(LeagueMode::PremierLeague);
        for idx in 0..500 {
            state.push_log(format!("line {idx}"));
        }
        assert_eq!(state.logs.len(), 200);
        assert_eq!(state.logs.front().map(String::as_str), Some("line 300"));
    }
}
