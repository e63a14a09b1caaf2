use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    pub id: u32,
    pub home_id: u32,
    pub away_id: u32,
    pub kickoff_utc: String,
    pub status: String,
    pub home_goals: Option<u8>,
    pub away_goals: Option<u8>,
}

impl Fixture {
    /// A match counts as finished when both goal counts are present.
    /// The provider `status` string is a display hint, not authoritative.
    pub fn is_finished(&self) -> bool {
        self.home_goals.is_some() && self.away_goals.is_some()
    }

    /// Goals (scored, conceded) from `team_id`'s perspective.
    /// None when the match is not finished or the team did not play in it.
    pub fn result_for(&self, team_id: u32) -> Option<(u8, u8)> {
        let home_goals = self.home_goals?;
        let away_goals = self.away_goals?;
        if team_id == self.home_id {
            Some((home_goals, away_goals))
        } else if team_id == self.away_id {
            Some((away_goals, home_goals))
        } else {
            None
        }
    }
}

/// Immutable view of one league's season: the team-name map plus a per-team
/// index of fixtures sorted most-recent-first. Built once per refresh cycle;
/// consumers receive it behind an `Arc` and never mutate it in place.
#[derive(Debug, Clone)]
pub struct LeagueSnapshot {
    league_id: u32,
    teams: Vec<Team>,
    names: HashMap<u32, String>,
    fixtures: Vec<Fixture>,
    index: HashMap<u32, Vec<usize>>,
}

impl LeagueSnapshot {
    pub fn build(league_id: u32, mut teams: Vec<Team>, mut fixtures: Vec<Fixture>) -> Self {
        let mut seen = HashSet::new();
        teams.retain(|team| seen.insert(team.id));
        let mut seen = HashSet::new();
        fixtures.retain(|m| seen.insert(m.id));

        let names: HashMap<u32, String> =
            teams.iter().map(|t| (t.id, t.name.clone())).collect();

        let mut index: HashMap<u32, Vec<usize>> = HashMap::new();
        for team in &teams {
            index.insert(team.id, Vec::new());
        }
        for (pos, m) in fixtures.iter().enumerate() {
            if let Some(list) = index.get_mut(&m.home_id) {
                list.push(pos);
            }
            // A malformed self-paired fixture is indexed once, not twice.
            if m.away_id != m.home_id {
                if let Some(list) = index.get_mut(&m.away_id) {
                    list.push(pos);
                }
            }
        }
        for list in index.values_mut() {
            // Kickoffs are ISO-ish UTC strings, so string ordering is fine.
            // sort_by is stable: equal kickoffs keep input order.
            list.sort_by(|&a, &b| fixtures[b].kickoff_utc.cmp(&fixtures[a].kickoff_utc));
        }

        Self {
            league_id,
            teams,
            names,
            fixtures,
            index,
        }
    }

    pub fn league_id(&self) -> u32 {
        self.league_id
    }

    pub fn list_teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    pub fn contains_team(&self, team_id: u32) -> bool {
        self.names.contains_key(&team_id)
    }

    pub fn team_name(&self, team_id: u32) -> Option<&str> {
        self.names.get(&team_id).map(|s| s.as_str())
    }

    /// The team's fixtures, most recent kickoff first. Empty for unknown ids.
    pub fn team_fixtures(&self, team_id: u32) -> impl Iterator<Item = &Fixture> + '_ {
        self.index
            .get(&team_id)
            .into_iter()
            .flatten()
            .map(move |&pos| &self.fixtures[pos])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(id: u32, home: u32, away: u32, kickoff: &str) -> Fixture {
        Fixture {
            id,
            home_id: home,
            away_id: away,
            kickoff_utc: kickoff.to_string(),
            status: "finished".to_string(),
            home_goals: Some(1),
            away_goals: Some(0),
        }
    }

    #[test]
    fn index_is_most_recent_first() {
        let teams = vec![
            Team { id: 1, name: "A".to_string() },
            Team { id: 2, name: "B".to_string() },
        ];
        let fixtures = vec![
            fixture(10, 1, 2, "2025-08-09T14:00:00Z"),
            fixture(11, 2, 1, "2025-08-23T14:00:00Z"),
            fixture(12, 1, 2, "2025-08-16T14:00:00Z"),
        ];
        let snap = LeagueSnapshot::build(47, teams, fixtures);
        let ids: Vec<u32> = snap.team_fixtures(1).map(|m| m.id).collect();
        assert_eq!(ids, vec![11, 12, 10]);
    }

    #[test]
    fn kickoff_ties_keep_input_order() {
        let teams = vec![
            Team { id: 1, name: "A".to_string() },
            Team { id: 2, name: "B".to_string() },
        ];
        let fixtures = vec![
            fixture(10, 1, 2, "2025-08-09T14:00:00Z"),
            fixture(11, 2, 1, "2025-08-09T14:00:00Z"),
            fixture(12, 1, 2, "2025-08-09T14:00:00Z"),
        ];
        let snap = LeagueSnapshot::build(47, teams, fixtures);
        let ids: Vec<u32> = snap.team_fixtures(1).map(|m| m.id).collect();
        assert_eq!(ids, vec![10, 11, 12]);
    }

    #[test]
    fn unknown_side_is_not_indexed() {
        let teams = vec![Team { id: 1, name: "A".to_string() }];
        let fixtures = vec![fixture(10, 1, 99, "2025-08-09T14:00:00Z")];
        let snap = LeagueSnapshot::build(47, teams, fixtures);
        assert_eq!(snap.team_fixtures(1).count(), 1);
        assert_eq!(snap.team_fixtures(99).count(), 0);
        assert!(!snap.contains_team(99));
    }

    #[test]
    fn duplicate_ids_are_dropped() {
        let teams = vec![
            Team { id: 1, name: "A".to_string() },
            Team { id: 1, name: "A again".to_string() },
            Team { id: 2, name: "B".to_string() },
        ];
        let fixtures = vec![
            fixture(10, 1, 2, "2025-08-09T14:00:00Z"),
            fixture(10, 1, 2, "2025-08-09T14:00:00Z"),
        ];
        let snap = LeagueSnapshot::build(47, teams, fixtures);
        assert_eq!(snap.list_teams().len(), 2);
        assert_eq!(snap.team_name(1), Some("A"));
        assert_eq!(snap.team_fixtures(1).count(), 1);
    }
}
