use formguide::demo_feed::demo_league;
use formguide::snapshot::{Fixture, LeagueSnapshot, Team};
use formguide::standings::compute_standings;

fn team(id: u32, name: &str) -> Team {
    Team {
        id,
        name: name.to_string(),
    }
}

fn finished(id: u32, home: u32, away: u32, hg: u8, ag: u8, kickoff: &str) -> Fixture {
    Fixture {
        id,
        home_id: home,
        away_id: away,
        kickoff_utc: kickoff.to_string(),
        status: "finished".to_string(),
        home_goals: Some(hg),
        away_goals: Some(ag),
    }
}

#[test]
fn single_match_scenario() {
    let snap = LeagueSnapshot::build(
        47,
        vec![team(1, "Alpha"), team(2, "Beta")],
        vec![finished(10, 1, 2, 2, 1, "2025-08-09T14:00:00Z")],
    );
    let table = compute_standings(&snap);
    assert_eq!(table.len(), 2);

    let a = &table[0];
    assert_eq!(a.team_id, 1);
    assert_eq!(a.played, 1);
    assert_eq!(a.won, 1);
    assert_eq!(a.points, 3);
    assert_eq!(a.goals_for, 2);
    assert_eq!(a.goals_against, 1);
    assert_eq!(a.goal_diff, 1);

    let b = &table[1];
    assert_eq!(b.team_id, 2);
    assert_eq!(b.played, 1);
    assert_eq!(b.lost, 1);
    assert_eq!(b.points, 0);
    assert_eq!(b.goals_for, 1);
    assert_eq!(b.goals_against, 2);
    assert_eq!(b.goal_diff, -1);
}

#[test]
fn idle_team_gets_a_zero_row() {
    let snap = LeagueSnapshot::build(
        47,
        vec![team(1, "Alpha"), team(2, "Beta"), team(3, "Gamma")],
        vec![finished(10, 1, 2, 1, 1, "2025-08-09T14:00:00Z")],
    );
    let table = compute_standings(&snap);
    let gamma = table.iter().find(|r| r.team_id == 3).expect("row exists");
    assert_eq!(gamma.played, 0);
    assert_eq!(gamma.points, 0);
    assert_eq!(gamma.goals_for, 0);
    assert_eq!(gamma.goal_diff, 0);
}

#[test]
fn match_against_unknown_team_is_excluded() {
    let snap = LeagueSnapshot::build(
        47,
        vec![team(1, "Alpha"), team(2, "Beta")],
        vec![
            finished(10, 1, 2, 2, 0, "2025-08-09T14:00:00Z"),
            finished(11, 1, 99, 5, 0, "2025-08-16T14:00:00Z"),
        ],
    );
    let table = compute_standings(&snap);
    let alpha = table.iter().find(|r| r.team_id == 1).expect("row exists");
    assert_eq!(alpha.played, 1);
    assert_eq!(alpha.goals_for, 2);
}

#[test]
fn sort_key_is_points_then_goal_diff_then_goals_for() {
    // All of Alpha, Beta and Gamma win once: Gamma has the best goal diff,
    // Beta matches Alpha's diff but scored more.
    let snap = LeagueSnapshot::build(
        47,
        vec![
            team(1, "Alpha"),
            team(2, "Beta"),
            team(3, "Gamma"),
            team(4, "Delta"),
        ],
        vec![
            finished(10, 1, 4, 1, 0, "2025-08-09T12:00:00Z"),
            finished(11, 2, 4, 2, 1, "2025-08-16T12:00:00Z"),
            finished(12, 3, 4, 3, 0, "2025-08-23T12:00:00Z"),
        ],
    );
    let order: Vec<u32> = compute_standings(&snap).iter().map(|r| r.team_id).collect();
    assert_eq!(order, vec![3, 2, 1, 4]);
}

#[test]
fn level_teams_keep_team_list_order() {
    // Two identical 1-1 draws: all four teams share points, diff and goals.
    let snap = LeagueSnapshot::build(
        47,
        vec![
            team(1, "Alpha"),
            team(2, "Beta"),
            team(3, "Gamma"),
            team(4, "Delta"),
        ],
        vec![
            finished(10, 1, 2, 1, 1, "2025-08-09T14:00:00Z"),
            finished(11, 3, 4, 1, 1, "2025-08-09T14:00:00Z"),
        ],
    );
    let order: Vec<u32> = compute_standings(&snap).iter().map(|r| r.team_id).collect();
    assert_eq!(order, vec![1, 2, 3, 4]);
}

#[test]
fn goals_for_and_against_balance_over_a_season() {
    let (_, teams, fixtures) = demo_league();
    let finished_count = fixtures.iter().filter(|m| m.is_finished()).count();
    let snap = LeagueSnapshot::build(9000, teams, fixtures);
    let table = compute_standings(&snap);

    let total_for: u32 = table.iter().map(|r| r.goals_for).sum();
    let total_against: u32 = table.iter().map(|r| r.goals_against).sum();
    assert_eq!(total_for, total_against);

    let total_played: u32 = table.iter().map(|r| r.played).sum();
    assert_eq!(total_played as usize, finished_count * 2);
}

#[test]
fn each_match_awards_two_or_three_points() {
    let (_, teams, fixtures) = demo_league();
    let decisive = fixtures
        .iter()
        .filter_map(|m| Some((m.home_goals?, m.away_goals?)))
        .filter(|(h, a)| h != a)
        .count();
    let draws = fixtures
        .iter()
        .filter_map(|m| Some((m.home_goals?, m.away_goals?)))
        .filter(|(h, a)| h == a)
        .count();

    let snap = LeagueSnapshot::build(9000, teams, fixtures);
    let total_points: u32 = compute_standings(&snap).iter().map(|r| r.points).sum();
    assert_eq!(total_points as usize, 3 * decisive + 2 * draws);
}
