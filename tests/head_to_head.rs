use formguide::demo_feed::demo_league;
use formguide::head_to_head::{compare, CompareConfig};
use formguide::snapshot::{Fixture, LeagueSnapshot, Team};

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
fn probabilities_mirror_across_a_whole_season() {
    let (_, teams, fixtures) = demo_league();
    let ids: Vec<u32> = teams.iter().map(|t| t.id).collect();
    let snap = LeagueSnapshot::build(9000, teams, fixtures);
    let cfg = CompareConfig::default();

    for &a in &ids {
        for &b in &ids {
            if a == b {
                continue;
            }
            let ab = compare(&snap, a, b, cfg);
            let ba = compare(&snap, b, a, cfg);
            assert!((ab.p_a - ba.p_b).abs() < 1e-9, "compare({a},{b}) mirror");
            assert!((ab.p_a + ab.p_b - 100.0).abs() < 1e-9);
        }
    }
}

#[test]
fn identical_records_give_even_odds() {
    let snap = LeagueSnapshot::build(
        47,
        vec![team(1, "Alpha"), team(2, "Beta")],
        vec![
            finished(10, 1, 2, 2, 2, "2025-08-09T14:00:00Z"),
            finished(11, 2, 1, 1, 1, "2025-08-16T14:00:00Z"),
        ],
    );
    let result = compare(&snap, 1, 2, CompareConfig::default());
    assert!((result.p_a - 50.0).abs() < 1e-9);
    assert!((result.p_b - 50.0).abs() < 1e-9);
    assert_eq!(result.projected_a, result.projected_b);
}

#[test]
fn unknown_teams_compare_without_panicking() {
    let snap = LeagueSnapshot::build(47, vec![team(1, "Alpha")], Vec::new());
    let result = compare(&snap, 888, 999, CompareConfig::default());
    assert_eq!(result.metrics_a.played, 0);
    assert_eq!(result.metrics_b.played, 0);
    assert!((result.p_a - 50.0).abs() < 1e-9);
    assert_eq!(result.projected_a, 0);
}

#[test]
fn stronger_season_wins_the_rating() {
    let snap = LeagueSnapshot::build(
        47,
        vec![team(1, "Alpha"), team(2, "Beta"), team(3, "Gamma")],
        vec![
            finished(10, 1, 3, 3, 0, "2025-08-09T14:00:00Z"),
            finished(11, 3, 1, 1, 2, "2025-08-16T14:00:00Z"),
            finished(12, 2, 3, 0, 2, "2025-08-09T16:00:00Z"),
            finished(13, 3, 2, 4, 0, "2025-08-16T16:00:00Z"),
        ],
    );
    let result = compare(&snap, 1, 2, CompareConfig::default());
    assert!(result.rating_a > result.rating_b);
    assert!(result.p_a > 50.0);
    assert!(result.p_b < 50.0);
}

#[test]
fn defense_weight_changes_the_spread() {
    // Alpha wins tight games, Beta wins a shootout: Alpha's edge is defense,
    // so a heavier defense weight must widen Alpha's probability.
    let snap = LeagueSnapshot::build(
        47,
        vec![team(1, "Alpha"), team(2, "Beta"), team(3, "Gamma")],
        vec![
            finished(10, 1, 3, 1, 0, "2025-08-09T14:00:00Z"),
            finished(11, 3, 1, 0, 1, "2025-08-16T14:00:00Z"),
            finished(12, 2, 3, 4, 3, "2025-08-09T16:00:00Z"),
            finished(13, 3, 2, 3, 4, "2025-08-16T16:00:00Z"),
        ],
    );
    let narrow = compare(&snap, 1, 2, CompareConfig { defense_weight: 0.3 });
    let wide = compare(&snap, 1, 2, CompareConfig { defense_weight: 0.5 });
    assert!(wide.p_a > narrow.p_a);
}
