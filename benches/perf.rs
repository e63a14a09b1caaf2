use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use formguide::head_to_head::{compare, CompareConfig};
use formguide::snapshot::{Fixture, LeagueSnapshot, Team};
use formguide::standings::compute_standings;
use formguide::team_metrics::compute_team_metrics;

const TEAM_COUNT: u32 = 20;

/// Deterministic full season: every ordered pair plays once, scores derived
/// from the pairing so runs are comparable.
fn synthetic_snapshot() -> LeagueSnapshot {
    let teams: Vec<Team> = (1..=TEAM_COUNT)
        .map(|id| Team {
            id,
            name: format!("Team {id:02}"),
        })
        .collect();

    let mut fixtures = Vec::new();
    let mut match_id = 1u32;
    for home in 1..=TEAM_COUNT {
        for away in 1..=TEAM_COUNT {
            if home == away {
                continue;
            }
            let month = 1 + (match_id / 28) % 12;
            let day = 1 + match_id % 28;
            fixtures.push(Fixture {
                id: match_id,
                home_id: home,
                away_id: away,
                kickoff_utc: format!("2025-{month:02}-{day:02}T15:00:00Z"),
                status: "finished".to_string(),
                home_goals: Some(((home * 7 + away * 3) % 5) as u8),
                away_goals: Some(((home * 3 + away * 5) % 4) as u8),
            });
            match_id += 1;
        }
    }
    LeagueSnapshot::build(47, teams, fixtures)
}

fn bench_snapshot_build(c: &mut Criterion) {
    c.bench_function("snapshot_build", |b| {
        b.iter(|| {
            let snap = synthetic_snapshot();
            black_box(snap.list_teams().len());
        })
    });
}

fn bench_standings(c: &mut Criterion) {
    let snap = synthetic_snapshot();
    c.bench_function("standings_full_table", |b| {
        b.iter(|| {
            let table = compute_standings(black_box(&snap));
            black_box(table.len());
        })
    });
}

fn bench_metrics_all_teams(c: &mut Criterion) {
    let snap = synthetic_snapshot();
    c.bench_function("metrics_all_teams", |b| {
        b.iter(|| {
            for team in snap.list_teams() {
                let m = compute_team_metrics(black_box(&snap), team.id);
                black_box(m.form);
            }
        })
    });
}

fn bench_head_to_head(c: &mut Criterion) {
    let snap = synthetic_snapshot();
    let cfg = CompareConfig::default();
    c.bench_function("head_to_head_pair", |b| {
        b.iter(|| {
            let result = compare(black_box(&snap), 1, 2, cfg);
            black_box(result.p_a);
        })
    });
}

criterion_group!(
    benches,
    bench_snapshot_build,
    bench_standings,
    bench_metrics_all_teams,
    bench_head_to_head
);
criterion_main!(benches);
