use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use peloton_core::aggregator::{score, RaceEvent};
use peloton_core::constants::{ACTIVE_CYCLISTS, INITIAL_BUDGET, TEAM_SIZE};
use peloton_core::league::{finalize_and_settle, finalize_league, LeagueEntry};
use peloton_core::prize::earning;
use peloton_core::race::{RaceKind, RaceResult, ResultIndex};
use peloton_core::roster::{RosterSlot, TeamRoster};
use peloton_core::scoring_table::base_points;
use peloton_core::wildcard::{Power, WildcardLedger};

const PELOTON: usize = 176;

/// League of `n_teams` rosters drawn from a 176-rider peloton, with about one
/// team in ten playing Bench Boost.
fn create_league(n_teams: usize, race_id: &str, seed: u64) -> Vec<LeagueEntry> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let riders: Vec<String> = (0..PELOTON).map(|i| format!("rider{}", i)).collect();

    (0..n_teams)
        .map(|t| {
            let picks: Vec<&String> = riders.choose_multiple(&mut rng, TEAM_SIZE).collect();
            let slots = picks
                .into_iter()
                .enumerate()
                .map(|(i, id)| {
                    let slot = RosterSlot::new(id.clone(), i < ACTIVE_CYCLISTS).with_price(rng.gen_range(4.0..12.0));
                    if i == 0 {
                        slot.captain()
                    } else {
                        slot
                    }
                })
                .collect();

            let mut ledger = WildcardLedger::new();
            if rng.gen_ratio(1, 10) {
                let _ = ledger.activate(Power::BenchBoost, race_id);
            }
            LeagueEntry::new(TeamRoster::new(format!("team{}", t), slots), ledger, INITIAL_BUDGET)
        })
        .collect()
}

fn create_stage_results(race_id: &str, seed: u64) -> ResultIndex {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut order: Vec<usize> = (0..PELOTON).collect();
    order.shuffle(&mut rng);

    order
        .into_iter()
        .enumerate()
        .map(|(pos, rider)| {
            RaceResult::new(race_id, format!("rider{}", rider), Some(pos as i32 + 1))
                .with_stage(1)
                .with_jerseys(pos == 0, pos == 5, pos == 1, pos == 9)
        })
        .collect()
}

fn bench_base_points(c: &mut Criterion) {
    c.bench_function("base_points_all_positions", |b| {
        b.iter(|| {
            (1..=200)
                .map(|p| base_points(black_box(Some(p)), RaceKind::OneDay))
                .sum::<i32>()
        })
    });
}

fn bench_prize_distribution(c: &mut Criterion) {
    c.bench_function("earning_1000_team_league", |b| {
        b.iter(|| {
            (1..=1000)
                .map(|p| earning(black_box(Some(p)), 1000, 50.0))
                .sum::<f64>()
        })
    });
}

fn bench_team_score(c: &mut Criterion) {
    let race = RaceEvent::stage("tdf", RaceKind::GrandTour, 1);
    let league = create_league(1, "tdf", 7);
    let results = create_stage_results("tdf", 11);

    c.bench_function("score_single_team", |b| {
        b.iter(|| score(black_box(&league[0].roster), &league[0].ledger, &results, &race))
    });
}

fn bench_league_finalization(c: &mut Criterion) {
    let race = RaceEvent::stage("tdf", RaceKind::GrandTour, 1);
    let league = create_league(10_000, "tdf", 42);
    let results = create_stage_results("tdf", 43);

    c.bench_function("score_10000_teams_sequential", |b| {
        b.iter(|| {
            league
                .iter()
                .filter_map(|e| score(&e.roster, &e.ledger, &results, &race).ok())
                .map(|o| o.points as i64)
                .sum::<i64>()
        })
    });

    c.bench_function("finalize_10000_teams_parallel", |b| {
        b.iter(|| finalize_league(black_box(&league), &results, &race))
    });

    c.bench_function("finalize_and_settle_10000_teams", |b| {
        b.iter(|| finalize_and_settle(black_box(&league), &results, &race))
    });
}

criterion_group!(
    benches,
    bench_base_points,
    bench_prize_distribution,
    bench_team_score,
    bench_league_finalization,
);
criterion_main!(benches);
