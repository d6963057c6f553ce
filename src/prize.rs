use serde::{Deserialize, Serialize};

use crate::constants::{EARNING_THRESHOLD, GC_FINAL_BONUS_POOL, ONE_DAY_PRIZE_POOL, STAGE_PRIZE_POOL};
use crate::race::RaceKind;

/// Number of league positions "in the money": the top half, rounded up, so a
/// league of one still pays its winner.
///
/// Examples: 10 → 5, 7 → 4, 3 → 2, 1 → 1, 0 → 0.
pub fn eligible_positions(total_participants: i32) -> i32 {
    if total_participants < 1 {
        return 0;
    }
    ((total_participants as f64 * EARNING_THRESHOLD).ceil() as i32).max(1)
}

pub fn is_eligible_for_earnings(position: Option<i32>, total_participants: i32) -> bool {
    match position {
        Some(p) if p >= 1 => p <= eligible_positions(total_participants),
        _ => false,
    }
}

/// Proportional share of `pool` for a league finishing position.
///
/// With M eligible positions, position p earns (M - p + 1) shares out of
/// M(M+1)/2. Positions outside 1..=M (or absent) earn 0.
///
/// # Arguments
/// * `position` - 1-based league finishing position
/// * `total_participants` - Teams in the league for this race or stage
/// * `pool` - Prize pool to distribute
pub fn earning(position: Option<i32>, total_participants: i32, pool: f64) -> f64 {
    let p = match position {
        Some(p) if is_eligible_for_earnings(position, total_participants) => p,
        _ => return 0.0,
    };

    let eligible = eligible_positions(total_participants) as f64;
    let shares = eligible - p as f64 + 1.0;
    let total_shares = eligible * (eligible + 1.0) / 2.0;

    pool * shares / total_shares
}

/// Which pool an earning comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrizeSource {
    OneDayRace,
    Stage,
    FinalGc,
}

impl PrizeSource {
    pub fn pool(self) -> f64 {
        match self {
            PrizeSource::OneDayRace => ONE_DAY_PRIZE_POOL,
            PrizeSource::Stage => STAGE_PRIZE_POOL,
            PrizeSource::FinalGc => GC_FINAL_BONUS_POOL,
        }
    }
}

/// Pools distributed for one finalization event.
///
/// One-day races pay the one-day pool, every stage pays the stage pool, and a
/// Grand Tour's final classification additionally pays the GC pool.
pub fn prize_sources(kind: RaceKind, is_gc_final: bool) -> Vec<PrizeSource> {
    match kind {
        RaceKind::OneDay => vec![PrizeSource::OneDayRace],
        RaceKind::StageRace => vec![PrizeSource::Stage],
        RaceKind::GrandTour if is_gc_final => vec![PrizeSource::Stage, PrizeSource::FinalGc],
        RaceKind::GrandTour => vec![PrizeSource::Stage],
    }
}

/// Total budget earned by a league position for one event.
pub fn budget_earning(
    position: Option<i32>,
    total_participants: i32,
    kind: RaceKind,
    is_gc_final: bool,
) -> f64 {
    prize_sources(kind, is_gc_final)
        .into_iter()
        .map(|source| earning(position, total_participants, source.pool()))
        .sum()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EarningItem {
    pub source: PrizeSource,
    pub eligible_positions: i32,
    pub amount: f64,
}

/// Itemized earnings for one event; sources paying nothing are omitted.
pub fn earnings_breakdown(
    position: Option<i32>,
    total_participants: i32,
    kind: RaceKind,
    is_gc_final: bool,
) -> Vec<EarningItem> {
    let eligible = eligible_positions(total_participants);
    prize_sources(kind, is_gc_final)
        .into_iter()
        .map(|source| EarningItem {
            source,
            eligible_positions: eligible,
            amount: earning(position, total_participants, source.pool()),
        })
        .filter(|item| item.amount > 0.0)
        .collect()
}

/// Earnings for every paid position, in order.
pub fn preview_distribution(total_participants: i32, pool: f64) -> Vec<(i32, f64)> {
    (1..=eligible_positions(total_participants))
        .map(|p| (p, earning(Some(p), total_participants, pool)))
        .collect()
}

/// Apply an earning and an expense to a budget. The result never goes below
/// zero; an overdraft is clamped, not reported.
pub fn calculate_new_budget(current_budget: f64, earning: f64, expense: f64) -> f64 {
    (current_budget + earning - expense).max(0.0)
}

pub fn can_afford(current_budget: f64, price: f64) -> bool {
    current_budget >= price
}

/// Round a currency amount to two decimals, halves away from zero.
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_eligible_positions() {
        assert_eq!(eligible_positions(10), 5);
        assert_eq!(eligible_positions(7), 4);
        assert_eq!(eligible_positions(3), 2);
        assert_eq!(eligible_positions(2), 1);
        assert_eq!(eligible_positions(1), 1);
        assert_eq!(eligible_positions(0), 0);
        assert_eq!(eligible_positions(-5), 0);
    }

    #[test]
    fn test_worked_example_ten_teams() {
        let expected = [16.67, 13.33, 10.0, 6.67, 3.33, 0.0, 0.0, 0.0, 0.0, 0.0];
        for (i, &amount) in expected.iter().enumerate() {
            let p = i as i32 + 1;
            assert_eq!(round_currency(earning(Some(p), 10, 50.0)), amount, "position {p}");
        }
    }

    #[test]
    fn test_no_earning_outside_range() {
        assert_eq!(earning(None, 10, 50.0), 0.0);
        assert_eq!(earning(Some(0), 10, 50.0), 0.0);
        assert_eq!(earning(Some(-1), 10, 50.0), 0.0);
        assert_eq!(earning(Some(6), 10, 50.0), 0.0);
        assert_eq!(earning(Some(1), 0, 50.0), 0.0);
    }

    #[test]
    fn test_single_team_takes_pool() {
        assert!((earning(Some(1), 1, 20.0) - 20.0).abs() < EPS);
    }

    #[test]
    fn test_budget_earning_by_kind() {
        assert!((budget_earning(Some(1), 1, RaceKind::OneDay, false) - 50.0).abs() < EPS);
        assert!((budget_earning(Some(1), 1, RaceKind::StageRace, false) - 20.0).abs() < EPS);
        // GC final flag is ignored for ordinary stage races
        assert!((budget_earning(Some(1), 1, RaceKind::StageRace, true) - 20.0).abs() < EPS);
        assert!((budget_earning(Some(1), 1, RaceKind::GrandTour, false) - 20.0).abs() < EPS);
        assert!((budget_earning(Some(1), 1, RaceKind::GrandTour, true) - 50.0).abs() < EPS);
        assert_eq!(budget_earning(Some(2), 2, RaceKind::GrandTour, true), 0.0);
    }

    #[test]
    fn test_earnings_breakdown_grand_tour_final() {
        let items = earnings_breakdown(Some(1), 4, RaceKind::GrandTour, true);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].source, PrizeSource::Stage);
        assert_eq!(items[1].source, PrizeSource::FinalGc);
        assert_eq!(items[0].eligible_positions, 2);
        // 2 of 3 shares
        assert!((items[1].amount - 20.0).abs() < EPS);

        assert!(earnings_breakdown(Some(3), 4, RaceKind::GrandTour, true).is_empty());
    }

    #[test]
    fn test_preview_distribution() {
        let preview = preview_distribution(7, 50.0);
        assert_eq!(preview.len(), 4);
        assert_eq!(preview[0].0, 1);
        assert!((preview[0].1 - 20.0).abs() < EPS);
        assert!((preview[3].1 - 5.0).abs() < EPS);
        assert!(preview_distribution(0, 50.0).is_empty());
    }

    #[test]
    fn test_budget_floor() {
        assert_eq!(calculate_new_budget(2.0, 0.0, 5.0), 0.0);
        assert!((calculate_new_budget(10.0, 3.5, 1.5) - 12.0).abs() < EPS);
        assert!(can_afford(10.0, 10.0));
        assert!(!can_afford(9.99, 10.0));
    }

    proptest! {
        #[test]
        fn prop_shares_sum_to_pool(n in 1i32..500, pool in 0.01f64..10_000.0) {
            let total: f64 = (1..=eligible_positions(n))
                .map(|p| earning(Some(p), n, pool))
                .sum();
            prop_assert!((total - pool).abs() < 1e-6 * pool.max(1.0), "total {} pool {}", total, pool);
        }

        #[test]
        fn prop_monotonically_decreasing(n in 1i32..500, pool in 0.01f64..10_000.0) {
            let m = eligible_positions(n);
            for p in 1..=n {
                prop_assert!(earning(Some(p), n, pool) >= earning(Some(p + 1), n, pool));
            }
            // The last paid position gets exactly one share.
            let total_shares = (m * (m + 1) / 2) as f64;
            prop_assert!((earning(Some(m), n, pool) - pool / total_shares).abs() < 1e-9 * pool.max(1.0));
            prop_assert_eq!(earning(Some(m + 1), n, pool), 0.0);
        }

        #[test]
        fn prop_budget_never_negative(
            current in 0.0f64..1_000.0,
            earned in 0.0f64..100.0,
            expense in 0.0f64..5_000.0,
        ) {
            prop_assert!(calculate_new_budget(current, earned, expense) >= 0.0);
        }
    }
}
