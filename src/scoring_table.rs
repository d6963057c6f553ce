use serde::{Deserialize, Serialize};

use crate::constants::{
    FINAL_GC_11_TO_20, FINAL_GC_TOP_TEN, JERSEY_GC_LEADER, JERSEY_MOUNTAINS, JERSEY_POINTS,
    JERSEY_YOUNG, ONE_DAY_11_TO_20, ONE_DAY_21_TO_30, ONE_DAY_TOP_TEN, STAGE_11_TO_20,
    STAGE_TOP_TEN,
};
use crate::jersey::jersey_bonus;
use crate::race::{RaceKind, RaceResult};

/// Look up a position in a table shaped as ten explicit entries followed by
/// flat bands. Anything outside the table is worth 0.
fn table_lookup(position: Option<i32>, top_ten: &[i32; 10], bands: &[(i32, i32, i32)]) -> i32 {
    let Some(p) = position else {
        return 0;
    };
    if (1..=10).contains(&p) {
        return top_ten[(p - 1) as usize];
    }
    bands
        .iter()
        .find(|(lo, hi, _)| (*lo..=*hi).contains(&p))
        .map(|&(_, _, points)| points)
        .unwrap_or(0)
}

/// Base points for a finishing position.
///
/// One-day races use the one-day table; stage races and Grand Tours use the
/// per-stage table. Absent, zero, negative or out-of-table positions are 0.
pub fn base_points(position: Option<i32>, kind: RaceKind) -> i32 {
    match kind {
        RaceKind::OneDay => table_lookup(
            position,
            &ONE_DAY_TOP_TEN,
            &[(11, 20, ONE_DAY_11_TO_20), (21, 30, ONE_DAY_21_TO_30)],
        ),
        RaceKind::StageRace | RaceKind::GrandTour => {
            table_lookup(position, &STAGE_TOP_TEN, &[(11, 20, STAGE_11_TO_20)])
        }
    }
}

/// Bonus for a Grand Tour final classification position.
///
/// Additive to the stage points; paid once per race.
pub fn final_gc_bonus(position: Option<i32>) -> i32 {
    table_lookup(position, &FINAL_GC_TOP_TEN, &[(11, 20, FINAL_GC_11_TO_20)])
}

/// A cyclist's full per-result points before any captaincy multiplier:
/// table points + external bonus points + jersey bonus.
pub fn result_points(result: &RaceResult, kind: RaceKind) -> i32 {
    base_points(result.scoring_position(), kind)
        + result.bonus_points
        + jersey_bonus(
            result.is_gc_leader,
            result.is_mountains_leader,
            result.is_points_leader,
            result.is_young_leader,
        )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointsComponent {
    Position,
    GcJersey,
    MountainsJersey,
    PointsJersey,
    YoungJersey,
    Bonus,
}

impl PointsComponent {
    pub fn label(self) -> &'static str {
        match self {
            PointsComponent::Position => "position",
            PointsComponent::GcJersey => "GC leader jersey",
            PointsComponent::MountainsJersey => "mountains jersey",
            PointsComponent::PointsJersey => "points jersey",
            PointsComponent::YoungJersey => "young rider jersey",
            PointsComponent::Bonus => "bonus",
        }
    }
}

/// One line of an itemized result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsItem {
    pub component: PointsComponent,
    pub points: i32,
}

/// Itemize the points of a result. Zero-valued components are omitted; the
/// items always sum to `result_points`.
pub fn breakdown(result: &RaceResult, kind: RaceKind) -> Vec<PointsItem> {
    let candidates = [
        (PointsComponent::Position, base_points(result.scoring_position(), kind)),
        (PointsComponent::GcJersey, if result.is_gc_leader { JERSEY_GC_LEADER } else { 0 }),
        (
            PointsComponent::MountainsJersey,
            if result.is_mountains_leader { JERSEY_MOUNTAINS } else { 0 },
        ),
        (PointsComponent::PointsJersey, if result.is_points_leader { JERSEY_POINTS } else { 0 }),
        (PointsComponent::YoungJersey, if result.is_young_leader { JERSEY_YOUNG } else { 0 }),
        (PointsComponent::Bonus, result.bonus_points),
    ];

    candidates
        .into_iter()
        .filter(|&(_, points)| points != 0)
        .map(|(component, points)| PointsItem { component, points })
        .collect()
}
