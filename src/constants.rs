/// Identifier of the rule set encoded in this module.
///
/// Any change to a table, pool or multiplier below is a new rules version.
pub const RULES_VERSION: &str = "2025.1";

/// One-day race points for positions 1-10
pub const ONE_DAY_TOP_TEN: [i32; 10] = [100, 70, 50, 40, 35, 30, 25, 20, 15, 10];

/// One-day race points for positions 11-20
pub const ONE_DAY_11_TO_20: i32 = 5;

/// One-day race points for positions 21-30
pub const ONE_DAY_21_TO_30: i32 = 2;

/// Stage points (stage races and grand tours) for positions 1-10
pub const STAGE_TOP_TEN: [i32; 10] = [50, 35, 25, 18, 12, 10, 8, 6, 4, 2];

/// Stage points for positions 11-20
pub const STAGE_11_TO_20: i32 = 1;

/// Grand Tour final classification bonus for positions 1-10
pub const FINAL_GC_TOP_TEN: [i32; 10] = [200, 150, 100, 75, 50, 40, 30, 25, 20, 15];

/// Grand Tour final classification bonus for positions 11-20
pub const FINAL_GC_11_TO_20: i32 = 10;

pub const JERSEY_GC_LEADER: i32 = 10;
pub const JERSEY_MOUNTAINS: i32 = 5;
pub const JERSEY_POINTS: i32 = 5;
pub const JERSEY_YOUNG: i32 = 3;

pub const CAPTAIN_MULTIPLIER: i32 = 2;
pub const TRIPLE_CAPTAIN_MULTIPLIER: i32 = 3;

/// Prize pool (millions) for a one-day race
pub const ONE_DAY_PRIZE_POOL: f64 = 50.0;

/// Prize pool (millions) per stage of a multi-day race
pub const STAGE_PRIZE_POOL: f64 = 20.0;

/// Extra pool (millions) paid once on a Grand Tour's final classification
pub const GC_FINAL_BONUS_POOL: f64 = 30.0;

/// Fraction of a league that finishes "in the money"
pub const EARNING_THRESHOLD: f64 = 0.5;

/// Starting budget (millions) of a new team
pub const INITIAL_BUDGET: f64 = 100.0;

/// Cyclists on a full roster
pub const TEAM_SIZE: usize = 15;

/// Roster cyclists whose results count by default
pub const ACTIVE_CYCLISTS: usize = 8;
