//! Peloton Core - fantasy cycling scoring and economy engine.
//!
//! Turns finalized race results into fantasy points for each team, applies
//! captaincy and one-shot season powers, and splits each event's prize pool
//! across the top half of a league. Everything here is pure computation over
//! snapshots; loading and storing them belongs to the caller.
//!
//! Optional Python bindings are available with the `python` feature.

pub mod aggregator;
pub mod captaincy;
pub mod constants;
pub mod error;
pub mod jersey;
pub mod league;
pub mod prize;
pub mod race;
pub mod roster;
pub mod scoring_table;
pub mod wildcard;

#[cfg(feature = "python")]
mod python;

pub use aggregator::{
    finalize, finalize_final_gc, score, score_final_gc, CyclistScore, RaceEvent, ScoringEvent,
    TeamRaceOutcome,
};
pub use captaincy::{apply_captaincy, CaptainRole};
pub use error::{RosterError, ScoringError, WildcardError};
pub use jersey::jersey_bonus;
pub use league::{
    finalize_and_settle, finalize_league, finalize_league_final_gc, standings_from_points, BudgetUpdate,
    LeagueEntry, LeagueRound, LeagueStanding,
};
pub use prize::{budget_earning, calculate_new_budget, earning, eligible_positions};
pub use race::{GcStanding, RaceKind, RaceResult, ResultIndex, ResultStatus};
pub use roster::{RosterSlot, TeamRoster};
pub use scoring_table::{base_points, final_gc_bonus, result_points};
pub use wildcard::{Power, PowerState, WildcardLedger};

/// Test log output, controlled by `TEST_LOG` then `RUST_LOG` (default "warn").
#[cfg(test)]
pub(crate) fn init_test_logging() {
    use std::sync::Once;
    use tracing_subscriber::{fmt, EnvFilter};

    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt().with_env_filter(filter).with_test_writer().without_time().try_init().ok();
    });
}
