use thiserror::Error;

use crate::aggregator::ScoringEvent;
use crate::race::{CyclistId, RaceId};
use crate::wildcard::Power;

/// Rejected wildcard transitions.
///
/// Activation failures are the "ineligible activation" outcome: the ledger is
/// left untouched and the caller decides how to report it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WildcardError {
    #[error("{power} has already been used this season")]
    AlreadyUsed { power: Power },

    #[error("{power} is already active for race {race_id}")]
    ActiveForOtherRace { power: Power, race_id: RaceId },

    #[error("{power} is not active")]
    NotActive { power: Power },
}

/// Roster rules checked before a team is scored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("roster has {count} cyclists, limit is {limit}")]
    TooManySlots { count: usize, limit: usize },

    #[error("roster has {count} active cyclists, limit is {limit}")]
    TooManyActive { count: usize, limit: usize },

    #[error("cyclist {0} appears more than once on the roster")]
    DuplicateCyclist(CyclistId),

    #[error("roster designates {0} captains, at most one is allowed")]
    MultipleCaptains(usize),

    #[error("cyclist {cyclist_id} is triple captain but Triple Captain is not active for race {race_id}")]
    TripleCaptainNotActive { cyclist_id: CyclistId, race_id: RaceId },
}

/// Failures surfaced by the aggregator. Missing or malformed result data is
/// never an error; it scores 0.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error(transparent)]
    InvalidRoster(#[from] RosterError),

    #[error("{operation} cannot score a {event:?} event")]
    UnsupportedEvent {
        operation: &'static str,
        event: ScoringEvent,
    },
}

pub type Result<T, E = ScoringError> = std::result::Result<T, E>;
