use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::error::WildcardError;
use crate::race::RaceId;

/// The three one-shot powers a team gets per season.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Power {
    /// Captain scores x3 instead of x2
    TripleCaptain,
    /// All roster cyclists count, not only the active starters
    BenchBoost,
    /// Waives transfer penalties; no scoring effect
    Wildcard,
}

impl Power {
    pub const ALL: [Power; 3] = [Power::TripleCaptain, Power::BenchBoost, Power::Wildcard];
}

impl fmt::Display for Power {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Power::TripleCaptain => write!(f, "Triple Captain"),
            Power::BenchBoost => write!(f, "Bench Boost"),
            Power::Wildcard => write!(f, "Wildcard"),
        }
    }
}

/// Lifecycle of a single power.
///
/// `Used` remembers the race it was spent on so a replayed finalization of
/// that race sees the same effect without spending it again.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PowerState {
    #[default]
    Unused,
    ActiveForRace { race_id: RaceId },
    Used { race_id: RaceId },
}

impl PowerState {
    /// Whether the power's effect applies when scoring `race_id`.
    pub fn applies_to(&self, race_id: &str) -> bool {
        match self {
            PowerState::ActiveForRace { race_id: r } | PowerState::Used { race_id: r } => r == race_id,
            PowerState::Unused => false,
        }
    }
}

/// Per-team, per-season wildcard ledger.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WildcardLedger {
    #[serde(default)]
    pub triple_captain: PowerState,
    #[serde(default)]
    pub bench_boost: PowerState,
    #[serde(default)]
    pub wildcard: PowerState,
}

impl WildcardLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, power: Power) -> &PowerState {
        match power {
            Power::TripleCaptain => &self.triple_captain,
            Power::BenchBoost => &self.bench_boost,
            Power::Wildcard => &self.wildcard,
        }
    }

    fn state_mut(&mut self, power: Power) -> &mut PowerState {
        match power {
            Power::TripleCaptain => &mut self.triple_captain,
            Power::BenchBoost => &mut self.bench_boost,
            Power::Wildcard => &mut self.wildcard,
        }
    }

    /// True while the power has not been spent this season.
    pub fn is_available(&self, power: Power) -> bool {
        !matches!(self.state(power), PowerState::Used { .. })
    }

    pub fn is_active_for(&self, power: Power, race_id: &str) -> bool {
        matches!(self.state(power), PowerState::ActiveForRace { race_id: r } if r == race_id)
    }

    /// Whether the power's effect applies when scoring `race_id`: active for
    /// it, or already consumed by it.
    pub fn applies_to(&self, power: Power, race_id: &str) -> bool {
        self.state(power).applies_to(race_id)
    }

    pub fn has_active_power_for(&self, race_id: &str) -> bool {
        Power::ALL.iter().any(|&p| self.is_active_for(p, race_id))
    }

    /// Transfers made for `race_id` carry no penalty while the Wildcard applies.
    pub fn waives_transfer_penalties(&self, race_id: &str) -> bool {
        self.applies_to(Power::Wildcard, race_id)
    }

    /// Mark `power` active for `race_id`.
    ///
    /// Re-activating for the same race is accepted and changes nothing.
    pub fn activate(&mut self, power: Power, race_id: &str) -> Result<(), WildcardError> {
        match self.state(power) {
            PowerState::Used { .. } => return Err(WildcardError::AlreadyUsed { power }),
            PowerState::ActiveForRace { race_id: current } if current != race_id => {
                return Err(WildcardError::ActiveForOtherRace {
                    power,
                    race_id: current.clone(),
                });
            }
            PowerState::ActiveForRace { .. } => return Ok(()),
            PowerState::Unused => {}
        }

        *self.state_mut(power) = PowerState::ActiveForRace {
            race_id: race_id.to_string(),
        };
        debug!(%power, race_id, "wildcard power activated");
        Ok(())
    }

    /// Withdraw an activation before its race is finalized. The power stays
    /// available for later use.
    pub fn deactivate(&mut self, power: Power) -> Result<(), WildcardError> {
        let PowerState::ActiveForRace { race_id } = self.state(power) else {
            return Err(WildcardError::NotActive { power });
        };
        debug!(%power, race_id = %race_id, "wildcard power deactivated");

        *self.state_mut(power) = PowerState::Unused;
        Ok(())
    }

    /// Spend `power` on the race being finalized.
    ///
    /// Returns whether the power's effect applies to `race_id`. Consuming a
    /// power already used by the same race is a no-op that still reports the
    /// effect, so finalization can be retried safely.
    pub fn consume(&mut self, power: Power, race_id: &str) -> bool {
        let applies = self.applies_to(power, race_id);
        if self.is_active_for(power, race_id) {
            *self.state_mut(power) = PowerState::Used {
                race_id: race_id.to_string(),
            };
            debug!(%power, race_id, "wildcard power consumed");
        }
        applies
    }

    /// Consume every power active for `race_id`; returns the powers whose
    /// effect applies to it.
    pub fn consume_all(&mut self, race_id: &str) -> Vec<Power> {
        Power::ALL
            .into_iter()
            .filter(|&power| self.consume(power, race_id))
            .collect()
    }
}
