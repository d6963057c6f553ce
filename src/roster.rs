use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::captaincy::CaptainRole;
use crate::constants::{ACTIVE_CYCLISTS, TEAM_SIZE};
use crate::error::RosterError;
use crate::race::{CyclistId, TeamId};

/// One cyclist on a fantasy roster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RosterSlot {
    pub cyclist_id: CyclistId,

    /// Among the starters whose results count for the upcoming race
    #[serde(default)]
    pub active: bool,

    #[serde(default)]
    pub role: CaptainRole,

    /// Price paid, in millions
    #[serde(default)]
    pub purchase_price: f64,
}

impl RosterSlot {
    pub fn new(cyclist_id: impl Into<CyclistId>, active: bool) -> Self {
        RosterSlot {
            cyclist_id: cyclist_id.into(),
            active,
            role: CaptainRole::None,
            purchase_price: 0.0,
        }
    }

    pub fn captain(mut self) -> Self {
        self.role = CaptainRole::Captain;
        self
    }

    pub fn triple_captain(mut self) -> Self {
        self.role = CaptainRole::TripleCaptain;
        self
    }

    pub fn with_price(mut self, purchase_price: f64) -> Self {
        self.purchase_price = purchase_price;
        self
    }
}

/// A team's roster snapshot for one race.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamRoster {
    pub team_id: TeamId,
    pub slots: Vec<RosterSlot>,
}

impl TeamRoster {
    pub fn new(team_id: impl Into<TeamId>, slots: Vec<RosterSlot>) -> Self {
        TeamRoster {
            team_id: team_id.into(),
            slots,
        }
    }

    pub fn active_slots(&self) -> impl Iterator<Item = &RosterSlot> {
        self.slots.iter().filter(|s| s.active)
    }

    pub fn captain(&self) -> Option<&RosterSlot> {
        self.slots.iter().find(|s| s.role.is_captain())
    }

    pub fn is_complete(&self) -> bool {
        self.slots.len() == TEAM_SIZE
    }

    pub fn squad_value(&self) -> f64 {
        self.slots.iter().map(|s| s.purchase_price).sum()
    }

    /// Check the structural roster rules: size limits, unique cyclists and a
    /// single captain. Triple-captain eligibility depends on the wildcard
    /// ledger and is checked by the aggregator.
    pub fn validate(&self) -> Result<(), RosterError> {
        if self.slots.len() > TEAM_SIZE {
            return Err(RosterError::TooManySlots {
                count: self.slots.len(),
                limit: TEAM_SIZE,
            });
        }

        let active = self.active_slots().count();
        if active > ACTIVE_CYCLISTS {
            return Err(RosterError::TooManyActive {
                count: active,
                limit: ACTIVE_CYCLISTS,
            });
        }

        let mut seen = HashSet::with_capacity(self.slots.len());
        for slot in &self.slots {
            if !seen.insert(slot.cyclist_id.as_str()) {
                return Err(RosterError::DuplicateCyclist(slot.cyclist_id.clone()));
            }
        }

        let captains = self.slots.iter().filter(|s| s.role.is_captain()).count();
        if captains > 1 {
            return Err(RosterError::MultipleCaptains(captains));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_roster() -> TeamRoster {
        let slots = (0..TEAM_SIZE)
            .map(|i| {
                let slot = RosterSlot::new(format!("c{i}"), i < ACTIVE_CYCLISTS).with_price(6.5);
                if i == 0 {
                    slot.captain()
                } else {
                    slot
                }
            })
            .collect();
        TeamRoster::new("team-1", slots)
    }

    #[test]
    fn test_full_roster_is_valid() {
        let roster = full_roster();
        assert!(roster.validate().is_ok());
        assert!(roster.is_complete());
        assert_eq!(roster.active_slots().count(), ACTIVE_CYCLISTS);
        assert_eq!(roster.captain().map(|s| s.cyclist_id.as_str()), Some("c0"));
        assert!((roster.squad_value() - 97.5).abs() < 1e-9);
    }

    #[test]
    fn test_too_many_slots() {
        let mut roster = full_roster();
        roster.slots.push(RosterSlot::new("extra", false));
        assert_eq!(
            roster.validate(),
            Err(RosterError::TooManySlots { count: 16, limit: 15 })
        );
    }

    #[test]
    fn test_too_many_active() {
        let mut roster = full_roster();
        roster.slots[10].active = true;
        assert_eq!(
            roster.validate(),
            Err(RosterError::TooManyActive { count: 9, limit: 8 })
        );
    }

    #[test]
    fn test_duplicate_cyclist() {
        let mut roster = full_roster();
        roster.slots[14].cyclist_id = "c3".to_string();
        assert_eq!(
            roster.validate(),
            Err(RosterError::DuplicateCyclist("c3".to_string()))
        );
    }

    #[test]
    fn test_multiple_captains() {
        let mut roster = full_roster();
        roster.slots[1].role = CaptainRole::TripleCaptain;
        assert_eq!(roster.validate(), Err(RosterError::MultipleCaptains(2)));
    }

    #[test]
    fn test_partial_roster_is_valid() {
        let roster = TeamRoster::new("team-2", vec![RosterSlot::new("c1", true)]);
        assert!(roster.validate().is_ok());
        assert!(!roster.is_complete());
    }
}
