use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{CAPTAIN_MULTIPLIER, TRIPLE_CAPTAIN_MULTIPLIER};

/// Captaincy of a roster slot for one race.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptainRole {
    #[default]
    None,
    Captain,
    TripleCaptain,
}

impl CaptainRole {
    pub fn multiplier(self) -> i32 {
        match self {
            CaptainRole::None => 1,
            CaptainRole::Captain => CAPTAIN_MULTIPLIER,
            CaptainRole::TripleCaptain => TRIPLE_CAPTAIN_MULTIPLIER,
        }
    }

    pub fn is_captain(self) -> bool {
        !matches!(self, CaptainRole::None)
    }
}

impl fmt::Display for CaptainRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptainRole::None => write!(f, "none"),
            CaptainRole::Captain => write!(f, "captain (x2)"),
            CaptainRole::TripleCaptain => write!(f, "triple captain (x3)"),
        }
    }
}

/// Multiply a cyclist's full per-race points by the captaincy multiplier.
///
/// Trusts `role`; whether a triple captain is allowed is checked by the
/// aggregator.
pub fn apply_captaincy(points: i32, role: CaptainRole) -> i32 {
    points.saturating_mul(role.multiplier())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multipliers() {
        assert_eq!(apply_captaincy(100, CaptainRole::None), 100);
        assert_eq!(apply_captaincy(100, CaptainRole::Captain), 200);
        assert_eq!(apply_captaincy(100, CaptainRole::TripleCaptain), 300);
    }

    #[test]
    fn test_zero_and_negative() {
        assert_eq!(apply_captaincy(0, CaptainRole::TripleCaptain), 0);
        assert_eq!(apply_captaincy(-4, CaptainRole::Captain), -8);
    }
}
