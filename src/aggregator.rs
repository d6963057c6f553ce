//! Team scoring for one finalized race, stage or final classification.
//!
//! Scoring reads a roster snapshot, a wildcard ledger snapshot and the
//! results of the event, and produces a [`TeamRaceOutcome`]. The same inputs
//! always produce the same outcome, so a retried finalization overwrites its
//! earlier record instead of accumulating.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::captaincy::{apply_captaincy, CaptainRole};
use crate::constants::RULES_VERSION;
use crate::error::{Result, RosterError, ScoringError};
use crate::prize::budget_earning;
use crate::race::{CyclistId, GcStanding, RaceId, RaceKind, ResultIndex, TeamId};
use crate::roster::{RosterSlot, TeamRoster};
use crate::scoring_table::{final_gc_bonus, result_points};
use crate::wildcard::{Power, WildcardLedger};

/// What is being scored within a race.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScoringEvent {
    OneDayRace,
    /// A stage of a multi-day race; `is_final` marks the last stage
    Stage { number: u32, is_final: bool },
    /// Final general classification bonus of a Grand Tour
    FinalClassification,
}

impl ScoringEvent {
    pub fn stage_number(self) -> Option<u32> {
        match self {
            ScoringEvent::Stage { number, .. } => Some(number),
            _ => None,
        }
    }
}

/// A race event being finalized.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RaceEvent {
    pub race_id: RaceId,
    pub kind: RaceKind,
    pub event: ScoringEvent,
}

impl RaceEvent {
    pub fn one_day(race_id: impl Into<RaceId>) -> Self {
        RaceEvent {
            race_id: race_id.into(),
            kind: RaceKind::OneDay,
            event: ScoringEvent::OneDayRace,
        }
    }

    pub fn stage(race_id: impl Into<RaceId>, kind: RaceKind, number: u32) -> Self {
        RaceEvent {
            race_id: race_id.into(),
            kind,
            event: ScoringEvent::Stage {
                number,
                is_final: false,
            },
        }
    }

    pub fn final_stage(race_id: impl Into<RaceId>, kind: RaceKind, number: u32) -> Self {
        RaceEvent {
            race_id: race_id.into(),
            kind,
            event: ScoringEvent::Stage {
                number,
                is_final: true,
            },
        }
    }

    pub fn final_classification(race_id: impl Into<RaceId>) -> Self {
        RaceEvent {
            race_id: race_id.into(),
            kind: RaceKind::GrandTour,
            event: ScoringEvent::FinalClassification,
        }
    }

    pub fn is_final_classification(&self) -> bool {
        matches!(self.event, ScoringEvent::FinalClassification)
    }

    /// True when this event also pays the Grand Tour GC bonus pool.
    pub fn pays_gc_pool(&self) -> bool {
        self.kind.has_final_gc_bonus() && matches!(self.event, ScoringEvent::Stage { is_final: true, .. })
    }

    /// Budget earned by a league finishing position for this event.
    ///
    /// The final classification itself pays nothing: its pool is paid with
    /// the final stage.
    pub fn budget_earning(&self, league_position: Option<i32>, participants: i32) -> f64 {
        match self.event {
            ScoringEvent::FinalClassification => 0.0,
            _ => budget_earning(league_position, participants, self.kind, self.pays_gc_pool()),
        }
    }
}

/// Per-cyclist line of a team outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CyclistScore {
    pub cyclist_id: CyclistId,
    /// Whether this cyclist was in the scoring set
    pub counted: bool,
    pub role: CaptainRole,
    /// Points before captaincy, earned whether counted or not
    pub raw_points: i32,
    /// Contribution to the team total
    pub points: i32,
    pub position_label: String,
}

/// Points and budget a team earned for one event.
///
/// Keyed by (team, race, stage); recomputation yields an equal value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamRaceOutcome {
    pub team_id: TeamId,
    pub race_id: RaceId,
    pub kind: RaceKind,
    pub event: ScoringEvent,
    pub points: i32,
    pub league_position: Option<i32>,
    pub budget_earned: f64,
    pub captain_id: Option<CyclistId>,
    pub triple_captain_applied: bool,
    pub bench_boost_applied: bool,
    pub cyclists: Vec<CyclistScore>,
    pub rules_version: String,
}

impl TeamRaceOutcome {
    pub fn stage_number(&self) -> Option<u32> {
        self.event.stage_number()
    }

    pub fn key(&self) -> (TeamId, RaceId, Option<u32>) {
        (self.team_id.clone(), self.race_id.clone(), self.stage_number())
    }

    /// Points a bench cyclist earned that did not count.
    pub fn wasted_points(&self) -> i32 {
        self.cyclists
            .iter()
            .filter(|c| !c.counted)
            .map(|c| c.raw_points.max(0))
            .sum()
    }

    /// Attach the team's league finishing position and the budget it earns.
    pub fn with_league_position(mut self, event: &RaceEvent, position: Option<i32>, participants: i32) -> Self {
        self.league_position = position;
        self.budget_earned = event.budget_earning(position, participants);
        self
    }
}

/// Powers that change scoring for a race, read from a ledger snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActiveEffects {
    pub triple_captain: bool,
    pub bench_boost: bool,
}

impl ActiveEffects {
    pub fn for_race(ledger: &WildcardLedger, race_id: &str) -> Self {
        ActiveEffects {
            triple_captain: ledger.applies_to(Power::TripleCaptain, race_id),
            bench_boost: ledger.applies_to(Power::BenchBoost, race_id),
        }
    }
}

/// Effective captaincy of a slot once wildcard effects are known.
///
/// A captain becomes a triple captain when Triple Captain applies; a slot
/// marked triple captain without it is a rule violation.
pub fn resolve_role(slot: &RosterSlot, effects: ActiveEffects, race_id: &str) -> Result<CaptainRole, RosterError> {
    match (slot.role, effects.triple_captain) {
        (CaptainRole::TripleCaptain, false) => Err(RosterError::TripleCaptainNotActive {
            cyclist_id: slot.cyclist_id.clone(),
            race_id: race_id.to_string(),
        }),
        (CaptainRole::Captain, true) => Ok(CaptainRole::TripleCaptain),
        (role, _) => Ok(role),
    }
}

/// Check every roster rule for this race, including triple-captain
/// eligibility against the ledger.
pub fn validate_roster(roster: &TeamRoster, ledger: &WildcardLedger, race_id: &str) -> Result<(), RosterError> {
    roster.validate()?;
    let effects = ActiveEffects::for_race(ledger, race_id);
    for slot in &roster.slots {
        resolve_role(slot, effects, race_id)?;
    }
    Ok(())
}

/// Shared scoring loop. `points_for` returns the raw points and position
/// label of a cyclist, or None when the cyclist has no result.
fn score_with<F>(
    roster: &TeamRoster,
    ledger: &WildcardLedger,
    race: &RaceEvent,
    points_for: F,
) -> Result<TeamRaceOutcome>
where
    F: Fn(&RosterSlot) -> Option<(i32, String)>,
{
    validate_roster(roster, ledger, &race.race_id)?;
    let effects = ActiveEffects::for_race(ledger, &race.race_id);

    let mut cyclists = Vec::with_capacity(roster.slots.len());
    let mut total = 0i32;

    for slot in &roster.slots {
        let role = resolve_role(slot, effects, &race.race_id)?;
        let counted = slot.active || effects.bench_boost;
        let (raw_points, position_label) = points_for(slot).unwrap_or_else(|| (0, "DNP".to_string()));
        let points = if counted { apply_captaincy(raw_points, role) } else { 0 };

        total = total.saturating_add(points);
        cyclists.push(CyclistScore {
            cyclist_id: slot.cyclist_id.clone(),
            counted,
            role,
            raw_points,
            points,
            position_label,
        });
    }

    let points = total.max(0);
    let triple_captain_applied = cyclists
        .iter()
        .any(|c| c.counted && c.role == CaptainRole::TripleCaptain);
    debug!(
        team_id = %roster.team_id,
        race_id = %race.race_id,
        points,
        bench_boost = effects.bench_boost,
        triple_captain = triple_captain_applied,
        "team scored"
    );

    Ok(TeamRaceOutcome {
        team_id: roster.team_id.clone(),
        race_id: race.race_id.clone(),
        kind: race.kind,
        event: race.event,
        points,
        league_position: None,
        budget_earned: 0.0,
        captain_id: roster.captain().map(|s| s.cyclist_id.clone()),
        triple_captain_applied,
        bench_boost_applied: effects.bench_boost,
        cyclists,
        rules_version: RULES_VERSION.to_string(),
    })
}

/// Rejects events the calling entry point does not score: stage and one-day
/// scoring never handle the final classification, and the other way round.
fn check_event(race: &RaceEvent, final_classification: bool, operation: &'static str) -> Result<()> {
    if race.is_final_classification() == final_classification {
        Ok(())
    } else {
        Err(ScoringError::UnsupportedEvent {
            operation,
            event: race.event,
        })
    }
}

/// Score a team for a one-day race or a stage.
///
/// Only the active starters count unless Bench Boost applies to the race, in
/// which case every roster cyclist counts. Only results recorded for this
/// race and stage are read; cyclists without one add 0. The ledger is only
/// read; use [`finalize`] to consume powers.
pub fn score(
    roster: &TeamRoster,
    ledger: &WildcardLedger,
    results: &ResultIndex,
    race: &RaceEvent,
) -> Result<TeamRaceOutcome> {
    check_event(race, false, "score")?;
    let event_results = results.event(&race.race_id, race.event.stage_number());
    score_with(roster, ledger, race, |slot| {
        event_results?
            .get(&slot.cyclist_id)
            .map(|r| (result_points(r, race.kind), r.position_label()))
    })
}

/// Score the Grand Tour final classification bonus.
///
/// Selection and captaincy follow the same rules as a stage. Races other than
/// Grand Tours award no bonus, so every cyclist scores 0. Standings of other
/// races are ignored; for a cyclist listed twice the later standing wins.
pub fn score_final_gc(
    roster: &TeamRoster,
    ledger: &WildcardLedger,
    standings: &[GcStanding],
    race: &RaceEvent,
) -> Result<TeamRaceOutcome> {
    check_event(race, true, "score_final_gc")?;
    let awards_bonus = race.kind.has_final_gc_bonus();
    let by_cyclist: HashMap<&str, &GcStanding> = standings
        .iter()
        .filter(|s| s.race_id == race.race_id)
        .map(|s| (s.cyclist_id.as_str(), s))
        .collect();

    score_with(roster, ledger, race, |slot| {
        by_cyclist.get(slot.cyclist_id.as_str()).map(|s| {
            let bonus = if awards_bonus { final_gc_bonus(s.gc_position) } else { 0 };
            let label = match s.gc_position {
                Some(p) if p >= 1 => format!("{p}º"),
                _ => "DNP".to_string(),
            };
            (bonus, label)
        })
    })
}

/// Consume the team's powers for this race and score it.
///
/// The roster is checked before anything is consumed, so a rejected roster
/// leaves the ledger untouched. Finalizing the same event twice yields the
/// same outcome and consumes nothing the second time.
pub fn finalize(
    roster: &TeamRoster,
    ledger: &mut WildcardLedger,
    results: &ResultIndex,
    race: &RaceEvent,
) -> Result<TeamRaceOutcome> {
    check_event(race, false, "finalize")?;
    if let Err(err) = validate_roster(roster, ledger, &race.race_id) {
        warn!(team_id = %roster.team_id, race_id = %race.race_id, error = %err, "roster rejected");
        return Err(err.into());
    }
    ledger.consume_all(&race.race_id);
    score(roster, ledger, results, race)
}

/// [`finalize`] for the final classification bonus.
pub fn finalize_final_gc(
    roster: &TeamRoster,
    ledger: &mut WildcardLedger,
    standings: &[GcStanding],
    race: &RaceEvent,
) -> Result<TeamRaceOutcome> {
    check_event(race, true, "finalize_final_gc")?;
    if let Err(err) = validate_roster(roster, ledger, &race.race_id) {
        warn!(team_id = %roster.team_id, race_id = %race.race_id, error = %err, "roster rejected");
        return Err(err.into());
    }
    ledger.consume_all(&race.race_id);
    score_final_gc(roster, ledger, standings, race)
}
