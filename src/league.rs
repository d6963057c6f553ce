use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};

use crate::aggregator::{finalize, finalize_final_gc, RaceEvent, TeamRaceOutcome};
use crate::error::ScoringError;
use crate::prize::calculate_new_budget;
use crate::race::{GcStanding, ResultIndex, TeamId};
use crate::roster::TeamRoster;
use crate::wildcard::WildcardLedger;

/// A team taking part in a league finalization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeagueEntry {
    pub roster: TeamRoster,
    pub ledger: WildcardLedger,
    /// Budget before this event, in millions
    pub budget: f64,
}

impl LeagueEntry {
    pub fn new(roster: TeamRoster, ledger: WildcardLedger, budget: f64) -> Self {
        LeagueEntry { roster, ledger, budget }
    }

    pub fn team_id(&self) -> &str {
        &self.roster.team_id
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingEntry {
    pub team_id: TeamId,
    pub position: i32,
}

/// League finishing order for one race or stage.
///
/// Positions are 1-based and contiguous; ties are resolved before they get
/// here.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueStanding {
    pub entries: Vec<StandingEntry>,
}

impl LeagueStanding {
    pub fn new(entries: Vec<StandingEntry>) -> Self {
        LeagueStanding { entries }
    }

    /// Build a standing from team ids listed in finishing order.
    pub fn from_order<I, S>(teams: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<TeamId>,
    {
        let entries = teams
            .into_iter()
            .enumerate()
            .map(|(i, team_id)| StandingEntry {
                team_id: team_id.into(),
                position: i as i32 + 1,
            })
            .collect();
        LeagueStanding { entries }
    }

    pub fn participants(&self) -> i32 {
        self.entries.len() as i32
    }

    pub fn position_of(&self, team_id: &str) -> Option<i32> {
        self.entries
            .iter()
            .find(|e| e.team_id == team_id)
            .map(|e| e.position)
    }
}

/// Rank teams by points, highest first. Equal totals are ordered by team id
/// so the result is deterministic.
pub fn standings_from_points(outcomes: &[TeamRaceOutcome]) -> LeagueStanding {
    let mut ranked: Vec<&TeamRaceOutcome> = outcomes.iter().collect();
    ranked.sort_by(|a, b| b.points.cmp(&a.points).then_with(|| a.team_id.cmp(&b.team_id)));
    LeagueStanding::from_order(ranked.into_iter().map(|o| o.team_id.clone()))
}

/// Budget movement of one team for one event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetUpdate {
    pub team_id: TeamId,
    pub previous: f64,
    pub earned: f64,
    pub new_budget: f64,
}

/// Result of scoring every team of a league for one event.
#[derive(Clone, Debug, Default)]
pub struct LeagueRound {
    pub outcomes: Vec<TeamRaceOutcome>,
    /// Ledgers after consumption, to be written with the outcomes
    pub ledgers: HashMap<TeamId, WildcardLedger>,
    pub rejected: Vec<(TeamId, ScoringError)>,
    /// Scored teams that received no budget update because their current
    /// budget was not supplied to [`LeagueRound::settle`]
    pub unsettled: Vec<TeamId>,
}

impl LeagueRound {
    pub fn outcome(&self, team_id: &str) -> Option<&TeamRaceOutcome> {
        self.outcomes.iter().find(|o| o.team_id == team_id)
    }

    /// Pay out the event's prize pool according to `standing` and attach each
    /// team's league position to its outcome.
    ///
    /// Only teams with a current budget in `budgets` get a [`BudgetUpdate`];
    /// the others are listed in `unsettled`.
    pub fn settle(
        &mut self,
        race: &RaceEvent,
        standing: &LeagueStanding,
        budgets: &HashMap<TeamId, f64>,
    ) -> Vec<BudgetUpdate> {
        let participants = standing.participants();
        let mut updates = Vec::with_capacity(self.outcomes.len());
        self.unsettled.clear();

        for outcome in self.outcomes.iter_mut() {
            let position = standing.position_of(&outcome.team_id);
            outcome.league_position = position;
            outcome.budget_earned = race.budget_earning(position, participants);

            let Some(&previous) = budgets.get(&outcome.team_id) else {
                warn!(team_id = %outcome.team_id, race_id = %race.race_id, "no budget supplied, team not settled");
                self.unsettled.push(outcome.team_id.clone());
                continue;
            };
            updates.push(BudgetUpdate {
                team_id: outcome.team_id.clone(),
                previous,
                earned: outcome.budget_earned,
                new_budget: calculate_new_budget(previous, outcome.budget_earned, 0.0),
            });
        }
        updates
    }
}

/// Runs `finalize_team` for every entry in parallel on a copy of its ledger
/// and gathers the round.
fn finalize_each<F>(entries: &[LeagueEntry], race: &RaceEvent, finalize_team: F) -> LeagueRound
where
    F: Fn(&TeamRoster, &mut WildcardLedger) -> Result<TeamRaceOutcome, ScoringError> + Sync,
{
    let scored: Vec<_> = entries
        .par_iter()
        .map(|entry| {
            let mut ledger = entry.ledger.clone();
            let outcome = finalize_team(&entry.roster, &mut ledger);
            (entry.roster.team_id.clone(), ledger, outcome)
        })
        .collect();

    let mut round = LeagueRound::default();
    for (team_id, ledger, outcome) in scored {
        match outcome {
            Ok(outcome) => round.outcomes.push(outcome),
            Err(source) => {
                warn!(team_id = %team_id, race_id = %race.race_id, error = %source, "team not scored");
                round.rejected.push((team_id.clone(), source));
            }
        }
        round.ledgers.insert(team_id, ledger);
    }

    info!(
        race_id = %race.race_id,
        event = ?race.event,
        teams = entries.len(),
        scored = round.outcomes.len(),
        rejected = round.rejected.len(),
        "league finalized"
    );
    round
}

/// Finalize one race or stage for every team of a league.
///
/// Teams are independent: each consumes its own ledger copy and is scored in
/// parallel. A team whose roster breaks the rules is reported in `rejected`
/// with its ledger unchanged; the others are unaffected.
pub fn finalize_league(entries: &[LeagueEntry], results: &ResultIndex, race: &RaceEvent) -> LeagueRound {
    finalize_each(entries, race, |roster, ledger| finalize(roster, ledger, results, race))
}

/// Finalize the Grand Tour final classification bonus for every team of a
/// league, in parallel like [`finalize_league`].
pub fn finalize_league_final_gc(entries: &[LeagueEntry], standings: &[GcStanding], race: &RaceEvent) -> LeagueRound {
    finalize_each(entries, race, |roster, ledger| {
        finalize_final_gc(roster, ledger, standings, race)
    })
}

/// Finalize an event and settle budgets using the league order produced by
/// the event's own points.
pub fn finalize_and_settle(
    entries: &[LeagueEntry],
    results: &ResultIndex,
    race: &RaceEvent,
) -> (LeagueRound, Vec<BudgetUpdate>) {
    let mut round = finalize_league(entries, results, race);
    let standing = standings_from_points(&round.outcomes);
    let budgets: HashMap<TeamId, f64> = entries
        .iter()
        .map(|e| (e.roster.team_id.clone(), e.budget))
        .collect();
    let updates = round.settle(race, &standing, &budgets);
    (round, updates)
}
