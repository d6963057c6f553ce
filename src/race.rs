use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type RaceId = String;
pub type CyclistId = String;
pub type TeamId = String;

/// Kind of race, selecting the points table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RaceKind {
    OneDay,
    StageRace,
    GrandTour,
}

impl RaceKind {
    pub fn is_multi_stage(self) -> bool {
        !matches!(self, RaceKind::OneDay)
    }

    /// Only Grand Tours award the final classification bonus.
    pub fn has_final_gc_bonus(self) -> bool {
        matches!(self, RaceKind::GrandTour)
    }
}

/// How a cyclist's race or stage ended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultStatus {
    #[default]
    Finished,
    /// Did not finish
    Dnf,
    /// Did not start
    Dns,
    /// Disqualified
    Dsq,
    /// Outside time limit
    Otl,
    /// Not in the results at all
    Dnp,
}

impl ResultStatus {
    pub fn finished(self) -> bool {
        matches!(self, ResultStatus::Finished)
    }

    pub fn code(self) -> &'static str {
        match self {
            ResultStatus::Finished => "",
            ResultStatus::Dnf => "DNF",
            ResultStatus::Dns => "DNS",
            ResultStatus::Dsq => "DSQ",
            ResultStatus::Otl => "OTL",
            ResultStatus::Dnp => "DNP",
        }
    }
}

/// A cyclist's outcome in a one-day race or in one stage of a multi-day race.
///
/// Records are immutable. A correction is a new record for the same
/// (race, stage, cyclist) with a higher `revision`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RaceResult {
    pub race_id: RaceId,
    pub cyclist_id: CyclistId,

    /// Absent for one-day races
    #[serde(default)]
    pub stage_number: Option<u32>,

    /// Absent when the cyclist has no classified result
    #[serde(default)]
    pub position: Option<i32>,

    #[serde(default)]
    pub status: ResultStatus,

    /// Breakaway, KOM and sprint points awarded upstream
    #[serde(default)]
    pub bonus_points: i32,

    #[serde(default)]
    pub is_gc_leader: bool,
    #[serde(default)]
    pub is_mountains_leader: bool,
    #[serde(default)]
    pub is_points_leader: bool,
    #[serde(default)]
    pub is_young_leader: bool,

    #[serde(default)]
    pub revision: u32,
}

impl RaceResult {
    pub fn new(race_id: impl Into<RaceId>, cyclist_id: impl Into<CyclistId>, position: Option<i32>) -> Self {
        RaceResult {
            race_id: race_id.into(),
            cyclist_id: cyclist_id.into(),
            stage_number: None,
            position,
            status: ResultStatus::Finished,
            bonus_points: 0,
            is_gc_leader: false,
            is_mountains_leader: false,
            is_points_leader: false,
            is_young_leader: false,
            revision: 0,
        }
    }

    pub fn with_stage(mut self, stage_number: u32) -> Self {
        self.stage_number = Some(stage_number);
        self
    }

    pub fn with_status(mut self, status: ResultStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_bonus(mut self, bonus_points: i32) -> Self {
        self.bonus_points = bonus_points;
        self
    }

    pub fn with_jerseys(mut self, gc: bool, mountains: bool, points: bool, young: bool) -> Self {
        self.is_gc_leader = gc;
        self.is_mountains_leader = mountains;
        self.is_points_leader = points;
        self.is_young_leader = young;
        self
    }

    pub fn with_revision(mut self, revision: u32) -> Self {
        self.revision = revision;
        self
    }

    /// Position that earns table points: a valid position of a finished rider.
    pub fn scoring_position(&self) -> Option<i32> {
        if self.status.finished() {
            self.position.filter(|&p| p >= 1)
        } else {
            None
        }
    }

    pub fn has_jersey(&self) -> bool {
        self.is_gc_leader || self.is_mountains_leader || self.is_points_leader || self.is_young_leader
    }

    /// Short label such as "3º", "DNF" or "DNP".
    pub fn position_label(&self) -> String {
        match (self.position, self.status) {
            (Some(p), ResultStatus::Finished) if p >= 1 => format!("{p}º"),
            (_, ResultStatus::Finished) => ResultStatus::Dnp.code().to_string(),
            (_, status) => status.code().to_string(),
        }
    }
}

/// A cyclist's final general classification position in a multi-day race.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GcStanding {
    pub race_id: RaceId,
    pub cyclist_id: CyclistId,
    pub gc_position: Option<i32>,
}

impl GcStanding {
    pub fn new(race_id: impl Into<RaceId>, cyclist_id: impl Into<CyclistId>, gc_position: Option<i32>) -> Self {
        GcStanding {
            race_id: race_id.into(),
            cyclist_id: cyclist_id.into(),
            gc_position,
        }
    }
}

/// Race and stage a result belongs to; stage is `None` for one-day races.
pub type EventKey = (RaceId, Option<u32>);

/// Finalized results, keyed by race and stage, then by cyclist.
///
/// When several records exist for a cyclist in the same race or stage the
/// highest revision wins; on equal revisions the later record wins.
#[derive(Clone, Debug, Default)]
pub struct ResultIndex {
    by_event: HashMap<EventKey, HashMap<CyclistId, RaceResult>>,
}

impl ResultIndex {
    pub fn from_results<I>(results: I) -> Self
    where
        I: IntoIterator<Item = RaceResult>,
    {
        let mut by_event: HashMap<EventKey, HashMap<CyclistId, RaceResult>> = HashMap::new();
        for result in results {
            let by_cyclist = by_event
                .entry((result.race_id.clone(), result.stage_number))
                .or_default();
            match by_cyclist.get(&result.cyclist_id) {
                Some(existing) if existing.revision > result.revision => {}
                _ => {
                    by_cyclist.insert(result.cyclist_id.clone(), result);
                }
            }
        }
        ResultIndex { by_event }
    }

    /// Every result of one race or stage, keyed by cyclist.
    pub fn event(&self, race_id: &str, stage_number: Option<u32>) -> Option<&HashMap<CyclistId, RaceResult>> {
        self.by_event.get(&(race_id.to_string(), stage_number))
    }

    pub fn get(&self, race_id: &str, stage_number: Option<u32>, cyclist_id: &str) -> Option<&RaceResult> {
        self.event(race_id, stage_number)?.get(cyclist_id)
    }

    pub fn len(&self) -> usize {
        self.by_event.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<RaceResult> for ResultIndex {
    fn from_iter<I: IntoIterator<Item = RaceResult>>(iter: I) -> Self {
        ResultIndex::from_results(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoring_position_requires_finish() {
        let finished = RaceResult::new("r1", "c1", Some(3));
        assert_eq!(finished.scoring_position(), Some(3));

        let dnf = RaceResult::new("r1", "c1", Some(3)).with_status(ResultStatus::Dnf);
        assert_eq!(dnf.scoring_position(), None);

        let zero = RaceResult::new("r1", "c1", Some(0));
        assert_eq!(zero.scoring_position(), None);
    }

    #[test]
    fn test_position_label() {
        assert_eq!(RaceResult::new("r1", "c1", Some(1)).position_label(), "1º");
        assert_eq!(RaceResult::new("r1", "c1", None).position_label(), "DNP");
        assert_eq!(
            RaceResult::new("r1", "c1", None).with_status(ResultStatus::Dsq).position_label(),
            "DSQ"
        );
    }

    #[test]
    fn test_index_keeps_latest_revision() {
        let index = ResultIndex::from_results(vec![
            RaceResult::new("r1", "c1", Some(5)).with_revision(1),
            RaceResult::new("r1", "c1", Some(2)).with_revision(2),
            RaceResult::new("r1", "c1", Some(9)).with_revision(0),
            RaceResult::new("r1", "c2", Some(4)),
        ]);

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("r1", None, "c1").and_then(|r| r.position), Some(2));
        assert_eq!(index.get("r1", None, "c2").and_then(|r| r.position), Some(4));
        assert!(index.get("r1", None, "c3").is_none());
    }

    #[test]
    fn test_index_equal_revision_later_wins() {
        let index: ResultIndex = vec![
            RaceResult::new("r1", "c1", Some(5)),
            RaceResult::new("r1", "c1", Some(6)),
        ]
        .into_iter()
        .collect();
        assert_eq!(index.get("r1", None, "c1").and_then(|r| r.position), Some(6));
    }

    #[test]
    fn test_index_separates_races_and_stages() {
        let index = ResultIndex::from_results(vec![
            RaceResult::new("giro", "c1", Some(1)).with_stage(1),
            RaceResult::new("giro", "c1", Some(7)).with_stage(2).with_revision(3),
            RaceResult::new("tdf", "c1", Some(4)).with_stage(1),
            RaceResult::new("lbl", "c1", Some(2)),
        ]);

        assert_eq!(index.len(), 4);
        assert_eq!(index.get("giro", Some(1), "c1").and_then(|r| r.position), Some(1));
        assert_eq!(index.get("giro", Some(2), "c1").and_then(|r| r.position), Some(7));
        assert_eq!(index.get("tdf", Some(1), "c1").and_then(|r| r.position), Some(4));
        assert_eq!(index.get("lbl", None, "c1").and_then(|r| r.position), Some(2));
        assert!(index.get("lbl", Some(1), "c1").is_none());
        assert!(index.event("giro", Some(3)).is_none());
    }

    #[test]
    fn test_result_deserializes_with_defaults() {
        let json = r#"{"race_id":"r1","cyclist_id":"c1","position":4,"is_gc_leader":true}"#;
        let result: RaceResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.position, Some(4));
        assert_eq!(result.status, ResultStatus::Finished);
        assert_eq!(result.stage_number, None);
        assert!(result.is_gc_leader);
        assert_eq!(result.bonus_points, 0);
    }
}
