//! Python bindings for the pure scoring and prize functions.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::captaincy::{apply_captaincy, CaptainRole};
use crate::constants::{
    ACTIVE_CYCLISTS, GC_FINAL_BONUS_POOL, INITIAL_BUDGET, ONE_DAY_PRIZE_POOL, RULES_VERSION,
    STAGE_PRIZE_POOL, TEAM_SIZE,
};
use crate::race::RaceKind;

fn parse_kind(kind: &str) -> PyResult<RaceKind> {
    match kind {
        "ONE_DAY" => Ok(RaceKind::OneDay),
        "STAGE_RACE" => Ok(RaceKind::StageRace),
        "GRAND_TOUR" => Ok(RaceKind::GrandTour),
        other => Err(PyValueError::new_err(format!("Unknown race kind: {}", other))),
    }
}

fn parse_role(role: &str) -> PyResult<CaptainRole> {
    match role {
        "NONE" => Ok(CaptainRole::None),
        "CAPTAIN" => Ok(CaptainRole::Captain),
        "TRIPLE_CAPTAIN" => Ok(CaptainRole::TripleCaptain),
        other => Err(PyValueError::new_err(format!("Unknown captain role: {}", other))),
    }
}

/// Base points for a finishing position.
#[pyfunction]
#[pyo3(signature = (position, race_kind = "ONE_DAY"))]
fn base_points(position: Option<i32>, race_kind: &str) -> PyResult<i32> {
    Ok(crate::scoring_table::base_points(position, parse_kind(race_kind)?))
}

/// Grand Tour final classification bonus.
#[pyfunction]
#[pyo3(signature = (position))]
fn final_gc_bonus(position: Option<i32>) -> i32 {
    crate::scoring_table::final_gc_bonus(position)
}

#[pyfunction]
#[pyo3(signature = (gc = false, mountains = false, points = false, young = false))]
fn jersey_bonus(gc: bool, mountains: bool, points: bool, young: bool) -> i32 {
    crate::jersey::jersey_bonus(gc, mountains, points, young)
}

/// Apply the captaincy multiplier ("NONE", "CAPTAIN" or "TRIPLE_CAPTAIN").
#[pyfunction]
#[pyo3(name = "apply_captaincy", signature = (points, role = "NONE"))]
fn apply_captain(points: i32, role: &str) -> PyResult<i32> {
    Ok(apply_captaincy(points, parse_role(role)?))
}

#[pyfunction]
fn eligible_positions(total_participants: i32) -> i32 {
    crate::prize::eligible_positions(total_participants)
}

/// Proportional prize pool earning for a league position.
#[pyfunction]
#[pyo3(signature = (position, total_participants, pool = ONE_DAY_PRIZE_POOL))]
fn earning(position: Option<i32>, total_participants: i32, pool: f64) -> f64 {
    crate::prize::earning(position, total_participants, pool)
}

#[pyfunction]
#[pyo3(signature = (position, total_participants, race_kind, is_gc_final = false))]
fn budget_earning(
    position: Option<i32>,
    total_participants: i32,
    race_kind: &str,
    is_gc_final: bool,
) -> PyResult<f64> {
    Ok(crate::prize::budget_earning(
        position,
        total_participants,
        parse_kind(race_kind)?,
        is_gc_final,
    ))
}

#[pyfunction]
fn preview_distribution(total_participants: i32, pool: f64) -> Vec<(i32, f64)> {
    crate::prize::preview_distribution(total_participants, pool)
}

#[pyfunction]
#[pyo3(signature = (current_budget, earning, expense = 0.0))]
fn calculate_new_budget(current_budget: f64, earning: f64, expense: f64) -> f64 {
    crate::prize::calculate_new_budget(current_budget, earning, expense)
}

/// Python module definition
#[pymodule]
fn peloton_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Points
    m.add_function(wrap_pyfunction!(base_points, m)?)?;
    m.add_function(wrap_pyfunction!(final_gc_bonus, m)?)?;
    m.add_function(wrap_pyfunction!(jersey_bonus, m)?)?;
    m.add_function(wrap_pyfunction!(apply_captain, m)?)?;

    // Prize pool and budget
    m.add_function(wrap_pyfunction!(eligible_positions, m)?)?;
    m.add_function(wrap_pyfunction!(earning, m)?)?;
    m.add_function(wrap_pyfunction!(budget_earning, m)?)?;
    m.add_function(wrap_pyfunction!(preview_distribution, m)?)?;
    m.add_function(wrap_pyfunction!(calculate_new_budget, m)?)?;

    // Constants
    m.add("RULES_VERSION", RULES_VERSION)?;
    m.add("ONE_DAY_PRIZE_POOL", ONE_DAY_PRIZE_POOL)?;
    m.add("STAGE_PRIZE_POOL", STAGE_PRIZE_POOL)?;
    m.add("GC_FINAL_BONUS_POOL", GC_FINAL_BONUS_POOL)?;
    m.add("INITIAL_BUDGET", INITIAL_BUDGET)?;
    m.add("TEAM_SIZE", TEAM_SIZE)?;
    m.add("ACTIVE_CYCLISTS", ACTIVE_CYCLISTS)?;

    Ok(())
}
