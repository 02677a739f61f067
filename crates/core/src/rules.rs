//! Hard constraints on a single candidate placement.
//!
//! Checks run cheapest and most discriminating first and stop at the first
//! failure; [`check`] reports which one.

use crate::encode::TeachingUnit;
use crate::model::Problem;
use crate::state::Tracker;

/// Most hours a (group, subject) pair may have on one day.
pub const MAX_DAILY_HOURS: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    Competency,
    Availability,
    TeacherBusy,
    GroupBusy,
    TeacherLoad,
    DailyCap,
    Contiguity,
}

pub fn check(
    problem: &Problem<'_>,
    state: &Tracker,
    unit: &TeachingUnit,
    day: usize,
    slot: usize,
    teacher: usize,
) -> Result<(), Rule> {
    if !problem.is_competent(teacher, unit.subject) {
        return Err(Rule::Competency);
    }
    if !problem.is_available(teacher, day, slot) {
        return Err(Rule::Availability);
    }
    if state.teacher_busy(teacher, day, slot) {
        return Err(Rule::TeacherBusy);
    }
    if state.group_busy(unit.group, day, slot) {
        return Err(Rule::GroupBusy);
    }
    if state.load(teacher) >= problem.max_hours(teacher) {
        return Err(Rule::TeacherLoad);
    }
    if state.day_count(unit.pair, day) >= MAX_DAILY_HOURS {
        return Err(Rule::DailyCap);
    }
    if let Some(existing) = state.lone_slot(unit.pair, day) {
        if existing.abs_diff(slot) != 1 {
            return Err(Rule::Contiguity);
        }
    }
    Ok(())
}

#[inline]
pub fn admits(
    problem: &Problem<'_>,
    state: &Tracker,
    unit: &TeachingUnit,
    day: usize,
    slot: usize,
    teacher: usize,
) -> bool {
    check(problem, state, unit, day, slot, teacher).is_ok()
}
