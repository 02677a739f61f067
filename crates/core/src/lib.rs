pub mod encode;
pub mod fixtures;
pub mod generate;
pub mod model;
pub mod outcome;
pub mod rules;
pub mod scoring;
pub mod state;
pub mod stop;
pub mod verify;

use async_trait::async_trait;
use std::collections::HashSet;
use thiserror::Error;

pub use encode::{encode, Encoding, TeachingUnit};
pub use model::Problem;
pub use outcome::{Diagnostic, Outcome, RunReport};
pub use state::{Placement, Tracker};
pub use stop::{Budget, StopToken};
pub use types::{
    Algorithm, GroupSchedule, ScheduleBlock, SolveEnvelope, SolveParams, SolveStatus,
    SolverInput, SolverOutput,
};

pub const MAX_WEEKLY_HOURS_PER_SUBJECT: u32 = 12;
pub const MAX_WEEKLY_HOURS_PER_TEACHER: u32 = 15;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid input: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

pub fn validate(inp: &SolverInput) -> Result<(), ValidationError> {
    let mut errors: Vec<String> = Vec::new();
    let grid = &inp.grid;

    if grid.days.is_empty() {
        errors.push("grid has no days".into());
    }
    if grid.teaching_slots().next().is_none() {
        errors.push("grid has no teaching slots".into());
    }

    fn chk_unique<I: ToString>(name: &str, ids: impl Iterator<Item = I>, errors: &mut Vec<String>) {
        let mut seen = HashSet::new();
        for id in ids {
            let s = id.to_string();
            if !seen.insert(s.clone()) {
                errors.push(format!("duplicate {name} id: {s}"));
            }
        }
    }
    chk_unique("subject", inp.curriculum.iter().map(|x| &x.id.0), &mut errors);
    chk_unique("group", inp.groups.iter().map(|x| &x.id.0), &mut errors);
    chk_unique("teacher", inp.teachers.iter().map(|x| &x.id.0), &mut errors);
    chk_unique("slot", grid.slots.iter().map(|x| &x.id.0), &mut errors);
    chk_unique("day", grid.days.iter(), &mut errors);

    for s in &inp.curriculum {
        if s.term < 1 {
            errors.push(format!("subject {} has term 0", s.id));
        }
        if !(1..=MAX_WEEKLY_HOURS_PER_SUBJECT).contains(&s.weekly_hours) {
            errors.push(format!(
                "subject {} has weeklyHours={} (allowed 1..={MAX_WEEKLY_HOURS_PER_SUBJECT})",
                s.id, s.weekly_hours
            ));
        }
    }
    for g in &inp.groups {
        if g.term < 1 {
            errors.push(format!("group {} has term 0", g.id));
        }
    }

    let subjects: HashSet<_> = inp.curriculum.iter().map(|s| &s.id.0).collect();
    for t in &inp.teachers {
        if !(1..=MAX_WEEKLY_HOURS_PER_TEACHER).contains(&t.max_weekly_hours) {
            errors.push(format!(
                "teacher {} has maxWeeklyHours={} (allowed 1..={MAX_WEEKLY_HOURS_PER_TEACHER})",
                t.id, t.max_weekly_hours
            ));
        }
        for c in &t.competencies {
            if !subjects.contains(&c.0) {
                errors.push(format!("teacher {} lists unknown subject {}", t.id, c));
            }
        }
        for (day, cells) in &t.availability {
            if !grid.days.contains(day) {
                errors.push(format!(
                    "teacher {} has availability for day {day} outside the grid",
                    t.id
                ));
            }
            for slot in cells.keys() {
                match grid.slots.iter().find(|s| &s.id == slot) {
                    None => errors.push(format!(
                        "teacher {} has availability for unknown slot {day}.{slot}",
                        t.id
                    )),
                    Some(s) if s.is_break => {
                        // recess cells are accepted but ignored unless marked available
                        if cells[slot] == types::Availability::Available {
                            errors.push(format!(
                                "teacher {} marks break slot {day}.{slot} available",
                                t.id
                            ));
                        }
                    }
                    Some(_) => {}
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Invalid(errors))
    }
}

#[async_trait]
pub trait Solver: Send + Sync + 'static {
    async fn solve(&self, env: SolveEnvelope) -> anyhow::Result<SolverOutput>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixtures::{fully_available, group, input, subject, teacher};
    use types::{Availability, DayOfWeek, SlotId};

    #[test]
    fn accepts_well_formed_input() {
        let inp = input(
            vec![subject("A", 1, 4)],
            vec![group("G1", 1)],
            vec![teacher("T1", &["A"], 15, fully_available())],
        );
        assert!(validate(&inp).is_ok());
    }

    #[test]
    fn collects_every_problem() {
        let mut t = teacher("T1", &["A", "Nope"], 16, fully_available());
        t.availability
            .entry(DayOfWeek::Fri)
            .or_default()
            .insert(SlotId::from("s42"), Availability::Available);
        let inp = input(
            vec![subject("A", 1, 0), subject("A", 1, 13)],
            vec![group("G1", 0)],
            vec![t],
        );
        let ValidationError::Invalid(errs) = validate(&inp).unwrap_err();
        assert!(errs.contains(&"duplicate subject id: A".to_string()));
        assert!(errs.iter().any(|e| e.contains("weeklyHours=0")));
        assert!(errs.iter().any(|e| e.contains("weeklyHours=13")));
        assert!(errs.iter().any(|e| e.contains("group G1 has term 0")));
        assert!(errs.iter().any(|e| e.contains("maxWeeklyHours=16")));
        assert!(errs.iter().any(|e| e.contains("unknown subject Nope")));
        assert!(errs.iter().any(|e| e.contains("unknown slot fri.s42")));
    }

    #[test]
    fn repeated_grid_day_is_rejected() {
        let mut inp = input(
            vec![subject("A", 1, 2)],
            vec![group("G1", 1), group("G2", 1)],
            vec![teacher("T1", &["A"], 15, fully_available())],
        );
        inp.grid.days = vec![DayOfWeek::Mon, DayOfWeek::Mon];
        let ValidationError::Invalid(errs) = validate(&inp).unwrap_err();
        assert!(errs.contains(&"duplicate day id: mon".to_string()));
        // fully_available() also covers tue..fri, none of which the grid has
        assert!(errs
            .iter()
            .any(|e| e == "teacher T1 has availability for day tue outside the grid"));
    }
}
