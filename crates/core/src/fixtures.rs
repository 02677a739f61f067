//! Small builders for hand-written instances, used by tests and by
//! [`crate::generate`]. Not part of the solving path.

use std::collections::BTreeMap;
use types::{
    Availability, AvailabilityMatrix, DayOfWeek, Group, Shift, SolverInput, Subject, Teacher,
    TimeGrid,
};

pub fn subject(id: &str, term: u32, weekly_hours: u32) -> Subject {
    Subject {
        id: id.into(),
        term,
        weekly_hours,
        name: None,
        color: None,
    }
}

pub fn group(id: &str, term: u32) -> Group {
    Group {
        id: id.into(),
        term,
        shift: Shift::Morning,
        name: None,
    }
}

pub fn teacher(
    id: &str,
    competencies: &[&str],
    max_weekly_hours: u32,
    availability: AvailabilityMatrix,
) -> Teacher {
    Teacher {
        id: id.into(),
        name: None,
        competencies: competencies.iter().map(|&c| c.into()).collect(),
        max_weekly_hours,
        availability,
    }
}

/// Every teaching cell of the standard grid set to `state`.
pub fn uniform(state: Availability) -> AvailabilityMatrix {
    let grid = TimeGrid::standard();
    grid.days
        .iter()
        .map(|&day| {
            let cells: BTreeMap<_, _> = grid
                .teaching_slots()
                .map(|s| (s.id.clone(), state))
                .collect();
            (day, cells)
        })
        .collect()
}

pub fn fully_available() -> AvailabilityMatrix {
    uniform(Availability::Available)
}

pub fn fully_blocked() -> AvailabilityMatrix {
    uniform(Availability::Blocked)
}

/// Available only on `days`; every other cell left unset.
pub fn available_on(days: &[DayOfWeek]) -> AvailabilityMatrix {
    let mut m = fully_available();
    m.retain(|d, _| days.contains(d));
    m
}

/// Available exactly at the listed `(day, slot)` cells; everything else unset.
pub fn available_at(cells: &[(DayOfWeek, &str)]) -> AvailabilityMatrix {
    let mut m = AvailabilityMatrix::new();
    for &(day, slot) in cells {
        m.entry(day)
            .or_default()
            .insert(slot.into(), Availability::Available);
    }
    m
}

pub fn input(curriculum: Vec<Subject>, groups: Vec<Group>, teachers: Vec<Teacher>) -> SolverInput {
    SolverInput {
        curriculum,
        groups,
        teachers,
        grid: TimeGrid::standard(),
        meta: None,
    }
}
