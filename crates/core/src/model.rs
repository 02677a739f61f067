//! Dense, index-based view of a [`SolverInput`].
//!
//! Ids are resolved once per solve so that the encoder, the state tracker and
//! the rules only ever deal with `usize` indices into flat arrays.

use std::collections::HashMap;
use types::{Availability, DayOfWeek, Group, SlotId, SolverInput, Subject, Teacher, TimeSlot};

pub struct Problem<'a> {
    pub input: &'a SolverInput,
    days: Vec<DayOfWeek>,
    slots: Vec<&'a TimeSlot>,
    competent: Vec<bool>,
    available: Vec<bool>,
}

impl<'a> Problem<'a> {
    pub fn new(input: &'a SolverInput) -> Self {
        let days = input.grid.days.clone();
        let slots: Vec<&TimeSlot> = input.grid.teaching_slots().collect();

        let mut subject_index: HashMap<&str, usize> = HashMap::new();
        for (i, s) in input.curriculum.iter().enumerate() {
            subject_index.entry(s.id.0.as_str()).or_insert(i);
        }

        let n_subjects = input.curriculum.len();
        let mut competent = vec![false; input.teachers.len() * n_subjects];
        for (t, teacher) in input.teachers.iter().enumerate() {
            for c in &teacher.competencies {
                if let Some(&s) = subject_index.get(c.0.as_str()) {
                    competent[t * n_subjects + s] = true;
                }
            }
        }

        let cells = days.len() * slots.len();
        let mut available = vec![false; input.teachers.len() * cells];
        for (t, teacher) in input.teachers.iter().enumerate() {
            for (d, &day) in days.iter().enumerate() {
                for (k, slot) in slots.iter().enumerate() {
                    available[t * cells + d * slots.len() + k] =
                        teacher.cell(day, &slot.id) == Availability::Available;
                }
            }
        }

        Self {
            input,
            days,
            slots,
            competent,
            available,
        }
    }

    pub fn num_days(&self) -> usize {
        self.days.len()
    }

    pub fn num_slots(&self) -> usize {
        self.slots.len()
    }

    pub fn num_teachers(&self) -> usize {
        self.input.teachers.len()
    }

    pub fn num_groups(&self) -> usize {
        self.input.groups.len()
    }

    pub fn num_subjects(&self) -> usize {
        self.input.curriculum.len()
    }

    pub fn day(&self, d: usize) -> DayOfWeek {
        self.days[d]
    }

    pub fn slot_id(&self, k: usize) -> &'a SlotId {
        &self.slots[k].id
    }

    pub fn teacher(&self, t: usize) -> &'a Teacher {
        &self.input.teachers[t]
    }

    pub fn group(&self, g: usize) -> &'a Group {
        &self.input.groups[g]
    }

    pub fn subject(&self, s: usize) -> &'a Subject {
        &self.input.curriculum[s]
    }

    pub fn max_hours(&self, t: usize) -> u32 {
        self.input.teachers[t].max_weekly_hours
    }

    pub fn is_competent(&self, t: usize, s: usize) -> bool {
        self.competent[t * self.num_subjects() + s]
    }

    pub fn is_available(&self, t: usize, d: usize, k: usize) -> bool {
        let cells = self.days.len() * self.slots.len();
        self.available[t * cells + d * self.slots.len() + k]
    }

    /// Whether teacher `t` has at least one `available` cell in the week.
    pub fn has_any_availability(&self, t: usize) -> bool {
        let cells = self.days.len() * self.slots.len();
        self.available[t * cells..(t + 1) * cells].iter().any(|&a| a)
    }

    /// Teachers able to teach subject `s`, in input order.
    pub fn competent_teachers(&self, s: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.num_teachers()).filter(move |&t| self.is_competent(t, s))
    }

    /// Subjects taught to group `g`, in curriculum order.
    pub fn subjects_of(&self, g: usize) -> impl Iterator<Item = usize> + '_ {
        let term = self.input.groups[g].term;
        (0..self.num_subjects()).filter(move |&s| self.input.curriculum[s].term == term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{fully_available, input, subject, teacher};
    use types::Group;

    #[test]
    fn breaks_are_not_teaching_slots() {
        let inp = input(vec![], vec![], vec![]);
        let p = Problem::new(&inp);
        assert_eq!(p.num_days(), 5);
        assert_eq!(p.num_slots(), 9);
        assert_eq!(p.slot_id(3).0, "s4");
        assert_eq!(p.slot_id(4).0, "s5");
    }

    #[test]
    fn availability_only_counts_available_cells() {
        let mut t = teacher("T1", &["M1"], 10, fully_available());
        t.availability
            .get_mut(&DayOfWeek::Mon)
            .unwrap()
            .insert(SlotId::from("s1"), Availability::Blocked);
        t.availability
            .get_mut(&DayOfWeek::Mon)
            .unwrap()
            .remove(&SlotId::from("s2"));
        let inp = input(vec![subject("M1", 1, 2)], vec![], vec![t]);
        let p = Problem::new(&inp);
        assert!(!p.is_available(0, 0, 0));
        assert!(!p.is_available(0, 0, 1));
        assert!(p.is_available(0, 0, 2));
        assert!(p.has_any_availability(0));
    }

    #[test]
    fn competency_resolves_known_subjects_only() {
        let inp = input(
            vec![subject("M1", 1, 2), subject("M2", 1, 2)],
            vec![Group {
                id: "G1".into(),
                term: 1,
                shift: Default::default(),
                name: None,
            }],
            vec![teacher("T1", &["M2", "X9"], 10, fully_available())],
        );
        let p = Problem::new(&inp);
        assert!(!p.is_competent(0, 0));
        assert!(p.is_competent(0, 1));
        assert_eq!(p.competent_teachers(1).collect::<Vec<_>>(), vec![0]);
        assert_eq!(p.subjects_of(0).collect::<Vec<_>>(), vec![0, 1]);
    }
}
