//! Mutable assignment bookkeeping shared by both strategies.
//!
//! All grids are flat arenas indexed by `(agent, day, slot)`. Every
//! [`Tracker::place`] returns the [`Placement`] needed to undo it, and
//! [`Tracker::unplace`] restores the tracker to exactly the prior state.

use crate::encode::TeachingUnit;
use crate::model::Problem;
use types::ScheduleBlock;

/// A placed unit together with what is needed to take it back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub group: usize,
    pub subject: usize,
    pub pair: usize,
    pub teacher: usize,
    pub day: usize,
    pub slot: usize,
    /// This placement bound `teacher` to the pair.
    pub committed: bool,
}

impl Placement {
    pub fn to_block(&self, problem: &Problem<'_>) -> ScheduleBlock {
        ScheduleBlock {
            group_id: problem.group(self.group).id.clone(),
            subject_id: problem.subject(self.subject).id.clone(),
            teacher_id: problem.teacher(self.teacher).id.clone(),
            day: problem.day(self.day),
            slot_id: problem.slot_id(self.slot).clone(),
            duration: 1,
            preceded_by_gap: false,
            is_contiguous: true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Tracker {
    days: usize,
    slots: usize,
    teacher_busy: Vec<bool>,
    group_busy: Vec<bool>,
    load: Vec<u32>,
    // per (pair, day): the at most two occupied slot indices
    day_slots: Vec<[Option<usize>; 2]>,
    committed: Vec<Option<usize>>,
}

impl Tracker {
    pub fn new(problem: &Problem<'_>, num_pairs: usize) -> Self {
        let (days, slots) = (problem.num_days(), problem.num_slots());
        Self {
            days,
            slots,
            teacher_busy: vec![false; problem.num_teachers() * days * slots],
            group_busy: vec![false; problem.num_groups() * days * slots],
            load: vec![0; problem.num_teachers()],
            day_slots: vec![[None, None]; num_pairs * days],
            committed: vec![None; num_pairs],
        }
    }

    #[inline]
    fn cell(&self, agent: usize, day: usize, slot: usize) -> usize {
        (agent * self.days + day) * self.slots + slot
    }

    #[inline]
    pub fn teacher_busy(&self, t: usize, day: usize, slot: usize) -> bool {
        self.teacher_busy[self.cell(t, day, slot)]
    }

    #[inline]
    pub fn group_busy(&self, g: usize, day: usize, slot: usize) -> bool {
        self.group_busy[self.cell(g, day, slot)]
    }

    #[inline]
    pub fn load(&self, t: usize) -> u32 {
        self.load[t]
    }

    #[inline]
    pub fn day_count(&self, pair: usize, day: usize) -> usize {
        self.day_slots[pair * self.days + day]
            .iter()
            .filter(|s| s.is_some())
            .count()
    }

    /// The slot already used by `pair` on `day`, if exactly one is.
    #[inline]
    pub fn lone_slot(&self, pair: usize, day: usize) -> Option<usize> {
        match self.day_slots[pair * self.days + day] {
            [Some(k), None] | [None, Some(k)] => Some(k),
            _ => None,
        }
    }

    #[inline]
    pub fn committed_teacher(&self, pair: usize) -> Option<usize> {
        self.committed[pair]
    }

    pub fn place(
        &mut self,
        unit: &TeachingUnit,
        day: usize,
        slot: usize,
        teacher: usize,
    ) -> Placement {
        let tc = self.cell(teacher, day, slot);
        let gc = self.cell(unit.group, day, slot);
        debug_assert!(!self.teacher_busy[tc] && !self.group_busy[gc]);
        self.teacher_busy[tc] = true;
        self.group_busy[gc] = true;
        self.load[teacher] += 1;

        let entry = &mut self.day_slots[unit.pair * self.days + day];
        match entry.iter_mut().find(|s| s.is_none()) {
            Some(free) => *free = Some(slot),
            None => debug_assert!(false, "daily cap exceeded for pair {}", unit.pair),
        }

        let committed = self.committed[unit.pair].is_none();
        if committed {
            self.committed[unit.pair] = Some(teacher);
        }

        Placement {
            group: unit.group,
            subject: unit.subject,
            pair: unit.pair,
            teacher,
            day,
            slot,
            committed,
        }
    }

    pub fn unplace(&mut self, p: Placement) {
        let tc = self.cell(p.teacher, p.day, p.slot);
        let gc = self.cell(p.group, p.day, p.slot);
        self.teacher_busy[tc] = false;
        self.group_busy[gc] = false;
        self.load[p.teacher] -= 1;

        let entry = &mut self.day_slots[p.pair * self.days + p.day];
        if let Some(s) = entry.iter_mut().find(|s| **s == Some(p.slot)) {
            *s = None;
        }

        if p.committed {
            self.committed[p.pair] = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode;
    use crate::fixtures::{fully_available, group, input, subject, teacher};

    #[test]
    fn place_then_unplace_restores_everything() {
        let inp = input(
            vec![subject("A", 1, 2)],
            vec![group("G1", 1)],
            vec![teacher("T1", &["A"], 15, fully_available())],
        );
        let p = Problem::new(&inp);
        let enc = encode(&p);
        let mut st = Tracker::new(&p, enc.pairs.len());
        let before = st.clone();

        let first = st.place(&enc.units[0], 1, 3, 0);
        assert!(first.committed);
        assert!(st.teacher_busy(0, 1, 3));
        assert!(st.group_busy(0, 1, 3));
        assert_eq!(st.load(0), 1);
        assert_eq!(st.day_count(0, 1), 1);
        assert_eq!(st.lone_slot(0, 1), Some(3));
        assert_eq!(st.committed_teacher(0), Some(0));

        let second = st.place(&enc.units[1], 1, 4, 0);
        assert!(!second.committed);
        assert_eq!(st.day_count(0, 1), 2);
        assert_eq!(st.lone_slot(0, 1), None);

        st.unplace(second);
        assert_eq!(st.lone_slot(0, 1), Some(3));
        assert_eq!(st.committed_teacher(0), Some(0));

        st.unplace(first);
        assert_eq!(st.load(0), 0);
        assert_eq!(st.committed_teacher(0), None);
        assert_eq!(st.day_slots, before.day_slots);
        assert_eq!(st.teacher_busy, before.teacher_busy);
        assert_eq!(st.group_busy, before.group_busy);
    }
}
