//! Independent re-check of a produced schedule against its input.
//!
//! Nothing here trusts the tracker: every hard constraint is recomputed from
//! the output blocks alone, so the check also covers hand-edited schedules.

use crate::rules::MAX_DAILY_HOURS;
use std::collections::{HashMap, HashSet};
use types::{Availability, SolveStatus, SolverInput, SolverOutput};

pub fn verify(input: &SolverInput, output: &SolverOutput) -> Vec<String> {
    let mut errors: Vec<String> = Vec::new();
    let grid = &input.grid;

    let teachers: HashMap<&str, _> = input.teachers.iter().map(|t| (t.id.0.as_str(), t)).collect();
    let subjects: HashMap<&str, _> = input
        .curriculum
        .iter()
        .map(|s| (s.id.0.as_str(), s))
        .collect();

    let mut teacher_cells = HashSet::new();
    let mut group_cells = HashSet::new();
    let mut load: HashMap<&str, u32> = HashMap::new();
    let mut binding: HashMap<(&str, &str), &str> = HashMap::new();
    let mut per_day: HashMap<(&str, &str, _), Vec<usize>> = HashMap::new();
    let mut placed: HashMap<(&str, &str), u32> = HashMap::new();

    for b in output.schedules.iter().flat_map(|s| &s.blocks) {
        let (g, s, t) = (b.group_id.0.as_str(), b.subject_id.0.as_str(), b.teacher_id.0.as_str());
        let Some(k) = grid.slot_index(&b.slot_id) else {
            errors.push(format!("{g}/{s} placed on non-teaching slot {}", b.slot_id));
            continue;
        };
        if !teacher_cells.insert((t, b.day, k)) {
            errors.push(format!("teacher {t} double-booked at {} {}", b.day, b.slot_id));
        }
        if !group_cells.insert((g, b.day, k)) {
            errors.push(format!("group {g} double-booked at {} {}", b.day, b.slot_id));
        }
        *load.entry(t).or_default() += 1;
        *placed.entry((g, s)).or_default() += 1;
        per_day.entry((g, s, b.day)).or_default().push(k);

        match binding.get(&(g, s)) {
            Some(&bound) if bound != t => {
                errors.push(format!("{g}/{s} taught by both {bound} and {t}"));
            }
            Some(_) => {}
            None => {
                binding.insert((g, s), t);
            }
        }

        match teachers.get(t) {
            None => errors.push(format!("unknown teacher {t}")),
            Some(teacher) => {
                if !teacher.competencies.iter().any(|c| c.0 == s) {
                    errors.push(format!("teacher {t} lacks competency for {s}"));
                }
                if teacher.cell(b.day, &b.slot_id) != Availability::Available {
                    errors.push(format!(
                        "teacher {t} not available at {} {}",
                        b.day, b.slot_id
                    ));
                }
            }
        }
    }

    for (t, n) in &load {
        if let Some(teacher) = teachers.get(t) {
            if *n > teacher.max_weekly_hours {
                errors.push(format!(
                    "teacher {t} assigned {n} hours, max {}",
                    teacher.max_weekly_hours
                ));
            }
        }
    }

    for ((g, s, day), slots) in &per_day {
        if slots.len() > MAX_DAILY_HOURS {
            errors.push(format!("{g}/{s} has {} hours on {day}", slots.len()));
        } else if let [a, b] = slots.as_slice() {
            if a.abs_diff(*b) != 1 {
                errors.push(format!("{g}/{s} split on {day}"));
            }
        }
    }

    for group in &input.groups {
        for subject in input.subjects_for(group) {
            let got = placed
                .get(&(group.id.0.as_str(), subject.id.0.as_str()))
                .copied()
                .unwrap_or(0);
            if got > subject.weekly_hours {
                errors.push(format!(
                    "{}/{} over-assigned: {got} of {}",
                    group.id, subject.id, subject.weekly_hours
                ));
            }
            if got >= subject.weekly_hours {
                continue;
            }
            match output.status {
                SolveStatus::Ok => errors.push(format!(
                    "status ok but {}/{} has {got} of {} hours",
                    group.id, subject.id, subject.weekly_hours
                )),
                SolveStatus::Infeasible => {
                    let unstaffed =
                        format!("no teacher with competency for {}", subject.display_name());
                    let short = format!(
                        " of {} to group {}",
                        subject.display_name(),
                        group.display_name()
                    );
                    if !output
                        .warnings
                        .iter()
                        .any(|w| *w == unstaffed || w.ends_with(&short))
                    {
                        errors.push(format!(
                            "{}/{} short by {} hours without a warning",
                            group.id,
                            subject.id,
                            subject.weekly_hours - got
                        ));
                    }
                }
                SolveStatus::Error => {}
            }
        }
    }

    for b in output.schedules.iter().flat_map(|s| &s.blocks) {
        if !subjects.contains_key(b.subject_id.0.as_str()) {
            errors.push(format!("unknown subject {}", b.subject_id));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{fully_available, group, input, subject, teacher};
    use types::{DayOfWeek, GroupSchedule, Metrics, ScheduleBlock, Summary};

    fn block(day: DayOfWeek, slot: &str, t: &str) -> ScheduleBlock {
        ScheduleBlock {
            group_id: "G1".into(),
            subject_id: "A".into(),
            teacher_id: t.into(),
            day,
            slot_id: slot.into(),
            duration: 1,
            preceded_by_gap: false,
            is_contiguous: true,
        }
    }

    fn output(status: SolveStatus, blocks: Vec<ScheduleBlock>) -> SolverOutput {
        SolverOutput {
            status,
            schedules: vec![GroupSchedule {
                group_id: "G1".into(),
                blocks,
                metrics: Metrics::default(),
            }],
            summary: Summary::default(),
            warnings: vec![],
            advisories: vec![],
            stats: serde_json::Value::Null,
        }
    }

    #[test]
    fn accepts_a_clean_schedule() {
        let inp = input(
            vec![subject("A", 1, 2)],
            vec![group("G1", 1)],
            vec![teacher("T1", &["A"], 15, fully_available())],
        );
        let out = output(
            SolveStatus::Ok,
            vec![block(DayOfWeek::Mon, "s4", "T1"), block(DayOfWeek::Mon, "s5", "T1")],
        );
        assert!(verify(&inp, &out).is_empty());
    }

    #[test]
    fn flags_split_day_mixed_teachers_and_missing_hours() {
        let inp = input(
            vec![subject("A", 1, 3)],
            vec![group("G1", 1)],
            vec![
                teacher("T1", &["A"], 15, fully_available()),
                teacher("T2", &["A"], 15, fully_available()),
            ],
        );
        let out = output(
            SolveStatus::Ok,
            vec![block(DayOfWeek::Mon, "s1", "T1"), block(DayOfWeek::Mon, "s3", "T2")],
        );
        let errs = verify(&inp, &out);
        assert!(errs.iter().any(|e| e.contains("taught by both")));
        assert!(errs.iter().any(|e| e.contains("split on mon")));
        assert!(errs.iter().any(|e| e.contains("status ok but")));
    }

    #[test]
    fn shortfall_needs_a_warning_for_that_group() {
        let inp = input(
            vec![subject("A", 1, 2)],
            vec![group("G1", 1), group("G2", 1)],
            vec![teacher("T1", &["A"], 15, fully_available())],
        );
        let mut out = output(SolveStatus::Infeasible, vec![]);
        out.schedules.push(GroupSchedule {
            group_id: "G2".into(),
            blocks: vec![],
            metrics: Metrics::default(),
        });
        out.warnings = vec!["could not assign 2 hours of A to group G1".into()];
        let errs = verify(&inp, &out);
        assert_eq!(errs, vec!["G2/A short by 2 hours without a warning"]);

        out.warnings
            .push("could not assign 2 hours of A to group G2".into());
        assert!(verify(&inp, &out).is_empty());

        out.warnings = vec!["no teacher with competency for A".into()];
        assert!(verify(&inp, &out).is_empty());
    }
}
