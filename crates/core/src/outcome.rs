//! Diagnostics, the tagged solve outcome, and assembly of [`SolverOutput`].

use crate::encode::Encoding;
use crate::model::Problem;
use crate::scoring;
use crate::state::Placement;
use crate::ValidationError;
use std::fmt;
use std::time::Duration;
use types::{GroupId, ScheduleBlock, SolveStatus, SolverOutput, Summary};

/// One unmet requirement. Rendered through `Display` as a warning line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    NoCompetentTeacher {
        subject: String,
        groups: Vec<GroupId>,
    },
    Unassigned {
        group: GroupId,
        group_name: String,
        subject: String,
        missing: u32,
    },
}

impl Diagnostic {
    pub fn no_competent_teacher(problem: &Problem<'_>, s: usize, groups: &[usize]) -> Self {
        Diagnostic::NoCompetentTeacher {
            subject: problem.subject(s).display_name().to_string(),
            groups: groups.iter().map(|&g| problem.group(g).id.clone()).collect(),
        }
    }

    pub fn unassigned(problem: &Problem<'_>, g: usize, s: usize, missing: u32) -> Self {
        let group = problem.group(g);
        Diagnostic::Unassigned {
            group: group.id.clone(),
            group_name: group.display_name().to_string(),
            subject: problem.subject(s).display_name().to_string(),
            missing,
        }
    }

    /// Groups this diagnostic counts against.
    pub fn groups(&self) -> &[GroupId] {
        match self {
            Diagnostic::NoCompetentTeacher { groups, .. } => groups,
            Diagnostic::Unassigned { group, .. } => std::slice::from_ref(group),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NoCompetentTeacher { subject, .. } => {
                write!(f, "no teacher with competency for {subject}")
            }
            Diagnostic::Unassigned {
                group_name,
                subject,
                missing,
                ..
            } => {
                let unit = if *missing == 1 { "hour" } else { "hours" };
                write!(
                    f,
                    "could not assign {missing} {unit} of {subject} to group {group_name}"
                )
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Solved,
    Partial { reasons: Vec<String> },
    Rejected { reason: String },
}

impl Outcome {
    pub fn from_diagnostics(diagnostics: &[Diagnostic]) -> Self {
        if diagnostics.is_empty() {
            Outcome::Solved
        } else {
            Outcome::Partial {
                reasons: diagnostics.iter().map(ToString::to_string).collect(),
            }
        }
    }

    pub fn status(&self) -> SolveStatus {
        match self {
            Outcome::Solved => SolveStatus::Ok,
            Outcome::Partial { .. } => SolveStatus::Infeasible,
            Outcome::Rejected { .. } => SolveStatus::Error,
        }
    }
}

/// Diagnostics for every schedulable pair left short by `placements`, in
/// encoding order.
pub fn shortfall(
    problem: &Problem<'_>,
    encoding: &Encoding,
    placements: &[Placement],
) -> Vec<Diagnostic> {
    let mut placed = vec![0u32; encoding.pairs.len()];
    for p in placements {
        placed[p.pair] += 1;
    }
    encoding
        .pairs
        .iter()
        .zip(placed)
        .filter(|(pair, n)| pair.schedulable && *n < pair.hours)
        .map(|(pair, n)| Diagnostic::unassigned(problem, pair.group, pair.subject, pair.hours - n))
        .collect()
}

/// What a strategy hands back once it has stopped placing units.
pub struct RunReport {
    pub blocks: Vec<ScheduleBlock>,
    pub diagnostics: Vec<Diagnostic>,
    pub message: String,
    pub elapsed: Duration,
    pub stats: serde_json::Value,
    pub min_daily_classes: Option<u32>,
}

pub fn assemble(problem: &Problem<'_>, run: RunReport) -> SolverOutput {
    let outcome = Outcome::from_diagnostics(&run.diagnostics);
    let warnings = match &outcome {
        Outcome::Partial { reasons } => reasons.clone(),
        Outcome::Solved | Outcome::Rejected { .. } => Vec::new(),
    };

    let grid = &problem.input.grid;
    let mut by_group: Vec<Vec<ScheduleBlock>> = vec![Vec::new(); problem.num_groups()];
    let group_pos = |id: &GroupId| problem.input.groups.iter().position(|g| &g.id == id);
    for b in run.blocks {
        if let Some(g) = group_pos(&b.group_id) {
            by_group[g].push(b);
        }
    }

    let mut advisories = Vec::new();
    let schedules: Vec<_> = by_group
        .into_iter()
        .enumerate()
        .map(|(g, blocks)| {
            let group = problem.group(g);
            let hard = run
                .diagnostics
                .iter()
                .filter(|d| d.groups().contains(&group.id))
                .count() as u32;
            if let Some(min) = run.min_daily_classes {
                for &day in &grid.days {
                    let n = blocks.iter().filter(|b| b.day == day).count() as u32;
                    if n > 0 && n < min {
                        advisories.push(format!(
                            "group {} has only {n} classes on {day} (recommended minimum: {min})",
                            group.display_name()
                        ));
                    }
                }
            }
            scoring::group_schedule(grid, group.id.clone(), blocks, hard)
        })
        .collect();

    let total_gaps: u32 = schedules.iter().map(|s| s.metrics.gaps).sum();
    let avg_gaps = total_gaps as f64 / schedules.len().max(1) as f64;

    SolverOutput {
        status: outcome.status(),
        summary: Summary {
            message: run.message,
            elapsed_ms: run.elapsed.as_millis() as u64,
            hard_violations: warnings.len() as u32,
            avg_gaps,
        },
        schedules,
        warnings,
        advisories,
        stats: run.stats,
    }
}

/// Output for input that failed structural validation; no engine ran.
pub fn rejected(err: &ValidationError, elapsed: Duration) -> SolverOutput {
    let ValidationError::Invalid(errors) = err;
    let outcome = Outcome::Rejected {
        reason: err.to_string(),
    };
    SolverOutput {
        status: outcome.status(),
        schedules: vec![],
        summary: Summary {
            message: err.to_string(),
            elapsed_ms: elapsed.as_millis() as u64,
            hard_violations: 0,
            avg_gaps: 0.0,
        },
        warnings: errors.clone(),
        advisories: vec![],
        stats: serde_json::json!({"method": "validate"}),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{fully_available, group, input, subject, teacher};

    #[test]
    fn unassigned_message_pluralizes() {
        let inp = input(
            vec![subject("Redes", 1, 3)],
            vec![group("ITI-1A", 1)],
            vec![],
        );
        let p = Problem::new(&inp);
        assert_eq!(
            Diagnostic::unassigned(&p, 0, 0, 1).to_string(),
            "could not assign 1 hour of Redes to group ITI-1A"
        );
        assert_eq!(
            Diagnostic::unassigned(&p, 0, 0, 2).to_string(),
            "could not assign 2 hours of Redes to group ITI-1A"
        );
    }

    #[test]
    fn outcome_maps_to_status() {
        assert_eq!(Outcome::from_diagnostics(&[]).status(), SolveStatus::Ok);
        let d = Diagnostic::NoCompetentTeacher {
            subject: "X".into(),
            groups: vec![],
        };
        match Outcome::from_diagnostics(&[d]) {
            Outcome::Partial { reasons } => {
                assert_eq!(reasons, vec!["no teacher with competency for X"])
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn assemble_counts_violations_per_group_and_advises() {
        let inp = input(
            vec![subject("A", 1, 1)],
            vec![group("G1", 1), group("G2", 1)],
            vec![teacher("T1", &["A"], 15, fully_available())],
        );
        let p = Problem::new(&inp);
        let block = ScheduleBlock {
            group_id: "G1".into(),
            subject_id: "A".into(),
            teacher_id: "T1".into(),
            day: types::DayOfWeek::Mon,
            slot_id: "s1".into(),
            duration: 1,
            preceded_by_gap: false,
            is_contiguous: true,
        };
        let out = assemble(
            &p,
            RunReport {
                blocks: vec![block],
                diagnostics: vec![Diagnostic::unassigned(&p, 1, 0, 1)],
                message: "partial".into(),
                elapsed: Duration::from_millis(3),
                stats: serde_json::json!({}),
                min_daily_classes: Some(6),
            },
        );
        assert_eq!(out.status, SolveStatus::Infeasible);
        assert_eq!(out.schedules.len(), 2);
        assert_eq!(out.schedules[0].metrics.hard_violations, 0);
        assert_eq!(out.schedules[1].metrics.hard_violations, 1);
        assert_eq!(out.summary.hard_violations, 1);
        assert_eq!(out.advisories.len(), 1);
        assert!(out.advisories[0].contains("only 1 classes on mon"));
    }
}
