use async_trait::async_trait;
use sched_core::encode::Encoding;
use sched_core::outcome::{self, RunReport};
use sched_core::{
    encode, rules, validate, Budget, Placement, Problem, SolveEnvelope, SolveParams, Solver,
    SolverInput, SolverOutput, TeachingUnit, Tracker,
};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Single-pass fill: one subject at a time, never revisiting an earlier
/// placement. Fast, but may leave hours unassigned on feasible input.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedySolver;

struct Fill {
    placements: Vec<Placement>,
    passes: u64,
    stopped: bool,
}

/// Committed teacher if the pair has one, else the least-loaded competent
/// teacher the rules accept at this cell.
fn pick_teacher(
    problem: &Problem<'_>,
    state: &Tracker,
    unit: &TeachingUnit,
    day: usize,
    slot: usize,
) -> Option<usize> {
    if let Some(t) = state.committed_teacher(unit.pair) {
        return rules::admits(problem, state, unit, day, slot, t).then_some(t);
    }
    let mut teachers: Vec<usize> = problem.competent_teachers(unit.subject).collect();
    teachers.sort_by_key(|&t| state.load(t));
    teachers
        .into_iter()
        .find(|&t| rules::admits(problem, state, unit, day, slot, t))
}

fn fill(problem: &Problem<'_>, enc: &Encoding, state: &mut Tracker, budget: &Budget) -> Fill {
    let (days, slots) = (problem.num_days(), problem.num_slots());
    let mut placements = Vec::with_capacity(enc.units.len());
    let mut passes = 0u64;
    let mut stopped = false;
    let mut first_unit = 0usize;

    for (idx, pair) in enc.pairs.iter().enumerate() {
        // position of this subject within its group, spreads start days
        let offset = enc.pairs[..idx]
            .iter()
            .rev()
            .take_while(|p| p.group == pair.group)
            .count();
        if !pair.schedulable {
            continue;
        }
        let units = &enc.units[first_unit..first_unit + pair.hours as usize];
        first_unit += units.len();

        if budget.exhausted() {
            stopped = true;
            break;
        }

        let mut remaining = units.len();
        while remaining > 0 {
            passes += 1;
            let before = remaining;
            'scan: for i in 0..days {
                let day = (offset + i) % days;
                for slot in 0..slots {
                    if remaining == 0 {
                        break 'scan;
                    }
                    let unit = &units[units.len() - remaining];
                    if let Some(t) = pick_teacher(problem, state, unit, day, slot) {
                        placements.push(state.place(unit, day, slot, t));
                        remaining -= 1;
                    }
                }
            }
            if remaining == before {
                warn!(
                    group = %problem.group(pair.group).id,
                    subject = %problem.subject(pair.subject).id,
                    missing = remaining,
                    "no placement left for subject"
                );
                break;
            }
        }
        debug!(
            group = %problem.group(pair.group).id,
            subject = %problem.subject(pair.subject).id,
            placed = units.len() - remaining,
            "subject filled"
        );
    }

    Fill {
        placements,
        passes,
        stopped,
    }
}

impl GreedySolver {
    pub fn new() -> Self {
        Self
    }

    /// Runs the fill on input that already passed [`validate`].
    pub fn solve_input(
        &self,
        input: &SolverInput,
        params: &SolveParams,
        budget: &Budget,
    ) -> SolverOutput {
        let started = Instant::now();
        let problem = Problem::new(input);
        let enc = encode(&problem);
        info!(units = enc.units.len(), "greedy fill started");

        let mut state = Tracker::new(&problem, enc.pairs.len());
        let run = fill(&problem, &enc, &mut state, budget);
        if run.stopped {
            warn!(assigned = run.placements.len(), "greedy fill stopped by budget");
        }

        let mut diagnostics = enc.diagnostics.clone();
        diagnostics.extend(outcome::shortfall(&problem, &enc, &run.placements));
        let message = if diagnostics.is_empty() {
            "schedule generated"
        } else {
            "schedule generated with warnings"
        };
        info!(
            assigned = run.placements.len(),
            warnings = diagnostics.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "greedy fill finished"
        );

        let stats = serde_json::json!({
            "method": "greedy",
            "units": enc.units.len(),
            "assigned": run.placements.len(),
            "passes": run.passes,
            "stopped": run.stopped,
        });

        outcome::assemble(
            &problem,
            RunReport {
                blocks: run.placements.iter().map(|p| p.to_block(&problem)).collect(),
                diagnostics,
                message: message.to_string(),
                elapsed: started.elapsed(),
                stats,
                min_daily_classes: params.min_daily_classes,
            },
        )
    }
}

#[async_trait]
impl Solver for GreedySolver {
    async fn solve(&self, env: SolveEnvelope) -> anyhow::Result<SolverOutput> {
        let started = Instant::now();
        if let Err(e) = validate(&env.input) {
            warn!(error = %e, "rejected instance");
            return Ok(outcome::rejected(&e, started.elapsed()));
        }
        let budget = Budget::from_params(&env.params);
        Ok(self.solve_input(&env.input, &env.params, &budget))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sched_core::fixtures::{fully_available, group, input, subject, teacher};
    use types::DayOfWeek;

    fn run(inp: &SolverInput) -> SolverOutput {
        GreedySolver::new().solve_input(inp, &SolveParams::default(), &Budget::unlimited())
    }

    #[test]
    fn subjects_start_on_rotated_days() {
        let inp = input(
            vec![subject("A", 1, 1), subject("B", 1, 1), subject("C", 1, 1)],
            vec![group("G1", 1)],
            vec![teacher("T1", &["A", "B", "C"], 15, fully_available())],
        );
        let out = run(&inp);
        let days: Vec<_> = out.schedules[0].blocks.iter().map(|b| b.day).collect();
        assert_eq!(days, vec![DayOfWeek::Mon, DayOfWeek::Tue, DayOfWeek::Wed]);
        assert_eq!(out.summary.message, "schedule generated");
    }

    #[test]
    fn abandons_hours_the_teacher_cannot_carry() {
        let inp = input(
            vec![subject("A", 1, 3)],
            vec![group("G1", 1)],
            vec![teacher("T1", &["A"], 2, fully_available())],
        );
        let out = run(&inp);
        assert_eq!(out.status, types::SolveStatus::Infeasible);
        assert_eq!(out.warnings, vec!["could not assign 1 hour of A to group G1"]);
        assert_eq!(out.summary.message, "schedule generated with warnings");
        assert_eq!(out.block_count(), 2);
        assert_eq!(out.stats["passes"], 2);
    }

    #[test]
    fn second_pair_goes_to_the_idle_teacher() {
        let inp = input(
            vec![subject("A", 1, 1)],
            vec![group("G1", 1), group("G2", 1)],
            vec![
                teacher("T1", &["A"], 15, fully_available()),
                teacher("T2", &["A"], 15, fully_available()),
            ],
        );
        let out = run(&inp);
        assert_eq!(out.schedules[0].blocks[0].teacher_id.0, "T1");
        assert_eq!(out.schedules[1].blocks[0].teacher_id.0, "T2");
    }
}
