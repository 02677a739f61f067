mod search;

pub use search::{SearchEnd, SearchStats};

use async_trait::async_trait;
use sched_core::outcome::{self, RunReport};
use sched_core::{
    encode, validate, Budget, Problem, SolveEnvelope, SolveParams, Solver, SolverInput,
    SolverOutput, Tracker,
};
use std::time::Instant;
use tracing::{info, warn};

/// Exhaustive depth-first strategy. Finds a complete assignment whenever one
/// exists and the budget allows; otherwise reports the deepest partial one.
#[derive(Clone, Copy, Debug, Default)]
pub struct BacktrackSolver;

impl BacktrackSolver {
    pub fn new() -> Self {
        Self
    }

    /// Runs the search on input that already passed [`validate`].
    pub fn solve_input(
        &self,
        input: &SolverInput,
        params: &SolveParams,
        budget: &Budget,
    ) -> SolverOutput {
        let started = Instant::now();
        let problem = Problem::new(input);
        let enc = encode(&problem);
        let required = enc.required_hours();
        info!(
            units = enc.units.len(),
            required,
            blocked = enc.diagnostics.len(),
            "backtracking search started"
        );

        let mut state = Tracker::new(&problem, enc.pairs.len());
        let res = search::run(&problem, &enc.units, &mut state, budget);
        let assigned = res.placements.len();

        let mut diagnostics = enc.diagnostics.clone();
        diagnostics.extend(outcome::shortfall(&problem, &enc, &res.placements));

        if res.end == SearchEnd::Stopped {
            warn!(assigned, units = enc.units.len(), "backtracking stopped by budget");
        }
        let message = if res.end == SearchEnd::Complete && diagnostics.is_empty() {
            "optimized with backtracking".to_string()
        } else {
            format!("backtracking incomplete ({assigned}/{required} assigned)")
        };
        info!(
            nodes = res.stats.nodes,
            backtracks = res.stats.backtracks,
            assigned,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "backtracking search finished"
        );

        let stats = serde_json::json!({
            "method": "backtracking",
            "units": enc.units.len(),
            "assigned": assigned,
            "nodes": res.stats.nodes,
            "backtracks": res.stats.backtracks,
            "deepest": res.stats.deepest,
            "stopped": res.end == SearchEnd::Stopped,
        });

        outcome::assemble(
            &problem,
            RunReport {
                blocks: res.placements.iter().map(|p| p.to_block(&problem)).collect(),
                diagnostics,
                message,
                elapsed: started.elapsed(),
                stats,
                min_daily_classes: params.min_daily_classes,
            },
        )
    }
}

#[async_trait]
impl Solver for BacktrackSolver {
    async fn solve(&self, env: SolveEnvelope) -> anyhow::Result<SolverOutput> {
        let started = Instant::now();
        info!(
            groups = env.input.groups.len(),
            subjects = env.input.curriculum.len(),
            teachers = env.input.teachers.len(),
            "received instance"
        );
        if let Err(e) = validate(&env.input) {
            warn!(error = %e, "rejected instance");
            return Ok(outcome::rejected(&e, started.elapsed()));
        }
        let budget = Budget::from_params(&env.params);
        Ok(self.solve_input(&env.input, &env.params, &budget))
    }
}
