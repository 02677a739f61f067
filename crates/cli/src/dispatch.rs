use async_trait::async_trait;
use sched_core::{outcome, validate, Budget, SolveEnvelope, Solver, SolverOutput, StopToken};
use solver_backtrack::BacktrackSolver;
use solver_heur::GreedySolver;
use std::time::Instant;
use tracing::{info, warn};
use types::Algorithm;

/// Routes a request to the strategy named in its params. Searches run on the
/// blocking pool and share one stop token, so an interrupt ends whichever is
/// running with its best result so far.
#[derive(Clone, Default)]
pub struct DispatchSolver {
    backtrack: BacktrackSolver,
    greedy: GreedySolver,
    token: StopToken,
}

impl DispatchSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> &StopToken {
        &self.token
    }
}

#[async_trait]
impl Solver for DispatchSolver {
    async fn solve(&self, env: SolveEnvelope) -> anyhow::Result<SolverOutput> {
        let started = Instant::now();
        if let Err(e) = validate(&env.input) {
            warn!(error = %e, "rejected instance");
            return Ok(outcome::rejected(&e, started.elapsed()));
        }
        info!(algorithm = %env.params.algorithm, "dispatching");

        let budget = Budget::from_params(&env.params).with_token(self.token.clone());
        let this = self.clone();
        let out = tokio::task::spawn_blocking(move || match env.params.algorithm {
            Algorithm::Backtracking => this.backtrack.solve_input(&env.input, &env.params, &budget),
            Algorithm::Greedy => this.greedy.solve_input(&env.input, &env.params, &budget),
        })
        .await?;
        Ok(out)
    }
}
