//! Stop conditions for a running solve: an optional deadline and a shared
//! cancellation flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use types::SolveParams;

/// How many node expansions pass between two budget polls.
pub const POLL_INTERVAL: u64 = 50;

#[derive(Clone, Debug, Default)]
pub struct StopToken(Arc<AtomicBool>);

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Budget {
    deadline: Option<Instant>,
    token: StopToken,
}

impl Budget {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn with_time_limit(limit: Duration) -> Self {
        Self {
            deadline: Instant::now().checked_add(limit),
            token: StopToken::new(),
        }
    }

    pub fn from_params(params: &SolveParams) -> Self {
        match params.time_limit_ms {
            Some(ms) => Self::with_time_limit(Duration::from_millis(ms)),
            None => Self::unlimited(),
        }
    }

    pub fn with_token(mut self, token: StopToken) -> Self {
        self.token = token;
        self
    }

    pub fn token(&self) -> &StopToken {
        &self.token
    }

    pub fn exhausted(&self) -> bool {
        self.token.is_stopped() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_until_cancelled() {
        let token = StopToken::new();
        let budget = Budget::unlimited().with_token(token.clone());
        assert!(!budget.exhausted());
        token.stop();
        assert!(budget.exhausted());
    }

    #[test]
    fn zero_time_limit_is_exhausted_immediately() {
        let params = SolveParams {
            time_limit_ms: Some(0),
            ..Default::default()
        };
        assert!(Budget::from_params(&params).exhausted());
        assert!(!Budget::from_params(&SolveParams::default()).exhausted());
    }
}
