//! Depth-first search over the encoded units, driven by an explicit frame
//! stack instead of recursion.
//!
//! Frame `i` owns unit `i`. Its cursor walks the candidates in day, slot,
//! teacher order; the placement it made (if any) sits at `trail[i]`.

use sched_core::stop::POLL_INTERVAL;
use sched_core::{rules, Budget, Placement, Problem, TeachingUnit, Tracker};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchEnd {
    /// Every unit placed.
    Complete,
    /// The whole tree was explored without a full assignment.
    Exhausted,
    /// The budget ran out first.
    Stopped,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SearchStats {
    pub nodes: u64,
    pub backtracks: u64,
    pub deepest: usize,
}

pub struct SearchResult {
    pub end: SearchEnd,
    /// The full assignment on `Complete`, otherwise the deepest partial seen.
    pub placements: Vec<Placement>,
    pub stats: SearchStats,
}

struct Frame {
    eligible: Vec<usize>,
    cursor: usize,
}

/// The committed teacher if the pair has one, else every competent teacher
/// ordered by current load; ties keep input order.
fn eligible_teachers(problem: &Problem<'_>, state: &Tracker, unit: &TeachingUnit) -> Vec<usize> {
    if let Some(t) = state.committed_teacher(unit.pair) {
        return vec![t];
    }
    let mut teachers: Vec<usize> = problem.competent_teachers(unit.subject).collect();
    teachers.sort_by_key(|&t| state.load(t));
    teachers
}

fn next_candidate(
    problem: &Problem<'_>,
    state: &Tracker,
    unit: &TeachingUnit,
    frame: &mut Frame,
) -> Option<(usize, usize, usize)> {
    let m = frame.eligible.len();
    let per_day = problem.num_slots() * m;
    let total = problem.num_days() * per_day;
    while frame.cursor < total {
        let c = frame.cursor;
        frame.cursor += 1;
        let (day, rest) = (c / per_day, c % per_day);
        let (slot, teacher) = (rest / m, frame.eligible[rest % m]);
        if rules::admits(problem, state, unit, day, slot, teacher) {
            return Some((day, slot, teacher));
        }
    }
    None
}

pub fn run(
    problem: &Problem<'_>,
    units: &[TeachingUnit],
    state: &mut Tracker,
    budget: &Budget,
) -> SearchResult {
    let n = units.len();
    let mut stats = SearchStats::default();
    let mut frames: Vec<Frame> = Vec::with_capacity(n);
    let mut trail: Vec<Placement> = Vec::with_capacity(n);
    let mut best: Vec<Placement> = Vec::new();
    let mut best_depth: Option<usize> = None;

    let end = 'search: loop {
        let depth = trail.len();
        if stats.nodes % POLL_INTERVAL == 0 && budget.exhausted() {
            break 'search SearchEnd::Stopped;
        }
        stats.nodes += 1;

        if best_depth.map_or(true, |b| depth > b) {
            best_depth = Some(depth);
            best.clone_from(&trail);
            stats.deepest = depth;
            debug!(depth, nodes = stats.nodes, "new deepest assignment");
        }
        if depth == n {
            break 'search SearchEnd::Complete;
        }

        let eligible = eligible_teachers(problem, state, &units[depth]);
        if !eligible.is_empty() {
            frames.push(Frame {
                eligible,
                cursor: 0,
            });
        }

        // Advance the top frame to its next admissible candidate, popping
        // exhausted frames on the way up.
        loop {
            let Some(top) = frames.len().checked_sub(1) else {
                break 'search SearchEnd::Exhausted;
            };
            if trail.len() > top {
                if let Some(p) = trail.pop() {
                    state.unplace(p);
                    stats.backtracks += 1;
                }
            }
            let unit = &units[top];
            match next_candidate(problem, state, unit, &mut frames[top]) {
                Some((day, slot, teacher)) => {
                    trail.push(state.place(unit, day, slot, teacher));
                    continue 'search;
                }
                None => {
                    frames.pop();
                }
            }
        }
    };

    let placements = match end {
        SearchEnd::Complete => trail,
        SearchEnd::Exhausted | SearchEnd::Stopped => best,
    };
    SearchResult {
        end,
        placements,
        stats,
    }
}
