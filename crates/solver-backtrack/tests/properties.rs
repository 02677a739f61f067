use proptest::prelude::*;
use sched_core::generate::{campus, GenSpec};
use sched_core::verify::verify;
use sched_core::{Budget, SolveParams, SolveStatus};
use solver_backtrack::BacktrackSolver;
use std::time::Duration;

fn spec() -> impl Strategy<Value = GenSpec> {
    (1u32..=3, 1u32..=2, 1u32..=4, 2u32..=6, 1u32..=2, 0.3f64..=1.0).prop_map(
        |(terms, groups_per_term, subjects_per_term, teachers, teachers_per_subject, availability)| {
            GenSpec {
                terms,
                groups_per_term,
                subjects_per_term,
                teachers,
                teachers_per_subject,
                availability,
                max_weekly_hours: 15,
            }
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn every_result_satisfies_the_hard_constraints(seed in any::<u64>(), spec in spec()) {
        let inp = campus(seed, &spec);
        let budget = Budget::with_time_limit(Duration::from_millis(200));
        let out = BacktrackSolver::new().solve_input(&inp, &SolveParams::default(), &budget);

        let errs = verify(&inp, &out);
        prop_assert!(errs.is_empty(), "{:?}", errs);
        prop_assert_ne!(out.status, SolveStatus::Error);
        prop_assert_eq!(out.status == SolveStatus::Ok, out.warnings.is_empty());
        prop_assert_eq!(out.summary.hard_violations as usize, out.warnings.len());
        for s in &out.schedules {
            prop_assert!(s.blocks.iter().all(|b| b.is_contiguous));
            prop_assert!((0.0..=10.0).contains(&s.metrics.soft_score));
        }
    }
}
