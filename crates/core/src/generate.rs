//! Reproducible synthetic instances for demos, tests and benchmarking.

use crate::fixtures;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use types::{
    Availability, Group, Meta, Shift, SolverInput, Subject, Teacher, TimeGrid,
};

#[derive(Clone, Debug)]
pub struct GenSpec {
    pub terms: u32,
    pub groups_per_term: u32,
    pub subjects_per_term: u32,
    pub teachers: u32,
    pub teachers_per_subject: u32,
    /// Probability that a teaching cell is `available`; the rest are `blocked`.
    pub availability: f64,
    pub max_weekly_hours: u32,
}

impl Default for GenSpec {
    fn default() -> Self {
        Self {
            terms: 2,
            groups_per_term: 1,
            subjects_per_term: 3,
            teachers: 4,
            teachers_per_subject: 2,
            availability: 0.8,
            max_weekly_hours: 15,
        }
    }
}

fn group_suffix(i: u32) -> char {
    char::from_u32('A' as u32 + i % 26).unwrap_or('A')
}

pub fn campus(seed: u64, spec: &GenSpec) -> SolverInput {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let grid = TimeGrid::standard();

    let mut curriculum = Vec::new();
    let mut groups = Vec::new();
    for term in 1..=spec.terms {
        for i in 0..spec.groups_per_term {
            groups.push(Group {
                id: format!("G{term}{}", group_suffix(i)).as_str().into(),
                term,
                shift: if i % 2 == 0 { Shift::Morning } else { Shift::Evening },
                name: None,
            });
        }
        for m in 1..=spec.subjects_per_term {
            curriculum.push(fixtures::subject(
                &format!("T{term}-S{m}"),
                term,
                rng.gen_range(2..=3),
            ));
        }
    }

    let p = spec.availability.clamp(0.0, 1.0);
    let mut teachers: Vec<Teacher> = (1..=spec.teachers)
        .map(|i| {
            let availability = grid
                .days
                .iter()
                .map(|&day| {
                    let cells: BTreeMap<_, _> = grid
                        .teaching_slots()
                        .map(|s| {
                            let state = if rng.gen_bool(p) {
                                Availability::Available
                            } else {
                                Availability::Blocked
                            };
                            (s.id.clone(), state)
                        })
                        .collect();
                    (day, cells)
                })
                .collect();
            fixtures::teacher(&format!("P{i:02}"), &[], spec.max_weekly_hours, availability)
        })
        .collect();

    if !teachers.is_empty() {
        let indices: Vec<usize> = (0..teachers.len()).collect();
        let k = (spec.teachers_per_subject as usize).min(teachers.len());
        for subject in &curriculum {
            for &t in indices.choose_multiple(&mut rng, k) {
                teachers[t].competencies.push(subject.id.clone());
            }
        }
    }

    SolverInput {
        curriculum,
        groups,
        teachers,
        grid,
        meta: Some(Meta {
            created_at: None,
            source: Some(format!("generate:campus:{seed}")),
        }),
    }
}

const SUBJECT_NAMES: [&str; 16] = [
    "Algorithms",
    "Databases",
    "Networks",
    "Operating Systems",
    "Software Engineering",
    "Cloud Computing",
    "Security",
    "Applied AI",
    "Data Analysis",
    "UX/UI",
    "Compilers",
    "Optimization",
    "Software Architecture",
    "Probability",
    "Data Modeling",
    "Requirements Engineering",
];

/// Ten terms, two groups each, seven subjects per term and 28 fully available
/// teachers, each subject covered by three of them.
pub fn large_seed() -> SolverInput {
    let mut curriculum: Vec<Subject> = Vec::new();
    let mut groups: Vec<Group> = Vec::new();

    for term in 1..=10u32 {
        for (i, shift) in [Shift::Morning, Shift::Evening].into_iter().enumerate() {
            let suffix = group_suffix(i as u32);
            groups.push(Group {
                id: format!("ITI-{term}{suffix}").as_str().into(),
                term,
                shift,
                name: Some(format!("ITI {term}{suffix}")),
            });
        }
        for m in 0..7u32 {
            let base = SUBJECT_NAMES[((term + m) as usize) % SUBJECT_NAMES.len()];
            let mut s = fixtures::subject(&format!("Q{term}-M{}", m + 1), term, 2 + m % 2);
            s.name = Some(format!("{base} Q{term}"));
            curriculum.push(s);
        }
    }

    let mut teachers: Vec<Teacher> = (1..=28)
        .map(|i| {
            let mut t = fixtures::teacher(&format!("PR-{i:02}"), &[], 15, fixtures::fully_available());
            t.name = Some(format!("Teacher {i}"));
            t
        })
        .collect();

    let n = teachers.len();
    for (idx, subject) in curriculum.iter().enumerate() {
        for t in [idx % n, (idx + 5) % n, (idx + 10) % n] {
            if !teachers[t].competencies.contains(&subject.id) {
                teachers[t].competencies.push(subject.id.clone());
            }
        }
    }

    SolverInput {
        curriculum,
        groups,
        teachers,
        grid: TimeGrid::standard(),
        meta: Some(Meta {
            created_at: None,
            source: Some("generate:large-seed".into()),
        }),
    }
}
