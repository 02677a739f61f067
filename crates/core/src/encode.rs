//! Problem encoder: flattens groups × subjects × weekly hours into the ordered
//! list of [`TeachingUnit`]s both strategies walk.

use crate::model::Problem;
use crate::outcome::Diagnostic;
use tracing::debug;

/// One atomic, one-hour teaching obligation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TeachingUnit {
    pub group: usize,
    pub subject: usize,
    /// Dense index of the (group, subject) pair, see [`Encoding::pairs`].
    pub pair: usize,
    pub hour: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pair {
    pub group: usize,
    pub subject: usize,
    pub hours: u32,
    /// `false` when the pair was diagnosed up front and has no units.
    pub schedulable: bool,
}

#[derive(Debug, Default)]
pub struct Encoding {
    pub units: Vec<TeachingUnit>,
    pub pairs: Vec<Pair>,
    /// Pre-emptive diagnostics, reported before any placement is attempted.
    pub diagnostics: Vec<Diagnostic>,
}

impl Encoding {
    /// Hours demanded by the curriculum, schedulable or not.
    pub fn required_hours(&self) -> u32 {
        self.pairs.iter().map(|p| p.hours).sum()
    }
}

/// Why a subject cannot get any unit placed at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Blocker {
    NoCompetentTeacher,
    NoAvailableTeacher,
}

fn blocker(problem: &Problem<'_>, s: usize) -> Option<Blocker> {
    let mut competent = problem.competent_teachers(s).peekable();
    if competent.peek().is_none() {
        return Some(Blocker::NoCompetentTeacher);
    }
    if !competent.any(|t| problem.has_any_availability(t)) {
        return Some(Blocker::NoAvailableTeacher);
    }
    None
}

/// Encodes one group at a time, one subject at a time (curriculum order,
/// filtered by term), one hour at a time.
pub fn encode(problem: &Problem<'_>) -> Encoding {
    let mut enc = Encoding::default();
    let blockers: Vec<Option<Blocker>> = (0..problem.num_subjects())
        .map(|s| blocker(problem, s))
        .collect();

    let mut unstaffed: Vec<(usize, Vec<usize>)> = Vec::new();

    for g in 0..problem.num_groups() {
        for s in problem.subjects_of(g) {
            let hours = problem.subject(s).weekly_hours;
            let pair = enc.pairs.len();
            match blockers[s] {
                None => {
                    enc.pairs.push(Pair {
                        group: g,
                        subject: s,
                        hours,
                        schedulable: true,
                    });
                    enc.units.extend((0..hours).map(|hour| TeachingUnit {
                        group: g,
                        subject: s,
                        pair,
                        hour,
                    }));
                }
                Some(b) => {
                    enc.pairs.push(Pair {
                        group: g,
                        subject: s,
                        hours,
                        schedulable: false,
                    });
                    match b {
                        Blocker::NoCompetentTeacher => {
                            match unstaffed.iter_mut().find(|(subj, _)| *subj == s) {
                                Some((_, groups)) => groups.push(g),
                                None => unstaffed.push((s, vec![g])),
                            }
                        }
                        Blocker::NoAvailableTeacher => {
                            enc.diagnostics
                                .push(Diagnostic::unassigned(problem, g, s, hours));
                        }
                    }
                }
            }
        }
    }

    let mut upfront: Vec<Diagnostic> = unstaffed
        .into_iter()
        .map(|(s, groups)| Diagnostic::no_competent_teacher(problem, s, &groups))
        .collect();
    upfront.append(&mut enc.diagnostics);
    enc.diagnostics = upfront;

    debug!(
        units = enc.units.len(),
        pairs = enc.pairs.len(),
        diagnostics = enc.diagnostics.len(),
        "encoded teaching units"
    );
    enc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{fully_available, fully_blocked, group, input, subject, teacher};

    #[test]
    fn units_follow_group_subject_hour_order() {
        let inp = input(
            vec![subject("A", 1, 2), subject("B", 2, 1), subject("C", 1, 1)],
            vec![group("G1", 1), group("G2", 2)],
            vec![teacher("T1", &["A", "B", "C"], 15, fully_available())],
        );
        let p = Problem::new(&inp);
        let enc = encode(&p);
        let got: Vec<(usize, usize, u32)> =
            enc.units.iter().map(|u| (u.group, u.subject, u.hour)).collect();
        assert_eq!(got, vec![(0, 0, 0), (0, 0, 1), (0, 2, 0), (1, 1, 0)]);
        assert_eq!(enc.pairs.len(), 3);
        assert_eq!(enc.units[2].pair, 1);
        assert_eq!(enc.required_hours(), 4);
        assert!(enc.diagnostics.is_empty());
    }

    #[test]
    fn subject_without_competent_teacher_is_diagnosed_once() {
        let inp = input(
            vec![subject("A", 1, 2), subject("Z", 1, 3)],
            vec![group("G1", 1), group("G2", 1)],
            vec![teacher("T1", &["A"], 15, fully_available())],
        );
        let p = Problem::new(&inp);
        let enc = encode(&p);
        assert_eq!(enc.units.len(), 4);
        assert!(enc.units.iter().all(|u| u.subject == 0));
        assert_eq!(enc.diagnostics.len(), 1);
        assert_eq!(
            enc.diagnostics[0].to_string(),
            "no teacher with competency for Z"
        );
        assert_eq!(enc.diagnostics[0].groups().len(), 2);
    }

    #[test]
    fn blocked_teacher_yields_full_hour_diagnostics_per_group() {
        let inp = input(
            vec![subject("A", 1, 3)],
            vec![group("G1", 1), group("G2", 1)],
            vec![teacher("T1", &["A"], 15, fully_blocked())],
        );
        let p = Problem::new(&inp);
        let enc = encode(&p);
        assert!(enc.units.is_empty());
        let msgs: Vec<String> = enc.diagnostics.iter().map(|d| d.to_string()).collect();
        assert_eq!(
            msgs,
            vec![
                "could not assign 3 hours of A to group G1",
                "could not assign 3 hours of A to group G2",
            ]
        );
    }
}
