use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Clone, Debug, Serialize, Deserialize, JsonSchema, Eq, PartialEq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}
id_newtype!(SubjectId);
id_newtype!(GroupId);
id_newtype!(TeacherId);
id_newtype!(SlotId);

/// Teaching days in canonical weekly order.
#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, Eq, PartialEq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 5] = [
        DayOfWeek::Mon,
        DayOfWeek::Tue,
        DayOfWeek::Wed,
        DayOfWeek::Thu,
        DayOfWeek::Fri,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DayOfWeek::Mon => "mon",
            DayOfWeek::Tue => "tue",
            DayOfWeek::Wed => "wed",
            DayOfWeek::Thu => "thu",
            DayOfWeek::Fri => "fri",
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, Eq, PartialEq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    #[default]
    Morning,
    Evening,
}

/// State of one cell in a teacher's weekly availability matrix.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, Eq, PartialEq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    #[default]
    #[serde(alias = "blank")]
    Unset,
    Available,
    Blocked,
}

pub type AvailabilityMatrix = BTreeMap<DayOfWeek, BTreeMap<SlotId, Availability>>;

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub id: SlotId,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub is_break: bool,
}

impl TimeSlot {
    fn new(id: &str, start: &str, end: &str, is_break: bool) -> Self {
        Self {
            id: SlotId::from(id),
            label: format!("{start} - {end}"),
            start: start.to_string(),
            end: end.to_string(),
            is_break,
        }
    }
}

/// Teaching days and the chronological slot sequence of one day.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TimeGrid {
    pub days: Vec<DayOfWeek>,
    pub slots: Vec<TimeSlot>,
}

impl TimeGrid {
    /// Monday to Friday, nine teaching hours with a recess after the fourth.
    pub fn standard() -> Self {
        Self {
            days: DayOfWeek::ALL.to_vec(),
            slots: vec![
                TimeSlot::new("s1", "07:00", "07:55", false),
                TimeSlot::new("s2", "07:55", "08:50", false),
                TimeSlot::new("s3", "08:50", "09:45", false),
                TimeSlot::new("s4", "09:45", "10:40", false),
                TimeSlot::new("receso", "10:40", "11:10", true),
                TimeSlot::new("s5", "11:10", "12:05", false),
                TimeSlot::new("s6", "12:05", "13:00", false),
                TimeSlot::new("s7", "13:00", "13:55", false),
                TimeSlot::new("s8", "14:00", "14:55", false),
                TimeSlot::new("s9", "14:55", "15:50", false),
            ],
        }
    }

    /// Slots a block may occupy, in chronological order.
    pub fn teaching_slots(&self) -> impl Iterator<Item = &TimeSlot> {
        self.slots.iter().filter(|s| !s.is_break)
    }

    /// Position of `id` among the teaching slots; breaks have no index.
    pub fn slot_index(&self, id: &SlotId) -> Option<usize> {
        self.teaching_slots().position(|s| &s.id == id)
    }

    pub fn day_index(&self, day: DayOfWeek) -> Option<usize> {
        self.days.iter().position(|d| *d == day)
    }
}

impl Default for TimeGrid {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: SubjectId,
    pub term: u32,
    pub weekly_hours: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Subject {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id.0)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: GroupId,
    pub term: u32,
    #[serde(default)]
    pub shift: Shift,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Group {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id.0)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: TeacherId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub competencies: Vec<SubjectId>,
    pub max_weekly_hours: u32,
    #[serde(default)]
    pub availability: AvailabilityMatrix,
}

impl Teacher {
    pub fn cell(&self, day: DayOfWeek, slot: &SlotId) -> Availability {
        self.availability
            .get(&day)
            .and_then(|d| d.get(slot))
            .copied()
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SolverInput {
    pub curriculum: Vec<Subject>,
    pub groups: Vec<Group>,
    pub teachers: Vec<Teacher>,
    #[serde(default)]
    pub grid: TimeGrid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl SolverInput {
    /// Subjects taught to `group`, in curriculum order.
    pub fn subjects_for<'a>(&'a self, group: &'a Group) -> impl Iterator<Item = &'a Subject> + 'a {
        self.curriculum.iter().filter(move |s| s.term == group.term)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, Eq, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    #[default]
    Backtracking,
    Greedy,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Backtracking => f.write_str("backtracking"),
            Algorithm::Greedy => f.write_str("greedy"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct SolveParams {
    #[serde(default)]
    pub algorithm: Algorithm,
    #[serde(default)]
    pub time_limit_ms: Option<u64>,
    /// Advisory lower bound on classes per (group, day); never a hard constraint.
    #[serde(default)]
    pub min_daily_classes: Option<u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct SolveEnvelope {
    #[serde(flatten)]
    pub input: SolverInput,
    #[serde(default)]
    pub params: SolveParams,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SolveStatus {
    Ok,
    Infeasible,
    Error,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleBlock {
    pub group_id: GroupId,
    pub subject_id: SubjectId,
    pub teacher_id: TeacherId,
    pub day: DayOfWeek,
    pub slot_id: SlotId,
    pub duration: u32,
    #[serde(default)]
    pub preceded_by_gap: bool,
    #[serde(default = "default_true")]
    pub is_contiguous: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub gaps: u32,
    pub hard_violations: u32,
    pub soft_score: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroupSchedule {
    pub group_id: GroupId,
    pub blocks: Vec<ScheduleBlock>,
    pub metrics: Metrics,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub message: String,
    pub elapsed_ms: u64,
    pub hard_violations: u32,
    pub avg_gaps: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SolverOutput {
    pub status: SolveStatus,
    pub schedules: Vec<GroupSchedule>,
    pub summary: Summary,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub advisories: Vec<String>,
    #[serde(default)]
    pub stats: serde_json::Value,
}

impl SolverOutput {
    pub fn block_count(&self) -> usize {
        self.schedules.iter().map(|s| s.blocks.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_reads_camel_case_with_defaults() {
        let env: SolveEnvelope = serde_json::from_value(json!({
            "curriculum": [{"id": "M1", "term": 1, "weeklyHours": 3}],
            "groups": [{"id": "G1", "term": 1}],
            "teachers": [{
                "id": "T1",
                "competencies": ["M1"],
                "maxWeeklyHours": 10,
                "availability": {"mon": {"s1": "available", "s2": "blank", "s3": "blocked"}}
            }],
            "params": {"algorithm": "greedy", "timeLimitMs": 250}
        }))
        .unwrap();

        assert_eq!(env.params.algorithm, Algorithm::Greedy);
        assert_eq!(env.params.time_limit_ms, Some(250));
        assert_eq!(env.input.grid, TimeGrid::standard());
        assert_eq!(env.input.groups[0].shift, Shift::Morning);

        let t = &env.input.teachers[0];
        assert_eq!(t.cell(DayOfWeek::Mon, &"s1".into()), Availability::Available);
        assert_eq!(t.cell(DayOfWeek::Mon, &"s2".into()), Availability::Unset);
        assert_eq!(t.cell(DayOfWeek::Mon, &"s3".into()), Availability::Blocked);
        assert_eq!(t.cell(DayOfWeek::Fri, &"s9".into()), Availability::Unset);
    }

    #[test]
    fn recess_has_no_teaching_index() {
        let grid = TimeGrid::standard();
        assert_eq!(grid.teaching_slots().count(), 9);
        assert_eq!(grid.slot_index(&"s4".into()), Some(3));
        assert_eq!(grid.slot_index(&"receso".into()), None);
        assert_eq!(grid.slot_index(&"s5".into()), Some(4));
    }

    #[test]
    fn status_and_days_serialize_lowercase() {
        assert_eq!(json!(SolveStatus::Infeasible), json!("infeasible"));
        assert_eq!(json!(DayOfWeek::Thu), json!("thu"));
    }
}
