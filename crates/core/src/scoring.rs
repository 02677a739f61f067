use std::collections::BTreeMap;
use types::{DayOfWeek, GroupId, GroupSchedule, Metrics, ScheduleBlock, TimeGrid};

/// Gap score ceiling; each missing slot between two classes costs one point.
pub const SOFT_SCORE_MAX: f64 = 10.0;

fn slot_indices_by_day(
    grid: &TimeGrid,
    blocks: &[ScheduleBlock],
) -> BTreeMap<DayOfWeek, Vec<usize>> {
    let mut by_day: BTreeMap<DayOfWeek, Vec<usize>> = BTreeMap::new();
    for b in blocks {
        if let Some(k) = grid.slot_index(&b.slot_id) {
            by_day.entry(b.day).or_default().push(k);
        }
    }
    for v in by_day.values_mut() {
        v.sort_unstable();
    }
    by_day
}

/// Empty slots between classes of one group, summed over the week.
pub fn count_gaps(grid: &TimeGrid, blocks: &[ScheduleBlock]) -> u32 {
    slot_indices_by_day(grid, blocks)
        .values()
        .flat_map(|v| v.windows(2))
        .map(|w| (w[1] - w[0]).saturating_sub(1) as u32)
        .sum()
}

pub fn soft_score(gaps: u32) -> f64 {
    (SOFT_SCORE_MAX - gaps as f64).max(0.0)
}

pub fn compute_metrics(grid: &TimeGrid, schedule: &GroupSchedule) -> Metrics {
    let gaps = count_gaps(grid, &schedule.blocks);
    Metrics {
        gaps,
        hard_violations: schedule.metrics.hard_violations,
        soft_score: soft_score(gaps),
    }
}

/// Orders blocks by (day, slot) and sets the per-block flags.
pub fn annotate(grid: &TimeGrid, blocks: &mut [ScheduleBlock]) {
    let day_pos = |d: DayOfWeek| grid.day_index(d).unwrap_or(usize::MAX);
    let slot_pos = |b: &ScheduleBlock| grid.slot_index(&b.slot_id).unwrap_or(usize::MAX);
    blocks.sort_by_key(|b| (day_pos(b.day), slot_pos(b)));

    for i in 0..blocks.len() {
        let k = slot_pos(&blocks[i]);
        blocks[i].preceded_by_gap = i > 0
            && blocks[i - 1].day == blocks[i].day
            && k > slot_pos(&blocks[i - 1]).saturating_add(1);

        let sibling = blocks
            .iter()
            .enumerate()
            .find(|(j, o)| {
                *j != i && o.day == blocks[i].day && o.subject_id == blocks[i].subject_id
            })
            .map(|(_, o)| slot_pos(o));
        blocks[i].is_contiguous = sibling.map_or(true, |s| s.abs_diff(k) == 1);
    }
}

pub fn group_schedule(
    grid: &TimeGrid,
    group_id: GroupId,
    mut blocks: Vec<ScheduleBlock>,
    hard_violations: u32,
) -> GroupSchedule {
    annotate(grid, &mut blocks);
    let gaps = count_gaps(grid, &blocks);
    GroupSchedule {
        group_id,
        blocks,
        metrics: Metrics {
            gaps,
            hard_violations,
            soft_score: soft_score(gaps),
        },
    }
}
