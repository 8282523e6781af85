//! Track allocation: stacking overlapping tasks inside a swimlane row.
//!
//! First-fit interval coloring. Tasks are sorted by start date (stable, so
//! list order breaks ties deterministically) and each is placed on the
//! lowest-numbered track none of whose members overlap it. For intervals
//! sorted by start this greedy placement uses the minimum number of tracks.

use chrono::NaiveDate;
use std::collections::HashMap;
use uuid::Uuid;

use crate::model::Task;

/// Assign each schedulable task a track index, 0-based and dense.
///
/// Tasks without a timeline placement (no start date, or board-only) are
/// excluded from the result; callers render those on the Board only.
pub fn allocate(tasks: &[&Task]) -> HashMap<Uuid, usize> {
    let mut spans: Vec<(Uuid, NaiveDate, NaiveDate)> = tasks
        .iter()
        .filter_map(|t| t.schedule().map(|(s, e)| (t.id, s, e)))
        .collect();
    spans.sort_by_key(|&(_, start, _)| start);

    // Each track remembers the spans already placed on it.
    let mut tracks: Vec<Vec<(NaiveDate, NaiveDate)>> = Vec::new();
    let mut assignment = HashMap::with_capacity(spans.len());

    for (id, start, end) in spans {
        let slot = tracks
            .iter()
            .position(|members| members.iter().all(|&(s, e)| !overlaps(start, end, s, e)));
        let slot = match slot {
            Some(i) => i,
            None => {
                tracks.push(Vec::new());
                tracks.len() - 1
            }
        };
        tracks[slot].push((start, end));
        assignment.insert(id, slot);
    }
    assignment
}

/// Inclusive overlap test on date spans.
fn overlaps(s1: NaiveDate, e1: NaiveDate, s2: NaiveDate, e2: NaiveDate) -> bool {
    s1 <= e2 && e1 >= s2
}

/// Number of tracks a row needs. At least 1 so empty rows still get height.
pub fn track_count(assignment: &HashMap<Uuid, usize>) -> usize {
    assignment.values().copied().max().map_or(1, |max| max + 1)
}

/// Pixel height of a swimlane row.
pub fn lane_height(track_count: usize, track_height: f32, padding: f32) -> f32 {
    track_count as f32 * track_height + padding
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(start: NaiveDate, end: NaiveDate) -> Task {
        let mut t = Task::new("t", Uuid::new_v4());
        t.start = Some(start);
        t.end = Some(end);
        t
    }

    #[test]
    fn overlapping_pair_lands_on_two_tracks() {
        let a = task(date(2026, 2, 22), date(2026, 2, 26));
        let b = task(date(2026, 2, 24), date(2026, 2, 28));
        let refs = [&a, &b];
        let assignment = allocate(&refs);
        assert_ne!(assignment[&a.id], assignment[&b.id]);
        assert_eq!(track_count(&assignment), 2);
        assert_eq!(lane_height(2, 30.0, 0.0), 60.0);
    }

    #[test]
    fn sequential_pair_shares_track_zero() {
        let a = task(date(2026, 3, 1), date(2026, 3, 2));
        let b = task(date(2026, 3, 3), date(2026, 3, 5));
        let refs = [&a, &b];
        let assignment = allocate(&refs);
        assert_eq!(assignment[&a.id], 0);
        assert_eq!(assignment[&b.id], 0);
        assert_eq!(track_count(&assignment), 1);
    }

    #[test]
    fn touching_endpoints_count_as_overlap() {
        // Inclusive spans: a task ending on the 3rd collides with one
        // starting on the 3rd.
        let a = task(date(2026, 3, 1), date(2026, 3, 3));
        let b = task(date(2026, 3, 3), date(2026, 3, 5));
        let refs = [&a, &b];
        let assignment = allocate(&refs);
        assert_ne!(assignment[&a.id], assignment[&b.id]);
    }

    #[test]
    fn empty_input_yields_empty_map_and_one_track() {
        let assignment = allocate(&[]);
        assert!(assignment.is_empty());
        assert_eq!(track_count(&assignment), 1);
        assert_eq!(lane_height(1, 30.0, 8.0), 38.0);
    }

    #[test]
    fn undated_and_board_only_tasks_are_excluded() {
        let undated = Task::new("u", Uuid::new_v4());
        let mut hidden = task(date(2026, 3, 1), date(2026, 3, 2));
        hidden.board_only = true;
        let dated = task(date(2026, 3, 1), date(2026, 3, 2));
        let refs = [&undated, &hidden, &dated];
        let assignment = allocate(&refs);
        assert_eq!(assignment.len(), 1);
        assert_eq!(assignment[&dated.id], 0);
    }

    #[test]
    fn start_only_task_occupies_a_single_day() {
        let mut a = Task::new("a", Uuid::new_v4());
        a.start = Some(date(2026, 3, 3));
        let b = task(date(2026, 3, 4), date(2026, 3, 6));
        let refs = [&a, &b];
        let assignment = allocate(&refs);
        // single-day at Mar 3 does not collide with Mar 4..6
        assert_eq!(assignment[&a.id], 0);
        assert_eq!(assignment[&b.id], 0);
    }

    #[test]
    fn allocation_is_deterministic() {
        let tasks: Vec<Task> = (0..20)
            .map(|i| task(date(2026, 1, 1 + (i % 5)), date(2026, 1, 3 + (i % 7))))
            .collect();
        let refs: Vec<&Task> = tasks.iter().collect();
        let first = allocate(&refs);
        for _ in 0..5 {
            assert_eq!(allocate(&refs), first);
        }
    }

    #[test]
    fn random_intervals_never_overlap_within_a_track() {
        // Small deterministic LCG so the test is reproducible.
        let mut seed: u64 = 0x5eed;
        let mut next = move || {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (seed >> 33) as i64
        };

        let base = date(2026, 1, 1);
        let tasks: Vec<Task> = (0..200)
            .map(|_| {
                let off = next().rem_euclid(120);
                let len = next().rem_euclid(15);
                let start = base + chrono::Duration::days(off);
                task(start, start + chrono::Duration::days(len))
            })
            .collect();
        let refs: Vec<&Task> = tasks.iter().collect();
        let assignment = allocate(&refs);

        // Same-track members must be disjoint.
        for a in &tasks {
            for b in &tasks {
                if a.id != b.id && assignment[&a.id] == assignment[&b.id] {
                    let (s1, e1) = a.schedule().unwrap();
                    let (s2, e2) = b.schedule().unwrap();
                    assert!(
                        !overlaps(s1, e1, s2, e2),
                        "track {} holds overlapping spans {s1}..{e1} and {s2}..{e2}",
                        assignment[&a.id]
                    );
                }
            }
        }

        // Indices are dense and zero-based.
        let used: std::collections::HashSet<usize> = assignment.values().copied().collect();
        let count = track_count(&assignment);
        assert_eq!(used.len(), count);
        assert!((0..count).all(|i| used.contains(&i)));
    }
}
