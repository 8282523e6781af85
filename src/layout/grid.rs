//! The grid composer: turns (board, virtualization window, grouping mode)
//! into a fully resolved render model for one frame.
//!
//! Pure — no egui, no mutable state. Calling it twice with the same inputs
//! yields identical geometry, which keeps the Timeline renderer a dumb
//! painter and makes the layout testable without a UI harness.

use chrono::Datelike;
use egui::Color32;
use uuid::Uuid;

use super::coords::{self, DAY_WIDTH};
use super::tracks;
use super::window::VirtualWindow;
use crate::model::{Board, GroupMode, Task};

/// Vertical sizing knobs, supplied by the theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    /// Height of one track inside a lane row.
    pub track_height: f32,
    /// Extra padding below the tracks of each lane.
    pub lane_padding: f32,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            track_height: 36.0,
            lane_padding: 12.0,
        }
    }
}

/// A contiguous run of window days sharing year+month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthBand {
    pub label: String,
    pub year: i32,
    pub month: u32,
    /// Left edge relative to the window canvas.
    pub x: f32,
    pub width: f32,
}

/// Geometry for one task bar.
#[derive(Debug, Clone, PartialEq)]
pub struct BarLayout {
    pub task_id: Uuid,
    pub x: f32,
    pub width: f32,
    pub track: usize,
    /// Top edge of the bar's track, relative to the canvas.
    pub y: f32,
}

/// What a grouping row represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKey {
    Swimlane(Uuid),
    Person(Uuid),
    /// Tasks whose grouping reference is missing or stale.
    Unassigned,
}

/// One laid-out grouping row.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneLayout {
    pub key: RowKey,
    pub name: String,
    pub color: Option<Color32>,
    /// Top edge relative to the canvas (0 = below the header).
    pub y: f32,
    pub height: f32,
    pub bars: Vec<BarLayout>,
}

/// The per-frame render model for the Timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineLayout {
    pub months: Vec<MonthBand>,
    pub lanes: Vec<LaneLayout>,
    /// Canvas width: every materialized day at [`DAY_WIDTH`].
    pub width: f32,
    /// Total height of all lane rows.
    pub height: f32,
}

/// Lay out the timeline for the current frame.
pub fn compose(
    board: &Board,
    window: &VirtualWindow,
    mode: GroupMode,
    metrics: Metrics,
) -> TimelineLayout {
    let months = month_bands(window);

    // Resolve grouping rows. A trailing "Unassigned" row appears only when
    // some scheduled task has no (or a stale) grouping reference.
    let mut rows: Vec<(RowKey, String, Option<Color32>)> = match mode {
        GroupMode::Projects => board
            .swimlanes
            .iter()
            .map(|l| (RowKey::Swimlane(l.id), l.name.clone(), l.color))
            .collect(),
        GroupMode::People => board
            .people
            .iter()
            .map(|p| (RowKey::Person(p.id), p.name.clone(), p.color))
            .collect(),
    };
    let scheduled: Vec<&Task> = board
        .tasks
        .iter()
        .filter(|t| t.schedule().is_some())
        .collect();
    if scheduled
        .iter()
        .any(|t| row_of(t, mode, board) == RowKey::Unassigned)
    {
        rows.push((RowKey::Unassigned, "Unassigned".to_string(), None));
    }

    let mut lanes = Vec::with_capacity(rows.len());
    let mut y = 0.0;
    for (key, name, color) in rows {
        let members: Vec<&Task> = scheduled
            .iter()
            .copied()
            .filter(|t| row_of(t, mode, board) == key)
            .collect();
        let assignment = tracks::allocate(&members);
        let height = tracks::lane_height(
            tracks::track_count(&assignment),
            metrics.track_height,
            metrics.lane_padding,
        );

        // Walk members in board order so output order is deterministic.
        let mut bars = Vec::new();
        for task in &members {
            let (start, end) = match task.schedule() {
                Some(span) => span,
                None => continue,
            };
            let (si, ei) = (coords::date_to_index(start), coords::date_to_index(end));
            if !window.intersects(si, ei) {
                continue; // reappears once the window extends over it
            }
            let track = match assignment.get(&task.id) {
                Some(&t) => t,
                None => continue,
            };
            bars.push(BarLayout {
                task_id: task.id,
                x: coords::index_to_offset(si - window.start_index),
                width: coords::span_width(si, ei),
                track,
                y: y + track as f32 * metrics.track_height,
            });
        }

        lanes.push(LaneLayout {
            key,
            name,
            color,
            y,
            height,
            bars,
        });
        y += height;
    }

    TimelineLayout {
        months,
        lanes,
        width: window.width_px(),
        height: y,
    }
}

/// Which row a scheduled task belongs to under the active grouping mode.
/// Stale references (pointing at a deleted lane/person) group as Unassigned.
fn row_of(task: &Task, mode: GroupMode, board: &Board) -> RowKey {
    match mode {
        GroupMode::Projects => task
            .swimlane_id
            .filter(|id| board.swimlanes.iter().any(|l| l.id == *id))
            .map_or(RowKey::Unassigned, RowKey::Swimlane),
        GroupMode::People => task
            .assignee_id
            .filter(|id| board.people.iter().any(|p| p.id == *id))
            .map_or(RowKey::Unassigned, RowKey::Person),
    }
}

/// Partition the window's days into contiguous year+month bands.
fn month_bands(window: &VirtualWindow) -> Vec<MonthBand> {
    let mut bands: Vec<MonthBand> = Vec::new();
    let mut off = 0;
    while off < window.day_count {
        let date = coords::index_to_date(window.start_index + off);
        let (year, month) = (date.year(), date.month());
        let mut len = 0;
        while off + len < window.day_count {
            let d = coords::index_to_date(window.start_index + off + len);
            if d.year() != year || d.month() != month {
                break;
            }
            len += 1;
        }
        bands.push(MonthBand {
            label: date.format("%b %Y").to_string(),
            year,
            month,
            x: off as f32 * DAY_WIDTH,
            width: len as f32 * DAY_WIDTH,
        });
        off += len;
    }
    bands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Swimlane;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_board() -> (Board, Uuid) {
        let mut board = Board::default();
        let lane = Swimlane::new("Alpha");
        let lane_id = lane.id;
        board.swimlanes.push(lane);
        let status = board.default_status();

        let mut a = Task::new("a", status);
        a.start = Some(date(2026, 3, 10));
        a.end = Some(date(2026, 3, 14));
        a.swimlane_id = Some(lane_id);

        let mut b = Task::new("b", status);
        b.start = Some(date(2026, 3, 12));
        b.end = Some(date(2026, 3, 16));
        b.swimlane_id = Some(lane_id);

        board.tasks.push(a);
        board.tasks.push(b);
        (board, lane_id)
    }

    #[test]
    fn composing_twice_yields_identical_geometry() {
        let (board, _) = sample_board();
        let window = VirtualWindow::centered_on(date(2026, 3, 15));
        let first = compose(&board, &window, GroupMode::Projects, Metrics::default());
        let second = compose(&board, &window, GroupMode::Projects, Metrics::default());
        assert_eq!(first, second);
    }

    #[test]
    fn month_bands_tile_the_window_exactly() {
        let window = VirtualWindow::centered_on(date(2026, 3, 15));
        let (board, _) = sample_board();
        let layout = compose(&board, &window, GroupMode::Projects, Metrics::default());

        let total: f32 = layout.months.iter().map(|m| m.width).sum();
        assert_eq!(total, window.width_px());
        // Bands are contiguous.
        let mut x = 0.0;
        for band in &layout.months {
            assert_eq!(band.x, x);
            x += band.width;
        }
    }

    #[test]
    fn overlapping_bars_get_distinct_tracks_and_tall_lane() {
        let (board, _) = sample_board();
        let window = VirtualWindow::centered_on(date(2026, 3, 15));
        let metrics = Metrics::default();
        let layout = compose(&board, &window, GroupMode::Projects, metrics);

        let lane = &layout.lanes[0];
        assert_eq!(lane.bars.len(), 2);
        assert_ne!(lane.bars[0].track, lane.bars[1].track);
        assert_eq!(
            lane.height,
            2.0 * metrics.track_height + metrics.lane_padding
        );
    }

    #[test]
    fn bar_geometry_follows_the_coordinate_model() {
        let (board, _) = sample_board();
        let window = VirtualWindow::centered_on(date(2026, 3, 15));
        let layout = compose(&board, &window, GroupMode::Projects, Metrics::default());

        let bar = &layout.lanes[0].bars[0]; // task "a", Mar 10..14
        let si = coords::date_to_index(date(2026, 3, 10));
        assert_eq!(bar.x, (si - window.start_index) as f32 * DAY_WIDTH);
        assert_eq!(bar.width, 5.0 * DAY_WIDTH);
    }

    #[test]
    fn tasks_outside_the_window_are_omitted_not_lost() {
        let (mut board, lane_id) = sample_board();
        let status = board.default_status();
        let mut far = Task::new("far", status);
        far.start = Some(date(2030, 1, 1));
        far.end = Some(date(2030, 1, 5));
        far.swimlane_id = Some(lane_id);
        board.tasks.push(far);

        let window = VirtualWindow::centered_on(date(2026, 3, 15));
        let layout = compose(&board, &window, GroupMode::Projects, Metrics::default());
        assert_eq!(layout.lanes[0].bars.len(), 2);

        let later = VirtualWindow::centered_on(date(2030, 1, 3));
        let layout = compose(&board, &later, GroupMode::Projects, Metrics::default());
        assert_eq!(layout.lanes[0].bars.len(), 1);
        assert_eq!(layout.lanes[0].bars[0].task_id, board.tasks[2].id);
    }

    #[test]
    fn stale_swimlane_ref_groups_as_unassigned() {
        let (mut board, _) = sample_board();
        board.tasks[1].swimlane_id = Some(Uuid::new_v4()); // deleted lane
        let window = VirtualWindow::centered_on(date(2026, 3, 15));
        let layout = compose(&board, &window, GroupMode::Projects, Metrics::default());

        assert_eq!(layout.lanes.len(), 2);
        let unassigned = layout.lanes.last().unwrap();
        assert_eq!(unassigned.key, RowKey::Unassigned);
        assert_eq!(unassigned.bars.len(), 1);
    }

    #[test]
    fn people_mode_groups_by_assignee() {
        let (mut board, _) = sample_board();
        let person = crate::model::Person::new("Ada");
        let person_id = person.id;
        board.people.push(person);
        board.tasks[0].assignee_id = Some(person_id);

        let window = VirtualWindow::centered_on(date(2026, 3, 15));
        let layout = compose(&board, &window, GroupMode::People, Metrics::default());

        assert_eq!(layout.lanes[0].key, RowKey::Person(person_id));
        assert_eq!(layout.lanes[0].bars.len(), 1);
        // Task "b" has no assignee.
        assert_eq!(layout.lanes[1].key, RowKey::Unassigned);
    }

    #[test]
    fn board_only_tasks_never_appear_on_the_timeline() {
        let (mut board, _) = sample_board();
        board.tasks[0].board_only = true;
        let window = VirtualWindow::centered_on(date(2026, 3, 15));
        let layout = compose(&board, &window, GroupMode::Projects, Metrics::default());
        assert_eq!(layout.lanes[0].bars.len(), 1);
    }
}
