//! Pointer interaction state and math for the Timeline.
//!
//! One explicit state value owns every in-flight gesture; transitions are
//! idle → resizing/dragging → idle. The pixel→date math lives here so the
//! renderer only reports pointer positions and applies the results.

use chrono::{Duration as Days, NaiveDate};
use std::time::{Duration, Instant};
use uuid::Uuid;

use super::coords::DAY_WIDTH;

/// How long after a resize/drag ends that background clicks are ignored,
/// so the mouse-up of a gesture is not misread as "create task here".
pub const CLICK_SUPPRESS: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    Start,
    End,
}

/// The single in-flight gesture, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionState {
    Idle,
    Resizing {
        task: Uuid,
        edge: ResizeEdge,
        /// Pointer x at gesture start, in canvas pixels.
        origin_x: f32,
        start: NaiveDate,
        end: NaiveDate,
    },
    Dragging {
        task: Uuid,
        origin_x: f32,
        start: NaiveDate,
        end: NaiveDate,
    },
}

/// Owns the gesture state and the post-gesture click suppression window.
#[derive(Debug)]
pub struct InteractionController {
    pub state: InteractionState,
    suppress_until: Option<Instant>,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self {
            state: InteractionState::Idle,
            suppress_until: None,
        }
    }
}

/// Snap a pixel delta to whole days (nearest day boundary).
pub fn drag_day_delta(delta_x: f32) -> i64 {
    (delta_x / DAY_WIDTH).round() as i64
}

impl InteractionController {
    pub fn begin_resize(
        &mut self,
        task: Uuid,
        edge: ResizeEdge,
        pointer_x: f32,
        start: NaiveDate,
        end: NaiveDate,
    ) {
        self.state = InteractionState::Resizing {
            task,
            edge,
            origin_x: pointer_x,
            start,
            end,
        };
    }

    pub fn begin_drag(&mut self, task: Uuid, pointer_x: f32, start: NaiveDate, end: NaiveDate) {
        self.state = InteractionState::Dragging {
            task,
            origin_x: pointer_x,
            start,
            end,
        };
    }

    /// The span a resize at `pointer_x` would produce. `None` when idle or
    /// when the move would invert the span — inverted spans are rejected at
    /// the point of computation, never corrected afterwards.
    pub fn resize_preview(&self, pointer_x: f32) -> Option<(NaiveDate, NaiveDate)> {
        let InteractionState::Resizing {
            edge,
            origin_x,
            start,
            end,
            ..
        } = self.state
        else {
            return None;
        };
        let delta = drag_day_delta(pointer_x - origin_x);
        match edge {
            ResizeEdge::Start => {
                let new_start = start + Days::days(delta);
                (new_start <= end).then_some((new_start, end))
            }
            ResizeEdge::End => {
                let new_end = end + Days::days(delta);
                (new_end >= start).then_some((start, new_end))
            }
        }
    }

    /// The span a whole-bar drag would produce: shifted, duration preserved.
    pub fn drag_preview(&self, pointer_x: f32) -> Option<(NaiveDate, NaiveDate)> {
        let InteractionState::Dragging {
            origin_x,
            start,
            end,
            ..
        } = self.state
        else {
            return None;
        };
        let delta = drag_day_delta(pointer_x - origin_x);
        Some((start + Days::days(delta), end + Days::days(delta)))
    }

    /// End the current gesture and start the click-suppression cooldown.
    pub fn finish(&mut self, now: Instant) {
        if self.state != InteractionState::Idle {
            self.state = InteractionState::Idle;
            self.suppress_until = Some(now + CLICK_SUPPRESS);
        }
    }

    /// Whether a background click may create a task right now.
    pub fn click_allowed(&self, now: Instant) -> bool {
        self.state == InteractionState::Idle
            && self.suppress_until.map_or(true, |until| now >= until)
    }
}

/// Where a dragged list item should be spliced while hovering over the item
/// at `hover`: removal at `drag`, insertion at the returned index. `None`
/// while the pointer hasn't crossed the hovered item's vertical midpoint in
/// the travel direction (prevents reorder jitter at the boundary).
pub fn splice_target(drag: usize, hover: usize, below_midpoint: bool) -> Option<usize> {
    if drag == hover {
        return None;
    }
    if drag < hover {
        // Moving down: fire once the pointer is past the midpoint.
        below_midpoint.then_some(hover)
    } else {
        // Moving up: fire while still above the midpoint.
        (!below_midpoint).then_some(hover)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn end_resize_of_three_day_widths_extends_three_days() {
        let mut c = InteractionController::default();
        c.begin_resize(
            Uuid::new_v4(),
            ResizeEdge::End,
            100.0,
            date(2026, 3, 10),
            date(2026, 3, 12),
        );
        let span = c.resize_preview(100.0 + 3.0 * DAY_WIDTH).unwrap();
        assert_eq!(span, (date(2026, 3, 10), date(2026, 3, 15)));
    }

    #[test]
    fn sub_day_movement_snaps_to_day_boundaries() {
        assert_eq!(drag_day_delta(0.4 * DAY_WIDTH), 0);
        assert_eq!(drag_day_delta(0.6 * DAY_WIDTH), 1);
        assert_eq!(drag_day_delta(-0.6 * DAY_WIDTH), -1);
        assert_eq!(drag_day_delta(2.49 * DAY_WIDTH), 2);
    }

    #[test]
    fn inverting_resizes_are_rejected() {
        let mut c = InteractionController::default();
        c.begin_resize(
            Uuid::new_v4(),
            ResizeEdge::Start,
            0.0,
            date(2026, 3, 10),
            date(2026, 3, 12),
        );
        // Dragging the start edge 5 days right would pass the end.
        assert_eq!(c.resize_preview(5.0 * DAY_WIDTH), None);
        // 2 days right is the limit (start == end is a valid single day).
        assert_eq!(
            c.resize_preview(2.0 * DAY_WIDTH),
            Some((date(2026, 3, 12), date(2026, 3, 12)))
        );

        c.begin_resize(
            Uuid::new_v4(),
            ResizeEdge::End,
            0.0,
            date(2026, 3, 10),
            date(2026, 3, 12),
        );
        assert_eq!(c.resize_preview(-3.0 * DAY_WIDTH), None);
    }

    #[test]
    fn drag_preserves_duration() {
        let mut c = InteractionController::default();
        c.begin_drag(Uuid::new_v4(), 50.0, date(2026, 3, 10), date(2026, 3, 14));
        let span = c.drag_preview(50.0 - 7.0 * DAY_WIDTH).unwrap();
        assert_eq!(span, (date(2026, 3, 3), date(2026, 3, 7)));
    }

    #[test]
    fn finishing_a_gesture_suppresses_clicks_for_the_cooldown() {
        let mut c = InteractionController::default();
        let t0 = Instant::now();
        assert!(c.click_allowed(t0));

        c.begin_drag(Uuid::new_v4(), 0.0, date(2026, 3, 1), date(2026, 3, 2));
        assert!(!c.click_allowed(t0)); // mid-gesture, never allowed
        c.finish(t0);
        assert_eq!(c.state, InteractionState::Idle);
        assert!(!c.click_allowed(t0 + Duration::from_millis(100)));
        assert!(c.click_allowed(t0 + CLICK_SUPPRESS));
    }

    #[test]
    fn finish_from_idle_does_not_arm_suppression() {
        let mut c = InteractionController::default();
        let t0 = Instant::now();
        c.finish(t0);
        assert!(c.click_allowed(t0));
    }

    #[test]
    fn splice_fires_on_the_correct_side_of_the_midpoint() {
        // Moving down (drag 0 over item 2).
        assert_eq!(splice_target(0, 2, false), None);
        assert_eq!(splice_target(0, 2, true), Some(2));
        // Moving up (drag 2 over item 0).
        assert_eq!(splice_target(2, 0, true), None);
        assert_eq!(splice_target(2, 0, false), Some(0));
        // Hovering yourself is a no-op.
        assert_eq!(splice_target(1, 1, true), None);
    }
}
