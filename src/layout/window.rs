//! The virtualization window: the materialized subrange of the infinite
//! date axis.
//!
//! The Timeline never lays out "all" days — it keeps a sliding window of
//! day indices live and extends it (never shrinks it) when the scroll
//! position approaches an edge. Extending to the left prepends days, so the
//! caller must shift its scroll offset by the same pixel amount or the
//! content would visually jump.

use chrono::NaiveDate;
use std::time::{Duration, Instant};

use super::coords::{self, DAY_WIDTH};

/// Days materialized when the Timeline first mounts.
pub const WINDOW_DAY_COUNT: i64 = 240;
/// When the first/last visible day gets this close to a window edge, extend.
pub const WINDOW_BUFFER_DAYS: i64 = 60;
/// Days added per extension.
pub const WINDOW_CHUNK_DAYS: i64 = 60;
/// Minimum interval between extension checks during continuous scrolling.
pub const EXTEND_THROTTLE: Duration = Duration::from_millis(100);

/// Result of an extension check.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extension {
    pub extended: bool,
    /// Pixels the caller must add to its scroll offset so a left extension
    /// is visually invisible. Compensations queue: always add, never assign.
    pub scroll_compensation_px: f32,
}

/// Sliding window state. Grows monotonically for the lifetime of the
/// Timeline view; reset only on remount.
#[derive(Debug, Clone)]
pub struct VirtualWindow {
    /// Day index of the first materialized day.
    pub start_index: i64,
    /// Number of materialized days.
    pub day_count: i64,
    last_check: Option<Instant>,
}

impl VirtualWindow {
    /// A window centered on the given reference date.
    pub fn centered_on(reference: NaiveDate) -> Self {
        Self {
            start_index: coords::date_to_index(reference) - WINDOW_DAY_COUNT / 2,
            day_count: WINDOW_DAY_COUNT,
            last_check: None,
        }
    }

    /// One past the last materialized day index.
    pub fn end_index(&self) -> i64 {
        self.start_index + self.day_count
    }

    /// Total canvas width for the materialized days.
    pub fn width_px(&self) -> f32 {
        self.day_count as f32 * DAY_WIDTH
    }

    /// Does an inclusive day-index span intersect the window?
    pub fn intersects(&self, span_start: i64, span_end: i64) -> bool {
        span_start < self.end_index() && span_end >= self.start_index
    }

    /// Check the visible day range against both edges and extend where the
    /// buffer is breached. Throttled: during continuous scrolling at most
    /// one decision is evaluated per [`EXTEND_THROTTLE`], and one call can
    /// extend at most once per side.
    pub fn maybe_extend(
        &mut self,
        first_visible: i64,
        last_visible: i64,
        now: Instant,
    ) -> Extension {
        if let Some(last) = self.last_check {
            if now.saturating_duration_since(last) < EXTEND_THROTTLE {
                return Extension::default();
            }
        }
        self.last_check = Some(now);

        let mut ext = Extension::default();
        if first_visible - self.start_index < WINDOW_BUFFER_DAYS {
            self.start_index -= WINDOW_CHUNK_DAYS;
            self.day_count += WINDOW_CHUNK_DAYS;
            ext.extended = true;
            ext.scroll_compensation_px += WINDOW_CHUNK_DAYS as f32 * DAY_WIDTH;
        }
        if self.end_index() - last_visible < WINDOW_BUFFER_DAYS {
            self.day_count += WINDOW_CHUNK_DAYS;
            ext.extended = true;
            // Appending needs no compensation.
        }
        ext
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn initial_window_is_centered_on_reference() {
        let w = VirtualWindow::centered_on(date(2026, 3, 15));
        assert_eq!(w.start_index, coords::date_to_index(date(2026, 3, 15)) - 120);
        assert_eq!(w.day_count, WINDOW_DAY_COUNT);
    }

    #[test]
    fn left_breach_extends_once_with_pixel_compensation() {
        let mut w = VirtualWindow::centered_on(date(2026, 3, 15));
        let start = w.start_index;
        // First visible day inside the left buffer zone.
        let ext = w.maybe_extend(start + WINDOW_BUFFER_DAYS - 1, start + 70, Instant::now());
        assert!(ext.extended);
        assert_eq!(w.start_index, start - WINDOW_CHUNK_DAYS);
        assert_eq!(
            ext.scroll_compensation_px,
            WINDOW_CHUNK_DAYS as f32 * DAY_WIDTH
        );
    }

    #[test]
    fn right_breach_extends_without_compensation() {
        let mut w = VirtualWindow::centered_on(date(2026, 3, 15));
        let end = w.end_index();
        let count = w.day_count;
        let ext = w.maybe_extend(end - 80, end - WINDOW_BUFFER_DAYS + 1, Instant::now());
        assert!(ext.extended);
        assert_eq!(w.day_count, count + WINDOW_CHUNK_DAYS);
        assert_eq!(ext.scroll_compensation_px, 0.0);
    }

    #[test]
    fn mid_window_scroll_does_not_extend() {
        let mut w = VirtualWindow::centered_on(date(2026, 3, 15));
        let before = (w.start_index, w.day_count);
        let mid = w.start_index + w.day_count / 2;
        let ext = w.maybe_extend(mid, mid + 20, Instant::now());
        assert!(!ext.extended);
        assert_eq!((w.start_index, w.day_count), before);
    }

    #[test]
    fn rapid_checks_are_throttled() {
        let mut w = VirtualWindow::centered_on(date(2026, 3, 15));
        let start = w.start_index;
        let t0 = Instant::now();
        let first = w.maybe_extend(start, start + 10, t0);
        assert!(first.extended);
        // Immediately after: throttled, no second extension.
        let second = w.maybe_extend(w.start_index, w.start_index + 10, t0 + Duration::from_millis(10));
        assert!(!second.extended);
        // Past the throttle interval the edge check runs again.
        let third = w.maybe_extend(w.start_index, w.start_index + 10, t0 + Duration::from_millis(150));
        assert!(third.extended);
    }

    #[test]
    fn window_never_shrinks() {
        let mut w = VirtualWindow::centered_on(date(2026, 3, 15));
        let mut t = Instant::now();
        let mut prev_count = w.day_count;
        let mut prev_start = w.start_index;
        for i in 0..10 {
            t += Duration::from_millis(200);
            // Alternate hammering both edges.
            let (fv, lv) = if i % 2 == 0 {
                (w.start_index, w.start_index + 5)
            } else {
                (w.end_index() - 5, w.end_index())
            };
            w.maybe_extend(fv, lv, t);
            assert!(w.day_count >= prev_count);
            assert!(w.start_index <= prev_start);
            prev_count = w.day_count;
            prev_start = w.start_index;
        }
    }
}
