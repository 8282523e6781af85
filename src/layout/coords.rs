//! The timeline coordinate model.
//!
//! All layout math runs on *day indices*: whole-day offsets from a fixed
//! epoch. Dates are pure calendar dates (no time-of-day), so the mapping is
//! immune to DST and leap-second drift, and every day is exactly
//! [`DAY_WIDTH`] pixels wide.

use chrono::{Duration, NaiveDate};

/// Horizontal pixels per day cell.
pub const DAY_WIDTH: f32 = 60.0;

/// The fixed epoch all day indices are relative to.
pub fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).expect("epoch is a valid date")
}

/// Whole days between the epoch and `date`. Negative before the epoch.
pub fn date_to_index(date: NaiveDate) -> i64 {
    (date - epoch()).num_days()
}

/// Inverse of [`date_to_index`]; round-trips exactly for any index.
pub fn index_to_date(index: i64) -> NaiveDate {
    epoch() + Duration::days(index)
}

/// Pixel offset of the left edge of a day cell.
pub fn index_to_offset(index: i64) -> f32 {
    index as f32 * DAY_WIDTH
}

/// Pixel width of an inclusive day span. Malformed (inverted) ranges still
/// occupy a minimum of one day.
pub fn span_width(start_index: i64, end_index: i64) -> f32 {
    (end_index - start_index + 1).max(1) as f32 * DAY_WIDTH
}

/// The inclusive range of day offsets covered by a viewport, given a scroll
/// position in the same pixel space (offset 0 = day 0 of that space).
pub fn visible_day_range(scroll_left: f32, viewport_width: f32) -> (i64, i64) {
    let first = (scroll_left / DAY_WIDTH).floor() as i64;
    let last = ((scroll_left + viewport_width) / DAY_WIDTH).ceil() as i64;
    (first, last)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn round_trips_across_month_and_year_boundaries() {
        for d in [
            date(2026, 2, 28),
            date(2026, 3, 1),
            date(2024, 2, 28),
            date(2024, 2, 29), // leap day
            date(2024, 3, 1),
            date(2025, 12, 31),
            date(2026, 1, 1),
            date(1999, 12, 31), // before the epoch
            date(1970, 6, 15),
        ] {
            assert_eq!(index_to_date(date_to_index(d)), d);
        }
    }

    #[test]
    fn index_round_trips_both_directions() {
        for i in [-40000, -1, 0, 1, 59, 9584, 40000] {
            assert_eq!(date_to_index(index_to_date(i)), i);
        }
    }

    #[test]
    fn consecutive_dates_have_consecutive_indices() {
        let mut d = date(2024, 2, 27);
        let mut prev = date_to_index(d);
        for _ in 0..400 {
            d += Duration::days(1);
            let i = date_to_index(d);
            assert_eq!(i, prev + 1);
            prev = i;
        }
    }

    #[test]
    fn span_width_has_one_day_minimum() {
        assert_eq!(span_width(10, 10), DAY_WIDTH);
        assert_eq!(span_width(10, 12), 3.0 * DAY_WIDTH);
        assert_eq!(span_width(12, 10), DAY_WIDTH); // inverted
    }

    #[test]
    fn visible_range_uses_floor_and_ceil() {
        let (first, last) = visible_day_range(90.0, 500.0);
        assert_eq!(first, 1); // 90 / 60
        assert_eq!(last, 10); // ceil(590 / 60)
        let (first, last) = visible_day_range(0.0, 60.0);
        assert_eq!((first, last), (0, 1));
    }
}
