use chrono::NaiveDate;
use egui::Color32;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single unit of work, shown as a bar on the Timeline and a card on the Board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    /// Id of the status column this task sits in. Always set; if the column
    /// was deleted the renderer falls back to the first column.
    pub status: Uuid,
    #[serde(default)]
    pub notes: String,
    /// Calendar dates only, no time-of-day component. Unparseable stored
    /// values deserialize to `None` so a bad date never blocks loading.
    #[serde(with = "date_serde", default)]
    pub start: Option<NaiveDate>,
    #[serde(with = "date_serde", default)]
    pub end: Option<NaiveDate>,
    #[serde(with = "opt_color_serde", default)]
    pub color: Option<Color32>,
    /// Excluded from timeline placement regardless of dates.
    #[serde(default)]
    pub board_only: bool,
    #[serde(default)]
    pub swimlane_id: Option<Uuid>,
    #[serde(default)]
    pub assignee_id: Option<Uuid>,
}

impl Task {
    /// Create a new task with sensible defaults.
    pub fn new(title: impl Into<String>, status: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            status,
            notes: String::new(),
            start: None,
            end: None,
            color: None,
            board_only: false,
            swimlane_id: None,
            assignee_id: None,
        }
    }

    /// The dates this task occupies on the timeline, normalized so the
    /// result is always a valid inclusive span.
    ///
    /// `None` when the task is board-only or has no start date. A missing
    /// (or inverted) end date collapses to a single-day span at start.
    pub fn schedule(&self) -> Option<(NaiveDate, NaiveDate)> {
        if self.board_only {
            return None;
        }
        let start = self.start?;
        let end = match self.end {
            Some(end) if end >= start => end,
            _ => start,
        };
        Some((start, end))
    }

    /// Inclusive duration in days, if the task is scheduled.
    pub fn duration_days(&self) -> Option<i64> {
        self.schedule().map(|(s, e)| (e - s).num_days() + 1)
    }
}

/// Try parsing a date string with several common formats.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    for fmt in &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

/// Serde helper for optional dates stored as `YYYY-MM-DD` strings.
/// Malformed stored strings read back as `None` rather than failing the load.
mod date_serde {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_some(&d.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(super::parse_date))
    }
}

/// Serde helper for `Option<Color32>` (stored as RGBA).
pub(crate) mod opt_color_serde {
    use egui::Color32;
    use serde::{self, Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(color: &Option<Color32>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        color
            .map(|c| [c.r(), c.g(), c.b(), c.a()])
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Color32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rgba: Option<[u8; 4]> = Deserialize::deserialize(deserializer)?;
        Ok(rgba.map(|[r, g, b, a]| Color32::from_rgba_premultiplied(r, g, b, a)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn schedule_requires_start() {
        let mut t = Task::new("a", Uuid::new_v4());
        assert_eq!(t.schedule(), None);
        t.end = Some(date(2026, 3, 10));
        assert_eq!(t.schedule(), None);
    }

    #[test]
    fn schedule_collapses_missing_or_inverted_end() {
        let mut t = Task::new("a", Uuid::new_v4());
        t.start = Some(date(2026, 3, 10));
        assert_eq!(t.schedule(), Some((date(2026, 3, 10), date(2026, 3, 10))));
        t.end = Some(date(2026, 3, 8)); // inverted
        assert_eq!(t.schedule(), Some((date(2026, 3, 10), date(2026, 3, 10))));
    }

    #[test]
    fn board_only_is_never_scheduled() {
        let mut t = Task::new("a", Uuid::new_v4());
        t.start = Some(date(2026, 3, 10));
        t.end = Some(date(2026, 3, 12));
        t.board_only = true;
        assert_eq!(t.schedule(), None);
    }

    #[test]
    fn malformed_stored_date_reads_as_absent() {
        let mut t = Task::new("a", Uuid::new_v4());
        t.start = Some(date(2026, 1, 5));
        let mut json = serde_json::to_value(&t).unwrap();
        json["start"] = serde_json::Value::String("not-a-date".into());
        let back: Task = serde_json::from_value(json).unwrap();
        assert_eq!(back.start, None);
    }

    #[test]
    fn parse_date_accepts_common_formats() {
        for s in &["2026-06-15", "15/06/2026", "06/15/2026", "15.06.2026"] {
            assert!(parse_date(s).is_some(), "failed on {s}");
        }
        assert_eq!(parse_date("garbage"), None);
    }
}
