use std::path::Path;

use crate::model::task::parse_date;
use crate::model::{Board, Person, Swimlane, Task};

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons >= commas && semicolons >= tabs {
        b';'
    } else if tabs >= commas {
        b'\t'
    } else {
        b','
    }
}

/// Normalize a header string to a canonical column key.
fn normalize_header(h: &str) -> String {
    h.trim().to_lowercase().replace([' ', '-', '_'], "")
}

/// Map a normalized header to our column index:
///   0 = title, 1 = start, 2 = end, 3 = status, 4 = swimlane,
///   5 = assignee, 6 = notes, 7 = board-only
fn header_to_col(normalized: &str) -> Option<usize> {
    match normalized {
        "title" | "name" | "task" | "taskname" | "label" | "activity" => Some(0),

        "start" | "startdate" | "from" | "begin" | "begindate" => Some(1),

        "end" | "enddate" | "to" | "finish" | "finishdate" | "due" | "duedate" => Some(2),

        "status" | "state" | "column" | "stage" => Some(3),

        "swimlane" | "lane" | "project" | "group" => Some(4),

        "assignee" | "person" | "owner" | "assignedto" => Some(5),

        "notes" | "note" | "description" | "details" | "comment" | "comments" => Some(6),

        "boardonly" | "noschedule" | "unscheduled" => Some(7),

        _ => None,
    }
}

/// Import a board from a CSV file.
///
/// Auto-detects delimiter (comma, semicolon, tab) and matches column
/// headers flexibly. Only a title column is required — dates, status,
/// swimlane and assignee are all optional, and an unparseable date is
/// treated as absent rather than failing the row. Swimlanes, people and
/// status columns are created on first mention.
/// Returns `(board, skipped_count)` on success.
pub fn import_csv(path: &Path) -> Result<(Board, usize), String> {
    // Read the whole file to detect delimiter from the first line
    let content =
        std::fs::read_to_string(path).map_err(|e| format!("Failed to read file: {}", e))?;

    let first_line = content.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(first_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| format!("Failed to read CSV headers: {}", e))?
        .clone();

    let col_map: Vec<Option<usize>> = headers
        .iter()
        .map(|h| header_to_col(&normalize_header(h)))
        .collect();

    if !col_map.iter().any(|c| *c == Some(0)) {
        let found: Vec<&str> = headers.iter().collect();
        return Err(format!(
            "CSV is missing a task title column. Found headers: {:?}.",
            found
        ));
    }

    let mut board = Board::default();
    let mut skipped = 0usize;

    for (i, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Skipping CSV row {}: {}", i + 2, e);
                skipped += 1;
                continue;
            }
        };

        let mut fields: [Option<String>; 8] = Default::default();
        for (col_idx, field) in record.iter().enumerate() {
            if let Some(Some(slot)) = col_map.get(col_idx) {
                fields[*slot] = Some(field.trim().to_string());
            }
        }
        let [title, start, end, status, swimlane, assignee, notes, board_only] = fields;

        let title = match title {
            Some(t) if !t.is_empty() => t,
            _ => {
                skipped += 1;
                continue;
            }
        };

        // Malformed dates become absent dates; the task still imports and
        // falls back to board-only display.
        let start = start.as_deref().and_then(parse_date);
        let end = end.as_deref().and_then(parse_date);

        let status_id = match status.filter(|s| !s.is_empty()) {
            Some(name) => {
                match board
                    .columns
                    .iter()
                    .find(|c| c.title.eq_ignore_ascii_case(&name))
                {
                    Some(col) => col.id,
                    None => {
                        let col = crate::model::StatusColumn::new(
                            name,
                            egui::Color32::from_rgb(120, 126, 148),
                        );
                        let id = col.id;
                        board.columns.push(col);
                        id
                    }
                }
            }
            None => board.default_status(),
        };

        let swimlane_id = swimlane.filter(|s| !s.is_empty()).map(|name| {
            match board
                .swimlanes
                .iter()
                .find(|l| l.name.eq_ignore_ascii_case(&name))
            {
                Some(lane) => lane.id,
                None => {
                    let lane = Swimlane::new(name);
                    let id = lane.id;
                    board.swimlanes.push(lane);
                    id
                }
            }
        });

        let assignee_id = assignee.filter(|s| !s.is_empty()).map(|name| {
            match board
                .people
                .iter()
                .find(|p| p.name.eq_ignore_ascii_case(&name))
            {
                Some(person) => person.id,
                None => {
                    let person = Person::new(name);
                    let id = person.id;
                    board.people.push(person);
                    id
                }
            }
        });

        let mut task = Task::new(title, status_id);
        task.start = start;
        task.end = end;
        task.notes = notes.unwrap_or_default();
        task.swimlane_id = swimlane_id;
        task.assignee_id = assignee_id;
        task.board_only = board_only
            .as_deref()
            .map(|s| matches!(s.to_lowercase().as_str(), "true" | "yes" | "1"))
            .unwrap_or(false);
        board.tasks.push(task);
    }

    if board.tasks.is_empty() {
        if skipped > 0 {
            return Err(format!(
                "No valid tasks found in CSV ({} rows skipped)",
                skipped
            ));
        }
        return Err("CSV file is empty or has no data rows".to_string());
    }

    Ok((board, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn write_temp(content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("planboard-csv-{}.csv", Uuid::new_v4()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn imports_and_creates_referenced_rows() {
        let path = write_temp(
            "Title;Start;End;Status;Swimlane;Assignee\n\
             Design;2026-03-01;2026-03-05;In Progress;Website;Ada\n\
             Build;2026-03-06;;Open;Website;\n",
        );
        let (board, skipped) = import_csv(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(skipped, 0);
        assert_eq!(board.tasks.len(), 2);
        assert_eq!(board.swimlanes.len(), 1);
        assert_eq!(board.people.len(), 1);
        // Both tasks share the lane created on first mention.
        assert_eq!(board.tasks[0].swimlane_id, board.tasks[1].swimlane_id);
        assert_eq!(
            board.tasks[0].start,
            NaiveDate::from_ymd_opt(2026, 3, 1)
        );
        // Missing end date imports as absent, not a failure.
        assert_eq!(board.tasks[1].end, None);
    }

    #[test]
    fn malformed_date_imports_as_undated_task() {
        let path = write_temp("Title,Start,End\nThing,tomorrow-ish,2026-03-05\n");
        let (board, skipped) = import_csv(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(skipped, 0);
        assert_eq!(board.tasks[0].start, None);
        // No start date, so the task is Kanban-only.
        assert_eq!(board.tasks[0].schedule(), None);
    }

    #[test]
    fn titleless_rows_are_skipped() {
        let path = write_temp("Title;Start\nReal;2026-01-01\n;2026-01-02\n");
        let (board, skipped) = import_csv(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(board.tasks.len(), 1);
        assert_eq!(skipped, 1);
    }
}
