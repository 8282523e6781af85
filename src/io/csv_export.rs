use crate::model::Board;
use std::path::Path;

/// Export the task list to a semicolon-delimited CSV file matching the
/// import format.
///
/// Columns: Title ; Start ; End ; Status ; Swimlane ; Assignee ; Notes
/// Dates are formatted as YYYY-MM-DD; undated fields stay empty.
/// Returns the number of tasks written.
pub fn export_csv(board: &Board, path: &Path) -> Result<usize, String> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_path(path)
        .map_err(|e| format!("Failed to create CSV file: {}", e))?;

    wtr.write_record(["Title", "Start", "End", "Status", "Swimlane", "Assignee", "Notes"])
        .map_err(|e| format!("Failed to write header: {}", e))?;

    for task in &board.tasks {
        let status = board
            .column_of(task)
            .map(|c| c.title.clone())
            .unwrap_or_default();
        let swimlane = task
            .swimlane_id
            .and_then(|id| board.swimlanes.iter().find(|l| l.id == id))
            .map(|l| l.name.clone())
            .unwrap_or_default();
        let assignee = task
            .assignee_id
            .and_then(|id| board.people.iter().find(|p| p.id == id))
            .map(|p| p.name.clone())
            .unwrap_or_default();

        wtr.write_record([
            task.title.as_str(),
            &task
                .start
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            &task
                .end
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            &status,
            &swimlane,
            &assignee,
            task.notes.as_str(),
        ])
        .map_err(|e| format!("Failed to write task '{}': {}", task.title, e))?;
    }

    wtr.flush().map_err(|e| format!("Failed to flush CSV: {}", e))?;
    Ok(board.tasks.len())
}
