use chrono::{DateTime, NaiveDate, Utc};
use egui::Color32;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::swimlane::{Person, StatusColumn, Swimlane};
use super::task::Task;

/// Which attribute groups tasks into timeline rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupMode {
    Projects,
    People,
}

/// The single owning collection for all tasks, swimlanes, status columns
/// and people. Every other component works on derived (filtered/sorted)
/// views; nothing stores an independent copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub name: String,
    pub tasks: Vec<Task>,
    pub swimlanes: Vec<Swimlane>,
    pub columns: Vec<StatusColumn>,
    pub people: Vec<Person>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            name: "Untitled Plan".to_string(),
            tasks: Vec::new(),
            swimlanes: Vec::new(),
            columns: default_columns(),
            people: Vec::new(),
            created: Utc::now(),
            modified: Utc::now(),
        }
    }
}

/// The default Kanban lanes for a fresh board.
pub fn default_columns() -> Vec<StatusColumn> {
    vec![
        StatusColumn::new("Open", Color32::from_rgb(120, 126, 148)),
        StatusColumn::new("In Progress", Color32::from_rgb(66, 133, 244)),
        StatusColumn::new("Under Review", Color32::from_rgb(251, 140, 0)),
        StatusColumn::new("Done", Color32::from_rgb(52, 168, 83)),
    ]
}

impl Board {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Touch the modified timestamp.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }

    pub fn task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn task_mut(&mut self, id: Uuid) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// The status id new tasks default to (first column).
    pub fn default_status(&self) -> Uuid {
        self.columns.first().map(|c| c.id).unwrap_or_else(Uuid::nil)
    }

    /// Resolve a task's status column, falling back to the first column
    /// when the reference went stale after a column deletion.
    pub fn column_of<'a>(&'a self, task: &Task) -> Option<&'a StatusColumn> {
        self.columns
            .iter()
            .find(|c| c.id == task.status)
            .or_else(|| self.columns.first())
    }

    pub fn delete_task(&mut self, id: Uuid) {
        self.tasks.retain(|t| t.id != id);
        self.touch();
    }

    /// Delete a swimlane and clear the reference on any task pointing to it.
    /// Tasks themselves are kept.
    pub fn delete_swimlane(&mut self, id: Uuid) {
        self.swimlanes.retain(|l| l.id != id);
        for task in &mut self.tasks {
            if task.swimlane_id == Some(id) {
                task.swimlane_id = None;
            }
        }
        self.touch();
    }

    /// Delete a person; tasks assigned to them become unassigned.
    pub fn delete_person(&mut self, id: Uuid) {
        self.people.retain(|p| p.id != id);
        for task in &mut self.tasks {
            if task.assignee_id == Some(id) {
                task.assignee_id = None;
            }
        }
        self.touch();
    }

    /// Move a task to a new start day and grouping row in one mutation.
    /// The span keeps its original duration; which reference is retargeted
    /// depends on the active grouping mode.
    pub fn move_task(
        &mut self,
        id: Uuid,
        new_start: NaiveDate,
        mode: GroupMode,
        row: Option<Uuid>,
    ) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            let duration = match (task.start, task.end) {
                (Some(s), Some(e)) if e >= s => (e - s).num_days(),
                _ => 0,
            };
            task.start = Some(new_start);
            task.end = Some(new_start + chrono::Duration::days(duration));
            match mode {
                GroupMode::Projects => task.swimlane_id = row,
                GroupMode::People => task.assignee_id = row,
            }
            self.touch();
        }
    }

    pub fn set_status(&mut self, id: Uuid, status: Uuid) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            task.status = status;
            self.touch();
        }
    }

    /// Splice-reorder the swimlane list: remove at `from`, insert at `to`.
    pub fn reorder_swimlanes(&mut self, from: usize, to: usize) {
        if from == to || from >= self.swimlanes.len() || to >= self.swimlanes.len() {
            return;
        }
        let lane = self.swimlanes.remove(from);
        self.swimlanes.insert(to, lane);
        self.touch();
    }

    /// Splice-reorder a card relative to another card in the owning list.
    /// Used by the Board view during drag-over.
    pub fn reorder_task(&mut self, dragged: Uuid, target: Uuid, before: bool) {
        if dragged == target {
            return;
        }
        let Some(from) = self.tasks.iter().position(|t| t.id == dragged) else {
            return;
        };
        let task = self.tasks.remove(from);
        let Some(anchor) = self.tasks.iter().position(|t| t.id == target) else {
            self.tasks.insert(from.min(self.tasks.len()), task);
            return;
        };
        let to = if before { anchor } else { anchor + 1 };
        self.tasks.insert(to.min(self.tasks.len()), task);
        self.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn board_with_lane() -> (Board, Uuid, Uuid) {
        let mut board = Board::default();
        let lane = Swimlane::new("Alpha");
        let lane_id = lane.id;
        board.swimlanes.push(lane);
        let status = board.default_status();
        let mut task = Task::new("t", status);
        task.start = Some(date(2026, 3, 10));
        task.end = Some(date(2026, 3, 14));
        task.swimlane_id = Some(lane_id);
        let task_id = task.id;
        board.tasks.push(task);
        (board, lane_id, task_id)
    }

    #[test]
    fn deleting_swimlane_clears_refs_but_keeps_tasks() {
        let (mut board, lane_id, task_id) = board_with_lane();
        board.delete_swimlane(lane_id);
        assert!(board.swimlanes.is_empty());
        let task = board.task(task_id).unwrap();
        assert_eq!(task.swimlane_id, None);
    }

    #[test]
    fn move_task_preserves_duration_and_retargets_atomically() {
        let (mut board, _, task_id) = board_with_lane();
        let other = Swimlane::new("Beta");
        let other_id = other.id;
        board.swimlanes.push(other);

        board.move_task(task_id, date(2026, 4, 1), GroupMode::Projects, Some(other_id));
        let task = board.task(task_id).unwrap();
        assert_eq!(task.start, Some(date(2026, 4, 1)));
        assert_eq!(task.end, Some(date(2026, 4, 5))); // 5-day span kept
        assert_eq!(task.swimlane_id, Some(other_id));
    }

    #[test]
    fn move_task_in_people_mode_changes_assignee_not_lane() {
        let (mut board, lane_id, task_id) = board_with_lane();
        let person = Person::new("Ada");
        let person_id = person.id;
        board.people.push(person);

        board.move_task(task_id, date(2026, 4, 1), GroupMode::People, Some(person_id));
        let task = board.task(task_id).unwrap();
        assert_eq!(task.assignee_id, Some(person_id));
        assert_eq!(task.swimlane_id, Some(lane_id));
    }

    #[test]
    fn reorder_swimlanes_is_a_splice() {
        let mut board = Board::default();
        for name in ["a", "b", "c"] {
            board.swimlanes.push(Swimlane::new(name));
        }
        board.reorder_swimlanes(0, 2);
        let names: Vec<_> = board.swimlanes.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["b", "c", "a"]);
    }

    #[test]
    fn reorder_task_before_and_after_anchor() {
        let mut board = Board::default();
        let status = board.default_status();
        let ids: Vec<Uuid> = (0..3)
            .map(|i| {
                let t = Task::new(format!("t{i}"), status);
                let id = t.id;
                board.tasks.push(t);
                id
            })
            .collect();

        board.reorder_task(ids[0], ids[2], false);
        let order: Vec<_> = board.tasks.iter().map(|t| t.id).collect();
        assert_eq!(order, [ids[1], ids[2], ids[0]]);

        board.reorder_task(ids[0], ids[1], true);
        let order: Vec<_> = board.tasks.iter().map(|t| t.id).collect();
        assert_eq!(order, [ids[0], ids[1], ids[2]]);
    }

    #[test]
    fn stale_status_falls_back_to_first_column() {
        let (board, _, task_id) = board_with_lane();
        let mut task = board.task(task_id).unwrap().clone();
        task.status = Uuid::new_v4(); // column that no longer exists
        let col = board.column_of(&task).unwrap();
        assert_eq!(col.id, board.columns[0].id);
    }
}
