use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use egui::RichText;
use uuid::Uuid;

use crate::io::csv_export::export_csv;
use crate::io::csv_import::import_csv;
use crate::io::file::{load_board, save_board};
use crate::io::store::KvStore;
use crate::model::{Board, GroupMode, Swimlane, Task};
use crate::ui::board::{show_board, BoardAction};
use crate::ui::theme;
use crate::ui::timeline::TimelineView;
use crate::ui::dialogs;
use crate::ui::toolbar::{show_toolbar, ToolbarAction};

const STORE_KEY_BOARD: &str = "board";
const STORE_KEY_VIEW: &str = "view";
const STORE_KEY_MODE: &str = "group_mode";

/// Which main view fills the central panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum View {
    Timeline,
    Board,
}

pub struct PlanboardApp {
    pub board: Board,
    pub store: KvStore,
    pub view: View,
    pub mode: GroupMode,
    pub timeline: TimelineView,
    pub selected_task: Option<Uuid>,
    pub editing_task: Option<Uuid>,
    pub show_swimlanes: bool,
    pub show_people: bool,
    pub show_about: bool,
    pub new_swimlane_name: String,
    pub new_person_name: String,
    /// File the board was last opened from / saved to, if any.
    pub file_path: Option<PathBuf>,
    pub status_message: String,
    /// Changes not yet written to `file_path`. The store autosave is
    /// independent of this flag.
    pub dirty: bool,
    last_autosaved: DateTime<Utc>,
    last_view: View,
    last_mode: GroupMode,
}

impl PlanboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);
        theme::apply_theme(&cc.egui_ctx);

        let store = KvStore::open();
        let board: Board = store.get_as(STORE_KEY_BOARD).unwrap_or_else(sample_board);
        let view = store.get_as(STORE_KEY_VIEW).unwrap_or(View::Timeline);
        let mode = store.get_as(STORE_KEY_MODE).unwrap_or(GroupMode::Projects);
        let last_autosaved = board.modified;

        Self {
            board,
            store,
            view,
            mode,
            timeline: TimelineView::new(),
            selected_task: None,
            editing_task: None,
            show_swimlanes: false,
            show_people: false,
            show_about: false,
            new_swimlane_name: String::new(),
            new_person_name: String::new(),
            file_path: None,
            status_message: "Ready".to_string(),
            dirty: false,
            last_autosaved,
            last_view: view,
            last_mode: mode,
        }
    }

    fn handle_toolbar(&mut self, action: ToolbarAction) {
        match action {
            ToolbarAction::None => {}
            ToolbarAction::NewBoard => {
                self.board = Board::new("Untitled Plan");
                self.selected_task = None;
                self.editing_task = None;
                self.file_path = None;
                self.dirty = true;
                self.status_message = "New board".to_string();
            }
            ToolbarAction::OpenFile => {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Planboard", &["json"])
                    .pick_file()
                {
                    match load_board(&path) {
                        Ok(board) => {
                            self.board = board;
                            self.selected_task = None;
                            self.editing_task = None;
                            self.file_path = Some(path);
                            self.dirty = false;
                            self.status_message =
                                format!("Opened '{}'", self.board.name);
                        }
                        Err(e) => self.status_message = format!("Open failed: {e}"),
                    }
                }
            }
            ToolbarAction::Save => self.save_to_file(false),
            ToolbarAction::SaveAs => self.save_to_file(true),
            ToolbarAction::ImportCsv => {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("CSV", &["csv"])
                    .pick_file()
                {
                    match import_csv(&path) {
                        Ok((board, n)) => {
                            self.board = board;
                            self.selected_task = None;
                            self.file_path = None;
                            self.dirty = true;
                            self.status_message = format!("Imported {n} tasks");
                        }
                        Err(e) => self.status_message = format!("Import failed: {e}"),
                    }
                }
            }
            ToolbarAction::ExportCsv => {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("CSV", &["csv"])
                    .set_file_name("planboard.csv")
                    .save_file()
                {
                    match export_csv(&self.board, &path) {
                        Ok(n) => self.status_message = format!("Exported {n} tasks"),
                        Err(e) => self.status_message = format!("Export failed: {e}"),
                    }
                }
            }
            ToolbarAction::JumpToToday => {
                self.view = View::Timeline;
                self.timeline
                    .scroll_to_date(chrono::Local::now().date_naive());
            }
            ToolbarAction::OpenDataFolder => {
                let _ = open::that(self.store.dir());
            }
        }
    }

    fn save_to_file(&mut self, pick_new: bool) {
        let path = if pick_new {
            None
        } else {
            self.file_path.clone()
        };
        let path = path.or_else(|| {
            rfd::FileDialog::new()
                .add_filter("Planboard", &["json"])
                .set_file_name(format!("{}.json", self.board.name))
                .save_file()
        });
        let Some(path) = path else { return };
        match save_board(&self.board, &path) {
            Ok(()) => {
                self.status_message = format!("Saved to {}", path.display());
                self.file_path = Some(path);
                self.dirty = false;
            }
            Err(e) => self.status_message = format!("Save failed: {e}"),
        }
    }

    fn handle_board_action(&mut self, action: BoardAction) {
        match action {
            BoardAction::None => {}
            BoardAction::Select(id) => {
                self.selected_task = Some(id);
                self.editing_task = Some(id);
            }
            BoardAction::Add(status) => {
                let task = Task::new("New task", status);
                let id = task.id;
                self.board.tasks.push(task);
                self.board.touch();
                self.selected_task = Some(id);
                self.editing_task = Some(id);
                self.dirty = true;
            }
            BoardAction::SetStatus(task, status) => {
                self.board.set_status(task, status);
                self.dirty = true;
            }
            BoardAction::Reorder(dragged, target, before) => {
                self.board.reorder_task(dragged, target, before);
                self.dirty = true;
            }
        }
    }

    /// Persist board and view prefs to the store when they changed this frame.
    fn autosave(&mut self) {
        if self.board.modified != self.last_autosaved {
            self.store.set_as(STORE_KEY_BOARD, &self.board);
            self.last_autosaved = self.board.modified;
        }
        if self.view != self.last_view || self.mode != self.last_mode {
            self.store.set_as(STORE_KEY_VIEW, &self.view);
            self.store.set_as(STORE_KEY_MODE, &self.mode);
            self.last_view = self.view;
            self.last_mode = self.mode;
        }
    }
}

impl eframe::App for PlanboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let action = show_toolbar(self, ctx);
        self.handle_toolbar(action);

        // Ctrl+S / Ctrl+Shift+S, matching the File menu.
        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::S)) {
            let pick_new = ctx.input(|i| i.modifiers.shift);
            self.save_to_file(pick_new);
        }

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .frame(
                egui::Frame::none()
                    .fill(theme::BG_PANEL)
                    .inner_margin(egui::Margin::symmetric(10.0, 4.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        RichText::new(&self.status_message)
                            .color(theme::TEXT_SECONDARY)
                            .size(11.5),
                    );
                    ui.with_layout(
                        egui::Layout::right_to_left(egui::Align::Center),
                        |ui| {
                            let scheduled = self
                                .board
                                .tasks
                                .iter()
                                .filter(|t| t.schedule().is_some())
                                .count();
                            ui.label(
                                RichText::new(format!(
                                    "{} tasks, {} scheduled",
                                    self.board.tasks.len(),
                                    scheduled
                                ))
                                .color(theme::TEXT_DIM)
                                .size(11.5),
                            );
                        },
                    );
                });
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(theme::BG_DARK))
            .show(ctx, |ui| match self.view {
                View::Timeline => {
                    let interaction = self.timeline.show(
                        &mut self.board,
                        self.mode,
                        &mut self.selected_task,
                        ui,
                    );
                    if interaction.changed {
                        self.dirty = true;
                    }
                    if let Some(create) = interaction.create_task {
                        let mut task = Task::new("New task", self.board.default_status());
                        task.start = Some(create.date);
                        task.end = Some(create.date + Duration::days(2));
                        match self.mode {
                            GroupMode::Projects => task.swimlane_id = create.row,
                            GroupMode::People => task.assignee_id = create.row,
                        }
                        let id = task.id;
                        self.board.tasks.push(task);
                        self.board.touch();
                        self.selected_task = Some(id);
                        self.editing_task = Some(id);
                        self.dirty = true;
                    }
                }
                View::Board => {
                    let action = show_board(&self.board, self.selected_task, ui);
                    self.handle_board_action(action);
                }
            });

        if self.editing_task.is_some() {
            dialogs::show_task_editor(self, ctx);
        }
        if self.show_swimlanes {
            dialogs::show_swimlane_manager(self, ctx);
        }
        if self.show_people {
            dialogs::show_people_manager(self, ctx);
        }
        if self.show_about {
            dialogs::show_about_dialog(self, ctx);
        }

        self.autosave();
    }
}

/// A small starter board so a first launch shows the app working.
fn sample_board() -> Board {
    let mut board = Board::new("My Plan");
    let design = Swimlane::new("Design");
    let build = Swimlane::new("Build");
    let design_id = design.id;
    let build_id = build.id;
    board.swimlanes.push(design);
    board.swimlanes.push(build);

    let today = chrono::Local::now().date_naive();
    let status = board.default_status();

    let mut kickoff = Task::new("Kick-off", status);
    kickoff.start = Some(today);
    kickoff.end = Some(today + Duration::days(1));
    kickoff.swimlane_id = Some(design_id);
    kickoff.color = Some(theme::task_color(0));
    board.tasks.push(kickoff);

    let mut wireframes = Task::new("Wireframes", status);
    wireframes.start = Some(today + Duration::days(2));
    wireframes.end = Some(today + Duration::days(6));
    wireframes.swimlane_id = Some(design_id);
    wireframes.color = Some(theme::task_color(1));
    board.tasks.push(wireframes);

    let mut prototype = Task::new("Prototype", status);
    prototype.start = Some(today + Duration::days(4));
    prototype.end = Some(today + Duration::days(10));
    prototype.swimlane_id = Some(build_id);
    prototype.color = Some(theme::task_color(2));
    board.tasks.push(prototype);

    let mut backlog = Task::new("Collect feedback", status);
    backlog.board_only = true;
    backlog.swimlane_id = Some(design_id);
    board.tasks.push(backlog);

    board
}
