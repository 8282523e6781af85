use crate::app::{PlanboardApp, View};
use crate::model::GroupMode;
use crate::ui::theme;
use egui::{Context, RichText, TopBottomPanel};
use egui_phosphor::regular;

/// Something the menu bar asked the app to do this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolbarAction {
    #[default]
    None,
    NewBoard,
    OpenFile,
    Save,
    SaveAs,
    ImportCsv,
    ExportCsv,
    JumpToToday,
    OpenDataFolder,
}

pub fn show_toolbar(app: &mut PlanboardApp, ctx: &Context) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    TopBottomPanel::top("toolbar")
        .exact_height(theme::HEADER_HEIGHT)
        .frame(
            egui::Frame::none()
                .fill(theme::BG_PANEL)
                .inner_margin(egui::Margin::symmetric(10.0, 6.0)),
        )
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                ui.menu_button(format!("{} File", regular::FILE), |ui| {
                    if ui.button("New Board").clicked() {
                        action = ToolbarAction::NewBoard;
                        ui.close_menu();
                    }
                    if ui.button("Open...").clicked() {
                        action = ToolbarAction::OpenFile;
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Save").clicked() {
                        action = ToolbarAction::Save;
                        ui.close_menu();
                    }
                    if ui.button("Save As...").clicked() {
                        action = ToolbarAction::SaveAs;
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Import CSV...").clicked() {
                        action = ToolbarAction::ImportCsv;
                        ui.close_menu();
                    }
                    if ui.button("Export CSV...").clicked() {
                        action = ToolbarAction::ExportCsv;
                        ui.close_menu();
                    }
                });

                ui.menu_button(format!("{} View", regular::EYE), |ui| {
                    if ui
                        .radio_value(&mut app.view, View::Timeline, "Timeline")
                        .clicked()
                    {
                        ui.close_menu();
                    }
                    if ui.radio_value(&mut app.view, View::Board, "Board").clicked() {
                        ui.close_menu();
                    }
                    ui.separator();
                    ui.label(RichText::new("Group rows by").color(theme::TEXT_DIM).size(11.0));
                    ui.radio_value(&mut app.mode, GroupMode::Projects, "Projects");
                    ui.radio_value(&mut app.mode, GroupMode::People, "People");
                    ui.separator();
                    if ui.button("Jump to Today").clicked() {
                        action = ToolbarAction::JumpToToday;
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Manage Swimlanes...").clicked() {
                        app.show_swimlanes = true;
                        ui.close_menu();
                    }
                    if ui.button("Manage People...").clicked() {
                        app.show_people = true;
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Open Data Folder").clicked() {
                        action = ToolbarAction::OpenDataFolder;
                        ui.close_menu();
                    }
                });

                ui.menu_button(format!("{} Help", regular::QUESTION), |ui| {
                    if ui.button("About Planboard").clicked() {
                        app.show_about = true;
                        ui.close_menu();
                    }
                });

                ui.separator();

                // Quick view switch, mirrored in the View menu.
                let timeline_label = format!("{} Timeline", regular::CALENDAR_BLANK);
                let board_label = format!("{} Board", regular::KANBAN);
                ui.selectable_value(&mut app.view, View::Timeline, timeline_label);
                ui.selectable_value(&mut app.view, View::Board, board_label);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let mut name = app.board.name.clone();
                    let resp = ui.add(
                        egui::TextEdit::singleline(&mut name)
                            .desired_width(180.0)
                            .font(egui::TextStyle::Button)
                            .hint_text("Board name"),
                    );
                    if resp.changed() {
                        app.board.name = name;
                        app.board.touch();
                        app.dirty = true;
                    }
                    if app.dirty {
                        ui.label(RichText::new("●").color(theme::TEXT_DIM).size(10.0))
                            .on_hover_text("Unsaved changes");
                    }
                });
            });
        });

    action
}
