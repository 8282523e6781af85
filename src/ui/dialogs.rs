use crate::app::PlanboardApp;
use crate::model::{Person, Swimlane};
use crate::ui::theme;
use egui::{Color32, Context, RichText, Window};

/// Render the task editor for the selected task.
pub fn show_task_editor(app: &mut PlanboardApp, ctx: &Context) {
    let Some(task_id) = app.editing_task else {
        return;
    };
    let mut should_close = false;
    let mut delete = false;
    let mut changed = false;

    let columns = app.board.columns.clone();
    let swimlanes = app.board.swimlanes.clone();
    let people = app.board.people.clone();

    let Some(task) = app.board.task_mut(task_id) else {
        app.editing_task = None;
        return;
    };

    Window::new(RichText::new("Edit Task").strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([340.0, 0.0])
        .show(ctx, |ui| {
            ui.visuals_mut().extreme_bg_color = Color32::from_rgb(20, 20, 28);
            ui.visuals_mut().striped = false;
            ui.add_space(4.0);

            egui::Grid::new("task_editor_grid")
                .num_columns(2)
                .striped(false)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("Title").color(theme::TEXT_SECONDARY));
                    changed |= ui
                        .add_sized(
                            [220.0, 24.0],
                            egui::TextEdit::singleline(&mut task.title)
                                .hint_text("Task title..."),
                        )
                        .changed();
                    ui.end_row();

                    ui.label(RichText::new("Status").color(theme::TEXT_SECONDARY));
                    let current = columns
                        .iter()
                        .find(|c| c.id == task.status)
                        .or(columns.first());
                    egui::ComboBox::from_id_salt("task_status")
                        .selected_text(current.map(|c| c.title.as_str()).unwrap_or("—"))
                        .show_ui(ui, |ui| {
                            for col in &columns {
                                if ui
                                    .selectable_value(&mut task.status, col.id, &col.title)
                                    .changed()
                                {
                                    changed = true;
                                }
                            }
                        });
                    ui.end_row();

                    ui.label(RichText::new("Start").color(theme::TEXT_SECONDARY));
                    ui.horizontal(|ui| {
                        let mut start = task
                            .start
                            .unwrap_or_else(|| chrono::Local::now().date_naive());
                        if ui
                            .add(
                                egui_extras::DatePickerButton::new(&mut start)
                                    .id_salt("task_dp_start"),
                            )
                            .changed()
                        {
                            task.start = Some(start);
                            changed = true;
                        }
                        if task.start.is_some() && ui.small_button("✕").clicked() {
                            task.start = None;
                            changed = true;
                        }
                    });
                    ui.end_row();

                    ui.label(RichText::new("End").color(theme::TEXT_SECONDARY));
                    ui.horizontal(|ui| {
                        let mut end = task
                            .end
                            .or(task.start)
                            .unwrap_or_else(|| chrono::Local::now().date_naive());
                        if ui
                            .add(
                                egui_extras::DatePickerButton::new(&mut end)
                                    .id_salt("task_dp_end"),
                            )
                            .changed()
                        {
                            // Never store an inverted span.
                            if task.start.map_or(true, |s| end >= s) {
                                task.end = Some(end);
                                changed = true;
                            }
                        }
                        if task.end.is_some() && ui.small_button("✕").clicked() {
                            task.end = None;
                            changed = true;
                        }
                    });
                    ui.end_row();

                    ui.label(RichText::new("Swimlane").color(theme::TEXT_SECONDARY));
                    let lane_name = task
                        .swimlane_id
                        .and_then(|id| swimlanes.iter().find(|l| l.id == id))
                        .map(|l| l.name.as_str())
                        .unwrap_or("Unassigned");
                    egui::ComboBox::from_id_salt("task_swimlane")
                        .selected_text(lane_name)
                        .show_ui(ui, |ui| {
                            if ui
                                .selectable_value(&mut task.swimlane_id, None, "Unassigned")
                                .changed()
                            {
                                changed = true;
                            }
                            for lane in &swimlanes {
                                if ui
                                    .selectable_value(
                                        &mut task.swimlane_id,
                                        Some(lane.id),
                                        &lane.name,
                                    )
                                    .changed()
                                {
                                    changed = true;
                                }
                            }
                        });
                    ui.end_row();

                    ui.label(RichText::new("Assignee").color(theme::TEXT_SECONDARY));
                    let person_name = task
                        .assignee_id
                        .and_then(|id| people.iter().find(|p| p.id == id))
                        .map(|p| p.name.as_str())
                        .unwrap_or("Nobody");
                    egui::ComboBox::from_id_salt("task_assignee")
                        .selected_text(person_name)
                        .show_ui(ui, |ui| {
                            if ui
                                .selectable_value(&mut task.assignee_id, None, "Nobody")
                                .changed()
                            {
                                changed = true;
                            }
                            for person in &people {
                                if ui
                                    .selectable_value(
                                        &mut task.assignee_id,
                                        Some(person.id),
                                        &person.name,
                                    )
                                    .changed()
                                {
                                    changed = true;
                                }
                            }
                        });
                    ui.end_row();

                    ui.label(RichText::new("Color").color(theme::TEXT_SECONDARY));
                    ui.horizontal(|ui| {
                        for (i, &color) in theme::TASK_COLORS.iter().enumerate() {
                            let (rect, resp) = ui.allocate_exact_size(
                                egui::vec2(16.0, 16.0),
                                egui::Sense::click(),
                            );
                            ui.painter().rect_filled(
                                rect,
                                egui::Rounding::same(3.0),
                                color,
                            );
                            if task.color == Some(color) {
                                ui.painter().rect_stroke(
                                    rect.expand(1.5),
                                    egui::Rounding::same(4.0),
                                    egui::Stroke::new(1.5, Color32::WHITE),
                                );
                            }
                            if resp.clicked() {
                                task.color = Some(theme::task_color(i));
                                changed = true;
                            }
                        }
                    });
                    ui.end_row();

                    ui.label("");
                    if ui
                        .checkbox(&mut task.board_only, "Board only (keep off the timeline)")
                        .changed()
                    {
                        changed = true;
                    }
                    ui.end_row();

                    ui.label(RichText::new("Notes").color(theme::TEXT_SECONDARY));
                    changed |= ui
                        .add_sized(
                            [220.0, 60.0],
                            egui::TextEdit::multiline(&mut task.notes),
                        )
                        .changed();
                    ui.end_row();
                });

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                let close_btn = egui::Button::new(RichText::new("Close").color(Color32::WHITE))
                    .fill(theme::ACCENT)
                    .rounding(egui::Rounding::same(4.0));
                if ui.add_sized([80.0, 28.0], close_btn).clicked() {
                    should_close = true;
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let del_btn = egui::Button::new(
                        RichText::new("Delete").color(Color32::from_rgb(240, 120, 120)),
                    );
                    if ui.add_sized([80.0, 28.0], del_btn).clicked() {
                        delete = true;
                    }
                });
            });
            ui.add_space(2.0);
        });

    if changed {
        app.board.touch();
        app.dirty = true;
    }
    if delete {
        app.board.delete_task(task_id);
        app.selected_task = None;
        app.editing_task = None;
        app.dirty = true;
        app.status_message = "Task deleted".to_string();
    }
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.editing_task = None;
    }
}

/// Render the swimlane manager dialog.
pub fn show_swimlane_manager(app: &mut PlanboardApp, ctx: &Context) {
    let mut should_close = false;
    let mut reorder: Option<(usize, usize)> = None;
    let mut remove: Option<uuid::Uuid> = None;
    let mut changed = false;

    Window::new(RichText::new("Swimlanes").strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([320.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(4.0);
            let count = app.board.swimlanes.len();
            for i in 0..count {
                ui.horizontal(|ui| {
                    let lane = &mut app.board.swimlanes[i];
                    changed |= ui
                        .add_sized([170.0, 22.0], egui::TextEdit::singleline(&mut lane.name))
                        .changed();
                    if ui.small_button("↑").clicked() && i > 0 {
                        reorder = Some((i, i - 1));
                    }
                    if ui.small_button("↓").clicked() && i + 1 < count {
                        reorder = Some((i, i + 1));
                    }
                    if ui
                        .small_button(RichText::new("✕").color(theme::TEXT_DIM))
                        .on_hover_text("Delete swimlane (tasks are kept)")
                        .clicked()
                    {
                        remove = Some(lane.id);
                    }
                });
            }

            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.add_sized(
                    [170.0, 22.0],
                    egui::TextEdit::singleline(&mut app.new_swimlane_name)
                        .hint_text("New swimlane..."),
                );
                if ui.button("Add").clicked() && !app.new_swimlane_name.is_empty() {
                    app.board
                        .swimlanes
                        .push(Swimlane::new(app.new_swimlane_name.clone()));
                    app.new_swimlane_name.clear();
                    changed = true;
                }
            });

            ui.add_space(6.0);
            ui.separator();
            if ui.add_sized([80.0, 26.0], egui::Button::new("Close")).clicked() {
                should_close = true;
            }
        });

    if let Some((from, to)) = reorder {
        app.board.reorder_swimlanes(from, to);
        app.dirty = true;
    }
    if let Some(id) = remove {
        app.board.delete_swimlane(id);
        app.dirty = true;
        app.status_message = "Swimlane deleted; its tasks are now unassigned".to_string();
    }
    if changed {
        app.board.touch();
        app.dirty = true;
    }
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_swimlanes = false;
    }
}

/// Render the people manager dialog.
pub fn show_people_manager(app: &mut PlanboardApp, ctx: &Context) {
    let mut should_close = false;
    let mut remove: Option<uuid::Uuid> = None;
    let mut changed = false;

    Window::new(RichText::new("People").strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([300.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(4.0);
            for person in &mut app.board.people {
                ui.horizontal(|ui| {
                    changed |= ui
                        .add_sized([190.0, 22.0], egui::TextEdit::singleline(&mut person.name))
                        .changed();
                    if ui
                        .small_button(RichText::new("✕").color(theme::TEXT_DIM))
                        .on_hover_text("Remove (their tasks become unassigned)")
                        .clicked()
                    {
                        remove = Some(person.id);
                    }
                });
            }

            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.add_sized(
                    [190.0, 22.0],
                    egui::TextEdit::singleline(&mut app.new_person_name)
                        .hint_text("New person..."),
                );
                if ui.button("Add").clicked() && !app.new_person_name.is_empty() {
                    app.board
                        .people
                        .push(Person::new(app.new_person_name.clone()));
                    app.new_person_name.clear();
                    changed = true;
                }
            });

            ui.add_space(6.0);
            ui.separator();
            if ui.add_sized([80.0, 26.0], egui::Button::new("Close")).clicked() {
                should_close = true;
            }
        });

    if let Some(id) = remove {
        app.board.delete_person(id);
        app.dirty = true;
    }
    if changed {
        app.board.touch();
        app.dirty = true;
    }
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_people = false;
    }
}

/// Render the "About" dialog.
pub fn show_about_dialog(app: &mut PlanboardApp, ctx: &Context) {
    let mut should_close = false;
    Window::new("About")
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([280.0, 160.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading(RichText::new("Planboard").strong());
                ui.add_space(2.0);
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                        .color(theme::TEXT_SECONDARY),
                );
                ui.add_space(10.0);
                ui.label("A timeline + Kanban planner");
                ui.label("built with Rust and egui.");
                ui.add_space(14.0);
                if ui.add_sized([100.0, 28.0], egui::Button::new("Close")).clicked() {
                    should_close = true;
                }
            });
        });
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_about = false;
    }
}
