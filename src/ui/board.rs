use egui::{Color32, Id, Pos2, Rect, RichText, Sense, Stroke, Ui, Vec2};
use uuid::Uuid;

use crate::layout::interact::splice_target;
use crate::model::Board;
use crate::ui::theme;

/// Actions the Board view can request from the app.
pub enum BoardAction {
    None,
    Select(Uuid),
    /// Add a task to the given status column.
    Add(Uuid),
    /// Drop a dragged card onto another column.
    SetStatus(Uuid, Uuid),
    /// Reorder a dragged card next to another card (`true` = before it).
    Reorder(Uuid, Uuid, bool),
}

fn drag_slot() -> Id {
    Id::new("board-drag-card")
}

/// Render the Kanban board: one column per status, cards in board order.
pub fn show_board(board: &Board, selected_task: Option<Uuid>, ui: &mut Ui) -> BoardAction {
    let mut action = BoardAction::None;
    let dragged: Option<Uuid> = ui.ctx().data_mut(|d| d.get_temp(drag_slot()));

    egui::ScrollArea::horizontal()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.horizontal_top(|ui| {
                for column in &board.columns {
                    let col_color = column.color.unwrap_or(theme::TEXT_DIM);
                    let cards: Vec<_> = board
                        .tasks
                        .iter()
                        .filter(|t| {
                            board.column_of(t).map(|c| c.id) == Some(column.id)
                        })
                        .collect();

                    let frame = egui::Frame {
                        fill: theme::BG_COLUMN,
                        rounding: egui::Rounding::same(8.0),
                        inner_margin: egui::Margin::same(8.0),
                        outer_margin: egui::Margin::symmetric(4.0, 4.0),
                        stroke: Stroke::new(1.0, theme::BORDER_SUBTLE),
                        shadow: egui::epaint::Shadow::NONE,
                    };

                    let col_resp = frame.show(ui, |ui| {
                        ui.set_width(theme::COLUMN_WIDTH);
                        ui.set_min_height(ui.available_height() - 16.0);

                        // Column header
                        ui.horizontal(|ui| {
                            let (dot, _) = ui
                                .allocate_exact_size(Vec2::splat(10.0), Sense::hover());
                            ui.painter().circle_filled(dot.center(), 4.0, col_color);
                            ui.label(
                                RichText::new(&column.title)
                                    .strong()
                                    .size(13.0)
                                    .color(theme::TEXT_PRIMARY),
                            );
                            ui.label(
                                RichText::new(format!("{}", cards.len()))
                                    .size(11.0)
                                    .color(theme::TEXT_DIM),
                            );
                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    let add = egui::Button::new(
                                        RichText::new("＋").size(12.0).color(theme::TEXT_DIM),
                                    )
                                    .frame(false);
                                    if ui.add(add).on_hover_text("Add task").clicked() {
                                        action = BoardAction::Add(column.id);
                                    }
                                },
                            );
                        });
                        ui.add_space(4.0);

                        for task in &cards {
                            let is_selected = selected_task == Some(task.id);
                            let is_dragged = dragged == Some(task.id);
                            let card_rect =
                                show_card(ui, board, task, is_selected, is_dragged);

                            let resp = ui.interact(
                                card_rect,
                                Id::new(("board-card", task.id)),
                                Sense::click_and_drag(),
                            );
                            if resp.clicked() {
                                action = BoardAction::Select(task.id);
                            }
                            if resp.drag_started() {
                                ui.ctx()
                                    .data_mut(|d| d.insert_temp(drag_slot(), task.id));
                            }

                            // Continuous reorder while another card is
                            // dragged over this one, keyed to the midpoint.
                            if let Some(drag_id) = dragged {
                                if drag_id != task.id && resp.hovered() {
                                    if let Some(pointer) =
                                        ui.ctx().pointer_interact_pos()
                                    {
                                        let below = pointer.y > card_rect.center().y;
                                        let drag_idx = board
                                            .tasks
                                            .iter()
                                            .position(|t| t.id == drag_id);
                                        let hover_idx = board
                                            .tasks
                                            .iter()
                                            .position(|t| t.id == task.id);
                                        if let (Some(d), Some(h)) = (drag_idx, hover_idx) {
                                            if splice_target(d, h, below).is_some() {
                                                action = BoardAction::Reorder(
                                                    drag_id, task.id, !below,
                                                );
                                            }
                                        }
                                    }
                                }
                            }
                            ui.add_space(4.0);
                        }
                    });

                    // Drop onto this column moves the dragged card's status.
                    if let Some(drag_id) = dragged {
                        let released =
                            ui.ctx().input(|i| i.pointer.any_released());
                        let over = ui
                            .ctx()
                            .pointer_interact_pos()
                            .map_or(false, |p| col_resp.response.rect.contains(p));
                        if released && over {
                            action = BoardAction::SetStatus(drag_id, column.id);
                        }
                    }
                }
            });
        });

    // Clear drag state on release, wherever it ended.
    if dragged.is_some() && ui.ctx().input(|i| i.pointer.any_released()) {
        ui.ctx().data_mut(|d| d.remove::<Uuid>(drag_slot()));
    }

    action
}

/// Paint one card; returns the rect for interaction.
fn show_card(
    ui: &mut Ui,
    board: &Board,
    task: &crate::model::Task,
    is_selected: bool,
    is_dragged: bool,
) -> Rect {
    let fill = if is_selected {
        theme::BG_SELECTED
    } else {
        theme::BG_CARD
    };
    let frame = egui::Frame {
        fill,
        rounding: egui::Rounding::same(theme::CARD_ROUNDING),
        inner_margin: egui::Margin::symmetric(8.0, 6.0),
        outer_margin: egui::Margin::ZERO,
        stroke: if is_dragged {
            Stroke::new(1.0, theme::BORDER_ACCENT)
        } else {
            Stroke::new(1.0, theme::BORDER_SUBTLE)
        },
        shadow: egui::epaint::Shadow::NONE,
    };

    let resp = frame.show(ui, |ui| {
        ui.set_width(theme::COLUMN_WIDTH - 16.0);
        ui.horizontal(|ui| {
            if let Some(color) = task.color {
                let (dot, _) = ui.allocate_exact_size(Vec2::splat(8.0), Sense::hover());
                ui.painter().circle_filled(dot.center(), 3.0, color);
            }
            ui.add(
                egui::Label::new(
                    RichText::new(&task.title).size(12.0).color(if is_selected {
                        Color32::WHITE
                    } else {
                        theme::TEXT_PRIMARY
                    }),
                )
                .truncate(),
            );
        });

        ui.horizontal(|ui| {
            if let Some((start, end)) = task.schedule() {
                ui.label(
                    RichText::new(format!(
                        "{} → {}",
                        start.format("%d %b"),
                        end.format("%d %b")
                    ))
                    .size(10.0)
                    .color(theme::TEXT_SECONDARY),
                );
            } else if task.board_only {
                ui.label(
                    RichText::new("board only")
                        .size(10.0)
                        .italics()
                        .color(theme::TEXT_DIM),
                );
            } else {
                ui.label(
                    RichText::new("unscheduled")
                        .size(10.0)
                        .color(theme::TEXT_DIM),
                );
            }
            if let Some(lane) = task
                .swimlane_id
                .and_then(|id| board.swimlanes.iter().find(|l| l.id == id))
            {
                ui.label(
                    RichText::new(&lane.name)
                        .size(10.0)
                        .color(theme::TEXT_DIM),
                );
            }
        });
    });

    // Ghost outline at the pointer while dragging.
    if is_dragged {
        if let Some(pointer) = ui.ctx().pointer_interact_pos() {
            let size = resp.response.rect.size();
            let ghost = Rect::from_min_size(
                Pos2::new(pointer.x - size.x / 2.0, pointer.y - 10.0),
                size,
            );
            ui.ctx()
                .layer_painter(egui::LayerId::new(
                    egui::Order::Tooltip,
                    Id::new("board-drag-ghost"),
                ))
                .rect_stroke(
                    ghost,
                    egui::Rounding::same(theme::CARD_ROUNDING),
                    Stroke::new(1.5, theme::BORDER_ACCENT),
                );
        }
    }

    resp.response.rect
}
