use chrono::{Datelike, NaiveDate};
use egui::{Color32, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};
use std::time::Instant;
use uuid::Uuid;

use crate::layout::coords::{self, DAY_WIDTH};
use crate::layout::grid::{self, BarLayout, RowKey, TimelineLayout};
use crate::layout::interact::{InteractionController, ResizeEdge};
use crate::layout::window::VirtualWindow;
use crate::model::{Board, GroupMode};
use crate::ui::theme;

const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;
const HANDLE_WIDTH: f32 = theme::HANDLE_WIDTH;

/// Click context for creating a task from an empty day cell.
#[derive(Debug, Clone, Copy)]
pub struct CreateContext {
    pub date: NaiveDate,
    /// Grouping row under the pointer (swimlane or person id, `None` for
    /// the Unassigned row).
    pub row: Option<Uuid>,
}

/// Result details from interactions in the Timeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimelineInteraction {
    pub changed: bool,
    pub create_task: Option<CreateContext>,
}

/// The Timeline view: virtualization window, gesture state, and the scroll
/// bookkeeping that keeps left extensions visually invisible.
pub struct TimelineView {
    pub window: VirtualWindow,
    pub controller: InteractionController,
    /// Horizontal scroll offset observed last frame.
    scroll_x: f32,
    viewport_w: f32,
    /// Scroll offset to force next frame. Compensations add onto any value
    /// already queued so back-to-back extensions both apply, in order.
    pending_scroll_x: Option<f32>,
}

impl TimelineView {
    pub fn new() -> Self {
        let today = chrono::Local::now().date_naive();
        let mut view = Self {
            window: VirtualWindow::centered_on(today),
            controller: InteractionController::default(),
            scroll_x: 0.0,
            viewport_w: 0.0,
            pending_scroll_x: None,
        };
        view.scroll_to_date(today);
        view
    }

    /// Queue a scroll that places `date` roughly mid-viewport.
    pub fn scroll_to_date(&mut self, date: NaiveDate) {
        let offset = coords::index_to_offset(
            coords::date_to_index(date) - self.window.start_index,
        ) - (self.viewport_w * 0.5).max(200.0);
        self.pending_scroll_x = Some(offset.max(0.0));
    }

    pub fn show(
        &mut self,
        board: &mut Board,
        mode: GroupMode,
        selected_task: &mut Option<Uuid>,
        ui: &mut Ui,
    ) -> TimelineInteraction {
        let mut interaction = TimelineInteraction::default();
        let now = Instant::now();

        // Edge check against last frame's scroll position so a left
        // extension and its pixel compensation land in the same frame.
        if self.viewport_w > 0.0 {
            let (first_off, last_off) = coords::visible_day_range(self.scroll_x, self.viewport_w);
            let ext = self.window.maybe_extend(
                self.window.start_index + first_off,
                self.window.start_index + last_off,
                now,
            );
            if ext.scroll_compensation_px > 0.0 {
                let base = self.pending_scroll_x.unwrap_or(self.scroll_x);
                self.pending_scroll_x = Some(base + ext.scroll_compensation_px);
            }
        }

        let layout = grid::compose(board, &self.window, mode, theme::grid_metrics());

        // Mutations collected during painting, applied after the borrow of
        // `board` inside the closure ends.
        let mut span_updates: Vec<(Uuid, NaiveDate, NaiveDate)> = Vec::new();
        let mut moves: Vec<(Uuid, NaiveDate, Option<Uuid>)> = Vec::new();

        let mut scroll = egui::ScrollArea::both()
            .auto_shrink([false, false])
            .id_salt("timeline_scroll");
        if let Some(x) = self.pending_scroll_x.take() {
            scroll = scroll.horizontal_scroll_offset(x);
        }

        let window_left_px = coords::index_to_offset(self.window.start_index);

        let output = scroll.show(ui, |ui| {
            let available = ui.available_size();
            let canvas_h = (HEADER_HEIGHT + layout.height + 40.0).max(available.y);
            let (response, painter) =
                ui.allocate_painter(Vec2::new(layout.width, canvas_h), Sense::click());
            let origin = response.rect.min;
            let clip_left = ui.clip_rect().left();
            let mut consumed_click = false;

            painter.rect_filled(response.rect, 0.0, theme::BG_DARK);

            self.draw_lane_rows(&painter, origin, clip_left, &layout);
            self.draw_header_and_grid(&painter, origin, canvas_h, &layout);
            draw_today_line(&painter, origin, &self.window, canvas_h);

            for lane in &layout.lanes {
                for bar in &lane.bars {
                    let Some(task) = board.task(bar.task_id) else {
                        continue;
                    };
                    let is_selected = *selected_task == Some(task.id);
                    let color = task
                        .color
                        .or_else(|| board.column_of(task).and_then(|c| c.color))
                        .unwrap_or(theme::ACCENT);

                    let bar_rect = bar_rect(origin, bar);
                    draw_task_bar(&painter, bar_rect, &task.title, color, is_selected);

                    let bar_resp = ui.interact(
                        bar_rect,
                        ui.make_persistent_id(("task-bar", task.id)),
                        Sense::click_and_drag(),
                    );
                    let left_resp = ui.interact(
                        edge_rect(bar_rect, ResizeEdge::Start).expand(4.0),
                        ui.make_persistent_id(("task-resize-left", task.id)),
                        Sense::drag(),
                    );
                    let right_resp = ui.interact(
                        edge_rect(bar_rect, ResizeEdge::End).expand(4.0),
                        ui.make_persistent_id(("task-resize-right", task.id)),
                        Sense::drag(),
                    );

                    if bar_resp.clicked() {
                        *selected_task = Some(task.id);
                        consumed_click = true;
                    }

                    // Pointer x in day-axis pixels, stable across window
                    // extensions (origin shifts when days are prepended).
                    let abs_x = move |resp: &egui::Response| {
                        resp.interact_pointer_pos()
                            .map(|p| p.x - origin.x + window_left_px)
                            .unwrap_or(0.0)
                    };
                    let (start, end) = match task.schedule() {
                        Some(span) => span,
                        None => continue,
                    };

                    if left_resp.drag_started() {
                        self.controller.begin_resize(
                            task.id,
                            ResizeEdge::Start,
                            abs_x(&left_resp),
                            start,
                            end,
                        );
                    }
                    if right_resp.drag_started() {
                        self.controller.begin_resize(
                            task.id,
                            ResizeEdge::End,
                            abs_x(&right_resp),
                            start,
                            end,
                        );
                    }
                    if bar_resp.drag_started() {
                        self.controller
                            .begin_drag(task.id, abs_x(&bar_resp), start, end);
                    }
                    if bar_resp.drag_started()
                        || left_resp.drag_started()
                        || right_resp.drag_started()
                    {
                        *selected_task = Some(task.id);
                        consumed_click = true;
                    }

                    if left_resp.dragged() || right_resp.dragged() {
                        ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
                        let resp = if left_resp.dragged() { &left_resp } else { &right_resp };
                        // Inverting spans are rejected: no preview, no change.
                        if let Some((ns, ne)) = self.controller.resize_preview(abs_x(resp)) {
                            span_updates.push((task.id, ns, ne));
                        }
                    } else if bar_resp.dragged() {
                        ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
                        if let Some((ns, ne)) = self.controller.drag_preview(abs_x(&bar_resp)) {
                            span_updates.push((task.id, ns, ne));
                        }
                    }

                    if bar_resp.drag_stopped() {
                        // Date and row retarget apply as one mutation.
                        if let Some((ns, _)) = self.controller.drag_preview(abs_x(&bar_resp)) {
                            let row = bar_resp
                                .interact_pointer_pos()
                                .and_then(|p| row_at(&layout, origin, p.y))
                                .unwrap_or_else(|| current_row(task, mode));
                            moves.push((task.id, ns, row));
                        }
                        self.controller.finish(now);
                    }
                    if left_resp.drag_stopped() || right_resp.drag_stopped() {
                        self.controller.finish(now);
                    }

                    if is_selected || left_resp.hovered() || right_resp.hovered() {
                        if left_resp.hovered() || right_resp.hovered() {
                            ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
                        } else if bar_resp.hovered() {
                            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                        }
                        draw_handles(&painter, bar_rect);
                    }

                    if bar_resp.hovered() || left_resp.hovered() || right_resp.hovered() {
                        egui::show_tooltip_at_pointer(
                            ui.ctx(),
                            ui.layer_id(),
                            egui::Id::new(("task-tip", task.id)),
                            |ui| {
                                ui.strong(&task.title);
                                ui.label(format!(
                                    "{} → {}",
                                    start.format("%d/%m/%Y"),
                                    end.format("%d/%m/%Y"),
                                ));
                                if let Some(days) = task.duration_days() {
                                    ui.label(format!("{} day(s)", days));
                                }
                            },
                        );
                    }
                }
            }

            // Empty click: create a task in the clicked day cell, unless a
            // just-finished gesture suppresses it.
            if response.clicked() && !consumed_click {
                if let Some(pos) = response.interact_pointer_pos() {
                    let in_header = pos.y < origin.y + HEADER_HEIGHT;
                    if !in_header && self.controller.click_allowed(now) {
                        let day_off = ((pos.x - origin.x) / DAY_WIDTH).floor() as i64;
                        let date = coords::index_to_date(self.window.start_index + day_off);
                        match row_at(&layout, origin, pos.y) {
                            Some(row) => {
                                interaction.create_task = Some(CreateContext { date, row });
                            }
                            None => *selected_task = None,
                        }
                    }
                }
            }
        });

        self.scroll_x = output.state.offset.x;
        self.viewport_w = output.inner_rect.width();

        // Keep the last write per task; intermediate previews are stale.
        span_updates.dedup_by_key(|(id, _, _)| *id);
        for (id, start, end) in span_updates {
            if let Some(task) = board.task_mut(id) {
                task.start = Some(start);
                task.end = Some(end);
                interaction.changed = true;
            }
        }
        for (id, new_start, row) in moves {
            board.move_task(id, new_start, mode, row);
            interaction.changed = true;
        }
        if interaction.changed {
            board.touch();
        }

        interaction
    }

    fn draw_lane_rows(
        &self,
        painter: &egui::Painter,
        origin: Pos2,
        clip_left: f32,
        layout: &TimelineLayout,
    ) {
        for (i, lane) in layout.lanes.iter().enumerate() {
            let y = origin.y + HEADER_HEIGHT + lane.y;
            let row_bg = if i % 2 == 0 {
                theme::BG_PANEL
            } else {
                theme::BG_DARK
            };
            painter.rect_filled(
                Rect::from_min_size(
                    Pos2::new(origin.x, y),
                    Vec2::new(layout.width, lane.height),
                ),
                0.0,
                row_bg,
            );
            painter.line_segment(
                [
                    Pos2::new(origin.x, y + lane.height),
                    Pos2::new(origin.x + layout.width, y + lane.height),
                ],
                Stroke::new(0.5, theme::BORDER_SUBTLE),
            );

            // Lane label pinned to the visible left edge.
            if let Some(color) = lane.color {
                painter.circle_filled(Pos2::new(clip_left + 12.0, y + 14.0), 4.0, color);
            }
            painter.text(
                Pos2::new(clip_left + 22.0, y + 14.0),
                egui::Align2::LEFT_CENTER,
                &lane.name,
                theme::font_header(),
                theme::TEXT_SECONDARY,
            );
        }
    }

    /// Month band, day numbers, weekend shading and day grid lines. Only
    /// the visible day range is walked — the window can grow into the
    /// thousands of days.
    fn draw_header_and_grid(
        &self,
        painter: &egui::Painter,
        origin: Pos2,
        canvas_h: f32,
        layout: &TimelineLayout,
    ) {
        painter.rect_filled(
            Rect::from_min_size(origin, Vec2::new(layout.width, HEADER_HEIGHT)),
            0.0,
            theme::BG_HEADER,
        );

        let (first_off, last_off) = coords::visible_day_range(self.scroll_x, self.viewport_w);
        let first_off = first_off.clamp(0, self.window.day_count);
        let last_off = (last_off + 1).clamp(0, self.window.day_count);

        for off in first_off..last_off {
            let x = origin.x + off as f32 * DAY_WIDTH;
            let date = coords::index_to_date(self.window.start_index + off);

            let is_weekend = date.weekday().num_days_from_monday() >= 5;
            if is_weekend {
                painter.rect_filled(
                    Rect::from_min_size(
                        Pos2::new(x, origin.y + HEADER_HEIGHT),
                        Vec2::new(DAY_WIDTH, canvas_h - HEADER_HEIGHT),
                    ),
                    0.0,
                    theme::BG_WEEKEND,
                );
            }

            painter.line_segment(
                [
                    Pos2::new(x, origin.y + theme::MONTH_BAND_HEIGHT),
                    Pos2::new(x, origin.y + canvas_h),
                ],
                Stroke::new(0.5, theme::GRID_LINE),
            );

            let day_color = if is_weekend {
                theme::TEXT_DIM
            } else {
                theme::TEXT_SECONDARY
            };
            painter.text(
                Pos2::new(x + DAY_WIDTH / 2.0, origin.y + 32.0),
                egui::Align2::CENTER_CENTER,
                date.format("%d").to_string(),
                theme::font_sub(),
                day_color,
            );
        }

        // Month bands across the top of the header.
        let visible_left = first_off as f32 * DAY_WIDTH;
        let visible_right = last_off as f32 * DAY_WIDTH;
        for band in &layout.months {
            if band.x + band.width < visible_left || band.x > visible_right {
                continue;
            }
            painter.line_segment(
                [
                    Pos2::new(origin.x + band.x, origin.y),
                    Pos2::new(origin.x + band.x, origin.y + HEADER_HEIGHT),
                ],
                Stroke::new(1.0, theme::BORDER_SUBTLE),
            );
            // Slide the label right when the band's left edge is scrolled off.
            let label_x = (origin.x + band.x + 6.0).max(origin.x + visible_left + 6.0);
            painter.text(
                Pos2::new(label_x, origin.y + theme::MONTH_BAND_HEIGHT / 2.0),
                egui::Align2::LEFT_CENTER,
                &band.label,
                theme::font_header(),
                theme::TEXT_PRIMARY,
            );
        }

        painter.line_segment(
            [
                Pos2::new(origin.x, origin.y + HEADER_HEIGHT),
                Pos2::new(origin.x + layout.width, origin.y + HEADER_HEIGHT),
            ],
            Stroke::new(1.0, theme::BORDER_SUBTLE),
        );
    }
}

/// Pixel rect of a bar on the canvas.
fn bar_rect(origin: Pos2, bar: &BarLayout) -> Rect {
    let inset = theme::BAR_INSET;
    Rect::from_min_size(
        Pos2::new(origin.x + bar.x, origin.y + HEADER_HEIGHT + bar.y + inset),
        Vec2::new(bar.width, theme::TRACK_HEIGHT - inset * 2.0),
    )
}

fn edge_rect(bar: Rect, edge: ResizeEdge) -> Rect {
    let x = match edge {
        ResizeEdge::Start => bar.left(),
        ResizeEdge::End => bar.right(),
    };
    Rect::from_min_max(
        Pos2::new(x - HANDLE_WIDTH * 0.5, bar.top()),
        Pos2::new(x + HANDLE_WIDTH * 0.5, bar.bottom()),
    )
}

/// Which grouping row a canvas y coordinate falls in.
fn row_at(layout: &TimelineLayout, origin: Pos2, y: f32) -> Option<Option<Uuid>> {
    let y = y - origin.y - HEADER_HEIGHT;
    for lane in &layout.lanes {
        if y >= lane.y && y < lane.y + lane.height {
            return Some(match lane.key {
                RowKey::Swimlane(id) | RowKey::Person(id) => Some(id),
                RowKey::Unassigned => None,
            });
        }
    }
    None
}

/// A task's current grouping reference under the active mode.
fn current_row(task: &crate::model::Task, mode: GroupMode) -> Option<Uuid> {
    match mode {
        GroupMode::Projects => task.swimlane_id,
        GroupMode::People => task.assignee_id,
    }
}

fn draw_today_line(painter: &egui::Painter, origin: Pos2, window: &VirtualWindow, height: f32) {
    let today = chrono::Local::now().date_naive();
    let off = coords::date_to_index(today) - window.start_index;
    if off < 0 || off >= window.day_count {
        return;
    }
    let x = origin.x + off as f32 * DAY_WIDTH + DAY_WIDTH / 2.0;

    painter.line_segment(
        [
            Pos2::new(x, origin.y + HEADER_HEIGHT),
            Pos2::new(x, origin.y + height),
        ],
        Stroke::new(1.5, theme::TODAY_LINE),
    );

    let badge_w = 42.0;
    let badge_rect = Rect::from_min_size(
        Pos2::new(x - badge_w / 2.0, origin.y + HEADER_HEIGHT - 1.0),
        Vec2::new(badge_w, 14.0),
    );
    painter.rect_filled(badge_rect, Rounding::same(3.0), theme::TODAY_LINE);
    painter.text(
        badge_rect.center(),
        egui::Align2::CENTER_CENTER,
        "Today",
        theme::font_small(),
        Color32::WHITE,
    );
}

fn draw_task_bar(
    painter: &egui::Painter,
    bar_rect: Rect,
    title: &str,
    color: Color32,
    is_selected: bool,
) {
    let rounding = Rounding::same(theme::BAR_ROUNDING);

    // Soft shadow
    let shadow_rect = bar_rect.translate(Vec2::new(1.0, 2.0));
    painter.rect_filled(shadow_rect, rounding, Color32::from_black_alpha(35));

    painter.rect_filled(bar_rect, rounding, color);
    // Lighter top highlight
    let highlight_rect = Rect::from_min_size(
        bar_rect.min,
        Vec2::new(bar_rect.width(), (bar_rect.height() * 0.45).max(4.0)),
    );
    painter.rect_filled(
        highlight_rect,
        Rounding {
            nw: theme::BAR_ROUNDING,
            ne: theme::BAR_ROUNDING,
            sw: 0.0,
            se: 0.0,
        },
        Color32::from_white_alpha(25),
    );

    if is_selected {
        painter.rect_stroke(
            bar_rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
    }

    // Title on the bar (single line, clipped to bar bounds)
    if bar_rect.width() > 30.0 {
        let galley = painter.layout_no_wrap(title.to_string(), theme::font_bar(), theme::TEXT_ON_BAR);
        let clipped = painter.with_clip_rect(bar_rect);
        let text_y = bar_rect.top() + (bar_rect.height() - galley.size().y) / 2.0;
        clipped.galley(
            Pos2::new(bar_rect.left() + 6.0, text_y),
            galley,
            Color32::TRANSPARENT,
        );
    }
}

fn draw_handles(painter: &egui::Painter, bar_rect: Rect) {
    let handle_h = bar_rect.height() * 0.55;
    let handle_y = bar_rect.center().y - handle_h / 2.0;
    let lh = Rect::from_min_size(
        Pos2::new(bar_rect.left() - 1.5, handle_y),
        Vec2::new(4.0, handle_h),
    );
    let rh = Rect::from_min_size(
        Pos2::new(bar_rect.right() - 2.5, handle_y),
        Vec2::new(4.0, handle_h),
    );
    painter.rect_filled(lh, Rounding::same(2.0), theme::HANDLE_COLOR);
    painter.rect_filled(rh, Rounding::same(2.0), theme::HANDLE_COLOR);
}
