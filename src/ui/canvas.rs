// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Preview canvas for the composed meme.
//!
//! Shows the live composition and turns pointer input into session events:
//! strokes while drawing or erasing, caption move/resize while idle.

use crate::models::caption::{CaptionId, GeometryEditable};
use crate::models::geometry::{Point, Size};
use crate::models::session::{SessionEvent, SessionState};
use crate::models::stroke::DrawMode;
use crate::util::geometry::{preview_scale, screen_to_viewport, viewport_to_screen};

/// Side length of the caption resize handle, in screen pixels.
const HANDLE_SIZE: f32 = 10.0;

fn to_point(pos: egui::Pos2) -> Point {
    Point::new(pos.x, pos.y)
}

fn to_pos(point: Point) -> egui::Pos2 {
    egui::pos2(point.x, point.y)
}

/// Display the preview and collect the events produced by pointer input.
pub fn show(
    ui: &mut egui::Ui,
    session: &SessionState,
    preview: Option<&egui::TextureHandle>,
) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    let viewport = session.viewport();
    let available = ui.available_size();
    let scale = preview_scale(Size::new(available.x, available.y), viewport);
    let display = egui::vec2(viewport.width * scale, viewport.height * scale);

    ui.vertical_centered(|ui| {
        let sense = match session.mode() {
            DrawMode::Idle => egui::Sense::hover(),
            DrawMode::Ink | DrawMode::Erase => egui::Sense::click_and_drag(),
        };
        let (rect, response) = ui.allocate_exact_size(display, sense);
        let origin = to_point(rect.min);
        let painter = ui.painter_at(rect);

        painter.rect_filled(rect, 4.0, egui::Color32::from_gray(40));
        if let Some(texture) = preview {
            painter.image(
                texture.id(),
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }

        if session.media().is_none() {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "Upload or select image/video",
                egui::FontId::proportional(16.0),
                egui::Color32::from_gray(110),
            );
        } else if let Some(media) = session.media().filter(|m| m.pixels().is_none()) {
            painter.text(
                rect.center() + egui::vec2(0.0, 20.0),
                egui::Align2::CENTER_CENTER,
                format!("{} (no preview)", media.media_type()),
                egui::FontId::proportional(14.0),
                egui::Color32::from_gray(110),
            );
        }

        let to_viewport = |pos: egui::Pos2| screen_to_viewport(to_point(pos), origin, scale);

        match session.mode() {
            DrawMode::Ink | DrawMode::Erase => {
                if response.drag_started() {
                    let start = ui
                        .input(|i| i.pointer.press_origin())
                        .or(response.interact_pointer_pos());
                    if let Some(pos) = start {
                        events.push(SessionEvent::PointerDown(to_viewport(pos)));
                    }
                }
                if response.dragged() {
                    if let Some(pos) = response.interact_pointer_pos() {
                        if rect.contains(pos) {
                            events.push(SessionEvent::PointerMove(to_viewport(pos)));
                        } else {
                            events.push(SessionEvent::PointerLeave);
                        }
                    }
                }
                if response.drag_stopped() {
                    events.push(SessionEvent::PointerUp);
                }
                if response.hovered() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
                }
            }
            DrawMode::Idle => {
                events.extend(caption_handles(ui, session, origin, scale));
            }
        }
    });

    events
}

/// Move/resize interaction for every visible caption.
fn caption_handles(
    ui: &mut egui::Ui,
    session: &SessionState,
    origin: Point,
    scale: f32,
) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    let captions = session.captions();

    for caption in captions.visible() {
        let Some(geometry) = captions.geometry(caption.id) else {
            continue;
        };
        let min = viewport_to_screen(geometry.position(), origin, scale);
        let screen_rect = egui::Rect::from_min_size(
            to_pos(min),
            egui::vec2(geometry.width * scale, geometry.height * scale),
        );
        let handle_rect = egui::Rect::from_center_size(
            screen_rect.max,
            egui::vec2(HANDLE_SIZE, HANDLE_SIZE),
        );

        let body = ui.interact(screen_rect, box_id(ui, caption.id, "body"), egui::Sense::drag());
        let handle = ui.interact(handle_rect, box_id(ui, caption.id, "handle"), egui::Sense::drag());

        if handle.dragged() {
            let delta = handle.drag_delta() / scale;
            events.push(SessionEvent::SetGeometry {
                id: caption.id,
                position: geometry.position(),
                size: Size::new(geometry.width + delta.x, geometry.height + delta.y),
            });
        } else if body.dragged() {
            let delta = body.drag_delta() / scale;
            events.push(SessionEvent::SetGeometry {
                id: caption.id,
                position: Point::new(geometry.x + delta.x, geometry.y + delta.y),
                size: geometry.size(),
            });
        }

        let active = body.hovered() || body.dragged() || handle.hovered() || handle.dragged();
        let outline = if active {
            egui::Color32::from_rgb(59, 130, 246)
        } else {
            egui::Color32::from_white_alpha(90)
        };
        let painter = ui.painter();
        painter.rect_stroke(screen_rect, 0.0, egui::Stroke::new(1.0, outline));
        painter.rect_filled(handle_rect, 2.0, outline);

        if handle.hovered() || handle.dragged() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeNwSe);
        } else if body.hovered() || body.dragged() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
        }
    }

    events
}

fn box_id(ui: &egui::Ui, id: CaptionId, part: &str) -> egui::Id {
    ui.id().with(("caption", id.0, part))
}
