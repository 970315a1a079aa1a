// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar and drawing mode selection UI.
//!
//! This module provides the toolbar above the preview for rotating the
//! media and switching between moving captions, drawing and erasing.

use crate::models::session::SessionEvent;
use crate::models::stroke::DrawMode;

/// Display the toolbar. Returns the event for the clicked button, if any.
pub fn show(ui: &mut egui::Ui, mode: DrawMode, has_media: bool) -> Option<SessionEvent> {
    let mut event = None;
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        if ui
            .add_enabled(has_media, egui::Button::new("⟳ Rotate"))
            .clicked()
        {
            event = Some(SessionEvent::Rotate);
        }

        ui.separator();

        ui.label("Tools:");

        if ui.selectable_label(mode == DrawMode::Idle, "✥ Move").clicked() {
            event = Some(SessionEvent::SetMode(DrawMode::Idle));
        }

        if ui.selectable_label(mode == DrawMode::Ink, "✏ Draw").clicked() {
            event = Some(SessionEvent::SetMode(DrawMode::Ink));
        }

        if ui.selectable_label(mode == DrawMode::Erase, "⌫ Erase").clicked() {
            event = Some(SessionEvent::SetMode(DrawMode::Erase));
        }

        ui.separator();

        let tool_text = match mode {
            DrawMode::Idle => "Drag captions to move them, drag the corner handle to resize",
            DrawMode::Ink => "Drag on the preview to draw",
            DrawMode::Erase => "Drag on the preview to erase to transparency",
        };

        ui.label(egui::RichText::new(tool_text).italics().weak());
    });
    event
}
