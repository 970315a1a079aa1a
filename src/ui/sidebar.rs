// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Sidebar with media sources, captions and export controls.

use crate::models::caption::Rgb;
use crate::models::session::{SessionEvent, SessionState};
use crate::models::template::TemplateAsset;
use crate::render::export::ExportFormat;

/// Result of sidebar interaction.
pub enum SidebarAction {
    /// Plain state change.
    Event(SessionEvent),
    /// Open the file picker.
    Upload,
    /// Download a catalog template and use it as media.
    SelectRemote(TemplateAsset),
    /// Export with the currently selected format.
    Export,
}

/// Display the sidebar.
pub fn show(
    ui: &mut egui::Ui,
    session: &SessionState,
    search_limit: usize,
    busy: bool,
) -> Vec<SidebarAction> {
    let mut actions = Vec::new();

    egui::ScrollArea::vertical().show(ui, |ui| {
        ui.horizontal(|ui| {
            if ui.button("🖼 Upload new template").clicked() {
                actions.push(SidebarAction::Upload);
            }
            let mut query = session.search().to_string();
            let response = ui.add(
                egui::TextEdit::singleline(&mut query)
                    .hint_text("Search memes")
                    .desired_width(f32::INFINITY),
            );
            if response.changed() {
                actions.push(SidebarAction::Event(SessionEvent::SetSearch(query)));
            }
        });

        let user_templates = session.catalog().user_templates();
        if !user_templates.is_empty() {
            ui.add_space(8.0);
            ui.heading("My Templates");
            for (index, template) in user_templates.iter().enumerate() {
                ui.horizontal(|ui| {
                    let label = format!("Upload {} ({})", index + 1, template.asset.media_type());
                    if ui.link(label).clicked() {
                        actions.push(SidebarAction::Event(SessionEvent::SelectUserTemplate(
                            template.id,
                        )));
                    }
                    if ui.small_button("✖").on_hover_text("Remove").clicked() {
                        actions.push(SidebarAction::Event(SessionEvent::RemoveUserTemplate(
                            template.id,
                        )));
                    }
                });
            }
        }

        ui.add_space(8.0);
        ui.heading("Popular Memes");
        let mut any = false;
        egui::Grid::new("templates").num_columns(2).striped(true).show(ui, |ui| {
            for (index, template) in session
                .catalog()
                .search(session.search(), search_limit)
                .enumerate()
            {
                any = true;
                if ui.link(template.name.as_str()).on_hover_text(template.url.as_str()).clicked() {
                    actions.push(SidebarAction::SelectRemote(template.clone()));
                }
                if index % 2 == 1 {
                    ui.end_row();
                }
            }
        });
        if !any {
            ui.label(egui::RichText::new("No templates").weak());
        }

        ui.add_space(8.0);
        ui.heading("Captions");
        for (index, caption) in session.captions().iter().enumerate() {
            ui.horizontal(|ui| {
                let mut text = caption.text.clone();
                let response = ui.add(
                    egui::TextEdit::singleline(&mut text)
                        .hint_text(format!("Text #{}", index + 1))
                        .desired_width(180.0),
                );
                if response.changed() {
                    actions.push(SidebarAction::Event(SessionEvent::SetText {
                        id: caption.id,
                        text,
                    }));
                }

                let mut color = caption.color.0;
                if egui::color_picker::color_edit_button_srgb(ui, &mut color).changed() {
                    actions.push(SidebarAction::Event(SessionEvent::SetColor {
                        id: caption.id,
                        color: Rgb(color),
                    }));
                }

                if ui.small_button("🗑").on_hover_text("Clear").clicked() {
                    actions.push(SidebarAction::Event(SessionEvent::ClearCaption(caption.id)));
                }
            });
        }

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            let can_export = !busy;
            if ui
                .add_enabled(can_export, egui::Button::new("⬇ Download Meme"))
                .clicked()
            {
                actions.push(SidebarAction::Export);
            }

            let mut format = session.export_format();
            egui::ComboBox::from_id_source("export_format")
                .selected_text(format.label())
                .show_ui(ui, |ui| {
                    for option in ExportFormat::ALL {
                        ui.selectable_value(&mut format, option, option.label());
                    }
                });
            if format != session.export_format() {
                actions.push(SidebarAction::Event(SessionEvent::SetExportFormat(format)));
            }

            if ui.button("Reset").clicked() {
                actions.push(SidebarAction::Event(SessionEvent::Reset));
            }
        });
    });

    actions
}
