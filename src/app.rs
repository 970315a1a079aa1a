// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the egui::App trait. It owns the editing session, feeds it events from
//! the UI components, and runs slow work (file reads, catalog requests,
//! exports) on background threads whose results come back over channels.

use crate::config::EditorConfig;
use crate::error::{EditorError, EditorResult};
use crate::io::{catalog, media};
use crate::models::media::MediaAsset;
use crate::models::session::{SessionEvent, SessionState};
use crate::models::template::TemplateAsset;
use crate::render::compose::{Composer, LayerRasterizer};
use crate::render::export::{DirectorySink, Exporter};
use crate::render::text::CaptionRenderer;
use crate::ui::{canvas, sidebar, toolbar};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;

/// Result of a background media load (upload or catalog template).
struct MediaJob {
    receiver: Receiver<EditorResult<MediaAsset>>,
    uploaded: bool,
}

/// Main application state.
pub struct MemeApp {
    config: EditorConfig,

    /// The editing session; the only place editor state lives
    session: SessionState,

    /// Shared with export workers
    exporter: Arc<Exporter<LayerRasterizer>>,

    /// Composed preview texture and the session generation it shows
    preview: Option<(egui::TextureHandle, u64)>,

    /// Receiver for the remote template list
    catalog_loader: Option<Receiver<EditorResult<Vec<TemplateAsset>>>>,

    /// Receiver for background media loading
    media_loader: Option<MediaJob>,

    /// Receiver for the export in flight
    export_job: Option<Receiver<EditorResult<PathBuf>>>,

    /// Loading state message
    loading_message: Option<String>,

    /// Last status line shown under the preview
    status: String,
}

impl MemeApp {
    /// Create the application and start fetching the template catalog.
    pub fn new(config: EditorConfig) -> EditorResult<Self> {
        let captions = CaptionRenderer::from_config(&config.caption)?;
        let exporter = Exporter::new(
            Composer::new(LayerRasterizer::new(captions)),
            config.export.clone(),
        );
        let mut app = Self {
            session: SessionState::new(&config),
            exporter: Arc::new(exporter),
            preview: None,
            catalog_loader: None,
            media_loader: None,
            export_job: None,
            loading_message: None,
            status: "Ready".to_string(),
            config,
        };
        app.fetch_catalog();
        Ok(app)
    }

    /// Apply an event, logging (not surfacing) anything it rejects.
    fn dispatch(&mut self, event: SessionEvent) {
        if matches!(event, SessionEvent::Reset) {
            self.cancel_media_job();
        }
        if let Err(e) = self.session.apply(event) {
            log::warn!("Ignored event: {}", e);
        }
    }

    /// Forget the media load in flight; its result is never applied.
    fn cancel_media_job(&mut self) {
        if self.media_loader.take().is_some() {
            log::debug!("Discarded pending media load");
        }
        self.loading_message = None;
    }

    /// Request the remote template list (asynchronously).
    fn fetch_catalog(&mut self) {
        let (sender, receiver) = channel();
        self.catalog_loader = Some(receiver);
        let url = self.config.catalog.url.clone();

        std::thread::spawn(move || {
            let _ = sender.send(catalog::fetch_catalog(&url));
        });
    }

    /// Read an uploaded file into a media asset (asynchronously).
    fn load_upload(&mut self, path: PathBuf) {
        self.dispatch(SessionEvent::SetPendingFile(Some(path.clone())));
        let (sender, receiver) = channel();
        self.media_loader = Some(MediaJob {
            receiver,
            uploaded: true,
        });
        self.loading_message = Some(format!("Loading {}...", path.display()));

        std::thread::spawn(move || {
            let _ = sender.send(media::read_upload(&path));
        });
    }

    /// Download a catalog template image (asynchronously).
    fn load_template(&mut self, template: TemplateAsset) {
        // A template click supersedes any upload still loading.
        self.dispatch(SessionEvent::SetPendingFile(None));
        let (sender, receiver) = channel();
        self.media_loader = Some(MediaJob {
            receiver,
            uploaded: false,
        });
        self.loading_message = Some(format!("Loading {}...", template.name));

        std::thread::spawn(move || {
            let _ = sender.send(catalog::fetch_media(&template.url));
        });
    }

    /// Export a snapshot of the session (asynchronously).
    fn start_export(&mut self) {
        if self.export_job.is_some() {
            return;
        }
        let snapshot = self.session.clone();
        let format = snapshot.export_format();
        let exporter = Arc::clone(&self.exporter);
        let sink = DirectorySink::new(self.config.export.download_dir.clone());
        let (sender, receiver) = channel();
        self.export_job = Some(receiver);

        std::thread::spawn(move || {
            let _ = sender.send(exporter.export(&snapshot, format, &sink));
        });
    }

    /// Apply results of finished background jobs.
    fn poll_jobs(&mut self) {
        if let Some(receiver) = &self.catalog_loader {
            if let Ok(result) = receiver.try_recv() {
                self.catalog_loader = None;
                match result {
                    Ok(templates) => self.dispatch(SessionEvent::CatalogLoaded(templates)),
                    Err(e) => log::warn!("Template catalog unavailable: {}", e),
                }
            }
        }

        if let Some(job) = &self.media_loader {
            if let Ok(result) = job.receiver.try_recv() {
                let uploaded = job.uploaded;
                self.media_loader = None;
                self.loading_message = None;
                match result {
                    Ok(asset) if uploaded => self.dispatch(SessionEvent::MediaUploaded(asset)),
                    Ok(asset) => self.dispatch(SessionEvent::SetMedia(asset)),
                    Err(e) => {
                        if uploaded {
                            self.dispatch(SessionEvent::SetPendingFile(None));
                        }
                        log::error!("Failed to load media: {}", e);
                        self.status = format!("Failed to load media: {e}");
                    }
                }
            }
        }

        if let Some(receiver) = &self.export_job {
            if let Ok(result) = receiver.try_recv() {
                self.export_job = None;
                match result {
                    Ok(path) => self.status = format!("Saved {}", path.display()),
                    Err(EditorError::NoMediaSelected) => {
                        log::info!("Export skipped: no media selected");
                    }
                    Err(e) => {
                        log::error!("Export failed: {}", e);
                        self.status = format!("Export failed: {e}");
                    }
                }
            }
        }
    }

    /// Recompose the preview texture if the session changed.
    fn refresh_preview(&mut self, ctx: &egui::Context) {
        let generation = self.session.generation();
        if matches!(&self.preview, Some((_, shown)) if *shown == generation) {
            return;
        }
        let image = match self.exporter.composer().preview(&self.session) {
            Ok(image) => image,
            Err(e) => {
                log::error!("Preview failed: {}", e);
                return;
            }
        };
        let size = [image.width() as usize, image.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());
        match &mut self.preview {
            Some((texture, shown)) => {
                texture.set(color_image, egui::TextureOptions::LINEAR);
                *shown = generation;
            }
            None => {
                let texture = ctx.load_texture("preview", color_image, egui::TextureOptions::LINEAR);
                self.preview = Some((texture, generation));
            }
        }
    }

    fn pick_upload(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images and videos", media::UPLOAD_EXTENSIONS)
            .pick_file()
        {
            self.load_upload(path);
        }
    }
}

impl eframe::App for MemeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_jobs();

        // Keep polling while background work is running
        if self.catalog_loader.is_some() || self.media_loader.is_some() || self.export_job.is_some() {
            ctx.request_repaint();
        }

        // Toolbar
        let toolbar_event = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| {
                toolbar::show(ui, self.session.mode(), self.session.media().is_some())
            })
            .inner;
        if let Some(event) = toolbar_event {
            self.dispatch(event);
        }

        // Sidebar (right side)
        let busy = self.export_job.is_some();
        let actions = egui::SidePanel::right("sidebar")
            .default_width(360.0)
            .show(ctx, |ui| {
                sidebar::show(ui, &self.session, self.config.catalog.search_limit, busy)
            })
            .inner;

        for action in actions {
            match action {
                sidebar::SidebarAction::Event(event) => self.dispatch(event),
                sidebar::SidebarAction::Upload => self.pick_upload(),
                sidebar::SidebarAction::SelectRemote(template) => self.load_template(template),
                sidebar::SidebarAction::Export => self.start_export(),
            }
        }

        // Status line
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("Mode: {:?}", self.session.mode()));
                ui.separator();
                if let Some(media) = self.session.media() {
                    ui.label(format!(
                        "{} rotated {}°",
                        media.media_type(),
                        media.rotation().degrees()
                    ));
                } else {
                    ui.label("No media");
                }
                ui.separator();
                ui.label(self.status.as_str());
            });
        });

        self.refresh_preview(ctx);

        // Main canvas (center)
        let events = egui::CentralPanel::default()
            .show(ctx, |ui| {
                if let Some(ref message) = self.loading_message {
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.add_space(20.0);
                            ui.spinner();
                            ui.add_space(10.0);
                            ui.label(
                                egui::RichText::new(message)
                                    .size(16.0)
                                    .color(egui::Color32::from_gray(200)),
                            );
                        });
                    });
                    Vec::new()
                } else {
                    let texture = self.preview.as_ref().map(|(texture, _)| texture);
                    canvas::show(ui, &self.session, texture)
                }
            })
            .inner;

        for event in events {
            self.dispatch(event);
        }
    }
}
