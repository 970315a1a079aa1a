// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editing session state and event dispatch.
//!
//! The whole editor state is one owned [`SessionState`] value. Input of any
//! kind (pointer, text fields, buttons, finished background jobs) arrives as
//! a [`SessionEvent`] and is applied by a single update function, one event
//! at a time, on the UI thread.

use super::caption::{CaptionId, CaptionSet, GeometryEditable, Rgb};
use super::geometry::{Point, Size};
use super::media::MediaAsset;
use super::stroke::{DrawMode, StrokeLayer};
use super::template::{TemplateAsset, TemplateCatalog};
use crate::config::EditorConfig;
use crate::error::EditorResult;
use crate::render::export::ExportFormat;
use std::path::PathBuf;

/// One discrete input to the session.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    PointerLeave,
    SetMode(DrawMode),
    SetText { id: CaptionId, text: String },
    SetColor { id: CaptionId, color: Rgb },
    SetGeometry { id: CaptionId, position: Point, size: Size },
    ClearCaption(CaptionId),
    Rotate,
    SetMedia(MediaAsset),
    /// A file upload finished reading: use it and remember it.
    MediaUploaded(MediaAsset),
    SelectUserTemplate(u64),
    RemoveUserTemplate(u64),
    CatalogLoaded(Vec<TemplateAsset>),
    SetSearch(String),
    SetExportFormat(ExportFormat),
    SetPendingFile(Option<PathBuf>),
    Reset,
}

/// Everything the editor knows about the current session.
#[derive(Debug, Clone)]
pub struct SessionState {
    viewport: Size,
    background: Rgb,
    media: Option<MediaAsset>,
    captions: CaptionSet,
    strokes: StrokeLayer,
    mode: DrawMode,
    catalog: TemplateCatalog,
    search: String,
    export_format: ExportFormat,
    pending_file: Option<PathBuf>,
    generation: u64,
}

impl SessionState {
    pub fn new(config: &EditorConfig) -> Self {
        let viewport = Size::new(config.viewport.width as f32, config.viewport.height as f32);
        Self {
            viewport,
            background: config.viewport.background,
            media: None,
            captions: CaptionSet::new(
                config.caption.slots,
                viewport,
                config.caption.default_rect,
                config.caption.default_color,
            ),
            strokes: StrokeLayer::new(
                config.viewport.width,
                config.viewport.height,
                config.stroke.width,
            ),
            mode: DrawMode::Idle,
            catalog: TemplateCatalog::default(),
            search: String::new(),
            export_format: ExportFormat::default(),
            pending_file: None,
            generation: 0,
        }
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn viewport_pixels(&self) -> (u32, u32) {
        (self.strokes.width(), self.strokes.height())
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn media(&self) -> Option<&MediaAsset> {
        self.media.as_ref()
    }

    pub fn captions(&self) -> &CaptionSet {
        &self.captions
    }

    pub fn strokes(&self) -> &StrokeLayer {
        &self.strokes
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn export_format(&self) -> ExportFormat {
        self.export_format
    }

    pub fn pending_file(&self) -> Option<&PathBuf> {
        self.pending_file.as_ref()
    }

    /// Counter bumped on every applied event; used to cache previews.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace the media; rotation starts over at zero.
    pub fn set_media(&mut self, asset: MediaAsset) {
        log::info!("Media set: {} ({:?})", asset.media_type(), asset.kind());
        self.media = Some(asset.with_reset_rotation());
    }

    /// Rotate the media 90 degrees clockwise; no-op without media.
    pub fn rotate(&mut self) {
        if let Some(media) = self.media.as_mut() {
            media.rotate();
            log::debug!("Rotation now {} degrees", media.rotation().degrees());
        }
    }

    /// Back to a blank editor. User templates and the remote catalog stay.
    pub fn reset(&mut self) {
        self.media = None;
        self.captions.reset();
        self.strokes.clear();
        self.mode = DrawMode::Idle;
        self.search.clear();
        self.pending_file = None;
        log::info!("Session reset");
    }

    /// Apply one event. On error the state is left exactly as it was.
    pub fn apply(&mut self, event: SessionEvent) -> EditorResult<()> {
        match event {
            SessionEvent::PointerDown(point) => {
                if self.mode != DrawMode::Idle {
                    self.strokes.begin_stroke(point, self.mode);
                }
            }
            SessionEvent::PointerMove(point) => self.strokes.extend_stroke(point),
            SessionEvent::PointerUp | SessionEvent::PointerLeave => self.strokes.end_stroke(),
            SessionEvent::SetMode(mode) => {
                self.mode = mode;
                if mode == DrawMode::Idle {
                    self.strokes.end_stroke();
                }
            }
            SessionEvent::SetText { id, text } => self.captions.set_text(id, text)?,
            SessionEvent::SetColor { id, color } => self.captions.set_color(id, color)?,
            SessionEvent::SetGeometry { id, position, size } => {
                self.captions.set_geometry(id, position, size)?;
            }
            SessionEvent::ClearCaption(id) => self.captions.clear(id)?,
            SessionEvent::Rotate => self.rotate(),
            SessionEvent::SetMedia(asset) => self.set_media(asset),
            SessionEvent::MediaUploaded(asset) => {
                let id = self.catalog.add_user_template(asset.clone());
                log::info!("Added upload to my templates as {}", id);
                self.pending_file = None;
                self.set_media(asset);
            }
            SessionEvent::SelectUserTemplate(id) => {
                let asset = self.catalog.user_template(id)?.asset.clone();
                self.set_media(asset);
            }
            SessionEvent::RemoveUserTemplate(id) => self.catalog.remove_user_template(id)?,
            SessionEvent::CatalogLoaded(templates) => {
                log::info!("Template catalog loaded: {} entries", templates.len());
                self.catalog.set_remote(templates);
            }
            SessionEvent::SetSearch(query) => self.search = query,
            SessionEvent::SetExportFormat(format) => self.export_format = format,
            SessionEvent::SetPendingFile(path) => self.pending_file = path,
            SessionEvent::Reset => self.reset(),
        }
        self.generation += 1;
        Ok(())
    }
}

/// Owned-value form of [`SessionState::apply`]. Errors are logged and the
/// incoming state is returned unchanged.
pub fn reduce(mut state: SessionState, event: SessionEvent) -> SessionState {
    if let Err(e) = state.apply(event) {
        log::warn!("Ignored event: {}", e);
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::geometry::Rect;
    use crate::models::stroke::{ERASED, INK};
    use image::RgbaImage;

    fn session() -> SessionState {
        SessionState::new(&EditorConfig::default())
    }

    fn image_asset() -> MediaAsset {
        MediaAsset::from_image(RgbaImage::from_pixel(40, 30, image::Rgba([0, 0, 255, 255])))
    }

    fn drag(state: SessionState, from: Point, to: Point) -> SessionState {
        let state = reduce(state, SessionEvent::PointerDown(from));
        let state = reduce(state, SessionEvent::PointerMove(to));
        reduce(state, SessionEvent::PointerUp)
    }

    #[test]
    fn test_pointer_drag_in_idle_mode_draws_nothing() {
        let state = drag(session(), Point::new(10.0, 10.0), Point::new(100.0, 100.0));
        assert!(state.strokes().is_blank());
    }

    #[test]
    fn test_ink_then_erase_via_events() {
        let state = reduce(session(), SessionEvent::SetMode(DrawMode::Ink));
        let state = drag(state, Point::new(10.0, 100.0), Point::new(200.0, 100.0));
        assert_eq!(state.strokes().value_at(100, 100), INK);

        let state = reduce(state, SessionEvent::SetMode(DrawMode::Erase));
        let state = drag(state, Point::new(100.0, 50.0), Point::new(100.0, 150.0));
        assert_eq!(state.strokes().value_at(100, 100), ERASED);
        assert_eq!(state.strokes().value_at(20, 100), INK);
    }

    #[test]
    fn test_pointer_leave_ends_stroke() {
        let state = reduce(session(), SessionEvent::SetMode(DrawMode::Ink));
        let state = reduce(state, SessionEvent::PointerDown(Point::new(10.0, 10.0)));
        let state = reduce(state, SessionEvent::PointerLeave);
        let state = reduce(state, SessionEvent::PointerMove(Point::new(300.0, 300.0)));
        assert!(state.strokes().is_blank());
    }

    #[test]
    fn test_mode_switch_applies_to_next_stroke() {
        let state = reduce(session(), SessionEvent::SetMode(DrawMode::Ink));
        let state = reduce(state, SessionEvent::PointerDown(Point::new(10.0, 10.0)));
        let state = reduce(state, SessionEvent::SetMode(DrawMode::Erase));
        let state = reduce(state, SessionEvent::PointerMove(Point::new(50.0, 10.0)));
        assert_eq!(state.strokes().value_at(30, 10), INK);
    }

    #[test]
    fn test_set_media_resets_rotation() {
        let state = reduce(session(), SessionEvent::SetMedia(image_asset()));
        let state = reduce(state, SessionEvent::Rotate);
        assert_eq!(state.media().unwrap().rotation().degrees(), 90);
        let state = reduce(state, SessionEvent::SetMedia(image_asset()));
        assert_eq!(state.media().unwrap().rotation().degrees(), 0);
    }

    #[test]
    fn test_rotate_without_media_is_noop() {
        let state = reduce(session(), SessionEvent::Rotate);
        assert!(state.media().is_none());
    }

    #[test]
    fn test_strokes_survive_media_change() {
        let state = reduce(session(), SessionEvent::SetMode(DrawMode::Ink));
        let state = drag(state, Point::new(10.0, 10.0), Point::new(60.0, 10.0));
        let state = reduce(state, SessionEvent::SetMedia(image_asset()));
        assert_eq!(state.strokes().value_at(30, 10), INK);
    }

    #[test]
    fn test_failed_event_leaves_state_unchanged() {
        let mut state = session();
        let generation = state.generation();
        let result = state.apply(SessionEvent::SetText {
            id: CaptionId(42),
            text: "nope".to_string(),
        });
        assert!(result.is_err());
        assert_eq!(state.generation(), generation);
        assert_eq!(state.captions().visible().count(), 0);
    }

    #[test]
    fn test_upload_sets_media_and_remembers_template() {
        let state = reduce(
            session(),
            SessionEvent::SetPendingFile(Some(PathBuf::from("/tmp/a.png"))),
        );
        let state = reduce(state, SessionEvent::MediaUploaded(image_asset()));
        assert!(state.media().is_some());
        assert!(state.pending_file().is_none());
        assert_eq!(state.catalog().user_templates().len(), 1);

        let id = state.catalog().user_templates()[0].id;
        let state = reduce(state, SessionEvent::Reset);
        let state = reduce(state, SessionEvent::SelectUserTemplate(id));
        assert!(state.media().is_some());
    }

    #[test]
    fn test_reset_clears_session_but_keeps_templates() {
        let state = reduce(session(), SessionEvent::MediaUploaded(image_asset()));
        let state = reduce(
            state,
            SessionEvent::CatalogLoaded(vec![TemplateAsset {
                id: "1".to_string(),
                name: "Drake".to_string(),
                url: "https://i.imgflip.com/30b1gx.jpg".to_string(),
                width: 1200,
                height: 1200,
                box_count: 2,
            }]),
        );
        let state = reduce(state, SessionEvent::Rotate);
        let state = reduce(
            state,
            SessionEvent::SetText {
                id: CaptionId(1),
                text: "TOP".to_string(),
            },
        );
        let state = reduce(
            state,
            SessionEvent::SetGeometry {
                id: CaptionId(1),
                position: Point::new(0.0, 0.0),
                size: Size::new(80.0, 20.0),
            },
        );
        let state = reduce(state, SessionEvent::SetMode(DrawMode::Ink));
        let state = drag(state, Point::new(10.0, 10.0), Point::new(60.0, 60.0));
        let state = reduce(state, SessionEvent::SetSearch("dra".to_string()));
        let state = reduce(
            state,
            SessionEvent::SetPendingFile(Some(PathBuf::from("/tmp/b.png"))),
        );

        let state = reduce(state, SessionEvent::Reset);
        assert!(state.media().is_none());
        assert_eq!(state.mode(), DrawMode::Idle);
        assert!(state.strokes().is_blank());
        assert!(state.search().is_empty());
        assert!(state.pending_file().is_none());
        assert_eq!(state.captions().visible().count(), 0);
        assert_eq!(
            state.captions().get(CaptionId(1)).unwrap().rect,
            Rect::new(50.0, 50.0, 200.0, 50.0)
        );
        assert_eq!(state.catalog().user_templates().len(), 1);
        assert_eq!(state.catalog().remote().len(), 1);
    }
}
