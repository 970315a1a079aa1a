// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Layer compositing.
//!
//! Flattens a session into one viewport-sized bitmap. Layers are drawn in a
//! fixed order, bottom to top:
//!
//! 1. background fill
//! 2. media, fitted to the viewport and rotated about its center
//! 3. visible captions, in slot order
//! 4. the stroke layer: ink paints black, erased pixels become transparent

use super::text::CaptionRenderer;
use crate::error::{EditorError, EditorResult};
use crate::models::media::{MediaAsset, MediaKind, Rotation};
use crate::models::session::SessionState;
use crate::models::stroke::{ERASED, INK};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use std::sync::{Arc, Mutex};

/// Pixel capture of a whole session.
pub trait SnapshotRenderable {
    /// Render every layer of `session` at viewport size.
    fn render_snapshot(&self, session: &SessionState) -> EditorResult<RgbaImage>;
}

/// Media already fitted and rotated for one canvas size.
#[derive(Debug)]
struct FittedMedia {
    source: Arc<RgbaImage>,
    rotation: Rotation,
    canvas: (u32, u32),
    image: Arc<RgbaImage>,
}

impl FittedMedia {
    fn matches(&self, source: &Arc<RgbaImage>, rotation: Rotation, canvas: (u32, u32)) -> bool {
        Arc::ptr_eq(&self.source, source) && self.rotation == rotation && self.canvas == canvas
    }
}

/// Software rasterizer for all session layers.
///
/// The last fitted media is kept, so redrawing strokes and captions over
/// the same media does not resample it.
#[derive(Debug, Clone)]
pub struct LayerRasterizer {
    captions: CaptionRenderer,
    media_cache: Arc<Mutex<Option<FittedMedia>>>,
}

impl LayerRasterizer {
    pub fn new(captions: CaptionRenderer) -> Self {
        Self {
            captions,
            media_cache: Arc::new(Mutex::new(None)),
        }
    }

    /// Render the media layer (background included) only.
    pub fn render_media(&self, session: &SessionState) -> RgbaImage {
        let (width, height) = session.viewport_pixels();
        let mut canvas = RgbaImage::from_pixel(width, height, session.background().to_rgba(255));
        if let Some(fitted) = session.media().and_then(|m| self.fitted_media(m, (width, height))) {
            let x = (width as i64 - fitted.width() as i64) / 2;
            let y = (height as i64 - fitted.height() as i64) / 2;
            imageops::overlay(&mut canvas, &*fitted, x, y);
        }
        canvas
    }

    /// Fitted, rotated media for a canvas size, from cache when possible.
    fn fitted_media(&self, media: &MediaAsset, canvas: (u32, u32)) -> Option<Arc<RgbaImage>> {
        let Some(source) = media.shared_pixels() else {
            if media.kind() == MediaKind::Video {
                log::debug!("Video media contributes no pixels to the composition");
            }
            return None;
        };
        let rotation = media.rotation();
        let Ok(mut cache) = self.media_cache.lock() else {
            return fit_media(source, rotation, canvas).map(Arc::new);
        };
        if let Some(hit) = cache.as_ref().filter(|c| c.matches(source, rotation, canvas)) {
            return Some(Arc::clone(&hit.image));
        }
        let image = Arc::new(fit_media(source, rotation, canvas)?);
        *cache = Some(FittedMedia {
            source: Arc::clone(source),
            rotation,
            canvas,
            image: Arc::clone(&image),
        });
        Some(image)
    }

    #[cfg(test)]
    fn is_cached(&self, media: &MediaAsset, canvas: (u32, u32)) -> bool {
        match (self.media_cache.lock(), media.shared_pixels()) {
            (Ok(cache), Some(source)) => cache
                .as_ref()
                .is_some_and(|c| c.matches(source, media.rotation(), canvas)),
            _ => false,
        }
    }
}

impl SnapshotRenderable for LayerRasterizer {
    fn render_snapshot(&self, session: &SessionState) -> EditorResult<RgbaImage> {
        let mut canvas = self.render_media(session);
        for caption in session.captions().visible() {
            self.captions.draw(&mut canvas, caption);
        }
        apply_strokes(&mut canvas, session);
        Ok(canvas)
    }
}

/// Flattens sessions through a [`SnapshotRenderable`].
#[derive(Debug, Clone)]
pub struct Composer<R = LayerRasterizer> {
    renderer: R,
}

impl<R: SnapshotRenderable> Composer<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Flatten all layers. Fails with [`EditorError::NoMediaSelected`] when
    /// there is no media to compose onto.
    pub fn compose(&self, session: &SessionState) -> EditorResult<RgbaImage> {
        if session.media().is_none() {
            return Err(EditorError::NoMediaSelected);
        }
        self.renderer.render_snapshot(session)
    }

    /// Render for on-screen preview; works without media.
    pub fn preview(&self, session: &SessionState) -> EditorResult<RgbaImage> {
        self.renderer.render_snapshot(session)
    }
}

/// Fit the media inside the canvas (aspect preserved) and rotate it
/// clockwise. The caller centers the result; overflow is clipped.
fn fit_media(pixels: &RgbaImage, rotation: Rotation, canvas: (u32, u32)) -> Option<RgbaImage> {
    let (src_w, src_h) = pixels.dimensions();
    if src_w == 0 || src_h == 0 {
        return None;
    }
    let (fit_w, fit_h) = fit_contain(src_w, src_h, canvas.0, canvas.1);

    let fitted = if (fit_w, fit_h) == (src_w, src_h) {
        pixels.clone()
    } else {
        imageops::resize(pixels, fit_w, fit_h, FilterType::Triangle)
    };
    Some(match rotation.quarter_turns() {
        1 => imageops::rotate90(&fitted),
        2 => imageops::rotate180(&fitted),
        3 => imageops::rotate270(&fitted),
        _ => fitted,
    })
}

/// Largest size with the source aspect ratio that fits the target.
fn fit_contain(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> (u32, u32) {
    let scale = (dst_w as f64 / src_w as f64).min(dst_h as f64 / src_h as f64);
    let w = ((src_w as f64 * scale).round() as u32).clamp(1, dst_w.max(1));
    let h = ((src_h as f64 * scale).round() as u32).clamp(1, dst_h.max(1));
    (w, h)
}

/// Top layer: ink is opaque black, erased pixels are fully transparent.
fn apply_strokes(canvas: &mut RgbaImage, session: &SessionState) {
    let mask = session.strokes().mask();
    for (x, y, pixel) in canvas.enumerate_pixels_mut() {
        match mask.get_pixel_checked(x, y).map(|p| p.0[0]) {
            Some(INK) => *pixel = Rgba([0, 0, 0, 255]),
            Some(ERASED) => *pixel = Rgba([0, 0, 0, 0]),
            _ => {}
        }
    }
}
