// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Caption text rasterization.
//!
//! Captions are drawn as bold, centered, word-wrapped text with a dark
//! outline of fixed width underneath the fill color, so they stay legible on
//! any background.

use crate::config::CaptionConfig;
use crate::error::{EditorError, EditorResult};
use crate::models::caption::{Caption, Rgb};
use ab_glyph::{point, Font, FontArc, GlyphId, PxScale, ScaleFont};
use image::{GrayImage, Luma, Rgba, RgbaImage};
use imageproc::distance_transform::Norm;
use imageproc::morphology::dilate;

/// Name of the face bundled with egui used when no font file is configured.
const FALLBACK_FACE: &str = "Ubuntu-Light";

/// Outline color shared by every caption.
const OUTLINE: Rgb = Rgb::BLACK;

/// Draws captions onto an RGBA canvas.
#[derive(Clone)]
pub struct CaptionRenderer {
    font: FontArc,
    size: f32,
    outline_width: u32,
}

impl std::fmt::Debug for CaptionRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptionRenderer")
            .field("size", &self.size)
            .field("outline_width", &self.outline_width)
            .finish_non_exhaustive()
    }
}

impl CaptionRenderer {
    /// Build from config: the configured font file, or the bundled face.
    pub fn from_config(config: &CaptionConfig) -> EditorResult<Self> {
        let font = match &config.font_path {
            Some(path) => {
                let bytes = std::fs::read(path)?;
                FontArc::try_from_vec(bytes)
                    .map_err(|e| EditorError::Font(format!("{}: {}", path.display(), e)))?
            }
            None => bundled_font()?,
        };
        Ok(Self {
            font,
            size: config.font_size,
            outline_width: config.outline_width,
        })
    }

    /// Lay out the caption text into lines that fit its box width.
    pub fn wrap_lines(&self, text: &str, max_width: f32) -> Vec<String> {
        let mut lines = Vec::new();
        for paragraph in text.split('\n') {
            let mut line = String::new();
            for word in paragraph.split_whitespace() {
                let candidate = if line.is_empty() {
                    word.to_string()
                } else {
                    format!("{line} {word}")
                };
                if self.line_width(&candidate) <= max_width {
                    line = candidate;
                    continue;
                }
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                // Words wider than the box break between characters.
                for ch in word.chars() {
                    let mut next = line.clone();
                    next.push(ch);
                    if !line.is_empty() && self.line_width(&next) > max_width {
                        lines.push(std::mem::take(&mut line));
                        line.push(ch);
                    } else {
                        line = next;
                    }
                }
            }
            lines.push(line);
        }
        lines
    }

    /// Advance width of a single line in pixels.
    pub fn line_width(&self, line: &str) -> f32 {
        let scaled = self.font.as_scaled(PxScale::from(self.size));
        let mut width = 0.0;
        let mut prev: Option<GlyphId> = None;
        for ch in line.chars() {
            let id = self.font.glyph_id(ch);
            if let Some(prev) = prev {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }
        // Faux bold widens every line by a pixel.
        width + 1.0
    }

    /// Draw one caption. Hidden captions draw nothing.
    pub fn draw(&self, canvas: &mut RgbaImage, caption: &Caption) {
        if !caption.is_visible() {
            return;
        }
        let coverage = self.coverage_mask(canvas.width(), canvas.height(), caption);
        let radius = self.outline_width.div_ceil(2).min(u8::MAX as u32) as u8;
        if radius > 0 {
            let outline = dilate(&coverage, Norm::LInf, radius);
            paint(canvas, &outline, OUTLINE, true);
        }
        paint(canvas, &coverage, caption.color, false);
    }

    /// Anti-aliased glyph coverage for the caption, in canvas coordinates.
    fn coverage_mask(&self, width: u32, height: u32, caption: &Caption) -> GrayImage {
        let mut mask = GrayImage::new(width, height);
        let scale = PxScale::from(self.size);
        let scaled = self.font.as_scaled(scale);
        let line_height = scaled.height() + scaled.line_gap();
        let rect = caption.rect;

        let mut baseline = rect.y + scaled.ascent();
        for line in self.wrap_lines(&caption.text, rect.width) {
            let mut x = rect.x + (rect.width - self.line_width(&line)).max(0.0) / 2.0;
            let mut prev: Option<GlyphId> = None;
            for ch in line.chars() {
                let id = self.font.glyph_id(ch);
                if let Some(prev) = prev {
                    x += scaled.kern(prev, id);
                }
                // Faux bold: the same glyph twice, one pixel apart.
                for dx in [0.0, 1.0] {
                    let glyph = id.with_scale_and_position(scale, point(x + dx, baseline));
                    if let Some(outlined) = self.font.outline_glyph(glyph) {
                        let bounds = outlined.px_bounds();
                        outlined.draw(|gx, gy, cov| {
                            let px = bounds.min.x as i64 + gx as i64;
                            let py = bounds.min.y as i64 + gy as i64;
                            if px < 0 || py < 0 || px >= width as i64 || py >= height as i64 {
                                return;
                            }
                            let value = (cov.clamp(0.0, 1.0) * 255.0).round() as u8;
                            let pixel = mask.get_pixel_mut(px as u32, py as u32);
                            pixel.0[0] = pixel.0[0].max(value);
                        });
                    }
                }
                x += scaled.h_advance(id);
                prev = Some(id);
            }
            baseline += line_height;
        }
        mask
    }
}

/// Blend `color` into the canvas wherever `mask` is set.
/// A `solid` mask paints at full opacity on any nonzero value.
fn paint(canvas: &mut RgbaImage, mask: &GrayImage, color: Rgb, solid: bool) {
    for (x, y, Luma([m])) in mask.enumerate_pixels() {
        if *m == 0 {
            continue;
        }
        let alpha = if solid { 255 } else { *m };
        let dst = canvas.get_pixel_mut(x, y);
        *dst = blend(*dst, color, alpha);
    }
}

/// Source-over blend of an opaque color at `alpha` onto an RGBA pixel.
fn blend(dst: Rgba<u8>, color: Rgb, alpha: u8) -> Rgba<u8> {
    if alpha == 255 {
        return color.to_rgba(255);
    }
    let a = alpha as u32;
    let inv = 255 - a;
    let [r, g, b] = color.0;
    let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * inv + 127) / 255) as u8;
    let out_alpha = a + dst.0[3] as u32 * inv / 255;
    Rgba([
        mix(r, dst.0[0]),
        mix(g, dst.0[1]),
        mix(b, dst.0[2]),
        out_alpha.min(255) as u8,
    ])
}

/// The proportional face egui ships with.
fn bundled_font() -> EditorResult<FontArc> {
    let definitions = egui::FontDefinitions::default();
    let data = definitions
        .font_data
        .get(FALLBACK_FACE)
        .ok_or_else(|| EditorError::Font(format!("bundled face {FALLBACK_FACE} missing")))?;
    FontArc::try_from_vec(data.font.to_vec())
        .map_err(|e| EditorError::Font(format!("{FALLBACK_FACE}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::caption::CaptionId;
    use crate::models::geometry::Rect;

    fn renderer() -> CaptionRenderer {
        CaptionRenderer::from_config(&CaptionConfig::default()).unwrap()
    }

    fn caption(text: &str, color: Rgb) -> Caption {
        Caption {
            id: CaptionId(1),
            text: text.to_string(),
            color,
            rect: Rect::new(50.0, 50.0, 200.0, 50.0),
        }
    }

    #[test]
    fn test_short_text_is_one_line() {
        assert_eq!(renderer().wrap_lines("TOP", 200.0), vec!["TOP"]);
    }

    #[test]
    fn test_long_text_wraps_within_width() {
        let renderer = renderer();
        let text = "when the code compiles on the first try and nobody believes you";
        let lines = renderer.wrap_lines(text, 200.0);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| renderer.line_width(l) <= 200.0));
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_overlong_word_breaks_between_characters() {
        let renderer = renderer();
        let word = "A".repeat(60);
        let lines = renderer.wrap_lines(&word, 100.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
        assert!(lines.iter().all(|l| renderer.line_width(l) <= 100.0));
    }

    #[test]
    fn test_draws_fill_and_outline_inside_box() {
        let mut canvas = RgbaImage::from_pixel(600, 450, Rgba([128, 128, 128, 255]));
        renderer().draw(&mut canvas, &caption("TOP", Rgb([255, 0, 0])));

        let mut red = 0;
        let mut dark = 0;
        for (x, y, p) in canvas.enumerate_pixels() {
            let [r, g, b, _] = p.0;
            let changed = p.0 != [128, 128, 128, 255];
            if changed {
                assert!((40..=260).contains(&x), "pixel at x={x} outside caption area");
                assert!(y >= 45, "pixel at y={y} above caption area");
            }
            if r > 200 && g < 60 && b < 60 {
                red += 1;
            }
            if r < 30 && g < 30 && b < 30 {
                dark += 1;
            }
        }
        assert!(red > 0, "expected red fill pixels");
        assert!(dark > 0, "expected dark outline pixels");
    }

    #[test]
    fn test_hidden_caption_draws_nothing() {
        let mut canvas = RgbaImage::from_pixel(600, 450, Rgba([1, 2, 3, 255]));
        let before = canvas.clone();
        renderer().draw(&mut canvas, &caption("", Rgb::WHITE));
        assert_eq!(canvas, before);
    }

    #[test]
    fn test_missing_font_file_is_an_error() {
        let config = CaptionConfig {
            font_path: Some("/definitely/not/a/font.ttf".into()),
            ..CaptionConfig::default()
        };
        assert!(CaptionRenderer::from_config(&config).is_err());
    }
}
