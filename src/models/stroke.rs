// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Freehand ink/erase raster layer.
//!
//! The layer is a single-channel mask aligned 1:1 with the viewport. Each
//! pixel is untouched, inked, or erased. Ink becomes opaque black when the
//! session is composed; erased pixels become fully transparent, cutting
//! through everything underneath (captions and media included).

use super::geometry::Point;
use image::{GrayImage, Luma};

/// Mask value for pixels never touched by a stroke.
pub const UNTOUCHED: u8 = 0;
/// Mask value for inked pixels.
pub const INK: u8 = 1;
/// Mask value for erased pixels.
pub const ERASED: u8 = 2;

/// Which effect pointer drags have on the stroke layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawMode {
    #[default]
    Idle,
    Ink,
    Erase,
}

impl DrawMode {
    fn mask_value(self) -> Option<u8> {
        match self {
            DrawMode::Idle => None,
            DrawMode::Ink => Some(INK),
            DrawMode::Erase => Some(ERASED),
        }
    }
}

/// A stroke in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveStroke {
    last: Point,
    value: u8,
}

/// Viewport-sized stroke mask.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeLayer {
    mask: GrayImage,
    stroke_width: u32,
    active: Option<ActiveStroke>,
}

impl StrokeLayer {
    pub fn new(width: u32, height: u32, stroke_width: u32) -> Self {
        Self {
            mask: GrayImage::new(width, height),
            stroke_width: stroke_width.max(1),
            active: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.mask.width()
    }

    pub fn height(&self) -> u32 {
        self.mask.height()
    }

    pub fn mask(&self) -> &GrayImage {
        &self.mask
    }

    /// Mask value at a pixel; out-of-range reads as untouched.
    pub fn value_at(&self, x: u32, y: u32) -> u8 {
        self.mask
            .get_pixel_checked(x, y)
            .map(|p| p.0[0])
            .unwrap_or(UNTOUCHED)
    }

    pub fn is_stroking(&self) -> bool {
        self.active.is_some()
    }

    /// Whether anything has ever been drawn or erased.
    pub fn is_blank(&self) -> bool {
        self.mask.pixels().all(|p| p.0[0] == UNTOUCHED)
    }

    /// Start a new path at `point`. `Idle` never starts a stroke.
    ///
    /// Like a canvas `moveTo`, starting a path paints nothing by itself;
    /// pixels change once the path is extended.
    pub fn begin_stroke(&mut self, point: Point, mode: DrawMode) {
        self.active = mode
            .mask_value()
            .map(|value| ActiveStroke { last: point, value });
    }

    /// Draw a round-capped segment from the last point to `point`.
    pub fn extend_stroke(&mut self, point: Point) {
        let Some(stroke) = self.active else {
            return;
        };
        self.stamp_segment(stroke.last, point, stroke.value);
        self.active = Some(ActiveStroke {
            last: point,
            ..stroke
        });
    }

    pub fn end_stroke(&mut self) {
        self.active = None;
    }

    /// Wipe every stroke.
    pub fn clear(&mut self) {
        self.active = None;
        for pixel in self.mask.pixels_mut() {
            *pixel = Luma([UNTOUCHED]);
        }
    }

    /// Paint the round-capped capsule of pen width around the segment.
    ///
    /// A pixel is covered when its center lies within half the pen width of
    /// the segment. Endpoints snap to pixel centers for odd widths and to
    /// pixel corners for even widths, so a straight stroke is exactly
    /// `stroke_width` pixels across.
    fn stamp_segment(&mut self, from: Point, to: Point, value: u8) {
        if ![from.x, from.y, to.x, to.y].iter().all(|v| v.is_finite()) {
            return;
        }
        let from = self.snap(from);
        let to = self.snap(to);
        let half = self.stroke_width as f32 / 2.0;
        let (width, height) = self.mask.dimensions();

        let min_x = (from.x.min(to.x) - half).floor().max(0.0) as u32;
        let max_x = (from.x.max(to.x) + half).ceil().min(width as f32) as u32;
        let min_y = (from.y.min(to.y) - half).floor().max(0.0) as u32;
        let max_y = (from.y.max(to.y) + half).ceil().min(height as f32) as u32;

        for y in min_y..max_y {
            for x in min_x..max_x {
                let center = Point::new(x as f32 + 0.5, y as f32 + 0.5);
                if distance_to_segment(center, from, to) <= half {
                    self.mask.put_pixel(x, y, Luma([value]));
                }
            }
        }
    }

    fn snap(&self, point: Point) -> Point {
        let snap = |v: f32| {
            if self.stroke_width % 2 == 1 {
                v.floor() + 0.5
            } else {
                v.round()
            }
        };
        Point::new(snap(point.x), snap(point.y))
    }
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len2 = dx * dx + dy * dy;
    let t = if len2 == 0.0 {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0)
    };
    p.distance(&Point::new(a.x + dx * t, a.y + dy * t))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer() -> StrokeLayer {
        StrokeLayer::new(100, 80, 4)
    }

    fn pixels_with(layer: &StrokeLayer, value: u8) -> Vec<(u32, u32)> {
        layer
            .mask()
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[0] == value)
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    #[test]
    fn test_ink_stroke_paints_segment() {
        let mut layer = layer();
        layer.begin_stroke(Point::new(10.0, 10.0), DrawMode::Ink);
        assert!(layer.is_blank());
        layer.extend_stroke(Point::new(50.0, 10.0));
        layer.end_stroke();

        assert_eq!(layer.value_at(10, 10), INK);
        assert_eq!(layer.value_at(30, 10), INK);
        assert_eq!(layer.value_at(50, 10), INK);
        assert_eq!(layer.value_at(30, 8), INK);
        assert_eq!(layer.value_at(30, 11), INK);
        assert_eq!(layer.value_at(30, 12), UNTOUCHED);
        assert_eq!(layer.value_at(30, 20), UNTOUCHED);
        assert_eq!(layer.value_at(60, 10), UNTOUCHED);
    }

    #[test]
    fn test_extend_and_end_without_begin_are_noops() {
        let mut layer = layer();
        layer.extend_stroke(Point::new(5.0, 5.0));
        layer.end_stroke();
        layer.extend_stroke(Point::new(20.0, 20.0));
        assert!(layer.is_blank());
        assert!(!layer.is_stroking());
    }

    #[test]
    fn test_extend_after_end_is_noop() {
        let mut layer = layer();
        layer.begin_stroke(Point::new(10.0, 10.0), DrawMode::Ink);
        layer.extend_stroke(Point::new(20.0, 10.0));
        layer.end_stroke();
        let before = layer.clone();
        layer.extend_stroke(Point::new(70.0, 70.0));
        assert_eq!(layer, before);
    }

    #[test]
    fn test_idle_mode_never_draws() {
        let mut layer = layer();
        layer.begin_stroke(Point::new(10.0, 10.0), DrawMode::Idle);
        layer.extend_stroke(Point::new(40.0, 40.0));
        assert!(layer.is_blank());
    }

    #[test]
    fn test_ink_only_adds_pixels() {
        let mut layer = layer();
        layer.begin_stroke(Point::new(5.0, 40.0), DrawMode::Ink);
        layer.extend_stroke(Point::new(95.0, 40.0));
        layer.end_stroke();
        let before = pixels_with(&layer, INK);

        let paths = [
            [(10.0, 0.0), (10.0, 79.0)],
            [(0.0, 0.0), (99.0, 79.0)],
            [(50.0, 40.0), (51.0, 41.0)],
        ];
        for [(x0, y0), (x1, y1)] in paths {
            layer.begin_stroke(Point::new(x0, y0), DrawMode::Ink);
            layer.extend_stroke(Point::new(x1, y1));
            layer.end_stroke();
            let after = pixels_with(&layer, INK);
            assert!(before.iter().all(|p| after.contains(p)));
            assert!(after.len() >= before.len());
        }
    }

    #[test]
    fn test_erase_overrides_ink_and_ink_overrides_erase() {
        let mut layer = layer();
        layer.begin_stroke(Point::new(10.0, 30.0), DrawMode::Ink);
        layer.extend_stroke(Point::new(90.0, 30.0));
        layer.end_stroke();

        layer.begin_stroke(Point::new(50.0, 10.0), DrawMode::Erase);
        layer.extend_stroke(Point::new(50.0, 60.0));
        layer.end_stroke();
        assert_eq!(layer.value_at(50, 30), ERASED);
        assert_eq!(layer.value_at(20, 30), INK);

        layer.begin_stroke(Point::new(45.0, 30.0), DrawMode::Ink);
        layer.extend_stroke(Point::new(55.0, 30.0));
        assert_eq!(layer.value_at(50, 30), INK);
    }

    #[test]
    fn test_points_outside_viewport_are_clipped() {
        let mut layer = layer();
        layer.begin_stroke(Point::new(-50.0, -50.0), DrawMode::Ink);
        layer.extend_stroke(Point::new(500.0, 500.0));
        layer.end_stroke();
        assert_eq!(layer.value_at(40, 40), INK);
        assert_eq!(layer.width(), 100);
        assert_eq!(layer.height(), 80);
    }

    #[test]
    fn test_clear_wipes_everything() {
        let mut layer = layer();
        layer.begin_stroke(Point::new(10.0, 10.0), DrawMode::Erase);
        layer.extend_stroke(Point::new(30.0, 30.0));
        layer.clear();
        assert!(layer.is_blank());
        assert!(!layer.is_stroking());
    }

    fn thickness_at_column(layer: &StrokeLayer, x: u32) -> usize {
        (0..layer.height())
            .filter(|&y| layer.value_at(x, y) != UNTOUCHED)
            .count()
    }

    #[test]
    fn test_stroke_cross_section_matches_width() {
        for width in 1..=8 {
            for y in [20.0, 20.3, 20.5, 20.8] {
                let mut layer = StrokeLayer::new(100, 80, width);
                layer.begin_stroke(Point::new(10.0, y), DrawMode::Ink);
                layer.extend_stroke(Point::new(90.0, y));
                layer.end_stroke();
                assert_eq!(
                    thickness_at_column(&layer, 50),
                    width as usize,
                    "width {width} at y {y}"
                );
            }
        }
    }

    #[test]
    fn test_vertical_stroke_cross_section_matches_width() {
        let mut layer = layer();
        layer.begin_stroke(Point::new(30.0, 5.0), DrawMode::Erase);
        layer.extend_stroke(Point::new(30.0, 70.0));
        let row: Vec<u32> = (0..layer.width())
            .filter(|&x| layer.value_at(x, 40) == ERASED)
            .collect();
        assert_eq!(row, vec![28, 29, 30, 31]);
    }
}
