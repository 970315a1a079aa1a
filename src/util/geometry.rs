// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! The preview is drawn scaled to fit the window. These helpers convert
//! between on-screen coordinates and viewport pixels.

use crate::models::geometry::{Point, Size};

/// Scale factor that fits `viewport` inside `available`, never enlarging.
pub fn preview_scale(available: Size, viewport: Size) -> f32 {
    if viewport.width <= 0.0 || viewport.height <= 0.0 {
        return 1.0;
    }
    let scale = (available.width / viewport.width).min(available.height / viewport.height);
    if scale.is_finite() && scale > 0.0 {
        scale.min(1.0)
    } else {
        1.0
    }
}

/// Convert a screen position to viewport pixels.
pub fn screen_to_viewport(screen: Point, origin: Point, scale: f32) -> Point {
    Point {
        x: (screen.x - origin.x) / scale,
        y: (screen.y - origin.y) / scale,
    }
}

/// Convert viewport pixels to a screen position.
pub fn viewport_to_screen(point: Point, origin: Point, scale: f32) -> Point {
    Point {
        x: origin.x + point.x * scale,
        y: origin.y + point.y * scale,
    }
}
