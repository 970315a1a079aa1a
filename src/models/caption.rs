// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Caption data structures.
//!
//! Captions live in a fixed number of slots created up front. A slot with
//! empty text is hidden from the preview and the export, but keeps its
//! color and geometry so that typing into it again brings it back where it
//! was.

use super::geometry::{Point, Rect, Size};
use crate::error::{EditorError, EditorResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An opaque RGB color, written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const WHITE: Rgb = Rgb([0xFF, 0xFF, 0xFF]);
    pub const BLACK: Rgb = Rgb([0x00, 0x00, 0x00]);

    pub fn to_rgba(self, alpha: u8) -> image::Rgba<u8> {
        let [r, g, b] = self.0;
        image::Rgba([r, g, b, alpha])
    }
}

impl FromStr for Rgb {
    type Err = EditorError;

    /// Parse `#RRGGBB` or the short `#RGB` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EditorError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Rgb([channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?])),
            3 => {
                let mut out = [0u8; 3];
                for (slot, digit) in out.iter_mut().zip(hex.chars()) {
                    let v = channel(&digit.to_string())?;
                    *slot = v * 17;
                }
                Ok(Rgb(out))
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{:02X}{:02X}{:02X}", r, g, b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = EditorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

/// Caption slot identifier (1-based, in slot order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CaptionId(pub u32);

impl fmt::Display for CaptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A repositionable text overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub id: CaptionId,
    pub text: String,
    pub color: Rgb,
    pub rect: Rect,
}

impl Caption {
    /// Whether this caption is drawn in the preview and export.
    pub fn is_visible(&self) -> bool {
        !self.text.is_empty()
    }
}

/// Interactive geometry editing, as driven by a draggable/resizable box.
pub trait GeometryEditable {
    /// Area every box must stay inside.
    fn bounds(&self) -> Size;

    fn geometry(&self, id: CaptionId) -> Option<Rect>;

    /// Store new geometry, clamped to [`GeometryEditable::bounds`].
    /// Returns the geometry actually stored.
    fn set_geometry(&mut self, id: CaptionId, position: Point, size: Size) -> EditorResult<Rect>;
}

/// Fixed-size ordered set of caption slots.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionSet {
    captions: Vec<Caption>,
    bounds: Size,
    default_rect: Rect,
    default_color: Rgb,
}

impl CaptionSet {
    /// Create `slots` empty captions inside a viewport of `bounds`.
    pub fn new(slots: usize, bounds: Size, default_rect: Rect, default_color: Rgb) -> Self {
        let default_rect = default_rect.clamped_within(bounds);
        let captions = (1..=slots as u32)
            .map(|id| Caption {
                id: CaptionId(id),
                text: String::new(),
                color: default_color,
                rect: default_rect,
            })
            .collect();
        Self {
            captions,
            bounds,
            default_rect,
            default_color,
        }
    }

    pub fn len(&self) -> usize {
        self.captions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.captions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Caption> {
        self.captions.iter()
    }

    /// Captions to draw, in slot order.
    pub fn visible(&self) -> impl Iterator<Item = &Caption> {
        self.captions.iter().filter(|c| c.is_visible())
    }

    pub fn get(&self, id: CaptionId) -> Option<&Caption> {
        self.captions.iter().find(|c| c.id == id)
    }

    fn get_mut(&mut self, id: CaptionId) -> EditorResult<&mut Caption> {
        self.captions
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(EditorError::UnknownCaption(id.0))
    }

    /// Update caption text. Empty text hides the caption but keeps its slot.
    pub fn set_text(&mut self, id: CaptionId, text: impl Into<String>) -> EditorResult<()> {
        self.get_mut(id)?.text = text.into();
        Ok(())
    }

    pub fn set_color(&mut self, id: CaptionId, color: Rgb) -> EditorResult<()> {
        self.get_mut(id)?.color = color;
        Ok(())
    }

    /// Hide a caption; same as setting empty text.
    pub fn clear(&mut self, id: CaptionId) -> EditorResult<()> {
        self.set_text(id, String::new())
    }

    /// Restore every slot to empty text, default color and default geometry.
    pub fn reset(&mut self) {
        for caption in &mut self.captions {
            caption.text.clear();
            caption.color = self.default_color;
            caption.rect = self.default_rect;
        }
    }
}

impl GeometryEditable for CaptionSet {
    fn bounds(&self) -> Size {
        self.bounds
    }

    fn geometry(&self, id: CaptionId) -> Option<Rect> {
        self.get(id).map(|c| c.rect)
    }

    fn set_geometry(&mut self, id: CaptionId, position: Point, size: Size) -> EditorResult<Rect> {
        let bounds = self.bounds;
        let caption = self.get_mut(id)?;
        caption.rect = Rect::from_parts(position, size).clamped_within(bounds);
        Ok(caption.rect)
    }
}
