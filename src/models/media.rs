// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Base media layer: the chosen image or video and its rotation.

use image::RgbaImage;
use std::sync::Arc;

/// Kind of media, decided once when the payload is ingested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify a payload from its declared media type (e.g. `video/mp4`).
    pub fn from_media_type(media_type: &str) -> Self {
        if media_type.trim().to_ascii_lowercase().starts_with("video/") {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }
}

/// Clockwise rotation in quarter turns, always in `[0, 360)` degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rotation(u16);

impl Rotation {
    pub fn degrees(self) -> u16 {
        self.0
    }

    pub fn quarter_turns(self) -> u8 {
        (self.0 / 90) as u8
    }

    /// Turn a further 90 degrees clockwise.
    pub fn rotated(self) -> Self {
        Rotation((self.0 + 90) % 360)
    }
}

/// The selected base visual.
///
/// Cloning is cheap: payload and decoded pixels are shared.
#[derive(Debug, Clone)]
pub struct MediaAsset {
    kind: MediaKind,
    media_type: String,
    data: Arc<Vec<u8>>,
    pixels: Option<Arc<RgbaImage>>,
    rotation: Rotation,
}

impl MediaAsset {
    /// Ingest a payload. Nothing is rejected: an image payload that fails to
    /// decode is kept and simply contributes no pixels, like a broken image.
    pub fn from_payload(data: Vec<u8>, media_type: impl Into<String>) -> Self {
        let media_type = media_type.into();
        let kind = MediaKind::from_media_type(&media_type);
        let pixels = match kind {
            MediaKind::Image => match image::load_from_memory(&data) {
                Ok(decoded) => Some(Arc::new(decoded.to_rgba8())),
                Err(e) => {
                    log::warn!("Could not decode {} payload ({} bytes): {}", media_type, data.len(), e);
                    None
                }
            },
            MediaKind::Video => None,
        };
        Self {
            kind,
            media_type,
            data: Arc::new(data),
            pixels,
            rotation: Rotation::default(),
        }
    }

    /// Wrap already-decoded pixels as an image asset.
    pub fn from_image(image: RgbaImage) -> Self {
        Self {
            kind: MediaKind::Image,
            media_type: "image/png".to_string(),
            data: Arc::new(Vec::new()),
            pixels: Some(Arc::new(image)),
            rotation: Rotation::default(),
        }
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Decoded pixels, if this is a decodable image.
    pub fn pixels(&self) -> Option<&RgbaImage> {
        self.pixels.as_deref()
    }

    /// Decoded pixels as the shared handle, for caches keyed on identity.
    pub fn shared_pixels(&self) -> Option<&Arc<RgbaImage>> {
        self.pixels.as_ref()
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Rotate the rendering 90 degrees clockwise. Pixel data is untouched.
    pub fn rotate(&mut self) {
        self.rotation = self.rotation.rotated();
    }

    /// Same media with rotation back at zero.
    pub fn with_reset_rotation(mut self) -> Self {
        self.rotation = Rotation::default();
        self
    }

    /// Whether two handles share the same underlying payload.
    pub fn same_payload(&self, other: &MediaAsset) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, image::Rgba(color));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_kind_from_media_type() {
        assert_eq!(MediaKind::from_media_type("video/mp4"), MediaKind::Video);
        assert_eq!(MediaKind::from_media_type("VIDEO/webm"), MediaKind::Video);
        assert_eq!(MediaKind::from_media_type("image/png"), MediaKind::Image);
        assert_eq!(MediaKind::from_media_type("application/octet-stream"), MediaKind::Image);
    }

    #[test]
    fn test_rotate_four_times_is_identity() {
        let mut asset = MediaAsset::from_image(RgbaImage::new(4, 3));
        let start = asset.rotation();
        for expected in [90, 180, 270, 0] {
            asset.rotate();
            assert_eq!(asset.rotation().degrees(), expected);
        }
        assert_eq!(asset.rotation(), start);
    }

    #[test]
    fn test_payload_is_decoded_on_ingest() {
        let asset = MediaAsset::from_payload(png_bytes(8, 6, [255, 0, 0, 255]), "image/png");
        assert_eq!(asset.kind(), MediaKind::Image);
        let pixels = asset.pixels().unwrap();
        assert_eq!(pixels.dimensions(), (8, 6));
        assert_eq!(pixels.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_garbage_payload_is_accepted() {
        let asset = MediaAsset::from_payload(vec![1, 2, 3], "image/png");
        assert_eq!(asset.kind(), MediaKind::Image);
        assert!(asset.pixels().is_none());
        assert_eq!(asset.data(), &[1, 2, 3]);
    }

    #[test]
    fn test_video_is_not_decoded() {
        let asset = MediaAsset::from_payload(vec![0; 16], "video/mp4");
        assert_eq!(asset.kind(), MediaKind::Video);
        assert!(asset.pixels().is_none());
    }

    #[test]
    fn test_reset_rotation() {
        let mut asset = MediaAsset::from_image(RgbaImage::new(2, 2));
        asset.rotate();
        let reset = asset.clone().with_reset_rotation();
        assert_eq!(reset.rotation().degrees(), 0);
        assert!(reset.same_payload(&asset));
    }
}
