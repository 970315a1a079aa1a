// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image export: encode a composed session and hand it to a download sink.

use super::compose::{Composer, SnapshotRenderable};
use crate::config::ExportConfig;
use crate::error::{EditorError, EditorResult};
use crate::io::media::DataUri;
use crate::models::session::SessionState;
use image::codecs::gif::{GifEncoder, Repeat};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Frame, ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::PathBuf;

/// Output format offered in the download selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
    Gif,
    /// Offered for compatibility; carries no audio. See [`Exporter`].
    Mp3,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Png,
        ExportFormat::Jpeg,
        ExportFormat::Gif,
        ExportFormat::Mp3,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpeg",
            ExportFormat::Gif => "gif",
            ExportFormat::Mp3 => "mp3",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Png => "PNG",
            ExportFormat::Jpeg => "JPG",
            ExportFormat::Gif => "GIF",
            ExportFormat::Mp3 => "MP3",
        }
    }

    /// Whether the format can actually hold a still image.
    pub fn is_image(self) -> bool {
        !matches!(self, ExportFormat::Mp3)
    }
}

/// An encoded file ready to be saved.
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl Download {
    /// `data:` URI form of the payload.
    pub fn to_data_uri(&self) -> String {
        DataUri::new(self.media_type.clone(), self.bytes.clone()).to_string()
    }
}

/// Receives finished exports.
pub trait DownloadSink {
    fn deliver(&self, download: &Download) -> EditorResult<PathBuf>;
}

/// Saves downloads into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&self, download: &Download) -> EditorResult<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(&download.file_name);
        std::fs::write(&path, &download.bytes)?;
        log::info!("Saved {} ({} bytes)", path.display(), download.bytes.len());
        Ok(path)
    }
}

/// Composes, encodes and delivers exports.
#[derive(Debug, Clone)]
pub struct Exporter<R> {
    composer: Composer<R>,
    config: ExportConfig,
}

impl<R: SnapshotRenderable> Exporter<R> {
    pub fn new(composer: Composer<R>, config: ExportConfig) -> Self {
        Self { composer, config }
    }

    pub fn composer(&self) -> &Composer<R> {
        &self.composer
    }

    /// Build the download for `session` without touching the session.
    ///
    /// The audio format is rejected unless `allow_audio_extension` is set, in
    /// which case a PNG payload is labeled with the `.mp3` extension.
    pub fn render(&self, session: &SessionState, format: ExportFormat) -> EditorResult<Download> {
        if !format.is_image() && !self.config.allow_audio_extension {
            return Err(EditorError::UnsupportedExportSemantics {
                format: format.extension().to_string(),
            });
        }
        let image = self.composer.compose(session)?;
        let (media_type, bytes) = encode(&image, format, self.config.jpeg_quality)?;
        Ok(Download {
            file_name: format!("{}.{}", self.config.base_name, format.extension()),
            media_type: media_type.to_string(),
            bytes,
        })
    }

    /// Render and deliver in one step.
    pub fn export(
        &self,
        session: &SessionState,
        format: ExportFormat,
        sink: &dyn DownloadSink,
    ) -> EditorResult<PathBuf> {
        let download = self.render(session, format)?;
        sink.deliver(&download)
    }
}

/// Encode a composed image. Returns the real media type of the bytes.
pub fn encode(
    image: &RgbaImage,
    format: ExportFormat,
    jpeg_quality: u8,
) -> EditorResult<(&'static str, Vec<u8>)> {
    let mut out = Cursor::new(Vec::new());
    let media_type = match format {
        ExportFormat::Png | ExportFormat::Mp3 => {
            image.write_to(&mut out, ImageFormat::Png)?;
            "image/png"
        }
        ExportFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            let mut encoder = JpegEncoder::new_with_quality(&mut out, jpeg_quality.clamp(1, 100));
            encoder.encode_image(&rgb)?;
            "image/jpeg"
        }
        ExportFormat::Gif => {
            let mut encoder = GifEncoder::new(&mut out);
            encoder.set_repeat(Repeat::Infinite)?;
            encoder.encode_frame(Frame::new(image.clone()))?;
            drop(encoder);
            "image/gif"
        }
    };
    Ok((media_type, out.into_inner()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::models::media::MediaAsset;
    use crate::models::session::{reduce, SessionEvent};
    use image::Rgba;
    use std::cell::RefCell;

    /// Renders a flat color, standing in for the full rasterizer.
    struct Flat;

    impl SnapshotRenderable for Flat {
        fn render_snapshot(&self, session: &SessionState) -> EditorResult<RgbaImage> {
            let (w, h) = session.viewport_pixels();
            Ok(RgbaImage::from_pixel(w, h, Rgba([200, 10, 10, 255])))
        }
    }

    #[derive(Default)]
    struct Recorder {
        downloads: RefCell<Vec<Download>>,
    }

    impl DownloadSink for Recorder {
        fn deliver(&self, download: &Download) -> EditorResult<PathBuf> {
            self.downloads.borrow_mut().push(download.clone());
            Ok(PathBuf::from(&download.file_name))
        }
    }

    fn exporter(allow_audio: bool) -> Exporter<Flat> {
        let config = ExportConfig {
            allow_audio_extension: allow_audio,
            ..ExportConfig::default()
        };
        Exporter::new(Composer::new(Flat), config)
    }

    fn with_media() -> SessionState {
        reduce(
            SessionState::new(&EditorConfig::default()),
            SessionEvent::SetMedia(MediaAsset::from_image(RgbaImage::new(4, 4))),
        )
    }

    #[test]
    fn test_file_names_and_signatures() {
        let session = with_media();
        let exporter = exporter(false);

        let png = exporter.render(&session, ExportFormat::Png).unwrap();
        assert_eq!(png.file_name, "my-meme.png");
        assert_eq!(png.media_type, "image/png");
        assert!(png.bytes.starts_with(&[0x89, b'P', b'N', b'G']));

        let jpeg = exporter.render(&session, ExportFormat::Jpeg).unwrap();
        assert_eq!(jpeg.file_name, "my-meme.jpeg");
        assert!(jpeg.bytes.starts_with(&[0xFF, 0xD8]));

        let gif = exporter.render(&session, ExportFormat::Gif).unwrap();
        assert_eq!(gif.file_name, "my-meme.gif");
        assert!(gif.bytes.starts_with(b"GIF89a"));
    }

    #[test]
    fn test_encoded_png_decodes_to_composition() {
        let download = exporter(false).render(&with_media(), ExportFormat::Png).unwrap();
        let decoded = image::load_from_memory(&download.bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (600, 450));
        assert_eq!(decoded.get_pixel(10, 10).0, [200, 10, 10, 255]);
    }

    #[test]
    fn test_audio_format_rejected_by_default() {
        let result = exporter(false).render(&with_media(), ExportFormat::Mp3);
        assert!(matches!(
            result,
            Err(EditorError::UnsupportedExportSemantics { .. })
        ));
    }

    #[test]
    fn test_audio_format_allowed_writes_png_payload() {
        let download = exporter(true).render(&with_media(), ExportFormat::Mp3).unwrap();
        assert_eq!(download.file_name, "my-meme.mp3");
        assert_eq!(download.media_type, "image/png");
        assert!(download.bytes.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn test_export_without_media_delivers_nothing() {
        let sink = Recorder::default();
        let session = SessionState::new(&EditorConfig::default());
        let result = exporter(false).export(&session, ExportFormat::Png, &sink);
        assert!(matches!(result, Err(EditorError::NoMediaSelected)));
        assert!(sink.downloads.borrow().is_empty());
    }

    #[test]
    fn test_export_does_not_mutate_session() {
        let sink = Recorder::default();
        let session = with_media();
        let generation = session.generation();
        exporter(false)
            .export(&session, ExportFormat::Gif, &sink)
            .unwrap();
        assert_eq!(session.generation(), generation);
        assert_eq!(sink.downloads.borrow().len(), 1);
    }

    #[test]
    fn test_directory_sink_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path().join("downloads"));
        let path = exporter(false)
            .export(&with_media(), ExportFormat::Png, &sink)
            .unwrap();
        assert_eq!(path, dir.path().join("downloads").join("my-meme.png"));
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_data_uri() {
        let download = Download {
            file_name: "my-meme.png".to_string(),
            media_type: "image/png".to_string(),
            bytes: vec![1, 2, 3],
        };
        assert_eq!(download.to_data_uri(), "data:image/png;base64,AQID");
    }
}
