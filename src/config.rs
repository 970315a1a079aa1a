// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editor configuration.
//!
//! All settings have defaults matching the classic meme editor layout
//! (a 600x450 preview, three caption slots, 4 px pen). An optional YAML file
//! can override any subset of them.

use crate::error::{EditorError, EditorResult};
use crate::models::caption::Rgb;
use crate::models::geometry::Rect;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable pointing at an explicit config file.
pub const CONFIG_ENV: &str = "MEMEDIT_CONFIG";

/// Top-level editor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EditorConfig {
    pub viewport: ViewportConfig,
    pub stroke: StrokeConfig,
    pub caption: CaptionConfig,
    pub catalog: CatalogConfig,
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

/// Preview area (and export) dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: u32,
    pub height: u32,
    /// Fill behind the media layer.
    pub background: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeConfig {
    /// Pen width in pixels.
    pub width: u32,
}

/// Caption slots and text styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionConfig {
    pub slots: usize,
    pub default_rect: Rect,
    pub default_color: Rgb,
    pub font_size: f32,
    pub outline_width: u32,
    /// Optional TTF/OTF face; the bundled UI font is used otherwise.
    pub font_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub url: String,
    /// Maximum number of search results shown.
    pub search_limit: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub download_dir: PathBuf,
    pub base_name: String,
    pub jpeg_quality: u8,
    /// Save a PNG payload under an audio extension instead of rejecting it.
    pub allow_audio_extension: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter used when `RUST_LOG` is not set.
    pub level: String,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 450,
            background: Rgb([0xE5, 0xE7, 0xEB]),
        }
    }
}

impl Default for StrokeConfig {
    fn default() -> Self {
        Self { width: 4 }
    }
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            slots: 3,
            default_rect: Rect::new(50.0, 50.0, 200.0, 50.0),
            default_color: Rgb::WHITE,
            font_size: 22.0,
            outline_width: 2,
            font_path: None,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: "https://api.imgflip.com/get_memes".to_string(),
            search_limit: 20,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            base_name: "my-meme".to_string(),
            jpeg_quality: 92,
            allow_audio_extension: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl EditorConfig {
    /// Load config from the standard location, falling back to defaults.
    ///
    /// This runs before logging is set up, so a broken file is returned next
    /// to the defaults for the caller to report.
    pub fn load() -> (Self, Option<EditorError>) {
        let path = config_file_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            (Self::default(), None)
        }
    }

    /// Load config from a specific file, falling back to defaults on error.
    pub fn load_from(path: &Path) -> (Self, Option<EditorError>) {
        match Self::read(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Read and parse a config file.
    pub fn read(path: &Path) -> EditorResult<Self> {
        let invalid = |message: String| EditorError::Config {
            path: path.to_path_buf(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        serde_yaml::from_str(&content).map_err(|e| invalid(e.to_string()))
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    if let Ok(explicit) = std::env::var(CONFIG_ENV) {
        return PathBuf::from(explicit);
    }
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"));
    base.join("memedit").join("config.yaml")
}

/// Where exported files land by default.
fn default_download_dir() -> PathBuf {
    std::env::var("XDG_DOWNLOAD_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join("Downloads"))
}

fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
}
