// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Media file loading (images and videos).
//!
//! Uploaded files are read fully into memory as a `data:` URI and then
//! ingested into a [`MediaAsset`]. Read failures are reported to the caller
//! and never touch the session.

use crate::error::{EditorError, EditorResult};
use crate::models::media::MediaAsset;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;
use std::path::Path;

/// File extensions offered by the upload picker.
pub const UPLOAD_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff", "mp4", "webm", "mov",
];

/// A base64 `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub media_type: String,
    pub data: Vec<u8>,
}

impl DataUri {
    pub fn new(media_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            media_type: media_type.into(),
            data,
        }
    }

    /// Parse `data:<media type>[;params];base64,<payload>`.
    pub fn parse(uri: &str) -> EditorResult<Self> {
        let invalid = |why: &str| EditorError::InvalidDataUri(why.to_string());
        let rest = uri.strip_prefix("data:").ok_or_else(|| invalid("missing data: scheme"))?;
        let (header, payload) = rest.split_once(',').ok_or_else(|| invalid("missing ','"))?;
        let mut params = header.split(';');
        let media_type = params.next().unwrap_or_default();
        if !params.any(|p| p.eq_ignore_ascii_case("base64")) {
            return Err(invalid("only base64 payloads are supported"));
        }
        let data = STANDARD
            .decode(payload.trim())
            .map_err(|e| invalid(&e.to_string()))?;
        let media_type = if media_type.is_empty() {
            "text/plain".to_string()
        } else {
            media_type.to_ascii_lowercase()
        };
        Ok(Self { media_type, data })
    }

    pub fn into_asset(self) -> MediaAsset {
        MediaAsset::from_payload(self.data, self.media_type)
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.media_type, STANDARD.encode(&self.data))
    }
}

/// Media type for a file, inferred from its extension.
pub fn media_type_for(path: &Path) -> String {
    mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string())
}

/// Read an uploaded file into a data URI.
pub fn read_data_uri(path: &Path) -> EditorResult<DataUri> {
    let data = std::fs::read(path).map_err(|source| EditorError::MediaRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(DataUri::new(media_type_for(path), data))
}

/// Read and ingest an uploaded file.
pub fn read_upload(path: &Path) -> EditorResult<MediaAsset> {
    let uri = read_data_uri(path)?;
    log::info!(
        "Read upload {} ({}, {} bytes)",
        path.display(),
        uri.media_type,
        uri.data.len()
    );
    Ok(uri.into_asset())
}
