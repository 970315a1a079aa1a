// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for editor operations.
//!
//! Every error is local to the action that raised it: callers can rely on
//! the session being exactly as it was before the failing operation.

use std::path::PathBuf;

/// Errors raised by editor operations.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("no media selected")]
    NoMediaSelected,

    #[error("template catalog fetch failed: {0}")]
    CatalogFetchFailed(String),

    #[error("template catalog response malformed: {0}")]
    CatalogFetchMalformed(String),

    #[error("export format '{format}' is not an image format")]
    UnsupportedExportSemantics { format: String },

    #[error("failed to read media file {}: {source}", path.display())]
    MediaRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("invalid data URI: {0}")]
    InvalidDataUri(String),

    #[error("unknown caption {0}")]
    UnknownCaption(u32),

    #[error("unknown template {0}")]
    UnknownTemplate(u64),

    #[error("invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("font error: {0}")]
    Font(String),

    #[error(transparent)]
    Encode(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;
