// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Remote meme template catalog.
//!
//! The catalog service answers a single GET with
//! `{"success": true, "data": {"memes": [{"id", "name", "url", ...}]}}`.
//! Network access comes from the default `remote-catalog` feature; builds
//! without it fail every fetch and the catalog simply stays empty.

use crate::error::{EditorError, EditorResult};
use crate::models::media::MediaAsset;
use crate::models::template::TemplateAsset;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    success: bool,
    #[serde(default)]
    data: Option<CatalogData>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogData {
    memes: Vec<TemplateAsset>,
}

/// Parse a catalog response body.
pub fn parse_catalog(body: &str) -> EditorResult<Vec<TemplateAsset>> {
    let response: CatalogResponse = serde_json::from_str(body)
        .map_err(|e| EditorError::CatalogFetchMalformed(e.to_string()))?;
    if !response.success {
        return Err(EditorError::CatalogFetchFailed(
            response
                .error_message
                .unwrap_or_else(|| "service reported failure".to_string()),
        ));
    }
    response
        .data
        .map(|d| d.memes)
        .ok_or_else(|| EditorError::CatalogFetchMalformed("missing data.memes".to_string()))
}

/// Fetch and parse the template list.
#[cfg(feature = "remote-catalog")]
pub fn fetch_catalog(url: &str) -> EditorResult<Vec<TemplateAsset>> {
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| EditorError::CatalogFetchFailed(e.to_string()))?;
    let body = response
        .text()
        .map_err(|e| EditorError::CatalogFetchFailed(e.to_string()))?;
    parse_catalog(&body)
}

#[cfg(not(feature = "remote-catalog"))]
pub fn fetch_catalog(url: &str) -> EditorResult<Vec<TemplateAsset>> {
    Err(EditorError::CatalogFetchFailed(format!(
        "remote catalog support not built in; skipped {url}"
    )))
}

/// Download a template image so it can become the session media.
#[cfg(feature = "remote-catalog")]
pub fn fetch_media(url: &str) -> EditorResult<MediaAsset> {
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| EditorError::CatalogFetchFailed(e.to_string()))?;
    let media_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
        .unwrap_or_else(|| crate::io::media::media_type_for(std::path::Path::new(url)));
    let bytes = response
        .bytes()
        .map_err(|e| EditorError::CatalogFetchFailed(e.to_string()))?;
    Ok(MediaAsset::from_payload(bytes.to_vec(), media_type))
}

#[cfg(not(feature = "remote-catalog"))]
pub fn fetch_media(url: &str) -> EditorResult<MediaAsset> {
    Err(EditorError::CatalogFetchFailed(format!(
        "remote catalog support not built in; skipped {url}"
    )))
}
