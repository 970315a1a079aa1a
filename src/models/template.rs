// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Template catalog: remote meme templates plus the user's own uploads.

use super::media::MediaAsset;
use crate::error::{EditorError, EditorResult};
use serde::{Deserialize, Serialize};

/// A read-only entry from the remote template service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateAsset {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub box_count: u32,
}

/// An uploaded file kept for reuse during the session.
#[derive(Debug, Clone)]
pub struct UserTemplate {
    pub id: u64,
    pub asset: MediaAsset,
}

/// Remote catalog cache and user-contributed templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    remote: Vec<TemplateAsset>,
    user: Vec<UserTemplate>,
    last_user_id: u64,
}

impl TemplateCatalog {
    /// Replace the remote entries with a freshly fetched list.
    pub fn set_remote(&mut self, templates: Vec<TemplateAsset>) {
        self.remote = templates;
    }

    pub fn remote(&self) -> &[TemplateAsset] {
        &self.remote
    }

    /// Remote entries whose name contains `query` (case-insensitive),
    /// in catalog order, at most `limit` of them.
    pub fn search<'a>(&'a self, query: &str, limit: usize) -> impl Iterator<Item = &'a TemplateAsset> + 'a {
        let needle = query.to_lowercase();
        self.remote
            .iter()
            .filter(move |t| t.name.to_lowercase().contains(&needle))
            .take(limit)
    }

    pub fn user_templates(&self) -> &[UserTemplate] {
        &self.user
    }

    /// Add an upload. Ids are upload timestamps in milliseconds, bumped when
    /// two uploads land in the same millisecond.
    pub fn add_user_template(&mut self, asset: MediaAsset) -> u64 {
        let id = now_millis().max(self.last_user_id + 1);
        self.last_user_id = id;
        self.user.push(UserTemplate { id, asset });
        id
    }

    pub fn remove_user_template(&mut self, id: u64) -> EditorResult<()> {
        let index = self
            .user
            .iter()
            .position(|t| t.id == id)
            .ok_or(EditorError::UnknownTemplate(id))?;
        self.user.remove(index);
        Ok(())
    }

    pub fn user_template(&self, id: u64) -> EditorResult<&UserTemplate> {
        self.user
            .iter()
            .find(|t| t.id == id)
            .ok_or(EditorError::UnknownTemplate(id))
    }
}

fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
