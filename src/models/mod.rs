// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Session data model: layers, captions, templates and events.

pub mod caption;
pub mod geometry;
pub mod media;
pub mod session;
pub mod stroke;
pub mod template;
