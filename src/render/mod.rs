// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Compositing, caption text and export encoding.

pub mod compose;
pub mod export;
pub mod text;
