// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for uploads and the template catalog.

pub mod catalog;
pub mod media;
