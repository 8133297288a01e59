// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Filesystem operations: screenshots, tiles, calibration settings and the
//! ignore log.

pub mod ignore_log;
pub mod screenshot;
pub mod settings;
pub mod tile_store;
