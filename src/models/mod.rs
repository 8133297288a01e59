// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model for the mapper.

pub mod calibration;
pub mod context;
pub mod tile;
