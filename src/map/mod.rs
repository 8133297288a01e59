// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Screenshot reading and map compositing.

pub mod canvas;
pub mod locator;
