// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - glTF export and build reports

mod export_gltf;
mod report;

pub use export_gltf::export as export_gltf;
pub use report::{read_report, write_report};
