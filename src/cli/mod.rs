// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI subsystem for Roadmesh

pub mod progress;
pub mod reporter;

pub use progress::TerminalProgress;
pub use reporter::Reporter;
