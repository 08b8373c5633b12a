// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Progress reporting and cancellation

use crate::error::{MeshError, Result};
use std::fmt;

/// Pipeline stage reported to a [`ProgressObserver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Preprocess,
    Weld,
    Outward,
    Lanes,
    Intersections,
    Lines,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Preprocess => "Preprocessing HD map data",
            Stage::Weld => "Welding lane ends",
            Stage::Outward => "Computing outward vectors",
            Stage::Lanes => "Creating lanes",
            Stage::Intersections => "Creating intersections",
            Stage::Lines => "Creating lane lines",
        };
        f.write_str(label)
    }
}

/// Receives progress from a build and may ask it to stop
///
/// `finish` is called exactly once when the build ends, whether it succeeded,
/// failed or was cancelled.
pub trait ProgressObserver {
    /// A `total` of 0 marks a stage that runs as one pass without steps
    fn begin(&mut self, _stage: Stage, _total: usize) {}

    fn progress(&mut self, _stage: Stage, _current: usize, _total: usize) {}

    /// Checked between entities
    fn is_cancelled(&self) -> bool {
        false
    }

    fn finish(&mut self) {}
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

/// Scope around one build; releases the observer on drop
pub(crate) struct ProgressScope<'a> {
    observer: &'a mut dyn ProgressObserver,
}

impl<'a> ProgressScope<'a> {
    pub(crate) fn new(observer: &'a mut dyn ProgressObserver) -> Self {
        Self { observer }
    }

    pub(crate) fn begin(&mut self, stage: Stage, total: usize) -> Result<()> {
        self.check()?;
        self.observer.begin(stage, total);
        Ok(())
    }

    /// Report entity `current` of `total` and honor cancellation
    pub(crate) fn step(&mut self, stage: Stage, current: usize, total: usize) -> Result<()> {
        self.check()?;
        self.observer.progress(stage, current, total);
        Ok(())
    }

    fn check(&self) -> Result<()> {
        if self.observer.is_cancelled() {
            Err(MeshError::Cancelled)
        } else {
            Ok(())
        }
    }
}

impl Drop for ProgressScope<'_> {
    fn drop(&mut self) {
        self.observer.finish();
    }
}
