// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Terminal progress bar for mesh builds

use crate::builder::{ProgressObserver, Stage};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// indicatif progress bar, one pass per pipeline stage
///
/// Stages begun with a total of 0 show a spinner instead of a bar.
#[derive(Default)]
pub struct TerminalProgress {
    bar: Option<ProgressBar>,
}

impl TerminalProgress {
    pub fn new() -> Self {
        Self::default()
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

impl ProgressObserver for TerminalProgress {
    fn begin(&mut self, stage: Stage, total: usize) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
        let bar = if total == 0 {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(Self::spinner_style());
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner
        } else {
            let bar = ProgressBar::new(total as u64);
            bar.set_style(Self::bar_style());
            bar
        };
        bar.set_message(stage.to_string());
        self.bar = Some(bar);
    }

    fn progress(&mut self, _stage: Stage, current: usize, _total: usize) {
        if let Some(ref bar) = self.bar {
            bar.set_position(current as u64 + 1);
        }
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_with_message("Mesh build complete");
        }
    }
}
