// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Build report persistence

use crate::builder::BuildReport;
use anyhow::{Context, Result};
use std::path::Path;

/// Write a build report as pretty JSON
pub fn write_report(report: &BuildReport, path: impl AsRef<Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize build report")?;
    std::fs::write(path.as_ref(), json)
        .with_context(|| format!("Failed to write build report: {:?}", path.as_ref()))?;
    Ok(())
}

/// Read a report written by [`write_report`]
pub fn read_report(path: impl AsRef<Path>) -> Result<BuildReport> {
    let content = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read build report: {:?}", path.as_ref()))?;
    serde_json::from_str(&content).context("Failed to parse build report")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{EntityFailure, MeshKind};
    use crate::error::MeshError;
    use tempfile::TempDir;

    #[test]
    fn test_report_survives_disk() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("report.json");

        let report = BuildReport {
            lanes: 3,
            triangles: 12,
            failures: vec![EntityFailure::new(
                "lane_7",
                MeshKind::Lane,
                &MeshError::SelfIntersecting {
                    entity: "lane_7".into(),
                    first: 0,
                    second: 2,
                },
            )],
            ..Default::default()
        };
        write_report(&report, &path)?;
        assert_eq!(read_report(&path)?, report);
        Ok(())
    }
}
