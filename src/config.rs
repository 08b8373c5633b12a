// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh builder settings

use crate::error::MeshError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default settings file looked up by [`MeshSettings::load`]
pub const SETTINGS_FILE: &str = "roadmesh.toml";

/// Settings for a mesh build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshSettings {
    /// Weld lane end vertices across connected lanes
    pub snap_lane_ends: bool,
    /// Maximum distance between welded vertices
    pub snap_threshold: f64,
    /// Push road-edge vertices outward
    pub push_outer_verts: bool,
    /// Distance road-edge vertices are pushed by
    pub push_distance: f64,
    /// Width of painted line meshes
    pub line_width: f64,
    /// Line length covered by one UV unit along a marking
    pub line_uv_unit: f64,
    /// World size covered by one UV unit on road surfaces
    pub road_uv_unit: f64,
    /// Height offset of line meshes above the road
    pub line_bump: f64,
    /// Produce render data (and line meshes at all)
    pub create_renderers: bool,
    /// Flag road meshes for collider creation
    pub create_collider: bool,
    /// Build lane meshes on the rayon thread pool
    pub parallel: bool,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            snap_lane_ends: true,
            snap_threshold: 0.2,
            push_outer_verts: true,
            push_distance: 0.1,
            line_width: 0.15,
            line_uv_unit: 3.0,
            road_uv_unit: 4.0,
            line_bump: 0.02,
            create_renderers: true,
            create_collider: true,
            parallel: false,
        }
    }
}

impl MeshSettings {
    /// Load settings from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read settings file: {:?}", path.as_ref()))?;
        let settings: MeshSettings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {:?}", path.as_ref()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load `roadmesh.toml` if present, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut settings = if PathBuf::from(SETTINGS_FILE).exists() {
            Self::from_file(SETTINGS_FILE)?
        } else {
            Self::default()
        };
        settings.apply_env_overrides()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Apply `ROADMESH_*` environment variables
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, keyed by environment variable name
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(threshold) = lookup("ROADMESH_SNAP_THRESHOLD") {
            self.snap_threshold = threshold
                .parse()
                .with_context(|| format!("Invalid ROADMESH_SNAP_THRESHOLD: {}", threshold))?;
        }

        if let Some(distance) = lookup("ROADMESH_PUSH_DISTANCE") {
            self.push_distance = distance
                .parse()
                .with_context(|| format!("Invalid ROADMESH_PUSH_DISTANCE: {}", distance))?;
        }

        if let Some(parallel) = lookup("ROADMESH_PARALLEL") {
            self.parallel = parallel
                .trim()
                .parse()
                .with_context(|| format!("Invalid ROADMESH_PARALLEL: {}", parallel))?;
        }

        Ok(())
    }

    /// Save settings to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write settings file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Reject values the geometry stages cannot work with
    pub fn validate(&self) -> std::result::Result<(), MeshError> {
        fn check(ok: bool, field: &'static str, reason: &str) -> std::result::Result<(), MeshError> {
            if ok {
                Ok(())
            } else {
                Err(MeshError::InvalidSettings {
                    field,
                    reason: reason.to_string(),
                })
            }
        }

        check(
            self.snap_threshold.is_finite() && self.snap_threshold >= 0.0,
            "snap_threshold",
            "must be a non-negative number",
        )?;
        check(self.push_distance.is_finite(), "push_distance", "must be finite")?;
        check(
            self.line_width.is_finite() && self.line_width > 0.0,
            "line_width",
            "must be positive",
        )?;
        check(
            self.line_uv_unit.is_finite() && self.line_uv_unit > 0.0,
            "line_uv_unit",
            "must be positive",
        )?;
        check(
            self.road_uv_unit.is_finite() && self.road_uv_unit > 0.0,
            "road_uv_unit",
            "must be positive",
        )?;
        check(self.line_bump.is_finite(), "line_bump", "must be finite")
    }

    /// Push distance actually applied to polygons
    pub fn effective_push_distance(&self) -> f64 {
        if self.push_outer_verts {
            self.push_distance
        } else {
            0.0
        }
    }
}
