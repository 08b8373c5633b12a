// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! In-memory map graph loadable from JSON

use super::{LaneId, LineId, MapIntersection, MapLane, MapLine, MapSource};
use ahash::{AHashMap, AHashSet};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Map graph with id lookups
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapData {
    #[serde(default)]
    pub lanes: Vec<MapLane>,
    #[serde(default)]
    pub lines: Vec<MapLine>,
    #[serde(default)]
    pub intersections: Vec<MapIntersection>,

    #[serde(skip)]
    lane_index: AHashMap<LaneId, usize>,
    #[serde(skip)]
    line_index: AHashMap<LineId, usize>,
    #[serde(skip)]
    intersection_lanes: AHashSet<LaneId>,
}

impl MapData {
    pub fn new(lanes: Vec<MapLane>, lines: Vec<MapLine>, intersections: Vec<MapIntersection>) -> Self {
        let mut map = Self {
            lanes,
            lines,
            intersections,
            ..Default::default()
        };
        map.reindex();
        map
    }

    /// Parse a map from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut map: MapData = serde_json::from_str(json).context("Failed to parse map JSON")?;
        map.reindex();
        Ok(map)
    }

    /// Load a map from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read map file: {:?}", path.as_ref()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Failed to load map file: {:?}", path.as_ref()))
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize map")
    }

    /// Rebuild id lookups after the entity lists were edited
    pub fn reindex(&mut self) {
        self.lane_index = self
            .lanes
            .iter()
            .enumerate()
            .map(|(i, lane)| (lane.id, i))
            .collect();
        self.line_index = self
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| (line.id, i))
            .collect();
        self.intersection_lanes = self
            .intersections
            .iter()
            .flat_map(|intersection| intersection.lanes.iter().copied())
            .collect();
    }
}

impl MapSource for MapData {
    fn traffic_lanes(&self) -> Vec<&MapLane> {
        self.lanes
            .iter()
            .filter(|lane| !self.intersection_lanes.contains(&lane.id))
            .collect()
    }

    fn intersections(&self) -> Vec<&MapIntersection> {
        self.intersections.iter().collect()
    }

    fn lane(&self, id: LaneId) -> Option<&MapLane> {
        self.lane_index.get(&id).map(|&i| &self.lanes[i])
    }

    fn line(&self, id: LineId) -> Option<&MapLine> {
        self.line_index.get(&id).map(|&i| &self.lines[i])
    }
}
