// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for the mesh pipeline

use crate::map::{LaneId, LineId};
use thiserror::Error;

/// Errors raised while building road meshes
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshError {
    /// A boundary line carries a style value outside the map tool's enumeration
    #[error("line '{line}' has unrecognized line type {value}")]
    UnrecognizedLineType { line: String, value: String },

    /// A settings value is out of range
    #[error("invalid setting `{field}`: {reason}")]
    InvalidSettings { field: &'static str, reason: String },

    /// A boundary line without any points
    #[error("line '{line}' has no points")]
    EmptyLine { line: String },

    /// A lane or intersection references a line that is not in the map
    #[error("'{owner}' references missing line {line}")]
    MissingLine { owner: String, line: LineId },

    /// A lane or intersection references a lane that is not in the map
    #[error("'{owner}' references missing lane {lane}")]
    MissingLane { owner: String, lane: LaneId },

    /// A lane without centerline points
    #[error("lane '{lane}' has no centerline points")]
    EmptyLane { lane: String },

    /// A polygon contour with fewer than three distinct points
    #[error("'{entity}' has a degenerate contour with {points} points")]
    DegenerateContour { entity: String, points: usize },

    /// A polygon contour that crosses itself
    #[error("'{entity}' has a self-intersecting contour (edges {first} and {second})")]
    SelfIntersecting {
        entity: String,
        first: usize,
        second: usize,
    },

    /// The triangulator rejected an otherwise valid contour set
    #[error("failed to triangulate '{entity}': {reason}")]
    Triangulation { entity: String, reason: String },

    /// A line strip that cannot be turned into a ribbon
    #[error("line '{line}' needs at least 2 points, found {points}")]
    DegenerateLine { line: String, points: usize },

    /// The progress observer asked the build to stop
    #[error("mesh build cancelled")]
    Cancelled,
}

impl MeshError {
    /// Whether this error aborts the whole batch rather than a single entity
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            MeshError::DegenerateContour { .. }
                | MeshError::SelfIntersecting { .. }
                | MeshError::Triangulation { .. }
                | MeshError::DegenerateLine { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, MeshError>;
