// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Line type enumeration of the map authoring tool

use crate::error::{MeshError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Line type as it appears in map files: either the enum name or its code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawLineType {
    Code(i64),
    Name(String),
}

impl fmt::Display for RawLineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawLineType::Code(code) => write!(f, "{}", code),
            RawLineType::Name(name) => write!(f, "\"{}\"", name),
        }
    }
}

impl From<LineType> for RawLineType {
    fn from(line_type: LineType) -> Self {
        RawLineType::Name(line_type.name().to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineType {
    Unknown,
    SolidWhite,
    SolidYellow,
    DottedWhite,
    DottedYellow,
    DoubleWhite,
    DoubleYellow,
    Curb,
    Virtual,
    Stop,
}

impl LineType {
    pub const ALL: [LineType; 10] = [
        LineType::Unknown,
        LineType::SolidWhite,
        LineType::SolidYellow,
        LineType::DottedWhite,
        LineType::DottedYellow,
        LineType::DoubleWhite,
        LineType::DoubleYellow,
        LineType::Curb,
        LineType::Virtual,
        LineType::Stop,
    ];

    pub fn code(self) -> i64 {
        match self {
            LineType::Unknown => -1,
            LineType::SolidWhite => 0,
            LineType::SolidYellow => 1,
            LineType::DottedWhite => 2,
            LineType::DottedYellow => 3,
            LineType::DoubleWhite => 4,
            LineType::DoubleYellow => 5,
            LineType::Curb => 6,
            LineType::Virtual => 7,
            LineType::Stop => 8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LineType::Unknown => "UNKNOWN",
            LineType::SolidWhite => "SOLID_WHITE",
            LineType::SolidYellow => "SOLID_YELLOW",
            LineType::DottedWhite => "DOTTED_WHITE",
            LineType::DottedYellow => "DOTTED_YELLOW",
            LineType::DoubleWhite => "DOUBLE_WHITE",
            LineType::DoubleYellow => "DOUBLE_YELLOW",
            LineType::Curb => "CURB",
            LineType::Virtual => "VIRTUAL",
            LineType::Stop => "STOP",
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Resolve a raw value; anything outside the enumeration is a fatal error
    pub fn resolve(raw: &RawLineType, line: &str) -> Result<Self> {
        let resolved = match raw {
            RawLineType::Code(code) => Self::from_code(*code),
            RawLineType::Name(name) => Self::from_name(name),
        };
        resolved.ok_or_else(|| MeshError::UnrecognizedLineType {
            line: line.to_string(),
            value: raw.to_string(),
        })
    }
}
