//! Closed set of UI surfaces a command can be placed on.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// UI placement for a command contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Location {
    #[serde(rename = "editor/primary")]
    EditorPrimary,
    #[serde(rename = "editor/secondary")]
    EditorSecondary,
    #[serde(rename = "explorer/context")]
    ExplorerContext,
}

impl Location {
    /// Stable string id used in manifest declarations.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EditorPrimary => LOCATION_EDITOR_PRIMARY,
            Self::EditorSecondary => LOCATION_EDITOR_SECONDARY,
            Self::ExplorerContext => LOCATION_EXPLORER_CONTEXT,
        }
    }

    /// Parses one manifest value. Matching is exact; no trimming or case folding.
    pub fn parse(value: &str) -> Result<Self, LocationError> {
        match value {
            LOCATION_EDITOR_PRIMARY => Ok(Self::EditorPrimary),
            LOCATION_EDITOR_SECONDARY => Ok(Self::EditorSecondary),
            LOCATION_EXPLORER_CONTEXT => Ok(Self::ExplorerContext),
            other => Err(LocationError::Unsupported(other.to_string())),
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const LOCATION_EDITOR_PRIMARY: &str = "editor/primary";
pub const LOCATION_EDITOR_SECONDARY: &str = "editor/secondary";
pub const LOCATION_EXPLORER_CONTEXT: &str = "explorer/context";

const SUPPORTED_LOCATION_STRINGS: &[&str] = &[
    LOCATION_EDITOR_PRIMARY,
    LOCATION_EDITOR_SECONDARY,
    LOCATION_EXPLORER_CONTEXT,
];

/// Returns every accepted `where` value, in declaration order.
pub fn supported_locations() -> &'static [&'static str] {
    SUPPORTED_LOCATION_STRINGS
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    Unsupported(String),
}

impl Display for LocationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsupported(value) => write!(
                f,
                "unknown location `{value}`; expected one of {}",
                SUPPORTED_LOCATION_STRINGS.join(", ")
            ),
        }
    }
}

impl Error for LocationError {}
