use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ParseArtifactKindError;

/// Shown in a display region when the resolved file does not exist.
pub const FILE_NOT_FOUND_TEXT: &str = "File not found.";

/// Shown in every display region until a catalog row is selected.
pub const SELECT_PROMPT_TEXT: &str = "Select a file";

/// Opaque name of one example transcript set, e.g. `Example-0007`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Source,
    Processed,
    Summary,
}

impl ArtifactKind {
    /// Display order on the page.
    pub const ALL: [ArtifactKind; 3] = [Self::Source, Self::Processed, Self::Summary];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Source => "csv",
            Self::Processed | Self::Summary => "txt",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Processed => "processed",
            Self::Summary => "summary",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = ParseArtifactKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "source" => Ok(Self::Source),
            "processed" => Ok(Self::Processed),
            "summary" => Ok(Self::Summary),
            other => Err(ParseArtifactKindError(other.to_string())),
        }
    }
}

/// Outcome of reading one artifact file. Converted to a display string only
/// at the presentation boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum ArtifactRead {
    Content(String),
    NotFound,
    ReadError(String),
}

impl ArtifactRead {
    pub fn into_display_text(self) -> String {
        match self {
            Self::Content(text) => text,
            Self::NotFound => FILE_NOT_FOUND_TEXT.to_string(),
            Self::ReadError(message) => message,
        }
    }

    pub fn is_content(&self) -> bool {
        matches!(self, Self::Content(_))
    }
}
