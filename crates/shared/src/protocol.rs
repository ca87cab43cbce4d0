use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::{ArtifactKind, ArtifactRead, Identifier, SELECT_PROMPT_TEXT};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub row: usize,
    pub identifier: Identifier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub row: usize,
    pub identifier: Identifier,
}

/// Contents of the three display regions plus the selection that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayState {
    pub selection: Option<Selection>,
    pub source: String,
    pub processed: String,
    pub summary: String,
}

impl DisplayState {
    pub fn idle() -> Self {
        Self {
            selection: None,
            source: SELECT_PROMPT_TEXT.to_string(),
            processed: SELECT_PROMPT_TEXT.to_string(),
            summary: SELECT_PROMPT_TEXT.to_string(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.selection.is_none()
    }

    pub fn region(&self, kind: ArtifactKind) -> &str {
        match kind {
            ArtifactKind::Source => &self.source,
            ArtifactKind::Processed => &self.processed,
            ArtifactKind::Summary => &self.summary,
        }
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::idle()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPayload {
    pub identifier: Identifier,
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub outcome: ArtifactRead,
}
