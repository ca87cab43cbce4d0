use std::{
    collections::HashSet,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use shared::domain::{ArtifactKind, ArtifactRead, Identifier};
use tracing::{debug, warn};

pub const SYNTHETIC_PREFIX: &str = "Example";

/// Where the catalog comes from. Only one strategy is active per process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Synthetic { count: usize },
    Scan { dir: PathBuf, extension: String },
}

/// Ordered, duplicate-free list of identifiers offered for selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<Identifier>,
}

impl Catalog {
    pub async fn load(source: &CatalogSource) -> Self {
        match source {
            CatalogSource::Synthetic { count } => Self::synthetic(*count),
            CatalogSource::Scan { dir, extension } => Self::scan(dir, extension).await,
        }
    }

    pub fn synthetic(count: usize) -> Self {
        Self {
            entries: (0..count)
                .map(|i| Identifier::new(format!("{SYNTHETIC_PREFIX}-{i:04}")))
                .collect(),
        }
    }

    /// Collects the stems of regular files in `dir` ending in `extension`.
    /// A missing or unreadable directory yields an empty catalog.
    pub async fn scan(dir: &Path, extension: &str) -> Self {
        let extension = extension.trim_start_matches('.');
        let mut read_dir = match tokio::fs::read_dir(dir).await {
            Ok(read_dir) => read_dir,
            Err(error) => {
                warn!(dir = %dir.display(), %error, "catalog directory is not readable");
                return Self::default();
            }
        };

        let mut stems = Vec::new();
        loop {
            let entry = match read_dir.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(error) => {
                    warn!(dir = %dir.display(), %error, "stopped scanning catalog directory");
                    break;
                }
            };
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(extension) {
                continue;
            }
            let is_file = tokio::fs::metadata(&path)
                .await
                .map(|meta| meta.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }
            // Non UTF-8 names cannot round-trip through the page.
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                stems.push(stem.to_string());
            }
        }

        stems.sort();
        debug!(dir = %dir.display(), count = stems.len(), "scanned catalog directory");
        Self::from_identifiers(stems.into_iter().map(Identifier::new))
    }

    /// Keeps the first occurrence of each identifier.
    pub fn from_identifiers(identifiers: impl IntoIterator<Item = Identifier>) -> Self {
        let mut seen = HashSet::new();
        let entries = identifiers
            .into_iter()
            .filter(|identifier| seen.insert(identifier.clone()))
            .collect();
        Self { entries }
    }

    pub fn get(&self, row: usize) -> Option<&Identifier> {
        self.entries.get(row)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Identifier> {
        self.entries.iter()
    }

    pub fn contains(&self, identifier: &Identifier) -> bool {
        self.entries.contains(identifier)
    }

    pub fn position(&self, identifier: &Identifier) -> Option<usize> {
        self.entries.iter().position(|entry| entry == identifier)
    }
}

/// The three base directories artifacts are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    pub source_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub summary_dir: PathBuf,
}

impl ArtifactLayout {
    pub fn new(
        source_dir: impl Into<PathBuf>,
        processed_dir: impl Into<PathBuf>,
        summary_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            processed_dir: processed_dir.into(),
            summary_dir: summary_dir.into(),
        }
    }

    pub fn base_dir(&self, kind: ArtifactKind) -> &Path {
        match kind {
            ArtifactKind::Source => &self.source_dir,
            ArtifactKind::Processed => &self.processed_dir,
            ArtifactKind::Summary => &self.summary_dir,
        }
    }

    /// `<base_dir(kind)>/<identifier>.<ext(kind)>`. Never touches the filesystem.
    pub fn resolve(&self, identifier: &Identifier, kind: ArtifactKind) -> PathBuf {
        self.base_dir(kind)
            .join(format!("{identifier}.{}", kind.extension()))
    }

    pub async fn read(&self, identifier: &Identifier, kind: ArtifactKind) -> ArtifactRead {
        read_artifact(&self.resolve(identifier, kind)).await
    }
}

/// Reads the whole file as UTF-8 text. Every failure is folded into the
/// returned outcome.
pub async fn read_artifact(path: &Path) -> ArtifactRead {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => ArtifactRead::Content(text),
        Err(error) if error.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "artifact not found");
            ArtifactRead::NotFound
        }
        Err(error) => {
            warn!(path = %path.display(), %error, "failed to read artifact");
            ArtifactRead::ReadError(error.to_string())
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
