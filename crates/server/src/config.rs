use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use serde::Deserialize;
use storage::{ArtifactLayout, CatalogSource};

pub const DEFAULT_CONFIG_FILE: &str = "dashboard.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub transcripts_dir: PathBuf,
    pub source_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub summary_dir: PathBuf,
    pub assets_dir: PathBuf,
    pub catalog_mode: String,
    pub synthetic_count: usize,
    pub scan_dir: Option<PathBuf>,
    pub scan_extension: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8050".into(),
            transcripts_dir: "./transcripts".into(),
            source_dir: "./transcriptsource".into(),
            processed_dir: "./transcriptprocessed".into(),
            summary_dir: "./transcriptsummary".into(),
            assets_dir: "./assets".into(),
            catalog_mode: "synthetic".into(),
            synthetic_count: 20,
            scan_dir: None,
            scan_extension: "csv".into(),
        }
    }
}

/// Keys accepted in the TOML file. `bind_addr` is kept as an alias of
/// `server_bind`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    server_bind: Option<String>,
    bind_addr: Option<String>,
    transcripts_dir: Option<PathBuf>,
    source_dir: Option<PathBuf>,
    processed_dir: Option<PathBuf>,
    summary_dir: Option<PathBuf>,
    assets_dir: Option<PathBuf>,
    catalog_mode: Option<String>,
    synthetic_count: Option<usize>,
    scan_dir: Option<PathBuf>,
    scan_extension: Option<String>,
}

impl Settings {
    pub fn catalog_source(&self) -> anyhow::Result<CatalogSource> {
        match self.catalog_mode.trim().to_ascii_lowercase().as_str() {
            "synthetic" => Ok(CatalogSource::Synthetic {
                count: self.synthetic_count,
            }),
            "scan" => Ok(CatalogSource::Scan {
                dir: self
                    .scan_dir
                    .clone()
                    .unwrap_or_else(|| self.transcripts_dir.clone()),
                extension: self.scan_extension.trim_start_matches('.').to_string(),
            }),
            other => bail!("unknown catalog_mode '{other}' (expected 'synthetic' or 'scan')"),
        }
    }

    pub fn layout(&self) -> ArtifactLayout {
        ArtifactLayout::new(
            self.source_dir.clone(),
            self.processed_dir.clone(),
            self.summary_dir.clone(),
        )
    }
}

/// Defaults, then the TOML file, then environment variables.
///
/// An explicitly requested file must exist; the default `dashboard.toml` is
/// optional.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let (path, required) = match config_path {
        Some(path) => (path, true),
        None => (Path::new(DEFAULT_CONFIG_FILE), false),
    };
    match fs::read_to_string(path) {
        Ok(raw) => {
            apply_file_settings(&mut settings, &raw)
                .with_context(|| format!("invalid settings file '{}'", path.display()))?;
        }
        Err(error) if error.kind() == ErrorKind::NotFound && !required => {}
        Err(error) => {
            return Err(error)
                .with_context(|| format!("failed to read settings file '{}'", path.display()));
        }
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file_settings(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;

    if let Some(v) = file_cfg.bind_addr {
        settings.server_bind = v;
    }
    if let Some(v) = file_cfg.server_bind {
        settings.server_bind = v;
    }
    if let Some(v) = file_cfg.transcripts_dir {
        settings.transcripts_dir = v;
    }
    if let Some(v) = file_cfg.source_dir {
        settings.source_dir = v;
    }
    if let Some(v) = file_cfg.processed_dir {
        settings.processed_dir = v;
    }
    if let Some(v) = file_cfg.summary_dir {
        settings.summary_dir = v;
    }
    if let Some(v) = file_cfg.assets_dir {
        settings.assets_dir = v;
    }
    if let Some(v) = file_cfg.catalog_mode {
        settings.catalog_mode = v;
    }
    if let Some(v) = file_cfg.synthetic_count {
        settings.synthetic_count = v;
    }
    if let Some(v) = file_cfg.scan_dir {
        settings.scan_dir = Some(v);
    }
    if let Some(v) = file_cfg.scan_extension {
        settings.scan_extension = v;
    }

    Ok(())
}

fn apply_env_overrides(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = var("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = var("APP__TRANSCRIPTS_DIR") {
        settings.transcripts_dir = v.into();
    }
    if let Some(v) = var("APP__SOURCE_DIR") {
        settings.source_dir = v.into();
    }
    if let Some(v) = var("APP__PROCESSED_DIR") {
        settings.processed_dir = v.into();
    }
    if let Some(v) = var("APP__SUMMARY_DIR") {
        settings.summary_dir = v.into();
    }
    if let Some(v) = var("APP__ASSETS_DIR") {
        settings.assets_dir = v.into();
    }

    if let Some(v) = var("APP__CATALOG_MODE") {
        settings.catalog_mode = v;
    }
    if let Some(v) = var("APP__SYNTHETIC_COUNT") {
        if let Ok(parsed) = v.trim().parse::<usize>() {
            settings.synthetic_count = parsed;
        }
    }
    if let Some(v) = var("APP__SCAN_DIR") {
        settings.scan_dir = Some(v.into());
    }
    if let Some(v) = var("APP__SCAN_EXTENSION") {
        settings.scan_extension = v;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
