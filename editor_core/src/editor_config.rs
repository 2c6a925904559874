//! Configuration for the character editor.
//!
//! Loaded from `editor_config.json` with support for environment variable overrides.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use bevy::prelude::Resource;
use serde::Deserialize;
use thiserror::Error;

use campaign_runtime::{CatalogLimits, CharacterTemplate};

pub const BUILTIN_EDITOR_CONFIG: &str = include_str!("data/editor_config.json");

/// Environment variable naming a config file to load instead of the bundled one.
pub const EDITOR_CONFIG_ENV: &str = "CHAR_EDITOR_CONFIG_PATH";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub catalog: CatalogConfig,
    /// Inserts beyond this many characters are declined.
    pub max_characters: usize,
    /// Minimum wall time between two interactive frames.
    pub frame_interval_ms: u64,
    /// Template used by insert/append. Falls back to the stock enemy. Values
    /// outside the catalog ranges are saturated when a session opens.
    pub default_template: Option<CharacterTemplate>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            max_characters: 1000,
            frame_interval_ms: 16,
            default_template: None,
        }
    }
}

/// Display names of the externally enumerated catalogs. Only the lengths
/// matter to editing; names are for display.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub faces: Vec<String>,
    pub shades: Vec<String>,
    pub guns: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        fn numbered(prefix: &str, count: usize) -> Vec<String> {
            (0..count).map(|i| format!("{prefix} {i}")).collect()
        }
        let limits = CatalogLimits::default();
        Self {
            faces: numbered("Face", limits.face_count),
            shades: numbered("Shade", limits.shade_count),
            guns: numbered("Gun", limits.gun_count),
        }
    }
}

impl EditorConfig {
    pub fn builtin() -> Arc<Self> {
        Arc::new(
            serde_json::from_str(BUILTIN_EDITOR_CONFIG)
                .expect("builtin editor config should parse"),
        )
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read, parse and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, EditorConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| EditorConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = EditorConfig::from_json_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EditorConfigError> {
        let catalogs = [
            ("faces", self.catalog.faces.len()),
            ("shades", self.catalog.shades.len()),
            ("guns", self.catalog.guns.len()),
        ];
        if let Some((catalog, _)) = catalogs.into_iter().find(|(_, len)| *len == 0) {
            return Err(EditorConfigError::EmptyCatalog { catalog });
        }
        if self.max_characters == 0 {
            return Err(EditorConfigError::ZeroCapacity);
        }
        Ok(())
    }

    pub fn limits(&self) -> CatalogLimits {
        CatalogLimits {
            face_count: self.catalog.faces.len(),
            shade_count: self.catalog.shades.len(),
            gun_count: self.catalog.guns.len(),
        }
    }

    pub fn default_template(&self) -> CharacterTemplate {
        self.default_template
            .unwrap_or_else(CharacterTemplate::default_enemy)
    }

    pub fn face_name(&self, index: u16) -> &str {
        catalog_name(&self.catalog.faces, usize::from(index))
    }

    pub fn shade_name(&self, index: u8) -> &str {
        catalog_name(&self.catalog.shades, usize::from(index))
    }

    pub fn gun_name(&self, index: u16) -> &str {
        catalog_name(&self.catalog.guns, usize::from(index))
    }
}

fn catalog_name(names: &[String], index: usize) -> &str {
    names.get(index).map(String::as_str).unwrap_or("???")
}

#[derive(Debug, Error)]
pub enum EditorConfigError {
    #[error("failed to parse editor config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read editor config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("editor config catalog '{catalog}' is empty")]
    EmptyCatalog { catalog: &'static str },
    #[error("editor config max_characters must be positive")]
    ZeroCapacity,
}

/// Handle for accessing the editor configuration.
#[derive(Resource, Debug, Clone)]
pub struct EditorConfigHandle(pub Arc<EditorConfig>);

impl EditorConfigHandle {
    pub fn new(config: Arc<EditorConfig>) -> Self {
        Self(config)
    }

    pub fn get(&self) -> Arc<EditorConfig> {
        Arc::clone(&self.0)
    }
}

/// Metadata about the editor configuration source.
#[derive(Resource, Debug, Clone)]
pub struct EditorConfigMetadata {
    path: Option<PathBuf>,
}

impl EditorConfigMetadata {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }
}

/// Load editor configuration from environment or default path.
pub fn load_editor_config_from_env() -> (Arc<EditorConfig>, EditorConfigMetadata) {
    let override_path = env::var(EDITOR_CONFIG_ENV).ok().map(PathBuf::from);
    load_editor_config(override_path)
}

/// Load the config at `override_path`, or the bundled default file, falling
/// back to the builtin copy when neither loads.
pub fn load_editor_config(
    override_path: Option<PathBuf>,
) -> (Arc<EditorConfig>, EditorConfigMetadata) {
    let default_path =
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src/data/editor_config.json");

    let candidates: Vec<PathBuf> = match override_path {
        Some(ref path) => vec![path.clone()],
        None => vec![default_path.clone()],
    };

    for path in candidates {
        match EditorConfig::from_file(&path) {
            Ok(config) => {
                tracing::info!(
                    target: "char_editor::config",
                    path = %path.display(),
                    "editor_config.loaded=file"
                );
                return (Arc::new(config), EditorConfigMetadata::new(Some(path)));
            }
            Err(err) => {
                tracing::warn!(
                    target: "char_editor::config",
                    path = %path.display(),
                    error = %err,
                    "editor_config.load_failed"
                );
            }
        }
    }

    let config = EditorConfig::builtin();
    tracing::info!(target: "char_editor::config", "editor_config.loaded=builtin");
    (config, EditorConfigMetadata::new(None))
}
