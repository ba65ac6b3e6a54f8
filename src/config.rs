use std::path::{Path, PathBuf};

use crate::edit::form::DEFAULT_NAME_CAP;
use crate::foundation::error::{CollageError, CollageResult};
use crate::model::creation::DEFAULT_TITLE;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", default, deny_unknown_fields)]
/// Editor settings, loadable from a JSON file. Missing keys take their defaults.
pub struct EditorConfig {
    /// Title of new creations.
    pub default_title: String,
    /// Canvas width of new creations.
    pub default_width: u32,
    /// Canvas height of new creations.
    pub default_height: u32,
    /// Root of the preset directory (`layers/<type>.json`, `templates/<name>.json`).
    pub preset_dir: PathBuf,
    /// Root of the document store (`creations/`, `images/`).
    pub store_dir: PathBuf,
    /// Maximum characters of Font text copied into the layer name.
    pub name_cap: usize,
    /// `tracing` level filter (`error`, `warn`, `info`, `debug`, `trace`).
    pub log_level: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_title: DEFAULT_TITLE.to_string(),
            default_width: 1080,
            default_height: 1080,
            preset_dir: PathBuf::from("presets"),
            store_dir: PathBuf::from("collage-data"),
            name_cap: DEFAULT_NAME_CAP,
            log_level: "warn".to_string(),
        }
    }
}

impl EditorConfig {
    /// Load from `path`. A missing file yields the defaults; a malformed one is an error.
    pub fn load(path: &Path) -> CollageResult<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(CollageError::storage(format!(
                    "read config '{}': {e}",
                    path.display()
                )));
            }
        };
        let config: Self = serde_json::from_str(&text).map_err(|e| {
            CollageError::serde(format!("parse config '{}': {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no editor could work with.
    pub fn validate(&self) -> CollageResult<()> {
        if self.default_width == 0 || self.default_height == 0 {
            return Err(CollageError::invalid_dimension(format!(
                "default canvas must be positive, got {}x{}",
                self.default_width, self.default_height
            )));
        }
        if self.name_cap == 0 {
            return Err(CollageError::validation("name_cap must be at least 1"));
        }
        if self.log_level.parse::<tracing::Level>().is_err() {
            return Err(CollageError::validation(format!(
                "unknown log level '{}'",
                self.log_level
            )));
        }
        Ok(())
    }

    /// Directory holding creation records.
    pub fn creations_dir(&self) -> PathBuf {
        self.store_dir.join("creations")
    }

    /// Directory holding uploaded images.
    pub fn images_dir(&self) -> PathBuf {
        self.store_dir.join("images")
    }
}
