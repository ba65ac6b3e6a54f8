use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::foundation::core::LayerType;
use crate::foundation::error::{CollageError, CollageResult};

/// Read-only source of default payloads for new layers and new creations.
pub trait PresetStore: Send + Sync {
    /// Default field set for a new layer of `layer_type`.
    fn fetch_preset(&self, layer_type: LayerType) -> CollageResult<serde_json::Value>;

    /// Default creation payload registered under `name` (e.g. `"default"`).
    fn fetch_template(&self, name: &str) -> CollageResult<serde_json::Value>;
}

/// Presets laid out on disk as `<root>/layers/<type>.json` and
/// `<root>/templates/<name>.json`.
#[derive(Clone, Debug)]
pub struct DirPresetStore {
    root: PathBuf,
}

impl DirPresetStore {
    /// Read presets under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory presets are read from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, path: PathBuf, key: &str) -> CollageResult<serde_json::Value> {
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CollageError::preset_not_found(key));
            }
            Err(e) => {
                return Err(CollageError::storage(format!(
                    "read preset '{}': {e}",
                    path.display()
                )));
            }
        };
        serde_json::from_str(&text).map_err(|e| {
            CollageError::serde(format!("parse preset '{}': {e}", path.display()))
        })
    }
}

fn file_stem_ok(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl PresetStore for DirPresetStore {
    #[tracing::instrument(skip(self))]
    fn fetch_preset(&self, layer_type: LayerType) -> CollageResult<serde_json::Value> {
        let path = self
            .root
            .join("layers")
            .join(format!("{}.json", layer_type.as_str()));
        self.read(path, layer_type.as_str())
    }

    #[tracing::instrument(skip(self))]
    fn fetch_template(&self, name: &str) -> CollageResult<serde_json::Value> {
        if !file_stem_ok(name) {
            return Err(CollageError::preset_not_found(name));
        }
        let path = self.root.join("templates").join(format!("{name}.json"));
        self.read(path, name)
    }
}

/// In-memory presets, for tests and embedders that ship their defaults inline.
#[derive(Clone, Debug, Default)]
pub struct MemoryPresetStore {
    layers: BTreeMap<LayerType, serde_json::Value>,
    templates: BTreeMap<String, serde_json::Value>,
}

impl MemoryPresetStore {
    /// Empty store; every fetch fails with `PresetNotFound`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a layer preset.
    pub fn with_layer(mut self, layer_type: LayerType, payload: serde_json::Value) -> Self {
        self.layers.insert(layer_type, payload);
        self
    }

    /// Register a creation template.
    pub fn with_template(mut self, name: impl Into<String>, payload: serde_json::Value) -> Self {
        self.templates.insert(name.into(), payload);
        self
    }
}

impl PresetStore for MemoryPresetStore {
    fn fetch_preset(&self, layer_type: LayerType) -> CollageResult<serde_json::Value> {
        self.layers
            .get(&layer_type)
            .cloned()
            .ok_or_else(|| CollageError::preset_not_found(layer_type.as_str()))
    }

    fn fetch_template(&self, name: &str) -> CollageResult<serde_json::Value> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| CollageError::preset_not_found(name))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/factory/preset.rs"]
mod tests;
