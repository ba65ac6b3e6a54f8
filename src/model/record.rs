use crate::foundation::error::CollageResult;
use crate::model::creation::{Creation, DEFAULT_TITLE};

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_dimension() -> u32 {
    1080
}

fn default_scale() -> f64 {
    1.0
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = serde::Deserialize::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()))
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Persisted shape of a [`Creation`].
///
/// Layers stay untyped JSON objects here; the layer factory turns them into typed variants and
/// rejects unknown `type` tags.
pub struct CreationRecord {
    /// Creation id; templates may omit it.
    #[serde(default)]
    pub id: String,
    /// Display name.
    #[serde(default = "default_title")]
    pub title: String,
    /// Canvas width in pixels.
    #[serde(default = "default_dimension")]
    pub width: u32,
    /// Canvas height in pixels.
    #[serde(default = "default_dimension")]
    pub height: u32,
    /// Background asset id; `""` and `null` both mean none.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub background_image_id: Option<String>,
    /// Background scale.
    #[serde(default = "default_scale")]
    pub background_scale: f64,
    /// Horizontal background offset.
    #[serde(default)]
    pub background_x: i32,
    /// Vertical background offset.
    #[serde(default)]
    pub background_y: i32,
    /// Flat layer records (`{ id, type, name, visible, zIndex, slot, ... }`).
    #[serde(default)]
    pub layers: Vec<serde_json::Value>,
}

impl Creation {
    /// Flatten into the persisted record shape.
    pub fn to_record(&self) -> CollageResult<CreationRecord> {
        let layers = self
            .layers()
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CreationRecord {
            id: self.id().to_string(),
            title: self.title().to_string(),
            width: self.width(),
            height: self.height(),
            background_image_id: self.background_image_id().map(str::to_string),
            background_scale: self.background_scale(),
            background_x: self.background_x(),
            background_y: self.background_y(),
            layers,
        })
    }
}

impl CreationRecord {
    /// Image ids this record references (background first, then image layers), deduplicated.
    pub fn referenced_image_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        let layer_ids = self.layers.iter().filter_map(|layer| {
            (layer.get("type")?.as_str()? == "image")
                .then(|| layer.get("imageId")?.as_str())
                .flatten()
        });
        for id in self.background_image_id.as_deref().into_iter().chain(layer_ids) {
            if !id.is_empty() && !ids.iter().any(|seen| seen == id) {
                ids.push(id.to_string());
            }
        }
        ids
    }
}
