use crate::edit::fields::{BackgroundField, FieldName, FormValues, LayerField, layer_field_name};
use crate::foundation::core::LayerType;
use crate::foundation::error::CollageResult;
use crate::foundation::markup::render_markup;
use crate::model::creation::Creation;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "data")]
/// A live-preview patch posted from the edit surface to the render surface.
///
/// Wire form: `{ "type": "UPDATE_BACKGROUND" | "UPDATE_LAYER", "data": { ... } }`.
pub enum PreviewMessage {
    /// Background scale/position patch.
    #[serde(rename = "UPDATE_BACKGROUND")]
    UpdateBackground(BackgroundPatch),
    /// Patch for the node tagged with a layer index.
    #[serde(rename = "UPDATE_LAYER")]
    UpdateLayer(LayerPatch),
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Partial background update; absent fields stay as they are.
pub struct BackgroundPatch {
    /// Scale, 1.0 = natural size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    /// Horizontal offset in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    /// Vertical offset in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Partial layer update; absent fields stay as they are.
pub struct LayerPatch {
    /// Sequence index of the target layer.
    pub index: usize,
    /// Horizontal offset in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_x: Option<i32>,
    /// Vertical offset in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_y: Option<i32>,
    /// Size in pixels; `Some(None)` (wire `null`) clears it.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_nullable"
    )]
    pub size: Option<Option<u32>>,
    /// Icon color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Width in pixels; `Some(None)` (wire `null`) clears it.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_nullable"
    )]
    pub width: Option<Option<u32>>,
    /// Pre-rendered inner markup for the text node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

// A present key (even `null`) is `Some(..)`; a missing key falls back to `default`.
fn present_nullable<'de, D>(deserializer: D) -> Result<Option<Option<u32>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

impl PreviewMessage {
    /// Build the patch an edit to `name` should emit, reading current values from `form`.
    ///
    /// Every message carries the values present in the form at call time, not only the one
    /// that changed. Names that do not affect the live view yield `None`.
    ///
    /// `creation` is the snapshot being edited. It decides which input carries a layer's text:
    /// `name` for Font layers, `text` for Font and IconCallout layers. Any other `name` edit
    /// only relabels the layer and sends no markup.
    pub fn for_field(name: &str, form: &FormValues, creation: &Creation) -> Option<Self> {
        match FieldName::parse(name)? {
            FieldName::Background(BackgroundField::Scale | BackgroundField::X | BackgroundField::Y) => {
                let patch = BackgroundPatch {
                    scale: form.float("backgroundScale").filter(|s| *s > 0.0),
                    x: form.int("backgroundX"),
                    y: form.int("backgroundY"),
                };
                Some(Self::UpdateBackground(patch))
            }
            FieldName::Layer { index, field } => {
                let live = matches!(
                    field,
                    LayerField::OffsetX
                        | LayerField::OffsetY
                        | LayerField::Size
                        | LayerField::Color
                        | LayerField::Width
                        | LayerField::Name
                        | LayerField::Text
                );
                if !live {
                    return None;
                }
                let key = |f| layer_field_name(index, f);
                let carries_text = match (field, creation.layer(index).map(|l| l.layer_type())) {
                    (LayerField::Name, Some(LayerType::Font)) => true,
                    (LayerField::Text, Some(LayerType::Font | LayerType::IconCallout)) => true,
                    _ => false,
                };
                let html = if carries_text {
                    form.get(&key(field)).map(render_markup)
                } else {
                    None
                };
                let patch = LayerPatch {
                    index,
                    offset_x: form.int(&key(LayerField::OffsetX)),
                    offset_y: form.int(&key(LayerField::OffsetY)),
                    size: form.optional_px(&key(LayerField::Size)),
                    color: form
                        .get(&key(LayerField::Color))
                        .filter(|c| !c.is_empty())
                        .map(str::to_string),
                    width: form.optional_px(&key(LayerField::Width)),
                    html,
                };
                Some(Self::UpdateLayer(patch))
            }
            _ => None,
        }
    }

    /// Wire JSON.
    pub fn to_json(&self) -> CollageResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/preview/message.rs"]
mod tests;
