use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::factory::preset::PresetStore;
use crate::foundation::core::{LayerType, Slot};
use crate::foundation::error::{CollageError, CollageResult};
use crate::foundation::ids::IdGenerator;
use crate::model::creation::Creation;
use crate::model::layer::{
    FontContent, IconCalloutContent, IconContent, ImageContent, Layer, LayerContent,
};
use crate::model::record::CreationRecord;

type ContentBuilder = fn(&serde_json::Value) -> CollageResult<LayerContent>;

#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct BaseFields {
    id: Option<String>,
    name: Option<String>,
    visible: Option<bool>,
    z_index: Option<i32>,
    slot: Option<String>,
}

fn parse<T: serde::de::DeserializeOwned>(data: &serde_json::Value) -> CollageResult<T> {
    Ok(serde_json::from_value(data.clone())?)
}

fn font(data: &serde_json::Value) -> CollageResult<LayerContent> {
    Ok(LayerContent::Font(parse::<FontContent>(data)?).normalized())
}

fn icon(data: &serde_json::Value) -> CollageResult<LayerContent> {
    Ok(LayerContent::Icon(parse::<IconContent>(data)?).normalized())
}

fn icon_callout(data: &serde_json::Value) -> CollageResult<LayerContent> {
    Ok(LayerContent::IconCallout(parse::<IconCalloutContent>(data)?).normalized())
}

fn image(data: &serde_json::Value) -> CollageResult<LayerContent> {
    Ok(LayerContent::Image(parse::<ImageContent>(data)?).normalized())
}

/// Builds typed layers (and whole creations) from untyped payloads.
///
/// Holds an explicit per-type builder table and the id source. Build one at startup and pass
/// it by reference (or `Arc`) to whatever needs to construct layers.
pub struct LayerFactory {
    ids: Arc<dyn IdGenerator>,
    builders: BTreeMap<LayerType, ContentBuilder>,
}

impl fmt::Debug for LayerFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerFactory")
            .field("types", &self.builders.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl LayerFactory {
    /// Factory for the four built-in layer types.
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        let mut builders: BTreeMap<LayerType, ContentBuilder> = BTreeMap::new();
        builders.insert(LayerType::Font, font);
        builders.insert(LayerType::Icon, icon);
        builders.insert(LayerType::IconCallout, icon_callout);
        builders.insert(LayerType::Image, image);
        Self { ids, builders }
    }

    /// The id source shared with callers that mint creation ids.
    pub fn ids(&self) -> &dyn IdGenerator {
        self.ids.as_ref()
    }

    /// Build a layer of `type_tag` from `data`, with a fresh id.
    ///
    /// `data` must be a JSON object (or `null` for all defaults). Unknown fields are ignored.
    #[tracing::instrument(skip(self, data))]
    pub fn create_layer(&self, type_tag: &str, data: &serde_json::Value) -> CollageResult<Layer> {
        let layer_type: LayerType = type_tag.parse()?;
        self.build(layer_type, data, None)
    }

    /// Fetch the preset for `type_tag` and build a layer from it.
    #[tracing::instrument(skip(self, presets))]
    pub fn create_from_preset(
        &self,
        presets: &dyn PresetStore,
        type_tag: &str,
    ) -> CollageResult<Layer> {
        let layer_type: LayerType = type_tag.parse()?;
        let payload = presets.fetch_preset(layer_type)?;
        self.build(layer_type, &payload, None)
    }

    /// Turn a persisted layer record back into a typed layer, keeping its id.
    ///
    /// Records without an id get a fresh one.
    pub fn rehydrate_layer(&self, record: &serde_json::Value) -> CollageResult<Layer> {
        let tag = record
            .get("type")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default();
        let layer_type: LayerType = tag.parse()?;
        let base: BaseFields = parse(record)?;
        self.build(layer_type, record, base.id.filter(|id| !id.is_empty()))
    }

    /// Rehydrate a persisted creation. Ids and `zIndex` values are kept as stored.
    #[tracing::instrument(skip(self, record), fields(creation = %record.id))]
    pub fn creation_from_record(&self, record: &CreationRecord) -> CollageResult<Creation> {
        let layers = record
            .layers
            .iter()
            .map(|layer| self.rehydrate_layer(layer))
            .collect::<CollageResult<Vec<_>>>()?;
        let id = if record.id.is_empty() {
            self.ids.generate()
        } else {
            record.id.clone()
        };
        Ok(self.creation_shell(id, record).with_layers(layers))
    }

    /// Build a new creation from a template payload: every id is fresh and the stacking order
    /// is repaired.
    #[tracing::instrument(skip(self, payload))]
    pub fn creation_from_template(&self, payload: &serde_json::Value) -> CollageResult<Creation> {
        let record: CreationRecord = parse(payload)?;
        let layers = record
            .layers
            .iter()
            .map(|layer| {
                let tag = layer
                    .get("type")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or_default();
                self.create_layer(tag, layer)
            })
            .collect::<CollageResult<Vec<_>>>()?;
        let creation = self
            .creation_shell(self.ids.generate(), &record)
            .with_layers(layers);
        Ok(creation.repair_z_index().into_owned())
    }

    /// A blank creation with a fresh id.
    pub fn blank_creation(&self, title: &str, width: u32, height: u32) -> Creation {
        Creation::new(self.ids.generate(), title, width, height)
    }

    /// A default Image layer showing `image_id`, anchored at center-middle.
    pub fn image_layer(&self, image_id: &str) -> Layer {
        let content = LayerContent::Image(ImageContent {
            image_id: Some(image_id.to_string()),
            ..ImageContent::default()
        });
        Layer::new(self.ids.generate(), content.default_name(), content)
    }

    fn creation_shell(&self, id: String, record: &CreationRecord) -> Creation {
        Creation::new(id, record.title.clone(), record.width, record.height)
            .with_background_image_id(record.background_image_id.clone())
            .with_background_scale(record.background_scale)
            .with_background_x(record.background_x)
            .with_background_y(record.background_y)
    }

    fn build(
        &self,
        layer_type: LayerType,
        data: &serde_json::Value,
        id: Option<String>,
    ) -> CollageResult<Layer> {
        let empty = serde_json::Value::Object(serde_json::Map::new());
        let data = match data {
            serde_json::Value::Null => &empty,
            serde_json::Value::Object(_) => data,
            other => {
                return Err(CollageError::validation(format!(
                    "layer payload for '{layer_type}' must be an object, got {other}"
                )));
            }
        };
        let builder = self
            .builders
            .get(&layer_type)
            .ok_or_else(|| CollageError::unknown_layer_type(layer_type.as_str()))?;
        let content = builder(data)?;
        let base: BaseFields = parse(data)?;

        let name = base
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| content.default_name().to_string());
        let mut layer = Layer::new(id.unwrap_or_else(|| self.ids.generate()), name, content);
        if let Some(visible) = base.visible {
            layer = layer.with_visible(visible);
        }
        if let Some(z) = base.z_index {
            layer = layer.with_z_index(z);
        }
        if let Some(slot) = base.slot.as_deref() {
            layer = layer.with_slot(Slot::parse_or_default(slot));
        }
        Ok(layer)
    }
}

impl Creation {
    /// Build a creation from a template default payload (see
    /// [`LayerFactory::creation_from_template`]).
    pub fn from_template(
        payload: &serde_json::Value,
        factory: &LayerFactory,
    ) -> CollageResult<Creation> {
        factory.creation_from_template(payload)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/factory/layer_factory.rs"]
mod tests;
