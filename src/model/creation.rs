use std::sync::Arc;

use crate::model::layer::Layer;

/// Title given to creations that have none.
pub const DEFAULT_TITLE: &str = "Untitled";

/// The aggregate root: a canvas with a background and an ordered layer sequence.
///
/// `Creation` is an immutable snapshot. With-ers return a new value; the layer sequence is held
/// behind an `Arc` so scalar edits share it with the receiver instead of copying every layer.
/// Sequence order is storage order only. Stacking is decided by each layer's `zIndex`.
#[derive(Clone, Debug, PartialEq)]
pub struct Creation {
    id: String,
    title: String,
    width: u32,
    height: u32,
    background_image_id: Option<String>,
    background_scale: f64,
    background_x: i32,
    background_y: i32,
    layers: Arc<[Layer]>,
}

impl Creation {
    /// Empty canvas with a natural-size, centered background and no layers.
    ///
    /// A blank title becomes [`DEFAULT_TITLE`].
    pub fn new(id: impl Into<String>, title: impl Into<String>, width: u32, height: u32) -> Self {
        let title = title.into();
        Self {
            id: id.into(),
            title: if title.trim().is_empty() {
                DEFAULT_TITLE.to_string()
            } else {
                title
            },
            width,
            height,
            background_image_id: None,
            background_scale: 1.0,
            background_x: 0,
            background_y: 0,
            layers: Arc::from(Vec::new()),
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Canvas width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Referenced background asset, if any.
    pub fn background_image_id(&self) -> Option<&str> {
        self.background_image_id.as_deref()
    }

    /// Background scale; 1.0 is natural size.
    pub fn background_scale(&self) -> f64 {
        self.background_scale
    }

    /// Horizontal background offset in pixels.
    pub fn background_x(&self) -> i32 {
        self.background_x
    }

    /// Vertical background offset in pixels.
    pub fn background_y(&self) -> i32 {
        self.background_y
    }

    /// Layers in storage order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Layer at a sequence index.
    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    /// Number of layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// True when both snapshots point at the very same layer sequence.
    pub fn shares_layers_with(&self, other: &Creation) -> bool {
        Arc::ptr_eq(&self.layers, &other.layers)
    }

    /// Copy with a new title.
    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self.clone()
        }
    }

    /// Copy with a new canvas width. Callers validate first (see [`parse_dimension`]).
    ///
    /// [`parse_dimension`]: crate::parse_dimension
    pub fn with_width(&self, width: u32) -> Self {
        Self {
            width,
            ..self.clone()
        }
    }

    /// Copy with a new canvas height.
    pub fn with_height(&self, height: u32) -> Self {
        Self {
            height,
            ..self.clone()
        }
    }

    /// Copy with a different (or no) background asset.
    pub fn with_background_image_id(&self, id: Option<String>) -> Self {
        Self {
            background_image_id: id.filter(|id| !id.is_empty()),
            ..self.clone()
        }
    }

    /// Copy with a new background scale.
    pub fn with_background_scale(&self, scale: f64) -> Self {
        Self {
            background_scale: scale,
            ..self.clone()
        }
    }

    /// Copy with a new horizontal background offset.
    pub fn with_background_x(&self, x: i32) -> Self {
        Self {
            background_x: x,
            ..self.clone()
        }
    }

    /// Copy with a new vertical background offset.
    pub fn with_background_y(&self, y: i32) -> Self {
        Self {
            background_y: y,
            ..self.clone()
        }
    }

    /// Copy with a whole new layer sequence.
    pub fn with_layers(&self, layers: impl Into<Arc<[Layer]>>) -> Self {
        Self {
            layers: layers.into(),
            ..self.clone()
        }
    }

    /// Copy with the layer at `index` replaced. Out-of-range indices return an equal copy.
    pub fn with_layer(&self, index: usize, layer: Layer) -> Self {
        if index >= self.layers.len() {
            return self.clone();
        }
        let mut layers = self.layers.to_vec();
        layers[index] = layer;
        self.with_layers(layers)
    }

    /// Copy with the layer at `index` passed through `f`.
    pub fn update_layer(&self, index: usize, f: impl FnOnce(&Layer) -> Layer) -> Self {
        match self.layers.get(index) {
            Some(layer) => self.with_layer(index, f(layer)),
            None => self.clone(),
        }
    }

    /// Copy with the layer at `index` spliced out of the sequence.
    ///
    /// Leaves a gap in the `zIndex` sequence; run [`Creation::repair_z_index`] afterwards.
    pub fn remove_layer(&self, index: usize) -> Self {
        if index >= self.layers.len() {
            return self.clone();
        }
        let mut layers = self.layers.to_vec();
        layers.remove(index);
        self.with_layers(layers)
    }

    /// Index of the layer with the given id.
    pub fn position_of(&self, layer_id: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.id() == layer_id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/creation.rs"]
mod tests;
