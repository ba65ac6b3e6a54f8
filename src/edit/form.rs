//! Form-to-model mapping.
//!
//! Each layer variant has one adapter that reads its `layer-<index>-*` inputs and applies the
//! matching with-ers. The adapters live in an explicit table built once at startup.

use std::collections::BTreeMap;

use crate::edit::fields::{FormValues, LayerField, layer_field_name};
use crate::foundation::core::{LayerType, Slot};
use crate::foundation::markup::{cap_chars, render_markup};
use crate::model::creation::Creation;
use crate::model::layer::Layer;
use crate::model::validate::parse_dimension;

/// Default cap on Font layer names derived from their text.
pub const DEFAULT_NAME_CAP: usize = 30;

/// Apply the creation-level inputs (`title`, `width`, `height`, `background*`).
///
/// Only inputs present in `form` are applied. Invalid dimensions and scales keep the prior
/// value and are logged.
pub fn apply_creation_fields(creation: &Creation, form: &FormValues) -> Creation {
    let mut next = creation.clone();
    if let Some(title) = form.get("title") {
        next = next.with_title(title);
    }
    for (name, is_width) in [("width", true), ("height", false)] {
        let Some(raw) = form.get(name) else {
            continue;
        };
        match parse_dimension(raw) {
            Ok(px) if is_width => next = next.with_width(px),
            Ok(px) => next = next.with_height(px),
            Err(err) => tracing::warn!(field = name, error = %err, "keeping previous value"),
        }
    }
    if let Some(id) = form.get("backgroundImageId") {
        next = next.with_background_image_id(Some(id.trim().to_string()));
    }
    if form.contains("backgroundScale") {
        match form.float("backgroundScale").filter(|s| *s > 0.0) {
            Some(scale) => next = next.with_background_scale(scale),
            None => tracing::warn!(
                value = form.get("backgroundScale"),
                "invalid background scale, keeping previous value"
            ),
        }
    }
    if let Some(x) = form.int("backgroundX") {
        next = next.with_background_x(x);
    }
    if let Some(y) = form.int("backgroundY") {
        next = next.with_background_y(y);
    }
    next
}

/// Maps a layer's form inputs onto a new layer value.
pub trait LayerFormAdapter: Send + Sync {
    /// Variant this adapter handles.
    fn layer_type(&self) -> LayerType;

    /// Return `layer` updated from the `layer-<index>-*` inputs in `form`.
    fn extract_updated(&self, layer: &Layer, form: &FormValues, index: usize) -> Layer;
}

// Inputs every variant shares: slot, visibility, offsets.
fn apply_common(layer: &Layer, form: &FormValues, index: usize) -> Layer {
    let key = |f| layer_field_name(index, f);
    let mut next = layer.clone();
    if let Some(slot) = form.get(&key(LayerField::Slot)) {
        next = next.with_slot(Slot::parse_or_default(slot));
    }
    if let Some(visible) = form.flag(&key(LayerField::Visible)) {
        next = next.with_visible(visible);
    }
    if let Some(x) = form.int(&key(LayerField::OffsetX)) {
        next = next.with_offset_x(x);
    }
    if let Some(y) = form.int(&key(LayerField::OffsetY)) {
        next = next.with_offset_y(y);
    }
    next
}

fn apply_text(layer: Layer, text: &str) -> Layer {
    layer.with_text(text).with_html(render_markup(text))
}

/// Font layers: text (also read from the `name` input), style, size and width.
#[derive(Clone, Copy, Debug)]
pub struct FontFormAdapter {
    /// Maximum characters of text copied into the layer name.
    pub name_cap: usize,
}

impl LayerFormAdapter for FontFormAdapter {
    fn layer_type(&self) -> LayerType {
        LayerType::Font
    }

    fn extract_updated(&self, layer: &Layer, form: &FormValues, index: usize) -> Layer {
        let key = |f| layer_field_name(index, f);
        let mut next = apply_common(layer, form, index);
        let text = form
            .get(&key(LayerField::Text))
            .or_else(|| form.get(&key(LayerField::Name)));
        if let Some(text) = text {
            next = apply_text(next, text).with_name(cap_chars(text, self.name_cap));
        }
        if let Some(style) = form.get(&key(LayerField::StyleId)) {
            next = next.with_style_id(style);
        }
        if let Some(size) = form.optional_px(&key(LayerField::Size)) {
            next = next.with_size(size);
        }
        if let Some(width) = form.optional_px(&key(LayerField::Width)) {
            next = next.with_width(width);
        }
        next
    }
}

/// Icon layers: icon, size and color.
#[derive(Clone, Copy, Debug, Default)]
pub struct IconFormAdapter;

impl LayerFormAdapter for IconFormAdapter {
    fn layer_type(&self) -> LayerType {
        LayerType::Icon
    }

    fn extract_updated(&self, layer: &Layer, form: &FormValues, index: usize) -> Layer {
        let key = |f| layer_field_name(index, f);
        let mut next = apply_common(layer, form, index);
        if let Some(name) = form.get(&key(LayerField::Name)) {
            next = next.with_name(name);
        }
        if let Some(icon) = form.get(&key(LayerField::Icon)) {
            next = next.with_icon(icon);
        }
        if let Some(size) = form.optional_px(&key(LayerField::Size)) {
            next = next.with_size(size);
        }
        if let Some(color) = form.get(&key(LayerField::Color)).filter(|c| !c.is_empty()) {
            next = next.with_color(color);
        }
        next
    }
}

/// Icon callout layers: icon, color, text, style, size and width.
#[derive(Clone, Copy, Debug, Default)]
pub struct IconCalloutFormAdapter;

impl LayerFormAdapter for IconCalloutFormAdapter {
    fn layer_type(&self) -> LayerType {
        LayerType::IconCallout
    }

    fn extract_updated(&self, layer: &Layer, form: &FormValues, index: usize) -> Layer {
        let key = |f| layer_field_name(index, f);
        let mut next = IconFormAdapter.extract_updated(layer, form, index);
        if let Some(text) = form.get(&key(LayerField::Text)) {
            next = apply_text(next, text);
        }
        if let Some(style) = form.get(&key(LayerField::StyleId)) {
            next = next.with_style_id(style);
        }
        if let Some(width) = form.optional_px(&key(LayerField::Width)) {
            next = next.with_width(width);
        }
        next
    }
}

/// Image layers: referenced asset, width and height.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageFormAdapter;

impl LayerFormAdapter for ImageFormAdapter {
    fn layer_type(&self) -> LayerType {
        LayerType::Image
    }

    fn extract_updated(&self, layer: &Layer, form: &FormValues, index: usize) -> Layer {
        let key = |f| layer_field_name(index, f);
        let mut next = apply_common(layer, form, index);
        if let Some(name) = form.get(&key(LayerField::Name)) {
            next = next.with_name(name);
        }
        if let Some(id) = form.get(&key(LayerField::ImageId)) {
            let id = id.trim();
            next = next.with_image_id((!id.is_empty()).then(|| id.to_string()));
        }
        if let Some(width) = form.optional_px(&key(LayerField::Width)) {
            next = next.with_width(width);
        }
        if let Some(height) = form.optional_px(&key(LayerField::Height)) {
            next = next.with_height(height);
        }
        next
    }
}

/// Per-type adapter table.
pub struct LayerFormRegistry {
    adapters: BTreeMap<LayerType, Box<dyn LayerFormAdapter>>,
}

impl std::fmt::Debug for LayerFormRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerFormRegistry")
            .field("types", &self.adapters.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl LayerFormRegistry {
    /// Table with no adapters.
    pub fn empty() -> Self {
        Self {
            adapters: BTreeMap::new(),
        }
    }

    /// Table with the four built-in adapters.
    pub fn with_defaults(name_cap: usize) -> Self {
        Self::empty()
            .register(FontFormAdapter { name_cap })
            .register(IconFormAdapter)
            .register(IconCalloutFormAdapter)
            .register(ImageFormAdapter)
    }

    /// Add or replace the adapter for its layer type.
    pub fn register(mut self, adapter: impl LayerFormAdapter + 'static) -> Self {
        self.adapters.insert(adapter.layer_type(), Box::new(adapter));
        self
    }

    /// Adapter for `layer_type`.
    pub fn get(&self, layer_type: LayerType) -> Option<&dyn LayerFormAdapter> {
        self.adapters.get(&layer_type).map(|adapter| adapter.as_ref())
    }

    /// Apply `form` to every layer it addresses, then to the creation-level fields.
    ///
    /// Layers without an adapter, or without any `layer-<index>-*` input, are left as they are.
    pub fn apply(&self, creation: &Creation, form: &FormValues) -> Creation {
        let mut layers = creation.layers().to_vec();
        let mut touched = false;
        for (index, layer) in layers.iter_mut().enumerate() {
            let prefix = format!("layer-{index}-");
            if !form.iter().any(|(name, _)| name.starts_with(&prefix)) {
                continue;
            }
            let Some(adapter) = self.get(layer.layer_type()) else {
                tracing::debug!(index, layer_type = %layer.layer_type(), "no form adapter");
                continue;
            };
            let updated = adapter.extract_updated(layer, form, index);
            if updated != *layer {
                *layer = updated;
                touched = true;
            }
        }
        let base = if touched {
            creation.with_layers(layers)
        } else {
            creation.clone()
        };
        apply_creation_fields(&base, form)
    }
}

impl Default for LayerFormRegistry {
    fn default() -> Self {
        Self::with_defaults(DEFAULT_NAME_CAP)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/edit/form.rs"]
mod tests;
