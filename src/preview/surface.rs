//! Receiver side of the live preview: a style-level model of the rendered canvas.
//!
//! The surface is built once from a committed [`Creation`] and then patched in place by
//! [`PreviewMessage`]s. It does no markup interpretation of its own.

use crate::foundation::core::{LayerType, Slot};
use crate::model::creation::Creation;
use crate::model::layer::Layer;
use crate::preview::message::{BackgroundPatch, LayerPatch, PreviewMessage};
use crate::store::assets::{AssetChain, ResolvedImage};

/// Image shown by the canvas background or an image node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// Nothing referenced.
    None,
    /// Resolved asset.
    Image {
        /// Asset id.
        id: String,
        /// Sniffed mime type.
        mime: &'static str,
    },
    /// Referenced but unresolvable; drawn as a placeholder.
    Placeholder {
        /// The dangling id.
        id: String,
    },
}

impl ImageSource {
    fn resolve(id: Option<&str>, assets: &AssetChain) -> Self {
        let Some(id) = id else {
            return ImageSource::None;
        };
        match assets.resolve(id) {
            ResolvedImage::Found(record) => ImageSource::Image {
                mime: record.mime_type(),
                id: record.id,
            },
            ResolvedImage::Missing(id) => ImageSource::Placeholder { id },
        }
    }
}

/// Canvas-level view state.
#[derive(Clone, Debug, PartialEq)]
pub struct CanvasView {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Background image.
    pub background: ImageSource,
    /// Background scale.
    pub scale: f64,
    /// Horizontal background offset.
    pub x: i32,
    /// Vertical background offset.
    pub y: i32,
}

impl CanvasView {
    /// CSS `background-size`.
    pub fn background_size(&self) -> String {
        format!("{}% auto", self.scale * 100.0)
    }

    /// CSS `background-position`.
    pub fn background_position(&self) -> String {
        format!("calc(50% + {}px) calc(50% + {}px)", self.x, self.y)
    }

    fn apply(&mut self, patch: &BackgroundPatch) {
        if let Some(scale) = patch.scale {
            self.scale = scale;
        }
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
    }
}

/// One rendered layer, tagged with its sequence index.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerNode {
    /// Sequence index in the creation (the patch target key).
    pub index: usize,
    /// Layer id.
    pub layer_id: String,
    /// Variant.
    pub layer_type: LayerType,
    /// Anchor slot.
    pub slot: Slot,
    /// Stacking value.
    pub z_index: i32,
    /// Hidden layers keep their node but are not drawn.
    pub visible: bool,
    /// Horizontal offset.
    pub offset_x: i32,
    /// Vertical offset.
    pub offset_y: i32,
    /// Font or icon size.
    pub size: Option<u32>,
    /// Icon color.
    pub color: Option<String>,
    /// Box width.
    pub width: Option<u32>,
    /// Inner markup of the text node; `None` for nodes without text.
    pub inner_html: Option<String>,
    /// Image content for Image layers.
    pub image: Option<ImageSource>,
}

impl LayerNode {
    fn build(index: usize, layer: &Layer, assets: &AssetChain) -> Self {
        let (offset_x, offset_y) = layer.offset();
        let image = (layer.layer_type() == LayerType::Image)
            .then(|| ImageSource::resolve(layer.image_id(), assets));
        Self {
            index,
            layer_id: layer.id().to_string(),
            layer_type: layer.layer_type(),
            slot: layer.slot(),
            z_index: layer.z_index(),
            visible: layer.visible(),
            offset_x,
            offset_y,
            size: layer.size(),
            color: layer.color().map(str::to_string),
            width: layer.width(),
            inner_html: layer.html().map(str::to_string),
            image,
        }
    }

    /// CSS `transform`.
    pub fn transform(&self) -> String {
        format!("translate({}px, {}px)", self.offset_x, self.offset_y)
    }

    /// CSS `font-size`; empty when unset.
    pub fn font_size(&self) -> String {
        self.size.map(|n| format!("{n}px")).unwrap_or_default()
    }

    /// CSS `width`; empty when unset.
    pub fn width_style(&self) -> String {
        self.width.map(|n| format!("{n}px")).unwrap_or_default()
    }

    fn apply(&mut self, patch: &LayerPatch) {
        if let Some(x) = patch.offset_x {
            self.offset_x = x;
        }
        if let Some(y) = patch.offset_y {
            self.offset_y = y;
        }
        if let Some(size) = patch.size {
            self.size = size;
        }
        if let Some(color) = &patch.color {
            self.color = Some(color.clone());
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let (Some(html), Some(inner)) = (&patch.html, self.inner_html.as_mut()) {
            inner.clone_from(html);
        }
    }
}

/// The rendered canvas as the preview channel sees it.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSurface {
    canvas: CanvasView,
    nodes: Vec<LayerNode>,
}

impl RenderSurface {
    /// Render `creation`: background plus one node per layer, ordered by slot then `zIndex`.
    pub fn from_creation(creation: &Creation, assets: &AssetChain) -> Self {
        let canvas = CanvasView {
            width: creation.width(),
            height: creation.height(),
            background: ImageSource::resolve(creation.background_image_id(), assets),
            scale: creation.background_scale(),
            x: creation.background_x(),
            y: creation.background_y(),
        };
        let nodes = Slot::ALL
            .into_iter()
            .flat_map(|slot| creation.slot_stack(slot).into_iter().rev())
            .map(|index| LayerNode::build(index, &creation.layers()[index], assets))
            .collect();
        Self { canvas, nodes }
    }

    /// Canvas view state.
    pub fn canvas(&self) -> &CanvasView {
        &self.canvas
    }

    /// Layer nodes, grouped by slot and back-to-front within each slot.
    pub fn nodes(&self) -> &[LayerNode] {
        &self.nodes
    }

    /// Node tagged with layer `index`.
    pub fn node(&self, index: usize) -> Option<&LayerNode> {
        self.nodes.iter().find(|n| n.index == index)
    }

    /// Apply one patch. Returns `false` when it had no target (dropped, not an error).
    pub fn apply(&mut self, message: &PreviewMessage) -> bool {
        match message {
            PreviewMessage::UpdateBackground(patch) => {
                self.canvas.apply(patch);
                true
            }
            PreviewMessage::UpdateLayer(patch) => {
                match self.nodes.iter_mut().find(|n| n.index == patch.index) {
                    Some(node) => {
                        node.apply(patch);
                        true
                    }
                    None => {
                        tracing::debug!(index = patch.index, "no layer node for patch, dropped");
                        false
                    }
                }
            }
        }
    }

    /// Apply a raw wire message. Unknown message types and malformed payloads are ignored.
    pub fn apply_json(&mut self, raw: &str) -> bool {
        match serde_json::from_str::<PreviewMessage>(raw) {
            Ok(message) => self.apply(&message),
            Err(err) => {
                tracing::debug!(error = %err, "ignoring unrecognized preview message");
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/preview/surface.rs"]
mod tests;
