use crate::foundation::core::{LayerType, Slot};
use crate::foundation::markup::render_markup;

/// Default stacking value given to layers built without an explicit `zIndex`.
pub const DEFAULT_Z_INDEX: i32 = 10;

const DEFAULT_COLOR: &str = "#000000";
const DEFAULT_ICON: &str = "photo";
const DEFAULT_CALLOUT_ICON: &str = "info-circle";

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
/// One element of a creation's layer stack.
///
/// A layer is an immutable value: every `with_*` method returns a new layer and leaves the
/// receiver untouched. Fields that the layer's variant does not carry are ignored by the
/// corresponding with-er, which then returns an equal copy.
///
/// The serialized form is the flat persisted record:
/// `{ id, name, visible, zIndex, slot, type, ...variant fields }`.
pub struct Layer {
    id: String,
    name: String,
    visible: bool,
    z_index: i32,
    slot: Slot,
    #[serde(flatten)]
    content: LayerContent,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
/// Variant-specific payload, tagged by the layer type discriminant.
pub enum LayerContent {
    /// Styled text.
    Font(FontContent),
    /// A single icon.
    Icon(IconContent),
    /// Icon flanked by styled text.
    IconCallout(IconCalloutContent),
    /// A referenced image asset.
    Image(ImageContent),
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Text layer fields.
pub struct FontContent {
    /// Text style preset id.
    #[serde(deserialize_with = "null_as_default")]
    pub style_id: String,
    /// Raw text with `**bold**` / `*italic*` / newline markup.
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
    /// Rendered form of `text`.
    #[serde(deserialize_with = "null_as_default")]
    pub html: String,
    /// Font size in pixels; `None` uses the style's size.
    pub size: Option<u32>,
    /// Box width in pixels; `None` sizes to content.
    pub width: Option<u32>,
    /// Horizontal offset from the slot anchor in pixels.
    pub offset_x: i32,
    /// Vertical offset from the slot anchor in pixels.
    pub offset_y: i32,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Icon layer fields.
pub struct IconContent {
    /// Icon name without namespace prefix.
    #[serde(deserialize_with = "null_as_default")]
    pub icon: String,
    /// Icon size in pixels.
    pub size: Option<u32>,
    /// Hex color.
    #[serde(deserialize_with = "null_as_default")]
    pub color: String,
    /// Horizontal offset from the slot anchor in pixels.
    pub offset_x: i32,
    /// Vertical offset from the slot anchor in pixels.
    pub offset_y: i32,
}

impl Default for IconContent {
    fn default() -> Self {
        Self {
            icon: DEFAULT_ICON.to_string(),
            size: Some(48),
            color: DEFAULT_COLOR.to_string(),
            offset_x: 0,
            offset_y: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Icon + text callout fields.
pub struct IconCalloutContent {
    /// Icon name without namespace prefix.
    #[serde(deserialize_with = "null_as_default")]
    pub icon: String,
    /// Hex color of the icon.
    #[serde(deserialize_with = "null_as_default")]
    pub color: String,
    /// Raw text with markup.
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
    /// Rendered form of `text`.
    #[serde(deserialize_with = "null_as_default")]
    pub html: String,
    /// Text style preset id.
    #[serde(deserialize_with = "null_as_default")]
    pub style_id: String,
    /// Icon size in pixels.
    pub size: Option<u32>,
    /// Box width in pixels.
    pub width: Option<u32>,
    /// Horizontal offset from the slot anchor in pixels.
    pub offset_x: i32,
    /// Vertical offset from the slot anchor in pixels.
    pub offset_y: i32,
}

impl Default for IconCalloutContent {
    fn default() -> Self {
        Self {
            icon: DEFAULT_CALLOUT_ICON.to_string(),
            color: DEFAULT_COLOR.to_string(),
            text: String::new(),
            html: String::new(),
            style_id: String::new(),
            size: Some(24),
            width: None,
            offset_x: 0,
            offset_y: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Image layer fields.
pub struct ImageContent {
    /// Referenced image asset id.
    pub image_id: Option<String>,
    /// Display width in pixels.
    pub width: Option<u32>,
    /// Display height in pixels; `None` keeps the aspect ratio.
    pub height: Option<u32>,
    /// Horizontal offset from the slot anchor in pixels.
    pub offset_x: i32,
    /// Vertical offset from the slot anchor in pixels.
    pub offset_y: i32,
}

impl Default for ImageContent {
    fn default() -> Self {
        Self {
            image_id: None,
            width: Some(200),
            height: None,
            offset_x: 0,
            offset_y: 0,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    let v: Option<T> = serde::Deserialize::deserialize(deserializer)?;
    Ok(v.unwrap_or_default())
}

/// Strip any `namespace:` prefix from an icon name; blank names become `fallback`.
pub fn normalize_icon(icon: &str, fallback: &str) -> String {
    let bare = icon.rsplit(':').next().unwrap_or(icon).trim();
    if bare.is_empty() {
        fallback.to_string()
    } else {
        bare.to_string()
    }
}

impl LayerContent {
    /// Default payload for a layer type.
    pub fn default_for(layer_type: LayerType) -> Self {
        match layer_type {
            LayerType::Font => LayerContent::Font(FontContent::default()),
            LayerType::Icon => LayerContent::Icon(IconContent::default()),
            LayerType::IconCallout => LayerContent::IconCallout(IconCalloutContent::default()),
            LayerType::Image => LayerContent::Image(ImageContent::default()),
        }
    }

    /// The variant's discriminant.
    pub fn layer_type(&self) -> LayerType {
        match self {
            LayerContent::Font(_) => LayerType::Font,
            LayerContent::Icon(_) => LayerType::Icon,
            LayerContent::IconCallout(_) => LayerType::IconCallout,
            LayerContent::Image(_) => LayerType::Image,
        }
    }

    /// Display name used when a payload carries none.
    pub fn default_name(&self) -> &'static str {
        match self {
            LayerContent::Font(_) => "Text Layer",
            LayerContent::Icon(_) => "Icon Layer",
            LayerContent::IconCallout(_) => "Icon Callout",
            LayerContent::Image(_) => "Image Layer",
        }
    }

    /// Fill derived and fallback fields: icon names lose their namespace, empty colors become
    /// black, and missing `html` is rendered from `text`.
    pub fn normalized(mut self) -> Self {
        match &mut self {
            LayerContent::Font(c) => {
                if c.html.is_empty() {
                    c.html = render_markup(&c.text);
                }
            }
            LayerContent::Icon(c) => {
                c.icon = normalize_icon(&c.icon, DEFAULT_ICON);
                if c.color.is_empty() {
                    c.color = DEFAULT_COLOR.to_string();
                }
            }
            LayerContent::IconCallout(c) => {
                c.icon = normalize_icon(&c.icon, DEFAULT_CALLOUT_ICON);
                if c.color.is_empty() {
                    c.color = DEFAULT_COLOR.to_string();
                }
                if c.html.is_empty() {
                    c.html = render_markup(&c.text);
                }
            }
            LayerContent::Image(c) => {
                if c.image_id.as_deref().is_some_and(str::is_empty) {
                    c.image_id = None;
                }
            }
        }
        self
    }

    fn offsets_mut(&mut self) -> (&mut i32, &mut i32) {
        match self {
            LayerContent::Font(c) => (&mut c.offset_x, &mut c.offset_y),
            LayerContent::Icon(c) => (&mut c.offset_x, &mut c.offset_y),
            LayerContent::IconCallout(c) => (&mut c.offset_x, &mut c.offset_y),
            LayerContent::Image(c) => (&mut c.offset_x, &mut c.offset_y),
        }
    }
}

impl Layer {
    /// Build a layer with default visibility, stacking value and slot.
    pub fn new(id: impl Into<String>, name: impl Into<String>, content: LayerContent) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            visible: true,
            z_index: DEFAULT_Z_INDEX,
            slot: Slot::default(),
            content,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// User-facing label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display toggle.
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Stacking order; higher paints later.
    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    /// Layout anchor.
    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// Variant discriminant.
    pub fn layer_type(&self) -> LayerType {
        self.content.layer_type()
    }

    /// Variant payload.
    pub fn content(&self) -> &LayerContent {
        &self.content
    }

    /// `(offsetX, offsetY)` from the slot anchor.
    pub fn offset(&self) -> (i32, i32) {
        match &self.content {
            LayerContent::Font(c) => (c.offset_x, c.offset_y),
            LayerContent::Icon(c) => (c.offset_x, c.offset_y),
            LayerContent::IconCallout(c) => (c.offset_x, c.offset_y),
            LayerContent::Image(c) => (c.offset_x, c.offset_y),
        }
    }

    /// Size in pixels for Font, Icon and IconCallout layers.
    pub fn size(&self) -> Option<u32> {
        match &self.content {
            LayerContent::Font(c) => c.size,
            LayerContent::Icon(c) => c.size,
            LayerContent::IconCallout(c) => c.size,
            LayerContent::Image(_) => None,
        }
    }

    /// Width in pixels for Font, IconCallout and Image layers.
    pub fn width(&self) -> Option<u32> {
        match &self.content {
            LayerContent::Font(c) => c.width,
            LayerContent::IconCallout(c) => c.width,
            LayerContent::Image(c) => c.width,
            LayerContent::Icon(_) => None,
        }
    }

    /// Height in pixels for Image layers.
    pub fn height(&self) -> Option<u32> {
        match &self.content {
            LayerContent::Image(c) => c.height,
            _ => None,
        }
    }

    /// Icon color for Icon and IconCallout layers.
    pub fn color(&self) -> Option<&str> {
        match &self.content {
            LayerContent::Icon(c) => Some(&c.color),
            LayerContent::IconCallout(c) => Some(&c.color),
            _ => None,
        }
    }

    /// Rendered text markup for Font and IconCallout layers.
    pub fn html(&self) -> Option<&str> {
        match &self.content {
            LayerContent::Font(c) => Some(&c.html),
            LayerContent::IconCallout(c) => Some(&c.html),
            _ => None,
        }
    }

    /// Referenced image asset id for Image layers.
    pub fn image_id(&self) -> Option<&str> {
        match &self.content {
            LayerContent::Image(c) => c.image_id.as_deref(),
            _ => None,
        }
    }

    /// Copy with a new display name.
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Copy with a new visibility.
    pub fn with_visible(&self, visible: bool) -> Self {
        Self {
            visible,
            ..self.clone()
        }
    }

    /// Copy with a new stacking value.
    pub fn with_z_index(&self, z_index: i32) -> Self {
        Self {
            z_index,
            ..self.clone()
        }
    }

    /// Copy anchored to a different slot.
    pub fn with_slot(&self, slot: Slot) -> Self {
        Self {
            slot,
            ..self.clone()
        }
    }

    /// Copy with a replaced variant payload.
    pub fn with_content(&self, content: LayerContent) -> Self {
        Self {
            content,
            ..self.clone()
        }
    }

    /// Copy with a new horizontal offset.
    pub fn with_offset_x(&self, offset_x: i32) -> Self {
        self.map_content(|c| *c.offsets_mut().0 = offset_x)
    }

    /// Copy with a new vertical offset.
    pub fn with_offset_y(&self, offset_y: i32) -> Self {
        self.map_content(|c| *c.offsets_mut().1 = offset_y)
    }

    /// Copy with a new size (Font, Icon, IconCallout).
    pub fn with_size(&self, size: Option<u32>) -> Self {
        self.map_content(|c| match c {
            LayerContent::Font(f) => f.size = size,
            LayerContent::Icon(i) => i.size = size,
            LayerContent::IconCallout(ic) => ic.size = size,
            LayerContent::Image(_) => {}
        })
    }

    /// Copy with a new width (Font, IconCallout, Image).
    pub fn with_width(&self, width: Option<u32>) -> Self {
        self.map_content(|c| match c {
            LayerContent::Font(f) => f.width = width,
            LayerContent::IconCallout(ic) => ic.width = width,
            LayerContent::Image(i) => i.width = width,
            LayerContent::Icon(_) => {}
        })
    }

    /// Copy with a new height (Image).
    pub fn with_height(&self, height: Option<u32>) -> Self {
        self.map_content(|c| {
            if let LayerContent::Image(i) = c {
                i.height = height;
            }
        })
    }

    /// Copy with a new icon color (Icon, IconCallout).
    pub fn with_color(&self, color: impl Into<String>) -> Self {
        let color = color.into();
        self.map_content(|c| match c {
            LayerContent::Icon(i) => i.color = color,
            LayerContent::IconCallout(ic) => ic.color = color,
            _ => {}
        })
    }

    /// Copy with a new icon (Icon, IconCallout); the name is normalized.
    pub fn with_icon(&self, icon: &str) -> Self {
        self.map_content(|c| match c {
            LayerContent::Icon(i) => i.icon = normalize_icon(icon, DEFAULT_ICON),
            LayerContent::IconCallout(ic) => ic.icon = normalize_icon(icon, DEFAULT_CALLOUT_ICON),
            _ => {}
        })
    }

    /// Copy with new raw text (Font, IconCallout). `html` is not re-derived here.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.map_content(|c| match c {
            LayerContent::Font(f) => f.text = text,
            LayerContent::IconCallout(ic) => ic.text = text,
            _ => {}
        })
    }

    /// Copy with new rendered markup (Font, IconCallout).
    pub fn with_html(&self, html: impl Into<String>) -> Self {
        let html = html.into();
        self.map_content(|c| match c {
            LayerContent::Font(f) => f.html = html,
            LayerContent::IconCallout(ic) => ic.html = html,
            _ => {}
        })
    }

    /// Copy with a new text style (Font, IconCallout).
    pub fn with_style_id(&self, style_id: impl Into<String>) -> Self {
        let style_id = style_id.into();
        self.map_content(|c| match c {
            LayerContent::Font(f) => f.style_id = style_id,
            LayerContent::IconCallout(ic) => ic.style_id = style_id,
            _ => {}
        })
    }

    /// Copy referencing a different image asset (Image).
    pub fn with_image_id(&self, image_id: Option<String>) -> Self {
        self.map_content(|c| {
            if let LayerContent::Image(i) = c {
                i.image_id = image_id;
            }
        })
    }

    fn map_content(&self, f: impl FnOnce(&mut LayerContent)) -> Self {
        let mut content = self.content.clone();
        f(&mut content);
        self.with_content(content)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/layer.rs"]
mod tests;
