use std::collections::BTreeMap;

/// Flat map of structured input names to raw string values, as an edit form submits them.
///
/// Names follow `title`, `width`, `height`, `background<Field>` and `layer-<index>-<field>`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormValues {
    values: BTreeMap<String, String>,
}

impl FormValues {
    /// Empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Insert or replace one value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Raw value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// True when the form carries `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterate `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Integer reading of `name`; fractional input truncates, anything else is `None`.
    pub fn int(&self, name: &str) -> Option<i32> {
        parse_int(self.get(name)?)
    }

    /// Finite float reading of `name`.
    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name)?
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }

    /// Optional pixel value: `None` when absent or unparseable, `Some(None)` when the input was
    /// cleared, `Some(Some(px))` for a non-negative number.
    pub fn optional_px(&self, name: &str) -> Option<Option<u32>> {
        let raw = self.get(name)?;
        if raw.trim().is_empty() {
            return Some(None);
        }
        let n = parse_int(raw)?;
        u32::try_from(n).ok().map(Some)
    }

    /// Checkbox reading: `true`/`on`/`1` are checked, `false`/`off`/`0`/empty are not.
    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.get(name)?.trim() {
            "true" | "on" | "1" => Some(true),
            "false" | "off" | "0" | "" => Some(false),
            _ => None,
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn parse_int(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<i32>() {
        return Some(n);
    }
    let f = raw.parse::<f64>().ok().filter(|f| f.is_finite())?;
    let t = f.trunc();
    (t >= f64::from(i32::MIN) && t <= f64::from(i32::MAX)).then_some(t as i32)
}

/// Background fields (`background<Field>`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackgroundField {
    /// `backgroundImageId`
    ImageId,
    /// `backgroundScale`
    Scale,
    /// `backgroundX`
    X,
    /// `backgroundY`
    Y,
}

/// Per-layer fields (`layer-<index>-<field>`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerField {
    /// `name`; for Font layers this input carries the text.
    Name,
    /// `text`
    Text,
    /// `slot`
    Slot,
    /// `styleId`
    StyleId,
    /// `size`
    Size,
    /// `width`
    Width,
    /// `height`
    Height,
    /// `offsetX`
    OffsetX,
    /// `offsetY`
    OffsetY,
    /// `color`
    Color,
    /// `icon`
    Icon,
    /// `imageId`
    ImageId,
    /// `visible`
    Visible,
}

impl LayerField {
    fn parse(raw: &str) -> Option<Self> {
        Some(match raw {
            "name" => Self::Name,
            "text" => Self::Text,
            "slot" => Self::Slot,
            "styleId" => Self::StyleId,
            "size" => Self::Size,
            "width" => Self::Width,
            "height" => Self::Height,
            "offsetX" => Self::OffsetX,
            "offsetY" => Self::OffsetY,
            "color" => Self::Color,
            "icon" => Self::Icon,
            "imageId" => Self::ImageId,
            "visible" => Self::Visible,
            _ => return None,
        })
    }

    /// Name segment used in `layer-<index>-<field>`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Text => "text",
            Self::Slot => "slot",
            Self::StyleId => "styleId",
            Self::Size => "size",
            Self::Width => "width",
            Self::Height => "height",
            Self::OffsetX => "offsetX",
            Self::OffsetY => "offsetY",
            Self::Color => "color",
            Self::Icon => "icon",
            Self::ImageId => "imageId",
            Self::Visible => "visible",
        }
    }
}

/// A parsed structured input name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldName {
    /// `title`
    Title,
    /// `width`
    Width,
    /// `height`
    Height,
    /// `background<Field>`
    Background(BackgroundField),
    /// `layer-<index>-<field>`
    Layer {
        /// Sequence index of the layer.
        index: usize,
        /// Which field of that layer.
        field: LayerField,
    },
}

impl FieldName {
    /// Parse an input name; unrecognized shapes yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "title" => return Some(Self::Title),
            "width" => return Some(Self::Width),
            "height" => return Some(Self::Height),
            _ => {}
        }
        if let Some(rest) = name.strip_prefix("background") {
            let field = match rest {
                "ImageId" => BackgroundField::ImageId,
                "Scale" => BackgroundField::Scale,
                "X" => BackgroundField::X,
                "Y" => BackgroundField::Y,
                _ => return None,
            };
            return Some(Self::Background(field));
        }
        let rest = name.strip_prefix("layer-")?;
        let (index, field) = rest.split_once('-')?;
        if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self::Layer {
            index: index.parse().ok()?,
            field: LayerField::parse(field)?,
        })
    }
}

/// Input name of a layer field.
pub fn layer_field_name(index: usize, field: LayerField) -> String {
    format!("layer-{index}-{}", field.as_str())
}

#[cfg(test)]
#[path = "../../tests/unit/edit/fields.rs"]
mod tests;
