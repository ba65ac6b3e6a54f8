use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{CollageError, CollageResult};

/// One of the nine fixed anchor positions on the canvas.
///
/// Layers sharing a slot stack at that anchor, ordered by `zIndex`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Slot {
    /// Top row, left column.
    TopLeft,
    /// Top row, middle column.
    TopMiddle,
    /// Top row, right column.
    TopRight,
    /// Center row, left column.
    CenterLeft,
    /// Center row, middle column.
    #[default]
    CenterMiddle,
    /// Center row, right column.
    CenterRight,
    /// Bottom row, left column.
    BottomLeft,
    /// Bottom row, middle column.
    BottomMiddle,
    /// Bottom row, right column.
    BottomRight,
}

impl Slot {
    /// All slots in reading order (top-left first).
    pub const ALL: [Slot; 9] = [
        Slot::TopLeft,
        Slot::TopMiddle,
        Slot::TopRight,
        Slot::CenterLeft,
        Slot::CenterMiddle,
        Slot::CenterRight,
        Slot::BottomLeft,
        Slot::BottomMiddle,
        Slot::BottomRight,
    ];

    /// Wire name, e.g. `"center-middle"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Slot::TopLeft => "top-left",
            Slot::TopMiddle => "top-middle",
            Slot::TopRight => "top-right",
            Slot::CenterLeft => "center-left",
            Slot::CenterMiddle => "center-middle",
            Slot::CenterRight => "center-right",
            Slot::BottomLeft => "bottom-left",
            Slot::BottomMiddle => "bottom-middle",
            Slot::BottomRight => "bottom-right",
        }
    }

    /// Parse a raw slot name, falling back to [`Slot::CenterMiddle`] for anything unknown.
    ///
    /// Entry points (form input, presets, persisted records) use this instead of failing.
    pub fn parse_or_default(raw: &str) -> Self {
        raw.parse().unwrap_or_else(|_| {
            tracing::debug!(slot = raw, "unrecognized slot, using center-middle");
            Slot::default()
        })
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Slot {
    type Err = CollageError;

    fn from_str(s: &str) -> CollageResult<Self> {
        Slot::ALL
            .into_iter()
            .find(|slot| slot.as_str() == s.trim())
            .ok_or_else(|| CollageError::validation(format!("unknown slot '{s}'")))
    }
}

/// Discriminant of the closed layer variant set.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum LayerType {
    /// Styled text.
    Font,
    /// A single named icon.
    Icon,
    /// Icon flanked by text.
    IconCallout,
    /// A referenced image asset.
    Image,
}

impl LayerType {
    /// All known layer types.
    pub const ALL: [LayerType; 4] = [
        LayerType::Font,
        LayerType::Icon,
        LayerType::IconCallout,
        LayerType::Image,
    ];

    /// Wire name, e.g. `"icon-callout"`.
    pub fn as_str(self) -> &'static str {
        match self {
            LayerType::Font => "font",
            LayerType::Icon => "icon",
            LayerType::IconCallout => "icon-callout",
            LayerType::Image => "image",
        }
    }
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayerType {
    type Err = CollageError;

    fn from_str(s: &str) -> CollageResult<Self> {
        LayerType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CollageError::unknown_layer_type(s))
    }
}

/// Direction for within-slot reordering.
///
/// Slot stacks are listed front-first, so `Up` (-1) moves toward the front and `Down` (+1)
/// toward the back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// One step toward the front.
    Up,
    /// One step toward the back.
    Down,
}

impl Direction {
    /// Signed list offset (`Up = -1`, `Down = +1`).
    pub fn offset(self) -> i32 {
        match self {
            Direction::Up => -1,
            Direction::Down => 1,
        }
    }

    /// Map a signed list offset back to a direction; zero has none.
    pub fn from_offset(offset: i32) -> Option<Self> {
        match offset.signum() {
            -1 => Some(Direction::Up),
            1 => Some(Direction::Down),
            _ => None,
        }
    }
}
