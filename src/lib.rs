//! Collage is the document model behind a layered image-composition editor.
//!
//! A [`Creation`] is a canvas with a background image and an ordered sequence of [`Layer`]s
//! (text, icons, icon callouts and images). Both are immutable values: every edit derives a
//! new snapshot and older snapshots stay valid for whoever holds them.
//!
//! # Pieces
//!
//! 1. **Model**: [`Creation`], [`Layer`], [`LayerContent`] and their with-ers.
//! 2. **Arrange**: dense `zIndex` repair plus front/back and within-slot moves.
//! 3. **Factory**: [`LayerFactory`] turns untyped payloads (presets, templates, stored records)
//!    into typed layers.
//! 4. **Preview**: [`PreviewMessage`] patches posted over a channel to a [`RenderSurface`],
//!    bypassing persistence while the user drags a slider or types.
//! 5. **Edit**: [`EditorSession`] commits form input and structural edits to a
//!    [`CreationRepository`], writing only when something changed.
//! 6. **Bundle**: portable JSON export/import with embedded images.
//!
//! `zIndex` is the single authoritative stacking key. Sequence order is storage order and
//! only breaks ties.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod arrange;
mod bundle;
mod config;
mod edit;
mod factory;
mod foundation;
mod model;
mod preview;
mod store;

pub use bundle::json::{BUNDLE_VERSION, ExportBundle, export_bundle, import_bundle};
pub use config::EditorConfig;
pub use edit::fields::{BackgroundField, FieldName, FormValues, LayerField, layer_field_name};
pub use edit::form::{
    DEFAULT_NAME_CAP, FontFormAdapter, IconCalloutFormAdapter, IconFormAdapter, ImageFormAdapter,
    LayerFormAdapter, LayerFormRegistry, apply_creation_fields,
};
pub use edit::session::{EditorSession, ViewToken};
pub use factory::layer_factory::LayerFactory;
pub use factory::preset::{DirPresetStore, MemoryPresetStore, PresetStore};
pub use foundation::core::{Direction, LayerType, Slot};
pub use foundation::error::{CollageError, CollageResult};
pub use foundation::ids::{IdGenerator, SequentialIds, UuidIdGenerator};
pub use foundation::markup::{cap_chars, render_markup};
pub use model::creation::{Creation, DEFAULT_TITLE};
pub use model::layer::{
    DEFAULT_Z_INDEX, FontContent, IconCalloutContent, IconContent, ImageContent, Layer,
    LayerContent, normalize_icon,
};
pub use model::record::CreationRecord;
pub use model::validate::parse_dimension;
pub use preview::channel::{PreviewReceiver, PreviewSender, preview_channel};
pub use preview::message::{BackgroundPatch, LayerPatch, PreviewMessage};
pub use preview::surface::{CanvasView, ImageSource, LayerNode, RenderSurface};
pub use store::assets::{AssetChain, ImageCategory, ImageRecord, ResolvedImage};
pub use store::creations::CreationRepository;
pub use store::document::{Document, DocumentStore, JsonDirStore, MemoryStore};
