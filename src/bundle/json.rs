//! Portable JSON bundle: a creation record plus the image assets it references.

use crate::foundation::error::{CollageError, CollageResult};
use crate::model::creation::Creation;
use crate::model::record::CreationRecord;
use crate::store::assets::{AssetChain, ImageRecord, ResolvedImage};
use crate::store::creations::CreationRepository;

/// Bundle format version written by [`export_bundle`].
pub const BUNDLE_VERSION: &str = "1.0";

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A self-contained export of one creation.
pub struct ExportBundle {
    /// Format version.
    pub version: String,
    /// RFC 3339 export timestamp.
    pub exported_at: String,
    /// The creation as persisted.
    pub creation: CreationRecord,
    /// Referenced images (background first), each embedded as a data URL.
    #[serde(default)]
    pub images: Vec<ImageRecord>,
}

impl ExportBundle {
    /// Pretty JSON text.
    pub fn to_json_pretty(&self) -> CollageResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse bundle JSON text.
    pub fn from_json(text: &str) -> CollageResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Collect creation `id` and every image it references that resolves in `assets`.
///
/// Unresolvable references are skipped.
#[tracing::instrument(skip(repo, assets))]
pub fn export_bundle(
    repo: &CreationRepository,
    assets: &AssetChain,
    id: &str,
) -> CollageResult<ExportBundle> {
    let creation = repo
        .get_record(id)?
        .ok_or_else(|| CollageError::validation(format!("creation '{id}' does not exist")))?;
    let images = creation
        .referenced_image_ids()
        .iter()
        .filter_map(|image_id| match assets.resolve(image_id) {
            ResolvedImage::Found(record) => Some(record),
            ResolvedImage::Missing(_) => None,
        })
        .collect();
    Ok(ExportBundle {
        version: BUNDLE_VERSION.to_string(),
        exported_at: chrono::Utc::now().to_rfc3339(),
        creation,
        images,
    })
}

/// Restore a bundle: store images no collaborator has yet, then save the creation as-is.
///
/// The creation is rehydrated and validated before anything is written, so a bundle with an
/// unknown layer type, a degenerate canvas or duplicate layer ids fails without side effects.
#[tracing::instrument(skip_all)]
pub fn import_bundle(
    text: &str,
    repo: &CreationRepository,
    assets: &AssetChain,
) -> CollageResult<Creation> {
    let bundle = ExportBundle::from_json(text)?;
    if bundle.version != BUNDLE_VERSION {
        tracing::warn!(version = %bundle.version, "importing bundle with unexpected version");
    }
    if bundle.creation.id.is_empty() {
        return Err(CollageError::validation("bundle creation has no id"));
    }
    let creation = repo.factory().creation_from_record(&bundle.creation)?;
    creation.validate()?;

    for image in &bundle.images {
        if assets.contains(&image.id) {
            tracing::debug!(image = %image.id, "image already present, not overwritten");
            continue;
        }
        assets.uploads().save(image)?;
    }
    repo.save_record(&bundle.creation)?;
    tracing::info!(creation = creation.id(), images = bundle.images.len(), "imported bundle");
    Ok(creation)
}

#[cfg(test)]
#[path = "../../tests/unit/bundle/json.rs"]
mod tests;
