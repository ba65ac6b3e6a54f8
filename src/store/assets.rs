//! Image asset records and the ordered chain of asset collaborators.
//!
//! Image bytes are opaque to the document model: layers and the background only hold an id.
//! The render surface and the JSON bundle resolve ids through an [`AssetChain`].

use std::fmt;
use std::io::Cursor;
use std::sync::Arc;

use crate::foundation::error::{CollageError, CollageResult};
use crate::store::document::{Document, DocumentStore};

/// What an asset was uploaded or shipped as.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageCategory {
    /// Canvas background.
    Background,
    /// Image layer content.
    #[default]
    Image,
}

impl ImageCategory {
    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            ImageCategory::Background => "background",
            ImageCategory::Image => "image",
        }
    }
}

impl std::str::FromStr for ImageCategory {
    type Err = CollageError;

    fn from_str(s: &str) -> CollageResult<Self> {
        match s {
            "background" => Ok(ImageCategory::Background),
            "image" => Ok(ImageCategory::Image),
            other => Err(CollageError::validation(format!(
                "unknown image category '{other}'"
            ))),
        }
    }
}

#[derive(Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A stored image asset. `imageBlob` travels as a `data:<mime>;base64,...` URL.
pub struct ImageRecord {
    /// Asset id referenced by `backgroundImageId` / `imageId`.
    pub id: String,
    /// Upload category.
    #[serde(default)]
    pub category: ImageCategory,
    /// Encoded image bytes (PNG, JPEG, ...).
    #[serde(with = "data_url")]
    pub image_blob: Vec<u8>,
}

impl fmt::Debug for ImageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageRecord")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("bytes", &self.image_blob.len())
            .finish()
    }
}

impl ImageRecord {
    /// Wrap encoded image bytes.
    pub fn new(id: impl Into<String>, category: ImageCategory, bytes: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            category,
            image_blob: bytes,
        }
    }

    /// Mime type sniffed from the header bytes.
    pub fn mime_type(&self) -> &'static str {
        sniff_mime(&self.image_blob)
    }

    /// Natural pixel size, decoded from the header only.
    pub fn dimensions(&self) -> CollageResult<(u32, u32)> {
        image::ImageReader::new(Cursor::new(&self.image_blob))
            .with_guessed_format()
            .map_err(|e| CollageError::validation(format!("image '{}': {e}", self.id)))?
            .into_dimensions()
            .map_err(|e| CollageError::validation(format!("image '{}': {e}", self.id)))
    }

    /// The blob as a `data:` URL.
    pub fn to_data_url(&self) -> String {
        data_url::encode(&self.image_blob)
    }
}

impl Document for ImageRecord {
    fn id(&self) -> &str {
        &self.id
    }
}

fn sniff_mime(bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream")
}

mod data_url {
    use base64ct::{Base64, Encoding};

    pub(super) fn encode(bytes: &[u8]) -> String {
        format!(
            "data:{};base64,{}",
            super::sniff_mime(bytes),
            Base64::encode_string(bytes)
        )
    }

    pub(super) fn decode(raw: &str) -> Result<Vec<u8>, String> {
        let payload = match raw.strip_prefix("data:") {
            Some(rest) => {
                let (meta, data) = rest
                    .split_once(',')
                    .ok_or_else(|| "data URL without ','".to_string())?;
                if !meta.ends_with(";base64") {
                    return Err(format!("data URL is not base64 ({meta})"));
                }
                data
            }
            None => raw,
        };
        Base64::decode_vec(payload.trim()).map_err(|e| format!("invalid base64: {e}"))
    }

    pub(super) fn serialize<S: serde::Serializer>(
        bytes: &[u8],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode(bytes))
    }

    pub(super) fn deserialize<'de, D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<u8>, D::Error> {
        let raw: String = serde::Deserialize::deserialize(deserializer)?;
        decode(&raw).map_err(serde::de::Error::custom)
    }
}

/// Outcome of resolving an image id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolvedImage {
    /// The first collaborator that knows the id.
    Found(ImageRecord),
    /// No collaborator knows the id; render as blank/placeholder.
    Missing(String),
}

impl ResolvedImage {
    /// The record, if found.
    pub fn found(self) -> Option<ImageRecord> {
        match self {
            ResolvedImage::Found(record) => Some(record),
            ResolvedImage::Missing(_) => None,
        }
    }
}

/// Ordered list of image collaborators. The first entry receives uploads and imports.
#[derive(Clone)]
pub struct AssetChain {
    sources: Vec<Arc<dyn DocumentStore<ImageRecord>>>,
}

impl fmt::Debug for AssetChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetChain")
            .field("sources", &self.sources.len())
            .finish()
    }
}

impl AssetChain {
    /// Chain whose first (writable) collaborator is `uploads`.
    pub fn new(uploads: Arc<dyn DocumentStore<ImageRecord>>) -> Self {
        Self {
            sources: vec![uploads],
        }
    }

    /// Append a read-side collaborator (preset backgrounds, preset images, ...).
    pub fn with_source(mut self, source: Arc<dyn DocumentStore<ImageRecord>>) -> Self {
        self.sources.push(source);
        self
    }

    /// The collaborator uploads and imports are written to.
    pub fn uploads(&self) -> &dyn DocumentStore<ImageRecord> {
        self.sources[0].as_ref()
    }

    /// Look `id` up in order. Lookup failures and unknown ids both resolve to `Missing`.
    pub fn resolve(&self, id: &str) -> ResolvedImage {
        for source in &self.sources {
            match source.get(id) {
                Ok(Some(record)) => return ResolvedImage::Found(record),
                Ok(None) => {}
                Err(err) => tracing::warn!(image = id, error = %err, "asset lookup failed"),
            }
        }
        let err = CollageError::reference_not_found(id);
        tracing::warn!(error = %err, "rendering without image");
        ResolvedImage::Missing(id.to_string())
    }

    /// True when some collaborator holds `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.sources
            .iter()
            .any(|s| matches!(s.get(id), Ok(Some(_))))
    }

    /// Store an uploaded image in the uploads collaborator.
    #[tracing::instrument(skip(self, bytes))]
    pub fn upload(
        &self,
        id: &str,
        category: ImageCategory,
        bytes: Vec<u8>,
    ) -> CollageResult<ImageRecord> {
        let record = ImageRecord::new(id, category, bytes);
        if image::guess_format(&record.image_blob).is_err() {
            return Err(CollageError::validation(format!(
                "upload '{id}' is not a recognized image"
            )));
        }
        self.uploads().save(&record)?;
        Ok(record)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/assets.rs"]
mod tests;
