/// Convenience result type used across collage.
pub type CollageResult<T> = Result<T, CollageError>;

/// Top-level error taxonomy used by the document model and its collaborators.
#[derive(thiserror::Error, Debug)]
pub enum CollageError {
    /// A layer type discriminant outside `font | icon | icon-callout | image`.
    #[error("unknown layer type: {0}")]
    UnknownLayerType(String),

    /// The preset collaborator has no default payload for the requested key.
    #[error("preset not found: {0}")]
    PresetNotFound(String),

    /// A non-positive or non-numeric canvas dimension.
    #[error("invalid dimension: {0}")]
    InvalidDimension(String),

    /// An image id that no asset collaborator knows about.
    #[error("reference not found: {0}")]
    ReferenceNotFound(String),

    /// Invalid user-provided or document data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Persistence collaborator failure (read, write, delete).
    #[error("storage error: {0}")]
    Storage(String),

    /// Errors when serializing or deserializing records.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CollageError {
    /// Build a [`CollageError::UnknownLayerType`] value.
    pub fn unknown_layer_type(tag: impl Into<String>) -> Self {
        Self::UnknownLayerType(tag.into())
    }

    /// Build a [`CollageError::PresetNotFound`] value.
    pub fn preset_not_found(key: impl Into<String>) -> Self {
        Self::PresetNotFound(key.into())
    }

    /// Build a [`CollageError::InvalidDimension`] value.
    pub fn invalid_dimension(msg: impl Into<String>) -> Self {
        Self::InvalidDimension(msg.into())
    }

    /// Build a [`CollageError::ReferenceNotFound`] value.
    pub fn reference_not_found(id: impl Into<String>) -> Self {
        Self::ReferenceNotFound(id.into())
    }

    /// Build a [`CollageError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CollageError::Storage`] value.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Build a [`CollageError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for CollageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

impl From<std::io::Error> for CollageError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
