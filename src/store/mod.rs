pub(crate) mod assets;
pub(crate) mod creations;
pub(crate) mod document;
