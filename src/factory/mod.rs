pub(crate) mod layer_factory;
pub(crate) mod preset;
