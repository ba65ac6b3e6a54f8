pub(crate) mod creation;
pub(crate) mod layer;
pub(crate) mod record;
pub(crate) mod validate;
