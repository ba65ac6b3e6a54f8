pub(crate) mod fields;
pub(crate) mod form;
pub(crate) mod session;
