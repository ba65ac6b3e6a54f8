pub(crate) mod channel;
pub(crate) mod message;
pub(crate) mod surface;
