pub(crate) mod zorder;
