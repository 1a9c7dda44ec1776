pub(crate) mod delta;
pub(crate) mod encoder;
pub(crate) mod mapping;
pub(crate) mod quantize;
