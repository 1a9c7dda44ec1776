pub(crate) mod indexed;
pub(crate) mod raster;
