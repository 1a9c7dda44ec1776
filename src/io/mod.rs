//! Thin file glue around the conversion core.
//!
//! Everything here is IO: reading and writing GIF files through the `gif` crate, raster frame
//! directories through the `image` crate, and the JSON frame manifest that carries per-frame
//! delays between the two. The core functions never call into this module.

mod convert;
mod gif_file;
mod manifest;
mod png_dir;

pub use convert::{gif_to_png_dir, png_dir_to_gif};
pub use gif_file::{decode_gif, encode_gif, read_gif, write_gif};
pub use manifest::{FrameManifest, MANIFEST_FILE, ManifestEntry};
pub use png_dir::{read_frame_dir, write_png_dir};
