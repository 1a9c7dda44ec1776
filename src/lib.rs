//! gifframes converts between animated indexed-color frames and independent full-color frames.
//!
//! # Pipeline overview
//!
//! - **Composite** (decode direction): `[IndexedFrame] + Canvas -> [RasterFrame]`, carrying one
//!   background canvas across frames and honoring each frame's sub-rectangle and transparent
//!   index ([`composite`], [`composite_with`]).
//! - **Encode** (encode direction): `[RasterFrame] + [Delay] -> EncodedAnimation`, computing
//!   per-pair change regions, disposal modes, per-frame median-cut palettes, and index maps
//!   ([`encode`], [`encode_with_stats`]).
//! - **Schedule**: both directions fan work out through a [`TileScheduler`], either per pixel
//!   tile or per frame, joining before every next step. Output order always matches input order.
//!
//! The core never touches byte streams. The [`io`] module is thin glue around the `gif` and
//! `image` crates used by the `gifframes` binary.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate; disjoint tile writes are expressed with
//!   split borrows ([`split_tiles`]).
//! - **All-or-nothing**: inputs are validated before any worker runs; a failure anywhere aborts
//!   the whole call.
//! - **Straight RGBA8** end-to-end.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod composite;
mod encode;
mod foundation;
mod frame;
mod schedule;

pub mod io;

pub use composite::compositor::{BorderSide, border_strips, composite, composite_with};
pub use encode::delta::{DeltaMask, DeltaRegion, Transition, diff_frames, extract_delta};
pub use encode::encoder::{EncodeOpts, EncodeStats, EncodedAnimation, encode, encode_with_stats};
pub use encode::mapping::map_to_palette;
pub use encode::quantize::{Aggregation, MedianCut, Quantizer};
pub use foundation::core::{Canvas, Delay, PixelRect, Rgba8, TRANSPARENT};
pub use foundation::error::{GifFramesError, GifFramesResult};
pub use frame::indexed::{DisposalMode, IndexedFrame, MAX_PALETTE_LEN, Palette};
pub use frame::raster::RasterFrame;
pub use schedule::tiles::{
    DEFAULT_MIN_TILE_SIDE, Threading, TileMut, TilePlan, TileScheduler, quadrants, split_tiles,
};
