use std::path::Path;

use crate::{
    composite::compositor::composite_with,
    encode::encoder::{EncodeOpts, EncodeStats, encode_with_stats},
    encode::quantize::Quantizer,
    foundation::core::Delay,
    foundation::error::GifFramesResult,
    io::{
        gif_file::{read_gif, write_gif},
        manifest::{FrameManifest, ManifestEntry},
        png_dir::{read_frame_dir, write_png_dir},
    },
    schedule::tiles::TileScheduler,
};

/// Split a GIF file into a directory of full-canvas PNG frames plus a `frames.json` manifest.
#[tracing::instrument(skip(scheduler))]
pub fn gif_to_png_dir(
    input: &Path,
    output: &Path,
    scheduler: &TileScheduler,
) -> GifFramesResult<FrameManifest> {
    let anim = read_gif(input)?;
    let rasters = composite_with(&anim.frames, anim.canvas, scheduler)?;
    let names = write_png_dir(output, &rasters)?;

    let manifest = FrameManifest {
        canvas: anim.canvas,
        frames: names
            .into_iter()
            .zip(&anim.frames)
            .map(|(file, f)| ManifestEntry {
                file,
                delay: f.delay,
            })
            .collect(),
    };
    manifest.write(output)?;
    tracing::info!(frames = manifest.frames.len(), "extracted");
    Ok(manifest)
}

/// Assemble a directory of frame images into a GIF file.
///
/// Delays come from the directory's `frames.json` when present; frames it does not list use
/// `default_delay`.
#[tracing::instrument(skip(quantizer, opts, scheduler))]
pub fn png_dir_to_gif(
    input: &Path,
    output: &Path,
    default_delay: Delay,
    quantizer: &dyn Quantizer,
    opts: &EncodeOpts,
    scheduler: &TileScheduler,
) -> GifFramesResult<EncodeStats> {
    let named = read_frame_dir(input)?;
    let manifest = FrameManifest::read(input)?;

    let delays: Vec<Delay> = named
        .iter()
        .map(|(name, _)| {
            manifest
                .as_ref()
                .and_then(|m| m.delay_for(name))
                .unwrap_or(default_delay)
        })
        .collect();
    let frames: Vec<_> = named.into_iter().map(|(_, f)| f).collect();

    let (anim, stats) = encode_with_stats(&frames, &delays, quantizer, opts, scheduler)?;
    write_gif(output, &anim)?;
    tracing::info!(
        frames = stats.frames,
        cropped = stats.cropped_frames,
        "assembled"
    );
    Ok(stats)
}
