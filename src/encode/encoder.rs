use crate::{
    encode::delta::{DeltaRegion, Transition, diff_frames, extract_delta},
    encode::mapping::map_to_palette,
    encode::quantize::{MedianCut, Quantizer},
    foundation::core::{Canvas, Delay},
    foundation::error::{GifFramesError, GifFramesResult},
    frame::indexed::{DisposalMode, IndexedFrame, MAX_PALETTE_LEN},
    frame::raster::RasterFrame,
    schedule::tiles::{Threading, TileScheduler},
};

#[derive(Clone, Debug)]
/// Delta encoder options.
pub struct EncodeOpts {
    /// Palette budget per frame, including the transparent slot when one is needed.
    pub max_colors: usize,
}

impl Default for EncodeOpts {
    fn default() -> Self {
        Self {
            max_colors: MAX_PALETTE_LEN,
        }
    }
}

/// Indexed frames plus the canvas they are positioned on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedAnimation {
    /// Logical screen size.
    pub canvas: Canvas,
    /// Frames in input order.
    pub frames: Vec<IndexedFrame>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Aggregated encoding counters.
pub struct EncodeStats {
    /// Total frames encoded.
    pub frames: u64,
    /// Frames re-specified over the whole canvas (the first frame and every reset).
    pub full_frames: u64,
    /// Frames cropped to a partial changed region.
    pub cropped_frames: u64,
    /// Frames with no changed pixel.
    pub empty_frames: u64,
    /// Sum of encoded sub-rectangle areas.
    pub encoded_pixels: u64,
}

/// Encode raster frames with median-cut palettes, default options, and default [`Threading`].
pub fn encode(frames: &[RasterFrame], delays: &[Delay]) -> GifFramesResult<EncodedAnimation> {
    let scheduler = TileScheduler::new(&Threading::default())?;
    encode_with_stats(
        frames,
        delays,
        &MedianCut::default(),
        &EncodeOpts::default(),
        &scheduler,
    )
    .map(|(anim, _)| anim)
}

/// Encode raster frames into delta-cropped indexed frames and report counters.
///
/// Stages, each a full fan-out joined before the next one starts:
///
/// 1. compare every adjacent pair, deciding reset and crop region ([`diff_frames`]);
/// 2. extract each frame's region (the first frame is taken whole);
/// 3. quantize every region independently through `quantizer`;
/// 4. map every region to its palette.
///
/// Frame 0 always disposes to background. Frame `i` disposes to background when frame `i + 1`
/// lowers some pixel's alpha; frame `i + 1` then covers the whole canvas with no transparent
/// marker. Other frames keep the canvas and use the palette's transparent slot, if any, for
/// pixels inside their region that did not change.
#[tracing::instrument(skip_all, fields(frames = frames.len()))]
pub fn encode_with_stats(
    frames: &[RasterFrame],
    delays: &[Delay],
    quantizer: &dyn Quantizer,
    opts: &EncodeOpts,
    scheduler: &TileScheduler,
) -> GifFramesResult<(EncodedAnimation, EncodeStats)> {
    let canvas = validate_inputs(frames, delays, opts)?;
    let n = frames.len();

    let transitions: Vec<Transition> =
        scheduler.try_map(n - 1, |i| Ok(diff_frames(&frames[i], &frames[i + 1])))?;

    let mut disposals = vec![DisposalMode::RetainPrevious; n];
    disposals[0] = DisposalMode::RetainBackground;
    for (i, t) in transitions.iter().enumerate() {
        if t.reset {
            tracing::debug!(frame = i, "opacity drop, disposing to background");
            disposals[i] = DisposalMode::RetainBackground;
        }
    }

    let regions: Vec<DeltaRegion> = scheduler.try_map(n, |i| {
        Ok(if i == 0 {
            DeltaRegion::full(&frames[0])
        } else {
            extract_delta(&frames[i], &transitions[i - 1])
        })
    })?;
    drop(transitions);

    let palettes = scheduler.try_map(n, |i| {
        let region = &regions[i];
        let palette = quantizer
            .quantize(
                &region.pixels,
                opts.max_colors,
                region.needs_transparent_slot(),
            )
            .map_err(|e| e.in_frame(i))?;
        if palette.len() > opts.max_colors {
            return Err(GifFramesError::palette_overflow(format!(
                "quantizer returned {} entries for a budget of {}",
                palette.len(),
                opts.max_colors
            ))
            .in_frame(i));
        }
        Ok(palette)
    })?;

    let indexed = scheduler.try_map(n, |i| {
        let region = &regions[i];
        let palette = palettes[i].clone();
        let indices = map_to_palette(&region.pixels, &palette);
        let transparent = if region.explicit {
            None
        } else {
            palette.transparent_slot()
        };
        Ok(IndexedFrame {
            rect: region.rect,
            indices,
            palette,
            transparent,
            disposal: disposals[i],
            delay: delays[i],
        })
    })?;

    let mut stats = EncodeStats {
        frames: n as u64,
        ..EncodeStats::default()
    };
    for (frame, region) in indexed.iter().zip(&regions) {
        stats.encoded_pixels += frame.rect.area() as u64;
        if region.explicit {
            stats.full_frames += 1;
        } else if frame.rect.is_empty() {
            stats.empty_frames += 1;
        } else {
            stats.cropped_frames += 1;
        }
    }
    tracing::debug!(?stats, "encoded");

    Ok((
        EncodedAnimation {
            canvas,
            frames: indexed,
        },
        stats,
    ))
}

fn validate_inputs(
    frames: &[RasterFrame],
    delays: &[Delay],
    opts: &EncodeOpts,
) -> GifFramesResult<Canvas> {
    let Some(first) = frames.first() else {
        return Err(GifFramesError::empty(
            "at least one raster frame is required to infer the canvas",
        ));
    };
    if delays.len() != frames.len() {
        return Err(GifFramesError::validation(format!(
            "{} delays for {} frames",
            delays.len(),
            frames.len()
        )));
    }
    if opts.max_colors == 0 || opts.max_colors > MAX_PALETTE_LEN {
        return Err(GifFramesError::validation(format!(
            "max_colors must be within 1..={MAX_PALETTE_LEN}, got {}",
            opts.max_colors
        )));
    }

    let canvas = first.canvas();
    canvas.validate()?;
    for (i, f) in frames.iter().enumerate() {
        if f.canvas() != canvas {
            return Err(GifFramesError::geometry(format!(
                "{}x{} differs from first frame {}x{}",
                f.width, f.height, canvas.width, canvas.height
            ))
            .in_frame(i));
        }
        if f.data.len() != canvas.byte_len() {
            return Err(GifFramesError::geometry(format!(
                "buffer holds {} bytes, expected {}",
                f.data.len(),
                canvas.byte_len()
            ))
            .in_frame(i));
        }
    }
    Ok(canvas)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/encoder.rs"]
mod tests;
