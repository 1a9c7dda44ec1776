use std::{
    borrow::Cow,
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::Context as _;

use crate::{
    encode::encoder::EncodedAnimation,
    foundation::core::{Canvas, Delay, PixelRect, Rgba8, TRANSPARENT},
    foundation::error::{GifFramesError, GifFramesResult},
    frame::indexed::{DisposalMode, IndexedFrame, MAX_PALETTE_LEN, Palette},
};

/// Read a GIF file into indexed frames.
#[tracing::instrument]
pub fn read_gif(path: &Path) -> GifFramesResult<EncodedAnimation> {
    let file = File::open(path).with_context(|| format!("open gif '{}'", path.display()))?;
    decode_gif(BufReader::new(file))
}

/// Decode a GIF stream into indexed frames.
///
/// Frames keep their own sub-rectangle, palette (local, else global), delay, and transparent
/// index. GIF `Background` disposal becomes [`DisposalMode::RetainBackground`]; every other
/// method becomes [`DisposalMode::RetainPrevious`]. A full-canvas frame following a
/// background-disposed frame loses its transparent marker so its transparent entry is drawn
/// as a cleared pixel instead of revealing stale canvas content.
pub fn decode_gif<R: Read>(reader: R) -> GifFramesResult<EncodedAnimation> {
    let mut opts = gif::DecodeOptions::new();
    opts.set_color_output(gif::ColorOutput::Indexed);
    let mut decoder = opts.read_info(reader).context("read gif header")?;

    let canvas = Canvas::new(u32::from(decoder.width()), u32::from(decoder.height()))?;
    let global = decoder.global_palette().map(<[u8]>::to_vec);

    let mut frames = Vec::<IndexedFrame>::new();
    let mut prev_background = false;
    while let Some(frame) = decoder.read_next_frame().context("decode gif frame")? {
        let index = frames.len();
        let raw = frame
            .palette
            .as_deref()
            .or(global.as_deref())
            .ok_or_else(|| {
                GifFramesError::validation("frame has neither a local nor a global palette")
                    .in_frame(index)
            })?;
        let mut colors: Vec<Rgba8> = raw
            .chunks_exact(3)
            .take(MAX_PALETTE_LEN)
            .map(|c| [c[0], c[1], c[2], 255])
            .collect();

        let slot = frame.transparent.filter(|&t| usize::from(t) < colors.len());
        if let Some(t) = slot {
            colors[usize::from(t)] = TRANSPARENT;
        }

        let rect = PixelRect::new(
            u32::from(frame.left),
            u32::from(frame.top),
            u32::from(frame.width),
            u32::from(frame.height),
        );
        let transparent = if prev_background && rect.covers(canvas) {
            None
        } else {
            slot
        };
        let disposal = match frame.dispose {
            gif::DisposalMethod::Background => DisposalMode::RetainBackground,
            _ => DisposalMode::RetainPrevious,
        };
        prev_background = disposal == DisposalMode::RetainBackground;

        frames.push(IndexedFrame {
            rect,
            indices: frame.buffer.to_vec(),
            palette: Palette::from_parts(colors, slot).map_err(|e| e.in_frame(index))?,
            transparent,
            disposal,
            delay: Delay(frame.delay),
        });
    }
    tracing::debug!(frames = frames.len(), ?canvas, "decoded gif");

    Ok(EncodedAnimation { canvas, frames })
}

/// Write indexed frames to a GIF file.
#[tracing::instrument(skip(anim), fields(frames = anim.frames.len()))]
pub fn write_gif(path: &Path, anim: &EncodedAnimation) -> GifFramesResult<()> {
    let file = File::create(path).with_context(|| format!("create gif '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);
    encode_gif(&mut writer, anim)?;
    writer
        .flush()
        .with_context(|| format!("flush gif '{}'", path.display()))?;
    Ok(())
}

/// Encode indexed frames as a looping GIF stream.
///
/// `RetainBackground` is written as GIF `Background` only when the next frame re-specifies the
/// whole canvas; otherwise `Keep` is written so viewers do not clear pixels a cropped successor
/// relies on. A background-disposed frame smaller than the canvas is padded to the full canvas
/// with transparent pixels, since GIF disposal only clears the disposed frame's own rectangle.
/// Each palette's transparent slot is written as the GIF transparent index. Empty frames become
/// a single transparent pixel so their delay is preserved.
pub fn encode_gif<W: Write>(writer: W, anim: &EncodedAnimation) -> GifFramesResult<()> {
    let canvas = anim.canvas;
    let width = dim_u16(canvas.width, "canvas width")?;
    let height = dim_u16(canvas.height, "canvas height")?;

    let mut encoder = gif::Encoder::new(writer, width, height, &[]).context("write gif header")?;
    encoder
        .set_repeat(gif::Repeat::Infinite)
        .context("write gif loop extension")?;

    for (i, frame) in anim.frames.iter().enumerate() {
        frame.validate(canvas).map_err(|e| e.in_frame(i))?;
        let next_resets = anim
            .frames
            .get(i + 1)
            .is_some_and(|next| next.rect.covers(canvas) && next.transparent.is_none());
        let dispose = match frame.disposal {
            DisposalMode::RetainBackground if next_resets => gif::DisposalMethod::Background,
            _ => gif::DisposalMethod::Keep,
        };
        let source = if matches!(dispose, gif::DisposalMethod::Background) {
            pad_to_canvas(frame, canvas).map_err(|e| e.in_frame(i))?
        } else {
            Cow::Borrowed(frame)
        };
        let out = to_gif_frame(&source, dispose).map_err(|e| e.in_frame(i))?;
        encoder.write_frame(&out).context("write gif frame")?;
    }
    Ok(())
}

/// Grow `frame` to cover `canvas`, filling the new area with its transparent index.
///
/// Frames that already cover the canvas, and frames whose 256-entry palette has no transparent
/// index to spare, are returned unchanged.
fn pad_to_canvas(
    frame: &IndexedFrame,
    canvas: Canvas,
) -> GifFramesResult<Cow<'_, IndexedFrame>> {
    if frame.rect.covers(canvas) {
        return Ok(Cow::Borrowed(frame));
    }

    let mut colors = frame.palette.colors().to_vec();
    let slot = frame.palette.transparent_slot();
    let pad = match frame.transparent.or(slot) {
        Some(t) => t,
        None if colors.len() < MAX_PALETTE_LEN => {
            colors.push(TRANSPARENT);
            (colors.len() - 1) as u8
        }
        None => {
            tracing::warn!(
                rect = ?frame.rect,
                "no spare palette entry, disposal clears only the frame rect"
            );
            return Ok(Cow::Borrowed(frame));
        }
    };

    let stride = canvas.width as usize;
    let mut indices = vec![pad; canvas.pixel_count()];
    let src_width = frame.rect.width as usize;
    if src_width > 0 {
        for (row, src) in frame.indices.chunks_exact(src_width).enumerate() {
            let start = (frame.rect.y as usize + row) * stride + frame.rect.x as usize;
            indices[start..start + src_width].copy_from_slice(src);
        }
    }

    Ok(Cow::Owned(IndexedFrame {
        rect: canvas.full_rect(),
        indices,
        palette: Palette::from_parts(colors, slot.or(Some(pad)))?,
        transparent: Some(pad),
        disposal: frame.disposal,
        delay: frame.delay,
    }))
}

fn to_gif_frame(
    frame: &IndexedFrame,
    dispose: gif::DisposalMethod,
) -> GifFramesResult<gif::Frame<'_>> {
    let mut out = gif::Frame::default();
    out.delay = frame.delay.0;
    out.dispose = dispose;

    if frame.rect.is_empty() || frame.palette.is_empty() {
        out.width = 1;
        out.height = 1;
        out.palette = Some(vec![0, 0, 0]);
        out.transparent = Some(0);
        out.buffer = Cow::Owned(vec![0]);
        return Ok(out);
    }

    out.left = dim_u16(frame.rect.x, "frame left")?;
    out.top = dim_u16(frame.rect.y, "frame top")?;
    out.width = dim_u16(frame.rect.width, "frame width")?;
    out.height = dim_u16(frame.rect.height, "frame height")?;
    out.palette = Some(
        frame
            .palette
            .colors()
            .iter()
            .flat_map(|c| [c[0], c[1], c[2]])
            .collect(),
    );
    out.transparent = frame.transparent.or(frame.palette.transparent_slot());
    out.buffer = Cow::Borrowed(&frame.indices);
    Ok(out)
}

fn dim_u16(v: u32, what: &str) -> GifFramesResult<u16> {
    u16::try_from(v).map_err(|_| {
        GifFramesError::geometry(format!("{what} {v} exceeds the GIF limit of 65535"))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/io/gif_file.rs"]
mod tests;
