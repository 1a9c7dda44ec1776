use smallvec::SmallVec;

use crate::{
    foundation::core::{Canvas, PixelRect},
    foundation::error::GifFramesResult,
    frame::indexed::IndexedFrame,
    frame::raster::RasterFrame,
    schedule::tiles::{Threading, TileMut, TileScheduler, split_tiles},
};

/// Reconstruct full-canvas frames from indexed frames using default [`Threading`].
///
/// See [`composite_with`].
pub fn composite(frames: &[IndexedFrame], canvas: Canvas) -> GifFramesResult<Vec<RasterFrame>> {
    let scheduler = TileScheduler::new(&Threading::default())?;
    composite_with(frames, canvas, &scheduler)
}

/// Reconstruct full-canvas frames from indexed frames.
///
/// A single background canvas, transparent at the start, is carried left to right. Each frame:
///
/// 1. inherits the background outside its sub-rectangle (see [`border_strips`]);
/// 2. inside its sub-rectangle, copies the background wherever the frame's transparent index
///    appears, and otherwise draws the palette color into both the output and the background.
///
/// Disposal modes are carried metadata only; the background is mutated solely by step 2.
/// Every frame is validated before any pixel work starts. An empty input yields an empty output.
#[tracing::instrument(skip(frames, scheduler), fields(frames = frames.len()))]
pub fn composite_with(
    frames: &[IndexedFrame],
    canvas: Canvas,
    scheduler: &TileScheduler,
) -> GifFramesResult<Vec<RasterFrame>> {
    if frames.is_empty() {
        return Ok(Vec::new());
    }
    canvas.validate()?;
    for (i, frame) in frames.iter().enumerate() {
        frame.validate(canvas).map_err(|e| e.in_frame(i))?;
    }

    let mut background = RasterFrame::transparent(canvas);
    let mut out = Vec::with_capacity(frames.len());
    for (i, frame) in frames.iter().enumerate() {
        tracing::trace!(frame = i, rect = ?frame.rect, "compositing");
        out.push(composite_frame(frame, &mut background, scheduler)?);
    }
    Ok(out)
}

fn composite_frame(
    frame: &IndexedFrame,
    background: &mut RasterFrame,
    scheduler: &TileScheduler,
) -> GifFramesResult<RasterFrame> {
    let canvas = background.canvas();
    let mut out = RasterFrame::transparent(canvas);

    for (_, strip) in border_strips(frame.rect, canvas) {
        out.copy_rect_from(&background.data, strip);
    }

    let plan = scheduler.plan(frame.rect);
    let out_tiles = split_tiles(&mut out.data, canvas.width, &plan)?;
    let bg_tiles = split_tiles(&mut background.data, canvas.width, &plan)?;
    scheduler.try_for_each(
        out_tiles.into_iter().zip(bg_tiles).collect(),
        |(mut out_tile, mut bg_tile)| {
            draw_tile(frame, &mut out_tile, &mut bg_tile);
            Ok(())
        },
    )?;
    Ok(out)
}

fn draw_tile(frame: &IndexedFrame, out: &mut TileMut<'_>, background: &mut TileMut<'_>) {
    let tile = out.rect();
    let colors = frame.palette.colors();
    let stride = frame.rect.width as usize;
    for y in tile.y..tile.y + tile.height {
        let row = (y - frame.rect.y) as usize * stride;
        for x in tile.x..tile.x + tile.width {
            let index = frame.indices[row + (x - frame.rect.x) as usize];
            if Some(index) == frame.transparent {
                out.set_pixel(x, y, background.pixel(x, y));
            } else {
                let color = colors[usize::from(index)];
                out.set_pixel(x, y, color);
                background.set_pixel(x, y, color);
            }
        }
    }
}

/// Side of the canvas a border strip sits on, relative to a frame's sub-rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BorderSide {
    /// Full canvas width, above the sub-rectangle.
    Top,
    /// Left of the sub-rectangle, spanning its rows.
    Left,
    /// Right of the sub-rectangle, spanning its rows.
    Right,
    /// Full canvas width, below the sub-rectangle.
    Bottom,
}

/// Regions of `canvas` not covered by `rect`, as up to four non-overlapping strips.
///
/// Zero-area strips are omitted, so a full-canvas `rect` yields nothing and an empty `rect`
/// yields strips covering the whole canvas.
pub fn border_strips(rect: PixelRect, canvas: Canvas) -> SmallVec<[(BorderSide, PixelRect); 4]> {
    let top = rect.y.min(canvas.height);
    let bottom = (rect.bottom().min(u64::from(canvas.height)) as u32).max(top);
    let left = rect.x.min(canvas.width);
    let right = (rect.right().min(u64::from(canvas.width)) as u32).max(left);

    [
        (BorderSide::Top, PixelRect::from_bounds(0, 0, canvas.width, top)),
        (BorderSide::Left, PixelRect::from_bounds(0, top, left, bottom)),
        (
            BorderSide::Right,
            PixelRect::from_bounds(right, top, canvas.width, bottom),
        ),
        (
            BorderSide::Bottom,
            PixelRect::from_bounds(0, bottom, canvas.width, canvas.height),
        ),
    ]
    .into_iter()
    .filter(|(_, r)| !r.is_empty())
    .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/composite/compositor.rs"]
mod tests;
