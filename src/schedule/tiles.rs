//! Fork-join scheduling of pixel tiles and independent frames.
//!
//! The scheduler owns no pixel data. Callers hand it either disjoint mutable tiles carved out of
//! their own buffers ([`split_tiles`]) or an indexed list of independent jobs, and it runs them
//! serially or on a rayon pool, joining before it returns. Results are always collected by input
//! index, so output order never depends on completion order.

use rayon::prelude::*;
use smallvec::{SmallVec, smallvec};

use crate::foundation::core::PixelRect;
use crate::foundation::error::{GifFramesError, GifFramesResult};

/// Default minimum width and height (in pixels) before a region is split into quadrants.
pub const DEFAULT_MIN_TILE_SIDE: u32 = 64;

/// Tile plan for one region: a single tile, four quadrants, or nothing for an empty region.
pub type TilePlan = SmallVec<[PixelRect; 4]>;

#[derive(Clone, Debug)]
/// Threading controls shared by the compositor and the delta encoder.
pub struct Threading {
    /// Enable parallel execution when `true`.
    pub parallel: bool,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
    /// Minimum region width and height before quadrant splitting kicks in.
    pub min_tile_side: u32,
}

impl Default for Threading {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: None,
            min_tile_side: DEFAULT_MIN_TILE_SIDE,
        }
    }
}

impl Threading {
    /// Single-threaded execution.
    pub fn serial() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }
}

/// Serial-or-parallel executor with a join barrier on every call.
pub struct TileScheduler {
    pool: Option<rayon::ThreadPool>,
    min_tile_side: u32,
}

impl std::fmt::Debug for TileScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileScheduler")
            .field("parallel", &self.pool.is_some())
            .field(
                "threads",
                &self.pool.as_ref().map(rayon::ThreadPool::current_num_threads),
            )
            .field("min_tile_side", &self.min_tile_side)
            .finish()
    }
}

impl TileScheduler {
    /// Build a scheduler, creating a dedicated rayon pool when `threading.parallel` is set.
    pub fn new(threading: &Threading) -> GifFramesResult<Self> {
        if threading.min_tile_side == 0 {
            return Err(GifFramesError::validation(
                "threading 'min_tile_side' must be >= 1",
            ));
        }
        let pool = if threading.parallel {
            Some(build_thread_pool(threading.threads)?)
        } else {
            None
        };
        Ok(Self {
            pool,
            min_tile_side: threading.min_tile_side,
        })
    }

    /// Scheduler that runs everything on the calling thread.
    pub fn serial() -> Self {
        Self {
            pool: None,
            min_tile_side: DEFAULT_MIN_TILE_SIDE,
        }
    }

    /// Decide how to tile `rect`.
    ///
    /// Regions at least `min_tile_side` on both sides are split into four quadrants when running
    /// in parallel; smaller regions stay whole to avoid scheduling overhead.
    pub fn plan(&self, rect: PixelRect) -> TilePlan {
        if rect.is_empty() {
            return TilePlan::new();
        }
        if self.pool.is_none()
            || rect.width < self.min_tile_side
            || rect.height < self.min_tile_side
        {
            return smallvec![rect];
        }
        quadrants(rect)
    }

    /// Run `f` over every item, joining before returning.
    ///
    /// The first error wins; remaining items may be skipped and no partial result escapes.
    pub fn try_for_each<T, F>(&self, items: Vec<T>, f: F) -> GifFramesResult<()>
    where
        T: Send,
        F: Fn(T) -> GifFramesResult<()> + Sync + Send,
    {
        match &self.pool {
            Some(pool) if items.len() > 1 => pool.install(|| items.into_par_iter().try_for_each(&f)),
            _ => items.into_iter().try_for_each(f),
        }
    }

    /// Compute `f(i)` for every `i in 0..len`, returning results in index order.
    pub fn try_map<R, F>(&self, len: usize, f: F) -> GifFramesResult<Vec<R>>
    where
        R: Send,
        F: Fn(usize) -> GifFramesResult<R> + Sync + Send,
    {
        match &self.pool {
            Some(pool) if len > 1 => pool.install(|| (0..len).into_par_iter().map(&f).collect()),
            _ => (0..len).map(f).collect(),
        }
    }
}

/// Split `rect` into up to four non-overlapping quadrants, dropping degenerate ones.
pub fn quadrants(rect: PixelRect) -> TilePlan {
    let half_w = rect.width / 2;
    let half_h = rect.height / 2;
    let candidates = [
        PixelRect::new(rect.x, rect.y, half_w, half_h),
        PixelRect::new(rect.x, rect.y + half_h, half_w, rect.height - half_h),
        PixelRect::new(rect.x + half_w, rect.y, rect.width - half_w, half_h),
        PixelRect::new(
            rect.x + half_w,
            rect.y + half_h,
            rect.width - half_w,
            rect.height - half_h,
        ),
    ];
    candidates.into_iter().filter(|r| !r.is_empty()).collect()
}

/// Mutable view of one tile: one byte slice per covered row, RGBA8.
#[derive(Debug)]
pub struct TileMut<'a> {
    rect: PixelRect,
    rows: Vec<&'a mut [u8]>,
}

impl TileMut<'_> {
    /// Canvas-space rectangle of this tile.
    pub fn rect(&self) -> PixelRect {
        self.rect
    }

    /// Bytes of canvas row `y` restricted to the tile, `rect.width * 4` long.
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        &mut self.rows[(y - self.rect.y) as usize]
    }

    /// Write one pixel at canvas coordinates.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        let i = ((x - self.rect.x) as usize) * 4;
        self.row_mut(y)[i..i + 4].copy_from_slice(&color);
    }

    /// Read one pixel at canvas coordinates.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let row = &self.rows[(y - self.rect.y) as usize];
        let i = ((x - self.rect.x) as usize) * 4;
        [row[i], row[i + 1], row[i + 2], row[i + 3]]
    }
}

/// Carve disjoint mutable tiles out of a row-major RGBA8 buffer `width` pixels wide.
///
/// Tiles are returned in the order of `rects`. Overlapping or out-of-bounds rectangles are
/// rejected, which is what makes handing the tiles to concurrent workers sound.
pub fn split_tiles<'a>(
    buf: &'a mut [u8],
    width: u32,
    rects: &[PixelRect],
) -> GifFramesResult<Vec<TileMut<'a>>> {
    let stride = width as usize * 4;
    if stride == 0 || !buf.len().is_multiple_of(stride) {
        return Err(GifFramesError::geometry(format!(
            "buffer of {} bytes is not a whole number of {width}-pixel rows",
            buf.len()
        )));
    }
    let height = (buf.len() / stride) as u64;
    for (i, r) in rects.iter().enumerate() {
        if r.right() > u64::from(width) || r.bottom() > height {
            return Err(GifFramesError::geometry(format!(
                "tile {r:?} exceeds buffer {width}x{height}"
            )));
        }
        if rects[..i].iter().any(|other| other.intersects(*r)) {
            return Err(GifFramesError::geometry(format!(
                "tile {r:?} overlaps another tile"
            )));
        }
    }

    let mut tiles: Vec<TileMut<'a>> = rects
        .iter()
        .map(|&rect| TileMut {
            rect,
            rows: Vec::with_capacity(rect.height as usize),
        })
        .collect();

    let mut order: Vec<usize> = Vec::with_capacity(rects.len());
    for (y, row) in buf.chunks_exact_mut(stride).enumerate() {
        let y = y as u32;
        order.clear();
        order.extend((0..rects.len()).filter(|&i| rects[i].contains_row(y)));
        if order.is_empty() {
            continue;
        }
        order.sort_by_key(|&i| rects[i].x);

        let mut rest: &'a mut [u8] = row;
        let mut consumed = 0usize;
        for &i in &order {
            let start = rects[i].x as usize * 4;
            let len = rects[i].width as usize * 4;
            let (_, tail) = std::mem::take(&mut rest).split_at_mut(start - consumed);
            let (segment, tail) = tail.split_at_mut(len);
            tiles[i].rows.push(segment);
            rest = tail;
            consumed = start + len;
        }
    }
    Ok(tiles)
}

fn build_thread_pool(threads: Option<usize>) -> GifFramesResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(GifFramesError::validation(
            "threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build rayon thread pool: {e}").into())
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/tiles.rs"]
mod tests;
