use crate::{
    foundation::core::{Canvas, PixelRect, Rgba8, TRANSPARENT},
    frame::raster::RasterFrame,
};

/// Per-pixel "must be re-specified" flags over a whole canvas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeltaMask {
    canvas: Canvas,
    bits: Vec<bool>,
}

impl DeltaMask {
    /// Mask with no pixel marked.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            bits: vec![false; canvas.pixel_count()],
        }
    }

    /// True when pixel `(x, y)` is marked.
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.bits[self.offset(x, y)]
    }

    /// Mark pixel `(x, y)`.
    pub fn set(&mut self, x: u32, y: u32) {
        let i = self.offset(x, y);
        self.bits[i] = true;
    }

    /// Mark every pixel.
    pub fn fill(&mut self) {
        self.bits.fill(true);
    }

    /// Number of marked pixels.
    pub fn changed_count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Smallest rectangle containing every marked pixel; [`PixelRect::EMPTY`] if none is marked.
    pub fn bounding_rect(&self) -> PixelRect {
        let (mut min_x, mut min_y) = (u32::MAX, u32::MAX);
        let (mut max_x, mut max_y) = (0u32, 0u32);
        let mut any = false;
        for y in 0..self.canvas.height {
            for x in 0..self.canvas.width {
                if self.get(x, y) {
                    any = true;
                    min_x = min_x.min(x);
                    min_y = min_y.min(y);
                    max_x = max_x.max(x);
                    max_y = max_y.max(y);
                }
            }
        }
        if !any {
            return PixelRect::EMPTY;
        }
        PixelRect::from_bounds(min_x, min_y, max_x + 1, max_y + 1)
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.canvas.width as usize) + (x as usize)
    }
}

/// Outcome of comparing one frame with its successor.
#[derive(Clone, Debug)]
pub struct Transition {
    /// Some pixel lost opacity, so the earlier frame must dispose to background and the later
    /// frame must be re-specified in full.
    pub reset: bool,
    /// Pixels of the later frame that differ from the earlier one (all of them on reset).
    pub mask: DeltaMask,
    /// Region the later frame has to cover.
    pub region: PixelRect,
}

/// Compare `prev` with `next` (same size) and decide mask, reset, and crop region.
pub fn diff_frames(prev: &RasterFrame, next: &RasterFrame) -> Transition {
    let canvas = prev.canvas();
    let mut mask = DeltaMask::new(canvas);
    let mut reset = false;
    for y in 0..canvas.height {
        for x in 0..canvas.width {
            let a = prev.pixel(x, y);
            let b = next.pixel(x, y);
            if b[3] < a[3] {
                reset = true;
            }
            if a != b {
                mask.set(x, y);
            }
        }
    }

    if reset {
        mask.fill();
        return Transition {
            reset,
            mask,
            region: canvas.full_rect(),
        };
    }
    let region = mask.bounding_rect();
    Transition {
        reset,
        mask,
        region,
    }
}

/// Colors of one frame restricted to the region it has to cover.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeltaRegion {
    /// Canvas-space region.
    pub rect: PixelRect,
    /// Row-major colors; unmarked pixels inside `rect` are [`TRANSPARENT`].
    pub pixels: Vec<Rgba8>,
    /// Every pixel is specified explicitly; transparent pixels must be drawn, not skipped.
    pub explicit: bool,
}

impl DeltaRegion {
    /// The whole of `frame`, every pixel explicit.
    pub fn full(frame: &RasterFrame) -> Self {
        let rect = frame.canvas().full_rect();
        Self {
            rect,
            pixels: frame.crop_pixels(rect),
            explicit: true,
        }
    }

    /// True when some pixel is fully transparent and therefore needs the transparent slot.
    pub fn needs_transparent_slot(&self) -> bool {
        self.pixels.iter().any(|p| p[3] == 0)
    }
}

/// Masked copy of `next` over `transition.region`.
pub fn extract_delta(next: &RasterFrame, transition: &Transition) -> DeltaRegion {
    let rect = transition.region;
    let mut pixels = Vec::with_capacity(rect.area());
    for y in rect.y..rect.y + rect.height {
        for x in rect.x..rect.x + rect.width {
            if transition.mask.get(x, y) {
                pixels.push(next.pixel(x, y));
            } else {
                pixels.push(TRANSPARENT);
            }
        }
    }
    DeltaRegion {
        rect,
        pixels,
        explicit: transition.reset,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/delta.rs"]
mod tests;
