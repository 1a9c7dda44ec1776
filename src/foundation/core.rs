use crate::foundation::error::{GifFramesError, GifFramesResult};

/// Straight (non-premultiplied) RGBA8 color.
pub type Rgba8 = [u8; 4];

/// Fully transparent black, used for fresh canvases and the reserved palette slot.
pub const TRANSPARENT: Rgba8 = [0, 0, 0, 0];

/// Logical screen size shared by every frame of one animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Build a canvas, rejecting zero-sized dimensions.
    pub fn new(width: u32, height: u32) -> GifFramesResult<Self> {
        let canvas = Self { width, height };
        canvas.validate()?;
        Ok(canvas)
    }

    pub(crate) fn validate(self) -> GifFramesResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GifFramesError::geometry(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Rectangle covering the whole canvas.
    pub fn full_rect(self) -> PixelRect {
        PixelRect::new(0, 0, self.width, self.height)
    }

    /// Number of pixels on the canvas.
    pub fn pixel_count(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Length of an RGBA8 buffer covering the canvas.
    pub fn byte_len(self) -> usize {
        self.pixel_count() * 4
    }
}

/// Axis-aligned pixel rectangle, half-open on the right and bottom edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PixelRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelRect {
    /// The canonical empty rectangle.
    pub const EMPTY: Self = Self {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    /// Build a rectangle from origin and size.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle from inclusive-exclusive bounds; inverted bounds give an empty rect.
    pub fn from_bounds(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Self::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
    }

    /// Exclusive right edge.
    pub fn right(self) -> u64 {
        u64::from(self.x) + u64::from(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> u64 {
        u64::from(self.y) + u64::from(self.height)
    }

    /// True when the rectangle covers no pixels.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of covered pixels.
    pub fn area(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// True when the rectangle lies entirely inside `canvas`.
    pub fn fits(self, canvas: Canvas) -> bool {
        self.right() <= u64::from(canvas.width) && self.bottom() <= u64::from(canvas.height)
    }

    /// True when this rectangle is exactly the full canvas.
    pub fn covers(self, canvas: Canvas) -> bool {
        self == canvas.full_rect()
    }

    /// True when row `y` crosses the rectangle.
    pub fn contains_row(self, y: u32) -> bool {
        !self.is_empty() && y >= self.y && u64::from(y) < self.bottom()
    }

    /// True when two rectangles share at least one pixel.
    pub fn intersects(self, other: Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && u64::from(self.x) < other.right()
            && u64::from(other.x) < self.right()
            && u64::from(self.y) < other.bottom()
            && u64::from(other.y) < self.bottom()
    }

    pub(crate) fn ensure_fits(self, canvas: Canvas, what: &str) -> GifFramesResult<()> {
        if !self.fits(canvas) {
            return Err(GifFramesError::geometry(format!(
                "{what} {}x{}+{}+{} exceeds canvas {}x{}",
                self.width, self.height, self.x, self.y, canvas.width, canvas.height
            )));
        }
        Ok(())
    }
}

/// Frame display delay in hundredths of a second.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct Delay(pub u16);

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
