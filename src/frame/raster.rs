use crate::foundation::core::{Canvas, PixelRect, Rgba8, TRANSPARENT};
use crate::foundation::error::{GifFramesError, GifFramesResult};

/// A full-canvas frame as straight-alpha RGBA8 pixels.
///
/// Decode direction: one `RasterFrame` per indexed input frame. Encode direction: the
/// caller-supplied input, where every frame of a sequence must share one size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterFrame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl RasterFrame {
    /// Allocate a fully transparent frame covering `canvas`.
    pub fn transparent(canvas: Canvas) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0; canvas.byte_len()],
        }
    }

    /// Fill a frame of `canvas` size with one color.
    pub fn solid(canvas: Canvas, color: Rgba8) -> Self {
        let mut data = Vec::with_capacity(canvas.byte_len());
        for _ in 0..canvas.pixel_count() {
            data.extend_from_slice(&color);
        }
        Self {
            width: canvas.width,
            height: canvas.height,
            data,
        }
    }

    /// Wrap an existing RGBA8 buffer, checking its length against the dimensions.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> GifFramesResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| GifFramesError::geometry("raster frame size overflow"))?;
        if data.len() != expected {
            return Err(GifFramesError::geometry(format!(
                "raster buffer holds {} bytes, {width}x{height} needs {expected}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Frame size as a [`Canvas`].
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Read one pixel. Out-of-range coordinates read as transparent.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba8 {
        if x >= self.width || y >= self.height {
            return TRANSPARENT;
        }
        let i = self.offset(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Overwrite one pixel. Out-of-range coordinates are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba8) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&color);
    }

    /// Copy the pixels of `rect` out of this frame, row-major.
    pub(crate) fn crop_pixels(&self, rect: PixelRect) -> Vec<Rgba8> {
        let mut out = Vec::with_capacity(rect.area());
        for y in rect.y..rect.y + rect.height {
            for x in rect.x..rect.x + rect.width {
                out.push(self.pixel(x, y));
            }
        }
        out
    }

    /// Copy `rect` from `src` into the same coordinates of this frame.
    pub(crate) fn copy_rect_from(&mut self, src: &[u8], rect: PixelRect) {
        let stride = self.width as usize * 4;
        let start = rect.x as usize * 4;
        let len = rect.width as usize * 4;
        for y in rect.y..rect.y + rect.height {
            let row = y as usize * stride + start;
            self.data[row..row + len].copy_from_slice(&src[row..row + len]);
        }
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/raster.rs"]
mod tests;
