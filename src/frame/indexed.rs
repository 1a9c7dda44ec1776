use crate::foundation::core::{Canvas, Delay, PixelRect, Rgba8, TRANSPARENT};
use crate::foundation::error::{GifFramesError, GifFramesResult};

/// Hard cap on palette entries, including a reserved transparent slot.
pub const MAX_PALETTE_LEN: usize = 256;

/// What happens to the display canvas after a frame is shown, before the next one is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisposalMode {
    /// The canvas is reset to transparent before the next frame.
    #[default]
    RetainBackground,
    /// The canvas keeps this frame's result for the next frame.
    RetainPrevious,
}

/// Ordered colors of one indexed frame, with an optional reserved transparent slot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgba8>,
    transparent_slot: Option<u8>,
}

impl Palette {
    /// Palette of exactly `colors`, no reserved slot.
    pub fn new(colors: Vec<Rgba8>) -> GifFramesResult<Self> {
        Self::from_parts(colors, None)
    }

    /// Palette of `colors` followed by one fully transparent reserved slot.
    pub fn with_transparent_slot(mut colors: Vec<Rgba8>) -> GifFramesResult<Self> {
        let slot = colors.len();
        colors.push(TRANSPARENT);
        let slot = u8::try_from(slot).map_err(|_| {
            GifFramesError::palette_overflow(format!(
                "{} colors leave no room for a transparent slot",
                slot
            ))
        })?;
        Self::from_parts(colors, Some(slot))
    }

    /// Palette from raw parts; `transparent_slot` must index into `colors`.
    pub fn from_parts(colors: Vec<Rgba8>, transparent_slot: Option<u8>) -> GifFramesResult<Self> {
        if colors.len() > MAX_PALETTE_LEN {
            return Err(GifFramesError::palette_overflow(format!(
                "{} entries exceed the {MAX_PALETTE_LEN}-entry cap",
                colors.len()
            )));
        }
        if let Some(slot) = transparent_slot
            && usize::from(slot) >= colors.len()
        {
            return Err(GifFramesError::validation(format!(
                "transparent slot {slot} outside palette of {} entries",
                colors.len()
            )));
        }
        Ok(Self {
            colors,
            transparent_slot,
        })
    }

    /// All entries, including the reserved slot.
    pub fn colors(&self) -> &[Rgba8] {
        &self.colors
    }

    /// Index of the reserved transparent slot, if any.
    pub fn transparent_slot(&self) -> Option<u8> {
        self.transparent_slot
    }

    /// Entry count, including the reserved slot.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// True when the palette has no entries.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Look up one entry.
    pub fn get(&self, index: u8) -> Option<Rgba8> {
        self.colors.get(usize::from(index)).copied()
    }
}

/// Palette-indexed pixels confined to a sub-rectangle of the canvas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedFrame {
    /// Region of the canvas covered by `indices`.
    pub rect: PixelRect,
    /// Row-major palette indices, `rect.area()` entries.
    pub indices: Vec<u8>,
    /// Colors referenced by `indices`.
    pub palette: Palette,
    /// Index whose pixels are not drawn and reveal the canvas instead.
    pub transparent: Option<u8>,
    /// Canvas treatment after this frame.
    pub disposal: DisposalMode,
    /// Display time of this frame.
    pub delay: Delay,
}

impl IndexedFrame {
    /// A frame that updates no pixels but still occupies `delay`.
    pub fn empty(disposal: DisposalMode, delay: Delay) -> Self {
        Self {
            rect: PixelRect::EMPTY,
            indices: Vec::new(),
            palette: Palette::default(),
            transparent: None,
            disposal,
            delay,
        }
    }

    /// Check geometry and palette references against `canvas`.
    pub fn validate(&self, canvas: Canvas) -> GifFramesResult<()> {
        self.rect.ensure_fits(canvas, "frame sub-rectangle")?;
        if self.indices.len() != self.rect.area() {
            return Err(GifFramesError::geometry(format!(
                "frame holds {} indices, sub-rectangle {}x{} needs {}",
                self.indices.len(),
                self.rect.width,
                self.rect.height,
                self.rect.area()
            )));
        }
        if self.palette.len() > MAX_PALETTE_LEN {
            return Err(GifFramesError::palette_overflow(format!(
                "{} palette entries",
                self.palette.len()
            )));
        }
        if let Some(t) = self.transparent
            && usize::from(t) >= self.palette.len()
        {
            return Err(GifFramesError::validation(format!(
                "transparent index {t} outside palette of {} entries",
                self.palette.len()
            )));
        }
        let limit = self.palette.len();
        if let Some(&bad) = self.indices.iter().find(|&&i| usize::from(i) >= limit) {
            return Err(GifFramesError::validation(format!(
                "palette index {bad} outside palette of {limit} entries"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/indexed.rs"]
mod tests;
