/// Convenience result type used across gifframes.
pub type GifFramesResult<T> = Result<T, GifFramesError>;

/// Top-level error taxonomy used by conversion APIs.
///
/// Every variant is fatal to the conversion call that produced it; no partial output is
/// returned alongside an error.
#[derive(thiserror::Error, Debug)]
pub enum GifFramesError {
    /// A sub-rectangle lies outside the canvas, or frame dimensions disagree.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Zero frames where at least one is required.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// More than 256 palette entries.
    #[error("palette overflow: {0}")]
    PaletteOverflow(String),

    /// Invalid user-provided frame data or options.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from codecs or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GifFramesError {
    /// Build a [`GifFramesError::InvalidGeometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::InvalidGeometry(msg.into())
    }

    /// Build a [`GifFramesError::EmptyInput`] value.
    pub fn empty(msg: impl Into<String>) -> Self {
        Self::EmptyInput(msg.into())
    }

    /// Build a [`GifFramesError::PaletteOverflow`] value.
    pub fn palette_overflow(msg: impl Into<String>) -> Self {
        Self::PaletteOverflow(msg.into())
    }

    /// Build a [`GifFramesError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Prefix the message with the frame position that produced it.
    pub(crate) fn in_frame(self, index: usize) -> Self {
        match self {
            Self::InvalidGeometry(m) => Self::InvalidGeometry(format!("frame {index}: {m}")),
            Self::EmptyInput(m) => Self::EmptyInput(format!("frame {index}: {m}")),
            Self::PaletteOverflow(m) => Self::PaletteOverflow(format!("frame {index}: {m}")),
            Self::Validation(m) => Self::Validation(format!("frame {index}: {m}")),
            Self::Other(e) => Self::Other(e.context(format!("frame {index}"))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
