//! Error types for banner rendering.

use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a render or an export.
///
/// Degenerate configurations (no icons selected, nothing fits the canvas)
/// are not errors; see [`RenderOutcome`](crate::RenderOutcome) and
/// [`Advisory`](crate::Advisory).
#[derive(Error, Debug)]
pub enum Error {
    /// The target surface could not be allocated at the requested size.
    #[error("Cannot allocate a {width}x{height} surface")]
    SurfaceAllocation { width: u32, height: u32 },

    /// The surface was read or exported before anything was rendered.
    #[error("Surface has not been rendered yet")]
    Unallocated,

    /// A color string was not a valid hex RGB value.
    #[error("Invalid color: {0:?}")]
    InvalidColor(String),

    /// PNG encoding failed.
    #[error("Image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A failure confined to a single glyph.
///
/// The compositor logs and skips the glyph; this never escapes a render.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GlyphError {
    /// The wrapped SVG markup could not be parsed.
    #[error("Failed to parse glyph markup: {0}")]
    Parse(String),

    /// A pixmap could not be created for the glyph.
    #[error("Cannot allocate a {0}x{0} glyph pixmap")]
    Allocation(u32),
}
