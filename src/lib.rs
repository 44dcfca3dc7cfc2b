//! banner-renderer: tiled icon banner layout and rasterization
//!
//! This crate lays out a uniform grid of stroke icons over a canvas and
//! renders it to a pixel surface that can be previewed or exported as PNG.
//!
//! # Example
//!
//! ```
//! use banner_renderer::{BannerConfig, GlyphLibrary, Resolution, Surface};
//!
//! let glyphs = GlyphLibrary::new()
//!     .with_glyph("dot", r#"<circle cx="12" cy="12" r="3"/>"#)
//!     .with_glyph("bar", r#"<path d="M4 12h16"/>"#);
//!
//! let config = BannerConfig {
//!     resolution: Resolution::Custom { width: 320, height: 180 },
//!     selected_icons: vec!["dot".into(), "bar".into()],
//!     ..BannerConfig::default()
//! };
//! assert!(config.advisory().can_export());
//!
//! let mut surface = Surface::new();
//! let outcome = config.render(&mut surface, &glyphs).unwrap();
//! assert_eq!(outcome.cells_drawn, outcome.plan.unwrap().total);
//!
//! let png = surface.encode_png().unwrap();
//! assert!(!png.is_empty());
//! ```
//!
//! # Grid Planning
//!
//! The layout is pure arithmetic and can be used on its own:
//!
//! ```
//! use banner_renderer::plan;
//!
//! let grid = plan(1920, 1080, 24, 16, 0);
//! assert_eq!((grid.cols, grid.rows), (48, 27));
//! assert_eq!(grid.offset_x, 8.0);
//! ```

mod color;
mod compositor;
mod config;
mod error;
mod glyph;
mod grid;
mod preview;
mod prng;
mod surface;

pub use color::{Rgb8, parse_hex, percent_to_alpha, percent_to_opacity, to_hex};
pub use compositor::{Compositor, RenderOutcome, RenderRequest, RenderStatus, render};
pub use config::{Advisory, BannerConfig, DEFAULT_PREVIEW_HEIGHT, Resolution};
pub use error::{Error, GlyphError, Result};
pub use glyph::{
    GLYPH_STROKE_WIDTH, GLYPH_VIEWBOX, GlyphLibrary, GlyphRasterizer, GlyphSource,
    ResvgRasterizer, glyph_markup, rasterize_glyph,
};
pub use grid::{
    AssignmentPolicy, CellPlacement, GridPlan, LayoutConfig, Placements, placements, plan,
};
pub use preview::{DEFAULT_DEBOUNCE, PreviewSession};
pub use prng::Xorshift64;
pub use surface::{DEFAULT_EXPORT_NAME, Surface};
