//! Glyph lookup and rasterization.
//!
//! A glyph is the inner markup of a stroke-only icon drawn in a 24x24
//! viewbox, e.g. `<path d="M4 12h16"/>`. The engine wraps it in an SVG
//! envelope carrying the requested size and stroke color, then hands the
//! markup to a [`GlyphRasterizer`].

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};
use serde::{Deserialize, Serialize};

use crate::color::{Rgb8, to_hex};
use crate::error::GlyphError;

/// Edge of the normalized glyph coordinate space.
pub const GLYPH_VIEWBOX: u32 = 24;

/// Stroke width applied to every glyph, in viewbox units.
pub const GLYPH_STROKE_WIDTH: f32 = 1.5;

// ============================================================================
// GlyphSource
// ============================================================================

/// Read-only lookup from icon name to inner glyph markup.
///
/// Sources are shared across rasterization threads, hence the `Sync` bound.
pub trait GlyphSource: Sync {
    /// Returns the inner markup for `name`, or `None` if unknown.
    fn glyph(&self, name: &str) -> Option<&str>;
}

impl<K, V, S> GlyphSource for HashMap<K, V, S>
where
    K: Borrow<str> + Hash + Eq + Sync,
    V: AsRef<str> + Sync,
    S: BuildHasher + Sync,
{
    fn glyph(&self, name: &str) -> Option<&str> {
        self.get(name).map(AsRef::as_ref)
    }
}

impl<K, V> GlyphSource for BTreeMap<K, V>
where
    K: Borrow<str> + Ord + Sync,
    V: AsRef<str> + Sync,
{
    fn glyph(&self, name: &str) -> Option<&str> {
        self.get(name).map(AsRef::as_ref)
    }
}

impl<T: GlyphSource + ?Sized> GlyphSource for &T {
    fn glyph(&self, name: &str) -> Option<&str> {
        (**self).glyph(name)
    }
}

// ============================================================================
// GlyphLibrary
// ============================================================================

/// An owned, serializable glyph collection.
///
/// Serializes as a flat JSON object:
///
/// ```json
/// { "car": "<path d=\"...\"/>", "id": "<rect .../>" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlyphLibrary {
    glyphs: BTreeMap<String, String>,
}

impl GlyphLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a glyph, returning the previous markup if any.
    pub fn insert(&mut self, name: impl Into<String>, markup: impl Into<String>) -> Option<String> {
        self.glyphs.insert(name.into(), markup.into())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_glyph(mut self, name: impl Into<String>, markup: impl Into<String>) -> Self {
        self.insert(name, markup);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.glyphs.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Icon names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.glyphs.keys().map(String::as_str)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl GlyphSource for GlyphLibrary {
    fn glyph(&self, name: &str) -> Option<&str> {
        self.glyphs.get(name).map(String::as_str)
    }
}

impl<N: Into<String>, M: Into<String>> FromIterator<(N, M)> for GlyphLibrary {
    fn from_iter<I: IntoIterator<Item = (N, M)>>(iter: I) -> Self {
        Self {
            glyphs: iter
                .into_iter()
                .map(|(name, markup)| (name.into(), markup.into()))
                .collect(),
        }
    }
}

// ============================================================================
// Markup envelope
// ============================================================================

/// Wraps inner glyph markup in a standalone SVG document.
///
/// The document uses the fixed 24x24 viewbox, renders at `size` pixels and
/// strokes every shape with `color` using round caps and joins.
pub fn glyph_markup(inner: &str, size: u32, color: Rgb8) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {vb} {vb}" width="{size}" height="{size}" fill="none" stroke="{stroke}" stroke-width="{GLYPH_STROKE_WIDTH}" stroke-linecap="round" stroke-linejoin="round">{inner}</svg>"#,
        vb = GLYPH_VIEWBOX,
        stroke = to_hex(color),
    )
}

// ============================================================================
// Rasterization
// ============================================================================

/// Turns SVG markup into a square pixmap.
///
/// This is the platform seam of the engine: the compositor only needs
/// something that can produce a `size x size` premultiplied pixmap.
pub trait GlyphRasterizer: Sync {
    fn rasterize(&self, markup: &str, size: u32) -> Result<Pixmap, GlyphError>;
}

/// The default rasterizer, backed by resvg.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResvgRasterizer;

impl GlyphRasterizer for ResvgRasterizer {
    fn rasterize(&self, markup: &str, size: u32) -> Result<Pixmap, GlyphError> {
        let opts = Options::default();
        let tree = Tree::from_str(markup, &opts).map_err(|e| GlyphError::Parse(e.to_string()))?;

        let mut pixmap = Pixmap::new(size, size).ok_or(GlyphError::Allocation(size))?;

        // Fit the document into the square, whatever size it declares.
        let svg_size = tree.size();
        let scale = size as f32 / svg_size.width().max(svg_size.height());
        resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

        Ok(pixmap)
    }
}

/// Looks up `name`, wraps it and rasterizes it.
///
/// Returns `None` when the source has no glyph for `name`.
pub fn rasterize_glyph<G, R>(
    source: &G,
    rasterizer: &R,
    name: &str,
    size: u32,
    color: Rgb8,
) -> Option<Result<Pixmap, GlyphError>>
where
    G: GlyphSource + ?Sized,
    R: GlyphRasterizer + ?Sized,
{
    let inner = source.glyph(name)?;
    Some(rasterizer.rasterize(&glyph_markup(inner, size, color), size))
}

// ============================================================================
// Tests
// ============================================================================
