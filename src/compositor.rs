//! Banner compositing.
//!
//! A render is a single independent pass over a [`Surface`]:
//!
//! ```text
//! allocate ─► background ─► empty selection? ──yes──► done (NoIcons)
//!                                │ no
//!                                ▼
//!                           plan grid ─► invalid? ──yes──► done (GridInfeasible)
//!                                │ no
//!                                ▼
//!                      rasterize distinct glyphs (parallel)
//!                                │
//!                                ▼
//!                     draw every cell ─► done (Drawn)
//! ```
//!
//! Nothing is kept between calls. Glyphs are rasterized once per distinct
//! name per call and dropped when the call returns, so a changed size or
//! color can never pick up stale pixels.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};
use rayon::prelude::*;
use resvg::tiny_skia::{BlendMode, Color, FilterQuality, Pixmap, PixmapPaint, Transform};

use crate::color::{Rgb8, percent_to_alpha, percent_to_opacity};
use crate::error::{GlyphError, Result};
use crate::glyph::{GlyphRasterizer, GlyphSource, ResvgRasterizer, rasterize_glyph};
use crate::grid::{AssignmentPolicy, GridPlan, LayoutConfig};
use crate::surface::Surface;

// ============================================================================
// RenderRequest
// ============================================================================

/// Everything a single render needs besides the glyph source.
#[derive(Debug, Clone)]
pub struct RenderRequest<'a> {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Icon names in selection order. Duplicates are allowed.
    pub icons: &'a [String],
    pub icon_size: i64,
    pub spacing: i64,
    pub padding: i64,
    /// Clockwise rotation of each glyph about its cell center, in degrees.
    pub rotation: f32,
    pub color: Rgb8,
    /// Icon opacity, 0-100.
    pub icon_opacity: u8,
    pub bg_color: Rgb8,
    /// Background opacity, 0-100. Zero leaves the surface transparent.
    pub bg_opacity: u8,
    pub assignment: AssignmentPolicy,
}

impl RenderRequest<'_> {
    /// The geometric part of the request.
    pub fn layout(&self) -> LayoutConfig {
        LayoutConfig::new(
            self.canvas_width,
            self.canvas_height,
            self.icon_size,
            self.spacing,
            self.padding,
        )
    }
}

// ============================================================================
// RenderOutcome
// ============================================================================

/// Which terminal state a successful render reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    /// The grid was drawn.
    Drawn,
    /// No icons were selected; only the background was drawn.
    NoIcons,
    /// No cell fits the canvas; only the background was drawn.
    GridInfeasible,
}

/// Summary of a successful render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutcome {
    pub status: RenderStatus,
    /// The grid plan, when one was computed.
    pub plan: Option<GridPlan>,
    /// Number of cells that received a glyph.
    pub cells_drawn: u64,
    /// Selected names that were missing from the source or failed to rasterize.
    pub skipped: Vec<String>,
}

impl RenderOutcome {
    fn early(status: RenderStatus, plan: Option<GridPlan>) -> Self {
        Self {
            status,
            plan,
            cells_drawn: 0,
            skipped: Vec::new(),
        }
    }
}

// ============================================================================
// Compositor
// ============================================================================

/// Draws icon grids onto surfaces.
///
/// The compositor itself is stateless; it only carries the rasterizer.
#[derive(Debug, Clone, Default)]
pub struct Compositor<R = ResvgRasterizer> {
    rasterizer: R,
}

impl Compositor {
    /// Creates a compositor using the resvg rasterizer.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: GlyphRasterizer> Compositor<R> {
    /// Creates a compositor with a custom rasterization backend.
    pub fn with_rasterizer(rasterizer: R) -> Self {
        Self { rasterizer }
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    /// Renders `request` into `surface`.
    ///
    /// The only error is failing to allocate the surface. Empty selections
    /// and grids where nothing fits succeed with a background-only surface;
    /// glyphs that are missing or fail to rasterize are skipped.
    pub fn render<G>(
        &self,
        surface: &mut Surface,
        glyphs: &G,
        request: &RenderRequest<'_>,
    ) -> Result<RenderOutcome>
    where
        G: GlyphSource + ?Sized,
    {
        let pixmap = surface.allocate(request.canvas_width, request.canvas_height)?;
        debug!(
            "rendering {}x{} banner with {} icon(s)",
            request.canvas_width,
            request.canvas_height,
            request.icons.len()
        );

        if request.bg_opacity > 0 {
            let bg = request.bg_color;
            pixmap.fill(Color::from_rgba8(
                bg.red,
                bg.green,
                bg.blue,
                percent_to_alpha(request.bg_opacity),
            ));
        }

        if request.icons.is_empty() {
            debug!("no icons selected, background only");
            return Ok(RenderOutcome::early(RenderStatus::NoIcons, None));
        }

        let plan = request.layout().plan();
        if !plan.valid {
            debug!("no cell fits the canvas, background only");
            return Ok(RenderOutcome::early(RenderStatus::GridInfeasible, Some(plan)));
        }
        debug!(
            "grid {}x{} ({} cells) at ({}, {})",
            plan.cols, plan.rows, plan.total, plan.offset_x, plan.offset_y
        );

        // A valid plan implies a positive icon size. Sizes past u32 cannot
        // be allocated and fail per glyph below.
        let size = u32::try_from(plan.icon_size).unwrap_or(u32::MAX);
        let (resolved, skipped) = self.rasterize_selection(glyphs, request.icons, size, request.color);

        let cells_drawn = draw_cells(pixmap, &plan, request, &resolved);
        debug!("drew {cells_drawn} of {} cells", plan.total);

        Ok(RenderOutcome {
            status: RenderStatus::Drawn,
            plan: Some(plan),
            cells_drawn,
            skipped,
        })
    }

    /// Rasterizes each distinct name once, in parallel.
    ///
    /// Returns the resolved glyphs by name and the names that were skipped,
    /// in first-selected order.
    fn rasterize_selection<'n, G>(
        &self,
        glyphs: &G,
        icons: &'n [String],
        size: u32,
        color: Rgb8,
    ) -> (HashMap<&'n str, Pixmap>, Vec<String>)
    where
        G: GlyphSource + ?Sized,
    {
        let mut seen = HashSet::new();
        let unique: Vec<&str> = icons
            .iter()
            .map(String::as_str)
            .filter(|name| seen.insert(*name))
            .collect();

        let results: Vec<(&str, Option<std::result::Result<Pixmap, GlyphError>>)> = unique
            .par_iter()
            .map(|&name| (name, rasterize_glyph(glyphs, &self.rasterizer, name, size, color)))
            .collect();

        let mut resolved = HashMap::with_capacity(results.len());
        let mut skipped = Vec::new();
        for (name, result) in results {
            match result {
                Some(Ok(pixmap)) => {
                    resolved.insert(name, pixmap);
                }
                Some(Err(e)) => {
                    warn!("skipping icon {name:?}: {e}");
                    skipped.push(name.to_string());
                }
                None => {
                    warn!("skipping icon {name:?}: not in glyph source");
                    skipped.push(name.to_string());
                }
            }
        }

        (resolved, skipped)
    }
}

/// Draws every placement whose glyph resolved. Returns the number drawn.
fn draw_cells(
    pixmap: &mut Pixmap,
    plan: &GridPlan,
    request: &RenderRequest<'_>,
    resolved: &HashMap<&str, Pixmap>,
) -> u64 {
    if request.icon_opacity == 0 || resolved.is_empty() {
        return 0;
    }

    let paint = PixmapPaint {
        opacity: percent_to_opacity(request.icon_opacity),
        blend_mode: BlendMode::SourceOver,
        quality: FilterQuality::Bilinear,
    };
    let half = plan.icon_size as f64 / 2.0;

    let mut drawn = 0;
    for cell in plan.placements(request.icons.len(), request.assignment) {
        let Some(glyph) = resolved.get(request.icons[cell.icon_index].as_str()) else {
            continue;
        };

        // Rotate about the cell center, then draw the glyph box centered there.
        let cx = (cell.x + half) as f32;
        let cy = (cell.y + half) as f32;
        let transform = Transform::from_translate(cx, cy)
            .pre_rotate(request.rotation)
            .pre_translate(-half as f32, -half as f32);

        pixmap.draw_pixmap(0, 0, glyph.as_ref(), &paint, transform, None);
        drawn += 1;
    }
    drawn
}

/// Renders with a default [`Compositor`].
pub fn render<G>(surface: &mut Surface, glyphs: &G, request: &RenderRequest<'_>) -> Result<RenderOutcome>
where
    G: GlyphSource + ?Sized,
{
    Compositor::new().render(surface, glyphs, request)
}

// ============================================================================
// Tests
// ============================================================================
