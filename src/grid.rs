//! Grid planning and per-cell icon placement.
//!
//! [`plan`] turns a canvas size and layout parameters into a centered
//! [`GridPlan`]. [`GridPlan::placements`] then walks the occupied cells in
//! row-major order and assigns an icon to each one.
//!
//! Planning never fails. Inputs that leave no room for a single cell
//! (negative usable area, non-positive icon size, oversized spacing) produce
//! a plan with `valid == false` and zero cells, which callers must check
//! before drawing.

use serde::{Deserialize, Serialize};

use crate::prng::Xorshift64;

// ============================================================================
// LayoutConfig
// ============================================================================

/// The geometric inputs of a grid plan.
///
/// Icon size, spacing and padding are signed: the planner accepts any value
/// and resolves nonsensical combinations to an invalid plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Edge of the square glyph box in pixels.
    pub icon_size: i64,
    /// Gap between adjacent cell edges in pixels.
    pub spacing: i64,
    /// Uniform margin between the canvas edge and the usable area.
    pub padding: i64,
}

impl LayoutConfig {
    pub fn new(
        canvas_width: u32,
        canvas_height: u32,
        icon_size: i64,
        spacing: i64,
        padding: i64,
    ) -> Self {
        Self {
            canvas_width,
            canvas_height,
            icon_size,
            spacing,
            padding,
        }
    }

    /// Computes the grid plan for this layout.
    pub fn plan(&self) -> GridPlan {
        let (usable_w, cols) = fit_axis(self.canvas_width, self);
        let (usable_h, rows) = fit_axis(self.canvas_height, self);

        // A plan is all or nothing: one empty axis empties both.
        let valid = cols > 0 && rows > 0;
        let (cols, rows) = if valid { (cols, rows) } else { (0, 0) };

        let stride = self.icon_size.saturating_add(self.spacing);
        GridPlan {
            cols,
            rows,
            offset_x: axis_offset(usable_w, cols, stride, self.spacing, self.padding),
            offset_y: axis_offset(usable_h, rows, stride, self.spacing, self.padding),
            total: cols.saturating_mul(rows),
            valid,
            icon_size: self.icon_size,
            spacing: self.spacing,
        }
    }
}

/// Plans a grid for the given canvas and layout parameters.
///
/// Shorthand for [`LayoutConfig::plan`].
pub fn plan(
    canvas_width: u32,
    canvas_height: u32,
    icon_size: i64,
    spacing: i64,
    padding: i64,
) -> GridPlan {
    LayoutConfig::new(canvas_width, canvas_height, icon_size, spacing, padding).plan()
}

/// Returns `(usable extent, cell count)` along one axis.
fn fit_axis(extent: u32, layout: &LayoutConfig) -> (i64, u64) {
    let usable = i64::from(extent).saturating_sub(layout.padding.saturating_mul(2));
    let stride = layout.icon_size.saturating_add(layout.spacing);

    if layout.icon_size <= 0 || stride <= 0 {
        return (usable, 0);
    }

    // div_euclid is a true floor for a positive divisor.
    let count = usable.div_euclid(stride).max(0) as u64;
    (usable, count)
}

/// Offset of the first cell so the occupied block sits centered in the
/// usable area. Only inter-cell gaps count toward the block extent.
fn axis_offset(usable: i64, count: u64, stride: i64, spacing: i64, padding: i64) -> f64 {
    let occupied = count as f64 * stride as f64 - spacing as f64;
    padding as f64 + (usable as f64 - occupied) / 2.0
}

// ============================================================================
// GridPlan
// ============================================================================

/// A computed grid of icon cells.
///
/// `valid` is true iff at least one full cell fits on both axes. An invalid
/// plan has `cols == rows == total == 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPlan {
    pub cols: u64,
    pub rows: u64,
    /// X coordinate of the first cell's top-left corner. May be fractional.
    pub offset_x: f64,
    /// Y coordinate of the first cell's top-left corner. May be fractional.
    pub offset_y: f64,
    pub total: u64,
    pub valid: bool,
    /// Icon size the plan was computed for.
    pub icon_size: i64,
    /// Spacing the plan was computed for.
    pub spacing: i64,
}

impl GridPlan {
    /// Distance between adjacent cell origins.
    pub fn stride(&self) -> i64 {
        self.icon_size.saturating_add(self.spacing)
    }

    /// Width of the occupied block, from the first cell's left edge to the
    /// last cell's right edge.
    pub fn block_width(&self) -> f64 {
        self.cols as f64 * self.stride() as f64 - self.spacing as f64
    }

    /// Height of the occupied block.
    pub fn block_height(&self) -> f64 {
        self.rows as f64 * self.stride() as f64 - self.spacing as f64
    }

    /// Iterates over every occupied cell, assigning icons by `policy`.
    ///
    /// Yields nothing when the plan is invalid or `icon_count` is zero.
    pub fn placements(&self, icon_count: usize, policy: AssignmentPolicy) -> Placements {
        Placements::new(*self, icon_count, policy)
    }
}

// ============================================================================
// Icon assignment
// ============================================================================

/// How icons from the selection are assigned to cells.
///
/// ```json
/// { "kind": "round-robin" }
/// // or
/// { "kind": "random", "seed": 42 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum AssignmentPolicy {
    /// Cell `n` in row-major order gets icon `n % icon_count`.
    #[default]
    RoundRobin,

    /// Each cell gets a uniformly random icon, drawn from a generator
    /// seeded with `seed`. The same seed reproduces the same pattern.
    Random { seed: u64 },
}

#[derive(Debug, Clone)]
enum Assigner {
    RoundRobin,
    Random(Xorshift64),
}

impl Assigner {
    fn assign(&mut self, cell_index: u64, icon_count: usize) -> usize {
        match self {
            Self::RoundRobin => (cell_index % icon_count as u64) as usize,
            Self::Random(rng) => rng.next_below(icon_count),
        }
    }
}

// ============================================================================
// Placements
// ============================================================================

/// One occupied cell and the icon assigned to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellPlacement {
    pub row: u64,
    pub col: u64,
    /// Top-left corner of the cell.
    pub x: f64,
    pub y: f64,
    /// Index into the icon selection.
    pub icon_index: usize,
}

/// Row-major iterator over the cells of a [`GridPlan`].
///
/// Building a new iterator from the same plan, count and policy always
/// yields the same sequence.
#[derive(Debug, Clone)]
pub struct Placements {
    plan: GridPlan,
    icon_count: usize,
    next: u64,
    end: u64,
    assigner: Assigner,
}

impl Placements {
    fn new(plan: GridPlan, icon_count: usize, policy: AssignmentPolicy) -> Self {
        let end = if plan.valid && icon_count > 0 {
            plan.total
        } else {
            0
        };
        let assigner = match policy {
            AssignmentPolicy::RoundRobin => Assigner::RoundRobin,
            AssignmentPolicy::Random { seed } => Assigner::Random(Xorshift64::new(seed)),
        };
        Self {
            plan,
            icon_count,
            next: 0,
            end,
            assigner,
        }
    }
}

impl Iterator for Placements {
    type Item = CellPlacement;

    fn next(&mut self) -> Option<CellPlacement> {
        if self.next >= self.end {
            return None;
        }
        let index = self.next;
        self.next += 1;

        let row = index / self.plan.cols;
        let col = index % self.plan.cols;
        let stride = self.plan.stride() as f64;

        Some(CellPlacement {
            row,
            col,
            x: self.plan.offset_x + col as f64 * stride,
            y: self.plan.offset_y + row as f64 * stride,
            icon_index: self.assigner.assign(index, self.icon_count),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.end - self.next).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

/// Round-robin placements for `plan`.
pub fn placements(plan: &GridPlan, icon_count: usize) -> Placements {
    plan.placements(icon_count, AssignmentPolicy::RoundRobin)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_hd_default_layout() {
        let grid = plan(1920, 1080, 24, 16, 0);
        assert!(grid.valid);
        assert_eq!(grid.cols, 48);
        assert_eq!(grid.rows, 27);
        assert_eq!(grid.total, 1296);
        // Only the trailing gap is left over, split evenly.
        assert_eq!(grid.offset_x, 8.0);
        assert_eq!(grid.offset_y, 8.0);
    }

    #[test]
    fn oversized_icon_is_invalid() {
        let grid = plan(100, 100, 200, 0, 0);
        assert!(!grid.valid);
        assert_eq!(grid.cols, 0);
        assert_eq!(grid.rows, 0);
        assert_eq!(grid.total, 0);
    }

    #[test]
    fn one_empty_axis_empties_both() {
        // Wide enough for many columns, too short for one row.
        let grid = plan(1000, 20, 24, 0, 0);
        assert!(!grid.valid);
        assert_eq!(grid.cols, 0);
        assert_eq!(grid.rows, 0);
        assert_eq!(grid.total, 0);
    }

    #[test]
    fn non_positive_icon_size_fits_nothing() {
        for size in [0, -1, -24] {
            let grid = plan(1920, 1080, size, 16, 0);
            assert!(!grid.valid, "icon size {size} must not fit");
            assert_eq!(grid.total, 0);
        }
    }

    #[test]
    fn non_positive_stride_fits_nothing() {
        let grid = plan(1920, 1080, 10, -10, 0);
        assert!(!grid.valid);
        assert_eq!(grid.total, 0);
    }

    #[test]
    fn padding_larger_than_canvas_fits_nothing() {
        let grid = plan(100, 100, 10, 0, 80);
        assert!(!grid.valid);
        assert_eq!(grid.total, 0);
    }

    #[test]
    fn negative_padding_widens_usable_area() {
        // usable = 100 + 40 = 140 -> 7 cells of stride 20
        let grid = plan(100, 100, 20, 0, -20);
        assert!(grid.valid);
        assert_eq!(grid.cols, 7);
        assert_eq!(grid.offset_x, -20.0);
    }

    #[test]
    fn fits_when_usable_area_holds_one_icon() {
        for (w, h, size, spacing, padding) in [
            (24, 24, 24, 0, 0),
            (64, 40, 10, 3, 15),
            (3840, 2160, 512, 0, 1000),
            (1, 1, 1, 0, 0),
        ] {
            let grid = plan(w, h, size, spacing, padding);
            assert!(grid.valid, "{w}x{h} size={size} spacing={spacing} padding={padding}");
            assert!(grid.total >= 1);
            assert_eq!(grid.total, grid.cols * grid.rows);
        }
    }

    #[test]
    fn cell_count_uses_full_stride() {
        // Each counted cell reserves its trailing gap, so a lone icon with
        // a wide gap does not fit: floor(24 / 124) == 0.
        let grid = plan(24, 24, 24, 100, 0);
        assert!(!grid.valid);

        // 1840 / 1024 == 1 column, 160 / 1024 == 0 rows.
        let grid = plan(3840, 2160, 512, 512, 1000);
        assert!(!grid.valid);
    }

    #[test]
    fn fractional_offsets_for_odd_slack() {
        // usable 105, stride 10 -> 10 cells, block 100, slack 5
        let grid = plan(105, 105, 10, 0, 0);
        assert_eq!(grid.cols, 10);
        assert_eq!(grid.offset_x, 2.5);
    }

    #[test]
    fn planning_is_idempotent() {
        let a = plan(2560, 1440, 37, 11, 23);
        let b = plan(2560, 1440, 37, 11, 23);
        assert_eq!(a.cols, b.cols);
        assert_eq!(a.rows, b.rows);
        assert_eq!(a.offset_x.to_bits(), b.offset_x.to_bits());
        assert_eq!(a.offset_y.to_bits(), b.offset_y.to_bits());
    }

    #[test]
    fn block_is_centered_in_usable_area() {
        for (w, h, size, spacing, padding) in [
            (1920, 1080, 24, 16, 0),
            (2560, 1440, 37, 11, 23),
            (333, 777, 13, 5, 7),
            (3840, 2160, 100, 0, 50),
        ] {
            let grid = plan(w, h, size, spacing, padding);
            let usable_w = f64::from(w) - 2.0 * padding as f64;
            let left = grid.offset_x - padding as f64;
            let right = usable_w - grid.block_width() - left;
            assert!((left - right).abs() < 1e-9, "left {left} right {right}");

            let usable_h = f64::from(h) - 2.0 * padding as f64;
            let top = grid.offset_y - padding as f64;
            let bottom = usable_h - grid.block_height() - top;
            assert!((top - bottom).abs() < 1e-9, "top {top} bottom {bottom}");
        }
    }

    #[test]
    fn placement_count_matches_total() {
        let grid = plan(1920, 1080, 24, 16, 0);
        let cells: Vec<_> = placements(&grid, 10).collect();
        assert_eq!(cells.len() as u64, grid.total);
        assert!(cells.iter().all(|c| c.icon_index < 10));
    }

    #[test]
    fn placements_are_row_major_round_robin() {
        let grid = plan(100, 60, 20, 0, 0);
        assert_eq!((grid.cols, grid.rows), (5, 3));

        let cells: Vec<_> = placements(&grid, 3).collect();
        assert_eq!((cells[0].x, cells[0].y), (0.0, 0.0));
        assert_eq!((cells[1].x, cells[1].y), (20.0, 0.0));
        assert_eq!((cells[5].x, cells[5].y), (0.0, 20.0));
        assert_eq!(cells[5].row, 1);
        assert_eq!(cells[5].col, 0);

        let indices: Vec<_> = cells.iter().take(7).map(|c| c.icon_index).collect();
        assert_eq!(indices, vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn placements_empty_for_invalid_plan_or_no_icons() {
        let invalid = plan(100, 100, 200, 0, 0);
        assert_eq!(placements(&invalid, 3).count(), 0);

        let valid = plan(100, 100, 10, 0, 0);
        assert_eq!(placements(&valid, 0).count(), 0);
    }

    #[test]
    fn placements_are_restartable() {
        let grid = plan(400, 300, 24, 8, 10);
        let first: Vec<_> = placements(&grid, 4).collect();
        let second: Vec<_> = placements(&grid, 4).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn random_assignment_is_seeded() {
        let grid = plan(400, 300, 24, 8, 10);
        let policy = AssignmentPolicy::Random { seed: 99 };

        let a: Vec<_> = grid.placements(5, policy).map(|c| c.icon_index).collect();
        let b: Vec<_> = grid.placements(5, policy).map(|c| c.icon_index).collect();
        assert_eq!(a, b);
        assert!(a.iter().all(|&i| i < 5));

        let other: Vec<_> = grid
            .placements(5, AssignmentPolicy::Random { seed: 100 })
            .map(|c| c.icon_index)
            .collect();
        assert_ne!(a, other);
    }

    #[test]
    fn size_hint_is_exact() {
        let grid = plan(100, 60, 20, 0, 0);
        let mut iter = placements(&grid, 2);
        assert_eq!(iter.size_hint(), (15, Some(15)));
        iter.next();
        assert_eq!(iter.size_hint(), (14, Some(14)));
    }

    #[test]
    fn policy_json_format() {
        let json = serde_json::to_string(&AssignmentPolicy::Random { seed: 7 }).unwrap();
        assert_eq!(json, r#"{"kind":"random","seed":7}"#);

        let parsed: AssignmentPolicy = serde_json::from_str(r#"{"kind":"round-robin"}"#).unwrap();
        assert_eq!(parsed, AssignmentPolicy::RoundRobin);
    }
}
