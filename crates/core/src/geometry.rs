//! Selection geometry and 3×3 grid snapping.
//!
//! Everything here is pure: no state, no I/O, and every function is total over
//! its input domain apart from the explicit [`AppError::InvalidBounds`] check.
//!
//! Coordinates are surface-local logical pixels, origin top-left, y-down.
//!
//! # Example
//!
//! ```
//! use gridsnap_core::geometry::{normalize, snap_to_grid, Point, Rect};
//!
//! let bounds = Rect::new(0.0, 0.0, 900.0, 600.0);
//! let selection = normalize(Point::new(40.0, 40.0), Point::new(10.0, 10.0));
//! let cell = snap_to_grid(selection, bounds).unwrap();
//! assert_eq!(cell, Rect::new(0.0, 0.0, 300.0, 200.0));
//! ```

use crate::error::{AppError, Result};

/// Number of rows and columns in the snap grid.
pub const GRID_DIVISIONS: usize = 3;

/// A point on the overlay surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle with its origin at the top-left corner.
///
/// Used for live selections, the surface bounds and grid cells alike.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// The extent of the overlay surface for one session (`x = y = 0`).
pub type Bounds = Rect;

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Bounds of a surface of the given size anchored at the origin.
    pub const fn from_size(w: f32, h: f32) -> Self {
        Self::new(0.0, 0.0, w, h)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Geometric center, the point a selection snaps by.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Inclusive on the top/left edges, exclusive on the bottom/right edges.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Whether this rect can serve as the extent of a snap grid.
    pub fn is_valid_bounds(&self) -> bool {
        // Written as `> 0.0` so that NaN extents are rejected as well.
        self.w > 0.0 && self.h > 0.0
    }
}

/// Builds the selection rectangle spanned by two arbitrary corner points.
///
/// The points may come in any order; a degenerate drag (`anchor == current`)
/// yields a valid zero-area rect at that point.
pub fn normalize(anchor: Point, current: Point) -> Rect {
    Rect {
        x: anchor.x.min(current.x),
        y: anchor.y.min(current.y),
        w: (anchor.x - current.x).abs(),
        h: (anchor.y - current.y).abs(),
    }
}

fn check_bounds(bounds: Bounds) -> Result<()> {
    if bounds.is_valid_bounds() {
        Ok(())
    } else {
        Err(AppError::InvalidBounds {
            w: bounds.w,
            h: bounds.h,
        })
    }
}

/// Grid index along one axis for a coordinate.
///
/// Uses `floor`, so a coordinate exactly on a cell boundary belongs to the
/// higher-index cell. Anything outside the bounds lands in the nearest edge
/// cell.
fn grid_index(coord: f32, origin: f32, cell: f32) -> usize {
    let max = (GRID_DIVISIONS - 1) as f32;
    // `as usize` saturates NaN to 0, which keeps this total.
    ((coord - origin) / cell).floor().clamp(0.0, max) as usize
}

/// Cell rect for a row/column index; callers have validated `bounds`.
fn cell_rect(bounds: Bounds, row: usize, col: usize) -> Rect {
    let cell_w = bounds.w / GRID_DIVISIONS as f32;
    let cell_h = bounds.h / GRID_DIVISIONS as f32;
    Rect {
        x: bounds.x + (col as f32 * cell_w).round(),
        y: bounds.y + (row as f32 * cell_h).round(),
        w: cell_w.round(),
        h: cell_h.round(),
    }
}

/// Snaps `rect` to the grid cell containing its centroid.
///
/// `rect` does not have to lie within `bounds`; centroids outside are clamped
/// to the nearest edge cell. The result is always one of the nine rects
/// returned by [`cells`] for the same bounds.
///
/// # Errors
///
/// Returns [`AppError::InvalidBounds`] if `bounds.w <= 0` or `bounds.h <= 0`.
pub fn snap_to_grid(rect: Rect, bounds: Bounds) -> Result<Rect> {
    check_bounds(bounds)?;
    let (row, col) = grid_position(rect.center(), bounds);
    Ok(cell_rect(bounds, row, col))
}

/// Row and column of the cell a point falls into, clamped to the grid.
///
/// Callers are expected to pass valid bounds; see [`snap_to_grid`].
pub fn grid_position(p: Point, bounds: Bounds) -> (usize, usize) {
    let cell_w = bounds.w / GRID_DIVISIONS as f32;
    let cell_h = bounds.h / GRID_DIVISIONS as f32;
    (
        grid_index(p.y, bounds.y, cell_h),
        grid_index(p.x, bounds.x, cell_w),
    )
}

/// The rect of the cell at `(row, col)`.
///
/// # Errors
///
/// Returns [`AppError::InvalidBounds`] for invalid bounds. Indices past the
/// grid are clamped to the last row/column.
pub fn cell_at(bounds: Bounds, row: usize, col: usize) -> Result<Rect> {
    check_bounds(bounds)?;
    let last = GRID_DIVISIONS - 1;
    Ok(cell_rect(bounds, row.min(last), col.min(last)))
}

/// All nine cells of the grid in row-major order.
pub fn cells(bounds: Bounds) -> Result<[Rect; GRID_DIVISIONS * GRID_DIVISIONS]> {
    check_bounds(bounds)?;
    Ok(std::array::from_fn(|i| {
        cell_rect(bounds, i / GRID_DIVISIONS, i % GRID_DIVISIONS)
    }))
}

/// Interior divider coordinates: two vertical x positions and two horizontal
/// y positions.
pub fn grid_lines(bounds: Bounds) -> ([f32; 2], [f32; 2]) {
    let n = GRID_DIVISIONS as f32;
    (
        [bounds.x + bounds.w / n, bounds.x + 2.0 * bounds.w / n],
        [bounds.y + bounds.h / n, bounds.y + 2.0 * bounds.h / n],
    )
}
