//! 5×5 location grid and the strike/ball verdict derived from it.
//!
//! The outer ring of the grid is a ball, the inner 3×3 is a strike. Batter
//! handedness only mirrors how a host draws the grid; it never enters here.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const GRID_SIZE: u8 = 5;

const STRIKE_BAND: std::ops::RangeInclusive<u8> = 2..=4;
const CENTER: u8 = 3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Zone {
    Strike,
    Ball,
}

impl Zone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Strike => "strike",
            Zone::Ball => "ball",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "strike" | "Strike" | "STRIKE" | "ストライク" => Some(Zone::Strike),
            "ball" | "Ball" | "BALL" | "ボール" => Some(Zone::Ball),
            _ => None,
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cell of the grid. Column 1 is the left edge as drawn, row 1 is low and
/// row 5 is high. Always within `1..=GRID_SIZE` on both axes.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    col: u8,
    row: u8,
}

impl GridCell {
    /// Snaps any pair to the nearest cell; out-of-grid input is never an error.
    pub fn clamped(col: i64, row: i64) -> Self {
        Self {
            col: clamp_axis(col),
            row: clamp_axis(row),
        }
    }

    pub fn col(&self) -> u8 {
        self.col
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    pub fn zone(&self) -> Zone {
        if STRIKE_BAND.contains(&self.col) && STRIKE_BAND.contains(&self.row) {
            Zone::Strike
        } else {
            Zone::Ball
        }
    }
}

impl Default for GridCell {
    fn default() -> Self {
        Self {
            col: CENTER,
            row: CENTER,
        }
    }
}

fn clamp_axis(value: i64) -> u8 {
    value.clamp(1, GRID_SIZE as i64) as u8
}

/// Pixel rectangle the grid is drawn into. `top` is the high edge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Verdict for a grid selection after clamping.
pub fn classify(col: i64, row: i64) -> Zone {
    GridCell::clamped(col, row).zone()
}

/// Snapped cell plus verdict, for hosts that echo the cell back.
pub fn classify_cell(col: i64, row: i64) -> (GridCell, Zone) {
    let cell = GridCell::clamped(col, row);
    (cell, cell.zone())
}

/// Maps a click in pixel space onto the grid. Clicks outside `bounds` snap to
/// the edge cell; a degenerate rectangle or NaN coordinate snaps to center.
pub fn classify_point(x: f64, y: f64, bounds: &Bounds) -> (GridCell, Zone) {
    let col = axis_index(x - bounds.left, bounds.width).map_or(CENTER, |idx| idx + 1);
    // Pixel y grows downward while rows count upward from the low edge.
    let row = axis_index(y - bounds.top, bounds.height).map_or(CENTER, |idx| GRID_SIZE - idx);

    let cell = GridCell { col, row };
    (cell, cell.zone())
}

/// Zero-based band index along one axis, or `None` when undefined.
fn axis_index(offset: f64, extent: f64) -> Option<u8> {
    if offset.is_nan() || !extent.is_finite() || extent <= 0.0 {
        return None;
    }

    let scaled = (offset / extent * GRID_SIZE as f64).floor();
    Some(scaled.clamp(0.0, (GRID_SIZE - 1) as f64) as u8)
}
