//! Layout grid: snap-to-grid arithmetic and logical pixel geometry.
//!
//! DESIGN
//! ======
//! Positions are stored as snapped integer pixels, widths in columns and
//! heights in rows. One divisor — `row_height` — is used for snapping on
//! both axes, and the same divisor serves drops and resizes, so repeated
//! snap/resize cycles cannot drift. All functions here are pure.

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::consts::{CANVAS_ROWS, DEFAULT_COLUMNS, DEFAULT_GUTTER, DEFAULT_ROW_HEIGHT};
use crate::doc::TemplateComponent;

/// Column/row grid configuration for a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridConfig {
    /// Number of layout columns.
    pub columns: i64,
    /// Gutter between columns, in pixels.
    pub gutter: i64,
    /// Row height in pixels. Doubles as the snap divisor for both axes.
    pub row_height: i64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { columns: DEFAULT_COLUMNS, gutter: DEFAULT_GUTTER, row_height: DEFAULT_ROW_HEIGHT }
    }
}

/// Per-breakpoint column overrides, keyed by breakpoint name ("lg", "md", ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsiveConfig {
    pub breakpoints: BTreeMap<String, i64>,
}

/// An axis-aligned pixel rectangle produced by [`GridConfig::component_rect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

impl GridConfig {
    /// Pixel span of one column, gutter included.
    #[must_use]
    pub fn column_span(&self) -> i64 {
        self.row_height + self.gutter
    }

    /// Logical canvas width in pixels.
    #[must_use]
    pub fn canvas_width(&self) -> i64 {
        self.columns * self.column_span()
    }

    /// Logical canvas height in pixels.
    #[must_use]
    pub fn canvas_height(&self) -> i64 {
        CANVAS_ROWS * self.row_height
    }

    /// Snap a raw pixel coordinate to the nearest grid cell boundary.
    ///
    /// Returns the input unchanged when snapping is disabled. Results are
    /// clamped to be non-negative.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn snap(&self, value: f64, snap_enabled: bool) -> i64 {
        if !snap_enabled {
            return value.max(0.0).round() as i64;
        }
        let cell = self.row_height.max(1) as f64;
        ((value / cell).round() * cell).max(0.0) as i64
    }

    /// Snap a raw pixel point to the grid. Both axes use the same divisor.
    #[must_use]
    pub fn snap_point(&self, x: f64, y: f64, snap_enabled: bool) -> (i64, i64) {
        (self.snap(x, snap_enabled), self.snap(y, snap_enabled))
    }

    /// Map a component's `(x, y, w, h)` to a pixel rectangle.
    ///
    /// `x`/`y` are already pixels; `w` spans columns (trailing gutter
    /// trimmed), `h` spans rows.
    #[must_use]
    pub fn component_rect(&self, component: &TemplateComponent) -> PixelRect {
        PixelRect {
            x: component.x,
            y: component.y,
            w: (component.w * self.column_span() - self.gutter).max(1),
            h: (component.h * self.row_height).max(1),
        }
    }

    /// Clamp `(x, y)` so that a `w`-column, `h`-row component stays inside
    /// the logical canvas bounds.
    #[must_use]
    pub fn clamp_position(&self, x: i64, y: i64, w: i64, h: i64) -> (i64, i64) {
        let max_x = (self.canvas_width() - w * self.column_span()).max(0);
        let max_y = (self.canvas_height() - h * self.row_height).max(0);
        (x.clamp(0, max_x), y.clamp(0, max_y))
    }
}
