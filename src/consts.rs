//! Shared policy constants for the template designer.

// ── Geometry policy ─────────────────────────────────────────────

/// Minimum component width, in grid columns.
pub const COMPONENT_MIN_W: i64 = 1;

/// Maximum component width, in grid columns. Matches the 12-column layout grid.
pub const COMPONENT_MAX_W: i64 = 12;

/// Minimum component height, in grid rows.
pub const COMPONENT_MIN_H: i64 = 1;

/// Maximum component height, in grid rows.
pub const COMPONENT_MAX_H: i64 = 20;

/// Offset applied to a duplicated component, in grid cells, on both axes.
pub const DUPLICATE_OFFSET_CELLS: i64 = 1;

/// Logical canvas height, in grid rows. Components are clamped inside it.
pub const CANVAS_ROWS: i64 = 40;

// ── Grid defaults ───────────────────────────────────────────────

/// Default number of layout columns.
pub const DEFAULT_COLUMNS: i64 = 12;

/// Default gutter between columns, in pixels.
pub const DEFAULT_GUTTER: i64 = 16;

/// Default row height, in pixels. Also the snap divisor for both axes.
pub const DEFAULT_ROW_HEIGHT: i64 = 30;

// ── History ─────────────────────────────────────────────────────

/// Maximum retained undo/redo snapshots. Oldest entries are evicted first.
pub const HISTORY_CAPACITY: usize = 50;

// ── Persistence ─────────────────────────────────────────────────

/// Default autosave coalescing interval, in milliseconds.
pub const DEFAULT_AUTOSAVE_INTERVAL_MS: u64 = 30_000;

/// Default cadence for periodic full backups, in milliseconds.
pub const DEFAULT_BACKUP_INTERVAL_MS: u64 = 300_000;

/// Default number of backups retained per template.
pub const DEFAULT_BACKUP_RETENTION: i64 = 20;
