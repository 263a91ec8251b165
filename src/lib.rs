//! Template editor engine for the case-lookup document builder.
//!
//! This crate owns the full lifecycle of a document template: a grid-based
//! canvas model with a typed component registry, pure editing operations
//! with undo/redo history, a `SQLite`-backed store with debounced autosave
//! and periodic immutable backups, exporters (JSON, raster image,
//! paginated PDF), and a multi-provider translation service for template
//! content. The host application layer is responsible only for wiring UI
//! events to [`session::EditorSession`] operations and serving the
//! exported artifacts.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`grid`] | Grid geometry, snapping, and pixel rects |
//! | [`registry`] | Component kinds, default props, and validation |
//! | [`doc`] | Template document model and serialization shape |
//! | [`editor`] | Pure template editing operations |
//! | [`history`] | Bounded undo/redo snapshot history |
//! | [`session`] | Shared editing session tying editor, history, and dirty state |
//! | [`db`] | `SQLite` pool construction and migrations |
//! | [`store`] | Template and backup persistence |
//! | [`services`] | Background autosave and backup tasks |
//! | [`export`] | JSON, raster, and paginated document exporters |
//! | [`render`] | Canvas rasterizer backing the binary exporters |
//! | [`cases`] | Case records consumed by placeholder components |
//! | [`translate`] | Multi-provider translation with cache and failover |
//! | [`consts`] | Shared numeric constants (grid defaults, history cap, etc.) |

pub mod cases;
pub mod consts;
pub mod db;
pub mod doc;
pub mod editor;
pub mod export;
pub mod grid;
pub mod history;
pub mod registry;
pub mod render;
pub mod services;
pub mod session;
pub mod store;
pub mod translate;
