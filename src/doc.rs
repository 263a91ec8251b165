//! Document model: the template aggregate and its placed components.
//!
//! DESIGN
//! ======
//! `Template` is the portable value edited by the canvas controller and
//! persisted by the store. It is a plain value type with structural
//! equality so the undo/redo round-trip and JSON round-trip laws can be
//! checked with `==`. Components are kept in insertion order with unique
//! ids; paint order comes from `z_index`.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::DEFAULT_AUTOSAVE_INTERVAL_MS;
use crate::grid::{GridConfig, ResponsiveConfig};
use crate::registry::ComponentProps;

/// Current epoch time in milliseconds.
#[must_use]
pub fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

/// Publication status of a template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateStatus {
    #[default]
    Draft,
    Active,
    Inactive,
}

impl TemplateStatus {
    /// Stable string form used for storage rows.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

/// Template identity and lifecycle metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMeta {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub status: TemplateStatus,
    /// Strictly increases on every persisted save; never reused.
    pub version: i64,
    pub category: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Per-template editor behavior toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSettings {
    pub autosave: bool,
    pub autosave_interval_ms: u64,
    pub snap_to_grid: bool,
    pub show_grid: bool,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            autosave: true,
            autosave_interval_ms: DEFAULT_AUTOSAVE_INTERVAL_MS,
            snap_to_grid: true,
            show_grid: true,
        }
    }
}

/// A placed element on the template canvas.
///
/// `x`/`y` are snapped integer pixels, `w` is in grid columns and `h` in
/// grid rows. `z_index` orders painting; higher paints on top and need
/// not be unique. The id is immutable after creation and never reused —
/// duplication always mints a fresh one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateComponent {
    pub id: Uuid,
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
    pub z_index: i64,
    pub props: ComponentProps,
}

/// The aggregate template document, matching the serialized interchange
/// format: `meta`, `grid`, `components`, `responsive`, `settings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub meta: TemplateMeta,
    pub grid: GridConfig,
    pub components: Vec<TemplateComponent>,
    pub responsive: ResponsiveConfig,
    pub settings: TemplateSettings,
}

impl Template {
    /// Create an empty draft template.
    #[must_use]
    pub fn new(name: &str) -> Self {
        let now = now_ms();
        Self {
            meta: TemplateMeta {
                id: Uuid::new_v4(),
                name: name.to_owned(),
                description: String::new(),
                tags: Vec::new(),
                status: TemplateStatus::Draft,
                version: 1,
                category: None,
                created_at: now,
                updated_at: now,
            },
            grid: GridConfig::default(),
            components: Vec::new(),
            responsive: ResponsiveConfig::default(),
            settings: TemplateSettings::default(),
        }
    }

    /// Look up a component by id.
    #[must_use]
    pub fn component(&self, id: Uuid) -> Option<&TemplateComponent> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Highest `z_index` currently in use, or -1 for an empty canvas.
    #[must_use]
    pub fn max_z_index(&self) -> i64 {
        self.components.iter().map(|c| c.z_index).max().unwrap_or(-1)
    }

    /// Lowest `z_index` currently in use, or 0 for an empty canvas.
    #[must_use]
    pub fn min_z_index(&self) -> i64 {
        self.components.iter().map(|c| c.z_index).min().unwrap_or(0)
    }

    /// Components sorted by `(z_index, id)` for a stable draw order.
    #[must_use]
    pub fn sorted_components(&self) -> Vec<&TemplateComponent> {
        let mut components: Vec<&TemplateComponent> = self.components.iter().collect();
        components.sort_by(|a, b| a.z_index.cmp(&b.z_index).then_with(|| a.id.cmp(&b.id)));
        components
    }
}
