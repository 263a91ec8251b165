//! Canvas controller — pure transformations over [`Template`] values.
//!
//! DESIGN
//! ======
//! Every operation takes a template by reference and returns a new value;
//! nothing here mutates shared state or touches storage. The UI layer
//! reports raw pointer positions, snapping/clamping/validation all happen
//! here, and callers feed the result into the history manager and the
//! persistence services.
//!
//! ERROR HANDLING
//! ==============
//! Rejected operations return the violation without touching the input:
//! the prior template value stays valid, and the caller decides whether
//! to surface the message or drop the edit.

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;

use tracing::warn;
use uuid::Uuid;

use crate::consts::{
    COMPONENT_MAX_H, COMPONENT_MAX_W, COMPONENT_MIN_H, COMPONENT_MIN_W, DUPLICATE_OFFSET_CELLS,
};
use crate::doc::{Template, TemplateComponent, now_ms};
use crate::grid::GridConfig;
use crate::registry::{ComponentKind, ComponentProps, FieldViolation, default_props, validate_props};

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("unsupported component type: {0}")]
    InvalidComponentType(String),
    #[error("validation failed: {}", format_violations(.0))]
    Validation(Vec<FieldViolation>),
}

fn format_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Sparse update for a placed component. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentUpdate {
    pub x: Option<i64>,
    pub y: Option<i64>,
    pub w: Option<i64>,
    pub h: Option<i64>,
    pub z_index: Option<i64>,
    /// Replacement props. Must stay the same kind as the existing component.
    pub props: Option<ComponentProps>,
}

fn clamp_w(w: i64, grid: &GridConfig) -> i64 {
    w.clamp(COMPONENT_MIN_W, COMPONENT_MAX_W.min(grid.columns.max(COMPONENT_MIN_W)))
}

fn clamp_h(h: i64) -> i64 {
    h.clamp(COMPONENT_MIN_H, COMPONENT_MAX_H)
}

/// Add a component of `kind` (a wire tag, possibly from an untrusted
/// palette payload) at a raw pixel position. Applies registry defaults,
/// snaps per the template settings, clamps geometry to policy bounds, and
/// assigns a fresh id on top of the stack. Returns the new template
/// together with the assigned id.
///
/// # Errors
///
/// Returns [`EditorError::InvalidComponentType`] for unregistered tags.
pub fn add_component(
    template: &Template,
    kind: &str,
    position: (f64, f64),
    size: (i64, i64),
    props_override: Option<ComponentProps>,
) -> Result<(Template, Uuid), EditorError> {
    let kind = ComponentKind::from_tag(kind)
        .map_err(|e| EditorError::InvalidComponentType(e.0))?;

    let props = match props_override {
        Some(props) if props.kind() == kind => props,
        Some(props) => {
            return Err(EditorError::Validation(vec![FieldViolation {
                field: "props".to_owned(),
                message: format!("props are for {}, component is {kind}", props.kind()),
            }]));
        }
        None => default_props(kind),
    };
    let violations = validate_props(&props);
    if !violations.is_empty() {
        return Err(EditorError::Validation(violations));
    }

    let snap = template.settings.snap_to_grid;
    let (x, y) = template.grid.snap_point(position.0, position.1, snap);
    let w = clamp_w(size.0, &template.grid);
    let h = clamp_h(size.1);
    let (x, y) = template.grid.clamp_position(x, y, w, h);

    let id = Uuid::new_v4();
    let mut next = template.clone();
    next.components.push(TemplateComponent {
        id,
        x,
        y,
        w,
        h,
        z_index: template.max_z_index() + 1,
        props,
    });
    next.meta.updated_at = now_ms();
    Ok((next, id))
}

/// Apply a sparse update to a component, re-validating the result.
///
/// # Errors
///
/// Returns [`EditorError::Validation`] when the merged geometry or props
/// violate policy; the input template is untouched in that case. An
/// absent id is a no-op, matching delete semantics.
pub fn update_component(
    template: &Template,
    id: Uuid,
    update: &ComponentUpdate,
) -> Result<Template, EditorError> {
    let Some(existing) = template.component(id) else {
        return Ok(template.clone());
    };

    let mut violations = Vec::new();
    let props = match &update.props {
        Some(props) if props.kind() != existing.props.kind() => {
            return Err(EditorError::Validation(vec![FieldViolation {
                field: "props".to_owned(),
                message: format!(
                    "cannot change component kind from {} to {}",
                    existing.props.kind(),
                    props.kind()
                ),
            }]));
        }
        Some(props) => props.clone(),
        None => existing.props.clone(),
    };
    violations.extend(validate_props(&props));

    let w = update.w.unwrap_or(existing.w);
    let h = update.h.unwrap_or(existing.h);
    // Width is bounded by the grid as well as policy: a component may
    // never span more columns than the canvas has.
    let max_w = COMPONENT_MAX_W.min(template.grid.columns.max(COMPONENT_MIN_W));
    if !(COMPONENT_MIN_W..=max_w).contains(&w) {
        violations.push(FieldViolation {
            field: "w".to_owned(),
            message: format!("must be between {COMPONENT_MIN_W} and {max_w}"),
        });
    }
    if !(COMPONENT_MIN_H..=COMPONENT_MAX_H).contains(&h) {
        violations.push(FieldViolation {
            field: "h".to_owned(),
            message: format!("must be between {COMPONENT_MIN_H} and {COMPONENT_MAX_H}"),
        });
    }
    let x = update.x.unwrap_or(existing.x);
    let y = update.y.unwrap_or(existing.y);
    if x < 0 {
        violations.push(FieldViolation { field: "x".to_owned(), message: "must be non-negative".to_owned() });
    }
    if y < 0 {
        violations.push(FieldViolation { field: "y".to_owned(), message: "must be non-negative".to_owned() });
    }
    let z_index = update.z_index.unwrap_or(existing.z_index);
    if z_index < 0 {
        violations.push(FieldViolation {
            field: "zIndex".to_owned(),
            message: "must be non-negative".to_owned(),
        });
    }
    if !violations.is_empty() {
        return Err(EditorError::Validation(violations));
    }

    let snap = template.settings.snap_to_grid;
    #[allow(clippy::cast_precision_loss)]
    let (x, y) = template.grid.snap_point(x as f64, y as f64, snap);
    let (x, y) = template.grid.clamp_position(x, y, w, h);

    let mut next = template.clone();
    for component in &mut next.components {
        if component.id == id {
            component.x = x;
            component.y = y;
            component.w = w;
            component.h = h;
            component.z_index = z_index;
            component.props = props;
            break;
        }
    }
    next.meta.updated_at = now_ms();
    Ok(next)
}

/// Remove a component by id. Absent ids are a no-op, not an error.
#[must_use]
pub fn delete_component(template: &Template, id: Uuid) -> Template {
    let mut next = template.clone();
    let before = next.components.len();
    next.components.retain(|c| c.id != id);
    if next.components.len() != before {
        next.meta.updated_at = now_ms();
    }
    next
}

/// Clone a component with a fresh id, one grid cell of offset on both
/// axes (so the copy never sits exactly on the source), and the top
/// z-index. Absent ids log a warning and leave the template unchanged.
#[must_use]
pub fn duplicate_component(template: &Template, id: Uuid) -> Template {
    let Some(source) = template.component(id) else {
        warn!(%id, "duplicate requested for missing component");
        return template.clone();
    };

    let offset = DUPLICATE_OFFSET_CELLS * template.grid.row_height;
    let (x, y) = template
        .grid
        .clamp_position(source.x + offset, source.y + offset, source.w, source.h);

    let mut copy = source.clone();
    copy.id = Uuid::new_v4();
    copy.x = x;
    copy.y = y;
    copy.z_index = template.max_z_index() + 1;

    let mut next = template.clone();
    next.components.push(copy);
    next.meta.updated_at = now_ms();
    next
}

/// Repaint a component above everything else.
#[must_use]
pub fn bring_to_front(template: &Template, id: Uuid) -> Template {
    set_z_index(template, id, template.max_z_index() + 1)
}

/// Repaint a component beneath everything else. Floors at zero: z-indices
/// stay non-negative.
#[must_use]
pub fn send_to_back(template: &Template, id: Uuid) -> Template {
    set_z_index(template, id, (template.min_z_index() - 1).max(0))
}

fn set_z_index(template: &Template, id: Uuid, z_index: i64) -> Template {
    let mut next = template.clone();
    for component in &mut next.components {
        if component.id == id {
            component.z_index = z_index;
            next.meta.updated_at = now_ms();
            break;
        }
    }
    next
}

/// Replace the grid configuration, re-clamping every component so it
/// stays inside the new logical bounds.
#[must_use]
pub fn set_grid(template: &Template, grid: GridConfig) -> Template {
    let mut next = template.clone();
    next.grid = grid;
    for component in &mut next.components {
        component.w = clamp_w(component.w, &next.grid);
        component.h = clamp_h(component.h);
        let (x, y) = next
            .grid
            .clamp_position(component.x, component.y, component.w, component.h);
        component.x = x;
        component.y = y;
    }
    next.meta.updated_at = now_ms();
    next
}
