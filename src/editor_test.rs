use super::*;
use crate::registry::default_props;

fn template() -> Template {
    Template::new("t")
}

fn template_with_text() -> (Template, Uuid) {
    add_component(&template(), "text", (0.0, 0.0), (2, 2), None).unwrap()
}

// =============================================================================
// add_component
// =============================================================================

#[test]
fn add_snaps_raw_drop_position() {
    let (t, _) = add_component(&template(), "text", (100.0, 100.0), (2, 2), None).unwrap();
    let c = &t.components[0];
    assert_eq!((c.x, c.y), (90, 90));
    assert_eq!((c.w, c.h), (2, 2));
    assert_eq!(c.props, default_props(ComponentKind::Text));
    assert_eq!(c.z_index, 0);
}

#[test]
fn add_respects_snap_disabled() {
    let mut base = template();
    base.settings.snap_to_grid = false;
    let (t, _) = add_component(&base, "text", (101.0, 101.0), (2, 2), None).unwrap();
    assert_eq!((t.components[0].x, t.components[0].y), (101, 101));
}

#[test]
fn add_clamps_oversized_geometry() {
    let (t, _) = add_component(&template(), "card", (0.0, 0.0), (100, 100), None).unwrap();
    assert_eq!(t.components[0].w, COMPONENT_MAX_W);
    assert_eq!(t.components[0].h, COMPONENT_MAX_H);
}

#[test]
fn add_clamps_undersized_geometry() {
    let (t, _) = add_component(&template(), "card", (0.0, 0.0), (0, 0), None).unwrap();
    assert_eq!(t.components[0].w, COMPONENT_MIN_W);
    assert_eq!(t.components[0].h, COMPONENT_MIN_H);
}

#[test]
fn add_rejects_unknown_kind() {
    let err = add_component(&template(), "banner", (0.0, 0.0), (2, 2), None).unwrap_err();
    assert!(matches!(err, EditorError::InvalidComponentType(tag) if tag == "banner"));
}

#[test]
fn add_rejects_mismatched_props_override() {
    let err = add_component(
        &template(),
        "text",
        (0.0, 0.0),
        (2, 2),
        Some(default_props(ComponentKind::Card)),
    )
    .unwrap_err();
    assert!(matches!(err, EditorError::Validation(_)));
}

#[test]
fn add_rejects_invalid_props_override() {
    let mut props = default_props(ComponentKind::Text);
    if let ComponentProps::Text { color, .. } = &mut props {
        "red".clone_into(color);
    }
    let err = add_component(&template(), "text", (0.0, 0.0), (2, 2), Some(props)).unwrap_err();
    assert!(matches!(err, EditorError::Validation(v) if v.len() == 1));
}

#[test]
fn add_assigns_fresh_ids_and_stacks_on_top() {
    let (t, first) = add_component(&template(), "text", (0.0, 0.0), (2, 2), None).unwrap();
    let (t, second) = add_component(&t, "card", (0.0, 0.0), (2, 2), None).unwrap();
    assert_ne!(first, second);
    assert_eq!(t.components[1].z_index, t.components[0].z_index + 1);
}

#[test]
fn add_returns_the_appended_component_id() {
    let (t, id) = add_component(&template(), "text", (0.0, 0.0), (2, 2), None).unwrap();
    assert!(!id.is_nil());
    assert_eq!(t.components.last().map(|c| c.id), Some(id));
}

// =============================================================================
// update_component
// =============================================================================

#[test]
fn update_moves_and_resnap() {
    let (t, id) = template_with_text();
    let update = ComponentUpdate { x: Some(100), y: Some(100), ..ComponentUpdate::default() };
    let t = update_component(&t, id, &update).unwrap();
    let c = t.component(id).unwrap();
    assert_eq!((c.x, c.y), (90, 90));
}

#[test]
fn update_absent_id_is_noop() {
    let (t, _) = template_with_text();
    let update = ComponentUpdate { x: Some(30), ..ComponentUpdate::default() };
    let next = update_component(&t, Uuid::new_v4(), &update).unwrap();
    assert_eq!(next, t);
}

#[test]
fn update_rejects_out_of_range_size() {
    let (t, id) = template_with_text();
    let update = ComponentUpdate { w: Some(99), ..ComponentUpdate::default() };
    let err = update_component(&t, id, &update).unwrap_err();
    assert!(matches!(err, EditorError::Validation(v) if v[0].field == "w"));
    // The prior value is untouched.
    assert_eq!(t.component(id).unwrap().w, 2);
}

#[test]
fn update_rejects_width_wider_than_the_grid() {
    let (t, id) = template_with_text();
    let t = set_grid(&t, GridConfig { columns: 4, gutter: 16, row_height: 30 });
    // Within the 12-column policy cap but wider than the 4-column grid.
    let update = ComponentUpdate { w: Some(10), ..ComponentUpdate::default() };
    let err = update_component(&t, id, &update).unwrap_err();
    assert!(matches!(err, EditorError::Validation(v) if v[0].field == "w"));
    let c = t.component(id).unwrap();
    assert!(c.x + c.w * t.grid.column_span() <= t.grid.canvas_width());
}

#[test]
fn update_rejects_kind_change() {
    let (t, id) = template_with_text();
    let update = ComponentUpdate {
        props: Some(default_props(ComponentKind::Card)),
        ..ComponentUpdate::default()
    };
    assert!(update_component(&t, id, &update).is_err());
}

#[test]
fn update_rejects_invalid_props_and_keeps_prior() {
    let (t, id) = template_with_text();
    let mut props = default_props(ComponentKind::Text);
    if let ComponentProps::Text { font_size, .. } = &mut props {
        *font_size = 500;
    }
    let update = ComponentUpdate { props: Some(props), ..ComponentUpdate::default() };
    assert!(update_component(&t, id, &update).is_err());
    assert_eq!(t.component(id).unwrap().props, default_props(ComponentKind::Text));
}

#[test]
fn update_collects_geometry_and_props_violations_together() {
    let (t, id) = template_with_text();
    let mut props = default_props(ComponentKind::Text);
    if let ComponentProps::Text { font_size, .. } = &mut props {
        *font_size = 500;
    }
    let update = ComponentUpdate {
        w: Some(99),
        z_index: Some(-1),
        props: Some(props),
        ..ComponentUpdate::default()
    };
    let EditorError::Validation(violations) = update_component(&t, id, &update).unwrap_err() else {
        panic!("expected validation error");
    };
    assert_eq!(violations.len(), 3);
}

// =============================================================================
// delete / duplicate
// =============================================================================

#[test]
fn delete_removes_component() {
    let (t, id) = template_with_text();
    let t = delete_component(&t, id);
    assert!(t.components.is_empty());
}

#[test]
fn delete_absent_id_is_noop() {
    let (t, _) = template_with_text();
    let next = delete_component(&t, Uuid::new_v4());
    assert_eq!(next, t);
}

#[test]
fn duplicate_offsets_one_cell_with_fresh_id_on_top() {
    let (t, id) = template_with_text();
    let t = duplicate_component(&t, id);
    assert_eq!(t.components.len(), 2);
    let source = t.component(id).unwrap();
    let copy = &t.components[1];
    assert_ne!(copy.id, id);
    assert_eq!(copy.x, source.x + t.grid.row_height);
    assert_eq!(copy.y, source.y + t.grid.row_height);
    assert_eq!(copy.z_index, source.z_index + 1);
    assert_eq!(copy.props, source.props);
}

#[test]
fn duplicate_absent_id_is_noop() {
    let (t, _) = template_with_text();
    let next = duplicate_component(&t, Uuid::new_v4());
    assert_eq!(next.components.len(), 1);
}

#[test]
fn duplicate_near_edge_stays_in_bounds() {
    let (t, id) = template_with_text();
    let max_y = t.grid.canvas_height() - 2 * t.grid.row_height;
    let update = ComponentUpdate { y: Some(max_y), ..ComponentUpdate::default() };
    let t = update_component(&t, id, &update).unwrap();
    let t = duplicate_component(&t, id);
    let copy = &t.components[1];
    assert!(copy.y <= max_y);
}

// =============================================================================
// paint order
// =============================================================================

#[test]
fn bring_to_front_and_send_to_back() {
    let (t, first) = add_component(&template(), "text", (0.0, 0.0), (2, 2), None).unwrap();
    let (t, second) = add_component(&t, "card", (0.0, 0.0), (2, 2), None).unwrap();

    let t = bring_to_front(&t, first);
    assert_eq!(t.component(first).unwrap().z_index, 2);

    let t = send_to_back(&t, first);
    assert_eq!(t.component(first).unwrap().z_index, 0);
    // Floors at zero rather than going negative.
    let t = send_to_back(&t, second);
    assert_eq!(t.component(second).unwrap().z_index, 0);
}

// =============================================================================
// set_grid
// =============================================================================

#[test]
fn set_grid_reclamps_components() {
    let (t, _) = add_component(&template(), "card", (400.0, 900.0), (12, 2), None).unwrap();
    let narrow = GridConfig { columns: 4, gutter: 16, row_height: 30 };
    let t = set_grid(&t, narrow.clone());
    let c = &t.components[0];
    assert_eq!(t.grid, narrow);
    assert!(c.w <= 4);
    assert!(c.x + c.w * t.grid.column_span() <= t.grid.canvas_width());
    assert!(c.y + c.h * t.grid.row_height <= t.grid.canvas_height());
}
