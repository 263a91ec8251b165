use super::*;

fn record() -> CaseRecord {
    CaseRecord {
        full_name: "María López".to_owned(),
        registration_number: "A-123456".to_owned(),
        nationality: "Honduras".to_owned(),
        status: "En trámite".to_owned(),
        hearing_date: Some("12/03/2026".to_owned()),
        decision_date: None,
        appeal_deadline: None,
    }
}

// =============================================================================
// field lookup
// =============================================================================

#[test]
fn field_resolves_every_known_key() {
    let r = record();
    assert_eq!(r.field("full_name"), Some("María López"));
    assert_eq!(r.field("registration_number"), Some("A-123456"));
    assert_eq!(r.field("nationality"), Some("Honduras"));
    assert_eq!(r.field("status"), Some("En trámite"));
    assert_eq!(r.field("hearing_date"), Some("12/03/2026"));
    assert_eq!(r.field("decision_date"), None);
    assert_eq!(r.field("appeal_deadline"), None);
}

#[test]
fn field_unknown_key_is_none() {
    assert_eq!(record().field("shoe_size"), None);
}

#[test]
fn field_or_substitutes_fallback() {
    let r = record();
    assert_eq!(r.field_or("full_name", "—"), "María López");
    assert_eq!(r.field_or("decision_date", "—"), "—");
    assert_eq!(r.field_or("unknown", "—"), "—");
}

#[test]
fn field_or_treats_empty_value_as_absent() {
    let mut r = record();
    r.status = String::new();
    assert_eq!(r.field_or("status", "sin dato"), "sin dato");
}

// =============================================================================
// labels
// =============================================================================

#[test]
fn every_registered_field_has_a_label() {
    for key in CASE_FIELDS {
        assert_ne!(field_label(key), key, "{key} should have a Spanish label");
    }
}

#[test]
fn unknown_field_labels_fall_back_to_the_key() {
    assert_eq!(field_label("legacy_key"), "legacy_key");
}

// =============================================================================
// serde
// =============================================================================

#[test]
fn record_serde_uses_camel_case() {
    let json = serde_json::to_value(record()).unwrap();
    assert_eq!(json["fullName"], "María López");
    assert_eq!(json["registrationNumber"], "A-123456");
    assert!(json["decisionDate"].is_null());

    let back: CaseRecord = serde_json::from_value(json).unwrap();
    assert_eq!(back, record());
}
