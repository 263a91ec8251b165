//! Component registry: the closed set of component kinds, their default
//! properties, and per-kind validation.
//!
//! DESIGN
//! ======
//! The original editor kept an open string-keyed props bag per component
//! and dispatched on a `type` string. Here props are a tagged union with
//! one strongly-typed variant per kind; rendering and validation dispatch
//! by pattern match, and an unknown tag is rejected at the point of
//! creation (or at parse time for documents loaded from storage) instead
//! of being silently rendered.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use serde::{Deserialize, Serialize};

/// The kind of a placed template component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    /// Free-form body text.
    Text,
    /// Background card / panel.
    Card,
    /// Embedded image referenced by source.
    Image,
    /// Named icon glyph.
    Icon,
    /// Single case-record field placeholder.
    Placeholder,
    /// Horizontal rule.
    Separator,
    /// Short emphasized caption.
    Label,
    /// Composite block rendering several case-record fields.
    CaseInformation,
}

impl ComponentKind {
    /// All registered kinds, in palette order.
    pub const ALL: [Self; 8] = [
        Self::Text,
        Self::Card,
        Self::Image,
        Self::Icon,
        Self::Placeholder,
        Self::Separator,
        Self::Label,
        Self::CaseInformation,
    ];

    /// The wire tag for this kind (`"text"`, `"case_information"`, ...).
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Card => "card",
            Self::Image => "image",
            Self::Icon => "icon",
            Self::Placeholder => "placeholder",
            Self::Separator => "separator",
            Self::Label => "label",
            Self::CaseInformation => "case_information",
        }
    }

    /// Parse a wire tag. Unknown tags are an explicit error, not a panic:
    /// palette drops and loaded documents may carry stale type names.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownKind`] when the tag is not registered.
    pub fn from_tag(tag: &str) -> Result<Self, UnknownKind> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag() == tag)
            .ok_or_else(|| UnknownKind(tag.to_owned()))
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// A component type tag that is not in the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported component type: {0}")]
pub struct UnknownKind(pub String);

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// How an image is fitted into its component box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    #[default]
    Contain,
    Cover,
    Fill,
}

/// Stroke style of a separator rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeparatorStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Typed, per-kind component properties. Tagged with `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ComponentProps {
    Text {
        content: String,
        font_size: u32,
        font_family: String,
        color: String,
        align: TextAlign,
    },
    Card {
        background: String,
        border_color: String,
        border_radius: u32,
        padding: u32,
    },
    Image {
        source: String,
        fit: ImageFit,
        opacity: f32,
    },
    Icon {
        name: String,
        size: u32,
        color: String,
    },
    Placeholder {
        /// Case-record field key substituted at render time.
        field: String,
        label: String,
        /// Text rendered when the record has no value for `field`.
        fallback: String,
    },
    Separator {
        thickness: u32,
        color: String,
        style: SeparatorStyle,
    },
    Label {
        content: String,
        font_size: u32,
        color: String,
        background: String,
    },
    CaseInformation {
        title: String,
        show_photo: bool,
        /// Case-record field keys rendered as label/value rows.
        fields: Vec<String>,
        background: String,
    },
}

impl ComponentProps {
    /// The kind this props variant belongs to.
    #[must_use]
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Text { .. } => ComponentKind::Text,
            Self::Card { .. } => ComponentKind::Card,
            Self::Image { .. } => ComponentKind::Image,
            Self::Icon { .. } => ComponentKind::Icon,
            Self::Placeholder { .. } => ComponentKind::Placeholder,
            Self::Separator { .. } => ComponentKind::Separator,
            Self::Label { .. } => ComponentKind::Label,
            Self::CaseInformation { .. } => ComponentKind::CaseInformation,
        }
    }
}

/// A single violated field reported by [`validate_props`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self { field: field.to_owned(), message: message.into() }
    }
}

/// Registry defaults applied when a component is added from the palette.
#[must_use]
pub fn default_props(kind: ComponentKind) -> ComponentProps {
    match kind {
        ComponentKind::Text => ComponentProps::Text {
            content: "Texto de ejemplo".to_owned(),
            font_size: 14,
            font_family: "Arial".to_owned(),
            color: "#000000".to_owned(),
            align: TextAlign::Left,
        },
        ComponentKind::Card => ComponentProps::Card {
            background: "#F5F5F5".to_owned(),
            border_color: "#E0E0E0".to_owned(),
            border_radius: 8,
            padding: 12,
        },
        ComponentKind::Image => ComponentProps::Image {
            source: String::new(),
            fit: ImageFit::Contain,
            opacity: 1.0,
        },
        ComponentKind::Icon => ComponentProps::Icon {
            name: "description".to_owned(),
            size: 24,
            color: "#1E4A8A".to_owned(),
        },
        ComponentKind::Placeholder => ComponentProps::Placeholder {
            field: "full_name".to_owned(),
            label: "Nombre completo".to_owned(),
            fallback: "—".to_owned(),
        },
        ComponentKind::Separator => ComponentProps::Separator {
            thickness: 1,
            color: "#BDBDBD".to_owned(),
            style: SeparatorStyle::Solid,
        },
        ComponentKind::Label => ComponentProps::Label {
            content: "Etiqueta".to_owned(),
            font_size: 12,
            color: "#FFFFFF".to_owned(),
            background: "#1E4A8A".to_owned(),
        },
        ComponentKind::CaseInformation => ComponentProps::CaseInformation {
            title: "Información del caso".to_owned(),
            show_photo: true,
            fields: vec![
                "full_name".to_owned(),
                "registration_number".to_owned(),
                "hearing_date".to_owned(),
                "decision_date".to_owned(),
                "appeal_deadline".to_owned(),
            ],
            background: "#FFFFFF".to_owned(),
        },
    }
}

/// Validate props against the rules for their kind. Returns one violation
/// per offending field; an empty list means the props are acceptable.
#[must_use]
pub fn validate_props(props: &ComponentProps) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    match props {
        ComponentProps::Text { font_size, color, .. } => {
            check_font_size("fontSize", *font_size, &mut violations);
            check_color("color", color, &mut violations);
        }
        ComponentProps::Card { background, border_color, border_radius, .. } => {
            check_color("background", background, &mut violations);
            check_color("borderColor", border_color, &mut violations);
            if *border_radius > 64 {
                violations.push(FieldViolation::new("borderRadius", "must be at most 64"));
            }
        }
        ComponentProps::Image { opacity, .. } => {
            if !(0.0..=1.0).contains(opacity) {
                violations.push(FieldViolation::new("opacity", "must be between 0 and 1"));
            }
        }
        ComponentProps::Icon { name, size, color } => {
            if name.trim().is_empty() {
                violations.push(FieldViolation::new("name", "must not be empty"));
            }
            check_font_size("size", *size, &mut violations);
            check_color("color", color, &mut violations);
        }
        ComponentProps::Placeholder { field, .. } => {
            if field.trim().is_empty() {
                violations.push(FieldViolation::new("field", "must not be empty"));
            }
        }
        ComponentProps::Separator { thickness, color, .. } => {
            if !(1..=10).contains(thickness) {
                violations.push(FieldViolation::new("thickness", "must be between 1 and 10"));
            }
            check_color("color", color, &mut violations);
        }
        ComponentProps::Label { font_size, color, background, .. } => {
            check_font_size("fontSize", *font_size, &mut violations);
            check_color("color", color, &mut violations);
            check_color("background", background, &mut violations);
        }
        ComponentProps::CaseInformation { fields, background, .. } => {
            if fields.is_empty() {
                violations.push(FieldViolation::new("fields", "must list at least one field"));
            }
            check_color("background", background, &mut violations);
        }
    }
    violations
}

fn check_font_size(field: &str, size: u32, violations: &mut Vec<FieldViolation>) {
    if !(6..=96).contains(&size) {
        violations.push(FieldViolation::new(field, "must be between 6 and 96"));
    }
}

fn check_color(field: &str, color: &str, violations: &mut Vec<FieldViolation>) {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        violations.push(FieldViolation::new(field, "must be a #RRGGBB color"));
    }
}

/// Parse a `#RRGGBB` color into RGB bytes. Falls back to opaque black for
/// strings that fail [`validate_props`]' color rule.
#[must_use]
pub fn parse_color(color: &str) -> [u8; 3] {
    if color.len() == 7 && color.starts_with('#') {
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&color[range], 16);
        if let (Ok(r), Ok(g), Ok(b)) = (channel(1..3), channel(3..5), channel(5..7)) {
            return [r, g, b];
        }
    }
    [0, 0, 0]
}
