//! Case records — the external data source consumed by placeholder and
//! case-information components.
//!
//! The record source itself (hosted lookup by registration number and
//! nationality) lives outside this crate; rendering only needs a resolved
//! [`CaseRecord`] and a keyed field lookup for placeholder substitution.

#[cfg(test)]
#[path = "cases_test.rs"]
mod cases_test;

use serde::{Deserialize, Serialize};

/// Field keys a placeholder component may reference.
pub const CASE_FIELDS: [&str; 7] = [
    "full_name",
    "registration_number",
    "nationality",
    "status",
    "hearing_date",
    "decision_date",
    "appeal_deadline",
];

/// Human-readable Spanish label for a case field key. Unknown keys fall
/// back to the key itself so stale templates still render something.
#[must_use]
pub fn field_label(field: &str) -> &str {
    match field {
        "full_name" => "Nombre completo",
        "registration_number" => "Número de registro",
        "nationality" => "Nacionalidad",
        "status" => "Estado del caso",
        "hearing_date" => "Fecha de audiencia",
        "decision_date" => "Fecha de resolución",
        "appeal_deadline" => "Plazo de apelación",
        other => other,
    }
}

/// A resolved immigration case record. Dates are preformatted display
/// strings; formatting is the lookup service's concern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
    pub full_name: String,
    pub registration_number: String,
    pub nationality: String,
    pub status: String,
    pub hearing_date: Option<String>,
    pub decision_date: Option<String>,
    pub appeal_deadline: Option<String>,
}

impl CaseRecord {
    /// Keyed lookup used for placeholder substitution. `None` for unknown
    /// keys or absent optional fields.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&str> {
        match key {
            "full_name" => Some(self.full_name.as_str()),
            "registration_number" => Some(self.registration_number.as_str()),
            "nationality" => Some(self.nationality.as_str()),
            "status" => Some(self.status.as_str()),
            "hearing_date" => self.hearing_date.as_deref(),
            "decision_date" => self.decision_date.as_deref(),
            "appeal_deadline" => self.appeal_deadline.as_deref(),
            _ => None,
        }
    }

    /// Placeholder substitution: the field value, or the component's
    /// configured fallback text.
    #[must_use]
    pub fn field_or<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        match self.field(key) {
            Some(value) if !value.is_empty() => value,
            _ => fallback,
        }
    }
}

/// External source of case records, injected where rendering needs live
/// data and mocked in tests.
#[async_trait::async_trait]
pub trait CaseDataSource: Send + Sync {
    /// Look up a case by registration number and nationality. `Ok(None)`
    /// when no case matches.
    async fn case_by_registration(
        &self,
        registration_number: &str,
        nationality: &str,
    ) -> Result<Option<CaseRecord>, CaseLookupError>;
}

/// Failure from the external case-record source.
#[derive(Debug, thiserror::Error)]
#[error("case lookup failed: {0}")]
pub struct CaseLookupError(pub String);
