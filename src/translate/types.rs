//! Translation types — provider-neutral request/response types and errors.

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by translation provider operations.
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The HTTP request to the translation provider failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The provider returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The provider response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The provider did not answer within the configured deadline.
    #[error("request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl TranslateError {
    /// Whether a later retry against the same provider could succeed.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            Self::ApiRequest(_) | Self::Timeout { .. } | Self::ApiResponse { status: 429 | 500..=599, .. }
        )
    }
}

// =============================================================================
// LANGUAGES
// =============================================================================

/// Languages the content pipeline translates between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    Es,
    En,
}

impl Lang {
    /// ISO 639-1 code used on provider wire formats.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Es => "es",
            Self::En => "en",
        }
    }

    /// The other member of the es/en pair.
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::Es => Self::En,
            Self::En => Self::Es,
        }
    }
}

// =============================================================================
// TRANSLATION PROVIDER TRAIT
// =============================================================================

/// Provider-neutral async trait for machine translation. Enables mocking
/// in tests and ordered failover in the service layer.
#[async_trait::async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &'static str;

    /// Translate `text` from `source` to `target`.
    ///
    /// # Errors
    ///
    /// Returns a [`TranslateError`] if the request fails, times out at the
    /// transport level, or the response is malformed.
    async fn translate(&self, text: &str, source: Lang, target: Lang) -> Result<String, TranslateError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
