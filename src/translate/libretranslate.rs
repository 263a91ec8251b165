//! LibreTranslate API client.
//!
//! Thin HTTP wrapper for `POST /translate` against a configurable
//! instance. Pure parsing in `parse_response` for testability.

use std::time::Duration;

use super::config::TranslateTimeouts;
use super::types::{Lang, TranslateError, TranslationProvider};

// =============================================================================
// CLIENT
// =============================================================================

pub struct LibreTranslateClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl LibreTranslateClient {
    /// Build the client against `base_url` (no trailing slash).
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError::HttpClientBuild`] if the HTTP client
    /// cannot be constructed.
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        timeouts: TranslateTimeouts,
    ) -> Result<Self, TranslateError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeouts.request_ms))
            .connect_timeout(Duration::from_millis(timeouts.connect_ms))
            .build()
            .map_err(|e| TranslateError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url, api_key })
    }
}

#[async_trait::async_trait]
impl TranslationProvider for LibreTranslateClient {
    fn name(&self) -> &'static str {
        "libretranslate"
    }

    async fn translate(&self, text: &str, source: Lang, target: Lang) -> Result<String, TranslateError> {
        let body = ApiRequest {
            q: text,
            source: source.code(),
            target: target.code(),
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        let response = self
            .http
            .post(format!("{}/translate", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| TranslateError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| TranslateError::ApiRequest(e.to_string()))?;

        if status != 200 {
            return Err(TranslateError::ApiResponse { status, body: text });
        }

        parse_response(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(serde::Deserialize)]
struct ApiResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_response(json: &str) -> Result<String, TranslateError> {
    let api: ApiResponse = serde_json::from_str(json).map_err(|e| TranslateError::ApiParse(e.to_string()))?;
    Ok(api.translated_text)
}

#[cfg(test)]
#[path = "libretranslate_test.rs"]
mod tests;
