//! MyMemory translation API client.
//!
//! Thin HTTP wrapper for the public `GET /get` endpoint. Pure parsing in
//! `parse_response` for testability.

use std::time::Duration;

use super::config::TranslateTimeouts;
use super::types::{Lang, TranslateError, TranslationProvider};

const API_URL: &str = "https://api.mymemory.translated.net/get";

// =============================================================================
// CLIENT
// =============================================================================

pub struct MyMemoryClient {
    http: reqwest::Client,
}

impl MyMemoryClient {
    /// Build the client with the configured transport timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError::HttpClientBuild`] if the HTTP client
    /// cannot be constructed.
    pub fn new(timeouts: TranslateTimeouts) -> Result<Self, TranslateError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeouts.request_ms))
            .connect_timeout(Duration::from_millis(timeouts.connect_ms))
            .build()
            .map_err(|e| TranslateError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http })
    }
}

#[async_trait::async_trait]
impl TranslationProvider for MyMemoryClient {
    fn name(&self) -> &'static str {
        "mymemory"
    }

    async fn translate(&self, text: &str, source: Lang, target: Lang) -> Result<String, TranslateError> {
        let langpair = format!("{}|{}", source.code(), target.code());
        let response = self
            .http
            .get(API_URL)
            .query(&[("q", text), ("langpair", &langpair)])
            .send()
            .await
            .map_err(|e| TranslateError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TranslateError::ApiRequest(e.to_string()))?;

        if status != 200 {
            return Err(TranslateError::ApiResponse { status, body });
        }

        parse_response(&body)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(serde::Deserialize)]
struct ApiResponse {
    #[serde(rename = "responseData")]
    response_data: ResponseData,
    #[serde(rename = "responseStatus")]
    response_status: ResponseStatus,
}

#[derive(serde::Deserialize)]
struct ResponseData {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

// MyMemory reports its status both as a number and, on some errors, a
// string inside a 200 response.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ResponseStatus {
    Code(u16),
    Text(String),
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_response(json: &str) -> Result<String, TranslateError> {
    let api: ApiResponse = serde_json::from_str(json).map_err(|e| TranslateError::ApiParse(e.to_string()))?;

    match api.response_status {
        ResponseStatus::Code(200) => Ok(api.response_data.translated_text),
        ResponseStatus::Code(status) => Err(TranslateError::ApiResponse { status, body: json.to_string() }),
        ResponseStatus::Text(_) => Err(TranslateError::ApiResponse { status: 200, body: json.to_string() }),
    }
}

#[cfg(test)]
#[path = "mymemory_test.rs"]
mod tests;
