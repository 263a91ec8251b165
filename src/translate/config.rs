//! Translation configuration parsed from environment variables.

use super::types::TranslateError;
use crate::services::env_parse;

pub const DEFAULT_LIBRETRANSLATE_BASE_URL: &str = "https://libretranslate.com";
pub const DEFAULT_TRANSLATE_TIMEOUT_MS: u64 = 4_000;
pub const DEFAULT_TRANSLATE_CONNECT_TIMEOUT_MS: u64 = 2_000;
pub const DEFAULT_TRANSLATE_CACHE_CAPACITY: usize = 2_048;

/// Providers the service can dispatch to, in failover order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    MyMemory,
    LibreTranslate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslateTimeouts {
    pub request_ms: u64,
    pub connect_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateConfig {
    /// Failover order. The first provider is tried first.
    pub providers: Vec<ProviderKind>,
    pub libretranslate_base_url: String,
    pub libretranslate_api_key: Option<String>,
    pub timeouts: TranslateTimeouts,
    pub cache_capacity: usize,
}

impl TranslateConfig {
    /// Build typed translation config from environment variables.
    ///
    /// Optional:
    /// - `TRANSLATE_PROVIDERS`: comma-separated failover order, default
    ///   `mymemory,libretranslate`
    /// - `LIBRETRANSLATE_BASE_URL`: default public instance
    /// - `LIBRETRANSLATE_API_KEY`: sent when set
    /// - `TRANSLATE_TIMEOUT_MS`: per-provider deadline, default 4000
    /// - `TRANSLATE_CONNECT_TIMEOUT_MS`: default 2000
    /// - `TRANSLATE_CACHE_CAPACITY`: default 2048
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError::ConfigParse`] for an unknown provider name.
    pub fn from_env() -> Result<Self, TranslateError> {
        let providers = parse_providers(std::env::var("TRANSLATE_PROVIDERS").ok().as_deref())?;
        let libretranslate_base_url = std::env::var("LIBRETRANSLATE_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_LIBRETRANSLATE_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let libretranslate_api_key = std::env::var("LIBRETRANSLATE_API_KEY").ok();
        let timeouts = TranslateTimeouts {
            request_ms: env_parse("TRANSLATE_TIMEOUT_MS", DEFAULT_TRANSLATE_TIMEOUT_MS),
            connect_ms: env_parse("TRANSLATE_CONNECT_TIMEOUT_MS", DEFAULT_TRANSLATE_CONNECT_TIMEOUT_MS),
        };
        let cache_capacity = env_parse("TRANSLATE_CACHE_CAPACITY", DEFAULT_TRANSLATE_CACHE_CAPACITY);

        Ok(Self { providers, libretranslate_base_url, libretranslate_api_key, timeouts, cache_capacity })
    }
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            providers: vec![ProviderKind::MyMemory, ProviderKind::LibreTranslate],
            libretranslate_base_url: DEFAULT_LIBRETRANSLATE_BASE_URL.to_string(),
            libretranslate_api_key: None,
            timeouts: TranslateTimeouts {
                request_ms: DEFAULT_TRANSLATE_TIMEOUT_MS,
                connect_ms: DEFAULT_TRANSLATE_CONNECT_TIMEOUT_MS,
            },
            cache_capacity: DEFAULT_TRANSLATE_CACHE_CAPACITY,
        }
    }
}

fn parse_providers(raw: Option<&str>) -> Result<Vec<ProviderKind>, TranslateError> {
    let raw = raw.unwrap_or("mymemory,libretranslate");
    let mut providers = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let kind = match name {
            "mymemory" => ProviderKind::MyMemory,
            "libretranslate" => ProviderKind::LibreTranslate,
            other => {
                return Err(TranslateError::ConfigParse(format!("unknown translation provider: {other}")));
            }
        };
        if !providers.contains(&kind) {
            providers.push(kind);
        }
    }
    if providers.is_empty() {
        return Err(TranslateError::ConfigParse("TRANSLATE_PROVIDERS resolved to an empty list".into()));
    }
    Ok(providers)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
