//! Translation — multi-provider machine translation for template content.
//!
//! DESIGN
//! ======
//! Providers are tried in configured failover order, each under its own
//! deadline; the first success wins and is cached. Translation is a
//! display concern, so total failure never surfaces as an error — the
//! caller gets the original text back and editing continues.
//!
//! The cache is a bounded in-process map keyed on `(text, source,
//! target)`. Repeated renders of the same template hit it instead of the
//! network.

pub mod config;
pub mod libretranslate;
pub mod mymemory;
pub mod types;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use config::{ProviderKind, TranslateConfig};
pub use types::{Lang, TranslateError, TranslationProvider};

#[cfg(test)]
#[path = "service_test.rs"]
mod service_test;

// =============================================================================
// SERVICE
// =============================================================================

/// Translation front door: cache, ordered provider failover, per-provider
/// deadline, and source-text fallback.
pub struct TranslateService {
    providers: Vec<Arc<dyn TranslationProvider>>,
    cache: RwLock<HashMap<CacheKey, String>>,
    cache_capacity: usize,
    deadline: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    text: String,
    source: Lang,
    target: Lang,
}

impl TranslateService {
    /// Build the service from environment variables.
    ///
    /// # Errors
    ///
    /// Returns a [`TranslateError`] if the provider list is malformed or
    /// an HTTP client cannot be constructed.
    pub fn from_env() -> Result<Self, TranslateError> {
        Self::from_config(TranslateConfig::from_env()?)
    }

    /// Build the service from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns a [`TranslateError`] if an HTTP client cannot be built.
    pub fn from_config(config: TranslateConfig) -> Result<Self, TranslateError> {
        let mut providers: Vec<Arc<dyn TranslationProvider>> = Vec::new();
        for kind in &config.providers {
            providers.push(match kind {
                ProviderKind::MyMemory => Arc::new(mymemory::MyMemoryClient::new(config.timeouts)?),
                ProviderKind::LibreTranslate => Arc::new(libretranslate::LibreTranslateClient::new(
                    config.libretranslate_base_url.clone(),
                    config.libretranslate_api_key.clone(),
                    config.timeouts,
                )?),
            });
        }
        Ok(Self::with_providers(providers, config.timeouts.request_ms, config.cache_capacity))
    }

    /// Build the service over explicit providers. Used directly by tests
    /// with mock providers.
    #[must_use]
    pub fn with_providers(
        providers: Vec<Arc<dyn TranslationProvider>>,
        deadline_ms: u64,
        cache_capacity: usize,
    ) -> Self {
        Self {
            providers,
            cache: RwLock::new(HashMap::new()),
            cache_capacity: cache_capacity.max(1),
            deadline: Duration::from_millis(deadline_ms.max(1)),
        }
    }

    /// Translate `text` from `source` to `target`, returning the original
    /// text unchanged when every provider fails or times out. Trivial
    /// inputs (empty, whitespace, pure digits/punctuation) short-circuit
    /// without touching the network.
    pub async fn translate(&self, text: &str, source: Lang, target: Lang) -> String {
        if source == target || !needs_translation(text) {
            return text.to_string();
        }

        let key = CacheKey { text: text.to_string(), source, target };
        if let Some(hit) = self.cache.read().await.get(&key) {
            return hit.clone();
        }

        for provider in &self.providers {
            match tokio::time::timeout(self.deadline, provider.translate(text, source, target)).await {
                Ok(Ok(translated)) => {
                    debug!(provider = provider.name(), "translation succeeded");
                    self.cache_insert(key, translated.clone()).await;
                    return translated;
                }
                Ok(Err(e)) => {
                    warn!(provider = provider.name(), error = %e, "translation provider failed; trying next");
                }
                Err(_) => {
                    let e = TranslateError::Timeout { ms: u64::try_from(self.deadline.as_millis()).unwrap_or(u64::MAX) };
                    warn!(provider = provider.name(), error = %e, "translation provider timed out; trying next");
                }
            }
        }

        // Display fallback: untranslated beats missing.
        warn!("all translation providers failed; returning source text");
        text.to_string()
    }

    /// Translate toward `target`, inferring the source language from the
    /// text itself.
    pub async fn translate_auto(&self, text: &str, target: Lang) -> String {
        self.translate(text, detect_lang(text, target.other()), target).await
    }

    /// Number of cached translations. Test hook.
    pub async fn cache_len(&self) -> usize {
        self.cache.read().await.len()
    }

    async fn cache_insert(&self, key: CacheKey, value: String) {
        let mut cache = self.cache.write().await;
        // Full cache: drop it wholesale rather than track recency.
        if cache.len() >= self.cache_capacity {
            cache.clear();
        }
        cache.insert(key, value);
    }
}

// =============================================================================
// HEURISTICS
// =============================================================================

/// Whether a text run is worth sending to a provider. Requires at least
/// two consecutive alphabetic characters somewhere in the text: empty
/// strings, whitespace, numbers, dates, and docket codes like
/// `A-123456 / 2026` are not worth a network call.
#[must_use]
pub fn needs_translation(text: &str) -> bool {
    let mut run = 0usize;
    for c in text.chars() {
        if c.is_alphabetic() {
            run += 1;
            if run == 2 {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

/// Cheap es/en guess for untagged text. Spanish-only characters or common
/// Spanish function words vote Spanish; English function words vote
/// English; ties fall back to `default`.
#[must_use]
pub fn detect_lang(text: &str, default: Lang) -> Lang {
    if text.chars().any(|c| "áéíóúñü¿¡ÁÉÍÓÚÑÜ".contains(c)) {
        return Lang::Es;
    }

    const ES_WORDS: [&str; 10] = ["el", "la", "los", "las", "de", "del", "que", "para", "por", "con"];
    const EN_WORDS: [&str; 10] = ["the", "of", "and", "to", "for", "with", "is", "are", "this", "that"];

    let mut es = 0usize;
    let mut en = 0usize;
    for word in text.split_whitespace() {
        let word = word.trim_matches(|c: char| !c.is_alphabetic()).to_lowercase();
        if ES_WORDS.contains(&word.as_str()) {
            es += 1;
        }
        if EN_WORDS.contains(&word.as_str()) {
            en += 1;
        }
    }

    match es.cmp(&en) {
        std::cmp::Ordering::Greater => Lang::Es,
        std::cmp::Ordering::Less => Lang::En,
        std::cmp::Ordering::Equal => default,
    }
}
