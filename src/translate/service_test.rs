use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::*;

// =============================================================================
// mock providers
// =============================================================================

struct FixedProvider {
    name: &'static str,
    reply: &'static str,
    calls: AtomicUsize,
}

impl FixedProvider {
    fn new(name: &'static str, reply: &'static str) -> Arc<Self> {
        Arc::new(Self { name, reply, calls: AtomicUsize::new(0) })
    }
}

#[async_trait::async_trait]
impl TranslationProvider for FixedProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn translate(&self, _text: &str, _source: Lang, _target: Lang) -> Result<String, TranslateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.to_owned())
    }
}

struct FailingProvider {
    calls: AtomicUsize,
}

impl FailingProvider {
    fn new() -> Arc<Self> {
        Arc::new(Self { calls: AtomicUsize::new(0) })
    }
}

#[async_trait::async_trait]
impl TranslationProvider for FailingProvider {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn translate(&self, _text: &str, _source: Lang, _target: Lang) -> Result<String, TranslateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(TranslateError::ApiResponse { status: 503, body: String::new() })
    }
}

struct HangingProvider;

#[async_trait::async_trait]
impl TranslationProvider for HangingProvider {
    fn name(&self) -> &'static str {
        "hanging"
    }

    async fn translate(&self, _text: &str, _source: Lang, _target: Lang) -> Result<String, TranslateError> {
        tokio::time::sleep(Duration::from_secs(3_600)).await;
        Ok(String::new())
    }
}

fn service(providers: Vec<Arc<dyn TranslationProvider>>) -> TranslateService {
    TranslateService::with_providers(providers, 100, 16)
}

// =============================================================================
// failover
// =============================================================================

#[tokio::test]
async fn first_provider_success_wins() {
    let first = FixedProvider::new("a", "Case status");
    let second = FixedProvider::new("b", "wrong");
    let svc = service(vec![first.clone(), second.clone()]);

    assert_eq!(svc.translate("Estado del caso", Lang::Es, Lang::En).await, "Case status");
    assert_eq!(first.calls.load(Ordering::SeqCst), 1);
    assert_eq!(second.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failed_provider_falls_through_to_next() {
    let failing = FailingProvider::new();
    let backup = FixedProvider::new("backup", "Case status");
    let svc = service(vec![failing.clone(), backup.clone()]);

    assert_eq!(svc.translate("Estado del caso", Lang::Es, Lang::En).await, "Case status");
    assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
    assert_eq!(backup.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn total_failure_returns_source_text() {
    let svc = service(vec![FailingProvider::new(), FailingProvider::new()]);
    assert_eq!(svc.translate("Estado del caso", Lang::Es, Lang::En).await, "Estado del caso");
}

#[tokio::test(start_paused = true)]
async fn hung_provider_times_out_to_next() {
    let backup = FixedProvider::new("backup", "Case status");
    let svc = service(vec![Arc::new(HangingProvider), backup.clone()]);

    assert_eq!(svc.translate("Estado del caso", Lang::Es, Lang::En).await, "Case status");
    assert_eq!(backup.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn all_providers_hung_returns_source_text() {
    let svc = service(vec![Arc::new(HangingProvider)]);
    assert_eq!(svc.translate("Estado del caso", Lang::Es, Lang::En).await, "Estado del caso");
}

// =============================================================================
// cache
// =============================================================================

#[tokio::test]
async fn repeated_requests_hit_the_cache() {
    let provider = FixedProvider::new("a", "Case status");
    let svc = service(vec![provider.clone()]);

    for _ in 0..3 {
        svc.translate("Estado del caso", Lang::Es, Lang::En).await;
    }
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    assert_eq!(svc.cache_len().await, 1);
}

#[tokio::test]
async fn cache_keys_on_direction() {
    let provider = FixedProvider::new("a", "same reply");
    let svc = service(vec![provider.clone()]);

    svc.translate("word", Lang::Es, Lang::En).await;
    svc.translate("word", Lang::En, Lang::Es).await;
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    assert_eq!(svc.cache_len().await, 2);
}

#[tokio::test]
async fn failed_translations_are_not_cached() {
    let failing = FailingProvider::new();
    let svc = service(vec![failing.clone()]);

    svc.translate("Estado del caso", Lang::Es, Lang::En).await;
    svc.translate("Estado del caso", Lang::Es, Lang::En).await;
    // Each attempt goes back to the provider.
    assert_eq!(failing.calls.load(Ordering::SeqCst), 2);
    assert_eq!(svc.cache_len().await, 0);
}

#[tokio::test]
async fn cache_capacity_is_bounded() {
    let provider = FixedProvider::new("a", "x");
    let svc = TranslateService::with_providers(vec![provider], 100, 2);

    svc.translate("uno", Lang::Es, Lang::En).await;
    svc.translate("dos", Lang::Es, Lang::En).await;
    svc.translate("tres", Lang::Es, Lang::En).await;
    assert!(svc.cache_len().await <= 2);
}

// =============================================================================
// short circuits
// =============================================================================

#[tokio::test]
async fn same_language_skips_providers() {
    let provider = FixedProvider::new("a", "nope");
    let svc = service(vec![provider.clone()]);
    assert_eq!(svc.translate("hola", Lang::Es, Lang::Es).await, "hola");
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn trivial_text_skips_providers() {
    let provider = FixedProvider::new("a", "nope");
    let svc = service(vec![provider.clone()]);
    for text in ["", "   ", "12345", "A-123456 / 2026"] {
        assert_eq!(svc.translate(text, Lang::Es, Lang::En).await, text);
    }
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

// =============================================================================
// heuristics
// =============================================================================

#[test]
fn needs_translation_requires_a_word() {
    assert!(needs_translation("Estado del caso"));
    assert!(needs_translation("registro"));
    assert!(!needs_translation(""));
    assert!(!needs_translation("   "));
    assert!(!needs_translation("12/03/2026"));
    // A stray letter in a docket code is not a word.
    assert!(!needs_translation("A-123456 / 2026"));
}

#[test]
fn detect_lang_spanish_characters_win() {
    assert_eq!(detect_lang("¿Dónde está la audiencia?", Lang::En), Lang::Es);
    assert_eq!(detect_lang("Número de registro", Lang::En), Lang::Es);
}

#[test]
fn detect_lang_counts_function_words() {
    assert_eq!(detect_lang("el estado del caso para la audiencia", Lang::En), Lang::Es);
    assert_eq!(detect_lang("the status of the case for the hearing", Lang::Es), Lang::En);
}

#[test]
fn detect_lang_tie_uses_default() {
    assert_eq!(detect_lang("registro", Lang::En), Lang::En);
    assert_eq!(detect_lang("registro", Lang::Es), Lang::Es);
}

#[tokio::test]
async fn translate_auto_infers_source() {
    let provider = FixedProvider::new("a", "Registration number");
    let svc = service(vec![provider.clone()]);
    assert_eq!(svc.translate_auto("Número de registro", Lang::En).await, "Registration number");
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}
