use std::sync::Arc;

use tokio::sync::RwLock;

use super::*;
use crate::db::init_memory_pool;
use crate::doc::Template;
use crate::session::EditorSession;

async fn setup() -> (SharedSession, TemplateStore) {
    let store = TemplateStore::new(init_memory_pool().await.unwrap());
    let session = Arc::new(RwLock::new(EditorSession::open(Template::new("t"))));
    (session, store)
}

// =============================================================================
// flush_if_dirty
// =============================================================================

#[tokio::test]
async fn clean_session_writes_nothing() {
    let (session, store) = setup().await;
    flush_if_dirty(&session, &store).await;
    assert!(store.list_templates().await.unwrap().is_empty());
}

#[tokio::test]
async fn burst_of_edits_coalesces_into_one_write() {
    let (session, store) = setup().await;

    // Several edits land inside a single autosave window.
    {
        let mut s = session.write().await;
        s.add_component("text", (0.0, 0.0), (2, 2), None).unwrap();
        s.add_component("card", (0.0, 60.0), (4, 4), None).unwrap();
        s.add_component("label", (0.0, 180.0), (2, 1), None).unwrap();
    }

    flush_if_dirty(&session, &store).await;

    let s = session.read().await;
    assert!(!s.is_dirty());
    let persisted = store.load_template(s.template().meta.id).await.unwrap();
    // The single write reflects the final state only.
    assert_eq!(persisted.components.len(), 3);
    assert_eq!(&persisted, s.template());
}

#[tokio::test]
async fn second_flush_without_edits_is_noop() {
    let (session, store) = setup().await;
    session.write().await.add_component("text", (0.0, 0.0), (2, 2), None).unwrap();

    flush_if_dirty(&session, &store).await;
    let version = session.read().await.template().meta.version;

    // Nothing changed; the next tick must not bump the version again.
    flush_if_dirty(&session, &store).await;
    assert_eq!(session.read().await.template().meta.version, version);
}

#[tokio::test]
async fn autosave_disabled_skips_flush() {
    let store = TemplateStore::new(init_memory_pool().await.unwrap());
    let mut template = Template::new("t");
    template.settings.autosave = false;
    let session: SharedSession = Arc::new(RwLock::new(EditorSession::open(template)));
    session.write().await.add_component("card", (0.0, 0.0), (2, 2), None).unwrap();

    flush_if_dirty(&session, &store).await;
    assert!(store.list_templates().await.unwrap().is_empty());
    assert!(session.read().await.is_dirty());
}

#[tokio::test]
async fn failed_write_keeps_dirty_for_retry() {
    let (session, store) = setup().await;
    session.write().await.add_component("text", (0.0, 0.0), (2, 2), None).unwrap();

    // Simulate store unavailability.
    store.pool().close().await;
    flush_if_dirty(&session, &store).await;
    assert!(session.read().await.is_dirty(), "dirty flag must survive a failed write");
}

// =============================================================================
// save_now
// =============================================================================

#[tokio::test]
async fn save_now_persists_and_cuts_manual_backup() {
    let (session, store) = setup().await;
    session.write().await.add_component("text", (0.0, 0.0), (2, 2), None).unwrap();

    let save = save_now(&session, &store).await.unwrap();
    assert!(!session.read().await.is_dirty());

    let id = save.template.meta.id;
    assert_eq!(store.load_template(id).await.unwrap(), save.template);
    let backups = store.list_backups(id).await.unwrap();
    assert_eq!(backups.len(), 1);
    assert!(!backups[0].is_auto);
    assert_eq!(backups[0].label.as_deref(), Some("manual save"));
}

#[tokio::test]
async fn save_now_bumps_version_each_time() {
    let (session, store) = setup().await;
    session.write().await.add_component("text", (0.0, 0.0), (2, 2), None).unwrap();

    let first = save_now(&session, &store).await.unwrap();
    session.write().await.add_component("card", (0.0, 0.0), (2, 2), None).unwrap();
    let second = save_now(&session, &store).await.unwrap();
    assert!(second.template.meta.version > first.template.meta.version);
}

// =============================================================================
// service lifecycle
// =============================================================================

#[tokio::test]
async fn spawned_service_flushes_on_tick() {
    let (session, store) = setup().await;
    {
        let mut s = session.write().await;
        let mut fast = s.template().clone();
        fast.settings.autosave_interval_ms = 20;
        *s = EditorSession::open(fast);
        s.add_component("text", (0.0, 0.0), (2, 2), None).unwrap();
    }

    let service = AutosaveService::spawn(Arc::clone(&session), store.clone()).await;
    tokio::time::sleep(std::time::Duration::from_millis(120)).await;
    service.shutdown();

    let id = session.read().await.template().meta.id;
    assert!(store.load_template(id).await.is_ok());
    assert!(!session.read().await.is_dirty());
}
