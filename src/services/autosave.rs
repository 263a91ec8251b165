//! Autosave service — debounced background flush of the editing session.
//!
//! DESIGN
//! ======
//! A background task ticks at the session's autosave interval. On each
//! tick it snapshots the template if the session is dirty and autosave is
//! enabled, writes outside the lock, then acknowledges the save. A burst
//! of edits inside one interval coalesces into a single write reflecting
//! only the final state; a new edit within the window simply replaces
//! what the next tick will persist.
//!
//! ERROR HANDLING
//! ==============
//! The dirty flag is cleared only after a successful write, so a failed
//! write is retried on the next tick. Store unavailability degrades to
//! in-memory editing with a warning; it never ends the session.

#[cfg(test)]
#[path = "autosave_test.rs"]
mod autosave_test;

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::doc::now_ms;
use crate::session::{SavePoint, SharedSession};
use crate::store::{StoreError, TemplateStore};

/// Handle to the spawned autosave task.
pub struct AutosaveService {
    handle: JoinHandle<()>,
}

impl AutosaveService {
    /// Spawn the autosave loop for one session.
    ///
    /// The tick interval comes from the session's
    /// `settings.autosave_interval_ms` at spawn time.
    #[must_use]
    pub async fn spawn(session: SharedSession, store: TemplateStore) -> Self {
        let interval_ms = {
            let session = session.read().await;
            session.template().settings.autosave_interval_ms
        };
        info!(interval_ms, "autosave configured");

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms.max(1)));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick of a tokio interval fires immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                flush_if_dirty(&session, &store).await;
            }
        });
        Self { handle }
    }

    /// Stop the background task. Pending edits stay in memory; callers
    /// wanting durability should `save_now` first.
    pub fn shutdown(self) {
        self.handle.abort();
    }
}

/// One autosave cycle: snapshot under the lock, write outside it,
/// acknowledge on success. Failures leave the dirty flag set for retry.
pub async fn flush_if_dirty(session: &SharedSession, store: &TemplateStore) {
    // PHASE: SNAPSHOT UNDER LOCK
    // WHY: keep the write itself outside the session lock.
    let save = {
        let mut session = session.write().await;
        if !session.is_dirty() || !session.template().settings.autosave {
            return;
        }
        session.begin_save()
    };

    match store.save_template(&save.template).await {
        Ok(written) => {
            // A discarded stale stamp still means newer state is durable.
            if !written {
                warn!(id = %save.template.meta.id, "autosave write discarded as stale");
            }
            session.write().await.acknowledge_save(save.revision);
        }
        Err(e) => {
            warn!(error = %e, id = %save.template.meta.id, "autosave failed; will retry on next tick");
        }
    }
}

/// Explicit save: bump the version, persist, and cut a backup at the same
/// instant. The backup is best-effort — a backup failure does not undo
/// the save.
///
/// # Errors
///
/// Returns the store error when the template write itself fails; the
/// session stays dirty in that case.
pub async fn save_now(session: &SharedSession, store: &TemplateStore) -> Result<SavePoint, StoreError> {
    let save = {
        let mut session = session.write().await;
        session.begin_save()
    };

    store.save_template(&save.template).await?;
    session.write().await.acknowledge_save(save.revision);

    if let Err(e) = store
        .insert_backup(&save.template, now_ms(), false, Some("manual save"))
        .await
    {
        warn!(error = %e, id = %save.template.meta.id, "backup on explicit save failed");
    }
    Ok(save)
}
