//! Backup service — periodic immutable template snapshots and
//! restore-by-timestamp.
//!
//! DESIGN
//! ======
//! Backups are independent of the in-memory undo history and of autosave:
//! a separate timer cuts a full snapshot row keyed `(template_id, ts)`.
//! Rows are additive and never overwritten; retention keeps the newest N
//! per template. A backup failure is logged and never blocks editing.

#[cfg(test)]
#[path = "backup_test.rs"]
mod backup_test;

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use uuid::Uuid;

use crate::consts::{DEFAULT_BACKUP_INTERVAL_MS, DEFAULT_BACKUP_RETENTION};
use crate::doc::{Template, now_ms};
use crate::services::env_parse;
use crate::session::SharedSession;
use crate::store::{StoreError, TemplateStore};

/// Tuning knobs for the backup service, loaded from environment variables
/// or supplied explicitly for tests.
#[derive(Debug, Clone, Copy)]
pub struct BackupConfig {
    /// Cadence of the periodic snapshot, in milliseconds. Also the
    /// debounce floor between two automatic backups.
    pub interval_ms: u64,
    /// Newest backups retained per template.
    pub retention: i64,
}

impl BackupConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            interval_ms: env_parse("BACKUP_INTERVAL_MS", DEFAULT_BACKUP_INTERVAL_MS),
            retention: env_parse("BACKUP_RETENTION", DEFAULT_BACKUP_RETENTION),
        }
    }
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self { interval_ms: DEFAULT_BACKUP_INTERVAL_MS, retention: DEFAULT_BACKUP_RETENTION }
    }
}

/// Handle to the spawned backup task.
pub struct BackupService {
    handle: JoinHandle<()>,
}

impl BackupService {
    /// Spawn the periodic backup loop for one session.
    #[must_use]
    pub fn spawn(session: SharedSession, store: TemplateStore, config: BackupConfig) -> Self {
        info!(interval_ms = config.interval_ms, retention = config.retention, "backup service configured");
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_millis(config.interval_ms.max(1)));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let template = session.read().await.template().clone();
                if let Err(e) = maybe_create_auto_backup(&store, &template, &config).await {
                    warn!(error = %e, id = %template.meta.id, "periodic backup failed; editing continues");
                }
            }
        });
        Self { handle }
    }

    /// Stop the background task.
    pub fn shutdown(self) {
        self.handle.abort();
    }
}

/// Create an automatic backup unless one was cut within the configured
/// interval. Prunes to the retention bound afterwards. Returns the new
/// backup timestamp, or `None` when debounced.
///
/// # Errors
///
/// Returns the store error if the snapshot write fails.
pub async fn maybe_create_auto_backup(
    store: &TemplateStore,
    template: &Template,
    config: &BackupConfig,
) -> Result<Option<i64>, StoreError> {
    let now = now_ms();
    if let Some(last_ts) = store.latest_auto_backup_ts(template.meta.id).await? {
        let interval = i64::try_from(config.interval_ms).unwrap_or(i64::MAX);
        if now.saturating_sub(last_ts) < interval {
            return Ok(None);
        }
    }

    store.insert_backup(template, now, true, Some("auto backup")).await?;
    let pruned = store.prune_backups(template.meta.id, config.retention).await?;
    if pruned > 0 {
        info!(id = %template.meta.id, pruned, "pruned old backups");
    }
    Ok(Some(now))
}

/// Restore the exact snapshot taken at `ts`. The current editing state is
/// untouched; the caller decides whether to open a session on the result.
///
/// # Errors
///
/// Returns [`StoreError::BackupNotFound`] when no backup exists at that
/// timestamp.
pub async fn restore_from_backup(
    store: &TemplateStore,
    template_id: Uuid,
    ts: i64,
) -> Result<Template, StoreError> {
    store.backup_at(template_id, ts).await
}
