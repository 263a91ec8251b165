//! Template store — stamped upserts for current documents and an
//! append-only backup table.
//!
//! DESIGN
//! ======
//! `templates` holds one current row per template id. Writes carry the
//! document's `meta.version` as a stamp and the upsert only applies when
//! the incoming stamp is at least the stored one, so a slow older write
//! completing late can never clobber newer state — it is discarded and
//! logged instead of surfacing as an error.
//!
//! `template_backups` is append-only: rows are immutable, keyed by
//! `(template_id, ts)`, and never overwritten. Retention is a bounded
//! keep-newest-N prune per template.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::doc::{Template, now_ms};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("template not found: {0}")]
    TemplateNotFound(Uuid),
    #[error("no backup for template {template_id} at {ts}")]
    BackupNotFound { template_id: Uuid, ts: i64 },
    #[error("stored document is corrupt: {0}")]
    CorruptDocument(#[from] serde_json::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Listing row for the template picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSummary {
    pub id: Uuid,
    pub name: String,
    pub status: String,
    pub version: i64,
    pub updated_at: i64,
}

/// Listing row for the restore-by-timestamp picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupSummary {
    pub template_id: Uuid,
    pub ts: i64,
    pub is_auto: bool,
    pub label: Option<String>,
}

/// Store over the embedded SQLite database. Cheap to clone.
#[derive(Clone)]
pub struct TemplateStore {
    pool: SqlitePool,
}

impl TemplateStore {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The underlying pool, for callers that manage its lifecycle.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // =========================================================================
    // TEMPLATES
    // =========================================================================

    /// Upsert the current document for a template, last-stamp-wins.
    ///
    /// Returns `true` when the row was written, `false` when the write was
    /// discarded as stale (an equal-or-newer stamp is already stored).
    ///
    /// # Errors
    ///
    /// Returns a database error if the serialization or write fails.
    pub async fn save_template(&self, template: &Template) -> Result<bool, StoreError> {
        let doc = serde_json::to_value(template)?;
        let result = sqlx::query(
            "INSERT INTO templates (id, name, status, version, doc, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (id) DO UPDATE SET \
                 name = excluded.name, status = excluded.status, version = excluded.version, \
                 doc = excluded.doc, updated_at = excluded.updated_at \
             WHERE excluded.version >= templates.version",
        )
        .bind(template.meta.id)
        .bind(&template.meta.name)
        .bind(template.meta.status.as_str())
        .bind(template.meta.version)
        .bind(&doc)
        .bind(template.meta.created_at)
        .bind(now_ms())
        .execute(&self.pool)
        .await?;

        let written = result.rows_affected() > 0;
        if !written {
            debug!(id = %template.meta.id, version = template.meta.version, "stale template write discarded");
        }
        Ok(written)
    }

    /// Load the current document for a template.
    ///
    /// # Errors
    ///
    /// Returns `TemplateNotFound` for unknown ids and `CorruptDocument`
    /// when the stored JSON no longer parses.
    pub async fn load_template(&self, id: Uuid) -> Result<Template, StoreError> {
        let row: Option<(serde_json::Value,)> =
            sqlx::query_as("SELECT doc FROM templates WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        let Some((doc,)) = row else {
            return Err(StoreError::TemplateNotFound(id));
        };
        Ok(serde_json::from_value(doc)?)
    }

    /// List stored templates, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn list_templates(&self) -> Result<Vec<TemplateSummary>, StoreError> {
        let rows = sqlx::query_as::<_, (Uuid, String, String, i64, i64)>(
            "SELECT id, name, status, version, updated_at \
             FROM templates ORDER BY updated_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, status, version, updated_at)| TemplateSummary {
                id,
                name,
                status,
                version,
                updated_at,
            })
            .collect())
    }

    /// Delete a template and its backups.
    ///
    /// # Errors
    ///
    /// Returns `TemplateNotFound` when no row was deleted.
    pub async fn delete_template(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM templates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::TemplateNotFound(id));
        }
        sqlx::query("DELETE FROM template_backups WHERE template_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // =========================================================================
    // BACKUPS
    // =========================================================================

    /// Insert an immutable backup row. A row already present at the same
    /// `(template_id, ts)` is left untouched — backups are never
    /// overwritten.
    ///
    /// # Errors
    ///
    /// Returns a database error if the write fails.
    pub async fn insert_backup(
        &self,
        template: &Template,
        ts: i64,
        is_auto: bool,
        label: Option<&str>,
    ) -> Result<(), StoreError> {
        let snapshot = serde_json::to_value(template)?;
        sqlx::query(
            "INSERT INTO template_backups (template_id, ts, is_auto, label, snapshot) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (template_id, ts) DO NOTHING",
        )
        .bind(template.meta.id)
        .bind(ts)
        .bind(is_auto)
        .bind(label)
        .bind(&snapshot)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Fetch the exact backup at `(template_id, ts)`.
    ///
    /// # Errors
    ///
    /// Returns `BackupNotFound` when no row matches.
    pub async fn backup_at(&self, template_id: Uuid, ts: i64) -> Result<Template, StoreError> {
        let row: Option<(serde_json::Value,)> = sqlx::query_as(
            "SELECT snapshot FROM template_backups WHERE template_id = $1 AND ts = $2",
        )
        .bind(template_id)
        .bind(ts)
        .fetch_optional(&self.pool)
        .await?;

        let Some((snapshot,)) = row else {
            return Err(StoreError::BackupNotFound { template_id, ts });
        };
        Ok(serde_json::from_value(snapshot)?)
    }

    /// List backups for a template, newest first.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn list_backups(&self, template_id: Uuid) -> Result<Vec<BackupSummary>, StoreError> {
        let rows = sqlx::query_as::<_, (Uuid, i64, bool, Option<String>)>(
            "SELECT template_id, ts, is_auto, label \
             FROM template_backups WHERE template_id = $1 \
             ORDER BY ts DESC",
        )
        .bind(template_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(template_id, ts, is_auto, label)| BackupSummary { template_id, ts, is_auto, label })
            .collect())
    }

    /// Timestamp of the newest automatic backup, if one exists.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn latest_auto_backup_ts(&self, template_id: Uuid) -> Result<Option<i64>, StoreError> {
        let ts: Option<i64> = sqlx::query_scalar(
            "SELECT MAX(ts) FROM template_backups WHERE template_id = $1 AND is_auto = 1",
        )
        .bind(template_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(ts)
    }

    /// Keep only the newest `keep_last` backups for a template.
    ///
    /// # Errors
    ///
    /// Returns a database error if the delete fails.
    pub async fn prune_backups(&self, template_id: Uuid, keep_last: i64) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "DELETE FROM template_backups \
             WHERE template_id = $1 AND ts NOT IN ( \
                 SELECT ts FROM template_backups \
                 WHERE template_id = $1 \
                 ORDER BY ts DESC LIMIT $2)",
        )
        .bind(template_id)
        .bind(keep_last.max(0))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
