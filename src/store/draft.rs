//! Form draft persistence.
//!
//! Drafts exist purely so an accidental page reload does not lose a
//! half-filled profile form. They are namespaced by user address and
//! form mode, and expire after 24 hours so stale data is never restored.

use super::{KeyValueStore, StoreResult};
use crate::profile::ProfileForm;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const DRAFT_PREFIX: &str = "sb_profile_draft_";

/// Drafts older than this are purged on load.
pub const DRAFT_EXPIRY_HOURS: i64 = 24;

/// Which form a draft belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftMode {
    Create,
    Edit,
}

impl DraftMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftMode::Create => "create",
            DraftMode::Edit => "edit",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct DraftRecord {
    form: ProfileForm,
    saved_at: i64,
}

/// Store for in-progress profile form drafts.
#[derive(Clone)]
pub struct DraftStore {
    store: Arc<dyn KeyValueStore>,
}

impl DraftStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn key(address: &str, mode: DraftMode) -> String {
        format!("{DRAFT_PREFIX}{}_{address}", mode.as_str())
    }

    /// Save a draft. Empty forms are not saved so the store stays clean;
    /// string fields are trimmed before writing.
    pub fn save(&self, address: &str, mode: DraftMode, form: &ProfileForm) -> StoreResult<()> {
        self.save_at(address, mode, form, Utc::now())
    }

    fn save_at(
        &self,
        address: &str,
        mode: DraftMode,
        form: &ProfileForm,
        now: DateTime<Utc>,
    ) -> StoreResult<()> {
        let form = form.trimmed();
        if !form.has_content() {
            return Ok(());
        }

        let record = DraftRecord {
            form,
            saved_at: now.timestamp_millis(),
        };
        self.store.set(
            &Self::key(address, mode),
            &serde_json::to_string(&record)?,
            None,
        )
    }

    /// Load a draft if one exists and has not expired. Expired or
    /// unparseable drafts are purged and read as absent.
    pub fn load(&self, address: &str, mode: DraftMode) -> StoreResult<Option<ProfileForm>> {
        self.load_at(address, mode, Utc::now())
    }

    fn load_at(
        &self,
        address: &str,
        mode: DraftMode,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<ProfileForm>> {
        let key = Self::key(address, mode);
        let Some(json) = self.store.get(&key)? else {
            return Ok(None);
        };

        let record: DraftRecord = match serde_json::from_str(&json) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(address, error = %e, "Discarding unparseable form draft");
                self.store.remove(&key)?;
                return Ok(None);
            }
        };

        let age_ms = now.timestamp_millis() - record.saved_at;
        if age_ms > DRAFT_EXPIRY_HOURS * 60 * 60 * 1000 {
            self.store.remove(&key)?;
            return Ok(None);
        }

        Ok(Some(record.form))
    }

    pub fn clear(&self, address: &str, mode: DraftMode) -> StoreResult<()> {
        self.store.remove(&Self::key(address, mode))
    }

    pub fn has_draft(&self, address: &str, mode: DraftMode) -> StoreResult<bool> {
        Ok(self.load(address, mode)?.is_some())
    }

    /// Timestamp of the last save, if a draft exists.
    pub fn saved_at(&self, address: &str, mode: DraftMode) -> StoreResult<Option<DateTime<Utc>>> {
        let Some(json) = self.store.get(&Self::key(address, mode))? else {
            return Ok(None);
        };
        let record: DraftRecord = match serde_json::from_str(&json) {
            Ok(record) => record,
            Err(_) => return Ok(None),
        };
        Ok(DateTime::from_timestamp_millis(record.saved_at))
    }
}
