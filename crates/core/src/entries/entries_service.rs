use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde_json::Value;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::entries::entries_export::export_entries_csv_local;
use crate::entries::entries_model::{saved_at_now, NewEntry, SavedEntry};
use crate::entries::entries_traits::{EntryRepositoryTrait, EntryServiceTrait};
use crate::errors::{Error, Result, ValidationError};

/// Service for the saved calculation history.
pub struct EntryService {
    repository: Arc<dyn EntryRepositoryTrait>,
}

impl EntryService {
    pub fn new(repository: Arc<dyn EntryRepositoryTrait>) -> Self {
        EntryService { repository }
    }
}

/// Splits a stored blob into its raw records.
///
/// A missing or blank blob holds no records. `None` means the blob is not a
/// JSON array at all.
fn decode_records(blob: Option<&str>) -> Option<Vec<Value>> {
    let Some(raw) = blob.filter(|raw| !raw.trim().is_empty()) else {
        return Some(Vec::new());
    };
    match serde_json::from_str::<Vec<Value>>(raw) {
        Ok(records) => Some(records),
        Err(e) => {
            warn!("Saved entries blob is unreadable: {}", e);
            None
        }
    }
}

/// Decodes every readable record of a stored blob. Records that do not
/// decode are skipped, so one bad record never hides the rest.
fn decode_entries(blob: Option<&str>) -> Vec<SavedEntry> {
    decode_records(blob)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<SavedEntry>(record) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable saved entry: {}", e);
                None
            }
        })
        .collect()
}

/// Records to rewrite during a mutation. Fails instead of treating an
/// unreadable blob as an empty history.
fn records_for_update(current: Option<String>) -> Result<Vec<Value>> {
    decode_records(current.as_deref()).ok_or_else(|| {
        ValidationError::InvalidInput(
            "stored entries are unreadable and were left untouched".to_string(),
        )
        .into()
    })
}

fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

/// Inserts or replaces `new_entry` in `records` and returns the stored entry.
///
/// A known id is replaced in place. Anything else gets `fresh_id` and goes to
/// the head of the list. Other records are kept verbatim.
fn apply_save(
    records: &mut Vec<Value>,
    new_entry: NewEntry,
    fresh_id: String,
    saved_at: DateTime<Utc>,
) -> Result<SavedEntry> {
    let existing_index = new_entry
        .id
        .as_deref()
        .and_then(|id| records.iter().position(|r| record_id(r) == Some(id)));

    match existing_index {
        Some(index) => {
            let id = record_id(&records[index]).unwrap_or_default().to_string();
            let entry = new_entry.into_saved(id, saved_at);
            records[index] = serde_json::to_value(&entry)?;
            Ok(entry)
        }
        None => {
            let entry = new_entry.into_saved(fresh_id, saved_at);
            records.insert(0, serde_json::to_value(&entry)?);
            Ok(entry)
        }
    }
}

#[async_trait]
impl EntryServiceTrait for EntryService {
    fn list(&self) -> Vec<SavedEntry> {
        match self.repository.load_blob() {
            Ok(blob) => decode_entries(blob.as_deref()),
            Err(e) => {
                warn!("Failed to read saved entries: {}", e);
                Vec::new()
            }
        }
    }

    fn get(&self, entry_id: &str) -> Option<SavedEntry> {
        self.list().into_iter().find(|e| e.id == entry_id)
    }

    async fn save(&self, new_entry: NewEntry) -> Result<SavedEntry> {
        new_entry.validate()?;
        let fresh_id = Uuid::new_v4().to_string();
        let saved_at = saved_at_now();
        let (stored_tx, stored_rx) = oneshot::channel();

        self.repository
            .update_blob(Box::new(move |current| {
                let mut records = records_for_update(current)?;
                let stored = apply_save(&mut records, new_entry, fresh_id, saved_at)?;
                let blob = serde_json::to_string(&records)?;
                let _ = stored_tx.send(stored);
                Ok(blob)
            }))
            .await?;

        let stored = stored_rx
            .await
            .map_err(|_| Error::Unexpected("Saved entry was not reported back".to_string()))?;
        debug!("Saved entry {} ({})", stored.id, stored.stock_name);
        Ok(stored)
    }

    async fn delete(&self, entry_id: &str) -> Result<()> {
        let target = entry_id.to_string();
        self.repository
            .update_blob(Box::new(move |current| {
                let mut records = records_for_update(current)?;
                records.retain(|r| record_id(r) != Some(target.as_str()));
                Ok(serde_json::to_string(&records)?)
            }))
            .await?;
        debug!("Deleted entry {}", entry_id);
        Ok(())
    }

    fn export_csv(&self) -> Result<Option<String>> {
        export_entries_csv_local(&self.list())
    }
}
