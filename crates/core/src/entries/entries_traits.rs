use crate::entries::entries_model::{NewEntry, SavedEntry};
use crate::errors::Result;
use async_trait::async_trait;

/// Whole-collection update applied to the stored blob.
///
/// Receives the current blob (`None` if nothing was ever written) and returns
/// the text to store in its place.
pub type BlobUpdate = Box<dyn FnOnce(Option<String>) -> Result<String> + Send + 'static>;

/// Trait for the storage backing the saved entries.
///
/// The entries live as one JSON blob under a fixed key. Implementations must
/// apply each [`BlobUpdate`] as a single read-modify-write, serialized with
/// every other update.
#[async_trait]
pub trait EntryRepositoryTrait: Send + Sync {
    fn load_blob(&self) -> Result<Option<String>>;
    async fn update_blob(&self, update: BlobUpdate) -> Result<()>;
}

/// Trait for saved entry operations
#[async_trait]
pub trait EntryServiceTrait: Send + Sync {
    /// All entries, most recently created first. Never fails: unreadable
    /// storage yields an empty list.
    fn list(&self) -> Vec<SavedEntry>;
    fn get(&self, entry_id: &str) -> Option<SavedEntry>;
    async fn save(&self, new_entry: NewEntry) -> Result<SavedEntry>;
    async fn delete(&self, entry_id: &str) -> Result<()>;
    /// CSV export of [`list`](Self::list), or `None` when there is nothing to export.
    fn export_csv(&self) -> Result<Option<String>>;
}
