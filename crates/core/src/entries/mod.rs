//! Entries module - saved calculation history, its storage seam and CSV export.

mod entries_export;
mod entries_model;
mod entries_service;
mod entries_traits;

pub use entries_export::{
    export_entries_csv, export_entries_csv_local, format_amount, EXPORT_HEADERS,
};
pub use entries_model::{NewEntry, SavedEntry};
pub use entries_service::EntryService;
pub use entries_traits::{BlobUpdate, EntryRepositoryTrait, EntryServiceTrait};
