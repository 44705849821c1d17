//! SQLite storage implementation for saved entries.

mod model;
mod repository;

pub use model::AppStorageDB;
pub use repository::EntryRepository;

// Re-export trait from core for convenience
pub use borsa_go_core::entries::EntryRepositoryTrait;
