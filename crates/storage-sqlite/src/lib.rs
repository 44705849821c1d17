//! SQLite storage implementation for Borsa Go.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository trait defined in `borsa-go-core` and contains:
//! - Database connection pooling and the single-writer actor
//! - Diesel migrations
//! - The key-value blob table holding the saved entries
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! The core crate is storage-agnostic and works with traits.
//!
//! ```text
//!   core (domain)
//!         │
//!         ▼
//!   storage-sqlite (this crate)
//!         │
//!         ▼
//!     SQLite DB
//! ```

pub mod db;
pub mod entries;
pub mod errors;
pub mod schema;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from borsa-go-core for convenience
pub use borsa_go_core::errors::{DatabaseError, Error, Result};
