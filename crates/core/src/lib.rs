//! Borsa Go Core - profit calculator, saved entries, and traits.
//!
//! This crate contains the business logic for Borsa Go.
//! It is storage-agnostic and defines the `EntryRepositoryTrait` that is
//! implemented by the `storage-sqlite` crate.

pub mod calculator;
pub mod constants;
pub mod entries;
pub mod errors;

pub use calculator::{calculate, CalculationInput, CalculationResult};
pub use entries::{EntryService, EntryServiceTrait, NewEntry, SavedEntry};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
