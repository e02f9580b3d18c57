//! Core types and traits for Alinea storage backends.
//!
//! This crate provides the `KeyValueStore` trait, the entity types persisted
//! through it, and the patch types used to update them, so that backends can
//! live in separate crates.

pub mod models;
pub mod storage;

// Re-export key types at crate root for convenience
pub use models::{Account, Category, Report, ReportStatus, ReportType, Role, WeekNumber};
pub use models::write::{AccountPatch, NewAccount, NewReport, ReportDraft, ReportPatch};
pub use storage::{keys, KeyValueStore, StorageError, TransactionId};
