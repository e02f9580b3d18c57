//! Alinea: a small reporting core. Accounts log in, file weekly or monthly
//! reports for their division, and admins review, summarize and export them.
//! Everything persists write-through to a local key-value store.

pub mod auth;
pub mod backup;
pub mod cli;
pub mod clock;
pub mod config;
pub mod context;
pub mod error;
pub mod export;
pub mod ids;
pub mod models;
pub mod report_store;
pub mod storage;
pub mod user_store;
pub mod validation;
pub mod views;

pub use context::Alinea;
pub use error::{AlineaError, Result};
