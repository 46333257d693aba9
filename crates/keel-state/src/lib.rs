//! # keel-state
//!
//! Ledger state-store access for the Keel stablecoin module.
//!
//! The surrounding ledger platform owns all persistence. This crate defines
//! the narrow surface the module consumes: a key/value store scoped to one
//! transaction, a deterministic composite-key scheme, and JSON load/save
//! plumbing for persistent records. Nothing here opens files or sockets,
//! which keeps every operation replayable by the platform.
//!
//! ## Modules
//!
//! - [`ledger`] — the state-store trait and composite-key scheme
//! - [`entity`] — JSON load/save for persistent records
//! - [`memory`] — in-memory store for tests

pub mod entity;
pub mod ledger;
pub mod memory;

/// Error types for state-store access.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// The underlying store failed or rejected the access.
    #[error("state backend error: {0}")]
    Backend(String),

    /// A stored record could not be encoded or decoded.
    #[error("state serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience result type for state-store operations.
pub type Result<T> = std::result::Result<T, StateError>;
