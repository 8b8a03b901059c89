//! Record access on top of the document store.
//!
//! # Collections
//!
//! - `customers` - Salon customer records ([`CustomerRepository`])
//!
//! The other collections named in [`salon_crm_core::collections`] are shared
//! with the e-mail integration and are not accessed from here.

pub mod customers;

use thiserror::Error;

use crate::store::StoreError;

pub use customers::CustomerRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    /// The document store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A stored document could not be read as a record.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested record was not found.
    #[error("not found")]
    NotFound,

    /// The record supplied by the caller is not acceptable.
    #[error("validation failed: {0}")]
    Validation(String),
}
