//! Salon CRM client library.
//!
//! Customer records for a beauty and fashion salon, kept in a hosted
//! document database:
//!
//! - [`store`] - document store abstraction, Firestore REST and in-memory backends
//! - [`db`] - customer repository over the store
//! - [`views`] - customer list state with search, plan and status filters
//! - [`forms`] - new/edit customer form validation and submission
//!
//! Badge classification and the record types live in `salon_crm_core`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod seed;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod views;

pub use error::AppError;
pub use state::AppState;
