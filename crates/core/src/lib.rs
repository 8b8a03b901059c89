//! Salon CRM Core - Shared domain types.
//!
//! This crate provides the types used across all salon CRM components:
//! - `admin` - Document store access, customer list view-model and form handling
//! - `cli` - Command-line tools for inspecting and seeding customer data
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. Everything in here can be evaluated
//! against an in-memory customer list.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, plan/status enums, customer records
//! - [`filter`] - Search and plan/status filtering over a fetched list

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod filter;
pub mod types;

pub use filter::{CustomerFilter, filter_customers};
pub use types::*;
