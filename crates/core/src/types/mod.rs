//! Core types for the salon CRM.
//!
//! This module provides type-safe wrappers for the customer domain and the
//! forward-declared integration contracts.

pub mod api;
pub mod badge;
pub mod customer;
pub mod email;
pub mod id;
pub mod integration;
pub mod status;

pub use api::{ApiError, ErrorCode, PaginatedResponse, PaginationParams};
pub use badge::{BadgeCategory, plan_category, status_category};
pub use customer::{Customer, CustomerPatch, NewCustomer};
pub use email::{Email, EmailError};
pub use id::*;
pub use integration::*;
pub use status::*;
