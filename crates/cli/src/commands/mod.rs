//! CLI command implementations.

pub mod customers;
pub mod seed;
