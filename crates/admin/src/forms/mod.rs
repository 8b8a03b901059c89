//! Form submission adapters.

pub mod customer;

pub use customer::{CustomerForm, FormError, FormField};
