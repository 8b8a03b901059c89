//! Screen state for the CRM views.

pub mod customer_list;

pub use customer_list::CustomerListView;
