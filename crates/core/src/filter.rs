//! Client-side filtering of a fetched customer list.
//!
//! A customer is visible when it passes all three terms:
//!
//! - search: unset, or a case-insensitive substring of the name or email, or
//!   an exact substring of the phone number
//! - plan: unset, or equal to the customer's plan
//! - status: unset, or equal to the customer's status
//!
//! Filtering never reorders: the result is always a subsequence of the input.

use serde::{Deserialize, Serialize};

use crate::types::{Customer, Plan, Status};

/// The three independent filter terms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerFilter {
    search: Option<String>,
    plan: Option<Plan>,
    status: Option<Status>,
}

impl CustomerFilter {
    /// A filter with every term unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search term. An empty string unsets it.
    pub fn set_search(&mut self, term: impl Into<String>) {
        let term = term.into();
        self.search = (!term.is_empty()).then_some(term);
    }

    pub const fn set_plan(&mut self, plan: Option<Plan>) {
        self.plan = plan;
    }

    pub const fn set_status(&mut self, status: Option<Status>) {
        self.status = status;
    }

    /// Builder form of [`Self::set_search`].
    #[must_use]
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.set_search(term);
        self
    }

    #[must_use]
    pub const fn with_plan(mut self, plan: Plan) -> Self {
        self.plan = Some(plan);
        self
    }

    #[must_use]
    pub const fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    #[must_use]
    pub const fn plan(&self) -> Option<Plan> {
        self.plan
    }

    #[must_use]
    pub const fn status(&self) -> Option<Status> {
        self.status
    }

    /// Reset every term to unset.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether any term is set.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.search.is_some() || self.plan.is_some() || self.status.is_some()
    }

    /// Whether `customer` passes every term.
    #[must_use]
    pub fn matches(&self, customer: &Customer) -> bool {
        self.matches_search(customer)
            && self.plan.is_none_or(|plan| plan == customer.plan)
            && self.status.is_none_or(|status| status == customer.status)
    }

    fn matches_search(&self, customer: &Customer) -> bool {
        let Some(term) = self.search.as_deref() else {
            return true;
        };
        let needle = term.to_lowercase();

        customer.name.to_lowercase().contains(&needle)
            || customer
                .email
                .as_ref()
                .is_some_and(|email| email.as_str().to_lowercase().contains(&needle))
            || customer
                .phone
                .as_deref()
                .is_some_and(|phone| phone.contains(term))
    }
}

/// The customers that pass `filter`, in their original order.
#[must_use]
pub fn filter_customers<'a>(customers: &'a [Customer], filter: &CustomerFilter) -> Vec<&'a Customer> {
    customers.iter().filter(|c| filter.matches(c)).collect()
}
