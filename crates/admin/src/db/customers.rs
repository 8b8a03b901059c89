//! Customer repository for document store operations.
//!
//! Customers live in the `customers` collection with camelCase field names.
//! The repository owns both timestamps: `createdAt` is written once on
//! creation and `updatedAt` on every write, both from the injected [`Clock`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use salon_crm_core::collections::CUSTOMERS;
use salon_crm_core::{Customer, CustomerId, CustomerPatch, Email, NewCustomer, Plan, Status};

use super::RepositoryError;
use crate::clock::Clock;
use crate::store::{Document, DocumentStore, FieldUpdate, FieldUpdates, FieldValue, Fields, SortDirection, StoreError};

/// Stored field names.
pub mod field {
    pub const NAME: &str = "name";
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const PLAN: &str = "plan";
    pub const STATUS: &str = "status";
    pub const CONTRACT_DATE: &str = "contractDate";
    pub const MAKEUP_COUNT: &str = "makeupCount";
    pub const HAIR_COUNT: &str = "hairCount";
    pub const FASHION_COUNT: &str = "fashionCount";
    pub const NEXT_DATE: &str = "nextDate";
    pub const NEXT_CONTENT: &str = "nextContent";
    pub const CREATED_AT: &str = "createdAt";
    pub const UPDATED_AT: &str = "updatedAt";
}

// =============================================================================
// Document Mapping
// =============================================================================

fn corrupt(id: &str, field: &str, problem: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::DataCorruption(format!("customer {id}: field {field}: {problem}"))
}

/// Read-side view of a stored document.
struct Reader<'a> {
    doc: &'a Document,
}

impl Reader<'_> {
    fn id(&self) -> &str {
        &self.doc.id
    }

    /// An optional string. Null and the empty string both read as absent.
    fn optional_string(&self, name: &str) -> Result<Option<String>, RepositoryError> {
        match self.doc.fields.get(name) {
            None | Some(FieldValue::Null) => Ok(None),
            Some(FieldValue::String(s)) if s.is_empty() => Ok(None),
            Some(FieldValue::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(corrupt(self.id(), name, format!("expected string, got {other:?}"))),
        }
    }

    fn required_string(&self, name: &str) -> Result<String, RepositoryError> {
        self.optional_string(name)?
            .ok_or_else(|| corrupt(self.id(), name, "missing"))
    }

    /// A session counter. Absent counters read as zero.
    fn counter(&self, name: &str) -> Result<u32, RepositoryError> {
        match self.doc.fields.get(name) {
            None | Some(FieldValue::Null) => Ok(0),
            Some(FieldValue::Integer(n)) => {
                u32::try_from(*n).map_err(|_| corrupt(self.id(), name, format!("out of range: {n}")))
            }
            Some(FieldValue::Double(d)) if d.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(d) => {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                Ok(*d as u32)
            }
            Some(other) => Err(corrupt(self.id(), name, format!("expected count, got {other:?}"))),
        }
    }

    fn timestamp(&self, name: &str) -> Result<Option<DateTime<Utc>>, RepositoryError> {
        match self.doc.fields.get(name) {
            None | Some(FieldValue::Null) => Ok(None),
            Some(FieldValue::Timestamp(at)) => Ok(Some(*at)),
            Some(other) => Err(corrupt(self.id(), name, format!("expected timestamp, got {other:?}"))),
        }
    }
}

impl TryFrom<&Document> for Customer {
    type Error = RepositoryError;

    fn try_from(doc: &Document) -> Result<Self, Self::Error> {
        let r = Reader { doc };

        let email = r
            .optional_string(field::EMAIL)?
            .map(|raw| Email::parse(&raw).map_err(|e| corrupt(r.id(), field::EMAIL, e)))
            .transpose()?;
        let plan: Plan = r
            .required_string(field::PLAN)?
            .parse()
            .map_err(|e| corrupt(r.id(), field::PLAN, e))?;
        let status: Status = r
            .required_string(field::STATUS)?
            .parse()
            .map_err(|e| corrupt(r.id(), field::STATUS, e))?;

        let created_at = r
            .timestamp(field::CREATED_AT)?
            .or(doc.create_time)
            .ok_or_else(|| corrupt(r.id(), field::CREATED_AT, "missing"))?;
        let updated_at = r
            .timestamp(field::UPDATED_AT)?
            .or(doc.update_time)
            .unwrap_or(created_at);

        Ok(Self {
            id: CustomerId::new(doc.id.clone()),
            name: r.required_string(field::NAME)?,
            email,
            phone: r.optional_string(field::PHONE)?,
            plan,
            status,
            contract_date: r.optional_string(field::CONTRACT_DATE)?,
            makeup_count: r.counter(field::MAKEUP_COUNT)?,
            hair_count: r.counter(field::HAIR_COUNT)?,
            fashion_count: r.counter(field::FASHION_COUNT)?,
            next_date: r.optional_string(field::NEXT_DATE)?,
            next_content: r.optional_string(field::NEXT_CONTENT)?,
            created_at,
            updated_at,
        })
    }
}

fn optional(value: Option<String>) -> Option<FieldValue> {
    value.filter(|s| !s.is_empty()).map(FieldValue::String)
}

/// Fields written when creating a customer. Absent optional fields are omitted.
fn encode_new(customer: NewCustomer, now: DateTime<Utc>) -> Fields {
    let mut fields = Fields::new();
    fields.insert(field::NAME.to_owned(), customer.name.into());
    fields.insert(field::PLAN.to_owned(), customer.plan.label().into());
    fields.insert(field::STATUS.to_owned(), customer.status.label().into());
    fields.insert(field::MAKEUP_COUNT.to_owned(), customer.makeup_count.into());
    fields.insert(field::HAIR_COUNT.to_owned(), customer.hair_count.into());
    fields.insert(field::FASHION_COUNT.to_owned(), customer.fashion_count.into());
    fields.insert(field::CREATED_AT.to_owned(), now.into());
    fields.insert(field::UPDATED_AT.to_owned(), now.into());

    let optionals = [
        (field::EMAIL, customer.email.map(Email::into_inner)),
        (field::PHONE, customer.phone),
        (field::CONTRACT_DATE, customer.contract_date),
        (field::NEXT_DATE, customer.next_date),
        (field::NEXT_CONTENT, customer.next_content),
    ];
    for (name, value) in optionals {
        if let Some(value) = optional(value) {
            fields.insert(name.to_owned(), value);
        }
    }

    fields
}

/// Field changes for a patch, plus the refreshed `updatedAt`.
fn encode_patch(patch: CustomerPatch, now: DateTime<Utc>) -> FieldUpdates {
    let mut updates = FieldUpdates::new();
    let mut set = |name: &str, value: FieldValue| {
        updates.insert(name.to_owned(), FieldUpdate::Set(value));
    };

    if let Some(name) = patch.name {
        set(field::NAME, name.into());
    }
    if let Some(plan) = patch.plan {
        set(field::PLAN, plan.label().into());
    }
    if let Some(status) = patch.status {
        set(field::STATUS, status.label().into());
    }
    if let Some(count) = patch.makeup_count {
        set(field::MAKEUP_COUNT, count.into());
    }
    if let Some(count) = patch.hair_count {
        set(field::HAIR_COUNT, count.into());
    }
    if let Some(count) = patch.fashion_count {
        set(field::FASHION_COUNT, count.into());
    }
    set(field::UPDATED_AT, now.into());

    let optionals = [
        (field::EMAIL, patch.email.map(|e| e.map(Email::into_inner))),
        (field::PHONE, patch.phone),
        (field::CONTRACT_DATE, patch.contract_date),
        (field::NEXT_DATE, patch.next_date),
        (field::NEXT_CONTENT, patch.next_content),
    ];
    for (name, change) in optionals {
        if let Some(value) = change {
            let update = optional(value).map_or(FieldUpdate::Delete, FieldUpdate::Set);
            updates.insert(name.to_owned(), update);
        }
    }

    updates
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for customer records.
#[derive(Clone)]
pub struct CustomerRepository {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for CustomerRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomerRepository").finish_non_exhaustive()
    }
}

impl CustomerRepository {
    /// Create a new customer repository.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// List all customers, most recently created first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the store fails.
    /// Returns `RepositoryError::DataCorruption` if a record is invalid.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Customer>, RepositoryError> {
        let docs = self
            .store
            .list_documents(CUSTOMERS, field::CREATED_AT, SortDirection::Descending)
            .await?;

        let customers = docs
            .iter()
            .map(Customer::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = customers.len(), "Customers listed");
        Ok(customers)
    }

    /// Get a customer by id. A missing customer is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the store fails.
    /// Returns `RepositoryError::DataCorruption` if the record is invalid.
    #[instrument(skip(self), fields(customer_id = %id))]
    pub async fn get(&self, id: &CustomerId) -> Result<Option<Customer>, RepositoryError> {
        self.store
            .get_document(CUSTOMERS, id.as_str())
            .await?
            .as_ref()
            .map(Customer::try_from)
            .transpose()
    }

    /// Create a customer, stamping both timestamps with the same instant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if the name is blank.
    /// Returns `RepositoryError::Store` if the store fails.
    #[instrument(skip(self, customer))]
    pub async fn create(&self, customer: NewCustomer) -> Result<CustomerId, RepositoryError> {
        if customer.name.trim().is_empty() {
            return Err(RepositoryError::Validation("name is required".to_string()));
        }

        let fields = encode_new(customer, self.clock.now());
        let id = self.store.create_document(CUSTOMERS, fields).await?;

        debug!(customer_id = %id, "Customer created");
        Ok(CustomerId::new(id))
    }

    /// Merge `patch` into an existing customer and refresh `updatedAt`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer does not exist.
    /// Returns `RepositoryError::Validation` if the patch blanks the name.
    /// Returns `RepositoryError::Store` if the store fails.
    #[instrument(skip(self, patch), fields(customer_id = %id))]
    pub async fn update(&self, id: &CustomerId, patch: CustomerPatch) -> Result<(), RepositoryError> {
        if patch.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(RepositoryError::Validation("name is required".to_string()));
        }

        let updates = encode_patch(patch, self.clock.now());
        match self.store.update_document(CUSTOMERS, id.as_str(), updates).await {
            Ok(()) => {
                debug!("Customer updated");
                Ok(())
            }
            Err(StoreError::NotFound(_)) => Err(RepositoryError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a customer. Deleting a missing customer succeeds.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the store fails.
    #[instrument(skip(self), fields(customer_id = %id))]
    pub async fn delete(&self, id: &CustomerId) -> Result<(), RepositoryError> {
        self.store.delete_document(CUSTOMERS, id.as_str()).await?;
        debug!("Customer deleted");
        Ok(())
    }
}
