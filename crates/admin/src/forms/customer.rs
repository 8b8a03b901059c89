//! New/edit customer form.
//!
//! Raw string input is validated field by field in a fixed order and the
//! first failure is reported against its field. Blank optional fields become
//! absent, so they are never stored as empty strings.

use tracing::instrument;

use salon_crm_core::{Customer, CustomerId, CustomerPatch, Email, NewCustomer, Plan, Status};

use crate::db::CustomerRepository;
use crate::error::AppError;

/// Form fields, in validation order for those that are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Email,
    Phone,
    Plan,
    Status,
    ContractDate,
    MakeupCount,
    HairCount,
    FashionCount,
    NextDate,
    NextContent,
}

impl FormField {
    /// The stored field name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Plan => "plan",
            Self::Status => "status",
            Self::ContractDate => "contractDate",
            Self::MakeupCount => "makeupCount",
            Self::HairCount => "hairCount",
            Self::FashionCount => "fashionCount",
            Self::NextDate => "nextDate",
            Self::NextContent => "nextContent",
        }
    }
}

pub const NAME_REQUIRED: &str = "名前は必須です";
pub const EMAIL_INVALID: &str = "正しいメールアドレスを入力してください";
pub const PLAN_REQUIRED: &str = "プランを選択してください";
pub const STATUS_REQUIRED: &str = "ステータスを選択してください";
pub const COUNT_INVALID: &str = "0以上の数値を入力してください";

/// A field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}: {message}", .field.name())]
pub struct FormError {
    pub field: FormField,
    pub message: &'static str,
}

/// Raw form input. Every field is the string the operator typed or picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub plan: String,
    pub status: String,
    pub contract_date: String,
    pub makeup_count: String,
    pub hair_count: String,
    pub fashion_count: String,
    pub next_date: String,
    pub next_content: String,
}

impl Default for CustomerForm {
    /// An empty new-customer form with all counters at zero.
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            plan: String::new(),
            status: String::new(),
            contract_date: String::new(),
            makeup_count: "0".to_string(),
            hair_count: "0".to_string(),
            fashion_count: "0".to_string(),
            next_date: String::new(),
            next_content: String::new(),
        }
    }
}

fn blank_to_none(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_count(field: FormField, raw: &str) -> Result<u32, FormError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    let invalid = || FormError {
        field,
        message: COUNT_INVALID,
    };
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    raw.parse().map_err(|_| invalid())
}

impl CustomerForm {
    /// An edit form pre-filled from a stored record.
    #[must_use]
    pub fn from_customer(customer: &Customer) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            name: customer.name.clone(),
            email: customer
                .email
                .as_ref()
                .map(|e| e.as_str().to_string())
                .unwrap_or_default(),
            phone: text(&customer.phone),
            plan: customer.plan.label().to_string(),
            status: customer.status.label().to_string(),
            contract_date: text(&customer.contract_date),
            makeup_count: customer.makeup_count.to_string(),
            hair_count: customer.hair_count.to_string(),
            fashion_count: customer.fashion_count.to_string(),
            next_date: text(&customer.next_date),
            next_content: text(&customer.next_content),
        }
    }

    /// Validate the input and build the record it describes.
    ///
    /// # Errors
    ///
    /// Returns the first failing field, checked in the order name, email,
    /// plan, status, then the three counters.
    pub fn validate(&self) -> Result<NewCustomer, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError {
                field: FormField::Name,
                message: NAME_REQUIRED,
            });
        }

        let email = blank_to_none(&self.email)
            .map(|raw| Email::parse(&raw))
            .transpose()
            .map_err(|_| FormError {
                field: FormField::Email,
                message: EMAIL_INVALID,
            })?;

        let plan: Plan = self.plan.trim().parse().map_err(|_| FormError {
            field: FormField::Plan,
            message: PLAN_REQUIRED,
        })?;
        let status: Status = self.status.trim().parse().map_err(|_| FormError {
            field: FormField::Status,
            message: STATUS_REQUIRED,
        })?;

        Ok(NewCustomer {
            name: name.to_string(),
            email,
            phone: blank_to_none(&self.phone),
            plan,
            status,
            contract_date: blank_to_none(&self.contract_date),
            makeup_count: parse_count(FormField::MakeupCount, &self.makeup_count)?,
            hair_count: parse_count(FormField::HairCount, &self.hair_count)?,
            fashion_count: parse_count(FormField::FashionCount, &self.fashion_count)?,
            next_date: blank_to_none(&self.next_date),
            next_content: blank_to_none(&self.next_content),
        })
    }

    /// Validate and create a new customer.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` without touching the repository if the
    /// input is invalid, or the repository failure otherwise.
    #[instrument(skip_all)]
    pub async fn submit_create(&self, repo: &CustomerRepository) -> Result<CustomerId, AppError> {
        let customer = self.validate()?;
        Ok(repo.create(customer).await?)
    }

    /// Validate and overwrite an existing customer.
    ///
    /// Every field is written; blank optional fields clear the stored value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` without touching the repository if the
    /// input is invalid, `AppError::NotFound` if the customer is gone, or the
    /// repository failure otherwise.
    #[instrument(skip(self, repo), fields(customer_id = %id))]
    pub async fn submit_update(
        &self,
        repo: &CustomerRepository,
        id: &CustomerId,
    ) -> Result<CustomerPatch, AppError> {
        let patch = CustomerPatch::replace_all(self.validate()?);
        repo.update(id, patch.clone()).await?;
        Ok(patch)
    }
}
