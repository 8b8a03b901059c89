//! Customer records.
//!
//! [`Customer`] is the stored shape, [`NewCustomer`] is what a caller supplies
//! on creation and [`CustomerPatch`] carries a partial update. Timestamps are
//! never set by callers: the repository client owns them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::CustomerId;
use super::status::{Plan, Status};

/// A customer record as held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub plan: Plan,
    pub status: Status,
    /// Contract date as entered (`YYYY-MM-DD` from a date input).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_date: Option<String>,
    pub makeup_count: u32,
    pub hair_count: u32,
    pub fashion_count: u32,
    /// Date of the next appointment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_date: Option<String>,
    /// What the next appointment is for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Total number of sessions across all three services.
    #[must_use]
    pub const fn total_sessions(&self) -> u32 {
        self.makeup_count
            .saturating_add(self.hair_count)
            .saturating_add(self.fashion_count)
    }

    /// The caller-supplied fields of this record, without id or timestamps.
    #[must_use]
    pub fn to_new(&self) -> NewCustomer {
        NewCustomer {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            plan: self.plan,
            status: self.status,
            contract_date: self.contract_date.clone(),
            makeup_count: self.makeup_count,
            hair_count: self.hair_count,
            fashion_count: self.fashion_count,
            next_date: self.next_date.clone(),
            next_content: self.next_content.clone(),
        }
    }

    /// Apply a patch in place. Timestamps are left alone.
    pub fn apply(&mut self, patch: CustomerPatch) {
        let CustomerPatch {
            name,
            email,
            phone,
            plan,
            status,
            contract_date,
            makeup_count,
            hair_count,
            fashion_count,
            next_date,
            next_content,
        } = patch;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(email) = email {
            self.email = email;
        }
        if let Some(phone) = phone {
            self.phone = phone;
        }
        if let Some(plan) = plan {
            self.plan = plan;
        }
        if let Some(status) = status {
            self.status = status;
        }
        if let Some(contract_date) = contract_date {
            self.contract_date = contract_date;
        }
        if let Some(count) = makeup_count {
            self.makeup_count = count;
        }
        if let Some(count) = hair_count {
            self.hair_count = count;
        }
        if let Some(count) = fashion_count {
            self.fashion_count = count;
        }
        if let Some(next_date) = next_date {
            self.next_date = next_date;
        }
        if let Some(next_content) = next_content {
            self.next_content = next_content;
        }
    }
}

/// Fields supplied when creating a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub plan: Plan,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_date: Option<String>,
    #[serde(default)]
    pub makeup_count: u32,
    #[serde(default)]
    pub hair_count: u32,
    #[serde(default)]
    pub fashion_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_content: Option<String>,
}

impl NewCustomer {
    /// A customer with only the required fields set and all counters at zero.
    #[must_use]
    pub fn new(name: impl Into<String>, plan: Plan, status: Status) -> Self {
        Self {
            name: name.into(),
            email: None,
            phone: None,
            plan,
            status,
            contract_date: None,
            makeup_count: 0,
            hair_count: 0,
            fashion_count: 0,
            next_date: None,
            next_content: None,
        }
    }
}

/// A partial update.
///
/// `None` leaves a field untouched. For optional fields, `Some(None)` clears
/// the stored value and `Some(Some(v))` replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub email: Option<Option<Email>>,
    pub phone: Option<Option<String>>,
    pub plan: Option<Plan>,
    pub status: Option<Status>,
    pub contract_date: Option<Option<String>>,
    pub makeup_count: Option<u32>,
    pub hair_count: Option<u32>,
    pub fashion_count: Option<u32>,
    pub next_date: Option<Option<String>>,
    pub next_content: Option<Option<String>>,
}

impl CustomerPatch {
    /// Whether the patch would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// A patch that overwrites every field with the values of `customer`,
    /// clearing optional fields that are absent there.
    #[must_use]
    pub fn replace_all(customer: NewCustomer) -> Self {
        Self {
            name: Some(customer.name),
            email: Some(customer.email),
            phone: Some(customer.phone),
            plan: Some(customer.plan),
            status: Some(customer.status),
            contract_date: Some(customer.contract_date),
            makeup_count: Some(customer.makeup_count),
            hair_count: Some(customer.hair_count),
            fashion_count: Some(customer.fashion_count),
            next_date: Some(customer.next_date),
            next_content: Some(customer.next_content),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn hanako() -> Customer {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
        Customer {
            id: CustomerId::new("c1"),
            name: "田中花子".to_string(),
            email: Some(Email::parse("hanako@example.com").unwrap()),
            phone: Some("090-1234-5678".to_string()),
            plan: Plan::Premium,
            status: Status::FirstCounselingDone,
            contract_date: Some("2024-01-15".to_string()),
            makeup_count: 3,
            hair_count: 2,
            fashion_count: 1,
            next_date: Some("2024-02-20".to_string()),
            next_content: Some("メイクレッスン".to_string()),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_total_sessions() {
        assert_eq!(hanako().total_sessions(), 6);
    }

    #[test]
    fn test_apply_only_touches_supplied_fields() {
        let mut customer = hanako();
        customer.apply(CustomerPatch {
            hair_count: Some(5),
            phone: Some(None),
            ..CustomerPatch::default()
        });

        assert_eq!(customer.hair_count, 5);
        assert_eq!(customer.phone, None);
        assert_eq!(customer.name, "田中花子");
        assert_eq!(customer.makeup_count, 3);
        assert!(customer.email.is_some());
    }

    #[test]
    fn test_replace_all_then_apply_matches_source() {
        let mut customer = hanako();
        let mut replacement = NewCustomer::new("佐藤美咲", Plan::Standard, Status::PreLearningCompleted);
        replacement.makeup_count = 2;
        customer.apply(CustomerPatch::replace_all(replacement.clone()));

        assert_eq!(customer.to_new(), replacement);
    }

    #[test]
    fn test_empty_patch() {
        assert!(CustomerPatch::default().is_empty());
        assert!(
            !CustomerPatch {
                plan: Some(Plan::Basic),
                ..CustomerPatch::default()
            }
            .is_empty()
        );
    }

    #[test]
    fn test_json_omits_absent_fields() {
        let mut customer = hanako();
        customer.email = None;
        let json = serde_json::to_value(&customer).unwrap();
        assert!(json.get("email").is_none());
        assert_eq!(json["plan"], "プレミアム");
        assert_eq!(json["makeupCount"], 3);
    }
}
