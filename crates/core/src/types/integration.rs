//! Contracts shared with the reservation and email-integration services.
//!
//! Nothing in this workspace drives the lifecycle of these records. They are
//! declared here so every collaborator reads and writes the same document
//! shapes. Confidence and similarity scores are opaque numbers produced by the
//! matching service; no scoring happens on this side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::customer::Customer;
use super::id::{
    CustomerId, DuplicateAlertId, IntegrationSettingsId, MatchLogId, ReservationId,
};
use super::status::{DuplicateStatus, MatchMethod, ReservationStatus};

/// Document collection names.
pub mod collections {
    pub const CUSTOMERS: &str = "customers";
    pub const RESERVATIONS: &str = "reservations";
    pub const INTEGRATION_SETTINGS: &str = "integration_settings";
    pub const CUSTOMER_MATCH_LOGS: &str = "customer_match_logs";
    pub const DUPLICATE_ALERTS: &str = "duplicate_alerts";
}

/// An appointment booked for a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: ReservationId,
    pub customer_id: CustomerId,
    pub reservation_date: String,
    pub menu_name: String,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Patterns used to pull fields out of a booking email body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyPatterns {
    pub customer_name: String,
    pub reservation_date: String,
    pub menu_name: String,
}

/// How booking emails are recognised and parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailParsingRules {
    pub subject_pattern: String,
    pub body_patterns: BodyPatterns,
}

/// Inbound-email integration configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationSettings {
    pub id: IntegrationSettingsId,
    pub zapier_webhook_url: String,
    pub email_parsing_rules: EmailParsingRules,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The raw email a match was attempted for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailData {
    pub subject: String,
    pub body: String,
    pub received_at: String,
}

/// Fields extracted from an inbound email.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservation_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_name: Option<String>,
}

/// Audit record of an email-to-customer match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerMatchLog {
    pub id: MatchLogId,
    pub email_data: EmailData,
    pub extracted_data: ExtractedData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_customer_id: Option<CustomerId>,
    pub match_method: MatchMethod,
    pub confidence: f64,
    pub is_manual_match: bool,
    pub duplicate_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A flagged pair of possibly-duplicate customers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateAlert {
    pub id: DuplicateAlertId,
    pub primary_customer_id: CustomerId,
    pub duplicate_customer_id: CustomerId,
    pub similarity: f64,
    pub status: DuplicateStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Email forwarded by the Zapier webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZapierEmailPayload {
    pub subject: String,
    pub body: String,
    pub from: String,
    pub to: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
}

/// Result of parsing a forwarded email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailParsingResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservation_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub confidence: f64,
    pub raw_data: ZapierEmailPayload,
}

/// Subject and body patterns of the Zapier integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailTemplatePatterns {
    pub subject: String,
    pub customer_name: String,
    pub reservation_date: String,
    pub menu_name: String,
}

/// Zapier webhook settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZapierSettings {
    pub webhook_url: String,
    pub email_template_patterns: EmailTemplatePatterns,
    pub is_active: bool,
}

/// Outcome of matching an email to a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerMatchResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
    pub confidence: f64,
    pub method: MatchMethod,
    #[serde(default)]
    pub duplicates: Vec<Customer>,
    pub requires_manual_review: bool,
}

/// A group of customers that look alike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub similarity: f64,
    pub customers: Vec<Customer>,
}

/// Outcome of a duplicate scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateDetectionResult {
    pub has_duplicates: bool,
    #[serde(default)]
    pub duplicate_groups: Vec<DuplicateGroup>,
}
