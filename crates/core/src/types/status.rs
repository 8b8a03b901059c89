//! Closed enumerations for customers, reservations and integration records.
//!
//! Customer plans and statuses are stored under their Japanese labels, which
//! are also what operators type into filters and forms. Parsing is strict:
//! anything outside the enumeration is an [`UnknownValue`] error, and callers
//! that must tolerate unknown input (badge classification) handle that path
//! explicitly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A value that is not a member of the expected enumeration.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct UnknownValue {
    /// Name of the enumeration that was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl UnknownValue {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// Service package a customer has signed up for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Plan {
    #[serde(rename = "ベーシック")]
    Basic,
    #[serde(rename = "スタンダード")]
    Standard,
    #[serde(rename = "プレミアム")]
    Premium,
}

impl Plan {
    /// All plans, in display order.
    pub const ALL: [Self; 3] = [Self::Basic, Self::Standard, Self::Premium];

    /// The stored and displayed label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Basic => "ベーシック",
            Self::Standard => "スタンダード",
            Self::Premium => "プレミアム",
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Plan {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|plan| plan.label() == s)
            .ok_or_else(|| UnknownValue::new("plan", s))
    }
}

/// Onboarding progress of a customer.
///
/// Variants are declared in the order a customer moves through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Contract signed.
    #[serde(rename = "契約締結")]
    ContractSigned,
    /// Payment received.
    #[serde(rename = "入金済み")]
    PaymentReceived,
    /// Pre-session learning material completed.
    #[serde(rename = "事前ノウハウ学習済み")]
    PreLearningCompleted,
    /// First counseling session held.
    #[serde(rename = "初回カウンセリング済み")]
    FirstCounselingDone,
}

impl Status {
    /// All statuses, in onboarding order.
    pub const ALL: [Self; 4] = [
        Self::ContractSigned,
        Self::PaymentReceived,
        Self::PreLearningCompleted,
        Self::FirstCounselingDone,
    ];

    /// The stored and displayed label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ContractSigned => "契約締結",
            Self::PaymentReceived => "入金済み",
            Self::PreLearningCompleted => "事前ノウハウ学習済み",
            Self::FirstCounselingDone => "初回カウンセリング済み",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Status {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.label() == s)
            .ok_or_else(|| UnknownValue::new("status", s))
    }
}

/// Reservation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    #[default]
    Confirmed,
    Cancelled,
    Completed,
}

/// How an inbound email was associated with a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchMethod {
    PhoneAndName,
    EmailAndName,
    NameOnly,
    Manual,
}

/// Resolution state of a duplicate-customer alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DuplicateStatus {
    #[default]
    Pending,
    Resolved,
    Ignored,
}
