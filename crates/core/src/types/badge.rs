//! Presentation categories for plan and status badges.
//!
//! These lookups only group values visually. They take raw strings so that a
//! value read from somewhere that does not enforce the enumeration still gets
//! a badge, falling back to [`BadgeCategory::Neutral`].

use serde::{Deserialize, Serialize};

use super::status::{Plan, Status};

/// Visual grouping for a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BadgeCategory {
    #[default]
    Neutral,
    Normal,
    Warning,
}

impl BadgeCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Normal => "normal",
            Self::Warning => "warning",
        }
    }
}

impl Plan {
    /// Badge category for this plan.
    #[must_use]
    pub const fn category(self) -> BadgeCategory {
        match self {
            Self::Basic => BadgeCategory::Neutral,
            Self::Standard => BadgeCategory::Normal,
            Self::Premium => BadgeCategory::Warning,
        }
    }
}

impl Status {
    /// Badge category for this status.
    #[must_use]
    pub const fn category(self) -> BadgeCategory {
        match self {
            Self::ContractSigned | Self::PaymentReceived => BadgeCategory::Neutral,
            Self::PreLearningCompleted => BadgeCategory::Normal,
            Self::FirstCounselingDone => BadgeCategory::Warning,
        }
    }
}

/// Badge category for a plan label. Unrecognized labels are neutral.
#[must_use]
pub fn plan_category(plan: &str) -> BadgeCategory {
    plan.parse::<Plan>()
        .map_or(BadgeCategory::Neutral, Plan::category)
}

/// Badge category for a status label. Unrecognized labels are neutral.
#[must_use]
pub fn status_category(status: &str) -> BadgeCategory {
    status
        .parse::<Status>()
        .map_or(BadgeCategory::Neutral, Status::category)
}
