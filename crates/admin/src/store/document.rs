//! Backend-neutral document shapes.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

/// A scalar field value.
///
/// Only the scalar types customer records use are modelled. Backends drop
/// fields of other types when reading.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    /// Rank of the value's type in cross-type ordering:
    /// null < bool < number < timestamp < string.
    const fn type_rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Integer(_) | Self::Double(_) => 2,
            Self::Timestamp(_) => 3,
            Self::String(_) => 4,
        }
    }

    /// Total order used for `ORDER BY`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn order(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Integer(a), Self::Double(b)) => (*a as f64).total_cmp(b),
            (Self::Double(a), Self::Integer(b)) => a.total_cmp(&(*b as f64)),
            (Self::Double(a), Self::Double(b)) => a.total_cmp(b),
            (Self::Timestamp(a), Self::Timestamp(b)) => a.cmp(b),
            (Self::String(a), Self::String(b)) => a.cmp(b),
            _ => self.type_rank().cmp(&other.type_rank()),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

/// Field name to value.
pub type Fields = BTreeMap<String, FieldValue>;

/// One change in a partial update.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    /// Write the value, replacing whatever was there.
    Set(FieldValue),
    /// Remove the field from the document.
    Delete,
}

/// Field name to change. Fields not named are left untouched.
pub type FieldUpdates = BTreeMap<String, FieldUpdate>;

/// A stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Store-assigned id, unique within its collection.
    pub id: String,
    pub fields: Fields,
    /// When the store first wrote the document, if it reports it.
    pub create_time: Option<DateTime<Utc>>,
    /// When the store last wrote the document, if it reports it.
    pub update_time: Option<DateTime<Utc>>,
}

/// Sort direction for listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}
