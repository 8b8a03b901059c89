//! Firestore REST JSON shapes.
//!
//! Values are externally tagged objects such as `{"stringValue": "x"}` or
//! `{"integerValue": "42"}`. 64-bit integers travel as strings.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::store::{Document, FieldValue, Fields, SortDirection, StoreError};

/// A typed Firestore value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WireValue {
    NullValue(()),
    BooleanValue(bool),
    IntegerValue(String),
    DoubleValue(f64),
    TimestampValue(String),
    StringValue(String),
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(serde_json::Value),
    ArrayValue(serde_json::Value),
    MapValue(serde_json::Value),
}

impl From<&FieldValue> for WireValue {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Null => Self::NullValue(()),
            FieldValue::Bool(b) => Self::BooleanValue(*b),
            FieldValue::Integer(i) => Self::IntegerValue(i.to_string()),
            FieldValue::Double(d) => Self::DoubleValue(*d),
            FieldValue::String(s) => Self::StringValue(s.clone()),
            FieldValue::Timestamp(at) => {
                Self::TimestampValue(at.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
        }
    }
}

impl WireValue {
    /// Convert to a [`FieldValue`].
    ///
    /// Returns `Ok(None)` for value types customer records never hold.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Protocol`] if an integer or timestamp is malformed.
    pub fn into_field(self) -> Result<Option<FieldValue>, StoreError> {
        let value = match self {
            Self::NullValue(()) => FieldValue::Null,
            Self::BooleanValue(b) => FieldValue::Bool(b),
            Self::IntegerValue(raw) => FieldValue::Integer(
                raw.parse()
                    .map_err(|_| StoreError::Protocol(format!("bad integerValue: {raw}")))?,
            ),
            Self::DoubleValue(d) => FieldValue::Double(d),
            Self::TimestampValue(raw) => FieldValue::Timestamp(parse_timestamp(&raw)?),
            Self::StringValue(s) => FieldValue::String(s),
            Self::BytesValue(_)
            | Self::ReferenceValue(_)
            | Self::GeoPointValue(_)
            | Self::ArrayValue(_)
            | Self::MapValue(_) => return Ok(None),
        };
        Ok(Some(value))
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| StoreError::Protocol(format!("bad timestamp {raw}: {e}")))
}

/// Encode fields for a request body.
#[must_use]
pub fn encode_fields(fields: &Fields) -> BTreeMap<String, WireValue> {
    fields
        .iter()
        .map(|(name, value)| (name.clone(), WireValue::from(value)))
        .collect()
}

/// A document as returned by the REST API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireDocument {
    /// Full resource name ending in `/{collection}/{id}`.
    pub name: String,
    #[serde(default)]
    pub fields: BTreeMap<String, WireValue>,
    pub create_time: Option<String>,
    pub update_time: Option<String>,
}

impl WireDocument {
    /// The document id, the last segment of the resource name.
    #[must_use]
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Convert to a backend-neutral [`Document`], dropping unsupported fields.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Protocol`] if a value or timestamp is malformed.
    pub fn into_document(self) -> Result<Document, StoreError> {
        let id = self.id().to_owned();
        let mut fields = Fields::new();
        for (name, value) in self.fields {
            match value.into_field()? {
                Some(field) => {
                    fields.insert(name, field);
                }
                None => warn!(document = %id, field = %name, "Skipping unsupported field type"),
            }
        }

        Ok(Document {
            id,
            fields,
            create_time: self.create_time.as_deref().map(parse_timestamp).transpose()?,
            update_time: self.update_time.as_deref().map(parse_timestamp).transpose()?,
        })
    }
}

/// Body for create and patch requests.
#[derive(Debug, Serialize)]
pub struct WriteBody {
    pub fields: BTreeMap<String, WireValue>,
}

/// Body for `documents:runQuery`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryRequest {
    pub structured_query: StructuredQuery,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredQuery {
    pub from: Vec<CollectionSelector>,
    pub order_by: Vec<Order>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSelector {
    pub collection_id: String,
}

#[derive(Debug, Serialize)]
pub struct Order {
    pub field: FieldReference,
    pub direction: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldReference {
    pub field_path: String,
}

impl RunQueryRequest {
    /// Select every document in `collection` ordered on `order_by`.
    #[must_use]
    pub fn ordered(collection: &str, order_by: &str, direction: SortDirection) -> Self {
        Self {
            structured_query: StructuredQuery {
                from: vec![CollectionSelector {
                    collection_id: collection.to_owned(),
                }],
                order_by: vec![Order {
                    field: FieldReference {
                        field_path: order_by.to_owned(),
                    },
                    direction: match direction {
                        SortDirection::Ascending => "ASCENDING",
                        SortDirection::Descending => "DESCENDING",
                    },
                }],
            },
        }
    }
}

/// One element of the `runQuery` response stream. Progress-only elements
/// carry no document.
#[derive(Debug, Deserialize)]
pub struct RunQueryItem {
    pub document: Option<WireDocument>,
}

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_values_serialize_tagged() {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap();
        let mut fields = Fields::new();
        fields.insert("name".into(), "田中花子".into());
        fields.insert("makeupCount".into(), FieldValue::Integer(3));
        fields.insert("createdAt".into(), at.into());
        fields.insert("gone".into(), FieldValue::Null);

        let body = serde_json::to_value(WriteBody {
            fields: encode_fields(&fields),
        })
        .unwrap();

        assert_eq!(
            body,
            json!({
                "fields": {
                    "name": {"stringValue": "田中花子"},
                    "makeupCount": {"integerValue": "3"},
                    "createdAt": {"timestampValue": "2024-01-15T09:30:00Z"},
                    "gone": {"nullValue": null}
                }
            })
        );
    }

    #[test]
    fn test_document_decodes_and_skips_unsupported() {
        let raw = json!({
            "name": "projects/p/databases/(default)/documents/customers/abc123",
            "fields": {
                "name": {"stringValue": "佐藤美咲"},
                "hairCount": {"integerValue": "5"},
                "tags": {"arrayValue": {"values": []}},
                "updatedAt": {"timestampValue": "2024-02-01T10:00:00.123456Z"}
            },
            "createTime": "2024-02-01T10:00:00.123456Z",
            "updateTime": "2024-02-01T10:00:00.123456Z"
        });

        let doc: WireDocument = serde_json::from_value(raw).unwrap();
        let doc = doc.into_document().unwrap();

        assert_eq!(doc.id, "abc123");
        assert_eq!(doc.fields["hairCount"], FieldValue::Integer(5));
        assert!(!doc.fields.contains_key("tags"));
        assert_eq!(
            doc.create_time.unwrap().timestamp_subsec_micros(),
            123_456
        );
    }

    #[test]
    fn test_bad_integer_is_protocol_error() {
        let err = WireValue::IntegerValue("x1".into()).into_field().unwrap_err();
        assert!(matches!(err, StoreError::Protocol(_)));
    }

    #[test]
    fn test_run_query_shape() {
        let body = serde_json::to_value(RunQueryRequest::ordered(
            "customers",
            "createdAt",
            SortDirection::Descending,
        ))
        .unwrap();

        assert_eq!(
            body,
            json!({
                "structuredQuery": {
                    "from": [{"collectionId": "customers"}],
                    "orderBy": [{"field": {"fieldPath": "createdAt"}, "direction": "DESCENDING"}]
                }
            })
        );
    }

    #[test]
    fn test_run_query_items_without_document() {
        let items: Vec<RunQueryItem> =
            serde_json::from_value(json!([{"readTime": "2024-01-01T00:00:00Z"}])).unwrap();
        assert!(items[0].document.is_none());
    }
}
