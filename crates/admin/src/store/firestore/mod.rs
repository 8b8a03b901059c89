//! Cloud Firestore REST client.
//!
//! Speaks the v1 REST API directly with `reqwest`. Works against production
//! Firestore (API key and/or OAuth bearer token) and the local emulator.
//!
//! # Endpoints
//!
//! | Operation | Request |
//! |-----------|---------|
//! | create | `POST {base}/{collection}` |
//! | get | `GET {base}/{collection}/{id}` |
//! | update | `PATCH {base}/{collection}/{id}?updateMask.fieldPaths=..&currentDocument.exists=true` |
//! | delete | `DELETE {base}/{collection}/{id}` |
//! | list | `POST {base}:runQuery` |

mod wire;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::{ConfigError, FirestoreConfig};

use super::{Document, DocumentStore, FieldUpdate, FieldUpdates, Fields, SortDirection, StoreError};
use wire::{ErrorEnvelope, RunQueryItem, RunQueryRequest, WireDocument, WriteBody, encode_fields};

/// Firestore REST document store.
#[derive(Clone)]
pub struct FirestoreStore {
    /// HTTP client.
    client: Client,
    /// `.../databases/{database}/documents`
    base: Url,
    api_key: Option<SecretString>,
    access_token: Option<SecretString>,
}

impl std::fmt::Debug for FirestoreStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreStore")
            .field("base", &self.base.as_str())
            .field("api_key", &"[REDACTED]")
            .field("access_token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl FirestoreStore {
    /// Create a client for the configured project and database.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the base URL cannot be built.
    pub fn new(config: &FirestoreConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            client: Client::new(),
            base: config.documents_url()?,
            api_key: config.api_key.clone(),
            access_token: config.access_token.clone(),
        })
    }

    /// URL of `{base}/{segments...}` with the API key attached.
    fn url(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| StoreError::Protocol("base URL cannot take path segments".to_string()))?
            .pop_if_empty()
            .extend(segments);
        self.with_key(&mut url);
        Ok(url)
    }

    fn run_query_url(&self) -> Url {
        let mut url = self.base.clone();
        let path = format!("{}:runQuery", url.path());
        url.set_path(&path);
        self.with_key(&mut url);
        url
    }

    fn with_key(&self, url: &mut Url) {
        if let Some(key) = &self.api_key {
            url.query_pairs_mut().append_pair("key", key.expose_secret());
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    /// Send a request, classifying transport and HTTP failures.
    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|envelope| {
                if envelope.error.status.is_empty() {
                    envelope.error.message
                } else {
                    format!("{}: {}", envelope.error.status, envelope.error.message)
                }
            })
            .unwrap_or(body);

        warn!(status = %status, message = %message, "Firestore request failed");
        Err(StoreError::from_status(status.as_u16(), message))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
        response
            .json()
            .await
            .map_err(|e| StoreError::Protocol(e.to_string()))
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    #[instrument(skip(self, fields))]
    async fn create_document(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        let url = self.url(&[collection])?;
        let body = WriteBody {
            fields: encode_fields(&fields),
        };

        let response = self.send(self.client.post(url).json(&body)).await?;
        let created: WireDocument = Self::decode(response).await?;
        let id = created.id().to_owned();

        debug!(id = %id, "Document created");
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let url = self.url(&[collection, id])?;

        match self.send(self.client.get(url)).await {
            Ok(response) => {
                let doc: WireDocument = Self::decode(response).await?;
                doc.into_document().map(Some)
            }
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, updates), fields(fields = updates.len()))]
    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        updates: FieldUpdates,
    ) -> Result<(), StoreError> {
        // An empty mask would replace the whole document.
        if updates.is_empty() {
            return match self.get_document(collection, id).await? {
                Some(_) => Ok(()),
                None => Err(StoreError::NotFound(format!("{collection}/{id}"))),
            };
        }

        let mut url = self.url(&[collection, id])?;
        let mut fields = Fields::new();
        {
            let mut query = url.query_pairs_mut();
            for (name, update) in updates {
                query.append_pair("updateMask.fieldPaths", &name);
                if let FieldUpdate::Set(value) = update {
                    fields.insert(name, value);
                }
            }
            query.append_pair("currentDocument.exists", "true");
        }

        let body = WriteBody {
            fields: encode_fields(&fields),
        };
        self.send(self.client.patch(url).json(&body)).await?;

        debug!("Document updated");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let url = self.url(&[collection, id])?;

        match self.send(self.client.delete(url)).await {
            Ok(_) | Err(StoreError::NotFound(_)) => {
                debug!("Document deleted");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self))]
    async fn list_documents(
        &self,
        collection: &str,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Vec<Document>, StoreError> {
        let body = RunQueryRequest::ordered(collection, order_by, direction);
        let response = self
            .send(self.client.post(self.run_query_url()).json(&body))
            .await?;

        let items: Vec<RunQueryItem> = Self::decode(response).await?;
        let docs = items
            .into_iter()
            .filter_map(|item| item.document)
            .map(WireDocument::into_document)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = docs.len(), "Documents listed");
        Ok(docs)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::store::FieldValue;

    const DOCS: &str = "/v1/projects/salon-crm/databases/(default)/documents";

    fn store(api_key: Option<&str>) -> FirestoreStore {
        let mut config = FirestoreConfig::new("salon-crm");
        config.api_key = api_key.map(SecretString::from);
        FirestoreStore::new(&config).unwrap()
    }

    /// A store pointed at the mock server through the emulator setting.
    fn emulated(server: &MockServer) -> FirestoreStore {
        let mut config = FirestoreConfig::new("salon-crm");
        config.emulator_host = Some(server.address().to_string());
        FirestoreStore::new(&config).unwrap()
    }

    fn customer_path(id: &str) -> String {
        format!("{DOCS}/customers/{id}")
    }

    fn wire_customer(id: &str) -> serde_json::Value {
        json!({
            "name": format!("projects/salon-crm/databases/(default)/documents/customers/{id}"),
            "fields": {
                "name": {"stringValue": "田中花子"},
                "makeupCount": {"integerValue": "3"}
            },
            "createTime": "2024-01-15T09:00:00Z",
            "updateTime": "2024-01-15T09:00:00Z"
        })
    }

    fn error_body(code: u16, status: &str, message: &str) -> serde_json::Value {
        json!({"error": {"code": code, "message": message, "status": status}})
    }

    #[test]
    fn test_document_url() {
        let url = store(None).url(&["customers", "abc123"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://firestore.googleapis.com/v1/projects/salon-crm/databases/(default)/documents/customers/abc123"
        );
    }

    #[test]
    fn test_ids_are_path_escaped() {
        let url = store(None).url(&["customers", "a/b c"]).unwrap();
        assert!(url.path().ends_with("/customers/a%2Fb%20c"));
    }

    #[test]
    fn test_api_key_query_parameter() {
        let url = store(Some("k3y")).url(&["customers"]).unwrap();
        assert_eq!(url.query(), Some("key=k3y"));
    }

    #[test]
    fn test_run_query_url() {
        let url = store(Some("k3y")).run_query_url();
        assert_eq!(
            url.as_str(),
            "https://firestore.googleapis.com/v1/projects/salon-crm/databases/(default)/documents:runQuery?key=k3y"
        );
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let output = format!("{:?}", store(Some("super-secret-key")));
        assert!(output.contains("[REDACTED]"));
        assert!(!output.contains("super-secret-key"));
    }

    #[tokio::test]
    async fn test_create_posts_fields_and_returns_id() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(format!("{DOCS}/customers"))
                    .json_body(json!({"fields": {"name": {"stringValue": "田中花子"}}}));
                then.status(200).json_body(wire_customer("abc123"));
            })
            .await;

        let mut fields = Fields::new();
        fields.insert("name".into(), "田中花子".into());
        let id = emulated(&server)
            .create_document("customers", fields)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(id, "abc123");
    }

    #[tokio::test]
    async fn test_get_decodes_document() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(customer_path("abc123"));
                then.status(200).json_body(wire_customer("abc123"));
            })
            .await;

        let doc = emulated(&server)
            .get_document("customers", "abc123")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(doc.id, "abc123");
        assert_eq!(doc.fields.get("makeupCount"), Some(&FieldValue::Integer(3)));
        assert!(doc.create_time.is_some());
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(customer_path("gone"));
                then.status(404)
                    .json_body(error_body(404, "NOT_FOUND", "Document not found"));
            })
            .await;

        let doc = emulated(&server)
            .get_document("customers", "gone")
            .await
            .unwrap();
        assert!(doc.is_none());
    }

    #[tokio::test]
    async fn test_update_masks_deleted_fields_without_sending_them() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PATCH)
                    .path(customer_path("abc123"))
                    .query_param("updateMask.fieldPaths", "phone")
                    .query_param("updateMask.fieldPaths", "nextContent")
                    .query_param("currentDocument.exists", "true")
                    .json_body(json!({"fields": {"phone": {"stringValue": "090-0000-0000"}}}));
                then.status(200).json_body(wire_customer("abc123"));
            })
            .await;

        let mut updates = FieldUpdates::new();
        updates.insert(
            "phone".into(),
            FieldUpdate::Set("090-0000-0000".into()),
        );
        updates.insert("nextContent".into(), FieldUpdate::Delete);
        emulated(&server)
            .update_document("customers", "abc123", updates)
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_missing_document_is_not_found() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PATCH)
                    .path(customer_path("gone"))
                    .query_param("updateMask.fieldPaths", "phone")
                    .query_param("currentDocument.exists", "true");
                then.status(404)
                    .json_body(error_body(404, "NOT_FOUND", "No document to update"));
            })
            .await;

        let mut updates = FieldUpdates::new();
        updates.insert("phone".into(), FieldUpdate::Set("090".into()));
        let err = emulated(&server)
            .update_document("customers", "gone", updates)
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert_eq!(
            err,
            StoreError::NotFound("NOT_FOUND: No document to update".to_string())
        );
    }

    #[tokio::test]
    async fn test_empty_update_checks_existence_instead_of_patching() {
        let server = MockServer::start_async().await;
        let patch = server
            .mock_async(|when, then| {
                when.method(PATCH);
                then.status(200).json_body(wire_customer("abc123"));
            })
            .await;
        let present = server
            .mock_async(|when, then| {
                when.method(GET).path(customer_path("abc123"));
                then.status(200).json_body(wire_customer("abc123"));
            })
            .await;
        let missing = server
            .mock_async(|when, then| {
                when.method(GET).path(customer_path("gone"));
                then.status(404)
                    .json_body(error_body(404, "NOT_FOUND", "Document not found"));
            })
            .await;

        let store = emulated(&server);
        store
            .update_document("customers", "abc123", FieldUpdates::new())
            .await
            .unwrap();
        let err = store
            .update_document("customers", "gone", FieldUpdates::new())
            .await
            .unwrap_err();

        assert_eq!(err, StoreError::NotFound("customers/gone".to_string()));
        present.assert_async().await;
        missing.assert_async().await;
        assert_eq!(patch.hits_async().await, 0);
    }

    #[tokio::test]
    async fn test_delete_missing_document_succeeds() {
        let server = MockServer::start_async().await;
        let present = server
            .mock_async(|when, then| {
                when.method(DELETE).path(customer_path("abc123"));
                then.status(200).json_body(json!({}));
            })
            .await;
        let missing = server
            .mock_async(|when, then| {
                when.method(DELETE).path(customer_path("gone"));
                then.status(404)
                    .json_body(error_body(404, "NOT_FOUND", "Document not found"));
            })
            .await;

        let store = emulated(&server);
        store.delete_document("customers", "abc123").await.unwrap();
        store.delete_document("customers", "gone").await.unwrap();

        present.assert_async().await;
        missing.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_skips_items_without_document() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(format!("{DOCS}:runQuery"))
                    .json_body(json!({
                        "structuredQuery": {
                            "from": [{"collectionId": "customers"}],
                            "orderBy": [{"field": {"fieldPath": "createdAt"}, "direction": "DESCENDING"}]
                        }
                    }));
                then.status(200).json_body(json!([
                    {"document": wire_customer("abc123"), "readTime": "2024-01-15T09:00:00Z"},
                    {"readTime": "2024-01-15T09:00:00Z"}
                ]));
            })
            .await;

        let docs = emulated(&server)
            .list_documents("customers", "createdAt", SortDirection::Descending)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "abc123");
    }

    #[tokio::test]
    async fn test_error_statuses_are_classified_from_envelope() {
        let server = MockServer::start_async().await;
        let cases = [
            (
                "denied",
                403,
                "PERMISSION_DENIED",
                "Missing or insufficient permissions.",
            ),
            ("unauthenticated", 401, "UNAUTHENTICATED", "Request had invalid credentials."),
            ("busy", 503, "UNAVAILABLE", "The service is currently unavailable."),
            ("bad", 400, "INVALID_ARGUMENT", "Invalid field path."),
        ];
        for (id, code, status, message) in cases {
            server
                .mock_async(|when, then| {
                    when.method(GET).path(customer_path(id));
                    then.status(code).json_body(error_body(code, status, message));
                })
                .await;
        }

        let store = emulated(&server);
        let fetch = |id: &'static str| {
            let store = store.clone();
            async move { store.get_document("customers", id).await.unwrap_err() }
        };

        assert_eq!(
            fetch("denied").await,
            StoreError::PermissionDenied(
                "PERMISSION_DENIED: Missing or insufficient permissions.".to_string()
            )
        );
        assert!(matches!(
            fetch("unauthenticated").await,
            StoreError::PermissionDenied(_)
        ));
        assert_eq!(
            fetch("busy").await,
            StoreError::Unavailable("UNAVAILABLE: The service is currently unavailable.".to_string())
        );
        assert_eq!(
            fetch("bad").await,
            StoreError::Api {
                status: 400,
                message: "INVALID_ARGUMENT: Invalid field path.".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_non_json_error_body_is_kept_verbatim() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(format!("{DOCS}/customers"));
                then.status(502).body("upstream connect error");
            })
            .await;

        let err = emulated(&server)
            .create_document("customers", Fields::new())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::Unavailable("upstream connect error".to_string())
        );
    }

    #[tokio::test]
    async fn test_credentials_are_sent() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path(customer_path("abc123"))
                    .query_param("key", "k3y")
                    .header("authorization", "Bearer t0ken");
                then.status(200).json_body(wire_customer("abc123"));
            })
            .await;

        let mut config = FirestoreConfig::new("salon-crm");
        config.emulator_host = Some(server.address().to_string());
        config.api_key = Some(SecretString::from("k3y"));
        config.access_token = Some(SecretString::from("t0ken"));
        let store = FirestoreStore::new(&config).unwrap();

        assert!(store.get_document("customers", "abc123").await.unwrap().is_some());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unreachable_store_is_unavailable() {
        let mut config = FirestoreConfig::new("salon-crm");
        config.emulator_host = Some("127.0.0.1:1".to_string());
        let store = FirestoreStore::new(&config).unwrap();

        let err = store.get_document("customers", "abc123").await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
