use reqwest::{header, Method};
use serde::Serialize;
use tracing::debug;

use crate::types::{Acknowledgement, MutationResult, Query, ServiceError};
use crate::{ClientError, Result};

/// Searchlite REST API client.
///
/// Holds the service address and its own transport handle, both
/// immutable after construction. A single client can be shared freely
/// across tasks; each call issues exactly one request.
pub struct Client {
    address: String,
    http: reqwest::Client,
}

impl Client {
    /// Create a new client for the service at the given base URL,
    /// e.g. `http://localhost:9200`.
    pub fn new(address: impl Into<String>) -> Self {
        Self::with_http_client(address, reqwest::Client::new())
    }

    /// Create a client that issues requests through a caller-configured
    /// transport (timeouts, TLS, proxying).
    pub fn with_http_client(address: impl Into<String>, http: reqwest::Client) -> Self {
        let mut address = address.into();
        let trimmed = address.trim_end_matches('/').len();
        address.truncate(trimmed);
        Self { address, http }
    }

    /// Join the service address and a path fragment with exactly one
    /// separator between them. Fragment arguments must already be
    /// URL-safe identifiers.
    fn endpoint(&self, fragment: &str) -> String {
        if fragment.is_empty() || fragment.starts_with('/') {
            format!("{}{}", self.address, fragment)
        } else {
            format!("{}/{}", self.address, fragment)
        }
    }

    /// Issue a single request. Query parameters are appended URL-encoded
    /// when present, the content type is always JSON, and no retries are
    /// attempted. Status interpretation is left to the caller.
    async fn dispatch(
        &self,
        method: Method,
        url: String,
        query: &Query,
        body: Option<Vec<u8>>,
    ) -> Result<reqwest::Response> {
        let mut request = self
            .http
            .request(method, &url)
            .header(header::CONTENT_TYPE, "application/json");
        if !query.is_empty() {
            let pairs: Vec<(&str, String)> = query
                .iter()
                .map(|(k, v)| (k.as_str(), v.to_string()))
                .collect();
            request = request.query(&pairs);
        }
        if let Some(body) = body {
            request = request.body(body);
        }
        Ok(request.send().await?)
    }

    /// Read the full response body and decode it as `T`.
    async fn read_json<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
        let body = resp.bytes().await?;
        serde_json::from_slice(&body).map_err(ClientError::Decode)
    }

    /// Success iff the operation was acknowledged and shard
    /// acknowledgement matches exactly what the operation requires.
    async fn check_acknowledgement(resp: reqwest::Response, require_shards: bool) -> Result<()> {
        let ack: Acknowledgement = Self::read_json(resp).await?;
        if ack.acknowledged && ack.shards_acknowledged == require_shards {
            return Ok(());
        }
        Err(ClientError::NotAcknowledged {
            acknowledged: ack.acknowledged,
            shards_acknowledged: ack.shards_acknowledged,
        })
    }

    /// Turn a structured error body into the error for the caller,
    /// keeping the first root cause only. A body that does not parse as
    /// a service error surfaces as a decode failure instead.
    async fn report_error(resp: reqwest::Response) -> ClientError {
        let err: ServiceError = match Self::read_json(resp).await {
            Ok(err) => err,
            Err(err) => return err,
        };
        match err.error.root_cause.into_iter().next() {
            Some(cause) => ClientError::Service {
                kind: cause.kind,
                reason: cause.reason,
            },
            None => ClientError::MalformedErrorBody,
        }
    }

    /// Create or replace an index template.
    ///
    /// `template` is raw JSON text and is sent as the request body
    /// unchanged.
    pub async fn create_template(&self, name: &str, template: &str) -> Result<()> {
        let url = self.endpoint(&format!("/_template/{name}"));
        let body = raw_body(template)?;
        debug!(name, "creating index template");
        let resp = self
            .dispatch(Method::PUT, url, &Query::new(), Some(body))
            .await?;
        match resp.status().as_u16() {
            200 | 201 => Self::check_acknowledgement(resp, false).await,
            _ => Err(Self::report_error(resp).await),
        }
    }

    /// Delete an index template by name.
    pub async fn delete_template(&self, name: &str) -> Result<()> {
        let url = self.endpoint(&format!("/_template/{name}"));
        debug!(name, "deleting index template");
        let resp = self
            .dispatch(Method::DELETE, url, &Query::new(), None)
            .await?;
        match resp.status().as_u16() {
            200 | 204 => Self::check_acknowledgement(resp, false).await,
            _ => Err(Self::report_error(resp).await),
        }
    }

    /// Create an index. Succeeds only once the shards acknowledged it.
    pub async fn create_index(&self, name: &str) -> Result<()> {
        let url = self.endpoint(&format!("/{name}"));
        debug!(name, "creating index");
        let resp = self.dispatch(Method::PUT, url, &Query::new(), None).await?;
        match resp.status().as_u16() {
            200 | 201 => Self::check_acknowledgement(resp, true).await,
            _ => Err(Self::report_error(resp).await),
        }
    }

    /// Delete an index.
    pub async fn delete_index(&self, name: &str) -> Result<()> {
        let url = self.endpoint(&format!("/{name}"));
        debug!(name, "deleting index");
        let resp = self
            .dispatch(Method::DELETE, url, &Query::new(), None)
            .await?;
        match resp.status().as_u16() {
            200 | 204 => Self::check_acknowledgement(resp, false).await,
            _ => Err(Self::report_error(resp).await),
        }
    }

    /// Store a document. With an id the document is created or replaced
    /// under that id; without one the service assigns the id.
    pub async fn create_document<T: Serialize>(
        &self,
        index: &str,
        id: Option<&str>,
        doc: &T,
    ) -> Result<()> {
        let (method, url) = match id {
            Some(id) => (Method::PUT, self.endpoint(&format!("/{index}/_doc/{id}"))),
            None => (Method::POST, self.endpoint(&format!("/{index}/_doc"))),
        };
        let body = serde_json::to_vec(doc).map_err(ClientError::Serialize)?;
        debug!(index, id, "storing document");
        let resp = self.dispatch(method, url, &Query::new(), Some(body)).await?;
        match resp.status().as_u16() {
            200 | 201 => Ok(()),
            _ => Err(Self::report_error(resp).await),
        }
    }

    /// Delete a document by id. A document that was already gone counts
    /// as deleted.
    pub async fn delete_document(&self, index: &str, id: &str) -> Result<()> {
        let url = self.endpoint(&format!("/{index}/_doc/{id}"));
        debug!(index, id, "deleting document");
        let resp = self
            .dispatch(Method::DELETE, url, &Query::new(), None)
            .await?;
        match resp.status().as_u16() {
            200 | 204 => {
                let outcome: MutationResult = Self::read_json(resp).await?;
                match outcome.result.as_str() {
                    "deleted" | "not_found" => Ok(()),
                    other => Err(ClientError::UnhandledResult(other.to_string())),
                }
            }
            _ => Err(Self::report_error(resp).await),
        }
    }

    /// Run a search against an index and return the raw response body.
    ///
    /// `body` is raw JSON query text, sent unchanged; the result is
    /// returned unparsed so callers keep full control of the shape.
    pub async fn search_documents(&self, index: &str, query: &Query, body: &str) -> Result<String> {
        let url = self.endpoint(&format!("/{index}/_search"));
        let body = raw_body(body)?;
        debug!(index, "searching documents");
        let resp = self.dispatch(Method::POST, url, query, Some(body)).await?;
        if resp.status().as_u16() != 200 {
            return Err(Self::report_error(resp).await);
        }
        Ok(resp.text().await?)
    }
}

/// Validate caller-supplied JSON text and pass it through unchanged,
/// so bodies built elsewhere are not double-encoded.
fn raw_body(text: &str) -> Result<Vec<u8>> {
    serde_json::from_str::<&serde_json::value::RawValue>(text).map_err(ClientError::Serialize)?;
    Ok(text.as_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(address: &str) -> Client {
        Client::new(address)
    }

    #[test]
    fn endpoint_keeps_leading_slash_fragments() {
        let c = client("http://localhost:9200");
        assert_eq!(
            c.endpoint("/_template/logs"),
            "http://localhost:9200/_template/logs"
        );
    }

    #[test]
    fn endpoint_inserts_separator_when_missing() {
        let c = client("http://localhost:9200");
        assert_eq!(c.endpoint("orders/_search"), "http://localhost:9200/orders/_search");
    }

    #[test]
    fn endpoint_leaves_empty_fragment_alone() {
        let c = client("http://localhost:9200");
        assert_eq!(c.endpoint(""), "http://localhost:9200");
    }

    #[test]
    fn endpoint_never_doubles_the_separator() {
        let c = client("http://localhost:9200/");
        assert_eq!(c.endpoint("/orders"), "http://localhost:9200/orders");
        assert_eq!(c.endpoint("orders"), "http://localhost:9200/orders");
    }

    #[test]
    fn raw_body_passes_json_through_unchanged() {
        let text = r#"{"query": {"match_all": {}}}"#;
        assert_eq!(raw_body(text).unwrap(), text.as_bytes());
    }

    #[test]
    fn raw_body_rejects_invalid_json() {
        let err = raw_body("{not json").unwrap_err();
        assert!(matches!(err, ClientError::Serialize(_)));
    }
}
