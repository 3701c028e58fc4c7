//! Searchlite Client Library
//!
//! HTTP client for the REST API of Elasticsearch-compatible search
//! services. Covers index templates, indices, single documents, and
//! search queries. Every operation issues exactly one request and
//! reports its outcome through [`ClientError`]; retries, pooling policy,
//! authentication, and bulk APIs are left to the caller.

mod client;
mod types;

pub use client::Client;
pub use types::{Acknowledgement, ErrorDetail, Query, QueryValue, RootCause, ServiceError};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Network-level failure, surfaced from the transport verbatim.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request payload could not be encoded as JSON. Raised before
    /// any network I/O happens.
    #[error("could not encode request body: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A response body did not match the shape expected for the call.
    #[error("could not decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// Structured error reported by the service, reduced to its first
    /// root cause.
    #[error("type: {kind}\nreason: {reason}\n")]
    Service { kind: String, reason: String },

    /// The service sent an error body with an empty root cause list.
    #[error("malformed error body: empty root cause list")]
    MalformedErrorBody,

    /// A well-formed acknowledgement whose flags do not match what the
    /// operation requires.
    #[error("not acknowledged (acknowledged={acknowledged}, shards_acknowledged={shards_acknowledged})")]
    NotAcknowledged {
        acknowledged: bool,
        shards_acknowledged: bool,
    },

    /// Document deletion reported a result other than `deleted` or
    /// `not_found`.
    #[error("unhandled deletion result: {0:?}")]
    UnhandledResult(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
