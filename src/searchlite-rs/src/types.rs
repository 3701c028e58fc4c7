use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

/// Query string parameters for an operation.
///
/// Iteration order of the map decides parameter order on the wire, so
/// ordering is unspecified and not stable across calls.
pub type Query = HashMap<String, QueryValue>;

/// A single query parameter value.
///
/// The service only accepts scalars here; keeping the set closed means
/// unsupported types cannot be silently stringified.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    String(String),
    Int(i64),
    Bool(bool),
    Float(f64),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::String(s) => f.write_str(s),
            QueryValue::Int(n) => write!(f, "{n}"),
            QueryValue::Bool(b) => write!(f, "{b}"),
            QueryValue::Float(x) => write!(f, "{x}"),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::String(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::String(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Int(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        QueryValue::Int(i64::from(value))
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        QueryValue::Float(value)
    }
}

/// Acknowledgement body returned by template and index operations.
///
/// Some APIs omit `shards_acknowledged` entirely; a missing flag decodes
/// as `false`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Acknowledgement {
    #[serde(default)]
    pub acknowledged: bool,
    #[serde(default)]
    pub shards_acknowledged: bool,
}

/// Error envelope returned by the service on failed requests.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceError {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub root_cause: Vec<RootCause>,
}

/// One entry of the service's root cause list.
#[derive(Debug, Clone, Deserialize)]
pub struct RootCause {
    #[serde(rename = "type")]
    pub kind: String,
    pub reason: String,
}

/// Body of a document deletion response.
#[derive(Debug, Deserialize)]
pub(crate) struct MutationResult {
    pub result: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_values_render_per_variant() {
        assert_eq!(QueryValue::from("pretty").to_string(), "pretty");
        assert_eq!(QueryValue::from(42i64).to_string(), "42");
        assert_eq!(QueryValue::from(-7i32).to_string(), "-7");
        assert_eq!(QueryValue::from(true).to_string(), "true");
        assert_eq!(QueryValue::from(false).to_string(), "false");
        assert_eq!(QueryValue::from(1.5f64).to_string(), "1.5");
    }

    #[test]
    fn acknowledgement_defaults_missing_shard_flag_to_false() {
        let ack: Acknowledgement = serde_json::from_str(r#"{"acknowledged":true}"#).unwrap();
        assert!(ack.acknowledged);
        assert!(!ack.shards_acknowledged);
    }

    #[test]
    fn service_error_decodes_root_causes() {
        let body = r#"{"error":{"root_cause":[
            {"type":"index_not_found_exception","reason":"no such index [foo]"},
            {"type":"shadowed","reason":"second cause"}
        ]}}"#;
        let err: ServiceError = serde_json::from_str(body).unwrap();
        assert_eq!(err.error.root_cause.len(), 2);
        assert_eq!(err.error.root_cause[0].kind, "index_not_found_exception");
        assert_eq!(err.error.root_cause[0].reason, "no such index [foo]");
    }

    #[test]
    fn service_error_tolerates_missing_root_cause_list() {
        let err: ServiceError = serde_json::from_str(r#"{"error":{}}"#).unwrap();
        assert!(err.error.root_cause.is_empty());
    }

    #[test]
    fn mutation_result_decodes() {
        let outcome: MutationResult = serde_json::from_str(r#"{"result":"deleted"}"#).unwrap();
        assert_eq!(outcome.result, "deleted");
    }
}
