use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::arms::error::ClientError;

/// A single survey record. The schema is decided by the remote report, so a
/// record stays an open mapping of field name to scalar value. Key order is
/// whatever the API sent (serde_json `preserve_order`).
pub type Record = serde_json::Map<String, Value>;

/// The two shapes every call resolves to: a `data` array on success or a
/// single `error` message on failure. Untagged so it round-trips the wire
/// shapes `{"data": [...]}` and `{"error": "..."}` unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ApiOutcome {
    Success { data: Vec<Value> },
    Failure { error: String },
}

impl ApiOutcome {
    pub fn failure(message: impl Into<String>) -> Self {
        ApiOutcome::Failure {
            error: message.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ApiOutcome::Failure { .. })
    }

    /// Success payload, or `None` on failure.
    pub fn data(&self) -> Option<&[Value]> {
        match self {
            ApiOutcome::Success { data } => Some(data),
            ApiOutcome::Failure { .. } => None,
        }
    }

    /// Success payload narrowed to object records; non-object rows are
    /// skipped. Lookup endpoints like `year` return scalars, so callers that
    /// expect tabular data go through here.
    pub fn records(&self) -> Vec<&Record> {
        self.data()
            .map(|rows| rows.iter().filter_map(Value::as_object).collect())
            .unwrap_or_default()
    }
}

impl From<ClientError> for ApiOutcome {
    fn from(err: ClientError) -> Self {
        ApiOutcome::failure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_data_shape() {
        let outcome: ApiOutcome =
            serde_json::from_value(json!({"data": [{"year": 2020, "estimate": 1.5}]})).unwrap();
        let ApiOutcome::Success { data } = outcome else {
            panic!("expected success");
        };
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn decodes_error_shape() {
        let outcome: ApiOutcome = serde_json::from_value(json!({"error": "nope"})).unwrap();
        assert_eq!(outcome, ApiOutcome::failure("nope"));
    }

    #[test]
    fn rejects_unrelated_shape() {
        assert!(serde_json::from_value::<ApiOutcome>(json!({"status": "ok"})).is_err());
    }

    #[test]
    fn serializes_back_to_wire_shape() {
        let out = serde_json::to_value(ApiOutcome::failure("bad")).unwrap();
        assert_eq!(out, json!({"error": "bad"}));
    }

    #[test]
    fn records_skips_scalar_rows() {
        let outcome: ApiOutcome =
            serde_json::from_value(json!({"data": [2020, {"name": "Texas"}]})).unwrap();
        assert_eq!(outcome.records().len(), 1);
    }
}
