// MiniDB request/response types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of a table as reported by the service
pub type TableName = String;

/// Rows fetched for one table; the service does not promise a rectangular shape
pub type RowGrid = Vec<Vec<Value>>;

#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest {
    pub query: String,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResponse {
    /// Whatever the executor produced: a status string, rows, or nothing
    #[serde(default)]
    pub result: Value,
}

impl QueryResponse {
    /// Build a response carrying a plain string result
    pub fn with_text(result: impl Into<String>) -> Self {
        Self {
            result: Value::String(result.into()),
        }
    }

    /// Textual form of the result, as the operator would read it.
    ///
    /// `null` has no text. Row sets are flattened and comma-joined, so
    /// `[["id","name"],[1,"ann"]]` reads `id,name,1,ann`.
    pub fn result_text(&self) -> Option<String> {
        match &self.result {
            Value::Null => None,
            other => Some(joined_text(other)),
        }
    }
}

fn joined_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Array(items) => items.iter().map(joined_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub message: String,
}

/// Body of the service's error replies (`{"error": ...}` or `{"message": ...}`)
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    pub(crate) fn text(&self) -> Option<&str> {
        self.message.as_deref().or(self.error.as_deref())
    }
}
