use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Free-form structured context attached to a reasoning request.
///
/// Keys are kept sorted so the serialized prompt is reproducible.
pub type AnalysisContext = BTreeMap<String, Value>;

/// Identifier of a job in the scheduling service.
///
/// The service hands out string ids, but callers frequently pass plain
/// integers, so both forms are accepted on input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for JobId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawJobId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawJobId::deserialize(deserializer)? {
            RawJobId::Text(text) => JobId(text),
            RawJobId::Number(number) => JobId(number.to_string()),
        })
    }
}

/// A job record as returned by the scheduling service.
///
/// The service owns this shape, so fields are kept as raw JSON and read
/// loosely through accessors. Unknown fields are carried through in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    /// `Some(Value::Null)` for an explicit `null`, `None` when absent
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub enabled: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cron: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Job {
    /// Jobs without an `enabled` field count as active; otherwise the flag
    /// is read for truthiness.
    pub fn is_active(&self) -> bool {
        self.enabled.as_ref().map(is_truthy).unwrap_or(true)
    }

    /// The cron expression, when the field holds a string.
    pub fn cron_expr(&self) -> Option<&str> {
        self.cron.as_ref().and_then(Value::as_str)
    }

    /// The department id, if it is set to something meaningful.
    pub fn department(&self) -> Option<&Value> {
        self.department_id.as_ref().filter(|value| is_truthy(value))
    }
}

/// Outcome of a single job execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStatus {
    Success,
    Failed,
    Timeout,
    Other(String),
    Unknown,
}

/// One execution record of a job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Execution {
    pub fn status(&self) -> ExecutionStatus {
        match self.status.as_ref().and_then(Value::as_str) {
            Some("success") => ExecutionStatus::Success,
            Some("failed") => ExecutionStatus::Failed,
            Some("timeout") => ExecutionStatus::Timeout,
            Some(other) => ExecutionStatus::Other(other.to_string()),
            None => ExecutionStatus::Unknown,
        }
    }

    /// Both timestamps, when both are non-empty strings.
    pub fn time_span(&self) -> Option<(&str, &str)> {
        let started = non_empty_str(self.started_at.as_ref())?;
        let finished = non_empty_str(self.finished_at.as_ref())?;
        Some((started, finished))
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Loose truthiness check used when reading optional fields from remote records.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
