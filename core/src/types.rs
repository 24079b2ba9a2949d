//! Domain DTOs for the task API.
//!
//! # Design
//! `TaskRequest` deserializes leniently: missing strings become empty and a
//! missing `dueDate` becomes `None`, so the validator reports them with its
//! own messages instead of the deserializer rejecting the body. `status` stays
//! a free-form string for the same reason; `TaskStatus` is the closed set it
//! is checked against. These types are defined independently from the
//! mock-server crate; integration tests catch schema drift.
//!
//! `dueDate` accepts any of RFC 3339, an ISO-8601 date-time without offset,
//! or a bare date; the last two are read as UTC.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A task as submitted by a caller and forwarded upstream as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(
        default,
        deserialize_with = "deserialize_due_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<DateTime<Utc>>,
}

fn default_status() -> String {
    TaskStatus::Pending.as_str().to_string()
}

fn deserialize_due_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid ISO-8601 timestamp: {raw}"))),
    }
}

/// Parse an ISO-8601 timestamp. Values without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Server-assigned task identifier, kept exactly as the upstream sent it
/// (string, number, or anything else JSON allows).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct TaskId(Value);

impl TaskId {
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(Value::String(id.to_string()))
    }
}

impl From<u64> for TaskId {
    fn from(id: u64) -> Self {
        Self(Value::from(id))
    }
}

/// A task resource as returned by the upstream service.
///
/// Mirrors `TaskRequest` plus the server-assigned `id`; any other fields the
/// upstream adds are kept in `extra` and serialized back unchanged. A
/// fallback built from a `TaskRequest` has no id and serializes identically
/// to the request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TaskId>,
    #[serde(flatten)]
    pub task: TaskRequest,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<TaskRequest> for TaskResponse {
    fn from(task: TaskRequest) -> Self {
        Self {
            id: None,
            task,
            extra: Map::new(),
        }
    }
}

/// The status labels a task may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::Cancelled => "Cancelled",
        }
    }

    /// Case-insensitive match against the canonical labels. Surrounding
    /// whitespace is significant: `" Pending"` does not match.
    pub fn parse(label: &str) -> Option<TaskStatus> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
