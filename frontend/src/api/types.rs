use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Key the service uses for errors that do not belong to a single field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Server-assigned identifier. The service emits integers today, but the
/// core never does arithmetic on it, so strings are accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl RecordId {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<i64>() {
            Ok(value) => RecordId::Number(value),
            Err(_) => RecordId::Text(trimmed.to_string()),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(value) => write!(f, "{}", value),
            RecordId::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Number(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}`")]
pub struct ParseChoiceError {
    kind: &'static str,
    value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Department {
    #[serde(rename = "HR")]
    Hr,
    #[serde(rename = "IT")]
    It,
    Sales,
    Marketing,
}

impl Department {
    pub const ALL: [Department; 4] = [
        Department::Hr,
        Department::It,
        Department::Sales,
        Department::Marketing,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Department::Hr => "HR",
            Department::It => "IT",
            Department::Sales => "Sales",
            Department::Marketing => "Marketing",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Department {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Department::ALL
            .into_iter()
            .find(|department| department.as_str() == s.trim())
            .ok_or_else(|| ParseChoiceError {
                kind: "department",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Present" => Ok(AttendanceStatus::Present),
            "Absent" => Ok(AttendanceStatus::Absent),
            other => Err(ParseChoiceError {
                kind: "attendance status",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: RecordId,
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    pub department: Department,
    #[serde(default)]
    pub present_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    pub department: Department,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: RecordId,
    pub employee: RecordId,
    #[serde(default)]
    pub employee_name: String,
    #[serde(default)]
    pub employee_code: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkAttendance {
    pub employee: RecordId,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

/// Query constraints for the attendance collection.
///
/// The service only honours the range when both bounds are present, so a
/// half-open range is dropped from the query rather than sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceFilter {
    pub date: Option<NaiveDate>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl AttendanceFilter {
    pub fn on(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..Self::default()
        }
    }

    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            date: None,
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.query_params().is_empty()
    }

    pub fn query_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(date) = self.date {
            params.push(("date".to_string(), date.format("%Y-%m-%d").to_string()));
        }
        if let (Some(from), Some(to)) = (self.from, self.to) {
            params.push(("from".to_string(), from.format("%Y-%m-%d").to_string()));
            params.push(("to".to_string(), to.format("%Y-%m-%d").to_string()));
        }
        params
    }
}

/// Opaque pagination token handed out by the service, usually an absolute URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<Cursor>,
    pub previous: Option<Cursor>,
}

impl<T> Page<T> {
    pub fn single(items: Vec<T>) -> Self {
        Self {
            items,
            next: None,
            previous: None,
        }
    }
}

/// Both list shapes the service may answer with.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum PageBody<T> {
    Envelope {
        results: Vec<T>,
        #[serde(default)]
        next: Option<Cursor>,
        #[serde(default)]
        previous: Option<Cursor>,
    },
    Bare(Vec<T>),
}

impl<T> From<PageBody<T>> for Page<T> {
    fn from(body: PageBody<T>) -> Self {
        match body {
            PageBody::Envelope {
                results,
                next,
                previous,
            } => Page {
                items: results,
                next,
                previous,
            },
            PageBody::Bare(items) => Page::single(items),
        }
    }
}

/// Validation messages keyed by field name, kept exactly as the service sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    /// Reads a 4xx body. Returns `None` unless the body is a non-empty object.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        if object.is_empty() {
            return None;
        }
        let mut errors = Self::new();
        for (field, messages) in object {
            match messages {
                Value::Array(items) => {
                    for item in items {
                        errors.push(field.clone(), message_text(item));
                    }
                }
                other => errors.push(field.clone(), message_text(other)),
            }
        }
        Some(errors)
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field).first().map(String::as_str)
    }

    pub fn non_field(&self) -> &[String] {
        self.get(NON_FIELD_ERRORS)
    }

    pub fn clear_field(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn summary(&self) -> String {
        self.0
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

fn message_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Network failure or a 5xx answer.
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Failed to parse response: {0}")]
    Decode(String),
    #[error("Validation failed: {}", .0.summary())]
    Validation(FieldErrors),
    /// A 4xx answer whose body is not a field map.
    #[error("{0}")]
    General(String),
    #[error("Not found")]
    NotFound,
}

impl ApiError {
    pub fn request_failed(err: impl fmt::Display) -> Self {
        ApiError::Transport(err.to_string())
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ApiError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Decode(_))
    }
}
