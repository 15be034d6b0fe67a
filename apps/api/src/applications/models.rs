//! Wire models for the application-create call and the flat input record it is built from.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const PERSONAL: &str = "PERSONAL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phone {
    #[serde(rename = "type")]
    pub kind: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Email {
    #[serde(rename = "type")]
    pub kind: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: String,
    pub degree: String,
    pub currently_pursuing: bool,
    pub major: String,
    pub institute: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub address_line1: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub first_name: String,
    pub last_name: String,
    pub phones: Vec<Phone>,
    pub emails: Vec<Email>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<Education>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub present_address: Option<Address>,
    /// Passed through verbatim from the caller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_address: Option<Value>,
    /// Passed through verbatim from the caller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permanent_address: Option<Value>,
}

/// One answer to a job question, forwarded to the ATS unmodified.
///
/// `answer` keeps whatever JSON the caller sent; keys not listed here ride along in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: String,
    pub question: String,
    pub answer: Value,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple_choice_answers: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST ats.application.create`. Absent optionals are omitted, never sent as null.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPayload {
    pub job_id: String,
    pub initial_stage_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate: Option<Candidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answers: Option<Vec<Answer>>,
    #[serde(rename = "metaData", skip_serializing_if = "Option::is_none")]
    pub meta_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Candidate-describing part of an application record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub degree: Option<String>,
    pub major: Option<String>,
    pub institute: Option<String>,
    pub currently_pursuing: Option<bool>,
    pub address_line1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub zip_code: Option<String>,
    pub work_address: Option<Value>,
    pub permanent_address: Option<Value>,
    pub links: Option<Vec<Value>>,
}

/// Flat application record accepted by the dispatcher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationFields {
    pub job_id: String,
    pub initial_stage_id: String,
    #[serde(default)]
    pub candidate_id: Option<String>,
    #[serde(flatten)]
    pub candidate: CandidateFields,
    #[serde(default)]
    pub answers: Option<Vec<Answer>>,
    /// Structured values are serialized to a JSON string before sending.
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default)]
    pub attachment: Option<Value>,
    #[serde(default)]
    pub source: Option<String>,
}

/// An application record addressed to a named platform, as used by bulk submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedApplication {
    pub ats_name: String,
    #[serde(flatten)]
    pub fields: ApplicationFields,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The record was malformed or missing required candidate fields; nothing was sent.
    Validation,
    UnknownPlatform,
    Transport,
    Rejected,
}

/// Normalized outcome of one application submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
    /// Raw response body on soft failure, parsed error body on transport failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}

impl ApplicationResult {
    pub fn created(data: Option<Value>) -> Self {
        Self {
            success: true,
            data,
            error: None,
            failure: None,
            response: None,
        }
    }

    pub fn failed(kind: FailureKind, error: impl Into<String>, response: Option<Value>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            failure: Some(kind),
            response,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkResult {
    pub ats_name: String,
    pub result: ApplicationResult,
}

/// Truthiness of an optional JSON value: null, false, 0, "", [] and {} count as absent.
pub(crate) fn is_present(value: &Option<Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
    }
}

/// Returns the string when it is set and non-empty.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
