use serde_json::Value;

use crate::applications::candidate::build_candidate;
use crate::applications::models::{is_present, non_empty, ApplicationFields, ApplicationPayload};
use crate::platforms::PlatformConfig;

/// Builds the application-create body for one platform.
///
/// The candidate object is attached when no candidate id is given, or when the
/// platform insists on it regardless.
pub fn build_payload(config: &PlatformConfig, fields: &ApplicationFields) -> ApplicationPayload {
    let candidate_id = non_empty(&fields.candidate_id).map(str::to_string);
    let candidate = (candidate_id.is_none() || config.requires_candidate_object)
        .then(|| build_candidate(&fields.candidate));

    ApplicationPayload {
        job_id: fields.job_id.clone(),
        initial_stage_id: fields.initial_stage_id.clone(),
        candidate_id,
        candidate,
        answers: fields.answers.clone().filter(|a| !a.is_empty()),
        meta_data: serialize_metadata(&fields.metadata),
        attachment: fields
            .attachment
            .clone()
            .filter(|_| is_present(&fields.attachment)),
        source: non_empty(&fields.source).map(str::to_string),
    }
}

/// Strings are sent as-is; any other structured value is sent as its JSON text.
fn serialize_metadata(metadata: &Option<Value>) -> Option<String> {
    if !is_present(metadata) {
        return None;
    }
    match metadata.as_ref()? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
