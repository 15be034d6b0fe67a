//! Application dispatcher — resolves the target platform, builds the payload and
//! performs one outbound create call, folding every per-application failure into
//! an `ApplicationResult`.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::applications::models::{
    ApplicationFields, ApplicationResult, BulkResult, FailureKind, TaggedApplication,
};
use crate::applications::payload::build_payload;
use crate::knit_client::{ApplicationGateway, KnitError};
use crate::platforms::PlatformRegistry;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("ATS '{name}' not found in configuration. Available: {known:?}")]
    UnknownPlatform { name: String, known: Vec<String> },

    #[error("Missing required fields: {}", missing.join(", "))]
    MissingFields { missing: Vec<&'static str> },
}

#[derive(Clone)]
pub struct ApplicationDispatcher {
    registry: Arc<PlatformRegistry>,
    gateway: Arc<dyn ApplicationGateway>,
}

impl ApplicationDispatcher {
    pub fn new(registry: Arc<PlatformRegistry>, gateway: Arc<dyn ApplicationGateway>) -> Self {
        Self { registry, gateway }
    }

    pub fn registry(&self) -> &PlatformRegistry {
        &self.registry
    }

    /// Creates one application on `platform`.
    ///
    /// An unknown platform or a record without its required fields is returned as
    /// `Err` before anything is sent; transport failures and non-success responses
    /// come back as a failed `ApplicationResult`.
    pub async fn create_application(
        &self,
        platform: &str,
        fields: &ApplicationFields,
    ) -> Result<ApplicationResult, DispatchError> {
        let config = self
            .registry
            .get(platform)
            .ok_or_else(|| DispatchError::UnknownPlatform {
                name: platform.to_string(),
                known: self.registry.names(),
            })?;

        let missing = missing_fields(fields);
        if !missing.is_empty() {
            return Err(DispatchError::MissingFields { missing });
        }

        let payload = build_payload(config, fields);

        info!(
            "Creating application in {} (job {}) for {} {} <{}>",
            platform.to_uppercase(),
            fields.job_id,
            fields.candidate.first_name,
            fields.candidate.last_name,
            fields.candidate.email
        );
        if let Some(notes) = config.notes.as_deref().filter(|n| !n.is_empty()) {
            warn!("Note for {platform}: {notes}");
        }

        let response = match self
            .gateway
            .create_application(&config.integration_id, &payload)
            .await
        {
            Ok(response) => response,
            Err(e) => return Ok(transport_failure(platform, e)),
        };

        if is_success(&response) {
            log_created(platform, &response);
            let data = response.get("data").cloned();
            Ok(ApplicationResult::created(data))
        } else {
            warn!("Application creation on {platform} returned: {response}");
            let message = response_error_message(&response);
            Ok(ApplicationResult::failed(
                FailureKind::Rejected,
                message,
                Some(response),
            ))
        }
    }

    /// Submits each record in order, one at a time. Records arrive as raw JSON and are
    /// parsed one by one, so a malformed or failing record never stops the ones after it.
    pub async fn bulk_create(&self, records: Vec<Value>) -> Vec<BulkResult> {
        let total = records.len();
        info!("Creating {total} applications");
        let mut results = Vec::with_capacity(total);

        for (idx, record) in records.into_iter().enumerate() {
            let ats_name = record
                .get("ats_name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            info!("Application {}/{} -> {}", idx + 1, total, ats_name);

            let result = match serde_json::from_value::<TaggedApplication>(record) {
                Ok(application) => self
                    .create_application(&application.ats_name, &application.fields)
                    .await
                    .unwrap_or_else(dispatch_failure),
                Err(e) => {
                    warn!("Skipping malformed application record {}: {e}", idx + 1);
                    ApplicationResult::failed(
                        FailureKind::Validation,
                        format!("Invalid application record: {e}"),
                        None,
                    )
                }
            };
            results.push(BulkResult { ats_name, result });
        }

        results
    }
}

/// Identity and contact fields the ATS cannot create a candidate without.
fn missing_fields(fields: &ApplicationFields) -> Vec<&'static str> {
    let candidate = &fields.candidate;
    [
        ("job_id", &fields.job_id),
        ("initial_stage_id", &fields.initial_stage_id),
        ("first_name", &candidate.first_name),
        ("last_name", &candidate.last_name),
        ("email", &candidate.email),
        ("phone", &candidate.phone),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(name, _)| name)
    .collect()
}

fn dispatch_failure(e: DispatchError) -> ApplicationResult {
    warn!("{e}");
    let kind = match &e {
        DispatchError::UnknownPlatform { .. } => FailureKind::UnknownPlatform,
        DispatchError::MissingFields { .. } => FailureKind::Validation,
    };
    ApplicationResult::failed(kind, e.to_string(), None)
}

/// `success` may come back as a boolean or as the string "true".
fn is_success(response: &Value) -> bool {
    match response.get("success") {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s == "true",
        _ => false,
    }
}

fn response_error_message(response: &Value) -> String {
    match response.get("error") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Object(obj)) => obj
            .get("msg")
            .or_else(|| obj.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| Value::Object(obj.clone()).to_string()),
        _ => "Application creation was not successful".to_string(),
    }
}

fn transport_failure(platform: &str, e: KnitError) -> ApplicationResult {
    error!("Error creating application on {platform}: {e}");
    let body = e.body().cloned();
    if let Some(body) = &body {
        error!("Response: {body}");
    }
    ApplicationResult::failed(FailureKind::Transport, e.to_string(), body)
}

fn log_created(platform: &str, response: &Value) {
    let data = response.get("data");
    let id = |key: &str| {
        data.and_then(|d| d.get(key))
            .and_then(Value::as_str)
            .unwrap_or("-")
            .to_string()
    };
    info!(
        "Application created on {platform}: application_id={} candidate_id={} job_id={}",
        id("applicationId"),
        id("candidateId"),
        id("jobId")
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applications::models::{ApplicationPayload, CandidateFields};
    use crate::platforms::PlatformConfig;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records every call and replies with a scripted outcome.
    struct ScriptedGateway {
        calls: Mutex<Vec<(String, Value)>>,
        reply: fn() -> Result<Value, KnitError>,
    }

    impl ScriptedGateway {
        fn new(reply: fn() -> Result<Value, KnitError>) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                reply,
            })
        }

        fn calls(&self) -> Vec<(String, Value)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ApplicationGateway for ScriptedGateway {
        async fn create_application(
            &self,
            integration_id: &str,
            payload: &ApplicationPayload,
        ) -> Result<Value, KnitError> {
            self.calls.lock().unwrap().push((
                integration_id.to_string(),
                serde_json::to_value(payload).unwrap(),
            ));
            (self.reply)()
        }
    }

    fn registry() -> Arc<PlatformRegistry> {
        let mut registry = PlatformRegistry::default();
        registry
            .upsert(
                "workable",
                PlatformConfig {
                    integration_id: "mg_bdP3JP31kh2jnCGTJGr1er".to_string(),
                    requires_candidate_object: true,
                    notes: Some("Requires full candidate object".to_string()),
                },
            )
            .unwrap();
        registry
            .upsert(
                "bamboohr_ats",
                PlatformConfig {
                    integration_id: "mg_d8SfAvVUwjyJHrffzeAnAC".to_string(),
                    requires_candidate_object: false,
                    notes: None,
                },
            )
            .unwrap();
        Arc::new(registry)
    }

    fn fields(job_id: &str) -> ApplicationFields {
        ApplicationFields {
            job_id: job_id.to_string(),
            initial_stage_id: "applied".to_string(),
            candidate: CandidateFields {
                first_name: "Nithin".to_string(),
                last_name: "Sharma".to_string(),
                email: "johndoe@gmail.com".to_string(),
                phone: "9999999999".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn record(ats_name: &str, job_id: &str) -> Value {
        serde_json::to_value(TaggedApplication {
            ats_name: ats_name.to_string(),
            fields: fields(job_id),
        })
        .unwrap()
    }

    fn created() -> Result<Value, KnitError> {
        Ok(json!({
            "success": true,
            "data": { "applicationId": "app_1", "candidateId": "cand_1", "jobId": "2CA2D5B257" }
        }))
    }

    #[tokio::test]
    async fn test_unknown_platform_lists_known_and_skips_network() {
        let gateway = ScriptedGateway::new(created);
        let dispatcher = ApplicationDispatcher::new(registry(), gateway.clone());

        let err = dispatcher
            .create_application("lever", &fields("1"))
            .await
            .unwrap_err();

        let DispatchError::UnknownPlatform { name, known } = err else {
            panic!("expected an unknown platform error");
        };
        assert_eq!(name, "lever");
        assert_eq!(known, vec!["bamboohr_ats", "workable"]);
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_success_surfaces_response_data() {
        let gateway = ScriptedGateway::new(created);
        let dispatcher = ApplicationDispatcher::new(registry(), gateway.clone());

        let result = dispatcher
            .create_application("workable", &fields("2CA2D5B257"))
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.data.unwrap()["applicationId"], "app_1");
        let calls = gateway.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "mg_bdP3JP31kh2jnCGTJGr1er");
        assert_eq!(calls[0].1["jobId"], "2CA2D5B257");
    }

    #[tokio::test]
    async fn test_string_true_counts_as_success() {
        let gateway = ScriptedGateway::new(|| Ok(json!({ "success": "true" })));
        let dispatcher = ApplicationDispatcher::new(registry(), gateway);

        let result = dispatcher
            .create_application("bamboohr_ats", &fields("22"))
            .await
            .unwrap();
        assert!(result.success);
        assert!(result.data.is_none());
    }

    #[tokio::test]
    async fn test_soft_failure_surfaces_raw_response() {
        let gateway = ScriptedGateway::new(|| {
            Ok(json!({ "success": false, "error": { "msg": "Duplicate application" } }))
        });
        let dispatcher = ApplicationDispatcher::new(registry(), gateway);

        let result = dispatcher
            .create_application("bamboohr_ats", &fields("22"))
            .await
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.failure, Some(FailureKind::Rejected));
        assert_eq!(result.error.as_deref(), Some("Duplicate application"));
        assert_eq!(result.response.unwrap()["success"], false);
    }

    #[tokio::test]
    async fn test_missing_success_field_is_soft_failure() {
        let gateway = ScriptedGateway::new(|| Ok(json!({ "data": {} })));
        let dispatcher = ApplicationDispatcher::new(registry(), gateway);

        let result = dispatcher
            .create_application("bamboohr_ats", &fields("22"))
            .await
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.failure, Some(FailureKind::Rejected));
    }

    #[tokio::test]
    async fn test_transport_failure_captures_error_body() {
        let gateway = ScriptedGateway::new(|| {
            Err(KnitError::Api {
                status: 401,
                message: "Unauthorized".to_string(),
                body: Some(json!({ "error": "invalid api key" })),
            })
        });
        let dispatcher = ApplicationDispatcher::new(registry(), gateway);

        let result = dispatcher
            .create_application("workable", &fields("2CA2D5B257"))
            .await
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.failure, Some(FailureKind::Transport));
        assert!(result.error.unwrap().contains("401"));
        assert_eq!(result.response.unwrap()["error"], "invalid api key");
    }

    #[tokio::test]
    async fn test_required_candidate_object_reaches_gateway() {
        let gateway = ScriptedGateway::new(created);
        let dispatcher = ApplicationDispatcher::new(registry(), gateway.clone());

        let mut with_id = fields("2CA2D5B257");
        with_id.candidate_id = Some("cand_1".to_string());
        dispatcher
            .create_application("workable", &with_id)
            .await
            .unwrap();

        let body = &gateway.calls()[0].1;
        assert_eq!(body["candidateId"], "cand_1");
        assert_eq!(body["candidate"]["firstName"], "Nithin");
    }

    #[tokio::test]
    async fn test_bulk_continues_past_unknown_platform() {
        let gateway = ScriptedGateway::new(created);
        let dispatcher = ApplicationDispatcher::new(registry(), gateway.clone());

        let records = vec![record("lever", "1"), record("bamboohr_ats", "22")];

        let results = dispatcher.bulk_create(records).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].ats_name, "lever");
        assert!(!results[0].result.success);
        assert_eq!(
            results[0].result.failure,
            Some(FailureKind::UnknownPlatform)
        );
        assert_eq!(results[1].ats_name, "bamboohr_ats");
        assert!(results[1].result.success);
        assert_eq!(gateway.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_bulk_keeps_going_after_transport_failure() {
        let gateway = ScriptedGateway::new(|| {
            Err(KnitError::Api {
                status: 500,
                message: "Internal Server Error".to_string(),
                body: None,
            })
        });
        let dispatcher = ApplicationDispatcher::new(registry(), gateway.clone());

        let records = vec![record("workable", "2CA2D5B257"), record("bamboohr_ats", "22")];

        let results = dispatcher.bulk_create(records).await;
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| !r.result.success));
        assert_eq!(gateway.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_candidate_fields_rejected_before_send() {
        let gateway = ScriptedGateway::new(created);
        let dispatcher = ApplicationDispatcher::new(registry(), gateway.clone());

        let mut incomplete = fields("22");
        incomplete.candidate.first_name.clear();
        incomplete.candidate.phone = "   ".to_string();

        let err = dispatcher
            .create_application("bamboohr_ats", &incomplete)
            .await
            .unwrap_err();

        let DispatchError::MissingFields { missing } = err else {
            panic!("expected a missing fields error");
        };
        assert_eq!(missing, vec!["first_name", "phone"]);
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_bulk_reports_malformed_record_and_continues() {
        let gateway = ScriptedGateway::new(created);
        let dispatcher = ApplicationDispatcher::new(registry(), gateway.clone());

        let mut malformed = record("bamboohr_ats", "22");
        malformed.as_object_mut().unwrap().remove("job_id");
        let mut blank_email = record("workable", "2CA2D5B257");
        blank_email["email"] = json!("");
        let records = vec![malformed, blank_email, record("bamboohr_ats", "22")];

        let results = dispatcher.bulk_create(records).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].ats_name, "bamboohr_ats");
        assert_eq!(results[0].result.failure, Some(FailureKind::Validation));
        assert!(results[0].result.error.as_deref().unwrap().contains("job_id"));
        assert_eq!(results[1].ats_name, "workable");
        assert_eq!(results[1].result.failure, Some(FailureKind::Validation));
        assert!(results[1].result.error.as_deref().unwrap().contains("email"));
        assert!(results[2].result.success);
        assert_eq!(gateway.calls().len(), 1);
    }
}
