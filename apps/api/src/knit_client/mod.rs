/// Knit client — the single point of entry for calls to the ATS aggregation API.
///
/// No other module builds requests to Knit directly; the dispatcher talks to it
/// through the `ApplicationGateway` trait.
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::applications::models::ApplicationPayload;

pub const KNIT_APPLICATION_URL: &str = "https://api.getknit.dev/v1.0/ats.application.create";
/// Selects which ATS connection a request is routed to.
pub const INTEGRATION_ID_HEADER: &str = "X-Knit-Integration-Id";
const JSON_MIME: &str = "application/json";

#[derive(Debug, Error)]
pub enum KnitError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        message: String,
        /// Error body returned by the server, when it was JSON.
        body: Option<Value>,
    },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl KnitError {
    /// Structured error body captured from the server, if any.
    pub fn body(&self) -> Option<&Value> {
        match self {
            KnitError::Api { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

/// Outbound seam for application creation. `KnitClient` is the production implementation.
#[async_trait]
pub trait ApplicationGateway: Send + Sync {
    /// Posts one application and returns the parsed 2xx response body.
    async fn create_application(
        &self,
        integration_id: &str,
        payload: &ApplicationPayload,
    ) -> Result<Value, KnitError>;
}

#[derive(Clone)]
pub struct KnitClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl KnitClient {
    pub fn new(api_key: String, endpoint: String) -> Result<Self, KnitError> {
        Ok(Self {
            client: Client::builder().build()?,
            api_key,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ApplicationGateway for KnitClient {
    async fn create_application(
        &self,
        integration_id: &str,
        payload: &ApplicationPayload,
    ) -> Result<Value, KnitError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, JSON_MIME)
            .header(CONTENT_TYPE, JSON_MIME)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(INTEGRATION_ID_HEADER, integration_id)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!("Knit API returned {}: {}", status, text);
            let body = serde_json::from_str::<Value>(&text).ok();
            let message = if text.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                text
            };
            return Err(KnitError::Api {
                status: status.as_u16(),
                message,
                body,
            });
        }

        debug!("Knit API responded {}", status);
        Ok(serde_json::from_str(&text)?)
    }
}
