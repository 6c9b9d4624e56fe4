//! Remote reason service client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use gradelens_core::model::Trend;
use gradelens_core::traits::{fallback_reason, ReasonContext, ReasonGenerator};

use crate::config::ReasonConfig;
use crate::error::ReasonError;

/// JSON body posted to the reason service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasonRequest {
    pub student_id: i64,
    pub course: String,
    pub trend: Trend,
    pub score: f64,
    pub class_avg: f64,
    pub difference_with_class_avg: f64,
    pub prompt_override: String,
}

impl ReasonRequest {
    /// Build the wire request, using `default_prompt` unless the context
    /// carries its own.
    pub fn from_context(context: &ReasonContext, default_prompt: &str) -> Self {
        Self {
            student_id: context.student_id,
            course: context.course.clone(),
            trend: context.trend,
            score: context.score,
            class_avg: context.class_avg,
            difference_with_class_avg: context.difference_with_class_avg,
            prompt_override: context
                .prompt_override
                .clone()
                .unwrap_or_else(|| default_prompt.to_string()),
        }
    }
}

#[derive(Deserialize)]
struct ReasonResponse {
    #[serde(default)]
    reason: Option<String>,
}

/// Reason generator backed by an HTTP service.
///
/// Every failure ends in the local fallback; the request is never retried.
pub struct HttpReasonGenerator {
    proxy_url: String,
    prompt: String,
    request_timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpReasonGenerator {
    pub fn new(config: &ReasonConfig) -> Result<Self, ReasonError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ReasonError::ClientBuild(e.to_string()))?;

        Ok(Self {
            proxy_url: config.proxy_url.trim().to_string(),
            prompt: config.prompt.clone(),
            request_timeout_secs: config.request_timeout_secs,
            client,
        })
    }

    /// Ask the service for a reason, surfacing every failure.
    #[instrument(skip(self, context), fields(course = %context.course))]
    pub async fn request_reason(&self, context: &ReasonContext) -> Result<String, ReasonError> {
        let body = ReasonRequest::from_context(context, &self.prompt);

        let response = self
            .client
            .post(&self.proxy_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ReasonError::Timeout(self.request_timeout_secs)
                } else {
                    ReasonError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ReasonError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ReasonError::Timeout(self.request_timeout_secs)
            } else {
                ReasonError::NetworkError(e.to_string())
            }
        })?;
        let parsed: ReasonResponse = serde_json::from_str(&text)
            .map_err(|e| ReasonError::MalformedResponse(e.to_string()))?;

        match parsed.reason.as_deref().map(str::trim) {
            Some(reason) if !reason.is_empty() => Ok(reason.to_string()),
            _ => Err(ReasonError::EmptyReason),
        }
    }
}

#[async_trait]
impl ReasonGenerator for HttpReasonGenerator {
    fn name(&self) -> &str {
        "http"
    }

    async fn reason(&self, context: &ReasonContext) -> String {
        match self.request_reason(context).await {
            Ok(reason) => reason,
            Err(e) => {
                tracing::warn!(
                    course = %context.course,
                    error = %e,
                    "reason service unavailable, using fallback"
                );
                fallback_reason(context)
            }
        }
    }
}
