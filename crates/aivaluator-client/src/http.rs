//! HTTP scoring-service client.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{debug, instrument};

use aivaluator_core::model::{ScoreReport, SubmissionPayload};
use aivaluator_core::traits::ScoringService;

use crate::config::ServerConfig;
use crate::error::ClientError;

/// Longest error body echoed back in a `ClientError::Status`.
const MAX_ERROR_BODY: usize = 512;

/// Posts submissions as JSON to `{base_url}{submit_path}`.
pub struct HttpScoringClient {
    endpoint: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpScoringClient {
    pub fn new(config: &ServerConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint: config.endpoint(),
            timeout_secs: config.timeout_secs,
            client,
        })
    }

    /// The full URL submissions are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Post a submission and decode the score report.
    #[instrument(skip(self, payload), fields(
        endpoint = %self.endpoint,
        students = payload.student_count(),
        questions = payload.question_count(),
    ))]
    pub async fn submit(&self, payload: &SubmissionPayload) -> Result<ScoreReport, ClientError> {
        payload.check_dimensions()?;

        let start = Instant::now();
        let response = self
            .client
            .post(self.endpoint.as_str())
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClientError::Timeout(self.timeout_secs)
                } else if e.is_connect() {
                    ClientError::Unreachable {
                        url: self.endpoint.clone(),
                        message: e.to_string(),
                    }
                } else {
                    ClientError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status,
                message: truncate_body(body),
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout(self.timeout_secs)
            } else {
                ClientError::Network(e.to_string())
            }
        })?;
        let report = ScoreReport::from_json(&body)
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;

        debug!(
            status,
            questions = report.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "score report received"
        );
        Ok(report)
    }
}

fn truncate_body(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let mut end = MAX_ERROR_BODY;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
    }
    body
}

#[async_trait]
impl ScoringService for HttpScoringClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn score(&self, payload: &SubmissionPayload) -> anyhow::Result<ScoreReport> {
        Ok(self.submit(payload).await?)
    }
}
