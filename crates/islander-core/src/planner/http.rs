//! HTTP planner backend: `POST <base>/api/plan` with `{"prompt": ...}`,
//! answered by `{"text": ...}`.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::PlannerBackend;
use crate::config::ClientConfig;
use crate::error::ClientError;

#[derive(Debug, Serialize)]
struct PlanRequest<'a> {
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct PlanResponse {
    text: String,
}

/// Planner backend reached over plain JSON-over-HTTP.
#[derive(Debug, Clone)]
pub struct HttpPlanner {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpPlanner {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::with_endpoint(config.plan_endpoint(), config.timeout)
    }

    /// Create a planner for a full endpoint URL (including `/api/plan`).
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let endpoint = endpoint.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::transport(&endpoint, e))?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PlannerBackend for HttpPlanner {
    fn name(&self) -> &str {
        "http"
    }

    async fn plan(&self, prompt: &str) -> Result<String, ClientError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&PlanRequest { prompt })
            .send()
            .await
            .map_err(|e| ClientError::transport(&self.endpoint, e))?;

        if !resp.status().is_success() {
            return Err(ClientError::Status {
                url: self.endpoint.clone(),
                status: resp.status().as_u16(),
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| ClientError::transport(&self.endpoint, e))?;
        let parsed: PlanResponse =
            serde_json::from_str(&body).map_err(|e| ClientError::decode(&self.endpoint, e))?;
        Ok(parsed.text)
    }
}
