//! Annotation platform API client
//!
//! One method per remote endpoint. Every request carries the agent's
//! `X-API-Key` header; every operation is a single round trip with no
//! internal retries. Server-side task locking is invisible here: the
//! client holds no lock state of its own.

use std::path::Path;

use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::config::AgentConfig;
use crate::error::{ClientError, Result};
use crate::types::{
    AgentStats, AvailableCount, SkipBody, SkipResult, SubmissionResult, SubmitBody, Task,
    TaskEnvelope, TaskRequestBody,
};

const USER_AGENT: &str = concat!("annotation-agent/", env!("CARGO_PKG_VERSION"));

/// Client for the annotation platform's task-distribution API
pub struct TranscriptionClient {
    http_client: reqwest::Client,
    base_url: String,
    agent_id: i64,
}

impl TranscriptionClient {
    /// Create a client from resolved configuration
    ///
    /// No request timeout is configured; the transport's defaults apply.
    pub fn new(config: &AgentConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.api_key).map_err(|_| {
            ClientError::Config("API key contains invalid header characters".to_string())
        })?;
        headers.insert("X-API-Key", key);

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.clone(),
            agent_id: config.agent_id,
        })
    }

    /// Check API health status
    ///
    /// The payload shape is owned by the platform, so it is returned
    /// free-form.
    pub async fn check_health(&self) -> Result<serde_json::Value> {
        let url = format!("{}/api/health", self.base_url);
        tracing::debug!(url = %url, "Checking platform health");

        let response = self.http_client.get(&url).send().await?;
        let response = check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// Request the next available task
    ///
    /// Returns `Ok(None)` when the platform reports no task; the platform
    /// locks a returned task to this agent until it is submitted or skipped.
    pub async fn request_task(&self) -> Result<Option<Task>> {
        let url = format!("{}/api/tasks/request", self.base_url);
        tracing::debug!(url = %url, agent_id = self.agent_id, "Requesting next task");

        let response = self
            .http_client
            .post(&url)
            .json(&TaskRequestBody {
                agent_id: self.agent_id,
            })
            .send()
            .await?;
        let response = check_status(response).await?;

        let envelope: TaskEnvelope = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;

        let Some(task_id) = envelope.task_id else {
            return Ok(None);
        };

        let audio_url = envelope
            .audio_url
            .ok_or_else(|| ClientError::Parse(format!("task {} missing audio_url", task_id)))?;
        let file_name = envelope
            .file_name
            .ok_or_else(|| ClientError::Parse(format!("task {} missing file_name", task_id)))?;

        Ok(Some(Task {
            task_id,
            audio_url,
            duration: envelope.duration,
            file_name,
        }))
    }

    /// Download audio from `audio_url` to `dest`, overwriting any existing
    /// file there
    ///
    /// Bytes are written chunk-by-chunk as they arrive, so memory use stays
    /// bounded regardless of file size. A partial file may remain at `dest`
    /// when the transfer fails.
    pub async fn download_audio(&self, audio_url: &str, dest: &Path) -> Result<()> {
        tracing::debug!(url = %audio_url, dest = %dest.display(), "Downloading audio");

        let response = self.http_client.get(audio_url).send().await?;
        let response = check_status(response).await?;

        let mut stream = response.bytes_stream();
        let mut file = File::create(dest).await?;
        let mut downloaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let bytes = chunk?;
            file.write_all(&bytes).await?;
            downloaded += bytes.len() as u64;
        }
        file.flush().await?;

        tracing::info!(bytes = downloaded, dest = %dest.display(), "Audio downloaded");
        Ok(())
    }

    /// Submit the final transcription for a task
    ///
    /// Fails with an API error when the task is unknown, already completed,
    /// or not locked to this agent; the platform decides.
    pub async fn submit_transcription(
        &self,
        task_id: i64,
        transcription: &str,
    ) -> Result<SubmissionResult> {
        let url = format!("{}/api/tasks/{}/submit", self.base_url, task_id);
        tracing::debug!(url = %url, task_id, "Submitting transcription");

        let response = self
            .http_client
            .post(&url)
            .json(&SubmitBody {
                agent_id: self.agent_id,
                transcription,
            })
            .send()
            .await?;
        let response = check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// Release a task without producing an annotation, recording `reason`
    pub async fn skip_task(&self, task_id: i64, reason: &str) -> Result<SkipResult> {
        let url = format!("{}/api/tasks/{}/skip", self.base_url, task_id);
        tracing::debug!(url = %url, task_id, reason = %reason, "Skipping task");

        let response = self
            .http_client
            .post(&url)
            .json(&SkipBody {
                agent_id: self.agent_id,
                reason,
            })
            .send()
            .await?;
        let response = check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// Get the current task-pool counts
    pub async fn available_count(&self) -> Result<AvailableCount> {
        let url = format!("{}/api/tasks/available/count", self.base_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[("agent_id", self.agent_id)])
            .send()
            .await?;
        let response = check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// Get lifetime statistics for the configured agent
    pub async fn agent_stats(&self) -> Result<AgentStats> {
        let url = format!("{}/api/agents/{}/stats", self.base_url, self.agent_id);

        let response = self.http_client.get(&url).send().await?;
        let response = check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }
}

/// Turn a non-2xx response into an API error carrying the original status
/// and body; a success response passes through unparsed.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Api {
        status: status.as_u16(),
        body,
    })
}
