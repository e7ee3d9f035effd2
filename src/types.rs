//! Wire types for the annotation platform API
//!
//! All of these are transient request/response records; nothing is persisted
//! or held by the client beyond the duration of one call.

use serde::{Deserialize, Serialize};

/// A unit of audio requiring transcription
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Task {
    /// Unique task identifier
    pub task_id: i64,
    /// Where to fetch the audio bytes
    pub audio_url: String,
    /// Audio length in seconds, when the platform knows it
    pub duration: Option<f64>,
    /// Original file name of the audio
    pub file_name: String,
}

/// Raw shape of a task-request response
///
/// A null or absent `task_id` means no task is available, which is not an
/// error. The remaining fields are only meaningful when `task_id` is set.
#[derive(Debug, Deserialize)]
pub(crate) struct TaskEnvelope {
    pub task_id: Option<i64>,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub file_name: Option<String>,
}

/// Receipt for an accepted transcription
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubmissionResult {
    pub status: String,
    /// Identifier assigned to the accepted annotation
    pub annotation_id: i64,
}

/// Receipt for a task released back to the pool
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SkipResult {
    pub status: String,
    pub message: String,
}

/// Lifetime aggregates for one agent, recomputed server-side
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AgentStats {
    pub total_tasks_completed: i64,
    pub total_tasks_skipped: i64,
    pub total_duration_seconds: f64,
    pub total_earnings: f64,
}

/// Snapshot of the task pool, never cached client-side
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AvailableCount {
    /// Tasks this agent could request right now
    pub available: i64,
    pub total_unlabeled: i64,
    pub total_locked: i64,
}

/// Body for `POST /api/tasks/request`
#[derive(Debug, Serialize)]
pub(crate) struct TaskRequestBody {
    pub agent_id: i64,
}

/// Body for `POST /api/tasks/{task_id}/submit`
#[derive(Debug, Serialize)]
pub(crate) struct SubmitBody<'a> {
    pub agent_id: i64,
    pub transcription: &'a str,
}

/// Body for `POST /api/tasks/{task_id}/skip`
#[derive(Debug, Serialize)]
pub(crate) struct SkipBody<'a> {
    pub agent_id: i64,
    pub reason: &'a str,
}
