//! Sequential task-processing run
//!
//! health check → available count → request task → download audio →
//! transcribe → submit or skip → cleanup → stats. Each call blocks on its
//! response before the next statement runs; there is exactly one in-flight
//! request at any time.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::client::TranscriptionClient;
use crate::config::AgentConfig;

/// Reason reported when the quality gate rejects a transcription
const SKIP_REASON_POOR_QUALITY: &str = "Poor audio quality";

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The platform had no task to hand out
    NoTask,
    /// Transcription accepted by the platform
    Submitted { task_id: i64, annotation_id: i64 },
    /// Task released back to the pool
    Skipped { task_id: i64, message: String },
}

/// Process at most one task using the built-in transcriber
pub async fn run(config: &AgentConfig) -> Result<RunOutcome> {
    run_with_transcriber(config, transcribe_placeholder).await
}

/// Process at most one task, producing text with `transcribe`
///
/// A health-check failure aborts the run. A count-fetch failure is logged
/// and the run continues. Every later failure terminates the run with the
/// error's full detail; statistics are not fetched after a failed submit,
/// and nothing is rolled back.
pub async fn run_with_transcriber<F>(config: &AgentConfig, transcribe: F) -> Result<RunOutcome>
where
    F: Fn(&Path) -> Result<String>,
{
    let client = TranscriptionClient::new(config)?;

    let health = client
        .check_health()
        .await
        .context("API health check failed")?;
    info!("✓ API health check: {}", health);

    match client.available_count().await {
        Ok(counts) => info!("Available tasks: {}", counts.available),
        Err(e) => warn!("Could not get task count: {}", e),
    }

    let Some(task) = client.request_task().await.context("Task request failed")? else {
        info!("No tasks available. Exiting.");
        return Ok(RunOutcome::NoTask);
    };

    info!("✓ Received task {}", task.task_id);
    match task.duration {
        Some(seconds) => info!("  Duration: {}s", seconds),
        None => info!("  Duration: unknown"),
    }
    info!("  File: {}", task.file_name);

    let audio_path = audio_destination(task.task_id);
    info!("⬇ Downloading audio to {}", audio_path.display());
    client
        .download_audio(&task.audio_url, &audio_path)
        .await
        .context("Audio download failed")?;

    info!("Transcribing audio...");
    let transcription = transcribe(&audio_path).context("Transcription failed")?;
    info!("✓ Transcription: {}", preview(&transcription));

    let outcome = if transcription.trim().is_empty() {
        info!("⏭ Skipping task: {}", SKIP_REASON_POOR_QUALITY);
        let result = client
            .skip_task(task.task_id, SKIP_REASON_POOR_QUALITY)
            .await
            .context("Skip failed")?;
        info!("✓ {}", result.message);
        RunOutcome::Skipped {
            task_id: task.task_id,
            message: result.message,
        }
    } else {
        info!("⬆ Submitting transcription...");
        let result = client
            .submit_transcription(task.task_id, &transcription)
            .await
            .context("Submission failed")?;
        info!("✓ Submitted successfully (annotation_id: {})", result.annotation_id);
        RunOutcome::Submitted {
            task_id: task.task_id,
            annotation_id: result.annotation_id,
        }
    };

    // Best effort; a leftover scratch file is not worth failing the run.
    if let Err(e) = tokio::fs::remove_file(&audio_path).await {
        warn!("Could not remove {}: {}", audio_path.display(), e);
    }

    let stats = client
        .agent_stats()
        .await
        .context("Could not fetch agent statistics")?;
    info!("Agent statistics:");
    info!("  Completed: {}", stats.total_tasks_completed);
    info!("  Skipped: {}", stats.total_tasks_skipped);
    info!("  Total duration: {:.1}s", stats.total_duration_seconds);
    info!("  Total earnings: ${:.2}", stats.total_earnings);

    Ok(outcome)
}

/// Stand-in for a real ASR engine
///
/// The audio file at `audio_path` is complete and closed by the time this
/// runs. Swap in an actual speech-to-text integration here.
fn transcribe_placeholder(_audio_path: &Path) -> Result<String> {
    Ok("This is a placeholder transcription. Replace with actual ASR.".to_string())
}

/// Local scratch path for a task's audio
fn audio_destination(task_id: i64) -> PathBuf {
    std::env::temp_dir().join(format!("task_{}.wav", task_id))
}

/// First 50 characters, for log lines
fn preview(text: &str) -> String {
    text.chars().take(50).collect()
}
