//! # Annotation Agent Library
//!
//! Client for the audio annotation platform's task-distribution API:
//! - Wire types for tasks, submissions, skips, and statistics
//! - `TranscriptionClient` with one method per remote endpoint
//! - Configuration resolution (CLI → environment → defaults)
//! - The sequential task-processing workflow

pub mod client;
pub mod config;
pub mod error;
pub mod types;
pub mod workflow;

pub use crate::client::TranscriptionClient;
pub use crate::config::AgentConfig;
pub use crate::error::{ClientError, Result};
