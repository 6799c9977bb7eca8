//! Reasoning-service contract.
//!
//! The engine hands a free-text operator command plus a mission-context
//! snapshot to an external service and gets back structured tool calls.
//! Implementations compute a value only; they never touch mission state.

use async_trait::async_trait;
use gcs_core::models::{MissionContext, ToolCall};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Interpretation of one free-text operator command.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReasoningOutcome {
    pub tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Clone, Error)]
pub enum ReasoningError {
    /// The service could not be reached or answered with a failure status.
    #[error("reasoning service unreachable: {0}")]
    Transport(String),
    /// The service answered, but not with anything that can be applied.
    #[error("reasoning service returned malformed content: {0}")]
    Malformed(String),
}

/// External service that turns free text into mission tool calls. Must be
/// callable from a spawned task, so implementations hold no interior
/// references to engine state.
#[async_trait]
pub trait ReasoningService: Send + Sync {
    async fn interpret(
        &self,
        text: &str,
        context: &MissionContext,
    ) -> Result<ReasoningOutcome, ReasoningError>;
}
