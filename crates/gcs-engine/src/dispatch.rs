//! Asynchronous command dispatch pipeline.
//!
//! Free text goes out to the reasoning service on a spawned task together
//! with a mission-context snapshot taken at call time. The interpreted tool
//! calls come back through the event channel and are applied in order by
//! the engine task: compute off-thread, mutate on the owning thread.

use chrono::{DateTime, Utc};
use serde::Serialize;

use gcs_core::models::ToolCall;
use gcs_reasoning::{ReasoningError, ReasoningOutcome};

use crate::engine::Engine;
use crate::events::EngineEvent;
use crate::router::{CommandError, MissionCommand};

/// Pipeline state. One in-flight command per pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DispatchState {
    #[default]
    Idle,
    AwaitingResponse,
    ApplyingResult,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Operator,
    Console,
}

/// One transcript entry.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl Engine {
    /// Accept one free-text command. Snapshots the mission context now and
    /// hands the call to a background task; the suspension point is the
    /// reasoning call only, never the interactive surface.
    pub(crate) fn submit_chat(&mut self, text: String) {
        if text.trim().is_empty() {
            return;
        }
        self.push_transcript(Sender::Operator, text.clone());

        if self.dispatch != DispatchState::Idle {
            tracing::warn!(state = ?self.dispatch, "dispatch refused, previous command in flight");
            self.push_transcript(
                Sender::Console,
                "Still working on the previous command.".to_string(),
            );
            return;
        }

        let context = self.context_snapshot();
        let service = self.reasoning();
        let events_tx = self.events_tx();
        self.dispatch = DispatchState::AwaitingResponse;
        tracing::debug!("dispatching chat command to reasoning service");

        tokio::spawn(async move {
            let result = service.interpret(&text, &context).await;
            // A closed channel means the engine already shut down; the
            // result is simply dropped.
            let _ = events_tx.send(EngineEvent::DispatchCompleted(result));
        });
    }

    /// Re-entry point for a finished reasoning call.
    pub(crate) fn finish_dispatch(&mut self, result: Result<ReasoningOutcome, ReasoningError>) {
        match result {
            Ok(outcome) => {
                self.dispatch = DispatchState::ApplyingResult;
                tracing::debug!(count = outcome.tool_calls.len(), "applying dispatch result");
                self.apply_tool_calls(outcome.tool_calls);
            }
            Err(err) => {
                self.dispatch = DispatchState::Failed;
                tracing::warn!(%err, "reasoning call failed");
                self.push_transcript(
                    Sender::Console,
                    format!("Could not interpret that command: {err}"),
                );
            }
        }
        self.dispatch = DispatchState::Idle;
    }

    /// Apply tool calls in order. Application is at-least-effort, not
    /// atomic: a late entry's failure never rolls back earlier ones.
    fn apply_tool_calls(&mut self, calls: Vec<ToolCall>) {
        for call in calls {
            let command = match MissionCommand::from_tool_call(&call) {
                Ok(command) => command,
                Err(err @ CommandError::UnrecognizedAction(_)) => {
                    tracing::warn!(%err, "skipping tool call");
                    continue;
                }
                Err(err) => {
                    tracing::warn!(%err, name = %call.name, "tool call rejected");
                    self.push_transcript(Sender::Console, err.to_string());
                    continue;
                }
            };
            let acknowledgment = command.acknowledgment();
            match self.apply_command(command) {
                Ok(()) => self.push_transcript(Sender::Console, acknowledgment),
                Err(err) => self.push_transcript(Sender::Console, err.to_string()),
            }
        }
    }

    pub(crate) fn push_transcript(&mut self, sender: Sender, text: String) {
        self.transcript.push(ChatMessage {
            sender,
            text,
            at: Utc::now(),
        });
    }
}
