//! Ollama-compatible chat client with tool calling.
//!
//! Speaks to `POST {base}/api/chat` (non-streaming). The mission context is
//! serialized into the system prompt and the three mission tools are
//! offered on every request; whatever the model picks comes back as
//! `tool_calls` on the response message.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use gcs_core::models::{MissionContext, ToolCall};

use crate::service::{ReasoningError, ReasoningOutcome, ReasoningService};

/// HTTP client for an Ollama-compatible chat endpoint.
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatTurn<'a>>,
    tools: Value,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatTurn<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    tool_calls: Vec<ResponseToolCall>,
}

#[derive(Debug, Deserialize)]
struct ResponseToolCall {
    function: ResponseFunction,
}

#[derive(Debug, Deserialize)]
struct ResponseFunction {
    name: String,
    #[serde(default)]
    arguments: Value,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    /// Mission tools offered to the model, in Ollama's function-tool shape.
    fn tool_definitions() -> Value {
        json!([
            {
                "type": "function",
                "function": {
                    "name": "create_poi_investigate_job",
                    "description": "Send a drone to investigate a point of interest.",
                    "parameters": {
                        "type": "object",
                        "required": ["poi_id", "drone_id"],
                        "properties": {
                            "poi_id": { "type": "integer", "description": "Id of the POI to investigate" },
                            "drone_id": { "type": "integer", "description": "Id of the drone to send" },
                            "priority": { "type": "integer", "description": "Job priority, defaults to 5" }
                        }
                    }
                }
            },
            {
                "type": "function",
                "function": {
                    "name": "call_return_to_launch",
                    "description": "Recall a drone to its launch point.",
                    "parameters": {
                        "type": "object",
                        "required": ["drone_id"],
                        "properties": {
                            "drone_id": { "type": "integer", "description": "Id of the drone to recall" }
                        }
                    }
                }
            },
            {
                "type": "function",
                "function": {
                    "name": "call_end_mission",
                    "description": "End the mission and return every drone to launch.",
                    "parameters": { "type": "object", "properties": {} }
                }
            }
        ])
    }

    fn system_prompt(context: &MissionContext) -> String {
        let snapshot = serde_json::to_string(context).unwrap_or_else(|_| "{}".to_string());
        format!(
            "You are the mission assistant of a drone operator console. \
             Translate the operator's request into tool calls; do not invent \
             drones or POIs that are not in the mission context. \
             Mission context: {snapshot}"
        )
    }
}

#[async_trait]
impl ReasoningService for OllamaClient {
    async fn interpret(
        &self,
        text: &str,
        context: &MissionContext,
    ) -> Result<ReasoningOutcome, ReasoningError> {
        let url = format!("{}/api/chat", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatTurn {
                    role: "system",
                    content: Self::system_prompt(context),
                },
                ChatTurn {
                    role: "user",
                    content: text.to_string(),
                },
            ],
            tools: Self::tool_definitions(),
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|err| ReasoningError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReasoningError::Transport(format!(
                "chat endpoint answered {status}"
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|err| ReasoningError::Malformed(err.to_string()))?;

        let tool_calls: Vec<ToolCall> = body
            .message
            .tool_calls
            .into_iter()
            .map(|call| ToolCall {
                name: call.function.name,
                arguments: call.function.arguments,
            })
            .collect();
        tracing::debug!(count = tool_calls.len(), "reasoning service returned tool calls");

        Ok(ReasoningOutcome { tool_calls })
    }
}
