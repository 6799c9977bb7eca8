pub mod client;
pub mod service;

pub use client::OllamaClient;
pub use service::{ReasoningError, ReasoningOutcome, ReasoningService};
