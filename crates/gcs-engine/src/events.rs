//! Events drained by the single-writer engine task.
//!
//! Telemetry, operator actions, and dispatch completions all funnel through
//! this one channel, so there is exactly one logical writer for mission and
//! drone state at any instant.

use gcs_core::models::{DroneId, Job, LatLon, PoiId};
use gcs_core::telemetry::RawGlobalPosition;
use gcs_reasoning::{ReasoningError, ReasoningOutcome};

#[derive(Debug)]
pub enum EngineEvent {
    /// A vehicle announced itself on the link.
    DroneDiscovered { drone: DroneId, status_code: u8 },
    /// Raw global-position report.
    Position {
        drone: DroneId,
        raw: RawGlobalPosition,
    },
    /// Attitude-only report; stored for diagnostics, never rendered.
    Attitude {
        drone: DroneId,
        roll: f32,
        pitch: f32,
        yaw: f32,
    },
    /// System-status heartbeat.
    Status { drone: DroneId, code: u8 },
    /// Authoritative job assignment state from the vehicle link.
    JobsUpdated {
        drone: DroneId,
        active: Option<Job>,
        queued: Vec<Job>,
    },
    /// Operator toggled the active-job path for a drone.
    TogglePath { drone: DroneId },
    /// Direct operator command (debug menu or map action).
    Operator(OperatorAction),
    /// Free-text chat input.
    ChatSubmitted { text: String },
    /// Completion of a reasoning call started by `ChatSubmitted`.
    DispatchCompleted(Result<ReasoningOutcome, ReasoningError>),
    /// Onboard detection flagged something at the drone's position.
    ImageDetection { drone: DroneId, image_path: String },
    /// Mission boundary finished by the operator.
    PolygonUpdated { points: Vec<LatLon> },
}

#[derive(Debug, Clone)]
pub enum OperatorAction {
    AssignInvestigation {
        poi: PoiId,
        drone: DroneId,
        priority: u8,
    },
    Recall {
        drone: DroneId,
    },
    EndMission,
    CreatePoi {
        position: LatLon,
        name: Option<String>,
        description: String,
    },
}
