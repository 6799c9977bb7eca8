//! Command dispatch pipeline integration tests.
//!
//! A stub reasoning service stands in for the external model; completions
//! travel through the real event channel, so these exercise the
//! compute-off-thread / mutate-on-owner handoff end to end.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tokio::sync::mpsc;

use gcs_core::models::{
    DroneId, DroneStatus, Job, JobStatus, LatLon, MissionContext, Poi, ToolCall,
};
use gcs_core::surface::{InfoPanel, MapSurface, MarkerId, PathId};
use gcs_engine::{DispatchState, Engine, EngineEvent, MissionState, OperatorAction, Sender};
use gcs_reasoning::{ReasoningError, ReasoningOutcome, ReasoningService};

struct NullMap(u64);

impl MapSurface for NullMap {
    fn set_marker(&mut self, _position: LatLon, _label: &str) -> MarkerId {
        self.0 += 1;
        self.0
    }

    fn move_marker(&mut self, _marker: MarkerId, _position: LatLon) {}

    fn set_path(&mut self, _points: &[LatLon], _width: u32, _color: &str) -> PathId {
        self.0 += 1;
        self.0
    }

    fn delete_path(&mut self, _path: PathId) {}
}

struct NullPanel;

impl InfoPanel for NullPanel {
    fn update_position(
        &mut self,
        _drone: DroneId,
        _position: LatLon,
        _relative_alt_mm: i32,
        _velocity_mps: f64,
        _heading_deg: f64,
    ) {
    }

    fn update_status(&mut self, _drone: DroneId, _status: DroneStatus) {}

    fn render_job_list(&mut self, _drone: DroneId, _active: Option<&Job>, _queued: &[Job]) {}

    fn render_poi_list(&mut self, _pois: &[Poi]) {}
}

/// Returns a canned interpretation and records the context it was given.
struct StubReasoning {
    result: Result<ReasoningOutcome, ReasoningError>,
    seen_context: Mutex<Option<MissionContext>>,
}

impl StubReasoning {
    fn returning(result: Result<ReasoningOutcome, ReasoningError>) -> Arc<Self> {
        Arc::new(Self {
            result,
            seen_context: Mutex::new(None),
        })
    }
}

#[async_trait]
impl ReasoningService for StubReasoning {
    async fn interpret(
        &self,
        _text: &str,
        context: &MissionContext,
    ) -> Result<ReasoningOutcome, ReasoningError> {
        *self.seen_context.lock().unwrap() = Some(context.clone());
        self.result.clone()
    }
}

fn make_engine(
    reasoning: Arc<dyn ReasoningService>,
) -> (Engine, mpsc::UnboundedReceiver<EngineEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let engine = Engine::new(
        MissionState::new(Utc::now()),
        Box::new(NullMap(0)),
        Box::new(NullPanel),
        reasoning,
        tx,
    );
    (engine, rx)
}

fn active_job(id: u32) -> Job {
    Job {
        id,
        waypoints: vec![LatLon::new(28.61, -81.21), LatLon::new(28.62, -81.22)],
        last_waypoint: 0,
        status: JobStatus::Active,
        priority: 1,
    }
}

fn console_lines(engine: &Engine) -> Vec<&str> {
    engine
        .transcript()
        .iter()
        .filter(|message| message.sender == Sender::Console)
        .map(|message| message.text.as_str())
        .collect()
}

#[tokio::test]
async fn recognized_call_applies_and_unrecognized_is_skipped() {
    let stub = StubReasoning::returning(Ok(ReasoningOutcome {
        tool_calls: vec![
            ToolCall {
                name: "call_return_to_launch".to_string(),
                arguments: json!({"drone_id": 1}),
            },
            ToolCall {
                name: "reboot_mothership".to_string(),
                arguments: json!({}),
            },
        ],
    }));
    let (mut engine, mut rx) = make_engine(stub);

    engine.handle_event(EngineEvent::DroneDiscovered { drone: 1, status_code: 4 });
    engine.handle_event(EngineEvent::JobsUpdated {
        drone: 1,
        active: Some(active_job(1)),
        queued: Vec::new(),
    });

    engine.handle_event(EngineEvent::ChatSubmitted {
        text: "bring drone 1 home".to_string(),
    });
    assert_eq!(engine.dispatch_state(), DispatchState::AwaitingResponse);

    let completion = rx.recv().await.expect("completion event");
    engine.handle_event(completion);

    assert_eq!(engine.dispatch_state(), DispatchState::Idle);
    assert!(engine.state().drone(1).unwrap().active_job.is_none());
    assert_eq!(console_lines(&engine), vec!["Sending drone 1 to launch."]);
}

#[tokio::test]
async fn batch_application_is_in_order_and_per_entry_tolerant() {
    let stub = StubReasoning::returning(Ok(ReasoningOutcome {
        tool_calls: vec![
            ToolCall {
                name: "call_return_to_launch".to_string(),
                arguments: json!({"drone_id": 99}),
            },
            ToolCall {
                name: "call_end_mission".to_string(),
                arguments: json!({}),
            },
        ],
    }));
    let (mut engine, mut rx) = make_engine(stub);
    engine.handle_event(EngineEvent::DroneDiscovered { drone: 1, status_code: 4 });

    engine.handle_event(EngineEvent::ChatSubmitted { text: "wrap it up".to_string() });
    let completion = rx.recv().await.expect("completion event");
    engine.handle_event(completion);

    // The unknown-drone failure is surfaced, and the later entry still ran.
    assert_eq!(
        console_lines(&engine),
        vec![
            "unknown drone 99",
            "Ending mission, returning all drones to launch.",
        ]
    );
    assert!(engine.state().ended());
}

#[tokio::test]
async fn failed_reasoning_call_surfaces_one_error_and_resets() {
    let stub = StubReasoning::returning(Err(ReasoningError::Transport(
        "connection refused".to_string(),
    )));
    let (mut engine, mut rx) = make_engine(stub);

    engine.handle_event(EngineEvent::ChatSubmitted { text: "do something".to_string() });
    let completion = rx.recv().await.expect("completion event");
    engine.handle_event(completion);

    assert_eq!(engine.dispatch_state(), DispatchState::Idle);
    let lines = console_lines(&engine);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("Could not interpret that command"));
}

#[tokio::test]
async fn submission_while_in_flight_is_refused() {
    let stub = StubReasoning::returning(Ok(ReasoningOutcome::default()));
    let (mut engine, mut rx) = make_engine(stub);

    engine.handle_event(EngineEvent::ChatSubmitted { text: "first".to_string() });
    engine.handle_event(EngineEvent::ChatSubmitted { text: "second".to_string() });

    assert_eq!(
        console_lines(&engine),
        vec!["Still working on the previous command."]
    );

    // Exactly one reasoning call went out.
    let completion = rx.recv().await.expect("completion event");
    engine.handle_event(completion);
    assert_eq!(engine.dispatch_state(), DispatchState::Idle);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn context_is_snapshotted_at_submission_time() {
    let stub = StubReasoning::returning(Ok(ReasoningOutcome::default()));
    let seen = Arc::clone(&stub);
    let (mut engine, mut rx) = make_engine(stub);

    engine.handle_event(EngineEvent::DroneDiscovered { drone: 1, status_code: 4 });
    engine.handle_event(EngineEvent::Operator(OperatorAction::CreatePoi {
        position: LatLon::new(28.60, -81.20),
        name: None,
        description: String::new(),
    }));

    engine.handle_event(EngineEvent::ChatSubmitted { text: "status?".to_string() });
    // Mutations after submission must not appear in the sent context.
    engine.handle_event(EngineEvent::Operator(OperatorAction::CreatePoi {
        position: LatLon::new(28.70, -81.30),
        name: None,
        description: String::new(),
    }));

    let completion = rx.recv().await.expect("completion event");
    engine.handle_event(completion);

    let context = seen.seen_context.lock().unwrap().clone().expect("context");
    assert_eq!(context.pois.len(), 1);
    assert_eq!(context.drones.len(), 1);
}

#[tokio::test]
async fn blank_input_is_ignored() {
    let stub = StubReasoning::returning(Ok(ReasoningOutcome::default()));
    let (mut engine, mut rx) = make_engine(stub);

    engine.handle_event(EngineEvent::ChatSubmitted { text: "   ".to_string() });

    assert_eq!(engine.dispatch_state(), DispatchState::Idle);
    assert!(engine.transcript().is_empty());
    assert!(rx.try_recv().is_err());
}
