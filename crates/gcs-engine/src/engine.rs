//! The single-writer engine task.
//!
//! One task owns the mission state, the render surfaces, the chat
//! transcript, and the dispatch pipeline. Everything that mutates state
//! arrives as an `EngineEvent`; background work computes values off-thread
//! and re-enters through the same channel. No locks, one logical writer.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};

use gcs_core::models::{DroneId, DroneStatus, Job, JobStatus, LatLon, PoiId};
use gcs_core::surface::{InfoPanel, MapSurface};
use gcs_reasoning::ReasoningService;

use crate::dispatch::{ChatMessage, DispatchState};
use crate::events::{EngineEvent, OperatorAction};
use crate::mission::MissionState;
use crate::router::{CommandError, EntityKind, MissionCommand};

/// Existing POIs within this distance of a detection are treated as a
/// repeat sighting rather than a new POI.
const DETECTION_MERGE_RADIUS_M: f64 = 25.0;

pub struct Engine {
    state: MissionState,
    map: Box<dyn MapSurface + Send>,
    panel: Box<dyn InfoPanel + Send>,
    reasoning: Arc<dyn ReasoningService>,
    events_tx: mpsc::UnboundedSender<EngineEvent>,
    pub(crate) transcript: Vec<ChatMessage>,
    pub(crate) dispatch: DispatchState,
}

impl Engine {
    pub fn new(
        state: MissionState,
        map: Box<dyn MapSurface + Send>,
        panel: Box<dyn InfoPanel + Send>,
        reasoning: Arc<dyn ReasoningService>,
        events_tx: mpsc::UnboundedSender<EngineEvent>,
    ) -> Self {
        Self {
            state,
            map,
            panel,
            reasoning,
            events_tx,
            transcript: Vec::new(),
            dispatch: DispatchState::Idle,
        }
    }

    pub fn state(&self) -> &MissionState {
        &self.state
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn dispatch_state(&self) -> DispatchState {
        self.dispatch
    }

    pub(crate) fn reasoning(&self) -> Arc<dyn ReasoningService> {
        Arc::clone(&self.reasoning)
    }

    pub(crate) fn events_tx(&self) -> mpsc::UnboundedSender<EngineEvent> {
        self.events_tx.clone()
    }

    pub(crate) fn context_snapshot(&self) -> gcs_core::models::MissionContext {
        self.state.context_snapshot()
    }

    pub fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::DroneDiscovered { drone, status_code } => {
                let status = DroneStatus::from_code(status_code);
                self.state.add_drone(drone, status);
                tracing::info!(drone, %status, "drone discovered");
            }
            EngineEvent::Position { drone, raw } => {
                match self.state.drone_mut(drone) {
                    Some(d) => d.set_position(&raw, self.map.as_mut(), self.panel.as_mut()),
                    None => tracing::warn!(drone, "position report for unknown drone"),
                }
            }
            EngineEvent::Attitude {
                drone,
                roll,
                pitch,
                yaw,
            } => {
                if let Some(d) = self.state.drone_mut(drone) {
                    d.set_telemetry(roll, pitch, yaw);
                }
            }
            EngineEvent::Status { drone, code } => {
                match self.state.drone_mut(drone) {
                    Some(d) => d.set_status(code, self.panel.as_mut()),
                    None => tracing::warn!(drone, code, "status for unknown drone"),
                }
            }
            EngineEvent::JobsUpdated {
                drone,
                active,
                queued,
            } => {
                tracing::debug!(
                    drone,
                    active = ?active.as_ref().map(|job| job.id),
                    queued = queued.len(),
                    "job update"
                );
                match self.state.drone_mut(drone) {
                    Some(d) => d.update_jobs(active, queued, self.map.as_mut(), self.panel.as_mut()),
                    None => tracing::warn!(drone, "job update for unknown drone"),
                }
            }
            EngineEvent::TogglePath { drone } => {
                if let Some(d) = self.state.drone_mut(drone) {
                    d.toggle_job_path(self.map.as_mut());
                }
            }
            EngineEvent::Operator(action) => self.apply_operator(action),
            EngineEvent::ChatSubmitted { text } => self.submit_chat(text),
            EngineEvent::DispatchCompleted(result) => self.finish_dispatch(result),
            EngineEvent::ImageDetection { drone, image_path } => {
                self.ingest_detection(drone, image_path)
            }
            EngineEvent::PolygonUpdated { points } => self.state.set_polygon(points),
        }
    }

    fn apply_operator(&mut self, action: OperatorAction) {
        let result = match action {
            OperatorAction::AssignInvestigation {
                poi,
                drone,
                priority,
            } => self.assign_investigation_job(poi, drone, priority),
            OperatorAction::Recall { drone } => self.recall_drone(drone),
            OperatorAction::EndMission => {
                self.end_mission();
                Ok(())
            }
            OperatorAction::CreatePoi {
                position,
                name,
                description,
            } => {
                self.create_poi(position, name, description);
                Ok(())
            }
        };
        if let Err(err) = result {
            tracing::warn!(%err, "operator command rejected");
        }
    }

    /// Route a parsed mission command to its operation.
    pub(crate) fn apply_command(&mut self, command: MissionCommand) -> Result<(), CommandError> {
        match command {
            MissionCommand::AssignInvestigation {
                poi,
                drone,
                priority,
            } => self.assign_investigation_job(poi, drone, priority),
            MissionCommand::Recall { drone } => self.recall_drone(drone),
            MissionCommand::EndMission => {
                self.end_mission();
                Ok(())
            }
        }
    }

    /// Create a single-waypoint investigation job at a POI and hand it to a
    /// drone: active if the drone is idle, queued otherwise.
    pub fn assign_investigation_job(
        &mut self,
        poi: PoiId,
        drone: DroneId,
        priority: u8,
    ) -> Result<(), CommandError> {
        let target = self
            .state
            .poi(poi)
            .ok_or(CommandError::UnknownEntity {
                kind: EntityKind::Poi,
                id: poi,
            })?
            .position;
        let job_id = self.state.next_job_id();
        let Some(d) = self.state.drone_mut(drone) else {
            return Err(CommandError::UnknownEntity {
                kind: EntityKind::Drone,
                id: drone,
            });
        };

        let mut queued = std::mem::take(&mut d.queued_jobs);
        let active = match d.active_job.take() {
            Some(current) => {
                queued.push(Job {
                    id: job_id,
                    waypoints: vec![target],
                    last_waypoint: 0,
                    status: JobStatus::Queued,
                    priority,
                });
                Some(current)
            }
            None => Some(Job {
                id: job_id,
                waypoints: vec![target],
                last_waypoint: 0,
                status: JobStatus::Active,
                priority,
            }),
        };
        d.update_jobs(active, queued, self.map.as_mut(), self.panel.as_mut());
        tracing::info!(drone, poi, job = job_id, "investigation job assigned");
        Ok(())
    }

    /// Recall supersedes assigned work: the active job and the queue are
    /// both cleared, and the path state follows.
    pub fn recall_drone(&mut self, drone: DroneId) -> Result<(), CommandError> {
        let Some(d) = self.state.drone_mut(drone) else {
            return Err(CommandError::UnknownEntity {
                kind: EntityKind::Drone,
                id: drone,
            });
        };
        d.update_jobs(None, Vec::new(), self.map.as_mut(), self.panel.as_mut());
        tracing::info!(drone, "drone recalled to launch");
        Ok(())
    }

    /// Recall every drone and mark the mission ended.
    pub fn end_mission(&mut self) {
        for drone in self.state.drone_ids() {
            let _ = self.recall_drone(drone);
        }
        self.state.end();
        tracing::info!("mission ended, all drones recalled");
    }

    /// Allocate a POI, drop its marker, and refresh the POI list view.
    pub fn create_poi(
        &mut self,
        position: LatLon,
        name: Option<String>,
        description: String,
    ) -> PoiId {
        let id = self.state.add_poi(position, name, description);
        if let Some(poi) = self.state.poi_mut(id) {
            poi.marker = Some(self.map.set_marker(position, &poi.name));
        }
        let pois = self.state.pois();
        self.panel.render_poi_list(&pois);
        tracing::info!(poi = id, lat = position.lat, lon = position.lon, "poi created");
        id
    }

    /// An onboard detection at the drone's position either flags a nearby
    /// POI again or creates a new one.
    fn ingest_detection(&mut self, drone: DroneId, image_path: String) {
        let Some(position) = self.state.drone(drone).and_then(|d| d.position) else {
            tracing::warn!(drone, "detection from unknown drone or before first fix");
            return;
        };
        match self.state.nearest_poi(position) {
            Some((poi, distance)) if distance <= DETECTION_MERGE_RADIUS_M => {
                if let Some(poi) = self.state.poi_mut(poi) {
                    poi.positive_flags += 1;
                }
                let pois = self.state.pois();
                self.panel.render_poi_list(&pois);
                tracing::info!(drone, poi, "repeat sighting flagged");
            }
            _ => {
                let id = self.create_poi(
                    position,
                    None,
                    format!("Detected by drone {drone} ({image_path})"),
                );
                tracing::info!(drone, poi = id, "detection created poi");
            }
        }
    }
}

/// Drain events until shutdown. All mutation happens here, on the task
/// that owns the engine.
pub async fn run_engine(
    mut engine: Engine,
    mut events: mpsc::UnboundedReceiver<EngineEvent>,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                tracing::info!("engine loop shutting down");
                break;
            }
            event = events.recv() => match event {
                Some(event) => engine.handle_event(event),
                None => break,
            },
        }
    }
}
