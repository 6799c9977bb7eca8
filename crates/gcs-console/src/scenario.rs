//! Scripted telemetry feed.
//!
//! Lets the console run without a vehicle link: two drones lift off near
//! the field site, one flies a survey job, and a detection fires mid-run.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::time::interval;

use gcs_core::models::{Job, JobStatus, LatLon};
use gcs_core::telemetry::RawGlobalPosition;
use gcs_engine::EngineEvent;

/// Field site the scenario orbits around.
const HUB_LAT: f64 = 28.6026251;
const HUB_LON: f64 = -81.1999887;

const TICK: Duration = Duration::from_secs(1);
const STEPS: u32 = 30;
/// Per-tick drift in degrees (~10 m).
const STEP_DEG: f64 = 0.0001;

fn raw_at(lat: f64, lon: f64, heading_cdeg: u16) -> RawGlobalPosition {
    RawGlobalPosition {
        lat: (lat * 1e7).round() as i32,
        lon: (lon * 1e7).round() as i32,
        alt: 75_000,
        relative_alt: 50_000,
        vx: 700,
        vy: 700,
        vz: 0,
        hdg: heading_cdeg,
    }
}

pub async fn run(events: UnboundedSender<EngineEvent>) {
    for drone in 1..=2 {
        let _ = events.send(EngineEvent::DroneDiscovered {
            drone,
            status_code: 3,
        });
    }

    let _ = events.send(EngineEvent::PolygonUpdated {
        points: vec![
            LatLon::new(HUB_LAT - 0.003, HUB_LON - 0.003),
            LatLon::new(HUB_LAT - 0.003, HUB_LON + 0.003),
            LatLon::new(HUB_LAT + 0.003, HUB_LON + 0.003),
            LatLon::new(HUB_LAT + 0.003, HUB_LON - 0.003),
        ],
    });

    // Drone 1 starts the mission with a three-leg survey.
    let survey = Job {
        id: 1,
        waypoints: vec![
            LatLon::new(HUB_LAT + 0.001, HUB_LON + 0.001),
            LatLon::new(HUB_LAT + 0.002, HUB_LON + 0.001),
            LatLon::new(HUB_LAT + 0.002, HUB_LON + 0.002),
        ],
        last_waypoint: 0,
        status: JobStatus::Active,
        priority: 1,
    };
    let _ = events.send(EngineEvent::JobsUpdated {
        drone: 1,
        active: Some(survey.clone()),
        queued: Vec::new(),
    });
    let _ = events.send(EngineEvent::TogglePath { drone: 1 });

    let mut ticker = interval(TICK);
    for step in 0..STEPS {
        ticker.tick().await;
        let drift = STEP_DEG * step as f64;

        let _ = events.send(EngineEvent::Position {
            drone: 1,
            raw: raw_at(HUB_LAT + drift, HUB_LON + drift, 4_500),
        });
        let _ = events.send(EngineEvent::Position {
            drone: 2,
            raw: raw_at(HUB_LAT - drift, HUB_LON + drift, 13_500),
        });

        match step {
            2 => {
                for drone in 1..=2 {
                    let _ = events.send(EngineEvent::Status {
                        drone,
                        code: 4,
                    });
                }
            }
            10 => {
                let mut progressed = survey.clone();
                progressed.last_waypoint = 1;
                let _ = events.send(EngineEvent::JobsUpdated {
                    drone: 1,
                    active: Some(progressed),
                    queued: Vec::new(),
                });
            }
            15 => {
                let _ = events.send(EngineEvent::ImageDetection {
                    drone: 2,
                    image_path: "capture/frame_0015.jpg".to_string(),
                });
            }
            _ => {}
        }
    }
}
