//! Logging render surfaces.
//!
//! Stand-ins for a real map widget and info panel: every draw call becomes
//! a log line, so the engine runs headless and its rendering decisions stay
//! observable.

use gcs_core::models::{DroneId, DroneStatus, Job, LatLon, Poi};
use gcs_core::surface::{InfoPanel, MapSurface, MarkerId, PathId};

#[derive(Default)]
pub struct LogMap {
    next_handle: u64,
}

impl MapSurface for LogMap {
    fn set_marker(&mut self, position: LatLon, label: &str) -> MarkerId {
        self.next_handle += 1;
        tracing::info!(
            target: "render",
            label,
            lat = position.lat,
            lon = position.lon,
            handle = self.next_handle,
            "marker placed"
        );
        self.next_handle
    }

    fn move_marker(&mut self, marker: MarkerId, position: LatLon) {
        tracing::debug!(
            target: "render",
            handle = marker,
            lat = position.lat,
            lon = position.lon,
            "marker moved"
        );
    }

    fn set_path(&mut self, points: &[LatLon], width: u32, color: &str) -> PathId {
        self.next_handle += 1;
        tracing::info!(
            target: "render",
            points = points.len(),
            width,
            color,
            handle = self.next_handle,
            "path drawn"
        );
        self.next_handle
    }

    fn delete_path(&mut self, path: PathId) {
        tracing::debug!(target: "render", handle = path, "path deleted");
    }
}

pub struct LogPanel;

impl InfoPanel for LogPanel {
    fn update_position(
        &mut self,
        drone: DroneId,
        position: LatLon,
        relative_alt_mm: i32,
        velocity_mps: f64,
        heading_deg: f64,
    ) {
        tracing::info!(
            target: "panel",
            drone,
            lat = position.lat,
            lon = position.lon,
            altitude_m = relative_alt_mm as f64 / 1000.0,
            velocity = velocity_mps,
            heading = heading_deg,
            "position"
        );
    }

    fn update_status(&mut self, drone: DroneId, status: DroneStatus) {
        tracing::info!(target: "panel", drone, %status, "status");
    }

    fn render_job_list(&mut self, drone: DroneId, active: Option<&Job>, queued: &[Job]) {
        tracing::info!(
            target: "panel",
            drone,
            active = ?active.map(|job| job.id),
            queued = queued.len(),
            "job list"
        );
    }

    fn render_poi_list(&mut self, pois: &[Poi]) {
        tracing::info!(target: "panel", count = pois.len(), "poi list");
    }
}
