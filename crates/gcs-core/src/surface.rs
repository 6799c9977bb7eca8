//! Render and presentation collaborator contracts.
//!
//! The core never talks to a concrete widget toolkit. A map view and an
//! info panel are supplied behind these traits, and everything drawn is
//! addressed by an opaque handle. Holding a handle never extends the
//! lifetime of anything on the presentation side.

use crate::models::{DroneId, DroneStatus, Job, LatLon, Poi};

pub type MarkerId = u64;
pub type PathId = u64;

/// Minimal drawing surface offered by the map view.
pub trait MapSurface {
    fn set_marker(&mut self, position: LatLon, label: &str) -> MarkerId;
    fn move_marker(&mut self, marker: MarkerId, position: LatLon);
    /// Draw a polyline. Callers own the returned handle and delete stale
    /// paths before redrawing; paths are never mutated in place.
    fn set_path(&mut self, points: &[LatLon], width: u32, color: &str) -> PathId;
    fn delete_path(&mut self, path: PathId);
}

/// Presentation-only status panel. No business logic lives behind this.
pub trait InfoPanel {
    fn update_position(
        &mut self,
        drone: DroneId,
        position: LatLon,
        relative_alt_mm: i32,
        velocity_mps: f64,
        heading_deg: f64,
    );
    fn update_status(&mut self, drone: DroneId, status: DroneStatus);
    fn render_job_list(&mut self, drone: DroneId, active: Option<&Job>, queued: &[Job]);
    fn render_poi_list(&mut self, pois: &[Poi]);
}
