//! Per-drone state and job-path synchronization.
//!
//! A `Drone` owns its last-known kinematics, health status, job assignment,
//! and the handles of everything it has drawn. Rendering is always
//! delete-old-then-draw-new; a rendered path is never mutated in place.

use crate::models::{drone_color, DroneId, DroneStatus, Job, JobId, LatLon};
use crate::surface::{InfoPanel, MapSurface, MarkerId, PathId};
use crate::telemetry::{decode_heading, ground_speed_mps, RawGlobalPosition};

/// Length in degrees of the heading indicator segment (~50 m).
const HEADING_SEGMENT_DEG: f64 = 0.0005;
const HEADING_PATH_WIDTH: u32 = 2;
const JOB_PATH_WIDTH: u32 = 5;

/// Stored attitude; diagnostics only, never rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attitude {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
}

pub struct Drone {
    pub id: DroneId,
    /// None until the first position report arrives.
    pub position: Option<LatLon>,
    pub altitude_mm: i32,
    pub relative_altitude_mm: i32,
    pub heading_deg: f64,
    pub velocity_mps: f64,
    pub status: DroneStatus,
    pub attitude: Option<Attitude>,
    pub active_job: Option<Job>,
    pub queued_jobs: Vec<Job>,
    path_visible: bool,
    /// Start point of the currently rendered path: where the drone was when
    /// the path was first shown for this job, not where it is now.
    path_anchor: Option<LatLon>,
    /// Job the anchor belongs to; a mismatch means the anchor is stale.
    rendered_job_id: Option<JobId>,
    marker: Option<MarkerId>,
    heading_path: Option<PathId>,
    job_path: Option<PathId>,
}

impl Drone {
    pub fn new(id: DroneId, status: DroneStatus) -> Self {
        Self {
            id,
            position: None,
            altitude_mm: 0,
            relative_altitude_mm: 0,
            heading_deg: 0.0,
            velocity_mps: 0.0,
            status,
            attitude: None,
            active_job: None,
            queued_jobs: Vec::new(),
            path_visible: false,
            path_anchor: None,
            rendered_job_id: None,
            marker: None,
            heading_path: None,
            job_path: None,
        }
    }

    pub fn path_visible(&self) -> bool {
        self.path_visible
    }

    pub fn path_anchor(&self) -> Option<LatLon> {
        self.path_anchor
    }

    pub fn rendered_job_id(&self) -> Option<JobId> {
        self.rendered_job_id
    }

    /// Whether a job path is currently drawn on the map.
    pub fn has_rendered_path(&self) -> bool {
        self.job_path.is_some()
    }

    /// Apply a raw position report: decode, update kinematics, move the
    /// marker, and redraw the heading indicator.
    pub fn set_position(
        &mut self,
        raw: &RawGlobalPosition,
        map: &mut dyn MapSurface,
        panel: &mut dyn InfoPanel,
    ) {
        let position = raw.position();
        let heading = decode_heading(raw.hdg);
        self.position = Some(position);
        self.altitude_mm = raw.alt;
        self.relative_altitude_mm = raw.relative_alt;
        self.heading_deg = heading;
        self.velocity_mps = ground_speed_mps(raw.vx, raw.vy);

        match self.marker {
            Some(marker) => map.move_marker(marker, position),
            None => self.marker = Some(map.set_marker(position, &format!("Drone {}", self.id))),
        }

        // Short fixed-length segment projected along the heading vector,
        // replacing the previous indicator.
        if let Some(old) = self.heading_path.take() {
            map.delete_path(old);
        }
        let rad = heading.to_radians();
        let tip = LatLon::new(
            position.lat + HEADING_SEGMENT_DEG * rad.cos(),
            position.lon + HEADING_SEGMENT_DEG * rad.sin(),
        );
        self.heading_path = Some(map.set_path(&[position, tip], HEADING_PATH_WIDTH, "red"));

        panel.update_position(
            self.id,
            position,
            self.relative_altitude_mm,
            self.velocity_mps,
            heading,
        );
    }

    /// Store attitude. No rendering side effect.
    pub fn set_telemetry(&mut self, roll: f32, pitch: f32, yaw: f32) {
        self.attitude = Some(Attitude { roll, pitch, yaw });
    }

    pub fn set_status(&mut self, code: u8, panel: &mut dyn InfoPanel) {
        self.status = DroneStatus::from_code(code);
        panel.update_status(self.id, self.status);
    }

    /// Reconcile the job assignment and the rendered path against new data.
    ///
    /// The queued-job display list is rebuilt unconditionally; the active
    /// job's path is re-anchored only when the job identity changed.
    pub fn update_jobs(
        &mut self,
        active: Option<Job>,
        queued: Vec<Job>,
        map: &mut dyn MapSurface,
        panel: &mut dyn InfoPanel,
    ) {
        self.active_job = active;
        self.queued_jobs = queued;

        if self.active_job.is_some() {
            if self.path_visible {
                self.redraw_job_path(map);
            }
        } else {
            // No work: the path goes away and the anchor with it.
            if let Some(old) = self.job_path.take() {
                map.delete_path(old);
            }
            self.path_anchor = None;
            self.rendered_job_id = None;
        }

        panel.render_job_list(self.id, self.active_job.as_ref(), &self.queued_jobs);
    }

    /// Operator toggle for the active-job path. Hiding keeps the anchor so
    /// showing again resumes from the same start point.
    pub fn toggle_job_path(&mut self, map: &mut dyn MapSurface) {
        self.path_visible = !self.path_visible;
        if self.path_visible {
            if self.active_job.is_some() {
                self.redraw_job_path(map);
            }
        } else if let Some(old) = self.job_path.take() {
            map.delete_path(old);
        }
    }

    /// Delete-old-then-draw-new rendering of the remaining path for the
    /// active job: the anchor followed by the unvisited waypoints.
    fn redraw_job_path(&mut self, map: &mut dyn MapSurface) {
        let Some(job) = self.active_job.as_ref() else {
            return;
        };

        if self.rendered_job_id != Some(job.id) || self.path_anchor.is_none() {
            // Job identity changed or nothing anchored yet; a stale anchor
            // must never be reused across jobs.
            self.path_anchor = self.position;
            self.rendered_job_id = self.position.map(|_| job.id);
        }

        if let Some(old) = self.job_path.take() {
            map.delete_path(old);
        }

        let Some(anchor) = self.path_anchor else {
            // No position fix yet, so nothing to anchor the path to.
            return;
        };

        let remaining = job.remaining();
        if remaining.is_empty() {
            // A path needs the anchor and at least one remaining waypoint.
            return;
        }
        let mut points = Vec::with_capacity(1 + remaining.len());
        points.push(anchor);
        points.extend_from_slice(remaining);
        self.job_path = Some(map.set_path(&points, JOB_PATH_WIDTH, drone_color(self.id)));
    }
}
