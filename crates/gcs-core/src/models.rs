//! Core data models for the operator console.

use serde::{Deserialize, Serialize};

use crate::surface::MarkerId;

pub type DroneId = u32;
pub type JobId = u32;
pub type PoiId = u32;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to another point, in meters.
    pub fn distance_m(&self, other: &LatLon) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let dlat = (other.lat - self.lat).to_radians();
        let dlon = (other.lon - self.lon).to_radians();
        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        EARTH_RADIUS_M * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
    }
}

/// Vehicle system status as reported over the vehicle link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DroneStatus {
    #[default]
    Uninit,
    Boot,
    Calibrating,
    Standby,
    Active,
    Critical,
    Emergency,
    /// Any status code outside the known range.
    Unknown,
}

impl DroneStatus {
    /// Map a raw status code. Codes 0-6 are meaningful; everything else
    /// displays as Unknown rather than failing.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => DroneStatus::Uninit,
            1 => DroneStatus::Boot,
            2 => DroneStatus::Calibrating,
            3 => DroneStatus::Standby,
            4 => DroneStatus::Active,
            5 => DroneStatus::Critical,
            6 => DroneStatus::Emergency,
            _ => DroneStatus::Unknown,
        }
    }
}

impl std::fmt::Display for DroneStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DroneStatus::Uninit => "UnInit",
            DroneStatus::Boot => "Boot",
            DroneStatus::Calibrating => "Calibrating",
            DroneStatus::Standby => "Standby",
            DroneStatus::Active => "Active",
            DroneStatus::Critical => "Critical",
            DroneStatus::Emergency => "Emergency",
            DroneStatus::Unknown => "Unknown",
        };
        write!(f, "{label}")
    }
}

/// Display-only lifecycle of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Active,
    Done,
}

/// A unit of assigned work: an ordered run of waypoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    /// Fixed once the job is created.
    pub waypoints: Vec<LatLon>,
    /// Boundary between completed and remaining waypoints. Caller-monotonic
    /// while the job is active; rendered faithfully if it ever regresses.
    pub last_waypoint: usize,
    pub status: JobStatus,
    pub priority: u8,
}

impl Job {
    /// Waypoints not yet visited.
    pub fn remaining(&self) -> &[LatLon] {
        self.waypoints.get(self.last_waypoint..).unwrap_or(&[])
    }
}

/// Operator- or detection-created point of interest. Referenced by id only;
/// nothing holds a structural pointer to a POI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Poi {
    pub id: PoiId,
    pub position: LatLon,
    pub name: String,
    pub description: String,
    /// Repeat-sighting counter.
    pub positive_flags: u32,
    /// Map marker handle, once one has been placed.
    #[serde(skip)]
    pub marker: Option<MarkerId>,
}

/// A structured action returned by the reasoning service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: serde_json::Value,
}

/// Mission context captured at dispatch time. Mutations made while the
/// reasoning call is in flight do not change what was sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MissionContext {
    pub polygon: Vec<LatLon>,
    pub drones: Vec<DroneSummary>,
    pub pois: Vec<PoiSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroneSummary {
    pub id: DroneId,
    pub position: Option<LatLon>,
    pub status: DroneStatus,
    pub active_job: Option<JobId>,
    pub queued_jobs: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoiSummary {
    pub id: PoiId,
    pub name: String,
    pub position: LatLon,
    pub description: String,
}

/// Map path color assigned to a drone by id.
pub fn drone_color(id: DroneId) -> &'static str {
    match id {
        1 => "red",
        2 => "blue",
        3 => "green",
        4 => "yellow",
        _ => "gray",
    }
}
