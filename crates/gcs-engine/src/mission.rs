//! Authoritative mission state.
//!
//! The one registry mapping drone id to drone and POI id to POI. Only the
//! engine task writes here; everything else addresses entities by id.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use gcs_core::drone::Drone;
use gcs_core::models::{
    DroneId, DroneStatus, DroneSummary, JobId, LatLon, MissionContext, Poi, PoiId, PoiSummary,
};

use crate::persistence;

pub struct MissionState {
    mission_id: String,
    drones: BTreeMap<DroneId, Drone>,
    pois: BTreeMap<PoiId, Poi>,
    polygon: Vec<LatLon>,
    next_poi_id: PoiId,
    next_job_id: JobId,
    ended: bool,
}

impl MissionState {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            mission_id: persistence::mission_id(started_at),
            drones: BTreeMap::new(),
            pois: BTreeMap::new(),
            polygon: Vec::new(),
            next_poi_id: 1,
            next_job_id: 1,
            ended: false,
        }
    }

    pub fn mission_id(&self) -> &str {
        &self.mission_id
    }

    /// Register a drone if it is not already known.
    pub fn add_drone(&mut self, id: DroneId, status: DroneStatus) -> &mut Drone {
        self.drones.entry(id).or_insert_with(|| Drone::new(id, status))
    }

    pub fn drone(&self, id: DroneId) -> Option<&Drone> {
        self.drones.get(&id)
    }

    pub fn drone_mut(&mut self, id: DroneId) -> Option<&mut Drone> {
        self.drones.get_mut(&id)
    }

    pub fn drone_ids(&self) -> Vec<DroneId> {
        self.drones.keys().copied().collect()
    }

    pub fn poi(&self, id: PoiId) -> Option<&Poi> {
        self.pois.get(&id)
    }

    pub fn poi_mut(&mut self, id: PoiId) -> Option<&mut Poi> {
        self.pois.get_mut(&id)
    }

    /// Snapshot of all POIs in id order, for list rendering.
    pub fn pois(&self) -> Vec<Poi> {
        self.pois.values().cloned().collect()
    }

    /// Allocate the next POI. Unnamed POIs get the conventional label.
    pub fn add_poi(&mut self, position: LatLon, name: Option<String>, description: String) -> PoiId {
        let id = self.next_poi_id;
        self.next_poi_id += 1;
        let name = name.unwrap_or_else(|| format!("poi {id}"));
        self.pois.insert(
            id,
            Poi {
                id,
                position,
                name,
                description,
                positive_flags: 0,
                marker: None,
            },
        );
        id
    }

    /// Closest POI to a position, with its distance in meters.
    pub fn nearest_poi(&self, position: LatLon) -> Option<(PoiId, f64)> {
        self.pois
            .values()
            .map(|poi| (poi.id, poi.position.distance_m(&position)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    pub fn next_job_id(&mut self) -> JobId {
        let id = self.next_job_id;
        self.next_job_id += 1;
        id
    }

    pub fn set_polygon(&mut self, points: Vec<LatLon>) {
        self.polygon = points;
    }

    pub fn polygon(&self) -> &[LatLon] {
        &self.polygon
    }

    pub fn end(&mut self) {
        self.ended = true;
    }

    pub fn ended(&self) -> bool {
        self.ended
    }

    /// Mission context snapshot for a dispatch. Taken by value at call time;
    /// later mutations do not retroactively change what was sent.
    pub fn context_snapshot(&self) -> MissionContext {
        MissionContext {
            polygon: self.polygon.clone(),
            drones: self
                .drones
                .values()
                .map(|drone| DroneSummary {
                    id: drone.id,
                    position: drone.position,
                    status: drone.status,
                    active_job: drone.active_job.as_ref().map(|job| job.id),
                    queued_jobs: drone.queued_jobs.len(),
                })
                .collect(),
            pois: self
                .pois
                .values()
                .map(|poi| PoiSummary {
                    id: poi.id,
                    name: poi.name.clone(),
                    position: poi.position,
                    description: poi.description.clone(),
                })
                .collect(),
        }
    }
}
