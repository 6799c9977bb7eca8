pub mod drone;
pub mod models;
pub mod surface;
pub mod telemetry;

pub use drone::{Attitude, Drone};
pub use models::{
    drone_color, DroneId, DroneStatus, DroneSummary, Job, JobId, JobStatus, LatLon,
    MissionContext, Poi, PoiId, PoiSummary, ToolCall,
};
pub use surface::{InfoPanel, MapSurface, MarkerId, PathId};
pub use telemetry::{decode_coord, decode_heading, ground_speed_mps, RawGlobalPosition};
