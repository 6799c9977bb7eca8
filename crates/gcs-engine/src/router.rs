//! Mission command routing.
//!
//! Tool calls coming back from the reasoning service are matched by name
//! into a `MissionCommand`: an enum-keyed dispatch table with an explicit
//! unrecognized-action branch instead of a missing-key lookup.

use serde::Deserialize;
use thiserror::Error;

use gcs_core::models::{DroneId, PoiId, ToolCall};

/// Entity kinds a command can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Drone,
    Poi,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Drone => write!(f, "drone"),
            EntityKind::Poi => write!(f, "POI"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    /// The command references a drone or POI that does not exist. Local to
    /// the one action; never aborts a batch.
    #[error("unknown {kind} {id}")]
    UnknownEntity { kind: EntityKind, id: u32 },
    /// Tool name outside the supported set. Skipped, logged, batch continues.
    #[error("unrecognized action '{0}'")]
    UnrecognizedAction(String),
    /// Recognized tool whose argument payload does not deserialize.
    #[error("bad arguments for '{name}': {source}")]
    BadArguments {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A fully parsed mission command, ready to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissionCommand {
    AssignInvestigation {
        poi: PoiId,
        drone: DroneId,
        priority: u8,
    },
    Recall {
        drone: DroneId,
    },
    EndMission,
}

fn default_priority() -> u8 {
    5
}

#[derive(Deserialize)]
struct InvestigateArgs {
    poi_id: PoiId,
    drone_id: DroneId,
    #[serde(default = "default_priority")]
    priority: u8,
}

#[derive(Deserialize)]
struct RecallArgs {
    drone_id: DroneId,
}

impl MissionCommand {
    pub fn from_tool_call(call: &ToolCall) -> Result<Self, CommandError> {
        match call.name.as_str() {
            "create_poi_investigate_job" => {
                let args: InvestigateArgs = serde_json::from_value(call.arguments.clone())
                    .map_err(|source| CommandError::BadArguments {
                        name: call.name.clone(),
                        source,
                    })?;
                Ok(MissionCommand::AssignInvestigation {
                    poi: args.poi_id,
                    drone: args.drone_id,
                    priority: args.priority,
                })
            }
            "call_return_to_launch" => {
                let args: RecallArgs = serde_json::from_value(call.arguments.clone()).map_err(
                    |source| CommandError::BadArguments {
                        name: call.name.clone(),
                        source,
                    },
                )?;
                Ok(MissionCommand::Recall {
                    drone: args.drone_id,
                })
            }
            "call_end_mission" => Ok(MissionCommand::EndMission),
            other => Err(CommandError::UnrecognizedAction(other.to_string())),
        }
    }

    /// Operator-facing acknowledgment once the command applied.
    pub fn acknowledgment(&self) -> String {
        match self {
            MissionCommand::AssignInvestigation { poi, drone, .. } => {
                format!("Sending drone {drone} to investigate POI {poi}")
            }
            MissionCommand::Recall { drone } => format!("Sending drone {drone} to launch."),
            MissionCommand::EndMission => {
                "Ending mission, returning all drones to launch.".to_string()
            }
        }
    }
}
