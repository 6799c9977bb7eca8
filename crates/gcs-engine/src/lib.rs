//! Operator console engine: mission state, command routing, and the
//! asynchronous chat-dispatch pipeline, all mutated by one owning task.

pub mod dispatch;
pub mod engine;
pub mod events;
pub mod mission;
pub mod persistence;
pub mod router;

pub use dispatch::{ChatMessage, DispatchState, Sender};
pub use engine::{run_engine, Engine};
pub use events::{EngineEvent, OperatorAction};
pub use mission::MissionState;
pub use router::{CommandError, EntityKind, MissionCommand};
