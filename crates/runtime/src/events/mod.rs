//! Topic-based event bus for navigation events.
//!
//! Controllers publish movement progress on [`Topic::Movement`] and
//! script-facing requests on [`Topic::Script`]; consumers subscribe only to
//! the topics they need.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{MovementEvent, PathOutcome, ScriptEvent};
