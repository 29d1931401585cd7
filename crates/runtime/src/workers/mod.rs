//! Worker tasks that back the runtime orchestration.
//!
//! The navigation worker is the only task that mutates controllers; path
//! planning threads report back to it through the controllers they serve.

mod navigation;

pub use navigation::{Command, NavigationWorker};
