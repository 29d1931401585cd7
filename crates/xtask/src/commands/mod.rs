//! Command implementations for xtask
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod check_map;
mod find_path;
mod simulate;

pub use check_map::CheckMap;
pub use find_path::FindPath;
pub use simulate::Simulate;
