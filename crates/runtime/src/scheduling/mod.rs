//! Cooperative scheduling primitives shared by controllers and script runners.
//!
//! Background work never runs on its own: the controller polls each of these
//! once per tick and consumes their result on the simulation task.
mod replay;
mod scope;
mod waiter;

pub use replay::{ReplayPoll, ReverseReplay};
pub use scope::CancellationScope;
pub use waiter::ScriptWaiter;
