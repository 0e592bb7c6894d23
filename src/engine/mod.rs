//! Interval timer engine.
//!
//! - `timer`: The phase state machine and its queries
//! - `policy`: Phase transition rules
//! - `scheduler`: Repeating tick sources (tokio interval, manual)
//! - `session`: Async runner feeding commands and ticks to the engine
//! - `error`: Engine error types

mod error;
mod policy;
mod scheduler;
mod session;
mod timer;

pub use error::TimerError;
pub use policy::{StandardPolicy, Transition, TransitionPolicy};
pub use scheduler::{IntervalScheduler, ManualScheduler, TickScheduler, TICK_PERIOD};
pub use session::{SessionCommand, SessionOutcome, SessionRunner};
pub use timer::{Capabilities, CommandOutcome, TimerEngine, TimerEvent, FINAL_SECONDS_CUE};
