//! Panel power management
//!
//! The machine itself is pure: callers feed it activity and idle-timeout
//! events and execute the plans it hands back (bus commands, contrast
//! fades, timer rearming). Timekeeping stays with the caller, so every
//! transition is unit-testable without a clock.

mod actions;
mod machine;

pub use actions::{PowerAction, PowerPlan, TimerOp};
pub use machine::{PowerMachine, PowerState};
