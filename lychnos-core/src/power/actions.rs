//! Plans handed back by the power machine
//!
//! A plan is what the driver must do right now: zero to two panel actions
//! in order, plus what happens to the idle timer.

use heapless::Vec;

/// A single panel-facing action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerAction {
    /// Issue the display-on command.
    PanelOn,
    /// Issue the display-off command.
    PanelOff,
    /// Fade the live contrast to the given byte value.
    FadeTo(u8),
}

/// What to do with the idle timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerOp {
    /// Stop the timer (if running) and rearm it this many seconds out.
    Restart(u32),
    /// Stop the timer.
    Stop,
    /// Leave the timer alone.
    Keep,
}

/// Ordered actions plus the timer disposition for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerPlan {
    pub actions: Vec<PowerAction, 2>,
    pub timer: TimerOp,
}

impl PowerPlan {
    pub(crate) fn new(timer: TimerOp) -> Self {
        Self {
            actions: Vec::new(),
            timer,
        }
    }

    pub(crate) fn with(mut self, action: PowerAction) -> Self {
        // capacity 2 is sized to the longest plan (wake: on + fade)
        let _ = self.actions.push(action);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_preserves_action_order() {
        let plan = PowerPlan::new(TimerOp::Keep)
            .with(PowerAction::PanelOn)
            .with(PowerAction::FadeTo(180));
        assert_eq!(
            plan.actions.as_slice(),
            &[PowerAction::PanelOn, PowerAction::FadeTo(180)]
        );
        assert_eq!(plan.timer, TimerOp::Keep);
    }
}
