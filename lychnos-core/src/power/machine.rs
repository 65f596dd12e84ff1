//! Power state machine
//!
//! Runtime oscillates between On, Dim and Sleep; Off exists only between
//! construction and the end of panel initialization. Every transition out
//! of Dim or Sleep goes through [`PowerMachine::activity`] - the idle
//! timeout only ever moves the panel toward Sleep.

use crate::config::IdleConfig;

use super::actions::{PowerAction, PowerPlan, TimerOp};

/// Panel power states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// Pre-initialization only.
    Off,
    /// Full brightness, panel driven.
    On,
    /// Contrast faded to zero after the first idle threshold.
    Dim,
    /// Panel powered off after the second idle threshold; framebuffer
    /// contents survive.
    Sleep,
}

/// The Dim/Sleep machine.
///
/// Holds the state and the contrast cached on entering Dim. The live
/// contrast value belongs to the driver; it is passed in when the machine
/// needs to cache it.
#[derive(Debug, Clone)]
pub struct PowerMachine {
    state: PowerState,
    pre_dim_contrast: u8,
    idle: IdleConfig,
}

impl PowerMachine {
    /// New machine in the pre-init `Off` state.
    pub fn new(idle: IdleConfig) -> Self {
        Self {
            state: PowerState::Off,
            pre_dim_contrast: 0,
            idle,
        }
    }

    /// Mark initialization complete (`Off` -> `On`).
    pub fn mark_on(&mut self) {
        self.state = PowerState::On;
    }

    /// Current state.
    pub fn state(&self) -> PowerState {
        self.state
    }

    /// Contrast cached on the last entry into Dim.
    pub fn pre_dim_contrast(&self) -> u8 {
        self.pre_dim_contrast
    }

    /// Record caller activity.
    ///
    /// A dimmed panel gets its contrast back; a sleeping panel is powered
    /// on first. Either way the idle timer restarts at the dim threshold
    /// (when any threshold is configured at all), so the returned plan must
    /// be applied before the operation that triggered it.
    pub fn activity(&mut self) -> PowerPlan {
        let timer = if self.idle.dim_secs > 0 || self.idle.sleep_secs > 0 {
            TimerOp::Restart(self.idle.dim_secs)
        } else {
            TimerOp::Keep
        };

        let plan = match self.state {
            PowerState::Dim => {
                log::info!("activity while dimmed, restoring contrast");
                PowerPlan::new(timer).with(PowerAction::FadeTo(self.pre_dim_contrast))
            }
            PowerState::Sleep => {
                log::info!("activity while asleep, waking panel");
                PowerPlan::new(timer)
                    .with(PowerAction::PanelOn)
                    .with(PowerAction::FadeTo(self.pre_dim_contrast))
            }
            PowerState::On | PowerState::Off => PowerPlan::new(timer),
        };
        self.state = PowerState::On;
        plan
    }

    /// The idle timer fired.
    ///
    /// First firing dims (caching `current_contrast` for the later
    /// restore), second firing sleeps. A firing while already asleep is a
    /// logged no-op; only [`Self::activity`] leaves Sleep.
    pub fn idle_elapsed(&mut self, current_contrast: u8) -> PowerPlan {
        match self.state {
            PowerState::On | PowerState::Off => {
                log::info!("idle timeout: dimming (contrast {current_contrast} cached)");
                self.pre_dim_contrast = current_contrast;
                self.state = PowerState::Dim;
                let timer = if self.idle.sleep_secs > 0 {
                    TimerOp::Restart(self.idle.sleep_secs)
                } else {
                    TimerOp::Stop
                };
                PowerPlan::new(timer).with(PowerAction::FadeTo(0))
            }
            PowerState::Dim => {
                log::info!("idle timeout: sleeping");
                self.state = PowerState::Sleep;
                PowerPlan::new(TimerOp::Stop).with(PowerAction::PanelOff)
            }
            PowerState::Sleep => {
                log::debug!("idle timeout while already asleep");
                PowerPlan::new(TimerOp::Keep)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> PowerMachine {
        let mut m = PowerMachine::new(IdleConfig {
            dim_secs: 45,
            sleep_secs: 60,
        });
        m.mark_on();
        m
    }

    #[test]
    fn starts_off_until_marked_on() {
        let m = PowerMachine::new(IdleConfig::default());
        assert_eq!(m.state(), PowerState::Off);
    }

    #[test]
    fn first_timeout_dims_and_rearms_at_sleep_threshold() {
        let mut m = machine();
        let plan = m.idle_elapsed(255);
        assert_eq!(m.state(), PowerState::Dim);
        assert_eq!(m.pre_dim_contrast(), 255);
        assert_eq!(plan.actions.as_slice(), &[PowerAction::FadeTo(0)]);
        assert_eq!(plan.timer, TimerOp::Restart(60));
    }

    #[test]
    fn second_timeout_sleeps_and_stops_the_timer() {
        let mut m = machine();
        m.idle_elapsed(255);
        let plan = m.idle_elapsed(0);
        assert_eq!(m.state(), PowerState::Sleep);
        assert_eq!(plan.actions.as_slice(), &[PowerAction::PanelOff]);
        assert_eq!(plan.timer, TimerOp::Stop);
    }

    #[test]
    fn timeout_while_asleep_is_a_no_op() {
        let mut m = machine();
        m.idle_elapsed(255);
        m.idle_elapsed(0);
        let plan = m.idle_elapsed(0);
        assert_eq!(m.state(), PowerState::Sleep);
        assert!(plan.actions.is_empty());
        assert_eq!(plan.timer, TimerOp::Keep);
    }

    #[test]
    fn activity_while_dim_restores_cached_contrast() {
        let mut m = machine();
        m.idle_elapsed(180);
        let plan = m.activity();
        assert_eq!(m.state(), PowerState::On);
        assert_eq!(plan.actions.as_slice(), &[PowerAction::FadeTo(180)]);
        assert_eq!(plan.timer, TimerOp::Restart(45));
    }

    #[test]
    fn activity_while_asleep_wakes_then_restores() {
        let mut m = machine();
        m.idle_elapsed(200);
        m.idle_elapsed(0);
        let plan = m.activity();
        assert_eq!(m.state(), PowerState::On);
        assert_eq!(
            plan.actions.as_slice(),
            &[PowerAction::PanelOn, PowerAction::FadeTo(200)]
        );
        assert_eq!(plan.timer, TimerOp::Restart(45));
    }

    #[test]
    fn activity_while_on_just_rearms() {
        let mut m = machine();
        let plan = m.activity();
        assert!(plan.actions.is_empty());
        assert_eq!(plan.timer, TimerOp::Restart(45));
    }

    #[test]
    fn no_thresholds_means_no_timer() {
        let mut m = PowerMachine::new(IdleConfig {
            dim_secs: 0,
            sleep_secs: 0,
        });
        m.mark_on();
        let plan = m.activity();
        assert_eq!(plan.timer, TimerOp::Keep);
    }

    #[test]
    fn zero_sleep_threshold_stops_after_dim() {
        let mut m = PowerMachine::new(IdleConfig {
            dim_secs: 45,
            sleep_secs: 0,
        });
        m.mark_on();
        let plan = m.idle_elapsed(255);
        assert_eq!(m.state(), PowerState::Dim);
        assert_eq!(plan.timer, TimerOp::Stop);
    }

    #[test]
    fn full_cycle_dims_sleeps_and_wakes() {
        // dim at 45s, sleep at 45+60s, any activity restores On
        let mut m = machine();
        m.idle_elapsed(255);
        assert_eq!(m.state(), PowerState::Dim);
        m.idle_elapsed(0);
        assert_eq!(m.state(), PowerState::Sleep);
        let plan = m.activity();
        assert_eq!(m.state(), PowerState::On);
        assert_eq!(plan.timer, TimerOp::Restart(45));
        assert_eq!(
            plan.actions.as_slice(),
            &[PowerAction::PanelOn, PowerAction::FadeTo(255)]
        );
    }
}
