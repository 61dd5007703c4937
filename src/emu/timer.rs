use std::time::{Duration, Instant};

use log::debug;

use super::register::Operand;

/// Source of the current time for the timer registers.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// The host's monotonic clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A countdown register anchored to wall-clock time.
///
/// Nothing is stored but the instant the countdown reaches zero. Writing `x`
/// moves that instant to `now + x * period`, reading returns the remaining
/// periods rounded to the nearest integer (halves to even) and never less
/// than zero. The value therefore decays in real time regardless of how often
/// the CPU steps.
#[derive(Clone, Debug)]
pub struct TimerRegister {
    target: Option<Instant>,
    period: Duration,
}

impl TimerRegister {
    /// A timer that counts down once per second.
    pub fn new() -> Self {
        Self::with_period(Duration::from_secs(1))
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            target: None,
            period,
        }
    }

    pub fn set(&mut self, value: impl Operand, now: Instant) {
        let ticks = value.value_of();
        let target = now + self.period * ticks;
        debug!("Timer target set to {ticks} periods from now");
        self.target = Some(target);
    }

    pub fn get(&self, now: Instant) -> u8 {
        let remaining = match self.target {
            Some(target) if target > now => target - now,
            _ => return 0,
        };

        let periods = (remaining.as_secs_f64() / self.period.as_secs_f64()).round_ties_even();
        periods.min(f64::from(u8::MAX)) as u8
    }
}

impl Default for TimerRegister {
    fn default() -> Self {
        Self::new()
    }
}
