use std::time::Duration;

pub const DEFAULT_CPU_HZ: f32 = 700.0;
/// Timers count down in whole seconds unless told otherwise.
pub const DEFAULT_TIMER_HZ: f32 = 1.0;

/// Tunables for a CPU and its runner.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Instructions executed per second by [`Chip8Runner`](super::Chip8Runner).
    pub cpu_hz: f32,
    /// Timer decrements per second of wall-clock time.
    pub timer_hz: f32,
    /// Seed for CXNN. `None` seeds from the OS.
    pub rng_seed: Option<u64>,
    /// Maximum call depth. `None` leaves the stack unbounded.
    pub stack_limit: Option<usize>,
}

impl Config {
    pub fn timer_period(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.timer_hz)
    }

    pub fn cpu_time_step(&self) -> f32 {
        1.0 / self.cpu_hz
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cpu_hz: DEFAULT_CPU_HZ,
            timer_hz: DEFAULT_TIMER_HZ,
            rng_seed: None,
            stack_limit: None,
        }
    }
}
