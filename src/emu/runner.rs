use super::{Chip8Error, Chip8Result, Config, Cpu, Keypad, Screen};

/// Longest frame the runner catches up on. Anything beyond it, such as the
/// host sleeping, is dropped.
pub const MAX_FRAME_DT: f32 = 0.25;

/// High-level emulator runner that paces CPU steps by elapsed time.
///
/// Timers need no ticking here: they read the wall clock themselves.
pub struct Chip8Runner<S, K> {
    cpu: Cpu<S, K>,
    cpu_time_step: f32,
    cpu_dt_accumulator: f32,
}

impl<S: Screen, K: Keypad> Chip8Runner<S, K> {
    pub fn new(cpu: Cpu<S, K>, config: &Config) -> Self {
        Self {
            cpu,
            cpu_time_step: config.cpu_time_step(),
            cpu_dt_accumulator: 0.0,
        }
    }

    /// Update emulator by delta time.
    ///
    /// Runs as many CPU cycles as fit in the elapsed time `dt`, capped at
    /// [`MAX_FRAME_DT`]. Returns early
    /// if a frame has to be rendered before the next CPU cycle.
    pub fn update(&mut self, dt: f32) -> Result<Chip8Result, Chip8Error> {
        self.cpu_dt_accumulator += dt.min(MAX_FRAME_DT);

        while self.cpu_dt_accumulator >= self.cpu_time_step {
            self.cpu_dt_accumulator -= self.cpu_time_step;
            match self.cpu.step()? {
                Chip8Result::WaitForNextFrame => {
                    // If we need to wait for the next frame we stop executing cycles.
                    // We also clear the accumulator to avoid "catching up" too fast in the next frame.
                    self.cpu_dt_accumulator = 0.0;
                    return Ok(Chip8Result::WaitForNextFrame);
                }
                Chip8Result::Continue => {}
            }
        }

        Ok(Chip8Result::Continue)
    }

    pub fn cpu(&self) -> &Cpu<S, K> {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu<S, K> {
        &mut self.cpu
    }
}
