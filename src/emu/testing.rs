use std::{
    cell::Cell,
    rc::Rc,
    time::{Duration, Instant},
};

use super::{Clock, Config, Cpu, FrameBuffer, Keypad};
use crate::u4;

/// A keypad whose pressed key is set directly by the test.
#[derive(Debug, Default)]
pub struct TestKeypad {
    pub key: Option<u4>,
    pub reads: usize,
}

impl Keypad for TestKeypad {
    fn read_key(&mut self) -> Option<u4> {
        self.reads += 1;
        self.key
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Clone, Debug)]
pub struct ManualClock(Rc<Cell<Instant>>);

impl ManualClock {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(Instant::now())))
    }

    pub fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.0.get()
    }
}

pub type TestCpu = Cpu<FrameBuffer, TestKeypad>;

/// A CPU with a blank screen, no key pressed and a fixed seed.
pub fn test_cpu() -> TestCpu {
    let config = Config {
        rng_seed: Some(0x5EED),
        ..Config::default()
    };
    Cpu::with_config(FrameBuffer::new(), TestKeypad::default(), &config)
}
