mod config;
mod cpu;
mod display;
mod execute;
mod font;
mod instruction;
mod keypad;
mod memory;
mod opcode;
mod register;
mod runner;
mod timer;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use config::*;
pub use cpu::*;
pub use display::*;
pub use font::*;
pub use instruction::*;
pub use keypad::*;
pub use memory::*;
pub use opcode::*;
pub use register::*;
pub use runner::*;
pub use timer::*;
pub use types::*;
