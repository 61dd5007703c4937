//! A CHIP-8 interpreter.
//!
//! [`emu::Cpu`] fetches big-endian instruction words from a 4KB memory image,
//! resolves them through a compiled opcode table and executes them against
//! its registers, call stack, wall-clock timers and an injected screen and
//! keypad. [`emu::Chip8Runner`] paces it for interactive frontends.

pub mod emu;
mod nibble;

pub use nibble::*;
