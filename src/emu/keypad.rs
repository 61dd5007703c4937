use crate::u4;

/// The 16-key hex keypad as seen by the CPU.
pub trait Keypad {
    /// The key currently pressed, if any. Must not block.
    fn read_key(&mut self) -> Option<u4>;
}
