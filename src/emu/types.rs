/// Result type for CHIP-8 CPU cycle execution
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Chip8Result {
    /// Continue executing instructions in the current frame.
    Continue,
    /// Wait for the next frame before continuing
    /// (after touching the display, or while polling for a key).
    WaitForNextFrame,
}

/// Error types that can occur during CHIP-8 emulation.
///
/// All of them are fatal for the current run.
#[derive(Debug, thiserror::Error)]
pub enum Chip8Error {
    #[error("Unsupported instruction {word:#06X} at {pc:#05X}")]
    UnsupportedInstruction { word: u16, pc: u16 },

    #[error("ROM is too large ({size} bytes), max size is {max_size} bytes")]
    RomTooLarge { size: usize, max_size: usize },

    #[error("Memory access out of bounds at address {address:#06X}")]
    MemoryOutOfBounds { address: usize },

    #[error("Stack underflow at {pc:#05X}: return with an empty call stack")]
    StackUnderflow { pc: u16 },

    #[error("Stack overflow at {pc:#05X}: more than {limit} nested calls")]
    StackOverflow { pc: u16, limit: usize },
}

pub const DISPLAY_X: usize = 64;
pub const DISPLAY_Y: usize = 32;
/// A type alias for the CHIP-8 display buffer representation
pub type Display<T> = [[T; DISPLAY_X]; DISPLAY_Y];
