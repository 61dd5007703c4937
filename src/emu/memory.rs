use log::info;

use super::{Chip8Error, FONT, FONT_END_ADDRESS, FONT_GLYPH_SIZE, FONT_START_ADDRESS};
use crate::u4;

// Standard CHIP-8 memory layout
pub const ROM_START_ADDRESS: usize = 0x200;
pub const MEMORY_SIZE: usize = 4096;

/// 4KB of CHIP-8 memory.
///
/// The font occupies the bottom 80 bytes, everything else starts zeroed and
/// programs are copied in at 0x200.
#[derive(Clone)]
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        bytes[FONT_START_ADDRESS..FONT_END_ADDRESS].copy_from_slice(&FONT);
        Self { bytes }
    }

    /// Copies a ROM image into memory starting at 0x200.
    pub fn load(&mut self, rom: &[u8]) -> Result<(), Chip8Error> {
        let rom_end = ROM_START_ADDRESS + rom.len();
        self.bytes
            .get_mut(ROM_START_ADDRESS..rom_end)
            .ok_or(Chip8Error::RomTooLarge {
                size: rom.len(),
                max_size: MEMORY_SIZE - ROM_START_ADDRESS,
            })?
            .copy_from_slice(rom);

        info!("Loaded {} byte program at {ROM_START_ADDRESS:#05X}", rom.len());
        Ok(())
    }

    pub fn read_byte(&self, addr: u16) -> Result<u8, Chip8Error> {
        self.bytes
            .get(addr as usize)
            .copied()
            .ok_or(Chip8Error::MemoryOutOfBounds {
                address: addr as usize,
            })
    }

    pub fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), Chip8Error> {
        *self
            .bytes
            .get_mut(addr as usize)
            .ok_or(Chip8Error::MemoryOutOfBounds {
                address: addr as usize,
            })? = value;
        Ok(())
    }

    /// Reads the big-endian instruction word at `addr`.
    pub fn read_word(&self, addr: u16) -> Result<u16, Chip8Error> {
        let bytes = self.region(addr, 2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// `len` bytes starting at `addr`, or an error naming the first address
    /// past the end of memory.
    pub fn region(&self, addr: u16, len: usize) -> Result<&[u8], Chip8Error> {
        let start = addr as usize;
        self.bytes
            .get(start..start + len)
            .ok_or(Chip8Error::MemoryOutOfBounds {
                address: start.max(MEMORY_SIZE),
            })
    }

    pub fn region_mut(&mut self, addr: u16, len: usize) -> Result<&mut [u8], Chip8Error> {
        let start = addr as usize;
        self.bytes
            .get_mut(start..start + len)
            .ok_or(Chip8Error::MemoryOutOfBounds {
                address: start.max(MEMORY_SIZE),
            })
    }

    /// Up to `len` bytes starting at `addr`, cut short at the end of memory.
    pub fn region_clamped(&self, addr: u16, len: usize) -> &[u8] {
        let start = (addr as usize).min(MEMORY_SIZE);
        let end = start.saturating_add(len).min(MEMORY_SIZE);
        &self.bytes[start..end]
    }

    /// Address of the built-in sprite for a hex digit.
    pub fn sprite_for_digit(digit: u4) -> u16 {
        (FONT_START_ADDRESS + usize::from(digit) * FONT_GLYPH_SIZE) as u16
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
