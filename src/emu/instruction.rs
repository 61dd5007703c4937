use crate::u4;

/// A decoded view of one 16-bit instruction word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    /// The raw word.
    pub word: u16,
    /// First nibble, selects the instruction family.
    pub family: u4,
    pub x: u4,
    pub y: u4,
    pub n: u4,
    pub nn: u8,
    pub nnn: u16,
}

impl Instruction {
    /// Splits a raw word into its nibble fields.
    pub fn decode(word: u16) -> Self {
        Self {
            word,
            family: u4::low((word >> 12) as u8),
            x: u4::low((word >> 8) as u8),
            y: u4::low((word >> 4) as u8),
            n: u4::low(word as u8),
            nn: (word & 0x00FF) as u8,
            nnn: word & 0x0FFF,
        }
    }

    /// The last nibble, named `e` in some references.
    pub fn e(&self) -> u4 {
        self.n
    }
}

impl From<u16> for Instruction {
    fn from(word: u16) -> Self {
        Self::decode(word)
    }
}
