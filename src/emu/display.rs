use super::{DISPLAY_X, DISPLAY_Y, Display};

/// Sprites are at most 15 rows tall.
pub const MAX_SPRITE_ROWS: usize = 15;

/// The display collaborator driven by DXYN and 00E0.
pub trait Screen {
    /// XORs an 8-pixel wide sprite onto the screen with its top-left corner at
    /// (`x`, `y`). Every pixel wraps around the edges independently.
    ///
    /// Returns true if any pixel that was on got turned off.
    fn write_sprite(&mut self, x: u8, y: u8, rows: &[u8]) -> bool;

    /// Turns every pixel off.
    fn clear(&mut self);
}

/// A 64x32 monochrome frame buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: Display<bool>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            pixels: [[false; DISPLAY_X]; DISPLAY_Y],
        }
    }

    /// Get the state of a pixel on the display (true = on, false = off).
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[y % DISPLAY_Y][x % DISPLAY_X]
    }

    pub fn pixels(&self) -> &Display<bool> {
        &self.pixels
    }

    /// Number of pixels currently on.
    pub fn lit(&self) -> usize {
        self.pixels.iter().flatten().filter(|&&pixel| pixel).count()
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for FrameBuffer {
    fn write_sprite(&mut self, x: u8, y: u8, rows: &[u8]) -> bool {
        let mut any_erased = false;

        for (row, &sprite_byte) in rows.iter().take(MAX_SPRITE_ROWS).enumerate() {
            let y_pos = (y as usize + row) % DISPLAY_Y;

            for col in 0..8 {
                // Zero bits leave the pixel untouched
                if sprite_byte & (0x80 >> col) == 0 {
                    continue;
                }

                let x_pos = (x as usize + col) % DISPLAY_X;
                let pixel = &mut self.pixels[y_pos][x_pos];
                if *pixel {
                    any_erased = true;
                }
                *pixel ^= true;
            }
        }

        any_erased
    }

    fn clear(&mut self) {
        self.pixels = [[false; DISPLAY_X]; DISPLAY_Y];
    }
}
