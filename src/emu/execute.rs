use rand::Rng;

use super::{
    Chip8Error, Chip8Result, Cpu, Instruction, Keypad, Memory, Opcode, OpcodeALU, Screen, V0,
    value_of,
};
use crate::u4;

impl<S: Screen, K: Keypad> Cpu<S, K> {
    /// Runs one decoded instruction. Every arm positions the program counter
    /// itself: +2 normally, +4 for a taken skip, a new address for jumps.
    pub(crate) fn execute(
        &mut self,
        opcode: Opcode,
        inst: Instruction,
    ) -> Result<Chip8Result, Chip8Error> {
        let Instruction {
            x, y, n, nn, nnn, ..
        } = inst;

        match opcode {
            Opcode::ClearDisplay => {
                self.screen.clear();
                self.advance();
                return Ok(Chip8Result::WaitForNextFrame);
            }
            Opcode::Jump => {
                self.pc = nnn;
            }
            Opcode::JumpWithOffset => {
                self.pc = nnn + u16::from(self.v.get(V0));
            }
            Opcode::Call => {
                self.push_stack()?;
                self.pc = nnn;
            }
            Opcode::Return => {
                self.pop_stack()?;
                self.advance();
            }
            Opcode::NativeCall => {
                return Err(Chip8Error::UnsupportedInstruction {
                    word: inst.word,
                    pc: self.pc,
                });
            }
            Opcode::SkipRegEqualImm => {
                self.skip_when(value_of(self.v[x]) == value_of(nn));
            }
            Opcode::SkipRegNotEqualImm => {
                self.skip_when(value_of(self.v[x]) != value_of(nn));
            }
            Opcode::SkipRegEqualReg => {
                self.skip_when(self.v[x] == self.v[y]);
            }
            Opcode::SkipRegNotEqualReg => {
                self.skip_when(self.v[x] != self.v[y]);
            }
            Opcode::SetRegImm => {
                self.v.set(x, nn);
                self.advance();
            }
            Opcode::AddRegImm => {
                self.v.set(x, value_of(self.v[x]) + value_of(nn));
                self.advance();
            }
            Opcode::ALU(op) => {
                self.execute_alu(x, y, op);
                self.advance();
            }
            Opcode::Random => {
                let rand_byte: u8 = self.rng.random();
                self.v.set(x, rand_byte & nn);
                self.advance();
            }
            Opcode::SetIndexImm => {
                self.i.set(nnn);
                self.advance();
            }
            Opcode::AddIndexReg => {
                self.i.set(value_of(self.i) + value_of(self.v[x]));
                self.advance();
            }
            Opcode::Draw => {
                return Ok(self.execute_draw(x, y, n));
            }
            Opcode::SkipIfPressed => {
                let key = self.keypad.read_key();
                self.skip_when(key.map(value_of) == Some(value_of(self.v[x])));
            }
            Opcode::SkipIfNotPressed => {
                let key = self.keypad.read_key();
                self.skip_when(key.map(value_of) != Some(value_of(self.v[x])));
            }
            Opcode::WaitForKey => {
                return Ok(self.execute_wait_for_key(x));
            }
            Opcode::ReadDelayTimer => {
                let value = self.delay_timer.get(self.now());
                self.v.set(x, value);
                self.advance();
            }
            Opcode::SetDelayTimer => {
                let now = self.now();
                self.delay_timer.set(self.v[x], now);
                self.advance();
            }
            Opcode::SetSoundTimer => {
                let now = self.now();
                self.sound_timer.set(self.v[x], now);
                self.advance();
            }
            Opcode::FontChar => {
                let digit = u4::low(self.v.get(x));
                self.i.set(Memory::sprite_for_digit(digit));
                self.advance();
            }
            Opcode::BCD => {
                let value = self.v.get(x);
                self.memory
                    .region_mut(self.i.get(), 3)?
                    .copy_from_slice(&[value / 100, (value / 10) % 10, value % 10]);
                self.advance();
            }
            Opcode::StoreRegs => {
                let count = usize::from(x) + 1;
                let values = self.v.values();
                self.memory
                    .region_mut(self.i.get(), count)?
                    .copy_from_slice(&values[..count]);
                self.advance();
            }
            Opcode::LoadRegs => {
                let count = usize::from(x) + 1;
                let bytes = self.memory.region(self.i.get(), count)?;
                for (index, &byte) in bytes.iter().enumerate() {
                    self.v.set(u4::new(index as u8), byte);
                }
                self.advance();
            }
        };

        Ok(Chip8Result::Continue)
    }

    fn execute_alu(&mut self, x: u4, y: u4, op: OpcodeALU) {
        let vx = self.v.get(x);
        let vy = self.v.get(y);

        match op {
            OpcodeALU::Set => self.v.set(x, vy),
            OpcodeALU::Or => self.v.set(x, vx | vy),
            OpcodeALU::And => self.v.set(x, vx & vy),
            OpcodeALU::Xor => self.v.set(x, vx ^ vy),
            OpcodeALU::Add => {
                let (res, overflow) = vx.overflowing_add(vy);
                self.v.set(x, res);
                self.v.set_flag(overflow);
            }
            OpcodeALU::Sub => {
                // VF reports the borrow itself, not its inverse
                let (res, borrow) = vx.overflowing_sub(vy);
                self.v.set(x, res);
                self.v.set_flag(borrow);
            }
            OpcodeALU::SubReverse => {
                self.v.set(x, vy.wrapping_sub(vx));
                self.v.set_flag(vy > vx);
            }
            OpcodeALU::ShiftRight => {
                self.v.set_flag(vy & 0x01 != 0);
                self.v.set(x, vy >> 1);
            }
            OpcodeALU::ShiftLeft => {
                self.v.set_flag(vy & 0x80 != 0);
                self.v.set(x, vy << 1);
            }
        }
    }

    fn execute_draw(&mut self, x: u4, y: u4, n: u4) -> Chip8Result {
        // Rows past the end of memory are dropped, not an error
        let rows = self.memory.region_clamped(self.i.get(), usize::from(n));
        let collision = self.screen.write_sprite(self.v.get(x), self.v.get(y), rows);

        self.v.set_flag(collision);
        self.advance();
        Chip8Result::WaitForNextFrame
    }

    fn execute_wait_for_key(&mut self, x: u4) -> Chip8Result {
        match self.keypad.read_key() {
            Some(key) => {
                self.v.set(x, key);
                self.advance();
                Chip8Result::Continue
            }
            // Leave the PC alone so the next step polls again
            None => Chip8Result::WaitForNextFrame,
        }
    }

    fn advance(&mut self) {
        self.pc = self.pc.wrapping_add(2);
    }

    fn skip_when(&mut self, condition: bool) {
        if condition {
            self.advance();
        }
        self.advance();
    }
}
