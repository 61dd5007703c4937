use std::ops::{Index, IndexMut};

use crate::u4;

pub const V0: u4 = u4::new(0x0);
pub const V1: u4 = u4::new(0x1);
pub const V2: u4 = u4::new(0x2);
pub const V3: u4 = u4::new(0x3);
pub const V4: u4 = u4::new(0x4);
pub const V5: u4 = u4::new(0x5);
pub const V6: u4 = u4::new(0x6);
pub const V7: u4 = u4::new(0x7);
pub const V8: u4 = u4::new(0x8);
pub const V9: u4 = u4::new(0x9);
pub const VA: u4 = u4::new(0xA);
pub const VB: u4 = u4::new(0xB);
pub const VC: u4 = u4::new(0xC);
pub const VD: u4 = u4::new(0xD);
pub const VE: u4 = u4::new(0xE);
/// Flag register: carry, borrow and sprite collision.
pub const VF: u4 = u4::new(0xF);

/// Anything that can be written to or compared with a register.
///
/// Only plain integers and registers implement this, so handing a register
/// setter anything else is rejected at compile time.
pub trait Operand {
    fn value_of(&self) -> u32;
}

/// Normalizes an integer or a register to its plain value.
pub fn value_of(x: impl Operand) -> u32 {
    x.value_of()
}

impl Operand for u8 {
    fn value_of(&self) -> u32 {
        u32::from(*self)
    }
}

impl Operand for u16 {
    fn value_of(&self) -> u32 {
        u32::from(*self)
    }
}

impl Operand for u32 {
    fn value_of(&self) -> u32 {
        *self
    }
}

impl Operand for usize {
    fn value_of(&self) -> u32 {
        *self as u32
    }
}

impl Operand for u4 {
    fn value_of(&self) -> u32 {
        u32::from(self.get())
    }
}

impl<T: Operand> Operand for &T {
    fn value_of(&self) -> u32 {
        (*self).value_of()
    }
}

/// An 8-bit general purpose register. Writes wrap modulo 256.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Register(u8);

impl Register {
    pub fn new(value: impl Operand) -> Self {
        let mut register = Self::default();
        register.set(value);
        register
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    pub fn set(&mut self, value: impl Operand) {
        self.0 = (value.value_of() & 0xFF) as u8;
    }
}

impl Operand for Register {
    fn value_of(&self) -> u32 {
        u32::from(self.0)
    }
}

/// The 12-bit address register I. Writes wrap modulo 4096.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IRegister(u16);

impl IRegister {
    pub fn get(&self) -> u16 {
        self.0
    }

    pub fn set(&mut self, value: impl Operand) {
        self.0 = (value.value_of() & 0xFFF) as u16;
    }
}

impl Operand for IRegister {
    fn value_of(&self) -> u32 {
        u32::from(self.0)
    }
}

/// The V0-VF register bank.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Registers([Register; 16]);

impl Registers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of register `x`.
    pub fn get(&self, x: u4) -> u8 {
        self.0[x].get()
    }

    /// Writes register `x`, wrapping modulo 256.
    pub fn set(&mut self, x: u4, value: impl Operand) {
        self.0[x].set(value);
    }

    pub fn vf(&self) -> u8 {
        self.get(VF)
    }

    /// Sets VF to 1 or 0.
    pub fn set_flag(&mut self, flag: bool) {
        self.set(VF, u8::from(flag));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Register> {
        self.0.iter()
    }

    /// Plain values of V0-VF.
    pub fn values(&self) -> [u8; 16] {
        self.0.map(|register| register.get())
    }
}

impl Index<u4> for Registers {
    type Output = Register;

    fn index(&self, index: u4) -> &Self::Output {
        &self.0[index]
    }
}

impl IndexMut<u4> for Registers {
    fn index_mut(&mut self, index: u4) -> &mut Self::Output {
        &mut self.0[index]
    }
}
