/// CHIP-8 operation kinds.
///
/// Operands are not stored here; handlers read them from the decoded
/// [`Instruction`](super::Instruction).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opcode {
    /// 1nnn - Jump to location nnn.
    Jump,
    /// Bnnn - Jump to location nnn + V0.
    JumpWithOffset,

    /// 2nnn - Call subroutine at nnn.
    Call,
    /// 00EE - Return from a subroutine.
    Return,
    /// 0nnn - Call native machine code at nnn. Not emulated.
    NativeCall,

    /// 3xnn - Skip next instruction if Vx == nn.
    SkipRegEqualImm,
    /// 4xnn - Skip next instruction if Vx != nn.
    SkipRegNotEqualImm,
    /// 5xy0 - Skip next instruction if Vx == Vy.
    SkipRegEqualReg,
    /// 9xy0 - Skip next instruction if Vx != Vy.
    SkipRegNotEqualReg,

    /// 6xnn - Set Vx = nn.
    SetRegImm,
    /// 7xnn - Set Vx = Vx + nn.
    AddRegImm,
    /// Annn - Set I = nnn.
    SetIndexImm,
    /// Fx1E - Set I = I + Vx.
    AddIndexReg,

    /// 8xyN - ALU operations
    ALU(OpcodeALU),
    /// Cxnn - Set Vx = random byte AND nn.
    Random,

    /// 00E0 - Clear the display.
    ClearDisplay,
    /// Dxyn - Display sprite.
    Draw,

    /// Ex9E - Skip next instruction if the pressed key equals Vx.
    SkipIfPressed,
    /// ExA1 - Skip next instruction if the pressed key does not equal Vx.
    SkipIfNotPressed,
    /// Fx0A - Wait for a key press, store the value of the key in Vx.
    WaitForKey,

    /// Fx07 - Set Vx = delay timer value.
    ReadDelayTimer,
    /// Fx15 - Set delay timer = Vx.
    SetDelayTimer,
    /// Fx18 - Set sound timer = Vx.
    SetSoundTimer,

    /// Fx29 - Set I = location of sprite for digit Vx.
    FontChar,
    /// Fx33 - Store BCD representation of Vx in memory locations I, I+1, and I+2.
    BCD,

    /// Fx55 - Store registers V0 through Vx in memory starting at location I.
    StoreRegs,
    /// Fx65 - Read registers V0 through Vx from memory starting at location I.
    LoadRegs,
}

/// ALU operations for the 8xyN instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpcodeALU {
    /// 8xy0 - Vx = Vy
    Set,
    /// 8xy1 - Vx = Vx OR Vy
    Or,
    /// 8xy2 - Vx = Vx AND Vy
    And,
    /// 8xy3 - Vx = Vx XOR Vy
    Xor,
    /// 8xy4 - Vx = Vx + Vy
    Add,
    /// 8xy5 - Vx = Vx - Vy
    Sub,
    /// 8xy6 - Vx = Vy SHR 1
    ShiftRight,
    /// 8xy7 - Vx = Vy - Vx
    SubReverse,
    /// 8xyE - Vx = Vy SHL 1
    ShiftLeft,
}

/// An opcode pattern such as `"8XY4"` compiled to a mask and match number.
///
/// Hex digits must match exactly; any other character is a wildcard and
/// contributes nothing to either the mask or the match number.
#[derive(Clone, Debug)]
pub struct OperationDefinition {
    pub pattern: &'static str,
    pub description: &'static str,
    pub opcode: Opcode,
    match_number: u16,
    mask: u16,
}

impl OperationDefinition {
    pub fn new(pattern: &'static str, opcode: Opcode, description: &'static str) -> Self {
        let mut match_number = 0;
        let mut mask = 0;

        for (i, ch) in pattern.chars().take(4).enumerate() {
            let shift = 12 - i * 4;
            if let Some(digit) = ch.to_digit(16) {
                mask |= 0xF << shift;
                match_number |= (digit as u16) << shift;
            }
        }

        Self {
            pattern,
            description,
            opcode,
            match_number,
            mask,
        }
    }

    pub fn match_number(&self) -> u16 {
        self.match_number
    }

    pub fn mask(&self) -> u16 {
        self.mask
    }

    pub fn responds_to(&self, word: u16) -> bool {
        word & self.mask == self.match_number
    }
}

/// Opcode definitions grouped by instruction family.
///
/// Lookups only scan the definitions that can match the word's first nibble,
/// in registration order, so the first registered definition that responds
/// always wins.
#[derive(Clone, Debug)]
pub struct DispatchTable {
    definitions: Vec<OperationDefinition>,
    families: [Vec<usize>; 16],
}

impl DispatchTable {
    pub fn new(definitions: Vec<OperationDefinition>) -> Self {
        let mut families: [Vec<usize>; 16] = Default::default();

        for (index, definition) in definitions.iter().enumerate() {
            if definition.mask & 0xF000 == 0xF000 {
                let family = (definition.match_number >> 12) as usize;
                families[family].push(index);
            } else {
                families.iter_mut().for_each(|family| family.push(index));
            }
        }

        Self {
            definitions,
            families,
        }
    }

    /// The full CHIP-8 instruction set.
    pub fn chip8() -> Self {
        use Opcode::*;
        use OpcodeALU as A;

        let def = OperationDefinition::new;
        Self::new(vec![
            def("6XNN", SetRegImm, "Store NN in VX"),
            def("8XY0", ALU(A::Set), "Store VY in VX"),
            def("7XNN", AddRegImm, "Add NN to VX"),
            def("8XY4", ALU(A::Add), "Add VY to VX"),
            def("8XY5", ALU(A::Sub), "Subtract VY from VX"),
            def("8XY7", ALU(A::SubReverse), "Store VY - VX in VX"),
            def("8XY2", ALU(A::And), "Store VX & VY in VX"),
            def("8XY1", ALU(A::Or), "Store VX | VY in VX"),
            def("8XY3", ALU(A::Xor), "Store VX ^ VY in VX"),
            def("8XY6", ALU(A::ShiftRight), "Shift VY right, store in VX"),
            def("8XYE", ALU(A::ShiftLeft), "Shift VY left, store in VX"),
            def("CXNN", Random, "Set VX to random masked by NN"),
            def("1NNN", Jump, "Jump to NNN"),
            def("BNNN", JumpWithOffset, "Jump to NNN plus V0"),
            def("2NNN", Call, "Execute subroutine at NNN"),
            def("00EE", Return, "Return from subroutine"),
            def("3XNN", SkipRegEqualImm, "Skip if VX == NN"),
            def("5XY0", SkipRegEqualReg, "Skip if VX == VY"),
            def("4XNN", SkipRegNotEqualImm, "Skip if VX != NN"),
            def("9XY0", SkipRegNotEqualReg, "Skip if VX != VY"),
            def("FX15", SetDelayTimer, "Set delay timer to VX"),
            def("FX18", SetSoundTimer, "Set sound timer to VX"),
            def("FX07", ReadDelayTimer, "Set VX to value in delay timer"),
            def("ANNN", SetIndexImm, "Set I to NNN"),
            def("FX1E", AddIndexReg, "Add VX to I"),
            def("FX33", BCD, "Store BCD of VX at I, I+1 and I+2"),
            def("FX55", StoreRegs, "Dump V0-VX at address I"),
            def("FX65", LoadRegs, "Restore V0-VX from address I"),
            def("DXYN", Draw, "Draw sprite at address I at VX VY"),
            def("00E0", ClearDisplay, "Clear the screen"),
            def("FX29", FontChar, "Set I to the font character for VX"),
            def("FX0A", WaitForKey, "Wait for keypad input, store result in VX"),
            def("EX9E", SkipIfPressed, "Skip if VX == key pressed"),
            def("EXA1", SkipIfNotPressed, "Skip if VX != key pressed"),
            def("0NNN", NativeCall, "Execute native code - UNSUPPORTED"),
        ])
    }

    /// The first registered definition responding to `word`.
    pub fn lookup(&self, word: u16) -> Option<&OperationDefinition> {
        self.families[(word >> 12) as usize]
            .iter()
            .map(|&index| &self.definitions[index])
            .find(|definition| definition.responds_to(word))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_responds_to_appropriate_input() {
        let cases = [
            ("1xx4", 0x1234, true),
            ("1xx4", 0x1324, true),
            ("1xx4", 0x1004, true),
            ("1xx4", 0x1FF4, true),
            ("1xx4", 0xFFFF, false),
            ("1xx4", 0x0000, false),
            ("1xx4", 0x0004, false),
            ("1xx4", 0x1000, false),
            ("Foo0", 0xF000, true),
            ("Foo0", 0xF00B, false),
        ];

        for (pattern, word, responds) in cases {
            let definition = OperationDefinition::new(pattern, Opcode::Jump, "");
            assert_eq!(
                definition.responds_to(word),
                responds,
                "{pattern} against {word:#06X}"
            );
        }
    }

    #[test]
    fn compiles_mask_and_match_number() {
        let definition = OperationDefinition::new("8XY4", Opcode::ALU(OpcodeALU::Add), "");
        assert_eq!(definition.mask(), 0xF00F);
        assert_eq!(definition.match_number(), 0x8004);

        let definition = OperationDefinition::new("XXXX", Opcode::Jump, "");
        assert_eq!(definition.mask(), 0);
        assert_eq!(definition.match_number(), 0);
    }

    #[test]
    fn resolves_every_chip8_instruction() {
        use Opcode::*;
        use OpcodeALU as A;

        let table = DispatchTable::chip8();
        let cases = [
            (0x00E0, ClearDisplay),
            (0x00EE, Return),
            (0x0123, NativeCall),
            (0x1234, Jump),
            (0x2345, Call),
            (0x3456, SkipRegEqualImm),
            (0x4567, SkipRegNotEqualImm),
            (0x5670, SkipRegEqualReg),
            (0x6789, SetRegImm),
            (0x789A, AddRegImm),
            (0x8120, ALU(A::Set)),
            (0x8121, ALU(A::Or)),
            (0x8122, ALU(A::And)),
            (0x8123, ALU(A::Xor)),
            (0x8124, ALU(A::Add)),
            (0x8125, ALU(A::Sub)),
            (0x8126, ALU(A::ShiftRight)),
            (0x8127, ALU(A::SubReverse)),
            (0x812E, ALU(A::ShiftLeft)),
            (0x9AB0, SkipRegNotEqualReg),
            (0xABCD, SetIndexImm),
            (0xBCDE, JumpWithOffset),
            (0xCDEF, Random),
            (0xD125, Draw),
            (0xE39E, SkipIfPressed),
            (0xE3A1, SkipIfNotPressed),
            (0xF307, ReadDelayTimer),
            (0xF30A, WaitForKey),
            (0xF315, SetDelayTimer),
            (0xF318, SetSoundTimer),
            (0xF31E, AddIndexReg),
            (0xF329, FontChar),
            (0xF333, BCD),
            (0xF355, StoreRegs),
            (0xF365, LoadRegs),
        ];

        for (word, opcode) in cases {
            let definition = table.lookup(word).expect("definition");
            assert_eq!(definition.opcode, opcode, "{word:#06X}");
        }
    }

    #[test]
    fn rejects_words_outside_the_instruction_set() {
        let table = DispatchTable::chip8();
        for word in [0x5121, 0x8128, 0x800F, 0x9121, 0xE000, 0xE19F, 0xF0FF, 0xF100] {
            assert!(table.lookup(word).is_none(), "{word:#06X}");
        }
    }

    #[test]
    fn first_registered_match_wins() {
        let table = DispatchTable::new(vec![
            OperationDefinition::new("0NNN", Opcode::NativeCall, "broad"),
            OperationDefinition::new("00E0", Opcode::ClearDisplay, "narrow"),
        ]);
        assert_eq!(table.lookup(0x00E0).unwrap().description, "broad");

        let table = DispatchTable::new(vec![
            OperationDefinition::new("00E0", Opcode::ClearDisplay, "narrow"),
            OperationDefinition::new("0NNN", Opcode::NativeCall, "broad"),
        ]);
        assert_eq!(table.lookup(0x00E0).unwrap().description, "narrow");
        assert_eq!(table.lookup(0x00E1).unwrap().description, "broad");
    }

    #[test]
    fn wildcard_family_definitions_keep_their_position() {
        let table = DispatchTable::new(vec![
            OperationDefinition::new("1NNN", Opcode::Jump, "family"),
            OperationDefinition::new("XNN4", Opcode::Draw, "any family"),
            OperationDefinition::new("2NNN", Opcode::Call, "later family"),
        ]);
        assert_eq!(table.lookup(0x1004).unwrap().description, "family");
        assert_eq!(table.lookup(0x2004).unwrap().description, "any family");
        assert_eq!(table.lookup(0x2005).unwrap().description, "later family");
        assert_eq!(table.lookup(0x7774).unwrap().description, "any family");
        assert!(table.lookup(0x7775).is_none());
    }
}
