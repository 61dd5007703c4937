//! Runs small hand-assembled programs through the public API.

use chip8_vm::{
    emu::{Chip8Error, Chip8Result, Config, Cpu, FONT, FrameBuffer, Keypad, V0, VF},
    u4,
};

/// Reports no key until it has been polled `after` times, then `key` forever.
struct DelayedKey {
    after: usize,
    polls: usize,
    key: u4,
}

impl Keypad for DelayedKey {
    fn read_key(&mut self) -> Option<u4> {
        self.polls += 1;
        (self.polls > self.after).then_some(self.key)
    }
}

fn cpu_with(rom: &[u8], keypad: DelayedKey) -> Cpu<FrameBuffer, DelayedKey> {
    let config = Config {
        rng_seed: Some(1),
        ..Config::default()
    };
    let mut cpu = Cpu::with_config(FrameBuffer::new(), keypad, &config);
    cpu.load_program(rom).unwrap();
    cpu
}

fn no_key() -> DelayedKey {
    DelayedKey {
        after: usize::MAX,
        polls: 0,
        key: u4::new(0),
    }
}

#[rustfmt::skip]
const BCD_DIGITS: [u8; 40] = [
    0x6A, 0x7B, // 200: VA = 123
    0xA3, 0x00, // 202: I = 0x300
    0xFA, 0x33, // 204: BCD VA at I
    0xF2, 0x65, // 206: V0..V2 = digits
    0x63, 0x00, // 208: V3 = 0 (x)
    0x64, 0x00, // 20A: V4 = 0 (y)
    0x85, 0x00, // 20C: V5 = V0
    0x22, 0x20, // 20E: call draw_digit
    0x85, 0x10, // 210: V5 = V1
    0x22, 0x20, // 212: call draw_digit
    0x85, 0x20, // 214: V5 = V2
    0x22, 0x20, // 216: call draw_digit
    0x12, 0x18, // 218: jump to self
    0x00, 0x00, // 21A
    0x00, 0x00, // 21C
    0x00, 0x00, // 21E
    // draw_digit:
    0xF5, 0x29, // 220: I = glyph of V5
    0xD3, 0x45, // 222: draw at V3, V4
    0x73, 0x05, // 224: V3 += 5
    0x00, 0xEE, // 226: return
];

#[test]
fn draws_the_decimal_digits_of_a_register() {
    let mut cpu = cpu_with(&BCD_DIGITS, no_key());

    for _ in 0..40 {
        cpu.step().unwrap();
    }

    assert_eq!(cpu.pc(), 0x218);
    assert!(cpu.stack().is_empty());
    assert_eq!(cpu.memory().region(0x300, 3).unwrap(), &[1, 2, 3]);
    assert_eq!(cpu.registers().get(VF), 0);

    for (slot, digit) in [1usize, 2, 3].into_iter().enumerate() {
        let glyph = &FONT[digit * 5..digit * 5 + 5];
        for (row, &bits) in glyph.iter().enumerate() {
            // Glyphs only use the high nibble
            for col in 0..4 {
                let expected = bits & (0x80 >> col) != 0;
                assert_eq!(
                    cpu.screen().pixel(slot * 5 + col, row),
                    expected,
                    "digit {digit}"
                );
            }
        }
    }
}

#[rustfmt::skip]
const WAIT_FOR_KEY: [u8; 6] = [
    0xF0, 0x0A, // 200: V0 = key
    0x00, 0xE0, // 202: clear
    0x12, 0x04, // 204: jump to self
];

#[test]
fn blocks_on_key_until_pressed() {
    let keypad = DelayedKey {
        after: 5,
        polls: 0,
        key: u4::new(0xC),
    };
    let mut cpu = cpu_with(&WAIT_FOR_KEY, keypad);

    for _ in 0..5 {
        assert_eq!(cpu.step().unwrap(), Chip8Result::WaitForNextFrame);
        assert_eq!(cpu.pc(), 0x200);
    }

    assert_eq!(cpu.step().unwrap(), Chip8Result::Continue);
    assert_eq!(cpu.registers().get(V0), 0xC);
    assert_eq!(cpu.pc(), 0x202);
}

#[test]
fn halts_on_native_code_call() {
    #[rustfmt::skip]
    let rom = [
        0x60, 0x01, // 200: V0 = 1
        0x03, 0x00, // 202: SYS 0x300
    ];
    let mut cpu = cpu_with(&rom, no_key());

    cpu.step().unwrap();
    let err = cpu.step().unwrap_err();
    assert!(matches!(
        err,
        Chip8Error::UnsupportedInstruction {
            word: 0x0300,
            pc: 0x202
        }
    ));
    assert_eq!(err.to_string(), "Unsupported instruction 0x0300 at 0x202");
}
