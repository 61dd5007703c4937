use log::{debug, trace, warn};
use rand::{SeedableRng, rngs::StdRng};

use super::{
    Chip8Error, Chip8Result, Clock, Config, DispatchTable, IRegister, Instruction, Keypad, Memory,
    Operand, ROM_START_ADDRESS, Registers, Screen, SystemClock, TimerRegister,
};

/// CHIP-8 virtual machine state.
///
/// The screen and keypad are built by the caller and moved in; the CPU owns
/// everything else.
pub struct Cpu<S, K> {
    /// 4KB memory with the font preloaded
    pub(crate) memory: Memory,

    /// Program counter: address of the next instruction to execute
    pub(crate) pc: u16,
    /// General-purpose registers V0-VF (VF is used as a flag register)
    pub(crate) v: Registers,
    /// Index register: used for memory operations
    pub(crate) i: IRegister,
    /// Return addresses of the unreturned subroutine calls
    pub(crate) stack: Vec<u16>,
    stack_limit: Option<usize>,

    pub(crate) delay_timer: TimerRegister,
    /// Counts down like the delay timer. Nothing is played while it runs.
    pub(crate) sound_timer: TimerRegister,
    clock: Box<dyn Clock>,

    pub(crate) screen: S,
    pub(crate) keypad: K,

    pub(crate) rng: StdRng,
    table: DispatchTable,
}

impl<S: Screen, K: Keypad> Cpu<S, K> {
    pub fn new(screen: S, keypad: K) -> Self {
        Self::with_config(screen, keypad, &Config::default())
    }

    pub fn with_config(screen: S, keypad: K, config: &Config) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let period = config.timer_period();

        Cpu {
            memory: Memory::new(),
            pc: ROM_START_ADDRESS as u16,
            v: Registers::new(),
            i: IRegister::default(),
            stack: Vec::new(),
            stack_limit: config.stack_limit,
            delay_timer: TimerRegister::with_period(period),
            sound_timer: TimerRegister::with_period(period),
            clock: Box::new(SystemClock),
            screen,
            keypad,
            rng,
            table: DispatchTable::chip8(),
        }
    }

    /// Replaces the clock the timers sample.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Loads a ROM into memory at 0x200.
    pub fn load_program(&mut self, rom: &[u8]) -> Result<(), Chip8Error> {
        self.memory.load(rom)
    }

    /// Executes a single CPU cycle (fetch, decode, execute).
    pub fn step(&mut self) -> Result<Chip8Result, Chip8Error> {
        let word = self.fetch()?;
        self.execute_word(word)
    }

    /// Fetches the 16-bit instruction at the program counter.
    pub fn fetch(&self) -> Result<u16, Chip8Error> {
        trace!("Fetching instruction from {:#05X}", self.pc);
        self.memory.read_word(self.pc)
    }

    /// Decodes and executes one instruction word as if it had been fetched
    /// at the current program counter.
    pub fn execute_word(&mut self, word: u16) -> Result<Chip8Result, Chip8Error> {
        trace!("V Registers: {:02X?}", self.v.values());
        trace!("I Register: {:#05X}", self.i.get());
        trace!("Stack: {:03X?}", self.stack);

        let Some(definition) = self.table.lookup(word) else {
            warn!("No instruction for {word:#06X} at {:#05X}", self.pc);
            return Err(Chip8Error::UnsupportedInstruction { word, pc: self.pc });
        };
        debug!(
            "Executing instruction for {}, with data {word:#06X} - {}",
            definition.pattern, definition.description
        );

        let opcode = definition.opcode;
        self.execute(opcode, Instruction::decode(word))
    }

    /// Pushes the current program counter onto the call stack.
    pub fn push_stack(&mut self) -> Result<(), Chip8Error> {
        if let Some(limit) = self.stack_limit
            && self.stack.len() >= limit
        {
            return Err(Chip8Error::StackOverflow { pc: self.pc, limit });
        }

        self.stack.push(self.pc);
        Ok(())
    }

    /// Pops the most recent return address into the program counter.
    pub fn pop_stack(&mut self) -> Result<(), Chip8Error> {
        self.pc = self
            .stack
            .pop()
            .ok_or(Chip8Error::StackUnderflow { pc: self.pc })?;
        Ok(())
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Moves the program counter. Callers must keep it even-aligned.
    pub fn set_pc(&mut self, pc: u16) {
        self.pc = pc;
    }

    pub fn registers(&self) -> &Registers {
        &self.v
    }

    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.v
    }

    pub fn i(&self) -> u16 {
        self.i.get()
    }

    pub fn set_i(&mut self, value: impl Operand) {
        self.i.set(value);
    }

    pub fn stack(&self) -> &[u16] {
        &self.stack
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// Current delay timer value, sampled from the clock.
    pub fn delay_timer(&self) -> u8 {
        self.delay_timer.get(self.clock.now())
    }

    /// Current sound timer value, sampled from the clock.
    pub fn sound_timer(&self) -> u8 {
        self.sound_timer.get(self.clock.now())
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut S {
        &mut self.screen
    }

    pub fn keypad(&self) -> &K {
        &self.keypad
    }

    pub fn keypad_mut(&mut self) -> &mut K {
        &mut self.keypad
    }

    pub(crate) fn now(&self) -> std::time::Instant {
        self.clock.now()
    }
}
