use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{Config, Variant};
use crate::constants::{
    FLAG_REGISTER, MAX_ROM_SIZE, MEMORY_SIZE, PROGRAM_START, SPRITE_SHEET, SPRITE_SHEET_START,
    STACK_DEPTH,
};
use crate::error::Fault;

/// The Chip-8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is also the carry/borrow/collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Pointer
/// - (sp) number of return addresses currently on the stack
///
/// Timers
/// - 2 8-bit timers (delay & sound)
/// - both are decremented once per executed instruction, never below 0
///
/// ## Memory
/// - 16 entry stack
///     - stores return addresses when subroutines are called
/// - 4096 bytes of addressable memory
///     - 0x050..0x0A0 holds the sprite sheet
///     - 0x200.. holds the loaded ROM
///
/// ## Display
/// - `draw_flag` is raised by any instruction that changed the screen
#[derive(Clone)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_DEPTH],
    pub memory: [u8; MEMORY_SIZE],
    pub draw_flag: bool,
    pub variant: Variant,
    rng: StdRng,
}

impl State {
    pub fn new(config: Config) -> Self {
        State::with_rng(config, StdRng::from_entropy())
    }

    /// A State whose random numbers are reproducible
    pub fn with_seed(config: Config, seed: u64) -> Self {
        State::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: Config, rng: StdRng) -> Self {
        let mut memory = [0; MEMORY_SIZE];
        let start = SPRITE_SHEET_START as usize;
        memory[start..start + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);

        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_DEPTH],
            memory,
            draw_flag: false,
            variant: config.variant,
            rng,
        }
    }

    /// Copy a ROM image into memory at `PROGRAM_START`
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), Fault> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Fault::RomTooLarge {
                size: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }
        let start = PROGRAM_START as usize;
        self.memory[start..start + rom.len()].copy_from_slice(rom);
        Ok(())
    }

    /// Reads the opcode pointed at by the pc and advances the pc past it.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    pub fn fetch(&mut self) -> Result<u16, Fault> {
        let bytes = self.read(self.pc, 2)?;
        let op = u16::from(bytes[0]) << 8 | u16::from(bytes[1]);
        self.pc = self.pc.wrapping_add(2);
        Ok(op)
    }

    /// Borrow `len` bytes of memory starting at `addr`
    pub fn read(&self, addr: u16, len: usize) -> Result<&[u8], Fault> {
        let (start, end) = State::bounds(addr, len)?;
        Ok(&self.memory[start..end])
    }

    /// Mutably borrow `len` bytes of memory starting at `addr`
    pub fn write(&mut self, addr: u16, len: usize) -> Result<&mut [u8], Fault> {
        let (start, end) = State::bounds(addr, len)?;
        Ok(&mut self.memory[start..end])
    }

    fn bounds(addr: u16, len: usize) -> Result<(usize, usize), Fault> {
        let start = addr as usize;
        let end = start + len;
        if end > MEMORY_SIZE {
            Err(Fault::AddressOutOfRange {
                address: start.max(MEMORY_SIZE),
            })
        } else {
            Ok((start, end))
        }
    }

    /// STACK.push(addr)
    pub fn push(&mut self, addr: u16) -> Result<(), Fault> {
        if self.sp as usize == STACK_DEPTH {
            return Err(Fault::StackOverflow { depth: STACK_DEPTH });
        }
        self.stack[self.sp as usize] = addr;
        self.sp += 1;
        Ok(())
    }

    /// STACK.pop()
    pub fn pop(&mut self) -> Result<u16, Fault> {
        if self.sp == 0 {
            return Err(Fault::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.stack[self.sp as usize])
    }

    /// pc += 2
    pub fn skip(&mut self) {
        self.pc = self.pc.wrapping_add(2);
    }

    pub fn set_flag(&mut self, set: bool) {
        self.v[FLAG_REGISTER] = set as u8;
    }

    pub fn random_byte(&mut self) -> u8 {
        self.rng.gen()
    }

    /// Decrements both timers, stopping at 0
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }
}
