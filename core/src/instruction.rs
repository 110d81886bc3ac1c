use crate::error::Fault;
use crate::keypad::Keypad;
use crate::opcode::Opcode;
use crate::operations::*;
use crate::screen::Screen;
use crate::state::State;

/// The peripherals an instruction may touch while it executes
pub struct Io<'a> {
    pub screen: &'a mut dyn Screen,
    pub keypad: &'a dyn Keypad,
}

/// Executes a single decoded opcode
pub type Instruction = fn(op: &dyn Opcode, state: &mut State, io: &mut Io) -> Result<(), Fault>;

/// Executes an `8XYn` opcode; these only ever touch registers
pub type Arithmetic = fn(op: &dyn Opcode, state: &mut State);

/// Handlers indexed by an opcode's family (its most significant nibble)
const FAMILIES: [Instruction; 16] = [
    sys, jump, call, ske, skne, skre, load, add, arithmetic, skrne, loadi, jumpi, rand, draw,
    keys, misc,
];

/// `8XYn` handlers indexed by n
const ARITHMETIC: [Arithmetic; 16] = [
    mv, or, and, xor, addr, sub, shr, subn, nop, nop, nop, nop, nop, nop, shl, nop,
];

/// Selects the correct Instruction for a given Opcode
pub fn from_op(op: &dyn Opcode) -> Instruction {
    FAMILIES[op.family() as usize]
}

/// `0nnn`: only 00E0 and 00EE do anything
fn sys(op: &dyn Opcode, state: &mut State, io: &mut Io) -> Result<(), Fault> {
    match op.raw() {
        0x00E0 => clr(op, state, io),
        0x00EE => rts(op, state, io),
        _ => Ok(()),
    }
}

fn arithmetic(op: &dyn Opcode, state: &mut State, _io: &mut Io) -> Result<(), Fault> {
    ARITHMETIC[op.n() as usize](op, state);
    Ok(())
}

fn keys(op: &dyn Opcode, state: &mut State, io: &mut Io) -> Result<(), Fault> {
    match op.kk() {
        0x9E => skpr(op, state, io),
        0xA1 => skup(op, state, io),
        _ => Err(Fault::UnknownOpcode { opcode: op.raw() }),
    }
}

fn misc(op: &dyn Opcode, state: &mut State, io: &mut Io) -> Result<(), Fault> {
    match op.kk() {
        0x07 => moved(op, state, io),
        0x0A => keyd(op, state, io),
        0x15 => loads(op, state, io),
        0x18 => ld(op, state, io),
        0x1E => addi(op, state, io),
        0x29 => ldspr(op, state, io),
        0x33 => bcd(op, state, io),
        0x55 => stor(op, state, io),
        0x65 => read(op, state, io),
        _ => Err(Fault::UnknownOpcode { opcode: op.raw() }),
    }
}
