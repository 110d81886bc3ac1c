use crate::config::Variant;
use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, FLAG_REGISTER, SPRITE_HEIGHT, SPRITE_SHEET_START,
};
use crate::error::Fault;
use crate::instruction::Io;
use crate::opcode::Opcode;
use crate::state::State;

/// clear
pub fn clr(_op: &dyn Opcode, state: &mut State, io: &mut Io) -> Result<(), Fault> {
    io.screen.clear();
    state.draw_flag = true;
    Ok(())
}

/// PC = STACK.pop()
pub fn rts(_op: &dyn Opcode, state: &mut State, _io: &mut Io) -> Result<(), Fault> {
    state.pc = state.pop()?;
    Ok(())
}

/// PC = addr
pub fn jump(op: &dyn Opcode, state: &mut State, _io: &mut Io) -> Result<(), Fault> {
    state.pc = op.addr();
    Ok(())
}

/// STACK.push(PC); PC = addr
pub fn call(op: &dyn Opcode, state: &mut State, _io: &mut Io) -> Result<(), Fault> {
    state.push(state.pc)?;
    state.pc = op.addr();
    Ok(())
}

/// if Vx == kk then pc += 2
pub fn ske(op: &dyn Opcode, state: &mut State, _io: &mut Io) -> Result<(), Fault> {
    if state.v[op.x() as usize] == op.kk() {
        state.skip();
    }
    Ok(())
}

/// if Vx != kk then pc += 2
pub fn skne(op: &dyn Opcode, state: &mut State, _io: &mut Io) -> Result<(), Fault> {
    if state.v[op.x() as usize] != op.kk() {
        state.skip();
    }
    Ok(())
}

/// if Vx == Vy then pc += 2
pub fn skre(op: &dyn Opcode, state: &mut State, _io: &mut Io) -> Result<(), Fault> {
    reserved_nibble(op)?;
    if state.v[op.x() as usize] == state.v[op.y() as usize] {
        state.skip();
    }
    Ok(())
}

/// Vx = kk
pub fn load(op: &dyn Opcode, state: &mut State, _io: &mut Io) -> Result<(), Fault> {
    state.v[op.x() as usize] = op.kk();
    Ok(())
}

/// Vx += kk
/// Add kk to Vx; allow for overflow but implicitly drop it
pub fn add(op: &dyn Opcode, state: &mut State, _io: &mut Io) -> Result<(), Fault> {
    let x = op.x() as usize;
    state.v[x] = state.v[x].wrapping_add(op.kk());
    Ok(())
}

/// Vx = Vy
pub fn mv(op: &dyn Opcode, state: &mut State) {
    state.v[op.x() as usize] = state.v[op.y() as usize];
}

/// Vx |= Vy
pub fn or(op: &dyn Opcode, state: &mut State) {
    state.v[op.x() as usize] |= state.v[op.y() as usize];
}

/// Vx &= Vy
pub fn and(op: &dyn Opcode, state: &mut State) {
    state.v[op.x() as usize] &= state.v[op.y() as usize];
}

/// Vx ^= Vy
pub fn xor(op: &dyn Opcode, state: &mut State) {
    state.v[op.x() as usize] ^= state.v[op.y() as usize];
}

/// Vx += Vy; VF = overflow
pub fn addr(op: &dyn Opcode, state: &mut State) {
    let (res, over) = state.v[op.x() as usize].overflowing_add(state.v[op.y() as usize]);
    state.set_flag(over);
    state.v[op.x() as usize] = res;
}

/// Vx -= Vy; VF = !borrow
pub fn sub(op: &dyn Opcode, state: &mut State) {
    let (vx, vy) = (state.v[op.x() as usize], state.v[op.y() as usize]);
    state.set_flag(vx >= vy);
    state.v[op.x() as usize] = vx.wrapping_sub(vy);
}

/// Vx >>= 1; VF = shifted out bit
/// The original interpreter shifts Vy into Vx
pub fn shr(op: &dyn Opcode, state: &mut State) {
    let value = shift_source(op, state);
    state.set_flag(value & 0x1 == 0x1);
    state.v[op.x() as usize] = value >> 1;
}

/// Vx = Vy - Vx; VF = !borrow
pub fn subn(op: &dyn Opcode, state: &mut State) {
    let (vx, vy) = (state.v[op.x() as usize], state.v[op.y() as usize]);
    state.set_flag(vy >= vx);
    state.v[op.x() as usize] = vy.wrapping_sub(vx);
}

/// Vx <<= 1; VF = shifted out bit
/// The original interpreter shifts Vy into Vx
pub fn shl(op: &dyn Opcode, state: &mut State) {
    let value = shift_source(op, state);
    state.set_flag(value & 0x80 == 0x80);
    state.v[op.x() as usize] = value << 1;
}

/// Unassigned arithmetic opcodes do nothing
pub fn nop(_op: &dyn Opcode, _state: &mut State) {}

fn shift_source(op: &dyn Opcode, state: &mut State) -> u8 {
    if state.variant == Variant::Original {
        state.v[op.x() as usize] = state.v[op.y() as usize];
    }
    state.v[op.x() as usize]
}

/// if Vx != Vy then pc +=2
pub fn skrne(op: &dyn Opcode, state: &mut State, _io: &mut Io) -> Result<(), Fault> {
    reserved_nibble(op)?;
    if state.v[op.x() as usize] != state.v[op.y() as usize] {
        state.skip();
    }
    Ok(())
}

/// I = addr
pub fn loadi(op: &dyn Opcode, state: &mut State, _io: &mut Io) -> Result<(), Fault> {
    state.i = op.addr();
    Ok(())
}

/// PC = V0 + addr (original) or Vx + addr (modern)
pub fn jumpi(op: &dyn Opcode, state: &mut State, _io: &mut Io) -> Result<(), Fault> {
    let offset = match state.variant {
        Variant::Original => state.v[0x0],
        Variant::Modern => state.v[op.x() as usize],
    };
    state.pc = op.addr() + u16::from(offset);
    Ok(())
}

/// Vx = rand_byte & kk
pub fn rand(op: &dyn Opcode, state: &mut State, _io: &mut Io) -> Result<(), Fault> {
    let rand_byte = state.random_byte();
    state.v[op.x() as usize] = rand_byte & op.kk();
    Ok(())
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..n at position x, y on the screen.
/// The origin wraps around the screen but the sprite itself is clipped at its edges.
/// Sets VF if any pixels were erased
pub fn draw(op: &dyn Opcode, state: &mut State, io: &mut Io) -> Result<(), Fault> {
    let x = state.v[op.x() as usize] as usize % DISPLAY_WIDTH;
    let y = state.v[op.y() as usize] as usize % DISPLAY_HEIGHT;
    let height = op.n() as usize;

    let mut sprite = [0u8; 0xF];
    sprite[..height].copy_from_slice(state.read(state.i, height)?);

    // Reset the carry flag (used for collision detection)
    state.v[FLAG_REGISTER] = 0x0;

    let mut collision = false;
    for (row, &byte) in sprite[..height].iter().enumerate() {
        let py = y + row;
        if py >= DISPLAY_HEIGHT {
            break;
        }
        for col in 0..8 {
            let px = x + col;
            if px >= DISPLAY_WIDTH {
                break;
            }
            if byte & (0x80u8 >> col) == 0 {
                continue;
            }
            let index = py * DISPLAY_WIDTH + px;
            if index >= io.screen.size() {
                continue;
            }
            collision |= io.screen.toggle_pixel(index);
        }
    }

    state.set_flag(collision);
    state.draw_flag = true;
    Ok(())
}

/// if Vx.pressed then pc += 2
pub fn skpr(op: &dyn Opcode, state: &mut State, io: &mut Io) -> Result<(), Fault> {
    if io.keypad.is_pressed(key(op, state)?) {
        state.skip();
    }
    Ok(())
}

/// if !Vx.pressed then pc += 2
pub fn skup(op: &dyn Opcode, state: &mut State, io: &mut Io) -> Result<(), Fault> {
    if !io.keypad.is_pressed(key(op, state)?) {
        state.skip();
    }
    Ok(())
}

/// Vx = DT
pub fn moved(op: &dyn Opcode, state: &mut State, _io: &mut Io) -> Result<(), Fault> {
    state.v[op.x() as usize] = state.delay_timer;
    Ok(())
}

/// await keypress for Vx
/// Without a pressed key the pc is rewound so this instruction runs again next step
pub fn keyd(op: &dyn Opcode, state: &mut State, io: &mut Io) -> Result<(), Fault> {
    match io.keypad.any_pressed() {
        Some(key) => state.v[op.x() as usize] = key,
        None => state.pc = state.pc.wrapping_sub(2),
    }
    Ok(())
}

/// DT = Vx
pub fn loads(op: &dyn Opcode, state: &mut State, _io: &mut Io) -> Result<(), Fault> {
    state.delay_timer = state.v[op.x() as usize];
    Ok(())
}

/// ST = Vx
pub fn ld(op: &dyn Opcode, state: &mut State, _io: &mut Io) -> Result<(), Fault> {
    state.sound_timer = state.v[op.x() as usize];
    Ok(())
}

/// I += Vx; VF = 1 on overflow, otherwise untouched
pub fn addi(op: &dyn Opcode, state: &mut State, _io: &mut Io) -> Result<(), Fault> {
    let (sum, over) = state.i.overflowing_add(u16::from(state.v[op.x() as usize]));
    if over {
        state.set_flag(true);
    }
    state.i = sum;
    Ok(())
}

/// I = SPRITE_SHEET_START + Vx * 5
/// Set I to the memory address of the sprite for Vx
/// See constants::SPRITE_SHEET for more details
pub fn ldspr(op: &dyn Opcode, state: &mut State, _io: &mut Io) -> Result<(), Fault> {
    state.i = SPRITE_SHEET_START + u16::from(state.v[op.x() as usize]) * SPRITE_HEIGHT;
    Ok(())
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
pub fn bcd(op: &dyn Opcode, state: &mut State, _io: &mut Io) -> Result<(), Fault> {
    let value = state.v[op.x() as usize];
    let bcd = [value / 100 % 10, value / 10 % 10, value % 10];
    state.write(state.i, 3)?.copy_from_slice(&bcd);
    Ok(())
}

/// mem[I..=I+x] = V0..=Vx
pub fn stor(op: &dyn Opcode, state: &mut State, _io: &mut Io) -> Result<(), Fault> {
    let count = op.x() as usize + 1;
    let v = state.v;
    state.write(state.i, count)?.copy_from_slice(&v[..count]);
    Ok(())
}

/// V0..=Vx = mem[I..=I+x]
pub fn read(op: &dyn Opcode, state: &mut State, _io: &mut Io) -> Result<(), Fault> {
    let count = op.x() as usize + 1;
    let mut v = state.v;
    v[..count].copy_from_slice(state.read(state.i, count)?);
    state.v = v;
    Ok(())
}

/// The key number held in Vx, which must name one of the 16 keys
fn key(op: &dyn Opcode, state: &State) -> Result<u8, Fault> {
    let key = state.v[op.x() as usize];
    if key > 0xF {
        Err(Fault::InvalidKey {
            opcode: op.raw(),
            key,
        })
    } else {
        Ok(key)
    }
}

/// Register comparisons reserve their last nibble; it must be 0
fn reserved_nibble(op: &dyn Opcode) -> Result<(), Fault> {
    if op.n() != 0x0 {
        Err(Fault::ReservedNibble { opcode: op.raw() })
    } else {
        Ok(())
    }
}
