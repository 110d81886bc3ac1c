use std::fmt;

use log::{debug, trace};

use crate::config::Config;
use crate::error::Fault;
use crate::instruction::{from_op, Io};
use crate::keypad::Keypad;
use crate::screen::Screen;
use crate::state::State;

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - the `screen` sprites are drawn to
///  - the `keypad` that is polled for key presses
///
/// The screen and keypad are owned here so the interpreter is the only thing
/// touching them while it runs; whoever drives it reaches them through
/// `screen()` and `keypad_mut()` between steps.
///
/// Supplies interfaces for:
/// - loading a rom at construction
/// - advancing the CPU (and its timers) by a single instruction
/// - asking whether the last instruction changed the screen
pub struct Chip8<S: Screen, K: Keypad> {
    state: State,
    screen: S,
    keypad: K,
}

impl<S: Screen, K: Keypad> Chip8<S, K> {
    /// Creates a Chip-8 with `rom` loaded and ready to run from 0x200
    ///
    /// # Arguments
    /// * `rom` the raw program image
    /// * `screen` where sprites are drawn; cleared before use
    /// * `keypad` queried by the key instructions
    /// * `config` quirk selection
    pub fn new(rom: &[u8], screen: S, keypad: K, config: Config) -> Result<Self, Fault> {
        Chip8::from_state(State::new(config), rom, screen, keypad)
    }

    /// Like `new`, but with reproducible random numbers
    pub fn with_seed(
        rom: &[u8],
        screen: S,
        keypad: K,
        config: Config,
        seed: u64,
    ) -> Result<Self, Fault> {
        Chip8::from_state(State::with_seed(config, seed), rom, screen, keypad)
    }

    fn from_state(mut state: State, rom: &[u8], mut screen: S, keypad: K) -> Result<Self, Fault> {
        state.load_rom(rom)?;
        screen.clear();
        debug!(
            "loaded {} byte ROM ({} quirks)",
            rom.len(),
            state.variant
        );
        Ok(Chip8 {
            state,
            screen,
            keypad,
        })
    }

    /// Advances the CPU by a single cycle
    /// - fetches the opcode at pc and moves pc past it
    /// - dispatches and executes it
    /// - decrements both timers
    ///
    /// A fault leaves the timers untouched; the program should not be resumed.
    pub fn step(&mut self) -> Result<(), Fault> {
        self.state.draw_flag = false;

        let pc = self.state.pc;
        let op = self.state.fetch()?;
        trace!(
            "{}",
            Executed {
                pc,
                op,
                state: &self.state
            }
        );

        let mut io = Io {
            screen: &mut self.screen,
            keypad: &self.keypad,
        };
        from_op(&op)(&op, &mut self.state, &mut io)?;

        self.state.tick_timers();
        Ok(())
    }

    /// Whether the last step changed the screen
    pub fn should_redraw(&self) -> bool {
        self.state.draw_flag
    }

    /// Registers, memory and timers, for inspection
    pub fn state(&self) -> &State {
        &self.state
    }

    /// The screen, for presenting between steps
    pub fn screen(&self) -> &S {
        &self.screen
    }

    /// The keypad, for reporting host key presses between steps
    pub fn keypad_mut(&mut self) -> &mut K {
        &mut self.keypad
    }
}

/// An instruction as it is about to execute, formatted for the trace log
/// as `pc op v[..] i`
struct Executed<'a> {
    pc: u16,
    op: u16,
    state: &'a State,
}

impl fmt::Display for Executed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:04X} {:04X} v{:02X?} i{:04X}",
            self.pc, self.op, self.state.v, self.state.i
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variant;
    use crate::constants::STACK_DEPTH;
    use crate::keypad::KeyState;
    use crate::screen::{blank, FrameBuffer};

    fn rom(ops: &[u16]) -> Vec<u8> {
        ops.iter().flat_map(|op| op.to_be_bytes().to_vec()).collect()
    }

    fn chip8(ops: &[u16]) -> Chip8<FrameBuffer, KeyState> {
        Chip8::with_seed(&rom(ops), blank(), KeyState::new(), Config::default(), 0).unwrap()
    }

    fn run(chip8: &mut Chip8<FrameBuffer, KeyState>, steps: usize) {
        for _ in 0..steps {
            chip8.step().unwrap();
        }
    }

    #[test]
    fn test_step_advances_pc() {
        let mut chip8 = chip8(&[0x00E0]);
        chip8.step().unwrap();
        assert_eq!(chip8.state().pc, 0x202);
    }

    #[test]
    fn test_trace_line_shows_address_of_executed_instruction() {
        let mut chip8 = chip8(&[0x6005, 0x00E0]);
        chip8.step().unwrap();
        let line = Executed {
            pc: 0x202,
            op: 0x00E0,
            state: chip8.state(),
        }
        .to_string();
        assert!(line.starts_with("0202 00E0 v[05, 00,"));
        assert!(line.ends_with("i0000"));
    }

    #[test]
    fn test_new_clears_screen() {
        let mut screen = blank();
        screen[3][3] = 1;
        let chip8 = Chip8::new(&[], screen, KeyState::new(), Config::default()).unwrap();
        assert_eq!(*chip8.screen(), blank());
    }

    #[test]
    fn test_new_rejects_oversized_rom() {
        let result = Chip8::new(&[0; 3585], blank(), KeyState::new(), Config::default());
        assert_eq!(
            result.err(),
            Some(Fault::RomTooLarge {
                size: 3585,
                max: 3584
            })
        );
    }

    #[test]
    fn test_step_ticks_timers() {
        // V0 = 3; DT = V0; ST = V0
        let mut chip8 = chip8(&[0x6003, 0xF015, 0xF018, 0x0000]);
        run(&mut chip8, 3);
        // the ST write happened this step, DT has been ticked twice
        assert_eq!(chip8.state().delay_timer, 1);
        assert_eq!(chip8.state().sound_timer, 2);
        run(&mut chip8, 1);
        assert_eq!(chip8.state().delay_timer, 0);
        assert_eq!(chip8.state().sound_timer, 1);
    }

    #[test]
    fn test_fault_is_surfaced() {
        let mut chip8 = chip8(&[0x00EE]);
        assert_eq!(chip8.step(), Err(Fault::StackUnderflow));
    }

    #[test]
    fn test_fault_leaves_timers_untouched() {
        let mut chip8 = chip8(&[0x6005, 0xF015, 0xF0FF]);
        run(&mut chip8, 2);
        assert_eq!(chip8.state().delay_timer, 4);
        assert!(chip8.step().is_err());
        assert_eq!(chip8.state().delay_timer, 4);
    }

    #[test]
    fn test_call_then_return_resumes_after_call() {
        // 0x200: CALL 0x206; 0x202: JP 0x202; 0x204: padding; 0x206: RET
        let mut chip8 = chip8(&[0x2206, 0x1202, 0x0000, 0x00EE]);
        chip8.step().unwrap();
        assert_eq!(chip8.state().pc, 0x206);
        assert_eq!(chip8.state().sp, 1);
        chip8.step().unwrap();
        assert_eq!(chip8.state().pc, 0x202);
        assert_eq!(chip8.state().sp, 0);
    }

    #[test]
    fn test_unbounded_recursion_overflows() {
        // 0x200: CALL 0x200
        let mut chip8 = chip8(&[0x2200]);
        run(&mut chip8, STACK_DEPTH);
        assert_eq!(
            chip8.step(),
            Err(Fault::StackOverflow { depth: STACK_DEPTH })
        );
    }

    #[test]
    fn test_skip_advances_four_when_equal() {
        let mut chip8 = chip8(&[0x3000]);
        chip8.step().unwrap();
        assert_eq!(chip8.state().pc, 0x204);
    }

    #[test]
    fn test_skip_advances_two_when_not_equal() {
        let mut chip8 = chip8(&[0x3001]);
        chip8.step().unwrap();
        assert_eq!(chip8.state().pc, 0x202);
    }

    #[test]
    fn test_draws_digit_zero() {
        let mut chip8 = chip8(&[0xA050, 0xD005]);
        run(&mut chip8, 2);
        assert!(chip8.should_redraw());
        assert_eq!(chip8.state().v[0xF], 0);

        let on: usize = chip8
            .screen()
            .iter()
            .map(|row| row.iter().filter(|&&p| p == 1).count())
            .sum();
        // 4 + 2 + 2 + 2 + 4
        assert_eq!(on, 14);
        let glyph = [0xF0u8, 0x90, 0x90, 0x90, 0xF0];
        for (y, bits) in glyph.iter().enumerate() {
            for x in 0..8 {
                let expected = (bits >> (7 - x)) & 1;
                assert_eq!(chip8.screen()[y][x], expected);
            }
        }
    }

    #[test]
    fn test_double_draw_restores_screen_and_reports_collision() {
        // I = glyph 8; draw at (10, 10) twice
        let mut chip8 = chip8(&[0x600A, 0x610A, 0xA078, 0xD015, 0xD015]);
        run(&mut chip8, 4);
        let drawn = *chip8.screen();
        assert_ne!(drawn, blank());
        assert_eq!(chip8.state().v[0xF], 0);
        run(&mut chip8, 1);
        assert_eq!(*chip8.screen(), blank());
        assert_eq!(chip8.state().v[0xF], 1);
    }

    #[test]
    fn test_draw_flag_only_set_by_screen_instructions() {
        let mut chip8 = chip8(&[0x00E0, 0x6001]);
        chip8.step().unwrap();
        assert!(chip8.should_redraw());
        chip8.step().unwrap();
        assert!(!chip8.should_redraw());
    }

    #[test]
    fn test_add_then_skip() {
        // V0 = 5; V0 += 3; skip if V0 == 8; JP 0x200; JP 0x208
        let mut chip8 = chip8(&[0x6005, 0x7003, 0x3008, 0x1200, 0x1208]);
        run(&mut chip8, 2);
        assert_eq!(chip8.state().v[0x0], 8);
        chip8.step().unwrap();
        assert_eq!(chip8.state().pc, 0x208);
    }

    #[test]
    fn test_waits_for_key() {
        // V1 = key; V2 = 1
        let mut chip8 = chip8(&[0xF10A, 0x6201]);
        run(&mut chip8, 3);
        assert_eq!(chip8.state().pc, 0x200);

        chip8.keypad_mut().press(0x7);
        run(&mut chip8, 2);
        assert_eq!(chip8.state().v[0x1], 0x7);
        assert_eq!(chip8.state().v[0x2], 0x1);
    }

    #[test]
    fn test_timers_decay_while_waiting_for_key() {
        // V0 = 10; DT = V0; V1 = key
        let mut chip8 = chip8(&[0x600A, 0xF015, 0xF10A]);
        run(&mut chip8, 2 + 5);
        assert_eq!(chip8.state().delay_timer, 4);
    }

    #[test]
    fn test_skip_if_key_uses_keypad() {
        // V0 = 0xC; skip if key C pressed
        let mut chip8 = chip8(&[0x600C, 0xE09E]);
        chip8.keypad_mut().press(0xC);
        run(&mut chip8, 2);
        assert_eq!(chip8.state().pc, 0x206);
    }

    #[test]
    fn test_original_variant_jump_with_offset() {
        // V0 = 4; VA = 8; JP V0, 0xA10
        let rom = rom(&[0x6004, 0x6A08, 0xBA10]);
        let config = Config::new(Variant::Original);
        let mut chip8 = Chip8::with_seed(&rom, blank(), KeyState::new(), config, 0).unwrap();
        run(&mut chip8, 3);
        assert_eq!(chip8.state().pc, 0xA14);
    }

    #[test]
    fn test_fetch_off_the_end_of_memory() {
        // JP 0xFFF
        let mut chip8 = chip8(&[0x1FFF]);
        chip8.step().unwrap();
        assert_eq!(
            chip8.step(),
            Err(Fault::AddressOutOfRange { address: 0x1000 })
        );
    }
}
