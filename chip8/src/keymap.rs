use sdl2::keyboard::Scancode;

/// Physical key positions, row by row, for keypad keys
/// ```text
/// |1|2|3|C|      |1|2|3|4|
/// |4|5|6|D|  <-  |Q|W|E|R|
/// |7|8|9|E|  <-  |A|S|D|F|
/// |A|0|B|F|      |Z|X|C|V|
/// ```
/// Positions are named after a US QWERTY board but match by location, so
/// the block stays put on other layouts.
#[rustfmt::skip]
const LAYOUT: [(Scancode, u8); 16] = [
    (Scancode::Num1, 0x1), (Scancode::Num2, 0x2), (Scancode::Num3, 0x3), (Scancode::Num4, 0xC),
    (Scancode::Q, 0x4),    (Scancode::W, 0x5),    (Scancode::E, 0x6),    (Scancode::R, 0xD),
    (Scancode::A, 0x7),    (Scancode::S, 0x8),    (Scancode::D, 0x9),    (Scancode::F, 0xE),
    (Scancode::Z, 0xA),    (Scancode::X, 0x0),    (Scancode::C, 0xB),    (Scancode::V, 0xF),
];

/// # Keymap
/// The keypad key at the physical position of `key`, if it is part of the block
pub fn keymap(key: Scancode) -> Option<u8> {
    LAYOUT
        .iter()
        .find(|(scancode, _)| *scancode == key)
        .map(|&(_, kc)| kc)
}
