/// # Keypad
/// What the interpreter needs to know about the 16-key hexadecimal keypad.
///
/// ```text
/// |1|2|3|C|
/// |4|5|6|D|
/// |7|8|9|E|
/// |A|0|B|F|
/// ```
pub trait Keypad {
    /// Whether `key` (0x0..=0xF) is currently held.
    fn is_pressed(&self, key: u8) -> bool;

    /// Some currently held key, if any.
    fn any_pressed(&self) -> Option<u8>;
}

/// Pressed status of every key, updated by whoever polls the host keyboard.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct KeyState {
    pressed: [bool; 16],
}

impl KeyState {
    pub fn new() -> Self {
        KeyState::default()
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 4-bit representation of the key that was pressed
    pub fn press(&mut self, key: u8) {
        self.pressed[(key & 0xF) as usize] = true;
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 4-bit representation of the key that was released
    pub fn release(&mut self, key: u8) {
        self.pressed[(key & 0xF) as usize] = false;
    }
}

impl Keypad for KeyState {
    fn is_pressed(&self, key: u8) -> bool {
        self.pressed.get(key as usize).copied().unwrap_or(false)
    }

    /// The lowest-numbered held key
    fn any_pressed(&self) -> Option<u8> {
        self.pressed.iter().position(|&p| p).map(|key| key as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release() {
        let mut keys = KeyState::new();
        keys.press(0xA);
        assert!(keys.is_pressed(0xA));
        keys.release(0xA);
        assert!(!keys.is_pressed(0xA));
    }

    #[test]
    fn test_out_of_range_key_is_never_pressed() {
        let keys = KeyState::new();
        assert!(!keys.is_pressed(0x10));
    }

    #[test]
    fn test_any_pressed_reports_lowest_key() {
        let mut keys = KeyState::new();
        assert_eq!(keys.any_pressed(), None);
        keys.press(0xE);
        keys.press(0x3);
        assert_eq!(keys.any_pressed(), Some(0x3));
    }
}
