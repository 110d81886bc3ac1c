use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// # Screen
/// What the interpreter needs from a monochrome display.
///
/// Pixels are addressed linearly, row by row: `index = y * DISPLAY_WIDTH + x`.
/// Presenting the result is up to whoever owns the screen.
pub trait Screen {
    /// Turn every pixel off.
    fn clear(&mut self);

    /// Number of addressable pixels.
    fn size(&self) -> usize;

    /// Flip the pixel at `index`.
    /// Returns true if the pixel was on and is now off (a collision).
    fn toggle_pixel(&mut self, index: usize) -> bool;
}

/// The FrameBuffer is indexed as [y][x]; a pixel is on when it holds 1
pub type FrameBuffer = [[u8; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// A FrameBuffer with every pixel off
pub fn blank() -> FrameBuffer {
    [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT]
}

impl Screen for FrameBuffer {
    fn clear(&mut self) {
        *self = blank();
    }

    fn size(&self) -> usize {
        DISPLAY_WIDTH * DISPLAY_HEIGHT
    }

    fn toggle_pixel(&mut self, index: usize) -> bool {
        let pixel = &mut self[index / DISPLAY_WIDTH][index % DISPLAY_WIDTH];
        *pixel ^= 1;
        *pixel == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_is_whole_display() {
        assert_eq!(blank().size(), 2048);
    }

    #[test]
    fn test_toggle_on_is_not_a_collision() {
        let mut frame = blank();
        assert!(!frame.toggle_pixel(65));
        assert_eq!(frame[1][1], 1);
    }

    #[test]
    fn test_toggle_off_is_a_collision() {
        let mut frame = blank();
        frame[31][63] = 1;
        assert!(frame.toggle_pixel(2047));
        assert_eq!(frame[31][63], 0);
    }

    #[test]
    fn test_clear() {
        let mut frame = blank();
        frame[4][7] = 1;
        frame.clear();
        assert_eq!(frame, blank());
    }
}
