pub use chip8::Chip8;
pub use config::{Config, Variant};
pub use constants::FRAME_RATE;
pub use error::Fault;
pub use keypad::{KeyState, Keypad};
pub use screen::{FrameBuffer, Screen};

mod chip8;
pub mod config;
pub mod constants;
mod error;
mod instruction;
pub mod keypad;
mod opcode;
mod operations;
pub mod screen;
pub mod state;
