use thiserror::Error;

/// A malformed program was encountered.
///
/// Real hardware has no notion of these; they exist so that a broken ROM stops
/// the interpreter with a cause instead of silently running garbage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("returned from a subroutine with an empty call stack")]
    StackUnderflow,

    #[error("call stack exceeded {depth} nested subroutines")]
    StackOverflow { depth: usize },

    #[error("opcode {opcode:#06X} must have 0x0 as its last nibble")]
    ReservedNibble { opcode: u16 },

    #[error("opcode {opcode:#06X} referenced invalid key {key:#04X}")]
    InvalidKey { opcode: u16, key: u8 },

    #[error("unknown opcode {opcode:#06X}")]
    UnknownOpcode { opcode: u16 },

    #[error("memory access out of bounds at address {address:#06X}")]
    AddressOutOfRange { address: usize },

    #[error("ROM is too large ({size} bytes), max size is {max} bytes")]
    RomTooLarge { size: usize, max: usize },
}
