//! Error related data structures.

use std::fmt::{self, Display, Formatter};

/// Top level enum for error handling within the core emulator crate.
///
/// Most of the time, you will want to use the `CustomError` variant
/// to provide a more detailed error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// ROM image is too small or not a multiple of the cartridge bank size.
    InvalidRom,
    /// A requested ROM or RAM bank index falls outside the cartridge's
    /// declared bank count.
    BankSize,
    /// The cartridge header declares a `RomType` this crate has no `Mbc`
    /// table for.
    UnknownCartridge,
    /// The header checksum at 0x014D does not match the computed value.
    InvalidChecksum,
    /// The CPU decoder fetched a byte with no entry in the opcode tables.
    UnhandledOpcode(u8),
    CustomError(String),
}

impl Error {
    pub fn description(&self) -> String {
        match self {
            Error::InvalidRom => String::from("Invalid ROM size"),
            Error::BankSize => String::from("Bank index out of range"),
            Error::UnknownCartridge => String::from("Unknown or unsupported cartridge type"),
            Error::InvalidChecksum => String::from("Invalid ROM header checksum"),
            Error::UnhandledOpcode(opcode) => {
                format!("Unhandled opcode 0x{:02x}", opcode)
            }
            Error::CustomError(message) => message.clone(),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl From<boytacean_common::error::Error> for Error {
    fn from(error: boytacean_common::error::Error) -> Self {
        Error::CustomError(error.description())
    }
}
