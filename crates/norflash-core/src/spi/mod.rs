//! SPI types and command structures
//!
//! This module provides types for representing single transport
//! transactions, lane modes, and the opcode constants of the supported
//! device family.

mod address;
mod command;
mod io_mode;
pub mod opcodes;

pub use address::AddressWidth;
pub use command::SpiCommand;
pub use io_mode::{check_io_mode_supported, IoMode};
pub use opcodes::*;
