//! Transport lane modes

/// Lane mode for a command
///
/// Lane configuration is fixed once per session outside this crate; the
/// mode here only tells the transport which phases use which lanes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IoMode {
    /// Standard SPI: 1-1-1 (cmd, addr, data all on single line)
    #[default]
    Single,
    /// Dual Output: 1-1-2 (data phase on 2 lines)
    DualOut,
    /// Dual I/O: 1-2-2 (addr and data on 2 lines)
    DualIo,
    /// Quad Output: 1-1-4 (data phase on 4 lines)
    QuadOut,
    /// Quad I/O: 1-4-4 (addr and data on 4 lines)
    QuadIo,
}

impl IoMode {
    /// Returns the number of data lines used for the address phase
    pub const fn addr_lines(&self) -> u8 {
        match self {
            Self::Single | Self::DualOut | Self::QuadOut => 1,
            Self::DualIo => 2,
            Self::QuadIo => 4,
        }
    }

    /// Returns the number of data lines used for the data phase
    pub const fn data_lines(&self) -> u8 {
        match self {
            Self::Single => 1,
            Self::DualOut | Self::DualIo => 2,
            Self::QuadOut | Self::QuadIo => 4,
        }
    }
}

use crate::error::{Error, Result};
use crate::programmer::SpiFeatures;

/// Check if a transport supports the requested I/O mode
///
/// Returns `Ok(())` if the mode is supported, or `Err(IoModeNotSupported)` if not.
pub fn check_io_mode_supported(mode: IoMode, features: SpiFeatures) -> Result<()> {
    let required = match mode {
        IoMode::Single => return Ok(()),
        IoMode::DualOut => SpiFeatures::DUAL_IN,
        IoMode::DualIo => SpiFeatures::DUAL_IO,
        IoMode::QuadOut => SpiFeatures::QUAD_IN,
        IoMode::QuadIo => SpiFeatures::QUAD_IO,
    };
    if features.contains(required) {
        Ok(())
    } else {
        Err(Error::IoModeNotSupported)
    }
}
