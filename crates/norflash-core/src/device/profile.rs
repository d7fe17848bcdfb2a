//! Device model descriptions

use core::fmt;

use crate::error::{Error, Result};
use crate::spi::{opcodes, AddressWidth, IoMode};

/// Recognized device models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeviceModel {
    /// Macronix MX25R6435F, 64 Mbit ultra low power
    Mx25r6435f,
    /// Micron N25Q128A, 128 Mbit
    N25q128a,
}

impl DeviceModel {
    /// All recognized models
    pub const ALL: [DeviceModel; 2] = [DeviceModel::Mx25r6435f, DeviceModel::N25q128a];

    /// Vendor part name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Mx25r6435f => "MX25R6435F",
            Self::N25q128a => "N25Q128A",
        }
    }

    /// Look a model up by part name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(name))
    }

    /// The built-in profile for this model
    pub const fn profile(&self) -> DeviceProfile {
        match self {
            Self::Mx25r6435f => DeviceProfile::MX25R6435F,
            Self::N25q128a => DeviceProfile::N25Q128A,
        }
    }
}

impl fmt::Display for DeviceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Opcode for every command role the protocol layer issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpcodeTable {
    /// Read status register
    pub read_status: u8,
    /// Write status register (status + configuration image)
    pub write_status: u8,
    /// Read configuration register
    pub read_config: u8,
    /// Reset enable
    pub reset_enable: u8,
    /// Reset
    pub reset: u8,
    /// Write enable
    pub write_enable: u8,
    /// Sector erase
    pub sector_erase: u8,
    /// Page program
    pub page_program: u8,
    /// Plain read, no dummy cycles
    pub read: u8,
    /// Fast read
    pub fast_read: u8,
}

impl OpcodeTable {
    /// Macronix command set
    pub const MACRONIX: OpcodeTable = OpcodeTable {
        read_status: opcodes::RDSR,
        write_status: opcodes::WRSR,
        read_config: opcodes::RDCR_15,
        reset_enable: opcodes::RSTEN,
        reset: opcodes::RST,
        write_enable: opcodes::WREN,
        sector_erase: opcodes::SE_20,
        page_program: opcodes::PP,
        read: opcodes::READ,
        fast_read: opcodes::FAST_READ,
    };

    /// Micron command set; only the configuration read differs
    pub const MICRON: OpcodeTable = OpcodeTable {
        read_config: opcodes::RDCR_35,
        ..Self::MACRONIX
    };
}

/// Command used for range reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadMode {
    /// Read opcode
    pub opcode: u8,
    /// Lane mode of the read
    pub io_mode: IoMode,
    /// Dummy cycles between address and data
    pub dummy_cycles: u8,
}

impl ReadMode {
    /// Single-lane fast read with 8 dummy cycles
    pub const FAST_READ: ReadMode = ReadMode {
        opcode: opcodes::FAST_READ,
        io_mode: IoMode::Single,
        dummy_cycles: 8,
    };
}

/// Location of the high-performance switch
///
/// The bit lives in the second configuration byte, which is the third
/// byte of the status+configuration image written by the status write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HighPerformanceBit {
    /// Bit mask within configuration byte 2
    pub mask: u8,
}

/// Everything the protocol layer needs to know about a device model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceProfile {
    /// Device model
    pub model: DeviceModel,
    /// Capacity in bytes
    pub total_size: u32,
    /// Program granularity; no program command may cross a page boundary
    pub page_size: u32,
    /// Erase granularity
    pub sector_size: u32,
    /// Command opcodes
    pub opcodes: OpcodeTable,
    /// Range read command
    pub read_mode: ReadMode,
    /// High-performance switch, if the model has one
    pub high_performance: Option<HighPerformanceBit>,
}

impl DeviceProfile {
    /// MX25R6435F: 8 MiB, 256-byte pages, 4 KiB sectors
    pub const MX25R6435F: DeviceProfile = DeviceProfile {
        model: DeviceModel::Mx25r6435f,
        total_size: 8 * 1024 * 1024,
        page_size: 256,
        sector_size: 4096,
        opcodes: OpcodeTable::MACRONIX,
        read_mode: ReadMode::FAST_READ,
        high_performance: Some(HighPerformanceBit {
            mask: opcodes::MX25R_CR2_LH_SWITCH,
        }),
    };

    /// N25Q128A: 16 MiB, 256-byte pages, 4 KiB subsectors
    pub const N25Q128A: DeviceProfile = DeviceProfile {
        model: DeviceModel::N25q128a,
        total_size: 16 * 1024 * 1024,
        page_size: 256,
        sector_size: 4096,
        opcodes: OpcodeTable::MICRON,
        read_mode: ReadMode::FAST_READ,
        high_performance: None,
    };

    /// Check that the geometry is usable
    ///
    /// Page and sector sizes must be non-zero powers of two, a sector must
    /// hold a whole number of pages, and the device must fit in the 3-byte
    /// address window. A high-performance bit, when present, must select
    /// at least one bit.
    pub fn validate(&self) -> Result<()> {
        let pow2 = |n: u32| n != 0 && n.is_power_of_two();
        if !pow2(self.page_size) || !pow2(self.sector_size) {
            return Err(Error::InvalidProfile);
        }
        if self.sector_size < self.page_size {
            return Err(Error::InvalidProfile);
        }
        if self.total_size == 0
            || self.total_size > AddressWidth::ThreeByte.max_size()
            || self.total_size % self.sector_size != 0
        {
            return Err(Error::InvalidProfile);
        }
        if matches!(self.high_performance, Some(HighPerformanceBit { mask: 0 })) {
            return Err(Error::InvalidProfile);
        }
        Ok(())
    }

    /// Start address of the sector containing `addr`
    pub const fn sector_base(&self, addr: u32) -> u32 {
        addr & !(self.sector_size - 1)
    }

    /// Check that `[addr, addr + len)` lies within the device
    pub fn contains(&self, addr: u32, len: usize) -> bool {
        let end = addr as u64 + len as u64;
        end <= self.total_size as u64
    }
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self::MX25R6435F
    }
}
