//! Serial NOR flash opcodes
//!
//! Opcode constants shared by the supported device models. A device
//! profile maps each command role onto one of these values, so the
//! protocol layer never hardcodes an opcode.

// ============================================================================
// Write control
// ============================================================================

/// Write Enable - required before any program, erase or register write
pub const WREN: u8 = 0x06;

// ============================================================================
// Status / configuration register operations
// ============================================================================

/// Read Status Register
pub const RDSR: u8 = 0x05;
/// Write Status Register (on MX25R also carries the configuration bytes)
pub const WRSR: u8 = 0x01;
/// Read Configuration Register (Macronix)
pub const RDCR_15: u8 = 0x15;
/// Read Configuration Register (Micron/Winbond-style second status byte)
pub const RDCR_35: u8 = 0x35;

// ============================================================================
// Read commands - 3-byte address
// ============================================================================

/// Read Data (no dummy cycles)
pub const READ: u8 = 0x03;
/// Fast Read (8 dummy cycles)
pub const FAST_READ: u8 = 0x0B;
/// Quad I/O Read (1-4-4)
pub const QIOR: u8 = 0xEB;

// ============================================================================
// Program / erase
// ============================================================================

/// Page Program with 3-byte address
pub const PP: u8 = 0x02;
/// Sector Erase 4KB with 3-byte address
pub const SE_20: u8 = 0x20;

// ============================================================================
// Software Reset
// ============================================================================

/// Reset Enable
pub const RSTEN: u8 = 0x66;
/// Reset Device
pub const RST: u8 = 0x99;

// ============================================================================
// Register bit definitions
// ============================================================================

/// Status Register: Write In Progress / Busy
pub const SR_WIP: u8 = 0x01;
/// Status Register: Write Enable Latch
pub const SR_WEL: u8 = 0x02;

/// MX25R6435F Configuration Register 2: low power / high performance switch
pub const MX25R_CR2_LH_SWITCH: u8 = 0x02;

/// Value of an erased byte
pub const ERASED_VALUE: u8 = 0xFF;
