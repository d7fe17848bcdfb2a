//! SPI command structure

use super::{AddressWidth, IoMode};

/// A single transport transaction
///
/// Designed to avoid allocation - uses slices for data.
/// The lifetime parameter `'a` ties the command to the buffers it references.
pub struct SpiCommand<'a> {
    /// The opcode byte
    pub opcode: u8,

    /// Address (if any)
    pub address: Option<u32>,

    /// Address width
    pub address_width: AddressWidth,

    /// I/O mode
    pub io_mode: IoMode,

    /// Number of dummy cycles after address
    pub dummy_cycles: u8,

    /// Data to write after opcode/address/dummy
    pub write_data: &'a [u8],

    /// Buffer to read into (mutable)
    pub read_buf: &'a mut [u8],
}

impl<'a> SpiCommand<'a> {
    /// Create a simple command with no address or data (e.g., WREN, RSTEN)
    pub fn simple(opcode: u8) -> Self {
        Self {
            opcode,
            address: None,
            address_width: AddressWidth::None,
            io_mode: IoMode::Single,
            dummy_cycles: 0,
            write_data: &[],
            read_buf: &mut [],
        }
    }

    /// Create a read register command with no address (e.g., RDSR, RDCR)
    pub fn read_reg(opcode: u8, buf: &'a mut [u8]) -> Self {
        Self {
            read_buf: buf,
            ..Self::simple(opcode)
        }
    }

    /// Create a write register command with no address (e.g., WRSR)
    pub fn write_reg(opcode: u8, data: &'a [u8]) -> Self {
        Self {
            write_data: data,
            ..Self::simple(opcode)
        }
    }

    /// Create a read command with 3-byte address (e.g., READ, FAST_READ)
    pub fn read_3b(opcode: u8, addr: u32, buf: &'a mut [u8]) -> Self {
        Self {
            address: Some(addr),
            address_width: AddressWidth::ThreeByte,
            read_buf: buf,
            ..Self::simple(opcode)
        }
    }

    /// Create a write command with 3-byte address (e.g., PP)
    pub fn write_3b(opcode: u8, addr: u32, data: &'a [u8]) -> Self {
        Self {
            address: Some(addr),
            address_width: AddressWidth::ThreeByte,
            write_data: data,
            ..Self::simple(opcode)
        }
    }

    /// Create an erase command with 3-byte address
    pub fn erase_3b(opcode: u8, addr: u32) -> Self {
        Self {
            address: Some(addr),
            address_width: AddressWidth::ThreeByte,
            ..Self::simple(opcode)
        }
    }

    /// Set the I/O mode for this command
    pub fn with_io_mode(mut self, mode: IoMode) -> Self {
        self.io_mode = mode;
        self
    }

    /// Set the number of dummy cycles
    pub fn with_dummy_cycles(mut self, cycles: u8) -> Self {
        self.dummy_cycles = cycles;
        self
    }

    /// Returns true if this command has an address phase
    pub fn has_address(&self) -> bool {
        self.address.is_some()
    }

    /// Number of bytes in the data phase (outbound plus inbound)
    ///
    /// This is the count a transport reports back from a complete
    /// transfer.
    pub fn data_len(&self) -> usize {
        self.write_data.len() + self.read_buf.len()
    }

    /// Serial clock cycles the command occupies on the bus
    ///
    /// The opcode always goes out on one lane; address and data phases
    /// use the lanes of `io_mode`.
    pub fn clock_cycles(&self) -> usize {
        let addr_bits = self.address_width.bytes() as usize * 8;
        let data_bits = self.data_len() * 8;
        8 + addr_bits / self.io_mode.addr_lines() as usize
            + self.dummy_cycles as usize
            + data_bits / self.io_mode.data_lines() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_has_no_phases() {
        let cmd = SpiCommand::simple(0x06);
        assert!(!cmd.has_address());
        assert_eq!(cmd.data_len(), 0);
        assert_eq!(cmd.address_width, AddressWidth::None);
    }

    #[test]
    fn test_read_with_dummy_cycles() {
        let mut buf = [0u8; 16];
        let cmd = SpiCommand::read_3b(0x0B, 0x100, &mut buf)
            .with_dummy_cycles(8)
            .with_io_mode(IoMode::QuadIo);
        assert_eq!(cmd.address, Some(0x100));
        assert_eq!(cmd.dummy_cycles, 8);
        assert_eq!(cmd.io_mode, IoMode::QuadIo);
        assert_eq!(cmd.data_len(), 16);
        // 8 opcode + 24/4 address + 8 dummy + 128/4 data
        assert_eq!(cmd.clock_cycles(), 8 + 6 + 8 + 32);
    }

    #[test]
    fn test_single_lane_clock_cycles() {
        let data = [0u8; 256];
        let cmd = SpiCommand::write_3b(0x02, 0x1000, &data);
        assert_eq!(cmd.clock_cycles(), 8 + 24 + 256 * 8);
        assert_eq!(SpiCommand::simple(0x06).clock_cycles(), 8);
    }

    #[test]
    fn test_write_reg_carries_payload() {
        let data = [0x00, 0x00, 0x02];
        let cmd = SpiCommand::write_reg(0x01, &data);
        assert!(!cmd.has_address());
        assert_eq!(cmd.write_data, &data);
        assert_eq!(cmd.data_len(), 3);
    }
}
