//! norflash-dummy - In-memory serial NOR flash emulator
//!
//! This crate provides a transport that emulates a serial NOR device in
//! memory, including the parts of its behaviour the protocol layer has to
//! get right: the write-enable latch, the busy bit, page wrap-around on
//! program, and sector-granular erase. Faults can be injected to exercise
//! the error paths.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "alloc")]
use alloc::vec;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use norflash_core::device::DeviceProfile;
use norflash_core::error::{Error, Result};
use norflash_core::programmer::{SpiFeatures, SpiMaster};
use norflash_core::spi::{check_io_mode_supported, opcodes, AddressWidth, SpiCommand};

/// Configuration for the dummy flash
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// Device being emulated; geometry and opcodes come from here
    pub profile: DeviceProfile,
    /// Status reads that report busy after each program, erase, register
    /// write or reset
    pub busy_polls: u32,
    /// Configuration register contents at power-up
    pub initial_config: [u8; 2],
    /// Largest read the transport accepts in one command
    pub max_read_len: usize,
    /// Lane modes the transport advertises
    pub features: SpiFeatures,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            profile: DeviceProfile::MX25R6435F,
            busy_polls: 2,
            initial_config: [0x00, 0x00],
            max_read_len: 4096,
            features: SpiFeatures::empty(),
        }
    }
}

/// One executed command, as seen by the emulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggedCommand {
    /// Opcode
    pub opcode: u8,
    /// Address phase, if any
    pub address: Option<u32>,
    /// Data phase length (outbound plus inbound)
    pub len: usize,
    /// Serial clock cycles on the bus
    pub clocks: usize,
}

/// Dummy flash transport
///
/// Emulates a serial NOR device in memory for testing purposes.
#[cfg(feature = "alloc")]
pub struct DummyFlash {
    config: DummyConfig,
    data: Vec<u8>,
    status_reg: u8,
    config_reg: [u8; 2],
    write_enabled: bool,
    reset_armed: bool,
    busy_left: u32,
    stuck_busy: bool,
    fail_opcode: Option<u8>,
    freeze_config: bool,
    truncate_reads: Option<usize>,
    ignored: usize,
    log: Vec<LoggedCommand>,
}

#[cfg(feature = "alloc")]
impl DummyFlash {
    /// Create a new, fully erased dummy flash
    pub fn new(config: DummyConfig) -> Self {
        let data = vec![opcodes::ERASED_VALUE; config.profile.total_size as usize];
        Self {
            config_reg: config.initial_config,
            config,
            data,
            status_reg: 0,
            write_enabled: false,
            reset_armed: false,
            busy_left: 0,
            stuck_busy: false,
            fail_opcode: None,
            freeze_config: false,
            truncate_reads: None,
            ignored: 0,
            log: Vec::new(),
        }
    }

    /// Create a new dummy flash emulating `profile` with default settings
    pub fn for_profile(profile: DeviceProfile) -> Self {
        Self::new(DummyConfig {
            profile,
            ..DummyConfig::default()
        })
    }

    /// Create a dummy flash with pre-filled data
    pub fn with_data(config: DummyConfig, initial_data: &[u8]) -> Self {
        let mut flash = Self::new(config);
        let len = core::cmp::min(initial_data.len(), flash.data.len());
        flash.data[..len].copy_from_slice(&initial_data[..len]);
        flash
    }

    /// Get a reference to the flash data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get a mutable reference to the flash data
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Get the configuration
    pub fn config(&self) -> &DummyConfig {
        &self.config
    }

    /// Current configuration register contents
    pub fn config_register(&self) -> [u8; 2] {
        self.config_reg
    }

    /// Whether the write enable latch is currently set
    pub fn write_enabled(&self) -> bool {
        self.write_enabled
    }

    /// Keep the busy bit set forever (or release it)
    pub fn stick_busy(&mut self, stuck: bool) {
        self.stuck_busy = stuck;
    }

    /// Make every command with this opcode fail at the transport level
    pub fn fail_opcode(&mut self, opcode: Option<u8>) {
        self.fail_opcode = opcode;
    }

    /// Silently drop writes to the configuration register
    pub fn freeze_config(&mut self, frozen: bool) {
        self.freeze_config = frozen;
    }

    /// Report at most `limit` bytes moved for read commands
    pub fn truncate_reads(&mut self, limit: Option<usize>) {
        self.truncate_reads = limit;
    }

    /// Commands the device ignored: mutating commands without the write
    /// enable latch, and anything but a status read while busy
    pub fn ignored_commands(&self) -> usize {
        self.ignored
    }

    /// Every command executed so far
    pub fn log(&self) -> &[LoggedCommand] {
        &self.log
    }

    /// Number of executed commands with the given opcode
    pub fn count_opcode(&self, opcode: u8) -> usize {
        self.log.iter().filter(|c| c.opcode == opcode).count()
    }

    /// Serial clock cycles spent on all logged commands
    pub fn bus_clocks(&self) -> usize {
        self.log.iter().map(|c| c.clocks).sum()
    }

    /// Forget the command log
    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    fn is_busy(&self) -> bool {
        self.stuck_busy || self.busy_left > 0
    }

    fn start_busy(&mut self) {
        self.busy_left = self.config.busy_polls;
    }

    fn status_value(&self) -> u8 {
        let mut value = self.status_reg & !(opcodes::SR_WIP | opcodes::SR_WEL);
        if self.write_enabled {
            value |= opcodes::SR_WEL;
        }
        if self.is_busy() {
            value |= opcodes::SR_WIP;
        }
        value
    }

    fn ignore(&mut self, cmd: &SpiCommand<'_>, why: &str) {
        log::trace!("dummy: ignoring 0x{:02X}: {}", cmd.opcode, why);
        self.ignored += 1;
    }

    /// Consume the write enable latch for a mutating command
    fn take_write_enable(&mut self, cmd: &SpiCommand<'_>) -> bool {
        if !self.write_enabled {
            self.ignore(cmd, "write enable latch not set");
            return false;
        }
        self.write_enabled = false;
        true
    }

    fn handle_read_status(&mut self, cmd: &mut SpiCommand<'_>) {
        let value = self.status_value();
        cmd.read_buf.fill(value);
        self.busy_left = self.busy_left.saturating_sub(1);
    }

    fn handle_read_config(&mut self, cmd: &mut SpiCommand<'_>) {
        for (dst, src) in cmd.read_buf.iter_mut().zip(self.config_reg.iter()) {
            *dst = *src;
        }
    }

    fn handle_write_status(&mut self, cmd: &SpiCommand<'_>) {
        if !self.take_write_enable(cmd) {
            return;
        }
        let data = cmd.write_data;
        if let Some(&sr) = data.first() {
            // WIP and WEL are read-only
            self.status_reg = sr & !(opcodes::SR_WIP | opcodes::SR_WEL);
        }
        if !self.freeze_config {
            for (dst, src) in self.config_reg.iter_mut().zip(data.iter().skip(1)) {
                *dst = *src;
            }
        }
        self.start_busy();
    }

    fn handle_read(&mut self, cmd: &mut SpiCommand<'_>) -> Result<()> {
        let addr = cmd.address.unwrap_or(0) as usize;
        let len = cmd.read_buf.len();

        if addr + len > self.data.len() {
            return Err(Error::AddressOutOfBounds);
        }

        cmd.read_buf.copy_from_slice(&self.data[addr..addr + len]);
        Ok(())
    }

    fn handle_page_program(&mut self, cmd: &SpiCommand<'_>) -> Result<()> {
        let addr = cmd.address.unwrap_or(0) as usize;
        if addr >= self.data.len() {
            return Err(Error::AddressOutOfBounds);
        }
        if !self.take_write_enable(cmd) {
            return Ok(());
        }

        // Data past the end of the page wraps to the start of the same page
        let page_size = self.config.profile.page_size as usize;
        let page_base = addr & !(page_size - 1);
        for (i, &byte) in cmd.write_data.iter().enumerate() {
            let target = page_base + (addr - page_base + i) % page_size;
            // Flash programming: can only change 1 -> 0
            self.data[target] &= byte;
        }

        self.start_busy();
        Ok(())
    }

    fn handle_sector_erase(&mut self, cmd: &SpiCommand<'_>) -> Result<()> {
        let addr = cmd.address.unwrap_or(0);
        if addr as usize >= self.data.len() {
            return Err(Error::AddressOutOfBounds);
        }
        if !self.take_write_enable(cmd) {
            return Ok(());
        }

        let base = self.config.profile.sector_base(addr) as usize;
        let size = self.config.profile.sector_size as usize;
        self.data[base..base + size].fill(opcodes::ERASED_VALUE);

        self.start_busy();
        Ok(())
    }

    fn handle_reset(&mut self) {
        self.write_enabled = false;
        self.reset_armed = false;
        self.start_busy();
    }
}

#[cfg(feature = "alloc")]
impl SpiMaster for DummyFlash {
    fn features(&self) -> SpiFeatures {
        self.config.features
    }

    fn max_read_len(&self) -> usize {
        self.config.max_read_len
    }

    fn max_write_len(&self) -> usize {
        self.config.profile.page_size as usize
    }

    fn execute(&mut self, cmd: &mut SpiCommand<'_>) -> Result<usize> {
        self.log.push(LoggedCommand {
            opcode: cmd.opcode,
            address: cmd.address,
            len: cmd.data_len(),
            clocks: cmd.clock_cycles(),
        });

        if self.fail_opcode == Some(cmd.opcode) {
            return Err(Error::TransportFailure);
        }
        check_io_mode_supported(cmd.io_mode, self.config.features)?;
        if cmd.has_address() && cmd.address_width != AddressWidth::ThreeByte {
            return Err(Error::OpcodeNotSupported);
        }

        let ops = self.config.profile.opcodes;
        let op = cmd.opcode;
        let armed = core::mem::take(&mut self.reset_armed);

        if op == ops.read_status {
            self.handle_read_status(cmd);
            return Ok(cmd.data_len());
        }
        if op == ops.reset_enable {
            self.reset_armed = true;
            return Ok(cmd.data_len());
        }
        if op == ops.reset {
            if armed {
                self.handle_reset();
            } else {
                self.ignore(cmd, "reset not enabled");
            }
            return Ok(cmd.data_len());
        }
        if self.is_busy() {
            self.ignore(cmd, "device busy");
            return Ok(cmd.data_len());
        }

        let is_read =
            op == ops.read || op == ops.fast_read || op == self.config.profile.read_mode.opcode;
        if is_read {
            self.handle_read(cmd)?;
            let len = cmd.data_len();
            return Ok(self.truncate_reads.map_or(len, |limit| len.min(limit)));
        }

        if op == ops.read_config {
            self.handle_read_config(cmd);
        } else if op == ops.write_enable {
            self.write_enabled = true;
        } else if op == ops.write_status {
            self.handle_write_status(cmd);
        } else if op == ops.page_program {
            self.handle_page_program(cmd)?;
        } else if op == ops.sector_erase {
            self.handle_sector_erase(cmd)?;
        } else {
            return Err(Error::OpcodeNotSupported);
        }

        Ok(cmd.data_len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use norflash_core::device::{DeviceModel, ReadMode};
    use norflash_core::flash::{FlashContext, PollPolicy, SpiFlash};
    use norflash_core::protocol::{self, PerformanceMode};
    use norflash_core::spi::IoMode;

    const PATTERN: [u8; 16] = [
        0x12, 0x23, 0x34, 0x45, 0x56, 0x67, 0x78, 0x89, 0x10, 0x1A, 0x1B, 0x1C, 0x1D, 0x1E, 0x1F,
        0x2F,
    ];

    fn flash() -> SpiFlash<DummyFlash> {
        flash_with(DummyConfig::default(), PollPolicy::default())
    }

    fn flash_with(config: DummyConfig, poll: PollPolicy) -> SpiFlash<DummyFlash> {
        let ctx = FlashContext::new(config.profile)
            .unwrap()
            .with_poll_policy(poll);
        let mut flash = SpiFlash::new(DummyFlash::new(config), ctx).unwrap();
        flash.bring_up().unwrap();
        flash.master_mut().clear_log();
        flash
    }

    fn mutating(flash: &SpiFlash<DummyFlash>) -> usize {
        let ops = flash.context().profile.opcodes;
        flash
            .master()
            .log()
            .iter()
            .filter(|c| {
                c.opcode == ops.page_program
                    || c.opcode == ops.sector_erase
                    || c.opcode == ops.write_status
            })
            .count()
    }

    #[test]
    fn test_raw_program_needs_write_enable() {
        let mut dummy = DummyFlash::new(DummyConfig {
            busy_polls: 0,
            ..DummyConfig::default()
        });
        let data = [0x12, 0x34, 0x56, 0x78];

        let mut cmd = SpiCommand::write_3b(opcodes::PP, 0x1000, &data);
        dummy.execute(&mut cmd).unwrap();
        assert_eq!(dummy.ignored_commands(), 1);
        assert_eq!(&dummy.data()[0x1000..0x1004], &[0xFF; 4]);

        let mut cmd = SpiCommand::simple(opcodes::WREN);
        dummy.execute(&mut cmd).unwrap();
        assert!(dummy.write_enabled());
        let mut cmd = SpiCommand::write_3b(opcodes::PP, 0x1000, &data);
        dummy.execute(&mut cmd).unwrap();
        assert!(!dummy.write_enabled());

        let mut buf = [0u8; 4];
        let mut cmd = SpiCommand::read_3b(opcodes::READ, 0x1000, &mut buf);
        assert_eq!(dummy.execute(&mut cmd).unwrap(), 4);
        assert_eq!(buf, data);
    }

    #[test]
    fn test_raw_program_wraps_within_page() {
        let mut dummy = DummyFlash::new(DummyConfig {
            busy_polls: 0,
            ..DummyConfig::default()
        });
        dummy.execute(&mut SpiCommand::simple(opcodes::WREN)).unwrap();
        let mut cmd = SpiCommand::write_3b(opcodes::PP, 0x1FE, &[0x00; 4]);
        dummy.execute(&mut cmd).unwrap();
        // Last two bytes land at the start of the same page, not the next one
        assert_eq!(&dummy.data()[0x1FE..0x200], &[0x00, 0x00]);
        assert_eq!(&dummy.data()[0x100..0x102], &[0x00, 0x00]);
        assert_eq!(&dummy.data()[0x200..0x202], &[0xFF, 0xFF]);
    }

    #[test]
    fn test_busy_device_ignores_commands() {
        let mut dummy = DummyFlash::new(DummyConfig::default());
        dummy.execute(&mut SpiCommand::simple(opcodes::WREN)).unwrap();
        dummy
            .execute(&mut SpiCommand::erase_3b(opcodes::SE_20, 0))
            .unwrap();
        dummy.execute(&mut SpiCommand::simple(opcodes::WREN)).unwrap();
        assert_eq!(dummy.ignored_commands(), 1);
        assert!(!dummy.write_enabled());
    }

    #[test]
    fn test_reset_requires_enable() {
        let mut dummy = DummyFlash::new(DummyConfig::default());
        dummy.execute(&mut SpiCommand::simple(opcodes::RST)).unwrap();
        assert_eq!(dummy.ignored_commands(), 1);
        dummy.execute(&mut SpiCommand::simple(opcodes::RSTEN)).unwrap();
        dummy.execute(&mut SpiCommand::simple(opcodes::RST)).unwrap();
        assert_eq!(dummy.ignored_commands(), 1);
    }

    #[test]
    fn test_unknown_opcode() {
        let mut dummy = DummyFlash::new(DummyConfig::default());
        assert_eq!(
            dummy.execute(&mut SpiCommand::simple(0xB9)),
            Err(Error::OpcodeNotSupported)
        );
    }

    #[test]
    fn test_quad_read_needs_quad_lanes() {
        let mut dummy = DummyFlash::new(DummyConfig::default());
        dummy.data_mut()[..4].copy_from_slice(&[1, 2, 3, 4]);
        let mut buf = [0u8; 4];
        let mut cmd = SpiCommand::read_3b(opcodes::QIOR, 0, &mut buf)
            .with_io_mode(IoMode::QuadIo)
            .with_dummy_cycles(6);
        assert_eq!(dummy.execute(&mut cmd), Err(Error::IoModeNotSupported));

        let mut profile = DeviceProfile::MX25R6435F;
        profile.read_mode = ReadMode {
            opcode: opcodes::QIOR,
            io_mode: IoMode::QuadIo,
            dummy_cycles: 6,
        };
        let config = DummyConfig {
            profile,
            features: SpiFeatures::QUAD,
            ..DummyConfig::default()
        };
        let ctx = FlashContext::new(profile).unwrap();
        let mut flash = SpiFlash::new(DummyFlash::new(config), ctx).unwrap();
        flash.master_mut().data_mut()[..4].copy_from_slice(&[1, 2, 3, 4]);
        flash.read(0, &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3, 4]);
        // RDSR (8 + 8), then QIOR: 8 opcode + 6 address + 6 dummy + 8 data
        assert_eq!(flash.master().bus_clocks(), 16 + 28);
    }

    #[test]
    fn test_quad_profile_rejects_single_lane_transport() {
        let mut profile = DeviceProfile::MX25R6435F;
        profile.read_mode.io_mode = IoMode::QuadIo;
        let ctx = FlashContext::new(profile).unwrap();
        assert!(matches!(
            SpiFlash::new(DummyFlash::for_profile(profile), ctx),
            Err(Error::IoModeNotSupported)
        ));
    }

    #[test]
    fn test_erase_reads_back_erased() {
        let mut flash = flash();
        flash.master_mut().data_mut()[0x2000..0x3000].fill(0x00);
        flash.erase_sector(0x2000).unwrap();
        let mut buf = [0u8; 4096];
        flash.read(0x2000, &mut buf).unwrap();
        assert!(buf.iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_erase_takes_whole_sector() {
        let mut flash = flash();
        flash.master_mut().data_mut()[0x1000..0x4000].fill(0x00);
        flash.erase_sector(0x2ABC).unwrap();
        let data = flash.master().data();
        assert!(data[0x2000..0x3000].iter().all(|&b| b == 0xFF));
        assert!(data[0x1000..0x2000].iter().all(|&b| b == 0x00));
        assert!(data[0x3000..0x4000].iter().all(|&b| b == 0x00));
    }

    #[test]
    fn test_round_trip_any_alignment_in_sector() {
        let mut flash = flash();
        let data: Vec<u8> = (0..700u32).map(|i| (i * 7 + 3) as u8).collect();
        for offset in [0u32, 1, 0xFF, 0x100, 0x123, 0x7FF, 4096 - 700] {
            let addr = 0x5000 + offset;
            flash.erase_sector(addr).unwrap();
            flash.program(addr, &data).unwrap();
            let mut buf = vec![0u8; data.len()];
            flash.read(addr, &mut buf).unwrap();
            assert_eq!(buf, data, "mismatch at offset 0x{:X}", offset);
        }
        assert_eq!(flash.master().ignored_commands(), 0);
    }

    #[test]
    fn test_simple_write_read() {
        let mut flash = flash();
        flash.erase_sector(0x100).unwrap();
        flash.program(0x100, &PATTERN).unwrap();
        let mut buf = [0u8; 16];
        flash.read(0x100, &mut buf).unwrap();
        assert_eq!(buf, PATTERN);
    }

    #[test]
    fn test_block_pattern_1k() {
        let mut flash = flash();
        flash.erase_sector(0x2000).unwrap();
        flash.program(0x2000, &[0x12; 1024]).unwrap();
        let mut buf = vec![0u8; 1024];
        flash.read(0x2000, &mut buf).unwrap();
        assert!(buf.iter().all(|&b| b == 0x12));
        // Four page programs, each gated
        let ops = flash.context().profile.opcodes;
        assert_eq!(flash.master().count_opcode(ops.page_program), 4);
        assert_eq!(flash.master().count_opcode(ops.write_enable), 5);
    }

    #[test]
    fn test_write_multiple_read_single() {
        let mut flash = flash();
        flash.erase_sector(0x2000).unwrap();
        let mut expected = Vec::new();
        for (i, addr) in [0x2000u32, 0x2400, 0x2800, 0x2C00].into_iter().enumerate() {
            let block = [PATTERN[i]; 1024];
            flash.program(addr, &block).unwrap();
            expected.extend_from_slice(&block);
        }
        let mut buf = vec![0u8; 4096];
        flash.read(0x2000, &mut buf).unwrap();
        assert_eq!(buf, expected);
    }

    #[test]
    fn test_write_single_read_multiple() {
        let mut flash = flash();
        flash.erase_sector(0x2000).unwrap();
        let source: Vec<u8> = (0..4).flat_map(|i| [PATTERN[i]; 1024]).collect();
        flash.program(0x2000, &source).unwrap();
        let mut buf = vec![0u8; 4096];
        for (i, chunk) in buf.chunks_mut(1024).enumerate() {
            flash.read(0x2000 + (i as u32) * 1024, chunk).unwrap();
        }
        assert_eq!(buf, source);
    }

    #[test]
    fn test_high_performance_idempotent() {
        let mut flash = flash_with(
            DummyConfig {
                initial_config: [0x00, 0x00],
                ..DummyConfig::default()
            },
            PollPolicy::default(),
        );
        // bring_up already switched the mode once
        assert_eq!(flash.master().config_register()[1] & 0x02, 0x02);
        flash.ensure_high_performance().unwrap();
        flash.ensure_high_performance().unwrap();
        assert_eq!(flash.master().count_opcode(opcodes::WRSR), 0);
        assert_eq!(
            flash.performance_mode().unwrap(),
            PerformanceMode::HighPerformance
        );
    }

    #[test]
    fn test_high_performance_writes_once_from_low_power() {
        let ctx = FlashContext::new(DeviceProfile::MX25R6435F).unwrap();
        let mut dummy = DummyFlash::new(DummyConfig::default());
        protocol::ensure_high_performance(&mut dummy, &ctx).unwrap();
        protocol::ensure_high_performance(&mut dummy, &ctx).unwrap();
        assert_eq!(dummy.count_opcode(opcodes::WRSR), 1);
        assert_eq!(dummy.ignored_commands(), 0);
    }

    #[test]
    fn test_high_performance_verify_failure() {
        let ctx = FlashContext::new(DeviceProfile::MX25R6435F).unwrap();
        let mut dummy = DummyFlash::new(DummyConfig::default());
        dummy.freeze_config(true);
        assert_eq!(
            protocol::ensure_high_performance(&mut dummy, &ctx),
            Err(Error::VerificationFailure {
                expected: 0x02,
                found: 0x00
            })
        );
    }

    #[test]
    fn test_stuck_busy_aborts_every_operation() {
        let mut flash = flash_with(DummyConfig::default(), PollPolicy::new(4));
        flash.master_mut().stick_busy(true);

        assert_eq!(
            flash.erase_sector(0x2000),
            Err(Error::DeviceNotReady { attempts: 4 })
        );
        assert_eq!(
            flash.program(0x2000, &[0u8; 600]),
            Err(Error::DeviceNotReady { attempts: 4 })
        );
        assert_eq!(
            flash.set_performance_mode(PerformanceMode::LowPower),
            Err(Error::DeviceNotReady { attempts: 4 })
        );
        assert_eq!(mutating(&flash), 0);
    }

    #[test]
    fn test_slow_program_times_out_after_first_chunk() {
        let mut flash = flash_with(
            DummyConfig {
                busy_polls: 50,
                ..DummyConfig::default()
            },
            PollPolicy::new(60),
        );
        // Ceiling covers a normal program
        flash.erase_sector(0x3000).unwrap();
        flash.program(0x3000, &[0u8; 512]).unwrap();

        let mut slow = DummyFlash::new(DummyConfig {
            busy_polls: 100,
            ..DummyConfig::default()
        });
        let ctx = *flash.context();
        assert_eq!(
            protocol::program(&mut slow, &ctx, 0x3000, &[0u8; 512]),
            Err(Error::DeviceNotReady { attempts: 60 })
        );
        assert_eq!(slow.count_opcode(opcodes::PP), 1);
        assert_eq!(slow.ignored_commands(), 0);
    }

    #[test]
    fn test_truncated_read_is_an_error() {
        let mut flash = flash();
        flash.master_mut().truncate_reads(Some(100));
        let mut buf = [0u8; 256];
        assert_eq!(
            flash.read(0, &mut buf),
            Err(Error::ShortTransfer {
                expected: 256,
                actual: 100
            })
        );
    }

    #[test]
    fn test_transport_failure_on_program_stops_write() {
        let mut flash = flash();
        flash.erase_sector(0).unwrap();
        flash.master_mut().clear_log();
        flash.master_mut().fail_opcode(Some(opcodes::PP));
        assert_eq!(
            flash.program(0, &[0u8; 1024]),
            Err(Error::TransportFailure)
        );
        assert_eq!(flash.master().count_opcode(opcodes::PP), 1);
    }

    #[test]
    fn test_n25q128a_profile() {
        let profile = DeviceModel::N25q128a.profile();
        let mut flash = flash_with(
            DummyConfig {
                profile,
                ..DummyConfig::default()
            },
            PollPolicy::default(),
        );
        flash.erase_sector(0xFF_F000).unwrap();
        flash.program(0xFF_FFF0, &PATTERN).unwrap();
        let mut buf = [0u8; 16];
        flash.read(0xFF_FFF0, &mut buf).unwrap();
        assert_eq!(buf, PATTERN);
        assert_eq!(flash.master().count_opcode(opcodes::RDCR_35), 0);
        assert_eq!(
            flash.program(0xFF_FFF8, &PATTERN),
            Err(Error::AddressOutOfBounds)
        );
    }
}
