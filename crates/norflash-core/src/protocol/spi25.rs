//! Serial NOR command sequences
//!
//! All functions take the transport and the session's [`FlashContext`];
//! opcodes, geometry and the poll ceiling come from the context.

use bitflags::bitflags;

use crate::error::{Error, Result};
use crate::flash::{page_chunks, FlashContext};
use crate::programmer::SpiMaster;
use crate::spi::SpiCommand;

bitflags! {
    /// Status register
    ///
    /// Re-read on every poll; never cached across calls.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StatusRegister: u8 {
        /// Write in progress (busy)
        const WIP = crate::spi::SR_WIP;
        /// Write enable latch
        const WEL = crate::spi::SR_WEL;
    }
}

impl StatusRegister {
    /// Returns true while a program, erase or register write is running
    pub const fn is_busy(&self) -> bool {
        self.contains(Self::WIP)
    }
}

/// Execute one command and check that the whole data phase went through
pub(crate) fn transfer<M: SpiMaster + ?Sized>(
    master: &mut M,
    cmd: &mut SpiCommand<'_>,
) -> Result<()> {
    let expected = cmd.data_len();
    log::trace!(
        "cmd 0x{:02X} addr {:?} data {} bytes",
        cmd.opcode,
        cmd.address,
        expected
    );
    let actual = master.execute(cmd)?;
    if actual != expected {
        return Err(Error::ShortTransfer { expected, actual });
    }
    Ok(())
}

/// Read the status register
#[inline]
pub fn read_status<M: SpiMaster + ?Sized>(
    master: &mut M,
    ctx: &FlashContext,
) -> Result<StatusRegister> {
    let mut buf = [0u8; 1];
    let mut cmd = SpiCommand::read_reg(ctx.profile.opcodes.read_status, &mut buf);
    transfer(master, &mut cmd)?;
    Ok(StatusRegister::from_bits_retain(buf[0]))
}

/// Wait for the WIP (Write In Progress) bit to clear
///
/// Reads the status register back to back, without any delay, up to
/// `ctx.poll.attempts()` times. Program and erase complete in microseconds
/// to milliseconds on this device family, so the ceiling rather than a
/// clock bounds the wait.
///
/// # Errors
/// * `DeviceNotReady` - the bit was still set on the last attempt
/// * any transport error from a status read, returned immediately
pub fn wait_ready<M: SpiMaster + ?Sized>(master: &mut M, ctx: &FlashContext) -> Result<()> {
    let attempts = ctx.poll.attempts();
    for attempt in 1..=attempts {
        let status = read_status(master, ctx)?;
        if !status.is_busy() {
            log::trace!("ready after {} status polls", attempt);
            return Ok(());
        }
    }
    log::debug!("device still busy after {} status polls", attempts);
    Err(Error::DeviceNotReady { attempts })
}

/// Send the Write Enable command
///
/// Must succeed immediately before every program, erase and register
/// write. The device clears the latch after each of those commands and on
/// reset, so it is never assumed to still be set.
pub fn write_enable<M: SpiMaster + ?Sized>(master: &mut M, ctx: &FlashContext) -> Result<()> {
    let mut cmd = SpiCommand::simple(ctx.profile.opcodes.write_enable);
    transfer(master, &mut cmd)
}

/// Erase the sector containing `addr`
///
/// The address is rounded down to the sector boundary, so any address in
/// the sector may be passed. **The whole sector is erased**, including
/// bytes before and after `addr`; erasing a sub-range destroys adjacent
/// data in the same sector.
pub fn erase_sector<M: SpiMaster + ?Sized>(
    master: &mut M,
    ctx: &FlashContext,
    addr: u32,
) -> Result<()> {
    if !ctx.profile.contains(addr, 1) {
        return Err(Error::AddressOutOfBounds);
    }
    let base = ctx.profile.sector_base(addr);
    log::debug!("Erasing sector 0x{:06X} (requested 0x{:06X})", base, addr);

    write_enable(master, ctx)?;
    wait_ready(master, ctx)?;

    let mut cmd = SpiCommand::erase_3b(ctx.profile.opcodes.sector_erase, base);
    transfer(master, &mut cmd)?;

    wait_ready(master, ctx)
}

/// Program a single chunk
///
/// The data must not cross a page boundary: the device would wrap around
/// to the start of the page instead of reporting an error, so such a chunk
/// is rejected with `CrossesPageBoundary` before any command is sent. An
/// empty `data` is a no-op.
pub fn program_page<M: SpiMaster + ?Sized>(
    master: &mut M,
    ctx: &FlashContext,
    addr: u32,
    data: &[u8],
) -> Result<()> {
    if data.is_empty() {
        return Ok(());
    }
    if !ctx.profile.contains(addr, data.len()) {
        return Err(Error::AddressOutOfBounds);
    }
    if (addr as usize % ctx.page_size()) + data.len() > ctx.page_size() {
        return Err(Error::CrossesPageBoundary);
    }

    write_enable(master, ctx)?;
    wait_ready(master, ctx)?;

    let mut cmd = SpiCommand::write_3b(ctx.profile.opcodes.page_program, addr, data);
    transfer(master, &mut cmd)?;

    wait_ready(master, ctx)
}

/// Program an arbitrary range
///
/// The range is split into page-bounded chunks (see
/// [`page_chunks`](crate::flash::page_chunks)), each programmed as an
/// independent enable-gated, poll-confirmed command. The first failing
/// chunk aborts the call; chunks already programmed stay programmed, so
/// the target range must be treated as suspect after an error.
///
/// The target range should be erased first. An empty `data` is a no-op.
pub fn program<M: SpiMaster + ?Sized>(
    master: &mut M,
    ctx: &FlashContext,
    addr: u32,
    data: &[u8],
) -> Result<()> {
    if data.is_empty() {
        return Ok(());
    }
    if !ctx.profile.contains(addr, data.len()) {
        return Err(Error::AddressOutOfBounds);
    }

    let chunks =
        page_chunks(addr, data.len(), ctx.page_size()).with_limit(master.max_write_len());
    for chunk in chunks {
        log::debug!("Programming {} bytes at 0x{:06X}", chunk.len, chunk.address);
        program_page(master, ctx, chunk.address, &data[chunk.range()])?;
    }

    Ok(())
}

/// Read a range with the profile's read command
///
/// Waits for the device to be idle first, then reads in chunks of at most
/// `master.max_read_len()` bytes. An empty `buf` is a no-op.
pub fn read<M: SpiMaster + ?Sized>(
    master: &mut M,
    ctx: &FlashContext,
    addr: u32,
    buf: &mut [u8],
) -> Result<()> {
    if buf.is_empty() {
        return Ok(());
    }
    if !ctx.profile.contains(addr, buf.len()) {
        return Err(Error::AddressOutOfBounds);
    }

    wait_ready(master, ctx)?;

    let mode = ctx.profile.read_mode;
    let max_len = core::cmp::max(master.max_read_len(), 1);
    for (i, chunk) in buf.chunks_mut(max_len).enumerate() {
        let chunk_addr = addr + (i * max_len) as u32;
        let mut cmd = SpiCommand::read_3b(mode.opcode, chunk_addr, chunk)
            .with_io_mode(mode.io_mode)
            .with_dummy_cycles(mode.dummy_cycles);
        transfer(master, &mut cmd)?;
    }

    Ok(())
}

/// Send the software reset sequence
///
/// Reads the status register first for diagnostics only; a failure there
/// is logged and does not stop the reset. Then sends reset-enable and
/// reset, and waits for the device to come back.
pub fn reset_device<M: SpiMaster + ?Sized>(master: &mut M, ctx: &FlashContext) -> Result<()> {
    match read_status(master, ctx) {
        Ok(status) => log::debug!("Status before reset: 0x{:02X}", status.bits()),
        Err(e) => log::warn!("Reading status before reset failed: {}", e),
    }

    let mut cmd = SpiCommand::simple(ctx.profile.opcodes.reset_enable);
    transfer(master, &mut cmd)?;
    let mut cmd = SpiCommand::simple(ctx.profile.opcodes.reset);
    transfer(master, &mut cmd)?;

    wait_ready(master, ctx)?;
    log::info!("{} reset complete", ctx.profile.model);
    Ok(())
}
