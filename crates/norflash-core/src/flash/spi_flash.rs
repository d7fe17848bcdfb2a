//! Owned flash handle

use crate::error::Result;
use crate::flash::FlashContext;
use crate::programmer::SpiMaster;
use crate::protocol::{self, PerformanceMode};

/// A transport paired with the session state for the device behind it
///
/// This is the value consumers hold instead of a global driver handle.
/// Every method is a blocking sequence of commands; `&mut self` keeps one
/// operation in flight at a time.
///
/// # Example
///
/// ```ignore
/// use norflash_core::device::DeviceModel;
/// use norflash_core::flash::{FlashContext, SpiFlash};
///
/// let ctx = FlashContext::new(DeviceModel::Mx25r6435f.profile())?;
/// let mut flash = SpiFlash::new(transport, ctx)?;
/// flash.bring_up()?;
/// flash.erase_sector(0x2000)?;
/// flash.program(0x2000, &[0x12; 1024])?;
/// ```
pub struct SpiFlash<M> {
    master: M,
    ctx: FlashContext,
}

impl<M: SpiMaster> SpiFlash<M> {
    /// Pair a transport with a context
    ///
    /// Fails with `IoModeNotSupported` when the profile's read mode needs
    /// lanes the transport has not been configured for.
    pub fn new(master: M, ctx: FlashContext) -> Result<Self> {
        ctx.check_transport(&master)?;
        Ok(Self { master, ctx })
    }

    /// The session context
    pub fn context(&self) -> &FlashContext {
        &self.ctx
    }

    /// Borrow the transport
    pub fn master(&self) -> &M {
        &self.master
    }

    /// Mutably borrow the transport
    pub fn master_mut(&mut self) -> &mut M {
        &mut self.master
    }

    /// Give the transport back
    pub fn into_inner(self) -> M {
        self.master
    }

    /// Software reset; run once after power-up before anything else
    pub fn reset_device(&mut self) -> Result<()> {
        protocol::reset_device(&mut self.master, &self.ctx)
    }

    /// Switch to high performance mode unless already there
    pub fn ensure_high_performance(&mut self) -> Result<()> {
        protocol::ensure_high_performance(&mut self.master, &self.ctx)
    }

    /// Switch to the given performance mode
    pub fn set_performance_mode(&mut self, mode: PerformanceMode) -> Result<()> {
        protocol::set_performance_mode(&mut self.master, &self.ctx, mode)
    }

    /// Read the current performance mode
    pub fn performance_mode(&mut self) -> Result<PerformanceMode> {
        protocol::performance_mode(&mut self.master, &self.ctx)
    }

    /// Reset the device and switch it to high performance mode
    pub fn bring_up(&mut self) -> Result<()> {
        self.reset_device()?;
        self.ensure_high_performance()
    }

    /// Erase the whole sector containing `addr`
    pub fn erase_sector(&mut self, addr: u32) -> Result<()> {
        protocol::erase_sector(&mut self.master, &self.ctx, addr)
    }

    /// Program `data` at `addr`, split on page boundaries
    pub fn program(&mut self, addr: u32, data: &[u8]) -> Result<()> {
        protocol::program(&mut self.master, &self.ctx, addr, data)
    }

    /// Read `buf.len()` bytes starting at `addr`
    pub fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<()> {
        protocol::read(&mut self.master, &self.ctx, addr, buf)
    }
}
