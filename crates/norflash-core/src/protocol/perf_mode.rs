//! Low-power / high-performance switch
//!
//! On the MX25R family the switch is one bit of configuration byte 2. The
//! status write command replaces status and both configuration bytes in
//! one transfer, so the bit can only be changed by reading the full
//! image, editing it, and writing all three bytes back. The device gives
//! no completion signal beyond the busy bit, so the result is confirmed
//! by reading the configuration register again.

use core::fmt;

use crate::error::{Error, Result};
use crate::flash::FlashContext;
use crate::programmer::SpiMaster;
use crate::spi::SpiCommand;

use super::spi25::{transfer, wait_ready, write_enable};

/// Power/performance mode of the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceMode {
    /// Ultra low power mode (device default)
    LowPower,
    /// High performance mode
    HighPerformance,
}

impl fmt::Display for PerformanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LowPower => write!(f, "low power"),
            Self::HighPerformance => write!(f, "high performance"),
        }
    }
}

impl PerformanceMode {
    fn from_config(cr2: u8, mask: u8) -> Self {
        if cr2 & mask == mask {
            Self::HighPerformance
        } else {
            Self::LowPower
        }
    }

    fn apply(&self, cr2: u8, mask: u8) -> u8 {
        match self {
            Self::HighPerformance => cr2 | mask,
            Self::LowPower => cr2 & !mask,
        }
    }
}

/// Read the two configuration bytes
pub fn read_config<M: SpiMaster + ?Sized>(master: &mut M, ctx: &FlashContext) -> Result<[u8; 2]> {
    let mut buf = [0u8; 2];
    let mut cmd = SpiCommand::read_reg(ctx.profile.opcodes.read_config, &mut buf);
    transfer(master, &mut cmd)?;
    Ok(buf)
}

/// Read the current performance mode
///
/// Models without a switch always run at full performance.
pub fn performance_mode<M: SpiMaster + ?Sized>(
    master: &mut M,
    ctx: &FlashContext,
) -> Result<PerformanceMode> {
    let Some(hp) = ctx.profile.high_performance else {
        return Ok(PerformanceMode::HighPerformance);
    };
    let config = read_config(master, ctx)?;
    wait_ready(master, ctx)?;
    Ok(PerformanceMode::from_config(config[1], hp.mask))
}

/// Switch the device into `mode`
///
/// Read status and configuration, return early if the bit already
/// matches, otherwise write the edited image and read it back. Models
/// without a switch accept `HighPerformance` as a no-op and reject
/// `LowPower` with `OpcodeNotSupported`.
///
/// # Errors
/// * `VerificationFailure` - the read-back bit does not match `mode`
/// * `DeviceNotReady` / transport errors from any step
pub fn set_performance_mode<M: SpiMaster + ?Sized>(
    master: &mut M,
    ctx: &FlashContext,
    mode: PerformanceMode,
) -> Result<()> {
    let Some(hp) = ctx.profile.high_performance else {
        return match mode {
            PerformanceMode::HighPerformance => {
                log::debug!("{} has no performance switch", ctx.profile.model);
                Ok(())
            }
            PerformanceMode::LowPower => Err(Error::OpcodeNotSupported),
        };
    };
    let ops = ctx.profile.opcodes;

    // Status byte followed by configuration bytes 1 and 2
    let mut image = [0u8; 3];
    let mut cmd = SpiCommand::read_reg(ops.read_status, &mut image[..1]);
    transfer(master, &mut cmd)?;
    wait_ready(master, ctx)?;
    let mut cmd = SpiCommand::read_reg(ops.read_config, &mut image[1..]);
    transfer(master, &mut cmd)?;
    wait_ready(master, ctx)?;

    if PerformanceMode::from_config(image[2], hp.mask) == mode {
        log::debug!("{} already in {} mode", ctx.profile.model, mode);
        return Ok(());
    }

    image[2] = mode.apply(image[2], hp.mask);
    log::debug!(
        "Writing status/config image {:02X} {:02X} {:02X}",
        image[0],
        image[1],
        image[2]
    );

    write_enable(master, ctx)?;
    let mut cmd = SpiCommand::write_reg(ops.write_status, &image);
    transfer(master, &mut cmd)?;
    wait_ready(master, ctx)?;

    let config = read_config(master, ctx)?;
    wait_ready(master, ctx)?;

    let expected = image[2] & hp.mask;
    let found = config[1] & hp.mask;
    if found != expected {
        return Err(Error::VerificationFailure { expected, found });
    }

    log::info!("{} switched to {} mode", ctx.profile.model, mode);
    Ok(())
}

/// Make sure the device runs in high performance mode
///
/// Idempotent: when the bit is already set no write is issued.
pub fn ensure_high_performance<M: SpiMaster + ?Sized>(
    master: &mut M,
    ctx: &FlashContext,
) -> Result<()> {
    set_performance_mode(master, ctx, PerformanceMode::HighPerformance)
}
