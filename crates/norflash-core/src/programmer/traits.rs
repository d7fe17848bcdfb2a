//! Transport trait definitions

use crate::error::Result;
use crate::spi::SpiCommand;
use bitflags::bitflags;

bitflags! {
    /// Transport feature flags
    ///
    /// These flags indicate which multi-lane data phases a transport has
    /// been configured for.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SpiFeatures: u32 {
        /// Can read two bits at once (1-1-2 mode)
        const DUAL_IN        = 1 << 0;
        /// Can transfer two bits at once (1-2-2 mode)
        const DUAL_IO        = 1 << 1;
        /// Can read four bits at once (1-1-4 mode)
        const QUAD_IN        = 1 << 2;
        /// Can transfer four bits at once (1-4-4 mode)
        const QUAD_IO        = 1 << 3;

        /// Shorthand for dual mode (both DUAL_IN and DUAL_IO)
        const DUAL = Self::DUAL_IN.bits() | Self::DUAL_IO.bits();
        /// Shorthand for quad mode (both QUAD_IN and QUAD_IO)
        const QUAD = Self::QUAD_IN.bits() | Self::QUAD_IO.bits();
    }
}

impl Default for SpiFeatures {
    fn default() -> Self {
        SpiFeatures::empty()
    }
}

/// Command transport
///
/// Issues exactly one command per `execute()` call: opcode, optional
/// address, optional outbound payload, optional inbound payload. A
/// transport performs no retries and no sequencing; enable-before-write,
/// busy polling and page splitting all live in [`crate::protocol`].
///
/// Calls are blocking. Only one command may be in flight at a time, which
/// the `&mut self` receiver enforces for a single owner. Callers sharing a
/// transport across threads must serialize whole protocol operations, not
/// single commands, or the write-enable latch pairing breaks.
///
/// Buffers have no alignment requirement from the protocol layer. A
/// transport that needs DMA-aligned buffers must bounce internally.
pub trait SpiMaster {
    /// Get the lane modes this transport has been configured for
    fn features(&self) -> SpiFeatures;

    /// Get the maximum number of bytes that can be read in a single transaction
    fn max_read_len(&self) -> usize;

    /// Get the maximum number of bytes that can be written in a single transaction
    fn max_write_len(&self) -> usize;

    /// Execute a single command
    ///
    /// Returns the number of data-phase bytes moved (outbound plus
    /// inbound). Anything other than [`SpiCommand::data_len`] is treated
    /// by the protocol layer as a transport failure.
    fn execute(&mut self, cmd: &mut SpiCommand<'_>) -> Result<usize>;
}

impl<M: SpiMaster + ?Sized> SpiMaster for &mut M {
    fn features(&self) -> SpiFeatures {
        (**self).features()
    }

    fn max_read_len(&self) -> usize {
        (**self).max_read_len()
    }

    fn max_write_len(&self) -> usize {
        (**self).max_write_len()
    }

    fn execute(&mut self, cmd: &mut SpiCommand<'_>) -> Result<usize> {
        (**self).execute(cmd)
    }
}
