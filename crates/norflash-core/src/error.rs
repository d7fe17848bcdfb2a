//! Error types for norflash-core
//!
//! This module provides a no_std compatible error type that can be used
//! throughout the crate.

use core::fmt;

/// Coarse classification of an [`Error`]
///
/// Every high-level operation aborts on any of these; the classification
/// only tells the caller what kind of follow-up makes sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A command round-trip on the transport failed
    Transport,
    /// The device kept its busy bit set past the poll ceiling
    NotReady,
    /// A register read back after a write did not hold the intended value
    Verification,
    /// The request itself was invalid (range, profile, unsupported mode)
    Usage,
}

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    // Transport errors
    /// The transport reported a failed command round-trip
    TransportFailure,
    /// The transport moved fewer (or more) data bytes than requested
    ShortTransfer {
        /// Number of data bytes the command asked for
        expected: usize,
        /// Number of data bytes the transport reported
        actual: usize,
    },
    /// Opcode is not supported by the transport or device
    OpcodeNotSupported,
    /// Requested I/O mode is not supported by the transport
    IoModeNotSupported,

    // Device errors
    /// Busy bit still set after the configured number of status polls
    DeviceNotReady {
        /// Number of status reads issued before giving up
        attempts: u32,
    },
    /// Register read-back does not match the value just written
    VerificationFailure {
        /// Expected register value (masked to the bits being checked)
        expected: u8,
        /// Value found on read-back (same mask)
        found: u8,
    },

    // Request errors
    /// Address range reaches past the end of the device
    AddressOutOfBounds,
    /// Single program command would run past the end of its page
    CrossesPageBoundary,
    /// Device profile has inconsistent geometry
    InvalidProfile,
}

impl Error {
    /// Map this error onto the transport / not-ready / verification taxonomy
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::TransportFailure | Self::ShortTransfer { .. } | Self::OpcodeNotSupported => {
                ErrorKind::Transport
            }
            Self::DeviceNotReady { .. } => ErrorKind::NotReady,
            Self::VerificationFailure { .. } => ErrorKind::Verification,
            Self::IoModeNotSupported
            | Self::AddressOutOfBounds
            | Self::CrossesPageBoundary
            | Self::InvalidProfile => ErrorKind::Usage,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransportFailure => write!(f, "transport command failed"),
            Self::ShortTransfer { expected, actual } => write!(
                f,
                "short transfer: expected {} bytes, transport moved {}",
                expected, actual
            ),
            Self::OpcodeNotSupported => write!(f, "opcode not supported"),
            Self::IoModeNotSupported => write!(f, "I/O mode not supported by transport"),
            Self::DeviceNotReady { attempts } => {
                write!(f, "device still busy after {} status polls", attempts)
            }
            Self::VerificationFailure { expected, found } => write!(
                f,
                "register verify failed: expected 0x{:02X}, found 0x{:02X}",
                expected, found
            ),
            Self::AddressOutOfBounds => write!(f, "address out of bounds"),
            Self::CrossesPageBoundary => write!(f, "program data crosses a page boundary"),
            Self::InvalidProfile => write!(f, "invalid device profile"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
