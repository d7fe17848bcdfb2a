//! Flash context - runtime state for flash operations

use crate::device::DeviceProfile;
use crate::error::Result;
use crate::programmer::SpiMaster;
use crate::spi::check_io_mode_supported;

/// Bounded status polling
///
/// Polling is counted in status reads, not wall-clock time; no timer is
/// assumed to be available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Maximum number of status reads before giving up
    pub max_attempts: u32,
}

impl PollPolicy {
    /// Ceiling used when nothing else is configured
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 10_000;

    /// Create a policy with the given ceiling
    pub const fn new(max_attempts: u32) -> Self {
        Self { max_attempts }
    }

    /// Number of status reads to issue; at least one
    pub const fn attempts(&self) -> u32 {
        if self.max_attempts == 0 {
            1
        } else {
            self.max_attempts
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS)
    }
}

/// Runtime context for flash operations
///
/// Holds the device profile and polling policy for one session. It is
/// plain data owned by the caller and passed to every protocol function,
/// so independent sessions (or test harnesses) never share state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashContext {
    /// The device being driven
    pub profile: DeviceProfile,
    /// Busy polling ceiling
    pub poll: PollPolicy,
}

impl FlashContext {
    /// Create a context for a validated profile with the default poll policy
    pub fn new(profile: DeviceProfile) -> Result<Self> {
        profile.validate()?;
        Ok(Self {
            profile,
            poll: PollPolicy::default(),
        })
    }

    /// Replace the poll policy
    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    /// Get the page size for this device
    pub fn page_size(&self) -> usize {
        self.profile.page_size as usize
    }

    /// Get the sector size for this device
    pub fn sector_size(&self) -> usize {
        self.profile.sector_size as usize
    }

    /// Get the total size of this device
    pub fn total_size(&self) -> usize {
        self.profile.total_size as usize
    }

    /// Check that a transport can issue every command this profile needs
    pub fn check_transport<M: SpiMaster + ?Sized>(&self, master: &M) -> Result<()> {
        check_io_mode_supported(self.profile.read_mode.io_mode, master.features())
    }
}
