//! Device profiles
//!
//! A [`DeviceProfile`] carries everything model-specific: geometry, the
//! command-to-opcode table and the high-performance register bit. The
//! protocol layer reads all of it from the profile at runtime.

#[cfg(feature = "std")]
mod config;
mod profile;

#[cfg(feature = "std")]
pub use config::{ProfileError, Size};
pub use profile::*;
