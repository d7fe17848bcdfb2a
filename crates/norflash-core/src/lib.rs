//! norflash-core - Command protocol layer for serial NOR flash
//!
//! This crate drives a serial NOR flash device through a single-command
//! transport: enable-before-write sequencing, bounded busy polling,
//! page-bounded programming, sector erase, and the configuration register
//! update that switches the device into high performance mode. It is
//! `no_std` compatible for use in embedded environments.
//!
//! # Features
//!
//! - `std` - Enable standard library support and RON device profiles
//!
//! # Example
//!
//! ```ignore
//! use norflash_core::{device::DeviceModel, flash::FlashContext, protocol};
//!
//! fn init<M: SpiMaster>(master: &mut M) -> Result<()> {
//!     let ctx = FlashContext::new(DeviceModel::Mx25r6435f.profile())?;
//!     protocol::reset_device(master, &ctx)?;
//!     protocol::ensure_high_performance(master, &ctx)
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod device;
pub mod error;
pub mod flash;
pub mod programmer;
pub mod protocol;
pub mod spi;

pub use error::{Error, ErrorKind, Result};
