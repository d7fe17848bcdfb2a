//! Protocol implementations
//!
//! This module contains the command sequences that drive the device:
//! status polling, the write-enable gate, sector erase, page programming,
//! range reads, reset, and the performance-mode register update.
//!
//! Every mutating command is preceded by a write-enable in the same
//! operation and followed by a busy poll. Any failure aborts the enclosing
//! operation; nothing is retried above the status poller.

mod perf_mode;
mod spi25;

pub use perf_mode::*;
pub use spi25::*;

#[cfg(test)]
pub(crate) use spi25::tests::MockMaster;
