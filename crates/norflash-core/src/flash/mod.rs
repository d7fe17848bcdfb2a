//! Flash sessions
//!
//! This module provides the per-session state ([`FlashContext`]), the
//! page splitting used by programming ([`page_chunks`]), and [`SpiFlash`],
//! a handle that owns a transport and exposes the public operations.

mod chunks;
mod context;
mod spi_flash;

pub use chunks::{page_chunks, PageChunk, PageChunks};
pub use context::{FlashContext, PollPolicy};
pub use spi_flash::SpiFlash;
