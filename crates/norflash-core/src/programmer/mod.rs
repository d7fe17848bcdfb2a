//! Transport abstraction
//!
//! This module defines the trait every command transport must implement
//! for the protocol layer to drive a flash device through it.

mod traits;

pub use traits::*;
