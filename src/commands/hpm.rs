//! Performance mode command implementation

use super::{CliError, Session};
use norflash_core::protocol::PerformanceMode;

/// Switch to `mode` and report the mode read back from the device
pub fn run_hpm(session: &mut Session, mode: PerformanceMode) -> Result<(), CliError> {
    let before = session.flash().performance_mode()?;
    if before == mode {
        println!("Already in {} mode", mode);
        return Ok(());
    }

    session.flash().set_performance_mode(mode)?;
    let after = session.flash().performance_mode()?;
    println!("Performance mode: {} -> {}", before, after);
    Ok(())
}
