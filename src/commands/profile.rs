//! Profile command implementation

use super::{CliError, Session};

/// Print the active profile in RON form, loadable with `--profile`
pub fn run_profile(session: &Session) -> Result<(), CliError> {
    println!("{}", session.profile().to_ron_string()?);
    Ok(())
}
