//! Erase command implementation

use super::{CliError, Session};

/// Erase the sector containing `address`
pub fn run_erase(session: &mut Session, address: u32) -> Result<(), CliError> {
    session.check_range(address, 1)?;

    let profile = *session.profile();
    let base = profile.sector_base(address);
    println!(
        "Erasing sector 0x{:06X} - 0x{:06X}",
        base,
        base + profile.sector_size - 1
    );

    session.flash().erase_sector(address)?;

    println!("Erase complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_session;

    #[test]
    fn test_erase_clears_sector() {
        let mut session = test_session();
        session.flash().master_mut().data_mut()[0x3000..0x5000].fill(0x00);

        run_erase(&mut session, 0x3456).unwrap();

        let data = session.flash().master().data();
        assert!(data[0x3000..0x4000].iter().all(|&b| b == 0xFF));
        assert!(data[0x4000..0x5000].iter().all(|&b| b == 0x00));
    }

    #[test]
    fn test_erase_out_of_range() {
        let mut session = test_session();
        assert!(matches!(
            run_erase(&mut session, 0x80_0000),
            Err(CliError::OutOfRange { .. })
        ));
    }
}
