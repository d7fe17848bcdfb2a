//! Write command implementation

use super::{progress_bar, CliError, Session};
use std::fs;
use std::path::Path;

/// Bytes handed to the programmer per progress update
const WRITE_CHUNK_SIZE: usize = 4096;

/// Program the contents of `input` at `address`
pub fn run_write(
    session: &mut Session,
    address: u32,
    input: &Path,
    erase: bool,
) -> Result<(), CliError> {
    let data = fs::read(input)?;
    println!("Read {} bytes from {:?}", data.len(), input);
    write_data(session, address, &data, erase)?;
    println!("Wrote {} bytes at 0x{:06X}", data.len(), address);
    Ok(())
}

/// Program `data` at `address`, optionally erasing the covered sectors first
pub fn write_data(
    session: &mut Session,
    address: u32,
    data: &[u8],
    erase: bool,
) -> Result<(), CliError> {
    session.check_range(address, data.len())?;
    if data.is_empty() {
        return Ok(());
    }

    if erase {
        let sector_size = session.profile().sector_size;
        let first = session.profile().sector_base(address);
        let last = address + (data.len() as u32 - 1);
        let mut sector = first;
        while sector <= last {
            log::debug!("Erasing sector at 0x{:06X}", sector);
            session.flash().erase_sector(sector)?;
            sector += sector_size;
        }
    }

    let pb = progress_bar(data.len() as u64)?;
    let mut offset = 0usize;
    for chunk in data.chunks(WRITE_CHUNK_SIZE) {
        session.flash().program(address + offset as u32, chunk)?;
        offset += chunk.len();
        pb.set_position(offset as u64);
    }
    pb.finish_with_message("Write complete");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_session;

    #[test]
    fn test_write_with_erase_spans_sectors() {
        let mut session = test_session();
        session.flash().master_mut().data_mut()[0x0F00..0x2100].fill(0x00);

        let data: Vec<u8> = (0..0x1100u32).map(|i| (i % 251) as u8).collect();
        write_data(&mut session, 0x0F80, &data, true).unwrap();

        let mut buf = vec![0u8; data.len()];
        session.flash().read(0x0F80, &mut buf).unwrap();
        assert_eq!(buf, data);
        assert_eq!(session.flash().master().ignored_commands(), 0);
    }

    #[test]
    fn test_write_without_erase_only_clears_bits() {
        let mut session = test_session();
        session.flash().erase_sector(0).unwrap();
        write_data(&mut session, 0, &[0xF0], false).unwrap();
        write_data(&mut session, 0, &[0x0F], false).unwrap();

        let mut buf = [0xAAu8];
        session.flash().read(0, &mut buf).unwrap();
        assert_eq!(buf[0], 0x00);
    }

    #[test]
    fn test_write_past_end_rejected() {
        let mut session = test_session();
        assert!(matches!(
            write_data(&mut session, 0x7F_FFF0, &[0u8; 32], true),
            Err(CliError::OutOfRange { len: 32, .. })
        ));
    }
}
