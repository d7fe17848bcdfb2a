//! Read command implementation

use super::{progress_bar, CliError, Session};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Default chunk size for reading (4 KiB)
const READ_CHUNK_SIZE: usize = 4096;

/// Read `length` bytes at `address` into `output`
pub fn run_read(
    session: &mut Session,
    address: u32,
    length: u32,
    output: &Path,
) -> Result<(), CliError> {
    let data = read_with_progress(session, address, length as usize)?;

    let mut file = File::create(output)?;
    file.write_all(&data)?;

    println!("Wrote {} bytes to {:?}", data.len(), output);
    Ok(())
}

/// Read a range with a progress bar
pub fn read_with_progress(
    session: &mut Session,
    address: u32,
    length: usize,
) -> Result<Vec<u8>, CliError> {
    session.check_range(address, length)?;
    let mut data = vec![0u8; length];

    let pb = progress_bar(length as u64)?;
    let mut offset = 0usize;
    for chunk in data.chunks_mut(READ_CHUNK_SIZE) {
        session.flash().read(address + offset as u32, chunk)?;
        offset += chunk.len();
        pb.set_position(offset as u64);
    }
    pb.finish_with_message("Read complete");

    Ok(data)
}
