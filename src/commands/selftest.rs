//! Write/read validation scenarios
//!
//! Each scenario erases what it needs, programs a known pattern and reads
//! it back, comparing byte for byte.

use super::{CliError, Session};
use norflash_core::flash::SpiFlash;
use norflash_core::programmer::SpiMaster;
use norflash_core::Result;

const KIB: usize = 1024;

/// Fill bytes used by the scenarios
const PATTERN: [u8; 16] = [
    0x12, 0x23, 0x34, 0x45, 0x56, 0x67, 0x78, 0x89, 0x10, 0x1A, 0x1B, 0x1C, 0x1D, 0x1E, 0x1F, 0x2F,
];

/// Scenario start address; 4 KiB sector aligned
const START_ADDR: u32 = 0x2000;

type Scenario<M> = fn(&mut SpiFlash<M>) -> Result<bool>;

/// All scenarios, in run order
fn scenarios<M: SpiMaster>() -> [(&'static str, Scenario<M>); 4] {
    [
        ("write_read_simple", write_read_simple),
        ("write_read_block_pattern", write_read_block_pattern),
        ("write_multiple_read_single", write_multiple_read_single),
        ("write_single_read_multiple", write_single_read_multiple),
    ]
}

/// Run every scenario and report PASSED/FAILED for each
pub fn run_selftest(session: &mut Session) -> std::result::Result<(), CliError> {
    let failed = run_all(session.flash());
    if failed == 0 {
        println!("All scenarios passed");
        Ok(())
    } else {
        Err(CliError::SelftestFailed(failed))
    }
}

/// Run every scenario, returning the number that failed
pub fn run_all<M: SpiMaster>(flash: &mut SpiFlash<M>) -> usize {
    let mut failed = 0;
    for (name, scenario) in scenarios::<M>() {
        let passed = match scenario(flash) {
            Ok(passed) => passed,
            Err(e) => {
                log::error!("{}: {}", name, e);
                false
            }
        };
        println!(
            "Executing test: {:<40} : {}",
            name,
            if passed { "PASSED" } else { "FAILED" }
        );
        if !passed {
            failed += 1;
        }
    }
    failed
}

/// Compare, logging the first mismatch
fn compare(name: &str, address: u32, expected: &[u8], found: &[u8]) -> bool {
    match expected.iter().zip(found).position(|(a, b)| a != b) {
        Some(i) => {
            log::error!(
                "{}: mismatch at 0x{:06X}: sent {:02X}, received {:02X}",
                name,
                address as usize + i,
                expected[i],
                found[i]
            );
            false
        }
        None => true,
    }
}

/// 16 bytes at 0x100
fn write_read_simple<M: SpiMaster>(flash: &mut SpiFlash<M>) -> Result<bool> {
    let address = 0x100;
    flash.erase_sector(address)?;
    flash.program(address, &PATTERN)?;

    let mut buf = [0u8; 16];
    flash.read(address, &mut buf)?;
    Ok(compare("write_read_simple", address, &PATTERN, &buf))
}

/// 1 KiB of a different fill byte in each of 16 consecutive sectors
fn write_read_block_pattern<M: SpiMaster>(flash: &mut SpiFlash<M>) -> Result<bool> {
    let sector_size = flash.context().profile.sector_size;
    let mut buf = vec![0u8; KIB];

    for (i, &fill) in PATTERN.iter().enumerate() {
        let address = START_ADDR + i as u32 * sector_size;
        log::debug!("block pattern {} of {} at 0x{:06X}", i + 1, PATTERN.len(), address);

        let block = [fill; KIB];
        flash.erase_sector(address)?;
        flash.program(address, &block)?;

        buf.fill(0);
        flash.read(address, &mut buf)?;
        if !compare("write_read_block_pattern", address, &block, &buf) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// The first four fill bytes as 1 KiB blocks
fn four_blocks() -> Vec<u8> {
    PATTERN[..4].iter().flat_map(|&fill| [fill; KIB]).collect()
}

/// Four 1 KiB writes, one 4 KiB read
fn write_multiple_read_single<M: SpiMaster>(flash: &mut SpiFlash<M>) -> Result<bool> {
    let source = four_blocks();
    flash.erase_sector(START_ADDR)?;

    for (i, block) in source.chunks(KIB).enumerate() {
        flash.program(START_ADDR + (i * KIB) as u32, block)?;
    }

    let mut buf = vec![0u8; 4 * KIB];
    flash.read(START_ADDR, &mut buf)?;
    Ok(compare("write_multiple_read_single", START_ADDR, &source, &buf))
}

/// One 4 KiB write, four 1 KiB reads
fn write_single_read_multiple<M: SpiMaster>(flash: &mut SpiFlash<M>) -> Result<bool> {
    let source = four_blocks();
    flash.erase_sector(START_ADDR)?;
    flash.program(START_ADDR, &source)?;

    let mut buf = vec![0u8; 4 * KIB];
    for (i, chunk) in buf.chunks_mut(KIB).enumerate() {
        flash.read(START_ADDR + (i * KIB) as u32, chunk)?;
    }
    Ok(compare("write_single_read_multiple", START_ADDR, &source, &buf))
}
