//! norflash - Serial NOR flash command protocol tool
//!
//! Drives an emulated MX25R6435F or N25Q128A through the command protocol
//! layer in `norflash-core`: bring-up, sector erase, page programming,
//! range reads and the performance mode switch. The emulated device can be
//! backed by an image file so that its contents persist between runs.
//!
//! # Architecture
//!
//! Every subcommand opens a [`commands::Session`], which resets the device
//! and switches it to high performance mode before the command runs.
//! Commands that change flash contents write the image back afterwards.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use commands::{Session, SessionOptions};
use norflash_core::protocol::PerformanceMode;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    let options = SessionOptions {
        model: cli.model,
        profile: cli.profile,
        max_polls: cli.max_polls,
        busy_polls: cli.busy_polls,
        image: cli.image,
    };

    let mut session = match Session::open(&options) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Failed to bring up flash device: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Selftest => commands::selftest::run_selftest(&mut session)?,
        Commands::Erase { address } => {
            commands::erase::run_erase(&mut session, address)?;
            session.save()?;
        }
        Commands::Write {
            address,
            input,
            erase,
        } => {
            commands::write::run_write(&mut session, address, &input, erase)?;
            session.save()?;
        }
        Commands::Read {
            address,
            length,
            output,
        } => commands::read::run_read(&mut session, address, length, &output)?,
        Commands::Hpm { low_power } => {
            let mode = if low_power {
                PerformanceMode::LowPower
            } else {
                PerformanceMode::HighPerformance
            };
            commands::hpm::run_hpm(&mut session, mode)?
        }
        Commands::Profile => commands::profile::run_profile(&session)?,
    }

    Ok(())
}
