//! CLI argument parsing

use clap::{Parser, Subcommand};
use norflash_core::device::DeviceModel;
use norflash_core::flash::PollPolicy;
use std::path::PathBuf;

/// Parse a string as a hex or decimal u32
fn parse_hex_u32(s: &str) -> Result<u32, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u32>().map_err(|e| format!("Invalid number: {}", e))
    }
}

/// Parse a device model by part name
fn parse_model(s: &str) -> Result<DeviceModel, String> {
    DeviceModel::from_name(s).ok_or_else(|| {
        let names: Vec<&str> = DeviceModel::ALL.iter().map(|m| m.name()).collect();
        format!("Unknown model '{}' [available: {}]", s, names.join(", "))
    })
}

#[derive(Parser)]
#[command(name = "norflash")]
#[command(author, version, about = "Serial NOR flash command protocol tool", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Device model to emulate (MX25R6435F, N25Q128A)
    #[arg(short, long, global = true, default_value = "MX25R6435F", value_parser = parse_model)]
    pub model: DeviceModel,

    /// Device profile file (RON format), overrides --model
    #[arg(long, global = true)]
    pub profile: Option<PathBuf>,

    /// Status reads before a busy device is given up on
    #[arg(long, global = true, default_value_t = PollPolicy::DEFAULT_MAX_ATTEMPTS, value_parser = parse_hex_u32)]
    pub max_polls: u32,

    /// Status reads the emulated device stays busy after each operation
    #[arg(long, global = true, default_value_t = 2, value_parser = parse_hex_u32)]
    pub busy_polls: u32,

    /// Flash image backing the emulated device; created if missing
    #[arg(long, global = true)]
    pub image: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the write/read validation scenarios
    Selftest,

    /// Erase the sector containing an address
    Erase {
        /// Any address inside the sector (hex, e.g., 0x2000)
        #[arg(short, long, value_parser = parse_hex_u32)]
        address: u32,
    },

    /// Program file contents at an address
    Write {
        /// Start address (hex or decimal)
        #[arg(short, long, value_parser = parse_hex_u32)]
        address: u32,

        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Erase the covered sectors first
        #[arg(long)]
        erase: bool,
    },

    /// Read a range of flash to a file
    Read {
        /// Start address (hex or decimal)
        #[arg(short, long, value_parser = parse_hex_u32)]
        address: u32,

        /// Number of bytes to read (hex or decimal)
        #[arg(short, long, value_parser = parse_hex_u32)]
        length: u32,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show or change the performance mode
    Hpm {
        /// Switch to low-power mode instead of high-performance
        #[arg(long)]
        low_power: bool,
    },

    /// Print the active device profile (RON format)
    Profile,
}
