//! CLI command implementations
//!
//! Every command runs against a [`Session`]: an emulated device that has
//! already been reset and switched to high performance mode. Physical
//! transports plug in behind the same `SpiMaster` trait; only the emulator
//! is wired up here.

pub mod erase;
pub mod hpm;
pub mod profile;
pub mod read;
pub mod selftest;
pub mod write;

use indicatif::{ProgressBar, ProgressStyle};
use norflash_core::device::{DeviceModel, DeviceProfile, ProfileError};
use norflash_core::flash::{FlashContext, PollPolicy, SpiFlash};
use norflash_dummy::{DummyConfig, DummyFlash};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors surfaced by CLI commands
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Protocol or transport failure
    #[error("flash error: {0}")]
    Flash(#[from] norflash_core::Error),
    /// Profile could not be loaded or printed
    #[error("profile error: {0}")]
    Profile(#[from] ProfileError),
    /// File I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Progress bar template rejected
    #[error("progress bar error: {0}")]
    Progress(#[from] indicatif::style::TemplateError),
    /// Input does not fit the device
    #[error("{len} bytes at 0x{address:06X} exceed the {size} byte device")]
    OutOfRange {
        /// Start address
        address: u32,
        /// Requested length
        len: usize,
        /// Device size
        size: u32,
    },
    /// One or more validation scenarios failed
    #[error("{0} selftest scenario(s) failed")]
    SelftestFailed(usize),
}

/// How to set up a session
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Built-in model, used when no profile file is given
    pub model: DeviceModel,
    /// RON profile file
    pub profile: Option<PathBuf>,
    /// Status poll ceiling
    pub max_polls: u32,
    /// Busy latency of the emulated device
    pub busy_polls: u32,
    /// Backing image file
    pub image: Option<PathBuf>,
}

/// A brought-up emulated device, optionally backed by an image file
pub struct Session {
    flash: SpiFlash<DummyFlash>,
    image: Option<PathBuf>,
}

impl Session {
    /// Build the emulated device, load the image and run bring-up
    pub fn open(options: &SessionOptions) -> Result<Self, CliError> {
        let profile = load_profile(options)?;
        println!(
            "Device: {} ({} bytes, {} byte pages, {} byte sectors)",
            profile.model, profile.total_size, profile.page_size, profile.sector_size
        );

        let config = DummyConfig {
            profile,
            busy_polls: options.busy_polls,
            ..DummyConfig::default()
        };
        let dummy = match &options.image {
            Some(path) if path.exists() => {
                DummyFlash::with_data(config, &read_image(path, &profile)?)
            }
            _ => DummyFlash::new(config),
        };

        let ctx =
            FlashContext::new(profile)?.with_poll_policy(PollPolicy::new(options.max_polls));
        let mut flash = SpiFlash::new(dummy, ctx)?;
        flash.bring_up()?;

        Ok(Self {
            flash,
            image: options.image.clone(),
        })
    }

    /// The brought-up device
    pub fn flash(&mut self) -> &mut SpiFlash<DummyFlash> {
        &mut self.flash
    }

    /// The active profile
    pub fn profile(&self) -> &DeviceProfile {
        &self.flash.context().profile
    }

    /// Write the device contents back to the image file, if any
    pub fn save(&self) -> Result<(), CliError> {
        if let Some(path) = &self.image {
            fs::write(path, self.flash.master().data())?;
            println!("Saved image to {:?}", path);
        }
        Ok(())
    }

    /// Reject a range that does not fit the device
    fn check_range(&self, address: u32, len: usize) -> Result<(), CliError> {
        let profile = self.profile();
        if profile.contains(address, len) {
            Ok(())
        } else {
            Err(CliError::OutOfRange {
                address,
                len,
                size: profile.total_size,
            })
        }
    }
}

fn load_profile(options: &SessionOptions) -> Result<DeviceProfile, CliError> {
    match &options.profile {
        Some(path) => {
            let profile = DeviceProfile::load(path)?;
            log::info!("Loaded {} profile from {:?}", profile.model, path);
            Ok(profile)
        }
        None => Ok(options.model.profile()),
    }
}

fn read_image(path: &Path, profile: &DeviceProfile) -> Result<Vec<u8>, CliError> {
    let data = fs::read(path)?;
    if data.len() != profile.total_size as usize {
        log::warn!(
            "Image {:?} is {} bytes, device is {} bytes",
            path,
            data.len(),
            profile.total_size
        );
    }
    log::info!("Loaded {} bytes from {:?}", data.len(), path);
    Ok(data)
}

/// Create a byte progress bar in the standard style
fn progress_bar(total: u64) -> Result<ProgressBar, CliError> {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

#[cfg(test)]
pub(crate) fn test_session() -> Session {
    let options = SessionOptions {
        model: DeviceModel::Mx25r6435f,
        profile: None,
        max_polls: PollPolicy::DEFAULT_MAX_ATTEMPTS,
        busy_polls: 2,
        image: None,
    };
    Session::open(&options).unwrap()
}
