//! Loading device profiles from RON files
//!
//! Only the model is required; every other field falls back to the
//! model's built-in profile:
//!
//! ```ron
//! (
//!     model: Mx25r6435f,
//!     total_size: Some(MiB(8)),
//!     read_mode: Some((opcode: 0x0B, io_mode: Single, dummy_cycles: 8)),
//! )
//! ```

use std::fs;
use std::io;
use std::path::Path;
use std::string::String;

use super::profile::{DeviceModel, DeviceProfile, HighPerformanceBit, OpcodeTable, ReadMode};

/// Error type for profile loading
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// I/O error reading the file
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// RON parsing error
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// RON serialization error
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
    /// Geometry rejected by [`DeviceProfile::validate`]
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Size with human-readable units
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Size {
    /// Size in bytes
    B(u32),
    /// Size in kibibytes (1024 bytes)
    KiB(u32),
    /// Size in mebibytes (1024 * 1024 bytes)
    MiB(u32),
}

impl Size {
    /// Convert to bytes; `None` if the result does not fit in a `u32`
    pub fn to_bytes(self) -> Option<u32> {
        match self {
            Size::B(n) => Some(n),
            Size::KiB(n) => n.checked_mul(1024),
            Size::MiB(n) => n.checked_mul(1024 * 1024),
        }
    }

    /// Express a byte count in the largest unit that divides it
    pub fn from_bytes(bytes: u32) -> Self {
        const MIB: u32 = 1024 * 1024;
        if bytes != 0 && bytes % MIB == 0 {
            Size::MiB(bytes / MIB)
        } else if bytes != 0 && bytes % 1024 == 0 {
            Size::KiB(bytes / 1024)
        } else {
            Size::B(bytes)
        }
    }
}

/// On-disk form of a profile
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct ProfileDef {
    model: DeviceModel,
    #[serde(default)]
    total_size: Option<Size>,
    #[serde(default)]
    page_size: Option<Size>,
    #[serde(default)]
    sector_size: Option<Size>,
    #[serde(default)]
    opcodes: Option<OpcodeTable>,
    #[serde(default)]
    read_mode: Option<ReadMode>,
    #[serde(default)]
    high_performance_mask: Option<u8>,
}

impl ProfileDef {
    fn into_profile(self) -> Result<DeviceProfile, ProfileError> {
        let base = self.model.profile();
        let size = |field: &str, value: Option<Size>, default: u32| match value {
            None => Ok(default),
            Some(size) => size.to_bytes().ok_or_else(|| {
                ProfileError::Validation(std::format!(
                    "{} profile: {} {:?} overflows",
                    self.model,
                    field,
                    size
                ))
            }),
        };
        Ok(DeviceProfile {
            model: self.model,
            total_size: size("total_size", self.total_size, base.total_size)?,
            page_size: size("page_size", self.page_size, base.page_size)?,
            sector_size: size("sector_size", self.sector_size, base.sector_size)?,
            opcodes: self.opcodes.unwrap_or(base.opcodes),
            read_mode: self.read_mode.unwrap_or(base.read_mode),
            high_performance: self
                .high_performance_mask
                .map(|mask| HighPerformanceBit { mask })
                .or(base.high_performance),
        })
    }
}

impl From<&DeviceProfile> for ProfileDef {
    fn from(p: &DeviceProfile) -> Self {
        Self {
            model: p.model,
            total_size: Some(Size::from_bytes(p.total_size)),
            page_size: Some(Size::from_bytes(p.page_size)),
            sector_size: Some(Size::from_bytes(p.sector_size)),
            opcodes: Some(p.opcodes),
            read_mode: Some(p.read_mode),
            high_performance_mask: p.high_performance.map(|hp| hp.mask),
        }
    }
}

impl DeviceProfile {
    /// Parse and validate a profile from RON text
    pub fn from_ron_str(text: &str) -> Result<Self, ProfileError> {
        let def: ProfileDef = ron::from_str(text)?;
        let profile = def.into_profile()?;
        profile.validate().map_err(|e| {
            ProfileError::Validation(std::format!("{} profile: {}", profile.model, e))
        })?;
        Ok(profile)
    }

    /// Load a profile from a RON file
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let text = fs::read_to_string(path)?;
        let profile = Self::from_ron_str(&text)?;
        log::debug!("Loaded {} profile from {}", profile.model, path.display());
        Ok(profile)
    }

    /// Render this profile as RON text that [`Self::from_ron_str`] accepts
    pub fn to_ron_string(&self) -> Result<String, ProfileError> {
        let def = ProfileDef::from(self);
        Ok(ron::ser::to_string_pretty(
            &def,
            ron::ser::PrettyConfig::default(),
        )?)
    }
}
