//! Configuration type definitions

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum font family name length
pub const MAX_FAMILY_LEN: usize = 24;

/// Idle thresholds driving the Dim/Sleep machine. A zero disables the
/// corresponding transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IdleConfig {
    /// Seconds of inactivity before the panel dims.
    pub dim_secs: u32,
    /// Seconds of further inactivity before the panel sleeps.
    pub sleep_secs: u32,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            dim_secs: 45,
            sleep_secs: 60,
        }
    }
}

/// Default font selection for messages.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FontConfig {
    /// Family name looked up in the font catalog.
    pub family: String<MAX_FAMILY_LEN>,
    /// Nominal pixel size.
    pub size: u32,
}

impl Default for FontConfig {
    fn default() -> Self {
        let mut family = String::new();
        let _ = family.push_str(crate::text::DEFAULT_FAMILY);
        Self { family, size: 12 }
    }
}

/// Full display configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// Panel width in pixels.
    pub columns: u32,
    /// Panel height in pixels.
    pub rows: u32,
    /// Initial contrast byte.
    pub contrast: u8,
    pub idle: IdleConfig,
    pub font: FontConfig,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            columns: 128,
            rows: 64,
            contrast: 255,
            idle: IdleConfig::default(),
            font: FontConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_a_128x64_panel() {
        let config = DisplayConfig::default();
        assert_eq!(config.columns, 128);
        assert_eq!(config.rows, 64);
        assert_eq!(config.contrast, 255);
        assert_eq!(config.idle.dim_secs, 45);
        assert_eq!(config.idle.sleep_secs, 60);
        assert_eq!(config.font.family.as_str(), "panel-mono");
        assert_eq!(config.font.size, 12);
    }
}
