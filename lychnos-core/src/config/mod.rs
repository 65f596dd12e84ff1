//! Display configuration
//!
//! Types plus a minimal TOML loader. The loader handles only the subset
//! this configuration needs:
//!
//! - `key = value` pairs (string, integer)
//! - `[section]` headers
//! - comments (`# ...`) and blank lines
//!
//! Unknown keys are ignored so a shared controller config file can carry
//! sections for other subsystems.

mod types;

pub use types::{DisplayConfig, FontConfig, IdleConfig, MAX_FAMILY_LEN};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Malformed section header
    InvalidSection,
    /// Malformed line or value of the wrong type/range
    InvalidValue,
    /// String exceeded its bounded capacity
    ValueTooLong,
}

#[derive(Clone, Copy)]
enum Section {
    Root,
    Display,
    Idle,
    Font,
}

impl DisplayConfig {
    /// Parse a TOML document, starting from defaults.
    pub fn from_toml(input: &str) -> Result<Self, ParseError> {
        let mut config = DisplayConfig::default();
        let mut section = Section::Root;

        for line in input.lines() {
            let line = match line.split_once('#') {
                Some((before, _)) => before.trim(),
                None => line.trim(),
            };
            if line.is_empty() {
                continue;
            }

            if let Some(header) = line.strip_prefix('[') {
                let name = header.strip_suffix(']').ok_or(ParseError::InvalidSection)?;
                section = match name.trim() {
                    "display" => Section::Display,
                    "idle" | "display.idle" => Section::Idle,
                    "font" | "display.font" => Section::Font,
                    _ => Section::Root, // other subsystems' sections
                };
                continue;
            }

            let (key, value) = line.split_once('=').ok_or(ParseError::InvalidValue)?;
            let (key, value) = (key.trim(), value.trim());

            match (section, key) {
                (Section::Display, "columns") => config.columns = parse_int(value)?,
                (Section::Display, "rows") => config.rows = parse_int(value)?,
                (Section::Display, "contrast") => {
                    let v: u32 = parse_int(value)?;
                    config.contrast = u8::try_from(v).map_err(|_| ParseError::InvalidValue)?;
                }
                (Section::Idle, "dim_seconds") => config.idle.dim_secs = parse_int(value)?,
                (Section::Idle, "sleep_seconds") => config.idle.sleep_secs = parse_int(value)?,
                (Section::Font, "family") => {
                    let s = parse_string(value)?;
                    config.font.family.clear();
                    config
                        .font
                        .family
                        .push_str(s)
                        .map_err(|_| ParseError::ValueTooLong)?;
                }
                (Section::Font, "size") => config.font.size = parse_int(value)?,
                _ => {} // unknown key: ignore
            }
        }

        Ok(config)
    }
}

fn parse_int(value: &str) -> Result<u32, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_string(value: &str) -> Result<&str, ParseError> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(ParseError::InvalidValue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_gives_defaults() {
        assert_eq!(DisplayConfig::from_toml("").unwrap(), DisplayConfig::default());
    }

    #[test]
    fn parses_a_full_document() {
        let input = r#"
# panel on the front of the enclosure
[display]
columns = 128
rows = 32
contrast = 200

[idle]
dim_seconds = 10
sleep_seconds = 0

[font]
family = "panel-mono-bold"
size = 18
"#;
        let config = DisplayConfig::from_toml(input).unwrap();
        assert_eq!(config.columns, 128);
        assert_eq!(config.rows, 32);
        assert_eq!(config.contrast, 200);
        assert_eq!(config.idle.dim_secs, 10);
        assert_eq!(config.idle.sleep_secs, 0);
        assert_eq!(config.font.family.as_str(), "panel-mono-bold");
        assert_eq!(config.font.size, 18);
    }

    #[test]
    fn ignores_foreign_sections_and_keys() {
        let input = r#"
[display]
rows = 32
backlight = "none"

[leds]
count = 4
"#;
        let config = DisplayConfig::from_toml(input).unwrap();
        assert_eq!(config.rows, 32);
        assert_eq!(config.columns, 128);
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            DisplayConfig::from_toml("[display]\ncontrast = 300"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            DisplayConfig::from_toml("[display\nrows = 64"),
            Err(ParseError::InvalidSection)
        );
        assert_eq!(
            DisplayConfig::from_toml("[font]\nfamily = bare"),
            Err(ParseError::InvalidValue)
        );
    }

    #[test]
    fn rejects_oversized_family_names() {
        let input = "[font]\nfamily = \"a-very-long-family-name-that-cannot-fit\"";
        assert_eq!(DisplayConfig::from_toml(input), Err(ParseError::ValueTooLong));
    }
}
