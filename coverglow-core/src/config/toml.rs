//! Minimal TOML parser for the display configuration
//!
//! Handles only the subset the configuration file uses, without
//! allocation.
//!
//! Supported:
//! - `[section]` headers
//! - `key = value` with integer (decimal or `0x` hex), boolean or
//!   quoted string values
//! - Comments (`# ...`), whole-line or trailing
//!
//! Unknown keys are skipped so newer files still load on older firmware.

use super::types::DisplayConfig;

/// What went wrong on a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Line is neither a header nor `key = value`
    InvalidLine,
    /// Value has the wrong type or is out of range
    InvalidValue,
}

/// Parse failure with its 1-based line number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigError {
    pub line: usize,
    pub kind: ParseError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Matrix,
    Lcd,
    Clock,
    Link,
}

/// Parse TOML text into a [`DisplayConfig`]
///
/// Keys that are absent keep their defaults.
pub fn parse_config(input: &str) -> Result<DisplayConfig, ConfigError> {
    let mut config = DisplayConfig::default();
    let mut section = Section::Root;

    for (index, raw) in input.lines().enumerate() {
        let at = |kind| ConfigError {
            line: index + 1,
            kind,
        };
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') {
            if !line.ends_with(']') {
                return Err(at(ParseError::InvalidSection));
            }
            section = parse_section_header(&line[1..line.len() - 1]).map_err(at)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(at(ParseError::InvalidLine))?;
        apply_value(&mut config, section, key, value).map_err(at)?;
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "matrix" => Ok(Section::Matrix),
        "lcd" => Ok(Section::Lcd),
        "clock" => Ok(Section::Clock),
        "link" => Ok(Section::Link),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Drop a trailing `# comment` that is not inside a string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let (key, value) = (key.trim(), value.trim());
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_unsigned(value: &str) -> Result<u32, ParseError> {
    // TOML allows `_` as a digit separator
    let mut digits: heapless::String<16> = heapless::String::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).map_err(|_| ParseError::InvalidValue)?;
    }
    let parsed = match digits.strip_prefix("0x") {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => digits.parse(),
    };
    parsed.map_err(|_| ParseError::InvalidValue)
}

fn parse_int<T: TryFrom<u32>>(value: &str) -> Result<T, ParseError> {
    T::try_from(parse_unsigned(value)?).map_err(|_| ParseError::InvalidValue)
}

fn parse_signed(value: &str) -> Result<i16, ParseError> {
    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    let magnitude = i32::try_from(parse_unsigned(digits)?).map_err(|_| ParseError::InvalidValue)?;
    let signed = if negative { -magnitude } else { magnitude };
    i16::try_from(signed).map_err(|_| ParseError::InvalidValue)
}

fn apply_value(
    config: &mut DisplayConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ParseError> {
    match (section, key) {
        (Section::Matrix, "brightness") => config.matrix.brightness = parse_int(value)?,
        (Section::Matrix, "transition_ms") => config.matrix.transition_ms = parse_int(value)?,
        (Section::Matrix, "step_ms") => config.matrix.step_ms = parse_int(value)?,

        (Section::Lcd, "address") => config.lcd.address = parse_int(value)?,
        (Section::Lcd, "refresh_ms") => config.lcd.refresh_ms = parse_int(value)?,

        (Section::Clock, "utc_offset_min") => config.clock.utc_offset_min = parse_signed(value)?,
        (Section::Clock, "show_when_idle") => config.clock.show_when_idle = parse_bool(value)?,

        (Section::Link, "baudrate") => config.link.baudrate = parse_int(value)?,

        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# Coverglow display configuration

[matrix]
brightness = 64
transition_ms = 800   # fade length
step_ms = 40

[lcd]
address = 0x3F
refresh_ms = 500

[clock]
utc_offset_min = -300
show_when_idle = false

[link]
baudrate = 230_400
"#;

    #[test]
    fn test_parse_full_file() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.matrix.brightness, 64);
        assert_eq!(config.matrix.transition_ms, 800);
        assert_eq!(config.matrix.step_ms, 40);
        assert_eq!(config.lcd.address, 0x3F);
        assert_eq!(config.lcd.refresh_ms, 500);
        assert_eq!(config.clock.utc_offset_min, -300);
        assert!(!config.clock.show_when_idle);
        assert_eq!(config.link.baudrate, 230_400);
    }

    #[test]
    fn test_empty_input_gives_defaults() {
        assert_eq!(parse_config("").unwrap(), DisplayConfig::default());
        assert_eq!(
            parse_config("# nothing here\n\n").unwrap(),
            DisplayConfig::default()
        );
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config = parse_config("[matrix]\nstep_ms = 0\n").unwrap();
        assert_eq!(config.matrix.step_ms, 0);
        assert_eq!(config.matrix.transition_ms, 1000);
        assert_eq!(config.lcd, Default::default());
    }

    #[test]
    fn test_unknown_key_ignored() {
        let config = parse_config("[lcd]\ncontrast = 3\nrefresh_ms = 250").unwrap();
        assert_eq!(config.lcd.refresh_ms, 250);
    }

    #[test]
    fn test_unknown_section_reports_line() {
        let err = parse_config("[matrix]\nbrightness = 1\n[wifi]\n").unwrap_err();
        assert_eq!(
            err,
            ConfigError {
                line: 3,
                kind: ParseError::InvalidSection
            }
        );
    }

    #[test]
    fn test_invalid_values() {
        let err = parse_config("[matrix]\nbrightness = 300").unwrap_err();
        assert_eq!(err.kind, ParseError::InvalidValue);
        assert_eq!(err.line, 2);

        let err = parse_config("[clock]\nshow_when_idle = yes").unwrap_err();
        assert_eq!(err.kind, ParseError::InvalidValue);

        let err = parse_config("[clock]\nutc_offset_min = 40000").unwrap_err();
        assert_eq!(err.kind, ParseError::InvalidValue);
    }

    #[test]
    fn test_garbage_line() {
        let err = parse_config("[lcd]\njust some words").unwrap_err();
        assert_eq!(err.kind, ParseError::InvalidLine);
    }

    #[test]
    fn test_strip_comment_respects_strings() {
        assert_eq!(strip_comment(r#"name = "a#b" # tail"#), r#"name = "a#b" "#);
        assert_eq!(strip_comment("# whole line"), "");
    }

    #[test]
    fn test_signed_values() {
        assert_eq!(parse_signed("+90"), Ok(90));
        assert_eq!(parse_signed("-0"), Ok(0));
        assert_eq!(parse_signed("-32768"), Ok(i16::MIN));
        assert_eq!(parse_signed("32768"), Err(ParseError::InvalidValue));
    }
}
