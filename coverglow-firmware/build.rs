//! Build script for coverglow-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates display.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use coverglow_core::config::{DisplayConfig, ValidationError};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate display.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=display.toml");

    let config_path = Path::new("display.toml");
    if !config_path.exists() {
        fail(
            "display.toml not found",
            &["The firmware embeds display.toml from the crate directory."],
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read display.toml", &[e.to_string().as_str()]),
    };

    // Syntax and unknown sections
    let value: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            let msg = e.to_string();
            let lines: Vec<&str> = msg.lines().collect();
            fail("Invalid TOML syntax in display.toml", &lines);
        }
    };
    validate_sections(&value);

    // Types and ranges, through the same struct the firmware uses
    let config: DisplayConfig = match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            let msg = e.to_string();
            let lines: Vec<&str> = msg.lines().collect();
            fail("Invalid value in display.toml", &lines);
        }
    };
    if let Err(e) = config.validate() {
        fail("Out-of-range value in display.toml", &[describe(e)]);
    }

    println!("cargo:warning=display.toml validated successfully");
}

/// Only the sections the firmware understands may appear
fn validate_sections(value: &toml::Value) {
    const KNOWN: [&str; 4] = ["matrix", "lcd", "clock", "link"];

    let Some(table) = value.as_table() else {
        return;
    };
    let errors: Vec<String> = table
        .keys()
        .filter(|key| !KNOWN.contains(&key.as_str()))
        .map(|key| format!("Unknown section [{}]", key))
        .collect();

    if !errors.is_empty() {
        let lines: Vec<&str> = errors.iter().map(String::as_str).collect();
        fail("Unexpected sections in display.toml", &lines);
    }
}

fn describe(error: ValidationError) -> &'static str {
    match error {
        ValidationError::LcdAddress => "[lcd] address must be a 7-bit I2C address",
        ValidationError::RefreshPeriod => "[lcd] refresh_ms must be greater than 0",
        ValidationError::UtcOffset => "[clock] utc_offset_min must be within +/-840",
        ValidationError::Baudrate => "[link] baudrate must be greater than 0",
    }
}

/// Abort the build with a boxed error message
fn fail(title: &str, details: &[&str]) -> ! {
    let body = details
        .iter()
        .map(|line| {
            let truncated = if line.len() > 62 {
                format!("{}...", &line[..59])
            } else {
                line.to_string()
            };
            format!("║  • {:<62} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n");

    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}
