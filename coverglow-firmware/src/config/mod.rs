//! Configuration loading
//!
//! The configuration is compiled into the image from display.toml and
//! parsed at boot with the no-alloc parser from coverglow-core.

use defmt::*;

use coverglow_core::config::{parse_config, DisplayConfig};

/// Embedded configuration (compiled into firmware)
/// Edit display.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../../display.toml");

/// Parse and validate the embedded configuration
///
/// Falls back to built-in defaults if the file does not parse or holds
/// out-of-range values. build.rs rejects such files, so this only
/// happens when the two parsers disagree.
pub fn load_config() -> DisplayConfig {
    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            error!("Embedded config line {}: {:?}", e.line, e.kind);
            return DisplayConfig::default();
        }
    };

    if let Err(e) = config.validate() {
        error!("Embedded config rejected: {:?}", e);
        return DisplayConfig::default();
    }

    info!(
        "Config: brightness={}, fade={}ms/{}ms, lcd={:#x} every {}ms, utc offset {}min",
        config.matrix.brightness,
        config.matrix.transition_ms,
        config.matrix.step_ms,
        config.lcd.address,
        config.lcd.refresh_ms,
        config.clock.utc_offset_min
    );
    config
}
