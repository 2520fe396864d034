//! Display configuration
//!
//! Board-agnostic settings for both displays, parsed from a TOML subset
//! embedded in the firmware image.

pub mod toml;
pub mod types;

pub use self::toml::{parse_config, ConfigError, ParseError};
pub use types::*;
