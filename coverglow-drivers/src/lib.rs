//! Display driver implementations
//!
//! Concrete implementations of the sink traits defined in coverglow-core:
//!
//! - HD44780 16x2 character LCD behind a PCF8574 I2C backpack
//! - 16x16 WS2812 matrix wired as a column-major zigzag

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod lcd;
pub mod matrix;
