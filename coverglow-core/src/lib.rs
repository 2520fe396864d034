//! Board-agnostic display logic for the now-playing firmware
//!
//! This crate contains all rendering logic that does not depend on
//! specific hardware implementations:
//!
//! - Collaborator traits (pixel sink, character sink, clock source)
//! - Scrolling text lines for the 16x2 character display
//! - Pixel frames, digit glyphs and the clock face for the 16x16 matrix
//! - HSV color transition engine for matrix crossfades
//! - Configuration type definitions and the embedded config parser

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod matrix;
pub mod text;
pub mod time;
pub mod traits;
pub mod transition;
