//! LED matrix drivers

pub mod neomatrix;

pub use neomatrix::{zigzag_index, LedStrip, NeoMatrix};
