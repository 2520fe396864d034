//! Collaborator traits
//!
//! These traits define the interface between the rendering logic
//! and hardware-specific implementations.

pub mod clock;
pub mod sink;

pub use clock::ClockSource;
pub use sink::{CharacterSink, PixelSink};
