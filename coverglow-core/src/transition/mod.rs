//! Color transitions for the pixel matrix
//!
//! A new target frame is never shown directly. The engine crossfades
//! from the currently displayed frame in hue/saturation/value space over
//! a fixed number of steps, then commits the target as the new mirror.

pub mod engine;
pub mod hue;
pub mod state;

pub use engine::{ColorTransitionEngine, Progress, TransitionTiming};
pub use hue::{interpolate, lerp_hue, HsvColor};
pub use state::{TransitionEvent, TransitionState};
