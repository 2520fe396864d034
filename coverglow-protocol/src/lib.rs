//! Coverglow host link protocol
//!
//! The companion host fetches "now playing" data, decodes cover art and
//! pushes the results to the board over UART. Every message travels in a
//! small checksummed frame:
//!
//! ```text
//! ┌──────┬────────┬──────┬─────────────┬──────────┐
//! │ SYNC │ LENGTH │ TYPE │ PAYLOAD     │ CHECKSUM │
//! │ 1B   │ 1B     │ 1B   │ 0–250B      │ 1B       │
//! └──────┴────────┴──────┴─────────────┴──────────┘
//! ```
//!
//! The checksum is the XOR of LENGTH, TYPE and every payload byte.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod frame;
pub mod messages;

pub use frame::{Frame, FrameDecoder, FrameError, FRAME_SYNC, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};
pub use messages::{BoardReply, HostMessage, ImageBlock, MessageError, MAX_BLOCK_PIXELS};
