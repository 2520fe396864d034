//! Link messages
//!
//! Host → board: line text, image blocks, time and playback state.
//! Board → host: ping replies and acknowledgements.

use heapless::Vec;

use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};

// Host → board
pub const MSG_SET_LINE: u8 = 0x01;
pub const MSG_IMAGE_BLOCK: u8 = 0x02;
pub const MSG_IMAGE_DONE: u8 = 0x03;
pub const MSG_SET_TIME: u8 = 0x04;
pub const MSG_PLAYBACK: u8 = 0x05;
pub const MSG_PING: u8 = 0x06;

// Board → host
pub const MSG_PONG: u8 = 0x20;
pub const MSG_ACK: u8 = 0x21;

/// Bytes in a line header (row, scroll flag)
const LINE_HEADER: usize = 2;

/// Most UTF-8 bytes of text a single `SetLine` can carry
///
/// The display truncates to its own character limit on assignment.
pub const MAX_LINE_TEXT: usize = MAX_PAYLOAD_SIZE - LINE_HEADER;

/// Bytes in an image block header (x, y, width, height)
const BLOCK_HEADER: usize = 4;

/// Most pixels a single image block can carry
pub const MAX_BLOCK_PIXELS: usize = (MAX_PAYLOAD_SIZE - BLOCK_HEADER) / 2;

/// Message decoding errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageError {
    /// Frame type is not a known message
    UnknownType(u8),
    /// Payload has the wrong length or an out-of-range field
    BadPayload,
    /// Line text is not valid UTF-8
    InvalidUtf8,
}

/// Rectangle of big-endian RGB-565 pixels, row-major
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ImageBlock<'a> {
    pub x: u8,
    pub y: u8,
    pub width: u8,
    pub height: u8,
    data: &'a [u8],
}

impl<'a> ImageBlock<'a> {
    /// Wrap raw pixel bytes, checking they match the block size
    pub fn new(x: u8, y: u8, width: u8, height: u8, data: &'a [u8]) -> Result<Self, MessageError> {
        let pixels = width as usize * height as usize;
        if pixels > MAX_BLOCK_PIXELS || data.len() != pixels * 2 {
            return Err(MessageError::BadPayload);
        }
        Ok(Self {
            x,
            y,
            width,
            height,
            data,
        })
    }

    /// Number of pixels in the block
    pub fn len(&self) -> usize {
        self.data.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw RGB-565 values in row-major order
    pub fn pixels(&self) -> impl Iterator<Item = u16> + 'a {
        self.data
            .chunks_exact(2)
            .map(|px| u16::from_be_bytes([px[0], px[1]]))
    }

    /// Pixel bytes as sent on the wire
    pub fn data(&self) -> &'a [u8] {
        self.data
    }
}

/// Messages from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostMessage<'a> {
    /// Replace the text of one LCD row
    SetLine {
        row: u8,
        scroll: bool,
        text: &'a str,
    },
    /// Part of the next cover image
    ImageBlock(ImageBlock<'a>),
    /// All blocks of the cover image have been sent
    ImageDone,
    /// Current UTC time
    SetTime { hours: u8, minutes: u8 },
    /// Player state
    Playback {
        playing: bool,
        progress_ms: u32,
        duration_ms: u32,
    },
    /// Liveness check
    Ping,
}

fn read_u32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

fn parse_flag(byte: u8) -> Result<bool, MessageError> {
    match byte {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(MessageError::BadPayload),
    }
}

impl<'a> HostMessage<'a> {
    /// Decode a message from a received frame
    pub fn from_frame(frame: &'a Frame) -> Result<Self, MessageError> {
        let p = frame.payload.as_slice();
        match frame.kind {
            MSG_SET_LINE => {
                let [row, scroll, text @ ..] = p else {
                    return Err(MessageError::BadPayload);
                };
                if *row > 1 {
                    return Err(MessageError::BadPayload);
                }
                let text = core::str::from_utf8(text).map_err(|_| MessageError::InvalidUtf8)?;
                Ok(HostMessage::SetLine {
                    row: *row,
                    scroll: parse_flag(*scroll)?,
                    text,
                })
            }
            MSG_IMAGE_BLOCK => {
                let [x, y, w, h, data @ ..] = p else {
                    return Err(MessageError::BadPayload);
                };
                ImageBlock::new(*x, *y, *w, *h, data).map(HostMessage::ImageBlock)
            }
            MSG_IMAGE_DONE if p.is_empty() => Ok(HostMessage::ImageDone),
            MSG_SET_TIME => match p {
                &[hours, minutes] if hours < 24 && minutes < 60 => {
                    Ok(HostMessage::SetTime { hours, minutes })
                }
                _ => Err(MessageError::BadPayload),
            },
            MSG_PLAYBACK => {
                if p.len() != 9 {
                    return Err(MessageError::BadPayload);
                }
                Ok(HostMessage::Playback {
                    playing: parse_flag(p[0])?,
                    progress_ms: read_u32(&p[1..5]),
                    duration_ms: read_u32(&p[5..9]),
                })
            }
            MSG_PING if p.is_empty() => Ok(HostMessage::Ping),
            MSG_IMAGE_DONE | MSG_PING => Err(MessageError::BadPayload),
            other => Err(MessageError::UnknownType(other)),
        }
    }

    /// Encode this message into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        let mut payload = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
        let kind = match self {
            HostMessage::SetLine { row, scroll, text } => {
                payload
                    .extend_from_slice(&[*row, *scroll as u8])
                    .and_then(|_| payload.extend_from_slice(text.as_bytes()))
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                MSG_SET_LINE
            }
            HostMessage::ImageBlock(block) => {
                payload
                    .extend_from_slice(&[block.x, block.y, block.width, block.height])
                    .and_then(|_| payload.extend_from_slice(block.data))
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                MSG_IMAGE_BLOCK
            }
            HostMessage::ImageDone => MSG_IMAGE_DONE,
            HostMessage::SetTime { hours, minutes } => {
                payload
                    .extend_from_slice(&[*hours, *minutes])
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                MSG_SET_TIME
            }
            HostMessage::Playback {
                playing,
                progress_ms,
                duration_ms,
            } => {
                payload
                    .push(*playing as u8)
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                payload
                    .extend_from_slice(&progress_ms.to_be_bytes())
                    .and_then(|_| payload.extend_from_slice(&duration_ms.to_be_bytes()))
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                MSG_PLAYBACK
            }
            HostMessage::Ping => MSG_PING,
        };
        Ok(Frame { kind, payload })
    }

    /// Message type byte
    pub fn kind(&self) -> u8 {
        match self {
            HostMessage::SetLine { .. } => MSG_SET_LINE,
            HostMessage::ImageBlock(_) => MSG_IMAGE_BLOCK,
            HostMessage::ImageDone => MSG_IMAGE_DONE,
            HostMessage::SetTime { .. } => MSG_SET_TIME,
            HostMessage::Playback { .. } => MSG_PLAYBACK,
            HostMessage::Ping => MSG_PING,
        }
    }
}

/// Replies sent back to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoardReply {
    /// Answer to `Ping`
    Pong,
    /// Message of the given type was applied
    Ack(u8),
}

impl BoardReply {
    pub fn to_frame(&self) -> Frame {
        match self {
            BoardReply::Pong => Frame::bare(MSG_PONG),
            BoardReply::Ack(kind) => {
                let mut payload = Vec::new();
                // One byte always fits
                let _ = payload.push(*kind);
                Frame {
                    kind: MSG_ACK,
                    payload,
                }
            }
        }
    }

    /// Decode a reply (host side)
    pub fn from_frame(frame: &Frame) -> Result<Self, MessageError> {
        match (frame.kind, frame.payload.as_slice()) {
            (MSG_PONG, []) => Ok(BoardReply::Pong),
            (MSG_ACK, &[kind]) => Ok(BoardReply::Ack(kind)),
            (MSG_PONG | MSG_ACK, _) => Err(MessageError::BadPayload),
            (other, _) => Err(MessageError::UnknownType(other)),
        }
    }
}
