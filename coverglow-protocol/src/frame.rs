//! Link framing
//!
//! `Frame` carries one message type and its payload. `FrameDecoder`
//! reassembles frames from a byte stream, resynchronizing on the sync
//! byte after noise or a corrupted frame.

use heapless::Vec;

/// Frame synchronization byte
pub const FRAME_SYNC: u8 = 0xAA;

/// Largest payload a frame can carry
pub const MAX_PAYLOAD_SIZE: usize = 250;

/// SYNC + LENGTH + TYPE + CHECKSUM
const OVERHEAD: usize = 4;

/// Largest encoded frame
pub const MAX_FRAME_SIZE: usize = MAX_PAYLOAD_SIZE + OVERHEAD;

/// Framing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload longer than `MAX_PAYLOAD_SIZE`
    PayloadTooLarge,
    /// LENGTH byte announces more than `MAX_PAYLOAD_SIZE`
    BadLength,
    /// Checksum byte does not match the frame contents
    BadChecksum,
    /// Output buffer cannot hold the encoded frame
    BufferTooSmall,
}

fn checksum(kind: u8, payload: &[u8]) -> u8 {
    payload
        .iter()
        .fold(payload.len() as u8 ^ kind, |acc, &b| acc ^ b)
}

/// One link frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Message type
    pub kind: u8,
    /// Message body
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Build a frame, failing if `payload` is too long
    pub fn new(kind: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let payload = Vec::from_slice(payload).map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self { kind, payload })
    }

    /// A frame with an empty payload
    pub const fn bare(kind: u8) -> Self {
        Self {
            kind,
            payload: Vec::new(),
        }
    }

    /// Size of the encoded frame in bytes
    pub fn encoded_len(&self) -> usize {
        self.payload.len() + OVERHEAD
    }

    /// Encode into `out`, returning the number of bytes written
    pub fn encode(&self, out: &mut [u8]) -> Result<usize, FrameError> {
        let len = self.encoded_len();
        let out = out.get_mut(..len).ok_or(FrameError::BufferTooSmall)?;
        let (head, rest) = out.split_at_mut(3);
        let (body, tail) = rest.split_at_mut(self.payload.len());

        head.copy_from_slice(&[FRAME_SYNC, self.payload.len() as u8, self.kind]);
        body.copy_from_slice(&self.payload);
        tail[0] = checksum(self.kind, &self.payload);
        Ok(len)
    }

    /// Encode into a fixed-capacity buffer
    pub fn to_bytes(&self) -> Vec<u8, MAX_FRAME_SIZE> {
        let mut buf = [0u8; MAX_FRAME_SIZE];
        // Any frame fits MAX_FRAME_SIZE by construction
        let len = self.encode(&mut buf).unwrap_or(0);
        Vec::from_slice(&buf[..len]).unwrap_or_default()
    }
}

/// Decoder position within a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Sync,
    Length,
    Kind { len: u8 },
    Payload { len: u8, kind: u8 },
    Checksum { kind: u8 },
}

/// Incremental frame decoder
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    stage: Stage,
    payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    pub const fn new() -> Self {
        Self {
            stage: Stage::Sync,
            payload: Vec::new(),
        }
    }

    /// Drop any partial frame and wait for the next sync byte
    pub fn reset(&mut self) {
        self.stage = Stage::Sync;
        self.payload.clear();
    }

    /// Whether the decoder is between frames
    pub fn is_idle(&self) -> bool {
        self.stage == Stage::Sync
    }

    /// Consume one byte
    ///
    /// Returns a frame once its checksum byte arrives. Bytes outside a
    /// frame are skipped silently; a bad length or checksum drops the
    /// partial frame and reports the error.
    pub fn push(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        self.stage = match self.stage {
            Stage::Sync if byte == FRAME_SYNC => Stage::Length,
            Stage::Sync => Stage::Sync,
            Stage::Length if byte as usize > MAX_PAYLOAD_SIZE => {
                self.reset();
                return Err(FrameError::BadLength);
            }
            Stage::Length => Stage::Kind { len: byte },
            Stage::Kind { len: 0 } => Stage::Checksum { kind: byte },
            Stage::Kind { len } => {
                self.payload.clear();
                Stage::Payload { len, kind: byte }
            }
            Stage::Payload { len, kind } => {
                // Capacity covers every accepted LENGTH
                let _ = self.payload.push(byte);
                if self.payload.len() == len as usize {
                    Stage::Checksum { kind }
                } else {
                    Stage::Payload { len, kind }
                }
            }
            Stage::Checksum { kind } => {
                let valid = byte == checksum(kind, &self.payload);
                let frame = Frame {
                    kind,
                    payload: core::mem::take(&mut self.payload),
                };
                self.reset();
                return if valid {
                    Ok(Some(frame))
                } else {
                    Err(FrameError::BadChecksum)
                };
            }
        };
        Ok(None)
    }

    /// Consume a chunk of bytes, handing every outcome to `on_frame`
    ///
    /// Unlike [`push`](Self::push) this never stops early, so a read
    /// buffer holding several frames is drained in one call.
    pub fn decode<F>(&mut self, bytes: &[u8], mut on_frame: F)
    where
        F: FnMut(Result<Frame, FrameError>),
    {
        for &byte in bytes {
            match self.push(byte) {
                Ok(Some(frame)) => on_frame(Ok(frame)),
                Ok(None) => {}
                Err(e) => on_frame(Err(e)),
            }
        }
    }
}
