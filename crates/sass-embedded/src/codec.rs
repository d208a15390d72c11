//! The embedded protocol's wire framing: each packet is
//! `varint(length) · varint(compilation_id) · message_bytes`, where the
//! length counts the compilation-ID varint as well as the message bytes.

use bytes::{Buf, Bytes, BytesMut};

/// A framing violation. These are not recoverable: the byte stream is
/// desynchronized and the compiler must be restarted.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum FrameError {
    #[error("frame varint is wider than 64 bits")]
    VarintOverflow,
    #[error("compilation ID {0} is wider than 32 bits")]
    IdOverflow(u64),
    #[error("frame length {frame_len} is shorter than its compilation ID ({id_len} bytes)")]
    BadLength { frame_len: u64, id_len: u64 },
}

/// Encode one frame. The three parts are materialized into a single buffer
/// so the caller can hand the whole frame to one write.
pub(crate) fn encode_frame(compilation_id: u32, body: &[u8]) -> Bytes {
    let id_len = encoded_length_of(compilation_id);
    let frame_len = body.len() as u64 + id_len as u64;

    let mut buf = BytesMut::with_capacity(varint_length(frame_len) + id_len + body.len());
    put_varint(&mut buf, frame_len);
    put_varint(&mut buf, compilation_id as u64);
    buf.extend_from_slice(body);
    buf.freeze()
}

/// The encoded width of a compilation ID, for pre-sizing buffers.
pub(crate) fn encoded_length_of(compilation_id: u32) -> usize {
    varint_length(compilation_id as u64)
}

fn varint_length(value: u64) -> usize {
    (((64 - value.leading_zeros()).max(1) + 6) / 7) as usize
}

fn put_varint(buf: &mut BytesMut, mut value: u64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            buf.extend_from_slice(&[byte]);
            return;
        }
        buf.extend_from_slice(&[byte | 0x80]);
    }
}

/// An in-progress varint. Bytes are fed one at a time so a varint split
/// across reads picks up where it left off.
#[derive(Debug, Default)]
struct Varint {
    value: u64,
    shift: u32,
}

impl Varint {
    fn push(&mut self, byte: u8) -> Result<Option<u64>, FrameError> {
        // The tenth byte may only carry the 64th bit, and may not continue.
        if self.shift >= 64 || (self.shift == 63 && byte & 0xfe != 0) {
            return Err(FrameError::VarintOverflow);
        }
        self.value |= ((byte & 0x7f) as u64) << self.shift;
        if byte & 0x80 == 0 {
            return Ok(Some(self.value));
        }
        self.shift += 7;
        Ok(None)
    }

    fn len(&self) -> u64 {
        (self.shift / 7 + 1) as u64
    }
}

#[derive(Debug)]
enum State {
    /// Reading the frame-length varint.
    FrameLen(Varint),
    /// Reading the compilation-ID varint, whose bytes count against
    /// `frame_len`.
    CompilationId { frame_len: u64, varint: Varint },
    /// Accumulating `remaining` body bytes.
    Body {
        compilation_id: u32,
        body: BytesMut,
        remaining: usize,
    },
}

/// Incremental frame decoder. Feed it the stream's bytes as they arrive;
/// it consumes exactly what it needs and yields `(compilation_id, body)`
/// pairs as frames complete.
#[derive(Debug)]
pub(crate) struct Decoder {
    state: State,
}

impl Decoder {
    pub(crate) fn new() -> Self {
        Self {
            state: State::FrameLen(Varint::default()),
        }
    }

    /// Consume bytes from `input` and return the next complete frame, or
    /// `None` once `input` is exhausted mid-frame.
    pub(crate) fn decode(
        &mut self,
        input: &mut BytesMut,
    ) -> Result<Option<(u32, Bytes)>, FrameError> {
        loop {
            match &mut self.state {
                State::FrameLen(varint) => {
                    if input.is_empty() {
                        return Ok(None);
                    }
                    if let Some(frame_len) = varint.push(input.get_u8())? {
                        self.state = State::CompilationId {
                            frame_len,
                            varint: Varint::default(),
                        };
                    }
                }
                State::CompilationId { frame_len, varint } => {
                    if input.is_empty() {
                        return Ok(None);
                    }
                    if let Some(id) = varint.push(input.get_u8())? {
                        if id > u32::MAX as u64 {
                            return Err(FrameError::IdOverflow(id));
                        }
                        let id_len = varint.len();
                        let Some(body_len) = frame_len.checked_sub(id_len) else {
                            return Err(FrameError::BadLength {
                                frame_len: *frame_len,
                                id_len,
                            });
                        };
                        self.state = State::Body {
                            compilation_id: id as u32,
                            body: BytesMut::with_capacity(body_len as usize),
                            remaining: body_len as usize,
                        };
                    }
                }
                State::Body {
                    compilation_id,
                    body,
                    remaining,
                } => {
                    let take = (*remaining).min(input.len());
                    body.extend_from_slice(&input[..take]);
                    input.advance(take);
                    *remaining -= take;

                    if *remaining > 0 {
                        return Ok(None);
                    }
                    let frame = (*compilation_id, std::mem::take(body).freeze());
                    self.state = State::FrameLen(Varint::default());
                    return Ok(Some(frame));
                }
            }
        }
    }
}
