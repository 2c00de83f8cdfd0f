//! Newline framing for protocol lines over a byte stream.
//!
//! Wraps [`LinesCodec`] with the [`MAX_LINE_BYTES`] cap. An oversized line is
//! reported as [`Inbound::Oversized`] and a line that is not UTF-8 as
//! [`Inbound::Malformed`], rather than as stream errors, so the connection
//! stays up. In both cases the inner codec has already consumed the bad bytes
//! and decoding resumes with the following line. Only I/O ends the stream.

#[cfg(test)]
#[path = "codec_test.rs"]
mod codec_test;

use std::io;

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder, LinesCodec, LinesCodecError};

use crate::MAX_LINE_BYTES;

/// One unit read off the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A complete line with the newline (and any trailing `\r`) stripped.
    Line(String),
    /// A line longer than [`MAX_LINE_BYTES`] was skipped.
    Oversized,
    /// A line that is not valid UTF-8 was skipped.
    Malformed,
}

/// Line framing codec shared by server sessions and the client agent.
#[derive(Debug, Clone)]
pub struct LineCodec {
    inner: LinesCodec,
}

impl LineCodec {
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_length(MAX_LINE_BYTES)
    }

    #[must_use]
    pub fn with_max_length(max: usize) -> Self {
        Self { inner: LinesCodec::new_with_max_length(max) }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn lift(result: Result<Option<String>, LinesCodecError>) -> Result<Option<Inbound>, io::Error> {
    match result {
        Ok(line) => Ok(line.map(Inbound::Line)),
        Err(LinesCodecError::MaxLineLengthExceeded) => Ok(Some(Inbound::Oversized)),
        Err(LinesCodecError::Io(e)) if e.kind() == io::ErrorKind::InvalidData => Ok(Some(Inbound::Malformed)),
        Err(LinesCodecError::Io(e)) => Err(e),
    }
}

impl Decoder for LineCodec {
    type Item = Inbound;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Inbound>, io::Error> {
        lift(self.inner.decode(src))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Inbound>, io::Error> {
        lift(self.inner.decode_eof(src))
    }
}

impl<T: AsRef<str>> Encoder<T> for LineCodec {
    type Error = io::Error;

    fn encode(&mut self, line: T, dst: &mut BytesMut) -> Result<(), io::Error> {
        self.inner.encode(line, dst).map_err(|e| match e {
            LinesCodecError::Io(e) => e,
            LinesCodecError::MaxLineLengthExceeded => io::Error::new(io::ErrorKind::InvalidInput, e),
        })
    }
}
