// Copyright 2025 - developers of the `telecraft` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Implementation of the [MTProto transports]. This layer packs serialized
//! messages from the MTP into frames that can be sent over TCP, and splits
//! incoming bytes back into frame payloads. Payloads are not interpreted.
//!
//! [MTProto transports]: https://core.telegram.org/mtproto/mtproto-transports
mod abridged;
mod intermediate;

pub use abridged::Abridged;
pub use intermediate::Intermediate;

use bytes::BytesMut;
use std::fmt;

/// The error type reported by the different transports when something is
/// wrong. Unless the variant is `MissingBytes`, the connection should not
/// continue.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// Not enough bytes are provided to decode a full frame.
    MissingBytes,

    /// The length is either too short or too long to represent a valid
    /// frame.
    BadLen { got: i32 },

    /// The server replied with a negative status (such as `-404`) instead
    /// of a frame. The absolute value is carried here.
    BadStatus { status: u32 },
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transport error: ")?;
        match self {
            Error::MissingBytes => write!(f, "need more bytes"),
            Error::BadLen { got } => write!(f, "bad len (got {})", got),
            Error::BadStatus { status } => write!(f, "bad status (got {})", status),
        }
    }
}

/// A frame produced by [`Transport::unpack`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnpackedOffset {
    /// Where the payload starts in the input buffer.
    pub data_start: usize,
    /// Where the payload ends in the input buffer.
    pub data_end: usize,
    /// Where the next frame would begin.
    pub next_offset: usize,
}

/// The trait shared by the wire framings. `pack` writes one frame, and
/// `unpack` locates the payload of the first frame in `input`.
pub trait Transport {
    /// Packs `input` as a single frame into `output`. Previous contents of
    /// `output` are kept.
    ///
    /// Panics if `input.len()` is not divisible by 4.
    fn pack(&mut self, input: &[u8], output: &mut BytesMut);

    /// Finds the first frame in `input`, returning where its payload lies.
    fn unpack(&mut self, input: &[u8]) -> Result<UnpackedOffset, Error>;

    /// Forget the initialisation state, so the next `pack` emits the
    /// framing tag again. Used when reconnecting.
    fn reset(&mut self);
}

/// The framings a session may choose from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Framing {
    Intermediate,
    Abridged,
}

impl Framing {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Intermediate => "intermediate",
            Self::Abridged => "abridged",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "intermediate" => Some(Self::Intermediate),
            "abridged" => Some(Self::Abridged),
            _ => None,
        }
    }
}

impl fmt::Display for Framing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
