// Copyright 2025 - developers of the `telecraft` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Manual definitions for the wire-level TL records which carry other
//! objects inside: messages, containers, RPC results and packed data.
use crate::errors::DeserializeError;
use flate2::write::{GzDecoder, GzEncoder};
use flate2::Compression;
use std::io::Write;
use telecraft_tl::deserialize::{self, Buffer};
use telecraft_tl::{Deserializable, Identifiable, Serializable};

/// ```tl
/// message msg_id:long seqno:int bytes:int body:Object = Message;
/// ```
///
/// The bare record each transmitted object is wrapped in: its identifier,
/// its sequence number, and the serialized body.
pub(crate) struct Message {
    pub msg_id: i64,
    pub seq_no: i32,
    pub body: Vec<u8>,
}

impl Message {
    // msg_id (8 bytes), seq_no (4 bytes), bytes (4 bytes)
    pub const SIZE_OVERHEAD: usize = 16;

    /// Peek the constructor ID from the body.
    pub fn constructor_id(&self) -> Result<u32, deserialize::Error> {
        u32::from_bytes(&self.body)
    }

    /// Whether this server message must be acknowledged. Containers and
    /// acknowledgements themselves are exempt; everything content-related
    /// (odd sequence number) is not.
    pub fn requires_ack(&self) -> bool {
        self.seq_no % 2 == 1
    }

    pub fn size(&self) -> usize {
        Self::SIZE_OVERHEAD + self.body.len()
    }
}

impl Serializable for Message {
    fn serialize(&self, buf: &mut Vec<u8>) {
        self.msg_id.serialize(buf);
        self.seq_no.serialize(buf);
        (self.body.len() as i32).serialize(buf);
        buf.extend_from_slice(&self.body);
    }
}

impl Deserializable for Message {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let msg_id = i64::deserialize(buf)?;
        let seq_no = i32::deserialize(buf)?;

        let len = i32::deserialize(buf)?;
        if len < 0 || len as usize > MessageContainer::MAXIMUM_SIZE {
            // A hostile length would otherwise cause a huge allocation.
            return Err(deserialize::Error::UnexpectedEof);
        }
        let mut body = vec![0; len as usize];
        buf.read_exact(&mut body)?;

        Ok(Message {
            msg_id,
            seq_no,
            body,
        })
    }
}

/// ```tl
/// msg_container#73f1f8dc messages:vector<message> = MessageContainer;
/// ```
pub(crate) struct MessageContainer {
    pub messages: Vec<Message>,
}

impl MessageContainer {
    // constructor id (4 bytes), inner vec len (4 bytes)
    pub const SIZE_OVERHEAD: usize = 8;

    /// Maximum size in bytes for the inner payload of the container.
    /// Telegram closes the connection when the payload is bigger.
    pub const MAXIMUM_SIZE: usize = 1_044_456 - Self::SIZE_OVERHEAD;

    /// Maximum amount of messages that can be sent inside a single
    /// container before the server rejects it with error code 64.
    pub const MAXIMUM_LENGTH: usize = 100;
}

impl Identifiable for MessageContainer {
    #[allow(clippy::unreadable_literal)]
    const CONSTRUCTOR_ID: u32 = 0x73f1f8dc;
}

impl Deserializable for MessageContainer {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let constructor_id = u32::deserialize(buf)?;
        if constructor_id != Self::CONSTRUCTOR_ID {
            return Err(deserialize::Error::UnexpectedConstructor {
                id: constructor_id,
            });
        }

        let len = i32::deserialize(buf)?;
        if len < 0 {
            return Err(deserialize::Error::UnexpectedEof);
        }
        let len = len as usize;
        let mut messages = Vec::with_capacity(len.min(Self::MAXIMUM_LENGTH));
        for _ in 0..len {
            messages.push(Message::deserialize(buf)?);
        }

        Ok(Self { messages })
    }
}

/// ```tl
/// rpc_result#f35c6d01 req_msg_id:long result:Object = RpcResult;
/// ```
pub(crate) struct RpcResult {
    pub req_msg_id: i64,
    pub result: Vec<u8>,
}

impl RpcResult {
    /// Peek the constructor ID from the inner result.
    pub fn inner_constructor(&self) -> Result<u32, deserialize::Error> {
        u32::from_bytes(&self.result)
    }
}

impl Identifiable for RpcResult {
    #[allow(clippy::unreadable_literal)]
    const CONSTRUCTOR_ID: u32 = 0xf35c6d01;
}

impl Deserializable for RpcResult {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let constructor_id = u32::deserialize(buf)?;
        if constructor_id != Self::CONSTRUCTOR_ID {
            return Err(deserialize::Error::UnexpectedConstructor {
                id: constructor_id,
            });
        }

        let req_msg_id = i64::deserialize(buf)?;
        let mut result = Vec::new();
        buf.read_to_end(&mut result)?;

        Ok(Self { req_msg_id, result })
    }
}

/// ```tl
/// gzip_packed#3072cfa1 packed_data:string = Object;
/// ```
pub(crate) struct GzipPacked {
    pub packed_data: Vec<u8>,
}

impl GzipPacked {
    pub fn new(unpacked_data: &[u8]) -> Self {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
        // Safe to unwrap, in-memory data does not fail.
        encoder.write_all(unpacked_data).unwrap();
        let packed_data = encoder.finish().unwrap();
        Self { packed_data }
    }

    pub fn decompress(&self) -> Result<Vec<u8>, DeserializeError> {
        let mut decoder = GzDecoder::new(Vec::new());
        decoder
            .write_all(&self.packed_data[..])
            .map_err(|_| DeserializeError::DecompressionFailed)?;
        decoder
            .finish()
            .map_err(|_| DeserializeError::DecompressionFailed)
    }
}

impl Identifiable for GzipPacked {
    #[allow(clippy::unreadable_literal)]
    const CONSTRUCTOR_ID: u32 = 0x3072cfa1;
}

impl Serializable for GzipPacked {
    fn serialize(&self, buf: &mut Vec<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.packed_data.serialize(buf);
    }
}

impl Deserializable for GzipPacked {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let constructor_id = u32::deserialize(buf)?;
        if constructor_id != Self::CONSTRUCTOR_ID {
            return Err(deserialize::Error::UnexpectedConstructor {
                id: constructor_id,
            });
        }

        let packed_data = Vec::<u8>::deserialize(buf)?;
        Ok(Self { packed_data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_roundtrip() {
        let message = Message {
            msg_id: 0x0123456789abcdef,
            seq_no: 3,
            body: vec![1, 2, 3, 4],
        };
        let bytes = message.to_bytes();
        assert_eq!(bytes.len(), message.size());

        let back = Message::from_bytes(&bytes).unwrap();
        assert_eq!(back.msg_id, message.msg_id);
        assert_eq!(back.seq_no, message.seq_no);
        assert_eq!(back.body, message.body);
    }

    #[test]
    fn ack_requirement_follows_parity() {
        let make = |seq_no| Message {
            msg_id: 0,
            seq_no,
            body: vec![0, 0, 0, 0],
        };
        assert!(make(1).requires_ack());
        assert!(make(3).requires_ack());
        assert!(!make(0).requires_ack());
        assert!(!make(4).requires_ack());
    }

    #[test]
    fn gzip_roundtrip() {
        let data = vec![7u8; 4096];
        let packed = GzipPacked::new(&data);
        assert!(packed.packed_data.len() < data.len());
        assert_eq!(packed.decompress().unwrap(), data);

        let wire = packed.to_bytes();
        let back = GzipPacked::from_bytes(&wire).unwrap();
        assert_eq!(back.decompress().unwrap(), data);
    }

    #[test]
    fn hostile_message_length_is_rejected() {
        let mut bytes = Vec::new();
        0i64.serialize(&mut bytes);
        0i32.serialize(&mut bytes);
        i32::MAX.serialize(&mut bytes);
        assert!(Message::from_bytes(&bytes).is_err());
    }
}
