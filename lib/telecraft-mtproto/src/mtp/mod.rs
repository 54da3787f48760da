// Copyright 2025 - developers of the `telecraft` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The Mobile Transport Protocol message layer. The [`Plain`] variant is
//! only used while generating an authorization key; every other message
//! goes through [`Encrypted`].
mod encrypted;
mod plain;

pub use encrypted::{Encrypted, EncryptedBuilder};
pub use plain::Plain;

use crate::errors::{DeserializeError, RequestError};

/// The default threshold in bytes above which outgoing message bodies are
/// considered for gzip compression.
pub const DEFAULT_COMPRESSION_THRESHOLD: Option<usize> = Some(512);

/// A message identifier, assigned when a request is pushed into the MTP.
///
/// Server responses name the request they answer through this identifier.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub struct MsgId(pub i64);

/// The state machine of one MTP session: it assigns identifiers to
/// outgoing requests, serializes them into (possibly containerized)
/// payloads, and sorts the server's messages into responses and updates.
pub trait Mtp {
    /// Enqueue the serialized body of a request and return its assigned
    /// message identifier.
    fn push(&mut self, body: Vec<u8>) -> MsgId;

    /// Serialize as many enqueued requests as fit into one wire payload,
    /// ready for the transport to frame. Returns `None` when there is
    /// nothing to send.
    fn finalize(&mut self) -> Option<Vec<u8>>;

    /// Process one payload produced by the transport's unpacking.
    fn process(&mut self, payload: &[u8]) -> Result<(), DeserializeError>;

    /// Poll for a response to a previously-pushed request.
    fn poll_response(&mut self) -> Option<(MsgId, Result<Vec<u8>, RequestError>)>;

    /// Poll for a server-initiated update body.
    fn poll_update(&mut self) -> Option<Vec<u8>>;

    /// The identifier of the container the last [`Mtp::finalize`] call
    /// wrapped its messages in, if any. Servers may reject a container as
    /// a whole, so its identifier has to be matchable back to requests.
    fn last_container_msg_id(&self) -> Option<MsgId> {
        None
    }

    /// Whether the server hinted that updates may have been lost (for
    /// example through a new-session-created notification). Reading the
    /// hint clears it.
    fn take_gap_hint(&mut self) -> bool {
        false
    }

    /// Regenerate the session identity: new random session id, sequence
    /// number reset. Used when reconnecting.
    fn reset_session(&mut self);
}
