// Copyright 2025 - developers of the `telecraft` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use super::{Mtp, MsgId};
use crate::errors::{DeserializeError, RequestError};
use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};
use telecraft_tl::{Cursor, Deserializable, Serializable};

/// An implementation of the [Mobile Transport Protocol] for plaintext
/// (unencrypted) messages:
///
/// ```text
/// [auth_key_id = 0] [   message_id  ] [ msg len ] [ message data ... ]
/// [    64 bits    ] [    64 bits    ] [ 32 bits ] [       ...        ]
/// ```
///
/// Only used during the generation of an authorization key, where a single
/// request is in flight at a time. Responses therefore all resolve to the
/// zero [`MsgId`].
///
/// [Mobile Transport Protocol]: https://core.telegram.org/mtproto/description#unencrypted-message
pub struct Plain {
    last_msg_id: i64,
    queue: VecDeque<Vec<u8>>,
    response_queue: VecDeque<(MsgId, Result<Vec<u8>, RequestError>)>,
}

#[allow(clippy::new_without_default)]
impl Plain {
    pub fn new() -> Self {
        Self {
            last_msg_id: 0,
            queue: VecDeque::new(),
            response_queue: VecDeque::new(),
        }
    }

    fn get_new_msg_id(&mut self) -> i64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time is before epoch");

        let seconds = now.as_secs();
        let nanoseconds = now.subsec_nanos() as u64;
        let mut new_msg_id = ((seconds << 32) | (nanoseconds << 2)) as i64;

        if self.last_msg_id >= new_msg_id {
            new_msg_id = self.last_msg_id + 4;
        }

        self.last_msg_id = new_msg_id;
        new_msg_id
    }
}

impl Mtp for Plain {
    fn push(&mut self, body: Vec<u8>) -> MsgId {
        self.queue.push_back(body);
        MsgId(0)
    }

    fn finalize(&mut self) -> Option<Vec<u8>> {
        let body = self.queue.pop_front()?;

        let mut buf = Vec::with_capacity(8 + 8 + 4 + body.len());
        0i64.serialize(&mut buf);
        self.get_new_msg_id().serialize(&mut buf);
        (body.len() as i32).serialize(&mut buf);
        buf.extend_from_slice(&body);
        Some(buf)
    }

    fn process(&mut self, payload: &[u8]) -> Result<(), DeserializeError> {
        if payload.len() == 4 {
            // Some servers emit tiny quick-ack frames before the real
            // reply during the key exchange; skip them.
            log::debug!("skipping spurious {}-byte frame", payload.len());
            return Ok(());
        }
        if payload.len() < 20 {
            return Err(DeserializeError::MessageBufferTooSmall);
        }

        let mut buf = Cursor::from_slice(payload);
        let auth_key_id = i64::deserialize(&mut buf)?;
        if auth_key_id != 0 {
            return Err(DeserializeError::BadAuthKey);
        }

        // The server assigns its own identifier here; correlation during
        // the handshake is by order, not by id.
        let _msg_id = i64::deserialize(&mut buf)?;

        let len = i32::deserialize(&mut buf)?;
        if len <= 0 || (20 + len) as usize > payload.len() {
            return Err(DeserializeError::TooLongMessageLength {
                got: len.max(0) as usize,
                max_length: payload.len() - 20,
            });
        }

        let mut body = vec![0; len as usize];
        buf.read_exact(&mut body)?;
        self.response_queue.push_back((MsgId(0), Ok(body)));
        Ok(())
    }

    fn poll_response(&mut self) -> Option<(MsgId, Result<Vec<u8>, RequestError>)> {
        self.response_queue.pop_front()
    }

    fn poll_update(&mut self) -> Option<Vec<u8>> {
        None
    }

    fn reset_session(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_the_plain_envelope() {
        let mut mtp = Plain::new();
        mtp.push(vec![1, 2, 3, 4]);
        let payload = mtp.finalize().unwrap();

        assert_eq!(&payload[0..8], &[0; 8]);
        assert_ne!(&payload[8..16], &[0; 8]);
        assert_eq!(&payload[16..20], &4i32.to_le_bytes());
        assert_eq!(&payload[20..], &[1, 2, 3, 4]);
    }

    #[test]
    fn rejects_nonzero_auth_key() {
        let mut mtp = Plain::new();
        let mut payload = Vec::new();
        1i64.serialize(&mut payload);
        1i64.serialize(&mut payload);
        4i32.serialize(&mut payload);
        payload.extend_from_slice(&[1, 2, 3, 4]);

        assert_eq!(
            mtp.process(&payload),
            Err(DeserializeError::BadAuthKey)
        );
    }

    #[test]
    fn accepts_a_valid_response() {
        let mut mtp = Plain::new();
        let mut payload = Vec::new();
        0i64.serialize(&mut payload);
        1i64.serialize(&mut payload);
        4i32.serialize(&mut payload);
        payload.extend_from_slice(&[1, 2, 3, 4]);

        mtp.process(&payload).unwrap();
        let (msg_id, body) = mtp.poll_response().unwrap();
        assert_eq!(msg_id, MsgId(0));
        assert_eq!(body.unwrap(), vec![1, 2, 3, 4]);
    }
}
