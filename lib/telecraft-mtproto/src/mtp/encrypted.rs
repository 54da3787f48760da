// Copyright 2025 - developers of the `telecraft` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use super::{Mtp, MsgId};
use crate::errors::{DeserializeError, RequestError, RpcError};
use crate::wire;
use getrandom::getrandom;
use log::{debug, info, warn};
use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};
use telecraft_crypto::{decrypt_data_v2, encrypt_data_v2, AuthKey};
use telecraft_tl::{types, Cursor, Deserializable, Identifiable, Serializable};

// Service constructors the state machine recognizes but has no use for
// beyond acknowledging or ignoring them.
const RPC_ANSWER_UNKNOWN: u32 = 0x5e2ad36e;
const RPC_ANSWER_DROPPED_RUNNING: u32 = 0xcd78e586;
const RPC_ANSWER_DROPPED: u32 = 0xa43ad8b7;
const MSG_COPY: u32 = 0xe06046b2;
const HTTP_WAIT: u32 = 0x9299359f;
const DESTROY_SESSION_OK: u32 = 0xe22045fc;
const DESTROY_SESSION_NONE: u32 = 0x62d350c9;

/// A builder to configure [`Encrypted`] instances.
pub struct EncryptedBuilder {
    time_offset: i32,
    first_salt: i64,
    compression_threshold: Option<usize>,
}

impl EncryptedBuilder {
    fn new() -> Self {
        Self {
            time_offset: 0,
            first_salt: 0,
            compression_threshold: super::DEFAULT_COMPRESSION_THRESHOLD,
        }
    }

    /// Configures the time offset to the server's clock.
    pub fn time_offset(mut self, offset: i32) -> Self {
        self.time_offset = offset;
        self
    }

    /// Configures the first server salt, as produced by the handshake or
    /// restored from a session file.
    pub fn first_salt(mut self, salt: i64) -> Self {
        self.first_salt = salt;
        self
    }

    /// Configures the compression threshold for outgoing messages.
    pub fn compression_threshold(mut self, threshold: Option<usize>) -> Self {
        self.compression_threshold = threshold;
        self
    }

    /// Finishes the builder using the given authorization key.
    pub fn finish(self, auth_key: [u8; 256]) -> Encrypted {
        let mut result = Encrypted::new(AuthKey::from_bytes(auth_key));
        result.time_offset = self.time_offset;
        result.salt = self.first_salt;
        result.compression_threshold = self.compression_threshold;
        result
    }
}

/// An implementation of the [Mobile Transport Protocol] for ciphertext
/// (encrypted) messages.
///
/// Holds the state of one session: the authorization key, the current
/// server salt, the random session identifier, and the message-id and
/// sequence-number generators.
///
/// [Mobile Transport Protocol]: https://core.telegram.org/mtproto/description
pub struct Encrypted {
    /// The authorization key used to encrypt the payload.
    auth_key: AuthKey,

    /// The time offset from the server's time, in seconds.
    time_offset: i32,

    /// The current salt to be used when encrypting the payload.
    salt: i64,

    /// The secure, random identifier for this session.
    client_id: i64,

    /// The current message sequence number.
    sequence: i32,

    /// The identifier of the last message sent.
    last_msg_id: i64,

    /// A queue of messages that are pending from being sent.
    message_queue: VecDeque<wire::Message>,

    /// Identifiers of content-related server messages which have not been
    /// acknowledged yet. Flushed with the next outgoing payload.
    pending_ack: Vec<i64>,

    /// If present, the threshold in bytes at which an outgoing message is
    /// large enough to attempt compressing it.
    compression_threshold: Option<usize>,

    /// A queue of responses ready to be polled.
    response_queue: VecDeque<(MsgId, Result<Vec<u8>, RequestError>)>,

    /// A queue of update bodies ready to be polled.
    update_queue: VecDeque<Vec<u8>>,

    /// Set when the server notified us that a new session had to be
    /// created, meaning updates may have been lost.
    gap_hint: bool,

    /// The identifier of the container the last payload was wrapped in.
    last_container_msg_id: Option<i64>,
}

fn generate_client_id() -> i64 {
    let mut buffer = [0u8; 8];
    getrandom(&mut buffer).expect("failed to generate a secure client_id");
    i64::from_le_bytes(buffer)
}

impl Encrypted {
    /// Creates a new instance with default settings.
    pub fn new(auth_key: AuthKey) -> Self {
        Self {
            auth_key,
            time_offset: 0,
            salt: 0,
            client_id: generate_client_id(),
            sequence: 0,
            last_msg_id: 0,
            message_queue: VecDeque::new(),
            pending_ack: vec![],
            compression_threshold: super::DEFAULT_COMPRESSION_THRESHOLD,
            response_queue: VecDeque::new(),
            update_queue: VecDeque::new(),
            gap_hint: false,
            last_container_msg_id: None,
        }
    }

    /// Returns a builder to configure certain parameters.
    pub fn build() -> EncryptedBuilder {
        EncryptedBuilder::new()
    }

    /// The authorization key this session encrypts with.
    pub fn auth_key(&self) -> [u8; 256] {
        self.auth_key.to_bytes()
    }

    /// The current server salt.
    pub fn salt(&self) -> i64 {
        self.salt
    }

    // State management
    // ========================================

    /// Correct our time offset based on a known valid message ID.
    fn correct_time_offset(&mut self, msg_id: i64) {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time is before epoch")
            .as_secs() as i32;

        let correct = (msg_id >> 32) as i32;
        self.time_offset = correct - now;
    }

    /// Generates a new unique message ID based on the current time since
    /// epoch, applying the known time offset. The low two bits are always
    /// zero, and identifiers strictly increase.
    fn get_new_msg_id(&mut self) -> i64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time is before epoch");

        let seconds = (now.as_secs() as i32 + self.time_offset) as u64;
        let nanoseconds = now.subsec_nanos() as u64;
        let mut new_msg_id = ((seconds << 32) | (nanoseconds << 2)) as i64;

        if self.last_msg_id >= new_msg_id {
            new_msg_id = self.last_msg_id + 4;
        }

        self.last_msg_id = new_msg_id;
        new_msg_id
    }

    /// Generates the next sequence number: odd (twice the count plus one)
    /// for content-related messages, even otherwise.
    fn get_seq_no(&mut self, content_related: bool) -> i32 {
        if content_related {
            let result = self.sequence * 2 + 1;
            self.sequence += 1;
            result
        } else {
            self.sequence * 2
        }
    }

    fn enqueue_body(&mut self, body: Vec<u8>, content_related: bool) -> MsgId {
        let msg_id = self.get_new_msg_id();
        let seq_no = self.get_seq_no(content_related);
        self.message_queue.push_back(wire::Message {
            msg_id,
            seq_no,
            body,
        });

        MsgId(msg_id)
    }

    // Serialization
    // ========================================

    /// Pops as many queued messages as fit in one payload, prefixed with
    /// the salt and session id, ready for encryption.
    fn pop_queued_messages(&mut self) -> Option<Vec<u8>> {
        // Acknowledgements ride along with whatever is about to be sent.
        if !self.pending_ack.is_empty() {
            let msg_ids = std::mem::take(&mut self.pending_ack);
            self.enqueue_body(types::MsgsAck { msg_ids }.to_bytes(), false);
        }

        if self.message_queue.is_empty() {
            return None;
        }

        // Batch as many messages as possible into a single container to
        // reduce the overhead from encryption and network calls.
        let mut batch_size = 0;
        let batch_len = self
            .message_queue
            .iter()
            .take(wire::MessageContainer::MAXIMUM_LENGTH)
            .take_while(|message| {
                if batch_size + message.size() < wire::MessageContainer::MAXIMUM_SIZE {
                    batch_size += message.size();
                    true
                } else {
                    false
                }
            })
            .count();

        if batch_len > 1 {
            batch_size += wire::Message::SIZE_OVERHEAD + wire::MessageContainer::SIZE_OVERHEAD;
        }

        // 8 bytes salt + 8 bytes client_id + batch_size bytes of body.
        let mut buf = Vec::with_capacity(8 + 8 + batch_size);

        self.salt.serialize(&mut buf);
        self.client_id.serialize(&mut buf);

        self.last_container_msg_id = None;
        if batch_len > 1 {
            // The container is itself a (service) message, and its id must
            // be above those of the messages it holds.
            let msg_id = self.get_new_msg_id();
            let seq_no = self.get_seq_no(false);
            self.last_container_msg_id = Some(msg_id);

            msg_id.serialize(&mut buf);
            seq_no.serialize(&mut buf);
            ((batch_size - wire::Message::SIZE_OVERHEAD) as i32).serialize(&mut buf);

            wire::MessageContainer::CONSTRUCTOR_ID.serialize(&mut buf);
            (batch_len as i32).serialize(&mut buf);
        }

        (0..batch_len).for_each(|_| {
            // Safe to unwrap because the batch cannot exceed the queue.
            let message = self.message_queue.pop_front().unwrap();
            message.serialize(&mut buf);
        });

        Some(buf)
    }

    // Response handlers
    // ========================================

    fn process_message(&mut self, message: wire::Message) -> Result<(), DeserializeError> {
        if message.requires_ack() {
            self.pending_ack.push(message.msg_id);
        }

        // Handle all the possible [service messages]:
        //
        // [service messages]: https://core.telegram.org/mtproto/service_messages
        match message.constructor_id()? {
            wire::RpcResult::CONSTRUCTOR_ID => self.handle_rpc_result(message),
            types::MsgsAck::CONSTRUCTOR_ID => self.handle_ack(message),
            types::BadMsgNotification::CONSTRUCTOR_ID | types::BadServerSalt::CONSTRUCTOR_ID => {
                self.handle_bad_notification(message)
            }
            types::MsgsStateReq::CONSTRUCTOR_ID
            | types::MsgsStateInfo::CONSTRUCTOR_ID
            | types::MsgsAllInfo::CONSTRUCTOR_ID
            | types::MsgResendReq::CONSTRUCTOR_ID => self.handle_state_messages(message),
            types::MsgDetailedInfo::CONSTRUCTOR_ID | types::MsgNewDetailedInfo::CONSTRUCTOR_ID => {
                self.handle_detailed_info(message)
            }
            types::FutureSalts::CONSTRUCTOR_ID => self.handle_future_salts(message),
            types::Pong::CONSTRUCTOR_ID => self.handle_pong(message),
            DESTROY_SESSION_OK | DESTROY_SESSION_NONE => Ok(()),
            types::NewSessionCreated::CONSTRUCTOR_ID => self.handle_new_session_created(message),
            wire::MessageContainer::CONSTRUCTOR_ID => self.handle_container(message),
            MSG_COPY => {
                // Old messages can be wrapped in a plain container with the
                // same effect, so nothing generates these anymore.
                warn!("ignoring unexpected msg_copy");
                Ok(())
            }
            wire::GzipPacked::CONSTRUCTOR_ID => self.handle_gzip_packed(message),
            HTTP_WAIT => Ok(()),
            _ => self.handle_update(message),
        }
    }

    /// **Response to an RPC query.**
    ///
    /// ```tl
    /// rpc_result#f35c6d01 req_msg_id:long result:Object = RpcResult;
    /// ```
    fn handle_rpc_result(&mut self, message: wire::Message) -> Result<(), DeserializeError> {
        let rpc_result = wire::RpcResult::from_bytes(&message.body)?;
        let inner_constructor = rpc_result.inner_constructor();
        let wire::RpcResult { req_msg_id, result } = rpc_result;
        let msg_id = MsgId(req_msg_id);

        // Can't use `?` on the inner reads because a response must always
        // be pushed for the request to resolve.
        let inner_constructor = match inner_constructor {
            Ok(x) => x,
            Err(e) => {
                self.response_queue
                    .push_back((msg_id, Err(DeserializeError::from(e.clone()).into())));
                return Err(e.into());
            }
        };

        match inner_constructor {
            types::RpcError::CONSTRUCTOR_ID => match types::RpcError::from_bytes(&result) {
                Ok(error) => self
                    .response_queue
                    .push_back((msg_id, Err(RequestError::Rpc(RpcError::from(error))))),
                Err(error) => {
                    self.response_queue
                        .push_back((msg_id, Err(DeserializeError::from(error.clone()).into())));
                    return Err(error.into());
                }
            },
            RPC_ANSWER_UNKNOWN | RPC_ANSWER_DROPPED_RUNNING | RPC_ANSWER_DROPPED => {
                // Cancellation answers; there is no caller to notify since
                // dropping an invocation also forgets its channel.
            }
            wire::GzipPacked::CONSTRUCTOR_ID => {
                let gzip = match wire::GzipPacked::from_bytes(&result) {
                    Ok(x) => x,
                    Err(e) => {
                        self.response_queue
                            .push_back((msg_id, Err(DeserializeError::from(e.clone()).into())));
                        return Err(e.into());
                    }
                };
                match gzip.decompress() {
                    Ok(x) => self.response_queue.push_back((msg_id, Ok(x))),
                    Err(e) => {
                        self.response_queue.push_back((msg_id, Err(e.clone().into())));
                        return Err(e);
                    }
                }
            }
            _ => {
                self.response_queue.push_back((msg_id, Ok(result)));
            }
        }

        Ok(())
    }

    /// **Acknowledgment of receipt** by the server; nothing to do.
    fn handle_ack(&mut self, message: wire::Message) -> Result<(), DeserializeError> {
        let _ack = types::MsgsAck::from_bytes(&message.body)?;
        Ok(())
    }

    /// **Notice of ignored error message.**
    ///
    /// ```tl
    /// bad_msg_notification#a7eff811 bad_msg_id:long bad_msg_seqno:int
    /// error_code:int = BadMsgNotification;
    /// bad_server_salt#edab447b bad_msg_id:long bad_msg_seqno:int
    /// error_code:int new_server_salt:long = BadMsgNotification;
    /// ```
    ///
    /// Adjusts the local state (time offset, sequence number, server salt)
    /// so that the rejected message can be retransmitted successfully.
    fn handle_bad_notification(&mut self, message: wire::Message) -> Result<(), DeserializeError> {
        use telecraft_tl::enums::BadMsgNotification as Bad;

        let bad_msg = match Bad::from_bytes(&message.body)? {
            Bad::ServerSalt(x) => {
                debug!("got bad server salt; updating to {}", x.new_server_salt);
                self.salt = x.new_server_salt;
                self.response_queue.push_back((
                    MsgId(x.bad_msg_id),
                    Err(RequestError::BadMessage { code: x.error_code }),
                ));
                return Ok(());
            }
            Bad::Notification(x) => x,
        };

        self.response_queue.push_back((
            MsgId(bad_msg.bad_msg_id),
            Err(RequestError::BadMessage {
                code: bad_msg.error_code,
            }),
        ));
        match bad_msg.error_code {
            16 | 17 => {
                // Sent msg_id was too low or too high; our time offset is
                // wrong, so resynchronize it from the server's msg_id.
                self.correct_time_offset(message.msg_id);
            }
            32 => {
                // Sent seq_no was too low. Bump it by a large-ish value.
                self.sequence += 64;
            }
            33 => {
                // Sent seq_no was too high.
                self.sequence -= 16;
            }
            _ => {}
        }

        Ok(())
    }

    /// Requests and notices about message state; answered lazily (the
    /// server re-sends anything truly lost on its own).
    fn handle_state_messages(&mut self, _message: wire::Message) -> Result<(), DeserializeError> {
        Ok(())
    }

    /// **Extended voluntary communication of status of one message.**
    ///
    /// The referenced answer needs to be acknowledged so the server stops
    /// notifying about it.
    fn handle_detailed_info(&mut self, message: wire::Message) -> Result<(), DeserializeError> {
        let answer_msg_id = match message.constructor_id()? {
            types::MsgDetailedInfo::CONSTRUCTOR_ID => {
                types::MsgDetailedInfo::from_bytes(&message.body)?.answer_msg_id
            }
            _ => types::MsgNewDetailedInfo::from_bytes(&message.body)?.answer_msg_id,
        };
        self.pending_ack.push(answer_msg_id);
        Ok(())
    }

    /// **Request for several future salts**; resolved like a response.
    fn handle_future_salts(&mut self, message: wire::Message) -> Result<(), DeserializeError> {
        let salts = types::FutureSalts::from_bytes(&message.body)?;
        self.response_queue
            .push_back((MsgId(salts.req_msg_id), Ok(message.body.clone())));
        Ok(())
    }

    /// **Ping messages (PING/PONG)**; the body resolves the original
    /// request.
    fn handle_pong(&mut self, message: wire::Message) -> Result<(), DeserializeError> {
        let pong = types::Pong::from_bytes(&message.body)?;
        self.response_queue
            .push_back((MsgId(pong.msg_id), Ok(message.body.clone())));
        Ok(())
    }

    /// **New session creation notification.**
    ///
    /// The server may have dropped queued updates when this happens, so
    /// besides adopting the new salt, remember that the updates engine
    /// should check for a gap.
    fn handle_new_session_created(
        &mut self,
        message: wire::Message,
    ) -> Result<(), DeserializeError> {
        let new_session = types::NewSessionCreated::from_bytes(&message.body)?;
        info!(
            "new session created (first_msg_id = {}); updating salt",
            new_session.first_msg_id
        );
        self.salt = new_session.server_salt;
        self.gap_hint = true;
        Ok(())
    }

    /// **Containers** carry several messages at once; process each.
    fn handle_container(&mut self, message: wire::Message) -> Result<(), DeserializeError> {
        let container = wire::MessageContainer::from_bytes(&message.body)?;
        for inner_message in container.messages {
            self.process_message(inner_message)?;
        }

        Ok(())
    }

    /// **Packed object**; unwrap and process as if it came unpacked.
    fn handle_gzip_packed(&mut self, message: wire::Message) -> Result<(), DeserializeError> {
        let container = wire::GzipPacked::from_bytes(&message.body)?;
        self.process_message(wire::Message {
            body: container.decompress()?,
            ..message
        })
    }

    /// Anything which is not a service message is an update.
    fn handle_update(&mut self, message: wire::Message) -> Result<(), DeserializeError> {
        self.update_queue.push_back(message.body);
        Ok(())
    }
}

impl Mtp for Encrypted {
    /// Enqueue the serialized body of a request.
    ///
    /// # Panics
    ///
    /// The method panics if the body is not padded to 4 bytes (serialized
    /// requests always are), or if the body is too large to be transmitted
    /// (roughly one megabyte), since both indicate a caller bug.
    fn push(&mut self, mut body: Vec<u8>) -> MsgId {
        assert!(body.len() + wire::Message::SIZE_OVERHEAD <= wire::MessageContainer::MAXIMUM_SIZE);
        assert!(body.len() % 4 == 0);

        // Outside payloads are always content-related, which means
        // compression can be applied.
        if let Some(threshold) = self.compression_threshold {
            if body.len() >= threshold {
                let compressed = wire::GzipPacked::new(&body).to_bytes();
                if compressed.len() < body.len() {
                    body = compressed;
                }
            }
        }

        self.enqueue_body(body, true)
    }

    fn finalize(&mut self) -> Option<Vec<u8>> {
        self.pop_queued_messages()
            .map(|payload| encrypt_data_v2(&payload, &self.auth_key))
    }

    fn process(&mut self, payload: &[u8]) -> Result<(), DeserializeError> {
        if payload.len() < 24 {
            return Err(DeserializeError::MessageBufferTooSmall);
        }

        let plaintext = decrypt_data_v2(payload, &self.auth_key)?;
        let mut buffer = Cursor::from_slice(&plaintext);

        // The salt of incoming messages is not validated; the server keeps
        // ours fresh through bad_server_salt and new_session_created.
        let _salt = i64::deserialize(&mut buffer)?;
        let client_id = i64::deserialize(&mut buffer)?;
        if client_id != self.client_id {
            return Err(DeserializeError::BadSessionId {
                got: client_id,
                expected: self.client_id,
            });
        }

        self.process_message(wire::Message::deserialize(&mut buffer)?)
    }

    fn poll_response(&mut self) -> Option<(MsgId, Result<Vec<u8>, RequestError>)> {
        self.response_queue.pop_front()
    }

    fn poll_update(&mut self) -> Option<Vec<u8>> {
        self.update_queue.pop_front()
    }

    fn last_container_msg_id(&self) -> Option<MsgId> {
        self.last_container_msg_id.map(MsgId)
    }

    fn take_gap_hint(&mut self) -> bool {
        std::mem::take(&mut self.gap_hint)
    }

    fn reset_session(&mut self) {
        self.client_id = generate_client_id();
        self.sequence = 0;
        self.last_msg_id = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // salt + client_id
    const MESSAGE_PREFIX_LEN: usize = 8 + 8;

    // gzip_packed#3072cfa1
    const GZIP_PACKED_HEADER: [u8; 4] = [0xa1, 0xcf, 0x72, 0x30];

    // msg_container#73f1f8dc
    const MSG_CONTAINER_HEADER: [u8; 4] = [0xdc, 0xf8, 0xf1, 0x73];

    fn auth_key() -> [u8; 256] {
        [0; 256]
    }

    fn plain_mtp() -> Encrypted {
        Encrypted::build()
            .compression_threshold(None)
            .finish(auth_key())
    }

    fn ensure_buffer_is_message(buffer: &[u8], body: &[u8], seq_no: u8) {
        // msg_id, based on the current time: non-zero.
        assert_ne!(&buffer[0..8], [0, 0, 0, 0, 0, 0, 0, 0]);
        // seq_no in little endian.
        assert_eq!(&buffer[8..12], [seq_no, 0, 0, 0]);
        // length of the body in little endian.
        assert_eq!(&buffer[12..16], [body.len() as u8, 0, 0, 0]);
        // the body itself.
        assert_eq!(&buffer[16..], body);
    }

    #[test]
    fn serialization_has_salt_and_client_id() {
        let mut mtp = plain_mtp();

        mtp.push(vec![b'H', b'e', b'y', b'!']);
        let buffer = mtp.pop_queued_messages().unwrap();

        // The default salt is zero.
        assert_eq!(&buffer[0..8], [0, 0, 0, 0, 0, 0, 0, 0]);

        // The client id is random.
        assert_ne!(&buffer[8..16], [0, 0, 0, 0, 0, 0, 0, 0]);

        ensure_buffer_is_message(&buffer[MESSAGE_PREFIX_LEN..], b"Hey!", 1);
    }

    #[test]
    fn single_message_is_not_contained() {
        let mut mtp = plain_mtp();

        mtp.push(vec![b'H', b'e', b'y', b'!']);
        let buffer = &mtp.pop_queued_messages().unwrap()[MESSAGE_PREFIX_LEN..];
        ensure_buffer_is_message(buffer, b"Hey!", 1);
    }

    #[test]
    fn multiple_messages_are_contained() {
        let mut mtp = plain_mtp();

        mtp.push(vec![b'H', b'e', b'y', b'!']);
        mtp.push(vec![b'B', b'y', b'e', b'!']);
        let buffer = &mtp.pop_queued_messages().unwrap()[MESSAGE_PREFIX_LEN..];

        // container msg_id
        assert_ne!(&buffer[0..8], [0, 0, 0, 0, 0, 0, 0, 0]);
        // after two content messages (1, 3) the next service seq_no is 4.
        assert_eq!(&buffer[8..12], [4, 0, 0, 0]);
        // container length: header + two 20-byte messages.
        assert_eq!(&buffer[12..16], [48, 0, 0, 0]);

        assert_eq!(&buffer[16..20], MSG_CONTAINER_HEADER);
        assert_eq!(&buffer[20..24], [2, 0, 0, 0]);

        ensure_buffer_is_message(&buffer[24..44], b"Hey!", 1);
        ensure_buffer_is_message(&buffer[44..], b"Bye!", 3);
    }

    #[test]
    fn large_messages_are_not_batched_together() {
        let mut mtp = plain_mtp();
        let data = vec![0x7f; 768 * 1024];

        mtp.push(data.clone());
        mtp.push(data.clone());

        let buffer = &mtp.pop_queued_messages().unwrap()[MESSAGE_PREFIX_LEN..];
        assert_eq!(buffer.len(), 16 + data.len());

        let buffer = &mtp.pop_queued_messages().unwrap()[MESSAGE_PREFIX_LEN..];
        assert_eq!(buffer.len(), 16 + data.len());
    }

    #[test]
    fn queue_is_drained() {
        let mut mtp = plain_mtp();

        assert!(mtp.pop_queued_messages().is_none());
        mtp.push(vec![b'H', b'e', b'y', b'!']);

        assert!(mtp.pop_queued_messages().is_some());
        assert!(mtp.pop_queued_messages().is_none());
    }

    #[test]
    fn msg_ids_are_strictly_increasing_and_aligned() {
        let mut mtp = plain_mtp();

        let mut last = 0i64;
        for _ in 0..64 {
            let MsgId(id) = mtp.push(vec![0, 0, 0, 0]);
            assert!(id > last);
            assert_eq!(id % 4, 0);
            last = id;
        }
    }

    #[test]
    fn seq_no_parity_tracks_content_flag() {
        let mut mtp = plain_mtp();

        // Content-related messages get odd, increasing sequence numbers.
        mtp.push(vec![0, 0, 0, 0]);
        mtp.push(vec![0, 0, 0, 0]);
        let buffer = &mtp.pop_queued_messages().unwrap()[MESSAGE_PREFIX_LEN..];

        let first_seq = i32::from_le_bytes(buffer[24 + 8..24 + 12].try_into().unwrap());
        let second_seq = i32::from_le_bytes(buffer[44 + 8..44 + 12].try_into().unwrap());
        let container_seq = i32::from_le_bytes(buffer[8..12].try_into().unwrap());
        assert_eq!(first_seq, 1);
        assert_eq!(second_seq, 3);
        assert_eq!(container_seq % 2, 0);
        assert!(container_seq > second_seq);
    }

    #[test]
    #[should_panic]
    fn large_payload_panics() {
        let mut mtp = plain_mtp();
        drop(mtp.push(vec![0; 2 * 1024 * 1024]));
    }

    #[test]
    #[should_panic]
    fn non_padded_payload_panics() {
        let mut mtp = plain_mtp();
        drop(mtp.push(vec![1, 2, 3]));
    }

    #[test]
    fn no_compression_is_honored() {
        let mut mtp = plain_mtp();
        mtp.push(vec![0; 512 * 1024]);
        let buffer = mtp.pop_queued_messages().unwrap();
        assert!(!buffer.windows(4).any(|w| w == GZIP_PACKED_HEADER));
    }

    #[test]
    fn compression_threshold_is_honored() {
        {
            // A high threshold not reached by the payload does nothing.
            let mut mtp = Encrypted::build()
                .compression_threshold(Some(768 * 1024))
                .finish(auth_key());
            mtp.push(vec![0; 512 * 1024]);
            let buffer = mtp.pop_queued_messages().unwrap();
            assert!(!buffer.windows(4).any(|w| w == GZIP_PACKED_HEADER));
        }
        {
            // A low threshold compresses highly-compressible payloads.
            let mut mtp = Encrypted::build()
                .compression_threshold(Some(256 * 1024))
                .finish(auth_key());
            mtp.push(vec![0; 512 * 1024]);
            let buffer = mtp.pop_queued_messages().unwrap();
            assert!(buffer.windows(4).any(|w| w == GZIP_PACKED_HEADER));
        }
    }

    #[test]
    fn bad_server_salt_updates_salt_and_fails_request() {
        let mut mtp = plain_mtp();

        let body = types::BadServerSalt {
            bad_msg_id: 1234,
            bad_msg_seqno: 1,
            error_code: 48,
            new_server_salt: 5678,
        }
        .to_bytes();
        mtp.process_message(wire::Message {
            msg_id: 4,
            seq_no: 0,
            body,
        })
        .unwrap();

        assert_eq!(mtp.salt(), 5678);
        let (msg_id, result) = mtp.poll_response().unwrap();
        assert_eq!(msg_id, MsgId(1234));
        assert!(matches!(
            result,
            Err(RequestError::BadMessage { code: 48 })
        ));
    }

    #[test]
    fn new_session_created_updates_salt_and_hints_gap() {
        let mut mtp = plain_mtp();

        let body = types::NewSessionCreated {
            first_msg_id: 4,
            unique_id: 7,
            server_salt: 999,
        }
        .to_bytes();
        mtp.process_message(wire::Message {
            msg_id: 8,
            seq_no: 1,
            body,
        })
        .unwrap();

        assert_eq!(mtp.salt(), 999);
        assert!(mtp.take_gap_hint());
        assert!(!mtp.take_gap_hint());
    }

    #[test]
    fn unknown_bodies_become_updates() {
        let mut mtp = plain_mtp();

        mtp.process_message(wire::Message {
            msg_id: 4,
            seq_no: 1,
            body: vec![0xde, 0xad, 0xbe, 0xef],
        })
        .unwrap();

        assert_eq!(mtp.poll_update().unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        // Content-related messages get acknowledged.
        assert_eq!(mtp.pending_ack, vec![4]);
    }

    #[test]
    fn session_reset_regenerates_identity() {
        let mut mtp = plain_mtp();
        mtp.push(vec![0, 0, 0, 0]);
        let old_id = mtp.client_id;
        assert_eq!(mtp.sequence, 1);

        mtp.reset_session();
        assert_ne!(mtp.client_id, old_id);
        assert_eq!(mtp.sequence, 0);
        assert_eq!(mtp.last_msg_id, 0);
    }
}
