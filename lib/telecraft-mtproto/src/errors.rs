// Copyright 2025 - developers of the `telecraft` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors that can occur while driving the protocol state machines.
use std::error::Error;
use std::fmt;
use telecraft_tl::deserialize;

/// The error type for the deserialization of server messages.
#[derive(Clone, Debug, PartialEq)]
pub enum DeserializeError {
    /// The received buffer is too small to contain a valid message, or a
    /// message that looked valid turned out to be truncated.
    MessageBufferTooSmall,

    /// The server's message envelope named an authorization key other than
    /// the one this session negotiated.
    BadAuthKey,

    /// The server's session identifier did not match ours.
    BadSessionId { got: i64, expected: i64 },

    /// The declared inner length escapes the decrypted buffer.
    TooLongMessageLength { got: usize, max_length: usize },

    /// The server responded with compressed data which failed to
    /// decompress.
    DecompressionFailed,

    /// A constructor identifier did not match any expectation.
    UnexpectedConstructor { id: u32 },

    /// Decrypting the message envelope failed.
    Decryption(telecraft_crypto::Error),
}

impl Error for DeserializeError {}

impl fmt::Display for DeserializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MessageBufferTooSmall => write!(
                f,
                "server responded with a payload that's too small to fit a valid message"
            ),
            Self::BadAuthKey => write!(f, "server's auth key does not match ours"),
            Self::BadSessionId { got, expected } => write!(
                f,
                "bad server session id (got {}, expected {})",
                got, expected
            ),
            Self::TooLongMessageLength { got, max_length } => write!(
                f,
                "bad server message length (got {}, when at most it should be {})",
                got, max_length
            ),
            Self::DecompressionFailed => write!(f, "failed to decompress server's data"),
            Self::UnexpectedConstructor { id } => write!(f, "unexpected constructor: {:08x}", id),
            Self::Decryption(e) => write!(f, "failed to decrypt message: {}", e),
        }
    }
}

impl From<deserialize::Error> for DeserializeError {
    fn from(error: deserialize::Error) -> Self {
        match error {
            deserialize::Error::UnexpectedEof => Self::MessageBufferTooSmall,
            deserialize::Error::UnexpectedConstructor { id } => Self::UnexpectedConstructor { id },
        }
    }
}

impl From<telecraft_crypto::Error> for DeserializeError {
    fn from(error: telecraft_crypto::Error) -> Self {
        Self::Decryption(error)
    }
}

/// This error occurs when a Remote Procedure Call was unsuccessful.
///
/// The request should be retransmitted when this happens, unless the
/// variant is `Rpc`.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestError {
    /// The server returned an error for this call.
    Rpc(RpcError),

    /// The call was dropped, so the server will not process it.
    Dropped,

    /// The message sent to the server was rejected with a bad-message
    /// notification. Retryable notifications have had the session state
    /// adjusted so retransmission can succeed.
    BadMessage { code: i32 },

    /// The deserialization of the response failed, so while the server
    /// technically answered, the answer is unusable.
    Deserialize(DeserializeError),
}

impl RequestError {
    pub fn should_retransmit(&self) -> bool {
        match self {
            Self::BadMessage { code } => BadMessage { code: *code }.retryable(),
            _ => false,
        }
    }
}

impl From<DeserializeError> for RequestError {
    fn from(error: DeserializeError) -> Self {
        Self::Deserialize(error)
    }
}

impl From<deserialize::Error> for RequestError {
    fn from(error: deserialize::Error) -> Self {
        RequestError::from(DeserializeError::from(error))
    }
}

/// A bad-message notification code, with its protocol meaning attached.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BadMessage {
    pub code: i32,
}

impl BadMessage {
    /// Whether retransmitting the rejected message can succeed after the
    /// local state was corrected.
    pub fn retryable(&self) -> bool {
        // 16/17: msg_id drift; 32/33: seq_no drift; 48: bad server salt.
        matches!(self.code, 16 | 17 | 32 | 33 | 48)
    }

    /// Whether the connection itself should be considered broken.
    pub fn fatal(&self) -> bool {
        !self.retryable()
    }

    pub fn description(&self) -> &'static str {
        match self.code {
            16 => "msg_id too low",
            17 => "msg_id too high",
            18 => "incorrect two lower order msg_id bits",
            19 => "container msg_id is the same as msg_id of a previously received message",
            20 => "message too old",
            32 => "msg_seqno too low",
            33 => "msg_seqno too high",
            34 => "an even msg_seqno expected, but odd received",
            35 => "odd msg_seqno expected, but even received",
            48 => "incorrect server salt",
            64 => "invalid container",
            _ => "unknown bad message code",
        }
    }
}

/// The error type reported by the server when a request is misused.
#[derive(Clone, Debug, PartialEq)]
pub struct RpcError {
    /// A numerical value similar to HTTP status codes.
    pub code: i32,

    /// The ASCII error name, with any numeric argument removed.
    pub name: String,

    /// The numeric argument embedded in the name, if any. For example,
    /// `FLOOD_WAIT_31` carries a `value` of `31`.
    pub value: Option<u32>,
}

impl Error for RpcError {}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rpc error {}: {}", self.code, self.name)?;
        if let Some(value) = self.value {
            write!(f, " (value: {})", value)?;
        }
        Ok(())
    }
}

impl RpcError {
    /// Whether this error tells the client its account lives on another
    /// data center. The target DC is then in [`RpcError::value`].
    pub fn is_migrate(&self) -> bool {
        matches!(
            self.name.as_str(),
            "PHONE_MIGRATE" | "USER_MIGRATE" | "NETWORK_MIGRATE"
        )
    }
}

impl From<telecraft_tl::types::RpcError> for RpcError {
    fn from(error: telecraft_tl::types::RpcError) -> Self {
        // Extract the numeric argument from the error name, if any.
        if let Some(value) = error
            .error_message
            .split(|c: char| !c.is_ascii_digit())
            .find(|s| !s.is_empty())
        {
            let mut to_remove = String::with_capacity(1 + value.len());
            to_remove.push('_');
            to_remove.push_str(value);
            Self {
                code: error.error_code,
                name: error.error_message.replace(&to_remove, ""),
                // Safe to unwrap, matched on digits.
                value: Some(value.parse().unwrap()),
            }
        } else {
            Self {
                code: error.error_code,
                name: error.error_message.clone(),
                value: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use telecraft_tl::types;

    #[test]
    fn rpc_error_parsing() {
        assert_eq!(
            RpcError::from(types::RpcError {
                error_code: 400,
                error_message: "CHAT_INVALID".into(),
            }),
            RpcError {
                code: 400,
                name: "CHAT_INVALID".into(),
                value: None
            }
        );

        assert_eq!(
            RpcError::from(types::RpcError {
                error_code: 420,
                error_message: "FLOOD_WAIT_31".into(),
            }),
            RpcError {
                code: 420,
                name: "FLOOD_WAIT".into(),
                value: Some(31)
            }
        );

        assert_eq!(
            RpcError::from(types::RpcError {
                error_code: 303,
                error_message: "PHONE_MIGRATE_4".into(),
            }),
            RpcError {
                code: 303,
                name: "PHONE_MIGRATE".into(),
                value: Some(4)
            }
        );
    }

    #[test]
    fn migrate_detection() {
        let err = RpcError::from(types::RpcError {
            error_code: 303,
            error_message: "USER_MIGRATE_2".into(),
        });
        assert!(err.is_migrate());
        assert_eq!(err.value, Some(2));

        let err = RpcError::from(types::RpcError {
            error_code: 420,
            error_message: "FLOOD_WAIT_10".into(),
        });
        assert!(!err.is_migrate());
    }

    #[test]
    fn bad_message_triage() {
        assert!(BadMessage { code: 16 }.retryable());
        assert!(BadMessage { code: 48 }.retryable());
        assert!(BadMessage { code: 64 }.fatal());
        assert!(BadMessage { code: 20 }.fatal());
    }
}
