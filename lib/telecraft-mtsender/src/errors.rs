// Copyright 2025 - developers of the `telecraft` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;
use std::io;
use telecraft_mtproto::errors::DeserializeError;
use telecraft_mtproto::{auth, transport};
use telecraft_tl::deserialize;

pub use telecraft_mtproto::errors::RpcError;

/// An error while reading from (or writing to) the network. All variants
/// are fatal for the connection they occurred on.
#[derive(Debug)]
pub enum ReadError {
    Io(io::Error),
    Transport(transport::Error),
    Deserialize(DeserializeError),

    /// The server rejected one of our messages with a bad-message code we
    /// cannot recover from in place.
    BadMessage { code: i32 },
}

impl std::error::Error for ReadError {}

impl Clone for ReadError {
    fn clone(&self) -> Self {
        match self {
            Self::Io(e) => Self::Io(
                e.raw_os_error()
                    .map(io::Error::from_raw_os_error)
                    .unwrap_or_else(|| io::Error::new(e.kind(), e.to_string())),
            ),
            Self::Transport(e) => Self::Transport(e.clone()),
            Self::Deserialize(e) => Self::Deserialize(e.clone()),
            Self::BadMessage { code } => Self::BadMessage { code: *code },
        }
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "read error, IO failed: {err}"),
            Self::Transport(err) => write!(f, "read error, transport-level: {err}"),
            Self::Deserialize(err) => write!(f, "read error, bad response: {err}"),
            Self::BadMessage { code } => write!(f, "read error, bad message (code {code})"),
        }
    }
}

impl From<io::Error> for ReadError {
    fn from(error: io::Error) -> Self {
        Self::Io(error)
    }
}

impl From<transport::Error> for ReadError {
    fn from(error: transport::Error) -> Self {
        Self::Transport(error)
    }
}

impl From<DeserializeError> for ReadError {
    fn from(error: DeserializeError) -> Self {
        Self::Deserialize(error)
    }
}

impl From<deserialize::Error> for ReadError {
    fn from(error: deserialize::Error) -> Self {
        Self::Deserialize(error.into())
    }
}

/// This error occurs when a Remote Procedure Call was unsuccessful.
#[derive(Clone, Debug)]
pub enum InvocationError {
    /// The request was invalid or the server could not process it.
    Rpc(RpcError),

    /// The request was cancelled or dropped, and the result won't arrive.
    Dropped,

    /// The error occured while reading the response.
    Read(ReadError),

    /// The caller-supplied deadline expired before the reply arrived.
    Timeout,
}

impl std::error::Error for InvocationError {}

impl fmt::Display for InvocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rpc(err) => write!(f, "request error: {err}"),
            Self::Dropped => write!(f, "request error: dropped (cancelled)"),
            Self::Read(err) => write!(f, "request error: {err}"),
            Self::Timeout => write!(f, "request error: timed out"),
        }
    }
}

impl From<ReadError> for InvocationError {
    fn from(error: ReadError) -> Self {
        Self::Read(error)
    }
}

impl From<DeserializeError> for InvocationError {
    fn from(error: DeserializeError) -> Self {
        Self::from(ReadError::from(error))
    }
}

impl From<deserialize::Error> for InvocationError {
    fn from(error: deserialize::Error) -> Self {
        Self::from(ReadError::from(error))
    }
}

impl InvocationError {
    /// Matches on the name of the RPC error (case-sensitive).
    ///
    /// A single trailing or leading asterisk (`'*'`) checks whether the
    /// error name starts (or ends) with the rest of the input instead.
    /// Returns `false` for non-RPC errors.
    #[inline]
    pub fn is(&self, rpc_error: &str) -> bool {
        match self {
            Self::Rpc(rpc) => {
                if let Some(prefix) = rpc_error.strip_suffix('*') {
                    rpc.name.starts_with(prefix)
                } else if let Some(suffix) = rpc_error.strip_prefix('*') {
                    rpc.name.ends_with(suffix)
                } else {
                    rpc.name == rpc_error
                }
            }
            _ => false,
        }
    }

    /// If this error tells the client to migrate to another data center,
    /// return the target DC.
    pub fn migrate_target(&self) -> Option<i32> {
        match self {
            Self::Rpc(rpc) if rpc.is_migrate() => rpc.value.map(|v| v as i32),
            _ => None,
        }
    }
}

/// This error occurs when the process to generate an authorization key
/// fails.
#[derive(Debug)]
pub enum AuthorizationError {
    /// The generation process itself went wrong.
    Gen(auth::Error),

    /// Invoking one of the generation requests failed.
    Invoke(InvocationError),
}

impl std::error::Error for AuthorizationError {}

impl fmt::Display for AuthorizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gen(err) => write!(f, "authorization error: {err}"),
            Self::Invoke(err) => write!(f, "authorization error: {err}"),
        }
    }
}

impl From<auth::Error> for AuthorizationError {
    fn from(error: auth::Error) -> Self {
        Self::Gen(error)
    }
}

impl From<InvocationError> for AuthorizationError {
    fn from(error: InvocationError) -> Self {
        Self::Invoke(error)
    }
}

impl From<io::Error> for AuthorizationError {
    fn from(error: io::Error) -> Self {
        Self::from(InvocationError::from(ReadError::from(error)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpc_error_matching() {
        let err = InvocationError::Rpc(RpcError {
            code: 400,
            name: "PHONE_CODE_INVALID".to_string(),
            value: None,
        });
        assert!(err.is("PHONE_CODE_INVALID"));
        assert!(err.is("PHONE_CODE_*"));
        assert!(err.is("*_INVALID"));
        assert!(!err.is("SESSION_PASSWORD_NEEDED"));
        assert!(!InvocationError::Dropped.is("PHONE_CODE_INVALID"));
    }

    #[test]
    fn migrate_target_extraction() {
        let err = InvocationError::Rpc(RpcError {
            code: 303,
            name: "PHONE_MIGRATE".to_string(),
            value: Some(4),
        });
        assert_eq!(err.migrate_target(), Some(4));

        let err = InvocationError::Rpc(RpcError {
            code: 420,
            name: "FLOOD_WAIT".to_string(),
            value: Some(31),
        });
        assert_eq!(err.migrate_target(), None);
    }
}
