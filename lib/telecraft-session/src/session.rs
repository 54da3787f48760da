// Copyright 2025 - developers of the `telecraft` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use crate::storage;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::Path;

const SESSION_VERSION: u32 = 1;

/// Which network a session talks to. The test and production networks are
/// administratively isolated: accounts, keys and data centers of one do
/// not exist on the other, so a session file is permanently bound to the
/// lane it was created for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkLane {
    #[serde(rename = "test")]
    Test,
    #[serde(rename = "prod")]
    Prod,
}

impl NetworkLane {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Prod => "prod",
        }
    }
}

impl fmt::Display for NetworkLane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The persisted record of one negotiated session: where to connect, how
/// to frame the connection, and the secrets agreed with that data center.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub network_lane: NetworkLane,
    pub dc_id: i32,
    pub host: String,
    pub port: u16,
    /// Framing name as understood by the transport layer
    /// (`"intermediate"` or `"abridged"`).
    pub framing: String,
    pub auth_key: [u8; 256],
    pub server_salt: i64,
}

/// Errors loading or saving a session file.
#[derive(Debug)]
pub enum SessionError {
    Io(io::Error),

    /// The file is not valid JSON or misses required fields.
    Malformed(String),

    /// The on-disk version is newer than this build understands. The auth
    /// key cannot be guessed, so this is not silently reset.
    UnsupportedVersion { got: u32 },

    /// The file belongs to a different network lane than the one the
    /// caller asked for. Using it anyway would leak one network's key to
    /// the other, so this is a hard configuration error.
    LaneMismatch {
        requested: NetworkLane,
        found: NetworkLane,
    },
}

impl std::error::Error for SessionError {}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "session io error: {}", e),
            Self::Malformed(why) => write!(f, "malformed session file: {}", why),
            Self::UnsupportedVersion { got } => {
                write!(f, "unsupported session file version {}", got)
            }
            Self::LaneMismatch { requested, found } => write!(
                f,
                "session file belongs to the {} lane, but {} was requested",
                found, requested
            ),
        }
    }
}

impl From<io::Error> for SessionError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

#[derive(Serialize, Deserialize)]
struct SessionRecord {
    version: u32,
    network_lane: NetworkLane,
    dc_id: i32,
    host: String,
    port: u16,
    framing: String,
    auth_key: String,
    server_salt: String,
}

impl Session {
    /// Load a session from `path`, validating its version and that it
    /// belongs to the requested network lane. Returns `Ok(None)` when no
    /// file exists yet.
    pub fn load(path: &Path, lane: NetworkLane) -> Result<Option<Self>, SessionError> {
        let data = match storage::read_optional(path)? {
            Some(data) => data,
            None => return Ok(None),
        };

        let record: SessionRecord = serde_json::from_slice(&data)
            .map_err(|e| SessionError::Malformed(e.to_string()))?;

        if record.version != SESSION_VERSION {
            return Err(SessionError::UnsupportedVersion {
                got: record.version,
            });
        }
        if record.network_lane != lane {
            return Err(SessionError::LaneMismatch {
                requested: lane,
                found: record.network_lane,
            });
        }

        let auth_key_bytes = BASE64
            .decode(&record.auth_key)
            .map_err(|e| SessionError::Malformed(format!("auth_key: {}", e)))?;
        let auth_key: [u8; 256] = auth_key_bytes
            .try_into()
            .map_err(|_| SessionError::Malformed("auth_key is not 256 bytes".into()))?;

        let salt_bytes = BASE64
            .decode(&record.server_salt)
            .map_err(|e| SessionError::Malformed(format!("server_salt: {}", e)))?;
        let salt_bytes: [u8; 8] = salt_bytes
            .try_into()
            .map_err(|_| SessionError::Malformed("server_salt is not 8 bytes".into()))?;

        Ok(Some(Self {
            network_lane: record.network_lane,
            dc_id: record.dc_id,
            host: record.host,
            port: record.port,
            framing: record.framing,
            auth_key,
            server_salt: i64::from_le_bytes(salt_bytes),
        }))
    }

    /// Atomically persist the session to `path` with owner-only
    /// permissions.
    pub fn save(&self, path: &Path) -> Result<(), SessionError> {
        let record = SessionRecord {
            version: SESSION_VERSION,
            network_lane: self.network_lane,
            dc_id: self.dc_id,
            host: self.host.clone(),
            port: self.port,
            framing: self.framing.clone(),
            auth_key: BASE64.encode(self.auth_key),
            server_salt: BASE64.encode(self.server_salt.to_le_bytes()),
        };

        let mut data = serde_json::to_vec_pretty(&record)
            .map_err(|e| SessionError::Malformed(e.to_string()))?;
        data.push(b'\n');
        storage::write_atomic(path, &data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn scratch(name: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("telecraft-session-{}-{}", std::process::id(), name));
        dir
    }

    fn sample() -> Session {
        let mut auth_key = [0u8; 256];
        auth_key
            .iter_mut()
            .enumerate()
            .for_each(|(i, x)| *x = i as u8);
        Session {
            network_lane: NetworkLane::Test,
            dc_id: 2,
            host: "149.154.167.40".into(),
            port: 443,
            framing: "intermediate".into(),
            auth_key,
            server_salt: 0x1122334455667788,
        }
    }

    #[test]
    fn roundtrip() {
        let path = scratch("roundtrip");
        let session = sample();
        session.save(&path).unwrap();
        let back = Session::load(&path, NetworkLane::Test).unwrap().unwrap();
        assert_eq!(back, session);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_is_none() {
        let path = scratch("none");
        assert_eq!(Session::load(&path, NetworkLane::Test).unwrap(), None);
    }

    #[test]
    fn lane_mismatch_is_rejected() {
        let path = scratch("lane");
        sample().save(&path).unwrap();
        assert!(matches!(
            Session::load(&path, NetworkLane::Prod),
            Err(SessionError::LaneMismatch { .. })
        ));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn unknown_version_is_rejected() {
        let path = scratch("version");
        let data = serde_json::json!({
            "version": 99,
            "network_lane": "test",
            "dc_id": 2,
            "host": "x",
            "port": 443,
            "framing": "intermediate",
            "auth_key": "",
            "server_salt": "",
        });
        storage::write_atomic(&path, data.to_string().as_bytes()).unwrap();
        assert!(matches!(
            Session::load(&path, NetworkLane::Test),
            Err(SessionError::UnsupportedVersion { got: 99 })
        ));
        fs::remove_file(&path).unwrap();
    }
}
