// Copyright 2025 - developers of the `telecraft` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
pub mod auth;
pub mod net;
pub mod peers;
pub mod updates;

use net::Framed;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use telecraft_mtproto::mtp;
use telecraft_mtsender::{InvocationError, Sender};
use telecraft_session::{EntityCache, MessageBox, NetworkLane};
use tokio::sync::{mpsc, oneshot};
pub use updates::Update;

/// When no locale can be detected, use this one instead.
const DEFAULT_LOCALE: &str = "en";

/// The default per-call timeout.
pub(crate) const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// How long to wait between saves of the updates state and entity cache.
pub(crate) const PERSIST_DEBOUNCE: Duration = Duration::from_secs(2);

/// The most updates buffered before the newest get dropped.
pub(crate) const UPDATE_QUEUE_LIMIT: usize = 4096;

pub(crate) enum Request {
    Rpc {
        request: Vec<u8>,
        response: oneshot::Sender<oneshot::Receiver<Result<Vec<u8>, InvocationError>>>,
    },
    Migrate {
        dc_id: i32,
        response: oneshot::Sender<()>,
    },
    Disconnect {
        response: oneshot::Sender<()>,
    },
}

/// A client connected to Telegram.
///
/// One instance owns one socket, one update engine and one entity cache;
/// nothing is shared between instances. The owning task drives the
/// network by calling [`Client::step`] (or the loops built on it), while
/// any number of [`ClientHandle`]s invoke requests through it.
pub struct Client {
    pub(crate) sender: Sender<Framed, mtp::Encrypted>,
    pub(crate) config: Config,
    pub(crate) message_box: MessageBox,
    pub(crate) entities: EntityCache,

    pub(crate) handle_tx: mpsc::UnboundedSender<Request>,
    pub(crate) handle_rx: mpsc::UnboundedReceiver<Request>,

    /// Whether `initConnection` has been sent on the current connection.
    pub(crate) init_invoked: bool,

    /// Buffered update events waiting for [`Client::next_update`].
    pub(crate) updates: VecDeque<Update>,
    pub(crate) updates_enabled: bool,

    /// In-flight difference recovery, if any.
    pub(crate) difference: Option<updates::PendingDifference>,

    pub(crate) last_persist: Instant,
}

/// A cloneable handle used to invoke requests while the [`Client`] runs
/// elsewhere.
#[derive(Clone)]
pub struct ClientHandle {
    pub(crate) tx: mpsc::UnboundedSender<Request>,
}

/// Configuration required to create a [`Client`] instance.
pub struct Config {
    /// The network lane to operate on. The production lane additionally
    /// requires [`Config::allow_prod`] and the `TELECRAFT_ALLOW_PROD=1`
    /// environment variable, so a development harness cannot reach real
    /// accounts by accident.
    pub lane: NetworkLane,

    /// Explicit opt-in for the production lane.
    pub allow_prod: bool,

    /// Developer's API ID.
    pub api_id: i32,

    /// Developer's API hash.
    pub api_hash: String,

    /// The data center to dial when no session exists yet.
    pub dc_id: i32,

    /// Endpoint override; the well-known table is used otherwise.
    pub addr_override: Option<(String, u16)>,

    /// Wire framing name (`"intermediate"` or `"abridged"`).
    pub framing: String,

    /// Base path for the persisted session. The updates state and entity
    /// cache live in sibling files. In-memory only when `None`.
    pub session_path: Option<PathBuf>,

    /// Additional initialization parameters with sane defaults.
    pub params: InitParams,
}

impl Config {
    /// A configuration for the test lane with everything else defaulted.
    pub fn test(api_id: i32, api_hash: impl Into<String>) -> Self {
        Self {
            lane: NetworkLane::Test,
            allow_prod: false,
            api_id,
            api_hash: api_hash.into(),
            dc_id: telecraft_session::DEFAULT_DC,
            addr_override: None,
            framing: "intermediate".into(),
            session_path: None,
            params: InitParams::default(),
        }
    }

    fn sibling_path(&self, suffix: &str) -> Option<PathBuf> {
        let path = self.session_path.as_ref()?;
        let name = path.file_name()?.to_string_lossy();
        let base = name.strip_suffix(".session.json").unwrap_or(&name);
        Some(path.with_file_name(format!("{}{}", base, suffix)))
    }

    pub(crate) fn updates_path(&self) -> Option<PathBuf> {
        self.sibling_path(".updates.json")
    }

    pub(crate) fn entities_path(&self) -> Option<PathBuf> {
        self.sibling_path(".entities.json")
    }

    pub(crate) fn session_file(&self) -> Option<&Path> {
        self.session_path.as_deref()
    }
}

/// Optional initialization parameters sent with `initConnection`.
pub struct InitParams {
    pub device_model: String,
    pub system_version: String,
    pub app_version: String,
    pub system_lang_code: String,
    pub lang_code: String,
}

impl Default for InitParams {
    fn default() -> Self {
        let info = os_info::get();

        let mut system_lang_code = locate_locale::system();
        if system_lang_code.is_empty() {
            system_lang_code.push_str(DEFAULT_LOCALE);
        }

        let mut lang_code = locate_locale::user();
        if lang_code.is_empty() {
            lang_code.push_str(DEFAULT_LOCALE);
        }

        Self {
            device_model: format!("{} {}", info.os_type(), info.bitness()),
            system_version: info.version().to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            system_lang_code,
            lang_code,
        }
    }
}

impl Client {
    /// Return a new [`ClientHandle`] that can invoke remote procedure
    /// calls concurrently with the running client.
    pub fn handle(&self) -> ClientHandle {
        ClientHandle {
            tx: self.handle_tx.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sibling_paths_share_the_base_name() {
        let mut config = Config::test(1, "hash");
        config.session_path = Some(PathBuf::from("/tmp/prod_dc2.session.json"));
        assert_eq!(
            config.updates_path(),
            Some(PathBuf::from("/tmp/prod_dc2.updates.json"))
        );
        assert_eq!(
            config.entities_path(),
            Some(PathBuf::from("/tmp/prod_dc2.entities.json"))
        );

        config.session_path = Some(PathBuf::from("/tmp/bare"));
        assert_eq!(
            config.updates_path(),
            Some(PathBuf::from("/tmp/bare.updates.json"))
        );
    }
}
