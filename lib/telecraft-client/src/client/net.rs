// Copyright 2025 - developers of the `telecraft` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Connecting, reconnecting, migrating between data centers, and the
//! step loop every other client feature rides on.
use super::{Client, ClientHandle, Config, Request};
use bytes::BytesMut;
use futures_util::future::FutureExt as _;
use futures_util::{future, pin_mut};
use log::{info, warn};
use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};
use telecraft_mtproto::mtp;
use telecraft_mtproto::transport::{
    Abridged, Error as TransportError, Intermediate, Transport, UnpackedOffset,
};
use telecraft_mtsender::{self as sender, AuthorizationError, InvocationError, Sender, ServerAddr};
use telecraft_session::{known_dc, MessageBox, NetworkLane, Session, UpdatesState};
use telecraft_tl::{functions, RemoteCall};
use tokio::sync::mpsc;

/// Reconnection backoff bounds: start at one second, cap at thirty, with
/// a ±20 % jitter on every delay.
const RECONNECT_BASE: Duration = Duration::from_secs(1);
const RECONNECT_CAP: Duration = Duration::from_secs(30);

/// The environment variable which, together with [`Config::allow_prod`],
/// unlocks the production lane.
pub const PROD_OPT_IN_VAR: &str = "TELECRAFT_ALLOW_PROD";

/// Configuration problems detected before any connection is attempted.
#[derive(Debug)]
pub enum ConfigError {
    /// The production lane needs both the flag and the environment
    /// variable; one of them is missing.
    ProdNotAllowed,

    /// No address is known for the requested data center.
    UnknownDc { dc_id: i32 },

    /// The framing name is not one the transport layer understands.
    UnknownFraming { name: String },

    /// The session file could not be used.
    Session(telecraft_session::SessionError),
}

impl std::error::Error for ConfigError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProdNotAllowed => write!(
                f,
                "the production lane requires both Config::allow_prod and {}=1",
                PROD_OPT_IN_VAR
            ),
            Self::UnknownDc { dc_id } => write!(f, "no known address for dc {}", dc_id),
            Self::UnknownFraming { name } => write!(f, "unknown framing {:?}", name),
            Self::Session(e) => write!(f, "session error: {}", e),
        }
    }
}

impl From<telecraft_session::SessionError> for ConfigError {
    fn from(e: telecraft_session::SessionError) -> Self {
        Self::Session(e)
    }
}

/// Everything that can go wrong while connecting a client.
#[derive(Debug)]
pub enum ConnectError {
    Config(ConfigError),
    Authorization(AuthorizationError),
    Invocation(InvocationError),
    Io(std::io::Error),
}

impl std::error::Error for ConnectError {}

impl fmt::Display for ConnectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "connect error: {}", e),
            Self::Authorization(e) => write!(f, "connect error: {}", e),
            Self::Invocation(e) => write!(f, "connect error: {}", e),
            Self::Io(e) => write!(f, "connect error: {}", e),
        }
    }
}

impl From<ConfigError> for ConnectError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<AuthorizationError> for ConnectError {
    fn from(e: AuthorizationError) -> Self {
        Self::Authorization(e)
    }
}

impl From<InvocationError> for ConnectError {
    fn from(e: InvocationError) -> Self {
        Self::Invocation(e)
    }
}

impl From<std::io::Error> for ConnectError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// The result of a single [`Client::step`].
#[derive(Debug)]
pub enum Step {
    Connected,
    Disconnected,
}

/// Runtime-selected wire framing.
pub(crate) enum Framed {
    Intermediate(Intermediate),
    Abridged(Abridged),
}

impl Framed {
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        match name {
            "intermediate" => Some(Self::Intermediate(Intermediate::new())),
            "abridged" => Some(Self::Abridged(Abridged::new())),
            _ => None,
        }
    }
}

impl Transport for Framed {
    fn pack(&mut self, input: &[u8], output: &mut BytesMut) {
        match self {
            Self::Intermediate(t) => t.pack(input, output),
            Self::Abridged(t) => t.pack(input, output),
        }
    }

    fn unpack(&mut self, input: &[u8]) -> Result<UnpackedOffset, TransportError> {
        match self {
            Self::Intermediate(t) => t.unpack(input),
            Self::Abridged(t) => t.unpack(input),
        }
    }

    fn reset(&mut self) {
        match self {
            Self::Intermediate(t) => t.reset(),
            Self::Abridged(t) => t.reset(),
        }
    }
}

fn check_lane_opt_in(config: &Config) -> Result<(), ConfigError> {
    if config.lane == NetworkLane::Prod {
        let env_ok = std::env::var(PROD_OPT_IN_VAR).map(|v| v == "1").unwrap_or(false);
        if !(config.allow_prod && env_ok) {
            return Err(ConfigError::ProdNotAllowed);
        }
    }
    Ok(())
}

fn endpoint_for(config: &Config, dc_id: i32) -> Result<ServerAddr, ConfigError> {
    if let Some((host, port)) = &config.addr_override {
        return Ok(ServerAddr {
            host: host.clone(),
            port: *port,
        });
    }
    known_dc(config.lane, dc_id)
        .map(|(host, port)| ServerAddr {
            host: host.to_string(),
            port,
        })
        .ok_or(ConfigError::UnknownDc { dc_id })
}

/// Establish a sender for the given DC, reusing the session when one
/// exists or running a fresh handshake when it does not. Returns the
/// session record describing the connection.
pub(crate) async fn connect_sender(
    dc_id: i32,
    config: &Config,
    existing: Option<Session>,
) -> Result<(Sender<Framed, mtp::Encrypted>, Session), ConnectError> {
    let (addr, framing_name) = match &existing {
        // The session file is authoritative for the endpoint and framing:
        // a previous login may have migrated to another data center.
        Some(session) => (
            ServerAddr {
                host: session.host.clone(),
                port: session.port,
            },
            session.framing.clone(),
        ),
        None => (endpoint_for(config, dc_id)?, config.framing.clone()),
    };

    let transport = Framed::from_name(&framing_name).ok_or(ConfigError::UnknownFraming {
        name: framing_name.clone(),
    })?;

    let (sender, session) = match existing {
        Some(session) => {
            info!(
                "creating a new sender with existing auth key to dc {} ({})",
                session.dc_id, addr
            );
            let sender =
                sender::connect_with_auth(transport, addr, session.auth_key, session.server_salt)
                    .await?;
            (sender, session)
        }
        None => {
            info!("creating a new sender and auth key in dc {} ({})", dc_id, addr);
            let sender = sender::connect(transport, addr.clone()).await?;
            let session = Session {
                network_lane: config.lane,
                dc_id,
                host: addr.host,
                port: addr.port,
                framing: framing_name,
                auth_key: sender.auth_key(),
                server_salt: sender.salt(),
            };
            (sender, session)
        }
    };

    Ok((sender, session))
}

impl Client {
    /// Create and connect a new client instance.
    ///
    /// If a session file exists its endpoint, framing and authorization
    /// key are reused and the handshake is skipped; otherwise a key is
    /// generated and the session is saved. Either way the connection is
    /// registered with the server through `initConnection` wrapped in
    /// `invokeWithLayer`.
    pub async fn connect(config: Config) -> Result<Self, ConnectError> {
        check_lane_opt_in(&config)?;

        let existing = match config.session_file() {
            Some(path) => Session::load(path, config.lane).map_err(ConfigError::from)?,
            None => None,
        };

        let (sender, session) = connect_sender(config.dc_id, &config, existing).await?;
        let mut config = config;
        // The session is authoritative for the endpoint and framing from
        // here on (a previous run may have migrated or overridden them).
        config.dc_id = session.dc_id;
        config.framing = session.framing.clone();
        persist_session(&config, &session);

        let message_box = match config.updates_path().and_then(|p| UpdatesState::load(&p)) {
            Some(state) => MessageBox::load(state),
            None => MessageBox::new(),
        };
        let entities = match config.entities_path() {
            Some(path) => telecraft_session::EntityCache::load(&path),
            None => telecraft_session::EntityCache::new(),
        };

        let (handle_tx, handle_rx) = mpsc::unbounded_channel();
        let mut client = Self {
            sender,
            config,
            message_box,
            entities,
            handle_tx,
            handle_rx,
            init_invoked: false,
            updates: VecDeque::new(),
            updates_enabled: false,
            difference: None,
            last_persist: Instant::now(),
        };

        client.init_connection().await?;
        Ok(client)
    }

    /// Register this connection with the server. The server ignores plain
    /// requests from clients that never identified themselves.
    pub(crate) async fn init_connection(&mut self) -> Result<(), InvocationError> {
        let params = &self.config.params;
        let _config = self
            .sender
            .invoke(&functions::InvokeWithLayer {
                layer: telecraft_tl::LAYER,
                query: functions::InitConnection {
                    api_id: self.config.api_id,
                    device_model: params.device_model.clone(),
                    system_version: params.system_version.clone(),
                    app_version: params.app_version.clone(),
                    system_lang_code: params.system_lang_code.clone(),
                    lang_pack: String::new(),
                    lang_code: params.lang_code.clone(),
                    query: functions::help::GetConfig {},
                },
            })
            .await?;
        self.init_invoked = true;
        Ok(())
    }

    /// Invoke a raw API call with the default timeout, retrying once
    /// after a migration error.
    pub async fn invoke<R: RemoteCall>(
        &mut self,
        request: &R,
    ) -> Result<R::Return, InvocationError> {
        self.invoke_with_timeout(request, super::DEFAULT_REQUEST_TIMEOUT)
            .await
    }

    /// Invoke a raw API call with an explicit timeout.
    ///
    /// On expiry the call resolves to [`InvocationError::Timeout`]; the
    /// connection stays up, and a late reply is silently discarded.
    pub async fn invoke_with_timeout<R: RemoteCall>(
        &mut self,
        request: &R,
        timeout: Duration,
    ) -> Result<R::Return, InvocationError> {
        match self.invoke_once(request, timeout).await {
            Err(err) => match err.migrate_target() {
                Some(dc_id) => {
                    info!("server asked to migrate to dc {}; retrying once", dc_id);
                    self.migrate(dc_id)
                        .await
                        .map_err(|_| InvocationError::Dropped)?;
                    self.invoke_once(request, timeout).await
                }
                None => Err(err),
            },
            ok => ok,
        }
    }

    async fn invoke_once<R: RemoteCall>(
        &mut self,
        request: &R,
        timeout: Duration,
    ) -> Result<R::Return, InvocationError> {
        match tokio::time::timeout(timeout, self.sender.invoke(request)).await {
            Ok(result) => result,
            Err(_) => Err(InvocationError::Timeout),
        }
    }

    /// Tear the connection down and rebuild it against another data
    /// center, rewriting the session and running a fresh handshake (the
    /// old key belongs to the old DC).
    pub(crate) async fn migrate(&mut self, dc_id: i32) -> Result<(), ConnectError> {
        info!("migrating to dc {}", dc_id);
        let (sender, session) = connect_sender(dc_id, &self.config, None).await?;
        self.sender = sender;
        self.config.dc_id = dc_id;
        self.init_invoked = false;
        persist_session(&self.config, &session);
        self.init_connection().await?;
        Ok(())
    }

    /// Reconnect to the same data center after the connection died,
    /// backing off exponentially (1 s doubling up to 30 s, ±20 % jitter).
    /// The session is reused verbatim; the session id is regenerated by
    /// the fresh MTP state, and the updates engine is told to check for a
    /// gap.
    pub(crate) async fn reconnect(&mut self) {
        let mut delay = RECONNECT_BASE;
        loop {
            tokio::time::sleep(with_jitter(delay)).await;

            let existing = self
                .config
                .session_file()
                .and_then(|path| Session::load(path, self.config.lane).ok().flatten())
                .or_else(|| self.current_session());

            match connect_sender(self.config.dc_id, &self.config, existing).await {
                Ok((sender, session)) => {
                    self.sender = sender;
                    self.init_invoked = false;
                    persist_session(&self.config, &session);
                    if let Err(e) = self.init_connection().await {
                        warn!("reconnect failed to init connection: {}", e);
                    } else {
                        info!("reconnected");
                        self.message_box.note_possible_gap();
                        return;
                    }
                }
                Err(e) => warn!("reconnect attempt failed: {}", e),
            }

            delay = (delay * 2).min(RECONNECT_CAP);
        }
    }

    /// The session record describing the live connection.
    pub(crate) fn current_session(&self) -> Option<Session> {
        let addr = self.sender.addr().clone();
        Some(Session {
            network_lane: self.config.lane,
            dc_id: self.config.dc_id,
            host: addr.host,
            port: addr.port,
            framing: self.config.framing.clone(),
            auth_key: self.sender.auth_key(),
            server_salt: self.sender.salt(),
        })
    }

    /// Perform a single network step or process one request from the
    /// handles.
    pub async fn step(&mut self) -> Result<Step, ConnectError> {
        let (network, request) = {
            let network = self.sender.step();
            let request = self.handle_rx.recv();
            pin_mut!(network);
            pin_mut!(request);
            match future::select(network, request).await {
                future::Either::Left((network, request)) => {
                    let request = request.now_or_never().flatten();
                    (Some(network), request)
                }
                future::Either::Right((request, network)) => {
                    let network = network.now_or_never();
                    (network, request)
                }
            }
        };

        if let Some(request) = request {
            match request {
                Request::Rpc { request, response } => {
                    drop(response.send(self.sender.enqueue_body(request)));
                }
                Request::Migrate { dc_id, response } => {
                    if let Err(e) = self.migrate(dc_id).await {
                        warn!("migration to dc {} failed: {}", dc_id, e);
                    }
                    drop(response.send(()));
                }
                Request::Disconnect { response } => {
                    self.persist_all(true);
                    drop(response.send(()));
                    return Ok(Step::Disconnected);
                }
            }
        }

        match network {
            Some(Ok(events)) => self.on_events(events),
            Some(Err(err)) => {
                warn!("connection lost: {}; reconnecting", err);
                self.reconnect().await;
            }
            None => {}
        }

        self.drive_difference();
        self.message_box.check_deadlines();
        self.persist_all(false);

        Ok(Step::Connected)
    }

    /// Run the client until a handle asks to disconnect.
    pub async fn run_until_disconnected(mut self) -> Result<(), ConnectError> {
        loop {
            match self.step().await? {
                Step::Connected => continue,
                Step::Disconnected => break Ok(()),
            }
        }
    }

    /// Flush all state and close the connection.
    pub async fn close(mut self) {
        self.persist_all(true);
        // Dropping the sender closes the socket; pending invocations
        // resolve with a dropped error through their channels.
    }

    pub(crate) fn persist_all(&mut self, force: bool) {
        if !force && self.last_persist.elapsed() < super::PERSIST_DEBOUNCE {
            return;
        }
        self.last_persist = Instant::now();

        if let Some(session) = self.current_session() {
            persist_session(&self.config, &session);
        }
        if let Some(path) = self.config.updates_path() {
            if let Err(e) = self.message_box.session_state().save(&path) {
                warn!("failed to persist updates state: {}", e);
            }
        }
        if let Some(path) = self.config.entities_path() {
            if let Err(e) = self.entities.save(&path) {
                warn!("failed to persist entity cache: {}", e);
            }
        }
    }
}

fn persist_session(config: &Config, session: &Session) {
    if let Some(path) = config.session_file() {
        if let Err(e) = session.save(path) {
            warn!("failed to persist session: {}", e);
        }
    }
}

/// Apply a ±20 % jitter to a delay.
fn with_jitter(delay: Duration) -> Duration {
    let mut byte = [0u8; 1];
    let _ = getrandom::getrandom(&mut byte);
    // Map the byte into the 0.8..1.2 factor range.
    let factor = 0.8 + (byte[0] as f64 / 255.0) * 0.4;
    delay.mul_f64(factor)
}

impl ClientHandle {
    /// Invoke a raw API call through the running client with the default
    /// timeout.
    pub async fn invoke<R: RemoteCall>(
        &mut self,
        request: &R,
    ) -> Result<R::Return, InvocationError> {
        self.invoke_with_timeout(request, super::DEFAULT_REQUEST_TIMEOUT)
            .await
    }

    /// Invoke a raw API call through the running client. On a migration
    /// error the client is asked to move and the call is retried once.
    pub async fn invoke_with_timeout<R: RemoteCall>(
        &mut self,
        request: &R,
        timeout: Duration,
    ) -> Result<R::Return, InvocationError> {
        match self.invoke_once(request, timeout).await {
            Err(err) => match err.migrate_target() {
                Some(dc_id) => {
                    let (response, rx) = tokio::sync::oneshot::channel();
                    self.tx
                        .send(Request::Migrate { dc_id, response })
                        .map_err(|_| InvocationError::Dropped)?;
                    rx.await.map_err(|_| InvocationError::Dropped)?;
                    self.invoke_once(request, timeout).await
                }
                None => Err(err),
            },
            ok => ok,
        }
    }

    async fn invoke_once<R: RemoteCall>(
        &mut self,
        request: &R,
        timeout: Duration,
    ) -> Result<R::Return, InvocationError> {
        use telecraft_tl::{Deserializable, Serializable};

        let (response, rx) = tokio::sync::oneshot::channel();
        self.tx
            .send(Request::Rpc {
                request: request.to_bytes(),
                response,
            })
            .map_err(|_| InvocationError::Dropped)?;

        let reply = async move {
            // First the channel carrying the reply channel arrives, then
            // the reply itself.
            let rx = rx.await.map_err(|_| InvocationError::Dropped)?;
            rx.await.map_err(|_| InvocationError::Dropped)?
        };

        match tokio::time::timeout(timeout, reply).await {
            Ok(result) => result.and_then(|body| {
                R::Return::from_bytes(&body).map_err(InvocationError::from)
            }),
            Err(_) => Err(InvocationError::Timeout),
        }
    }

    /// Gracefully tell the client to flush its state and stop.
    pub async fn disconnect(&mut self) {
        let (response, rx) = tokio::sync::oneshot::channel();
        if self.tx.send(Request::Disconnect { response }).is_ok() {
            let _ = rx.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jitter_stays_in_bounds() {
        for _ in 0..64 {
            let jittered = with_jitter(Duration::from_secs(10));
            assert!(jittered >= Duration::from_secs(8));
            assert!(jittered <= Duration::from_secs(12));
        }
    }

    #[test]
    fn backoff_caps_at_thirty_seconds() {
        let mut delay = RECONNECT_BASE;
        let mut seen = Vec::new();
        for _ in 0..8 {
            seen.push(delay);
            delay = (delay * 2).min(RECONNECT_CAP);
        }
        assert_eq!(seen[0], Duration::from_secs(1));
        assert_eq!(seen[1], Duration::from_secs(2));
        assert!(seen.iter().all(|&d| d <= RECONNECT_CAP));
        assert_eq!(*seen.last().unwrap(), RECONNECT_CAP);
    }

    #[test]
    fn prod_lane_requires_both_opt_ins() {
        let mut config = Config::test(1, "h");
        config.lane = NetworkLane::Prod;
        config.allow_prod = false;
        assert!(matches!(
            check_lane_opt_in(&config),
            Err(ConfigError::ProdNotAllowed)
        ));

        // The flag alone is not enough without the environment variable.
        config.allow_prod = true;
        std::env::remove_var(PROD_OPT_IN_VAR);
        assert!(matches!(
            check_lane_opt_in(&config),
            Err(ConfigError::ProdNotAllowed)
        ));

        config.lane = NetworkLane::Test;
        config.allow_prod = false;
        assert!(check_lane_opt_in(&config).is_ok());
    }
}
