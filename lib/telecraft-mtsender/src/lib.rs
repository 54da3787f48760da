// Copyright 2025 - developers of the `telecraft` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Owns one TCP connection to a data center and drives the MTP over it:
//! requests go in through [`Sender::invoke`] or [`Sender::enqueue_body`],
//! and [`Sender::step`] multiplexes reads, writes and the keepalive ping
//! while correlating replies back to their requests.
pub mod errors;
pub mod net;

pub use errors::{AuthorizationError, InvocationError, ReadError, RpcError};
pub use net::{NetStream, ServerAddr};

use bytes::BytesMut;
use log::{debug, error, info, trace, warn};
use std::io;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, SystemTime};
use telecraft_mtproto::errors::RequestError;
use telecraft_mtproto::mtp::{self, Mtp};
use telecraft_mtproto::transport::{self, Transport};
use telecraft_mtproto::{auth, MsgId};
use telecraft_tl::{Deserializable, RemoteCall, Serializable};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tokio::time::{sleep_until, Instant};

/// The maximum amount of data to send or receive at once. Telegram closes
/// the connection at roughly a megabyte, plus some room for the framing
/// overhead.
const MAXIMUM_DATA: usize = (1024 * 1024) + (8 * 1024);

/// How much request payload at most goes into a single outgoing packet.
const MAXIMUM_PAYLOAD: usize = 1024 * 1024;

/// Every how often a keepalive ping is sent.
const PING_DELAY: Duration = Duration::from_secs(60);

/// After how many seconds the server should close the connection when we
/// stop sending pings. Leaves `NO_PING_DISCONNECT - PING_DELAY` seconds of
/// slack for a ping to get through.
const NO_PING_DISCONNECT: i32 = 75;

/// Generate a "random" identifier, unique within the process.
pub fn generate_random_id() -> i64 {
    static LAST_ID: AtomicI64 = AtomicI64::new(0);

    while LAST_ID.load(Ordering::SeqCst) == 0 {
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .expect("system time is before epoch")
            .as_nanos() as i64;

        if LAST_ID
            .compare_exchange(0, now, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            std::thread::yield_now();
        }
    }

    LAST_ID.fetch_add(1, Ordering::SeqCst)
}

/// Something the server sent on its own, surfaced by [`Sender::step`].
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A serialized `Updates`-like object for the updates engine.
    Updates(Vec<u8>),

    /// The server hinted that updates may have been lost (for example a
    /// new session was created). The updates engine should get the
    /// difference.
    PossibleGap,
}

/// Manages enqueuing requests, matching them to their response, and IO.
pub struct Sender<T: Transport, M: Mtp> {
    stream: NetStream,
    transport: T,
    mtp: M,
    addr: ServerAddr,
    requests: Vec<Request>,
    next_ping: Instant,

    // Transport-level buffers and positions.
    read_buffer: Vec<u8>,
    read_tail: usize,
    write_buffer: BytesMut,
    write_head: usize,
}

struct Request {
    body: Vec<u8>,
    state: RequestState,
    result: oneshot::Sender<Result<Vec<u8>, InvocationError>>,
}

#[derive(Clone, Debug)]
struct MsgIdPair {
    msg_id: MsgId,
    container_msg_id: MsgId,
}

impl MsgIdPair {
    fn new(msg_id: MsgId) -> Self {
        Self {
            msg_id,
            // By default there is no container, so the container id is the
            // message itself.
            container_msg_id: msg_id,
        }
    }

    fn matches(&self, msg_id: MsgId) -> bool {
        self.msg_id == msg_id || self.container_msg_id == msg_id
    }
}

enum RequestState {
    NotSerialized,
    Serialized(MsgIdPair),
    Sent(MsgIdPair),
}

impl<T: Transport, M: Mtp> Sender<T, M> {
    /// Open a new connection using the given transport and MTP state.
    ///
    /// This does not register the client with `initConnection`; it only
    /// opens the socket.
    pub async fn connect(transport: T, mtp: M, addr: ServerAddr) -> Result<Self, io::Error> {
        let stream = NetStream::connect(&addr).await?;
        Ok(Self {
            stream,
            transport,
            mtp,
            addr,
            requests: vec![],
            next_ping: Instant::now() + PING_DELAY,

            read_buffer: vec![0; MAXIMUM_DATA],
            read_tail: 0,
            write_buffer: BytesMut::with_capacity(MAXIMUM_DATA),
            write_head: 0,
        })
    }

    /// The address this sender is connected to.
    pub fn addr(&self) -> &ServerAddr {
        &self.addr
    }

    /// Serializes the request, enqueues it, and steps the network until a
    /// response for it arrives.
    pub async fn invoke<R: RemoteCall>(
        &mut self,
        request: &R,
    ) -> Result<R::Return, InvocationError> {
        let body = self.send_raw(request.to_bytes()).await?;
        R::Return::from_bytes(&body).map_err(|err| err.into())
    }

    /// Like [`Sender::invoke`], but over an already-serialized request,
    /// returning the raw reply bytes.
    pub async fn send_raw(&mut self, body: Vec<u8>) -> Result<Vec<u8>, InvocationError> {
        let rx = self.enqueue_body(body);
        self.step_until_receive(rx).await
    }

    /// Enqueue an already-serialized request. The returned channel will
    /// resolve once the reply arrives, while some task calls
    /// [`Sender::step`]. Dropping the channel cancels the request; a late
    /// reply is then discarded.
    pub fn enqueue_body(
        &mut self,
        body: Vec<u8>,
    ) -> oneshot::Receiver<Result<Vec<u8>, InvocationError>> {
        assert!(body.len() >= 4);
        let req_id = u32::from_le_bytes([body[0], body[1], body[2], body[3]]);
        debug!("enqueueing request {:08x} to be serialized", req_id);

        let (tx, rx) = oneshot::channel();
        self.requests.push(Request {
            body,
            state: RequestState::NotSerialized,
            result: tx,
        });
        rx
    }

    async fn step_until_receive(
        &mut self,
        mut rx: oneshot::Receiver<Result<Vec<u8>, InvocationError>>,
    ) -> Result<Vec<u8>, InvocationError> {
        loop {
            self.step().await?;
            match rx.try_recv() {
                Ok(x) => break x,
                Err(TryRecvError::Empty) => continue,
                Err(TryRecvError::Closed) => {
                    panic!("request channel dropped before receiving a result")
                }
            }
        }
    }

    /// Step network events, reading and writing at the same time.
    ///
    /// Updates received during this step, if any, are returned.
    ///
    /// If an error is returned, the connection is dead and the sender
    /// instance must be recreated.
    pub async fn step(&mut self) -> Result<Vec<Event>, ReadError> {
        self.try_fill_write();
        trace!(
            "stepping with {} bytes pending to write",
            self.write_buffer.len() - self.write_head
        );

        let write_pending = self.write_head < self.write_buffer.len();
        let (mut reader, mut writer) = self.stream.split();
        let sleep = sleep_until(self.next_ping);

        let res = tokio::select! {
            n = reader.read(&mut self.read_buffer[self.read_tail..]) => {
                match n {
                    Ok(n) => self.on_net_read(n),
                    Err(e) => Err(ReadError::Io(e)),
                }
            }
            n = writer.write(&self.write_buffer[self.write_head..]), if write_pending => {
                match n {
                    Ok(n) => {
                        self.on_net_write(n);
                        Ok(Vec::new())
                    }
                    Err(e) => Err(ReadError::Io(e)),
                }
            }
            _ = sleep => {
                self.on_ping_timeout();
                Ok(Vec::new())
            }
        };

        match res {
            Ok(ok) => Ok(ok),
            Err(err) => {
                self.on_error(&err);
                Err(err)
            }
        }
    }

    /// Serialize pending requests into the write buffer, unless a write is
    /// already in progress.
    fn try_fill_write(&mut self) {
        if self.write_head < self.write_buffer.len() {
            return;
        }
        self.write_buffer.clear();
        self.write_head = 0;

        let mut budget = MAXIMUM_PAYLOAD;
        for request in self
            .requests
            .iter_mut()
            .filter(|r| matches!(r.state, RequestState::NotSerialized))
        {
            if request.body.len() > budget {
                break;
            }
            budget -= request.body.len();

            let msg_id = self.mtp.push(request.body.clone());
            debug!("serialized request with {:?}", msg_id);
            // Only NotSerialized become Serialized here. Re-serializing an
            // already-sent request would cause an infinite loop of
            // transport floods.
            request.state = RequestState::Serialized(MsgIdPair::new(msg_id));
        }

        if let Some(payload) = self.mtp.finalize() {
            if let Some(container_msg_id) = self.mtp.last_container_msg_id() {
                for request in self.requests.iter_mut() {
                    if let RequestState::Serialized(ref mut pair) = request.state {
                        pair.container_msg_id = container_msg_id;
                    }
                }
            }
            self.transport.pack(&payload, &mut self.write_buffer);
        }
    }

    /// Handle `n` more read bytes being ready to process by the transport.
    fn on_net_read(&mut self, n: usize) -> Result<Vec<Event>, ReadError> {
        if n == 0 {
            return Err(ReadError::Io(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "read 0 bytes",
            )));
        }

        self.read_tail += n;
        trace!("read {} bytes from the network", n);

        let mut events = Vec::new();
        let mut next_offset = 0;
        let mut fatal = None;
        while next_offset != self.read_tail {
            match self
                .transport
                .unpack(&self.read_buffer[next_offset..self.read_tail])
            {
                Ok(offset) => {
                    self.mtp.process(
                        &self.read_buffer[next_offset..][offset.data_start..offset.data_end],
                    )?;
                    if let Some(f) = self.drain_mtp(&mut events) {
                        fatal = Some(f);
                    }
                    next_offset += offset.next_offset;
                }
                Err(transport::Error::MissingBytes) => break,
                Err(err) => return Err(err.into()),
            }
        }

        self.read_buffer.copy_within(next_offset..self.read_tail, 0);
        self.read_tail -= next_offset;

        if let Some(err) = fatal {
            return Err(err);
        }
        Ok(events)
    }

    /// Handle `n` more bytes having been written to the network.
    fn on_net_write(&mut self, n: usize) {
        self.write_head += n;
        trace!(
            "written {} bytes to the network ({}/{})",
            n,
            self.write_head,
            self.write_buffer.len()
        );
        assert!(self.write_head <= self.write_buffer.len());
        if self.write_head != self.write_buffer.len() {
            return;
        }

        for req in self.requests.iter_mut() {
            if let RequestState::Serialized(pair) = &req.state {
                debug!("sent request with {:?}", pair);
                req.state = RequestState::Sent(pair.clone());
            }
        }
    }

    /// Enqueue a new keepalive ping request.
    fn on_ping_timeout(&mut self) {
        let ping_id = generate_random_id();
        debug!("enqueueing keepalive ping {}", ping_id);
        drop(self.enqueue_body(
            telecraft_tl::functions::PingDelayDisconnect {
                ping_id,
                disconnect_delay: NO_PING_DISCONNECT,
            }
            .to_bytes(),
        ));
        self.next_ping = Instant::now() + PING_DELAY;
    }

    /// Fail every pending request; the connection is gone.
    fn on_error(&mut self, error: &ReadError) {
        warn!(
            "marking all {} request(s) as failed: {}",
            self.requests.len(),
            error
        );

        self.requests
            .drain(..)
            .for_each(|r| drop(r.result.send(Err(InvocationError::from(error.clone())))));
    }

    /// Drain everything the MTP sorted out of the last payload. Returns a
    /// fatal error to report once the read buffer has been consumed.
    fn drain_mtp(&mut self, events: &mut Vec<Event>) -> Option<ReadError> {
        let mut fatal = None;

        while let Some((msg_id, result)) = self.mtp.poll_response() {
            match result {
                Ok(body) => self.process_result(msg_id, body),
                Err(RequestError::Rpc(error)) => {
                    self.process_rpc_error(msg_id, error);
                }
                Err(RequestError::Dropped) => {
                    if let Some(req) = self.pop_request(msg_id) {
                        drop(req.result.send(Err(InvocationError::Dropped)));
                    }
                }
                Err(RequestError::BadMessage { code }) => {
                    if let Some(f) = self.process_bad_message(msg_id, code) {
                        fatal = Some(f);
                    }
                }
                Err(RequestError::Deserialize(error)) => {
                    if let Some(req) = self.pop_request(msg_id) {
                        drop(req.result.send(Err(error.into())));
                    } else {
                        info!("got deserialize failure {} for unknown request", error);
                    }
                }
            }
        }

        while let Some(update) = self.mtp.poll_update() {
            events.push(Event::Updates(update));
        }

        if self.mtp.take_gap_hint() {
            events.push(Event::PossibleGap);
        }

        fatal
    }

    fn process_result(&mut self, msg_id: MsgId, body: Vec<u8>) {
        if let Some(req) = self.pop_request(msg_id) {
            assert!(body.len() >= 4);
            let res_id = u32::from_le_bytes([body[0], body[1], body[2], body[3]]);
            debug!("got result {:08x} for request {:?}", res_id, msg_id);
            drop(req.result.send(Ok(body)));
        } else {
            info!("got rpc result for {:?} but no such request is saved", msg_id);
        }
    }

    fn process_rpc_error(&mut self, msg_id: MsgId, error: RpcError) {
        if let Some(req) = self.pop_request(msg_id) {
            debug!("got rpc error {} for request {:?}", error, msg_id);
            drop(req.result.send(Err(InvocationError::Rpc(error))));
        } else {
            info!("got rpc error {} but no such request is saved", error);
        }
    }

    /// Handle a bad-message notification for `msg_id` (which may be the
    /// identifier of a container). Retryable notifications re-enqueue the
    /// offending requests; anything else poisons the connection.
    fn process_bad_message(&mut self, msg_id: MsgId, code: i32) -> Option<ReadError> {
        let bad_msg = telecraft_mtproto::errors::BadMessage { code };
        let mut matched = false;

        for i in (0..self.requests.len()).rev() {
            match &self.requests[i].state {
                RequestState::Serialized(pair) if pair.matches(msg_id) => {
                    // A response for something that was never sent would
                    // mean the server knows identifiers we never put on
                    // the wire; treat the connection as broken.
                    error!("got bad msg for unsent request {:?}", pair);
                    return Some(ReadError::BadMessage { code });
                }
                RequestState::Sent(pair) if pair.matches(msg_id) => {
                    matched = true;
                    if bad_msg.retryable() {
                        info!(
                            "{}; re-sending request {:?}",
                            bad_msg.description(),
                            pair.msg_id
                        );
                        self.requests[i].state = RequestState::NotSerialized;
                    } else {
                        warn!(
                            "{}; cannot retry request {:?}",
                            bad_msg.description(),
                            pair.msg_id
                        );
                        let req = self.requests.swap_remove(i);
                        drop(req.result.send(Err(InvocationError::Dropped)));
                    }
                }
                _ => {}
            }
        }

        if !matched {
            info!(
                "got bad msg notification {:?} for unknown request (code {})",
                msg_id, code
            );
        }

        if bad_msg.fatal() {
            Some(ReadError::BadMessage { code })
        } else {
            None
        }
    }

    fn pop_request(&mut self, msg_id: MsgId) -> Option<Request> {
        for i in 0..self.requests.len() {
            match &self.requests[i].state {
                RequestState::Serialized(pair) if pair.msg_id == msg_id => {
                    warn!("got response {:?} for unsent request {:?}", msg_id, pair);
                    return None;
                }
                RequestState::Sent(pair) if pair.msg_id == msg_id => {
                    return Some(self.requests.swap_remove(i));
                }
                _ => {}
            }
        }

        None
    }
}

impl<T: Transport> Sender<T, mtp::Encrypted> {
    /// The authorization key in use, for session persistence.
    pub fn auth_key(&self) -> [u8; 256] {
        self.mtp.auth_key()
    }

    /// The current server salt, for session persistence.
    pub fn salt(&self) -> i64 {
        self.mtp.salt()
    }
}

/// Connect a plain sender and generate a fresh authorization key over it.
pub async fn connect<T: Transport>(
    transport: T,
    addr: ServerAddr,
) -> Result<Sender<T, mtp::Encrypted>, AuthorizationError> {
    let sender = Sender::connect(transport, mtp::Plain::new(), addr).await?;
    generate_auth_key(sender).await
}

/// Run the authorization key generation over a plain sender, upgrading it
/// to an encrypted sender that reuses the same connection and buffers.
pub async fn generate_auth_key<T: Transport>(
    mut sender: Sender<T, mtp::Plain>,
) -> Result<Sender<T, mtp::Encrypted>, AuthorizationError> {
    info!("generating new authorization key...");
    let (request, data) = auth::step1()?;
    debug!("gen auth key: sending step 1");
    let response = sender.send_raw(request).await?;
    debug!("gen auth key: sending step 2");
    let (request, data) = auth::step2(data, &response)?;
    let response = sender.send_raw(request).await?;
    debug!("gen auth key: sending step 3");
    let (request, data) = auth::step3(data, &response)?;
    let response = sender.send_raw(request).await?;
    debug!("gen auth key: completing generation");
    let auth::Finished {
        auth_key,
        time_offset,
        first_salt,
    } = auth::create_key(data, &response)?;
    info!("authorization key generated successfully");

    Ok(Sender {
        stream: sender.stream,
        transport: sender.transport,
        mtp: mtp::Encrypted::build()
            .time_offset(time_offset)
            .first_salt(first_salt)
            .finish(auth_key),
        addr: sender.addr,
        requests: sender.requests,
        next_ping: Instant::now() + PING_DELAY,
        read_buffer: sender.read_buffer,
        read_tail: sender.read_tail,
        write_buffer: sender.write_buffer,
        write_head: sender.write_head,
    })
}

/// Connect an encrypted sender reusing a previous authorization key.
pub async fn connect_with_auth<T: Transport>(
    transport: T,
    addr: ServerAddr,
    auth_key: [u8; 256],
    first_salt: i64,
) -> Result<Sender<T, mtp::Encrypted>, io::Error> {
    Sender::connect(
        transport,
        mtp::Encrypted::build().first_salt(first_salt).finish(auth_key),
        addr,
    )
    .await
}
