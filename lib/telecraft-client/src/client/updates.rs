// Copyright 2025 - developers of the `telecraft` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Consuming the reconciled update stream, and driving the difference
//! recovery whenever the message box detects a gap.
use super::net::{ConnectError, Step};
use super::Client;
use log::{debug, warn};
use telecraft_mtsender::{Event, InvocationError};
use telecraft_session::Applied;
use telecraft_tl::{enums, functions, Deserializable, Serializable};
use tokio::sync::oneshot;

/// One event from the reconciled update stream.
#[derive(Clone, Debug, PartialEq)]
pub enum Update {
    /// A message became visible.
    NewMessage(enums::Message),

    /// Any other update, already reconciled against the account state.
    Update(enums::Update),

    /// Users seen in the stream, already ingested into the entity cache.
    Users(Vec<enums::User>),

    /// Chats seen in the stream, already ingested into the entity cache.
    Chats(Vec<enums::Chat>),

    /// Continuity with the server was lost beyond recovery
    /// (`differenceTooLong`); caches assuming continuity must be purged.
    StateReset,
}

/// A difference request in flight.
pub(crate) struct PendingDifference {
    kind: DifferenceKind,
    rx: oneshot::Receiver<Result<Vec<u8>, InvocationError>>,
}

enum DifferenceKind {
    Account,
    Channel(functions::updates::GetChannelDifference),
}

impl Client {
    /// Bootstrap the updates engine (fetching the initial state if none
    /// is persisted) and begin buffering updates for
    /// [`Client::next_update`].
    pub async fn start_updates(&mut self) -> Result<(), InvocationError> {
        if self.message_box.is_empty() {
            let state = self.invoke(&functions::updates::GetState {}).await?;
            self.message_box.set_state(state);
        }
        self.updates_enabled = true;
        Ok(())
    }

    /// Stop buffering updates and drop anything not yet consumed. The
    /// engine state stays live (and persisted), so a later
    /// [`Client::start_updates`] resumes where it left off.
    pub fn stop_updates(&mut self) {
        self.updates_enabled = false;
        self.updates.clear();
        self.persist_all(true);
    }

    /// Return the next update event, stepping the network as needed.
    ///
    /// Returns `None` if a handle disconnects the client while waiting.
    pub async fn next_update(&mut self) -> Result<Option<Update>, ConnectError> {
        loop {
            if let Some(update) = self.updates.pop_front() {
                return Ok(Some(update));
            }
            match self.step().await? {
                Step::Connected => continue,
                Step::Disconnected => return Ok(None),
            }
        }
    }

    /// Feed everything one network step produced into the message box.
    pub(crate) fn on_events(&mut self, events: Vec<Event>) {
        for event in events {
            match event {
                Event::Updates(bytes) => match enums::Updates::from_bytes(&bytes) {
                    Ok(updates) => self.feed_updates(updates),
                    Err(e) => warn!("server sent updates that failed to parse: {}", e),
                },
                Event::PossibleGap => {
                    debug!("server hinted at lost updates; scheduling difference");
                    self.message_box.note_possible_gap();
                }
            }
        }
    }

    fn feed_updates(&mut self, updates: enums::Updates) {
        match self.message_box.process_updates(updates) {
            Ok(applied) => self.enqueue_applied(applied),
            Err(telecraft_session::Gap) => {
                // The difference is driven from the step loop.
            }
        }
    }

    /// Push the visible side-effects of an apply into the buffered queue,
    /// ingesting any peers on the way.
    pub(crate) fn enqueue_applied(&mut self, applied: Applied) {
        // The entity cache learns about peers regardless of whether the
        // caller consumes updates.
        self.entities.ingest_users(&applied.users);
        self.entities.ingest_chats(&applied.chats);

        if !self.updates_enabled {
            return;
        }

        if !applied.users.is_empty() {
            self.push_update(Update::Users(applied.users));
        }
        if !applied.chats.is_empty() {
            self.push_update(Update::Chats(applied.chats));
        }
        for message in applied.new_messages {
            self.push_update(Update::NewMessage(message));
        }
        for update in applied.updates {
            self.push_update(Update::Update(update));
        }
        if applied.state_reset {
            self.push_update(Update::StateReset);
        }
    }

    /// Push one event, discarding it when the queue is full. The engine
    /// state already advanced, so dropping here loses the notification
    /// but never corrupts the ordering.
    fn push_update(&mut self, update: Update) {
        if self.updates.len() >= super::UPDATE_QUEUE_LIMIT {
            warn!("update queue is full; dropping incoming update");
            return;
        }
        self.updates.push_back(update);
    }

    /// Issue or complete difference requests for the message box.
    pub(crate) fn drive_difference(&mut self) {
        // Complete an in-flight difference first.
        if let Some(mut pending) = self.difference.take() {
            match pending.rx.try_recv() {
                Ok(Ok(body)) => self.apply_difference_result(&pending.kind, &body),
                Ok(Err(e)) => {
                    warn!("difference request failed: {}; will retry", e);
                }
                Err(oneshot::error::TryRecvError::Empty) => {
                    self.difference = Some(pending);
                    return;
                }
                Err(oneshot::error::TryRecvError::Closed) => {
                    warn!("difference request dropped; will retry");
                }
            }
        }

        if self.difference.is_some() || !self.message_box.needs_difference() {
            return;
        }

        // Account-wide recovery has priority; channels follow.
        if let Some(request) = self.message_box.get_difference() {
            let rx = self.sender.enqueue_body(request.to_bytes());
            self.difference = Some(PendingDifference {
                kind: DifferenceKind::Account,
                rx,
            });
        } else if let Some(request) = self.message_box.get_channel_difference(&self.entities) {
            let rx = self.sender.enqueue_body(request.to_bytes());
            self.difference = Some(PendingDifference {
                kind: DifferenceKind::Channel(request),
                rx,
            });
        }
    }

    fn apply_difference_result(&mut self, kind: &DifferenceKind, body: &[u8]) {
        match kind {
            DifferenceKind::Account => match enums::updates::Difference::from_bytes(body) {
                Ok(difference) => {
                    let applied = self.message_box.apply_difference(difference);
                    self.enqueue_applied(applied);
                }
                Err(e) => warn!("failed to parse difference: {}", e),
            },
            DifferenceKind::Channel(request) => {
                match enums::updates::ChannelDifference::from_bytes(body) {
                    Ok(difference) => {
                        let applied = self.message_box.apply_channel_difference(request, difference);
                        self.enqueue_applied(applied);
                    }
                    Err(e) => warn!("failed to parse channel difference: {}", e),
                }
            }
        }
    }
}
