// Copyright 2025 - developers of the `telecraft` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Resolving peer references into addressable peers, and the helpers
//! built on top of that (priming the cache, sending messages).
use super::Client;
use std::fmt;
use telecraft_mtsender::{generate_random_id, InvocationError};
use telecraft_session::{Peer, PeerRef, UnknownAccessHash};
use telecraft_tl::{enums, functions, types};

/// The error type returned when a peer reference cannot be resolved.
#[derive(Debug)]
pub enum ResolveError {
    /// Neither the cache nor the server know the peer.
    PeerNotFound,

    /// The peer is known but its access hash is not, and priming did not
    /// recover it.
    UnknownAccessHash(UnknownAccessHash),

    Other(InvocationError),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PeerNotFound => write!(f, "resolve error: peer not found"),
            Self::UnknownAccessHash(e) => write!(f, "resolve error: {}", e),
            Self::Other(e) => write!(f, "resolve error: {}", e),
        }
    }
}

impl std::error::Error for ResolveError {}

impl From<InvocationError> for ResolveError {
    fn from(e: InvocationError) -> Self {
        Self::Other(e)
    }
}

impl Client {
    /// Resolve a peer reference into a concrete peer, asking the server
    /// when the cache cannot answer.
    pub async fn resolve(&mut self, peer_ref: &PeerRef) -> Result<Peer, ResolveError> {
        match peer_ref {
            PeerRef::Peer(peer) => Ok(*peer),
            PeerRef::Myself => match self.entities.self_id() {
                Some(id) => Ok(Peer::User(id)),
                None => {
                    let me = self.get_me().await?.ok_or(ResolveError::PeerNotFound)?;
                    Ok(Peer::User(me.id))
                }
            },
            PeerRef::Username(username) => {
                if let Some(peer) = self.entities.peer_by_username(username) {
                    return Ok(peer);
                }
                let resolved = self
                    .invoke(&functions::contacts::ResolveUsername {
                        username: username.clone(),
                    })
                    .await?;
                self.entities.ingest_users(&resolved.users);
                self.entities.ingest_chats(&resolved.chats);
                self.entities
                    .peer_by_username(username)
                    .ok_or(ResolveError::PeerNotFound)
            }
            PeerRef::Phone(phone) => {
                if let Some(peer) = self.entities.peer_by_phone(phone) {
                    return Ok(peer);
                }
                let resolved = self
                    .invoke(&functions::contacts::ResolvePhone {
                        phone: phone.clone(),
                    })
                    .await?;
                self.entities.ingest_users(&resolved.users);
                self.entities.ingest_chats(&resolved.chats);
                self.entities
                    .peer_by_phone(phone)
                    .ok_or(ResolveError::PeerNotFound)
            }
        }
    }

    /// Build the input peer for an already-resolved peer, priming the
    /// cache once when its access hash is missing.
    pub async fn input_peer(&mut self, peer: Peer) -> Result<enums::InputPeer, ResolveError> {
        match self.entities.input_peer(peer) {
            Ok(input) => Ok(input),
            Err(missing) => {
                self.prime_entities(100).await?;
                self.entities
                    .input_peer(peer)
                    .map_err(|_| ResolveError::UnknownAccessHash(missing))
            }
        }
    }

    /// Like [`Client::input_peer`], but producing an `InputUser`.
    pub async fn input_user(&mut self, user_id: i64) -> Result<enums::InputUser, ResolveError> {
        match self.entities.input_user(user_id) {
            Ok(input) => Ok(input),
            Err(missing) => {
                self.prime_entities(100).await?;
                self.entities
                    .input_user(user_id)
                    .map_err(|_| ResolveError::UnknownAccessHash(missing))
            }
        }
    }

    /// Like [`Client::input_peer`], but producing an `InputChannel`.
    pub async fn input_channel(
        &mut self,
        channel_id: i64,
    ) -> Result<enums::InputChannel, ResolveError> {
        match self.entities.input_channel(channel_id) {
            Ok(input) => Ok(input),
            Err(missing) => {
                self.prime_entities(100).await?;
                self.entities
                    .input_channel(channel_id)
                    .map_err(|_| ResolveError::UnknownAccessHash(missing))
            }
        }
    }

    /// Fetch a slice of dialogs purely to ingest the users and chats they
    /// reference. Short updates carry bare identifiers without hashes, so
    /// replying to them after a restart needs this.
    pub async fn prime_entities(&mut self, limit: i32) -> Result<(), InvocationError> {
        let dialogs = self
            .invoke(&functions::messages::GetDialogs {
                exclude_pinned: false,
                folder_id: None,
                offset_date: 0,
                offset_id: 0,
                offset_peer: enums::InputPeer::Empty,
                limit,
                hash: 0,
            })
            .await?;

        let (dialogs, users, chats) = match dialogs {
            enums::messages::Dialogs::Dialogs(d) => (d.dialogs, d.users, d.chats),
            enums::messages::Dialogs::Slice(d) => (d.dialogs, d.users, d.chats),
            enums::messages::Dialogs::NotModified { .. } => return Ok(()),
        };

        self.entities.ingest_users(&users);
        self.entities.ingest_chats(&chats);

        // Dialogs carry the channels' pts; seed the message box with them
        // so the first update does not look like a gap.
        for dialog in dialogs {
            if let (enums::Peer::Channel(c), Some(pts)) = (&dialog.peer, dialog.pts) {
                self.message_box.try_set_channel_state(c.channel_id, pts);
            }
        }

        self.persist_all(true);
        Ok(())
    }

    /// Fetch the logged-in user, ingesting it into the cache.
    pub async fn get_me(&mut self) -> Result<Option<types::User>, InvocationError> {
        let users = self
            .invoke(&functions::users::GetUsers {
                id: vec![enums::InputUser::UserSelf],
            })
            .await?;

        Ok(users.into_iter().find_map(|user| match user {
            enums::User::User(u) => {
                self.entities.set_self_user(u.id, u.bot);
                self.entities
                    .ingest_users(&[enums::User::User(u.clone())]);
                Some(u)
            }
            enums::User::Empty(_) => None,
        }))
    }

    /// Send a text message to whatever the reference resolves to.
    pub async fn send_message(
        &mut self,
        peer_ref: &PeerRef,
        text: &str,
    ) -> Result<(), ResolveError> {
        let input = match peer_ref {
            PeerRef::Myself => enums::InputPeer::PeerSelf,
            other => {
                let peer = self.resolve(other).await?;
                self.input_peer(peer).await?
            }
        };

        let updates = self
            .invoke(&functions::messages::SendMessage {
                no_webpage: false,
                silent: false,
                background: false,
                clear_draft: false,
                peer: input,
                reply_to_msg_id: None,
                message: text.to_string(),
                random_id: generate_random_id(),
            })
            .await?;

        // The reply is itself an updates object; feed it like any other
        // so the sent message cannot come back later as a gap.
        self.feed_own_updates(updates);
        Ok(())
    }

    pub(crate) fn feed_own_updates(&mut self, updates: enums::Updates) {
        match self.message_box.process_updates(updates) {
            Ok(applied) => self.enqueue_applied(applied),
            Err(telecraft_session::Gap) => {}
        }
    }
}
