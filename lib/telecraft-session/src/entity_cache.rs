// Copyright 2025 - developers of the `telecraft` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The translation layer from opaque identifiers (usernames, phones,
//! numeric ids) into the `(id, access_hash)` pairs almost every request
//! requires. Fed from the users and chats lists of every response and
//! update that carries them.
use crate::peer::{normalize_phone, normalize_username, Peer};
use crate::storage;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::Path;
use telecraft_tl::{enums, types};

const CACHE_VERSION: u32 = 1;

/// The error when an input peer cannot be built because the access hash
/// for it was never seen. Recovered by priming the cache and retrying.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnknownAccessHash {
    pub peer: Peer,
}

impl fmt::Display for UnknownAccessHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown access hash for {}", self.peer)
    }
}

impl std::error::Error for UnknownAccessHash {}

/// In-memory cache of peer access hashes and name/phone indexes, with
/// JSON persistence.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityCache {
    self_id: Option<i64>,
    self_bot: bool,
    user_access_hash: HashMap<i64, i64>,
    channel_access_hash: HashMap<i64, i64>,
    username_to_peer: HashMap<String, Peer>,
    phone_to_user: HashMap<String, i64>,
}

impl EntityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The identifier of the logged-in account, once known.
    pub fn self_id(&self) -> Option<i64> {
        self.self_id
    }

    pub fn is_self_bot(&self) -> bool {
        self.self_bot
    }

    pub fn set_self_user(&mut self, id: i64, bot: bool) {
        self.self_id = Some(id);
        self.self_bot = bot;
    }

    /// Record every user in the list: access hash when present and
    /// non-zero, every username (including the multi-username vector), and
    /// the phone number.
    pub fn ingest_users(&mut self, users: &[enums::User]) {
        for user in users {
            let u = match user {
                enums::User::Empty(_) => continue,
                enums::User::User(u) => u,
            };
            // Hashes from min constructors are not valid for requests.
            if !u.min {
                if let Some(hash) = u.access_hash.filter(|&h| h != 0) {
                    self.user_access_hash.insert(u.id, hash);
                }
            }
            if u.is_self {
                self.set_self_user(u.id, u.bot);
            }
            if let Some(ref username) = u.username {
                self.username_to_peer
                    .insert(normalize_username(username), Peer::User(u.id));
            }
            for username in &u.usernames {
                self.username_to_peer
                    .insert(normalize_username(username), Peer::User(u.id));
            }
            if let Some(ref phone) = u.phone {
                self.phone_to_user.insert(normalize_phone(phone), u.id);
            }
        }
    }

    /// Record every chat in the list. Basic groups carry no hash and need
    /// none; channels are recorded like users.
    pub fn ingest_chats(&mut self, chats: &[enums::Chat]) {
        for chat in chats {
            match chat {
                enums::Chat::Chat(_) | enums::Chat::Forbidden(_) => {}
                enums::Chat::Channel(c) => {
                    if !c.min {
                        if let Some(hash) = c.access_hash.filter(|&h| h != 0) {
                            self.channel_access_hash.insert(c.id, hash);
                        }
                    }
                    if let Some(ref username) = c.username {
                        self.username_to_peer
                            .insert(normalize_username(username), Peer::Channel(c.id));
                    }
                    for username in &c.usernames {
                        self.username_to_peer
                            .insert(normalize_username(username), Peer::Channel(c.id));
                    }
                }
                enums::Chat::ChannelForbidden(c) => {
                    if c.access_hash != 0 {
                        self.channel_access_hash.insert(c.id, c.access_hash);
                    }
                }
            }
        }
    }

    /// Look up a peer previously seen under this username.
    pub fn peer_by_username(&self, username: &str) -> Option<Peer> {
        self.username_to_peer
            .get(&normalize_username(username))
            .copied()
    }

    /// Look up a user previously seen with this phone number.
    pub fn peer_by_phone(&self, phone: &str) -> Option<Peer> {
        self.phone_to_user
            .get(&normalize_phone(phone))
            .copied()
            .map(Peer::User)
    }

    /// Whether the hash needed to address this peer is known. Basic-group
    /// chats never need one.
    pub fn can_address(&self, peer: Peer) -> bool {
        match peer {
            Peer::User(id) => self.user_access_hash.contains_key(&id),
            Peer::Chat(_) => true,
            Peer::Channel(id) => self.channel_access_hash.contains_key(&id),
        }
    }

    /// Build the `InputPeer` for a resolved peer.
    pub fn input_peer(&self, peer: Peer) -> Result<enums::InputPeer, UnknownAccessHash> {
        Ok(match peer {
            Peer::User(user_id) => enums::InputPeer::User(types::InputPeerUser {
                user_id,
                access_hash: self.user_hash(user_id)?,
            }),
            Peer::Chat(chat_id) => enums::InputPeer::Chat(types::InputPeerChat { chat_id }),
            Peer::Channel(channel_id) => enums::InputPeer::Channel(types::InputPeerChannel {
                channel_id,
                access_hash: self.channel_hash(channel_id)?,
            }),
        })
    }

    /// Build the `InputUser` for a user id.
    pub fn input_user(&self, user_id: i64) -> Result<enums::InputUser, UnknownAccessHash> {
        Ok(enums::InputUser::User(types::InputUser {
            user_id,
            access_hash: self.user_hash(user_id)?,
        }))
    }

    /// Build the `InputChannel` for a channel id.
    pub fn input_channel(&self, channel_id: i64) -> Result<enums::InputChannel, UnknownAccessHash> {
        Ok(enums::InputChannel::Channel(types::InputChannel {
            channel_id,
            access_hash: self.channel_hash(channel_id)?,
        }))
    }

    fn user_hash(&self, id: i64) -> Result<i64, UnknownAccessHash> {
        self.user_access_hash
            .get(&id)
            .copied()
            .ok_or(UnknownAccessHash {
                peer: Peer::User(id),
            })
    }

    fn channel_hash(&self, id: i64) -> Result<i64, UnknownAccessHash> {
        self.channel_access_hash
            .get(&id)
            .copied()
            .ok_or(UnknownAccessHash {
                peer: Peer::Channel(id),
            })
    }

    // Persistence
    // ========================================

    /// Load the cache from `path`. A missing file, a corrupted file or an
    /// unknown version all yield an empty cache; a priming call rebuilds
    /// it.
    pub fn load(path: &Path) -> Self {
        let data = match storage::read_optional(path) {
            Ok(Some(data)) => data,
            _ => return Self::new(),
        };

        let record: CacheRecord = match serde_json::from_slice(&data) {
            Ok(record) => record,
            Err(e) => {
                debug!("resetting entity cache, cannot parse: {}", e);
                return Self::new();
            }
        };
        if record.version != CACHE_VERSION {
            debug!(
                "resetting entity cache with unknown version {}",
                record.version
            );
            return Self::new();
        }

        let mut cache = Self::new();
        cache.user_access_hash = record.user_access_hash;
        cache.channel_access_hash = record.channel_access_hash;
        cache.phone_to_user = record.phone_to_user_id;
        for (name, (kind, id)) in record.username_to_peer {
            if let Some(peer) = Peer::from_kind_name(&kind, id) {
                cache.username_to_peer.insert(name, peer);
            }
        }
        cache
    }

    /// Atomically persist the cache to `path`.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let record = CacheRecord {
            version: CACHE_VERSION,
            user_access_hash: self.user_access_hash.clone(),
            channel_access_hash: self.channel_access_hash.clone(),
            username_to_peer: self
                .username_to_peer
                .iter()
                .map(|(name, peer)| (name.clone(), (peer.kind_name().to_string(), peer.id())))
                .collect(),
            phone_to_user_id: self.phone_to_user.clone(),
        };

        let mut data = serde_json::to_vec_pretty(&record)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        data.push(b'\n');
        storage::write_atomic(path, &data)
    }
}

#[derive(Serialize, Deserialize)]
struct CacheRecord {
    version: u32,
    user_access_hash: HashMap<i64, i64>,
    channel_access_hash: HashMap<i64, i64>,
    username_to_peer: HashMap<String, (String, i64)>,
    phone_to_user_id: HashMap<String, i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> enums::User {
        enums::User::User(types::User {
            id: 42,
            access_hash: Some(0xdead),
            username: Some("Alice".into()),
            phone: Some("+123456".into()),
            ..Default::default()
        })
    }

    fn channel() -> enums::Chat {
        enums::Chat::Channel(types::Channel {
            id: 777,
            access_hash: Some(0xbeef),
            title: "News".into(),
            username: Some("SomeNews".into()),
            broadcast: true,
            ..Default::default()
        })
    }

    #[test]
    fn ingestion_is_idempotent() {
        let mut cache = EntityCache::new();
        cache.ingest_users(&[alice()]);
        cache.ingest_chats(&[channel()]);
        let snapshot = cache.clone();

        cache.ingest_users(&[alice()]);
        cache.ingest_chats(&[channel()]);
        assert_eq!(cache, snapshot);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut cache = EntityCache::new();
        cache.ingest_users(&[alice()]);

        assert_eq!(cache.peer_by_username("@ALICE"), Some(Peer::User(42)));
        assert_eq!(cache.peer_by_username("alice"), Some(Peer::User(42)));
        assert_eq!(cache.peer_by_phone("+1 2345-6"), Some(Peer::User(42)));
        assert_eq!(cache.peer_by_username("bob"), None);
    }

    #[test]
    fn input_peers_require_hashes() {
        let mut cache = EntityCache::new();
        cache.ingest_users(&[alice()]);
        cache.ingest_chats(&[channel()]);

        assert_eq!(
            cache.input_peer(Peer::User(42)).unwrap(),
            enums::InputPeer::User(types::InputPeerUser {
                user_id: 42,
                access_hash: 0xdead
            })
        );
        assert_eq!(
            cache.input_channel(777).unwrap(),
            enums::InputChannel::Channel(types::InputChannel {
                channel_id: 777,
                access_hash: 0xbeef
            })
        );
        // Basic groups need no hash at all.
        assert_eq!(
            cache.input_peer(Peer::Chat(10)).unwrap(),
            enums::InputPeer::Chat(types::InputPeerChat { chat_id: 10 })
        );
        assert_eq!(
            cache.input_peer(Peer::User(999)),
            Err(UnknownAccessHash {
                peer: Peer::User(999)
            })
        );
    }

    #[test]
    fn min_entities_do_not_store_hashes() {
        let mut cache = EntityCache::new();
        cache.ingest_users(&[enums::User::User(types::User {
            id: 5,
            access_hash: Some(1),
            min: true,
            ..Default::default()
        })]);
        assert!(!cache.can_address(Peer::User(5)));
    }

    #[test]
    fn zero_hashes_are_ignored() {
        let mut cache = EntityCache::new();
        cache.ingest_users(&[enums::User::User(types::User {
            id: 5,
            access_hash: Some(0),
            ..Default::default()
        })]);
        assert!(!cache.can_address(Peer::User(5)));
    }

    #[test]
    fn persistence_roundtrip() {
        let mut path = std::env::temp_dir();
        path.push(format!("telecraft-entities-{}.json", std::process::id()));

        let mut cache = EntityCache::new();
        cache.ingest_users(&[alice()]);
        cache.ingest_chats(&[channel()]);
        cache.save(&path).unwrap();

        let mut back = EntityCache::load(&path);
        // The self-user marker is not persisted.
        back.self_id = cache.self_id;
        back.self_bot = cache.self_bot;
        assert_eq!(back, cache);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn corrupted_file_resets_cleanly() {
        let mut path = std::env::temp_dir();
        path.push(format!("telecraft-entities-bad-{}.json", std::process::id()));
        std::fs::write(&path, b"{ not json").unwrap();

        assert_eq!(EntityCache::load(&path), EntityCache::new());
        std::fs::remove_file(&path).unwrap();
    }
}
