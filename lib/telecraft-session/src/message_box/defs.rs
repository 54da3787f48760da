// Copyright 2025 - developers of the `telecraft` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use crate::storage;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};
use telecraft_tl::enums;

/// Telegram sends `seq` equal to `0` when "it doesn't matter", so the
/// same value is used as the sentinel locally.
pub(super) const NO_SEQ: i32 = 0;

/// Updates with a `pts` (or `qts`) of `0` must not participate in the
/// ordering; treating them as ordered leads to spurious gap recovery.
pub(super) const NO_PTS: i32 = 0;

/// Sentinel date for synthetic update containers.
pub(super) const NO_DATE: i32 = 0;

/// > It may be useful to wait up to 0.5 seconds
///
/// before concluding a gap is real, since the missing updates often arrive
/// out of order moments later.
pub(super) const POSSIBLE_GAP_TIMEOUT: Duration = Duration::from_millis(500);

/// How many messages to fetch per channel-difference request.
pub(super) const USER_CHANNEL_DIFF_LIMIT: i32 = 100;
pub(super) const BOT_CHANNEL_DIFF_LIMIT: i32 = 100_000;

const STATE_VERSION: u32 = 1;

/// Each update stream the account observes has its own [`Entry`] with an
/// independent persistent timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Entry {
    /// The account-wide `pts`: private conversations and small groups.
    AccountWide,
    /// The account-wide `qts`: secret chats and certain bot updates.
    SecretChats,
    /// A channel-specific `pts`.
    Channel(i64),
}

/// An update buffered because its `pts` implies updates before it that
/// have not arrived yet.
#[derive(Debug)]
pub(super) struct PossibleGap {
    pub(super) deadline: Instant,
    /// Pending updates with a larger pts, waiting for the gap to resolve.
    pub(super) updates: Vec<enums::Update>,
}

/// Reconciles every update the server sends into a totally-ordered stream,
/// requesting the difference whenever a gap proves real.
#[derive(Debug)]
pub struct MessageBox {
    /// The per-entry persistent timestamps.
    pub(super) map: HashMap<Entry, i32>,

    pub(super) date: i32,
    pub(super) seq: i32,

    /// Entries with out-of-order updates buffered, waiting briefly for the
    /// missing ones before difference recovery kicks in.
    pub(super) possible_gaps: HashMap<Entry, PossibleGap>,

    /// Entries for which a difference request should be (or is being)
    /// made.
    pub(super) getting_diff_for: HashSet<Entry>,
}

/// Marker returned when an update cannot be applied until the difference
/// fills in what came before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gap;

/// The observable side-effects of feeding the message box.
#[derive(Debug, Default, PartialEq)]
pub struct Applied {
    /// Messages that became visible, in server order.
    pub new_messages: Vec<enums::Message>,

    /// Updates other than new messages, in server order.
    pub updates: Vec<enums::Update>,

    /// Users seen along the way, for the entity cache.
    pub users: Vec<enums::User>,

    /// Chats seen along the way, for the entity cache.
    pub chats: Vec<enums::Chat>,

    /// Set when the server declared the local state too old to catch up
    /// (`differenceTooLong`); caches assuming continuity must be purged.
    pub state_reset: bool,
}

impl Applied {
    pub fn is_empty(&self) -> bool {
        self.new_messages.is_empty()
            && self.updates.is_empty()
            && self.users.is_empty()
            && self.chats.is_empty()
            && !self.state_reset
    }
}

/// The ordering information of a single update.
#[derive(Debug, Clone, Copy)]
pub(super) struct PtsInfo {
    pub(super) entry: Entry,
    pub(super) pts: i32,
    pub(super) pts_count: i32,
}

/// The persisted form of the update state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdatesState {
    pub pts: i32,
    pub qts: i32,
    pub date: i32,
    pub seq: i32,
    pub channels: HashMap<i64, i32>,
}

#[derive(Serialize, Deserialize)]
struct StateRecord {
    version: u32,
    #[serde(flatten)]
    state: UpdatesState,
}

impl UpdatesState {
    /// Load the state from `path`. A missing, corrupted or
    /// unknown-version file yields `None`; the caller then bootstraps via
    /// `updates.getState`.
    pub fn load(path: &Path) -> Option<Self> {
        let data = storage::read_optional(path).ok()??;
        let record: StateRecord = match serde_json::from_slice(&data) {
            Ok(record) => record,
            Err(e) => {
                debug!("resetting updates state, cannot parse: {}", e);
                return None;
            }
        };
        if record.version != STATE_VERSION {
            debug!(
                "resetting updates state with unknown version {}",
                record.version
            );
            return None;
        }
        Some(record.state)
    }

    /// Atomically persist the state to `path`.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let record = StateRecord {
            version: STATE_VERSION,
            state: self.clone(),
        };
        let mut data = serde_json::to_vec_pretty(&record)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        data.push(b'\n');
        storage::write_atomic(path, &data)
    }
}
