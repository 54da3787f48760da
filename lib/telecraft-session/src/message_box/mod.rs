// Copyright 2025 - developers of the `telecraft` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Correct handling of updates: applying them in order, detecting gaps in
//! the `pts`/`qts`/`seq` sequences, and driving difference recovery when a
//! gap proves real.
//!
//! Each update stream has its own [`Entry`]. An entry may be on its happy
//! path, have a possible gap buffered (out-of-order updates waiting up to
//! half a second for the missing ones), or be marked for getting the
//! difference. Possible gaps clear either because the missing updates
//! arrive, or because the difference is fetched.
mod defs;
#[cfg(test)]
mod tests;

pub(crate) use defs::Entry;
use defs::{PossibleGap, PtsInfo, BOT_CHANNEL_DIFF_LIMIT, USER_CHANNEL_DIFF_LIMIT};
use defs::{NO_DATE, NO_PTS, NO_SEQ, POSSIBLE_GAP_TIMEOUT};
pub use defs::{Applied, Gap, MessageBox, UpdatesState};

use crate::entity_cache::EntityCache;
use log::{debug, info, trace, warn};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use telecraft_tl::{enums, functions, types};

/// Creation, querying, and setting base state.
#[allow(clippy::new_without_default)]
impl MessageBox {
    /// Create a new, empty message box. [`MessageBox::set_state`] should
    /// be called with the result of `updates.getState` soon after, or the
    /// first difference request would fetch the account's whole history.
    pub fn new() -> Self {
        trace!("created new message box with no previous state");
        Self {
            map: HashMap::new(),
            date: 1, // non-zero or getting difference will fail
            seq: NO_SEQ,
            possible_gaps: HashMap::new(),
            getting_diff_for: HashSet::new(),
        }
    }

    /// Create a message box from a previously persisted state.
    pub fn load(state: UpdatesState) -> Self {
        trace!("created new message box with state: {:?}", state);
        let mut map = HashMap::with_capacity(2 + state.channels.len());
        map.insert(Entry::AccountWide, state.pts);
        map.insert(Entry::SecretChats, state.qts);
        map.extend(
            state
                .channels
                .iter()
                .map(|(&id, &pts)| (Entry::Channel(id), pts)),
        );

        Self {
            map,
            date: state.date,
            seq: state.seq,
            possible_gaps: HashMap::new(),
            getting_diff_for: HashSet::new(),
        }
    }

    /// Return the current state in the form used for persistence.
    pub fn session_state(&self) -> UpdatesState {
        UpdatesState {
            pts: self.map.get(&Entry::AccountWide).copied().unwrap_or(NO_PTS),
            qts: self.map.get(&Entry::SecretChats).copied().unwrap_or(NO_PTS),
            date: self.date,
            seq: self.seq,
            channels: self
                .map
                .iter()
                .filter_map(|(entry, &pts)| match entry {
                    Entry::Channel(id) => Some((*id, pts)),
                    _ => None,
                })
                .collect(),
        }
    }

    /// Return true if the message box has no state yet.
    pub fn is_empty(&self) -> bool {
        self.map.get(&Entry::AccountWide).copied().unwrap_or(NO_PTS) == NO_PTS
    }

    /// Sets the update state from the server's `updates.getState`.
    pub fn set_state(&mut self, state: types::updates::State) {
        trace!("setting state {:?}", state);
        self.map.insert(Entry::AccountWide, state.pts);
        self.map.insert(Entry::SecretChats, state.qts);
        self.date = state.date;
        self.seq = state.seq;
    }

    /// Like [`MessageBox::set_state`], but for channels; only takes effect
    /// when the channel had no known state. Useful when loading dialogs.
    pub fn try_set_channel_state(&mut self, id: i64, pts: i32) {
        trace!("trying to set channel state for {}: {}", id, pts);
        self.map.entry(Entry::Channel(id)).or_insert(pts);
    }

    /// Whether any entry is waiting for a difference request.
    pub fn needs_difference(&self) -> bool {
        !self.getting_diff_for.is_empty()
    }

    /// Promote possible gaps whose waiting period expired into entries
    /// that get their difference. Call periodically.
    pub fn check_deadlines(&mut self) {
        let now = Instant::now();
        let expired: Vec<Entry> = self
            .possible_gaps
            .iter()
            .filter(|(_, gap)| now >= gap.deadline)
            .map(|(&entry, _)| entry)
            .collect();

        for entry in expired {
            info!("gap was not resolved after waiting for {:?}", entry);
            self.try_begin_get_diff(entry);
        }
    }

    /// Mark an external hint (such as a reconnection or a new session
    /// notification from the server) that account-wide updates may have
    /// been lost.
    pub fn note_possible_gap(&mut self) {
        self.try_begin_get_diff(Entry::AccountWide);
    }

    /// Try to begin getting difference for the given entry. Does nothing
    /// when there is no known state to get the difference from.
    ///
    /// Clears any buffered possible gap for the entry.
    fn try_begin_get_diff(&mut self, entry: Entry) {
        if !self.map.contains_key(&entry) {
            // Without a known pts there is nothing to resume from; the
            // entry will bootstrap from the first update that mentions it.
            self.possible_gaps.remove(&entry);
            return;
        }

        self.getting_diff_for.insert(entry);
        self.possible_gaps.remove(&entry);
    }

    /// Finish getting difference for the given entry.
    fn end_get_diff(&mut self, entry: Entry) {
        if !self.getting_diff_for.remove(&entry) {
            debug!("ended get diff for {:?} which was not in progress", entry);
        }
        debug_assert!(
            !self.possible_gaps.contains_key(&entry),
            "gaps should not be created while getting difference"
        );
    }
}

/// Normal updates flow: processing and detection of gaps.
impl MessageBox {
    /// Process an update container and return what became visible.
    ///
    /// Updates for entries currently getting their difference are skipped;
    /// the difference result will carry them.
    pub fn process_updates(&mut self, updates: enums::Updates) -> Result<Applied, Gap> {
        trace!("processing updates: {:?}", updates);
        let combined = match adapt(updates) {
            AdaptResult::Combined(combined) => combined,
            AdaptResult::TooLong => {
                self.try_begin_get_diff(Entry::AccountWide);
                return Err(Gap);
            }
            AdaptResult::Unknown { constructor_id } => {
                debug!("dropping updates with unknown constructor {:08x}", constructor_id);
                return Ok(Applied::default());
            }
        };

        let types::UpdatesCombined {
            date,
            seq_start,
            seq,
            mut updates,
            users,
            chats,
        } = combined;

        // > For all the other [not `updates` or `updatesCombined`]
        // > constructors there is no need to check `seq` or change state.
        if seq_start != NO_SEQ {
            match (self.seq + 1).cmp(&seq_start) {
                // Apply
                Ordering::Equal => {}
                // Ignore
                Ordering::Greater => {
                    debug!(
                        "skipping updates that were already handled at seq = {}",
                        self.seq
                    );
                    return Ok(Applied {
                        users,
                        chats,
                        ..Applied::default()
                    });
                }
                Ordering::Less => {
                    debug!(
                        "gap detected (local seq {}, remote seq {})",
                        self.seq, seq_start
                    );
                    self.try_begin_get_diff(Entry::AccountWide);
                    return Err(Gap);
                }
            }
        }

        // The server can emit updates out of order (such as a read-inbox
        // and a new-message with the same pts but counts 0 and 1), so sort
        // before applying.
        updates.sort_by_key(update_sort_key);

        let mut result = Vec::with_capacity(updates.len() + self.possible_gaps.len());
        let mut any_pts_applied = false;
        for update in updates {
            let (entry, update) = self.apply_pts_info(update);
            if let Some(update) = update {
                result.push(update);
                any_pts_applied |= entry.is_some();
            }
        }

        // > If the updates were applied, local Updates state must be
        // > updated with `seq` (unless it's 0) and `date`.
        //
        // Updates which apply in any order must not bump `seq`, or
        // strictly-sequenced containers in between could be missed.
        if any_pts_applied {
            if date != NO_DATE {
                self.date = date;
            }
            if seq != NO_SEQ {
                self.seq = seq;
            }
        }

        // See whether buffered out-of-order updates can be applied now.
        if !self.possible_gaps.is_empty() {
            let keys: Vec<Entry> = self.possible_gaps.keys().copied().collect();
            for key in keys {
                let mut pending =
                    std::mem::take(&mut self.possible_gaps.get_mut(&key).unwrap().updates);
                pending.sort_by_key(update_sort_key);

                for update in pending {
                    // Updates that still do not apply are re-buffered, in
                    // the same order they had.
                    if let (_, Some(update)) = self.apply_pts_info(update) {
                        result.push(update);
                    }
                }
            }

            self.possible_gaps.retain(|_, gap| !gap.updates.is_empty());
            if self.possible_gaps.is_empty() {
                debug!("successfully resolved gap by waiting");
            }
        }

        Ok(split_applied(result, users, chats))
    }

    /// Apply a single update if its ordering information allows it now.
    ///
    /// Returns the entry it belongs to (if any) and the update itself when
    /// it was applied. Out-of-order updates are buffered as a possible gap
    /// instead.
    fn apply_pts_info(
        &mut self,
        update: enums::Update,
    ) -> (Option<Entry>, Option<enums::Update>) {
        if let enums::Update::ChannelTooLong(ref u) = update {
            self.try_begin_get_diff(Entry::Channel(u.channel_id));
            return (None, None);
        }

        let pts = match PtsInfo::from_update(&update) {
            Some(pts) => pts,
            // Updates without ordering information apply immediately.
            None => return (None, Some(update)),
        };

        if self.getting_diff_for.contains(&pts.entry) {
            debug!(
                "skipping update for {:?} (getting difference, count {:?}, remote {:?})",
                pts.entry, pts.pts_count, pts.pts
            );
            // The difference result will contain this update.
            return (Some(pts.entry), None);
        }

        if let Some(&local_pts) = self.map.get(&pts.entry) {
            match (local_pts + pts.pts_count).cmp(&pts.pts) {
                // Apply
                Ordering::Equal => {}
                // Ignore
                Ordering::Greater => {
                    debug!(
                        "skipping update for {:?} (local {:?}, count {:?}, remote {:?})",
                        pts.entry, local_pts, pts.pts_count, pts.pts
                    );
                    return (Some(pts.entry), None);
                }
                Ordering::Less => {
                    info!(
                        "gap on update for {:?} (local {:?}, count {:?}, remote {:?})",
                        pts.entry, local_pts, pts.pts_count, pts.pts
                    );
                    self.possible_gaps
                        .entry(pts.entry)
                        .or_insert_with(|| PossibleGap {
                            deadline: Instant::now() + POSSIBLE_GAP_TIMEOUT,
                            updates: Vec::new(),
                        })
                        .updates
                        .push(update);

                    return (Some(pts.entry), None);
                }
            }
        }
        // With no previous pts known this update is the first one, so the
        // local state becomes `pts - pts_count` and it applies cleanly.

        self.map.insert(pts.entry, pts.pts);

        (Some(pts.entry), Some(update))
    }
}

/// Getting and applying the account-wide difference.
impl MessageBox {
    /// The request to make to recover the account-wide streams, if they
    /// need recovering.
    pub fn get_difference(&self) -> Option<functions::updates::GetDifference> {
        for entry in [Entry::AccountWide, Entry::SecretChats] {
            if self.getting_diff_for.contains(&entry) {
                let gd = functions::updates::GetDifference {
                    pts: self.map.get(&Entry::AccountWide).copied().unwrap_or(NO_PTS),
                    pts_limit: None,
                    pts_total_limit: None,
                    date: self.date,
                    qts: self.map.get(&Entry::SecretChats).copied().unwrap_or(NO_PTS),
                    qts_limit: None,
                };
                trace!("requesting {:?}", gd);
                return Some(gd);
            }
        }
        None
    }

    /// Like [`MessageBox::process_updates`], but over a difference result.
    pub fn apply_difference(&mut self, difference: enums::updates::Difference) -> Applied {
        trace!("applying account difference: {:?}", difference);
        match difference {
            enums::updates::Difference::Empty(diff) => {
                debug!(
                    "handling empty difference (date = {}, seq = {}); no longer getting diff",
                    diff.date, diff.seq
                );
                self.date = diff.date;
                self.seq = diff.seq;
                self.finish_get_diff();
                Applied::default()
            }
            enums::updates::Difference::Difference(diff) => {
                debug!(
                    "handling full difference {:?}; no longer getting diff",
                    diff.state
                );
                let applied = self.apply_difference_type(diff);
                self.finish_get_diff();
                applied
            }
            enums::updates::Difference::Slice(types::updates::DifferenceSlice {
                new_messages,
                new_encrypted_messages,
                other_updates,
                chats,
                users,
                intermediate_state: state,
            }) => {
                debug!("handling partial difference {:?}", state);
                self.apply_difference_type(types::updates::Difference {
                    new_messages,
                    new_encrypted_messages,
                    other_updates,
                    chats,
                    users,
                    state,
                })
            }
            enums::updates::Difference::TooLong(diff) => {
                info!(
                    "handling too-long difference (pts = {}); resetting state",
                    diff.pts
                );
                self.map.insert(Entry::AccountWide, diff.pts);
                self.finish_get_diff();
                Applied {
                    state_reset: true,
                    ..Applied::default()
                }
            }
        }
    }

    fn finish_get_diff(&mut self) {
        for entry in [Entry::AccountWide, Entry::SecretChats] {
            if self.getting_diff_for.contains(&entry) {
                self.end_get_diff(entry);
            }
        }
    }

    fn apply_difference_type(&mut self, diff: types::updates::Difference) -> Applied {
        let types::updates::Difference {
            new_messages,
            new_encrypted_messages,
            other_updates: updates,
            chats,
            users,
            state,
        } = diff;

        self.map.insert(Entry::AccountWide, state.pts);
        self.map.insert(Entry::SecretChats, state.qts);
        self.date = state.date;
        self.seq = state.seq;

        // The other updates can include things like `updateNewChannelMessage`
        // or `updateChannelTooLong`; process them like socket updates to
        // discard anything already handled.
        let synthetic = enums::Updates::Updates(types::Updates {
            updates,
            users,
            chats,
            date: NO_DATE,
            seq: NO_SEQ,
        });

        let mut applied = self
            .process_updates(synthetic)
            .expect("gap detected while applying difference");

        applied.new_messages.extend(new_messages);
        applied
            .updates
            .extend(new_encrypted_messages.into_iter().map(|message| {
                enums::Update::NewEncryptedMessage(types::UpdateNewEncryptedMessage {
                    message,
                    qts: NO_PTS,
                })
            }));

        applied
    }
}

/// Getting and applying a channel's difference.
impl MessageBox {
    /// The request to make to recover a channel's stream, if any channel
    /// needs recovering. Requires the channel's hash to be cached;
    /// otherwise the channel's state is forgotten so the next update for
    /// it can bootstrap the entry again.
    pub fn get_channel_difference(
        &mut self,
        entities: &EntityCache,
    ) -> Option<functions::updates::GetChannelDifference> {
        let (entry, id) = self.getting_diff_for.iter().find_map(|&entry| match entry {
            Entry::Channel(id) => Some((entry, id)),
            _ => None,
        })?;

        let channel = match entities.input_channel(id) {
            Ok(channel) => channel,
            Err(_) => {
                warn!(
                    "cannot getChannelDifference for {} as we're missing its hash",
                    id
                );
                self.end_get_diff(entry);
                self.map.remove(&entry);
                return None;
            }
        };

        let gd = functions::updates::GetChannelDifference {
            force: false,
            channel,
            filter: enums::ChannelMessagesFilter::Empty,
            pts: self.map.get(&entry).copied().unwrap_or(NO_PTS),
            limit: if entities.is_self_bot() {
                BOT_CHANNEL_DIFF_LIMIT
            } else {
                USER_CHANNEL_DIFF_LIMIT
            },
        };
        trace!("requesting {:?}", gd);
        Some(gd)
    }

    /// Like [`MessageBox::process_updates`], but over a channel
    /// difference result.
    pub fn apply_channel_difference(
        &mut self,
        request: &functions::updates::GetChannelDifference,
        difference: enums::updates::ChannelDifference,
    ) -> Applied {
        let channel_id = match channel_id_of(request) {
            Some(id) => id,
            None => {
                warn!("ignoring channel difference for empty input channel");
                return Applied::default();
            }
        };
        trace!(
            "applying channel difference for {}: {:?}",
            channel_id,
            difference
        );
        let entry = Entry::Channel(channel_id);
        self.possible_gaps.remove(&entry);

        match difference {
            enums::updates::ChannelDifference::Empty(diff) => {
                debug!(
                    "handling empty channel {} difference (pts = {}); no longer getting diff",
                    channel_id, diff.pts
                );
                self.end_get_diff(entry);
                self.map.insert(entry, diff.pts);
                Applied::default()
            }
            enums::updates::ChannelDifference::TooLong(diff) => {
                info!(
                    "handling too-long channel {} difference; no longer getting diff",
                    channel_id
                );
                match diff.dialog.pts {
                    Some(pts) => {
                        self.map.insert(entry, pts);
                    }
                    None => {
                        warn!("too-long channel difference without pts; dropping entry");
                        self.map.remove(&entry);
                    }
                }
                self.end_get_diff(entry);
                // This difference carries only the latest messages, not
                // the full catch-up the caller expects; signal the reset
                // instead of delivering a partial view.
                Applied {
                    users: diff.users,
                    chats: diff.chats,
                    state_reset: true,
                    ..Applied::default()
                }
            }
            enums::updates::ChannelDifference::Difference(types::updates::ChannelDifference {
                r#final,
                pts,
                timeout: _,
                new_messages,
                other_updates: updates,
                chats,
                users,
            }) => {
                if r#final {
                    debug!(
                        "handling channel {} difference; no longer getting diff",
                        channel_id
                    );
                    self.end_get_diff(entry);
                } else {
                    debug!("handling channel {} difference", channel_id);
                }

                self.map.insert(entry, pts);
                let synthetic = enums::Updates::Updates(types::Updates {
                    updates,
                    users,
                    chats,
                    date: NO_DATE,
                    seq: NO_SEQ,
                });
                let mut applied = self
                    .process_updates(synthetic)
                    .expect("gap detected while applying channel difference");
                applied.new_messages.extend(new_messages);
                applied
            }
        }
    }
}

/// The channel a difference request refers to.
pub(crate) fn channel_id_of(request: &functions::updates::GetChannelDifference) -> Option<i64> {
    match request.channel {
        enums::InputChannel::Channel(ref c) => Some(c.channel_id),
        enums::InputChannel::Empty => None,
    }
}

fn update_sort_key(update: &enums::Update) -> i32 {
    match PtsInfo::from_update(update) {
        Some(pts) => pts.pts - pts.pts_count,
        None => NO_PTS,
    }
}

/// Separate message-bearing updates from the rest, preserving order.
fn split_applied(
    updates: Vec<enums::Update>,
    users: Vec<enums::User>,
    chats: Vec<enums::Chat>,
) -> Applied {
    let mut applied = Applied {
        users,
        chats,
        ..Applied::default()
    };
    for update in updates {
        match update {
            enums::Update::NewMessage(u) => applied.new_messages.push(u.message),
            enums::Update::NewChannelMessage(u) => applied.new_messages.push(u.message),
            other => applied.updates.push(other),
        }
    }
    applied
}

/// The result of normalizing the `Updates` variants into the combined
/// form all share.
enum AdaptResult {
    Combined(types::UpdatesCombined),
    TooLong,
    Unknown { constructor_id: u32 },
}

/// Normalize all `Updates` variants into `updatesCombined`, synthesizing
/// messages for the short forms.
fn adapt(updates: enums::Updates) -> AdaptResult {
    use AdaptResult::Combined;

    match updates {
        enums::Updates::TooLong => AdaptResult::TooLong,
        enums::Updates::ShortMessage(short) => {
            let message = types::Message {
                out: short.out,
                id: short.id,
                from_id: if short.out {
                    None
                } else {
                    Some(enums::Peer::User(types::PeerUser {
                        user_id: short.user_id,
                    }))
                },
                peer_id: enums::Peer::User(types::PeerUser {
                    user_id: short.user_id,
                }),
                date: short.date,
                message: short.message,
            };
            Combined(single_update(
                enums::Update::NewMessage(types::UpdateNewMessage {
                    message: enums::Message::Message(message),
                    pts: short.pts,
                    pts_count: short.pts_count,
                }),
                short.date,
            ))
        }
        enums::Updates::ShortChatMessage(short) => {
            let message = types::Message {
                out: short.out,
                id: short.id,
                from_id: Some(enums::Peer::User(types::PeerUser {
                    user_id: short.from_id,
                })),
                peer_id: enums::Peer::Chat(types::PeerChat {
                    chat_id: short.chat_id,
                }),
                date: short.date,
                message: short.message,
            };
            Combined(single_update(
                enums::Update::NewMessage(types::UpdateNewMessage {
                    message: enums::Message::Message(message),
                    pts: short.pts,
                    pts_count: short.pts_count,
                }),
                short.date,
            ))
        }
        enums::Updates::Short(short) => Combined(single_update(short.update, short.date)),
        enums::Updates::Combined(combined) => Combined(combined),
        enums::Updates::Updates(updates) => Combined(types::UpdatesCombined {
            updates: updates.updates,
            users: updates.users,
            chats: updates.chats,
            date: updates.date,
            seq_start: updates.seq,
            seq: updates.seq,
        }),
        enums::Updates::ShortSentMessage(short) => {
            // There is not enough information to build the full message;
            // an empty placeholder advances the pts and keeps message ids
            // deduplicated.
            Combined(single_update(
                enums::Update::NewMessage(types::UpdateNewMessage {
                    message: enums::Message::Empty(types::MessageEmpty {
                        id: short.id,
                        peer_id: None,
                    }),
                    pts: short.pts,
                    pts_count: short.pts_count,
                }),
                short.date,
            ))
        }
        enums::Updates::Unknown {
            constructor_id,
            body: _,
        } => AdaptResult::Unknown { constructor_id },
    }
}

fn single_update(update: enums::Update, date: i32) -> types::UpdatesCombined {
    types::UpdatesCombined {
        updates: vec![update],
        users: Vec::new(),
        chats: Vec::new(),
        date,
        seq_start: NO_SEQ,
        seq: NO_SEQ,
    }
}

impl PtsInfo {
    /// Extract the ordering information of an update, if it has any.
    pub(super) fn from_update(update: &enums::Update) -> Option<Self> {
        let info = match update {
            enums::Update::NewMessage(u) => Self {
                entry: Entry::AccountWide,
                pts: u.pts,
                pts_count: u.pts_count,
            },
            enums::Update::DeleteMessages(u) => Self {
                entry: Entry::AccountWide,
                pts: u.pts,
                pts_count: u.pts_count,
            },
            enums::Update::ReadHistoryInbox(u) => Self {
                entry: Entry::AccountWide,
                pts: u.pts,
                pts_count: u.pts_count,
            },
            enums::Update::ReadHistoryOutbox(u) => Self {
                entry: Entry::AccountWide,
                pts: u.pts,
                pts_count: u.pts_count,
            },
            enums::Update::EditMessage(u) => Self {
                entry: Entry::AccountWide,
                pts: u.pts,
                pts_count: u.pts_count,
            },
            enums::Update::NewEncryptedMessage(u) => Self {
                entry: Entry::SecretChats,
                pts: u.qts,
                pts_count: 1,
            },
            enums::Update::NewChannelMessage(u) => Self {
                entry: Entry::Channel(message_channel_id(&u.message)?),
                pts: u.pts,
                pts_count: u.pts_count,
            },
            enums::Update::EditChannelMessage(u) => Self {
                entry: Entry::Channel(message_channel_id(&u.message)?),
                pts: u.pts,
                pts_count: u.pts_count,
            },
            enums::Update::DeleteChannelMessages(u) => Self {
                entry: Entry::Channel(u.channel_id),
                pts: u.pts,
                pts_count: u.pts_count,
            },
            _ => return None,
        };

        // A sentinel pts (observed with some qts updates) means the
        // ordering must be ignored for this update.
        if info.pts == NO_PTS {
            return None;
        }

        Some(info)
    }
}

fn message_channel_id(message: &enums::Message) -> Option<i64> {
    let peer = match message {
        enums::Message::Empty(m) => m.peer_id.as_ref()?,
        enums::Message::Message(m) => &m.peer_id,
        enums::Message::Service(m) => &m.peer_id,
    };
    match peer {
        enums::Peer::Channel(c) => Some(c.channel_id),
        _ => None,
    }
}
