// Copyright 2025 - developers of the `telecraft` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use super::*;
use std::thread::sleep;
use std::time::Duration;

fn loaded_box(pts: i32) -> MessageBox {
    MessageBox::load(UpdatesState {
        pts,
        qts: 0,
        date: 100,
        seq: 0,
        channels: HashMap::new(),
    })
}

fn plain_message(id: i32, user_id: i64) -> enums::Message {
    enums::Message::Message(types::Message {
        out: false,
        id,
        from_id: None,
        peer_id: enums::Peer::User(types::PeerUser { user_id }),
        date: 100,
        message: format!("message {}", id),
    })
}

fn channel_message(id: i32, channel_id: i64) -> enums::Message {
    enums::Message::Message(types::Message {
        out: false,
        id,
        from_id: None,
        peer_id: enums::Peer::Channel(types::PeerChannel { channel_id }),
        date: 100,
        message: format!("message {}", id),
    })
}

fn new_message_update(id: i32, pts: i32, pts_count: i32) -> enums::Update {
    enums::Update::NewMessage(types::UpdateNewMessage {
        message: plain_message(id, 42),
        pts,
        pts_count,
    })
}

fn updates_container(seq: i32, date: i32, updates: Vec<enums::Update>) -> enums::Updates {
    enums::Updates::Updates(types::Updates {
        updates,
        users: Vec::new(),
        chats: Vec::new(),
        date,
        seq,
    })
}

fn channel_entities(channel_id: i64) -> EntityCache {
    let mut entities = EntityCache::new();
    entities.ingest_chats(&[enums::Chat::Channel(types::Channel {
        id: channel_id,
        access_hash: Some(0xbeef),
        title: "chan".into(),
        megagroup: true,
        ..Default::default()
    })]);
    entities
}

#[test]
fn in_order_updates_advance_pts() {
    let mut message_box = loaded_box(10);

    let applied = message_box
        .process_updates(updates_container(0, 110, vec![new_message_update(1, 11, 1)]))
        .unwrap();
    assert_eq!(applied.new_messages.len(), 1);
    assert_eq!(message_box.session_state().pts, 11);
}

#[test]
fn duplicate_updates_are_dropped() {
    let mut message_box = loaded_box(10);

    let update = new_message_update(1, 11, 1);
    message_box
        .process_updates(updates_container(0, 110, vec![update.clone()]))
        .unwrap();
    let applied = message_box
        .process_updates(updates_container(0, 111, vec![update]))
        .unwrap();

    assert!(applied.new_messages.is_empty());
    assert_eq!(message_box.session_state().pts, 11);
}

#[test]
fn pts_never_decreases() {
    let mut message_box = loaded_box(10);

    for (id, pts) in [(1, 11), (2, 12), (1, 11), (3, 13)] {
        let _ = message_box.process_updates(updates_container(
            0,
            110,
            vec![new_message_update(id, pts, 1)],
        ));
        assert!(message_box.session_state().pts >= pts.min(11));
    }
    assert_eq!(message_box.session_state().pts, 13);
}

#[test]
fn gap_is_recovered_through_difference() {
    // The engine sits at pts = 100 and receives pts = 105: five updates
    // are missing and must come from getDifference.
    let mut message_box = loaded_box(100);

    let applied = message_box
        .process_updates(updates_container(
            0,
            200,
            vec![new_message_update(6, 105, 1)],
        ))
        .unwrap();
    assert!(applied.new_messages.is_empty());

    // The possible gap has not resolved by itself within its deadline.
    sleep(Duration::from_millis(600));
    message_box.check_deadlines();
    assert!(message_box.needs_difference());

    let request = message_box.get_difference().unwrap();
    assert_eq!(request.pts, 100);
    assert_eq!(request.date, 100);

    // The server responds with the five missed messages.
    let applied = message_box.apply_difference(enums::updates::Difference::Difference(
        types::updates::Difference {
            new_messages: (1..=5).map(|id| plain_message(id, 42)).collect(),
            new_encrypted_messages: Vec::new(),
            other_updates: Vec::new(),
            chats: Vec::new(),
            users: Vec::new(),
            state: types::updates::State {
                pts: 105,
                qts: 0,
                date: 200,
                seq: 1,
                unread_count: 0,
            },
        },
    ));

    assert_eq!(applied.new_messages.len(), 5);
    assert!(!message_box.needs_difference());
    assert_eq!(message_box.session_state().pts, 105);

    // Re-delivery of the update that revealed the gap is now a duplicate.
    let applied = message_box
        .process_updates(updates_container(
            0,
            200,
            vec![new_message_update(6, 105, 1)],
        ))
        .unwrap();
    assert!(applied.new_messages.is_empty());
}

#[test]
fn gap_resolved_by_late_arrival() {
    let mut message_box = loaded_box(10);

    // pts 12 arrives before pts 11; it must be buffered...
    let applied = message_box
        .process_updates(updates_container(0, 110, vec![new_message_update(2, 12, 1)]))
        .unwrap();
    assert!(applied.new_messages.is_empty());

    // ...and released, in order, once pts 11 shows up.
    let applied = message_box
        .process_updates(updates_container(0, 110, vec![new_message_update(1, 11, 1)]))
        .unwrap();
    assert_eq!(applied.new_messages.len(), 2);
    assert_eq!(applied.new_messages[0].id(), 1);
    assert_eq!(applied.new_messages[1].id(), 2);
    assert_eq!(message_box.session_state().pts, 12);
    assert!(!message_box.needs_difference());
}

#[test]
fn channel_state_bootstraps_from_first_update() {
    let mut message_box = loaded_box(10);

    let applied = message_box
        .process_updates(updates_container(
            0,
            110,
            vec![enums::Update::NewChannelMessage(
                types::UpdateNewChannelMessage {
                    message: channel_message(1, 777),
                    pts: 50,
                    pts_count: 1,
                },
            )],
        ))
        .unwrap();

    assert_eq!(applied.new_messages.len(), 1);
    assert_eq!(message_box.session_state().channels[&777], 50);
}

#[test]
fn channel_gap_triggers_channel_difference() {
    let mut message_box = loaded_box(10);
    message_box.try_set_channel_state(777, 50);

    // 50 -> 60 with a count of one leaves nine updates missing.
    message_box
        .process_updates(updates_container(
            0,
            110,
            vec![enums::Update::NewChannelMessage(
                types::UpdateNewChannelMessage {
                    message: channel_message(9, 777),
                    pts: 60,
                    pts_count: 1,
                },
            )],
        ))
        .unwrap();

    sleep(Duration::from_millis(600));
    message_box.check_deadlines();

    let entities = channel_entities(777);
    let request = message_box.get_channel_difference(&entities).unwrap();
    assert_eq!(request.pts, 50);

    let applied = message_box.apply_channel_difference(
        &request,
        enums::updates::ChannelDifference::Difference(types::updates::ChannelDifference {
            r#final: true,
            pts: 60,
            timeout: None,
            new_messages: (51..=60).map(|id| channel_message(id, 777)).collect(),
            other_updates: Vec::new(),
            chats: Vec::new(),
            users: Vec::new(),
        }),
    );

    assert_eq!(applied.new_messages.len(), 10);
    assert_eq!(message_box.session_state().channels[&777], 60);
    assert!(!message_box.needs_difference());
}

#[test]
fn channel_difference_without_hash_is_abandoned() {
    let mut message_box = loaded_box(10);
    message_box.try_set_channel_state(777, 50);
    message_box.process_updates(updates_container(
        0,
        110,
        vec![enums::Update::ChannelTooLong(types::UpdateChannelTooLong {
            channel_id: 777,
            pts: None,
        })],
    ))
    .unwrap();
    assert!(message_box.needs_difference());

    let entities = EntityCache::new();
    assert!(message_box.get_channel_difference(&entities).is_none());
    assert!(!message_box.needs_difference());
    // The stale pts is forgotten so a later update can bootstrap it.
    assert!(!message_box.session_state().channels.contains_key(&777));
}

#[test]
fn seq_ordering_is_enforced() {
    let mut message_box = loaded_box(10);
    assert_eq!(message_box.session_state().seq, 0);

    // seq_start too far ahead: a gap.
    assert_eq!(
        message_box.process_updates(updates_container(
            5,
            110,
            vec![new_message_update(1, 11, 1)]
        )),
        Err(Gap)
    );
    assert!(message_box.needs_difference());

    // Clear the pending difference for the rest of the test.
    message_box.apply_difference(enums::updates::Difference::Empty(
        types::updates::DifferenceEmpty { date: 110, seq: 4 },
    ));
    assert_eq!(message_box.session_state().seq, 4);

    // The next sequential container applies.
    let applied = message_box
        .process_updates(updates_container(
            5,
            120,
            vec![new_message_update(1, 11, 1)],
        ))
        .unwrap();
    assert_eq!(applied.new_messages.len(), 1);
    assert_eq!(message_box.session_state().seq, 5);
    assert_eq!(message_box.session_state().date, 120);

    // A repeat of that container is dropped.
    let applied = message_box
        .process_updates(updates_container(
            5,
            120,
            vec![new_message_update(2, 12, 1)],
        ))
        .unwrap();
    assert!(applied.new_messages.is_empty());
}

#[test]
fn qts_updates_advance_qts() {
    let mut message_box = MessageBox::load(UpdatesState {
        pts: 10,
        qts: 20,
        date: 100,
        seq: 0,
        channels: HashMap::new(),
    });

    let update = enums::Update::NewEncryptedMessage(types::UpdateNewEncryptedMessage {
        message: enums::EncryptedMessage::Service(types::EncryptedMessageService {
            random_id: 1,
            chat_id: 2,
            date: 100,
            bytes: vec![1, 2, 3],
        }),
        qts: 21,
    });
    let applied = message_box
        .process_updates(updates_container(0, 110, vec![update.clone()]))
        .unwrap();
    assert_eq!(applied.updates.len(), 1);
    assert_eq!(message_box.session_state().qts, 21);

    // Duplicates drop like with pts.
    let applied = message_box
        .process_updates(updates_container(0, 110, vec![update]))
        .unwrap();
    assert!(applied.updates.is_empty());
}

#[test]
fn too_long_difference_resets_state() {
    let mut message_box = loaded_box(100);
    message_box.note_possible_gap();
    assert!(message_box.needs_difference());

    let applied = message_box.apply_difference(enums::updates::Difference::TooLong(
        types::updates::DifferenceTooLong { pts: 9000 },
    ));
    assert!(applied.state_reset);
    assert_eq!(message_box.session_state().pts, 9000);
    assert!(!message_box.needs_difference());
}

#[test]
fn updates_without_counters_apply_immediately() {
    let mut message_box = loaded_box(10);

    let applied = message_box
        .process_updates(updates_container(
            0,
            110,
            vec![enums::Update::UserPhone(types::UpdateUserPhone {
                user_id: 42,
                phone: "+123".into(),
            })],
        ))
        .unwrap();
    assert_eq!(applied.updates.len(), 1);
    // Orderless updates must not advance the counters.
    assert_eq!(message_box.session_state().pts, 10);
}

#[test]
fn short_message_synthesizes_a_message() {
    let mut message_box = loaded_box(10);

    let applied = message_box
        .process_updates(enums::Updates::ShortMessage(types::UpdateShortMessage {
            out: false,
            id: 3,
            user_id: 42,
            message: "hello".into(),
            pts: 11,
            pts_count: 1,
            date: 110,
        }))
        .unwrap();

    assert_eq!(applied.new_messages.len(), 1);
    assert_eq!(applied.new_messages[0].id(), 3);
    assert_eq!(message_box.session_state().pts, 11);
}

#[test]
fn updates_too_long_is_a_gap() {
    let mut message_box = loaded_box(10);
    assert_eq!(message_box.process_updates(enums::Updates::TooLong), Err(Gap));
    assert!(message_box.needs_difference());
    assert!(message_box.get_difference().is_some());
}

#[test]
fn unknown_updates_are_dropped_silently() {
    let mut message_box = loaded_box(10);
    let applied = message_box
        .process_updates(enums::Updates::Unknown {
            constructor_id: 0xdeadbeef,
            body: vec![1, 2, 3],
        })
        .unwrap();
    assert!(applied.is_empty());
}

#[test]
fn state_roundtrips_through_persistence() {
    let mut channels = HashMap::new();
    channels.insert(777i64, 50);
    let state = UpdatesState {
        pts: 100,
        qts: 20,
        date: 300,
        seq: 4,
        channels,
    };

    let message_box = MessageBox::load(state.clone());
    assert_eq!(message_box.session_state(), state);

    let mut path = std::env::temp_dir();
    path.push(format!("telecraft-updates-{}.json", std::process::id()));
    state.save(&path).unwrap();
    assert_eq!(UpdatesState::load(&path), Some(state));
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn out_of_order_arrival_keeps_pts_monotonic() {
    let mut message_box = loaded_box(10);

    // 13 first (gap), then 11..12 resolve it; pts never decreases.
    message_box
        .process_updates(updates_container(0, 110, vec![new_message_update(3, 13, 1)]))
        .unwrap();
    assert_eq!(message_box.session_state().pts, 10);

    let applied = message_box
        .process_updates(updates_container(
            0,
            110,
            vec![new_message_update(1, 11, 1), new_message_update(2, 12, 1)],
        ))
        .unwrap();

    assert_eq!(applied.new_messages.len(), 3);
    let ids: Vec<i32> = applied.new_messages.iter().map(|m| m.id()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(message_box.session_state().pts, 13);
}
