// Copyright 2025 - developers of the `telecraft` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Boxed (`enum`) definitions grouping the constructors of each type. The
//! dispatch on constructor identifiers happens here.
use crate::deserialize::{self, Buffer, Deserializable};
use crate::types;
use crate::{Identifiable, Serializable};

macro_rules! unexpected {
    ($id:expr) => {
        return Err(deserialize::Error::UnexpectedConstructor { id: $id })
    };
}

/// The `Server_DH_Params` type.
#[derive(Clone, Debug, PartialEq)]
pub enum ServerDhParams {
    Ok(types::ServerDhParamsOk),
    Fail(types::ServerDhParamsFail),
}

impl Serializable for ServerDhParams {
    fn serialize(&self, buf: &mut Vec<u8>) {
        match self {
            Self::Ok(x) => x.serialize(buf),
            Self::Fail(x) => x.serialize(buf),
        }
    }
}

impl Deserializable for ServerDhParams {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        Ok(match id {
            types::ServerDhParamsOk::CONSTRUCTOR_ID => Self::Ok(types::ServerDhParamsOk {
                nonce: <[u8; 16]>::deserialize(buf)?,
                server_nonce: <[u8; 16]>::deserialize(buf)?,
                encrypted_answer: Vec::<u8>::deserialize(buf)?,
            }),
            types::ServerDhParamsFail::CONSTRUCTOR_ID => Self::Fail(types::ServerDhParamsFail {
                nonce: <[u8; 16]>::deserialize(buf)?,
                server_nonce: <[u8; 16]>::deserialize(buf)?,
                new_nonce_hash: <[u8; 16]>::deserialize(buf)?,
            }),
            _ => unexpected!(id),
        })
    }
}

/// The `Set_client_DH_params_answer` type.
#[derive(Clone, Debug, PartialEq)]
pub enum SetClientDhParamsAnswer {
    DhGenOk(types::DhGenOk),
    DhGenRetry(types::DhGenRetry),
    DhGenFail(types::DhGenFail),
}

impl Serializable for SetClientDhParamsAnswer {
    fn serialize(&self, buf: &mut Vec<u8>) {
        match self {
            Self::DhGenOk(x) => {
                types::DhGenOk::CONSTRUCTOR_ID.serialize(buf);
                x.nonce.serialize(buf);
                x.server_nonce.serialize(buf);
                x.new_nonce_hash1.serialize(buf);
            }
            Self::DhGenRetry(x) => {
                types::DhGenRetry::CONSTRUCTOR_ID.serialize(buf);
                x.nonce.serialize(buf);
                x.server_nonce.serialize(buf);
                x.new_nonce_hash2.serialize(buf);
            }
            Self::DhGenFail(x) => {
                types::DhGenFail::CONSTRUCTOR_ID.serialize(buf);
                x.nonce.serialize(buf);
                x.server_nonce.serialize(buf);
                x.new_nonce_hash3.serialize(buf);
            }
        }
    }
}

impl Deserializable for SetClientDhParamsAnswer {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        Ok(match id {
            types::DhGenOk::CONSTRUCTOR_ID => Self::DhGenOk(types::DhGenOk {
                nonce: <[u8; 16]>::deserialize(buf)?,
                server_nonce: <[u8; 16]>::deserialize(buf)?,
                new_nonce_hash1: <[u8; 16]>::deserialize(buf)?,
            }),
            types::DhGenRetry::CONSTRUCTOR_ID => Self::DhGenRetry(types::DhGenRetry {
                nonce: <[u8; 16]>::deserialize(buf)?,
                server_nonce: <[u8; 16]>::deserialize(buf)?,
                new_nonce_hash2: <[u8; 16]>::deserialize(buf)?,
            }),
            types::DhGenFail::CONSTRUCTOR_ID => Self::DhGenFail(types::DhGenFail {
                nonce: <[u8; 16]>::deserialize(buf)?,
                server_nonce: <[u8; 16]>::deserialize(buf)?,
                new_nonce_hash3: <[u8; 16]>::deserialize(buf)?,
            }),
            _ => unexpected!(id),
        })
    }
}

/// The `BadMsgNotification` type.
#[derive(Clone, Debug, PartialEq)]
pub enum BadMsgNotification {
    Notification(types::BadMsgNotification),
    ServerSalt(types::BadServerSalt),
}

impl Serializable for BadMsgNotification {
    fn serialize(&self, buf: &mut Vec<u8>) {
        match self {
            Self::Notification(x) => x.serialize(buf),
            Self::ServerSalt(x) => x.serialize(buf),
        }
    }
}

impl Deserializable for BadMsgNotification {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        Ok(match id {
            types::BadMsgNotification::CONSTRUCTOR_ID => {
                Self::Notification(types::BadMsgNotification {
                    bad_msg_id: i64::deserialize(buf)?,
                    bad_msg_seqno: i32::deserialize(buf)?,
                    error_code: i32::deserialize(buf)?,
                })
            }
            types::BadServerSalt::CONSTRUCTOR_ID => Self::ServerSalt(types::BadServerSalt {
                bad_msg_id: i64::deserialize(buf)?,
                bad_msg_seqno: i32::deserialize(buf)?,
                error_code: i32::deserialize(buf)?,
                new_server_salt: i64::deserialize(buf)?,
            }),
            _ => unexpected!(id),
        })
    }
}

/// The `Peer` type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Peer {
    User(types::PeerUser),
    Chat(types::PeerChat),
    Channel(types::PeerChannel),
}

impl From<types::PeerUser> for Peer {
    fn from(x: types::PeerUser) -> Self {
        Self::User(x)
    }
}

impl From<types::PeerChat> for Peer {
    fn from(x: types::PeerChat) -> Self {
        Self::Chat(x)
    }
}

impl From<types::PeerChannel> for Peer {
    fn from(x: types::PeerChannel) -> Self {
        Self::Channel(x)
    }
}

impl Serializable for Peer {
    fn serialize(&self, buf: &mut Vec<u8>) {
        match self {
            Self::User(x) => {
                types::PeerUser::CONSTRUCTOR_ID.serialize(buf);
                x.user_id.serialize(buf);
            }
            Self::Chat(x) => {
                types::PeerChat::CONSTRUCTOR_ID.serialize(buf);
                x.chat_id.serialize(buf);
            }
            Self::Channel(x) => {
                types::PeerChannel::CONSTRUCTOR_ID.serialize(buf);
                x.channel_id.serialize(buf);
            }
        }
    }
}

impl Deserializable for Peer {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        Ok(match id {
            types::PeerUser::CONSTRUCTOR_ID => Self::User(types::PeerUser {
                user_id: i64::deserialize(buf)?,
            }),
            types::PeerChat::CONSTRUCTOR_ID => Self::Chat(types::PeerChat {
                chat_id: i64::deserialize(buf)?,
            }),
            types::PeerChannel::CONSTRUCTOR_ID => Self::Channel(types::PeerChannel {
                channel_id: i64::deserialize(buf)?,
            }),
            _ => unexpected!(id),
        })
    }
}

/// The `InputPeer` type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputPeer {
    Empty,
    PeerSelf,
    User(types::InputPeerUser),
    Chat(types::InputPeerChat),
    Channel(types::InputPeerChannel),
}

impl InputPeer {
    const EMPTY_ID: u32 = 0x7f3b18ea;
    const SELF_ID: u32 = 0x7da07ec9;
}

impl Serializable for InputPeer {
    fn serialize(&self, buf: &mut Vec<u8>) {
        match self {
            Self::Empty => Self::EMPTY_ID.serialize(buf),
            Self::PeerSelf => Self::SELF_ID.serialize(buf),
            Self::User(x) => {
                types::InputPeerUser::CONSTRUCTOR_ID.serialize(buf);
                x.user_id.serialize(buf);
                x.access_hash.serialize(buf);
            }
            Self::Chat(x) => {
                types::InputPeerChat::CONSTRUCTOR_ID.serialize(buf);
                x.chat_id.serialize(buf);
            }
            Self::Channel(x) => {
                types::InputPeerChannel::CONSTRUCTOR_ID.serialize(buf);
                x.channel_id.serialize(buf);
                x.access_hash.serialize(buf);
            }
        }
    }
}

impl Deserializable for InputPeer {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        Ok(match id {
            Self::EMPTY_ID => Self::Empty,
            Self::SELF_ID => Self::PeerSelf,
            types::InputPeerUser::CONSTRUCTOR_ID => Self::User(types::InputPeerUser {
                user_id: i64::deserialize(buf)?,
                access_hash: i64::deserialize(buf)?,
            }),
            types::InputPeerChat::CONSTRUCTOR_ID => Self::Chat(types::InputPeerChat {
                chat_id: i64::deserialize(buf)?,
            }),
            types::InputPeerChannel::CONSTRUCTOR_ID => Self::Channel(types::InputPeerChannel {
                channel_id: i64::deserialize(buf)?,
                access_hash: i64::deserialize(buf)?,
            }),
            _ => unexpected!(id),
        })
    }
}

/// The `InputUser` type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputUser {
    Empty,
    UserSelf,
    User(types::InputUser),
}

impl InputUser {
    const EMPTY_ID: u32 = 0xb98886cf;
    const SELF_ID: u32 = 0xf7c1b13f;
}

impl Serializable for InputUser {
    fn serialize(&self, buf: &mut Vec<u8>) {
        match self {
            Self::Empty => Self::EMPTY_ID.serialize(buf),
            Self::UserSelf => Self::SELF_ID.serialize(buf),
            Self::User(x) => {
                types::InputUser::CONSTRUCTOR_ID.serialize(buf);
                x.user_id.serialize(buf);
                x.access_hash.serialize(buf);
            }
        }
    }
}

impl Deserializable for InputUser {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        Ok(match id {
            Self::EMPTY_ID => Self::Empty,
            Self::SELF_ID => Self::UserSelf,
            types::InputUser::CONSTRUCTOR_ID => Self::User(types::InputUser {
                user_id: i64::deserialize(buf)?,
                access_hash: i64::deserialize(buf)?,
            }),
            _ => unexpected!(id),
        })
    }
}

/// The `InputChannel` type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputChannel {
    Empty,
    Channel(types::InputChannel),
}

impl InputChannel {
    const EMPTY_ID: u32 = 0xee8c1e86;
}

impl Serializable for InputChannel {
    fn serialize(&self, buf: &mut Vec<u8>) {
        match self {
            Self::Empty => Self::EMPTY_ID.serialize(buf),
            Self::Channel(x) => {
                types::InputChannel::CONSTRUCTOR_ID.serialize(buf);
                x.channel_id.serialize(buf);
                x.access_hash.serialize(buf);
            }
        }
    }
}

impl Deserializable for InputChannel {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        Ok(match id {
            Self::EMPTY_ID => Self::Empty,
            types::InputChannel::CONSTRUCTOR_ID => Self::Channel(types::InputChannel {
                channel_id: i64::deserialize(buf)?,
                access_hash: i64::deserialize(buf)?,
            }),
            _ => unexpected!(id),
        })
    }
}

/// The `User` type.
#[derive(Clone, Debug, PartialEq)]
pub enum User {
    Empty(types::UserEmpty),
    User(types::User),
}

impl From<types::User> for User {
    fn from(x: types::User) -> Self {
        Self::User(x)
    }
}

impl User {
    /// The peer identifier regardless of the variant.
    pub fn id(&self) -> i64 {
        match self {
            Self::Empty(x) => x.id,
            Self::User(x) => x.id,
        }
    }
}

impl Serializable for User {
    fn serialize(&self, buf: &mut Vec<u8>) {
        match self {
            Self::Empty(x) => {
                types::UserEmpty::CONSTRUCTOR_ID.serialize(buf);
                x.id.serialize(buf);
            }
            Self::User(x) => x.serialize(buf),
        }
    }
}

impl Deserializable for User {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        Ok(match id {
            types::UserEmpty::CONSTRUCTOR_ID => Self::Empty(types::UserEmpty {
                id: i64::deserialize(buf)?,
            }),
            types::User::CONSTRUCTOR_ID => {
                // Re-enter the struct's own deserialization, minus the id.
                let flags = u32::deserialize(buf)?;
                Self::User(types::User {
                    is_self: flags & (1 << 10) != 0,
                    bot: flags & (1 << 14) != 0,
                    min: flags & (1 << 20) != 0,
                    id: i64::deserialize(buf)?,
                    access_hash: if flags & 1 != 0 {
                        Some(i64::deserialize(buf)?)
                    } else {
                        None
                    },
                    first_name: if flags & (1 << 1) != 0 {
                        Some(String::deserialize(buf)?)
                    } else {
                        None
                    },
                    last_name: if flags & (1 << 2) != 0 {
                        Some(String::deserialize(buf)?)
                    } else {
                        None
                    },
                    username: if flags & (1 << 3) != 0 {
                        Some(String::deserialize(buf)?)
                    } else {
                        None
                    },
                    phone: if flags & (1 << 4) != 0 {
                        Some(String::deserialize(buf)?)
                    } else {
                        None
                    },
                    usernames: if flags & (1 << 21) != 0 {
                        Vec::<String>::deserialize(buf)?
                    } else {
                        Vec::new()
                    },
                })
            }
            _ => unexpected!(id),
        })
    }
}

/// The `Chat` type.
#[derive(Clone, Debug, PartialEq)]
pub enum Chat {
    Chat(types::Chat),
    Forbidden(types::ChatForbidden),
    Channel(types::Channel),
    ChannelForbidden(types::ChannelForbidden),
}

impl From<types::Channel> for Chat {
    fn from(x: types::Channel) -> Self {
        Self::Channel(x)
    }
}

impl From<types::Chat> for Chat {
    fn from(x: types::Chat) -> Self {
        Self::Chat(x)
    }
}

impl Chat {
    /// The peer identifier regardless of the variant.
    pub fn id(&self) -> i64 {
        match self {
            Self::Chat(x) => x.id,
            Self::Forbidden(x) => x.id,
            Self::Channel(x) => x.id,
            Self::ChannelForbidden(x) => x.id,
        }
    }
}

impl Serializable for Chat {
    fn serialize(&self, buf: &mut Vec<u8>) {
        match self {
            Self::Chat(x) => x.serialize(buf),
            Self::Forbidden(x) => {
                types::ChatForbidden::CONSTRUCTOR_ID.serialize(buf);
                x.id.serialize(buf);
                x.title.serialize(buf);
            }
            Self::Channel(x) => x.serialize(buf),
            Self::ChannelForbidden(x) => x.serialize(buf),
        }
    }
}

impl Deserializable for Chat {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        // Peek by re-reading; each struct deserialization expects its id.
        let id = u32::deserialize(buf)?;
        Ok(match id {
            types::Chat::CONSTRUCTOR_ID => {
                let _flags = u32::deserialize(buf)?;
                Self::Chat(types::Chat {
                    id: i64::deserialize(buf)?,
                    title: String::deserialize(buf)?,
                    participants_count: i32::deserialize(buf)?,
                    date: i32::deserialize(buf)?,
                    version: i32::deserialize(buf)?,
                })
            }
            types::ChatForbidden::CONSTRUCTOR_ID => Self::Forbidden(types::ChatForbidden {
                id: i64::deserialize(buf)?,
                title: String::deserialize(buf)?,
            }),
            types::Channel::CONSTRUCTOR_ID => {
                let flags = u32::deserialize(buf)?;
                Self::Channel(types::Channel {
                    broadcast: flags & (1 << 5) != 0,
                    megagroup: flags & (1 << 8) != 0,
                    min: flags & (1 << 12) != 0,
                    id: i64::deserialize(buf)?,
                    access_hash: if flags & (1 << 13) != 0 {
                        Some(i64::deserialize(buf)?)
                    } else {
                        None
                    },
                    title: String::deserialize(buf)?,
                    username: if flags & (1 << 6) != 0 {
                        Some(String::deserialize(buf)?)
                    } else {
                        None
                    },
                    usernames: if flags & (1 << 21) != 0 {
                        Vec::<String>::deserialize(buf)?
                    } else {
                        Vec::new()
                    },
                })
            }
            types::ChannelForbidden::CONSTRUCTOR_ID => {
                let flags = u32::deserialize(buf)?;
                Self::ChannelForbidden(types::ChannelForbidden {
                    broadcast: flags & (1 << 5) != 0,
                    megagroup: flags & (1 << 8) != 0,
                    id: i64::deserialize(buf)?,
                    access_hash: i64::deserialize(buf)?,
                    title: String::deserialize(buf)?,
                })
            }
            _ => unexpected!(id),
        })
    }
}

/// The `MessageAction` type (only the variants the core inspects).
#[derive(Clone, Debug, PartialEq)]
pub enum MessageAction {
    Empty,
    ChatMigrateTo { channel_id: i64 },
    ChannelMigrateFrom { title: String, chat_id: i64 },
}

impl MessageAction {
    const EMPTY_ID: u32 = 0xb6aef7b0;
    const CHAT_MIGRATE_TO_ID: u32 = 0xe1037f92;
    const CHANNEL_MIGRATE_FROM_ID: u32 = 0xea3948e9;
}

impl Serializable for MessageAction {
    fn serialize(&self, buf: &mut Vec<u8>) {
        match self {
            Self::Empty => Self::EMPTY_ID.serialize(buf),
            Self::ChatMigrateTo { channel_id } => {
                Self::CHAT_MIGRATE_TO_ID.serialize(buf);
                channel_id.serialize(buf);
            }
            Self::ChannelMigrateFrom { title, chat_id } => {
                Self::CHANNEL_MIGRATE_FROM_ID.serialize(buf);
                title.serialize(buf);
                chat_id.serialize(buf);
            }
        }
    }
}

impl Deserializable for MessageAction {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        Ok(match id {
            Self::EMPTY_ID => Self::Empty,
            Self::CHAT_MIGRATE_TO_ID => Self::ChatMigrateTo {
                channel_id: i64::deserialize(buf)?,
            },
            Self::CHANNEL_MIGRATE_FROM_ID => Self::ChannelMigrateFrom {
                title: String::deserialize(buf)?,
                chat_id: i64::deserialize(buf)?,
            },
            _ => unexpected!(id),
        })
    }
}

/// The `Message` type.
#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    Empty(types::MessageEmpty),
    Message(types::Message),
    Service(types::MessageService),
}

impl From<types::Message> for Message {
    fn from(x: types::Message) -> Self {
        Self::Message(x)
    }
}

impl Message {
    /// The message identifier regardless of the variant.
    pub fn id(&self) -> i32 {
        match self {
            Self::Empty(x) => x.id,
            Self::Message(x) => x.id,
            Self::Service(x) => x.id,
        }
    }
}

impl Serializable for Message {
    fn serialize(&self, buf: &mut Vec<u8>) {
        match self {
            Self::Empty(x) => {
                types::MessageEmpty::CONSTRUCTOR_ID.serialize(buf);
                let flags = if x.peer_id.is_some() { 1u32 } else { 0 };
                flags.serialize(buf);
                x.id.serialize(buf);
                if let Some(ref p) = x.peer_id {
                    p.serialize(buf);
                }
            }
            Self::Message(x) => x.serialize(buf),
            Self::Service(x) => x.serialize(buf),
        }
    }
}

impl Deserializable for Message {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        Ok(match id {
            types::MessageEmpty::CONSTRUCTOR_ID => {
                let flags = u32::deserialize(buf)?;
                Self::Empty(types::MessageEmpty {
                    id: i32::deserialize(buf)?,
                    peer_id: if flags & 1 != 0 {
                        Some(Peer::deserialize(buf)?)
                    } else {
                        None
                    },
                })
            }
            types::Message::CONSTRUCTOR_ID => {
                let flags = u32::deserialize(buf)?;
                Self::Message(types::Message {
                    out: flags & (1 << 1) != 0,
                    id: i32::deserialize(buf)?,
                    from_id: if flags & (1 << 8) != 0 {
                        Some(Peer::deserialize(buf)?)
                    } else {
                        None
                    },
                    peer_id: Peer::deserialize(buf)?,
                    date: i32::deserialize(buf)?,
                    message: String::deserialize(buf)?,
                })
            }
            types::MessageService::CONSTRUCTOR_ID => {
                let flags = u32::deserialize(buf)?;
                Self::Service(types::MessageService {
                    out: flags & (1 << 1) != 0,
                    id: i32::deserialize(buf)?,
                    from_id: if flags & (1 << 8) != 0 {
                        Some(Peer::deserialize(buf)?)
                    } else {
                        None
                    },
                    peer_id: Peer::deserialize(buf)?,
                    date: i32::deserialize(buf)?,
                    action: MessageAction::deserialize(buf)?,
                })
            }
            _ => unexpected!(id),
        })
    }
}

/// The `EncryptedMessage` type.
#[derive(Clone, Debug, PartialEq)]
pub enum EncryptedMessage {
    Service(types::EncryptedMessageService),
}

impl Serializable for EncryptedMessage {
    fn serialize(&self, buf: &mut Vec<u8>) {
        match self {
            Self::Service(x) => {
                types::EncryptedMessageService::CONSTRUCTOR_ID.serialize(buf);
                x.random_id.serialize(buf);
                x.chat_id.serialize(buf);
                x.date.serialize(buf);
                x.bytes.serialize(buf);
            }
        }
    }
}

impl Deserializable for EncryptedMessage {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        Ok(match id {
            types::EncryptedMessageService::CONSTRUCTOR_ID => {
                Self::Service(types::EncryptedMessageService {
                    random_id: i64::deserialize(buf)?,
                    chat_id: i32::deserialize(buf)?,
                    date: i32::deserialize(buf)?,
                    bytes: Vec::<u8>::deserialize(buf)?,
                })
            }
            _ => unexpected!(id),
        })
    }
}

/// The `Update` type (only the variants the core inspects; everything else
/// fails the parse and is dropped by the caller with a log line).
#[derive(Clone, Debug, PartialEq)]
pub enum Update {
    NewMessage(types::UpdateNewMessage),
    MessageId(types::UpdateMessageId),
    DeleteMessages(types::UpdateDeleteMessages),
    ReadHistoryInbox(types::UpdateReadHistoryInbox),
    ReadHistoryOutbox(types::UpdateReadHistoryOutbox),
    NewEncryptedMessage(types::UpdateNewEncryptedMessage),
    ChannelTooLong(types::UpdateChannelTooLong),
    NewChannelMessage(types::UpdateNewChannelMessage),
    EditChannelMessage(types::UpdateEditChannelMessage),
    DeleteChannelMessages(types::UpdateDeleteChannelMessages),
    EditMessage(types::UpdateEditMessage),
    UserPhone(types::UpdateUserPhone),
    Config,
    PtsChanged,
}

impl Update {
    const CONFIG_ID: u32 = 0xa229dd06;
    const PTS_CHANGED_ID: u32 = 0x3354678f;
}

impl From<types::UpdateNewMessage> for Update {
    fn from(x: types::UpdateNewMessage) -> Self {
        Self::NewMessage(x)
    }
}

impl From<types::UpdateNewChannelMessage> for Update {
    fn from(x: types::UpdateNewChannelMessage) -> Self {
        Self::NewChannelMessage(x)
    }
}

impl Serializable for Update {
    fn serialize(&self, buf: &mut Vec<u8>) {
        match self {
            Self::NewMessage(x) => {
                types::UpdateNewMessage::CONSTRUCTOR_ID.serialize(buf);
                x.message.serialize(buf);
                x.pts.serialize(buf);
                x.pts_count.serialize(buf);
            }
            Self::MessageId(x) => {
                types::UpdateMessageId::CONSTRUCTOR_ID.serialize(buf);
                x.id.serialize(buf);
                x.random_id.serialize(buf);
            }
            Self::DeleteMessages(x) => {
                types::UpdateDeleteMessages::CONSTRUCTOR_ID.serialize(buf);
                x.messages.serialize(buf);
                x.pts.serialize(buf);
                x.pts_count.serialize(buf);
            }
            Self::ReadHistoryInbox(x) => {
                types::UpdateReadHistoryInbox::CONSTRUCTOR_ID.serialize(buf);
                let flags = if x.folder_id.is_some() { 1u32 } else { 0 };
                flags.serialize(buf);
                if let Some(f) = x.folder_id {
                    f.serialize(buf);
                }
                x.peer.serialize(buf);
                x.max_id.serialize(buf);
                x.still_unread_count.serialize(buf);
                x.pts.serialize(buf);
                x.pts_count.serialize(buf);
            }
            Self::ReadHistoryOutbox(x) => {
                types::UpdateReadHistoryOutbox::CONSTRUCTOR_ID.serialize(buf);
                x.peer.serialize(buf);
                x.max_id.serialize(buf);
                x.pts.serialize(buf);
                x.pts_count.serialize(buf);
            }
            Self::NewEncryptedMessage(x) => {
                types::UpdateNewEncryptedMessage::CONSTRUCTOR_ID.serialize(buf);
                x.message.serialize(buf);
                x.qts.serialize(buf);
            }
            Self::ChannelTooLong(x) => {
                types::UpdateChannelTooLong::CONSTRUCTOR_ID.serialize(buf);
                let flags = if x.pts.is_some() { 1u32 } else { 0 };
                flags.serialize(buf);
                x.channel_id.serialize(buf);
                if let Some(p) = x.pts {
                    p.serialize(buf);
                }
            }
            Self::NewChannelMessage(x) => {
                types::UpdateNewChannelMessage::CONSTRUCTOR_ID.serialize(buf);
                x.message.serialize(buf);
                x.pts.serialize(buf);
                x.pts_count.serialize(buf);
            }
            Self::EditChannelMessage(x) => {
                types::UpdateEditChannelMessage::CONSTRUCTOR_ID.serialize(buf);
                x.message.serialize(buf);
                x.pts.serialize(buf);
                x.pts_count.serialize(buf);
            }
            Self::DeleteChannelMessages(x) => {
                types::UpdateDeleteChannelMessages::CONSTRUCTOR_ID.serialize(buf);
                x.channel_id.serialize(buf);
                x.messages.serialize(buf);
                x.pts.serialize(buf);
                x.pts_count.serialize(buf);
            }
            Self::EditMessage(x) => {
                types::UpdateEditMessage::CONSTRUCTOR_ID.serialize(buf);
                x.message.serialize(buf);
                x.pts.serialize(buf);
                x.pts_count.serialize(buf);
            }
            Self::UserPhone(x) => {
                types::UpdateUserPhone::CONSTRUCTOR_ID.serialize(buf);
                x.user_id.serialize(buf);
                x.phone.serialize(buf);
            }
            Self::Config => Self::CONFIG_ID.serialize(buf),
            Self::PtsChanged => Self::PTS_CHANGED_ID.serialize(buf),
        }
    }
}

impl Deserializable for Update {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        Ok(match id {
            types::UpdateNewMessage::CONSTRUCTOR_ID => Self::NewMessage(types::UpdateNewMessage {
                message: Message::deserialize(buf)?,
                pts: i32::deserialize(buf)?,
                pts_count: i32::deserialize(buf)?,
            }),
            types::UpdateMessageId::CONSTRUCTOR_ID => Self::MessageId(types::UpdateMessageId {
                id: i32::deserialize(buf)?,
                random_id: i64::deserialize(buf)?,
            }),
            types::UpdateDeleteMessages::CONSTRUCTOR_ID => {
                Self::DeleteMessages(types::UpdateDeleteMessages {
                    messages: Vec::<i32>::deserialize(buf)?,
                    pts: i32::deserialize(buf)?,
                    pts_count: i32::deserialize(buf)?,
                })
            }
            types::UpdateReadHistoryInbox::CONSTRUCTOR_ID => {
                let flags = u32::deserialize(buf)?;
                Self::ReadHistoryInbox(types::UpdateReadHistoryInbox {
                    folder_id: if flags & 1 != 0 {
                        Some(i32::deserialize(buf)?)
                    } else {
                        None
                    },
                    peer: Peer::deserialize(buf)?,
                    max_id: i32::deserialize(buf)?,
                    still_unread_count: i32::deserialize(buf)?,
                    pts: i32::deserialize(buf)?,
                    pts_count: i32::deserialize(buf)?,
                })
            }
            types::UpdateReadHistoryOutbox::CONSTRUCTOR_ID => {
                Self::ReadHistoryOutbox(types::UpdateReadHistoryOutbox {
                    peer: Peer::deserialize(buf)?,
                    max_id: i32::deserialize(buf)?,
                    pts: i32::deserialize(buf)?,
                    pts_count: i32::deserialize(buf)?,
                })
            }
            types::UpdateNewEncryptedMessage::CONSTRUCTOR_ID => {
                Self::NewEncryptedMessage(types::UpdateNewEncryptedMessage {
                    message: EncryptedMessage::deserialize(buf)?,
                    qts: i32::deserialize(buf)?,
                })
            }
            types::UpdateChannelTooLong::CONSTRUCTOR_ID => {
                let flags = u32::deserialize(buf)?;
                Self::ChannelTooLong(types::UpdateChannelTooLong {
                    channel_id: i64::deserialize(buf)?,
                    pts: if flags & 1 != 0 {
                        Some(i32::deserialize(buf)?)
                    } else {
                        None
                    },
                })
            }
            types::UpdateNewChannelMessage::CONSTRUCTOR_ID => {
                Self::NewChannelMessage(types::UpdateNewChannelMessage {
                    message: Message::deserialize(buf)?,
                    pts: i32::deserialize(buf)?,
                    pts_count: i32::deserialize(buf)?,
                })
            }
            types::UpdateEditChannelMessage::CONSTRUCTOR_ID => {
                Self::EditChannelMessage(types::UpdateEditChannelMessage {
                    message: Message::deserialize(buf)?,
                    pts: i32::deserialize(buf)?,
                    pts_count: i32::deserialize(buf)?,
                })
            }
            types::UpdateDeleteChannelMessages::CONSTRUCTOR_ID => {
                Self::DeleteChannelMessages(types::UpdateDeleteChannelMessages {
                    channel_id: i64::deserialize(buf)?,
                    messages: Vec::<i32>::deserialize(buf)?,
                    pts: i32::deserialize(buf)?,
                    pts_count: i32::deserialize(buf)?,
                })
            }
            types::UpdateEditMessage::CONSTRUCTOR_ID => {
                Self::EditMessage(types::UpdateEditMessage {
                    message: Message::deserialize(buf)?,
                    pts: i32::deserialize(buf)?,
                    pts_count: i32::deserialize(buf)?,
                })
            }
            types::UpdateUserPhone::CONSTRUCTOR_ID => Self::UserPhone(types::UpdateUserPhone {
                user_id: i64::deserialize(buf)?,
                phone: String::deserialize(buf)?,
            }),
            Self::CONFIG_ID => Self::Config,
            Self::PTS_CHANGED_ID => Self::PtsChanged,
            _ => unexpected!(id),
        })
    }
}

/// The `Updates` type.
#[derive(Clone, Debug, PartialEq)]
pub enum Updates {
    TooLong,
    ShortMessage(types::UpdateShortMessage),
    ShortChatMessage(types::UpdateShortChatMessage),
    Short(types::UpdateShort),
    Combined(types::UpdatesCombined),
    Updates(types::Updates),
    ShortSentMessage(types::UpdateShortSentMessage),
    /// A constructor this build does not know. Carried for forward
    /// compatibility; consumers log and drop it.
    Unknown { constructor_id: u32, body: Vec<u8> },
}

impl Updates {
    const TOO_LONG_ID: u32 = 0xe317af7e;
}

impl From<types::Updates> for Updates {
    fn from(x: types::Updates) -> Self {
        Self::Updates(x)
    }
}

impl Serializable for Updates {
    fn serialize(&self, buf: &mut Vec<u8>) {
        match self {
            Self::TooLong => Self::TOO_LONG_ID.serialize(buf),
            Self::ShortMessage(x) => {
                types::UpdateShortMessage::CONSTRUCTOR_ID.serialize(buf);
                let flags = if x.out { 1u32 << 1 } else { 0 };
                flags.serialize(buf);
                x.id.serialize(buf);
                x.user_id.serialize(buf);
                x.message.serialize(buf);
                x.pts.serialize(buf);
                x.pts_count.serialize(buf);
                x.date.serialize(buf);
            }
            Self::ShortChatMessage(x) => {
                types::UpdateShortChatMessage::CONSTRUCTOR_ID.serialize(buf);
                let flags = if x.out { 1u32 << 1 } else { 0 };
                flags.serialize(buf);
                x.id.serialize(buf);
                x.from_id.serialize(buf);
                x.chat_id.serialize(buf);
                x.message.serialize(buf);
                x.pts.serialize(buf);
                x.pts_count.serialize(buf);
                x.date.serialize(buf);
            }
            Self::Short(x) => {
                types::UpdateShort::CONSTRUCTOR_ID.serialize(buf);
                x.update.serialize(buf);
                x.date.serialize(buf);
            }
            Self::Combined(x) => {
                types::UpdatesCombined::CONSTRUCTOR_ID.serialize(buf);
                x.updates.serialize(buf);
                x.users.serialize(buf);
                x.chats.serialize(buf);
                x.date.serialize(buf);
                x.seq_start.serialize(buf);
                x.seq.serialize(buf);
            }
            Self::Updates(x) => {
                types::Updates::CONSTRUCTOR_ID.serialize(buf);
                x.updates.serialize(buf);
                x.users.serialize(buf);
                x.chats.serialize(buf);
                x.date.serialize(buf);
                x.seq.serialize(buf);
            }
            Self::ShortSentMessage(x) => {
                types::UpdateShortSentMessage::CONSTRUCTOR_ID.serialize(buf);
                let flags = if x.out { 1u32 << 1 } else { 0 };
                flags.serialize(buf);
                x.id.serialize(buf);
                x.pts.serialize(buf);
                x.pts_count.serialize(buf);
                x.date.serialize(buf);
            }
            Self::Unknown {
                constructor_id,
                body,
            } => {
                constructor_id.serialize(buf);
                buf.extend_from_slice(body);
            }
        }
    }
}

impl Deserializable for Updates {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        Ok(match id {
            Self::TOO_LONG_ID => Self::TooLong,
            types::UpdateShortMessage::CONSTRUCTOR_ID => {
                let flags = u32::deserialize(buf)?;
                Self::ShortMessage(types::UpdateShortMessage {
                    out: flags & (1 << 1) != 0,
                    id: i32::deserialize(buf)?,
                    user_id: i64::deserialize(buf)?,
                    message: String::deserialize(buf)?,
                    pts: i32::deserialize(buf)?,
                    pts_count: i32::deserialize(buf)?,
                    date: i32::deserialize(buf)?,
                })
            }
            types::UpdateShortChatMessage::CONSTRUCTOR_ID => {
                let flags = u32::deserialize(buf)?;
                Self::ShortChatMessage(types::UpdateShortChatMessage {
                    out: flags & (1 << 1) != 0,
                    id: i32::deserialize(buf)?,
                    from_id: i64::deserialize(buf)?,
                    chat_id: i64::deserialize(buf)?,
                    message: String::deserialize(buf)?,
                    pts: i32::deserialize(buf)?,
                    pts_count: i32::deserialize(buf)?,
                    date: i32::deserialize(buf)?,
                })
            }
            types::UpdateShort::CONSTRUCTOR_ID => Self::Short(types::UpdateShort {
                update: Update::deserialize(buf)?,
                date: i32::deserialize(buf)?,
            }),
            types::UpdatesCombined::CONSTRUCTOR_ID => Self::Combined(types::UpdatesCombined {
                updates: Vec::<Update>::deserialize(buf)?,
                users: Vec::<User>::deserialize(buf)?,
                chats: Vec::<Chat>::deserialize(buf)?,
                date: i32::deserialize(buf)?,
                seq_start: i32::deserialize(buf)?,
                seq: i32::deserialize(buf)?,
            }),
            types::Updates::CONSTRUCTOR_ID => Self::Updates(types::Updates {
                updates: Vec::<Update>::deserialize(buf)?,
                users: Vec::<User>::deserialize(buf)?,
                chats: Vec::<Chat>::deserialize(buf)?,
                date: i32::deserialize(buf)?,
                seq: i32::deserialize(buf)?,
            }),
            types::UpdateShortSentMessage::CONSTRUCTOR_ID => {
                let flags = u32::deserialize(buf)?;
                Self::ShortSentMessage(types::UpdateShortSentMessage {
                    out: flags & (1 << 1) != 0,
                    id: i32::deserialize(buf)?,
                    pts: i32::deserialize(buf)?,
                    pts_count: i32::deserialize(buf)?,
                    date: i32::deserialize(buf)?,
                })
            }
            _ => {
                let mut body = Vec::new();
                buf.read_to_end(&mut body)?;
                Self::Unknown {
                    constructor_id: id,
                    body,
                }
            }
        })
    }
}

/// The `ChannelMessagesFilter` type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChannelMessagesFilter {
    Empty,
}

impl ChannelMessagesFilter {
    const EMPTY_ID: u32 = 0x94d42ee7;
}

impl Serializable for ChannelMessagesFilter {
    fn serialize(&self, buf: &mut Vec<u8>) {
        match self {
            Self::Empty => Self::EMPTY_ID.serialize(buf),
        }
    }
}

impl Deserializable for ChannelMessagesFilter {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        Ok(match id {
            Self::EMPTY_ID => Self::Empty,
            _ => unexpected!(id),
        })
    }
}

pub mod auth {
    use super::*;

    /// The `auth.SentCodeType` type.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub enum SentCodeType {
        App { length: i32 },
        Sms { length: i32 },
    }

    impl SentCodeType {
        const APP_ID: u32 = 0x3dbb5986;
        const SMS_ID: u32 = 0xc000bba2;
    }

    impl Serializable for SentCodeType {
        fn serialize(&self, buf: &mut Vec<u8>) {
            match self {
                Self::App { length } => {
                    Self::APP_ID.serialize(buf);
                    length.serialize(buf);
                }
                Self::Sms { length } => {
                    Self::SMS_ID.serialize(buf);
                    length.serialize(buf);
                }
            }
        }
    }

    impl Deserializable for SentCodeType {
        fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
            let id = u32::deserialize(buf)?;
            Ok(match id {
                Self::APP_ID => Self::App {
                    length: i32::deserialize(buf)?,
                },
                Self::SMS_ID => Self::Sms {
                    length: i32::deserialize(buf)?,
                },
                _ => unexpected!(id),
            })
        }
    }

    /// The `auth.SentCode` type.
    #[derive(Clone, Debug, PartialEq)]
    pub enum SentCode {
        Code(types::auth::SentCode),
        Success(types::auth::SentCodeSuccess),
    }

    impl Serializable for SentCode {
        fn serialize(&self, buf: &mut Vec<u8>) {
            match self {
                Self::Code(x) => x.serialize(buf),
                Self::Success(x) => {
                    types::auth::SentCodeSuccess::CONSTRUCTOR_ID.serialize(buf);
                    x.authorization.serialize(buf);
                }
            }
        }
    }

    impl Deserializable for SentCode {
        fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
            let id = u32::deserialize(buf)?;
            Ok(match id {
                types::auth::SentCode::CONSTRUCTOR_ID => {
                    let flags = u32::deserialize(buf)?;
                    Self::Code(types::auth::SentCode {
                        r#type: SentCodeType::deserialize(buf)?,
                        phone_code_hash: String::deserialize(buf)?,
                        timeout: if flags & (1 << 2) != 0 {
                            Some(i32::deserialize(buf)?)
                        } else {
                            None
                        },
                    })
                }
                types::auth::SentCodeSuccess::CONSTRUCTOR_ID => {
                    Self::Success(types::auth::SentCodeSuccess {
                        authorization: Authorization::deserialize(buf)?,
                    })
                }
                _ => unexpected!(id),
            })
        }
    }

    /// The `auth.Authorization` type.
    #[derive(Clone, Debug, PartialEq)]
    pub enum Authorization {
        Authorization(types::auth::Authorization),
        SignUpRequired(types::auth::AuthorizationSignUpRequired),
    }

    impl Serializable for Authorization {
        fn serialize(&self, buf: &mut Vec<u8>) {
            match self {
                Self::Authorization(x) => x.serialize(buf),
                Self::SignUpRequired(_) => {
                    types::auth::AuthorizationSignUpRequired::CONSTRUCTOR_ID.serialize(buf);
                    0u32.serialize(buf);
                }
            }
        }
    }

    impl Deserializable for Authorization {
        fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
            let id = u32::deserialize(buf)?;
            Ok(match id {
                types::auth::Authorization::CONSTRUCTOR_ID => {
                    let flags = u32::deserialize(buf)?;
                    Self::Authorization(types::auth::Authorization {
                        tmp_sessions: if flags & 1 != 0 {
                            Some(i32::deserialize(buf)?)
                        } else {
                            None
                        },
                        user: types::User::deserialize(buf)?,
                    })
                }
                types::auth::AuthorizationSignUpRequired::CONSTRUCTOR_ID => {
                    let _flags = u32::deserialize(buf)?;
                    Self::SignUpRequired(types::auth::AuthorizationSignUpRequired {})
                }
                _ => unexpected!(id),
            })
        }
    }
}

pub mod updates {
    use super::*;

    /// The `updates.Difference` type.
    #[derive(Clone, Debug, PartialEq)]
    pub enum Difference {
        Empty(types::updates::DifferenceEmpty),
        Difference(types::updates::Difference),
        Slice(types::updates::DifferenceSlice),
        TooLong(types::updates::DifferenceTooLong),
    }

    impl Serializable for Difference {
        fn serialize(&self, buf: &mut Vec<u8>) {
            match self {
                Self::Empty(x) => {
                    types::updates::DifferenceEmpty::CONSTRUCTOR_ID.serialize(buf);
                    x.date.serialize(buf);
                    x.seq.serialize(buf);
                }
                Self::Difference(x) => {
                    types::updates::Difference::CONSTRUCTOR_ID.serialize(buf);
                    x.new_messages.serialize(buf);
                    x.new_encrypted_messages.serialize(buf);
                    x.other_updates.serialize(buf);
                    x.chats.serialize(buf);
                    x.users.serialize(buf);
                    x.state.serialize(buf);
                }
                Self::Slice(x) => {
                    types::updates::DifferenceSlice::CONSTRUCTOR_ID.serialize(buf);
                    x.new_messages.serialize(buf);
                    x.new_encrypted_messages.serialize(buf);
                    x.other_updates.serialize(buf);
                    x.chats.serialize(buf);
                    x.users.serialize(buf);
                    x.intermediate_state.serialize(buf);
                }
                Self::TooLong(x) => {
                    types::updates::DifferenceTooLong::CONSTRUCTOR_ID.serialize(buf);
                    x.pts.serialize(buf);
                }
            }
        }
    }

    impl Deserializable for Difference {
        fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
            let id = u32::deserialize(buf)?;
            Ok(match id {
                types::updates::DifferenceEmpty::CONSTRUCTOR_ID => {
                    Self::Empty(types::updates::DifferenceEmpty {
                        date: i32::deserialize(buf)?,
                        seq: i32::deserialize(buf)?,
                    })
                }
                types::updates::Difference::CONSTRUCTOR_ID => {
                    Self::Difference(types::updates::Difference {
                        new_messages: Vec::<Message>::deserialize(buf)?,
                        new_encrypted_messages: Vec::<EncryptedMessage>::deserialize(buf)?,
                        other_updates: Vec::<Update>::deserialize(buf)?,
                        chats: Vec::<Chat>::deserialize(buf)?,
                        users: Vec::<User>::deserialize(buf)?,
                        state: types::updates::State::deserialize(buf)?,
                    })
                }
                types::updates::DifferenceSlice::CONSTRUCTOR_ID => {
                    Self::Slice(types::updates::DifferenceSlice {
                        new_messages: Vec::<Message>::deserialize(buf)?,
                        new_encrypted_messages: Vec::<EncryptedMessage>::deserialize(buf)?,
                        other_updates: Vec::<Update>::deserialize(buf)?,
                        chats: Vec::<Chat>::deserialize(buf)?,
                        users: Vec::<User>::deserialize(buf)?,
                        intermediate_state: types::updates::State::deserialize(buf)?,
                    })
                }
                types::updates::DifferenceTooLong::CONSTRUCTOR_ID => {
                    Self::TooLong(types::updates::DifferenceTooLong {
                        pts: i32::deserialize(buf)?,
                    })
                }
                _ => unexpected!(id),
            })
        }
    }

    /// The `updates.ChannelDifference` type.
    #[derive(Clone, Debug, PartialEq)]
    pub enum ChannelDifference {
        Empty(types::updates::ChannelDifferenceEmpty),
        TooLong(types::updates::ChannelDifferenceTooLong),
        Difference(types::updates::ChannelDifference),
    }

    impl Serializable for ChannelDifference {
        fn serialize(&self, buf: &mut Vec<u8>) {
            match self {
                Self::Empty(x) => {
                    types::updates::ChannelDifferenceEmpty::CONSTRUCTOR_ID.serialize(buf);
                    let mut flags = 0u32;
                    flags |= if x.r#final { 1 } else { 0 };
                    flags |= if x.timeout.is_some() { 1 << 1 } else { 0 };
                    flags.serialize(buf);
                    x.pts.serialize(buf);
                    if let Some(t) = x.timeout {
                        t.serialize(buf);
                    }
                }
                Self::TooLong(x) => {
                    types::updates::ChannelDifferenceTooLong::CONSTRUCTOR_ID.serialize(buf);
                    let mut flags = 0u32;
                    flags |= if x.r#final { 1 } else { 0 };
                    flags |= if x.timeout.is_some() { 1 << 1 } else { 0 };
                    flags.serialize(buf);
                    if let Some(t) = x.timeout {
                        t.serialize(buf);
                    }
                    x.dialog.serialize(buf);
                    x.messages.serialize(buf);
                    x.chats.serialize(buf);
                    x.users.serialize(buf);
                }
                Self::Difference(x) => {
                    types::updates::ChannelDifference::CONSTRUCTOR_ID.serialize(buf);
                    let mut flags = 0u32;
                    flags |= if x.r#final { 1 } else { 0 };
                    flags |= if x.timeout.is_some() { 1 << 1 } else { 0 };
                    flags.serialize(buf);
                    x.pts.serialize(buf);
                    if let Some(t) = x.timeout {
                        t.serialize(buf);
                    }
                    x.new_messages.serialize(buf);
                    x.other_updates.serialize(buf);
                    x.chats.serialize(buf);
                    x.users.serialize(buf);
                }
            }
        }
    }

    impl Deserializable for ChannelDifference {
        fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
            let id = u32::deserialize(buf)?;
            Ok(match id {
                types::updates::ChannelDifferenceEmpty::CONSTRUCTOR_ID => {
                    let flags = u32::deserialize(buf)?;
                    Self::Empty(types::updates::ChannelDifferenceEmpty {
                        r#final: flags & 1 != 0,
                        pts: i32::deserialize(buf)?,
                        timeout: if flags & (1 << 1) != 0 {
                            Some(i32::deserialize(buf)?)
                        } else {
                            None
                        },
                    })
                }
                types::updates::ChannelDifferenceTooLong::CONSTRUCTOR_ID => {
                    let flags = u32::deserialize(buf)?;
                    Self::TooLong(types::updates::ChannelDifferenceTooLong {
                        r#final: flags & 1 != 0,
                        timeout: if flags & (1 << 1) != 0 {
                            Some(i32::deserialize(buf)?)
                        } else {
                            None
                        },
                        dialog: types::Dialog::deserialize(buf)?,
                        messages: Vec::<Message>::deserialize(buf)?,
                        chats: Vec::<Chat>::deserialize(buf)?,
                        users: Vec::<User>::deserialize(buf)?,
                    })
                }
                types::updates::ChannelDifference::CONSTRUCTOR_ID => {
                    let flags = u32::deserialize(buf)?;
                    Self::Difference(types::updates::ChannelDifference {
                        r#final: flags & 1 != 0,
                        pts: i32::deserialize(buf)?,
                        timeout: if flags & (1 << 1) != 0 {
                            Some(i32::deserialize(buf)?)
                        } else {
                            None
                        },
                        new_messages: Vec::<Message>::deserialize(buf)?,
                        other_updates: Vec::<Update>::deserialize(buf)?,
                        chats: Vec::<Chat>::deserialize(buf)?,
                        users: Vec::<User>::deserialize(buf)?,
                    })
                }
                _ => unexpected!(id),
            })
        }
    }
}

pub mod messages {
    use super::*;

    /// The `messages.Dialogs` type.
    #[derive(Clone, Debug, PartialEq)]
    pub enum Dialogs {
        Dialogs(types::messages::Dialogs),
        Slice(types::messages::DialogsSlice),
        NotModified { count: i32 },
    }

    impl Dialogs {
        const NOT_MODIFIED_ID: u32 = 0xf0e3e596;
    }

    impl Serializable for Dialogs {
        fn serialize(&self, buf: &mut Vec<u8>) {
            match self {
                Self::Dialogs(x) => {
                    types::messages::Dialogs::CONSTRUCTOR_ID.serialize(buf);
                    x.dialogs.serialize(buf);
                    x.messages.serialize(buf);
                    x.chats.serialize(buf);
                    x.users.serialize(buf);
                }
                Self::Slice(x) => {
                    types::messages::DialogsSlice::CONSTRUCTOR_ID.serialize(buf);
                    x.count.serialize(buf);
                    x.dialogs.serialize(buf);
                    x.messages.serialize(buf);
                    x.chats.serialize(buf);
                    x.users.serialize(buf);
                }
                Self::NotModified { count } => {
                    Self::NOT_MODIFIED_ID.serialize(buf);
                    count.serialize(buf);
                }
            }
        }
    }

    impl Deserializable for Dialogs {
        fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
            let id = u32::deserialize(buf)?;
            Ok(match id {
                types::messages::Dialogs::CONSTRUCTOR_ID => {
                    Self::Dialogs(types::messages::Dialogs {
                        dialogs: Vec::<types::Dialog>::deserialize(buf)?,
                        messages: Vec::<Message>::deserialize(buf)?,
                        chats: Vec::<Chat>::deserialize(buf)?,
                        users: Vec::<User>::deserialize(buf)?,
                    })
                }
                types::messages::DialogsSlice::CONSTRUCTOR_ID => {
                    Self::Slice(types::messages::DialogsSlice {
                        count: i32::deserialize(buf)?,
                        dialogs: Vec::<types::Dialog>::deserialize(buf)?,
                        messages: Vec::<Message>::deserialize(buf)?,
                        chats: Vec::<Chat>::deserialize(buf)?,
                        users: Vec::<User>::deserialize(buf)?,
                    })
                }
                Self::NOT_MODIFIED_ID => Self::NotModified {
                    count: i32::deserialize(buf)?,
                },
                _ => unexpected!(id),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peer_roundtrip() {
        let peer = Peer::Channel(types::PeerChannel { channel_id: 777 });
        assert_eq!(Peer::from_bytes(&peer.to_bytes()).unwrap(), peer);
    }

    #[test]
    fn user_roundtrip_with_flags() {
        let user = User::User(types::User {
            id: 42,
            access_hash: Some(0xdead),
            username: Some("Alice".into()),
            phone: Some("+12345".into()),
            ..Default::default()
        });
        assert_eq!(User::from_bytes(&user.to_bytes()).unwrap(), user);

        let bare = User::User(types::User {
            id: 7,
            ..Default::default()
        });
        assert_eq!(User::from_bytes(&bare.to_bytes()).unwrap(), bare);
    }

    #[test]
    fn updates_roundtrip() {
        let updates = Updates::Updates(types::Updates {
            updates: vec![Update::NewMessage(types::UpdateNewMessage {
                message: Message::Message(types::Message {
                    out: false,
                    id: 1,
                    from_id: None,
                    peer_id: Peer::User(types::PeerUser { user_id: 42 }),
                    date: 100,
                    message: "hi".into(),
                }),
                pts: 11,
                pts_count: 1,
            })],
            users: Vec::new(),
            chats: Vec::new(),
            date: 100,
            seq: 3,
        });
        assert_eq!(Updates::from_bytes(&updates.to_bytes()).unwrap(), updates);
    }

    #[test]
    fn unknown_updates_preserved() {
        let body = vec![0xde, 0xad, 0xbe, 0xef, 1, 2, 3, 4];
        match Updates::from_bytes(&body).unwrap() {
            Updates::Unknown {
                constructor_id,
                body,
            } => {
                assert_eq!(constructor_id, 0xefbeadde);
                assert_eq!(body, vec![1, 2, 3, 4]);
            }
            other => panic!("expected unknown, got {:?}", other),
        }
    }
}
