// Copyright 2025 - developers of the `telecraft` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;
use std::str::FromStr;
use telecraft_tl::{enums, types};

/// A reference to one of the three kinds of peers an account can talk to.
///
/// Basic groups (`Chat`) never carry an access hash; users and channels do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Peer {
    User(i64),
    Chat(i64),
    Channel(i64),
}

impl Peer {
    pub fn id(&self) -> i64 {
        match *self {
            Self::User(id) | Self::Chat(id) | Self::Channel(id) => id,
        }
    }

    pub fn from_tl(peer: &enums::Peer) -> Self {
        match peer {
            enums::Peer::User(p) => Self::User(p.user_id),
            enums::Peer::Chat(p) => Self::Chat(p.chat_id),
            enums::Peer::Channel(p) => Self::Channel(p.channel_id),
        }
    }

    pub fn to_tl(self) -> enums::Peer {
        match self {
            Self::User(user_id) => types::PeerUser { user_id }.into(),
            Self::Chat(chat_id) => types::PeerChat { chat_id }.into(),
            Self::Channel(channel_id) => types::PeerChannel { channel_id }.into(),
        }
    }

    /// The name used for this peer kind in persisted records.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::User(_) => "user",
            Self::Chat(_) => "chat",
            Self::Channel(_) => "channel",
        }
    }

    pub fn from_kind_name(kind: &str, id: i64) -> Option<Self> {
        Some(match kind {
            "user" => Self::User(id),
            "chat" => Self::Chat(id),
            "channel" => Self::Channel(id),
            _ => return None,
        })
    }
}

impl fmt::Display for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind_name(), self.id())
    }
}

/// What callers may supply to name a peer before it is resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PeerRef {
    /// An already-resolved peer.
    Peer(Peer),
    /// `"@name"`.
    Username(String),
    /// `"+phone"`.
    Phone(String),
    /// The account itself (`"self"`).
    Myself,
}

impl From<Peer> for PeerRef {
    fn from(peer: Peer) -> Self {
        Self::Peer(peer)
    }
}

/// The error when a peer reference string has no recognizable form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BadPeerRef(pub String);

impl fmt::Display for BadPeerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed peer reference: {:?}", self.0)
    }
}

impl std::error::Error for BadPeerRef {}

impl FromStr for PeerRef {
    type Err = BadPeerRef;

    /// Accepts `"self"`, `"@username"`, `"+phone"`, and the explicit
    /// `"user:ID"`, `"chat:ID"`, `"channel:ID"` forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "self" {
            return Ok(Self::Myself);
        }
        if let Some(name) = s.strip_prefix('@') {
            if name.is_empty() {
                return Err(BadPeerRef(s.to_string()));
            }
            return Ok(Self::Username(normalize_username(name)));
        }
        if s.starts_with('+') {
            let phone = normalize_phone(s);
            if phone.len() < 2 {
                return Err(BadPeerRef(s.to_string()));
            }
            return Ok(Self::Phone(phone));
        }
        if let Some((kind, id)) = s.split_once(':') {
            let id = id.parse::<i64>().map_err(|_| BadPeerRef(s.to_string()))?;
            if let Some(peer) = Peer::from_kind_name(kind, id) {
                return Ok(Self::Peer(peer));
            }
        }
        Err(BadPeerRef(s.to_string()))
    }
}

/// Lowercase the username and strip a leading `@`.
pub fn normalize_username(username: &str) -> String {
    username.trim_start_matches('@').to_lowercase()
}

/// Keep a leading `+` and digits only.
pub fn normalize_phone(phone: &str) -> String {
    let mut out = String::with_capacity(phone.len());
    if phone.starts_with('+') {
        out.push('+');
    }
    out.extend(phone.chars().filter(|c| c.is_ascii_digit()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_normalization() {
        assert_eq!(normalize_username("Alice"), "alice");
        assert_eq!(normalize_username("@ALICE"), "alice");
    }

    #[test]
    fn phone_normalization() {
        assert_eq!(normalize_phone("+1 (234) 567-89"), "+123456789");
        assert_eq!(normalize_phone("123 456"), "123456");
    }

    #[test]
    fn parse_references() {
        assert_eq!("self".parse(), Ok(PeerRef::Myself));
        assert_eq!("@Alice".parse(), Ok(PeerRef::Username("alice".into())));
        assert_eq!("+1 23".parse(), Ok(PeerRef::Phone("+123".into())));
        assert_eq!("user:42".parse(), Ok(PeerRef::Peer(Peer::User(42))));
        assert_eq!("chat:7".parse(), Ok(PeerRef::Peer(Peer::Chat(7))));
        assert_eq!(
            "channel:777".parse(),
            Ok(PeerRef::Peer(Peer::Channel(777)))
        );

        assert!("".parse::<PeerRef>().is_err());
        assert!("@".parse::<PeerRef>().is_err());
        assert!("group:1".parse::<PeerRef>().is_err());
        assert!("user:x".parse::<PeerRef>().is_err());
    }

    #[test]
    fn tl_conversion() {
        let peer = Peer::Channel(777);
        assert_eq!(Peer::from_tl(&peer.to_tl()), peer);
    }
}
