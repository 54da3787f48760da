// Copyright 2025 - developers of the `telecraft` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Concrete (`struct`) definitions for the schema subset the core
//! interprets. Optional fields the core never produces nor reads are left
//! out; their flag bits are simply never set on the wire.
use crate::deserialize::{self, Buffer, Deserializable};
use crate::{Identifiable, Serializable};

fn read_flag_string(flags: u32, bit: u32, buf: Buffer) -> deserialize::Result<Option<String>> {
    if flags & (1 << bit) != 0 {
        Ok(Some(String::deserialize(buf)?))
    } else {
        Ok(None)
    }
}

// ---------------------------------------------------------------------------
// Auth key exchange
// ---------------------------------------------------------------------------

/// ```tl
/// resPQ#05162463 nonce:int128 server_nonce:int128 pq:bytes
/// server_public_key_fingerprints:Vector<long> = ResPQ;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ResPq {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub pq: Vec<u8>,
    pub server_public_key_fingerprints: Vec<i64>,
}

impl Identifiable for ResPq {
    const CONSTRUCTOR_ID: u32 = 0x05162463;
}

impl Serializable for ResPq {
    fn serialize(&self, buf: &mut Vec<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.nonce.serialize(buf);
        self.server_nonce.serialize(buf);
        self.pq.serialize(buf);
        self.server_public_key_fingerprints.serialize(buf);
    }
}

impl Deserializable for ResPq {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(deserialize::Error::UnexpectedConstructor { id });
        }
        Ok(Self {
            nonce: <[u8; 16]>::deserialize(buf)?,
            server_nonce: <[u8; 16]>::deserialize(buf)?,
            pq: Vec::<u8>::deserialize(buf)?,
            server_public_key_fingerprints: Vec::<i64>::deserialize(buf)?,
        })
    }
}

/// ```tl
/// p_q_inner_data#83c95aec pq:bytes p:bytes q:bytes nonce:int128
/// server_nonce:int128 new_nonce:int256 = P_Q_inner_data;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PqInnerData {
    pub pq: Vec<u8>,
    pub p: Vec<u8>,
    pub q: Vec<u8>,
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub new_nonce: [u8; 32],
}

impl Identifiable for PqInnerData {
    const CONSTRUCTOR_ID: u32 = 0x83c95aec;
}

impl Serializable for PqInnerData {
    fn serialize(&self, buf: &mut Vec<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.pq.serialize(buf);
        self.p.serialize(buf);
        self.q.serialize(buf);
        self.nonce.serialize(buf);
        self.server_nonce.serialize(buf);
        self.new_nonce.serialize(buf);
    }
}

/// ```tl
/// server_DH_params_ok#d0e8075c nonce:int128 server_nonce:int128
/// encrypted_answer:bytes = Server_DH_Params;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ServerDhParamsOk {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub encrypted_answer: Vec<u8>,
}

impl Identifiable for ServerDhParamsOk {
    const CONSTRUCTOR_ID: u32 = 0xd0e8075c;
}

impl Serializable for ServerDhParamsOk {
    fn serialize(&self, buf: &mut Vec<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.nonce.serialize(buf);
        self.server_nonce.serialize(buf);
        self.encrypted_answer.serialize(buf);
    }
}

/// ```tl
/// server_DH_params_fail#79cb045d nonce:int128 server_nonce:int128
/// new_nonce_hash:int128 = Server_DH_Params;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ServerDhParamsFail {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub new_nonce_hash: [u8; 16],
}

impl Identifiable for ServerDhParamsFail {
    const CONSTRUCTOR_ID: u32 = 0x79cb045d;
}

impl Serializable for ServerDhParamsFail {
    fn serialize(&self, buf: &mut Vec<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.nonce.serialize(buf);
        self.server_nonce.serialize(buf);
        self.new_nonce_hash.serialize(buf);
    }
}

/// ```tl
/// server_DH_inner_data#b5890dba nonce:int128 server_nonce:int128 g:int
/// dh_prime:bytes g_a:bytes server_time:int = Server_DH_inner_data;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ServerDhInnerData {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub g: i32,
    pub dh_prime: Vec<u8>,
    pub g_a: Vec<u8>,
    pub server_time: i32,
}

impl Identifiable for ServerDhInnerData {
    const CONSTRUCTOR_ID: u32 = 0xb5890dba;
}

impl Serializable for ServerDhInnerData {
    fn serialize(&self, buf: &mut Vec<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.nonce.serialize(buf);
        self.server_nonce.serialize(buf);
        self.g.serialize(buf);
        self.dh_prime.serialize(buf);
        self.g_a.serialize(buf);
        self.server_time.serialize(buf);
    }
}

impl Deserializable for ServerDhInnerData {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(deserialize::Error::UnexpectedConstructor { id });
        }
        Ok(Self {
            nonce: <[u8; 16]>::deserialize(buf)?,
            server_nonce: <[u8; 16]>::deserialize(buf)?,
            g: i32::deserialize(buf)?,
            dh_prime: Vec::<u8>::deserialize(buf)?,
            g_a: Vec::<u8>::deserialize(buf)?,
            server_time: i32::deserialize(buf)?,
        })
    }
}

/// ```tl
/// client_DH_inner_data#6643b654 nonce:int128 server_nonce:int128
/// retry_id:long g_b:bytes = Client_DH_Inner_Data;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ClientDhInnerData {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub retry_id: i64,
    pub g_b: Vec<u8>,
}

impl Identifiable for ClientDhInnerData {
    const CONSTRUCTOR_ID: u32 = 0x6643b654;
}

impl Serializable for ClientDhInnerData {
    fn serialize(&self, buf: &mut Vec<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.nonce.serialize(buf);
        self.server_nonce.serialize(buf);
        self.retry_id.serialize(buf);
        self.g_b.serialize(buf);
    }
}

impl Deserializable for ClientDhInnerData {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(deserialize::Error::UnexpectedConstructor { id });
        }
        Ok(Self {
            nonce: <[u8; 16]>::deserialize(buf)?,
            server_nonce: <[u8; 16]>::deserialize(buf)?,
            retry_id: i64::deserialize(buf)?,
            g_b: Vec::<u8>::deserialize(buf)?,
        })
    }
}

/// ```tl
/// dh_gen_ok#3bcbf734 nonce:int128 server_nonce:int128
/// new_nonce_hash1:int128 = Set_client_DH_params_answer;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DhGenOk {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub new_nonce_hash1: [u8; 16],
}

impl Identifiable for DhGenOk {
    const CONSTRUCTOR_ID: u32 = 0x3bcbf734;
}

/// ```tl
/// dh_gen_retry#46dc1fb9 nonce:int128 server_nonce:int128
/// new_nonce_hash2:int128 = Set_client_DH_params_answer;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DhGenRetry {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub new_nonce_hash2: [u8; 16],
}

impl Identifiable for DhGenRetry {
    const CONSTRUCTOR_ID: u32 = 0x46dc1fb9;
}

/// ```tl
/// dh_gen_fail#a69dae02 nonce:int128 server_nonce:int128
/// new_nonce_hash3:int128 = Set_client_DH_params_answer;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DhGenFail {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub new_nonce_hash3: [u8; 16],
}

impl Identifiable for DhGenFail {
    const CONSTRUCTOR_ID: u32 = 0xa69dae02;
}

// ---------------------------------------------------------------------------
// Service messages
// ---------------------------------------------------------------------------

/// ```tl
/// rpc_error#2144ca19 error_code:int error_message:string = RpcError;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RpcError {
    pub error_code: i32,
    pub error_message: String,
}

impl Identifiable for RpcError {
    const CONSTRUCTOR_ID: u32 = 0x2144ca19;
}

impl Serializable for RpcError {
    fn serialize(&self, buf: &mut Vec<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.error_code.serialize(buf);
        self.error_message.serialize(buf);
    }
}

impl Deserializable for RpcError {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(deserialize::Error::UnexpectedConstructor { id });
        }
        Ok(Self {
            error_code: i32::deserialize(buf)?,
            error_message: String::deserialize(buf)?,
        })
    }
}

/// ```tl
/// pong#347773c5 msg_id:long ping_id:long = Pong;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Pong {
    pub msg_id: i64,
    pub ping_id: i64,
}

impl Identifiable for Pong {
    const CONSTRUCTOR_ID: u32 = 0x347773c5;
}

impl Serializable for Pong {
    fn serialize(&self, buf: &mut Vec<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.msg_id.serialize(buf);
        self.ping_id.serialize(buf);
    }
}

impl Deserializable for Pong {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(deserialize::Error::UnexpectedConstructor { id });
        }
        Ok(Self {
            msg_id: i64::deserialize(buf)?,
            ping_id: i64::deserialize(buf)?,
        })
    }
}

/// ```tl
/// bad_msg_notification#a7eff811 bad_msg_id:long bad_msg_seqno:int
/// error_code:int = BadMsgNotification;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct BadMsgNotification {
    pub bad_msg_id: i64,
    pub bad_msg_seqno: i32,
    pub error_code: i32,
}

impl Identifiable for BadMsgNotification {
    const CONSTRUCTOR_ID: u32 = 0xa7eff811;
}

impl Serializable for BadMsgNotification {
    fn serialize(&self, buf: &mut Vec<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.bad_msg_id.serialize(buf);
        self.bad_msg_seqno.serialize(buf);
        self.error_code.serialize(buf);
    }
}

/// ```tl
/// bad_server_salt#edab447b bad_msg_id:long bad_msg_seqno:int error_code:int
/// new_server_salt:long = BadMsgNotification;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct BadServerSalt {
    pub bad_msg_id: i64,
    pub bad_msg_seqno: i32,
    pub error_code: i32,
    pub new_server_salt: i64,
}

impl Identifiable for BadServerSalt {
    const CONSTRUCTOR_ID: u32 = 0xedab447b;
}

impl Serializable for BadServerSalt {
    fn serialize(&self, buf: &mut Vec<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.bad_msg_id.serialize(buf);
        self.bad_msg_seqno.serialize(buf);
        self.error_code.serialize(buf);
        self.new_server_salt.serialize(buf);
    }
}

/// ```tl
/// new_session_created#9ec20908 first_msg_id:long unique_id:long
/// server_salt:long = NewSession;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct NewSessionCreated {
    pub first_msg_id: i64,
    pub unique_id: i64,
    pub server_salt: i64,
}

impl Identifiable for NewSessionCreated {
    const CONSTRUCTOR_ID: u32 = 0x9ec20908;
}

impl Serializable for NewSessionCreated {
    fn serialize(&self, buf: &mut Vec<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.first_msg_id.serialize(buf);
        self.unique_id.serialize(buf);
        self.server_salt.serialize(buf);
    }
}

impl Deserializable for NewSessionCreated {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(deserialize::Error::UnexpectedConstructor { id });
        }
        Ok(Self {
            first_msg_id: i64::deserialize(buf)?,
            unique_id: i64::deserialize(buf)?,
            server_salt: i64::deserialize(buf)?,
        })
    }
}

/// ```tl
/// msgs_ack#62d6b459 msg_ids:Vector<long> = MsgsAck;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MsgsAck {
    pub msg_ids: Vec<i64>,
}

impl Identifiable for MsgsAck {
    const CONSTRUCTOR_ID: u32 = 0x62d6b459;
}

impl Serializable for MsgsAck {
    fn serialize(&self, buf: &mut Vec<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.msg_ids.serialize(buf);
    }
}

impl Deserializable for MsgsAck {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(deserialize::Error::UnexpectedConstructor { id });
        }
        Ok(Self {
            msg_ids: Vec::<i64>::deserialize(buf)?,
        })
    }
}

/// ```tl
/// future_salt#0949d9dc valid_since:int valid_until:int salt:long = FutureSalt;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FutureSalt {
    pub valid_since: i32,
    pub valid_until: i32,
    pub salt: i64,
}

impl Identifiable for FutureSalt {
    const CONSTRUCTOR_ID: u32 = 0x0949d9dc;
}

impl Deserializable for FutureSalt {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(deserialize::Error::UnexpectedConstructor { id });
        }
        Ok(Self {
            valid_since: i32::deserialize(buf)?,
            valid_until: i32::deserialize(buf)?,
            salt: i64::deserialize(buf)?,
        })
    }
}

/// ```tl
/// future_salts#ae500895 req_msg_id:long now:int salts:vector<future_salt>
/// = FutureSalts;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FutureSalts {
    pub req_msg_id: i64,
    pub now: i32,
    pub salts: Vec<FutureSalt>,
}

impl Identifiable for FutureSalts {
    const CONSTRUCTOR_ID: u32 = 0xae500895;
}

impl Deserializable for FutureSalts {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(deserialize::Error::UnexpectedConstructor { id });
        }
        Ok(Self {
            req_msg_id: i64::deserialize(buf)?,
            now: i32::deserialize(buf)?,
            salts: crate::RawVec::<FutureSalt>::deserialize(buf)?.0,
        })
    }
}

/// ```tl
/// msg_detailed_info#276d3ec6 msg_id:long answer_msg_id:long bytes:int
/// status:int = MsgDetailedInfo;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MsgDetailedInfo {
    pub msg_id: i64,
    pub answer_msg_id: i64,
    pub bytes: i32,
    pub status: i32,
}

impl Identifiable for MsgDetailedInfo {
    const CONSTRUCTOR_ID: u32 = 0x276d3ec6;
}

impl Deserializable for MsgDetailedInfo {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(deserialize::Error::UnexpectedConstructor { id });
        }
        Ok(Self {
            msg_id: i64::deserialize(buf)?,
            answer_msg_id: i64::deserialize(buf)?,
            bytes: i32::deserialize(buf)?,
            status: i32::deserialize(buf)?,
        })
    }
}

/// ```tl
/// msg_new_detailed_info#809db6df answer_msg_id:long bytes:int
/// status:int = MsgDetailedInfo;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MsgNewDetailedInfo {
    pub answer_msg_id: i64,
    pub bytes: i32,
    pub status: i32,
}

impl Identifiable for MsgNewDetailedInfo {
    const CONSTRUCTOR_ID: u32 = 0x809db6df;
}

impl Deserializable for MsgNewDetailedInfo {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(deserialize::Error::UnexpectedConstructor { id });
        }
        Ok(Self {
            answer_msg_id: i64::deserialize(buf)?,
            bytes: i32::deserialize(buf)?,
            status: i32::deserialize(buf)?,
        })
    }
}

/// ```tl
/// msgs_state_req#da69fb52 msg_ids:Vector<long> = MsgsStateReq;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MsgsStateReq {
    pub msg_ids: Vec<i64>,
}

impl Identifiable for MsgsStateReq {
    const CONSTRUCTOR_ID: u32 = 0xda69fb52;
}

/// ```tl
/// msgs_state_info#04deb57d req_msg_id:long info:bytes = MsgsStateInfo;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MsgsStateInfo {
    pub req_msg_id: i64,
    pub info: Vec<u8>,
}

impl Identifiable for MsgsStateInfo {
    const CONSTRUCTOR_ID: u32 = 0x04deb57d;
}

/// ```tl
/// msgs_all_info#8cc0d131 msg_ids:Vector<long> info:bytes = MsgsAllInfo;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MsgsAllInfo {
    pub msg_ids: Vec<i64>,
    pub info: Vec<u8>,
}

impl Identifiable for MsgsAllInfo {
    const CONSTRUCTOR_ID: u32 = 0x8cc0d131;
}

/// ```tl
/// msg_resend_req#7d861a08 msg_ids:Vector<long> = MsgResendReq;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MsgResendReq {
    pub msg_ids: Vec<i64>,
}

impl Identifiable for MsgResendReq {
    const CONSTRUCTOR_ID: u32 = 0x7d861a08;
}

// ---------------------------------------------------------------------------
// Peers
// ---------------------------------------------------------------------------

/// ```tl
/// peerUser#59511722 user_id:long = Peer;
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeerUser {
    pub user_id: i64,
}

impl Identifiable for PeerUser {
    const CONSTRUCTOR_ID: u32 = 0x59511722;
}

/// ```tl
/// peerChat#36c6019a chat_id:long = Peer;
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeerChat {
    pub chat_id: i64,
}

impl Identifiable for PeerChat {
    const CONSTRUCTOR_ID: u32 = 0x36c6019a;
}

/// ```tl
/// peerChannel#a2a5371e channel_id:long = Peer;
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeerChannel {
    pub channel_id: i64,
}

impl Identifiable for PeerChannel {
    const CONSTRUCTOR_ID: u32 = 0xa2a5371e;
}

/// ```tl
/// inputPeerUser#dde8a54c user_id:long access_hash:long = InputPeer;
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputPeerUser {
    pub user_id: i64,
    pub access_hash: i64,
}

impl Identifiable for InputPeerUser {
    const CONSTRUCTOR_ID: u32 = 0xdde8a54c;
}

/// ```tl
/// inputPeerChat#35a95cb9 chat_id:long = InputPeer;
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputPeerChat {
    pub chat_id: i64,
}

impl Identifiable for InputPeerChat {
    const CONSTRUCTOR_ID: u32 = 0x35a95cb9;
}

/// ```tl
/// inputPeerChannel#27bcbbfc channel_id:long access_hash:long = InputPeer;
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputPeerChannel {
    pub channel_id: i64,
    pub access_hash: i64,
}

impl Identifiable for InputPeerChannel {
    const CONSTRUCTOR_ID: u32 = 0x27bcbbfc;
}

/// ```tl
/// inputUser#f21158c6 user_id:long access_hash:long = InputUser;
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputUser {
    pub user_id: i64,
    pub access_hash: i64,
}

impl Identifiable for InputUser {
    const CONSTRUCTOR_ID: u32 = 0xf21158c6;
}

/// ```tl
/// inputChannel#f35aec28 channel_id:long access_hash:long = InputChannel;
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputChannel {
    pub channel_id: i64,
    pub access_hash: i64,
}

impl Identifiable for InputChannel {
    const CONSTRUCTOR_ID: u32 = 0xf35aec28;
}

// ---------------------------------------------------------------------------
// Users and chats (reduced shapes; see crate docs)
// ---------------------------------------------------------------------------

/// ```tl
/// user#215c4438 flags:# self:flags.10?true bot:flags.14?true
/// min:flags.20?true id:long access_hash:flags.0?long
/// first_name:flags.1?string last_name:flags.2?string
/// username:flags.3?string phone:flags.4?string = User;
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub struct User {
    pub is_self: bool,
    pub bot: bool,
    pub min: bool,
    pub id: i64,
    pub access_hash: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub phone: Option<String>,
    /// Extra active usernames (collectible usernames vector).
    pub usernames: Vec<String>,
}

impl Identifiable for User {
    const CONSTRUCTOR_ID: u32 = 0x215c4438;
}

impl User {
    const EXTRA_USERNAMES: u32 = 1 << 21;
}

impl Serializable for User {
    fn serialize(&self, buf: &mut Vec<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        let mut flags = 0u32;
        flags |= if self.access_hash.is_some() { 1 } else { 0 };
        flags |= if self.first_name.is_some() { 1 << 1 } else { 0 };
        flags |= if self.last_name.is_some() { 1 << 2 } else { 0 };
        flags |= if self.username.is_some() { 1 << 3 } else { 0 };
        flags |= if self.phone.is_some() { 1 << 4 } else { 0 };
        flags |= if self.is_self { 1 << 10 } else { 0 };
        flags |= if self.bot { 1 << 14 } else { 0 };
        flags |= if self.min { 1 << 20 } else { 0 };
        flags |= if !self.usernames.is_empty() {
            Self::EXTRA_USERNAMES
        } else {
            0
        };
        flags.serialize(buf);
        self.id.serialize(buf);
        if let Some(x) = self.access_hash {
            x.serialize(buf);
        }
        if let Some(ref x) = self.first_name {
            x.serialize(buf);
        }
        if let Some(ref x) = self.last_name {
            x.serialize(buf);
        }
        if let Some(ref x) = self.username {
            x.serialize(buf);
        }
        if let Some(ref x) = self.phone {
            x.serialize(buf);
        }
        if !self.usernames.is_empty() {
            self.usernames.serialize(buf);
        }
    }
}

impl Deserializable for User {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(deserialize::Error::UnexpectedConstructor { id });
        }
        let flags = u32::deserialize(buf)?;
        Ok(Self {
            is_self: flags & (1 << 10) != 0,
            bot: flags & (1 << 14) != 0,
            min: flags & (1 << 20) != 0,
            id: i64::deserialize(buf)?,
            access_hash: if flags & 1 != 0 {
                Some(i64::deserialize(buf)?)
            } else {
                None
            },
            first_name: read_flag_string(flags, 1, buf)?,
            last_name: read_flag_string(flags, 2, buf)?,
            username: read_flag_string(flags, 3, buf)?,
            phone: read_flag_string(flags, 4, buf)?,
            usernames: if flags & Self::EXTRA_USERNAMES != 0 {
                Vec::<String>::deserialize(buf)?
            } else {
                Vec::new()
            },
        })
    }
}

/// ```tl
/// userEmpty#d9ccc4ef id:long = User;
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UserEmpty {
    pub id: i64,
}

impl Identifiable for UserEmpty {
    const CONSTRUCTOR_ID: u32 = 0xd9ccc4ef;
}

/// ```tl
/// chat#41cbf256 flags:# id:long title:string participants_count:int
/// date:int version:int = Chat;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Chat {
    pub id: i64,
    pub title: String,
    pub participants_count: i32,
    pub date: i32,
    pub version: i32,
}

impl Identifiable for Chat {
    const CONSTRUCTOR_ID: u32 = 0x41cbf256;
}

impl Serializable for Chat {
    fn serialize(&self, buf: &mut Vec<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        0u32.serialize(buf);
        self.id.serialize(buf);
        self.title.serialize(buf);
        self.participants_count.serialize(buf);
        self.date.serialize(buf);
        self.version.serialize(buf);
    }
}

impl Deserializable for Chat {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(deserialize::Error::UnexpectedConstructor { id });
        }
        let _flags = u32::deserialize(buf)?;
        Ok(Self {
            id: i64::deserialize(buf)?,
            title: String::deserialize(buf)?,
            participants_count: i32::deserialize(buf)?,
            date: i32::deserialize(buf)?,
            version: i32::deserialize(buf)?,
        })
    }
}

/// ```tl
/// chatForbidden#6592a1a7 id:long title:string = Chat;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ChatForbidden {
    pub id: i64,
    pub title: String,
}

impl Identifiable for ChatForbidden {
    const CONSTRUCTOR_ID: u32 = 0x6592a1a7;
}

/// ```tl
/// channel#fe4478bd flags:# broadcast:flags.5?true megagroup:flags.8?true
/// min:flags.12?true id:long access_hash:flags.13?long title:string
/// username:flags.6?string = Chat;
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Channel {
    pub broadcast: bool,
    pub megagroup: bool,
    pub min: bool,
    pub id: i64,
    pub access_hash: Option<i64>,
    pub title: String,
    pub username: Option<String>,
    /// Extra active usernames (collectible usernames vector).
    pub usernames: Vec<String>,
}

impl Identifiable for Channel {
    const CONSTRUCTOR_ID: u32 = 0xfe4478bd;
}

impl Channel {
    const EXTRA_USERNAMES: u32 = 1 << 21;
}

impl Serializable for Channel {
    fn serialize(&self, buf: &mut Vec<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        let mut flags = 0u32;
        flags |= if self.broadcast { 1 << 5 } else { 0 };
        flags |= if self.username.is_some() { 1 << 6 } else { 0 };
        flags |= if self.megagroup { 1 << 8 } else { 0 };
        flags |= if self.min { 1 << 12 } else { 0 };
        flags |= if self.access_hash.is_some() { 1 << 13 } else { 0 };
        flags |= if !self.usernames.is_empty() {
            Self::EXTRA_USERNAMES
        } else {
            0
        };
        flags.serialize(buf);
        self.id.serialize(buf);
        if let Some(x) = self.access_hash {
            x.serialize(buf);
        }
        self.title.serialize(buf);
        if let Some(ref x) = self.username {
            x.serialize(buf);
        }
        if !self.usernames.is_empty() {
            self.usernames.serialize(buf);
        }
    }
}

impl Deserializable for Channel {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(deserialize::Error::UnexpectedConstructor { id });
        }
        let flags = u32::deserialize(buf)?;
        Ok(Self {
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
            username: read_flag_string(flags, 6, buf)?,
            usernames: if flags & Self::EXTRA_USERNAMES != 0 {
                Vec::<String>::deserialize(buf)?
            } else {
                Vec::new()
            },
        })
    }
}

/// ```tl
/// channelForbidden#17d493d5 flags:# broadcast:flags.5?true
/// megagroup:flags.8?true id:long access_hash:long title:string = Chat;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelForbidden {
    pub broadcast: bool,
    pub megagroup: bool,
    pub id: i64,
    pub access_hash: i64,
    pub title: String,
}

impl Identifiable for ChannelForbidden {
    const CONSTRUCTOR_ID: u32 = 0x17d493d5;
}

impl Serializable for ChannelForbidden {
    fn serialize(&self, buf: &mut Vec<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        let mut flags = 0u32;
        flags |= if self.broadcast { 1 << 5 } else { 0 };
        flags |= if self.megagroup { 1 << 8 } else { 0 };
        flags.serialize(buf);
        self.id.serialize(buf);
        self.access_hash.serialize(buf);
        self.title.serialize(buf);
    }
}

impl Deserializable for ChannelForbidden {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(deserialize::Error::UnexpectedConstructor { id });
        }
        let flags = u32::deserialize(buf)?;
        Ok(Self {
            broadcast: flags & (1 << 5) != 0,
            megagroup: flags & (1 << 8) != 0,
            id: i64::deserialize(buf)?,
            access_hash: i64::deserialize(buf)?,
            title: String::deserialize(buf)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Messages (reduced shapes)
// ---------------------------------------------------------------------------

/// ```tl
/// message#94345242 flags:# out:flags.1?true id:int from_id:flags.8?Peer
/// peer_id:Peer date:int message:string = Message;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub out: bool,
    pub id: i32,
    pub from_id: Option<crate::enums::Peer>,
    pub peer_id: crate::enums::Peer,
    pub date: i32,
    pub message: String,
}

impl Identifiable for Message {
    const CONSTRUCTOR_ID: u32 = 0x94345242;
}

impl Serializable for Message {
    fn serialize(&self, buf: &mut Vec<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        let mut flags = 0u32;
        flags |= if self.out { 1 << 1 } else { 0 };
        flags |= if self.from_id.is_some() { 1 << 8 } else { 0 };
        flags.serialize(buf);
        self.id.serialize(buf);
        if let Some(ref x) = self.from_id {
            x.serialize(buf);
        }
        self.peer_id.serialize(buf);
        self.date.serialize(buf);
        self.message.serialize(buf);
    }
}

impl Deserializable for Message {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(deserialize::Error::UnexpectedConstructor { id });
        }
        let flags = u32::deserialize(buf)?;
        Ok(Self {
            out: flags & (1 << 1) != 0,
            id: i32::deserialize(buf)?,
            from_id: if flags & (1 << 8) != 0 {
                Some(crate::enums::Peer::deserialize(buf)?)
            } else {
                None
            },
            peer_id: crate::enums::Peer::deserialize(buf)?,
            date: i32::deserialize(buf)?,
            message: String::deserialize(buf)?,
        })
    }
}

/// ```tl
/// messageEmpty#90a6ca84 flags:# id:int peer_id:flags.0?Peer = Message;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MessageEmpty {
    pub id: i32,
    pub peer_id: Option<crate::enums::Peer>,
}

impl Identifiable for MessageEmpty {
    const CONSTRUCTOR_ID: u32 = 0x90a6ca84;
}

/// ```tl
/// messageService#2b085862 flags:# out:flags.1?true id:int
/// from_id:flags.8?Peer peer_id:Peer date:int action:MessageAction = Message;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MessageService {
    pub out: bool,
    pub id: i32,
    pub from_id: Option<crate::enums::Peer>,
    pub peer_id: crate::enums::Peer,
    pub date: i32,
    pub action: crate::enums::MessageAction,
}

impl Identifiable for MessageService {
    const CONSTRUCTOR_ID: u32 = 0x2b085862;
}

impl Serializable for MessageService {
    fn serialize(&self, buf: &mut Vec<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        let mut flags = 0u32;
        flags |= if self.out { 1 << 1 } else { 0 };
        flags |= if self.from_id.is_some() { 1 << 8 } else { 0 };
        flags.serialize(buf);
        self.id.serialize(buf);
        if let Some(ref x) = self.from_id {
            x.serialize(buf);
        }
        self.peer_id.serialize(buf);
        self.date.serialize(buf);
        self.action.serialize(buf);
    }
}

impl Deserializable for MessageService {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(deserialize::Error::UnexpectedConstructor { id });
        }
        let flags = u32::deserialize(buf)?;
        Ok(Self {
            out: flags & (1 << 1) != 0,
            id: i32::deserialize(buf)?,
            from_id: if flags & (1 << 8) != 0 {
                Some(crate::enums::Peer::deserialize(buf)?)
            } else {
                None
            },
            peer_id: crate::enums::Peer::deserialize(buf)?,
            date: i32::deserialize(buf)?,
            action: crate::enums::MessageAction::deserialize(buf)?,
        })
    }
}

/// ```tl
/// encryptedMessageService#23734b06 random_id:long chat_id:int date:int
/// bytes:bytes = EncryptedMessage;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct EncryptedMessageService {
    pub random_id: i64,
    pub chat_id: i32,
    pub date: i32,
    pub bytes: Vec<u8>,
}

impl Identifiable for EncryptedMessageService {
    const CONSTRUCTOR_ID: u32 = 0x23734b06;
}

// ---------------------------------------------------------------------------
// Dialogs (reduced shape)
// ---------------------------------------------------------------------------

/// ```tl
/// dialog#d58a08c6 flags:# peer:Peer top_message:int pts:flags.0?int = Dialog;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Dialog {
    pub peer: crate::enums::Peer,
    pub top_message: i32,
    pub pts: Option<i32>,
}

impl Identifiable for Dialog {
    const CONSTRUCTOR_ID: u32 = 0xd58a08c6;
}

impl Serializable for Dialog {
    fn serialize(&self, buf: &mut Vec<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        let flags = if self.pts.is_some() { 1u32 } else { 0 };
        flags.serialize(buf);
        self.peer.serialize(buf);
        self.top_message.serialize(buf);
        if let Some(x) = self.pts {
            x.serialize(buf);
        }
    }
}

impl Deserializable for Dialog {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(deserialize::Error::UnexpectedConstructor { id });
        }
        let flags = u32::deserialize(buf)?;
        Ok(Self {
            peer: crate::enums::Peer::deserialize(buf)?,
            top_message: i32::deserialize(buf)?,
            pts: if flags & 1 != 0 {
                Some(i32::deserialize(buf)?)
            } else {
                None
            },
        })
    }
}

// ---------------------------------------------------------------------------
// Auth flow
// ---------------------------------------------------------------------------

/// ```tl
/// codeSettings#ad253d78 flags:# allow_flashcall:flags.0?true
/// current_number:flags.1?true allow_app_hash:flags.4?true = CodeSettings;
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct CodeSettings {
    pub allow_flashcall: bool,
    pub current_number: bool,
    pub allow_app_hash: bool,
}

impl Identifiable for CodeSettings {
    const CONSTRUCTOR_ID: u32 = 0xad253d78;
}

impl Serializable for CodeSettings {
    fn serialize(&self, buf: &mut Vec<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        let mut flags = 0u32;
        flags |= if self.allow_flashcall { 1 } else { 0 };
        flags |= if self.current_number { 1 << 1 } else { 0 };
        flags |= if self.allow_app_hash { 1 << 4 } else { 0 };
        flags.serialize(buf);
    }
}

impl Deserializable for CodeSettings {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(deserialize::Error::UnexpectedConstructor { id });
        }
        let flags = u32::deserialize(buf)?;
        Ok(Self {
            allow_flashcall: flags & 1 != 0,
            current_number: flags & (1 << 1) != 0,
            allow_app_hash: flags & (1 << 4) != 0,
        })
    }
}

/// ```tl
/// inputCheckPasswordSRP#d27ff082 srp_id:long A:bytes M1:bytes
/// = InputCheckPasswordSRP;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct InputCheckPasswordSrp {
    pub srp_id: i64,
    pub a: Vec<u8>,
    pub m1: Vec<u8>,
}

impl Identifiable for InputCheckPasswordSrp {
    const CONSTRUCTOR_ID: u32 = 0xd27ff082;
}

impl Serializable for InputCheckPasswordSrp {
    fn serialize(&self, buf: &mut Vec<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.srp_id.serialize(buf);
        self.a.serialize(buf);
        self.m1.serialize(buf);
    }
}

impl Deserializable for InputCheckPasswordSrp {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(deserialize::Error::UnexpectedConstructor { id });
        }
        Ok(Self {
            srp_id: i64::deserialize(buf)?,
            a: Vec::<u8>::deserialize(buf)?,
            m1: Vec::<u8>::deserialize(buf)?,
        })
    }
}

/// ```tl
/// passwordKdfAlgoSHA256SHA256PBKDF2HMACSHA512iter100000SHA256ModPow#3a912d4a
/// salt1:bytes salt2:bytes g:int p:bytes = PasswordKdfAlgo;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PasswordKdfAlgoModPow {
    pub salt1: Vec<u8>,
    pub salt2: Vec<u8>,
    pub g: i32,
    pub p: Vec<u8>,
}

impl Identifiable for PasswordKdfAlgoModPow {
    const CONSTRUCTOR_ID: u32 = 0x3a912d4a;
}

impl Serializable for PasswordKdfAlgoModPow {
    fn serialize(&self, buf: &mut Vec<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.salt1.serialize(buf);
        self.salt2.serialize(buf);
        self.g.serialize(buf);
        self.p.serialize(buf);
    }
}

impl Deserializable for PasswordKdfAlgoModPow {
    fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(deserialize::Error::UnexpectedConstructor { id });
        }
        Ok(Self {
            salt1: Vec::<u8>::deserialize(buf)?,
            salt2: Vec::<u8>::deserialize(buf)?,
            g: i32::deserialize(buf)?,
            p: Vec::<u8>::deserialize(buf)?,
        })
    }
}

pub mod auth {
    use super::*;

    /// ```tl
    /// auth.sentCode#5e002502 flags:# type:auth.SentCodeType
    /// phone_code_hash:string timeout:flags.2?int = auth.SentCode;
    /// ```
    #[derive(Clone, Debug, PartialEq)]
    pub struct SentCode {
        pub r#type: crate::enums::auth::SentCodeType,
        pub phone_code_hash: String,
        pub timeout: Option<i32>,
    }

    impl Identifiable for SentCode {
        const CONSTRUCTOR_ID: u32 = 0x5e002502;
    }

    impl Serializable for SentCode {
        fn serialize(&self, buf: &mut Vec<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
            let flags = if self.timeout.is_some() { 1u32 << 2 } else { 0 };
            flags.serialize(buf);
            self.r#type.serialize(buf);
            self.phone_code_hash.serialize(buf);
            if let Some(x) = self.timeout {
                x.serialize(buf);
            }
        }
    }

    impl Deserializable for SentCode {
        fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
            let id = u32::deserialize(buf)?;
            if id != Self::CONSTRUCTOR_ID {
                return Err(deserialize::Error::UnexpectedConstructor { id });
            }
            let flags = u32::deserialize(buf)?;
            Ok(Self {
                r#type: crate::enums::auth::SentCodeType::deserialize(buf)?,
                phone_code_hash: String::deserialize(buf)?,
                timeout: if flags & (1 << 2) != 0 {
                    Some(i32::deserialize(buf)?)
                } else {
                    None
                },
            })
        }
    }

    /// ```tl
    /// auth.sentCodeSuccess#2390fe44 authorization:auth.Authorization
    /// = auth.SentCode;
    /// ```
    #[derive(Clone, Debug, PartialEq)]
    pub struct SentCodeSuccess {
        pub authorization: crate::enums::auth::Authorization,
    }

    impl Identifiable for SentCodeSuccess {
        const CONSTRUCTOR_ID: u32 = 0x2390fe44;
    }

    /// ```tl
    /// auth.authorization#2ea2c0d4 flags:# tmp_sessions:flags.0?int
    /// user:User = auth.Authorization;
    /// ```
    #[derive(Clone, Debug, PartialEq)]
    pub struct Authorization {
        pub tmp_sessions: Option<i32>,
        pub user: crate::types::User,
    }

    impl Identifiable for Authorization {
        const CONSTRUCTOR_ID: u32 = 0x2ea2c0d4;
    }

    impl Serializable for Authorization {
        fn serialize(&self, buf: &mut Vec<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
            let flags = if self.tmp_sessions.is_some() { 1u32 } else { 0 };
            flags.serialize(buf);
            if let Some(x) = self.tmp_sessions {
                x.serialize(buf);
            }
            self.user.serialize(buf);
        }
    }

    impl Deserializable for Authorization {
        fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
            let id = u32::deserialize(buf)?;
            if id != Self::CONSTRUCTOR_ID {
                return Err(deserialize::Error::UnexpectedConstructor { id });
            }
            let flags = u32::deserialize(buf)?;
            Ok(Self {
                tmp_sessions: if flags & 1 != 0 {
                    Some(i32::deserialize(buf)?)
                } else {
                    None
                },
                user: crate::types::User::deserialize(buf)?,
            })
        }
    }

    /// ```tl
    /// auth.authorizationSignUpRequired#44747e9a flags:#
    /// = auth.Authorization;
    /// ```
    #[derive(Clone, Debug, PartialEq, Default)]
    pub struct AuthorizationSignUpRequired {}

    impl Identifiable for AuthorizationSignUpRequired {
        const CONSTRUCTOR_ID: u32 = 0x44747e9a;
    }

    /// ```tl
    /// auth.loggedOut#c3a2835f flags:# = auth.LoggedOut;
    /// ```
    #[derive(Clone, Debug, PartialEq, Default)]
    pub struct LoggedOut {}

    impl Identifiable for LoggedOut {
        const CONSTRUCTOR_ID: u32 = 0xc3a2835f;
    }

    impl Serializable for LoggedOut {
        fn serialize(&self, buf: &mut Vec<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
            0u32.serialize(buf);
        }
    }

    impl Deserializable for LoggedOut {
        fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
            let id = u32::deserialize(buf)?;
            if id != Self::CONSTRUCTOR_ID {
                return Err(deserialize::Error::UnexpectedConstructor { id });
            }
            let _flags = u32::deserialize(buf)?;
            Ok(Self {})
        }
    }
}

pub mod account {
    use super::*;

    /// ```tl
    /// account.password#957b50fb flags:# has_password:flags.2?true
    /// current_algo:flags.2?PasswordKdfAlgo srp_B:flags.2?bytes
    /// srp_id:flags.2?long = account.Password;
    /// ```
    #[derive(Clone, Debug, PartialEq, Default)]
    pub struct Password {
        pub has_password: bool,
        pub current_algo: Option<crate::types::PasswordKdfAlgoModPow>,
        pub srp_b: Option<Vec<u8>>,
        pub srp_id: Option<i64>,
    }

    impl Identifiable for Password {
        const CONSTRUCTOR_ID: u32 = 0x957b50fb;
    }

    impl Serializable for Password {
        fn serialize(&self, buf: &mut Vec<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
            let flags = if self.has_password { 1u32 << 2 } else { 0 };
            flags.serialize(buf);
            if self.has_password {
                if let Some(ref x) = self.current_algo {
                    x.serialize(buf);
                }
                if let Some(ref x) = self.srp_b {
                    x.serialize(buf);
                }
                if let Some(x) = self.srp_id {
                    x.serialize(buf);
                }
            }
        }
    }

    impl Deserializable for Password {
        fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
            let id = u32::deserialize(buf)?;
            if id != Self::CONSTRUCTOR_ID {
                return Err(deserialize::Error::UnexpectedConstructor { id });
            }
            let flags = u32::deserialize(buf)?;
            let has_password = flags & (1 << 2) != 0;
            Ok(if has_password {
                Self {
                    has_password,
                    current_algo: Some(crate::types::PasswordKdfAlgoModPow::deserialize(buf)?),
                    srp_b: Some(Vec::<u8>::deserialize(buf)?),
                    srp_id: Some(i64::deserialize(buf)?),
                }
            } else {
                Self {
                    has_password,
                    current_algo: None,
                    srp_b: None,
                    srp_id: None,
                }
            })
        }
    }
}

pub mod updates {
    use super::*;

    /// ```tl
    /// updates.state#a56c2a3e pts:int qts:int date:int seq:int
    /// unread_count:int = updates.State;
    /// ```
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct State {
        pub pts: i32,
        pub qts: i32,
        pub date: i32,
        pub seq: i32,
        pub unread_count: i32,
    }

    impl Identifiable for State {
        const CONSTRUCTOR_ID: u32 = 0xa56c2a3e;
    }

    impl Serializable for State {
        fn serialize(&self, buf: &mut Vec<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
            self.pts.serialize(buf);
            self.qts.serialize(buf);
            self.date.serialize(buf);
            self.seq.serialize(buf);
            self.unread_count.serialize(buf);
        }
    }

    impl Deserializable for State {
        fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
            let id = u32::deserialize(buf)?;
            if id != Self::CONSTRUCTOR_ID {
                return Err(deserialize::Error::UnexpectedConstructor { id });
            }
            Ok(Self {
                pts: i32::deserialize(buf)?,
                qts: i32::deserialize(buf)?,
                date: i32::deserialize(buf)?,
                seq: i32::deserialize(buf)?,
                unread_count: i32::deserialize(buf)?,
            })
        }
    }

    /// ```tl
    /// updates.differenceEmpty#5d75a138 date:int seq:int = updates.Difference;
    /// ```
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct DifferenceEmpty {
        pub date: i32,
        pub seq: i32,
    }

    impl Identifiable for DifferenceEmpty {
        const CONSTRUCTOR_ID: u32 = 0x5d75a138;
    }

    /// ```tl
    /// updates.difference#00f49ca0 new_messages:Vector<Message>
    /// new_encrypted_messages:Vector<EncryptedMessage>
    /// other_updates:Vector<Update> chats:Vector<Chat> users:Vector<User>
    /// state:updates.State = updates.Difference;
    /// ```
    #[derive(Clone, Debug, PartialEq)]
    pub struct Difference {
        pub new_messages: Vec<crate::enums::Message>,
        pub new_encrypted_messages: Vec<crate::enums::EncryptedMessage>,
        pub other_updates: Vec<crate::enums::Update>,
        pub chats: Vec<crate::enums::Chat>,
        pub users: Vec<crate::enums::User>,
        pub state: State,
    }

    impl Identifiable for Difference {
        const CONSTRUCTOR_ID: u32 = 0x00f49ca0;
    }

    /// ```tl
    /// updates.differenceSlice#a8fb1981 new_messages:Vector<Message>
    /// new_encrypted_messages:Vector<EncryptedMessage>
    /// other_updates:Vector<Update> chats:Vector<Chat> users:Vector<User>
    /// intermediate_state:updates.State = updates.Difference;
    /// ```
    #[derive(Clone, Debug, PartialEq)]
    pub struct DifferenceSlice {
        pub new_messages: Vec<crate::enums::Message>,
        pub new_encrypted_messages: Vec<crate::enums::EncryptedMessage>,
        pub other_updates: Vec<crate::enums::Update>,
        pub chats: Vec<crate::enums::Chat>,
        pub users: Vec<crate::enums::User>,
        pub intermediate_state: State,
    }

    impl Identifiable for DifferenceSlice {
        const CONSTRUCTOR_ID: u32 = 0xa8fb1981;
    }

    /// ```tl
    /// updates.differenceTooLong#4afe8f6d pts:int = updates.Difference;
    /// ```
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct DifferenceTooLong {
        pub pts: i32,
    }

    impl Identifiable for DifferenceTooLong {
        const CONSTRUCTOR_ID: u32 = 0x4afe8f6d;
    }

    /// ```tl
    /// updates.channelDifferenceEmpty#3e11affb flags:# final:flags.0?true
    /// pts:int timeout:flags.1?int = updates.ChannelDifference;
    /// ```
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct ChannelDifferenceEmpty {
        pub r#final: bool,
        pub pts: i32,
        pub timeout: Option<i32>,
    }

    impl Identifiable for ChannelDifferenceEmpty {
        const CONSTRUCTOR_ID: u32 = 0x3e11affb;
    }

    /// ```tl
    /// updates.channelDifferenceTooLong#a4bcc6fe flags:# final:flags.0?true
    /// timeout:flags.1?int dialog:Dialog messages:Vector<Message>
    /// chats:Vector<Chat> users:Vector<User> = updates.ChannelDifference;
    /// ```
    #[derive(Clone, Debug, PartialEq)]
    pub struct ChannelDifferenceTooLong {
        pub r#final: bool,
        pub timeout: Option<i32>,
        pub dialog: crate::types::Dialog,
        pub messages: Vec<crate::enums::Message>,
        pub chats: Vec<crate::enums::Chat>,
        pub users: Vec<crate::enums::User>,
    }

    impl Identifiable for ChannelDifferenceTooLong {
        const CONSTRUCTOR_ID: u32 = 0xa4bcc6fe;
    }

    /// ```tl
    /// updates.channelDifference#2064674e flags:# final:flags.0?true pts:int
    /// timeout:flags.1?int new_messages:Vector<Message>
    /// other_updates:Vector<Update> chats:Vector<Chat> users:Vector<User>
    /// = updates.ChannelDifference;
    /// ```
    #[derive(Clone, Debug, PartialEq)]
    pub struct ChannelDifference {
        pub r#final: bool,
        pub pts: i32,
        pub timeout: Option<i32>,
        pub new_messages: Vec<crate::enums::Message>,
        pub other_updates: Vec<crate::enums::Update>,
        pub chats: Vec<crate::enums::Chat>,
        pub users: Vec<crate::enums::User>,
    }

    impl Identifiable for ChannelDifference {
        const CONSTRUCTOR_ID: u32 = 0x2064674e;
    }
}

pub mod contacts {
    use super::*;

    /// ```tl
    /// contacts.resolvedPeer#7f077ad9 peer:Peer chats:Vector<Chat>
    /// users:Vector<User> = contacts.ResolvedPeer;
    /// ```
    #[derive(Clone, Debug, PartialEq)]
    pub struct ResolvedPeer {
        pub peer: crate::enums::Peer,
        pub chats: Vec<crate::enums::Chat>,
        pub users: Vec<crate::enums::User>,
    }

    impl Identifiable for ResolvedPeer {
        const CONSTRUCTOR_ID: u32 = 0x7f077ad9;
    }

    impl Serializable for ResolvedPeer {
        fn serialize(&self, buf: &mut Vec<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
            self.peer.serialize(buf);
            self.chats.serialize(buf);
            self.users.serialize(buf);
        }
    }

    impl Deserializable for ResolvedPeer {
        fn deserialize(buf: Buffer) -> deserialize::Result<Self> {
            let id = u32::deserialize(buf)?;
            if id != Self::CONSTRUCTOR_ID {
                return Err(deserialize::Error::UnexpectedConstructor { id });
            }
            Ok(Self {
                peer: crate::enums::Peer::deserialize(buf)?,
                chats: Vec::<crate::enums::Chat>::deserialize(buf)?,
                users: Vec::<crate::enums::User>::deserialize(buf)?,
            })
        }
    }
}

pub mod messages {
    use super::*;

    /// ```tl
    /// messages.dialogs#15ba6c40 dialogs:Vector<Dialog>
    /// messages:Vector<Message> chats:Vector<Chat> users:Vector<User>
    /// = messages.Dialogs;
    /// ```
    #[derive(Clone, Debug, PartialEq)]
    pub struct Dialogs {
        pub dialogs: Vec<crate::types::Dialog>,
        pub messages: Vec<crate::enums::Message>,
        pub chats: Vec<crate::enums::Chat>,
        pub users: Vec<crate::enums::User>,
    }

    impl Identifiable for Dialogs {
        const CONSTRUCTOR_ID: u32 = 0x15ba6c40;
    }

    /// ```tl
    /// messages.dialogsSlice#71e094f3 count:int dialogs:Vector<Dialog>
    /// messages:Vector<Message> chats:Vector<Chat> users:Vector<User>
    /// = messages.Dialogs;
    /// ```
    #[derive(Clone, Debug, PartialEq)]
    pub struct DialogsSlice {
        pub count: i32,
        pub dialogs: Vec<crate::types::Dialog>,
        pub messages: Vec<crate::enums::Message>,
        pub chats: Vec<crate::enums::Chat>,
        pub users: Vec<crate::enums::User>,
    }

    impl Identifiable for DialogsSlice {
        const CONSTRUCTOR_ID: u32 = 0x71e094f3;
    }
}

// ---------------------------------------------------------------------------
// Updates containers and update variants
// ---------------------------------------------------------------------------

/// ```tl
/// updateShort#78d4dec1 update:Update date:int = Updates;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateShort {
    pub update: crate::enums::Update,
    pub date: i32,
}

impl Identifiable for UpdateShort {
    const CONSTRUCTOR_ID: u32 = 0x78d4dec1;
}

/// ```tl
/// updatesCombined#725b04c3 updates:Vector<Update> users:Vector<User>
/// chats:Vector<Chat> date:int seq_start:int seq:int = Updates;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct UpdatesCombined {
    pub updates: Vec<crate::enums::Update>,
    pub users: Vec<crate::enums::User>,
    pub chats: Vec<crate::enums::Chat>,
    pub date: i32,
    pub seq_start: i32,
    pub seq: i32,
}

impl Identifiable for UpdatesCombined {
    const CONSTRUCTOR_ID: u32 = 0x725b04c3;
}

/// ```tl
/// updates#74ae4240 updates:Vector<Update> users:Vector<User>
/// chats:Vector<Chat> date:int seq:int = Updates;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Updates {
    pub updates: Vec<crate::enums::Update>,
    pub users: Vec<crate::enums::User>,
    pub chats: Vec<crate::enums::Chat>,
    pub date: i32,
    pub seq: i32,
}

impl Identifiable for Updates {
    const CONSTRUCTOR_ID: u32 = 0x74ae4240;
}

/// ```tl
/// updateShortMessage#313bc7f8 flags:# out:flags.1?true id:int user_id:long
/// message:string pts:int pts_count:int date:int = Updates;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateShortMessage {
    pub out: bool,
    pub id: i32,
    pub user_id: i64,
    pub message: String,
    pub pts: i32,
    pub pts_count: i32,
    pub date: i32,
}

impl Identifiable for UpdateShortMessage {
    const CONSTRUCTOR_ID: u32 = 0x313bc7f8;
}

/// ```tl
/// updateShortChatMessage#4d6deea5 flags:# out:flags.1?true id:int
/// from_id:long chat_id:long message:string pts:int pts_count:int
/// date:int = Updates;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateShortChatMessage {
    pub out: bool,
    pub id: i32,
    pub from_id: i64,
    pub chat_id: i64,
    pub message: String,
    pub pts: i32,
    pub pts_count: i32,
    pub date: i32,
}

impl Identifiable for UpdateShortChatMessage {
    const CONSTRUCTOR_ID: u32 = 0x4d6deea5;
}

/// ```tl
/// updateShortSentMessage#9015e101 flags:# out:flags.1?true id:int pts:int
/// pts_count:int date:int = Updates;
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpdateShortSentMessage {
    pub out: bool,
    pub id: i32,
    pub pts: i32,
    pub pts_count: i32,
    pub date: i32,
}

impl Identifiable for UpdateShortSentMessage {
    const CONSTRUCTOR_ID: u32 = 0x9015e101;
}

/// ```tl
/// updateNewMessage#1f2b0afd message:Message pts:int pts_count:int = Update;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateNewMessage {
    pub message: crate::enums::Message,
    pub pts: i32,
    pub pts_count: i32,
}

impl Identifiable for UpdateNewMessage {
    const CONSTRUCTOR_ID: u32 = 0x1f2b0afd;
}

/// ```tl
/// updateMessageID#4e90bfd6 id:int random_id:long = Update;
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpdateMessageId {
    pub id: i32,
    pub random_id: i64,
}

impl Identifiable for UpdateMessageId {
    const CONSTRUCTOR_ID: u32 = 0x4e90bfd6;
}

/// ```tl
/// updateDeleteMessages#a20db0e5 messages:Vector<int> pts:int
/// pts_count:int = Update;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateDeleteMessages {
    pub messages: Vec<i32>,
    pub pts: i32,
    pub pts_count: i32,
}

impl Identifiable for UpdateDeleteMessages {
    const CONSTRUCTOR_ID: u32 = 0xa20db0e5;
}

/// ```tl
/// updateReadHistoryInbox#9c974fdf flags:# folder_id:flags.0?int peer:Peer
/// max_id:int still_unread_count:int pts:int pts_count:int = Update;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateReadHistoryInbox {
    pub folder_id: Option<i32>,
    pub peer: crate::enums::Peer,
    pub max_id: i32,
    pub still_unread_count: i32,
    pub pts: i32,
    pub pts_count: i32,
}

impl Identifiable for UpdateReadHistoryInbox {
    const CONSTRUCTOR_ID: u32 = 0x9c974fdf;
}

/// ```tl
/// updateReadHistoryOutbox#2f2f21bf peer:Peer max_id:int pts:int
/// pts_count:int = Update;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateReadHistoryOutbox {
    pub peer: crate::enums::Peer,
    pub max_id: i32,
    pub pts: i32,
    pub pts_count: i32,
}

impl Identifiable for UpdateReadHistoryOutbox {
    const CONSTRUCTOR_ID: u32 = 0x2f2f21bf;
}

/// ```tl
/// updateNewEncryptedMessage#12bcbd9a message:EncryptedMessage
/// qts:int = Update;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateNewEncryptedMessage {
    pub message: crate::enums::EncryptedMessage,
    pub qts: i32,
}

impl Identifiable for UpdateNewEncryptedMessage {
    const CONSTRUCTOR_ID: u32 = 0x12bcbd9a;
}

/// ```tl
/// updateChannelTooLong#108d941f flags:# channel_id:long
/// pts:flags.0?int = Update;
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpdateChannelTooLong {
    pub channel_id: i64,
    pub pts: Option<i32>,
}

impl Identifiable for UpdateChannelTooLong {
    const CONSTRUCTOR_ID: u32 = 0x108d941f;
}

/// ```tl
/// updateNewChannelMessage#62ba04d9 message:Message pts:int
/// pts_count:int = Update;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateNewChannelMessage {
    pub message: crate::enums::Message,
    pub pts: i32,
    pub pts_count: i32,
}

impl Identifiable for UpdateNewChannelMessage {
    const CONSTRUCTOR_ID: u32 = 0x62ba04d9;
}

/// ```tl
/// updateEditChannelMessage#1b3f4df7 message:Message pts:int
/// pts_count:int = Update;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateEditChannelMessage {
    pub message: crate::enums::Message,
    pub pts: i32,
    pub pts_count: i32,
}

impl Identifiable for UpdateEditChannelMessage {
    const CONSTRUCTOR_ID: u32 = 0x1b3f4df7;
}

/// ```tl
/// updateDeleteChannelMessages#c32d5b12 channel_id:long
/// messages:Vector<int> pts:int pts_count:int = Update;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateDeleteChannelMessages {
    pub channel_id: i64,
    pub messages: Vec<i32>,
    pub pts: i32,
    pub pts_count: i32,
}

impl Identifiable for UpdateDeleteChannelMessages {
    const CONSTRUCTOR_ID: u32 = 0xc32d5b12;
}

/// ```tl
/// updateEditMessage#e40370a3 message:Message pts:int pts_count:int = Update;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateEditMessage {
    pub message: crate::enums::Message,
    pub pts: i32,
    pub pts_count: i32,
}

impl Identifiable for UpdateEditMessage {
    const CONSTRUCTOR_ID: u32 = 0xe40370a3;
}

/// ```tl
/// updateUserPhone#05492a13 user_id:long phone:string = Update;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateUserPhone {
    pub user_id: i64,
    pub phone: String,
}

impl Identifiable for UpdateUserPhone {
    const CONSTRUCTOR_ID: u32 = 0x05492a13;
}
