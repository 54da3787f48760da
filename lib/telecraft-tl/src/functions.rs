// Copyright 2025 - developers of the `telecraft` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The functions the core issues on its own behalf. Callers with a full
//! generated registry use their own definitions and only pass bytes through.
use crate::{enums, types, Blob, Identifiable, RemoteCall, Serializable};

/// ```tl
/// req_pq_multi#be7e8ef1 nonce:int128 = ResPQ;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ReqPqMulti {
    pub nonce: [u8; 16],
}

impl Identifiable for ReqPqMulti {
    const CONSTRUCTOR_ID: u32 = 0xbe7e8ef1;
}

impl Serializable for ReqPqMulti {
    fn serialize(&self, buf: &mut Vec<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.nonce.serialize(buf);
    }
}

impl RemoteCall for ReqPqMulti {
    type Return = types::ResPq;
}

/// ```tl
/// req_DH_params#d712e4be nonce:int128 server_nonce:int128 p:bytes q:bytes
/// public_key_fingerprint:long encrypted_data:bytes = Server_DH_Params;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ReqDhParams {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub p: Vec<u8>,
    pub q: Vec<u8>,
    pub public_key_fingerprint: i64,
    pub encrypted_data: Vec<u8>,
}

impl Identifiable for ReqDhParams {
    const CONSTRUCTOR_ID: u32 = 0xd712e4be;
}

impl Serializable for ReqDhParams {
    fn serialize(&self, buf: &mut Vec<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.nonce.serialize(buf);
        self.server_nonce.serialize(buf);
        self.p.serialize(buf);
        self.q.serialize(buf);
        self.public_key_fingerprint.serialize(buf);
        self.encrypted_data.serialize(buf);
    }
}

impl RemoteCall for ReqDhParams {
    type Return = enums::ServerDhParams;
}

/// ```tl
/// set_client_DH_params#f5045f1f nonce:int128 server_nonce:int128
/// encrypted_data:bytes = Set_client_DH_params_answer;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SetClientDhParams {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub encrypted_data: Vec<u8>,
}

impl Identifiable for SetClientDhParams {
    const CONSTRUCTOR_ID: u32 = 0xf5045f1f;
}

impl Serializable for SetClientDhParams {
    fn serialize(&self, buf: &mut Vec<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.nonce.serialize(buf);
        self.server_nonce.serialize(buf);
        self.encrypted_data.serialize(buf);
    }
}

impl RemoteCall for SetClientDhParams {
    type Return = enums::SetClientDhParamsAnswer;
}

/// ```tl
/// ping#7abe77ec ping_id:long = Pong;
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ping {
    pub ping_id: i64,
}

impl Identifiable for Ping {
    const CONSTRUCTOR_ID: u32 = 0x7abe77ec;
}

impl Serializable for Ping {
    fn serialize(&self, buf: &mut Vec<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.ping_id.serialize(buf);
    }
}

impl RemoteCall for Ping {
    type Return = types::Pong;
}

/// ```tl
/// ping_delay_disconnect#f3427b8c ping_id:long disconnect_delay:int = Pong;
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PingDelayDisconnect {
    pub ping_id: i64,
    pub disconnect_delay: i32,
}

impl Identifiable for PingDelayDisconnect {
    const CONSTRUCTOR_ID: u32 = 0xf3427b8c;
}

impl Serializable for PingDelayDisconnect {
    fn serialize(&self, buf: &mut Vec<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.ping_id.serialize(buf);
        self.disconnect_delay.serialize(buf);
    }
}

impl RemoteCall for PingDelayDisconnect {
    type Return = types::Pong;
}

/// ```tl
/// get_future_salts#b921bd04 num:int = FutureSalts;
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GetFutureSalts {
    pub num: i32,
}

impl Identifiable for GetFutureSalts {
    const CONSTRUCTOR_ID: u32 = 0xb921bd04;
}

impl Serializable for GetFutureSalts {
    fn serialize(&self, buf: &mut Vec<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.num.serialize(buf);
    }
}

impl RemoteCall for GetFutureSalts {
    type Return = types::FutureSalts;
}

/// ```tl
/// invokeWithLayer#da9b0d0d {X:Type} layer:int query:!X = X;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct InvokeWithLayer<R: RemoteCall> {
    pub layer: i32,
    pub query: R,
}

impl<R: RemoteCall> Identifiable for InvokeWithLayer<R> {
    const CONSTRUCTOR_ID: u32 = 0xda9b0d0d;
}

impl<R: RemoteCall> Serializable for InvokeWithLayer<R> {
    fn serialize(&self, buf: &mut Vec<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.layer.serialize(buf);
        self.query.serialize(buf);
    }
}

impl<R: RemoteCall> RemoteCall for InvokeWithLayer<R> {
    type Return = R::Return;
}

/// ```tl
/// initConnection#c1cd5ea9 {X:Type} flags:# api_id:int device_model:string
/// system_version:string app_version:string system_lang_code:string
/// lang_pack:string lang_code:string proxy:flags.0?InputClientProxy
/// params:flags.1?JSONValue query:!X = X;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct InitConnection<R: RemoteCall> {
    pub api_id: i32,
    pub device_model: String,
    pub system_version: String,
    pub app_version: String,
    pub system_lang_code: String,
    pub lang_pack: String,
    pub lang_code: String,
    pub query: R,
}

impl<R: RemoteCall> Identifiable for InitConnection<R> {
    const CONSTRUCTOR_ID: u32 = 0xc1cd5ea9;
}

impl<R: RemoteCall> Serializable for InitConnection<R> {
    fn serialize(&self, buf: &mut Vec<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        0u32.serialize(buf);
        self.api_id.serialize(buf);
        self.device_model.serialize(buf);
        self.system_version.serialize(buf);
        self.app_version.serialize(buf);
        self.system_lang_code.serialize(buf);
        self.lang_pack.serialize(buf);
        self.lang_code.serialize(buf);
        self.query.serialize(buf);
    }
}

impl<R: RemoteCall> RemoteCall for InitConnection<R> {
    type Return = R::Return;
}

pub mod help {
    use super::*;

    /// ```tl
    /// help.getConfig#c4f9186b = Config;
    /// ```
    ///
    /// The returned `Config` object is not interpreted by the core and is
    /// passed through as an opaque blob.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct GetConfig {}

    impl Identifiable for GetConfig {
        const CONSTRUCTOR_ID: u32 = 0xc4f9186b;
    }

    impl Serializable for GetConfig {
        fn serialize(&self, buf: &mut Vec<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
        }
    }

    impl RemoteCall for GetConfig {
        type Return = Blob;
    }
}

pub mod updates {
    use super::*;

    /// ```tl
    /// updates.getState#edd4882a = updates.State;
    /// ```
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct GetState {}

    impl Identifiable for GetState {
        const CONSTRUCTOR_ID: u32 = 0xedd4882a;
    }

    impl Serializable for GetState {
        fn serialize(&self, buf: &mut Vec<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
        }
    }

    impl RemoteCall for GetState {
        type Return = types::updates::State;
    }

    /// ```tl
    /// updates.getDifference#19c2f763 flags:# pts:int pts_limit:flags.1?int
    /// pts_total_limit:flags.0?int date:int qts:int qts_limit:flags.2?int
    /// = updates.Difference;
    /// ```
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct GetDifference {
        pub pts: i32,
        pub pts_limit: Option<i32>,
        pub pts_total_limit: Option<i32>,
        pub date: i32,
        pub qts: i32,
        pub qts_limit: Option<i32>,
    }

    impl Identifiable for GetDifference {
        const CONSTRUCTOR_ID: u32 = 0x19c2f763;
    }

    impl Serializable for GetDifference {
        fn serialize(&self, buf: &mut Vec<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
            let mut flags = 0u32;
            flags |= if self.pts_total_limit.is_some() { 1 } else { 0 };
            flags |= if self.pts_limit.is_some() { 1 << 1 } else { 0 };
            flags |= if self.qts_limit.is_some() { 1 << 2 } else { 0 };
            flags.serialize(buf);
            self.pts.serialize(buf);
            if let Some(x) = self.pts_limit {
                x.serialize(buf);
            }
            if let Some(x) = self.pts_total_limit {
                x.serialize(buf);
            }
            self.date.serialize(buf);
            self.qts.serialize(buf);
            if let Some(x) = self.qts_limit {
                x.serialize(buf);
            }
        }
    }

    impl RemoteCall for GetDifference {
        type Return = enums::updates::Difference;
    }

    /// ```tl
    /// updates.getChannelDifference#03173d78 flags:# force:flags.0?true
    /// channel:InputChannel filter:ChannelMessagesFilter pts:int limit:int
    /// = updates.ChannelDifference;
    /// ```
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct GetChannelDifference {
        pub force: bool,
        pub channel: enums::InputChannel,
        pub filter: enums::ChannelMessagesFilter,
        pub pts: i32,
        pub limit: i32,
    }

    impl Identifiable for GetChannelDifference {
        const CONSTRUCTOR_ID: u32 = 0x03173d78;
    }

    impl Serializable for GetChannelDifference {
        fn serialize(&self, buf: &mut Vec<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
            let flags = if self.force { 1u32 } else { 0 };
            flags.serialize(buf);
            self.channel.serialize(buf);
            self.filter.serialize(buf);
            self.pts.serialize(buf);
            self.limit.serialize(buf);
        }
    }

    impl RemoteCall for GetChannelDifference {
        type Return = enums::updates::ChannelDifference;
    }
}

pub mod contacts {
    use super::*;

    /// ```tl
    /// contacts.resolveUsername#f93ccba3 username:string
    /// = contacts.ResolvedPeer;
    /// ```
    #[derive(Clone, Debug, PartialEq)]
    pub struct ResolveUsername {
        pub username: String,
    }

    impl Identifiable for ResolveUsername {
        const CONSTRUCTOR_ID: u32 = 0xf93ccba3;
    }

    impl Serializable for ResolveUsername {
        fn serialize(&self, buf: &mut Vec<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
            self.username.serialize(buf);
        }
    }

    impl RemoteCall for ResolveUsername {
        type Return = types::contacts::ResolvedPeer;
    }

    /// ```tl
    /// contacts.resolvePhone#8af94344 phone:string = contacts.ResolvedPeer;
    /// ```
    #[derive(Clone, Debug, PartialEq)]
    pub struct ResolvePhone {
        pub phone: String,
    }

    impl Identifiable for ResolvePhone {
        const CONSTRUCTOR_ID: u32 = 0x8af94344;
    }

    impl Serializable for ResolvePhone {
        fn serialize(&self, buf: &mut Vec<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
            self.phone.serialize(buf);
        }
    }

    impl RemoteCall for ResolvePhone {
        type Return = types::contacts::ResolvedPeer;
    }
}

pub mod messages {
    use super::*;

    /// ```tl
    /// messages.getDialogs#a0f4cb4f flags:# exclude_pinned:flags.0?true
    /// folder_id:flags.1?int offset_date:int offset_id:int
    /// offset_peer:InputPeer limit:int hash:long = messages.Dialogs;
    /// ```
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct GetDialogs {
        pub exclude_pinned: bool,
        pub folder_id: Option<i32>,
        pub offset_date: i32,
        pub offset_id: i32,
        pub offset_peer: enums::InputPeer,
        pub limit: i32,
        pub hash: i64,
    }

    impl Identifiable for GetDialogs {
        const CONSTRUCTOR_ID: u32 = 0xa0f4cb4f;
    }

    impl Serializable for GetDialogs {
        fn serialize(&self, buf: &mut Vec<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
            let mut flags = 0u32;
            flags |= if self.exclude_pinned { 1 } else { 0 };
            flags |= if self.folder_id.is_some() { 1 << 1 } else { 0 };
            flags.serialize(buf);
            if let Some(x) = self.folder_id {
                x.serialize(buf);
            }
            self.offset_date.serialize(buf);
            self.offset_id.serialize(buf);
            self.offset_peer.serialize(buf);
            self.limit.serialize(buf);
            self.hash.serialize(buf);
        }
    }

    impl RemoteCall for GetDialogs {
        type Return = enums::messages::Dialogs;
    }

    /// ```tl
    /// messages.sendMessage#fa88427a flags:# no_webpage:flags.1?true
    /// silent:flags.5?true background:flags.6?true clear_draft:flags.7?true
    /// peer:InputPeer reply_to_msg_id:flags.0?int message:string
    /// random_id:long = Updates;
    /// ```
    #[derive(Clone, Debug, PartialEq)]
    pub struct SendMessage {
        pub no_webpage: bool,
        pub silent: bool,
        pub background: bool,
        pub clear_draft: bool,
        pub peer: enums::InputPeer,
        pub reply_to_msg_id: Option<i32>,
        pub message: String,
        pub random_id: i64,
    }

    impl Identifiable for SendMessage {
        const CONSTRUCTOR_ID: u32 = 0xfa88427a;
    }

    impl Serializable for SendMessage {
        fn serialize(&self, buf: &mut Vec<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
            let mut flags = 0u32;
            flags |= if self.reply_to_msg_id.is_some() { 1 } else { 0 };
            flags |= if self.no_webpage { 1 << 1 } else { 0 };
            flags |= if self.silent { 1 << 5 } else { 0 };
            flags |= if self.background { 1 << 6 } else { 0 };
            flags |= if self.clear_draft { 1 << 7 } else { 0 };
            flags.serialize(buf);
            self.peer.serialize(buf);
            if let Some(x) = self.reply_to_msg_id {
                x.serialize(buf);
            }
            self.message.serialize(buf);
            self.random_id.serialize(buf);
        }
    }

    impl RemoteCall for SendMessage {
        type Return = enums::Updates;
    }
}

pub mod auth {
    use super::*;

    /// ```tl
    /// auth.sendCode#a677244f phone_number:string api_id:int api_hash:string
    /// settings:CodeSettings = auth.SentCode;
    /// ```
    #[derive(Clone, Debug, PartialEq)]
    pub struct SendCode {
        pub phone_number: String,
        pub api_id: i32,
        pub api_hash: String,
        pub settings: types::CodeSettings,
    }

    impl Identifiable for SendCode {
        const CONSTRUCTOR_ID: u32 = 0xa677244f;
    }

    impl Serializable for SendCode {
        fn serialize(&self, buf: &mut Vec<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
            self.phone_number.serialize(buf);
            self.api_id.serialize(buf);
            self.api_hash.serialize(buf);
            self.settings.serialize(buf);
        }
    }

    impl RemoteCall for SendCode {
        type Return = enums::auth::SentCode;
    }

    /// ```tl
    /// auth.signIn#8d52a951 flags:# phone_number:string
    /// phone_code_hash:string phone_code:flags.0?string = auth.Authorization;
    /// ```
    #[derive(Clone, Debug, PartialEq)]
    pub struct SignIn {
        pub phone_number: String,
        pub phone_code_hash: String,
        pub phone_code: Option<String>,
    }

    impl Identifiable for SignIn {
        const CONSTRUCTOR_ID: u32 = 0x8d52a951;
    }

    impl Serializable for SignIn {
        fn serialize(&self, buf: &mut Vec<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
            let flags = if self.phone_code.is_some() { 1u32 } else { 0 };
            flags.serialize(buf);
            self.phone_number.serialize(buf);
            self.phone_code_hash.serialize(buf);
            if let Some(ref x) = self.phone_code {
                x.serialize(buf);
            }
        }
    }

    impl RemoteCall for SignIn {
        type Return = enums::auth::Authorization;
    }

    /// ```tl
    /// auth.signUp#aac7b717 flags:# no_joined_notifications:flags.0?true
    /// phone_number:string phone_code_hash:string first_name:string
    /// last_name:string = auth.Authorization;
    /// ```
    #[derive(Clone, Debug, PartialEq)]
    pub struct SignUp {
        pub no_joined_notifications: bool,
        pub phone_number: String,
        pub phone_code_hash: String,
        pub first_name: String,
        pub last_name: String,
    }

    impl Identifiable for SignUp {
        const CONSTRUCTOR_ID: u32 = 0xaac7b717;
    }

    impl Serializable for SignUp {
        fn serialize(&self, buf: &mut Vec<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
            let flags = if self.no_joined_notifications { 1u32 } else { 0 };
            flags.serialize(buf);
            self.phone_number.serialize(buf);
            self.phone_code_hash.serialize(buf);
            self.first_name.serialize(buf);
            self.last_name.serialize(buf);
        }
    }

    impl RemoteCall for SignUp {
        type Return = enums::auth::Authorization;
    }

    /// ```tl
    /// auth.checkPassword#d18b4d16 password:InputCheckPasswordSRP
    /// = auth.Authorization;
    /// ```
    #[derive(Clone, Debug, PartialEq)]
    pub struct CheckPassword {
        pub password: types::InputCheckPasswordSrp,
    }

    impl Identifiable for CheckPassword {
        const CONSTRUCTOR_ID: u32 = 0xd18b4d16;
    }

    impl Serializable for CheckPassword {
        fn serialize(&self, buf: &mut Vec<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
            self.password.serialize(buf);
        }
    }

    impl RemoteCall for CheckPassword {
        type Return = enums::auth::Authorization;
    }

    /// ```tl
    /// auth.logOut#3e72ba19 = auth.LoggedOut;
    /// ```
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct LogOut {}

    impl Identifiable for LogOut {
        const CONSTRUCTOR_ID: u32 = 0x3e72ba19;
    }

    impl Serializable for LogOut {
        fn serialize(&self, buf: &mut Vec<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
        }
    }

    impl RemoteCall for LogOut {
        type Return = types::auth::LoggedOut;
    }
}

pub mod account {
    use super::*;

    /// ```tl
    /// account.getPassword#548a30f5 = account.Password;
    /// ```
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct GetPassword {}

    impl Identifiable for GetPassword {
        const CONSTRUCTOR_ID: u32 = 0x548a30f5;
    }

    impl Serializable for GetPassword {
        fn serialize(&self, buf: &mut Vec<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
        }
    }

    impl RemoteCall for GetPassword {
        type Return = types::account::Password;
    }
}

pub mod users {
    use super::*;

    /// ```tl
    /// users.getUsers#0d91a548 id:Vector<InputUser> = Vector<User>;
    /// ```
    #[derive(Clone, Debug, PartialEq)]
    pub struct GetUsers {
        pub id: Vec<enums::InputUser>,
    }

    impl Identifiable for GetUsers {
        const CONSTRUCTOR_ID: u32 = 0x0d91a548;
    }

    impl Serializable for GetUsers {
        fn serialize(&self, buf: &mut Vec<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
            self.id.serialize(buf);
        }
    }

    impl RemoteCall for GetUsers {
        type Return = Vec<enums::User>;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn req_pq_multi_wire_format() {
        let nonce: [u8; 16] = std::array::from_fn(|i| i as u8);
        let bytes = ReqPqMulti { nonce }.to_bytes();
        assert_eq!(&bytes[..4], &[0xf1, 0x8e, 0x7e, 0xbe]);
        assert_eq!(&bytes[4..], &nonce);
    }

    #[test]
    fn wrapped_query_nests() {
        let bytes = InvokeWithLayer {
            layer: crate::LAYER,
            query: help::GetConfig {},
        }
        .to_bytes();
        assert_eq!(&bytes[..4], &0xda9b0d0du32.to_le_bytes());
        assert_eq!(&bytes[4..8], &crate::LAYER.to_le_bytes());
        assert_eq!(&bytes[8..12], &0xc4f9186bu32.to_le_bytes());
    }
}
