// Copyright 2025 - developers of the `telecraft` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A high level client for Telegram's API on top of the MTProto stack:
//! session handling, the login flow, raw request invocation, a resolver
//! from names to peers, and a reconciled update stream.
//!
//! ```no_run
//! use telecraft_client::{Client, Config};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = Config::test(12345, "0123456789abcdef0123456789abcdef");
//! config.session_path = Some("downloader.session.json".into());
//!
//! let mut client = Client::connect(config).await?;
//! client.start_updates().await?;
//! while let Some(update) = client.next_update().await? {
//!     println!("{:?}", update);
//! }
//! # Ok(())
//! # }
//! ```
mod client;

pub use client::auth::{LoginToken, PasswordError, SignInError};
pub use client::net::{ConfigError, ConnectError, Step, PROD_OPT_IN_VAR};
pub use client::peers::ResolveError;
pub use client::updates::Update;
pub use client::{Client, ClientHandle, Config, InitParams};

pub use telecraft_mtsender::{InvocationError, RpcError};
pub use telecraft_session::{NetworkLane, Peer, PeerRef};
pub use telecraft_tl as tl;
