// Copyright 2025 - developers of the `telecraft` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use log::info;
pub use tokio::net::tcp::{ReadHalf, WriteHalf};
use tokio::net::TcpStream;

/// The address of a server to connect to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerAddr {
    pub host: String,
    pub port: u16,
}

impl std::fmt::Display for ServerAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// The stream over which all protocol traffic flows. TLS or proxied
/// variants decorate this without the rest of the sender noticing.
pub enum NetStream {
    Tcp(TcpStream),
}

impl NetStream {
    pub(crate) fn split(&mut self) -> (ReadHalf, WriteHalf) {
        match self {
            Self::Tcp(stream) => stream.split(),
        }
    }

    pub(crate) async fn connect(addr: &ServerAddr) -> Result<Self, std::io::Error> {
        info!("connecting to {}...", addr);
        Ok(NetStream::Tcp(
            TcpStream::connect((addr.host.as_str(), addr.port)).await?,
        ))
    }
}
