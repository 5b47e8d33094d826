// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport channels and the wire codec.
//!
//! The box exposes two secure WebSocket endpoints on the same address:
//!
//! | Role | Port | Traffic |
//! |------|------|---------|
//! | [`ChannelRole::Command`] | 7682 | requests and their responses |
//! | [`ChannelRole::Notification`] | 7684 | unsolicited device notifications |
//!
//! Each endpoint is served by one channel task that connects, pumps frames
//! and reconnects after a fixed delay. The socket itself sits behind the
//! [`Connector`] / [`Connection`] traits so the channel loop does not depend
//! on a particular WebSocket implementation.
//!
//! # Transports
//!
//! - [`WsConnector`]: WebSocket over TLS (requires the `tls` feature)

mod channel;
mod codec;
mod tls;
#[cfg(feature = "tls")]
mod websocket;

pub use channel::ChannelHandle;
pub(crate) use channel::{ChannelEvents, ChannelSettings, run_channel};
pub use codec::{Codec, Decoded, Effect};
pub use tls::TlsConfig;
#[cfg(feature = "tls")]
pub use websocket::{WsConnection, WsConnector};

use std::fmt;

use crate::error::ProtocolError;

/// WebSocket subprotocol spoken by the box.
pub const SUBPROTOCOL: &str = "lws-bidirectional-protocol";

/// Default port of the command channel.
pub const DEFAULT_COMMAND_PORT: u16 = 7682;

/// Default port of the notification channel.
pub const DEFAULT_NOTIFICATION_PORT: u16 = 7684;

/// Which of the two device channels a connection serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelRole {
    /// Request/response channel for polls and remote-control commands.
    Command,
    /// Push-only channel for device notifications.
    Notification,
}

impl ChannelRole {
    /// Returns the port the box listens on for this role.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::Command => DEFAULT_COMMAND_PORT,
            Self::Notification => DEFAULT_NOTIFICATION_PORT,
        }
    }

    /// Returns a short name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Notification => "notification",
        }
    }
}

impl fmt::Display for ChannelRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelStatus {
    /// A connection attempt is in progress.
    Connecting,
    /// The connection is established; frames flow both ways.
    Open,
    /// The connection was lost or could not be made; waiting to retry.
    Reconnecting,
}

/// Address of one device channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Host name or IP address of the box.
    pub address: String,
    /// TCP port.
    pub port: u16,
    /// Role served by this endpoint.
    pub role: ChannelRole,
}

impl Endpoint {
    /// Creates an endpoint.
    #[must_use]
    pub fn new(address: impl Into<String>, port: u16, role: ChannelRole) -> Self {
        Self {
            address: address.into(),
            port,
            role,
        }
    }

    /// Returns the `wss://` URL of this endpoint.
    ///
    /// IPv6 literals are bracketed.
    #[must_use]
    pub fn url(&self) -> String {
        if self.address.contains(':') && !self.address.starts_with('[') {
            format!("wss://[{}]:{}", self.address, self.port)
        } else {
            format!("wss://{}:{}", self.address, self.port)
        }
    }
}

/// A WebSocket-level frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// UTF-8 text frame; all protocol messages use this.
    Text(String),
    /// Binary frame; the box never sends these and they are ignored.
    Binary(Vec<u8>),
    /// Ping control frame.
    Ping(Vec<u8>),
    /// Pong control frame.
    Pong(Vec<u8>),
    /// Close control frame.
    Close,
}

/// An established connection to one device endpoint.
///
/// `recv` must be cancel safe: the channel loop polls it inside
/// `tokio::select!` together with its outbound queue.
pub trait Connection: Send + 'static {
    /// Writes one frame.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the frame cannot be written.
    fn send(&mut self, frame: Frame) -> impl Future<Output = Result<(), ProtocolError>> + Send;

    /// Reads the next frame, or `None` once the peer is gone.
    fn recv(&mut self) -> impl Future<Output = Option<Result<Frame, ProtocolError>>> + Send;

    /// Closes the connection. Errors are ignored.
    fn close(&mut self) -> impl Future<Output = ()> + Send;
}

/// Opens connections to device endpoints.
pub trait Connector: Send + Sync + 'static {
    /// Connection type produced by this connector.
    type Connection: Connection;

    /// Connects to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` on DNS, TCP, TLS or handshake failure.
    fn connect(
        &self,
        endpoint: &Endpoint,
    ) -> impl Future<Output = Result<Self::Connection, ProtocolError>> + Send;
}
