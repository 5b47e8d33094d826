// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `Labox` Lib - A Rust client for the Labox set-top-box remote control.
//!
//! The box exposes two secure WebSocket channels: a command channel for
//! requests and their responses, and a notification channel for changes made
//! on the box itself. This library keeps both connected, tracks the box's
//! playback state and reports every change.
//!
//! # Supported Features
//!
//! - **State tracking**: power, volume, mute, current channel and program
//! - **Remote control**: button presses and channel changes
//! - **Events**: per-field callbacks and a broadcast event stream
//! - **Self-healing connections**: reconnect after 10 seconds, ping every 60
//! - **Program-end refresh**: status is polled again when the program ends
//!
//! # Quick Start
//!
//! ```no_run
//! use labox_lib::LaboxClient;
//! use labox_lib::subscription::Subscribable;
//!
//! #[tokio::main]
//! async fn main() -> labox_lib::Result<()> {
//!     let client = LaboxClient::start("192.168.1.20", false)?;
//!
//!     client.on_channel(|channel| {
//!         println!("Channel {}: {:?}", channel.number, channel.name);
//!     });
//!     client.on_open(|| println!("connected"));
//!
//!     tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
//!     client.shutdown();
//!     Ok(())
//! }
//! ```
//!
//! # Credentials
//!
//! The box asks for a client certificate. Load it with
//! [`TlsConfig::from_files`](protocol::TlsConfig::from_files) and pass it to
//! the builder:
//!
//! ```no_run
//! use labox_lib::LaboxClient;
//! use labox_lib::protocol::TlsConfig;
//!
//! # async fn example() -> labox_lib::Result<()> {
//! let client = LaboxClient::builder("192.168.1.20")
//!     .tls(TlsConfig::from_files("ca.pem", "keystore.p12", "passphrase")?)
//!     .start()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Event Order
//!
//! One inbound frame produces at most one batch of events: one event per
//! changed field in the order power, volume, mute, channel, program, followed
//! by a single [`DeviceEvent::Update`] carrying the new state. A frame that
//! changes nothing produces no event.
//!
//! # Custom Transports
//!
//! The channel loop only needs a [`protocol::Connector`]. Tests and embedders
//! can supply their own with [`LaboxClientBuilder::start_with`].

pub mod client;
pub mod command;
pub mod error;
pub mod event;
pub mod notification;
pub mod protocol;
pub mod response;
pub mod scheduler;
pub mod state;
pub mod subscription;
pub mod types;

pub use client::{ClientConfig, LaboxClient, LaboxClientBuilder};
pub use command::{ButtonPress, ChannelChange, Command, DeviceIdentity, StatusPoll, VolumePoll};
pub use error::{Error, ParseError, ProtocolError, Result};
pub use event::{DeviceEvent, EventBus};
pub use protocol::{ChannelRole, ChannelStatus, TlsConfig};
pub use state::{ChannelInfo, DeviceState, ProgramInfo, StateChange};
pub use subscription::{CallbackRegistry, Subscribable, SubscriptionId};
pub use types::ProgramEndTime;
