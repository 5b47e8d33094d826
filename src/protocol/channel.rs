// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-channel connection loop.
//!
//! Each channel runs `Connecting -> Open -> Reconnecting -> Connecting` in a
//! single task. A failed connection attempt is handled exactly like a lost
//! connection: the loop waits the reconnect delay and tries again, forever.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::mpsc;

use super::{ChannelRole, ChannelStatus, Connection, Connector, Endpoint, Frame};
use crate::error::{Error, ProtocolError};

/// Receives what happens on a channel.
///
/// Callbacks run on the channel task and must not block.
pub(crate) trait ChannelEvents: Send + Sync + 'static {
    /// The connection is established and the channel accepts frames.
    fn channel_opened(&self, role: ChannelRole);

    /// The connection closed, failed, or could not be established.
    fn channel_closed(&self, role: ChannelRole);

    /// A text frame arrived.
    fn frame_received(&self, role: ChannelRole, text: &str);
}

/// Host-side handle to a channel task.
///
/// The handle is cheap to clone. Frames are queued to the task, which writes
/// them in submission order while the connection is open.
#[derive(Debug, Clone)]
pub struct ChannelHandle {
    role: ChannelRole,
    status: Arc<RwLock<ChannelStatus>>,
    outbound: mpsc::UnboundedSender<Frame>,
}

impl ChannelHandle {
    /// Creates a handle and the queue its channel task consumes.
    pub(crate) fn new(role: ChannelRole) -> (Self, mpsc::UnboundedReceiver<Frame>) {
        let (outbound, rx) = mpsc::unbounded_channel();
        let handle = Self {
            role,
            status: Arc::new(RwLock::new(ChannelStatus::Connecting)),
            outbound,
        };
        (handle, rx)
    }

    /// Returns the role of the channel.
    #[must_use]
    pub fn role(&self) -> ChannelRole {
        self.role
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn status(&self) -> ChannelStatus {
        *self.status.read()
    }

    /// Returns `true` if the channel is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status() == ChannelStatus::Open
    }

    pub(crate) fn set_status(&self, status: ChannelStatus) {
        *self.status.write() = status;
    }

    /// Queues a text frame.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConnected`] if the channel is not open, or
    /// [`Error::ShutDown`] if the channel task is gone.
    pub fn send_text(&self, text: String) -> Result<(), Error> {
        if !self.is_open() {
            return Err(Error::NotConnected);
        }
        self.outbound
            .send(Frame::Text(text))
            .map_err(|_| Error::ShutDown)
    }

    /// Queues a ping if the channel is open.
    ///
    /// Returns `true` if a ping was queued.
    pub fn ping(&self) -> bool {
        self.is_open() && self.outbound.send(Frame::Ping(Vec::new())).is_ok()
    }
}

/// Settings of one channel task.
#[derive(Debug, Clone)]
pub(crate) struct ChannelSettings {
    pub endpoint: Endpoint,
    pub reconnect_delay: Duration,
    pub debug: bool,
}

/// Runs the connect/pump/reconnect loop of one channel. Never returns.
pub(crate) async fn run_channel<C, E>(
    connector: Arc<C>,
    settings: ChannelSettings,
    handle: ChannelHandle,
    mut outbound: mpsc::UnboundedReceiver<Frame>,
    events: Arc<E>,
) where
    C: Connector,
    E: ChannelEvents + ?Sized,
{
    let role = settings.endpoint.role;
    let port = settings.endpoint.port;

    loop {
        handle.set_status(ChannelStatus::Connecting);
        tracing::debug!(%role, url = %settings.endpoint.url(), "Connecting");

        match connector.connect(&settings.endpoint).await {
            Ok(mut connection) => {
                drain_stale_frames(&mut outbound, role);
                handle.set_status(ChannelStatus::Open);
                tracing::info!(%role, port, "Channel open");
                events.channel_opened(role);

                let result = pump(&mut connection, &mut outbound, role, &*events, settings.debug).await;

                handle.set_status(ChannelStatus::Reconnecting);
                connection.close().await;
                match result {
                    Ok(()) => tracing::info!(%role, port, "Channel closed, reconnecting"),
                    Err(e) => {
                        tracing::warn!(%role, port, error = %e, "Channel failed, reconnecting");
                    }
                }
            }
            Err(e) => {
                handle.set_status(ChannelStatus::Reconnecting);
                tracing::warn!(%role, port, error = %e, "Connection failed, retrying");
            }
        }

        events.channel_closed(role);
        tokio::time::sleep(settings.reconnect_delay).await;
    }
}

/// Moves frames between the connection and the outbound queue until the
/// connection ends.
async fn pump<T, E>(
    connection: &mut T,
    outbound: &mut mpsc::UnboundedReceiver<Frame>,
    role: ChannelRole,
    events: &E,
    debug: bool,
) -> Result<(), ProtocolError>
where
    T: Connection,
    E: ChannelEvents + ?Sized,
{
    loop {
        tokio::select! {
            inbound = connection.recv() => match inbound {
                Some(Ok(Frame::Text(text))) => {
                    if debug {
                        tracing::debug!(%role, frame = %text, "Frame received");
                    }
                    events.frame_received(role, &text);
                }
                Some(Ok(Frame::Ping(payload))) => {
                    if debug {
                        tracing::debug!(%role, "Ping received, sending pong");
                    }
                    connection.send(Frame::Pong(payload)).await?;
                }
                Some(Ok(Frame::Close)) | None => return Ok(()),
                Some(Ok(other)) => tracing::trace!(%role, frame = ?other, "Ignoring frame"),
                Some(Err(e)) => return Err(e),
            },
            Some(frame) = outbound.recv() => {
                if debug {
                    tracing::debug!(%role, frame = ?frame, "Sending frame");
                }
                connection.send(frame).await?;
            }
        }
    }
}

/// Discards frames queued while the channel was not open.
fn drain_stale_frames(outbound: &mut mpsc::UnboundedReceiver<Frame>, role: ChannelRole) {
    let mut count = 0;
    while outbound.try_recv().is_ok() {
        count += 1;
    }
    if count > 0 {
        tracing::debug!(%role, count, "Drained stale outbound frames");
    }
}
