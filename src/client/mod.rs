// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The Labox client.
//!
//! [`LaboxClient`] owns the two channel tasks, the keep-alive ticker and the
//! refresh timer. It keeps the last known [`DeviceState`] and reports every
//! change through callbacks and a broadcast channel.

mod builder;
mod config;
mod context;

pub use builder::LaboxClientBuilder;
pub use config::{
    ClientConfig, DEFAULT_EVENT_CAPACITY, DEFAULT_KEEP_ALIVE_INTERVAL, DEFAULT_RECONNECT_DELAY,
    DEFAULT_REFRESH_MARGIN,
};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use context::ClientContext;

use crate::error::{Error, Result};
use crate::event::DeviceEvent;
use crate::protocol::{ChannelHandle, ChannelRole, ChannelSettings, ChannelStatus, Connector, run_channel};
use crate::scheduler::run_keep_alive;
use crate::state::{ChannelInfo, DeviceState, ProgramInfo};
use crate::subscription::{Subscribable, SubscriptionId};

/// Client for one Labox set-top box.
///
/// Starting a client spawns its background tasks immediately; the channels
/// connect, and reconnect, on their own. Host calls never wait for the
/// network: commands are queued on the command channel, or rejected with
/// [`Error::NotConnected`] while it is down.
///
/// # Examples
///
/// ```no_run
/// use labox_lib::{DeviceEvent, LaboxClient};
///
/// #[tokio::main]
/// async fn main() -> labox_lib::Result<()> {
///     let client = LaboxClient::start("192.168.1.20", false)?;
///     let mut events = client.subscribe();
///
///     while let Ok(event) = events.recv().await {
///         if let DeviceEvent::Open = event {
///             client.send_button_event(115)?;
///         }
///     }
///     Ok(())
/// }
/// ```
pub struct LaboxClient {
    context: Arc<ClientContext>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    shut_down: AtomicBool,
}

impl LaboxClient {
    /// Starts a client for the box at `address` with default settings.
    ///
    /// `debug` enables frame-level diagnostics. Must be called from within a
    /// Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns error if `address` is invalid or TLS cannot be initialized.
    #[cfg(feature = "tls")]
    pub fn start(address: impl Into<String>, debug: bool) -> Result<Self> {
        Self::builder(address).debug(debug).start()
    }

    /// Creates a builder for a client of the box at `address`.
    #[must_use]
    pub fn builder(address: impl Into<String>) -> LaboxClientBuilder {
        LaboxClientBuilder::new(address)
    }

    pub(crate) fn spawn<C: Connector>(config: ClientConfig, connector: C) -> Self {
        let (command, command_rx) = ChannelHandle::new(ChannelRole::Command);
        let (notification, notification_rx) = ChannelHandle::new(ChannelRole::Notification);
        let context = ClientContext::new(config, command.clone(), notification.clone());
        let connector = Arc::new(connector);

        tracing::info!(
            address = %context.config.address,
            command_port = context.config.command_port,
            notification_port = context.config.notification_port,
            "Starting Labox client"
        );

        let settings = |role| ChannelSettings {
            endpoint: context.config.endpoint(role),
            reconnect_delay: context.config.reconnect_delay,
            debug: context.config.debug,
        };

        let tasks = vec![
            tokio::spawn(run_channel(
                Arc::clone(&connector),
                settings(ChannelRole::Command),
                command.clone(),
                command_rx,
                Arc::clone(&context),
            )),
            tokio::spawn(run_channel(
                connector,
                settings(ChannelRole::Notification),
                notification.clone(),
                notification_rx,
                Arc::clone(&context),
            )),
            tokio::spawn(run_keep_alive(
                context.config.keep_alive_interval,
                vec![command, notification],
                context.config.debug,
            )),
        ];

        Self {
            context,
            tasks: Mutex::new(tasks),
            shut_down: AtomicBool::new(false),
        }
    }

    /// Returns the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.context.config
    }

    fn ensure_running(&self) -> Result<()> {
        if self.shut_down.load(Ordering::Acquire) {
            return Err(Error::ShutDown);
        }
        Ok(())
    }

    // ========== Commands ==========

    /// Presses one remote-control button.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConnected`] if the command channel is down, or
    /// [`Error::ShutDown`] after [`shutdown`](Self::shutdown).
    pub fn send_button_event(&self, code: u32) -> Result<()> {
        self.send_button_events(&[code])
    }

    /// Presses several remote-control buttons in one request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConnected`] if the command channel is down, or
    /// [`Error::ShutDown`] after [`shutdown`](Self::shutdown).
    pub fn send_button_events(&self, codes: &[u32]) -> Result<()> {
        self.ensure_running()?;
        self.context
            .send_command(self.context.codec.encode_button_press(codes))
    }

    /// Tunes the live session to `channel_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConnected`] if the command channel is down, or
    /// [`Error::ShutDown`] after [`shutdown`](Self::shutdown).
    pub fn set_channel(&self, channel_id: &str) -> Result<()> {
        self.ensure_running()?;
        self.context
            .send_command(self.context.codec.encode_channel_change(channel_id))
    }

    /// Polls status and volume now.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConnected`] if the command channel is down, or
    /// [`Error::ShutDown`] after [`shutdown`](Self::shutdown).
    pub fn refresh(&self) -> Result<()> {
        self.ensure_running()?;
        self.context.poll_status()?;
        self.context.poll_volume()
    }

    // ========== State ==========

    /// Returns a copy of the last known state.
    #[must_use]
    pub fn get_info(&self) -> DeviceState {
        self.context.store.current()
    }

    /// Returns the lifecycle state of the channel with the given role.
    #[must_use]
    pub fn channel_status(&self, role: ChannelRole) -> ChannelStatus {
        self.context.channel(role).status()
    }

    /// Returns `true` if the command channel is open.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.context.command.is_open()
    }

    /// Returns a receiver of every event emitted from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.context.events.subscribe()
    }

    // ========== Lifecycle ==========

    /// Stops every background task and drops both connections.
    ///
    /// Pending outbound frames are discarded. Calling it again does nothing.
    pub fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::AcqRel) {
            return;
        }
        self.context.refresh.cancel();
        for task in self.tasks.lock().drain(..) {
            task.abort();
        }
        tracing::info!(address = %self.context.config.address, "Labox client shut down");
    }

    /// Returns `true` once [`shutdown`](Self::shutdown) has been called.
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }
}

impl Drop for LaboxClient {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for LaboxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LaboxClient")
            .field("context", &self.context)
            .field("shut_down", &self.is_shut_down())
            .finish()
    }
}

impl Subscribable for LaboxClient {
    fn on_open<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.context.callbacks.on_open(callback)
    }

    fn on_close<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.context.callbacks.on_close(callback)
    }

    fn on_power<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.context.callbacks.on_power(callback)
    }

    fn on_volume<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(u32) + Send + Sync + 'static,
    {
        self.context.callbacks.on_volume(callback)
    }

    fn on_mute<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.context.callbacks.on_mute(callback)
    }

    fn on_channel<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&ChannelInfo) + Send + Sync + 'static,
    {
        self.context.callbacks.on_channel(callback)
    }

    fn on_program<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&ProgramInfo) + Send + Sync + 'static,
    {
        self.context.callbacks.on_program(callback)
    }

    fn on_update<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceState) + Send + Sync + 'static,
    {
        self.context.callbacks.on_update(callback)
    }

    fn on_event<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceEvent) + Send + Sync + 'static,
    {
        self.context.callbacks.on_event(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.context.callbacks.unsubscribe(id)
    }
}
