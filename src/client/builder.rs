// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Builder for [`LaboxClient`].

use std::time::Duration;

use super::{ClientConfig, LaboxClient};
use crate::command::DeviceIdentity;
use crate::error::Result;
use crate::protocol::{Connector, TlsConfig};

/// Builder for configuring and starting a [`LaboxClient`].
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use labox_lib::LaboxClient;
/// use labox_lib::protocol::TlsConfig;
///
/// # async fn example() -> labox_lib::Result<()> {
/// let client = LaboxClient::builder("192.168.1.20")
///     .debug(true)
///     .tls(TlsConfig::from_files("ca.pem", "keystore.p12", "secret")?)
///     .reconnect_delay(Duration::from_secs(5))
///     .start()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LaboxClientBuilder {
    config: ClientConfig,
    tls: TlsConfig,
}

impl LaboxClientBuilder {
    /// Creates a builder for the box at `address`.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            config: ClientConfig::new(address),
            tls: TlsConfig::default(),
        }
    }

    /// Enables frame-level diagnostics.
    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Sets the TLS credentials.
    #[must_use]
    pub fn tls(mut self, tls: TlsConfig) -> Self {
        self.tls = tls;
        self
    }

    /// Sets the identification fields sent with every request.
    #[must_use]
    pub fn identity(mut self, identity: DeviceIdentity) -> Self {
        self.config.identity = identity;
        self
    }

    /// Overrides the command channel port.
    #[must_use]
    pub fn command_port(mut self, port: u16) -> Self {
        self.config.command_port = port;
        self
    }

    /// Overrides the notification channel port.
    #[must_use]
    pub fn notification_port(mut self, port: u16) -> Self {
        self.config.notification_port = port;
        self
    }

    /// Sets the delay before reconnecting a channel.
    #[must_use]
    pub fn reconnect_delay(mut self, delay: Duration) -> Self {
        self.config.reconnect_delay = delay;
        self
    }

    /// Sets the keep-alive ping period.
    #[must_use]
    pub fn keep_alive_interval(mut self, interval: Duration) -> Self {
        self.config.keep_alive_interval = interval;
        self
    }

    /// Sets the margin added to the program end time before polling.
    #[must_use]
    pub fn refresh_margin(mut self, margin: Duration) -> Self {
        self.config.refresh_margin = margin;
        self
    }

    /// Sets the capacity of the event broadcast channel.
    #[must_use]
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.config.event_capacity = capacity;
        self
    }

    /// Returns the configuration built so far.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Starts the client over WebSocket/TLS.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the TLS credentials
    /// cannot be loaded.
    #[cfg(feature = "tls")]
    pub fn start(self) -> Result<LaboxClient> {
        let connector = crate::protocol::WsConnector::new(&self.tls)?;
        self.start_with(connector)
    }

    /// Starts the client over a custom transport.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid.
    pub fn start_with<C: Connector>(self, connector: C) -> Result<LaboxClient> {
        self.config.validate()?;
        Ok(LaboxClient::spawn(self.config, connector))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_config() {
        let builder = LaboxClientBuilder::new("10.0.0.2")
            .debug(true)
            .command_port(1000)
            .notification_port(1001)
            .reconnect_delay(Duration::from_secs(1))
            .keep_alive_interval(Duration::from_secs(2))
            .refresh_margin(Duration::from_secs(3))
            .event_capacity(8)
            .identity(DeviceIdentity::new("id", "model", "9"));

        let config = builder.config();
        assert!(config.debug);
        assert_eq!(config.command_port, 1000);
        assert_eq!(config.notification_port, 1001);
        assert_eq!(config.reconnect_delay, Duration::from_secs(1));
        assert_eq!(config.keep_alive_interval, Duration::from_secs(2));
        assert_eq!(config.refresh_margin, Duration::from_secs(3));
        assert_eq!(config.event_capacity, 8);
        assert_eq!(config.identity.device_id, "id");
    }
}
