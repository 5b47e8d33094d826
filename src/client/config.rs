// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Client configuration.

use std::time::Duration;

use crate::command::DeviceIdentity;
use crate::error::{Error, ProtocolError};
use crate::protocol::{ChannelRole, DEFAULT_COMMAND_PORT, DEFAULT_NOTIFICATION_PORT, Endpoint};

/// Delay between a lost connection and the next attempt.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(10);

/// Period of the keep-alive ping.
pub const DEFAULT_KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(60);

/// Margin added to the end of the current program before polling again.
pub const DEFAULT_REFRESH_MARGIN: Duration = Duration::from_secs(15);

/// Default capacity of the event broadcast channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Settings of a [`LaboxClient`](crate::LaboxClient).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use labox_lib::client::ClientConfig;
///
/// let config = ClientConfig::new("192.168.1.20");
/// assert_eq!(config.command_port, 7682);
/// assert_eq!(config.reconnect_delay, Duration::from_secs(10));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Host name or IP address of the box.
    pub address: String,
    /// Port of the command channel.
    pub command_port: u16,
    /// Port of the notification channel.
    pub notification_port: u16,
    /// Enables frame-level diagnostics.
    pub debug: bool,
    /// Identification fields sent with every request.
    pub identity: DeviceIdentity,
    /// Delay before reconnecting a channel.
    pub reconnect_delay: Duration,
    /// Period of the keep-alive ping.
    pub keep_alive_interval: Duration,
    /// Margin added to the program end time before polling status.
    pub refresh_margin: Duration,
    /// Capacity of the event broadcast channel.
    pub event_capacity: usize,
}

impl ClientConfig {
    /// Creates a configuration with default settings for `address`.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            command_port: DEFAULT_COMMAND_PORT,
            notification_port: DEFAULT_NOTIFICATION_PORT,
            debug: false,
            identity: DeviceIdentity::default(),
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            keep_alive_interval: DEFAULT_KEEP_ALIVE_INTERVAL,
            refresh_margin: DEFAULT_REFRESH_MARGIN,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }

    /// Returns the endpoint of the channel with the given role.
    #[must_use]
    pub fn endpoint(&self, role: ChannelRole) -> Endpoint {
        let port = match role {
            ChannelRole::Command => self.command_port,
            ChannelRole::Notification => self.notification_port,
        };
        Endpoint::new(self.address.clone(), port, role)
    }

    /// Checks that the configuration can be used to start a client.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidAddress`] for an empty address, an
    /// address with a scheme or a zero port, and
    /// [`Error::InvalidConfiguration`] for a zero reconnect delay, keep-alive
    /// interval or event capacity.
    pub fn validate(&self) -> Result<(), Error> {
        let address = self.address.trim();
        if address.is_empty() {
            return Err(ProtocolError::InvalidAddress("address is empty".to_string()).into());
        }
        if address.contains("://") || address.contains('/') {
            return Err(ProtocolError::InvalidAddress(format!(
                "expected a host name or IP address, got '{address}'"
            ))
            .into());
        }
        if self.command_port == 0 || self.notification_port == 0 {
            return Err(ProtocolError::InvalidAddress("port must not be 0".to_string()).into());
        }
        if self.reconnect_delay.is_zero() {
            return Err(Error::InvalidConfiguration(
                "reconnect delay must not be zero".to_string(),
            ));
        }
        if self.keep_alive_interval.is_zero() {
            return Err(Error::InvalidConfiguration(
                "keep-alive interval must not be zero".to_string(),
            ));
        }
        if self.event_capacity == 0 {
            return Err(Error::InvalidConfiguration(
                "event capacity must not be 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::new("labox.local");
        assert_eq!(config.notification_port, 7684);
        assert_eq!(config.keep_alive_interval, Duration::from_secs(60));
        assert_eq!(config.refresh_margin, Duration::from_secs(15));
        assert!(!config.debug);
        assert_eq!(config.identity, DeviceIdentity::default());
    }

    #[test]
    fn endpoints_follow_ports() {
        let mut config = ClientConfig::new("10.0.0.2");
        config.notification_port = 9000;

        assert_eq!(
            config.endpoint(ChannelRole::Command).url(),
            "wss://10.0.0.2:7682"
        );
        assert_eq!(
            config.endpoint(ChannelRole::Notification).url(),
            "wss://10.0.0.2:9000"
        );
    }

    #[test]
    fn rejects_bad_addresses() {
        assert!(ClientConfig::new("").validate().is_err());
        assert!(ClientConfig::new("   ").validate().is_err());
        assert!(ClientConfig::new("wss://10.0.0.2").validate().is_err());

        let mut config = ClientConfig::new("10.0.0.2");
        config.command_port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_keep_alive() {
        let mut config = ClientConfig::new("10.0.0.2");
        config.keep_alive_interval = Duration::ZERO;
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn rejects_zero_reconnect_delay() {
        let mut config = ClientConfig::new("10.0.0.2");
        config.reconnect_delay = Duration::ZERO;
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration(msg)) if msg.contains("reconnect")
        ));

        config.reconnect_delay = Duration::from_millis(1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_event_capacity() {
        let mut config = ClientConfig::new("10.0.0.2");
        config.event_capacity = 0;
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration(_))
        ));
    }
}
