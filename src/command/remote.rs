// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Remote-control commands: button presses and channel changes.

use serde_json::{Map, Value, json};

use super::{Command, DeviceIdentity};

/// Intent marker sent with a channel change.
pub const CHANNEL_CHANGE_INTENT: &str = "ChannelChange";

/// Presses one or more remote-control buttons.
///
/// Codes are sent in order in the `Press` array.
///
/// # Examples
///
/// ```
/// use labox_lib::command::{ButtonPress, Command};
///
/// let press = ButtonPress::new(vec![2, 5]);
/// assert_eq!(press.action(), "ButtonEvent");
/// assert_eq!(press.codes(), &[2, 5]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonPress {
    codes: Vec<u32>,
}

impl ButtonPress {
    /// Creates a press of several buttons.
    #[must_use]
    pub fn new(codes: Vec<u32>) -> Self {
        Self { codes }
    }

    /// Creates a press of a single button.
    #[must_use]
    pub fn single(code: u32) -> Self {
        Self { codes: vec![code] }
    }

    /// Returns the button codes.
    #[must_use]
    pub fn codes(&self) -> &[u32] {
        &self.codes
    }
}

impl Command for ButtonPress {
    fn action(&self) -> &'static str {
        "ButtonEvent"
    }

    fn params(&self, _identity: &DeviceIdentity) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("Press".to_string(), json!(self.codes));
        params
    }
}

/// Tunes the live session to another channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelChange {
    channel_id: String,
}

impl ChannelChange {
    /// Creates a channel change to `channel_id`.
    #[must_use]
    pub fn new(channel_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
        }
    }

    /// Returns the target channel identifier.
    #[must_use]
    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }
}

impl Command for ChannelChange {
    fn action(&self) -> &'static str {
        "SetChannel"
    }

    fn params(&self, _identity: &DeviceIdentity) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("ChannelId".to_string(), json!(self.channel_id));
        params.insert("Intent".to_string(), json!(CHANNEL_CHANGE_INTENT));
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params_of(command: &impl Command) -> Value {
        let value: Value =
            serde_json::from_str(&command.to_frame(&DeviceIdentity::default())).unwrap();
        value["Params"].clone()
    }

    #[test]
    fn button_press_frame() {
        let params = params_of(&ButtonPress::single(352));
        assert_eq!(params["Action"], "ButtonEvent");
        assert_eq!(params["Press"], json!([352]));
        assert_eq!(params["Token"], "LAN");
    }

    #[test]
    fn button_press_keeps_order() {
        let params = params_of(&ButtonPress::new(vec![1, 2, 3]));
        assert_eq!(params["Press"], json!([1, 2, 3]));
    }

    #[test]
    fn channel_change_frame() {
        let change = ChannelChange::new("192");
        assert_eq!(change.channel_id(), "192");

        let params = params_of(&change);
        assert_eq!(params["Action"], "SetChannel");
        assert_eq!(params["ChannelId"], "192");
        assert_eq!(params["Intent"], CHANNEL_CHANGE_INTENT);
    }
}
