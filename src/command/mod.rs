// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outbound command definitions.
//!
//! Every request sent on the command channel has the same envelope:
//!
//! ```text
//! {"Params": {"Action": <name>, "Token": "LAN", "DeviceId": ..,
//!             "DeviceModel": .., "DeviceSoftVersion": .., ...}}
//! ```
//!
//! The identification fields come from a [`DeviceIdentity`]; each command
//! only contributes its action name and its own fields.
//!
//! | Command | Action | Extra fields |
//! |---------|--------|--------------|
//! | [`StatusPoll`] | `GetSessionsStatus` | `StbToken` |
//! | [`VolumePoll`] | `GetVolume` | none |
//! | [`ButtonPress`] | `ButtonEvent` | `Press: [codes]` |
//! | [`ChannelChange`] | `SetChannel` | `ChannelId`, `Intent` |
//!
//! # Examples
//!
//! ```
//! use labox_lib::command::{ButtonPress, Command, DeviceIdentity};
//!
//! let frame = ButtonPress::single(115).to_frame(&DeviceIdentity::default());
//! let json: serde_json::Value = serde_json::from_str(&frame).unwrap();
//!
//! assert_eq!(json["Params"]["Action"], "ButtonEvent");
//! assert_eq!(json["Params"]["Press"], serde_json::json!([115]));
//! ```

mod remote;
mod status;

pub use remote::{ButtonPress, ChannelChange};
pub use status::{StatusPoll, VolumePoll};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Authentication token used for requests sent over the local network.
pub const LAN_TOKEN: &str = "LAN";

/// Identification fields sent with every request.
///
/// The device accepts any stable values here; the defaults match what the
/// vendor's own remote application sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    /// Identifier of the remote-control client.
    pub device_id: String,
    /// Model name of the remote-control client.
    pub device_model: String,
    /// Software version of the remote-control client.
    pub device_soft_version: String,
    /// Session token.
    pub token: String,
}

impl DeviceIdentity {
    /// Creates an identity with the LAN token.
    #[must_use]
    pub fn new(
        device_id: impl Into<String>,
        device_model: impl Into<String>,
        device_soft_version: impl Into<String>,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            device_model: device_model.into(),
            device_soft_version: device_soft_version.into(),
            token: LAN_TOKEN.to_string(),
        }
    }
}

impl Default for DeviceIdentity {
    fn default() -> Self {
        Self::new("123456", "Model", "1.0")
    }
}

/// A request that can be sent on the command channel.
pub trait Command {
    /// Returns the `Action` name of the request.
    fn action(&self) -> &'static str;

    /// Returns the request-specific fields merged into `Params`.
    ///
    /// The default implementation adds nothing.
    fn params(&self, _identity: &DeviceIdentity) -> Map<String, Value> {
        Map::new()
    }

    /// Serializes the request into a JSON text frame.
    fn to_frame(&self, identity: &DeviceIdentity) -> String {
        let mut params = Map::new();
        params.insert("Action".to_string(), json!(self.action()));
        params.insert("Token".to_string(), json!(identity.token));
        params.insert("DeviceId".to_string(), json!(identity.device_id));
        params.insert("DeviceModel".to_string(), json!(identity.device_model));
        params.insert(
            "DeviceSoftVersion".to_string(),
            json!(identity.device_soft_version),
        );
        params.extend(self.params(identity));

        json!({ "Params": params }).to_string()
    }
}
