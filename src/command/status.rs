// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status and volume polls.

use serde_json::{Map, Value, json};

use super::{Command, DeviceIdentity};

/// Asks the box for its session status (power, live channel, program).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusPoll;

impl Command for StatusPoll {
    fn action(&self) -> &'static str {
        "GetSessionsStatus"
    }

    fn params(&self, identity: &DeviceIdentity) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("StbToken".to_string(), json!(identity.device_id));
        params
    }
}

/// Asks the box for its volume level and mute flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VolumePoll;

impl Command for VolumePoll {
    fn action(&self) -> &'static str {
        "GetVolume"
    }
}
