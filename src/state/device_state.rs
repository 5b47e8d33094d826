// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Set-top-box state snapshot.

use serde::{Deserialize, Serialize};

/// The channel currently tuned on the live session.
///
/// All leaves are nullable; the default value is the "reset" channel
/// (`name: None, number: 0, category: None`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    /// Display name of the channel.
    pub name: Option<String>,
    /// Channel number as reported by the device (`0` when unknown).
    pub number: u32,
    /// Channel category (e.g. "Generaliste").
    pub category: Option<String>,
}

impl ChannelInfo {
    /// Creates a channel description.
    #[must_use]
    pub fn new(name: Option<String>, number: u32, category: Option<String>) -> Self {
        Self {
            name,
            number,
            category,
        }
    }

    /// Returns `true` if this is the reset value.
    #[must_use]
    pub fn is_reset(&self) -> bool {
        *self == Self::default()
    }
}

/// The program currently airing on the live channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramInfo {
    /// Title of the program.
    pub name: Option<String>,
    /// Program category (e.g. "Film", "Sport").
    pub category: Option<String>,
}

impl ProgramInfo {
    /// Creates a program description.
    #[must_use]
    pub fn new(name: Option<String>, category: Option<String>) -> Self {
        Self { name, category }
    }

    /// Returns `true` if this is the reset value.
    #[must_use]
    pub fn is_reset(&self) -> bool {
        *self == Self::default()
    }
}

/// Last known state of the set-top box.
///
/// `DeviceState` is a plain value: every inbound frame produces a new
/// snapshot by cloning the previous one and overwriting only the fields the
/// frame carries. `channel` and `program` are always present, only their
/// leaves are optional.
///
/// # Examples
///
/// ```
/// use labox_lib::state::DeviceState;
///
/// let mut state = DeviceState::new();
/// assert!(!state.power());
///
/// state.set_volume(42);
/// assert_eq!(state.volume(), 42);
/// assert!(state.channel().is_reset());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceState {
    /// Whether the box is out of standby.
    power: bool,
    /// Volume level as reported by the device.
    volume: u32,
    /// Whether audio is muted.
    mute: bool,
    /// Current live channel.
    channel: ChannelInfo,
    /// Current live program.
    program: ProgramInfo,
}

impl DeviceState {
    /// Creates the initial state (standby, volume 0, nothing tuned).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the box is powered on.
    #[must_use]
    pub fn power(&self) -> bool {
        self.power
    }

    /// Sets the power flag.
    pub fn set_power(&mut self, power: bool) {
        self.power = power;
    }

    /// Returns the volume level.
    #[must_use]
    pub fn volume(&self) -> u32 {
        self.volume
    }

    /// Sets the volume level.
    pub fn set_volume(&mut self, volume: u32) {
        self.volume = volume;
    }

    /// Returns `true` if audio is muted.
    #[must_use]
    pub fn mute(&self) -> bool {
        self.mute
    }

    /// Sets the mute flag.
    pub fn set_mute(&mut self, mute: bool) {
        self.mute = mute;
    }

    /// Returns the current channel.
    #[must_use]
    pub fn channel(&self) -> &ChannelInfo {
        &self.channel
    }

    /// Replaces the current channel.
    pub fn set_channel(&mut self, channel: ChannelInfo) {
        self.channel = channel;
    }

    /// Resets the channel to `{ None, 0, None }`.
    pub fn reset_channel(&mut self) {
        self.channel = ChannelInfo::default();
    }

    /// Returns the current program.
    #[must_use]
    pub fn program(&self) -> &ProgramInfo {
        &self.program
    }

    /// Replaces the current program.
    pub fn set_program(&mut self, program: ProgramInfo) {
        self.program = program;
    }

    /// Resets the program to `{ None, None }`.
    pub fn reset_program(&mut self) {
        self.program = ProgramInfo::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_standby() {
        let state = DeviceState::new();
        assert!(!state.power());
        assert_eq!(state.volume(), 0);
        assert!(!state.mute());
        assert!(state.channel().is_reset());
        assert!(state.program().is_reset());
    }

    #[test]
    fn reset_channel_clears_all_leaves() {
        let mut state = DeviceState::new();
        state.set_channel(ChannelInfo::new(
            Some("TF1".to_string()),
            1,
            Some("Generaliste".to_string()),
        ));
        assert!(!state.channel().is_reset());

        state.reset_channel();
        assert_eq!(state.channel(), &ChannelInfo::new(None, 0, None));
    }

    #[test]
    fn serializes_with_nested_objects() {
        let state = DeviceState::new();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "power": false,
                "volume": 0,
                "mute": false,
                "channel": { "name": null, "number": 0, "category": null },
                "program": { "name": null, "category": null }
            })
        );
    }
}
