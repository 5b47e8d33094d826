// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Client event types.

use serde::{Deserialize, Serialize};

use crate::state::{ChannelInfo, DeviceState, ProgramInfo, StateChange};

/// Events emitted by the client.
///
/// `Open` and `Close` follow the command channel's connectivity. The field
/// events carry the new value of one [`DeviceState`] field and are always
/// followed by a single `Update` carrying the whole new snapshot.
///
/// # Examples
///
/// ```
/// use labox_lib::event::DeviceEvent;
/// use labox_lib::state::{DeviceState, StateChange};
///
/// let mut state = DeviceState::new();
/// state.set_power(true);
///
/// let events = DeviceEvent::from_changes(vec![StateChange::Power(true)], &state);
/// assert_eq!(events, vec![DeviceEvent::Power(true), DeviceEvent::Update(state)]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceEvent {
    /// The command channel connected.
    Open,

    /// The command channel closed or failed; a reconnect is scheduled.
    Close,

    /// Power state changed.
    Power(bool),

    /// Volume level changed.
    Volume(u32),

    /// Mute flag changed.
    Mute(bool),

    /// Current channel changed.
    Channel(ChannelInfo),

    /// Current program changed.
    Program(ProgramInfo),

    /// At least one field changed; carries the full new snapshot.
    Update(DeviceState),
}

impl DeviceEvent {
    /// Builds the ordered event sequence for a set of changes.
    ///
    /// Returns one field event per change, in the order given, followed by an
    /// `Update` with `state`. Returns nothing when `changes` is empty.
    #[must_use]
    pub fn from_changes(changes: Vec<StateChange>, state: &DeviceState) -> Vec<Self> {
        if changes.is_empty() {
            return Vec::new();
        }
        let mut events: Vec<Self> = changes.into_iter().map(Self::from).collect();
        events.push(Self::Update(state.clone()));
        events
    }

    /// Returns the event name as used by the host-facing API.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
            Self::Power(_) => "power",
            Self::Volume(_) => "volume",
            Self::Mute(_) => "mute",
            Self::Channel(_) => "channel",
            Self::Program(_) => "program",
            Self::Update(_) => "update",
        }
    }
}

impl From<StateChange> for DeviceEvent {
    fn from(change: StateChange) -> Self {
        match change {
            StateChange::Power(power) => Self::Power(power),
            StateChange::Volume(volume) => Self::Volume(volume),
            StateChange::Mute(mute) => Self::Mute(mute),
            StateChange::Channel(channel) => Self::Channel(channel),
            StateChange::Program(program) => Self::Program(program),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_changes_no_events() {
        assert!(DeviceEvent::from_changes(Vec::new(), &DeviceState::new()).is_empty());
    }

    #[test]
    fn update_comes_last() {
        let mut state = DeviceState::new();
        state.set_volume(5);
        state.set_channel(ChannelInfo::new(None, 3, None));

        let events = DeviceEvent::from_changes(
            vec![
                StateChange::Volume(5),
                StateChange::Channel(ChannelInfo::new(None, 3, None)),
            ],
            &state,
        );
        let names: Vec<_> = events.iter().map(DeviceEvent::name).collect();
        assert_eq!(names, ["volume", "channel", "update"]);
        assert_eq!(events[2], DeviceEvent::Update(state));
    }
}
