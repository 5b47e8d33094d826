// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation and snapshot diffing.
//!
//! A [`StateChange`] names one field of [`DeviceState`] together with its new
//! value. [`diff`] compares two snapshots and returns the changes in the fixed
//! order power, volume, mute, channel, program. That order is the order in
//! which field events reach subscribers.
//!
//! # Examples
//!
//! ```
//! use labox_lib::state::{diff, DeviceState, StateChange};
//!
//! let before = DeviceState::new();
//! let mut after = before.clone();
//! after.set_volume(30);
//! after.set_mute(true);
//!
//! assert_eq!(
//!     diff(&before, &after),
//!     vec![StateChange::Volume(30), StateChange::Mute(true)]
//! );
//! assert!(diff(&after, &after).is_empty());
//! ```

use serde::{Deserialize, Serialize};

use super::{ChannelInfo, DeviceState, ProgramInfo};

/// A change of one [`DeviceState`] field, carrying the new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateChange {
    /// Power (standby) state changed.
    Power(bool),

    /// Volume level changed.
    Volume(u32),

    /// Mute flag changed.
    Mute(bool),

    /// At least one leaf of the current channel changed.
    Channel(ChannelInfo),

    /// At least one leaf of the current program changed.
    Program(ProgramInfo),
}

impl StateChange {
    /// Returns the name of the field this change concerns.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::Power(_) => "power",
            Self::Volume(_) => "volume",
            Self::Mute(_) => "mute",
            Self::Channel(_) => "channel",
            Self::Program(_) => "program",
        }
    }
}

/// Compares two snapshots field by field.
///
/// The result lists one change per differing field, in the order power,
/// volume, mute, channel, program. It is empty when both snapshots are equal.
#[must_use]
pub fn diff(before: &DeviceState, after: &DeviceState) -> Vec<StateChange> {
    let mut changes = Vec::new();

    if before.power() != after.power() {
        changes.push(StateChange::Power(after.power()));
    }
    if before.volume() != after.volume() {
        changes.push(StateChange::Volume(after.volume()));
    }
    if before.mute() != after.mute() {
        changes.push(StateChange::Mute(after.mute()));
    }
    if before.channel() != after.channel() {
        changes.push(StateChange::Channel(after.channel().clone()));
    }
    if before.program() != after.program() {
        changes.push(StateChange::Program(after.program().clone()));
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuned() -> DeviceState {
        let mut state = DeviceState::new();
        state.set_power(true);
        state.set_volume(12);
        state.set_channel(ChannelInfo::new(
            Some("France 2".to_string()),
            2,
            Some("Generaliste".to_string()),
        ));
        state.set_program(ProgramInfo::new(
            Some("Journal".to_string()),
            Some("Info".to_string()),
        ));
        state
    }

    #[test]
    fn identical_snapshots_have_no_changes() {
        let state = tuned();
        assert!(diff(&state, &state.clone()).is_empty());
    }

    #[test]
    fn volume_and_channel_change_in_order() {
        let before = tuned();
        let mut after = before.clone();
        after.set_volume(40);
        after.set_channel(ChannelInfo::new(Some("Arte".to_string()), 7, None));

        let changes = diff(&before, &after);
        assert_eq!(
            changes,
            vec![
                StateChange::Volume(40),
                StateChange::Channel(ChannelInfo::new(Some("Arte".to_string()), 7, None)),
            ]
        );
    }

    #[test]
    fn single_leaf_marks_channel_changed() {
        let before = tuned();
        let mut after = before.clone();
        let mut channel = after.channel().clone();
        channel.category = None;
        after.set_channel(channel);

        let changes = diff(&before, &after);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field(), "channel");
    }

    #[test]
    fn every_field_changed_keeps_fixed_order() {
        let before = tuned();
        let after = DeviceState::new();

        let fields: Vec<_> = diff(&before, &after)
            .iter()
            .map(StateChange::field)
            .collect();
        assert_eq!(fields, ["power", "volume", "channel", "program"]);

        let mut muted = after.clone();
        muted.set_mute(true);
        let fields: Vec<_> = diff(&before, &muted)
            .iter()
            .map(StateChange::field)
            .collect();
        assert_eq!(fields, ["power", "volume", "mute", "channel", "program"]);
    }
}
