// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Notification channel messages.
//!
//! The box pushes `{"Notification": <name>, "Params": {...}}` when something
//! changes on its side. Some notifications carry no `Params` and only tell
//! the client to poll again.
//!
//! | Notification | Params | Effect |
//! |--------------|--------|--------|
//! | `VolumeChanged` | `Level` | volume = Level, mute = false |
//! | `Mute` | `State` | mute = State |
//! | `StatusUpdate` | none | poll `GetSessionsStatus` |

use serde_json::Value;

use crate::response::integer;
use crate::state::DeviceState;

/// Outcome of folding a notification into a state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// The notification was applied to the state.
    Applied,
    /// The device asks for a fresh status poll.
    PollStatus,
    /// The notification is not handled by this client.
    Unhandled(String),
    /// The frame is not a notification.
    Ignored,
}

/// Folds a parsed notification frame into `state`.
///
/// # Examples
///
/// ```
/// use labox_lib::notification::{apply_notification, NotificationOutcome};
/// use labox_lib::state::DeviceState;
///
/// let mut state = DeviceState::new();
/// let frame = serde_json::json!({"Notification": "Mute", "Params": {"State": true}});
///
/// assert_eq!(apply_notification(&frame, &mut state), NotificationOutcome::Applied);
/// assert!(state.mute());
/// ```
pub fn apply_notification(frame: &Value, state: &mut DeviceState) -> NotificationOutcome {
    let Some(name) = frame.get("Notification").and_then(Value::as_str) else {
        return NotificationOutcome::Ignored;
    };

    let Some(params) = frame.get("Params") else {
        return match name {
            "StatusUpdate" => NotificationOutcome::PollStatus,
            other => NotificationOutcome::Unhandled(other.to_string()),
        };
    };

    match name {
        "VolumeChanged" => {
            if let Some(level) = params.get("Level") {
                match integer(level) {
                    Some(volume) => state.set_volume(volume),
                    None => tracing::trace!(%level, "Ignoring unparseable Level"),
                }
                state.set_mute(false);
            }
            NotificationOutcome::Applied
        }
        "Mute" => {
            if let Some(mute) = params.get("State").and_then(Value::as_bool) {
                state.set_mute(mute);
            }
            NotificationOutcome::Applied
        }
        other => NotificationOutcome::Unhandled(other.to_string()),
    }
}
