// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `GetVolume` response.

use serde_json::Value;

use super::integer;
use crate::state::DeviceState;

/// Applies a `GetVolume` payload.
///
/// `CurrentLevel` and `IsMute` are independent: each one is applied only if
/// present and well-typed.
///
/// # Examples
///
/// ```
/// use labox_lib::response::apply_volume;
/// use labox_lib::state::DeviceState;
///
/// let mut state = DeviceState::new();
/// apply_volume(&serde_json::json!({"CurrentLevel": "35", "IsMute": false}), &mut state);
/// assert_eq!(state.volume(), 35);
/// ```
pub fn apply_volume(data: &Value, state: &mut DeviceState) {
    if let Some(level) = data.get("CurrentLevel") {
        match integer(level) {
            Some(volume) => state.set_volume(volume),
            None => tracing::trace!(%level, "Ignoring unparseable CurrentLevel"),
        }
    }
    if let Some(mute) = data.get("IsMute").and_then(Value::as_bool) {
        state.set_mute(mute);
    }
}
