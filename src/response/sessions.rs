// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `GetSessionsStatus` response.
//!
//! The live session is replaced wholesale: when the box reports a live item,
//! its channel and program overwrite the previous ones, missing leaves
//! becoming `None`/`0`. When it reports no live item, both are reset.

use serde_json::Value;

use super::{integer, text};
use crate::state::{ChannelInfo, DeviceState, ProgramInfo};
use crate::types::ProgramEndTime;

/// Value of `CurrentApplication` while the box is in standby.
pub const STANDBY_APPLICATION: &str = "En Veille";

/// Applies a `GetSessionsStatus` payload.
///
/// Returns the end time of the current program when the payload carries a
/// parseable `LiveSession.LiveItem.CurrentProgram.EndTime`.
///
/// # Examples
///
/// ```
/// use labox_lib::response::apply_sessions_status;
/// use labox_lib::state::DeviceState;
///
/// let mut state = DeviceState::new();
/// let data = serde_json::json!({
///     "CurrentApplication": "LiveTV",
///     "LiveSession": {"LiveItem": {"CurrentChannel": {"Name": "TF1", "Id": "1"}}}
/// });
///
/// apply_sessions_status(&data, &mut state);
/// assert!(state.power());
/// assert_eq!(state.channel().number, 1);
/// assert!(state.program().is_reset());
/// ```
pub fn apply_sessions_status(data: &Value, state: &mut DeviceState) -> Option<ProgramEndTime> {
    if let Some(application) = data.get("CurrentApplication") {
        state.set_power(application.as_str() != Some(STANDBY_APPLICATION));
    }

    let Some(item) = data.get("LiveSession").and_then(|s| s.get("LiveItem")) else {
        state.reset_channel();
        state.reset_program();
        return None;
    };

    match item.get("CurrentChannel") {
        Some(channel) => state.set_channel(parse_channel(channel)),
        None => state.reset_channel(),
    }

    let program = item.get("CurrentProgram");
    match program {
        Some(program) => state.set_program(parse_program(program)),
        None => state.reset_program(),
    }

    let end_time = program.and_then(|p| p.get("EndTime"))?;
    let parsed = ProgramEndTime::from_json(end_time);
    if parsed.is_none() {
        tracing::trace!(%end_time, "Ignoring unparseable EndTime");
    }
    parsed
}

fn parse_channel(channel: &Value) -> ChannelInfo {
    ChannelInfo::new(
        channel.get("Name").and_then(text),
        channel.get("Id").and_then(integer).unwrap_or(0),
        channel.get("Category").and_then(text),
    )
}

fn parse_program(program: &Value) -> ProgramInfo {
    ProgramInfo::new(
        program.get("Name").and_then(text),
        program.get("Category").and_then(text),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn watching() -> DeviceState {
        let mut state = DeviceState::new();
        state.set_power(true);
        state.set_volume(25);
        state.set_channel(ChannelInfo::new(
            Some("France 5".to_string()),
            5,
            Some("Culture".to_string()),
        ));
        state.set_program(ProgramInfo::new(
            Some("Documentaire".to_string()),
            Some("Nature".to_string()),
        ));
        state
    }

    #[test]
    fn standby_only_touches_power() {
        let mut state = watching();
        let end = apply_sessions_status(&json!({"CurrentApplication": "En Veille"}), &mut state);

        assert!(end.is_none());
        assert!(!state.power());
        // No live item: channel and program are reset too
        assert!(state.channel().is_reset());
        assert!(state.program().is_reset());
        assert_eq!(state.volume(), 25);
    }

    #[test]
    fn non_standby_application_means_powered() {
        let mut state = DeviceState::new();
        apply_sessions_status(
            &json!({"CurrentApplication": "Netflix", "LiveSession": {"LiveItem": {}}}),
            &mut state,
        );
        assert!(state.power());
    }

    #[test]
    fn missing_application_leaves_power() {
        let mut state = watching();
        apply_sessions_status(&json!({}), &mut state);
        assert!(state.power());
    }

    #[test]
    fn full_live_item() {
        let mut state = DeviceState::new();
        let end = apply_sessions_status(
            &json!({
                "CurrentApplication": "LiveTV",
                "LiveSession": {"LiveItem": {
                    "CurrentChannel": {"Name": "Arte", "Id": "7", "Category": "Culture"},
                    "CurrentProgram": {
                        "Name": "Metropolis",
                        "Category": "Magazine",
                        "EndTime": "2024-01-15T21:10:00Z"
                    }
                }}
            }),
            &mut state,
        );

        assert_eq!(
            state.channel(),
            &ChannelInfo::new(Some("Arte".to_string()), 7, Some("Culture".to_string()))
        );
        assert_eq!(
            state.program(),
            &ProgramInfo::new(Some("Metropolis".to_string()), Some("Magazine".to_string()))
        );
        assert_eq!(end, "2024-01-15T21:10:00Z".parse().ok());
    }

    #[test]
    fn missing_channel_resets_channel_only() {
        let mut state = watching();
        apply_sessions_status(
            &json!({"LiveSession": {"LiveItem": {
                "CurrentProgram": {"Name": "Documentaire", "Category": "Nature"}
            }}}),
            &mut state,
        );
        assert_eq!(state.channel(), &ChannelInfo::new(None, 0, None));
        assert_eq!(state.program(), watching().program());
    }

    #[test]
    fn missing_leaves_become_none() {
        let mut state = watching();
        apply_sessions_status(
            &json!({"LiveSession": {"LiveItem": {
                "CurrentChannel": {"Id": 5},
                "CurrentProgram": {}
            }}}),
            &mut state,
        );
        assert_eq!(state.channel(), &ChannelInfo::new(None, 5, None));
        assert!(state.program().is_reset());
    }

    #[test]
    fn unparseable_end_time_is_ignored() {
        let mut state = DeviceState::new();
        let end = apply_sessions_status(
            &json!({"LiveSession": {"LiveItem": {
                "CurrentProgram": {"Name": "News", "EndTime": "later"}
            }}}),
            &mut state,
        );
        assert!(end.is_none());
        assert_eq!(state.program().name.as_deref(), Some("News"));
    }
}
