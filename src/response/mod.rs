// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command channel responses.
//!
//! Responses have the shape `{"Action": <name>, "Data": {...}}`. Each
//! recognized action folds its `Data` object into a [`DeviceState`],
//! touching only the fields the payload carries.
//!
//! | Action | Updates |
//! |--------|---------|
//! | `GetSessionsStatus` | power, channel, program (+ program end time) |
//! | `GetVolume` | volume, mute |
//! | `ButtonEvent` | nothing (acknowledgement) |

mod sessions;
mod volume;

pub use sessions::{STANDBY_APPLICATION, apply_sessions_status};
pub use volume::apply_volume;

use serde_json::Value;

use crate::error::ParseError;
use crate::state::DeviceState;
use crate::types::ProgramEndTime;

/// Outcome of folding a command response into a state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// The response was applied.
    Applied {
        /// End time of the current program, when the response reported one.
        end_time: Option<ProgramEndTime>,
    },
    /// The action is known but carries no state (e.g. `ButtonEvent`).
    Acknowledged,
    /// The action is not handled by this client.
    Unhandled(String),
}

/// Folds a parsed command response into `state`.
///
/// # Errors
///
/// Returns [`ParseError::MissingField`] when `Action` or `Data` is missing,
/// and [`ParseError::InvalidValue`] when `Data` is not an object.
pub fn apply_response(
    frame: &Value,
    state: &mut DeviceState,
) -> Result<ResponseOutcome, ParseError> {
    let action = frame
        .get("Action")
        .and_then(Value::as_str)
        .ok_or_else(|| ParseError::MissingField("Action".to_string()))?;
    let data = frame
        .get("Data")
        .ok_or_else(|| ParseError::MissingField("Data".to_string()))?;
    if !data.is_object() {
        return Err(ParseError::InvalidValue {
            field: "Data".to_string(),
            message: "expected an object".to_string(),
        });
    }

    match action {
        "GetSessionsStatus" => Ok(ResponseOutcome::Applied {
            end_time: apply_sessions_status(data, state),
        }),
        "GetVolume" => {
            apply_volume(data, state);
            Ok(ResponseOutcome::Applied { end_time: None })
        }
        "ButtonEvent" => Ok(ResponseOutcome::Acknowledged),
        other => Ok(ResponseOutcome::Unhandled(other.to_string())),
    }
}

/// Reads a textual leaf. Numbers are rendered as text.
pub(crate) fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads an integer the way the device formats them: either a JSON number
/// or a string starting with digits (`"42"`, `"42 dB"`).
pub(crate) fn integer(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                return u32::try_from(v).ok();
            }
            let f = n
                .as_f64()
                .filter(|f| f.is_finite() && (0.0..=f64::from(u32::MAX)).contains(f))?;
            // Safe: range checked above
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let v = f.trunc() as u32;
            Some(v)
        }
        Value::String(s) => {
            let s = s.trim_start();
            let s = s.strip_prefix('+').unwrap_or(s);
            let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
            s[..end].parse().ok()
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_action_is_an_error() {
        let mut state = DeviceState::new();
        let err = apply_response(&json!({"Data": {}}), &mut state).unwrap_err();
        assert!(matches!(err, ParseError::MissingField(f) if f == "Action"));
    }

    #[test]
    fn missing_data_is_an_error() {
        let mut state = DeviceState::new();
        let err = apply_response(&json!({"Action": "GetVolume"}), &mut state).unwrap_err();
        assert!(matches!(err, ParseError::MissingField(f) if f == "Data"));
    }

    #[test]
    fn non_object_data_is_an_error() {
        let mut state = DeviceState::new();
        let frame = json!({"Action": "GetVolume", "Data": null});
        assert!(apply_response(&frame, &mut state).is_err());
        assert_eq!(state, DeviceState::new());
    }

    #[test]
    fn button_event_is_acknowledged() {
        let mut state = DeviceState::new();
        let frame = json!({"Action": "ButtonEvent", "Data": {"Result": "OK"}});
        assert_eq!(
            apply_response(&frame, &mut state).unwrap(),
            ResponseOutcome::Acknowledged
        );
        assert_eq!(state, DeviceState::new());
    }

    #[test]
    fn unknown_action_is_unhandled() {
        let mut state = DeviceState::new();
        let frame = json!({"Action": "GetRecordings", "Data": {}});
        assert_eq!(
            apply_response(&frame, &mut state).unwrap(),
            ResponseOutcome::Unhandled("GetRecordings".to_string())
        );
    }

    #[test]
    fn integer_parsing() {
        assert_eq!(integer(&json!(42)), Some(42));
        assert_eq!(integer(&json!(42.9)), Some(42));
        assert_eq!(integer(&json!("17")), Some(17));
        assert_eq!(integer(&json!(" 8 dB")), Some(8));
        assert_eq!(integer(&json!("abc")), None);
        assert_eq!(integer(&json!(-1)), None);
        assert_eq!(integer(&json!(true)), None);
    }

    #[test]
    fn text_parsing() {
        assert_eq!(text(&json!("TF1")), Some("TF1".to_string()));
        assert_eq!(text(&json!(5)), Some("5".to_string()));
        assert_eq!(text(&json!(null)), None);
    }
}
