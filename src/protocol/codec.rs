// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Frame codec.
//!
//! Decoding turns one inbound text frame into the next candidate
//! [`DeviceState`] plus the side effects the frame asks for. It never fails:
//! malformed input leaves the state unchanged.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::ChannelRole;
use crate::command::{ButtonPress, ChannelChange, Command, DeviceIdentity, StatusPoll, VolumePoll};
use crate::error::ParseError;
use crate::notification::{NotificationOutcome, apply_notification};
use crate::response::{ResponseOutcome, apply_response};
use crate::state::DeviceState;

/// Side effect requested by an inbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Re-poll the session status after the given delay.
    ScheduleRefresh(Duration),
    /// Poll the session status now.
    PollStatus,
}

/// Result of decoding one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// Candidate snapshot: the current state with the frame applied.
    pub state: DeviceState,
    /// Effects to run once the snapshot is committed.
    pub effects: Vec<Effect>,
}

impl Decoded {
    fn unchanged(current: &DeviceState) -> Self {
        Self {
            state: current.clone(),
            effects: Vec::new(),
        }
    }
}

/// Encodes outbound requests and decodes inbound frames.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use labox_lib::protocol::{ChannelRole, Codec};
/// use labox_lib::command::DeviceIdentity;
/// use labox_lib::state::DeviceState;
///
/// let codec = Codec::new(DeviceIdentity::default(), Duration::from_secs(15));
/// let decoded = codec.decode(
///     ChannelRole::Notification,
///     r#"{"Notification":"VolumeChanged","Params":{"Level":12}}"#,
///     &DeviceState::new(),
///     chrono::Utc::now(),
/// );
///
/// assert_eq!(decoded.state.volume(), 12);
/// ```
#[derive(Debug, Clone)]
pub struct Codec {
    identity: DeviceIdentity,
    refresh_margin: Duration,
}

impl Codec {
    /// Creates a codec.
    ///
    /// `refresh_margin` is added to the time left in the current program
    /// when scheduling the next status poll.
    #[must_use]
    pub fn new(identity: DeviceIdentity, refresh_margin: Duration) -> Self {
        Self {
            identity,
            refresh_margin,
        }
    }

    /// Returns the identity sent with every request.
    #[must_use]
    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    /// Decodes a frame received on the channel with the given `role`.
    ///
    /// Malformed frames yield `current` unchanged and no effects.
    #[must_use]
    pub fn decode(
        &self,
        role: ChannelRole,
        frame: &str,
        current: &DeviceState,
        now: DateTime<Utc>,
    ) -> Decoded {
        match self.try_decode(role, frame, current, now) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::debug!(%role, error = %e, frame, "Ignoring malformed frame");
                Decoded::unchanged(current)
            }
        }
    }

    /// Decodes a frame, reporting why a malformed one was rejected.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the frame is not JSON, or if a command
    /// response lacks `Action` or an object `Data`.
    pub fn try_decode(
        &self,
        role: ChannelRole,
        frame: &str,
        current: &DeviceState,
        now: DateTime<Utc>,
    ) -> Result<Decoded, ParseError> {
        let value: Value = serde_json::from_str(frame)?;
        let mut state = current.clone();
        let mut effects = Vec::new();

        match role {
            ChannelRole::Command => match apply_response(&value, &mut state)? {
                ResponseOutcome::Applied { end_time } => {
                    if let Some(remaining) = end_time.and_then(|end| end.remaining(now)) {
                        effects.push(Effect::ScheduleRefresh(remaining + self.refresh_margin));
                    }
                }
                ResponseOutcome::Acknowledged => {}
                ResponseOutcome::Unhandled(action) => {
                    tracing::debug!(action = %action, "No handling for command response");
                }
            },
            ChannelRole::Notification => match apply_notification(&value, &mut state) {
                NotificationOutcome::Applied => {}
                NotificationOutcome::PollStatus => effects.push(Effect::PollStatus),
                NotificationOutcome::Unhandled(name) => {
                    tracing::debug!(notification = %name, "No handling for notification");
                }
                NotificationOutcome::Ignored => {
                    tracing::trace!("Ignoring frame without Notification key");
                }
            },
        }

        Ok(Decoded { state, effects })
    }

    /// Encodes a `GetSessionsStatus` request.
    #[must_use]
    pub fn encode_status_poll(&self) -> String {
        StatusPoll.to_frame(&self.identity)
    }

    /// Encodes a `GetVolume` request.
    #[must_use]
    pub fn encode_volume_poll(&self) -> String {
        VolumePoll.to_frame(&self.identity)
    }

    /// Encodes a button press carrying `codes` in order.
    #[must_use]
    pub fn encode_button_press(&self, codes: &[u32]) -> String {
        ButtonPress::new(codes.to_vec()).to_frame(&self.identity)
    }

    /// Encodes a channel change to `channel_id`.
    #[must_use]
    pub fn encode_channel_change(&self, channel_id: &str) -> String {
        ChannelChange::new(channel_id).to_frame(&self.identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    use crate::state::ChannelInfo;

    fn codec() -> Codec {
        Codec::new(DeviceIdentity::default(), Duration::from_secs(15))
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 20, 0, 0).unwrap()
    }

    fn powered() -> DeviceState {
        let mut state = DeviceState::new();
        state.set_power(true);
        state
    }

    #[test]
    fn standby_response() {
        let decoded = codec().decode(
            ChannelRole::Command,
            r#"{"Action":"GetSessionsStatus","Data":{"CurrentApplication":"En Veille"}}"#,
            &powered(),
            now(),
        );
        assert!(!decoded.state.power());
        assert!(decoded.effects.is_empty());
    }

    #[test]
    fn end_time_schedules_refresh_with_margin() {
        let frame = json!({
            "Action": "GetSessionsStatus",
            "Data": {"LiveSession": {"LiveItem": {
                "CurrentProgram": {"Name": "Film", "EndTime": "2024-01-15T20:30:00Z"}
            }}}
        })
        .to_string();

        let decoded = codec().decode(ChannelRole::Command, &frame, &powered(), now());
        assert_eq!(
            decoded.effects,
            vec![Effect::ScheduleRefresh(Duration::from_secs(30 * 60 + 15))]
        );
    }

    #[test]
    fn past_end_time_schedules_nothing() {
        let frame = json!({
            "Action": "GetSessionsStatus",
            "Data": {"LiveSession": {"LiveItem": {
                "CurrentProgram": {"EndTime": "2024-01-15T19:59:59Z"}
            }}}
        })
        .to_string();

        let decoded = codec().decode(ChannelRole::Command, &frame, &powered(), now());
        assert!(decoded.effects.is_empty());
    }

    #[test]
    fn end_time_equal_to_now_schedules_margin_only() {
        let frame = json!({
            "Action": "GetSessionsStatus",
            "Data": {"LiveSession": {"LiveItem": {
                "CurrentProgram": {"EndTime": "2024-01-15T20:00:00Z"}
            }}}
        })
        .to_string();

        let decoded = codec().decode(ChannelRole::Command, &frame, &powered(), now());
        assert_eq!(
            decoded.effects,
            vec![Effect::ScheduleRefresh(Duration::from_secs(15))]
        );
    }

    #[test]
    fn status_update_requests_poll() {
        let current = powered();
        let decoded = codec().decode(
            ChannelRole::Notification,
            r#"{"Notification":"StatusUpdate"}"#,
            &current,
            now(),
        );
        assert_eq!(decoded.state, current);
        assert_eq!(decoded.effects, vec![Effect::PollStatus]);
    }

    #[test]
    fn role_selects_dispatch_key() {
        // A command response arriving on the notification channel is ignored
        let decoded = codec().decode(
            ChannelRole::Notification,
            r#"{"Action":"GetVolume","Data":{"CurrentLevel":50}}"#,
            &DeviceState::new(),
            now(),
        );
        assert_eq!(decoded.state.volume(), 0);
    }

    #[test]
    fn malformed_json_is_noop() {
        let mut current = powered();
        current.set_channel(ChannelInfo::new(Some("TF1".to_string()), 1, None));

        let decoded = codec().decode(ChannelRole::Command, "{not json", &current, now());
        assert_eq!(decoded.state, current);
        assert!(decoded.effects.is_empty());

        assert!(
            codec()
                .try_decode(ChannelRole::Command, "{not json", &current, now())
                .is_err()
        );
    }

    #[test]
    fn missing_data_is_noop() {
        let current = powered();
        let decoded = codec().decode(
            ChannelRole::Command,
            r#"{"Action":"GetSessionsStatus"}"#,
            &current,
            now(),
        );
        assert_eq!(decoded.state, current);
    }

    #[test]
    fn encoders_use_identity() {
        let codec = Codec::new(
            DeviceIdentity::new("abc", "Remote", "2.0"),
            Duration::from_secs(15),
        );
        let value: Value = serde_json::from_str(&codec.encode_status_poll()).unwrap();
        assert_eq!(value["Params"]["StbToken"], "abc");

        let value: Value = serde_json::from_str(&codec.encode_button_press(&[7, 8])).unwrap();
        assert_eq!(value["Params"]["Press"], json!([7, 8]));

        let value: Value = serde_json::from_str(&codec.encode_channel_change("12")).unwrap();
        assert_eq!(value["Params"]["Action"], "SetChannel");

        let value: Value = serde_json::from_str(&codec.encode_volume_poll()).unwrap();
        assert_eq!(value["Params"]["Action"], "GetVolume");
    }
}
