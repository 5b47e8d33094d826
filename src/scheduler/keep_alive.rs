// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Keep-alive ticker.

use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior, interval_at};

use crate::protocol::ChannelHandle;

/// Pings every open channel once per `period`. Never returns.
///
/// The first tick happens one full period after the call. Channels that are
/// connecting or reconnecting are skipped.
pub async fn run_keep_alive(period: Duration, channels: Vec<ChannelHandle>, debug: bool) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        for channel in &channels {
            if channel.ping() && debug {
                tracing::debug!(role = %channel.role(), "Sending keep-alive ping");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{ChannelRole, ChannelStatus, Frame};

    #[tokio::test(start_paused = true)]
    async fn pings_only_open_channels() {
        let (command, mut command_rx) = ChannelHandle::new(ChannelRole::Command);
        let (notification, mut notification_rx) = ChannelHandle::new(ChannelRole::Notification);
        command.set_status(ChannelStatus::Open);
        notification.set_status(ChannelStatus::Reconnecting);

        let task = tokio::spawn(run_keep_alive(
            Duration::from_secs(60),
            vec![command.clone(), notification.clone()],
            true,
        ));

        tokio::time::sleep(Duration::from_secs(59)).await;
        assert!(command_rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(command_rx.try_recv().unwrap(), Frame::Ping(Vec::new()));
        assert!(notification_rx.try_recv().is_err());

        notification.set_status(ChannelStatus::Open);
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(command_rx.try_recv().unwrap(), Frame::Ping(Vec::new()));
        assert_eq!(notification_rx.try_recv().unwrap(), Frame::Ping(Vec::new()));

        task.abort();
    }
}
