// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for types that emit client events.

use crate::event::DeviceEvent;
use crate::state::{ChannelInfo, DeviceState, ProgramInfo};
use crate::subscription::SubscriptionId;

/// Trait for types that support event subscriptions.
///
/// Field callbacks for one state change always run before the `update`
/// callback for that change, and changes are delivered in the order power,
/// volume, mute, channel, program.
///
/// # Examples
///
/// ```no_run
/// use labox_lib::LaboxClient;
/// use labox_lib::subscription::Subscribable;
///
/// # async fn example() -> labox_lib::Result<()> {
/// let client = LaboxClient::start("192.168.1.20", false)?;
///
/// let sub_id = client.on_channel(|channel| {
///     println!("Now watching {:?}", channel.name);
/// });
///
/// client.on_update(|state| {
///     println!("Volume {} (muted: {})", state.volume(), state.mute());
/// });
///
/// client.unsubscribe(sub_id);
/// # Ok(())
/// # }
/// ```
pub trait Subscribable {
    /// Subscribes to command channel connections.
    fn on_open<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static;

    /// Subscribes to command channel disconnections.
    fn on_close<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static;

    /// Subscribes to power (standby) changes.
    fn on_power<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static;

    /// Subscribes to volume changes.
    fn on_volume<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(u32) + Send + Sync + 'static;

    /// Subscribes to mute changes.
    fn on_mute<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static;

    /// Subscribes to channel changes.
    fn on_channel<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&ChannelInfo) + Send + Sync + 'static;

    /// Subscribes to program changes.
    fn on_program<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&ProgramInfo) + Send + Sync + 'static;

    /// Subscribes to the aggregate update event (full new snapshot).
    fn on_update<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceState) + Send + Sync + 'static;

    /// Subscribes to every event.
    fn on_event<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceEvent) + Send + Sync + 'static;

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
