// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broadcast stream of client events.

use tokio::sync::broadcast;

use super::DeviceEvent;
use crate::client::DEFAULT_EVENT_CAPACITY;

/// Fan-out of [`DeviceEvent`]s to any number of receivers.
///
/// Every receiver sees the batches of one frame contiguously and in emission
/// order, exactly as the registered callbacks do.
///
/// # Slow receivers
///
/// Events are buffered per receiver up to the configured capacity
/// ([`ClientConfig::event_capacity`](crate::ClientConfig::event_capacity)).
/// A receiver that falls further behind skips the oldest events and gets
/// `RecvError::Lagged` with the number it missed. Callbacks and the other
/// receivers are unaffected.
///
/// # Examples
///
/// ```
/// use labox_lib::event::{DeviceEvent, EventBus};
///
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
///
/// bus.publish(DeviceEvent::Mute(true));
/// bus.publish(DeviceEvent::Close);
///
/// assert_eq!(rx.try_recv().unwrap(), DeviceEvent::Mute(true));
/// assert_eq!(rx.try_recv().unwrap(), DeviceEvent::Close);
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DeviceEvent>,
}

impl EventBus {
    /// Creates a bus holding up to [`DEFAULT_EVENT_CAPACITY`] unread events
    /// per receiver.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Creates a bus holding up to `capacity` unread events per receiver.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0. [`ClientConfig::validate`](crate::ClientConfig::validate)
    /// rejects that value before a client builds its bus.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Returns a receiver for events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of live receivers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Sends `event` to every live receiver.
    ///
    /// With no receiver the event is dropped.
    pub fn publish(&self, event: DeviceEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("No event receiver");
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_bus_has_no_subscribers() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn drop_subscriber_decrements_count() {
        let bus = EventBus::new();

        let rx1 = bus.subscribe();
        let _rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        drop(rx1);
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        let bus = EventBus::new();
        bus.publish(DeviceEvent::Open);
    }

    #[tokio::test]
    async fn publish_preserves_order_for_each_subscriber() {
        let bus = EventBus::new();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(DeviceEvent::Power(true));
        bus.publish(DeviceEvent::Volume(10));

        for rx in [&mut rx1, &mut rx2] {
            assert_eq!(rx.recv().await.unwrap(), DeviceEvent::Power(true));
            assert_eq!(rx.recv().await.unwrap(), DeviceEvent::Volume(10));
        }
    }

    #[tokio::test]
    async fn slow_receiver_reports_lag() {
        let bus = EventBus::with_capacity(2);
        let mut rx = bus.subscribe();

        bus.publish(DeviceEvent::Volume(1));
        bus.publish(DeviceEvent::Volume(2));
        bus.publish(DeviceEvent::Volume(3));

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(1))
        ));
        assert_eq!(rx.recv().await.unwrap(), DeviceEvent::Volume(2));
        assert_eq!(rx.recv().await.unwrap(), DeviceEvent::Volume(3));
    }

    #[test]
    fn clone_shares_same_channel() {
        let bus1 = EventBus::with_capacity(16);
        let bus2 = bus1.clone();

        let _rx = bus1.subscribe();
        assert_eq!(bus2.subscriber_count(), 1);
    }
}
