// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for client event subscriptions.
//!
//! This module provides the core types for managing subscription callbacks:
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry for storing and dispatching callbacks

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::event::DeviceEvent;
use crate::state::{ChannelInfo, DeviceState, ProgramInfo};

/// Unique identifier for a subscription.
///
/// This ID is returned when creating a subscription and can be used to
/// unsubscribe later. IDs are unique within a client's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a new subscription ID with the given value.
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

type ConnectionCallback = Arc<dyn Fn() + Send + Sync>;
type FlagCallback = Arc<dyn Fn(bool) + Send + Sync>;
type VolumeCallback = Arc<dyn Fn(u32) + Send + Sync>;
type ChannelCallback = Arc<dyn Fn(&ChannelInfo) + Send + Sync>;
type ProgramCallback = Arc<dyn Fn(&ProgramInfo) + Send + Sync>;
type UpdateCallback = Arc<dyn Fn(&DeviceState) + Send + Sync>;
type EventCallback = Arc<dyn Fn(&DeviceEvent) + Send + Sync>;

type Slot<C> = RwLock<HashMap<SubscriptionId, C>>;

/// Registry for client subscription callbacks.
///
/// Thread-safe through `parking_lot::RwLock`. Callbacks are cloned out of
/// the registry before they run, so a callback may subscribe or unsubscribe
/// without deadlocking.
pub struct CallbackRegistry {
    /// Counter for generating unique subscription IDs.
    next_id: AtomicU64,
    open_callbacks: Slot<ConnectionCallback>,
    close_callbacks: Slot<ConnectionCallback>,
    power_callbacks: Slot<FlagCallback>,
    volume_callbacks: Slot<VolumeCallback>,
    mute_callbacks: Slot<FlagCallback>,
    channel_callbacks: Slot<ChannelCallback>,
    program_callbacks: Slot<ProgramCallback>,
    update_callbacks: Slot<UpdateCallback>,
    /// Callbacks receiving every event.
    event_callbacks: Slot<EventCallback>,
}

fn snapshot<C: Clone>(slot: &Slot<C>) -> Vec<C> {
    slot.read().values().cloned().collect()
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            open_callbacks: RwLock::new(HashMap::new()),
            close_callbacks: RwLock::new(HashMap::new()),
            power_callbacks: RwLock::new(HashMap::new()),
            volume_callbacks: RwLock::new(HashMap::new()),
            mute_callbacks: RwLock::new(HashMap::new()),
            channel_callbacks: RwLock::new(HashMap::new()),
            program_callbacks: RwLock::new(HashMap::new()),
            update_callbacks: RwLock::new(HashMap::new()),
            event_callbacks: RwLock::new(HashMap::new()),
        }
    }

    /// Generates a new unique subscription ID.
    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    // =========================================================================
    // Registration methods
    // =========================================================================

    /// Registers a callback for when the command channel connects.
    pub fn on_open<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.open_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for when the command channel disconnects.
    pub fn on_close<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.close_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for power state changes.
    pub fn on_power<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.power_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for volume changes.
    pub fn on_volume<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(u32) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.volume_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for mute changes.
    pub fn on_mute<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.mute_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for channel changes.
    pub fn on_channel<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&ChannelInfo) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.channel_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for program changes.
    pub fn on_program<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&ProgramInfo) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.program_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for the aggregate update event.
    ///
    /// The callback receives the full new snapshot once per state change,
    /// after the field callbacks.
    pub fn on_update<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceState) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.update_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback receiving every event.
    ///
    /// Useful for logging, as it receives every event in emission order.
    pub fn on_event<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceEvent) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.event_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    // =========================================================================
    // Unsubscription
    // =========================================================================

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.open_callbacks.write().remove(&id).is_some()
            || self.close_callbacks.write().remove(&id).is_some()
            || self.power_callbacks.write().remove(&id).is_some()
            || self.volume_callbacks.write().remove(&id).is_some()
            || self.mute_callbacks.write().remove(&id).is_some()
            || self.channel_callbacks.write().remove(&id).is_some()
            || self.program_callbacks.write().remove(&id).is_some()
            || self.update_callbacks.write().remove(&id).is_some()
            || self.event_callbacks.write().remove(&id).is_some()
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.open_callbacks.write().clear();
        self.close_callbacks.write().clear();
        self.power_callbacks.write().clear();
        self.volume_callbacks.write().clear();
        self.mute_callbacks.write().clear();
        self.channel_callbacks.write().clear();
        self.program_callbacks.write().clear();
        self.update_callbacks.write().clear();
        self.event_callbacks.write().clear();
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Dispatches an event to the generic callbacks and to the callbacks
    /// registered for its kind.
    pub fn dispatch(&self, event: &DeviceEvent) {
        for callback in snapshot(&self.event_callbacks) {
            callback(event);
        }

        match event {
            DeviceEvent::Open => {
                for callback in snapshot(&self.open_callbacks) {
                    callback();
                }
            }
            DeviceEvent::Close => {
                for callback in snapshot(&self.close_callbacks) {
                    callback();
                }
            }
            DeviceEvent::Power(power) => {
                for callback in snapshot(&self.power_callbacks) {
                    callback(*power);
                }
            }
            DeviceEvent::Volume(volume) => {
                for callback in snapshot(&self.volume_callbacks) {
                    callback(*volume);
                }
            }
            DeviceEvent::Mute(mute) => {
                for callback in snapshot(&self.mute_callbacks) {
                    callback(*mute);
                }
            }
            DeviceEvent::Channel(channel) => {
                for callback in snapshot(&self.channel_callbacks) {
                    callback(channel);
                }
            }
            DeviceEvent::Program(program) => {
                for callback in snapshot(&self.program_callbacks) {
                    callback(program);
                }
            }
            DeviceEvent::Update(state) => {
                for callback in snapshot(&self.update_callbacks) {
                    callback(state);
                }
            }
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.open_callbacks.read().len()
            + self.close_callbacks.read().len()
            + self.power_callbacks.read().len()
            + self.volume_callbacks.read().len()
            + self.mute_callbacks.read().len()
            + self.channel_callbacks.read().len()
            + self.program_callbacks.read().len()
            + self.update_callbacks.read().len()
            + self.event_callbacks.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    #[test]
    fn subscription_id_display() {
        let id = SubscriptionId::new(42);
        assert_eq!(id.to_string(), "Sub(42)");
        assert_eq!(id.value(), 42);
    }

    #[test]
    fn registry_new_is_empty() {
        let registry = CallbackRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.callback_count(), 0);
    }

    #[test]
    fn registry_power_callback() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let id = registry.on_power(move |_power| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(registry.callback_count(), 1);

        registry.dispatch(&DeviceEvent::Power(true));
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        assert!(registry.unsubscribe(id));
        assert!(registry.is_empty());

        registry.dispatch(&DeviceEvent::Power(false));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn registry_channel_callback_receives_value() {
        let registry = CallbackRegistry::new();
        let received = Arc::new(RwLock::new(None::<ChannelInfo>));
        let received_clone = received.clone();

        registry.on_channel(move |channel| {
            *received_clone.write() = Some(channel.clone());
        });

        let channel = ChannelInfo::new(Some("TF1".to_string()), 1, None);
        registry.dispatch(&DeviceEvent::Channel(channel.clone()));

        assert_eq!(*received.read(), Some(channel));
    }

    #[test]
    fn registry_event_callback_sees_everything() {
        let registry = CallbackRegistry::new();
        let names = Arc::new(RwLock::new(Vec::new()));
        let names_clone = names.clone();

        registry.on_event(move |event| {
            names_clone.write().push(event.name());
        });

        registry.dispatch(&DeviceEvent::Open);
        registry.dispatch(&DeviceEvent::Volume(3));
        registry.dispatch(&DeviceEvent::Update(DeviceState::new()));
        registry.dispatch(&DeviceEvent::Close);

        assert_eq!(*names.read(), ["open", "volume", "update", "close"]);
    }

    #[test]
    fn registry_callbacks_do_not_cross_kinds() {
        let registry = CallbackRegistry::new();
        let mutes = Arc::new(AtomicU32::new(0));
        let mutes_clone = mutes.clone();

        registry.on_mute(move |_| {
            mutes_clone.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch(&DeviceEvent::Power(true));
        registry.dispatch(&DeviceEvent::Volume(9));
        assert_eq!(mutes.load(Ordering::SeqCst), 0);

        registry.dispatch(&DeviceEvent::Mute(true));
        assert_eq!(mutes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn callback_may_unsubscribe_itself() {
        let registry = Arc::new(CallbackRegistry::new());
        let calls = Arc::new(AtomicU32::new(0));
        let own_id = Arc::new(RwLock::new(None::<SubscriptionId>));

        let registry_clone = Arc::clone(&registry);
        let calls_clone = calls.clone();
        let own_id_clone = own_id.clone();
        let id = registry.on_close(move || {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            if let Some(id) = *own_id_clone.read() {
                registry_clone.unsubscribe(id);
            }
        });
        *own_id.write() = Some(id);

        registry.dispatch(&DeviceEvent::Close);
        registry.dispatch(&DeviceEvent::Close);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn registry_unsubscribe_nonexistent() {
        let registry = CallbackRegistry::new();
        assert!(!registry.unsubscribe(SubscriptionId::new(999)));
    }

    #[test]
    fn registry_clear() {
        let registry = CallbackRegistry::new();

        registry.on_open(|| {});
        registry.on_volume(|_| {});
        registry.on_update(|_| {});
        assert_eq!(registry.callback_count(), 3);

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn registry_unique_ids() {
        let registry = CallbackRegistry::new();

        let id1 = registry.on_open(|| {});
        let id2 = registry.on_program(|_| {});
        let id3 = registry.on_update(|_| {});

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }

    #[test]
    fn registry_debug() {
        let registry = CallbackRegistry::new();
        registry.on_mute(|_| {});

        let debug = format!("{registry:?}");
        assert!(debug.contains("CallbackRegistry"));
        assert!(debug.contains("callback_count"));
    }
}
