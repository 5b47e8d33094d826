// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared state of a running client.

use std::sync::{Arc, Weak};

use chrono::Utc;
use parking_lot::Mutex;

use super::ClientConfig;
use crate::error::Result;
use crate::event::{DeviceEvent, EventBus};
use crate::protocol::{ChannelEvents, ChannelHandle, ChannelRole, Codec, Effect};
use crate::scheduler::RefreshScheduler;
use crate::state::StateStore;
use crate::subscription::CallbackRegistry;

/// Everything the channel tasks, the timers and the host API share.
pub(crate) struct ClientContext {
    pub(crate) config: ClientConfig,
    pub(crate) codec: Codec,
    pub(crate) store: StateStore,
    pub(crate) callbacks: CallbackRegistry,
    pub(crate) events: EventBus,
    pub(crate) command: ChannelHandle,
    pub(crate) notification: ChannelHandle,
    pub(crate) refresh: RefreshScheduler,
    /// Serializes decode, commit and dispatch across both channels.
    processing: Mutex<()>,
}

impl ClientContext {
    pub(crate) fn new(
        config: ClientConfig,
        command: ChannelHandle,
        notification: ChannelHandle,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak: &Weak<Self>| {
            let weak = weak.clone();
            let refresh = RefreshScheduler::new(move || {
                if let Some(context) = weak.upgrade() {
                    context.request_status("refresh timer");
                }
            });

            Self {
                codec: Codec::new(config.identity.clone(), config.refresh_margin),
                events: EventBus::with_capacity(config.event_capacity),
                store: StateStore::new(),
                callbacks: CallbackRegistry::new(),
                command,
                notification,
                refresh,
                processing: Mutex::new(()),
                config,
            }
        })
    }

    /// Returns the handle of the channel with the given role.
    pub(crate) fn channel(&self, role: ChannelRole) -> &ChannelHandle {
        match role {
            ChannelRole::Command => &self.command,
            ChannelRole::Notification => &self.notification,
        }
    }

    /// Queues a text frame on the command channel.
    pub(crate) fn send_command(&self, frame: String) -> Result<()> {
        if self.config.debug {
            tracing::debug!(frame = %frame, "Queueing command");
        }
        self.command.send_text(frame)
    }

    pub(crate) fn poll_status(&self) -> Result<()> {
        self.send_command(self.codec.encode_status_poll())
    }

    pub(crate) fn poll_volume(&self) -> Result<()> {
        self.send_command(self.codec.encode_volume_poll())
    }

    /// Polls status on behalf of the client itself; failures are only logged.
    fn request_status(&self, reason: &'static str) {
        if let Err(e) = self.poll_status() {
            tracing::debug!(reason, error = %e, "Status poll dropped");
        }
    }

    fn emit(&self, event: DeviceEvent) {
        if self.config.debug {
            tracing::debug!(event = event.name(), "Emitting event");
        }
        self.callbacks.dispatch(&event);
        self.events.publish(event);
    }

    fn apply_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ScheduleRefresh(delay) => self.refresh.schedule(delay),
                Effect::PollStatus => self.request_status("status update notification"),
            }
        }
    }
}

impl ChannelEvents for ClientContext {
    fn channel_opened(&self, role: ChannelRole) {
        if role != ChannelRole::Command {
            return;
        }
        {
            let _guard = self.processing.lock();
            self.emit(DeviceEvent::Open);
        }
        self.request_status("command channel open");
        if let Err(e) = self.poll_volume() {
            tracing::debug!(error = %e, "Volume poll dropped");
        }
    }

    fn channel_closed(&self, role: ChannelRole) {
        if role != ChannelRole::Command {
            return;
        }
        let _guard = self.processing.lock();
        self.emit(DeviceEvent::Close);
    }

    fn frame_received(&self, role: ChannelRole, text: &str) {
        let _guard = self.processing.lock();
        let now = Utc::now();

        let mut effects = Vec::new();
        let changes = self.store.update(|current| {
            let decoded = self.codec.decode(role, text, current, now);
            effects = decoded.effects;
            decoded.state
        });

        if !changes.is_empty() {
            let state = self.store.current();
            for event in DeviceEvent::from_changes(changes, &state) {
                self.emit(event);
            }
        }

        self.apply_effects(effects);
    }
}

impl std::fmt::Debug for ClientContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientContext")
            .field("config", &self.config)
            .field("command", &self.command.status())
            .field("notification", &self.notification.status())
            .field("state", &self.store.current())
            .finish_non_exhaustive()
    }
}
