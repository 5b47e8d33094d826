// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event system for set-top-box state changes.
//!
//! Every event the client emits is a [`DeviceEvent`]. The [`EventBus`] fans
//! them out over a tokio broadcast channel, in emission order, to any number
//! of receivers.
//!
//! # Examples
//!
//! ```
//! use labox_lib::event::{DeviceEvent, EventBus};
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.publish(DeviceEvent::Open);
//! assert_eq!(rx.try_recv().unwrap(), DeviceEvent::Open);
//! ```

mod device_event;
mod event_bus;

pub use device_event::DeviceEvent;
pub use event_bus::EventBus;
