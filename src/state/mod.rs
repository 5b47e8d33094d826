// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state management types.
//!
//! [`DeviceState`] is the snapshot of what the set-top box last reported,
//! [`StateChange`] names one changed field, [`diff`] compares two snapshots
//! and [`StateStore`] holds the canonical snapshot.
//!
//! # Examples
//!
//! ```
//! use labox_lib::state::{DeviceState, StateChange, diff};
//!
//! let before = DeviceState::new();
//! let mut after = before.clone();
//! after.set_power(true);
//!
//! assert_eq!(diff(&before, &after), vec![StateChange::Power(true)]);
//! assert!(diff(&after, &after).is_empty());
//! ```

mod device_state;
mod state_change;
mod store;

pub use device_state::{ChannelInfo, DeviceState, ProgramInfo};
pub use state_change::{StateChange, diff};
pub use store::StateStore;
