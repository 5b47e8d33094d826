// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Timers driving the client.
//!
//! - [`RefreshScheduler`]: one-shot status poll when the current program ends
//! - [`run_keep_alive`]: periodic ping on every open channel

mod keep_alive;
mod refresh;

pub use keep_alive::run_keep_alive;
pub use refresh::RefreshScheduler;
