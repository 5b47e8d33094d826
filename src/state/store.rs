// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Canonical storage of the last known [`DeviceState`].

use parking_lot::RwLock;

use super::{DeviceState, StateChange, diff};

/// Holds the canonical device snapshot.
///
/// The store is the only writer of the snapshot. [`StateStore::commit`] diffs
/// the incoming snapshot against the installed one and swaps it in under the
/// same write lock, so no other commit can land between "before" and
/// "after".
///
/// # Examples
///
/// ```
/// use labox_lib::state::{DeviceState, StateChange, StateStore};
///
/// let store = StateStore::new();
/// let mut next = store.current();
/// next.set_power(true);
///
/// assert_eq!(store.commit(next.clone()), vec![StateChange::Power(true)]);
/// assert!(store.commit(next).is_empty());
/// ```
#[derive(Debug, Default)]
pub struct StateStore {
    state: RwLock<DeviceState>,
}

impl StateStore {
    /// Creates a store holding the initial state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the current snapshot.
    #[must_use]
    pub fn current(&self) -> DeviceState {
        self.state.read().clone()
    }

    /// Installs `next` as the canonical snapshot.
    ///
    /// Returns the changes between the previous snapshot and `next`. The
    /// snapshot is replaced even when nothing changed.
    pub fn commit(&self, next: DeviceState) -> Vec<StateChange> {
        let mut state = self.state.write();
        let changes = diff(&state, &next);
        *state = next;
        changes
    }

    /// Computes the next snapshot from the current one and commits it.
    ///
    /// `f` runs while the write lock is held, so it must not call back into
    /// the store.
    pub fn update<F>(&self, f: F) -> Vec<StateChange>
    where
        F: FnOnce(&DeviceState) -> DeviceState,
    {
        let mut state = self.state.write();
        let next = f(&state);
        let changes = diff(&state, &next);
        *state = next;
        changes
    }
}
