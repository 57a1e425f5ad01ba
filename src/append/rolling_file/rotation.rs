// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::num::NonZeroUsize;
use std::str::FromStr;

use jiff::Timestamp;
use jiff::Zoned;
use serde_json::Value;

use crate::Error;
use crate::append::rolling_file::state::KeyValueStore;
use crate::append::rolling_file::state::StateKeys;

/// What the write path must do before appending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transition {
    /// Keep writing to the open file.
    Reuse,
    /// Open (or create) the file at the current index.
    Open,
    /// Move to the next index and start that file over.
    Advance,
}

/// Which file is written and since when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RotationState {
    current_file_index: usize,
    date_of_last_write: Timestamp,
    file_count: NonZeroUsize,
}

impl RotationState {
    pub(crate) const DEFAULT_FILE_COUNT: NonZeroUsize = NonZeroUsize::new(4).unwrap();

    pub(crate) fn new(file_count: NonZeroUsize, now: Timestamp) -> Self {
        Self {
            current_file_index: 0,
            date_of_last_write: now,
            file_count,
        }
    }

    /// Restore the state persisted under `keys`.
    ///
    /// Return the state and whether the configured file count is smaller than the persisted one,
    /// in which case the state was reset and the caller must purge the existing files.
    pub(crate) fn load(
        store: &dyn KeyValueStore,
        keys: &StateKeys,
        file_count: NonZeroUsize,
        now: Timestamp,
    ) -> Result<(Self, bool), Error> {
        let persisted_count = store.get(&keys.file_count)?.as_ref().and_then(as_usize);
        if persisted_count.is_some_and(|n| file_count.get() < n) {
            return Ok((Self::new(file_count, now), true));
        }

        let current_file_index = store
            .get(&keys.current_file_index)?
            .as_ref()
            .and_then(as_usize)
            .unwrap_or(0);
        let date_of_last_write = store
            .get(&keys.date_of_last_write)?
            .as_ref()
            .and_then(Value::as_str)
            .and_then(|s| Timestamp::from_str(s).ok())
            .unwrap_or(now);

        let state = Self {
            current_file_index: current_file_index % file_count,
            date_of_last_write,
            file_count,
        };
        Ok((state, false))
    }

    pub(crate) fn save(&self, store: &dyn KeyValueStore, keys: &StateKeys) -> Result<(), Error> {
        store.set(&keys.current_file_index, self.current_file_index.into())?;
        store.set(
            &keys.date_of_last_write,
            self.date_of_last_write.to_string().into(),
        )?;
        store.set(&keys.file_count, self.file_count.get().into())?;
        Ok(())
    }

    pub(crate) fn current_file_index(&self) -> usize {
        self.current_file_index
    }

    /// Decide the transition for a write at `now`.
    ///
    /// Days are compared as calendar dates in the time zone of `now`.
    pub(crate) fn transition(&self, now: &Zoned, file_open: bool) -> Transition {
        let last = self.date_of_last_write.to_zoned(now.time_zone().clone());
        if last.date() != now.date() {
            Transition::Advance
        } else if file_open {
            Transition::Reuse
        } else {
            Transition::Open
        }
    }

    /// The index [`RotationState::advance`] moves to.
    pub(crate) fn next_index(&self) -> usize {
        (self.current_file_index + 1) % self.file_count
    }

    /// Move to the next file. Return its index.
    pub(crate) fn advance(&mut self, now: Timestamp) -> usize {
        self.current_file_index = self.next_index();
        self.date_of_last_write = now;
        self.current_file_index
    }

    pub(crate) fn reset(&mut self, now: Timestamp) {
        self.current_file_index = 0;
        self.date_of_last_write = now;
    }
}

fn as_usize(value: &Value) -> Option<usize> {
    value.as_u64().and_then(|n| usize::try_from(n).ok())
}
