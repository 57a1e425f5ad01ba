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

//! Filters decide which entries a dispatch forwards to its appends.

use std::fmt;

use crate::Entry;
use crate::Level;

mod custom;
mod level;

pub use self::custom::CustomFilter;
pub use self::level::LevelFilter;

/// The result of a filter check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterResult {
    /// The entry will be processed without further filtering.
    Accept,
    /// The entry should not be processed.
    Reject,
    /// No decision could be made, further filtering should occur.
    Neutral,
}

/// A filter that can decide on log entries.
pub trait Filter: fmt::Debug + Send + Sync + 'static {
    /// Whether entries of `level` could be processed, before any entry is built.
    ///
    /// Default to [`FilterResult::Neutral`].
    fn enabled(&self, level: &Level) -> FilterResult {
        let _ = level;
        FilterResult::Neutral
    }

    /// Whether the entry should be processed.
    fn matches(&self, entry: &Entry) -> FilterResult;
}

impl<T: Filter> From<T> for Box<dyn Filter> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}
