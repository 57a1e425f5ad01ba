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

use std::collections::HashSet;

use crate::Entry;
use crate::Level;
use crate::filter::Filter;
use crate::filter::FilterResult;

/// A filter that lets through the entries whose level is in a set.
///
/// Levels carry no severity order, so there is no "at least" form: list every accepted level.
///
/// # Examples
///
/// ```
/// use logfan::Level;
/// use logfan::filter::LevelFilter;
///
/// let filter = LevelFilter::new([Level::Warning, Level::Critical]);
/// assert!(filter.accepts(&Level::Critical));
/// assert!(!filter.accepts(&Level::Info));
/// ```
#[derive(Debug, Clone)]
pub struct LevelFilter {
    levels: HashSet<Level>,
}

impl LevelFilter {
    /// Accept exactly `levels`.
    pub fn new(levels: impl IntoIterator<Item = Level>) -> Self {
        Self {
            levels: levels.into_iter().collect(),
        }
    }

    /// Accept every predefined level.
    pub fn predefined() -> Self {
        Self::new(Level::PREDEFINED)
    }

    /// Also accept `level`.
    pub fn with(mut self, level: Level) -> Self {
        self.levels.insert(level);
        self
    }

    /// Whether `level` is accepted.
    pub fn accepts(&self, level: &Level) -> bool {
        self.levels.contains(level)
    }
}

impl From<Level> for LevelFilter {
    fn from(level: Level) -> Self {
        LevelFilter::new([level])
    }
}

impl Filter for LevelFilter {
    fn enabled(&self, level: &Level) -> FilterResult {
        if self.accepts(level) {
            FilterResult::Neutral
        } else {
            FilterResult::Reject
        }
    }

    fn matches(&self, entry: &Entry) -> FilterResult {
        self.enabled(entry.level())
    }
}

impl Filter for Level {
    fn enabled(&self, level: &Level) -> FilterResult {
        if level == self {
            FilterResult::Neutral
        } else {
            FilterResult::Reject
        }
    }

    fn matches(&self, entry: &Entry) -> FilterResult {
        Filter::enabled(self, entry.level())
    }
}
