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

//! Log levels.

use std::fmt;
use std::hash;
use std::str::FromStr;

/// The level of a log entry.
///
/// Levels carry no severity ordering. Two levels are equal when their [tags](Level::tag) are
/// equal, so a [`Level::Custom`] whose text matches a predefined tag is equal to that level.
#[derive(Clone, Debug)]
pub enum Level {
    /// Detailed information for debugging.
    Debug,
    /// Informational messages.
    Info,
    /// The default level, when nothing more specific applies.
    Default,
    /// Something unexpected that the application recovered from.
    Warning,
    /// A failure the application cannot recover from.
    Critical,
    /// An application defined level, identified by its text.
    Custom(String),
}

impl Level {
    /// All predefined levels.
    pub const PREDEFINED: [Level; 5] = [
        Level::Debug,
        Level::Info,
        Level::Default,
        Level::Warning,
        Level::Critical,
    ];

    /// Create a custom level from anything that can be displayed.
    pub fn custom(payload: impl fmt::Display) -> Self {
        Level::Custom(payload.to_string())
    }

    /// The canonical text of this level, used in encoded records.
    pub fn tag(&self) -> &str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Default => "default",
            Level::Warning => "warning",
            Level::Critical => "critical",
            Level::Custom(tag) => tag,
        }
    }

    /// Resolve a tag back into a level.
    ///
    /// Unknown tags become [`Level::Custom`].
    pub fn from_tag(tag: &str) -> Self {
        Level::PREDEFINED
            .into_iter()
            .find(|level| level.tag() == tag)
            .unwrap_or_else(|| Level::Custom(tag.to_string()))
    }
}

impl PartialEq for Level {
    fn eq(&self, other: &Self) -> bool {
        self.tag() == other.tag()
    }
}

impl Eq for Level {}

impl hash::Hash for Level {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.tag().hash(state);
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Level {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Level::from_tag(s))
    }
}
