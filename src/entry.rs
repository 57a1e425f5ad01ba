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

//! Log entries and their parts.

use std::fmt;

use jiff::Timestamp;

use crate::level::Level;

/// Where in the source an entry was produced.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LogLocation {
    file_name: String,
    function: String,
    line: u32,
}

impl LogLocation {
    /// Create a new location.
    pub fn new(file_name: impl Into<String>, function: impl Into<String>, line: u32) -> Self {
        Self {
            file_name: file_name.into(),
            function: function.into(),
            line,
        }
    }

    /// The source file name, without its directories.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The function (or module path) that produced the entry.
    pub fn function(&self) -> &str {
        &self.function
    }

    /// The source line.
    pub fn line(&self) -> u32 {
        self.line
    }
}

/// Capture the [`LogLocation`] of the call site.
///
/// The module path stands in for the function name, which Rust does not expose.
///
/// # Examples
///
/// ```
/// let location = logfan::location!();
/// assert!(!location.file_name().contains('/'));
/// ```
#[macro_export]
macro_rules! location {
    () => {
        $crate::LogLocation::new(
            $crate::file_name(file!()),
            module_path!(),
            line!(),
        )
    };
}

/// Strip directories from a source path, keeping only the file name.
#[doc(hidden)]
pub fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// The header of a log entry: when and how severe.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LogHeader {
    timestamp: Timestamp,
    level: Level,
}

impl LogHeader {
    /// Create a new header.
    ///
    /// The timestamp is truncated to millisecond precision, which is what the text encoding keeps.
    pub fn new(timestamp: Timestamp, level: Level) -> Self {
        let timestamp = Timestamp::from_millisecond(timestamp.as_millisecond()).unwrap_or(timestamp);
        Self { timestamp, level }
    }

    /// The time the entry was produced.
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// The level of the entry.
    pub fn level(&self) -> &Level {
        &self.level
    }
}

/// One structured log event.
///
/// Entries are immutable once built: they are encoded, transmitted, or discarded, never changed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Entry {
    header: LogHeader,
    location: LogLocation,
    body: String,
}

impl Entry {
    /// Create a new entry from its parts.
    pub fn new(header: LogHeader, location: LogLocation, body: impl fmt::Display) -> Self {
        Self {
            header,
            location,
            body: body.to_string(),
        }
    }

    /// Create a new entry stamped with the current time.
    ///
    /// # Examples
    ///
    /// ```
    /// use logfan::Entry;
    /// use logfan::Level;
    ///
    /// let entry = Entry::now(Level::Info, logfan::location!(), "service started");
    /// assert_eq!(entry.body(), "service started");
    /// ```
    pub fn now(level: Level, location: LogLocation, body: impl fmt::Display) -> Self {
        Self::new(LogHeader::new(Timestamp::now(), level), location, body)
    }

    /// The header of this entry.
    pub fn header(&self) -> &LogHeader {
        &self.header
    }

    /// The level of this entry.
    pub fn level(&self) -> &Level {
        self.header.level()
    }

    /// The time this entry was produced.
    pub fn timestamp(&self) -> Timestamp {
        self.header.timestamp()
    }

    /// Where this entry was produced.
    pub fn location(&self) -> &LogLocation {
        &self.location
    }

    /// The message of this entry.
    pub fn body(&self) -> &str {
        &self.body
    }
}
