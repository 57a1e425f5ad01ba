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

//! Sinks that consume log entries.

use std::fmt;

use crate::Entry;
use crate::Error;

pub mod rolling_file;
mod stdio;

pub use self::rolling_file::RollingFile;
pub use self::stdio::Stderr;
pub use self::stdio::Stdout;

/// A sink that can process log entries.
pub trait Append: fmt::Debug + Send + Sync + 'static {
    /// Dispatch a log entry to the append target.
    fn append(&self, entry: &Entry) -> Result<(), Error>;

    /// Flush any buffered entries.
    ///
    /// Default to a no-op.
    fn flush(&self) -> Result<(), Error> {
        Ok(())
    }

    /// Return this append as a [`RollingFile`], if it is one.
    ///
    /// Default to `None`.
    fn as_rolling_file(&self) -> Option<&RollingFile> {
        None
    }
}

impl<T: Append> From<T> for Box<dyn Append> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}
