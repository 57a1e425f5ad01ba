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

//! Append for writing log entries to a fixed set of daily rotated files.
//!
//! # Example
//!
//! ```
//! use std::num::NonZeroUsize;
//!
//! use logfan::Entry;
//! use logfan::Level;
//! use logfan::append::rolling_file::RollingFileBuilder;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let rolling_file = RollingFileBuilder::new()
//!     .container(dir.path())
//!     .max_log_files(NonZeroUsize::new(3).unwrap())
//!     .build()
//!     .unwrap();
//!
//! let logger = logfan::builder()
//!     .dispatch(|d| d.append(rolling_file))
//!     .build();
//!
//! logger.log(&Entry::now(Level::Info, logfan::location!(), "written to 0.log"));
//! logger.flush();
//!
//! let entries = logger.entries(None, |_| true).unwrap();
//! assert_eq!(entries.len(), 1);
//! ```

pub use self::append::RollingFile;
pub use self::append::RollingFileBuilder;
pub use self::append::Sharing;
pub use self::archive::DEFAULT_ARCHIVE_NAME;
pub use self::clock::Clock;
pub use self::clock::ManualClock;
pub use self::state::JsonFileStore;
pub use self::state::KeyValueStore;
pub use self::state::MemoryStore;

mod append;
mod archive;
mod clock;
mod executor;
mod rotation;
pub mod state;
mod store;
