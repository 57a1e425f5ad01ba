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

//! Logfan fans log entries out to multiple sinks, with a durable, day-rotated file sink at its
//! core.
//!
//! # Overview
//!
//! An [`Entry`] carries a [`Level`], a timestamp, a [`LogLocation`], and a body. A [`Logger`]
//! forwards each entry to the [appends](Append) of every dispatch whose [filters](filter) let it
//! through. The [`RollingFile`](append::RollingFile) append writes entries as delimited text
//! records into a fixed set of files, moves to the next file once per day, and reads the files
//! back into entries on demand.
//!
//! # Examples
//!
//! ```
//! use logfan::Entry;
//! use logfan::Level;
//! use logfan::append;
//! use logfan::append::RollingFile;
//! use logfan::filter::LevelFilter;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let rolling_file = RollingFile::builder()
//!     .container(dir.path())
//!     .build()
//!     .unwrap();
//!
//! let logger = logfan::builder()
//!     .dispatch(|d| {
//!         d.filter(LevelFilter::new([Level::Warning, Level::Critical]))
//!             .append(append::Stderr::default())
//!     })
//!     .dispatch(|d| d.append(rolling_file))
//!     .build();
//!
//! logger.log(&Entry::now(Level::Critical, logfan::location!(), "disk is full"));
//! logger.log(&Entry::now(Level::Info, logfan::location!(), "retrying\nin 5 seconds"));
//! logger.flush();
//!
//! let entries = logger.entries(None, |_| true).unwrap();
//! assert_eq!(entries.len(), 2);
//! assert_eq!(entries[1].body(), "retrying\nin 5 seconds");
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod append;
pub mod bridge;
pub mod codec;
pub mod filter;
pub mod trap;

mod entry;
mod error;
mod level;
mod logger;

pub use self::append::Append;
pub use self::entry::Entry;
pub use self::entry::LogHeader;
pub use self::entry::LogLocation;
#[doc(hidden)]
pub use self::entry::file_name;
pub use self::error::Error;
pub use self::error::ErrorKind;
pub use self::filter::Filter;
pub use self::level::Level;
pub use self::logger::*;
pub use self::trap::Trap;
