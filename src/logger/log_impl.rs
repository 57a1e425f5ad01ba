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

use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;

use uuid::Uuid;

use crate::Append;
use crate::Entry;
use crate::Error;
use crate::ErrorKind;
use crate::Filter;
use crate::Level;
use crate::Trap;
use crate::append::RollingFile;
use crate::filter::FilterResult;

static DEFAULT_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Return the process-wide default logger, if one was set.
pub fn default_logger() -> Option<&'static Logger> {
    DEFAULT_LOGGER.get()
}

/// Set the process-wide default logger.
///
/// # Errors
///
/// Return `logger` back if a default logger has already been set.
pub fn set_default_logger(logger: Logger) -> Result<(), Logger> {
    DEFAULT_LOGGER.set(logger)
}

/// The stable handle of an append registered with a [`Logger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AppendId(Uuid);

impl AppendId {
    /// Generate a new random id.
    pub fn new() -> Self {
        AppendId(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AppendId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for AppendId {
    fn from(uuid: Uuid) -> Self {
        AppendId(uuid)
    }
}

impl fmt::Display for AppendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A logger fanning entries out to its dispatches.
///
/// Construct it with [`crate::builder`]. Besides logging, it finds registered appends by id and
/// forwards file operations to the [`RollingFile`] appends it holds.
#[derive(Debug)]
pub struct Logger {
    dispatches: Vec<Dispatch>,
    trap: Box<dyn Trap>,
}

impl Logger {
    pub(super) fn new(dispatches: Vec<Dispatch>, trap: Box<dyn Trap>) -> Self {
        Self { dispatches, trap }
    }

    /// Whether any dispatch would forward an entry of `level`.
    pub fn enabled(&self, level: &Level) -> bool {
        self.dispatches
            .iter()
            .any(|dispatch| dispatch.enabled(level))
    }

    /// Forward `entry` to every dispatch whose filters let it through.
    ///
    /// Errors of the appends go to the logger's trap.
    pub fn log(&self, entry: &Entry) {
        for dispatch in &self.dispatches {
            for (id, err) in dispatch.log(entry) {
                let err = Error::new("failed to append log entry")
                    .with_context("append", id)
                    .with_source(err);
                self.trap.trap(&err);
            }
        }
    }

    /// Flush every append.
    pub fn flush(&self) {
        for dispatch in &self.dispatches {
            for (id, err) in dispatch.flush() {
                let err = Error::new("failed to flush append")
                    .with_context("append", id)
                    .with_source(err);
                self.trap.trap(&err);
            }
        }
    }

    /// Iterate over the ids of all registered appends, in registration order.
    pub fn append_ids(&self) -> impl Iterator<Item = AppendId> + '_ {
        self.appends().map(|(id, _)| id)
    }

    /// Find the append registered under `id`.
    pub fn append_by_id(&self, id: AppendId) -> Option<&dyn Append> {
        self.appends()
            .find(|(candidate, _)| *candidate == id)
            .map(|(_, append)| append)
    }

    /// Find a rolling file append.
    ///
    /// With `None`, return the first one registered.
    pub fn rolling_file(&self, id: Option<AppendId>) -> Option<&RollingFile> {
        match id {
            Some(id) => self.append_by_id(id)?.as_rolling_file(),
            None => self.rolling_files().next(),
        }
    }

    /// Read the entries of a rolling file append that `filter` accepts.
    ///
    /// With `None`, read the first rolling file registered.
    ///
    /// # Errors
    ///
    /// Return an error if there is no such rolling file or its directory cannot be listed.
    pub fn entries<F>(&self, id: Option<AppendId>, filter: F) -> Result<Vec<Entry>, Error>
    where
        F: Fn(&Entry) -> bool,
    {
        self.require_rolling_file(id)?.entries(filter)
    }

    /// Delete the log files of a rolling file append.
    ///
    /// With `None`, delete the files of every rolling file registered.
    ///
    /// # Errors
    ///
    /// Return an error if there is no such rolling file, or the first error of a deletion. Every
    /// rolling file is attempted either way.
    pub fn delete_all_log_files(&self, id: Option<AppendId>) -> Result<(), Error> {
        if id.is_some() {
            return self.require_rolling_file(id)?.delete_all_log_files();
        }

        let mut result = Ok(());
        for rolling_file in self.rolling_files() {
            let deleted = rolling_file.delete_all_log_files();
            if result.is_ok() {
                result = deleted;
            }
        }
        result
    }

    /// Archive the log files of a rolling file append. See [`RollingFile::archive`].
    ///
    /// With `None`, archive the first rolling file registered.
    ///
    /// # Errors
    ///
    /// Return an error if there is no such rolling file or archiving fails.
    pub fn archive(&self, id: Option<AppendId>, name: Option<&str>) -> Result<PathBuf, Error> {
        self.require_rolling_file(id)?.archive(name)
    }

    fn appends(&self) -> impl Iterator<Item = (AppendId, &dyn Append)> + '_ {
        self.dispatches
            .iter()
            .flat_map(|dispatch| dispatch.appends.iter())
            .map(|(id, append)| (*id, append.as_ref()))
    }

    fn rolling_files(&self) -> impl Iterator<Item = &RollingFile> + '_ {
        self.appends()
            .filter_map(|(_, append)| append.as_rolling_file())
    }

    fn require_rolling_file(&self, id: Option<AppendId>) -> Result<&RollingFile, Error> {
        self.rolling_file(id).ok_or_else(|| {
            let err = Error::with_kind(ErrorKind::NotFound, "no rolling file append registered");
            match id {
                Some(id) => err.with_context("append", id),
                None => err,
            }
        })
    }
}

#[derive(Debug)]
pub(super) struct Dispatch {
    filters: Vec<Box<dyn Filter>>,
    appends: Vec<(AppendId, Box<dyn Append>)>,
}

impl Dispatch {
    pub(super) fn new(
        filters: Vec<Box<dyn Filter>>,
        appends: Vec<(AppendId, Box<dyn Append>)>,
    ) -> Self {
        debug_assert!(
            !appends.is_empty(),
            "A Dispatch must have at least one append"
        );

        Self { filters, appends }
    }

    fn enabled(&self, level: &Level) -> bool {
        for filter in &self.filters {
            match filter.enabled(level) {
                FilterResult::Reject => return false,
                FilterResult::Accept => return true,
                FilterResult::Neutral => {}
            }
        }

        true
    }

    fn accepts(&self, entry: &Entry) -> bool {
        for filter in &self.filters {
            match filter.matches(entry) {
                FilterResult::Reject => return false,
                FilterResult::Accept => return true,
                FilterResult::Neutral => {}
            }
        }

        true
    }

    fn log(&self, entry: &Entry) -> Vec<(AppendId, Error)> {
        if !self.accepts(entry) {
            return vec![];
        }

        self.appends
            .iter()
            .filter_map(|(id, append)| append.append(entry).err().map(|err| (*id, err)))
            .collect()
    }

    fn flush(&self) -> Vec<(AppendId, Error)> {
        self.appends
            .iter()
            .filter_map(|(id, append)| append.flush().err().map(|err| (*id, err)))
            .collect()
    }
}
