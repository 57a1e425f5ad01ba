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

use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;

use crate::Error;

const LOG_EXTENSION: &str = "log";

/// Owns one log directory and the naming of the files in it.
///
/// Every operation is idempotent where its target state already holds.
#[derive(Debug)]
pub(crate) struct FileStore {
    log_dir: PathBuf,
    // `<app_name>-` in shared containers
    filename_prefix: String,
}

impl FileStore {
    pub(crate) fn new(log_dir: PathBuf, app_name: Option<&str>) -> Self {
        let filename_prefix = match app_name {
            None => String::new(),
            Some(app_name) => format!("{app_name}-"),
        };
        Self {
            log_dir,
            filename_prefix,
        }
    }

    pub(crate) fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub(crate) fn path_for(&self, index: usize) -> PathBuf {
        let filename = format!("{}{index}.{LOG_EXTENSION}", self.filename_prefix);
        self.log_dir.join(filename)
    }

    pub(crate) fn create_dir_if_absent(&self) -> Result<(), Error> {
        fs::create_dir_all(&self.log_dir).map_err(|err| {
            Error::new("failed to create log directory")
                .with_context("path", self.log_dir.display())
                .with_source(err)
        })
    }

    pub(crate) fn delete_file_if_exists(&self, path: &Path) -> Result<(), Error> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Error::new("failed to delete log file")
                .with_context("path", path.display())
                .with_source(err)),
        }
    }

    /// Create `path` with `header` as its first line, unless it exists already.
    pub(crate) fn create_file_if_absent(
        &self,
        path: &Path,
        header: Option<&str>,
    ) -> Result<(), Error> {
        let create = || OpenOptions::new().write(true).create_new(true).open(path);
        let result = match create() {
            // the directory may have been removed behind our back
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                self.create_dir_if_absent()?;
                create()
            }
            result => result,
        };

        let mut file = match result {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => return Ok(()),
            Err(err) => {
                return Err(Error::new("failed to create log file")
                    .with_context("path", path.display())
                    .with_source(err));
            }
        };

        if let Some(header) = header {
            writeln!(file, "{header}").map_err(|err| {
                Error::new("failed to write log file header")
                    .with_context("path", path.display())
                    .with_source(err)
            })?;
        }
        Ok(())
    }

    /// Create `path` empty with `header` as its first line, replacing any previous content.
    pub(crate) fn recreate_file(&self, path: &Path, header: Option<&str>) -> Result<(), Error> {
        let create = || {
            OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)
        };
        let result = match create() {
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                self.create_dir_if_absent()?;
                create()
            }
            result => result,
        };
        let failed = |err: io::Error| {
            Error::new("failed to recreate log file")
                .with_context("path", path.display())
                .with_source(err)
        };

        let mut file = result.map_err(failed)?;
        if let Some(header) = header {
            writeln!(file, "{header}").map_err(failed)?;
        }
        Ok(())
    }

    /// Open `path` for appending, creating it first if needed.
    pub(crate) fn open_for_append(&self, path: &Path, header: Option<&str>) -> Result<File, Error> {
        self.create_file_if_absent(path, header)?;
        OpenOptions::new().append(true).open(path).map_err(|err| {
            Error::new("failed to open log file")
                .with_context("path", path.display())
                .with_source(err)
        })
    }

    /// List the log files owned by this store, ordered by index.
    pub(crate) fn list_log_files(&self) -> Result<Vec<PathBuf>, Error> {
        let read_dir = fs::read_dir(&self.log_dir).map_err(|err| {
            Error::from_io_error(err).with_context("path", self.log_dir.display())
        })?;

        let mut files = read_dir
            .filter_map(|entry| {
                let entry = entry.ok()?;
                // the logger only creates files, not directories or symlinks
                if !entry.file_type().ok()?.is_file() {
                    return None;
                }

                let path = entry.path();
                if path.extension()? != LOG_EXTENSION {
                    return None;
                }
                // if the filename is not a UTF-8 string, skip it
                let stem = path.file_stem()?.to_str()?;
                let index = stem.strip_prefix(&self.filename_prefix)?;
                let index = usize::from_str(index).ok()?;
                Some((index, path))
            })
            .collect::<Vec<_>>();

        files.sort();
        Ok(files.into_iter().map(|(_, path)| path).collect())
    }

    pub(crate) fn read_whole_file(&self, path: &Path) -> Result<String, Error> {
        let bytes = fs::read(path)
            .map_err(|err| Error::from_io_error(err).with_context("path", path.display()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub(crate) fn delete_all_log_files(&self) -> Result<(), Error> {
        for path in self.list_log_files()? {
            self.delete_file_if_exists(&path)?;
        }
        Ok(())
    }
}
