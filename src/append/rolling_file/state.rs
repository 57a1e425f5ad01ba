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

//! Persisted counters of a rolling file.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use fs2::FileExt;
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::Error;
use crate::ErrorKind;

/// Key of the index of the file currently written to.
pub const CURRENT_LOG_FILE_NUMBER: &str = "currentLogFileNumber";
/// Key of the time of the last rotation.
pub const DATE_OF_LAST_LOG: &str = "dateOfLastLog";
/// Key of the number of files rotated through.
pub const NUMBER_OF_LOG_FILES: &str = "numberOfLogFiles";

/// A small persistent key-value store for rotation counters.
///
/// Every `set` is written through: once it returns `Ok`, the value survives a restart.
pub trait KeyValueStore: fmt::Debug + Send + Sync + 'static {
    /// Read the value under `key`.
    fn get(&self, key: &str) -> Result<Option<Value>, Error>;

    /// Store `value` under `key`.
    fn set(&self, key: &str, value: Value) -> Result<(), Error>;
}

impl<T: KeyValueStore> From<T> for Box<dyn KeyValueStore> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}

/// A store kept in memory only.
///
/// Clones share the same map, which lets one store outlive a logger and seed the next one.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<BTreeMap<String, Value>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, Error> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), Error> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value);
        Ok(())
    }
}

/// A store backed by one JSON object on disk.
///
/// Several loggers, in this process or others, may share the file. Each write holds an exclusive
/// lock on `<path>.lock`, reloads the file, replaces only its own key, and swaps the new content
/// in with a rename, so readers never see a partially written file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock_path: PathBuf,
    values: Mutex<BTreeMap<String, Value>>,
}

impl JsonFileStore {
    /// The file name used when a store is created next to the log directories.
    pub const DEFAULT_FILE_NAME: &'static str = "logfan-state.json";

    /// Open the store at `path`, starting empty if the file does not exist yet.
    ///
    /// # Errors
    ///
    /// Return an error if the file exists but cannot be read or is not a JSON object.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let values = load(&path)?.unwrap_or_default();

        let mut lock_path = path.clone().into_os_string();
        lock_path.push(".lock");
        Ok(Self {
            path,
            lock_path: PathBuf::from(lock_path),
            values: Mutex::new(values),
        })
    }

    /// The file backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    // released when the returned file is dropped
    fn lock_exclusive(&self) -> Result<File, Error> {
        let dir = self.dir();
        fs::create_dir_all(dir)
            .map_err(|err| Error::from_io_error(err).with_context("path", dir.display()))?;

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&self.lock_path)
            .map_err(|err| {
                Error::from_io_error(err).with_context("path", self.lock_path.display())
            })?;
        file.lock_exclusive().map_err(|err| {
            Error::new("failed to lock state file")
                .with_context("path", self.lock_path.display())
                .with_source(err)
        })?;
        Ok(file)
    }

    fn replace(&self, bytes: &[u8]) -> Result<(), Error> {
        let failed =
            |err: io::Error| Error::from_io_error(err).with_context("path", self.path.display());

        let mut temp = NamedTempFile::new_in(self.dir()).map_err(failed)?;
        temp.write_all(bytes).map_err(failed)?;
        temp.persist(&self.path).map_err(|err| failed(err.error))?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, Error> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), Error> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        let _lock = self.lock_exclusive()?;

        // a corrupted file is overwritten with what this process knows
        if let Ok(Some(on_disk)) = load(&self.path) {
            *values = on_disk;
        }
        values.insert(key.to_string(), value);

        let bytes = serde_json::to_vec_pretty(&*values).map_err(|err| {
            Error::new("failed to serialize state")
                .with_context("path", self.path.display())
                .with_source(err)
        })?;
        self.replace(&bytes)
    }
}

fn load(path: &Path) -> Result<Option<BTreeMap<String, Value>>, Error> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(Error::from_io_error(err).with_context("path", path.display()));
        }
    };

    serde_json::from_slice(&bytes).map(Some).map_err(|err| {
        Error::with_kind(ErrorKind::ConfigInvalid, "failed to parse state file")
            .with_context("path", path.display())
            .with_source(err)
    })
}

/// The fully qualified keys of one logger instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StateKeys {
    pub(crate) current_file_index: String,
    pub(crate) date_of_last_write: String,
    pub(crate) file_count: String,
}

impl StateKeys {
    pub(crate) fn new(namespace: &str, app_name: Option<&str>) -> Self {
        let prefix = match app_name {
            None => format!("{namespace}-"),
            Some(app_name) => format!("{namespace}-{app_name}-"),
        };
        Self {
            current_file_index: format!("{prefix}{CURRENT_LOG_FILE_NUMBER}"),
            date_of_last_write: format!("{prefix}{DATE_OF_LAST_LOG}"),
            file_count: format!("{prefix}{NUMBER_OF_LOG_FILES}"),
        }
    }
}
