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

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::Entry;
use crate::Error;
use crate::ErrorKind;
use crate::Trap;
use crate::append::Append;
use crate::append::rolling_file::archive;
use crate::append::rolling_file::archive::Snapshot;
use crate::append::rolling_file::clock::Clock;
use crate::append::rolling_file::executor::Executor;
use crate::append::rolling_file::rotation::RotationState;
use crate::append::rolling_file::rotation::Transition;
use crate::append::rolling_file::state::JsonFileStore;
use crate::append::rolling_file::state::KeyValueStore;
use crate::append::rolling_file::state::StateKeys;
use crate::append::rolling_file::store::FileStore;
use crate::codec::CodecConfig;
use crate::codec::Decode;
use crate::codec::Encode;
use crate::codec::TextCodec;
use crate::trap::BestEffortTrap;

/// How a rolling file relates to other users of its container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sharing {
    /// The container belongs to this logger alone. Files are named `<index>.log`.
    NonShared {
        /// The number of files rotated through.
        max_files: NonZeroUsize,
    },
    /// The container is shared between applications. Files are named `<app_name>-<index>.log`
    /// and the persisted counters are keyed by `app_name` too.
    Shared {
        /// The shared container.
        container: PathBuf,
        /// The number of files rotated through.
        max_files: NonZeroUsize,
        /// The name distinguishing this application's files.
        app_name: String,
    },
}

impl Default for Sharing {
    fn default() -> Self {
        Sharing::NonShared {
            max_files: RotationState::DEFAULT_FILE_COUNT,
        }
    }
}

/// A builder to configure and create a [`RollingFile`] append.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
///
/// use logfan::append::rolling_file::RollingFileBuilder;
///
/// let dir = tempfile::tempdir().unwrap();
/// let rolling_file = RollingFileBuilder::new()
///     .container(dir.path())
///     .max_log_files(NonZeroUsize::new(7).unwrap())
///     .file_header("my-app 1.0.0")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug)]
pub struct RollingFileBuilder {
    container: Option<PathBuf>,
    sharing: Sharing,
    namespace: String,
    file_header: Option<String>,
    line_separator: String,
    encoder: Option<Box<dyn Encode>>,
    decoder: Option<Box<dyn Decode>>,
    codec_config: Option<CodecConfig>,
    trap: Box<dyn Trap>,
    clock: Clock,
    state_store: Option<Box<dyn KeyValueStore>>,
    blocking: bool,
    thread_name: String,
}

impl Default for RollingFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RollingFileBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            container: None,
            sharing: Sharing::default(),
            namespace: "logs".to_string(),
            file_header: None,
            line_separator: "\u{2028}".to_string(),
            encoder: None,
            decoder: None,
            codec_config: None,
            trap: Box::new(BestEffortTrap::default()),
            clock: Clock::System,
            state_store: None,
            blocking: false,
            thread_name: "logfan-rolling-file".to_string(),
        }
    }

    /// Set the directory that holds the log directory, the state file, and archives.
    ///
    /// Default to `logfan` under the platform's local data directory. Ignored when the sharing
    /// mode is [`Sharing::Shared`], which names its own container.
    pub fn container(mut self, container: impl Into<PathBuf>) -> Self {
        self.container = Some(container.into());
        self
    }

    /// Set the sharing mode.
    ///
    /// Default to [`Sharing::NonShared`] with 4 files.
    pub fn sharing(mut self, sharing: Sharing) -> Self {
        self.sharing = sharing;
        self
    }

    /// Set the number of files rotated through, keeping the sharing mode.
    ///
    /// Reopening a container with fewer files than it was last used with deletes every existing
    /// log file of this logger and starts over at index 0.
    pub fn max_log_files(mut self, n: NonZeroUsize) -> Self {
        match &mut self.sharing {
            Sharing::NonShared { max_files } | Sharing::Shared { max_files, .. } => {
                *max_files = n;
            }
        }
        self
    }

    /// Set the name of the log directory inside the container.
    ///
    /// The namespace also prefixes the persisted counters, so loggers with different namespaces
    /// never see each other's files or state. Default to `logs`.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set a line written once at the top of every newly created file.
    pub fn file_header(mut self, header: impl Into<String>) -> Self {
        self.file_header = Some(header.into());
        self
    }

    /// Set the text written after every record.
    ///
    /// Default to U+2028 LINE SEPARATOR.
    pub fn line_separator(mut self, separator: impl Into<String>) -> Self {
        self.line_separator = separator.into();
        self
    }

    /// Set the encoder of records.
    ///
    /// Default to a [`TextCodec`] built from the [codec config](Self::codec_config).
    pub fn encoder(mut self, encoder: impl Into<Box<dyn Encode>>) -> Self {
        self.encoder = Some(encoder.into());
        self
    }

    /// Set the decoder of files.
    ///
    /// Default to a [`TextCodec`] built from the [codec config](Self::codec_config).
    pub fn decoder(mut self, decoder: impl Into<Box<dyn Decode>>) -> Self {
        self.decoder = Some(decoder.into());
        self
    }

    /// Set the tokens of the default text codec.
    pub fn codec_config(mut self, config: CodecConfig) -> Self {
        self.codec_config = Some(config);
        self
    }

    /// Set the trap for errors that happen while appending.
    ///
    /// Default to [`BestEffortTrap`].
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    /// Set the clock that drives daily rotation.
    pub fn clock(mut self, clock: impl Into<Clock>) -> Self {
        self.clock = clock.into();
        self
    }

    /// Set the store of the rotation counters.
    ///
    /// Default to a [`JsonFileStore`] at `<container>/logfan-state.json`.
    pub fn state_store(mut self, store: impl Into<Box<dyn KeyValueStore>>) -> Self {
        self.state_store = Some(store.into());
        self
    }

    /// Run every operation on the caller's thread instead of a background worker.
    pub fn blocking(mut self) -> Self {
        self.blocking = true;
        self
    }

    /// Set the name of the background worker thread.
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Build the [`RollingFile`] append.
    ///
    /// # Errors
    ///
    /// Return an error if either:
    ///
    /// * The namespace or the app name is blank.
    /// * No container is given and the platform has no local data directory.
    /// * The log directory cannot be created.
    /// * The state store cannot be opened, read, or written.
    /// * Purging the files of a shrunk rotation fails.
    /// * The codec config is invalid.
    /// * The worker thread cannot be spawned.
    pub fn build(self) -> Result<RollingFile, Error> {
        let RollingFileBuilder {
            container,
            sharing,
            namespace,
            file_header,
            line_separator,
            encoder,
            decoder,
            codec_config,
            trap,
            clock,
            state_store,
            blocking,
            thread_name,
        } = self;

        let (container, max_files, app_name) = match sharing {
            Sharing::NonShared { max_files } => (container, max_files, None),
            Sharing::Shared {
                container,
                max_files,
                app_name,
            } => (Some(container), max_files, Some(app_name)),
        };

        if namespace.trim().is_empty() {
            return Err(Error::with_kind(
                ErrorKind::ConfigInvalid,
                "namespace must not be blank",
            ));
        }
        if app_name.as_ref().is_some_and(|name| name.trim().is_empty()) {
            return Err(Error::with_kind(
                ErrorKind::ConfigInvalid,
                "app name must not be blank",
            ));
        }
        let app_name = app_name.as_deref();

        let codec = TextCodec::new(codec_config.unwrap_or_default())?;
        let encoder = encoder.unwrap_or_else(|| Box::new(codec.clone()));
        let decoder = decoder.unwrap_or_else(|| Box::new(codec));

        let container = match container {
            Some(container) => container,
            None => default_container(app_name)?,
        };

        let files = FileStore::new(container.join(&namespace), app_name);
        files.create_dir_if_absent()?;

        let store = match state_store {
            Some(store) => store,
            None => Box::new(JsonFileStore::open(
                container.join(JsonFileStore::DEFAULT_FILE_NAME),
            )?),
        };
        let keys = StateKeys::new(&namespace, app_name);

        let now = clock.now().timestamp();
        let (state, shrunk) = RotationState::load(store.as_ref(), &keys, max_files, now)?;
        if shrunk {
            files.delete_all_log_files().map_err(|err| {
                Error::new("failed to purge log files after the file count shrank")
                    .with_context("max_files", max_files)
                    .with_source(err)
            })?;
        }
        state.save(store.as_ref(), &keys)?;

        let executor = if blocking {
            Executor::Inline
        } else {
            Executor::background(thread_name)?
        };

        let inner = Inner {
            state,
            file: None,
            files,
            header: file_header,
            clock,
            store,
            keys,
        };
        Ok(RollingFile {
            shared: Arc::new(Shared {
                inner: Mutex::new(inner),
                trap,
            }),
            executor,
            encoder,
            decoder,
            line_separator,
            container,
        })
    }
}

fn default_container(app_name: Option<&str>) -> Result<PathBuf, Error> {
    let data_dir = dirs::data_local_dir().ok_or_else(|| {
        Error::with_kind(
            ErrorKind::Unavailable,
            "no local data directory to hold the log files; set a container",
        )
    })?;
    Ok(data_dir.join(app_name.unwrap_or("logfan")))
}

/// An append that writes entries to a fixed set of files, moving to the next file every day.
///
/// With `max_files` files, the logger writes to `0.log` on the first day, `1.log` on the next,
/// and wraps back to `0.log` after the last one, truncating it. Which file is current and since
/// when survive restarts through a [`KeyValueStore`].
///
/// Writes happen on a background thread unless the logger was built
/// [blocking](RollingFileBuilder::blocking). Call [`RollingFile::flush`] before reading to see
/// every entry appended so far.
///
/// # Examples
///
/// ```
/// use logfan::Append;
/// use logfan::Entry;
/// use logfan::Level;
/// use logfan::append::RollingFile;
///
/// let dir = tempfile::tempdir().unwrap();
/// let rolling_file = RollingFile::builder().container(dir.path()).build().unwrap();
///
/// let entry = Entry::now(Level::Info, logfan::location!(), "persisted");
/// rolling_file.append(&entry).unwrap();
/// rolling_file.flush().unwrap();
///
/// assert_eq!(rolling_file.entries(|_| true).unwrap(), vec![entry]);
/// ```
#[derive(Debug)]
pub struct RollingFile {
    shared: Arc<Shared>,
    executor: Executor,
    encoder: Box<dyn Encode>,
    decoder: Box<dyn Decode>,
    line_separator: String,
    container: PathBuf,
}

#[derive(Debug)]
struct Shared {
    inner: Mutex<Inner>,
    trap: Box<dyn Trap>,
}

#[derive(Debug)]
struct Inner {
    state: RotationState,
    file: Option<File>,
    files: FileStore,
    header: Option<String>,
    clock: Clock,
    store: Box<dyn KeyValueStore>,
    keys: StateKeys,
}

impl RollingFile {
    /// Create a [`RollingFileBuilder`].
    pub fn builder() -> RollingFileBuilder {
        RollingFileBuilder::new()
    }

    /// The directory holding the log directory, the state file, and archives.
    pub fn container(&self) -> &Path {
        &self.container
    }

    /// The directory holding the log files.
    pub fn log_dir(&self) -> PathBuf {
        self.shared.lock().files.log_dir().to_path_buf()
    }

    /// The file the next entry of today goes to.
    pub fn current_log_file(&self) -> PathBuf {
        let inner = self.shared.lock();
        inner.files.path_for(inner.state.current_file_index())
    }

    /// List the log files of this logger, ordered by index.
    ///
    /// # Errors
    ///
    /// Return an error if the log directory cannot be listed.
    pub fn log_files(&self) -> Result<Vec<PathBuf>, Error> {
        self.shared.lock().files.list_log_files()
    }

    /// Read and decode every log file, keeping the entries `filter` accepts.
    ///
    /// Files that vanish while reading are left out. Files that cannot be read for another reason
    /// are reported to the trap and left out.
    ///
    /// # Errors
    ///
    /// Return an error if the log directory cannot be listed.
    pub fn read_all<F>(&self, filter: F) -> Result<BTreeMap<PathBuf, Vec<Entry>>, Error>
    where
        F: Fn(&Entry) -> bool,
    {
        let paths = self.log_files()?;
        Ok(self.read_entries(paths, filter))
    }

    /// Like [`RollingFile::read_all`], flattened in file order.
    ///
    /// # Errors
    ///
    /// Return an error if the log directory cannot be listed.
    pub fn entries<F>(&self, filter: F) -> Result<Vec<Entry>, Error>
    where
        F: Fn(&Entry) -> bool,
    {
        let entries = self.read_all(filter)?;
        Ok(entries.into_values().flatten().collect())
    }

    /// Read every log file without decoding it.
    ///
    /// # Errors
    ///
    /// Return an error if the log directory cannot be listed.
    pub fn read_all_raw(&self) -> Result<BTreeMap<PathBuf, String>, Error> {
        let paths = self.log_files()?;
        Ok(self.shared.read_contents(paths))
    }

    /// Delete every log file and start over at index 0.
    ///
    /// Runs in order with the appends queued before it and waits for completion.
    ///
    /// # Errors
    ///
    /// Return an error if a file cannot be deleted or the counters cannot be persisted.
    pub fn delete_all_log_files(&self) -> Result<(), Error> {
        let shared = self.shared.clone();
        self.executor
            .call(move || shared.lock().delete_all_log_files())?
    }

    /// Compress the current log files into `<container>/<name>`.
    ///
    /// The snapshot is taken in order with the appends queued before it. `name` defaults to
    /// `log_files_archive.zip`; an existing archive of that name is replaced.
    ///
    /// # Errors
    ///
    /// Return an error if there are no log files, or if the archive cannot be written.
    pub fn archive(&self, name: Option<&str>) -> Result<PathBuf, Error> {
        let shared = self.shared.clone();
        let snapshots = self.executor.call(move || shared.snapshot())??;

        let path = self
            .container
            .join(name.unwrap_or(archive::DEFAULT_ARCHIVE_NAME));
        archive::write_zip(&path, &snapshots)?;
        Ok(path)
    }

    fn read_entries<F>(&self, paths: Vec<PathBuf>, filter: F) -> BTreeMap<PathBuf, Vec<Entry>>
    where
        F: Fn(&Entry) -> bool,
    {
        self.shared
            .read_contents(paths)
            .into_iter()
            .map(|(path, content)| {
                let mut entries = self.decoder.decode_all(&content);
                entries.retain(|entry| filter(entry));
                (path, entries)
            })
            .collect()
    }
}

impl Append for RollingFile {
    fn append(&self, entry: &Entry) -> Result<(), Error> {
        let mut record = match self.encoder.encode(entry) {
            Ok(record) => record,
            Err(err) => {
                self.shared.trap.trap(&err);
                return Ok(());
            }
        };
        record.push_str(&self.line_separator);

        let shared = self.shared.clone();
        let job = Box::new(move || shared.write(record.as_bytes()));
        if let Err(err) = self.executor.execute(job) {
            self.shared.trap.trap(&err);
        }
        Ok(())
    }

    /// Wait until every entry appended before this call is written, then flush the file.
    fn flush(&self) -> Result<(), Error> {
        self.executor.drain()?;
        let mut inner = self.shared.lock();
        if let Some(file) = inner.file.as_mut() {
            file.flush().map_err(Error::from_io_error)?;
        }
        Ok(())
    }

    fn as_rolling_file(&self) -> Option<&RollingFile> {
        Some(self)
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self, record: &[u8]) {
        let mut inner = self.lock();
        if let Err(err) = inner.write(record, self.trap.as_ref()) {
            self.trap.trap(&err);
        }
    }

    fn read_contents(&self, paths: Vec<PathBuf>) -> BTreeMap<PathBuf, String> {
        let inner = self.lock();
        let mut contents = BTreeMap::new();
        for path in paths {
            match inner.files.read_whole_file(&path) {
                Ok(content) => {
                    contents.insert(path, content);
                }
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => self.trap.trap(&err),
            }
        }
        contents
    }

    fn snapshot(&self) -> Result<Vec<Snapshot>, Error> {
        let inner = self.lock();
        let mut snapshots = vec![];
        for path in inner.files.list_log_files()? {
            let content = match inner.files.read_whole_file(&path) {
                Ok(content) => content,
                Err(err) if err.kind() == ErrorKind::NotFound => continue,
                Err(err) => return Err(err),
            };
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            snapshots.push(Snapshot { name, content });
        }
        Ok(snapshots)
    }
}

impl Inner {
    fn write(&mut self, record: &[u8], trap: &dyn Trap) -> Result<(), Error> {
        let file = self.current_file(trap)?;
        file.write_all(record).map_err(Error::from_io_error)
    }

    fn current_file(&mut self, trap: &dyn Trap) -> Result<&mut File, Error> {
        let now = self.clock.now();
        let path = match self.state.transition(&now, self.file.is_some()) {
            Transition::Reuse => None,
            Transition::Open => Some(self.files.path_for(self.state.current_file_index())),
            Transition::Advance => {
                self.close_file(trap);
                // the index moves only once the next file exists
                let path = self.files.path_for(self.state.next_index());
                self.files.recreate_file(&path, self.header.as_deref())?;
                self.state.advance(now.timestamp());
                if let Err(err) = self.state.save(self.store.as_ref(), &self.keys) {
                    trap.trap(&err);
                }
                Some(path)
            }
        };

        if let Some(path) = path {
            let file = self.files.open_for_append(&path, self.header.as_deref())?;
            self.file = Some(file);
        }
        self.file
            .as_mut()
            .ok_or_else(|| Error::new("no log file is open"))
    }

    fn close_file(&mut self, trap: &dyn Trap) {
        if let Some(mut file) = self.file.take() {
            if let Err(err) = file.flush() {
                let err = Error::new("failed to flush previous log file").with_source(err);
                trap.trap(&err);
            }
        }
    }

    fn delete_all_log_files(&mut self) -> Result<(), Error> {
        self.file = None;
        let deleted = self.files.delete_all_log_files();
        self.state.reset(self.clock.now().timestamp());
        self.state.save(self.store.as_ref(), &self.keys)?;
        deleted
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::str::FromStr;
    use std::sync::Arc;
    use std::sync::Mutex;

    use jiff::Zoned;
    use tempfile::TempDir;

    use super::*;
    use crate::Level;
    use crate::LogLocation;
    use crate::append::rolling_file::ManualClock;
    use crate::append::rolling_file::MemoryStore;
    use crate::trap::FnTrap;

    #[derive(Debug, Clone, Default)]
    struct Trapped(Arc<Mutex<Vec<String>>>);

    impl Trapped {
        fn trap(&self) -> FnTrap<impl Fn(&Error) + Send + Sync + 'static> {
            let errors = self.0.clone();
            FnTrap::new(move |err: &Error| errors.lock().unwrap().push(err.to_string()))
        }

        fn errors(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    fn entry(body: &str) -> Entry {
        Entry::now(Level::Info, LogLocation::new("append.rs", "tests", 1), body)
    }

    fn builder(temp_dir: &TempDir, clock: &ManualClock, trapped: &Trapped) -> RollingFileBuilder {
        RollingFile::builder()
            .container(temp_dir.path())
            .max_log_files(NonZeroUsize::new(3).unwrap())
            .clock(clock.clone())
            .state_store(MemoryStore::new())
            .trap(trapped.trap())
            .blocking()
    }

    fn clock() -> ManualClock {
        ManualClock::new(Zoned::from_str("2024-08-10T12:00:00[UTC]").unwrap())
    }

    #[test]
    fn test_append_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let trapped = Trapped::default();
        let rolling_file = builder(&temp_dir, &clock(), &trapped).build().unwrap();

        let entries = vec![entry("one"), entry("two\nlines")];
        for entry in &entries {
            rolling_file.append(entry).unwrap();
        }

        let read = rolling_file.read_all(|_| true).unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[&rolling_file.current_log_file()], entries);
        assert!(trapped.errors().is_empty());
    }

    #[test]
    fn test_filter_applies_to_read() {
        let temp_dir = TempDir::new().unwrap();
        let trapped = Trapped::default();
        let rolling_file = builder(&temp_dir, &clock(), &trapped).build().unwrap();

        rolling_file.append(&entry("keep")).unwrap();
        rolling_file
            .append(&Entry::now(Level::Debug, LogLocation::new("a", "b", 2), "drop"))
            .unwrap();

        let read = rolling_file.entries(|e| e.level() == &Level::Info).unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].body(), "keep");
    }

    #[test]
    fn test_header_written_once_per_file() {
        let temp_dir = TempDir::new().unwrap();
        let trapped = Trapped::default();
        let rolling_file = builder(&temp_dir, &clock(), &trapped)
            .file_header("my-app 1.2.3")
            .build()
            .unwrap();

        rolling_file.append(&entry("one")).unwrap();
        rolling_file.append(&entry("two")).unwrap();

        let raw = rolling_file.read_all_raw().unwrap();
        let content = &raw[&rolling_file.current_log_file()];
        assert!(content.starts_with("my-app 1.2.3\n|> "));
        assert_eq!(content.matches("my-app 1.2.3").count(), 1);
        assert_eq!(rolling_file.entries(|_| true).unwrap().len(), 2);
    }

    #[test]
    fn test_rotation_truncates_reused_file() {
        let temp_dir = TempDir::new().unwrap();
        let trapped = Trapped::default();
        let clock = clock();
        let rolling_file = builder(&temp_dir, &clock, &trapped).build().unwrap();

        let mut now = clock.now();
        let mut indices = vec![];
        for day in 0..4 {
            rolling_file.append(&entry(&format!("day {day}"))).unwrap();
            indices.push(rolling_file.current_log_file());
            now = now.tomorrow().unwrap();
            clock.set_now(now.clone());
        }

        let log_dir = rolling_file.log_dir();
        assert_eq!(
            indices,
            ["0.log", "1.log", "2.log", "0.log"].map(|name| log_dir.join(name))
        );
        assert_eq!(rolling_file.log_files().unwrap().len(), 3);

        let first = rolling_file.read_all(|_| true).unwrap()[&log_dir.join("0.log")].clone();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].body(), "day 3");
    }

    #[test]
    fn test_failed_rollover_keeps_the_current_file() {
        let temp_dir = TempDir::new().unwrap();
        let trapped = Trapped::default();
        let clock = clock();
        let rolling_file = builder(&temp_dir, &clock, &trapped).build().unwrap();

        rolling_file.append(&entry("today")).unwrap();
        let log_dir = rolling_file.log_dir();
        let today = log_dir.join("0.log");
        let next = log_dir.join("1.log");
        assert_eq!(rolling_file.current_log_file(), today);

        fs::create_dir_all(&next).unwrap();
        clock.set_now(clock.now().tomorrow().unwrap());
        rolling_file.append(&entry("lost")).unwrap();
        assert_eq!(trapped.errors().len(), 1);
        assert_eq!(rolling_file.current_log_file(), today);

        fs::remove_dir(&next).unwrap();
        fs::write(&next, "stale\n").unwrap();
        rolling_file.append(&entry("tomorrow")).unwrap();
        assert_eq!(rolling_file.current_log_file(), next);
        assert_eq!(trapped.errors().len(), 1);

        let read = rolling_file.read_all(|_| true).unwrap();
        let bodies = |path: &PathBuf| {
            read[path]
                .iter()
                .map(|e| e.body().to_string())
                .collect::<Vec<_>>()
        };
        assert_eq!(bodies(&today), ["today"]);
        assert_eq!(bodies(&next), ["tomorrow"]);
        assert!(!fs::read_to_string(&next).unwrap().contains("stale"));
    }

    #[test]
    fn test_vanished_file_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let trapped = Trapped::default();
        let rolling_file = builder(&temp_dir, &clock(), &trapped).build().unwrap();
        rolling_file.append(&entry("survivor")).unwrap();

        let paths = rolling_file.log_files().unwrap();
        let vanished = rolling_file.log_dir().join("2.log");
        let read = rolling_file.read_entries(
            paths.into_iter().chain([vanished.clone()]).collect(),
            |_| true,
        );

        assert_eq!(read.len(), 1);
        assert!(!read.contains_key(&vanished));
        assert!(trapped.errors().is_empty());
    }

    #[test]
    fn test_delete_all_resets_rotation() {
        let temp_dir = TempDir::new().unwrap();
        let trapped = Trapped::default();
        let clock = clock();
        let rolling_file = builder(&temp_dir, &clock, &trapped).build().unwrap();

        rolling_file.append(&entry("day 0")).unwrap();
        clock.set_now(clock.now().tomorrow().unwrap());
        rolling_file.append(&entry("day 1")).unwrap();
        assert_eq!(rolling_file.log_files().unwrap().len(), 2);

        rolling_file.delete_all_log_files().unwrap();
        assert!(rolling_file.log_files().unwrap().is_empty());
        assert_eq!(
            rolling_file.current_log_file(),
            rolling_file.log_dir().join("0.log")
        );

        rolling_file.append(&entry("again")).unwrap();
        assert_eq!(
            rolling_file.log_files().unwrap(),
            vec![rolling_file.log_dir().join("0.log")]
        );
        assert!(trapped.errors().is_empty());
    }

    #[test]
    fn test_externally_removed_log_dir_is_recreated() {
        let temp_dir = TempDir::new().unwrap();
        let trapped = Trapped::default();
        let clock = clock();
        let rolling_file = builder(&temp_dir, &clock, &trapped).build().unwrap();

        fs::remove_dir_all(rolling_file.log_dir()).unwrap();
        rolling_file.append(&entry("recovered")).unwrap();
        assert_eq!(rolling_file.entries(|_| true).unwrap().len(), 1);
    }

    #[test]
    fn test_archive_without_files_fails() {
        let temp_dir = TempDir::new().unwrap();
        let trapped = Trapped::default();
        let rolling_file = builder(&temp_dir, &clock(), &trapped).build().unwrap();

        let err = rolling_file.archive(None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_blank_names_are_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let trapped = Trapped::default();

        let err = builder(&temp_dir, &clock(), &trapped)
            .namespace(" ")
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);

        let err = builder(&temp_dir, &clock(), &trapped)
            .sharing(Sharing::Shared {
                container: temp_dir.path().to_path_buf(),
                max_files: NonZeroUsize::new(2).unwrap(),
                app_name: String::new(),
            })
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_invalid_codec_config_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let trapped = Trapped::default();
        let err = builder(&temp_dir, &clock(), &trapped)
            .codec_config(CodecConfig::default().record_separator(""))
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_background_appends_are_visible_after_flush() {
        let temp_dir = TempDir::new().unwrap();
        let trapped = Trapped::default();
        let rolling_file = RollingFile::builder()
            .container(temp_dir.path())
            .state_store(MemoryStore::new())
            .trap(trapped.trap())
            .build()
            .unwrap();

        for i in 0..50 {
            rolling_file.append(&entry(&format!("entry {i}"))).unwrap();
        }
        rolling_file.flush().unwrap();

        let entries = rolling_file.entries(|_| true).unwrap();
        let bodies = entries.iter().map(Entry::body).collect::<Vec<_>>();
        let expected = (0..50).map(|i| format!("entry {i}")).collect::<Vec<_>>();
        assert_eq!(bodies, expected);
        assert!(trapped.errors().is_empty());
    }
}
