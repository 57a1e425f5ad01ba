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

use crate::Entry;
use crate::Level;
use crate::LogLocation;
use crate::Logger;
use crate::default_logger;
use crate::entry::file_name;

struct LogCrateLogger(());

impl log::Log for LogCrateLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        let Some(logger) = default_logger() else {
            return false;
        };

        log::Log::enabled(logger, metadata)
    }

    fn log(&self, record: &log::Record) {
        if let Some(logger) = default_logger() {
            log::Log::log(logger, record);
        }
    }

    fn flush(&self) {
        if let Some(logger) = default_logger() {
            log::Log::flush(logger);
        }
    }
}

/// Set up the log crate global logger, forwarding to the [default logger](crate::default_logger).
///
/// # Errors
///
/// Return an error if the log crate global logger has already been set.
pub fn try_setup_log_crate() -> Result<(), log::SetLoggerError> {
    static LOGGER: LogCrateLogger = LogCrateLogger(());
    log::set_logger(&LOGGER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Set up the log crate global logger, forwarding to the [default logger](crate::default_logger).
///
/// # Panics
///
/// Panic if the log crate global logger has already been set.
pub fn setup_log_crate() {
    try_setup_log_crate().expect(
        "logfan::bridge::setup_log_crate must be called before the log crate global logger initialized",
    )
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Level::Critical,
            log::Level::Warn => Level::Warning,
            log::Level::Info => Level::Info,
            log::Level::Debug | log::Level::Trace => Level::Debug,
        }
    }
}

impl From<&log::Record<'_>> for Entry {
    fn from(record: &log::Record<'_>) -> Self {
        let location = LogLocation::new(
            record.file().map_or("<unknown>", file_name),
            record.module_path().unwrap_or(record.target()),
            record.line().unwrap_or(0),
        );
        Entry::now(record.level().into(), location, record.args())
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        Logger::enabled(self, &metadata.level().into())
    }

    fn log(&self, record: &log::Record) {
        Logger::log(self, &Entry::from(record));
    }

    fn flush(&self) {
        Logger::flush(self);
    }
}
