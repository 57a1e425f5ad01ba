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

use crate::Append;
use crate::Filter;
use crate::Trap;
use crate::logger::log_impl::AppendId;
use crate::logger::log_impl::Dispatch;
use crate::logger::log_impl::Logger;
use crate::logger::log_impl::set_default_logger;
use crate::trap::DefaultTrap;

/// Create a new empty [`LoggerBuilder`] instance for configuring log dispatching.
///
/// # Examples
///
/// ```
/// use logfan::append;
///
/// let logger = logfan::builder()
///     .dispatch(|d| d.append(append::Stderr::default()))
///     .build();
/// ```
pub fn builder() -> LoggerBuilder {
    LoggerBuilder {
        dispatches: vec![],
        trap: Box::new(DefaultTrap::default()),
    }
}

/// A builder for configuring log dispatching.
///
/// # Examples
///
/// ```
/// use logfan::Level;
/// use logfan::append;
/// use logfan::filter::LevelFilter;
///
/// let logger = logfan::builder()
///     .dispatch(|d| {
///         d.filter(LevelFilter::new([Level::Warning, Level::Critical]))
///             .append(append::Stderr::default())
///     })
///     .dispatch(|d| d.append(append::Stdout::default()))
///     .build();
/// ```
#[must_use = "call `apply` to set the default logger or `build` to construct a logger instance"]
#[derive(Debug)]
pub struct LoggerBuilder {
    // stashed dispatches
    dispatches: Vec<Dispatch>,
    trap: Box<dyn Trap>,
}

impl LoggerBuilder {
    /// Register a new dispatch with the [`LoggerBuilder`].
    pub fn dispatch<F>(mut self, f: F) -> Self
    where
        F: FnOnce(DispatchBuilder<false>) -> DispatchBuilder<true>,
    {
        self.dispatches.push(f(DispatchBuilder::new()).build());
        self
    }

    /// Set the trap receiving the errors appends return.
    ///
    /// Default to [`DefaultTrap`].
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    /// Build the [`Logger`].
    ///
    /// # Examples
    ///
    /// ```
    /// use logfan::Entry;
    /// use logfan::Level;
    ///
    /// let l = logfan::builder().build();
    /// l.log(&Entry::now(Level::Info, logfan::location!(), "hello world!"));
    /// ```
    pub fn build(self) -> Logger {
        Logger::new(self.dispatches, self.trap)
    }

    /// Set up the process-wide default logger with all the configured dispatches.
    ///
    /// # Errors
    ///
    /// Return the built logger if a default logger has already been set.
    ///
    /// # Examples
    ///
    /// ```
    /// if logfan::builder().try_apply().is_err() {
    ///     eprintln!("failed to set logger");
    /// }
    /// ```
    pub fn try_apply(self) -> Result<(), Logger> {
        set_default_logger(self.build())
    }

    /// Set up the process-wide default logger with all the configured dispatches.
    ///
    /// # Panics
    ///
    /// Panic if the default logger has already been set.
    ///
    /// # Examples
    ///
    /// ```
    /// logfan::builder().apply();
    /// ```
    pub fn apply(self) {
        self.try_apply()
            .expect("LoggerBuilder::apply must be called before the default logger initialized");
    }
}

/// A builder for configuring a log dispatch, including filters and appends.
///
/// # Examples
///
/// ```
/// use logfan::Level;
/// use logfan::append;
///
/// let logger = logfan::builder()
///     .dispatch(|d| d.filter(Level::Critical).append(append::Stderr::default()))
///     .build();
/// ```
#[derive(Debug)]
pub struct DispatchBuilder<const APPEND: bool> {
    filters: Vec<Box<dyn Filter>>,
    appends: Vec<(AppendId, Box<dyn Append>)>,
}

impl DispatchBuilder<false> {
    fn new() -> Self {
        DispatchBuilder {
            filters: vec![],
            appends: vec![],
        }
    }

    /// Add a filter to this dispatch.
    ///
    /// An entry reaches the appends unless a filter rejects it.
    pub fn filter(mut self, filter: impl Into<Box<dyn Filter>>) -> Self {
        self.filters.push(filter.into());
        self
    }
}

impl DispatchBuilder<true> {
    fn build(self) -> Dispatch {
        Dispatch::new(self.filters, self.appends)
    }
}

impl<const APPEND: bool> DispatchBuilder<APPEND> {
    /// Add an append to this dispatch under a fresh [`AppendId`].
    pub fn append(self, append: impl Into<Box<dyn Append>>) -> DispatchBuilder<true> {
        self.append_with_id(AppendId::new(), append)
    }

    /// Add an append to this dispatch under `id`.
    ///
    /// # Examples
    ///
    /// ```
    /// use logfan::AppendId;
    /// use logfan::append;
    ///
    /// let id = AppendId::new();
    /// let logger = logfan::builder()
    ///     .dispatch(|d| d.append_with_id(id, append::Stdout::default()))
    ///     .build();
    /// assert!(logger.append_by_id(id).is_some());
    /// ```
    pub fn append_with_id(
        mut self,
        id: AppendId,
        append: impl Into<Box<dyn Append>>,
    ) -> DispatchBuilder<true> {
        self.appends.push((id, append.into()));
        DispatchBuilder {
            filters: self.filters,
            appends: self.appends,
        }
    }
}
