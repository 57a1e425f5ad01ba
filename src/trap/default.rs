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
use std::io;
use std::io::Write;

use crate::Error;
use crate::trap::Trap;

/// A default trap that sends errors to standard error.
///
/// Panics if standard error cannot be written either.
#[derive(Debug, Default)]
#[non_exhaustive]
pub struct DefaultTrap {}

impl Trap for DefaultTrap {
    fn trap(&self, err: &Error) {
        if let Err(fallback) = writeln!(io::stderr(), "{err}") {
            panic!(
                r###"
Error performing stderr logging after error occurred during regular logging.
    Error: {err:?}
    Fallback error: {fallback}
"###
            );
        }
    }
}

/// A trap that sends errors to standard error if possible.
///
/// If standard error is not available, it does nothing.
#[derive(Debug, Default)]
#[non_exhaustive]
pub struct BestEffortTrap {}

impl Trap for BestEffortTrap {
    fn trap(&self, err: &Error) {
        let _ = writeln!(io::stderr(), "{err}");
    }
}

/// A trap backed by a closure.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::Mutex;
///
/// use logfan::trap::FnTrap;
/// use logfan::trap::Trap;
///
/// let seen = Arc::new(Mutex::new(vec![]));
/// let trap = FnTrap::new({
///     let seen = seen.clone();
///     move |err| seen.lock().unwrap().push(err.to_string())
/// });
/// trap.trap(&logfan::Error::new("disk full"));
/// assert_eq!(seen.lock().unwrap().len(), 1);
/// ```
pub struct FnTrap<F> {
    f: F,
}

impl<F> FnTrap<F>
where
    F: Fn(&Error) + Send + Sync + 'static,
{
    /// Wrap a closure into a trap.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> fmt::Debug for FnTrap<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTrap").finish_non_exhaustive()
    }
}

impl<F> Trap for FnTrap<F>
where
    F: Fn(&Error) + Send + Sync + 'static,
{
    fn trap(&self, err: &Error) {
        (self.f)(err)
    }
}
