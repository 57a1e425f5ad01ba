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

use std::sync::Arc;
use std::sync::Mutex;

use jiff::Zoned;

/// The source of "now" for rotation decisions.
///
/// Rotation compares calendar dates in the time zone of the returned [`Zoned`].
#[derive(Debug, Clone, Default)]
pub enum Clock {
    /// The system clock in the system time zone.
    #[default]
    System,
    /// A clock that only moves when told to.
    Manual(ManualClock),
}

impl Clock {
    /// The current time.
    pub fn now(&self) -> Zoned {
        match self {
            Clock::System => Zoned::now(),
            Clock::Manual(clock) => clock.now(),
        }
    }
}

impl From<ManualClock> for Clock {
    fn from(clock: ManualClock) -> Self {
        Clock::Manual(clock)
    }
}

/// The time could be reset.
///
/// Clones share the same time, so a caller can keep one to move the clock of a logger it handed
/// the other to.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
///
/// use jiff::Zoned;
/// use logfan::append::rolling_file::Clock;
/// use logfan::append::rolling_file::ManualClock;
///
/// let clock = ManualClock::new(Zoned::from_str("2024-08-10T00:00:00[UTC]").unwrap());
/// let handed_out = Clock::from(clock.clone());
///
/// clock.set_now(Zoned::from_str("2024-08-11T00:00:00[UTC]").unwrap());
/// assert_eq!(handed_out.now().day(), 11);
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Zoned>>,
}

impl ManualClock {
    /// Create a clock stopped at `now`.
    pub fn new(now: Zoned) -> ManualClock {
        ManualClock {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// The time the clock is stopped at.
    pub fn now(&self) -> Zoned {
        self.now.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Move the clock to `now`.
    pub fn set_now(&self, now: Zoned) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }
}
