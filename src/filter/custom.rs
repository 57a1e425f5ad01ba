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

use crate::Entry;
use crate::filter::Filter;
use crate::filter::FilterResult;

/// A filter backed by a closure.
///
/// # Examples
///
/// ```
/// use logfan::filter::CustomFilter;
/// use logfan::filter::FilterResult;
///
/// let filter = CustomFilter::new(|entry| {
///     if entry.body().contains("password") {
///         FilterResult::Reject
///     } else {
///         FilterResult::Neutral
///     }
/// });
/// ```
pub struct CustomFilter {
    f: Box<dyn Fn(&Entry) -> FilterResult + Send + Sync + 'static>,
}

impl fmt::Debug for CustomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CustomFilter {{ ... }}")
    }
}

impl CustomFilter {
    /// Create a filter from a closure.
    pub fn new(filter: impl Fn(&Entry) -> FilterResult + Send + Sync + 'static) -> Self {
        CustomFilter {
            f: Box::new(filter),
        }
    }
}

impl Filter for CustomFilter {
    fn matches(&self, entry: &Entry) -> FilterResult {
        (self.f)(entry)
    }
}
