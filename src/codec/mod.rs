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

//! Encode entries to text records and decode them back.

use std::fmt;

use crate::Error;
use crate::entry::Entry;

mod config;
mod text;

pub use self::config::CodecConfig;
pub use self::config::DateFormat;
pub use self::text::TextCodec;

/// An encoder that turns one entry into one text record.
pub trait Encode: fmt::Debug + Send + Sync + 'static {
    /// Encode an entry. The result carries no trailing line separator.
    fn encode(&self, entry: &Entry) -> Result<String, Error>;
}

/// A decoder that scans a blob of concatenated records back into entries.
pub trait Decode: fmt::Debug + Send + Sync + 'static {
    /// Decode every well-formed record in `blob`, in order.
    ///
    /// Malformed records are skipped; decoding never fails for the whole blob. Decoders may trim
    /// whitespace around bodies, so `decode_all(encode(e))` equals `e` only up to leading and
    /// trailing whitespace of the body.
    fn decode_all(&self, blob: &str) -> Vec<Entry>;
}

impl<T: Encode> From<T> for Box<dyn Encode> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}

impl<T: Decode> From<T> for Box<dyn Decode> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}
