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

use std::io::Write;

use crate::Entry;
use crate::Error;
use crate::append::Append;
use crate::codec::Encode;
use crate::codec::TextCodec;

/// An append that prints entries to stdout.
///
/// # Examples
///
/// ```
/// use logfan::append::Stdout;
///
/// let stdout_append = Stdout::default();
/// ```
#[derive(Debug)]
pub struct Stdout {
    encoder: Box<dyn Encode>,
}

impl Default for Stdout {
    fn default() -> Self {
        Self {
            encoder: Box::new(TextCodec::default()),
        }
    }
}

impl Stdout {
    /// Set the encoder for the [`Stdout`] append.
    ///
    /// Default to [`TextCodec`].
    pub fn with_encoder(mut self, encoder: impl Into<Box<dyn Encode>>) -> Self {
        self.encoder = encoder.into();
        self
    }
}

impl Append for Stdout {
    fn append(&self, entry: &Entry) -> Result<(), Error> {
        let mut text = self.encoder.encode(entry)?;
        text.push('\n');
        std::io::stdout()
            .write_all(text.as_bytes())
            .map_err(Error::from_io_error)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), Error> {
        std::io::stdout().flush().map_err(Error::from_io_error)?;
        Ok(())
    }
}

/// An append that prints entries to stderr.
///
/// # Examples
///
/// ```
/// use logfan::append::Stderr;
///
/// let stderr_append = Stderr::default();
/// ```
#[derive(Debug)]
pub struct Stderr {
    encoder: Box<dyn Encode>,
}

impl Default for Stderr {
    fn default() -> Self {
        Self {
            encoder: Box::new(TextCodec::default()),
        }
    }
}

impl Stderr {
    /// Set the encoder for the [`Stderr`] append.
    ///
    /// Default to [`TextCodec`].
    pub fn with_encoder(mut self, encoder: impl Into<Box<dyn Encode>>) -> Self {
        self.encoder = encoder.into();
        self
    }
}

impl Append for Stderr {
    fn append(&self, entry: &Entry) -> Result<(), Error> {
        let mut text = self.encoder.encode(entry)?;
        text.push('\n');
        std::io::stderr()
            .write_all(text.as_bytes())
            .map_err(Error::from_io_error)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), Error> {
        std::io::stderr().flush().map_err(Error::from_io_error)?;
        Ok(())
    }
}
