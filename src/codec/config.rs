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

use jiff::Timestamp;
use jiff::civil::DateTime;
use jiff::tz::TimeZone;
use regex::Regex;

use crate::Error;
use crate::ErrorKind;
use crate::entry::LogHeader;
use crate::level::Level;

/// How timestamps are written into and read from encoded records.
#[derive(Debug, Clone)]
pub struct DateFormat {
    pattern: String,
    time_zone: TimeZone,
}

impl Default for DateFormat {
    fn default() -> Self {
        Self::new(DateFormat::DEFAULT_PATTERN, TimeZone::system())
    }
}

impl DateFormat {
    /// `yyyy-MM-dd HH:mm:ss.SSS`
    pub const DEFAULT_PATTERN: &'static str = "%Y-%m-%d %H:%M:%S%.3f";

    /// Create a new date format from a strftime-like pattern and the zone to render in.
    ///
    /// The pattern must not carry zone information: a parsed date is interpreted in `time_zone`.
    pub fn new(pattern: impl Into<String>, time_zone: TimeZone) -> Self {
        Self {
            pattern: pattern.into(),
            time_zone,
        }
    }

    /// The default pattern rendered in UTC.
    pub fn utc() -> Self {
        Self::new(DateFormat::DEFAULT_PATTERN, TimeZone::UTC)
    }

    /// The strftime-like pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The zone dates are rendered in.
    pub fn time_zone(&self) -> &TimeZone {
        &self.time_zone
    }

    /// Render a timestamp.
    pub fn format(&self, timestamp: Timestamp) -> Result<String, Error> {
        let zoned = timestamp.to_zoned(self.time_zone.clone());
        jiff::fmt::strtime::format(&self.pattern, &zoned).map_err(|err| {
            Error::new("failed to format timestamp")
                .with_context("pattern", &self.pattern)
                .with_source(err)
        })
    }

    /// Parse a rendered timestamp back, or return `None` if `input` does not match the pattern.
    pub fn try_parse(&self, input: &str) -> Option<Timestamp> {
        let datetime = DateTime::strptime(&self.pattern, input).ok()?;
        let zoned = datetime.to_zoned(self.time_zone.clone()).ok()?;
        Some(zoned.timestamp())
    }

    /// Parse a rendered timestamp back.
    pub fn parse(&self, input: &str) -> Result<Timestamp, Error> {
        let datetime = DateTime::strptime(&self.pattern, input).map_err(|err| {
            Error::new("failed to parse timestamp")
                .with_context("input", input)
                .with_source(err)
        })?;
        let zoned = datetime
            .to_zoned(self.time_zone.clone())
            .map_err(|err| Error::new("failed to resolve timestamp").with_source(err))?;
        Ok(zoned.timestamp())
    }
}

/// The literal tokens of the text record format.
///
/// With the defaults, a record reads:
///
/// ```text
/// |> [~info 2024-08-10 17:12:52.123~] main.rs — app::server — line 42: listening
/// ```
#[derive(Debug, Clone)]
pub struct CodecConfig {
    pub(crate) record_separator: String,
    pub(crate) header_open: String,
    pub(crate) header_close: String,
    pub(crate) location_separator: String,
    pub(crate) line_keyword: String,
    pub(crate) message_separator: String,
    pub(crate) date_format: DateFormat,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            record_separator: "|>".to_string(),
            header_open: "[~".to_string(),
            header_close: "~]".to_string(),
            location_separator: "—".to_string(),
            line_keyword: "line".to_string(),
            message_separator: ":".to_string(),
            date_format: DateFormat::default(),
        }
    }
}

impl CodecConfig {
    /// The default profile with plain `[` and `]` around the header.
    pub fn bracketed() -> Self {
        Self::default().header_separators("[", "]")
    }

    /// Set the token that starts every record.
    pub fn record_separator(mut self, separator: impl Into<String>) -> Self {
        self.record_separator = separator.into();
        self
    }

    /// Set the tokens around the `<level> <date>` header.
    pub fn header_separators(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
        self.header_open = open.into();
        self.header_close = close.into();
        self
    }

    /// Set the token between file name, function, and line.
    pub fn location_separator(mut self, separator: impl Into<String>) -> Self {
        self.location_separator = separator.into();
        self
    }

    /// Set the word written before the line number.
    pub fn line_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.line_keyword = keyword.into();
        self
    }

    /// Set the token between the location and the message.
    pub fn message_separator(mut self, separator: impl Into<String>) -> Self {
        self.message_separator = separator.into();
        self
    }

    /// Set the date format.
    pub fn date_format(mut self, date_format: DateFormat) -> Self {
        self.date_format = date_format;
        self
    }

    /// The configured date format.
    pub fn get_date_format(&self) -> &DateFormat {
        &self.date_format
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        let required = [
            ("record_separator", &self.record_separator),
            ("header_open", &self.header_open),
            ("header_close", &self.header_close),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(Error::with_kind(
                    ErrorKind::ConfigInvalid,
                    "separator must not be blank",
                )
                .with_context("separator", name));
            }
        }
        Ok(())
    }

    /// Render a header as `<open><level> <date><close>`.
    ///
    /// # Errors
    ///
    /// Return an error if the level tag contains a line break or the closing token, since such a
    /// header could not be read back.
    pub fn format_header(&self, header: &LogHeader) -> Result<String, Error> {
        let tag = header.level().tag();
        if tag.contains('\n') || tag.contains(self.header_close.as_str()) {
            return Err(
                Error::with_kind(ErrorKind::ConfigInvalid, "level tag cannot be encoded")
                    .with_context("level", tag),
            );
        }

        let date = self.date_format.format(header.timestamp())?;
        Ok(format!("{}{} {}{}", self.header_open, tag, date, self.header_close))
    }

    /// Parse a header rendered by [`CodecConfig::format_header`].
    ///
    /// Return `None` if the text is not a header or its date does not parse.
    pub fn parse_header(&self, text: &str) -> Option<LogHeader> {
        let pattern = format!(
            r"^\s*{}(?P<inner>.*?){}\s*$",
            regex::escape(&self.header_open),
            regex::escape(&self.header_close),
        );
        let captures = Regex::new(&pattern).ok()?.captures(text)?;
        self.split_header(&captures["inner"])
    }

    /// Split the text between the header tokens into level and date.
    ///
    /// Tags may be empty or contain spaces, so the date is the longest whitespace-separated
    /// suffix that parses; everything before its separator is the tag, verbatim.
    pub(crate) fn split_header(&self, inner: &str) -> Option<LogHeader> {
        inner
            .char_indices()
            .rev()
            .filter(|(_, c)| c.is_whitespace())
            .find_map(|(i, c)| {
                let timestamp = self.date_format.try_parse(&inner[i + c.len_utf8()..])?;
                Some(LogHeader::new(timestamp, Level::from_tag(&inner[..i])))
            })
    }
}
