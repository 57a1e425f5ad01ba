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

use std::fmt::Write;

use regex::Captures;
use regex::Regex;

use crate::Error;
use crate::codec::CodecConfig;
use crate::codec::Decode;
use crate::codec::Encode;
use crate::entry::Entry;
use crate::entry::LogHeader;
use crate::entry::LogLocation;

/// The delimited text record format.
///
/// Records are found by their headers, and a body runs up to the next header that decodes. Bodies
/// are trimmed when decoded, so leading and trailing whitespace of a message does not survive a
/// round trip.
///
/// # Examples
///
/// ```
/// use logfan::Entry;
/// use logfan::Level;
/// use logfan::codec::Decode;
/// use logfan::codec::Encode;
/// use logfan::codec::TextCodec;
///
/// let codec = TextCodec::default();
/// let entry = Entry::now(Level::Info, logfan::location!(), "line one\nline two");
/// let record = codec.encode(&entry).unwrap();
/// assert_eq!(codec.decode_all(&record), vec![entry]);
/// ```
#[derive(Debug, Clone)]
pub struct TextCodec {
    config: CodecConfig,
    record: Regex,
}

impl Default for TextCodec {
    fn default() -> Self {
        TextCodec::new(CodecConfig::default())
            .expect("default record pattern must compile; this is a bug in logfan")
    }
}

impl TextCodec {
    /// Create a codec for the given tokens.
    ///
    /// # Errors
    ///
    /// Return an error if a mandatory separator is blank.
    pub fn new(config: CodecConfig) -> Result<Self, Error> {
        config.validate()?;
        let record = Regex::new(&record_pattern(&config))
            .map_err(|err| Error::new("failed to compile record pattern").with_source(err))?;
        Ok(Self { config, record })
    }

    /// The tokens this codec reads and writes.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    fn decode_header(&self, captures: &Captures) -> Option<(LogHeader, LogLocation)> {
        let header = self.config.split_header(&captures["header"])?;
        let line = captures["line"].parse::<u32>().ok()?;
        let location = LogLocation::new(&captures["file"], &captures["function"], line);
        Some((header, location))
    }
}

// Every configured token is escaped: only the captures are patterns. Header fields never span
// lines. The level and date are split apart after matching, because tags may hold spaces.
fn record_pattern(config: &CodecConfig) -> String {
    let location = regex::escape(&config.location_separator);
    format!(
        concat!(
            r"{record}[ \t]*{open}(?P<header>[^\n]*?){close}[ \t]+",
            r"(?P<file>[^\n]*?)[ \t]+{location}[ \t]+(?P<function>[^\n]*?)[ \t]+{location}[ \t]+",
            r"{line}[ \t]+(?P<line>\d+){message}",
        ),
        record = regex::escape(&config.record_separator),
        open = regex::escape(&config.header_open),
        close = regex::escape(&config.header_close),
        location = location,
        line = regex::escape(&config.line_keyword),
        message = regex::escape(&config.message_separator),
    )
}

impl Encode for TextCodec {
    fn encode(&self, entry: &Entry) -> Result<String, Error> {
        let config = &self.config;
        let header = config.format_header(entry.header())?;
        let location = entry.location();

        let mut text = String::new();
        write!(
            &mut text,
            "{record} {header} {file} {sep} {function} {sep} {line_keyword} {line}{message} {body}",
            record = config.record_separator,
            file = location.file_name(),
            sep = config.location_separator,
            function = location.function(),
            line_keyword = config.line_keyword,
            line = location.line(),
            message = config.message_separator,
            body = entry.body(),
        )
        .map_err(Error::from_fmt_error)?;
        Ok(text)
    }
}

impl Decode for TextCodec {
    fn decode_all(&self, blob: &str) -> Vec<Entry> {
        // header-like text that does not decode stays part of the preceding body
        let headers = self
            .record
            .captures_iter(blob)
            .filter_map(|captures| {
                let span = captures.get(0)?;
                let (header, location) = self.decode_header(&captures)?;
                Some((span.start(), span.end(), header, location))
            })
            .collect::<Vec<_>>();

        let mut entries = Vec::with_capacity(headers.len());
        for (i, (_, body_start, header, location)) in headers.iter().enumerate() {
            let body_end = headers
                .get(i + 1)
                .map_or(blob.len(), |(next_start, ..)| *next_start);
            let body = blob[*body_start..body_end].trim();

            entries.push(Entry::new(header.clone(), location.clone(), body));
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use jiff::Timestamp;

    use super::*;
    use crate::ErrorKind;
    use crate::codec::DateFormat;
    use crate::level::Level;

    fn codec() -> TextCodec {
        TextCodec::new(CodecConfig::default().date_format(DateFormat::utc())).unwrap()
    }

    fn entry(level: Level, body: &str) -> Entry {
        let ts = Timestamp::from_str("2024-08-10T17:12:52.123Z").unwrap();
        Entry::new(
            LogHeader::new(ts, level),
            LogLocation::new("File.rs", "Function", 42),
            body,
        )
    }

    #[test]
    fn test_encode_default_profile() {
        let record = codec().encode(&entry(Level::Info, "hello")).unwrap();
        insta::assert_snapshot!(
            record,
            @"|> [~info 2024-08-10 17:12:52.123~] File.rs — Function — line 42: hello"
        );
    }

    #[test]
    fn test_round_trip_single_entry() {
        let codec = codec();
        let e = entry(Level::Critical, "disk is full");
        assert_eq!(codec.decode_all(&codec.encode(&e).unwrap()), vec![e]);
    }

    #[test]
    fn test_round_trip_many_entries() {
        let codec = codec();
        let entries = vec![
            entry(Level::Debug, "first"),
            entry(
                Level::Warning,
                "second spans\nmultiple lines [with] {braces}: and // slashes\n  indented",
            ),
            entry(Level::Default, "third |> not a record"),
        ];

        let blob = entries
            .iter()
            .map(|e| codec.encode(e).unwrap())
            .collect::<Vec<_>>()
            .join("\u{2028}");

        assert_eq!(codec.decode_all(&blob), entries);
    }

    #[test]
    fn test_parse_line_with_special_characters() {
        let codec = TextCodec::new(
            CodecConfig::bracketed()
                .location_separator("-")
                .date_format(DateFormat::utc()),
        )
        .unwrap();
        let record = "|> [INFO 2022-02-21 15:16:17.189] FileName.swift - Function - line 42: Some log with special characters ::[]{}()//";
        let entries = codec.decode_all(record);
        assert_eq!(entries.len(), 1);

        let entry = &entries[0];
        assert_eq!(entry.level(), &Level::custom("INFO"));
        assert_eq!(entry.level().tag(), "INFO");
        assert_eq!(
            entry.timestamp(),
            Timestamp::from_str("2022-02-21T15:16:17.189Z").unwrap()
        );
        assert_eq!(entry.location().file_name(), "FileName.swift");
        assert_eq!(entry.location().function(), "Function");
        assert_eq!(entry.location().line(), 42);
        assert_eq!(entry.body(), "Some log with special characters ::[]{}()//");
    }

    #[test]
    fn test_parse_encoded_json_body() {
        let codec = codec();
        let e = entry(Level::Info, r#"{"array":[1,2,3],"text":"Text"}"#);
        let decoded = codec.decode_all(&codec.encode(&e).unwrap());
        assert_eq!(decoded[0].body(), r#"{"array":[1,2,3],"text":"Text"}"#);
    }

    #[test]
    fn test_unparseable_header_stays_in_previous_body() {
        let codec = codec();
        let good = codec.encode(&entry(Level::Info, "kept")).unwrap();
        let bad = "|> [~info not-a-date~] File.rs — Function — line 1: dropped";
        let blob = format!("{bad}\n{good}\n{bad}");

        let entries = codec.decode_all(&blob);
        assert_eq!(entries, vec![entry(Level::Info, &format!("kept\n{bad}"))]);
    }

    #[test]
    fn test_body_quoting_a_broken_header_is_kept_whole() {
        let codec = codec();
        let entries = vec![
            entry(Level::Info, "quoted: |> [~info garbage~] a — b — line 1: tail"),
            entry(Level::Debug, "next"),
        ];
        let blob = entries
            .iter()
            .map(|e| codec.encode(e).unwrap())
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(codec.decode_all(&blob), entries);
    }

    #[test]
    fn test_round_trip_levels_with_spaces_or_no_text() {
        let codec = codec();
        let entries = vec![
            entry(Level::custom("my level"), "spaced"),
            entry(Level::custom(""), "empty"),
            entry(Level::Warning, "plain"),
        ];
        let blob = entries
            .iter()
            .map(|e| codec.encode(e).unwrap())
            .collect::<Vec<_>>()
            .join("\n");

        let decoded = codec.decode_all(&blob);
        assert_eq!(decoded, entries);
        assert_eq!(decoded[0].level().tag(), "my level");
        assert_eq!(decoded[1].level().tag(), "");
    }

    #[test]
    fn test_unencodable_level_is_an_error() {
        let err = codec()
            .encode(&entry(Level::custom("a\nb"), "lost"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        let codec = codec();
        let record = codec.encode(&entry(Level::Info, "  padded \n")).unwrap();
        let decoded = codec.decode_all(&record);
        assert_eq!(decoded, vec![entry(Level::Info, "padded")]);
    }

    #[test]
    fn test_leading_garbage_is_ignored() {
        let codec = codec();
        let e = entry(Level::Info, "after the file header");
        let blob = format!("build 1.2.3 (ios)\n\n{}", codec.encode(&e).unwrap());
        assert_eq!(codec.decode_all(&blob), vec![e]);
    }

    #[test]
    fn test_separators_with_regex_metacharacters() {
        let codec = TextCodec::new(
            CodecConfig::default()
                .record_separator("**(")
                .header_separators("[{", "}]")
                .location_separator("|")
                .message_separator("$")
                .date_format(DateFormat::utc()),
        )
        .unwrap();
        let entries = vec![
            entry(Level::Info, "a $ b | c"),
            entry(Level::custom("x.y+"), "multi\nline"),
        ];
        let blob = entries
            .iter()
            .map(|e| codec.encode(e).unwrap())
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(codec.decode_all(&blob), entries);
    }

    #[test]
    fn test_empty_blob() {
        assert!(codec().decode_all("").is_empty());
        assert!(codec().decode_all("\u{2028}\n").is_empty());
    }
}
