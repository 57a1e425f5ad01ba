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

use std::fs;
use std::fs::File;
use std::io::Read;
use std::num::NonZeroUsize;
use std::str::FromStr;

use jiff::Zoned;
use logfan::Append;
use logfan::Entry;
use logfan::Level;
use logfan::LogLocation;
use logfan::append::RollingFile;
use logfan::append::rolling_file::JsonFileStore;
use logfan::append::rolling_file::ManualClock;
use logfan::append::rolling_file::RollingFileBuilder;
use logfan::append::rolling_file::Sharing;
use logfan::codec::CodecConfig;
use logfan::codec::DateFormat;
use tempfile::TempDir;
use zip::ZipArchive;

fn files(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

fn start() -> ManualClock {
    ManualClock::new(Zoned::from_str("2024-08-10T09:30:00[UTC]").unwrap())
}

fn next_day(clock: &ManualClock) {
    clock.set_now(clock.now().tomorrow().unwrap());
}

fn builder(temp_dir: &TempDir, clock: &ManualClock, max_files: usize) -> RollingFileBuilder {
    RollingFile::builder()
        .container(temp_dir.path())
        .max_log_files(files(max_files))
        .clock(clock.clone())
        .blocking()
}

fn entry(body: &str) -> Entry {
    Entry::now(Level::Info, LogLocation::new("rolling_file.rs", "tests", 1), body)
}

#[test]
fn test_rotation_cycles_through_files() {
    let temp_dir = TempDir::new().unwrap();
    let clock = start();
    let rolling_file = builder(&temp_dir, &clock, 3).build().unwrap();

    let mut written = vec![];
    for day in 0..4 {
        rolling_file.append(&entry(&format!("day {day}"))).unwrap();
        written.push(
            rolling_file
                .current_log_file()
                .file_name()
                .unwrap()
                .to_string_lossy()
                .into_owned(),
        );
        next_day(&clock);
    }

    assert_eq!(written, ["0.log", "1.log", "2.log", "0.log"]);
    assert_eq!(rolling_file.log_files().unwrap().len(), 3);

    let bodies = rolling_file
        .entries(|_| true)
        .unwrap()
        .into_iter()
        .map(|entry| entry.body().to_string())
        .collect::<Vec<_>>();
    assert_eq!(bodies, ["day 3", "day 1", "day 2"]);
}

#[test]
fn test_same_day_appends_share_a_file() {
    let temp_dir = TempDir::new().unwrap();
    let clock = start();
    let rolling_file = builder(&temp_dir, &clock, 3).build().unwrap();

    rolling_file.append(&entry("morning")).unwrap();
    clock.set_now(Zoned::from_str("2024-08-10T23:59:59[UTC]").unwrap());
    rolling_file.append(&entry("midnight")).unwrap();

    assert_eq!(rolling_file.log_files().unwrap().len(), 1);
    assert_eq!(rolling_file.entries(|_| true).unwrap().len(), 2);
}

#[test]
fn test_resume_after_restart() {
    let temp_dir = TempDir::new().unwrap();
    let clock = start();

    {
        let rolling_file = builder(&temp_dir, &clock, 3).build().unwrap();
        rolling_file.append(&entry("day 0")).unwrap();
        next_day(&clock);
        rolling_file.append(&entry("day 1, before restart")).unwrap();
    }

    let rolling_file = builder(&temp_dir, &clock, 3).build().unwrap();
    assert_eq!(
        rolling_file.current_log_file(),
        rolling_file.log_dir().join("1.log")
    );
    rolling_file.append(&entry("day 1, after restart")).unwrap();

    let read = rolling_file.read_all(|_| true).unwrap();
    let bodies = read[&rolling_file.log_dir().join("1.log")]
        .iter()
        .map(Entry::body)
        .collect::<Vec<_>>();
    assert_eq!(bodies, ["day 1, before restart", "day 1, after restart"]);

    next_day(&clock);
    rolling_file.append(&entry("day 2")).unwrap();
    assert_eq!(
        rolling_file.current_log_file(),
        rolling_file.log_dir().join("2.log")
    );
}

#[test]
fn test_shrinking_file_count_wipes_history() {
    let temp_dir = TempDir::new().unwrap();
    let clock = start();

    {
        let rolling_file = builder(&temp_dir, &clock, 5).build().unwrap();
        for day in 0..3 {
            rolling_file.append(&entry(&format!("day {day}"))).unwrap();
            next_day(&clock);
        }
        assert_eq!(rolling_file.log_files().unwrap().len(), 3);
    }

    let rolling_file = builder(&temp_dir, &clock, 2).build().unwrap();
    assert!(rolling_file.log_files().unwrap().is_empty());
    assert_eq!(
        rolling_file.current_log_file(),
        rolling_file.log_dir().join("0.log")
    );

    rolling_file.append(&entry("fresh start")).unwrap();
    assert_eq!(
        rolling_file.log_files().unwrap(),
        vec![rolling_file.log_dir().join("0.log")]
    );
}

#[test]
fn test_growing_file_count_keeps_history() {
    let temp_dir = TempDir::new().unwrap();
    let clock = start();

    {
        let rolling_file = builder(&temp_dir, &clock, 2).build().unwrap();
        rolling_file.append(&entry("kept")).unwrap();
    }

    let rolling_file = builder(&temp_dir, &clock, 4).build().unwrap();
    assert_eq!(rolling_file.entries(|_| true).unwrap().len(), 1);
}

#[test]
fn test_state_is_persisted_as_json() {
    let temp_dir = TempDir::new().unwrap();
    let clock = start();
    let rolling_file = builder(&temp_dir, &clock, 3).build().unwrap();
    rolling_file.append(&entry("day 0")).unwrap();
    next_day(&clock);
    rolling_file.append(&entry("day 1")).unwrap();

    let path = temp_dir.path().join(JsonFileStore::DEFAULT_FILE_NAME);
    let state: serde_json::Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
    assert_eq!(state["logs-currentLogFileNumber"], 1);
    assert_eq!(state["logs-numberOfLogFiles"], 3);
    assert_eq!(state["logs-dateOfLastLog"], "2024-08-11T09:30:00Z");
}

#[test]
fn test_namespaces_are_isolated() {
    let temp_dir = TempDir::new().unwrap();
    let clock = start();
    let audit = builder(&temp_dir, &clock, 3)
        .namespace("audit")
        .build()
        .unwrap();
    let debug = builder(&temp_dir, &clock, 3)
        .namespace("debug")
        .build()
        .unwrap();

    audit.append(&entry("audit day 0")).unwrap();
    next_day(&clock);
    debug.append(&entry("debug day 1")).unwrap();

    assert_eq!(audit.log_dir(), temp_dir.path().join("audit"));
    assert_eq!(audit.entries(|_| true).unwrap()[0].body(), "audit day 0");
    assert_eq!(debug.entries(|_| true).unwrap()[0].body(), "debug day 1");
    assert_eq!(audit.current_log_file(), audit.log_dir().join("0.log"));
    // both states date from day 0, so the first write on day 1 moves debug to its next file
    assert_eq!(debug.current_log_file(), debug.log_dir().join("1.log"));
}

#[test]
fn test_shared_container_separates_apps() {
    let temp_dir = TempDir::new().unwrap();
    let clock = start();
    let shared = |app_name: &str| {
        RollingFile::builder()
            .sharing(Sharing::Shared {
                container: temp_dir.path().to_path_buf(),
                max_files: files(2),
                app_name: app_name.to_string(),
            })
            .clock(clock.clone())
            .blocking()
            .build()
            .unwrap()
    };
    let alpha = shared("alpha");
    let beta = shared("beta");

    alpha.append(&entry("from alpha")).unwrap();
    beta.append(&entry("from beta")).unwrap();

    assert_eq!(alpha.log_dir(), beta.log_dir());
    assert_eq!(
        alpha.log_files().unwrap(),
        vec![alpha.log_dir().join("alpha-0.log")]
    );
    assert_eq!(beta.entries(|_| true).unwrap()[0].body(), "from beta");

    alpha.delete_all_log_files().unwrap();
    assert!(alpha.log_files().unwrap().is_empty());
    assert_eq!(beta.log_files().unwrap().len(), 1);
}

#[test]
fn test_multi_line_body_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let clock = start();
    let rolling_file = builder(&temp_dir, &clock, 3).build().unwrap();

    let body = "first line\nsecond line: with [brackets] and {braces}\nthird // line";
    let entries = vec![
        entry("before"),
        Entry::now(
            Level::custom("AUDIT"),
            LogLocation::new("Service.swift", "handle(request:)", 512),
            body,
        ),
        entry("after"),
    ];
    for entry in &entries {
        rolling_file.append(entry).unwrap();
    }

    assert_eq!(rolling_file.entries(|_| true).unwrap(), entries);
    let audits = rolling_file
        .entries(|entry| entry.level() == &Level::custom("AUDIT"))
        .unwrap();
    assert_eq!(audits.len(), 1);
    assert_eq!(audits[0].body(), body);
}

#[test]
fn test_custom_codec_and_separator() {
    let temp_dir = TempDir::new().unwrap();
    let clock = start();
    let rolling_file = builder(&temp_dir, &clock, 3)
        .codec_config(CodecConfig::bracketed().date_format(DateFormat::utc()))
        .line_separator("\n")
        .build()
        .unwrap();

    let entries = vec![entry("one"), entry("two\nthree")];
    for entry in &entries {
        rolling_file.append(entry).unwrap();
    }

    let raw = rolling_file.read_all_raw().unwrap();
    let content = &raw[&rolling_file.current_log_file()];
    assert!(content.starts_with("|> [info "));
    assert!(content.ends_with("three\n"));
    assert_eq!(rolling_file.entries(|_| true).unwrap(), entries);
}

#[test]
fn test_archive_contains_every_log_file() {
    let temp_dir = TempDir::new().unwrap();
    let clock = start();
    let rolling_file = builder(&temp_dir, &clock, 3).build().unwrap();

    rolling_file.append(&entry("day 0")).unwrap();
    next_day(&clock);
    rolling_file.append(&entry("day 1")).unwrap();

    let path = rolling_file.archive(Some("export.zip")).unwrap();
    assert_eq!(path, temp_dir.path().join("export.zip"));

    let raw = rolling_file.read_all_raw().unwrap();
    let mut archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
    assert_eq!(archive.len(), raw.len());
    for (file, content) in raw {
        let name = file.file_name().unwrap().to_str().unwrap();
        let mut archived = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut archived)
            .unwrap();
        assert_eq!(archived, content);
    }

    let path = rolling_file.archive(None).unwrap();
    assert_eq!(path, temp_dir.path().join("log_files_archive.zip"));
}
