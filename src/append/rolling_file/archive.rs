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

use std::fs::File;
use std::io::Write;
use std::path::Path;

use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::Error;
use crate::ErrorKind;

/// The archive name used when the caller does not pick one.
pub const DEFAULT_ARCHIVE_NAME: &str = "log_files_archive.zip";

/// One file captured for archiving.
#[derive(Debug)]
pub(crate) struct Snapshot {
    pub(crate) name: String,
    pub(crate) content: String,
}

/// Compress `files` into a zip at `path`, replacing any previous archive.
pub(crate) fn write_zip(path: &Path, files: &[Snapshot]) -> Result<(), Error> {
    if files.is_empty() {
        return Err(Error::with_kind(
            ErrorKind::NotFound,
            "no log files to archive",
        ));
    }

    let failed = |err: zip::result::ZipError| {
        Error::new("failed to write log archive")
            .with_context("path", path.display())
            .with_source(err)
    };

    let file = File::create(path)
        .map_err(|err| Error::from_io_error(err).with_context("path", path.display()))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for snapshot in files {
        zip.start_file(snapshot.name.as_str(), options).map_err(failed)?;
        zip.write_all(snapshot.content.as_bytes())
            .map_err(|err| Error::from_io_error(err).with_context("path", path.display()))?;
    }
    zip.finish().map_err(failed)?;
    Ok(())
}
