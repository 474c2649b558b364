// Copyright 2024 Google LLC
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

use std::{io, rc::Rc};

use deku::prelude::*;
use zip::result::ZipError;

/// Common error type making it easier to share `Result`s between SHROUD
/// crates.
///
/// In general designed to avoid needing utilities like `map_err`.
#[derive(Debug, Clone)]
pub enum ShroudError {
    /// shroud-cli encountered an error while processing something specific to
    /// the command line implementation. For example, not enough arguments
    /// were passed via the shell.
    Cli(String),
    /// A chunk that was expected to be a string pool started with some other
    /// chunk type word. Carries the word that was actually read.
    InvalidChunkType(u32),
    /// The string data section of a pool is required to end on a 32-bit
    /// boundary, and this pool's didn't. Carries the offending size.
    StringDataMisaligned(u32),
    /// The style data trailer of a pool is required to end on a 32-bit
    /// boundary, and this pool's didn't. Carries the offending size.
    StyleDataMisaligned(u32),
    /// A spec-name pool was asked to be rewritten but the input carried
    /// style runs. Spec-name pools never hold styles, so the rename plan
    /// cannot be applied safely. Carries the input's style count.
    SpecPoolHasStyles(u32),
    /// Rewritten names are emitted with the short-form length prefix, which
    /// caps them at `0x7F` characters (UTF-8 pools) or `0x7FFF` code units
    /// (UTF-16 pools).
    NameTooLong(String),
    /// A rewritten name's character count didn't match its encoded width.
    /// UTF-8 pools only accept ASCII names; UTF-16 pools only accept names
    /// without surrogate pairs.
    NameNotEncodable(String),
    /// A pool's header-declared sizes or offsets don't describe its actual
    /// contents (offset past the end of string data, chunk smaller than its
    /// own header, and similar).
    CorruptStringPool(String),
    /// When the codec was trying to serialise a chunk struct similar to
    /// AAPT, something went wrong. See [DekuError].
    ByteSerialisationFailed(DekuError),
    /// A path handed to the virtual directory doesn't exist in the backing
    /// store.
    PathNotExist(String),
    /// A directory was asked to be created at a path that already holds one.
    PathAlreadyExists(String),
    /// An error occurred while reading or writing a file. Carries the
    /// underlying [io::Error].
    FileIoError(Rc<io::Error>),
    /// `shroud-dir` failed to read or re-emit a zip archive.
    ZipFailed(Rc<ZipError>)
}

/// Result type where the error is always [ShroudError].
pub type Result<T> = std::result::Result<T, ShroudError>;

// Automatic conversion from other types of error to ShroudError makes the
// rest of the code cleaner
impl From<io::Error> for ShroudError {
    fn from(value: io::Error) -> Self {
        ShroudError::FileIoError(value.into())
    }
}

impl From<DekuError> for ShroudError {
    fn from(value: DekuError) -> Self {
        ShroudError::ByteSerialisationFailed(value)
    }
}

impl From<ZipError> for ShroudError {
    fn from(value: ZipError) -> Self {
        ShroudError::ZipFailed(value.into())
    }
}
