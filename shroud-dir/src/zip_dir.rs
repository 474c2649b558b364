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

use crate::{DirectoryStore, PATH_SEPARATOR};
use shroud_common::*;
use std::collections::BTreeMap;
use std::io::{Cursor, Read, Seek, Write};
use zip::{write::SimpleFileOptions, CompressionMethod, ZipArchive, ZipWriter};

// Some files in APKs are not allowed to be compressed
const UNCOMPRESSED_FILES: &[&str] = &["resources.arsc"];

/// A zip archive held fully in memory as a directory tree.
///
/// The whole archive is read up front at construction; there is no lazy
/// entry loading hiding I/O behind accessors.
#[derive(Debug, Default)]
pub struct ZipDirectory {
    files: BTreeMap<String, Vec<u8>>,
    dirs: BTreeMap<String, ZipDirectory>
}

impl ZipDirectory {
    pub fn new() -> ZipDirectory {
        ZipDirectory::default()
    }

    /// Loads a whole zip archive into a directory tree.
    pub fn from_zip_bytes(bytes: &[u8]) -> Result<ZipDirectory> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut root = ZipDirectory::new();
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            let name = entry.name().to_string();
            if entry.is_dir() {
                root.ensure_dir(name.trim_end_matches(PATH_SEPARATOR));
                continue;
            }
            let mut contents = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut contents)?;
            root.insert_file(&name, contents);
        }
        Ok(root)
    }

    /// Re-emits the tree as a zip archive with APK conventions: deflate for
    /// most entries, 4-byte alignment, `resources.arsc` stored uncompressed.
    ///
    /// Output can be a file *or* a buffer in memory.
    pub fn write_zip<T: Write + Seek>(&self, output: T) -> Result<()> {
        let mut zip = ZipWriter::new(output);
        let compressed_options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .with_alignment(4);
        let uncompressed_options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .with_alignment(4);

        for (path, data) in self.all_files() {
            let options = if UNCOMPRESSED_FILES.contains(&&path[..]) {
                uncompressed_options
            } else {
                compressed_options
            };
            zip.start_file_from_path(&path, options)?;
            zip.write_all(&data)?;
        }

        zip.finish()?;
        Ok(())
    }

    fn all_files(&self) -> Vec<(String, Vec<u8>)> {
        let mut entries: Vec<(String, Vec<u8>)> = self
            .files
            .iter()
            .map(|(name, data)| (name.clone(), data.clone()))
            .collect();
        for (name, dir) in &self.dirs {
            for (path, data) in dir.all_files() {
                entries.push((format!("{name}{PATH_SEPARATOR}{path}"), data));
            }
        }
        entries
    }

    fn insert_file(&mut self, path: &str, contents: Vec<u8>) {
        match path.split_once(PATH_SEPARATOR) {
            None => {
                self.files.insert(path.to_string(), contents);
            }
            Some((dir, rest)) => self
                .dirs
                .entry(dir.to_string())
                .or_default()
                .insert_file(rest, contents)
        }
    }

    fn ensure_dir(&mut self, path: &str) {
        if path.is_empty() {
            return;
        }
        match path.split_once(PATH_SEPARATOR) {
            None => {
                self.dirs.entry(path.to_string()).or_default();
            }
            Some((dir, rest)) => self
                .dirs
                .entry(dir.to_string())
                .or_default()
                .ensure_dir(rest)
        }
    }
}

impl DirectoryStore for ZipDirectory {
    fn list_files(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }

    fn list_dirs(&self) -> Vec<String> {
        self.dirs.keys().cloned().collect()
    }

    fn subdir(&self, name: &str) -> Option<&dyn DirectoryStore> {
        self.dirs.get(name).map(|dir| dir as &dyn DirectoryStore)
    }

    fn subdir_mut(&mut self, name: &str) -> Option<&mut dyn DirectoryStore> {
        self.dirs
            .get_mut(name)
            .map(|dir| dir as &mut dyn DirectoryStore)
    }

    fn create_local_dir(&mut self, name: &str) -> Result<&mut dyn DirectoryStore> {
        if self.dirs.contains_key(name) {
            return Err(ShroudError::PathAlreadyExists(name.into()));
        }
        Ok(self.dirs.entry(name.to_string()).or_default())
    }

    fn open_local_read(&self, name: &str) -> Result<Box<dyn Read + '_>> {
        let contents = self
            .files
            .get(name)
            .ok_or_else(|| ShroudError::PathNotExist(name.into()))?;
        Ok(Box::new(Cursor::new(contents.as_slice())))
    }

    fn open_local_write(&mut self, name: &str) -> Result<Box<dyn Write + '_>> {
        let buffer = self.files.entry(name.to_string()).or_default();
        buffer.clear();
        Ok(Box::new(buffer))
    }

    fn remove_local_file(&mut self, name: &str) -> bool {
        self.files.remove(name).is_some()
    }
}
