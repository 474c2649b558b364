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

// A virtual directory tree over the stores a packaged app lives in. Each
// backing store only supplies the local single-level operations; walking a
// multi-segment path is done here, once, over the trait.
use shroud_common::*;
use std::io::{Read, Write};

pub mod fs_dir;
pub mod zip_dir;

pub use fs_dir::FsDirectory;
pub use zip_dir::ZipDirectory;

pub const PATH_SEPARATOR: char = '/';

/// The local capabilities a backing store supplies. Names handed to these
/// methods never contain a separator.
pub trait DirectoryStore {
    fn list_files(&self) -> Vec<String>;
    fn list_dirs(&self) -> Vec<String>;
    fn subdir(&self, name: &str) -> Option<&dyn DirectoryStore>;
    fn subdir_mut(&mut self, name: &str) -> Option<&mut dyn DirectoryStore>;
    fn create_local_dir(&mut self, name: &str) -> Result<&mut dyn DirectoryStore>;
    fn open_local_read(&self, name: &str) -> Result<Box<dyn Read + '_>>;
    fn open_local_write(&mut self, name: &str) -> Result<Box<dyn Write + '_>>;
    fn remove_local_file(&mut self, name: &str) -> bool;
}

/// A path split at its first separator: the leading directory segment, if
/// any, and the rest.
struct ParsedPath<'a> {
    dir: Option<&'a str>,
    subpath: &'a str
}

fn parse_path(path: &str) -> ParsedPath {
    match path.split_once(PATH_SEPARATOR) {
        Some((dir, subpath)) => ParsedPath {
            dir: Some(dir),
            subpath
        },
        None => ParsedPath {
            dir: None,
            subpath: path
        }
    }
}

pub fn contains_file(dir: &dyn DirectoryStore, path: &str) -> bool {
    let parsed = parse_path(path);
    match parsed.dir {
        Some(name) => match dir.subdir(name) {
            Some(sub) => contains_file(sub, parsed.subpath),
            None => false
        },
        None => dir.list_files().iter().any(|file| file == parsed.subpath)
    }
}

pub fn contains_dir(dir: &dyn DirectoryStore, path: &str) -> bool {
    let parsed = parse_path(path);
    match parsed.dir {
        Some(name) => match dir.subdir(name) {
            Some(sub) => contains_dir(sub, parsed.subpath),
            None => false
        },
        None => dir.subdir(parsed.subpath).is_some()
    }
}

pub fn open_file_read<'a>(dir: &'a dyn DirectoryStore, path: &str) -> Result<Box<dyn Read + 'a>> {
    let parsed = parse_path(path);
    match parsed.dir {
        Some(name) => {
            let sub = dir
                .subdir(name)
                .ok_or_else(|| ShroudError::PathNotExist(path.into()))?;
            open_file_read(sub, parsed.subpath)
        }
        None => dir.open_local_read(parsed.subpath)
    }
}

/// Opens a file for writing, creating intermediate directories as needed.
pub fn open_file_write<'a>(
    dir: &'a mut dyn DirectoryStore,
    path: &str
) -> Result<Box<dyn Write + 'a>> {
    let parsed = parse_path(path);
    match parsed.dir {
        Some(name) => {
            if dir.subdir(name).is_none() {
                dir.create_local_dir(name)?;
            }
            let sub = dir
                .subdir_mut(name)
                .ok_or_else(|| ShroudError::PathNotExist(path.into()))?;
            open_file_write(sub, parsed.subpath)
        }
        None => dir.open_local_write(parsed.subpath)
    }
}

/// Creates a directory at `path`, creating intermediate segments as needed.
/// Fails with [ShroudError::PathAlreadyExists] when the final segment is
/// already a directory.
pub fn create_dir<'a>(
    dir: &'a mut dyn DirectoryStore,
    path: &str
) -> Result<&'a mut dyn DirectoryStore> {
    let parsed = parse_path(path);
    match parsed.dir {
        Some(name) => {
            if dir.subdir(name).is_none() {
                dir.create_local_dir(name)?;
            }
            let sub = dir
                .subdir_mut(name)
                .ok_or_else(|| ShroudError::PathNotExist(path.into()))?;
            create_dir(sub, parsed.subpath)
        }
        None => dir.create_local_dir(parsed.subpath)
    }
}

/// Removes the file at `path`; returns whether anything was removed.
pub fn remove_file(dir: &mut dyn DirectoryStore, path: &str) -> bool {
    let parsed = parse_path(path);
    match parsed.dir {
        Some(name) => match dir.subdir_mut(name) {
            Some(sub) => remove_file(sub, parsed.subpath),
            None => false
        },
        None => dir.remove_local_file(parsed.subpath)
    }
}

/// All file paths under `dir`, separator-joined, subdirectories included.
pub fn list_files_recursive(dir: &dyn DirectoryStore) -> Vec<String> {
    let mut files = dir.list_files();
    for name in dir.list_dirs() {
        if let Some(sub) = dir.subdir(&name) {
            for path in list_files_recursive(sub) {
                files.push(format!("{name}{PATH_SEPARATOR}{path}"));
            }
        }
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn sample_tree() -> ZipDirectory {
        let mut root = ZipDirectory::new();
        open_file_write(&mut root, "AndroidManifest.xml")
            .unwrap()
            .write_all(b"<manifest/>")
            .unwrap();
        open_file_write(&mut root, "res/values/strings.xml")
            .unwrap()
            .write_all(b"<resources/>")
            .unwrap();
        open_file_write(&mut root, "res/drawable/icon.png")
            .unwrap()
            .write_all(b"PNG")
            .unwrap();
        root
    }

    #[test]
    fn walks_paths_structurally() {
        let root = sample_tree();
        assert!(contains_file(&root, "AndroidManifest.xml"));
        assert!(contains_file(&root, "res/values/strings.xml"));
        assert!(!contains_file(&root, "res/values/colors.xml"));
        assert!(!contains_file(&root, "missing/strings.xml"));
        assert!(contains_dir(&root, "res"));
        assert!(contains_dir(&root, "res/values"));
        assert!(!contains_dir(&root, "res/menu"));
    }

    #[test]
    fn reads_what_was_written() {
        let root = sample_tree();
        let mut contents = String::new();
        open_file_read(&root, "res/values/strings.xml")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "<resources/>");
    }

    #[test]
    fn missing_paths_are_errors_not_panics() {
        let root = sample_tree();
        assert!(matches!(
            open_file_read(&root, "res/values/missing.xml"),
            Err(ShroudError::PathNotExist(_))
        ));
        assert!(matches!(
            open_file_read(&root, "nowhere/at/all"),
            Err(ShroudError::PathNotExist(_))
        ));
    }

    #[test]
    fn create_dir_rejects_duplicates() {
        let mut root = sample_tree();
        create_dir(&mut root, "res/menu").unwrap();
        assert!(contains_dir(&root, "res/menu"));
        assert!(matches!(
            create_dir(&mut root, "res/menu"),
            Err(ShroudError::PathAlreadyExists(_))
        ));
    }

    #[test]
    fn remove_file_reports_what_it_did() {
        let mut root = sample_tree();
        assert!(remove_file(&mut root, "res/drawable/icon.png"));
        assert!(!contains_file(&root, "res/drawable/icon.png"));
        assert!(!remove_file(&mut root, "res/drawable/icon.png"));
    }

    #[test]
    fn recursive_listing_joins_with_the_separator() {
        let root = sample_tree();
        let mut files = list_files_recursive(&root);
        files.sort();
        assert_eq!(
            files,
            vec![
                "AndroidManifest.xml".to_string(),
                "res/drawable/icon.png".to_string(),
                "res/values/strings.xml".to_string()
            ]
        );
    }
}
