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

use crate::DirectoryStore;
use shroud_common::*;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::PathBuf;

/// A filesystem directory, scanned eagerly at construction.
#[derive(Debug)]
pub struct FsDirectory {
    root: PathBuf,
    files: Vec<String>,
    dirs: BTreeMap<String, FsDirectory>
}

impl FsDirectory {
    /// Scans `root` and everything below it.
    pub fn open(root: impl Into<PathBuf>) -> Result<FsDirectory> {
        let root = root.into();
        let mut files = vec![];
        let mut dirs = BTreeMap::new();
        for entry in fs::read_dir(&root)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if entry.file_type()?.is_dir() {
                dirs.insert(name, FsDirectory::open(entry.path())?);
            } else {
                files.push(name);
            }
        }
        files.sort();
        Ok(FsDirectory { root, files, dirs })
    }
}

impl DirectoryStore for FsDirectory {
    fn list_files(&self) -> Vec<String> {
        self.files.clone()
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
        let path = self.root.join(name);
        fs::create_dir_all(&path)?;
        self.dirs.insert(
            name.to_string(),
            FsDirectory {
                root: path,
                files: vec![],
                dirs: BTreeMap::new()
            }
        );
        Ok(self.dirs.get_mut(name).unwrap())
    }

    fn open_local_read(&self, name: &str) -> Result<Box<dyn Read + '_>> {
        if !self.files.iter().any(|file| file == name) {
            return Err(ShroudError::PathNotExist(name.into()));
        }
        Ok(Box::new(File::open(self.root.join(name))?))
    }

    fn open_local_write(&mut self, name: &str) -> Result<Box<dyn Write + '_>> {
        let file = File::create(self.root.join(name))?;
        if !self.files.iter().any(|existing| existing == name) {
            self.files.push(name.to_string());
        }
        Ok(Box::new(file))
    }

    fn remove_local_file(&mut self, name: &str) -> bool {
        if !self.files.iter().any(|file| file == name) {
            return false;
        }
        let _ = fs::remove_file(self.root.join(name));
        self.files.retain(|file| file != name);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{contains_dir, contains_file, open_file_read, open_file_write, remove_file};
    use std::env;

    struct TempTree(PathBuf);

    impl TempTree {
        fn new(tag: &str) -> TempTree {
            let path = env::temp_dir().join(format!("shroud-fs-{tag}-{}", std::process::id()));
            let _ = fs::remove_dir_all(&path);
            fs::create_dir_all(path.join("res/values")).unwrap();
            fs::write(path.join("AndroidManifest.xml"), b"<manifest/>").unwrap();
            fs::write(path.join("res/values/strings.xml"), b"<resources/>").unwrap();
            TempTree(path)
        }
    }

    impl Drop for TempTree {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn scans_and_walks_a_real_tree() {
        let tree = TempTree::new("scan");
        let root = FsDirectory::open(&tree.0).unwrap();
        assert!(contains_file(&root, "AndroidManifest.xml"));
        assert!(contains_file(&root, "res/values/strings.xml"));
        assert!(contains_dir(&root, "res/values"));
        assert!(!contains_file(&root, "res/values/colors.xml"));

        let mut contents = String::new();
        open_file_read(&root, "res/values/strings.xml")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "<resources/>");
    }

    #[test]
    fn writes_and_removes_through_the_tree() {
        let tree = TempTree::new("write");
        let mut root = FsDirectory::open(&tree.0).unwrap();

        open_file_write(&mut root, "res/values/colors.xml")
            .unwrap()
            .write_all(b"<resources><color/></resources>")
            .unwrap();
        assert!(contains_file(&root, "res/values/colors.xml"));
        assert!(tree.0.join("res/values/colors.xml").exists());

        assert!(remove_file(&mut root, "res/values/colors.xml"));
        assert!(!contains_file(&root, "res/values/colors.xml"));
        assert!(!tree.0.join("res/values/colors.xml").exists());
    }

    #[test]
    fn write_creates_missing_directories() {
        let tree = TempTree::new("mkdirs");
        let mut root = FsDirectory::open(&tree.0).unwrap();
        open_file_write(&mut root, "res/menu/main.xml")
            .unwrap()
            .write_all(b"<menu/>")
            .unwrap();
        assert!(contains_dir(&root, "res/menu"));
        assert!(tree.0.join("res/menu/main.xml").exists());
    }
}
