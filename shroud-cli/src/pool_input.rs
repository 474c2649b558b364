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

use shroud_api::{Result, ShroudError};
use shroud_dir::{open_file_read, ZipDirectory};
use std::collections::HashMap;
use std::fs;
use std::io::Read;

const TABLE_CHUNK_ID: u16 = 0x0002;

/// Loads the bytes of a string pool chunk, either straight from a file or
/// from `zip_inner` within a zip archive at `path`.
pub fn load_pool_bytes(path: &str, zip_inner: Option<&str>) -> Result<Vec<u8>> {
    let bytes = match zip_inner {
        Some(inner) => {
            let archive = fs::read(path)?;
            let dir = ZipDirectory::from_zip_bytes(&archive)?;
            let mut contents = vec![];
            open_file_read(&dir, inner)?.read_to_end(&mut contents)?;
            contents
        }
        None => fs::read(path)?
    };
    Ok(strip_table_header(bytes))
}

// A whole resources.arsc starts with a table chunk whose header sits
// immediately before the value string pool; position past it when present
fn strip_table_header(bytes: Vec<u8>) -> Vec<u8> {
    if bytes.len() >= 12 && u16::from_le_bytes([bytes[0], bytes[1]]) == TABLE_CHUNK_ID {
        let header_size = u16::from_le_bytes([bytes[2], bytes[3]]) as usize;
        if header_size <= bytes.len() {
            return bytes[header_size..].to_vec();
        }
    }
    bytes
}

/// Parses a rename plan of `index=new_name` lines. Blank lines and lines
/// starting with `#` are skipped.
pub fn parse_rename_map(plan: &str) -> Result<HashMap<usize, String>> {
    let mut renames = HashMap::new();
    for (number, line) in plan.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (index, name) = line.split_once('=').ok_or_else(|| {
            ShroudError::Cli(format!("Line {} is not index=new_name: {line:?}", number + 1))
        })?;
        let index = index.trim().parse::<usize>().map_err(|_| {
            ShroudError::Cli(format!("Line {} has a non-numeric index: {line:?}", number + 1))
        })?;
        renames.insert(index, name.trim().to_string());
    }
    Ok(renames)
}
