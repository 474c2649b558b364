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

//! # SHROUD API
//!
//! This crate exposes the main public API through which other projects can
//! use SHROUD's string pool inspection and rewriting features. Every
//! operation is buffer-in/buffer-out; positioning a reader inside a larger
//! `resources.arsc` stream is the caller's job.
//!
//! ## Listing a pool
//!
//! ```ignore
//! let names = list_pool_strings(&pool_bytes)?;
//! for (index, name) in names.iter().enumerate() {
//!     println!("{index}: {name}");
//! }
//! ```
//!
//! ## Renaming value pool entries
//!
//! The rename plan maps original entry indices to their obfuscated names;
//! entries absent from the plan are copied byte-verbatim, styles included.
//!
//! ```ignore
//! let renames = HashMap::from([(7, "a".to_string()), (12, "b".to_string())]);
//! let rewritten = rewrite_table_name_pool(&pool_bytes, &renames)?;
//! ```

use std::collections::HashMap;
use std::io::Cursor;

use indexmap::IndexSet;
use shroud_arsc::data_io::{DataInput, DataOutput};
use shroud_arsc::pool_rewrite;

pub use shroud_arsc::string_pool::StringPool;
pub use shroud_common::{Result, ShroudError};

/// Parses a string pool chunk and decodes every entry in index order.
///
/// Entries that don't decode cleanly come back as empty strings so that
/// indices keep lining up with the pool's offset table.
pub fn list_pool_strings(pool_bytes: &[u8]) -> Result<Vec<String>> {
    let pool = StringPool::read(&mut DataInput::new(Cursor::new(pool_bytes)))?;
    Ok((0..pool.count())
        .map(|index| pool.get(index).unwrap_or_default())
        .collect())
}

/// Parses a string pool chunk into its in-memory model.
pub fn read_pool(pool_bytes: &[u8]) -> Result<StringPool> {
    StringPool::read(&mut DataInput::new(Cursor::new(pool_bytes)))
}

/// Copies an unmodified pool through the codec, validating its chunk type
/// and size words on the way.
pub fn copy_pool(pool_bytes: &[u8]) -> Result<Vec<u8>> {
    let mut input = DataInput::new(Cursor::new(pool_bytes));
    let mut output = DataOutput::new(vec![]);
    pool_rewrite::write_all(&mut input, &mut output)?;
    Ok(output.into_inner())
}

/// Replaces a spec-name pool's whole string table with `names`, in
/// iteration order.
///
/// Returns the rewritten chunk together with the index each name was
/// assigned; the enclosing tool uses that map to relink references.
pub fn rewrite_spec_name_pool(
    pool_bytes: &[u8],
    names: &IndexSet<String>
) -> Result<(Vec<u8>, HashMap<String, usize>)> {
    let mut input = DataInput::new(Cursor::new(pool_bytes));
    let mut output = DataOutput::new(vec![]);
    let (_, positions) = pool_rewrite::rewrite_spec_names(&mut input, &mut output, names)?;
    Ok((output.into_inner(), positions))
}

/// Substitutes the value pool entries named by `renames` (original index →
/// new name) and copies everything else, style runs included.
pub fn rewrite_table_name_pool(
    pool_bytes: &[u8],
    renames: &HashMap<usize, String>
) -> Result<Vec<u8>> {
    let mut input = DataInput::new(Cursor::new(pool_bytes));
    let mut output = DataOutput::new(vec![]);
    pool_rewrite::rewrite_table_names(&mut input, &mut output, renames)?;
    Ok(output.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shroud_arsc::chunk_types::{CHUNK_STRINGPOOL_TYPE, STRING_POOL_UTF8_FLAG};

    /// UTF-8 pool holding "name" and "icon".
    fn sample_pool() -> Vec<u8> {
        let mut bytes = vec![];
        // each entry is 2 + 4 + 1 = 7 bytes, 14 total, 2 pad
        let words = [CHUNK_STRINGPOOL_TYPE, 52, 2, 0, STRING_POOL_UTF8_FLAG, 36, 0, 0, 7];
        for word in words {
            bytes.extend_from_slice(&word.to_le_bytes());
        }
        for name in ["name", "icon"] {
            bytes.push(4);
            bytes.push(4);
            bytes.extend_from_slice(name.as_bytes());
            bytes.push(0);
        }
        bytes.extend_from_slice(&[0, 0]);
        bytes
    }

    #[test]
    fn lists_entries_in_index_order() {
        assert_eq!(
            list_pool_strings(&sample_pool()).unwrap(),
            vec!["name".to_string(), "icon".to_string()]
        );
    }

    #[test]
    fn copy_is_byte_identical() {
        assert_eq!(copy_pool(&sample_pool()).unwrap(), sample_pool());
    }

    #[test]
    fn spec_rewrite_reports_assignments() {
        let names: IndexSet<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let (rewritten, positions) = rewrite_spec_name_pool(&sample_pool(), &names).unwrap();
        assert_eq!(
            list_pool_strings(&rewritten).unwrap(),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
        assert_eq!(positions["c"], 2);
    }

    #[test]
    fn table_rewrite_substitutes_in_place() {
        let renames = HashMap::from([(0, "n".to_string())]);
        let rewritten = rewrite_table_name_pool(&sample_pool(), &renames).unwrap();
        assert_eq!(
            list_pool_strings(&rewritten).unwrap(),
            vec!["n".to_string(), "icon".to_string()]
        );
    }
}
