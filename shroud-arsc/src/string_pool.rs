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

use crate::chunk_types::{CHUNK_STRINGPOOL_TYPE, STRING_POOL_UTF8_FLAG};
use crate::data_io::DataInput;
use crate::encoding::{decode_utf16_entry, decode_utf8_entry, read_u16};
use shroud_common::*;
use std::io::Read;

/// In-memory model of a parsed string pool chunk.
///
/// Built by [StringPool::read] and read-only afterwards; the rewrite
/// operations in [pool_rewrite](crate::pool_rewrite) always emit a fresh
/// pool instead of mutating one.
#[derive(Debug)]
pub struct StringPool {
    pub(crate) is_utf8: bool,
    pub(crate) flags: u32,
    pub(crate) string_offsets: Vec<u32>,
    pub(crate) strings: Vec<u8>,
    pub(crate) style_offsets: Vec<u32>,
    pub(crate) styles: Option<Vec<u32>>
}

impl StringPool {
    /// Reads a whole string pool (including the chunk type word) from the
    /// stream. The stream must be positioned at the chunk type.
    pub fn read<R: Read>(input: &mut DataInput<R>) -> Result<StringPool> {
        input.skip_check_chunk_type(CHUNK_STRINGPOOL_TYPE, true)?;
        let chunk_size = input.read_u32()?;
        let string_count = input.read_u32()?;
        let style_count = input.read_u32()?;
        let flags = input.read_u32()?;
        let strings_offset = input.read_u32()?;
        let styles_offset = input.read_u32()?;
        read_pool_body(
            input,
            chunk_size,
            string_count,
            style_count,
            flags,
            strings_offset,
            styles_offset
        )
    }

    /// Number of strings in the pool.
    pub fn count(&self) -> usize {
        self.string_offsets.len()
    }

    /// Number of style runs in the pool; 0 for the common unstyled case.
    pub fn style_count(&self) -> usize {
        self.style_offsets.len()
    }

    pub fn is_utf8(&self) -> bool {
        self.is_utf8
    }

    /// The raw header flag word, re-emitted verbatim by the rewrites.
    pub fn flags(&self) -> u32 {
        self.flags
    }

    /// Byte offset of entry `index`'s length prefix, relative to the start
    /// of the string data.
    pub fn raw_offset(&self, index: usize) -> u32 {
        self.string_offsets[index]
    }

    /// Returns the decoded string at `index`, or `None` when the index is
    /// out of range or the entry doesn't decode cleanly.
    pub fn get(&self, index: usize) -> Option<String> {
        let offset = *self.string_offsets.get(index)? as usize;
        let decoded = self.decode_at(offset);
        if decoded.is_none() {
            eprintln!("Warning: string pool entry {index} doesn't decode, treating it as absent");
        }
        decoded
    }

    /// Finds the index of the given string by linear scan, comparing code
    /// unit by code unit against each entry's declared length.
    ///
    /// Only UTF-16 pools are searchable; UTF-8 pools always return `None`.
    pub fn find(&self, string: &str) -> Option<usize> {
        if self.is_utf8 {
            return None;
        }
        let target: Vec<u16> = string.encode_utf16().collect();
        'entries: for (index, &raw) in self.string_offsets.iter().enumerate() {
            let offset = raw as usize;
            let length = match read_u16(&self.strings, offset) {
                Some(value) => value as usize,
                None => continue
            };
            if length != target.len() {
                continue;
            }
            for (position, &unit) in target.iter().enumerate() {
                match read_u16(&self.strings, offset + 2 + 2 * position) {
                    Some(value) if value == unit => {}
                    _ => continue 'entries
                }
            }
            return Some(index);
        }
        None
    }

    fn decode_at(&self, offset: usize) -> Option<String> {
        if self.is_utf8 {
            let (data_offset, byte_len) = decode_utf8_entry(&self.strings, offset)?;
            let bytes = self.strings.get(data_offset..data_offset + byte_len)?;
            std::str::from_utf8(bytes).map(str::to_string).ok()
        } else {
            let (data_offset, byte_len) = decode_utf16_entry(&self.strings, offset)?;
            let bytes = self.strings.get(data_offset..data_offset + byte_len)?;
            let units: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16(&units).ok()
        }
    }
}

/// Reads everything after the seven header words: the offset tables, the
/// string data and the optional style trailer.
pub(crate) fn read_pool_body<R: Read>(
    input: &mut DataInput<R>,
    chunk_size: u32,
    string_count: u32,
    style_count: u32,
    flags: u32,
    strings_offset: u32,
    styles_offset: u32
) -> Result<StringPool> {
    let string_offsets = input.read_u32_array(string_count as usize)?;
    let style_offsets = if style_count != 0 {
        input.read_u32_array(style_count as usize)?
    } else {
        vec![]
    };

    let data_end = if styles_offset == 0 { chunk_size } else { styles_offset };
    let data_size = data_end.checked_sub(strings_offset).ok_or_else(|| {
        ShroudError::CorruptStringPool(format!(
            "string data ends at {data_end} but starts at {strings_offset}"
        ))
    })?;
    if data_size % 4 != 0 {
        return Err(ShroudError::StringDataMisaligned(data_size));
    }
    let mut strings = vec![0; data_size as usize];
    input.read_exact(&mut strings)?;

    let styles = if styles_offset != 0 {
        let style_size = chunk_size.checked_sub(styles_offset).ok_or_else(|| {
            ShroudError::CorruptStringPool(format!(
                "style data starts at {styles_offset} past the chunk end {chunk_size}"
            ))
        })?;
        if style_size % 4 != 0 {
            return Err(ShroudError::StyleDataMisaligned(style_size));
        }
        Some(input.read_u32_array((style_size / 4) as usize)?)
    } else {
        None
    };

    Ok(StringPool {
        is_utf8: flags & STRING_POOL_UTF8_FLAG != 0,
        flags,
        string_offsets,
        strings,
        style_offsets,
        styles
    })
}
