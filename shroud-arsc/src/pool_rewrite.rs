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

// The three top-level operations over a reader/writer pair: verbatim copy,
// whole-pool replacement for spec-name pools, and selective substitution
// for the table's value pool. Each one consumes exactly one chunk from the
// reader and emits exactly one chunk to the writer.
use crate::chunk_types::{CHUNK_STRINGPOOL_TYPE, STRING_POOL_UTF8_FLAG};
use crate::data_io::{DataInput, DataOutput};
use crate::encoding::{encode_utf16_entry, encode_utf8_entry};
use crate::generate_pool_chunk;
use crate::string_pool::read_pool_body;
use deku::DekuContainerWrite;
use indexmap::IndexSet;
use shroud_common::*;
use std::collections::HashMap;
use std::io::{Read, Write};

/// Copies a whole unmodified pool, chunk type word included, from reader to
/// writer. The reader must be positioned at the chunk type.
pub fn write_all<R: Read, W: Write>(
    input: &mut DataInput<R>,
    output: &mut DataOutput<W>
) -> Result<()> {
    output.write_check_chunk_type(input, CHUNK_STRINGPOOL_TYPE, true)?;
    let chunk_size = input.read_u32()?;
    output.write_u32(chunk_size)?;
    let remaining = chunk_size.checked_sub(8).ok_or_else(|| {
        ShroudError::CorruptStringPool(format!(
            "chunk size {chunk_size} is smaller than its own type and size words"
        ))
    })?;
    output.copy_bytes(input, remaining as u64)
}

/// Replaces a spec-name pool's whole string table with `spec_names`, in
/// iteration order.
///
/// The original entries are discarded; spec-name pools carry resource
/// type/attribute names that the rename plan regenerates wholesale. Inputs
/// carrying styles are refused. Returns the byte difference between the
/// original and emitted chunk (for the caller to fix up the enclosing
/// chunk's size) together with the index each name ended up at.
pub fn rewrite_spec_names<R: Read, W: Write>(
    input: &mut DataInput<R>,
    output: &mut DataOutput<W>,
    spec_names: &IndexSet<String>
) -> Result<(i32, HashMap<String, usize>)> {
    input.skip_check_chunk_type(CHUNK_STRINGPOOL_TYPE, false)?;
    let chunk_size = input.read_u32()?;
    let string_count = input.read_u32()?;
    let style_count = input.read_u32()?;
    if style_count != 0 {
        return Err(ShroudError::SpecPoolHasStyles(style_count));
    }
    let flags = input.read_u32()?;
    let strings_offset = input.read_u32()?;
    let styles_offset = input.read_u32()?;
    let is_utf8 = flags & STRING_POOL_UTF8_FLAG != 0;

    // The original offset table and entries are dead weight here, the pool
    // is rebuilt from scratch below
    input.skip(4 * string_count as u64)?;
    let data_end = if styles_offset == 0 { chunk_size } else { styles_offset };
    let data_size = data_end.checked_sub(strings_offset).ok_or_else(|| {
        ShroudError::CorruptStringPool(format!(
            "string data ends at {data_end} but starts at {strings_offset}"
        ))
    })?;
    if data_size % 4 != 0 {
        return Err(ShroudError::StringDataMisaligned(data_size));
    }
    input.skip(data_size as u64)?;

    let mut string_indicies = Vec::with_capacity(spec_names.len());
    let mut string_data = vec![];
    let mut name_positions = HashMap::with_capacity(spec_names.len());
    for (position, name) in spec_names.iter().enumerate() {
        string_indicies.push(string_data.len() as u32);
        if is_utf8 {
            encode_utf8_entry(&mut string_data, name)?;
        } else {
            encode_utf16_entry(&mut string_data, name)?;
        }
        name_positions.insert(name.clone(), position);
    }
    pad_to_word_boundary(&mut string_data);

    let chunk = generate_pool_chunk(flags, string_indicies, string_data, None)?;
    let total_size = chunk.header.chunk_size;
    output.write_bytes(&chunk.to_bytes()?)?;
    Ok((chunk_size as i32 - total_size as i32, name_positions))
}

/// Substitutes the entries named by `renames` (original index → new name)
/// and copies every other entry byte-verbatim. Style offsets and style data
/// ride along unchanged, with the style start offset recomputed for the new
/// string data length.
///
/// Returns the byte difference between the original and emitted chunk.
pub fn rewrite_table_names<R: Read, W: Write>(
    input: &mut DataInput<R>,
    output: &mut DataOutput<W>,
    renames: &HashMap<usize, String>
) -> Result<i32> {
    input.skip_check_chunk_type(CHUNK_STRINGPOOL_TYPE, false)?;
    let chunk_size = input.read_u32()?;
    let string_count = input.read_u32()?;
    let style_count = input.read_u32()?;
    let flags = input.read_u32()?;
    let strings_offset = input.read_u32()?;
    let styles_offset = input.read_u32()?;
    let pool = read_pool_body(
        input,
        chunk_size,
        string_count,
        style_count,
        flags,
        strings_offset,
        styles_offset
    )?;

    let mut string_indicies = Vec::with_capacity(pool.count());
    let mut string_data = Vec::with_capacity(pool.strings.len());
    for index in 0..pool.count() {
        string_indicies.push(string_data.len() as u32);
        match renames.get(&index) {
            None => {
                // The entry's byte length runs to the next entry's offset,
                // or to the end of the string data for the last one
                let start = pool.string_offsets[index] as usize;
                let end = if index == pool.count() - 1 {
                    pool.strings.len()
                } else {
                    pool.string_offsets[index + 1] as usize
                };
                let entry = pool.strings.get(start..end).ok_or_else(|| {
                    ShroudError::CorruptStringPool(format!(
                        "entry {index} spans {start}..{end} but the string data holds {} bytes",
                        pool.strings.len()
                    ))
                })?;
                string_data.extend_from_slice(entry);
            }
            Some(name) => {
                if pool.is_utf8 {
                    encode_utf8_entry(&mut string_data, name)?;
                } else {
                    encode_utf16_entry(&mut string_data, name)?;
                }
            }
        }
    }
    pad_to_word_boundary(&mut string_data);

    let styles = if styles_offset != 0 {
        Some((
            pool.style_offsets.clone(),
            pool.styles.clone().unwrap_or_default()
        ))
    } else {
        None
    };
    let chunk = generate_pool_chunk(flags, string_indicies, string_data, styles)?;
    let total_size = chunk.header.chunk_size;
    output.write_bytes(&chunk.to_bytes()?)?;
    Ok(chunk_size as i32 - total_size as i32)
}

// String data is a u8 array, but AAPT requires all chunks to fall on 32-bit
// boundaries, so it gets zero-padded out to an even 4 bytes
fn pad_to_word_boundary(string_data: &mut Vec<u8>) {
    if string_data.len() % 4 != 0 {
        let padding = 4 - string_data.len() % 4;
        string_data.resize(string_data.len() + padding, 0);
    }
}
