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

use chunk_types::{
    ChunkType, ResChunkHeader, StringPoolChunk, StringPoolHeader, STRING_POOL_HEADER_SIZE
};
use shroud_common::*;

pub mod chunk_types;
pub mod data_io;
pub mod encoding;
pub mod pool_rewrite;
pub mod string_pool;

/// Assembles the emission struct for a string pool chunk, computing the
/// chunk size and section offsets from the parts.
///
/// `string_data` must already be padded to a 32-bit boundary. `styles`
/// carries the style offset table and style data when the pool has a style
/// trailer; `None` emits a pool whose styles offset is 0.
pub fn generate_pool_chunk(
    flags: u32,
    string_indicies: Vec<u32>,
    string_data: Vec<u8>,
    styles: Option<(Vec<u32>, Vec<u32>)>
) -> Result<StringPoolChunk> {
    if string_data.len() % 4 != 0 {
        return Err(ShroudError::StringDataMisaligned(string_data.len() as u32));
    }
    let has_styles = styles.is_some();
    let (style_indicies, style_data) = styles.unwrap_or_default();

    let indicies_size = 4 * (string_indicies.len() + style_indicies.len()) as u32;
    let strings_start = STRING_POOL_HEADER_SIZE as u32 + indicies_size;
    let data_size = string_data.len() as u32;
    let styles_start = if has_styles { strings_start + data_size } else { 0 };
    let chunk_size = strings_start + data_size + 4 * style_data.len() as u32;

    Ok(StringPoolChunk {
        header: ResChunkHeader {
            chunk_type: ChunkType::StringPool,
            header_size: STRING_POOL_HEADER_SIZE,
            chunk_size
        },
        string_pool_header: StringPoolHeader {
            string_count: string_indicies.len() as u32,
            style_count: style_indicies.len() as u32,
            flags,
            strings_start,
            styles_start
        },
        string_indicies,
        style_indicies,
        string_data,
        style_data
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chunk_types::STRING_POOL_UTF8_FLAG;
    use deku::DekuContainerWrite;

    #[test]
    fn computes_offsets_for_an_unstyled_pool() {
        let chunk = generate_pool_chunk(
            STRING_POOL_UTF8_FLAG,
            vec![0, 4],
            vec![0; 8],
            None
        )
        .unwrap();
        assert_eq!(chunk.header.chunk_size, 28 + 8 + 8);
        assert_eq!(chunk.string_pool_header.string_count, 2);
        assert_eq!(chunk.string_pool_header.strings_start, 36);
        assert_eq!(chunk.string_pool_header.styles_start, 0);
        assert_eq!(chunk.to_bytes().unwrap().len(), 44);
    }

    #[test]
    fn computes_offsets_for_a_styled_pool() {
        let chunk = generate_pool_chunk(
            0,
            vec![0],
            vec![0; 4],
            Some((vec![0], vec![0xFFFF_FFFF]))
        )
        .unwrap();
        assert_eq!(chunk.string_pool_header.strings_start, 28 + 4 + 4);
        assert_eq!(chunk.string_pool_header.styles_start, 36 + 4);
        assert_eq!(chunk.header.chunk_size, 36 + 4 + 4);
    }

    #[test]
    fn refuses_misaligned_string_data() {
        assert!(matches!(
            generate_pool_chunk(0, vec![0], vec![0; 3], None),
            Err(ShroudError::StringDataMisaligned(3))
        ));
    }
}
