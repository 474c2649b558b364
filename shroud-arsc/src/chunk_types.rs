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

// Types that Android/APKs themselves use to describe string pools
use deku::prelude::*;

/// Full chunk type word of a string pool as read off the wire: type 0x0001
/// in the low half, header size 0x001C in the high half.
pub const CHUNK_STRINGPOOL_TYPE: u32 = 0x001C_0001;
/// Some tool chains zero out the chunk type word of string pools they emit.
/// Readers accept this as a synonym for [CHUNK_STRINGPOOL_TYPE].
pub const CHUNK_NULL_TYPE: u32 = 0x0000_0000;
/// Byte length of the whole string pool header, the chunk type and size
/// words included.
pub const STRING_POOL_HEADER_SIZE: u16 = 0x1C;
/// When set in the flag word, entries are UTF-8; otherwise UTF-16LE.
pub const STRING_POOL_UTF8_FLAG: u32 = 1 << 8;

#[derive(Debug, PartialEq, DekuWrite, Clone, Copy)]
#[deku(id_type = "u16")]
pub enum ChunkType {
    #[deku(id = 0x0000)]
    Null,
    #[deku(id = 0x0001)]
    StringPool,
    #[deku(id = 0x0002)]
    Table,
    #[deku(id = 0x0003)]
    XmlFile
}

#[derive(Debug, PartialEq, DekuWrite)]
pub struct ResChunkHeader {
    pub chunk_type: ChunkType,
    pub header_size: u16,
    // Includes both this header and the data that follows
    pub chunk_size: u32
}

#[derive(Debug, PartialEq, DekuWrite)]
pub struct StringPoolHeader {
    pub string_count: u32,
    pub style_count: u32,
    pub flags: u32,
    pub strings_start: u32,
    pub styles_start: u32
}

/// A complete string pool chunk ready for byte emission.
///
/// Fields appear in wire order; [to_bytes](deku::DekuContainerWrite::to_bytes)
/// produces exactly the on-disk chunk.
#[derive(Debug, PartialEq, DekuWrite)]
pub struct StringPoolChunk {
    pub header: ResChunkHeader,
    // Not the same thing as a ResChunkHeader,
    // the format has headers within headers
    pub string_pool_header: StringPoolHeader,
    pub string_indicies: Vec<u32>,
    pub style_indicies: Vec<u32>,
    pub string_data: Vec<u8>,
    pub style_data: Vec<u32>
}
