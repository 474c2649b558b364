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

// Thin little-endian adapters over Read/Write. Resource chunks are walked
// strictly sequentially, so there is no seeking here, only skipping.
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use shroud_common::*;
use std::io::{self, Read, Write};

pub struct DataInput<R: Read> {
    pub(crate) inner: R
}

impl<R: Read> DataInput<R> {
    pub fn new(inner: R) -> Self {
        DataInput { inner }
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(self.inner.read_u32::<LittleEndian>()?)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(self.inner.read_u16::<LittleEndian>()?)
    }

    pub fn read_u32_array(&mut self, count: usize) -> Result<Vec<u32>> {
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(self.read_u32()?);
        }
        Ok(values)
    }

    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        Ok(self.inner.read_exact(buf)?)
    }

    /// Discards exactly `count` bytes from the stream.
    pub fn skip(&mut self, count: u64) -> Result<()> {
        let skipped = io::copy(&mut self.inner.by_ref().take(count), &mut io::sink())?;
        if skipped != count {
            return Err(short_read(count, skipped));
        }
        Ok(())
    }

    /// Consumes a chunk type word, failing unless it is `expected` or, when
    /// `also_null` is set, the zeroed-out synonym. Returns the word read.
    pub fn skip_check_chunk_type(&mut self, expected: u32, also_null: bool) -> Result<u32> {
        let value = self.read_u32()?;
        check_chunk_type(value, expected, also_null)?;
        Ok(value)
    }
}

pub struct DataOutput<W: Write> {
    inner: W
}

impl<W: Write> DataOutput<W> {
    pub fn new(inner: W) -> Self {
        DataOutput { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        Ok(self.inner.write_u32::<LittleEndian>(value)?)
    }

    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        Ok(self.inner.write_u16::<LittleEndian>(value)?)
    }

    pub fn write_u32_array(&mut self, values: &[u32]) -> Result<()> {
        for &value in values {
            self.write_u32(value)?;
        }
        Ok(())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        Ok(self.inner.write_all(bytes)?)
    }

    /// Copies exactly `count` bytes from the reader to this writer.
    pub fn copy_bytes<R: Read>(&mut self, input: &mut DataInput<R>, count: u64) -> Result<()> {
        let copied = io::copy(&mut input.inner.by_ref().take(count), &mut self.inner)?;
        if copied != count {
            return Err(short_read(count, copied));
        }
        Ok(())
    }

    /// Consumes a chunk type word from the reader, validates it like
    /// [DataInput::skip_check_chunk_type], and re-emits the same word.
    pub fn write_check_chunk_type<R: Read>(
        &mut self,
        input: &mut DataInput<R>,
        expected: u32,
        also_null: bool
    ) -> Result<u32> {
        let value = input.skip_check_chunk_type(expected, also_null)?;
        self.write_u32(value)?;
        Ok(value)
    }
}

fn check_chunk_type(value: u32, expected: u32, also_null: bool) -> Result<()> {
    if value == expected || (also_null && value == 0) {
        Ok(())
    } else {
        Err(ShroudError::InvalidChunkType(value))
    }
}

fn short_read(wanted: u64, got: u64) -> ShroudError {
    io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("wanted {wanted} bytes, stream held {got}")
    )
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_little_endian_words() {
        let mut input = DataInput::new(Cursor::new(vec![0x01, 0x00, 0x1C, 0x00, 0x2A, 0x00]));
        assert_eq!(input.read_u32().unwrap(), 0x001C_0001);
        assert_eq!(input.read_u16().unwrap(), 42);
    }

    #[test]
    fn reads_word_arrays() {
        let mut input = DataInput::new(Cursor::new(vec![1, 0, 0, 0, 2, 0, 0, 0]));
        assert_eq!(input.read_u32_array(2).unwrap(), vec![1, 2]);
    }

    #[test]
    fn writes_round_trip() {
        let mut output = DataOutput::new(vec![]);
        output.write_u32(0x001C_0001).unwrap();
        output.write_u16(7).unwrap();
        output.write_u32_array(&[1, 2]).unwrap();
        output.write_bytes(&[0xAB]).unwrap();
        assert_eq!(
            output.into_inner(),
            vec![0x01, 0x00, 0x1C, 0x00, 0x07, 0x00, 1, 0, 0, 0, 2, 0, 0, 0, 0xAB]
        );
    }

    #[test]
    fn skip_discards_exact_count() {
        let mut input = DataInput::new(Cursor::new(vec![9, 9, 9, 1, 0, 0, 0]));
        input.skip(3).unwrap();
        assert_eq!(input.read_u32().unwrap(), 1);
    }

    #[test]
    fn skip_past_end_is_an_io_error() {
        let mut input = DataInput::new(Cursor::new(vec![1, 2]));
        assert!(matches!(
            input.skip(3),
            Err(ShroudError::FileIoError(_))
        ));
    }

    #[test]
    fn copy_bytes_tees_exactly() {
        let mut input = DataInput::new(Cursor::new(vec![1, 2, 3, 4, 5]));
        let mut output = DataOutput::new(vec![]);
        output.copy_bytes(&mut input, 4).unwrap();
        assert_eq!(output.into_inner(), vec![1, 2, 3, 4]);
        let mut rest = [0u8; 1];
        input.read_exact(&mut rest).unwrap();
        assert_eq!(rest, [5]);
    }

    #[test]
    fn chunk_type_check_accepts_expected_and_null() {
        let mut input = DataInput::new(Cursor::new(0x001C_0001u32.to_le_bytes().to_vec()));
        assert_eq!(
            input.skip_check_chunk_type(0x001C_0001, false).unwrap(),
            0x001C_0001
        );

        let mut input = DataInput::new(Cursor::new(0u32.to_le_bytes().to_vec()));
        assert_eq!(input.skip_check_chunk_type(0x001C_0001, true).unwrap(), 0);
    }

    #[test]
    fn chunk_type_check_rejects_mismatches() {
        let mut input = DataInput::new(Cursor::new(0xDEAD_BEEFu32.to_le_bytes().to_vec()));
        assert!(matches!(
            input.skip_check_chunk_type(0x001C_0001, true),
            Err(ShroudError::InvalidChunkType(0xDEAD_BEEF))
        ));

        let mut input = DataInput::new(Cursor::new(0u32.to_le_bytes().to_vec()));
        assert!(matches!(
            input.skip_check_chunk_type(0x001C_0001, false),
            Err(ShroudError::InvalidChunkType(0))
        ));
    }

    #[test]
    fn write_check_chunk_type_reemits_the_word_it_read() {
        let mut input = DataInput::new(Cursor::new(0u32.to_le_bytes().to_vec()));
        let mut output = DataOutput::new(vec![]);
        output
            .write_check_chunk_type(&mut input, 0x001C_0001, true)
            .unwrap();
        assert_eq!(output.into_inner(), vec![0, 0, 0, 0]);
    }
}
