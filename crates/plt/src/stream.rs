//! Primitive read/write operations for fixed-width binary fields
//!
//! The file is a flat sequence of little-endian fixed-width fields with no
//! padding between them. Strings are stored as one 4-byte integer per
//! unicode code point, terminated by a zero-valued integer.
//!
//! Long-integer fields are fixed to 4 bytes by the file format and always go
//! through the i32 path here, never the width of the host.

// standard library
use std::io::{Read, Write};

// crate modules
use crate::error::{Error, Result};

// external crates
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

/// Scoped read access to an underlying byte source
///
/// A short read of any field is fatal and surfaces as an I/O error rather
/// than being treated as a legal end of input.
pub(crate) struct StreamReader<R: Read> {
    inner: R,
}

impl<R: Read> StreamReader<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Fill `buffer` exactly from the stream
    pub(crate) fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<()> {
        self.inner.read_exact(buffer)?;
        Ok(())
    }

    pub(crate) fn read_i32(&mut self) -> Result<i32> {
        Ok(self.inner.read_i32::<LittleEndian>()?)
    }

    pub(crate) fn read_f32(&mut self) -> Result<f32> {
        Ok(self.inner.read_f32::<LittleEndian>()?)
    }

    pub(crate) fn read_f64(&mut self) -> Result<f64> {
        Ok(self.inner.read_f64::<LittleEndian>()?)
    }

    /// Read `n` contiguous 4-byte integers
    pub(crate) fn read_i32_list(&mut self, n: usize) -> Result<Vec<i32>> {
        let mut values = vec![0i32; n];
        self.inner.read_i32_into::<LittleEndian>(&mut values)?;
        Ok(values)
    }

    /// Read `n` contiguous 4-byte floats
    pub(crate) fn read_f32_list(&mut self, n: usize) -> Result<Vec<f32>> {
        let mut values = vec![0f32; n];
        self.inner.read_f32_into::<LittleEndian>(&mut values)?;
        Ok(values)
    }

    /// Read `n` contiguous 8-byte doubles
    pub(crate) fn read_f64_list(&mut self, n: usize) -> Result<Vec<f64>> {
        let mut values = vec![0f64; n];
        self.inner.read_f64_into::<LittleEndian>(&mut values)?;
        Ok(values)
    }

    /// Read integers as unicode code points up to a zero terminator
    ///
    /// The terminator is consumed but excluded from the returned string.
    pub(crate) fn read_string(&mut self) -> Result<String> {
        let mut string = String::new();
        loop {
            let value = self.read_i32()?;
            if value == 0 {
                break;
            }
            let character = u32::try_from(value)
                .ok()
                .and_then(char::from_u32)
                .ok_or(Error::InvalidCodePoint(value))?;
            string.push(character);
        }
        Ok(string)
    }
}

/// Scoped write access to an underlying byte sink
pub(crate) struct StreamWriter<W: Write> {
    inner: W,
}

impl<W: Write> StreamWriter<W> {
    pub(crate) fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Write `buffer` to the stream as-is
    pub(crate) fn write_bytes(&mut self, buffer: &[u8]) -> Result<()> {
        self.inner.write_all(buffer)?;
        Ok(())
    }

    pub(crate) fn write_i32(&mut self, value: i32) -> Result<()> {
        Ok(self.inner.write_i32::<LittleEndian>(value)?)
    }

    pub(crate) fn write_f32(&mut self, value: f32) -> Result<()> {
        Ok(self.inner.write_f32::<LittleEndian>(value)?)
    }

    pub(crate) fn write_f64(&mut self, value: f64) -> Result<()> {
        Ok(self.inner.write_f64::<LittleEndian>(value)?)
    }

    /// Write contiguous 4-byte integers with no padding between them
    pub(crate) fn write_i32_list(&mut self, values: &[i32]) -> Result<()> {
        for value in values {
            self.write_i32(*value)?;
        }
        Ok(())
    }

    /// Write contiguous 4-byte floats
    pub(crate) fn write_f32_list(&mut self, values: &[f32]) -> Result<()> {
        for value in values {
            self.write_f32(*value)?;
        }
        Ok(())
    }

    /// Write contiguous 8-byte doubles
    pub(crate) fn write_f64_list(&mut self, values: &[f64]) -> Result<()> {
        for value in values {
            self.write_f64(*value)?;
        }
        Ok(())
    }

    /// Write one integer per character followed by a zero terminator
    pub(crate) fn write_string(&mut self, string: &str) -> Result<()> {
        for character in string.chars() {
            self.write_i32(character as i32)?;
        }
        self.write_i32(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_encodes_one_integer_per_character() {
        let mut buffer = Vec::new();
        StreamWriter::new(&mut buffer).write_string("V1").unwrap();

        // 'V', '1', and the terminator
        assert_eq!(buffer.len(), 12);
        assert_eq!(buffer[0..4], (b'V' as i32).to_le_bytes());
        assert_eq!(buffer[4..8], (b'1' as i32).to_le_bytes());
        assert_eq!(buffer[8..12], 0i32.to_le_bytes());

        let decoded = StreamReader::new(buffer.as_slice()).read_string().unwrap();
        assert_eq!(decoded, "V1");
    }

    #[test]
    fn string_roundtrip_outside_ascii() {
        let mut buffer = Vec::new();
        StreamWriter::new(&mut buffer).write_string("T [°C]").unwrap();

        let decoded = StreamReader::new(buffer.as_slice()).read_string().unwrap();
        assert_eq!(decoded, "T [°C]");
    }

    #[test]
    fn scalar_roundtrips() {
        let mut buffer = Vec::new();
        let mut writer = StreamWriter::new(&mut buffer);
        writer.write_i32(-7).unwrap();
        writer.write_f32(299.0).unwrap();
        writer.write_f64(1.0e-16).unwrap();

        let mut reader = StreamReader::new(buffer.as_slice());
        assert_eq!(reader.read_i32().unwrap(), -7);
        assert_eq!(reader.read_f32().unwrap(), 299.0);
        assert_eq!(reader.read_f64().unwrap(), 1.0e-16);
    }

    #[test]
    fn list_roundtrips_are_contiguous() {
        let mut buffer = Vec::new();
        let mut writer = StreamWriter::new(&mut buffer);
        writer.write_i32_list(&[1, 2, 3]).unwrap();
        writer.write_f64_list(&[0.5, -0.5]).unwrap();
        assert_eq!(buffer.len(), 3 * 4 + 2 * 8);

        let mut reader = StreamReader::new(buffer.as_slice());
        assert_eq!(reader.read_i32_list(3).unwrap(), vec![1, 2, 3]);
        assert_eq!(reader.read_f64_list(2).unwrap(), vec![0.5, -0.5]);
    }

    #[test]
    fn short_read_is_fatal() {
        // 2 bytes can never satisfy a 4-byte field
        let buffer = [0u8, 1];
        let result = StreamReader::new(buffer.as_slice()).read_i32();
        assert!(matches!(result, Err(Error::IOError(_))));
    }

    #[test]
    fn invalid_code_point_is_rejected() {
        let mut buffer = Vec::new();
        StreamWriter::new(&mut buffer).write_i32(-42).unwrap();

        let result = StreamReader::new(buffer.as_slice()).read_string();
        assert!(matches!(result, Err(Error::InvalidCodePoint(-42))));
    }
}
