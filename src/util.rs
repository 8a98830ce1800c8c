use byteorder::{ByteOrder, BigEndian};
use crate::Error;

/// Characters kept when a sample name becomes part of a file name.
pub const SAFE_CHARACTERS: &str = "~ -_.";


pub trait BinaryRead {
    fn read_string(&self, ofs: usize, size: usize) -> Result<String, Error>;
    fn read32b_i(&self, ofs: usize) -> Result<i32, Error>;
    fn read16b(&self, ofs: usize) -> Result<u16, Error>;
    fn read8(&self, ofs: usize) -> Result<u8, Error>;
    fn slice(&self, start: usize, size: usize) -> Result<&[u8], Error>;
}

impl<'a> BinaryRead for &'a [u8] {
    fn read_string(&self, ofs: usize, size: usize) -> Result<String, Error> {
        decode_string(self.slice(ofs, size)?)
    }

    fn read32b_i(&self, ofs: usize) -> Result<i32, Error> {
        check_buffer_size(self, ofs, 4)?;
        Ok(BigEndian::read_i32(&self[ofs..ofs+4]))
    }

    fn read16b(&self, ofs: usize) -> Result<u16, Error> {
        check_buffer_size(self, ofs, 2)?;
        Ok(BigEndian::read_u16(&self[ofs..ofs+2]))
    }

    fn read8(&self, ofs: usize) -> Result<u8, Error> {
        check_buffer_size(self, ofs, 1)?;
        Ok(self[ofs])
    }

    fn slice(&self, start: usize, size: usize) -> Result<&[u8], Error> {
        check_buffer_size(self, start, size)?;
        Ok(&self[start..start + size])
    }
}

fn check_buffer_size(b: &[u8], offset: usize, size: usize) -> Result<(), Error> {
    match offset.checked_add(size) {
        Some(end) if end <= b.len() => Ok(()),
        _ => Err(Error::Truncated{offset, size, len: b.len()}),
    }
}

/// Decode a null-padded single-byte text field. Only trailing nulls are
/// removed; any byte outside 7-bit ASCII makes the field invalid.
pub fn decode_string(b: &[u8]) -> Result<String, Error> {
    let end = b.iter().rposition(|&x| x != 0).map_or(0, |p| p + 1);
    let b = &b[..end];

    if let Some(pos) = b.iter().position(|x| !x.is_ascii()) {
        return Err(Error::Load(format!("invalid text byte 0x{:02x} at position {}", b[pos], pos)));
    }

    Ok(b.iter().map(|&x| x as char).collect())
}

pub fn safe_filename(name: &str) -> String {
    name.chars().filter(|c| c.is_ascii_alphanumeric() || SAFE_CHARACTERS.contains(*c)).collect()
}
