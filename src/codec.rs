//! Primitive encoding rules of NBT: big-endian two's complement integers,
//! big-endian IEEE-754 floats, and length-prefixed strings and byte arrays.
//!
//! Fixed width scalars are read and written with `byteorder`'s
//! [`ReadBytesExt`]/[`WriteBytesExt`] directly. The traits here add the NBT
//! specific pieces on top of any [`Read`] or [`Write`].
use std::convert::{TryFrom, TryInto};
use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{Error, Result};
use crate::Tag;

/// Longest string, in bytes of UTF-8, that fits the signed 16-bit length
/// prefix.
pub const MAX_STRING_LEN: usize = i16::MAX as usize;

fn check_width(width: usize) -> Result<()> {
    match width {
        1 | 2 | 4 | 8 => Ok(()),
        _ => Err(Error::length_out_of_range(format!(
            "unsupported integer width: {}",
            width
        ))),
    }
}

/// Read a big-endian two's complement integer that is `width` bytes wide,
/// sign extending it to an `i64`. `width` must be 1, 2, 4 or 8.
pub fn read_integer<R: Read + ?Sized>(reader: &mut R, width: usize) -> Result<i64> {
    check_width(width)?;
    Ok(reader.read_int::<BigEndian>(width)?)
}

/// Write `value` as a big-endian two's complement integer `width` bytes wide.
/// Fails rather than truncating if `value` does not fit.
pub fn write_integer<W: Write + ?Sized>(writer: &mut W, value: i64, width: usize) -> Result<()> {
    check_width(width)?;
    if width < 8 {
        let sign_bit = 1i64 << (width * 8 - 1);
        if value < -sign_bit || value >= sign_bit {
            return Err(Error::length_out_of_range(format!(
                "{} does not fit in {} bytes",
                value, width
            )));
        }
    }
    writer.write_int::<BigEndian>(value, width)?;
    Ok(())
}

fn non_negative(len: i64, what: &str) -> Result<usize> {
    usize::try_from(len)
        .map_err(|_| Error::length_out_of_range(format!("negative {} length: {}", what, len)))
}

/// Check that `s` fits a string length prefix.
pub fn check_string_len(s: &str) -> Result<()> {
    if s.len() > MAX_STRING_LEN {
        return Err(Error::length_out_of_range(format!(
            "string of {} bytes is longer than {}",
            s.len(),
            MAX_STRING_LEN
        )));
    }
    Ok(())
}

/// Check that `len` fits the signed 32-bit prefix of byte arrays and lists.
pub fn check_len(len: usize) -> Result<i32> {
    len.try_into()
        .map_err(|_| Error::length_out_of_range(format!("len too large: {}", len)))
}

pub trait ReadNbt: Read {
    fn read_tag(&mut self) -> Result<Tag> {
        let tag = self.read_u8()?;
        Tag::try_from(tag).map_err(|_| Error::invalid_tag(tag))
    }

    /// Read a string with a signed 16-bit length prefix. Prefixes of 32768 or
    /// more decode as negative and are rejected.
    fn read_string(&mut self) -> Result<String> {
        let len = non_negative(self.read_i16::<BigEndian>()?.into(), "string")?;
        let mut buf = vec![0; len];
        self.read_exact(&mut buf)?;

        String::from_utf8(buf).map_err(|e| Error::nonunicode(e.into_bytes()))
    }

    /// Read a byte array with a signed 32-bit length prefix.
    fn read_byte_array(&mut self) -> Result<Vec<u8>> {
        let len = non_negative(self.read_i32::<BigEndian>()?.into(), "byte array")?;

        // Don't trust the prefix with an up-front allocation, a corrupt stream
        // could ask for gigabytes.
        let mut buf = Vec::new();
        Read::take(&mut *self, len as u64).read_to_end(&mut buf)?;
        if buf.len() != len {
            return Err(Error::unexpected_eof());
        }
        Ok(buf)
    }

    /// Read the element tag and length that start the body of a list.
    fn read_list_header(&mut self) -> Result<(Tag, usize)> {
        let tag = self.read_tag()?;
        let len = non_negative(self.read_i32::<BigEndian>()?.into(), "list")?;
        if tag == Tag::End && len != 0 {
            return Err(Error::length_out_of_range(format!(
                "list of End tags must be empty, has length {}",
                len
            )));
        }
        Ok((tag, len))
    }
}

impl<R: Read + ?Sized> ReadNbt for R {}

pub trait WriteNbt: Write {
    fn write_tag(&mut self, tag: Tag) -> Result<()> {
        self.write_u8(tag.into())?;
        Ok(())
    }

    fn write_string(&mut self, s: &str) -> Result<()> {
        check_string_len(s)?;
        self.write_i16::<BigEndian>(s.len() as i16)?;
        self.write_all(s.as_bytes())?;
        Ok(())
    }

    fn write_len(&mut self, len: usize) -> Result<()> {
        let len = check_len(len)?;
        self.write_i32::<BigEndian>(len)?;
        Ok(())
    }

    fn write_byte_array(&mut self, bs: &[u8]) -> Result<()> {
        self.write_len(bs.len())?;
        self.write_all(bs)?;
        Ok(())
    }

    fn write_list_header(&mut self, tag: Tag, len: usize) -> Result<()> {
        self.write_tag(tag)?;
        self.write_len(len)
    }
}

impl<W: Write + ?Sized> WriteNbt for W {}
