//! Allows streaming of NBT data without prior knowledge of the structure.
//!
//! A [`Reader`] turns bytes into a sequence of [`Token`]s and a [`Writer`]
//! turns the same sequence back into bytes. A document is always a single
//! named root compound:
//!
//! ```text
//! Compound ""          <- root
//!     Short "x" -1
//!     List "y" Byte    <- element tag of the list
//!         Byte 0 3     <- list items are named by their index
//!         Byte 1 5
//!     End              <- closes the list
//! End                  <- closes the root
//! ```
use std::fmt;
use std::io::{Read, Write};

use byteorder::{BigEndian, WriteBytesExt};

use crate::codec::{check_len, check_string_len, WriteNbt};
use crate::error::{Error, Result};
use crate::Tag;

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

/// Where a token sits in its parent: a key inside a compound, or a position
/// inside a list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Name {
    Key(String),
    Index(usize),
}

impl Name {
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Name::Key(k) => Some(k),
            Name::Index(_) => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            Name::Key(_) => None,
            Name::Index(i) => Some(*i),
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Name::Key(k) => write!(f, "{:?}", k),
            Name::Index(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for Name {
    fn from(key: &str) -> Self {
        Name::Key(key.to_owned())
    }
}

impl From<String> for Name {
    fn from(key: String) -> Self {
        Name::Key(key)
    }
}

impl From<usize> for Name {
    fn from(index: usize) -> Self {
        Name::Index(index)
    }
}

/// A shallow NBT value.
///
/// Scalars carry their value. Containers carry nothing of their contents,
/// which follow as further tokens. A list start carries the tag every element
/// of the list has.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    End,
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<u8>),
    String(String),
    List(Tag),
    Compound,
}

impl Payload {
    /// The tag this payload is written with.
    pub fn tag(&self) -> Tag {
        match self {
            Payload::End => Tag::End,
            Payload::Byte(_) => Tag::Byte,
            Payload::Short(_) => Tag::Short,
            Payload::Int(_) => Tag::Int,
            Payload::Long(_) => Tag::Long,
            Payload::Float(_) => Tag::Float,
            Payload::Double(_) => Tag::Double,
            Payload::ByteArray(_) => Tag::ByteArray,
            Payload::String(_) => Tag::String,
            Payload::List(_) => Tag::List,
            Payload::Compound => Tag::Compound,
        }
    }

    /// Check that every length this payload carries fits its prefix, so that
    /// writing it cannot fail part way through.
    pub(crate) fn check_lengths(&self) -> Result<()> {
        match self {
            Payload::ByteArray(bs) => check_len(bs.len()).map(|_| ()),
            Payload::String(s) => check_string_len(s),
            _ => Ok(()),
        }
    }

    /// Write the value bytes of a scalar. Containers and End write nothing.
    pub(crate) fn write_scalar<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        match self {
            Payload::Byte(v) => writer.write_i8(*v)?,
            Payload::Short(v) => writer.write_i16::<BigEndian>(*v)?,
            Payload::Int(v) => writer.write_i32::<BigEndian>(*v)?,
            Payload::Long(v) => writer.write_i64::<BigEndian>(*v)?,
            Payload::Float(v) => writer.write_f32::<BigEndian>(*v)?,
            Payload::Double(v) => writer.write_f64::<BigEndian>(*v)?,
            Payload::ByteArray(bs) => writer.write_byte_array(bs)?,
            Payload::String(s) => writer.write_string(s)?,
            Payload::End | Payload::List(_) | Payload::Compound => {}
        }
        Ok(())
    }
}

/// A single unit of a token stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub name: Name,
    pub payload: Payload,
}

impl Token {
    pub fn new(name: impl Into<Name>, payload: Payload) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }

    /// The token closing a compound or list. End tags have no name, so this
    /// always carries an empty key.
    pub fn end() -> Self {
        Self::new("", Payload::End)
    }

    pub fn tag(&self) -> Tag {
        self.payload.tag()
    }
}

/// Parse the input until the container we are currently inside is complete.
/// Handles inner compounds and lists by skipping those as well. Fails if the
/// document has already ended, as there is no container left to skip.
pub fn skip_container<R: Read>(reader: &mut Reader<R>) -> Result<()> {
    let mut depth = 1;

    while depth != 0 {
        let token = match reader.next_token()? {
            Some(token) => token,
            None => return Err(Error::finished()),
        };
        match token.payload {
            Payload::End => depth -= 1,
            Payload::Compound | Payload::List(_) => depth += 1,
            _ => {}
        }
    }
    Ok(())
}

/// Parse until the compound with the given name is found. This will enter
/// other compounds and lists, rather than find a compound at the current
/// level. Returns `false` if the document ended first.
pub fn find_compound<R: Read>(reader: &mut Reader<R>, name: &str) -> Result<bool> {
    while let Some(token) = reader.next_token()? {
        if token.payload == Payload::Compound && token.name.as_key() == Some(name) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Parse until the list with the given name is found. This will enter other
/// compounds and lists, rather than find a list at the current level. Returns
/// the element tag of the list, or `None` if the document ended first.
pub fn find_list<R: Read>(reader: &mut Reader<R>, name: &str) -> Result<Option<Tag>> {
    while let Some(token) = reader.next_token()? {
        if let Payload::List(tag) = token.payload {
            if token.name.as_key() == Some(name) {
                return Ok(Some(tag));
            }
        }
    }
    Ok(None)
}
