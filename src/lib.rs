//! nbtstream is a streaming codec for NBT (Named Binary Tag) data, the typed
//! binary tree format used by *Minecraft: Java Edition* to store world data
//! and player inventories.
//!
//! * For pulling tokens out of NBT one at a time, see [`stream::Reader`].
//! * For pushing tokens into NBT one at a time, see [`stream::Writer`].
//! * For loading a whole document into memory, see [`from_bytes`] and
//!   [`Value`].
//!
//! ```toml
//! [dependencies]
//! nbtstream = "0.1"
//! ```
//!
//! # Tokens
//!
//! Both halves of the codec speak the same token shape. Every entry is a
//! [`stream::Token`]: a name (a key inside compounds, an index inside lists)
//! and a [`stream::Payload`]. Containers start with a `Compound` or
//! `List(element_tag)` payload, are followed by their children's tokens, and
//! are closed by an `End` payload.
//!
//! # Quick example
//!
//! Write a small document, then read it back token by token.
//!
//! ```
//! use nbtstream::stream::{Payload, Reader, Writer};
//! use nbtstream::Tag;
//!
//! # fn main() -> nbtstream::error::Result<()> {
//! let mut writer = Writer::new(Vec::new());
//! writer.emit_compound("", |w| {
//!     w.emit_token("x", Payload::Short(-1))?;
//!     w.emit_list("y", Tag::Byte, |w| {
//!         w.emit_item(Payload::Byte(3))?;
//!         w.emit_item(Payload::Byte(5))
//!     })
//! })?;
//! let bytes = writer.finish()?;
//!
//! let mut reader = Reader::new(bytes.as_slice());
//! while let Some(token) = reader.next_token()? {
//!     println!("{:?}", token);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Compression
//!
//! NBT files are usually GZip compressed as a whole. The codec itself works on
//! decompressed bytes; [`stream::Reader::gzip`] and [`stream::Writer::gzip`]
//! wrap a raw source or sink with `flate2`.

pub mod codec;
pub mod error;
pub mod stream;

mod load;
mod value;

pub use load::*;
pub use value::*;

#[cfg(test)]
mod test;

use std::convert::TryFrom;
use std::fmt;

/// An NBT tag. This does not carry the value or the name of the data.
///
/// The discriminant of each variant is the byte used on the wire.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[repr(u8)]
pub enum Tag {
    /// Represents the end of a Compound object.
    End = 0,
    /// Equivalent to i8.
    Byte = 1,
    /// Equivalent to i16.
    Short = 2,
    /// Equivalent to i32.
    Int = 3,
    /// Equivalent to i64
    Long = 4,
    /// Equivalent to f32.
    Float = 5,
    /// Equivalent to f64.
    Double = 6,
    /// Represents an array of raw bytes.
    ByteArray = 7,
    /// Represents a Unicode string.
    String = 8,
    /// Represents a list of other objects, all of the same tag.
    List = 9,
    /// Represents a struct-like structure.
    Compound = 10,
}

impl Tag {
    /// Whether this tag opens a container that is closed by an End token.
    pub fn is_container(self) -> bool {
        matches!(self, Tag::List | Tag::Compound)
    }

    /// Whether this tag carries a value of its own.
    pub fn is_scalar(self) -> bool {
        !self.is_container() && self != Tag::End
    }
}

// The tags will very rarely change so is not a massive burden to write out by
// hand.
impl TryFrom<u8> for Tag {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        use Tag::*;
        Ok(match value {
            0 => End,
            1 => Byte,
            2 => Short,
            3 => Int,
            4 => Long,
            5 => Float,
            6 => Double,
            7 => ByteArray,
            8 => String,
            9 => List,
            10 => Compound,
            11..=u8::MAX => return Err(()),
        })
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> Self {
        match tag {
            Tag::End => 0,
            Tag::Byte => 1,
            Tag::Short => 2,
            Tag::Int => 3,
            Tag::Long => 4,
            Tag::Float => 5,
            Tag::Double => 6,
            Tag::ByteArray => 7,
            Tag::String => 8,
            Tag::List => 9,
            Tag::Compound => 10,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Tag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(u8::from(*self))
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Tag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let tag: u8 = serde::Deserialize::deserialize(deserializer)?;
        Tag::try_from(tag)
            .map_err(|_| serde::de::Error::custom(format!("invalid nbt tag value: {}", tag)))
    }
}
