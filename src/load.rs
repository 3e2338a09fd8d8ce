//! Loading whole documents into a [`Value`] tree, and saving them back.
use std::io::{Read, Write};

use flate2::Compression;

use crate::error::{Error, Result};
use crate::stream::{Name, Payload, Reader, Token, Writer};
use crate::{Compound, Tag, Value};

/// A container being filled in while loading.
enum Open {
    Compound(Compound),
    List(Vec<Value>),
}

impl Open {
    fn insert(&mut self, name: Name, value: Value) {
        match self {
            Open::Compound(c) => {
                let key = match name {
                    Name::Key(key) => key,
                    Name::Index(i) => i.to_string(),
                };
                c.insert(key, value);
            }
            // Items arrive in index order, so the index is the position.
            Open::List(l) => l.push(value),
        }
    }

    fn into_value(self) -> Value {
        match self {
            Open::Compound(c) => Value::Compound(c),
            Open::List(l) => Value::List(l),
        }
    }
}

/// Load a whole document from decompressed NBT data.
///
/// The returned compound is the root; its name is discarded.
pub fn from_reader<R: Read>(reader: R) -> Result<Compound> {
    load(&mut Reader::new(reader))
}

/// Load a whole document from a slice of decompressed NBT data.
pub fn from_bytes(bytes: &[u8]) -> Result<Compound> {
    from_reader(bytes)
}

/// Load a whole document from GZip compressed NBT data, as found in most NBT
/// files.
pub fn from_gzip_reader<R: Read>(reader: R) -> Result<Compound> {
    load(&mut Reader::gzip(reader))
}

fn load<R: Read>(reader: &mut Reader<R>) -> Result<Compound> {
    let mut stack: Vec<(Name, Open)> = Vec::new();

    while let Some(Token { name, payload }) = reader.next_token()? {
        let (name, value) = match payload {
            Payload::Compound => {
                stack.push((name, Open::Compound(Compound::new())));
                continue;
            }
            Payload::List(_) => {
                stack.push((name, Open::List(Vec::new())));
                continue;
            }
            Payload::End => match stack.pop() {
                Some((name, open)) => (name, open.into_value()),
                None => return Err(Error::finished()),
            },
            Payload::Byte(v) => (name, Value::Byte(v)),
            Payload::Short(v) => (name, Value::Short(v)),
            Payload::Int(v) => (name, Value::Int(v)),
            Payload::Long(v) => (name, Value::Long(v)),
            Payload::Float(v) => (name, Value::Float(v)),
            Payload::Double(v) => (name, Value::Double(v)),
            Payload::ByteArray(v) => (name, Value::ByteArray(v)),
            Payload::String(v) => (name, Value::String(v)),
        };

        match stack.last_mut() {
            Some((_, parent)) => parent.insert(name, value),
            None => {
                return match value {
                    Value::Compound(root) => Ok(root),
                    other => Err(Error::no_root_compound(other.tag())),
                }
            }
        }
    }

    // The reader only runs out after closing the root, which returns above.
    Err(Error::unexpected_eof())
}

/// Write `root` as a whole document of decompressed NBT data, with an empty
/// root name. Returns the writer once done.
pub fn to_writer<W: Write>(writer: W, root: &Compound) -> Result<W> {
    let mut writer = Writer::new(writer);
    save(&mut writer, root)?;
    writer.finish()
}

/// Write `root` as a whole document into a new vector.
pub fn to_bytes(root: &Compound) -> Result<Vec<u8>> {
    to_writer(Vec::new(), root)
}

/// Write `root` as a whole document, GZip compressed at the given level.
/// Returns the raw writer once the compressed stream is complete.
pub fn to_gzip_writer<W: Write>(writer: W, root: &Compound, level: Compression) -> Result<W> {
    let mut writer = Writer::gzip(writer, level);
    save(&mut writer, root)?;
    writer.finish_gzip()
}

/// A container being walked while saving.
enum Walk<'a> {
    Compound(indexmap::map::Iter<'a, String, Value>),
    List(std::slice::Iter<'a, Value>),
}

// Walks the tree with an explicit stack, like `load`, so deeply nested trees
// do not recurse.
fn save<W: Write>(writer: &mut Writer<W>, root: &Compound) -> Result<()> {
    writer.emit_token("", Payload::Compound)?;
    let mut stack = vec![Walk::Compound(root.iter())];

    while let Some(walk) = stack.last_mut() {
        let next = match walk {
            Walk::Compound(entries) => entries.next().map(|(k, v)| (k.as_str(), v)),
            Walk::List(items) => items.next().map(|v| ("", v)),
        };
        let (name, value) = match next {
            Some(next) => next,
            None => {
                stack.pop();
                writer.emit_end()?;
                continue;
            }
        };

        let payload = match value {
            Value::Compound(c) => {
                stack.push(Walk::Compound(c.iter()));
                Payload::Compound
            }
            Value::List(items) => {
                stack.push(Walk::List(items.iter()));
                Payload::List(items.first().map(Value::tag).unwrap_or(Tag::End))
            }
            Value::Byte(v) => Payload::Byte(*v),
            Value::Short(v) => Payload::Short(*v),
            Value::Int(v) => Payload::Int(*v),
            Value::Long(v) => Payload::Long(*v),
            Value::Float(v) => Payload::Float(*v),
            Value::Double(v) => Payload::Double(*v),
            Value::ByteArray(v) => Payload::ByteArray(v.clone()),
            Value::String(v) => Payload::String(v.clone()),
        };
        writer.emit_token(name, payload)?;
    }
    Ok(())
}
