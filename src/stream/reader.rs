use std::io::Read;
use std::iter::FusedIterator;

use byteorder::{BigEndian, ReadBytesExt};
use flate2::read::GzDecoder;
use log::trace;

use super::{Name, Payload, Token};
use crate::codec::ReadNbt;
use crate::error::{Error, Result};
use crate::Tag;

#[derive(Debug)]
enum State {
    /// Nothing read yet. Expects the root compound.
    Top,
    Compound,
    List { tag: Tag, len: usize, index: usize },
    /// The root compound has closed.
    End,
}

/// Reader pulls [`Token`]s out of any [`Read`] of NBT data. Does not do
/// decompression itself, see [`Reader::gzip`] for that.
///
/// Nesting is tracked with a chain of states. Each open compound or list
/// pushes a state, and the state beneath it is where reading continues once
/// it closes. The bottom of the chain is the terminal End state.
///
/// # Examples
///
/// ## Dump NBT
/// The following takes a stream of GZip compressed data from stdin and dumps
/// it out in Rust's `Debug` format, with some indentation to help see the
/// structure.
///
/// ```no_run
/// use nbtstream::stream::{Payload, Reader};
///
/// let mut reader = Reader::gzip(std::io::stdin());
/// let mut indent = 0;
///
/// for token in &mut reader {
///     let token = match token {
///         Ok(token) => token,
///         Err(e) => {
///             println!("{:?}", e);
///             break;
///         }
///     };
///
///     if token.payload == Payload::End {
///         indent -= 4;
///     }
///
///     println!("{:indent$}{:?}", "", token, indent = indent);
///
///     if matches!(token.payload, Payload::Compound | Payload::List(_)) {
///         indent += 4;
///     }
/// }
/// ```
pub struct Reader<R: Read> {
    reader: R,
    states: Vec<State>,
    fused: bool,
}

impl<R: Read> Reader<R> {
    /// Create new reader for the given decompressed input.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            states: vec![State::End, State::Top],
            fused: false,
        }
    }

    /// Pull the next token from the input.
    ///
    /// Returns `Ok(None)` once the root compound has closed, without touching
    /// the input again.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        let state = match self.states.last_mut() {
            Some(state) => state,
            None => return Ok(None),
        };

        match state {
            State::End => Ok(None),
            State::Top => {
                let tag = self.reader.read_tag()?;
                if tag != Tag::Compound {
                    return Err(Error::no_root_compound(tag));
                }
                let name = self.reader.read_string()?;
                *state = State::Compound;
                trace!("entered root compound {:?}", name);
                Ok(Some(Token::new(name, Payload::Compound)))
            }
            State::Compound => {
                let tag = self.reader.read_tag()?;
                if tag == Tag::End {
                    self.leave();
                    return Ok(Some(Token::end()));
                }
                let name = self.reader.read_string()?;
                self.read_value(Name::Key(name), tag).map(Some)
            }
            State::List { tag, len, index } => {
                // Lists have no End tag on the wire, they are over once their
                // length is used up.
                if *index >= *len {
                    self.leave();
                    return Ok(Some(Token::end()));
                }
                let name = Name::Index(*index);
                *index += 1;
                let tag = *tag;
                self.read_value(name, tag).map(Some)
            }
        }
    }

    /// Drive the reader to the end of the document, handing every token to
    /// `f`. Stops at the first error from either the input or `f`.
    pub fn for_each_token<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(Token) -> Result<()>,
    {
        while let Some(token) = self.next_token()? {
            f(token)?;
        }
        Ok(())
    }

    /// Number of compounds and lists currently open.
    pub fn depth(&self) -> usize {
        self.states
            .iter()
            .filter(|s| matches!(s, State::Compound | State::List { .. }))
            .count()
    }

    /// Whether the root compound has been closed.
    pub fn is_finished(&self) -> bool {
        matches!(self.states.last(), Some(State::End) | None)
    }

    /// Gets a reference to the underlying value in this reader.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Gets a mutable reference to the underlying value in this reader.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Consumes this reader, returning the underlying value.
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn read_value(&mut self, name: Name, tag: Tag) -> Result<Token> {
        let payload = match tag {
            Tag::Byte => Payload::Byte(self.reader.read_i8()?),
            Tag::Short => Payload::Short(self.reader.read_i16::<BigEndian>()?),
            Tag::Int => Payload::Int(self.reader.read_i32::<BigEndian>()?),
            Tag::Long => Payload::Long(self.reader.read_i64::<BigEndian>()?),
            Tag::Float => Payload::Float(self.reader.read_f32::<BigEndian>()?),
            Tag::Double => Payload::Double(self.reader.read_f64::<BigEndian>()?),
            Tag::ByteArray => Payload::ByteArray(self.reader.read_byte_array()?),
            Tag::String => Payload::String(self.reader.read_string()?),
            Tag::List => {
                let (element, len) = self.reader.read_list_header()?;
                trace!("entered list {} of {} x{}", name, element, len);
                self.states.push(State::List {
                    tag: element,
                    len,
                    index: 0,
                });
                Payload::List(element)
            }
            Tag::Compound => {
                trace!("entered compound {}", name);
                self.states.push(State::Compound);
                Payload::Compound
            }
            // Compounds see their End before reading a name, and lists of End
            // are always empty, but an End here still closes the container.
            Tag::End => {
                self.leave();
                Payload::End
            }
        };

        Ok(Token { name, payload })
    }

    fn leave(&mut self) {
        self.states.pop();
        trace!("left container, depth now {}", self.depth());
    }
}

impl<R: Read> Reader<GzDecoder<R>> {
    /// Create a reader over GZip compressed input.
    pub fn gzip(source: R) -> Self {
        Reader::new(GzDecoder::new(source))
    }
}

impl<R: Read> Iterator for Reader<R> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.fused {
            return None;
        }

        match self.next_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => {
                self.fused = true;
                None
            }
            Err(e) => {
                self.fused = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: Read> FusedIterator for Reader<R> {}
