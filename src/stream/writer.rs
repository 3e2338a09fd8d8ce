use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;
use log::{debug, trace};

use super::Payload;
use crate::codec::{check_string_len, WriteNbt};
use crate::error::{Error, Result};
use crate::Tag;

/// Where the bytes of a container's children end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sink {
    /// The underlying writer.
    Stream,
    /// The capture buffer at this index. Every list owns one.
    Capture(usize),
}

#[derive(Debug)]
enum State {
    /// Nothing written yet. Expects the root compound.
    Top,
    Compound {
        sink: Sink,
    },
    /// A list only knows its length once it is closed, but the length is
    /// written before its elements. Elements go to the capture buffer
    /// `capture`, and on close the header and buffer are copied to `sink`.
    List {
        tag: Tag,
        count: usize,
        capture: usize,
        sink: Sink,
    },
    /// The root compound has closed.
    End,
}

/// Writer pushes tokens into any [`Write`] as NBT data. Does not do
/// compression itself, see [`Writer::gzip`] for that.
///
/// The writer mirrors [`Reader`][`super::Reader`]: compounds and lists push a
/// state that is popped by the matching End token. It is up to the caller to
/// close everything it opens; [`Writer::emit_compound`] and
/// [`Writer::emit_list`] do this automatically.
///
/// ```
/// use nbtstream::stream::{Payload, Writer};
/// use nbtstream::Tag;
///
/// # fn main() -> nbtstream::error::Result<()> {
/// let mut writer = Writer::new(Vec::new());
/// writer.emit_token("", Payload::Compound)?;
/// writer.emit_token("name", Payload::String("Steve".to_owned()))?;
/// writer.emit_token("pos", Payload::List(Tag::Double))?;
/// writer.emit_item(Payload::Double(0.5))?;
/// writer.emit_item(Payload::Double(64.0))?;
/// writer.emit_end()?; // pos
/// writer.emit_end()?; // root
///
/// let bytes = writer.finish()?;
/// # assert_eq!(bytes.len(), 45);
/// # Ok(())
/// # }
/// ```
pub struct Writer<W: Write> {
    writer: W,
    states: Vec<State>,
    captures: Vec<Vec<u8>>,
}

impl<W: Write> Writer<W> {
    /// Create new writer for the given output.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            states: vec![State::End, State::Top],
            captures: Vec::new(),
        }
    }

    /// Write a token. Inside a compound `name` is the key of the entry. Inside
    /// a list the name is ignored and the token is treated like
    /// [`emit_item`][`Writer::emit_item`].
    pub fn emit_token(&mut self, name: &str, payload: Payload) -> Result<()> {
        let sink = match self.states.last_mut() {
            Some(State::Top) => return self.emit_root(name, payload),
            Some(State::Compound { sink }) => *sink,
            Some(State::List { .. }) => return self.emit_item(payload),
            Some(State::End) | None => return Err(Error::finished()),
        };

        if payload == Payload::End {
            self.output(sink).write_tag(Tag::End)?;
            self.leave();
            return Ok(());
        }

        // Nothing may be written unless the whole entry fits.
        check_string_len(name)?;
        payload.check_lengths()?;

        let out = self.output(sink);
        out.write_tag(payload.tag())?;
        out.write_string(name)?;
        self.write_value(sink, payload)
    }

    /// Write an element of the innermost list, which must be the innermost
    /// open container. The payload must have the tag the list was opened
    /// with, or be End to close the list.
    pub fn emit_item(&mut self, payload: Payload) -> Result<()> {
        let list = self.states.len().saturating_sub(1);
        let (tag, capture) = match self.states.last() {
            Some(State::List { tag, capture, .. }) => (*tag, *capture),
            Some(State::End) | None => return Err(Error::finished()),
            Some(_) => return Err(Error::not_in_list()),
        };

        if payload == Payload::End {
            return self.close_list();
        }
        if payload.tag() != tag {
            return Err(Error::type_mismatch(tag, payload.tag()));
        }

        payload.check_lengths()?;
        self.write_value(Sink::Capture(capture), payload)?;

        // A container item pushes its own state, so find the list by position.
        if let Some(State::List { count, .. }) = self.states.get_mut(list) {
            *count += 1;
        }
        Ok(())
    }

    /// Close the innermost compound or list.
    pub fn emit_end(&mut self) -> Result<()> {
        self.emit_token("", Payload::End)
    }

    /// Write a compound called `name`, with the contents written by `f`. The
    /// compound is closed even if `f` fails, in which case the error from `f`
    /// is returned.
    pub fn emit_compound<F>(&mut self, name: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.emit_token(name, Payload::Compound)?;
        self.scoped(f)
    }

    /// Write a list of `tag` elements called `name`, with the elements written
    /// by `f`. As with [`emit_compound`][`Writer::emit_compound`] the list is
    /// always closed.
    pub fn emit_list<F>(&mut self, name: &str, tag: Tag, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.emit_token(name, Payload::List(tag))?;
        self.scoped(f)
    }

    /// Number of compounds and lists currently open.
    pub fn depth(&self) -> usize {
        self.states
            .iter()
            .filter(|s| matches!(s, State::Compound { .. } | State::List { .. }))
            .count()
    }

    /// Whether the root compound has been closed.
    pub fn is_finished(&self) -> bool {
        matches!(self.states.last(), Some(State::End) | None)
    }

    /// Gets a reference to the underlying value in this writer.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Flush the output and return it. Containers that are still open are not
    /// closed.
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        debug!(
            "finished writing nbt, {} containers left open",
            self.depth()
        );
        Ok(self.writer)
    }

    fn scoped<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let body = f(self);
        let end = self.emit_end();
        body.and(end)
    }

    fn emit_root(&mut self, name: &str, payload: Payload) -> Result<()> {
        if payload != Payload::Compound {
            return Err(Error::no_root_compound(payload.tag()));
        }
        check_string_len(name)?;

        self.writer.write_tag(Tag::Compound)?;
        self.writer.write_string(name)?;
        if let Some(state) = self.states.last_mut() {
            *state = State::Compound { sink: Sink::Stream };
        }
        trace!("entered root compound {:?}", name);
        Ok(())
    }

    /// Write the value bytes of `payload` to `sink`, entering a new state if
    /// it starts a container. Any tag and name have already been written.
    fn write_value(&mut self, sink: Sink, payload: Payload) -> Result<()> {
        match payload {
            Payload::Compound => {
                self.states.push(State::Compound { sink });
                trace!("entered compound, depth now {}", self.depth());
            }
            Payload::List(tag) => {
                self.captures.push(Vec::new());
                self.states.push(State::List {
                    tag,
                    count: 0,
                    capture: self.captures.len() - 1,
                    sink,
                });
                trace!("entered list of {}, depth now {}", tag, self.depth());
            }
            scalar => scalar.write_scalar(self.output(sink))?,
        }
        Ok(())
    }

    fn close_list(&mut self) -> Result<()> {
        let (tag, count, sink) = match self.states.pop() {
            Some(State::List {
                tag, count, sink, ..
            }) => (tag, count, sink),
            other => unreachable!("closing a list while in {:?}", other),
        };
        // Inner lists close before outer ones, so this list's capture is the
        // last one.
        let body = self.captures.pop().unwrap_or_default();

        let out = self.output(sink);
        out.write_list_header(tag, count)?;
        out.write_all(&body)?;
        trace!("left list of {} x{}, depth now {}", tag, count, self.depth());
        Ok(())
    }

    fn leave(&mut self) {
        self.states.pop();
        trace!("left compound, depth now {}", self.depth());
    }

    fn output(&mut self, sink: Sink) -> &mut dyn Write {
        match sink {
            Sink::Stream => &mut self.writer,
            Sink::Capture(i) => &mut self.captures[i],
        }
    }
}

impl<W: Write> Writer<GzEncoder<W>> {
    /// Create a writer that GZip compresses its output at the given level.
    pub fn gzip(sink: W, level: Compression) -> Self {
        Writer::new(GzEncoder::new(sink, level))
    }

    /// Create a writer that GZip compresses its output at the default level.
    pub fn gzip_default(sink: W) -> Self {
        Self::gzip(sink, Compression::default())
    }

    /// Flush, write the GZip trailer and return the raw output.
    pub fn finish_gzip(self) -> Result<W> {
        Ok(self.finish()?.finish()?)
    }
}
