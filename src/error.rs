//! Contains the Error and Result type used by the reader and writer.
use crate::Tag;

/// An error from reading or writing NBT. None of these are recoverable: once
/// a [`Reader`][`crate::stream::Reader`] or
/// [`Writer`][`crate::stream::Writer`] has returned an error it should be
/// discarded.
#[derive(Debug, Clone)]
pub struct Error {
    msg: String,
    kind: ErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The input ran out part way through some NBT value.
    UnexpectedEof,

    /// A tag byte outside of the known range. Contains the offending byte.
    InvalidTag(u8),

    /// The outermost entity of the document was not a compound.
    ExpectedCompound,

    /// A list item did not match the element tag the list was opened with.
    TypeMismatch { expected: Tag, found: Tag },

    /// A list item was emitted while the innermost container was not a list.
    InvalidContext,

    /// The root compound has already been closed.
    InvalidState,

    /// A length prefix was negative, or a value was too large to be given a
    /// length prefix.
    LengthOutOfRange,

    /// Expected unicode data but was not valid. Contained bytes are the
    /// invalid unicode data.
    Nonunicode(Vec<u8>),

    /// Any other IO error from the underlying reader or writer.
    Io,
}

impl Error {
    /// Get the kind of error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, ErrorKind::UnexpectedEof)
    }

    pub(crate) fn invalid_tag(tag: u8) -> Self {
        Self {
            msg: format!("invalid nbt tag value: {}", tag),
            kind: ErrorKind::InvalidTag(tag),
        }
    }

    pub(crate) fn no_root_compound(found: Tag) -> Self {
        Self {
            msg: format!("invalid nbt: expected root compound, found {}", found),
            kind: ErrorKind::ExpectedCompound,
        }
    }

    pub(crate) fn type_mismatch(expected: Tag, found: Tag) -> Self {
        Self {
            msg: format!("list of {} cannot hold {}", expected, found),
            kind: ErrorKind::TypeMismatch { expected, found },
        }
    }

    pub(crate) fn not_in_list() -> Self {
        Self {
            msg: "list item emitted outside of a list".to_owned(),
            kind: ErrorKind::InvalidContext,
        }
    }

    pub(crate) fn finished() -> Self {
        Self {
            msg: "root compound already closed".to_owned(),
            kind: ErrorKind::InvalidState,
        }
    }

    pub(crate) fn length_out_of_range(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            kind: ErrorKind::LengthOutOfRange,
        }
    }

    pub(crate) fn nonunicode(data: Vec<u8>) -> Self {
        Self {
            msg: format!(
                "invalid nbt string: nonunicode: {}",
                String::from_utf8_lossy(&data)
            ),
            kind: ErrorKind::Nonunicode(data),
        }
    }

    pub(crate) fn unexpected_eof() -> Self {
        Self {
            msg: "eof: unexpectedly ran out of input".to_owned(),
            kind: ErrorKind::UnexpectedEof,
        }
    }
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.msg)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::UnexpectedEof => Self::unexpected_eof(),
            _ => Self {
                msg: format!("io error: {}", e),
                kind: ErrorKind::Io,
            },
        }
    }
}

/// Convenience type for Result.
pub type Result<T> = std::result::Result<T, Error>;
