//! Contains the Error and Result type used across the crate.

use std::fmt::Display;

/// Various errors that can occur while reading, mutating or writing NBT.
#[derive(Debug, Clone)]
pub struct Error {
    msg: String,
    kind: ErrorKind,
}

/// Convenience type for Result.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Ran out of input while reading, or out of capacity while writing to
    /// a stream that cannot grow.
    EndOfStream,

    /// A structural or semantic violation of the NBT invariants, such as a
    /// negative length prefix, a duplicate name in a compound, or a type
    /// mismatch in a list.
    Format,

    /// A numeric value or code outside its declared range, such as an
    /// unassigned tag type byte or an out-of-bounds list index.
    Range,

    /// The codec was used in a state it cannot make progress from. Callers
    /// should surface this rather than attempt recovery.
    InvalidReaderState,

    /// An error from a collaborator: the filesystem or a compression
    /// framing. Surfaced as-is.
    Io,
}

impl Error {
    /// Get the kind of error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub(crate) fn eof() -> Error {
        Error {
            msg: "unexpectedly ran out of stream".to_owned(),
            kind: ErrorKind::EndOfStream,
        }
    }

    pub(crate) fn format(msg: impl Into<String>) -> Error {
        Error {
            msg: msg.into(),
            kind: ErrorKind::Format,
        }
    }

    pub(crate) fn range(msg: impl Into<String>) -> Error {
        Error {
            msg: msg.into(),
            kind: ErrorKind::Range,
        }
    }

    pub(crate) fn invalid_reader_state(msg: impl Into<String>) -> Error {
        Error {
            msg: msg.into(),
            kind: ErrorKind::InvalidReaderState,
        }
    }

    pub(crate) fn invalid_tag(tag: u8) -> Error {
        Error::range(format!("invalid nbt tag value: {}", tag))
    }

    pub(crate) fn no_root_compound() -> Error {
        Error::format("invalid nbt: no root compound")
    }

    pub(crate) fn nonunicode_string(data: &[u8]) -> Error {
        Error::format(format!(
            "invalid nbt string: nonunicode: {}",
            String::from_utf8_lossy(data)
        ))
    }

    pub(crate) fn negative_length(len: i32) -> Error {
        Error::format(format!("negative length prefix: {}", len))
    }

    pub(crate) fn duplicate_name(name: &str) -> Error {
        Error::format(format!("duplicate name in compound: {:?}", name))
    }
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.msg)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error {
            msg: format!("io error: {}", e),
            kind: ErrorKind::Io,
        }
    }
}
