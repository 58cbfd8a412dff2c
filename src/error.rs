use std::error;
use std::fmt;
use std::io;
use std::result;

use crate::parser::Position;

/// A type alias for `Result<T, csvline::Error>`.
pub type Result<T> = result::Result<T, Error>;

/// An error that can occur when reading CSV lines or accessing their fields.
///
/// Note that a failed read does not roll back the parser. In particular, a
/// `WrongFieldCount` error is returned after the offending line has already
/// replaced the parser's line and fields.
#[derive(Debug)]
pub enum Error {
    /// An I/O error that occurred while reading from the underlying stream.
    Io(io::Error),
    /// The stream ended cleanly, with no partial line accumulated.
    ///
    /// This is not a failure. Callers should stop reading when they see it.
    EndOfStream,
    /// The stream ended while a quoted field was still open.
    MalformedQuoting {
        /// The position at which the unterminated record started.
        pos: Position,
    },
    /// A record had a different number of fields than the first record.
    WrongFieldCount {
        /// The position at which the offending record started.
        pos: Position,
        /// The number of fields established by the first record.
        expected_len: u64,
        /// The number of fields in the offending record.
        len: u64,
    },
    /// A field was requested before any line was read, or at an index past
    /// the end of the current record.
    Index {
        /// The requested index.
        index: usize,
        /// The number of fields available. This is `0` when no line has been
        /// read yet.
        len: usize,
    },
}

impl Error {
    /// Returns true if and only if this error signals a clean end of stream.
    pub fn is_end_of_stream(&self) -> bool {
        match *self {
            Error::EndOfStream => true,
            _ => false,
        }
    }

    /// The position of the record that caused this error, if any.
    pub fn position(&self) -> Option<&Position> {
        match *self {
            Error::MalformedQuoting { ref pos }
            | Error::WrongFieldCount { ref pos, .. } => Some(pos),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Io(ref err) => err.fmt(f),
            Error::EndOfStream => write!(f, "end of CSV stream"),
            Error::MalformedQuoting { ref pos } => write!(
                f,
                "CSV parse error: record {} (byte {}, line {}): \
                 excess or missing \" in quoted-field",
                pos.record(),
                pos.byte(),
                pos.line()
            ),
            Error::WrongFieldCount { ref pos, expected_len, len } => write!(
                f,
                "CSV parse error: record {} (byte {}, line {}): \
                 wrong number of fields: found record with {} fields, \
                 but the first record has {} fields",
                pos.record(),
                pos.byte(),
                pos.line(),
                len,
                expected_len
            ),
            Error::Index { index, len: 0 } => write!(
                f,
                "CSV error: no field at index {}: no line has been read",
                index
            ),
            Error::Index { index, len } => write!(
                f,
                "CSV error: no field at index {}: record has {} fields",
                index, len
            ),
        }
    }
}
