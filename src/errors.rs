use std::fmt;
use std::io;

/// An error that can occur when decoding, scanning, parsing, or projecting data
#[derive(Debug)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Error {
        Error(Box::new(kind))
    }

    pub(crate) fn eof(offset: u64) -> Error {
        Error::new(ErrorKind::Eof { offset })
    }

    /// Return the specific type of error
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    /// Consume the error and return the specific type of error
    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    /// Returns the byte offset that the error occurs (if available)
    pub fn offset(&self) -> Option<u64> {
        self.0.offset()
    }
}

/// Specific type of error
#[derive(Debug)]
pub enum ErrorKind {
    /// An underlying error from the byte source
    Io(io::Error),

    /// The appinfo cache did not start with one of the accepted magic values
    InvalidMagic { magic: [u8; 4] },

    /// Unexpected end of input while reading a fixed size value
    Eof { offset: u64 },

    /// End of input was reached before a string terminator
    UnterminatedString { offset: u64 },

    /// End of input was reached while objects were still open
    IncompleteDocument { open_scopes: usize },

    /// An unrecognized type tag was encountered
    UnknownTypeTag { tag: u8, offset: Option<u64> },

    /// A key referenced an index outside of the key table
    KeyIndexOutOfRange { index: i32, len: usize, offset: u64 },

    /// Malformed text key values
    Text { msg: &'static str, offset: usize },

    /// The top level value given to the projector was not an object
    NotAnObject { found: &'static str },
}

impl ErrorKind {
    /// Returns the byte offset that the error occurs (if available)
    pub fn offset(&self) -> Option<u64> {
        match *self {
            ErrorKind::Eof { offset } => Some(offset),
            ErrorKind::UnterminatedString { offset } => Some(offset),
            ErrorKind::UnknownTypeTag { offset, .. } => offset,
            ErrorKind::KeyIndexOutOfRange { offset, .. } => Some(offset),
            ErrorKind::Text { offset, .. } => Some(offset as u64),
            _ => None,
        }
    }

    /// Returns true if the error stems from corrupt or truncated input
    /// (as opposed to an unsupported file, io failure, or a projection error)
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            ErrorKind::Eof { .. }
                | ErrorKind::UnterminatedString { .. }
                | ErrorKind::IncompleteDocument { .. }
                | ErrorKind::UnknownTypeTag { .. }
                | ErrorKind::Text { .. }
        )
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self.0 {
            ErrorKind::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self.0 {
            ErrorKind::Io(ref err) => write!(f, "unable to read data: {}", err),
            ErrorKind::InvalidMagic { magic } => write!(f, "invalid magic, got {:02x?}", magic),
            ErrorKind::Eof { offset } => {
                write!(f, "unexpected end of file (offset: {})", offset)
            }
            ErrorKind::UnterminatedString { offset } => {
                write!(f, "unterminated string (offset: {})", offset)
            }
            ErrorKind::IncompleteDocument { open_scopes } => write!(
                f,
                "reached end of file, but binary document is incomplete ({} open objects)",
                open_scopes
            ),
            ErrorKind::UnknownTypeTag { tag, offset: Some(offset) } => write!(
                f,
                "unknown type tag encountered (tag: 0x{:02x}, offset: {})",
                tag, offset
            ),
            ErrorKind::UnknownTypeTag { tag, offset: None } => {
                write!(f, "unknown type tag encountered (tag: 0x{:02x})", tag)
            }
            ErrorKind::KeyIndexOutOfRange { index, len, offset } => write!(
                f,
                "key index {} is outside of the key table of {} entries (offset: {})",
                index, len, offset
            ),
            ErrorKind::Text { msg, offset } => {
                write!(f, "text parsing error: {} (offset: {})", msg, offset)
            }
            ErrorKind::NotAnObject { found } => {
                write!(f, "expected an object to project, but found: {}", found)
            }
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::new(ErrorKind::Io(error))
    }
}
