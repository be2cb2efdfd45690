//! Error types for pack encoding and decoding.
//!
//! Every failure is terminal for the top-level call that raised it: there is no
//! partial result, and after a decode error nothing is promised about how far
//! the input cursor advanced.
//!
//! ## Error Categories
//!
//! - **Wire errors**: a tag byte that does not fit the destination ([`Error::InvalidTag`]),
//!   a record destination wider than the encoded entry count ([`Error::TooFewValues`]),
//!   input that ends mid-value ([`Error::UnexpectedEof`])
//! - **Capacity errors**: aggregates or byte content that exceed the 32-bit length field
//!   ([`Error::TooManyEntries`], [`Error::ValueTooLong`])
//! - **Shape errors**: values with no wire family ([`Error::UnsupportedKind`])
//! - **I/O errors**: failures of the writer handed to [`crate::to_writer`]
//!
//! ## Examples
//!
//! ```rust
//! use serde_pack::{from_slice, Error};
//!
//! // 0xd2 is the Int32 tag; a u8 destination only accepts 0xcc.
//! let result = from_slice::<u8>(&[0xd2, 0, 0, 0, 1]);
//! assert!(matches!(result, Err(Error::InvalidTag(0xd2))));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while packing or unpacking.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// IO error while writing encoded output
    #[error("IO error: {0}")]
    Io(String),

    /// Tag byte inconsistent with the destination's family or width
    #[error("invalid tag found {0:#04x}")]
    InvalidTag(u8),

    /// Value shape with no wire representation
    #[error("unsupported type: {0}")]
    UnsupportedKind(String),

    /// Record, map or sequence longer than a 32-bit length field can describe
    #[error("too many values: {0} entries exceed the 32-bit length field")]
    TooManyEntries(usize),

    /// Text or byte content longer than a 32-bit length field can describe
    #[error("value too long: {0} bytes")]
    ValueTooLong(usize),

    /// Record destination needs more fields than the encoded map carries
    #[error("too few values: destination needs {expected} fields, input has {found}")]
    TooFewValues { expected: usize, found: usize },

    /// Input ended before the current value was complete
    #[error("unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    /// A `Serialize` impl announced one length and produced another
    #[error("length mismatch: announced {expected} entries, wrote {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Custom error raised through serde
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates an unsupported kind error naming the offending shape.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_pack::Error;
    ///
    /// let err = Error::unsupported("i128");
    /// assert_eq!(err.to_string(), "unsupported type: i128");
    /// ```
    pub fn unsupported(kind: &str) -> Self {
        Error::UnsupportedKind(kind.to_string())
    }

    /// Creates an end-of-input error for a read of `needed` bytes.
    pub fn eof(needed: usize, remaining: usize) -> Self {
        Error::UnexpectedEof { needed, remaining }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
