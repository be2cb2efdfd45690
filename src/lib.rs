//! # serde_pack
//!
//! A Serde-compatible, self-describing binary codec in the MessagePack family.
//!
//! ## Wire Format
//!
//! Every value begins with a tag byte naming its family: nil, booleans, signed and
//! unsigned integers of four widths, two float widths, UTF-8 text, raw bytes,
//! sequences and maps. Integers are always stored at their declared width and all
//! multi-byte fields are big-endian. Text, bytes, sequences and maps pick the
//! smallest length class that fits. See [`tag`] for the full table.
//!
//! Structs are written as maps. Two modes trade self-description for size:
//!
//! - **Verbose** ([`to_vec`]): each field value is preceded by its lower-cased name
//! - **Compact** ([`to_vec_compact`]): only the values are written
//!
//! Decoding binds struct fields by position in both modes, so the decoding type
//! must declare its fields in the same order as the encoding type.
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_pack::{from_slice, to_vec};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Header {
//!     compact: bool,
//!     schema: u8,
//! }
//!
//! let header = Header { compact: true, schema: 0 };
//!
//! let bytes = to_vec(&header).unwrap();
//! assert_eq!(bytes[0], 0x82); // map of two entries
//!
//! let (back, rest): (Header, _) = from_slice(&bytes).unwrap();
//! assert_eq!(back, header);
//! assert!(rest.is_empty());
//! ```
//!
//! ## Dynamic Values
//!
//! A [`Value`] field holds whatever scalar the input carries:
//!
//! ```rust
//! use serde_pack::{from_slice, to_vec, Value};
//!
//! let bytes = to_vec(&vec![Value::from(1u8), Value::from("two")]).unwrap();
//! let (values, _): (Vec<Value>, _) = from_slice(&bytes).unwrap();
//! assert_eq!(values[1].as_str(), Some("two"));
//! ```
//!
//! ## Logging
//!
//! Entry points emit `tracing` events at `trace` level on success and `debug`
//! level on failure. No subscriber is installed by this crate.

pub mod de;
pub mod error;
pub mod map;
pub mod options;
pub mod ser;
pub mod tag;
pub mod value;

pub use de::Deserializer;
pub use error::{Error, Result};
pub use map::Map;
pub use options::{Mode, PackOptions};
pub use ser::Serializer;
pub use value::Value;

use serde::{Deserialize, Serialize};
use std::io;

/// Encode any `T: Serialize` in verbose mode, with field names inline.
///
/// # Examples
///
/// ```rust
/// use serde_pack::to_vec;
///
/// assert_eq!(to_vec(&Some(true)).unwrap(), vec![0xc3]);
/// assert_eq!(to_vec(&None::<bool>).unwrap(), vec![0xc0]);
/// ```
///
/// # Errors
///
/// Returns an error if a value has no wire representation or an aggregate is
/// too long for a 32-bit length field.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    to_vec_with_options(value, PackOptions::verbose())
}

/// Encode any `T: Serialize` in compact mode, with positional-only struct fields.
///
/// # Examples
///
/// ```rust
/// use serde_pack::{to_vec, to_vec_compact};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let point = Point { x: 1, y: 2 };
/// assert!(to_vec_compact(&point).unwrap().len() < to_vec(&point).unwrap().len());
/// ```
///
/// # Errors
///
/// Same as [`to_vec`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec_compact<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    to_vec_with_options(value, PackOptions::compact())
}

/// Encode any `T: Serialize` with custom options.
///
/// # Errors
///
/// Same as [`to_vec`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec_with_options<T>(value: &T, options: PackOptions) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    let mode = options.mode;
    let mut serializer = Serializer::new(options);
    if let Err(err) = value.serialize(&mut serializer) {
        tracing::debug!(?mode, error = %err, "pack encode failed");
        return Err(err);
    }
    let bytes = serializer.into_inner();
    tracing::trace!(?mode, len = bytes.len(), "packed value");
    Ok(bytes)
}

/// Encode any `T: Serialize` in verbose mode and write it to `writer`.
///
/// # Examples
///
/// ```rust
/// use serde_pack::to_writer;
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &7u16).unwrap();
/// assert_eq!(buffer, vec![0xcd, 0x00, 0x07]);
/// ```
///
/// # Errors
///
/// Returns an error if encoding fails or writing to the writer fails. Nothing is
/// written when encoding fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, PackOptions::verbose())
}

/// Encode any `T: Serialize` with custom options and write it to `writer`.
///
/// # Errors
///
/// Same as [`to_writer`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(
    mut writer: W,
    value: &T,
    options: PackOptions,
) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let bytes = to_vec_with_options(value, options)?;
    writer
        .write_all(&bytes)
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Decode a verbose-mode `T` from the front of `data`.
///
/// Returns the value together with the bytes that follow it; decoding does not
/// need to consume the whole input.
///
/// # Examples
///
/// ```rust
/// use serde_pack::from_slice;
///
/// let (flag, rest): (bool, _) = from_slice(&[0xc3, 0xc2]).unwrap();
/// assert!(flag);
/// let (flag, rest): (bool, _) = from_slice(rest).unwrap();
/// assert!(!flag);
/// assert!(rest.is_empty());
/// ```
///
/// # Errors
///
/// Returns an error if a tag does not fit the destination type, a struct needs
/// more fields than the input carries, or the input ends early.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<'a, T>(data: &'a [u8]) -> Result<(T, &'a [u8])>
where
    T: Deserialize<'a>,
{
    from_slice_with_options(data, PackOptions::verbose())
}

/// Decode a compact-mode `T` from the front of `data`.
///
/// # Errors
///
/// Same as [`from_slice`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice_compact<'a, T>(data: &'a [u8]) -> Result<(T, &'a [u8])>
where
    T: Deserialize<'a>,
{
    from_slice_with_options(data, PackOptions::compact())
}

/// Decode a `T` from the front of `data` with custom options.
///
/// # Errors
///
/// Same as [`from_slice`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice_with_options<'a, T>(
    data: &'a [u8],
    options: PackOptions,
) -> Result<(T, &'a [u8])>
where
    T: Deserialize<'a>,
{
    let mode = options.mode;
    let mut deserializer = Deserializer::with_options(data, options);
    match T::deserialize(&mut deserializer) {
        Ok(value) => {
            let rest = deserializer.remaining();
            tracing::trace!(
                ?mode,
                consumed = data.len() - rest.len(),
                remaining = rest.len(),
                "unpacked value"
            );
            Ok((value, rest))
        }
        Err(err) => {
            tracing::debug!(?mode, error = %err, "pack decode failed");
            Err(err)
        }
    }
}

/// Decode into a caller-supplied destination, returning the unread bytes.
///
/// A leading `Nil` consumes one byte and leaves the destination untouched, for
/// structs as well as scalars and collections. A `Nil` nested inside the value
/// follows the usual rules: scalars and collections take their zero value and a
/// struct only fills fields that have a serde default or are `Option`s.
///
/// # Examples
///
/// ```rust
/// use serde_pack::{from_slice_into, to_vec, PackOptions};
///
/// let bytes = to_vec(&vec![1i8, 2, 3]).unwrap();
/// let mut numbers: Vec<i8> = Vec::new();
/// let rest = from_slice_into(&bytes, &mut numbers, PackOptions::verbose()).unwrap();
/// assert_eq!(numbers, vec![1, 2, 3]);
/// assert!(rest.is_empty());
/// ```
///
/// # Errors
///
/// Same as [`from_slice`]. On error the destination may be partially written.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice_into<'a, T>(
    data: &'a [u8],
    dest: &mut T,
    options: PackOptions,
) -> Result<&'a [u8]>
where
    T: Deserialize<'a>,
{
    let mode = options.mode;
    if let Some((&tag::NIL, rest)) = data.split_first() {
        tracing::trace!(?mode, "nil input, destination unchanged");
        return Ok(rest);
    }
    let mut deserializer = Deserializer::with_options(data, options);
    if let Err(err) = T::deserialize_in_place(&mut deserializer, dest) {
        tracing::debug!(?mode, error = %err, "pack decode failed");
        return Err(err);
    }
    let rest = deserializer.remaining();
    tracing::trace!(?mode, consumed = data.len() - rest.len(), "unpacked value in place");
    Ok(rest)
}
