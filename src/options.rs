//! Configuration options for packing and unpacking.
//!
//! - [`PackOptions`]: main configuration struct
//! - [`Mode`]: whether records carry their field names on the wire
//!
//! ## Examples
//!
//! ```rust
//! use serde_pack::{to_vec_with_options, Mode, PackOptions};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Data { x: i8, y: i8 }
//!
//! let data = Data { x: 1, y: 2 };
//!
//! let verbose = to_vec_with_options(&data, PackOptions::verbose()).unwrap();
//! let compact = to_vec_with_options(&data, PackOptions::new().with_mode(Mode::Compact)).unwrap();
//! assert!(compact.len() < verbose.len());
//! ```

/// Record layout on the wire.
///
/// - **Verbose**: every record field is preceded by its lower-cased name as Text
/// - **Compact**: only field values are written; field identity is positional
///
/// Decoding binds fields by position in both modes. Verbose keys are read and
/// discarded, never used to look fields up.
///
/// # Examples
///
/// ```rust
/// use serde_pack::Mode;
///
/// assert_eq!(Mode::default(), Mode::Verbose);
/// assert!(Mode::Compact.is_compact());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Verbose,
    Compact,
}

impl Mode {
    /// Returns `true` when record field names are omitted.
    #[must_use]
    pub const fn is_compact(&self) -> bool {
        matches!(self, Mode::Compact)
    }
}

/// Configuration options for the pack codec.
///
/// # Examples
///
/// ```rust
/// use serde_pack::{Mode, PackOptions};
///
/// let options = PackOptions::compact().with_capacity(1024);
/// assert_eq!(options.mode, Mode::Compact);
/// assert_eq!(options.capacity, 1024);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PackOptions {
    pub mode: Mode,
    /// Initial capacity of the encoder's output buffer, in bytes.
    pub capacity: usize,
}

impl Default for PackOptions {
    fn default() -> Self {
        PackOptions {
            mode: Mode::default(),
            capacity: 256,
        }
    }
}

impl PackOptions {
    /// Creates default options (verbose records, 256-byte initial buffer).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_pack::{Mode, PackOptions};
    ///
    /// let options = PackOptions::new();
    /// assert_eq!(options.mode, Mode::Verbose);
    /// assert_eq!(options.capacity, 256);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for verbose mode, with inline field names.
    #[must_use]
    pub fn verbose() -> Self {
        Self::default()
    }

    /// Options for compact mode, with positional-only record fields.
    #[must_use]
    pub fn compact() -> Self {
        PackOptions {
            mode: Mode::Compact,
            ..Default::default()
        }
    }

    /// Sets the record layout.
    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the initial output buffer capacity. Only affects encoding.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    #[inline]
    pub(crate) fn is_compact(&self) -> bool {
        self.mode.is_compact()
    }
}
