//! Wire tag table.
//!
//! The first byte of every encoded value is a tag. It names the value's family
//! and fixes how many bytes follow: the payload width for scalars, or the width
//! of the explicit length field for text, bytes, sequences and maps. All
//! multi-byte fields are big-endian.
//!
//! | Family | Tag(s) | Following bytes |
//! |--------|--------|-----------------|
//! | Nil | `0xc0` | none |
//! | Bool | `0xc2` false, `0xc3` true | none |
//! | UInt | `0xcc` 8, `0xcd` 16, `0xce` 32, `0xcf` 64 | exact width |
//! | Int | `0xd0` 8, `0xd1` 16, `0xd2` 32, `0xd3` 64 | exact width |
//! | Float | `0xca` 32, `0xcb` 64 | IEEE-754 bits |
//! | Map | `0x80 \| n` (n < 16), `0xde` u16 len, `0xdf` u32 len | entry count |
//! | Sequence | `0x90 \| n` (n < 16), `0xdc` u16 len, `0xdd` u32 len | element count |
//! | Text | `0xa0 \| n` (n < 32), `0xd9` u8 len, `0xda` u16 len, `0xdb` u32 len | byte count |
//! | Bytes | `0xc4` u8 len, `0xc5` u16 len, `0xc6` u32 len | byte count |
//!
//! The only fix-uint byte the encoder ever emits is `0x00`, for a zero `u8`.

use crate::{Error, Result};
use bytes::BufMut;

pub const NIL: u8 = 0xc0;

pub const FALSE: u8 = 0xc2;
pub const TRUE: u8 = 0xc3;

pub const BIN_8: u8 = 0xc4;
pub const BIN_16: u8 = 0xc5;
pub const BIN_32: u8 = 0xc6;

pub const FLOAT_32: u8 = 0xca;
pub const FLOAT_64: u8 = 0xcb;

pub const UINT_FIX: u8 = 0x00;
pub const UINT_8: u8 = 0xcc;
pub const UINT_16: u8 = 0xcd;
pub const UINT_32: u8 = 0xce;
pub const UINT_64: u8 = 0xcf;

pub const INT_FIX: u8 = 0xe0;
pub const INT_8: u8 = 0xd0;
pub const INT_16: u8 = 0xd1;
pub const INT_32: u8 = 0xd2;
pub const INT_64: u8 = 0xd3;

pub const MAP_FIX: u8 = 0x80;
pub const MAP_16: u8 = 0xde;
pub const MAP_32: u8 = 0xdf;

pub const SLICE_FIX: u8 = 0x90;
pub const SLICE_16: u8 = 0xdc;
pub const SLICE_32: u8 = 0xdd;

pub const STR_FIX: u8 = 0xa0;
pub const STR_8: u8 = 0xd9;
pub const STR_16: u8 = 0xda;
pub const STR_32: u8 = 0xdb;

// Largest count each length class can carry.
pub const LEN_4: usize = (1 << 4) - 1;
pub const LEN_5: usize = (1 << 5) - 1;
pub const LEN_8: usize = (1 << 8) - 1;
pub const LEN_16: usize = (1 << 16) - 1;
pub const LEN_32: u64 = (1 << 32) - 1;

/// Returns `true` for any map tag, fixed or explicit.
#[inline]
pub const fn is_map(tag: u8) -> bool {
    tag & 0xf0 == MAP_FIX || tag == MAP_16 || tag == MAP_32
}

/// Returns `true` for any sequence tag, fixed or explicit.
#[inline]
pub const fn is_slice(tag: u8) -> bool {
    tag & 0xf0 == SLICE_FIX || tag == SLICE_16 || tag == SLICE_32
}

/// Returns `true` for the UTF-8 text tags.
#[inline]
pub const fn is_str(tag: u8) -> bool {
    tag & 0xe0 == STR_FIX || tag == STR_8 || tag == STR_16 || tag == STR_32
}

#[inline]
pub const fn is_bin(tag: u8) -> bool {
    tag == BIN_8 || tag == BIN_16 || tag == BIN_32
}

/// Text and bytes both decode into text-capable destinations.
#[inline]
pub const fn is_text_like(tag: u8) -> bool {
    is_str(tag) || is_bin(tag)
}

/// A tag together with its explicit length field, if any.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Header {
    Fix(u8),
    U8(u8, u8),
    U16(u8, u16),
    U32(u8, u32),
}

impl Header {
    pub(crate) fn write<B: BufMut>(self, out: &mut B) {
        match self {
            Header::Fix(tag) => out.put_u8(tag),
            Header::U8(tag, len) => {
                out.put_u8(tag);
                out.put_u8(len);
            }
            Header::U16(tag, len) => {
                out.put_u8(tag);
                out.put_u16(len);
            }
            Header::U32(tag, len) => {
                out.put_u8(tag);
                out.put_u32(len);
            }
        }
    }

    pub(crate) fn encoded_len(self) -> usize {
        match self {
            Header::Fix(_) => 1,
            Header::U8(..) => 2,
            Header::U16(..) => 3,
            Header::U32(..) => 5,
        }
    }
}

fn explicit_u32(len: usize) -> Option<u32> {
    u32::try_from(len).ok()
}

/// Picks the smallest map header for `len` entries.
pub(crate) fn map_header(len: usize) -> Result<Header> {
    aggregate_header(len, MAP_FIX, MAP_16, MAP_32)
}

/// Picks the smallest sequence header for `len` elements.
pub(crate) fn slice_header(len: usize) -> Result<Header> {
    aggregate_header(len, SLICE_FIX, SLICE_16, SLICE_32)
}

fn aggregate_header(len: usize, fix: u8, tag16: u8, tag32: u8) -> Result<Header> {
    if len <= LEN_4 {
        Ok(Header::Fix(fix | len as u8))
    } else if len <= LEN_16 {
        Ok(Header::U16(tag16, len as u16))
    } else {
        explicit_u32(len)
            .map(|n| Header::U32(tag32, n))
            .ok_or(Error::TooManyEntries(len))
    }
}

/// Picks the smallest text header for `len` bytes of UTF-8.
pub(crate) fn str_header(len: usize) -> Result<Header> {
    if len <= LEN_5 {
        Ok(Header::Fix(STR_FIX | len as u8))
    } else if len <= LEN_8 {
        Ok(Header::U8(STR_8, len as u8))
    } else if len <= LEN_16 {
        Ok(Header::U16(STR_16, len as u16))
    } else {
        explicit_u32(len)
            .map(|n| Header::U32(STR_32, n))
            .ok_or(Error::ValueTooLong(len))
    }
}

/// Picks the smallest bytes header for `len` bytes. There is no inline class.
pub(crate) fn bin_header(len: usize) -> Result<Header> {
    if len <= LEN_8 {
        Ok(Header::U8(BIN_8, len as u8))
    } else if len <= LEN_16 {
        Ok(Header::U16(BIN_16, len as u16))
    } else {
        explicit_u32(len)
            .map(|n| Header::U32(BIN_32, n))
            .ok_or(Error::ValueTooLong(len))
    }
}
