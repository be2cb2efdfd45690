//! Pack serialization.
//!
//! This module provides the [`Serializer`] implementation that converts
//! Rust data structures into the pack wire format.
//!
//! ## Overview
//!
//! The traversal follows the shape serde reports for each value:
//!
//! - **Structs** become maps sized to the serialized field count. In verbose mode
//!   each value is preceded by the lower-cased field name; in compact mode only the
//!   values are written, in declaration order. Fields are read back by position,
//!   so `#[serde(skip_serializing_if)]` fields that end up skipped are rejected
//!   with [`Error::UnsupportedKind`]; `#[serde(skip)]` is fine
//! - **Maps** become maps, with keys and values encoded recursively in the order the
//!   container yields them
//! - **Sequences and tuples** become sequences
//! - **`None` and unit** become the single `Nil` byte; `Some(v)` is transparent
//! - **Scalars** are written at their full declared width, big-endian
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use serde_pack::{to_vec, to_vec_compact};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Data { x: i8 }
//!
//! // a1 78 = "x", d0 05 = Int8(5)
//! assert_eq!(to_vec(&Data { x: 5 }).unwrap(), vec![0x81, 0xa1, 0x78, 0xd0, 0x05]);
//! assert_eq!(to_vec_compact(&Data { x: 5 }).unwrap(), vec![0x81, 0xd0, 0x05]);
//! ```
//!
//! ## Direct Serializer Usage
//!
//! ```rust
//! use serde_pack::{PackOptions, Serializer};
//! use serde::Serialize;
//!
//! let mut serializer = Serializer::new(PackOptions::new());
//! vec![1u16, 2u16].serialize(&mut serializer).unwrap();
//!
//! assert_eq!(serializer.into_inner(), vec![0x92, 0xcd, 0x00, 0x01, 0xcd, 0x00, 0x02]);
//! ```

use crate::tag::{self, Header};
use crate::{Error, PackOptions, Result};
use bytes::BufMut;
use serde::{ser, Serialize};

/// The pack serializer.
///
/// Appends encoded values to an owned output buffer. Created via
/// [`Serializer::new`]; the bytes are taken back with [`Serializer::into_inner`].
pub struct Serializer {
    output: Vec<u8>,
    options: PackOptions,
}

impl Serializer {
    pub fn new(options: PackOptions) -> Self {
        Serializer {
            output: Vec::with_capacity(options.capacity),
            options,
        }
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.output
    }

    pub fn options(&self) -> &PackOptions {
        &self.options
    }

    #[inline]
    fn write_header(&mut self, header: Header) {
        header.write(&mut self.output);
    }

    fn write_str(&mut self, v: &str) -> Result<()> {
        let header = tag::str_header(v.len())?;
        self.write_header(header);
        self.output.put_slice(v.as_bytes());
        Ok(())
    }

    /// Raw bytes go out as text when they are valid UTF-8, as bytes otherwise.
    fn write_raw(&mut self, v: &[u8]) -> Result<()> {
        match std::str::from_utf8(v) {
            Ok(s) => self.write_str(s),
            Err(_) => {
                let header = tag::bin_header(v.len())?;
                self.write_header(header);
                self.output.put_slice(v);
                Ok(())
            }
        }
    }

    fn write_field_name(&mut self, name: &str) -> Result<()> {
        if self.options.is_compact() {
            return Ok(());
        }
        self.write_str(&name.to_lowercase())
    }

    /// Variants are keyed by name in verbose mode and by index in compact mode.
    fn write_variant(&mut self, index: u32, variant: &str) -> Result<()> {
        if self.options.is_compact() {
            self.output.put_u8(tag::UINT_32);
            self.output.put_u32(index);
            Ok(())
        } else {
            self.write_str(variant)
        }
    }
}

impl<'a> ser::Serializer for &'a mut Serializer {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = SeqSerializer<'a>;
    type SerializeTuple = SeqSerializer<'a>;
    type SerializeTupleStruct = SeqSerializer<'a>;
    type SerializeTupleVariant = SeqSerializer<'a>;
    type SerializeMap = MapSerializer<'a>;
    type SerializeStruct = StructSerializer<'a>;
    type SerializeStructVariant = StructSerializer<'a>;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn serialize_bool(self, v: bool) -> Result<()> {
        self.output.put_u8(if v { tag::TRUE } else { tag::FALSE });
        Ok(())
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.output.put_u8(tag::INT_8);
        self.output.put_i8(v);
        Ok(())
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        self.output.put_u8(tag::INT_16);
        self.output.put_i16(v);
        Ok(())
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        self.output.put_u8(tag::INT_32);
        self.output.put_i32(v);
        Ok(())
    }

    fn serialize_i64(self, v: i64) -> Result<()> {
        self.output.put_u8(tag::INT_64);
        self.output.put_i64(v);
        Ok(())
    }

    fn serialize_i128(self, _v: i128) -> Result<()> {
        Err(Error::unsupported("i128"))
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        // A zero byte is its own fix-uint tag.
        if v == 0 {
            self.output.put_u8(tag::UINT_FIX);
        } else {
            self.output.put_u8(tag::UINT_8);
            self.output.put_u8(v);
        }
        Ok(())
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        self.output.put_u8(tag::UINT_16);
        self.output.put_u16(v);
        Ok(())
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.output.put_u8(tag::UINT_32);
        self.output.put_u32(v);
        Ok(())
    }

    fn serialize_u64(self, v: u64) -> Result<()> {
        self.output.put_u8(tag::UINT_64);
        self.output.put_u64(v);
        Ok(())
    }

    fn serialize_u128(self, _v: u128) -> Result<()> {
        Err(Error::unsupported("u128"))
    }

    fn serialize_f32(self, v: f32) -> Result<()> {
        self.output.put_u8(tag::FLOAT_32);
        self.output.put_f32(v);
        Ok(())
    }

    fn serialize_f64(self, v: f64) -> Result<()> {
        self.output.put_u8(tag::FLOAT_64);
        self.output.put_f64(v);
        Ok(())
    }

    fn serialize_char(self, v: char) -> Result<()> {
        let mut buf = [0u8; 4];
        self.write_str(v.encode_utf8(&mut buf))
    }

    fn serialize_str(self, v: &str) -> Result<()> {
        self.write_str(v)
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<()> {
        self.write_raw(v)
    }

    fn serialize_none(self) -> Result<()> {
        self.output.put_u8(tag::NIL);
        Ok(())
    }

    fn serialize_some<T>(self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        self.output.put_u8(tag::NIL);
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        variant: &'static str,
    ) -> Result<()> {
        self.write_variant(variant_index, variant)
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.write_header(tag::map_header(1)?);
        self.write_variant(variant_index, variant)?;
        value.serialize(self)
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqSerializer<'a>> {
        SeqSerializer::begin(self, len)
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqSerializer<'a>> {
        SeqSerializer::begin(self, Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SeqSerializer<'a>> {
        SeqSerializer::begin(self, Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SeqSerializer<'a>> {
        let seq_header = tag::slice_header(len)?;
        self.write_header(tag::map_header(1)?);
        self.write_variant(variant_index, variant)?;
        self.write_header(seq_header);
        Ok(SeqSerializer {
            ser: self,
            length: Length::Announced(len),
            count: 0,
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapSerializer<'a>> {
        MapSerializer::begin(self, len)
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<StructSerializer<'a>> {
        StructSerializer::begin(self, len)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<StructSerializer<'a>> {
        let record_header = tag::map_header(len)?;
        self.write_header(tag::map_header(1)?);
        self.write_variant(variant_index, variant)?;
        self.write_header(record_header);
        Ok(StructSerializer {
            ser: self,
            len,
            count: 0,
        })
    }
}

/// How an aggregate's header gets written.
enum Length {
    /// Header already written for this many entries.
    Announced(usize),
    /// Length unknown up front; the header is spliced in at this offset on `end`.
    Deferred(usize),
}

fn finish_length(
    ser: &mut Serializer,
    length: Length,
    count: usize,
    header_for: fn(usize) -> Result<Header>,
) -> Result<()> {
    match length {
        Length::Announced(expected) if expected != count => Err(Error::LengthMismatch {
            expected,
            actual: count,
        }),
        Length::Announced(_) => Ok(()),
        Length::Deferred(start) => {
            let header = header_for(count)?;
            let body = ser.output.split_off(start);
            ser.output.reserve(header.encoded_len() + body.len());
            header.write(&mut ser.output);
            ser.output.extend_from_slice(&body);
            Ok(())
        }
    }
}

pub struct SeqSerializer<'a> {
    ser: &'a mut Serializer,
    length: Length,
    count: usize,
}

impl<'a> SeqSerializer<'a> {
    fn begin(ser: &'a mut Serializer, len: Option<usize>) -> Result<Self> {
        let length = match len {
            Some(len) => {
                ser.write_header(tag::slice_header(len)?);
                Length::Announced(len)
            }
            None => Length::Deferred(ser.output.len()),
        };
        Ok(SeqSerializer {
            ser,
            length,
            count: 0,
        })
    }

    fn element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(&mut *self.ser)?;
        self.count += 1;
        Ok(())
    }

    fn finish(self) -> Result<()> {
        finish_length(self.ser, self.length, self.count, tag::slice_header)
    }
}

impl<'a> ser::SerializeSeq for SeqSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl<'a> ser::SerializeTuple for SeqSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl<'a> ser::SerializeTupleStruct for SeqSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl<'a> ser::SerializeTupleVariant for SeqSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

pub struct MapSerializer<'a> {
    ser: &'a mut Serializer,
    length: Length,
    count: usize,
}

impl<'a> MapSerializer<'a> {
    fn begin(ser: &'a mut Serializer, len: Option<usize>) -> Result<Self> {
        let length = match len {
            Some(len) => {
                ser.write_header(tag::map_header(len)?);
                Length::Announced(len)
            }
            None => Length::Deferred(ser.output.len()),
        };
        Ok(MapSerializer {
            ser,
            length,
            count: 0,
        })
    }
}

impl<'a> ser::SerializeMap for MapSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        key.serialize(&mut *self.ser)
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(&mut *self.ser)?;
        self.count += 1;
        Ok(())
    }

    fn end(self) -> Result<()> {
        finish_length(self.ser, self.length, self.count, tag::map_header)
    }
}

/// Writes a record: a map whose keys are field names, or nothing in compact mode.
pub struct StructSerializer<'a> {
    ser: &'a mut Serializer,
    len: usize,
    count: usize,
}

impl<'a> StructSerializer<'a> {
    fn begin(ser: &'a mut Serializer, len: usize) -> Result<Self> {
        ser.write_header(tag::map_header(len)?);
        Ok(StructSerializer { ser, len, count: 0 })
    }

    fn field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.ser.write_field_name(key)?;
        value.serialize(&mut *self.ser)?;
        self.count += 1;
        Ok(())
    }

    fn finish(self) -> Result<()> {
        finish_length(
            self.ser,
            Length::Announced(self.len),
            self.count,
            tag::map_header,
        )
    }

    /// Records bind by position, so a conditionally absent field would shift
    /// every later one on decode.
    fn skip(&mut self, key: &'static str) -> Result<()> {
        Err(Error::UnsupportedKind(format!(
            "conditionally skipped field `{}`",
            key
        )))
    }
}

impl<'a> ser::SerializeStruct for StructSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(key, value)
    }

    fn skip_field(&mut self, key: &'static str) -> Result<()> {
        self.skip(key)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl<'a> ser::SerializeStructVariant for StructSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(key, value)
    }

    fn skip_field(&mut self, key: &'static str) -> Result<()> {
        self.skip(key)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}
