//! Pack deserialization.
//!
//! This module provides the [`Deserializer`] implementation that reads the pack
//! wire format back into Rust data structures.
//!
//! ## Overview
//!
//! Decoding is driven by the destination type. Each value starts with one tag
//! byte, which must belong to the family the destination expects:
//!
//! - **Nil**: accepted by every destination and yields its zero value (`None`,
//!   empty collection, `0`, `false`, empty string). A struct read from Nil sees
//!   no fields at all, so only fields with a serde default or of `Option` type
//!   can be filled; any other field fails with serde's "missing field" error
//! - **Tuples**: the encoded element count must equal the tuple's arity
//! - **Scalars**: width and signedness must match exactly. An `i32` destination
//!   accepts only the Int32 tag; nothing is widened or narrowed
//! - **Strings**: accept both the Text and the Bytes families
//! - **Structs**: fields bind by position. In verbose mode each field name is read
//!   and discarded. Entries beyond the struct's field count stay unread
//! - **Dynamic values** ([`crate::Value`], `deserialize_any`): the tag picks the
//!   concrete scalar type. Sequences and maps are not decoded here: the slot is left
//!   empty and the input is not advanced
//!
//! Decoding never requires the whole input to be consumed; the unread tail is
//! available through [`Deserializer::remaining`].
//!
//! ## Usage
//!
//! ```rust
//! use serde_pack::from_slice;
//!
//! // Int16(7) followed by an unrelated trailing byte.
//! let (n, rest): (i16, _) = from_slice(&[0xd1, 0x00, 0x07, 0xc0]).unwrap();
//! assert_eq!(n, 7);
//! assert_eq!(rest, &[0xc0]);
//! ```

use crate::tag;
use crate::{Error, PackOptions, Result};
use bytes::Buf;
use serde::de::{self, Deserialize, Unexpected};

/// The pack deserializer.
///
/// Reads values from a borrowed byte slice, advancing past each value it
/// decodes. Strings and byte buffers are borrowed from the input when the
/// destination allows it.
pub struct Deserializer<'de> {
    input: &'de [u8],
    options: PackOptions,
}

impl<'de> Deserializer<'de> {
    /// Creates a verbose-mode deserializer over `input`.
    pub fn from_slice(input: &'de [u8]) -> Self {
        Self::with_options(input, PackOptions::default())
    }

    pub fn with_options(input: &'de [u8], options: PackOptions) -> Self {
        Deserializer { input, options }
    }

    /// Bytes not yet consumed by decoding.
    pub fn remaining(&self) -> &'de [u8] {
        self.input
    }

    #[inline]
    fn ensure(&self, needed: usize) -> Result<()> {
        if self.input.len() < needed {
            Err(Error::eof(needed, self.input.len()))
        } else {
            Ok(())
        }
    }

    fn peek_tag(&self) -> Result<u8> {
        self.input.first().copied().ok_or(Error::eof(1, 0))
    }

    fn next_tag(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.input.get_u8())
    }

    fn take(&mut self, len: usize) -> Result<&'de [u8]> {
        self.ensure(len)?;
        let (head, tail) = self.input.split_at(len);
        self.input = tail;
        Ok(head)
    }

    fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.input.get_u8())
    }

    fn read_u16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        Ok(self.input.get_u16())
    }

    fn read_u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        Ok(self.input.get_u32())
    }

    fn map_len(&mut self, marker: u8) -> Result<usize> {
        match marker {
            tag::MAP_16 => self.read_u16().map(usize::from),
            tag::MAP_32 => self.read_u32().map(|n| n as usize),
            m if m & 0xf0 == tag::MAP_FIX => Ok(usize::from(m & 0x0f)),
            other => Err(Error::InvalidTag(other)),
        }
    }

    fn slice_len(&mut self, marker: u8) -> Result<usize> {
        match marker {
            tag::SLICE_16 => self.read_u16().map(usize::from),
            tag::SLICE_32 => self.read_u32().map(|n| n as usize),
            m if m & 0xf0 == tag::SLICE_FIX => Ok(usize::from(m & 0x0f)),
            other => Err(Error::InvalidTag(other)),
        }
    }

    fn text_len(&mut self, marker: u8) -> Result<usize> {
        match marker {
            tag::STR_8 | tag::BIN_8 => self.read_u8().map(usize::from),
            tag::STR_16 | tag::BIN_16 => self.read_u16().map(usize::from),
            tag::STR_32 | tag::BIN_32 => self.read_u32().map(|n| n as usize),
            m if m & 0xe0 == tag::STR_FIX => Ok(usize::from(m & 0x1f)),
            other => Err(Error::InvalidTag(other)),
        }
    }

    /// Reads the content of a Text or Bytes value whose tag was already consumed.
    fn read_text(&mut self, marker: u8) -> Result<&'de [u8]> {
        let len = self.text_len(marker)?;
        self.take(len)
    }

    /// Consumes a verbose-mode field name without looking at it.
    fn skip_field_name(&mut self) -> Result<()> {
        let marker = self.next_tag()?;
        if !tag::is_text_like(marker) {
            return Err(Error::InvalidTag(marker));
        }
        self.read_text(marker).map(|_| ())
    }

    /// Skips exactly one complete value, nested contents included.
    ///
    /// Nesting is tracked as a count of values still owed, not by recursion.
    fn skip_value(&mut self) -> Result<()> {
        let mut pending: usize = 1;
        while pending > 0 {
            pending -= 1;
            let marker = self.next_tag()?;
            let width = match marker {
                tag::NIL | tag::TRUE | tag::FALSE | tag::UINT_FIX => 0,
                tag::INT_8 | tag::UINT_8 => 1,
                tag::INT_16 | tag::UINT_16 => 2,
                tag::INT_32 | tag::UINT_32 | tag::FLOAT_32 => 4,
                tag::INT_64 | tag::UINT_64 | tag::FLOAT_64 => 8,
                m if tag::is_text_like(m) => self.text_len(m)?,
                m if tag::is_slice(m) => {
                    let len = self.slice_len(m)?;
                    pending = pending
                        .checked_add(len)
                        .ok_or(Error::TooManyEntries(len))?;
                    0
                }
                m if tag::is_map(m) => {
                    let len = self.map_len(m)?;
                    pending = len
                        .checked_mul(2)
                        .and_then(|entries| pending.checked_add(entries))
                        .ok_or(Error::TooManyEntries(len))?;
                    0
                }
                other => return Err(Error::InvalidTag(other)),
            };
            self.take(width)?;
        }
        Ok(())
    }

    fn record<V>(&mut self, len: usize, fields: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if fields > len {
            return Err(Error::TooFewValues {
                expected: fields,
                found: len,
            });
        }
        visitor.visit_seq(RecordAccess {
            de: self,
            remaining: fields,
        })
    }
}

/// Hands text content to the visitor as `str` when it is valid UTF-8, as bytes otherwise.
fn visit_text<'de, V>(visitor: V, raw: &'de [u8]) -> Result<V::Value>
where
    V: de::Visitor<'de>,
{
    match std::str::from_utf8(raw) {
        Ok(s) => visitor.visit_borrowed_str(s),
        Err(_) => visitor.visit_borrowed_bytes(raw),
    }
}

/// Tags a dynamically-typed slot can be decoded from.
fn is_dynamic_scalar(marker: u8) -> bool {
    matches!(
        marker,
        tag::NIL
            | tag::TRUE
            | tag::FALSE
            | tag::UINT_FIX
            | tag::INT_8
            | tag::INT_16
            | tag::INT_32
            | tag::INT_64
            | tag::UINT_8
            | tag::UINT_16
            | tag::UINT_32
            | tag::UINT_64
            | tag::FLOAT_32
            | tag::FLOAT_64
    ) || tag::is_text_like(marker)
}

macro_rules! deserialize_exact {
    ($method:ident, $visit:ident, $marker:pat, $get:ident, $ty:ty) => {
        fn $method<V>(self, visitor: V) -> Result<V::Value>
        where
            V: de::Visitor<'de>,
        {
            match self.next_tag()? {
                tag::NIL => visitor.$visit(<$ty>::default()),
                $marker => {
                    self.ensure(std::mem::size_of::<$ty>())?;
                    visitor.$visit(self.input.$get())
                }
                other => Err(Error::InvalidTag(other)),
            }
        }
    };
}

impl<'de> de::Deserializer<'de> for &mut Deserializer<'de> {
    type Error = Error;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let marker = self.peek_tag()?;
        if !is_dynamic_scalar(marker) {
            // Aggregates have no dynamic decode rule: the slot stays empty.
            return visitor.visit_unit();
        }
        self.input.advance(1);
        match marker {
            tag::NIL => visitor.visit_unit(),
            tag::TRUE => visitor.visit_bool(true),
            tag::FALSE => visitor.visit_bool(false),
            tag::UINT_FIX => visitor.visit_u8(0),
            tag::INT_8 => {
                self.ensure(1)?;
                visitor.visit_i8(self.input.get_i8())
            }
            tag::INT_16 => {
                self.ensure(2)?;
                visitor.visit_i16(self.input.get_i16())
            }
            tag::INT_32 => {
                self.ensure(4)?;
                visitor.visit_i32(self.input.get_i32())
            }
            tag::INT_64 => {
                self.ensure(8)?;
                visitor.visit_i64(self.input.get_i64())
            }
            tag::UINT_8 => visitor.visit_u8(self.read_u8()?),
            tag::UINT_16 => visitor.visit_u16(self.read_u16()?),
            tag::UINT_32 => visitor.visit_u32(self.read_u32()?),
            tag::UINT_64 => {
                self.ensure(8)?;
                visitor.visit_u64(self.input.get_u64())
            }
            tag::FLOAT_32 => {
                self.ensure(4)?;
                visitor.visit_f32(self.input.get_f32())
            }
            tag::FLOAT_64 => {
                self.ensure(8)?;
                visitor.visit_f64(self.input.get_f64())
            }
            text => {
                let raw = self.read_text(text)?;
                visit_text(visitor, raw)
            }
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.next_tag()? {
            tag::NIL | tag::FALSE => visitor.visit_bool(false),
            tag::TRUE => visitor.visit_bool(true),
            other => Err(Error::InvalidTag(other)),
        }
    }

    deserialize_exact!(deserialize_i8, visit_i8, tag::INT_8, get_i8, i8);
    deserialize_exact!(deserialize_i16, visit_i16, tag::INT_16, get_i16, i16);
    deserialize_exact!(deserialize_i32, visit_i32, tag::INT_32, get_i32, i32);
    deserialize_exact!(deserialize_i64, visit_i64, tag::INT_64, get_i64, i64);
    deserialize_exact!(deserialize_u16, visit_u16, tag::UINT_16, get_u16, u16);
    deserialize_exact!(deserialize_u32, visit_u32, tag::UINT_32, get_u32, u32);
    deserialize_exact!(deserialize_u64, visit_u64, tag::UINT_64, get_u64, u64);
    deserialize_exact!(deserialize_f32, visit_f32, tag::FLOAT_32, get_f32, f32);
    deserialize_exact!(deserialize_f64, visit_f64, tag::FLOAT_64, get_f64, f64);

    fn deserialize_u8<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.next_tag()? {
            tag::NIL | tag::UINT_FIX => visitor.visit_u8(0),
            tag::UINT_8 => visitor.visit_u8(self.read_u8()?),
            other => Err(Error::InvalidTag(other)),
        }
    }

    fn deserialize_i128<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported("i128"))
    }

    fn deserialize_u128<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported("u128"))
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.next_tag()? {
            tag::NIL => visitor.visit_char('\0'),
            m if tag::is_text_like(m) => {
                let raw = self.read_text(m)?;
                let s = std::str::from_utf8(raw)
                    .map_err(|_| {
                        <Error as de::Error>::invalid_value(Unexpected::Bytes(raw), &"a character")
                    })?;
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => visitor.visit_char(c),
                    _ => Err(de::Error::invalid_value(Unexpected::Str(s), &"a character")),
                }
            }
            other => Err(Error::InvalidTag(other)),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.next_tag()? {
            tag::NIL => visitor.visit_borrowed_str(""),
            m if tag::is_text_like(m) => {
                let raw = self.read_text(m)?;
                visit_text(visitor, raw)
            }
            other => Err(Error::InvalidTag(other)),
        }
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.next_tag()? {
            tag::NIL => visitor.visit_borrowed_bytes(&[]),
            m if tag::is_text_like(m) => visitor.visit_borrowed_bytes(self.read_text(m)?),
            other => Err(Error::InvalidTag(other)),
        }
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.peek_tag()? == tag::NIL {
            self.input.advance(1);
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.next_tag()? {
            tag::NIL => visitor.visit_unit(),
            other => Err(Error::InvalidTag(other)),
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.next_tag()? {
            tag::NIL => visitor.visit_seq(EmptyAccess),
            m => {
                let len = self.slice_len(m)?;
                visitor.visit_seq(SeqAccess {
                    de: self,
                    remaining: len,
                })
            }
        }
    }

    /// Tuples must match the encoded element count exactly.
    fn deserialize_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.next_tag()? {
            tag::NIL => visitor.visit_seq(EmptyAccess),
            m => {
                let found = self.slice_len(m)?;
                if found != len {
                    return Err(de::Error::invalid_length(found, &visitor));
                }
                visitor.visit_seq(SeqAccess {
                    de: self,
                    remaining: found,
                })
            }
        }
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_tuple(len, visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.next_tag()? {
            tag::NIL => visitor.visit_map(EmptyAccess),
            m => {
                let len = self.map_len(m)?;
                visitor.visit_map(MapAccess {
                    de: self,
                    remaining: len,
                })
            }
        }
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.next_tag()? {
            // No fields: defaults and `None` only.
            tag::NIL => visitor.visit_map(EmptyAccess),
            m => {
                let len = self.map_len(m)?;
                self.record(len, fields.len(), visitor)
            }
        }
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let marker = self.peek_tag()?;
        if tag::is_text_like(marker) || marker == tag::UINT_32 {
            visitor.visit_enum(UnitVariantAccess { de: self })
        } else if tag::is_map(marker) {
            self.input.advance(1);
            match self.map_len(marker)? {
                1 => visitor.visit_enum(VariantAccess { de: self }),
                n => Err(de::Error::invalid_length(n, &"a single-entry map")),
            }
        } else {
            Err(Error::InvalidTag(marker))
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.next_tag()? {
            tag::UINT_32 => visitor.visit_u32(self.read_u32()?),
            m if tag::is_text_like(m) => {
                let raw = self.read_text(m)?;
                visit_text(visitor, raw)
            }
            other => Err(Error::InvalidTag(other)),
        }
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.skip_value()?;
        visitor.visit_unit()
    }
}

/// Stands in for an absent sequence, map or record.
struct EmptyAccess;

impl<'de> de::SeqAccess<'de> for EmptyAccess {
    type Error = Error;

    fn next_element_seed<T>(&mut self, _seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        Ok(None)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(0)
    }
}

impl<'de> de::MapAccess<'de> for EmptyAccess {
    type Error = Error;

    fn next_key_seed<K>(&mut self, _seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        Ok(None)
    }

    fn next_value_seed<V>(&mut self, _seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        Err(Error::custom("next_value_seed called on an empty map"))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(0)
    }
}

struct SeqAccess<'a, 'de> {
    de: &'a mut Deserializer<'de>,
    remaining: usize,
}

impl<'de> de::SeqAccess<'de> for SeqAccess<'_, 'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        seed.deserialize(&mut *self.de).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

struct MapAccess<'a, 'de> {
    de: &'a mut Deserializer<'de>,
    remaining: usize,
}

impl<'de> de::MapAccess<'de> for MapAccess<'_, 'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        seed.deserialize(&mut *self.de).map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        seed.deserialize(&mut *self.de)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

/// Yields struct fields in declaration order. Verbose field names are skipped,
/// never matched.
struct RecordAccess<'a, 'de> {
    de: &'a mut Deserializer<'de>,
    remaining: usize,
}

impl<'de> de::SeqAccess<'de> for RecordAccess<'_, 'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        if !self.de.options.is_compact() {
            self.de.skip_field_name()?;
        }
        seed.deserialize(&mut *self.de).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

/// Enum encoded as a bare variant name or index.
struct UnitVariantAccess<'a, 'de> {
    de: &'a mut Deserializer<'de>,
}

impl<'a, 'de> de::EnumAccess<'de> for UnitVariantAccess<'a, 'de> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(&mut *self.de)?;
        Ok((variant, self))
    }
}

impl<'a, 'de> de::VariantAccess<'de> for UnitVariantAccess<'a, 'de> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        Ok(())
    }

    fn newtype_variant_seed<T>(self, _seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        Err(de::Error::invalid_type(
            Unexpected::UnitVariant,
            &"newtype variant",
        ))
    }

    fn tuple_variant<V>(self, _len: usize, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(de::Error::invalid_type(
            Unexpected::UnitVariant,
            &"tuple variant",
        ))
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(de::Error::invalid_type(
            Unexpected::UnitVariant,
            &"struct variant",
        ))
    }
}

/// Enum encoded as a single-entry map `{variant: payload}`; the map header is
/// already consumed.
struct VariantAccess<'a, 'de> {
    de: &'a mut Deserializer<'de>,
}

impl<'a, 'de> de::EnumAccess<'de> for VariantAccess<'a, 'de> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(&mut *self.de)?;
        Ok((variant, self))
    }
}

impl<'a, 'de> de::VariantAccess<'de> for VariantAccess<'a, 'de> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        <()>::deserialize(self.de)
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(self.de)
    }

    fn tuple_variant<V>(self, len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_tuple(self.de, len, visitor)
    }

    fn struct_variant<V>(self, fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_struct(self.de, "", fields, visitor)
    }
}

